// Historical closes tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use stockmcp_core::analysis::daily_history;
use stockmcp_core::{Formatter, MarketDataProvider, Operation};

/// Tool to list daily closing prices between two dates
pub struct GetHistoricalDataTool {
    provider: Arc<dyn MarketDataProvider>,
    formatter: Formatter,
}

impl GetHistoricalDataTool {
    pub fn new(provider: Arc<dyn MarketDataProvider>, formatter: Formatter) -> Self {
        Self {
            provider,
            formatter,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetHistoricalDataArgs {
    ticker: String,
    start_date: String,
    #[serde(default)]
    end_date: Option<String>,
}

#[async_trait::async_trait]
impl Tool for GetHistoricalDataTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_historical_data".to_string(),
            description: "Retrieves historical daily closing prices for a ticker between two dates."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "ticker": json_schema_string("The stock ticker symbol (e.g., 'AAPL')"),
                    "start_date": json_schema_string("Start date in YYYY-MM-DD format"),
                    "end_date": json_schema_string(
                        "End date in YYYY-MM-DD format (defaults to today)"
                    )
                }),
                vec!["ticker", "start_date"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetHistoricalDataArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_historical_data")?;

        let result = daily_history(
            self.provider.as_ref(),
            &args.ticker,
            &args.start_date,
            args.end_date.as_deref(),
        )
        .await;

        let text = match result {
            Ok(series) => self.formatter.history(&series),
            Err(e) => self.formatter.failure(Operation::History, &args.ticker, &e),
        };

        Ok(CallToolResult::text(text))
    }
}
