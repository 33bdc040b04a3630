// Latest price tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use stockmcp_core::analysis::latest_quote;
use stockmcp_core::{Formatter, MarketDataProvider, Operation};

/// Tool to fetch the current price and volume for a ticker
pub struct GetStockPriceTool {
    provider: Arc<dyn MarketDataProvider>,
    formatter: Formatter,
}

impl GetStockPriceTool {
    pub fn new(provider: Arc<dyn MarketDataProvider>, formatter: Formatter) -> Self {
        Self {
            provider,
            formatter,
        }
    }
}

#[derive(Debug, Deserialize)]
struct GetStockPriceArgs {
    ticker: String,
}

#[async_trait::async_trait]
impl Tool for GetStockPriceTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "get_stock_price".to_string(),
            description: "Fetches the current stock price and volume for a given ticker symbol."
                .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "ticker": json_schema_string("The stock ticker symbol (e.g., 'AAPL')")
                }),
                vec!["ticker"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: GetStockPriceArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for get_stock_price")?;

        let text = match latest_quote(self.provider.as_ref(), &args.ticker).await {
            Ok(quote) => self.formatter.snapshot(&quote),
            Err(e) => self.formatter.failure(Operation::Quote, &args.ticker, &e),
        };

        Ok(CallToolResult::text(text))
    }
}
