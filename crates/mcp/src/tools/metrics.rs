// Moving average and volatility tool

use crate::protocol::{CallToolResult, ToolSchema};
use crate::tools::{json_schema_object, json_schema_string, json_schema_string_with_default, Tool};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::sync::Arc;
use stockmcp_core::analysis::{period_metrics, DEFAULT_PERIOD};
use stockmcp_core::{Formatter, MarketDataProvider, Operation};

/// Tool to compute the 20-day SMA and annualized volatility over a period
pub struct CalculateMetricsTool {
    provider: Arc<dyn MarketDataProvider>,
    formatter: Formatter,
}

impl CalculateMetricsTool {
    pub fn new(provider: Arc<dyn MarketDataProvider>, formatter: Formatter) -> Self {
        Self {
            provider,
            formatter,
        }
    }
}

#[derive(Debug, Deserialize)]
struct CalculateMetricsArgs {
    ticker: String,
    #[serde(default)]
    period: Option<String>,
}

#[async_trait::async_trait]
impl Tool for CalculateMetricsTool {
    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "calculate_metrics".to_string(),
            description:
                "Calculates the 20-day simple moving average and annualized volatility for a ticker."
                    .to_string(),
            input_schema: json_schema_object(
                serde_json::json!({
                    "ticker": json_schema_string("The stock ticker symbol (e.g., 'AAPL')"),
                    "period": json_schema_string_with_default(
                        "Lookback period such as '1mo', '6mo', '1y' or '5y'",
                        DEFAULT_PERIOD
                    )
                }),
                vec!["ticker"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<CallToolResult> {
        let args: CalculateMetricsArgs = serde_json::from_value(arguments)
            .context("Invalid arguments for calculate_metrics")?;
        let period = args.period.as_deref().unwrap_or(DEFAULT_PERIOD);

        let text = match period_metrics(self.provider.as_ref(), &args.ticker, period).await {
            Ok(metrics) => self.formatter.metrics(&metrics),
            Err(e) => self.formatter.failure(Operation::Metrics, &args.ticker, &e),
        };

        Ok(CallToolResult::text(text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockmcp_core::testing::StaticProvider;

    #[tokio::test]
    async fn test_metrics_short_series() {
        let provider = StaticProvider::with_closes(&[100.0, 110.0, 100.0]);
        let tool = CalculateMetricsTool::new(provider.clone(), Formatter::default());

        let result = tool
            .execute(serde_json::json!({"ticker": "AAPL"}))
            .await
            .unwrap();

        assert_eq!(
            result.text_content(),
            "\nSymbol: AAPL\n20-Day SMA: unavailable (fewer than 20 trading days)\n\
             Annualized Volatility: 1.5130\nTimestamp: 2024-01-03 00:00:00\n"
        );
        assert_eq!(provider.calls.lock().unwrap().as_slice(), ["period AAPL 1y"]);
    }

    #[tokio::test]
    async fn test_metrics_full_window() {
        let closes: Vec<f64> = (1..=20).map(|i| i as f64).collect();
        let provider = StaticProvider::with_closes(&closes);
        let tool = CalculateMetricsTool::new(provider.clone(), Formatter::default());

        let text = tool
            .execute(serde_json::json!({"ticker": "AAPL", "period": "6mo"}))
            .await
            .unwrap()
            .text_content();

        assert!(text.contains("20-Day SMA: $10.50\n"));
        assert!(text.contains("Timestamp: 2024-01-20 00:00:00"));
        assert_eq!(provider.calls.lock().unwrap().as_slice(), ["period AAPL 6mo"]);
    }

    #[tokio::test]
    async fn test_metrics_single_bar() {
        let provider = StaticProvider::with_closes(&[42.0]);
        let tool = CalculateMetricsTool::new(provider, Formatter::default());

        let text = tool
            .execute(serde_json::json!({"ticker": "AAPL"}))
            .await
            .unwrap()
            .text_content();

        assert!(text.starts_with("Error calculating metrics for AAPL: Computation error:"));
    }

    #[tokio::test]
    async fn test_metrics_no_data() {
        let provider = StaticProvider::with_closes(&[]);
        let tool = CalculateMetricsTool::new(provider, Formatter::default());

        let text = tool
            .execute(serde_json::json!({"ticker": "ZZZZ", "period": "1mo"}))
            .await
            .unwrap()
            .text_content();

        assert_eq!(text, "No data available for ticker ZZZZ.");
    }

    #[test]
    fn test_metrics_schema_advertises_default_period() {
        let provider = StaticProvider::with_closes(&[]);
        let schema = CalculateMetricsTool::new(provider, Formatter::default()).schema();

        assert_eq!(schema.input_schema["properties"]["period"]["default"], "1y");
        assert_eq!(schema.input_schema["required"], serde_json::json!(["ticker"]));
    }
}
