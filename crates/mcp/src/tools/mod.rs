pub mod history;
pub mod metrics;
pub mod price;
mod registry;

pub use history::GetHistoricalDataTool;
pub use metrics::CalculateMetricsTool;
pub use price::GetStockPriceTool;
pub use registry::{
    json_schema_object, json_schema_string, json_schema_string_with_default, Tool, ToolRegistry,
};

use std::sync::Arc;
use stockmcp_core::{Formatter, MarketDataProvider};

/// Registry holding the three stock analysis tools over one provider.
pub fn stock_tools(provider: Arc<dyn MarketDataProvider>, formatter: Formatter) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(GetStockPriceTool::new(
        provider.clone(),
        formatter.clone(),
    )));
    registry.register(Arc::new(GetHistoricalDataTool::new(
        provider.clone(),
        formatter.clone(),
    )));
    registry.register(Arc::new(CalculateMetricsTool::new(provider, formatter)));
    registry
}
