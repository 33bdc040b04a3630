// Core types and computation for the stock analysis MCP server

pub mod analysis;
pub mod error;
pub mod format;
pub mod metrics;
pub mod provider;
pub mod types;

#[cfg(any(test, feature = "test-util"))]
pub mod testing;

pub use error::{AnalysisError, AnalysisResult, FetchError};
pub use format::{Formatter, Operation};
pub use provider::MarketDataProvider;
pub use types::*;
