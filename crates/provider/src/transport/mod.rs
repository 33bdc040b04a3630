//! Transport layer for the market data provider.

pub mod http;

pub use http::HttpTransport;
