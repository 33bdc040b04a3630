// MCP (Model Context Protocol) server exposing stock analysis tools
// to agent clients over stdio

pub mod config;
pub mod protocol;
pub mod resources;
pub mod server;
pub mod tools;

pub use config::ServerConfig;
pub use resources::ResourceRegistry;
pub use server::McpServer;
