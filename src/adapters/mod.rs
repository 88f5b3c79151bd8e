// Adapters layer: concrete implementations for external systems (project API, HTTP server).

pub mod http;
pub mod server;
