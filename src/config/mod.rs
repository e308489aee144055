pub mod env;
pub mod router_config;

pub use env::{DemoMode, EnvConfig, MockReason, DEFAULT_API_KEY_VAR};
pub use router_config::{RouterConfig, ToolConfig, DEFAULT_DEMO_QUERIES, DEFAULT_MODEL};
