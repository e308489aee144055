pub mod config;
pub mod demo;
pub mod error;
pub mod llm;
pub mod router;
pub mod tools;
pub mod utils;

pub use config::{DemoMode, EnvConfig, MockReason, RouterConfig, ToolConfig};
pub use demo::{build_llm, build_router, DemoDriver, DemoOutcome};
pub use error::{Result, RouterError};
pub use llm::{DynLlmClient, LlmClient, LlmRequest, LlmResponse, MockLlmClient};
#[cfg(feature = "http-client")]
pub use llm::GeminiClient;
pub use router::{ConversationRouter, KeywordSelector, RouteDecision, RouteOutcome, RouteSelector};
pub use tools::{
    CalculatorTool, FnTool, NewsTool, Tool, ToolFactoryRegistry, ToolManifest,
    ToolManifestBuilder, ToolRegistry, WeatherTool,
};
pub use utils::{logging, validation};
