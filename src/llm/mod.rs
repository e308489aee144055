pub mod client;
pub mod http;
pub mod mock;
pub mod types;

pub use client::{DynLlmClient, LlmClient};
pub use mock::{MockLlmClient, DEFAULT_MOCK_REPLY};
pub use types::{LlmRequest, LlmResponse};

#[cfg(feature = "http-client")]
pub use http::GeminiClient;
