//! HTTP 模型客户端
//!
//! 仅在启用 `http-client` 特性时编译，离线构建不需要 reqwest。

#[cfg(feature = "http-client")]
pub mod gemini;

#[cfg(feature = "http-client")]
pub use gemini::GeminiClient;
