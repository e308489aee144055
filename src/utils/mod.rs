/// 工具模块 - 提供通用工具函数
pub mod logging;
pub mod text;
pub mod validation;

pub use logging::LoggingConfig;
pub use text::{contains_phrase, tokenize};
pub use validation::ConfigValidator;
