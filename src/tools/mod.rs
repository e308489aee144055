pub mod builtin;
pub mod calculator;
pub mod factory;
pub mod manifest;
pub mod registry;
pub mod tool;

pub use builtin::{CalculatorTool, FnTool, NewsTool, WeatherTool};
pub use factory::{register_builtin_tool_factories, ToolFactory, ToolFactoryRegistry};
pub use manifest::{ToolManifest, ToolManifestBuilder};
pub use registry::ToolRegistry;
pub use tool::Tool;
