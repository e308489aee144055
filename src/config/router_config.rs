use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::env::DEFAULT_API_KEY_VAR;
use crate::error::{Result, RouterError};
use crate::tools::{ToolFactoryRegistry, ToolRegistry};
use crate::utils::ConfigValidator;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

pub const DEFAULT_DEMO_QUERIES: &[&str] = &[
    "What's the weather like in Tokyo?",
    "Calculate 5 * 3",
    "Find me news about machine learning",
    "Hello! How are you doing today?",
];

/// 工具配置：工厂名加可选的工厂参数
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolConfig {
    pub factory: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,
}

impl ToolConfig {
    pub fn new(factory: impl Into<String>) -> Self {
        Self {
            factory: factory.into(),
            config: None,
        }
    }
}

/// 路由器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// 可以是 `${VAR}`；为空时读取 `api_key_env`
    #[serde(default)]
    pub api_key: String,
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default)]
    pub system_prompt: Option<String>,
    /// 顺序即路由优先级
    #[serde(default = "default_tools")]
    pub tools: Vec<ToolConfig>,
    #[serde(default = "default_demo_queries")]
    pub demo_queries: Vec<String>,
    /// 离线模式下模型按完整查询返回的回复
    #[serde(default)]
    pub mock_replies: BTreeMap<String, String>,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_string()
}

fn default_temperature() -> f32 {
    0.7
}

fn default_api_key_env() -> String {
    DEFAULT_API_KEY_VAR.to_string()
}

fn default_tools() -> Vec<ToolConfig> {
    ["news", "weather", "calculator"]
        .into_iter()
        .map(ToolConfig::new)
        .collect()
}

fn default_demo_queries() -> Vec<String> {
    DEFAULT_DEMO_QUERIES.iter().map(|q| q.to_string()).collect()
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: default_temperature(),
            api_key: String::new(),
            api_key_env: default_api_key_env(),
            system_prompt: None,
            tools: default_tools(),
            demo_queries: default_demo_queries(),
            mock_replies: BTreeMap::new(),
        }
    }
}

impl RouterConfig {
    pub fn from_json_str(content: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(content)
            .map_err(|e| RouterError::Config(format!("failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            RouterError::Config(format!("failed to read `{}`: {}", path.display(), e))
        })?;
        debug!(path = %path.display(), "loaded router config");
        Self::from_json_str(&content)
    }

    pub fn validate(&self) -> Result<()> {
        ConfigValidator::validate_model_name(&self.model)?;
        ConfigValidator::validate_temperature(self.temperature)?;
        if self.tools.is_empty() {
            return Err(RouterError::Config("at least one tool must be configured".into()));
        }
        for tool in &self.tools {
            ConfigValidator::validate_tool_name(&tool.factory)?;
        }
        Ok(())
    }

    /// 按配置顺序构建工具表，重名工具会被拒绝
    pub fn build_tools(&self, factories: &ToolFactoryRegistry) -> Result<ToolRegistry> {
        let mut registry = ToolRegistry::new();
        for tool in &self.tools {
            registry.register(factories.build(&tool.factory, tool.config.clone())?)?;
        }
        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_uses_defaults() {
        let config = RouterConfig::from_json_str("{}").unwrap();
        assert_eq!(config.model, DEFAULT_MODEL);
        assert_eq!(config.temperature, 0.7);
        assert_eq!(config.api_key_env, "GOOGLE_API_KEY");
        assert_eq!(config.demo_queries.len(), 4);

        let tools = config
            .build_tools(&ToolFactoryRegistry::with_builtins())
            .unwrap();
        assert_eq!(tools.names(), vec!["news", "weather", "calculator"]);
    }

    #[test]
    fn rejects_invalid_values() {
        assert!(RouterConfig::from_json_str(r#"{"temperature": 3.0}"#).is_err());
        assert!(RouterConfig::from_json_str(r#"{"model": ""}"#).is_err());
        assert!(RouterConfig::from_json_str(r#"{"tools": []}"#).is_err());
        assert!(RouterConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn duplicate_tools_are_rejected() {
        let config = RouterConfig::from_json_str(
            r#"{"tools": [{"factory": "weather"}, {"factory": "weather"}]}"#,
        )
        .unwrap();
        let err = config
            .build_tools(&ToolFactoryRegistry::with_builtins())
            .err()
            .unwrap();
        assert!(matches!(err, RouterError::DuplicateTool(name) if name == "weather"));
    }
}
