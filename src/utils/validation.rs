use crate::error::{Result, RouterError};

/// 配置验证器
pub struct ConfigValidator;

impl ConfigValidator {
    /// 验证 API Key，拒绝空值和明显的占位符
    pub fn validate_api_key(api_key: &str) -> Result<()> {
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            return Err(RouterError::Config("API key must not be empty".into()));
        }

        if trimmed.starts_with("your_") || trimmed.starts_with("${") {
            return Err(RouterError::Config(
                "API key looks like a placeholder, provide a real key".into(),
            ));
        }

        Ok(())
    }

    /// 验证模型名称
    pub fn validate_model_name(model: &str) -> Result<()> {
        if model.trim().is_empty() {
            return Err(RouterError::Config("model name must not be empty".into()));
        }
        if model.contains(char::is_whitespace) {
            return Err(RouterError::Config(format!(
                "model name `{}` must not contain whitespace",
                model
            )));
        }
        Ok(())
    }

    pub fn validate_tool_name(name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(RouterError::Config("tool name must not be empty".into()));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-' || c == '.')
        {
            return Err(RouterError::Config(format!(
                "tool name `{}` may only contain letters, digits, `_`, `-` and `.`",
                name
            )));
        }

        Ok(())
    }

    /// 验证温度参数
    pub fn validate_temperature(temperature: f32) -> Result<()> {
        if !(0.0..=2.0).contains(&temperature) {
            return Err(RouterError::Config(format!(
                "temperature must be between 0.0 and 2.0, got {}",
                temperature
            )));
        }
        Ok(())
    }
}
