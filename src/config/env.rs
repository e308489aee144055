use std::env;

use crate::error::{Result, RouterError};

pub const DEFAULT_API_KEY_VAR: &str = "GOOGLE_API_KEY";

/// 进入离线模式的原因
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MockReason {
    NoApiKey,
    Requested,
}

/// 演示模式，启动时确定一次后显式传给驱动
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DemoMode {
    Mock(MockReason),
    Live { api_key: String },
}

impl DemoMode {
    pub fn is_live(&self) -> bool {
        matches!(self, DemoMode::Live { .. })
    }
}

/// 环境变量配置管理
pub struct EnvConfig;

impl EnvConfig {
    /// 读取当前目录下的 `.env`，文件不存在时忽略
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env"),
            Err(err) if err.not_found() => {}
            Err(err) => tracing::warn!(%err, "failed to load .env"),
        }
    }

    /// 获取 API Key
    ///
    /// 优先级：
    /// 1. `${VAR_NAME}` 格式时读取对应环境变量
    /// 2. 为空时读取 `default_env_var`
    /// 3. 否则原样返回
    pub fn get_api_key(api_key: &str, default_env_var: &str) -> Result<String> {
        if api_key.starts_with("${") && api_key.ends_with('}') && api_key.len() > 3 {
            Self::get_env(&api_key[2..api_key.len() - 1])
        } else if api_key.is_empty() {
            Self::get_env(default_env_var)
        } else {
            Ok(api_key.to_string())
        }
    }

    /// 从环境变量获取非空值
    pub fn get_env(key: &str) -> Result<String> {
        match env::var(key) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ => Err(RouterError::Config(format!(
                "environment variable `{}` is not set; set it in `.env` or the process environment",
                key
            ))),
        }
    }

    pub fn get_env_optional(key: &str) -> Option<String> {
        env::var(key).ok().filter(|v| !v.trim().is_empty())
    }

    /// 有可用的 key 就进入在线模式，否则退回离线演示
    pub fn demo_mode(api_key: &str, default_env_var: &str, force_mock: bool) -> DemoMode {
        if force_mock {
            return DemoMode::Mock(MockReason::Requested);
        }
        match Self::get_api_key(api_key, default_env_var) {
            Ok(api_key) => DemoMode::Live { api_key },
            Err(_) => DemoMode::Mock(MockReason::NoApiKey),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_api_key_direct() {
        let result = EnvConfig::get_api_key("AIzaSyDirectKey", "TOOLROUTE_TEST_UNUSED");
        assert_eq!(result.unwrap(), "AIzaSyDirectKey");
    }

    #[test]
    fn test_get_api_key_env_var() {
        env::set_var("TOOLROUTE_TEST_KEY", "test_key_value");
        let result = EnvConfig::get_api_key("${TOOLROUTE_TEST_KEY}", "TOOLROUTE_TEST_FALLBACK");
        assert_eq!(result.unwrap(), "test_key_value");
        env::remove_var("TOOLROUTE_TEST_KEY");
    }

    #[test]
    fn test_get_api_key_default_var() {
        env::set_var("TOOLROUTE_TEST_DEFAULT", "default_value");
        let result = EnvConfig::get_api_key("", "TOOLROUTE_TEST_DEFAULT");
        assert_eq!(result.unwrap(), "default_value");
        env::remove_var("TOOLROUTE_TEST_DEFAULT");
    }

    #[test]
    fn test_demo_mode() {
        assert_eq!(
            EnvConfig::demo_mode("", "TOOLROUTE_TEST_MISSING", false),
            DemoMode::Mock(MockReason::NoApiKey)
        );
        assert_eq!(
            EnvConfig::demo_mode("literal-key", "TOOLROUTE_TEST_MISSING", false),
            DemoMode::Live {
                api_key: "literal-key".into()
            }
        );
        assert_eq!(
            EnvConfig::demo_mode("literal-key", "TOOLROUTE_TEST_MISSING", true),
            DemoMode::Mock(MockReason::Requested)
        );
    }
}
