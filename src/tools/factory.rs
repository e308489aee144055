use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use anyhow::anyhow;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{Result, RouterError};
use crate::tools::builtin::{
    CalculatorTool, NewsTool, WeatherTool, CALCULATOR_KEYWORDS, NEWS_KEYWORDS, WEATHER_KEYWORDS,
};
use crate::tools::tool::Tool;

pub type ToolFactory = Arc<dyn Fn(Option<Value>) -> Result<Arc<dyn Tool>> + Send + Sync>;

#[derive(Default)]
pub struct ToolFactoryRegistry {
    factories: HashMap<String, ToolFactory>,
}

impl ToolFactoryRegistry {
    pub fn new() -> Self {
        Self {
            factories: HashMap::new(),
        }
    }

    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        register_builtin_tool_factories(&mut registry);
        registry
    }

    pub fn register_factory<T: Into<String>>(&mut self, name: T, factory: ToolFactory) {
        self.factories.insert(name.into(), factory);
    }

    pub fn build(&self, factory_name: &str, config: Option<Value>) -> Result<Arc<dyn Tool>> {
        let factory = self
            .factories
            .get(factory_name)
            .ok_or_else(|| RouterError::ToolNotRegistered(factory_name.to_string()))?;
        factory(config)
    }

    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

fn extract_config<T: DeserializeOwned>(config: Option<Value>) -> Result<T> {
    let normalized = config.unwrap_or_else(|| Value::Object(serde_json::Map::new()));
    serde_json::from_value(normalized).map_err(|e| RouterError::Other(anyhow!(e)))
}

fn keywords_or(keywords: Option<Vec<String>>, defaults: &[&str]) -> Vec<String> {
    keywords.unwrap_or_else(|| defaults.iter().map(|k| k.to_string()).collect())
}

pub fn register_builtin_tool_factories(registry: &mut ToolFactoryRegistry) {
    registry.register_factory(
        "weather",
        Arc::new(|config| {
            #[derive(Deserialize)]
            struct Conf {
                #[serde(default)]
                keywords: Option<Vec<String>>,
                #[serde(default)]
                forecasts: BTreeMap<String, String>,
                #[serde(default)]
                default_forecast: Option<String>,
            }
            let conf: Conf = extract_config(config)?;
            let mut tool = WeatherTool::with_keywords(keywords_or(conf.keywords, WEATHER_KEYWORDS));
            for (city, forecast) in conf.forecasts {
                tool = tool.with_forecast(city, forecast);
            }
            if let Some(forecast) = conf.default_forecast {
                tool = tool.with_default_forecast(forecast);
            }
            Ok(Arc::new(tool) as Arc<dyn Tool>)
        }),
    );

    registry.register_factory(
        "calculator",
        Arc::new(|config| {
            #[derive(Deserialize)]
            struct Conf {
                #[serde(default)]
                keywords: Option<Vec<String>>,
            }
            let conf: Conf = extract_config(config)?;
            Ok(Arc::new(CalculatorTool::with_keywords(keywords_or(
                conf.keywords,
                CALCULATOR_KEYWORDS,
            ))) as Arc<dyn Tool>)
        }),
    );

    registry.register_factory(
        "news",
        Arc::new(|config| {
            #[derive(Deserialize)]
            struct Conf {
                #[serde(default)]
                keywords: Option<Vec<String>>,
                #[serde(default)]
                headlines: BTreeMap<String, String>,
                #[serde(default)]
                default_headline: Option<String>,
            }
            let conf: Conf = extract_config(config)?;
            let mut tool = NewsTool::with_keywords(keywords_or(conf.keywords, NEWS_KEYWORDS));
            for (topic, headline) in conf.headlines {
                tool = tool.with_headline(topic, headline);
            }
            if let Some(headline) = conf.default_headline {
                tool = tool.with_default_headline(headline);
            }
            Ok(Arc::new(tool) as Arc<dyn Tool>)
        }),
    );
}
