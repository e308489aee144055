use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::debug;

use crate::error::{Result, RouterError};
use crate::tools::calculator;
use crate::tools::manifest::ToolManifest;
use crate::tools::tool::Tool;
use crate::utils::text::{contains_phrase, tokenize};

pub const DEFAULT_FORECAST: &str = "☀️ Sunny, 28°C";
pub const DEFAULT_HEADLINE: &str = "Machine learning adoption is growing in 2025.";

pub const WEATHER_KEYWORDS: &[&str] = &["weather", "forecast", "temperature", "rain", "sunny"];
pub const CALCULATOR_KEYWORDS: &[&str] = &["calculate", "calculator", "compute", "evaluate", "math"];
pub const NEWS_KEYWORDS: &[&str] = &["news", "headline", "headlines"];

/// 按城市返回固定天气，未知城市返回默认值
pub struct WeatherTool {
    manifest: ToolManifest,
    forecasts: BTreeMap<String, String>,
    default_forecast: String,
}

impl WeatherTool {
    pub fn new() -> Self {
        Self::with_keywords(WEATHER_KEYWORDS.iter().copied())
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            manifest: ToolManifest::builder("weather")
                .description("Get the current weather for a city")
                .keywords(keywords)
                .build(),
            forecasts: BTreeMap::new(),
            default_forecast: DEFAULT_FORECAST.to_string(),
        }
    }

    pub fn with_forecast(mut self, city: impl Into<String>, forecast: impl Into<String>) -> Self {
        self.forecasts
            .insert(city.into().to_lowercase(), forecast.into());
        self
    }

    pub fn with_default_forecast(mut self, forecast: impl Into<String>) -> Self {
        self.default_forecast = forecast.into();
        self
    }
}

impl Default for WeatherTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for WeatherTool {
    fn manifest(&self) -> &ToolManifest {
        &self.manifest
    }

    async fn invoke(&self, query: &str) -> Result<String> {
        let words = tokenize(query);
        let forecast = self
            .forecasts
            .iter()
            .find(|(city, _)| contains_phrase(&words, city))
            .map(|(city, forecast)| {
                debug!(%city, "weather: matched city");
                forecast.clone()
            })
            .unwrap_or_else(|| self.default_forecast.clone());
        Ok(forecast)
    }
}

pub struct CalculatorTool {
    manifest: ToolManifest,
}

impl CalculatorTool {
    pub fn new() -> Self {
        Self::with_keywords(CALCULATOR_KEYWORDS.iter().copied())
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            manifest: ToolManifest::builder("calculator")
                .description("Evaluate an arithmetic expression")
                .keywords(keywords)
                .build(),
        }
    }
}

impl Default for CalculatorTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for CalculatorTool {
    fn manifest(&self) -> &ToolManifest {
        &self.manifest
    }

    async fn invoke(&self, query: &str) -> Result<String> {
        let expr = calculator::extract_expression(query).ok_or_else(|| {
            RouterError::tool_failed(self.name(), "no arithmetic expression found in query")
        })?;
        let value = calculator::evaluate(&expr)
            .map_err(|e| RouterError::tool_failed(self.name(), e.to_string()))?;
        Ok(calculator::format_number(value))
    }
}

/// 按话题返回固定新闻标题
pub struct NewsTool {
    manifest: ToolManifest,
    headlines: BTreeMap<String, String>,
    default_headline: String,
}

impl NewsTool {
    pub fn new() -> Self {
        Self::with_keywords(NEWS_KEYWORDS.iter().copied())
    }

    pub fn with_keywords<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            manifest: ToolManifest::builder("news")
                .description("Search recent news about a topic")
                .keywords(keywords)
                .build(),
            headlines: BTreeMap::new(),
            default_headline: DEFAULT_HEADLINE.to_string(),
        }
    }

    pub fn with_headline(mut self, topic: impl Into<String>, headline: impl Into<String>) -> Self {
        self.headlines
            .insert(topic.into().to_lowercase(), headline.into());
        self
    }

    pub fn with_default_headline(mut self, headline: impl Into<String>) -> Self {
        self.default_headline = headline.into();
        self
    }
}

impl Default for NewsTool {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for NewsTool {
    fn manifest(&self) -> &ToolManifest {
        &self.manifest
    }

    async fn invoke(&self, query: &str) -> Result<String> {
        let words = tokenize(query);
        Ok(self
            .headlines
            .iter()
            .find(|(topic, _)| contains_phrase(&words, topic))
            .map(|(_, headline)| headline.clone())
            .unwrap_or_else(|| self.default_headline.clone()))
    }
}

type ToolFn = dyn Fn(&str) -> Result<String> + Send + Sync;

/// 用闭包实现的工具，便于嵌入方和测试快速注册
pub struct FnTool {
    manifest: ToolManifest,
    handler: Box<ToolFn>,
}

impl FnTool {
    pub fn new<F>(manifest: ToolManifest, handler: F) -> Self
    where
        F: Fn(&str) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            manifest,
            handler: Box::new(handler),
        }
    }
}

#[async_trait]
impl Tool for FnTool {
    fn manifest(&self) -> &ToolManifest {
        &self.manifest
    }

    async fn invoke(&self, query: &str) -> Result<String> {
        (self.handler)(query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn weather_uses_city_table_then_default() {
        let tool = WeatherTool::new().with_forecast("London", "🌧️ Rain, 14°C");
        assert_eq!(
            tool.invoke("weather in london please").await.unwrap(),
            "🌧️ Rain, 14°C"
        );
        assert_eq!(
            tool.invoke("What's the weather like in Tokyo?").await.unwrap(),
            DEFAULT_FORECAST
        );
    }

    #[tokio::test]
    async fn lookups_match_whole_words() {
        let weather = WeatherTool::new()
            .with_forecast("Nice", "🌤️ Mild, 19°C")
            .with_forecast("New York", "🌬️ Windy, 9°C");
        assert_eq!(
            weather.invoke("weather in Nice tomorrow?").await.unwrap(),
            "🌤️ Mild, 19°C"
        );
        assert_eq!(
            weather.invoke("weather in Venice").await.unwrap(),
            DEFAULT_FORECAST
        );
        assert_eq!(
            weather.invoke("forecast for new-york").await.unwrap(),
            "🌬️ Windy, 9°C"
        );

        let news = NewsTool::new().with_headline("ai", "AI chips sell out.");
        assert_eq!(
            news.invoke("news about the tail of the comet").await.unwrap(),
            DEFAULT_HEADLINE
        );
        assert_eq!(news.invoke("AI news").await.unwrap(), "AI chips sell out.");
    }

    #[tokio::test]
    async fn calculator_evaluates_query() {
        let tool = CalculatorTool::new();
        assert_eq!(tool.invoke("Calculate 5 * 3").await.unwrap(), "15");
        assert_eq!(tool.invoke("compute (1 + 2) / 4").await.unwrap(), "0.75");
    }

    #[tokio::test]
    async fn calculator_failures_name_the_tool() {
        let tool = CalculatorTool::new();
        match tool.invoke("Calculate 1 / 0").await {
            Err(RouterError::ToolFailed { tool, message }) => {
                assert_eq!(tool, "calculator");
                assert!(message.contains("division by zero"));
            }
            other => panic!("unexpected result: {:?}", other),
        }
        assert!(tool.invoke("calculate nothing").await.is_err());
    }

    #[tokio::test]
    async fn news_uses_topic_table_then_default() {
        let tool = NewsTool::new().with_headline("rust", "Rust 2024 edition ships.");
        assert_eq!(
            tool.invoke("latest news on Rust").await.unwrap(),
            "Rust 2024 edition ships."
        );
        assert_eq!(
            tool.invoke("Find me news about machine learning").await.unwrap(),
            DEFAULT_HEADLINE
        );
    }
}
