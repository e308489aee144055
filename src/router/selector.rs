use crate::tools::{Tool, ToolRegistry};
pub use crate::utils::text::tokenize;
use crate::utils::text::contains_phrase;

/// 单次查询的路由结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteDecision {
    Tool(String),
    Fallback,
}

pub trait RouteSelector: Send + Sync {
    fn select(&self, query: &str, tools: &ToolRegistry) -> RouteDecision;
}

/// 关键词路由
///
/// 查询按非字母数字字符切成小写单词；按注册顺序检查每个工具，第一个有关键词
/// 与查询中的单词（多词关键词要求连续出现）完全相同的工具胜出。
#[derive(Clone, Copy, Debug, Default)]
pub struct KeywordSelector;

impl KeywordSelector {
    pub fn matches(tool: &dyn Tool, words: &[String]) -> bool {
        tool.manifest()
            .keywords
            .iter()
            .any(|keyword| contains_phrase(words, keyword))
    }
}

impl RouteSelector for KeywordSelector {
    fn select(&self, query: &str, tools: &ToolRegistry) -> RouteDecision {
        let words = tokenize(query);
        if words.is_empty() {
            return RouteDecision::Fallback;
        }
        tools
            .iter()
            .find(|&tool| Self::matches(&**tool, &words))
            .map(|tool| RouteDecision::Tool(tool.name().to_string()))
            .unwrap_or(RouteDecision::Fallback)
    }
}
