use std::sync::Arc;

use tracing::{debug, instrument};

use crate::error::{Result, RouterError};
use crate::llm::{DynLlmClient, LlmRequest};
use crate::router::selector::{KeywordSelector, RouteDecision, RouteSelector};
use crate::tools::{Tool, ToolRegistry};

/// 一次路由的完整结果
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteOutcome {
    pub decision: RouteDecision,
    pub response: String,
}

/// 对话路由器
///
/// 每条消息只调用一个协作方：命中的工具，或者语言模型。调用失败直接返回给调用方，
/// 路由器本身不捕获、不重试。
pub struct ConversationRouter {
    llm: DynLlmClient,
    tools: ToolRegistry,
    selector: Box<dyn RouteSelector>,
    system_prompt: Option<String>,
    temperature: f32,
}

impl ConversationRouter {
    pub fn new<I>(llm: DynLlmClient, tools: I) -> Result<Self>
    where
        I: IntoIterator<Item = Arc<dyn Tool>>,
    {
        Ok(Self::with_registry(llm, ToolRegistry::from_tools(tools)?))
    }

    pub fn with_registry(llm: DynLlmClient, tools: ToolRegistry) -> Self {
        Self {
            llm,
            tools,
            selector: Box::new(KeywordSelector),
            system_prompt: None,
            temperature: crate::llm::types::default_temperature(),
        }
    }

    pub fn with_selector(mut self, selector: impl RouteSelector + 'static) -> Self {
        self.selector = Box::new(selector);
        self
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(prompt.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    pub fn decide(&self, query: &str) -> RouteDecision {
        self.selector.select(query, &self.tools)
    }

    pub async fn process_message(&self, query: &str) -> Result<String> {
        Ok(self.route(query).await?.response)
    }

    pub async fn route(&self, query: &str) -> Result<RouteOutcome> {
        let decision = self.decide(query);
        let response = self.dispatch(query, &decision).await?;
        Ok(RouteOutcome { decision, response })
    }

    /// 按已有的路由结果调用对应协作方，不再运行选择器
    #[instrument(skip(self), level = "debug")]
    pub async fn dispatch(&self, query: &str, decision: &RouteDecision) -> Result<String> {
        let response = match decision {
            RouteDecision::Tool(name) => {
                let tool = self
                    .tools
                    .get(name)
                    .ok_or_else(|| RouterError::ToolNotRegistered(name.clone()))?;
                debug!(tool = %name, "routing to tool");
                tool.invoke(query).await.map_err(|err| match err {
                    RouterError::ToolFailed { .. } => err,
                    other => RouterError::tool_failed(name.as_str(), other.to_string()),
                })?
            }
            RouteDecision::Fallback => {
                debug!("no tool matched, asking language model");
                let mut request = LlmRequest::new(query).with_temperature(self.temperature);
                request.system = self.system_prompt.clone();
                self.llm
                    .complete(request)
                    .await
                    .map_err(|err| match err {
                        RouterError::Llm(_) => err,
                        other => RouterError::Llm(other.to_string()),
                    })?
                    .content
            }
        };
        Ok(response)
    }
}
