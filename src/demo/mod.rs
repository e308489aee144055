//! 演示驱动
//!
//! 逐条把示例查询交给路由器并打印结果。单条查询失败只打印错误，继续下一条。

use std::io::Write;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::{DemoMode, MockReason, RouterConfig};
use crate::error::{Result, RouterError};
use crate::llm::{DynLlmClient, MockLlmClient};
use crate::router::{ConversationRouter, RouteDecision};
use crate::tools::ToolFactoryRegistry;

const RULE_WIDTH: usize = 40;

pub const NO_API_KEY_NOTICE: &str = "⚠️  No Google API key found. Using mock responses for demo.";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DemoOutcome {
    pub query: String,
    pub decision: RouteDecision,
    pub result: std::result::Result<String, String>,
}

impl DemoOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// 离线模式的模型客户端，预设回复来自配置
pub fn mock_client(config: &RouterConfig) -> MockLlmClient {
    config
        .mock_replies
        .iter()
        .fold(MockLlmClient::new(), |client, (query, reply)| {
            client.with_reply(query.clone(), reply.clone())
        })
}

#[cfg(feature = "http-client")]
fn live_client(config: &RouterConfig, api_key: &str) -> Result<DynLlmClient> {
    crate::utils::ConfigValidator::validate_api_key(api_key)?;
    let client: DynLlmClient = Arc::new(crate::llm::GeminiClient::new(
        api_key,
        config.model.as_str(),
    )?);
    Ok(client)
}

#[cfg(not(feature = "http-client"))]
fn live_client(_config: &RouterConfig, _api_key: &str) -> Result<DynLlmClient> {
    Err(RouterError::Config(
        "live mode needs the `http-client` feature; rebuild with `--features http-client` or use --mock"
            .into(),
    ))
}

pub fn build_llm(config: &RouterConfig, mode: &DemoMode) -> Result<DynLlmClient> {
    match mode {
        DemoMode::Mock(_) => {
            let client: DynLlmClient = Arc::new(mock_client(config));
            Ok(client)
        }
        DemoMode::Live { api_key } => live_client(config, api_key),
    }
}

pub fn build_router(
    config: &RouterConfig,
    llm: DynLlmClient,
    factories: &ToolFactoryRegistry,
) -> Result<ConversationRouter> {
    let tools = config.build_tools(factories)?;
    let mut router =
        ConversationRouter::with_registry(llm, tools).with_temperature(config.temperature);
    if let Some(prompt) = &config.system_prompt {
        router = router.with_system_prompt(prompt.clone());
    }
    Ok(router)
}

pub struct DemoDriver<W: Write> {
    router: ConversationRouter,
    mode: DemoMode,
    out: W,
}

impl<W: Write> DemoDriver<W> {
    pub fn new(router: ConversationRouter, mode: DemoMode, out: W) -> Self {
        Self { router, mode, out }
    }

    pub fn into_writer(self) -> W {
        self.out
    }

    pub async fn run<S: AsRef<str>>(&mut self, queries: &[S]) -> Result<Vec<DemoOutcome>> {
        self.banner()?;

        let mut outcomes = Vec::with_capacity(queries.len());
        for (i, query) in queries.iter().enumerate() {
            let outcome = self.run_one(i + 1, query.as_ref()).await?;
            outcomes.push(outcome);
        }

        let failed = outcomes.iter().filter(|o| !o.is_ok()).count();
        info!(total = outcomes.len(), failed, "demo finished");
        Ok(outcomes)
    }

    fn banner(&mut self) -> Result<()> {
        writeln!(self.out, "🚀 Tool Router Demo").map_err(io_error)?;
        writeln!(self.out, "{}", "=".repeat(RULE_WIDTH)).map_err(io_error)?;
        match &self.mode {
            DemoMode::Mock(reason) => {
                if *reason == MockReason::NoApiKey {
                    writeln!(self.out, "{}", NO_API_KEY_NOTICE).map_err(io_error)?;
                }
                writeln!(self.out, "⚠️  Running mock demo mode...").map_err(io_error)
            }
            DemoMode::Live { .. } => {
                writeln!(self.out, "\n🎯 Running demo queries...").map_err(io_error)
            }
        }
    }

    async fn run_one(&mut self, index: usize, query: &str) -> Result<DemoOutcome> {
        let header = match self.mode {
            DemoMode::Mock(_) => "Mock Demo",
            DemoMode::Live { .. } => "Demo",
        };
        writeln!(self.out, "\n--- {} {} ---", header, index).map_err(io_error)?;
        writeln!(self.out, "Query: {}", query).map_err(io_error)?;

        let decision = self.router.decide(query);
        let result = match self.router.dispatch(query, &decision).await {
            Ok(response) => {
                writeln!(self.out, "Response: {}", response).map_err(io_error)?;
                Ok(response)
            }
            Err(err) => {
                warn!(%err, query, "query failed");
                writeln!(self.out, "Error: {}", err).map_err(io_error)?;
                Err(err.to_string())
            }
        };

        Ok(DemoOutcome {
            query: query.to_string(),
            decision,
            result,
        })
    }
}

fn io_error(err: std::io::Error) -> RouterError {
    RouterError::Other(err.into())
}
