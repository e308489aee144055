use std::fs;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tempfile::tempdir;
use toolroute::config::DEFAULT_DEMO_QUERIES;
use toolroute::demo::NO_API_KEY_NOTICE;
use toolroute::{
    build_llm, build_router, ConversationRouter, DemoDriver, DemoMode, FnTool, LlmClient,
    LlmRequest, MockLlmClient, MockReason, RouteDecision, RouteSelector, RouterConfig,
    RouterError, Tool, ToolFactoryRegistry, ToolManifest,
};

#[tokio::test]
async fn mock_demo_routes_every_default_query() -> anyhow::Result<()> {
    let config = RouterConfig::default();
    let llm = build_llm(&config, &DemoMode::Mock(MockReason::NoApiKey))?;
    let router = build_router(&config, llm, &ToolFactoryRegistry::with_builtins())?;
    let mut driver = DemoDriver::new(router, DemoMode::Mock(MockReason::NoApiKey), Vec::new());

    let outcomes = driver.run(DEFAULT_DEMO_QUERIES).await?;
    let output = String::from_utf8(driver.into_writer())?;

    let responses: Vec<_> = outcomes
        .iter()
        .map(|o| o.result.clone().unwrap())
        .collect();
    assert_eq!(
        responses,
        vec![
            "☀️ Sunny, 28°C",
            "15",
            "Machine learning adoption is growing in 2025.",
            "I'm just a mock AI, but doing great!",
        ]
    );
    assert_eq!(outcomes[3].decision, RouteDecision::Fallback);
    assert!(output.contains("--- Mock Demo 2 ---\nQuery: Calculate 5 * 3\nResponse: 15"));
    assert!(output.contains(NO_API_KEY_NOTICE));
    assert!(output.contains("Running mock demo mode"));
    Ok(())
}

#[tokio::test]
async fn failing_query_is_reported_and_demo_continues() -> anyhow::Result<()> {
    let broken: Arc<dyn Tool> = Arc::new(FnTool::new(
        ToolManifest::builder("flaky").keyword("flaky").build(),
        |_| Err(RouterError::tool_failed("flaky", "boom")),
    ));
    let router = ConversationRouter::new(Arc::new(MockLlmClient::new()), vec![broken])?;
    let mut driver = DemoDriver::new(router, DemoMode::Mock(MockReason::NoApiKey), Vec::new());

    let outcomes = driver.run(&["flaky request", "hello"]).await?;
    let output = String::from_utf8(driver.into_writer())?;

    assert_eq!(outcomes.len(), 2);
    assert_eq!(outcomes[0].result, Err("tool `flaky` failed: boom".to_string()));
    assert!(outcomes[1].is_ok());
    assert!(output.contains("Error: tool `flaky` failed: boom"));
    assert!(output.contains("--- Mock Demo 2 ---"));
    Ok(())
}

#[tokio::test]
async fn config_file_drives_tools_and_mock_replies() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("router.json");
    fs::write(
        &path,
        r#"{
            "tools": [
                {"factory": "weather", "config": {"forecasts": {"Oslo": "❄️ Snow, -4°C"}}},
                {"factory": "calculator", "config": {"keywords": ["sum"]}}
            ],
            "mock_replies": {"Who are you?": "A router demo."},
            "demo_queries": ["weather in Oslo", "sum 2 + 2", "Calculate 5 * 3", "Who are you?"]
        }"#,
    )?;

    let config = RouterConfig::from_path(&path)?;
    let llm = build_llm(&config, &DemoMode::Mock(MockReason::NoApiKey))?;
    let router = build_router(&config, llm, &ToolFactoryRegistry::with_builtins())?;
    let mut driver = DemoDriver::new(router, DemoMode::Mock(MockReason::NoApiKey), Vec::new());
    let outcomes = driver.run(config.demo_queries.as_slice()).await?;

    let responses: Vec<_> = outcomes
        .iter()
        .map(|o| o.result.clone().unwrap())
        .collect();
    assert_eq!(
        responses,
        vec![
            "❄️ Snow, -4°C",
            "4",
            "I'm just a mock AI, but doing great!",
            "A router demo.",
        ]
    );
    Ok(())
}

#[test]
fn missing_config_file_is_a_config_error() {
    let dir = tempdir().unwrap();
    let err = RouterConfig::from_path(&dir.path().join("absent.json")).unwrap_err();
    assert!(matches!(err, RouterError::Config(_)));
}

#[tokio::test]
async fn mock_client_uses_configured_replies() -> anyhow::Result<()> {
    let mut config = RouterConfig::default();
    config
        .mock_replies
        .insert("ping".to_string(), "pong".to_string());
    let client: MockLlmClient = toolroute::demo::mock_client(&config);

    let reply = client.complete(LlmRequest::new("ping")).await?;
    assert_eq!(reply.content, "pong");
    assert_eq!(client.call_count(), 1);
    Ok(())
}

#[tokio::test]
async fn requested_mock_mode_skips_missing_key_notice() -> anyhow::Result<()> {
    let config = RouterConfig::default();
    let mode = DemoMode::Mock(MockReason::Requested);
    let llm = build_llm(&config, &mode)?;
    let router = build_router(&config, llm, &ToolFactoryRegistry::with_builtins())?;
    let mut driver = DemoDriver::new(router, mode, Vec::new());

    driver.run(&["Calculate 1 + 1"]).await?;
    let output = String::from_utf8(driver.into_writer())?;

    assert!(!output.contains(NO_API_KEY_NOTICE));
    assert!(output.contains("⚠️  Running mock demo mode..."));
    assert!(output.contains("--- Mock Demo 1 ---"));
    Ok(())
}

struct CountingSelector {
    calls: Arc<AtomicUsize>,
}

impl RouteSelector for CountingSelector {
    fn select(&self, query: &str, _tools: &toolroute::ToolRegistry) -> RouteDecision {
        // 每次调用给出不同结果，重复选择会让记录的路由与实际不符
        let n = self.calls.fetch_add(1, Ordering::SeqCst);
        if n % 2 == 0 && query.contains("calc") {
            RouteDecision::Tool("calculator".into())
        } else {
            RouteDecision::Fallback
        }
    }
}

#[tokio::test]
async fn selector_runs_once_per_query() -> anyhow::Result<()> {
    let calls = Arc::new(AtomicUsize::new(0));
    let config = RouterConfig::default();
    let router = build_router(
        &config,
        Arc::new(MockLlmClient::new()),
        &ToolFactoryRegistry::with_builtins(),
    )?
    .with_selector(CountingSelector {
        calls: Arc::clone(&calls),
    });
    let mut driver = DemoDriver::new(router, DemoMode::Mock(MockReason::Requested), Vec::new());

    let outcomes = driver.run(&["calc 2 * 21", "calc 1 + 1"]).await?;

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(outcomes[0].decision, RouteDecision::Tool("calculator".into()));
    assert_eq!(outcomes[0].result, Ok("42".to_string()));
    assert_eq!(outcomes[1].decision, RouteDecision::Fallback);
    assert_eq!(
        outcomes[1].result,
        Ok("I'm just a mock AI, but doing great!".to_string())
    );
    Ok(())
}
