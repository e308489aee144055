use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::client::LlmClient;
use super::types::{LlmRequest, LlmResponse};
use crate::error::Result;

pub const DEFAULT_MOCK_REPLY: &str = "I'm just a mock AI, but doing great!";

/// 离线模式使用的模型客户端
///
/// 按完整查询返回预设回复，没有命中时返回默认回复，并记录收到的每个请求。
pub struct MockLlmClient {
    replies: HashMap<String, String>,
    default_reply: String,
    requests: Mutex<Vec<LlmRequest>>,
}

impl MockLlmClient {
    pub fn new() -> Self {
        Self {
            replies: HashMap::new(),
            default_reply: DEFAULT_MOCK_REPLY.to_string(),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_reply(mut self, query: impl Into<String>, reply: impl Into<String>) -> Self {
        self.replies.insert(query.into(), reply.into());
        self
    }

    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = reply.into();
        self
    }

    pub fn requests(&self) -> Vec<LlmRequest> {
        self.requests.lock().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().len()
    }
}

impl Default for MockLlmClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: LlmRequest) -> Result<LlmResponse> {
        let content = self
            .replies
            .get(request.user.trim())
            .cloned()
            .unwrap_or_else(|| self.default_reply.clone());
        self.requests.lock().push(request);
        Ok(LlmResponse::text(content))
    }
}
