use async_trait::async_trait;

use crate::error::Result;
use crate::tools::manifest::ToolManifest;

#[async_trait]
pub trait Tool: Send + Sync {
    fn manifest(&self) -> &ToolManifest;

    fn name(&self) -> &str {
        &self.manifest().name
    }

    async fn invoke(&self, query: &str) -> Result<String>;
}
