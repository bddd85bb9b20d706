use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use tracing::debug;

use crate::error::{PipelineError, PipelineResult};
use crate::infrastructure::capture::{ByteSource, ImageLocator};

/// 从本地文件读取截图
#[derive(Debug, Clone, Default)]
pub struct FsByteSource;

impl FsByteSource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ByteSource for FsByteSource {
    async fn read_all(&self, locator: &ImageLocator) -> PipelineResult<String> {
        let bytes = tokio::fs::read(locator.path())
            .await
            .map_err(|source| PipelineError::Read {
                path: locator.to_string(),
                source,
            })?;

        debug!("读取截图 {} ({} 字节)", locator, bytes.len());

        Ok(STANDARD.encode(bytes))
    }
}
