//! 截图与读取能力的抽象
//!
//! 流水线只依赖这两个 trait，具体实现（Chrome、文件系统）可以替换

use async_trait::async_trait;
use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::error::PipelineResult;
use crate::models::visual_item::VisualItem;
use crate::services::EffectiveItemSettings;

/// 截图结果所在位置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLocator(PathBuf);

impl ImageLocator {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self(path.into())
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}

impl Display for ImageLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// 截图能力：把组件渲染出来并保存为图片
#[async_trait]
pub trait CapturePrimitive: Send + Sync {
    async fn capture(
        &self,
        item: &VisualItem,
        settings: &EffectiveItemSettings,
    ) -> PipelineResult<ImageLocator>;
}

/// 读取能力：把截图读成 base64 字符串
#[async_trait]
pub trait ByteSource: Send + Sync {
    async fn read_all(&self, locator: &ImageLocator) -> PipelineResult<String>;
}
