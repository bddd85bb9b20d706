//! 组件处理流程 - 流程层
//!
//! 核心职责：定义"一个组件"的完整处理流程
//!
//! 流程顺序：
//! 1. 合并配置
//! 2. 截图
//! 3. 读取截图（base64）
//! 4. 上传到对比服务

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::clients::{ServiceEndpoint, UploadClient, UploadRequest};
use crate::config::RunConfig;
use crate::error::PipelineResult;
use crate::infrastructure::{ByteSource, CapturePrimitive};
use crate::models::visual_item::VisualItem;
use crate::services::config_resolver;
use crate::workflow::item_ctx::ItemCtx;

/// 组件处理流程
///
/// - 不持有运行状态，只依赖三个能力
/// - 可以廉价克隆后移入并发任务
#[derive(Clone)]
pub struct ItemFlow {
    capture: Arc<dyn CapturePrimitive>,
    bytes: Arc<dyn ByteSource>,
    uploader: Arc<dyn UploadClient>,
}

impl ItemFlow {
    pub fn new(
        capture: Arc<dyn CapturePrimitive>,
        bytes: Arc<dyn ByteSource>,
        uploader: Arc<dyn UploadClient>,
    ) -> Self {
        Self {
            capture,
            bytes,
            uploader,
        }
    }

    pub async fn run(&self, item: &VisualItem, ctx: &ItemCtx, config: &RunConfig) -> PipelineResult<()> {
        let settings = config_resolver::resolve(item, config);
        debug!("{} 生效配置: {:?}", ctx, settings);

        info!("{} 📸 正在截图: {}", ctx, item.title);
        let locator = self.capture.capture(item, &settings).await.map_err(|e| {
            warn!("{} ⚠️ 截图失败: {}", ctx, e);
            e
        })?;

        let data = self.bytes.read_all(&locator).await.map_err(|e| {
            warn!("{} ⚠️ 读取截图失败: {}", ctx, e);
            e
        })?;

        info!("{} 📤 正在上传截图...", ctx);
        let endpoint = ServiceEndpoint::from_config(config);
        self.uploader
            .upload(UploadRequest {
                image_base64: &data,
                item_id: &item.id,
                destination_path: &config.destination_path,
                endpoint: &endpoint,
                grayscale: settings.grayscale_diff,
            })
            .await
            .map_err(|e| {
                warn!("{} ⚠️ 上传失败: {}", ctx, e);
                e
            })?;

        info!("{} ✓ 上传完成", ctx);
        Ok(())
    }
}
