//! 批次内并发截图 - 编排层
//!
//! 为批次内每个组件启动一个任务（截图 → 读取 → 上传），
//! 等待全部任务结束后才给出批次结果。任何一个组件失败，整批失败。

use futures::future::join_all;
use std::sync::Arc;
use tracing::{debug, error, warn};

use crate::config::RunConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::models::batch::Batch;
use crate::models::visual_item::VisualItem;
use crate::workflow::{ItemCtx, ItemFlow};

pub struct CaptureOrchestrator {
    flow: ItemFlow,
}

impl CaptureOrchestrator {
    pub fn new(flow: ItemFlow) -> Self {
        Self { flow }
    }

    /// 处理一个批次
    ///
    /// `items` 是完整列表，`batch` 指定本批范围。
    /// 返回批次内下标最小的那个失败。
    pub async fn process_batch(
        &self,
        items: &[VisualItem],
        batch: Batch,
        config: &RunConfig,
    ) -> PipelineResult<()> {
        let total = items.len();
        let config = Arc::new(config.clone());

        // 为本批创建并发任务
        let handles: Vec<_> = batch
            .slice(items)
            .iter()
            .enumerate()
            .map(|(offset, item)| {
                let flow = self.flow.clone();
                let config = Arc::clone(&config);
                let item = item.clone();
                let ctx = ItemCtx::new(item.id.clone(), batch.start + offset, total);
                tokio::spawn(async move { flow.run(&item, &ctx, &config).await })
            })
            .collect();

        // 等待本批所有任务完成
        let results = join_all(handles).await;

        let mut first_failure: Option<PipelineError> = None;
        let mut failed = 0;
        for (item, joined) in batch.slice(items).iter().zip(results) {
            let outcome = joined.unwrap_or_else(|e| {
                error!("[组件 #{}] 任务执行失败: {}", item.id, e);
                Err(PipelineError::Task {
                    reason: format!("组件 {}: {}", item.id, e),
                })
            });

            if let Err(e) = outcome {
                failed += 1;
                first_failure.get_or_insert(e);
            }
        }

        match first_failure {
            Some(e) => {
                warn!("批次 {} 中有 {}/{} 个组件失败", batch, failed, batch.len());
                Err(e)
            }
            None => {
                debug!("批次 {} 全部 {} 个组件上传成功", batch, batch.len());
                Ok(())
            }
        }
    }
}
