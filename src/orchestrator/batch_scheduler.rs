//! 批次调度器 - 编排层
//!
//! ## 职责
//!
//! 把组件列表切成固定大小的批次，按顺序逐批执行：
//!
//! 1. 从当前偏移取出下一批
//! 2. 批次内并发截图上传（委托 `CaptureOrchestrator`）
//! 3. 基于全部组件重新生成报告
//! 4. 三步都成功才推进偏移，否则停下并保留偏移供续跑
//!
//! 批次之间严格串行，下一批总在上一批报告生成之后才开始。

use std::sync::Arc;
use tracing::{error, info};

use crate::clients::{ReportGenerator, ReportRequest, ReportStatus, ServiceEndpoint};
use crate::config::RunConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::models::batch::Batch;
use crate::models::metadata::ReportMetadata;
use crate::models::run_state::RunState;
use crate::models::visual_item::{validate_items, VisualItem};
use crate::orchestrator::capture_orchestrator::CaptureOrchestrator;
use crate::utils::logging;
use crate::workflow::ItemFlow;

pub struct BatchScheduler {
    orchestrator: CaptureOrchestrator,
    reporter: Arc<dyn ReportGenerator>,
}

impl BatchScheduler {
    pub fn new(flow: ItemFlow, reporter: Arc<dyn ReportGenerator>) -> Self {
        Self {
            orchestrator: CaptureOrchestrator::new(flow),
            reporter,
        }
    }

    /// 当前偏移处的下一批，偏移已到末尾时返回 `None`
    pub fn next_batch(total: usize, batch_size: usize, state: &RunState) -> Option<Batch> {
        let start = state.offset();
        if start >= total {
            return None;
        }
        let end = start.saturating_add(batch_size.max(1)).min(total);
        Some(Batch::new(start, end))
    }

    /// 从 0 开始的完整切分
    pub fn batches(total: usize, batch_size: usize) -> Vec<Batch> {
        let size = batch_size.max(1);
        (0..total)
            .step_by(size)
            .map(|start| Batch::new(start, (start + size).min(total)))
            .collect()
    }

    pub fn total_batches(total: usize, batch_size: usize) -> usize {
        total.div_ceil(batch_size.max(1))
    }

    /// 从 `state` 的偏移开始逐批执行到结束或第一次失败
    ///
    /// 每个批次成功后推进偏移并回调 `on_progress`；失败时偏移保持不变。
    /// 配置或组件列表不合法时返回 `PipelineError::Config`，不发起任何调用
    pub async fn run_to_completion<F>(
        &self,
        items: &[VisualItem],
        config: &RunConfig,
        state: &mut RunState,
        mut on_progress: F,
    ) -> PipelineResult<()>
    where
        F: FnMut(&RunState),
    {
        config.validate()?;
        validate_items(items)?;

        let total = items.len();
        if total == 0 {
            info!("组件列表为空，无需截图");
            return Ok(());
        }

        let total_batches = Self::total_batches(total, config.batch_size);

        while let Some(batch) = Self::next_batch(total, config.batch_size, state) {
            let batch_num = batch.number(config.batch_size);
            state.record_attempt(batch);
            logging::log_batch_start(batch_num, total_batches, batch.start + 1, batch.end, total);

            let outcome = match self.orchestrator.process_batch(items, batch, config).await {
                Ok(()) => self.regenerate_report(items, config).await,
                Err(e) => Err(e),
            };

            if let Err(e) = outcome {
                error!("❌ 第 {} 批失败，偏移保持在 {}: {}", batch_num, state.offset(), e);
                return Err(e);
            }

            state.advance(batch);
            logging::log_batch_complete(batch_num, batch.len(), state.offset(), total);
            on_progress(state);
        }

        Ok(())
    }

    /// 基于全部组件重新生成报告
    async fn regenerate_report(&self, items: &[VisualItem], config: &RunConfig) -> PipelineResult<()> {
        let metadata = ReportMetadata::from_items(items, config);
        let endpoint = ServiceEndpoint::from_config(config);

        info!("📝 正在重新生成报告 ({} 个组件)...", metadata.components.len());
        let status = self
            .reporter
            .regenerate(ReportRequest {
                destination_path: &config.destination_path,
                metadata: &metadata,
                endpoint: &endpoint,
                default_max_width: config.max_width,
                default_background_color: &config.background_color,
            })
            .await?;

        match status {
            ReportStatus::Success => Ok(()),
            ReportStatus::Failure => Err(PipelineError::Report {
                reason: "对比服务返回 failure".to_string(),
            }),
        }
    }
}
