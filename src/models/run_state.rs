//! 运行状态
//!
//! `RunState` 只由状态机（以及它驱动的批次调度器）在批次汇合点之后修改，
//! 并发的组件任务从不接触它。界面通过 `ProgressSnapshot` 只读地观察进度。

use crate::error::{FailureKind, PipelineError};
use crate::models::batch::Batch;

/// 失败原因
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureReason {
    pub kind: FailureKind,
    pub message: String,
}

impl From<&PipelineError> for FailureReason {
    fn from(err: &PipelineError) -> Self {
        Self {
            kind: err.kind(),
            message: err.to_string(),
        }
    }
}

/// 运行阶段
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Capturing,
    Succeeded,
    Failed(FailureReason),
}

impl Phase {
    pub fn is_capturing(&self) -> bool {
        matches!(self, Phase::Capturing)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::Succeeded | Phase::Failed(_))
    }
}

/// 运行状态
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunState {
    offset: usize,
    phase: Phase,
    last_attempted_batch: Option<Batch>,
}

impl Default for RunState {
    fn default() -> Self {
        Self::new()
    }
}

impl RunState {
    pub fn new() -> Self {
        Self {
            offset: 0,
            phase: Phase::Idle,
            last_attempted_batch: None,
        }
    }

    /// 第一个尚未成功处理的组件下标，也是失败后的续跑点
    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn phase(&self) -> &Phase {
        &self.phase
    }

    pub fn last_attempted_batch(&self) -> Option<Batch> {
        self.last_attempted_batch
    }

    // ========== 状态迁移（仅限 crate 内部） ==========

    pub(crate) fn begin(&mut self) {
        self.phase = Phase::Capturing;
    }

    pub(crate) fn record_attempt(&mut self, batch: Batch) {
        self.last_attempted_batch = Some(batch);
    }

    /// 批次完全成功后推进偏移
    pub(crate) fn advance(&mut self, batch: Batch) {
        debug_assert_eq!(batch.start, self.offset);
        self.offset = batch.end;
    }

    pub(crate) fn succeed(&mut self) {
        self.phase = Phase::Succeeded;
    }

    pub(crate) fn fail(&mut self, reason: FailureReason) {
        self.phase = Phase::Failed(reason);
    }

    /// 关闭结果弹窗，采集中不允许关闭
    ///
    /// 返回状态是否发生变化
    pub(crate) fn dismiss(&mut self) -> bool {
        if self.phase.is_terminal() {
            self.phase = Phase::Idle;
            true
        } else {
            false
        }
    }

    /// 偏移归零，采集中不允许
    pub(crate) fn reset(&mut self) -> bool {
        if self.phase.is_capturing() {
            return false;
        }
        *self = Self::new();
        true
    }

    pub(crate) fn rewind(&mut self) {
        self.offset = 0;
        self.last_attempted_batch = None;
    }
}

/// 提供给界面的只读进度快照
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub phase: Phase,
    pub offset: usize,
    pub batch_size: usize,
    pub total: usize,
}

impl ProgressSnapshot {
    pub fn new(state: &RunState, batch_size: usize, total: usize) -> Self {
        Self {
            phase: state.phase().clone(),
            offset: state.offset(),
            batch_size,
            total,
        }
    }
}
