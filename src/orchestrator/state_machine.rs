//! 运行状态机 - 编排层
//!
//! ```text
//! Idle --start--> Capturing --全部批次成功--> Succeeded
//!                     |
//!                     +------批次失败-------> Failed(reason)
//!
//! Succeeded / Failed --dismiss--> Idle      （Capturing 时 dismiss 无效）
//! Failed --start--> Capturing               （从保留的偏移续跑）
//! ```
//!
//! 状态机独占 `RunState`，界面只能通过 `subscribe()` 拿到只读快照。

use tokio::sync::watch;
use tracing::{error, info, warn};

use crate::config::RunConfig;
use crate::error::ConfigError;
use crate::models::dialog::Dialog;
use crate::models::run_state::{FailureReason, Phase, ProgressSnapshot, RunState};
use crate::models::visual_item::{validate_items, VisualItem};
use crate::orchestrator::batch_scheduler::BatchScheduler;
use crate::utils::logging;

pub struct RunStateMachine {
    scheduler: BatchScheduler,
    items: Vec<VisualItem>,
    config: RunConfig,
    state: RunState,
    progress: watch::Sender<ProgressSnapshot>,
}

impl RunStateMachine {
    pub fn new(
        scheduler: BatchScheduler,
        items: Vec<VisualItem>,
        config: RunConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        validate_items(&items)?;
        let state = RunState::new();
        let (progress, _) = watch::channel(ProgressSnapshot::new(&state, config.batch_size, items.len()));
        Ok(Self {
            scheduler,
            items,
            config,
            state,
            progress,
        })
    }

    pub fn state(&self) -> &RunState {
        &self.state
    }

    pub fn phase(&self) -> &Phase {
        self.state.phase()
    }

    pub fn items(&self) -> &[VisualItem] {
        &self.items
    }

    pub fn config(&self) -> &RunConfig {
        &self.config
    }

    /// 订阅进度快照
    pub fn subscribe(&self) -> watch::Receiver<ProgressSnapshot> {
        self.progress.subscribe()
    }

    pub fn snapshot(&self) -> ProgressSnapshot {
        ProgressSnapshot::new(&self.state, self.config.batch_size, self.items.len())
    }

    /// 当前应展示的弹窗
    pub fn dialog(&self) -> Option<Dialog> {
        Dialog::for_phase(self.state.phase(), &self.config)
    }

    /// 开始或续跑
    ///
    /// - 失败后再次 start：从保留的偏移续跑
    /// - 上一次已全部完成（偏移等于组件数）：偏移归零，重新处理全部组件
    pub async fn start(&mut self) -> &Phase {
        if self.state.phase().is_capturing() {
            warn!("⚠️ 正在截图中，忽略重复的开始请求");
            return self.state.phase();
        }

        let total = self.items.len();
        if total > 0 && self.state.offset() >= total {
            info!("🔁 上一次运行已完成，从头重新截图");
            self.state.rewind();
        }

        self.state.begin();
        self.publish();
        logging::log_run_start(total, self.config.batch_size, self.state.offset());

        let items = &self.items;
        let config = &self.config;
        let progress = &self.progress;
        let result = self
            .scheduler
            .run_to_completion(items, config, &mut self.state, |state| {
                progress.send_replace(ProgressSnapshot::new(state, config.batch_size, items.len()));
            })
            .await;

        match result {
            Ok(()) => self.state.succeed(),
            Err(e) => {
                error!("❌ 本次运行失败: {}", e);
                self.state.fail(FailureReason::from(&e));
            }
        }
        self.publish();
        logging::print_final_stats(self.state.phase(), self.state.offset(), total);

        self.state.phase()
    }

    /// 关闭结果弹窗，截图中无效
    pub fn dismiss(&mut self) -> bool {
        let changed = self.state.dismiss();
        if changed {
            self.publish();
        }
        changed
    }

    /// 偏移归零，截图中无效
    pub fn reset(&mut self) -> bool {
        let changed = self.state.reset();
        if changed {
            self.publish();
        }
        changed
    }

    /// 换一组组件开始全新的运行
    ///
    /// 截图中返回 `Ok(false)`；组件列表不合法时保留原列表和进度
    pub fn new_run(&mut self, items: Vec<VisualItem>) -> Result<bool, ConfigError> {
        if self.state.phase().is_capturing() {
            return Ok(false);
        }
        validate_items(&items)?;
        self.state.reset();
        self.items = items;
        self.publish();
        Ok(true)
    }

    fn publish(&self) {
        self.progress.send_replace(self.snapshot());
    }
}
