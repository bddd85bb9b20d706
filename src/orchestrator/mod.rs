//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层负责批次调度和运行状态，是整个系统的"指挥中心"。
//!
//! ## 模块划分
//!
//! ### `state_machine` - 运行状态机
//! - 独占运行状态（偏移、阶段、最近一次尝试的批次）
//! - 处理开始 / 续跑 / 关闭 / 重置
//! - 向界面发布只读的进度快照
//!
//! ### `batch_scheduler` - 批次调度器
//! - 按偏移切出下一批
//! - 批次串行执行，每批之后重新生成报告
//! - 只有整批成功才推进偏移
//!
//! ### `capture_orchestrator` - 批次内并发
//! - 为批次内每个组件启动任务
//! - 等待全部任务结束，汇总为一个批次结果
//!
//! ## 层次关系
//!
//! ```text
//! state_machine (RunState)
//!     ↓
//! batch_scheduler (Vec<VisualItem> → Batch)
//!     ↓
//! capture_orchestrator (Batch → 并发任务)
//!     ↓
//! workflow::ItemFlow (处理单个组件)
//!     ↓
//! infrastructure / clients (截图、读取、上传、报告)
//! ```

pub mod batch_scheduler;
pub mod capture_orchestrator;
pub mod state_machine;

// 重新导出主要类型
pub use batch_scheduler::BatchScheduler;
pub use capture_orchestrator::CaptureOrchestrator;
pub use state_machine::RunStateMachine;
