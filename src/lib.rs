//! # Screenshot Compare
//!
//! 批量截图 → 上传 → 生成对比报告
//!
//! ## 架构设计
//!
//! ### ① 基础设施层（Infrastructure）
//! - `infrastructure/` - 持有稀缺资源（Browser），只暴露截图、读取能力
//! - `clients/` - 对比服务的上传、报告接口
//!
//! ### ② 业务能力层（Services）
//! - `services/` - 配置合并（组件覆盖项 > 运行配置 > 默认值）
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - 定义"一个组件"的完整处理流程（截图 → 读取 → 上传）
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/capture_orchestrator` - 批次内并发，等待全部完成
//! - `orchestrator/batch_scheduler` - 批次串行，每批后重新生成报告
//! - `orchestrator/state_machine` - 运行状态、续跑偏移、进度快照
//!
//! ## 模块结构

pub mod app;
pub mod browser;
pub mod clients;
pub mod config;
pub mod error;
pub mod infrastructure;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use app::App;
pub use clients::{ComparisonClient, ReportGenerator, ReportStatus, ServiceEndpoint, UploadClient};
pub use config::{Config, RunConfig, ScreenshotConfig};
pub use error::{AppError, FailureKind, PipelineError, PipelineResult};
pub use infrastructure::{ByteSource, CapturePrimitive, ChromeCapture, FsByteSource, ImageLocator};
pub use models::{Batch, Dialog, Phase, ProgressSnapshot, RunState, VisualItem};
pub use orchestrator::{BatchScheduler, CaptureOrchestrator, RunStateMachine};
pub use services::EffectiveItemSettings;
pub use workflow::{ItemCtx, ItemFlow};
