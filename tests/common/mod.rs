//! 测试用的假截图器、假读取器、假对比服务
#![allow(dead_code)]

use async_trait::async_trait;
use screenshot_compare::clients::{
    ReportGenerator, ReportRequest, ReportStatus, UploadClient, UploadRequest,
};
use screenshot_compare::config::{RunConfig, ScreenshotConfig};
use screenshot_compare::error::{PipelineError, PipelineResult};
use screenshot_compare::infrastructure::{ByteSource, CapturePrimitive, ImageLocator};
use screenshot_compare::models::{RenderSource, VisualItem};
use screenshot_compare::orchestrator::{BatchScheduler, RunStateMachine};
use screenshot_compare::services::EffectiveItemSettings;
use screenshot_compare::workflow::ItemFlow;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Barrier;

/// 按发生顺序记录的调用
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    Captured(String),
    Read(String),
    Uploaded { id: String, grayscale: bool },
    Report { components: usize, path: String },
}

/// 注入到某个组件上的一次性故障
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Fault {
    Capture,
    Read,
    Network,
    Rejected,
}

/// 报告接口的脚本化返回
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportOutcome {
    Success,
    Failure,
    Network,
}

#[derive(Default)]
pub struct MockEnv {
    events: Mutex<Vec<Event>>,
    faults: Mutex<HashMap<String, Fault>>,
    reports: Mutex<VecDeque<ReportOutcome>>,
    barrier: Option<Arc<Barrier>>,
}

impl MockEnv {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 截图时在 barrier 上等待，只有批次内全部组件同时在途才能通过
    pub fn with_barrier(parties: usize) -> Arc<Self> {
        Arc::new(Self {
            barrier: Some(Arc::new(Barrier::new(parties))),
            ..Default::default()
        })
    }

    /// 组件下一次经过时触发故障，触发后自动清除
    pub fn fail_once(&self, id: &str, fault: Fault) {
        self.faults.lock().unwrap().insert(id.to_string(), fault);
    }

    /// 依次指定报告接口的返回，用完后一律成功
    pub fn script_reports(&self, outcomes: &[ReportOutcome]) {
        self.reports.lock().unwrap().extend(outcomes.iter().copied());
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear_events(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn captured_ids(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Captured(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn uploaded_ids(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Uploaded { id, .. } => Some(id),
                _ => None,
            })
            .collect()
    }

    pub fn report_count(&self) -> usize {
        self.events()
            .iter()
            .filter(|e| matches!(e, Event::Report { .. }))
            .count()
    }

    fn take_fault(&self, id: &str, kind: Fault) -> bool {
        let mut faults = self.faults.lock().unwrap();
        if faults.get(id) == Some(&kind) {
            faults.remove(id);
            true
        } else {
            false
        }
    }

    fn record(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }
}

#[async_trait]
impl CapturePrimitive for MockEnv {
    async fn capture(
        &self,
        item: &VisualItem,
        _settings: &EffectiveItemSettings,
    ) -> PipelineResult<ImageLocator> {
        if let Some(barrier) = &self.barrier {
            barrier.wait().await;
        }
        if self.take_fault(&item.id, Fault::Capture) {
            return Err(PipelineError::Capture {
                item_id: item.id.clone(),
                reason: "render failed".to_string(),
            });
        }
        self.record(Event::Captured(item.id.clone()));
        Ok(ImageLocator::new(format!("/captures/{}.png", item.id)))
    }
}

#[async_trait]
impl ByteSource for MockEnv {
    async fn read_all(&self, locator: &ImageLocator) -> PipelineResult<String> {
        let id = locator
            .path()
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        if self.take_fault(&id, Fault::Read) {
            return Err(PipelineError::Read {
                path: locator.to_string(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
            });
        }
        self.record(Event::Read(id.clone()));
        Ok(format!("base64-of-{}", id))
    }
}

#[async_trait]
impl UploadClient for MockEnv {
    async fn upload(&self, request: UploadRequest<'_>) -> PipelineResult<()> {
        // 让出一次，避免上传顺序和启动顺序完全一致
        tokio::task::yield_now().await;

        if self.take_fault(request.item_id, Fault::Network) {
            return Err(PipelineError::Network {
                endpoint: request.endpoint.to_string(),
                reason: "Network request failed".to_string(),
            });
        }
        if self.take_fault(request.item_id, Fault::Rejected) {
            return Err(PipelineError::Upload {
                item_id: request.item_id.to_string(),
                status: "500 Internal Server Error".to_string(),
            });
        }
        assert_eq!(request.image_base64, format!("base64-of-{}", request.item_id));
        self.record(Event::Uploaded {
            id: request.item_id.to_string(),
            grayscale: request.grayscale,
        });
        Ok(())
    }
}

#[async_trait]
impl ReportGenerator for MockEnv {
    async fn regenerate(&self, request: ReportRequest<'_>) -> PipelineResult<ReportStatus> {
        let outcome = self
            .reports
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(ReportOutcome::Success);

        match outcome {
            ReportOutcome::Network => Err(PipelineError::Network {
                endpoint: request.endpoint.to_string(),
                reason: "Network request failed".to_string(),
            }),
            ReportOutcome::Failure => {
                self.record(Event::Report {
                    components: request.metadata.components.len(),
                    path: request.destination_path.to_string(),
                });
                Ok(ReportStatus::Failure)
            }
            ReportOutcome::Success => {
                self.record(Event::Report {
                    components: request.metadata.components.len(),
                    path: request.destination_path.to_string(),
                });
                Ok(ReportStatus::Success)
            }
        }
    }
}

pub fn flow(env: &Arc<MockEnv>) -> ItemFlow {
    ItemFlow::new(env.clone(), env.clone(), env.clone())
}

pub fn scheduler(env: &Arc<MockEnv>) -> BatchScheduler {
    BatchScheduler::new(flow(env), env.clone())
}

pub fn machine(env: &Arc<MockEnv>, items: Vec<VisualItem>, batch_size: usize) -> RunStateMachine {
    RunStateMachine::new(scheduler(env), items, config(batch_size)).unwrap()
}

/// 组件 t1..tn
pub fn items(n: usize) -> Vec<VisualItem> {
    (1..=n)
        .map(|i| {
            VisualItem::new(
                format!("t{}", i),
                format!("Component {}", i),
                RenderSource::Html(format!("<p>{}</p>", i)),
            )
        })
        .collect()
}

pub fn ids(range: std::ops::RangeInclusive<usize>) -> Vec<String> {
    range.map(|i| format!("t{}", i)).collect()
}

pub fn config(batch_size: usize) -> RunConfig {
    ScreenshotConfig {
        path: Some("../screenshot-test".to_string()),
        batch_size: Some(batch_size),
        ..Default::default()
    }
    .resolve()
}

pub fn sorted(mut ids: Vec<String>) -> Vec<String> {
    ids.sort_by_key(|id| id[1..].parse::<usize>().unwrap_or(usize::MAX));
    ids
}
