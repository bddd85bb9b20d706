//! 对比服务客户端
//!
//! 对比服务负责保存截图、做图片对比、生成 test.html。
//! 流水线只通过 `UploadClient` 和 `ReportGenerator` 两个边界与它交互。

pub mod comparison_client;

use async_trait::async_trait;
use serde::Deserialize;
use std::fmt::Display;

use crate::config::RunConfig;
use crate::error::PipelineResult;
use crate::models::metadata::ReportMetadata;

pub use comparison_client::ComparisonClient;

/// 对比服务地址
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoint {
    /// 带协议的主机，如 `http://127.0.0.1`
    pub host: String,
    pub port: u16,
}

impl ServiceEndpoint {
    pub fn new(host: impl Into<String>, port: u16) -> Self {
        Self {
            host: host.into(),
            port,
        }
    }

    pub fn from_config(config: &RunConfig) -> Self {
        Self::new(config.service_host.clone(), config.service_port)
    }

    pub fn url(&self, route: &str) -> String {
        format!(
            "{}:{}/{}",
            self.host.trim_end_matches('/'),
            self.port,
            route.trim_start_matches('/')
        )
    }
}

impl Display for ServiceEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.host.trim_end_matches('/'), self.port)
    }
}

/// 单个组件的上传请求
#[derive(Debug, Clone)]
pub struct UploadRequest<'a> {
    pub image_base64: &'a str,
    pub item_id: &'a str,
    pub destination_path: &'a str,
    pub endpoint: &'a ServiceEndpoint,
    pub grayscale: bool,
}

/// 报告生成请求，元数据总是覆盖全部组件
#[derive(Debug, Clone)]
pub struct ReportRequest<'a> {
    pub destination_path: &'a str,
    pub metadata: &'a ReportMetadata,
    pub endpoint: &'a ServiceEndpoint,
    pub default_max_width: u32,
    pub default_background_color: &'a str,
}

/// 对比服务返回的报告状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportStatus {
    Success,
    Failure,
}

/// 上传能力
#[async_trait]
pub trait UploadClient: Send + Sync {
    /// 同一个 id 重复上传由服务端覆盖
    async fn upload(&self, request: UploadRequest<'_>) -> PipelineResult<()>;
}

/// 报告生成能力，必须幂等
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    async fn regenerate(&self, request: ReportRequest<'_>) -> PipelineResult<ReportStatus>;
}
