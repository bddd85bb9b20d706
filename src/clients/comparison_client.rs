/// 对比服务 HTTP 客户端
///
/// 封装所有与对比服务相关的调用逻辑
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

use crate::clients::{ReportGenerator, ReportRequest, ReportStatus, UploadClient, UploadRequest};
use crate::error::{PipelineError, PipelineResult};
use crate::models::metadata::ReportMetadata;

const UPLOAD_ROUTE: &str = "add_screenshot";
const REPORT_ROUTE: &str = "generate_html";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct UploadBody<'a> {
    image_data: &'a str,
    id: &'a str,
    path: &'a str,
    #[serde(rename = "showDiffInGrayScale")]
    show_diff_in_gray_scale: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ReportBody<'a> {
    path: &'a str,
    #[serde(rename = "metaData")]
    meta_data: &'a ReportMetadata,
    max_width: u32,
    background_color: &'a str,
}

#[derive(Debug, Deserialize)]
struct ReportResponse {
    status: ReportStatus,
}

/// 对比服务客户端
///
/// 内部的 `reqwest::Client` 可以廉价克隆，批次内并发上传共用同一个连接池
#[derive(Debug, Clone)]
pub struct ComparisonClient {
    http: reqwest::Client,
}

impl ComparisonClient {
    /// 创建新的客户端，超时交给 reqwest 处理
    pub fn new(timeout: Duration) -> reqwest::Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { http })
    }

    /// 使用已有的 reqwest 客户端
    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }
}

#[async_trait]
impl UploadClient for ComparisonClient {
    async fn upload(&self, request: UploadRequest<'_>) -> PipelineResult<()> {
        let url = request.endpoint.url(UPLOAD_ROUTE);
        debug!(
            "上传截图: 组件 {} -> {} ({} 字节 base64)",
            request.item_id,
            url,
            request.image_base64.len()
        );

        let body = UploadBody {
            image_data: request.image_base64,
            id: request.item_id,
            path: request.destination_path,
            show_diff_in_gray_scale: request.grayscale,
        };

        let upload_failed = |status: String| PipelineError::Upload {
            item_id: request.item_id.to_string(),
            status,
        };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::from_transport(request.endpoint.to_string(), e, upload_failed))?;

        let status = response.status();
        if !status.is_success() {
            warn!("上传截图失败: 组件 {} 返回 {}", request.item_id, status);
            return Err(upload_failed(status.to_string()));
        }

        Ok(())
    }
}

#[async_trait]
impl ReportGenerator for ComparisonClient {
    async fn regenerate(&self, request: ReportRequest<'_>) -> PipelineResult<ReportStatus> {
        let url = request.endpoint.url(REPORT_ROUTE);
        debug!(
            "请求生成报告: {} 个组件 -> {}",
            request.metadata.components.len(),
            url
        );

        let body = ReportBody {
            path: request.destination_path,
            meta_data: request.metadata,
            max_width: request.default_max_width,
            background_color: request.default_background_color,
        };

        let report_failed = |reason: String| PipelineError::Report { reason };

        let response = self
            .http
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| PipelineError::from_transport(request.endpoint.to_string(), e, report_failed))?;

        let status = response.status();
        if !status.is_success() {
            return Err(report_failed(format!("对比服务返回 {}", status)));
        }

        let parsed: ReportResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::from_transport(request.endpoint.to_string(), e, report_failed))?;

        debug!("报告生成结果: {:?}", parsed.status);
        Ok(parsed.status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::ServiceEndpoint;
    use crate::config::RunConfig;
    use crate::models::visual_item::{RenderSource, VisualItem};
    use mockito::Matcher;
    use serde_json::json;

    fn client() -> ComparisonClient {
        ComparisonClient::new(Duration::from_secs(5)).unwrap()
    }

    fn endpoint_of(server: &mockito::ServerGuard) -> ServiceEndpoint {
        let addr = server.socket_address();
        ServiceEndpoint::new(format!("http://{}", addr.ip()), addr.port())
    }

    /// 找一个当前没有监听的端口
    fn closed_endpoint() -> ServiceEndpoint {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        ServiceEndpoint::new("http://127.0.0.1", port)
    }

    fn metadata() -> ReportMetadata {
        let items = vec![
            VisualItem::new("t1", "It is a text", RenderSource::Html("<p>Hey</p>".into())),
            VisualItem::new("t2", "Box", RenderSource::Html("<div></div>".into())),
        ];
        ReportMetadata::from_items(&items, &RunConfig::default())
    }

    #[tokio::test]
    async fn test_upload_sends_expected_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/add_screenshot")
            .match_body(Matcher::Json(json!({
                "imageData": "iVBORw==",
                "id": "t1",
                "path": "../screenshot-test",
                "showDiffInGrayScale": true
            })))
            .with_status(200)
            .with_body("{}")
            .create_async()
            .await;

        let endpoint = endpoint_of(&server);
        let result = client()
            .upload(UploadRequest {
                image_base64: "iVBORw==",
                item_id: "t1",
                destination_path: "../screenshot-test",
                endpoint: &endpoint,
                grayscale: true,
            })
            .await;

        tokio_test::assert_ok!(result);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upload_non_success_status_is_upload_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/add_screenshot")
            .with_status(500)
            .create_async()
            .await;

        let endpoint = endpoint_of(&server);
        let err = client()
            .upload(UploadRequest {
                image_base64: "",
                item_id: "t1",
                destination_path: "out",
                endpoint: &endpoint,
                grayscale: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Upload { ref item_id, .. } if item_id == "t1"));
    }

    #[tokio::test]
    async fn test_upload_connection_refused_is_network_error() {
        let endpoint = closed_endpoint();
        let err = client()
            .upload(UploadRequest {
                image_base64: "",
                item_id: "t1",
                destination_path: "out",
                endpoint: &endpoint,
                grayscale: false,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Network { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_regenerate_sends_full_metadata_and_parses_status() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/generate_html")
            .match_body(Matcher::PartialJson(json!({
                "path": "../screenshot-test",
                "maxWidth": 500,
                "backgroundColor": "transparent",
                "metaData": {
                    "port": "8080",
                    "components": [
                        {"id": "t1", "title": "It is a text", "description": "", "maxWidth": 0, "backgroundColor": ""},
                        {"id": "t2", "title": "Box", "description": "", "maxWidth": 0, "backgroundColor": ""}
                    ]
                }
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"status":"success"}"#)
            .expect(2)
            .create_async()
            .await;

        let endpoint = endpoint_of(&server);
        let metadata = metadata();
        let request = ReportRequest {
            destination_path: "../screenshot-test",
            metadata: &metadata,
            endpoint: &endpoint,
            default_max_width: 500,
            default_background_color: "transparent",
        };

        // 同样的请求发两次，结果一致
        let client = client();
        assert_eq!(client.regenerate(request.clone()).await.unwrap(), ReportStatus::Success);
        assert_eq!(client.regenerate(request).await.unwrap(), ReportStatus::Success);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_regenerate_reports_failure_status() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/generate_html")
            .with_status(200)
            .with_body(r#"{"status":"failure"}"#)
            .create_async()
            .await;

        let endpoint = endpoint_of(&server);
        let metadata = metadata();
        let client = ComparisonClient::with_client(reqwest::Client::new());
        let status = client
            .regenerate(ReportRequest {
                destination_path: "out",
                metadata: &metadata,
                endpoint: &endpoint,
                default_max_width: 500,
                default_background_color: "transparent",
            })
            .await
            .unwrap();

        assert_eq!(status, ReportStatus::Failure);
    }

    #[tokio::test]
    async fn test_regenerate_unreadable_body_is_report_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/generate_html")
            .with_status(200)
            .with_body("not json")
            .create_async()
            .await;

        let endpoint = endpoint_of(&server);
        let metadata = metadata();
        let err = client()
            .regenerate(ReportRequest {
                destination_path: "out",
                metadata: &metadata,
                endpoint: &endpoint,
                default_max_width: 500,
                default_background_color: "transparent",
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PipelineError::Report { .. }), "{:?}", err);
    }

    #[tokio::test]
    async fn test_regenerate_connection_refused_is_network_error() {
        let endpoint = closed_endpoint();
        let metadata = metadata();
        let err = client()
            .regenerate(ReportRequest {
                destination_path: "out",
                metadata: &metadata,
                endpoint: &endpoint,
                default_max_width: 500,
                default_background_color: "transparent",
            })
            .await
            .unwrap_err();

        assert_eq!(err.kind(), crate::error::FailureKind::ServiceUnreachable);
    }
}
