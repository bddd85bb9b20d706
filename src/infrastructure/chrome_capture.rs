//! Chrome 截图器 - 基础设施层
//!
//! 持有唯一的 Browser 资源。每个组件单独开一个页面，
//! 同一批次内的并发截图互不干扰。

use async_trait::async_trait;
use chromiumoxide::cdp::browser_protocol::page::{CaptureScreenshotFormat, Viewport};
use chromiumoxide::layout::BoundingBox;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::{ScreenshotParams, ScreenshotParamsBuilder};
use chromiumoxide::{Browser, Page};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{PipelineError, PipelineResult};
use crate::infrastructure::capture::{CapturePrimitive, ImageLocator};
use crate::models::visual_item::{RenderSource, VisualItem};
use crate::services::EffectiveItemSettings;

/// HTML 组件外层容器的 id，截图只截这个元素
const ROOT_ID: &str = "screenshot-root";

const TRANSPARENT: &str = "transparent";

/// 渲染阶段的失败
enum RenderError {
    Cdp(CdpError),
    /// 组件没有渲染出任何内容
    Empty,
}

impl From<CdpError> for RenderError {
    fn from(err: CdpError) -> Self {
        RenderError::Cdp(err)
    }
}

pub struct ChromeCapture {
    browser: Arc<Browser>,
    capture_dir: PathBuf,
}

impl ChromeCapture {
    pub fn new(browser: Arc<Browser>, capture_dir: impl Into<PathBuf>) -> Self {
        Self {
            browser,
            capture_dir: capture_dir.into(),
        }
    }

    async fn render_and_save(
        &self,
        page: &Page,
        item: &VisualItem,
        settings: &EffectiveItemSettings,
        output: &Path,
    ) -> Result<(), RenderError> {
        match &item.render {
            RenderSource::Html(html) => {
                page.set_content(wrap_html(html, settings)).await?;
                let bbox = page
                    .find_element(format!("#{}", ROOT_ID))
                    .await?
                    .bounding_box()
                    .await?;
                let clip = clip_region(&bbox).ok_or(RenderError::Empty)?;
                page.save_screenshot(screenshot_params(settings).clip(clip).build(), output)
                    .await?;
            }
            RenderSource::Url(url) => {
                page.goto(url.as_str()).await?;
                page.wait_for_navigation().await?;
                page.evaluate(style_script(settings)).await?;
                page.save_screenshot(screenshot_params(settings).full_page(true).build(), output)
                    .await?;
            }
        }
        Ok(())
    }
}

#[async_trait]
impl CapturePrimitive for ChromeCapture {
    async fn capture(
        &self,
        item: &VisualItem,
        settings: &EffectiveItemSettings,
    ) -> PipelineResult<ImageLocator> {
        let capture_failed = |reason: String| PipelineError::Capture {
            item_id: item.id.clone(),
            reason,
        };

        tokio::fs::create_dir_all(&self.capture_dir)
            .await
            .map_err(|e| capture_failed(format!("无法创建截图目录: {}", e)))?;

        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| capture_failed(format!("创建页面失败: {}", e)))?;

        let output = self
            .capture_dir
            .join(capture_file_name(&item.id, &image_format(settings)));
        let result = self.render_and_save(&page, item, settings, &output).await;

        if let Err(e) = page.close().await {
            warn!("[组件 {}] 关闭页面失败: {}", item.id, e);
        }

        result.map_err(|e| match e {
            RenderError::Cdp(e) => capture_failed(e.to_string()),
            RenderError::Empty => capture_failed("组件渲染结果为空".to_string()),
        })?;
        debug!("[组件 {}] 截图已保存: {}", item.id, output.display());

        Ok(ImageLocator::new(output))
    }
}

/// 不透明背景且 quality < 1 时用 JPEG，否则用 PNG 保留透明通道
fn image_format(settings: &EffectiveItemSettings) -> CaptureScreenshotFormat {
    if settings.quality < 1.0 && settings.background_color != TRANSPARENT {
        CaptureScreenshotFormat::Jpeg
    } else {
        CaptureScreenshotFormat::Png
    }
}

fn screenshot_params(settings: &EffectiveItemSettings) -> ScreenshotParamsBuilder {
    let format = image_format(settings);
    let builder = ScreenshotParams::builder().format(format.clone());
    if format == CaptureScreenshotFormat::Jpeg {
        builder.quality((settings.quality * 100.0).round() as i64)
    } else {
        builder.omit_background(settings.background_color == TRANSPARENT)
    }
}

/// 元素的截图区域，宽或高为 0 时返回 `None`
fn clip_region(bbox: &BoundingBox) -> Option<Viewport> {
    if bbox.width <= 0.0 || bbox.height <= 0.0 {
        return None;
    }
    Some(Viewport {
        x: bbox.x,
        y: bbox.y,
        width: bbox.width,
        height: bbox.height,
        scale: 1.0,
    })
}

/// 把组件 HTML 包进带样式的容器
fn wrap_html(html: &str, settings: &EffectiveItemSettings) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
  <body style="margin:0">
    <div id="{}" style="display:inline-block;max-width:{}px;background-color:{}">{}</div>
  </body>
</html>"#,
        ROOT_ID, settings.max_width, settings.background_color, html
    )
}

/// URL 组件无法包裹，只能直接改 body 样式
fn style_script(settings: &EffectiveItemSettings) -> String {
    format!(
        "document.body.style.maxWidth = '{}px'; document.body.style.backgroundColor = {};",
        settings.max_width,
        serde_json::Value::String(settings.background_color.clone())
    )
}

/// 截图文件名，不同 id 一定得到不同文件名
fn capture_file_name(item_id: &str, format: &CaptureScreenshotFormat) -> String {
    let extension = match format {
        CaptureScreenshotFormat::Jpeg => "jpg",
        _ => "png",
    };
    format!("{}.{}", escape_file_name(item_id), extension)
}

/// 字母、数字和 `-` 原样保留，其余字节（包括 `_`）写成 `_XX`
fn escape_file_name(id: &str) -> String {
    let mut escaped = String::with_capacity(id.len());
    for c in id.chars() {
        if c.is_ascii_alphanumeric() || c == '-' {
            escaped.push(c);
        } else {
            let mut buf = [0u8; 4];
            for byte in c.encode_utf8(&mut buf).bytes() {
                escaped.push_str(&format!("_{:02X}", byte));
            }
        }
    }
    escaped
}
