use crate::config::ScreenshotConfig;
use crate::models::visual_item::{validate_items, VisualItem};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use tokio::fs;

/// 组件清单
///
/// ```toml
/// [config]
/// path = "../screenshot-test"
/// batch_size = 5
///
/// [[items]]
/// id = "t1"
/// title = "It is a text"
/// render = { html = "<p>Hey there</p>" }
///
/// [items.overrides]
/// max_width = 300
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    #[serde(default)]
    pub config: ScreenshotConfig,
    #[serde(default)]
    pub items: Vec<VisualItem>,
}

/// 解析清单内容并校验组件列表
pub fn parse_manifest(content: &str) -> Result<Manifest> {
    let manifest: Manifest = toml::from_str(content).context("无法解析组件清单")?;
    validate_items(&manifest.items)?;
    Ok(manifest)
}

/// 从 TOML 文件加载组件清单
pub async fn load_manifest(manifest_path: &Path) -> Result<Manifest> {
    let content = fs::read_to_string(manifest_path)
        .await
        .with_context(|| format!("无法读取清单文件: {}", manifest_path.display()))?;

    let manifest = parse_manifest(&content)
        .with_context(|| format!("清单文件无效: {}", manifest_path.display()))?;

    tracing::info!(
        "成功加载 {} 个组件: {}",
        manifest.items.len(),
        manifest_path.file_name().unwrap_or_default().to_string_lossy()
    );

    Ok(manifest)
}
