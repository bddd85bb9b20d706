use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::config::{quality_in_range, QUALITY_EXPECTED};
use crate::error::ConfigError;

/// 组件的渲染来源，截图器据此把组件加载到页面中
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenderSource {
    /// 直接渲染的 HTML 片段
    Html(String),
    /// 打开一个 URL
    Url(String),
}

/// 单个组件的覆盖配置，未设置的字段回落到运行配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemOverrides {
    pub max_width: Option<u32>,
    pub background_color: Option<String>,
    pub grayscale_diff: Option<bool>,
    pub quality: Option<f32>,
}

/// 待截图的组件
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisualItem {
    /// 在整次运行中唯一且稳定，对比服务按它存放截图
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub render: RenderSource,
    #[serde(default)]
    pub overrides: ItemOverrides,
}

impl VisualItem {
    pub fn new(id: impl Into<String>, title: impl Into<String>, render: RenderSource) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            render,
            overrides: ItemOverrides::default(),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn overrides(mut self, overrides: ItemOverrides) -> Self {
        self.overrides = overrides;
        self
    }
}

/// 检查组件列表：ID 唯一，覆盖的 quality 落在 (0, 1]
pub fn validate_items(items: &[VisualItem]) -> Result<(), ConfigError> {
    let mut seen = HashSet::new();
    for item in items {
        if !seen.insert(item.id.as_str()) {
            return Err(ConfigError::DuplicateItemId { id: item.id.clone() });
        }
        if let Some(quality) = item.overrides.quality {
            if !quality_in_range(quality) {
                return Err(ConfigError::InvalidOverride {
                    id: item.id.clone(),
                    field: "quality",
                    value: quality.to_string(),
                    expected: QUALITY_EXPECTED,
                });
            }
        }
    }
    Ok(())
}
