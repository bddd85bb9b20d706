//! 配置合并 - 业务能力层
//!
//! 组件覆盖项 > 运行配置 > 内置默认值，逐字段独立判断。
//! 内置默认值在 `ScreenshotConfig::resolve` 时已进入 `RunConfig`。

use crate::config::RunConfig;
use crate::models::visual_item::VisualItem;

/// 组件的生效配置，按需计算，不保存
#[derive(Debug, Clone, PartialEq)]
pub struct EffectiveItemSettings {
    pub max_width: u32,
    pub background_color: String,
    pub grayscale_diff: bool,
    pub quality: f32,
}

/// 合并组件覆盖项与运行配置
///
/// 只有 `None` 才会回落，`Some(false)` / `Some(0)` / `Some("")` 都按显式值处理
pub fn resolve(item: &VisualItem, config: &RunConfig) -> EffectiveItemSettings {
    let overrides = &item.overrides;
    EffectiveItemSettings {
        max_width: overrides.max_width.unwrap_or(config.max_width),
        background_color: overrides
            .background_color
            .clone()
            .unwrap_or_else(|| config.background_color.clone()),
        grayscale_diff: overrides.grayscale_diff.unwrap_or(config.grayscale_diff),
        quality: overrides.quality.unwrap_or(config.quality),
    }
}
