//! 报告元数据
//!
//! 每个批次完成后都会基于**全部**组件重新计算，交给对比服务重新生成 test.html

use serde::{Deserialize, Serialize};

use crate::config::RunConfig;
use crate::models::visual_item::VisualItem;

/// 报告中单个组件的描述
///
/// 组件没有覆盖 `max_width` / `background_color` 时分别发送 `0` 和 `""`，
/// 由服务端回落到请求里携带的运行级默认值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentMetadata {
    pub id: String,
    pub title: String,
    pub description: String,
    pub max_width: u32,
    pub background_color: String,
}

/// 报告元数据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub port: String,
    pub components: Vec<ComponentMetadata>,
}

impl ReportMetadata {
    pub fn from_items(items: &[VisualItem], config: &RunConfig) -> Self {
        let components = items
            .iter()
            .map(|item| ComponentMetadata {
                id: item.id.clone(),
                title: item.title.clone(),
                description: item.description.clone().unwrap_or_default(),
                max_width: item.overrides.max_width.unwrap_or(0),
                background_color: item.overrides.background_color.clone().unwrap_or_default(),
            })
            .collect();

        Self {
            port: config.service_port.to_string(),
            components,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::visual_item::{ItemOverrides, RenderSource};

    #[test]
    fn test_metadata_covers_all_items_with_sentinels() {
        let items = vec![
            VisualItem::new("t1", "It is a text", RenderSource::Html("<p>Hey there</p>".into())),
            VisualItem::new("t2", "A green box", RenderSource::Html("<div></div>".into()))
                .description("130x100")
                .overrides(ItemOverrides {
                    max_width: Some(130),
                    background_color: Some("lightgreen".into()),
                    ..Default::default()
                }),
        ];

        let metadata = ReportMetadata::from_items(&items, &RunConfig::default());

        assert_eq!(metadata.port, "8080");
        assert_eq!(metadata.components.len(), 2);
        assert_eq!(metadata.components[0].description, "");
        assert_eq!(metadata.components[0].max_width, 0);
        assert_eq!(metadata.components[0].background_color, "");
        assert_eq!(metadata.components[1].description, "130x100");
        assert_eq!(metadata.components[1].max_width, 130);
        assert_eq!(metadata.components[1].background_color, "lightgreen");
    }

    #[test]
    fn test_metadata_serializes_camel_case() {
        let items = vec![VisualItem::new("t1", "Text", RenderSource::Url("about:blank".into()))];
        let value = serde_json::to_value(ReportMetadata::from_items(&items, &RunConfig::default()))
            .unwrap();

        assert_eq!(value["components"][0]["maxWidth"], 0);
        assert_eq!(value["components"][0]["backgroundColor"], "");
    }
}
