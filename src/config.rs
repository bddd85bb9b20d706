//! 配置模块
//!
//! 分两层：
//! - `Config`：程序级配置（浏览器端口、清单文件、截图目录等），来自环境变量
//! - `RunConfig`：单次运行的截图配置，由调用方提供的 `ScreenshotConfig`（全部可选）补齐默认值得到
//!
//! 优先级：环境变量 > 清单文件 `[config]` > 内置默认值

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};

// ========== 内置默认值 ==========

pub const DEFAULT_PATH: &str = "../../../screenshot-test";
pub const DEFAULT_HOST: &str = "http://127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_BATCH_SIZE: usize = 10;
pub const DEFAULT_MAX_WIDTH: u32 = 500;
pub const DEFAULT_BACKGROUND_COLOR: &str = "transparent";
pub const DEFAULT_GRAYSCALE_DIFF: bool = false;
pub const DEFAULT_QUALITY: f32 = 0.9;

pub(crate) const QUALITY_EXPECTED: &str = "(0, 1] 区间内的小数";

/// 截图质量必须落在 (0, 1]
pub(crate) fn quality_in_range(quality: f32) -> bool {
    quality > 0.0 && quality <= 1.0
}

/// 调用方可见的运行配置，所有字段均可省略
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenshotConfig {
    pub path: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub batch_size: Option<usize>,
    pub max_width: Option<u32>,
    pub background_color: Option<String>,
    pub grayscale_diff: Option<bool>,
    pub quality: Option<f32>,
}

impl ScreenshotConfig {
    /// 读取 `SCREENSHOT_*` 环境变量，未设置的字段保持 `None`
    pub fn from_env() -> Self {
        Self {
            path: std::env::var("SCREENSHOT_PATH").ok(),
            host: std::env::var("SCREENSHOT_HOST").ok(),
            port: std::env::var("SCREENSHOT_PORT").ok().and_then(|v| v.parse().ok()),
            batch_size: std::env::var("SCREENSHOT_BATCH_SIZE").ok().and_then(|v| v.parse().ok()),
            max_width: std::env::var("SCREENSHOT_MAX_WIDTH").ok().and_then(|v| v.parse().ok()),
            background_color: std::env::var("SCREENSHOT_BACKGROUND_COLOR").ok(),
            grayscale_diff: std::env::var("SCREENSHOT_GRAYSCALE").ok().and_then(|v| v.parse().ok()),
            quality: std::env::var("SCREENSHOT_QUALITY").ok().and_then(|v| v.parse().ok()),
        }
    }

    /// 用 `other` 中已设置的字段覆盖自身
    pub fn overlay(self, other: ScreenshotConfig) -> Self {
        Self {
            path: other.path.or(self.path),
            host: other.host.or(self.host),
            port: other.port.or(self.port),
            batch_size: other.batch_size.or(self.batch_size),
            max_width: other.max_width.or(self.max_width),
            background_color: other.background_color.or(self.background_color),
            grayscale_diff: other.grayscale_diff.or(self.grayscale_diff),
            quality: other.quality.or(self.quality),
        }
    }

    /// 补齐默认值，得到本次运行使用的配置
    pub fn resolve(self) -> RunConfig {
        RunConfig {
            destination_path: self.path.unwrap_or_else(|| DEFAULT_PATH.to_string()),
            service_host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_string()),
            service_port: self.port.unwrap_or(DEFAULT_PORT),
            batch_size: self.batch_size.unwrap_or(DEFAULT_BATCH_SIZE),
            max_width: self.max_width.unwrap_or(DEFAULT_MAX_WIDTH),
            background_color: self
                .background_color
                .unwrap_or_else(|| DEFAULT_BACKGROUND_COLOR.to_string()),
            grayscale_diff: self.grayscale_diff.unwrap_or(DEFAULT_GRAYSCALE_DIFF),
            quality: self.quality.unwrap_or(DEFAULT_QUALITY),
        }
    }
}

/// 单次运行的完整配置
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// 对比服务保存截图和报告的目录
    pub destination_path: String,
    pub service_host: String,
    pub service_port: u16,
    /// 每批处理的组件数量
    pub batch_size: usize,
    pub max_width: u32,
    pub background_color: String,
    pub grayscale_diff: bool,
    pub quality: f32,
}

impl Default for RunConfig {
    fn default() -> Self {
        ScreenshotConfig::default().resolve()
    }
}

impl RunConfig {
    /// 校验配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch_size",
                value: self.batch_size.to_string(),
                expected: "大于 0 的整数",
            });
        }
        if !quality_in_range(self.quality) {
            return Err(ConfigError::InvalidValue {
                field: "quality",
                value: self.quality.to_string(),
                expected: QUALITY_EXPECTED,
            });
        }
        Ok(())
    }

    /// 报告所在文件夹名（路径最后一段）
    pub fn report_folder(&self) -> &str {
        self.destination_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.destination_path)
    }
}

/// 程序配置
#[derive(Clone, Debug)]
pub struct Config {
    /// 浏览器调试端口
    pub browser_debug_port: u16,
    /// 不连接已有浏览器，自行启动无头浏览器
    pub headless: bool,
    /// 无头模式下使用的浏览器可执行文件
    pub chrome_executable: Option<String>,
    /// 组件清单文件（TOML）
    pub manifest_file: String,
    /// 截图临时目录
    pub capture_dir: String,
    /// 输出日志文件
    pub output_log_file: String,
    /// HTTP 请求超时（秒）
    pub request_timeout_secs: u64,
    /// 来自环境变量的运行配置覆盖项
    pub screenshot: ScreenshotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            browser_debug_port: 9222,
            headless: false,
            chrome_executable: None,
            manifest_file: "screenshots.toml".to_string(),
            capture_dir: std::env::temp_dir()
                .join("screenshot-compare")
                .to_string_lossy()
                .to_string(),
            output_log_file: "output.txt".to_string(),
            request_timeout_secs: 30,
            screenshot: ScreenshotConfig::default(),
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            browser_debug_port: std::env::var("BROWSER_DEBUG_PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(default.browser_debug_port),
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            chrome_executable: std::env::var("CHROME_EXECUTABLE").ok().or(default.chrome_executable),
            manifest_file: std::env::var("MANIFEST_FILE").unwrap_or(default.manifest_file),
            capture_dir: std::env::var("CAPTURE_DIR").unwrap_or(default.capture_dir),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(default.output_log_file),
            request_timeout_secs: std::env::var("REQUEST_TIMEOUT_SECS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.request_timeout_secs),
            screenshot: ScreenshotConfig::from_env(),
        }
    }
}
