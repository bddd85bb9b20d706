use thiserror::Error;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 浏览器相关错误
    #[error("浏览器错误: {0}")]
    Browser(#[from] BrowserError),
}

/// 浏览器相关错误
#[derive(Debug, Error)]
pub enum BrowserError {
    /// 连接浏览器失败
    #[error("无法连接到浏览器 (端口: {port}): {source}")]
    ConnectionFailed {
        port: u16,
        #[source]
        source: chromiumoxide::error::CdpError,
    },
    /// 启动无头浏览器失败
    #[error("启动无头浏览器失败: {reason}")]
    LaunchFailed { reason: String },
    /// 查询页面失败
    #[error("获取页面列表失败: {source}")]
    PagesUnavailable {
        #[source]
        source: chromiumoxide::error::CdpError,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置值不合法
    #[error("配置项 {field} 的值 '{value}' 不合法，应为 {expected}")]
    InvalidValue {
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    /// 组件覆盖项不合法
    #[error("组件 {id} 的覆盖项 {field} 的值 '{value}' 不合法，应为 {expected}")]
    InvalidOverride {
        id: String,
        field: &'static str,
        value: String,
        expected: &'static str,
    },
    /// 组件 ID 重复
    #[error("组件 ID 重复: {id}")]
    DuplicateItemId { id: String },
}

/// 失败原因分类，决定最终弹窗展示哪种提示
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 对比服务不可达，需要提示用户启动服务
    ServiceUnreachable,
    /// 其他错误
    Generic,
}

/// 截图流水线错误
///
/// 一个批次内任何组件失败都会折叠为一个批次级错误（取批次内最靠前的失败）
#[derive(Debug, Error)]
pub enum PipelineError {
    /// 运行配置不合法，一个批次都没有开始
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 组件渲染或截图失败
    #[error("截图失败 (组件: {item_id}): {reason}")]
    Capture { item_id: String, reason: String },
    /// 截图文件读取失败
    #[error("读取截图失败 ({path}): {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// 无法连接对比服务（连接失败或超时）
    #[error("无法连接对比服务 ({endpoint}): {reason}")]
    Network { endpoint: String, reason: String },
    /// 对比服务拒绝了上传
    #[error("上传截图失败 (组件: {item_id}): {status}")]
    Upload { item_id: String, status: String },
    /// 对比服务生成报告失败
    #[error("报告生成失败: {reason}")]
    Report { reason: String },
    /// 组件任务异常退出
    #[error("组件任务执行失败: {reason}")]
    Task { reason: String },
}

impl PipelineError {
    pub fn kind(&self) -> FailureKind {
        match self {
            PipelineError::Network { .. } => FailureKind::ServiceUnreachable,
            _ => FailureKind::Generic,
        }
    }

    /// 把 reqwest 错误归类：连接失败和超时算网络错误
    pub fn from_transport(
        endpoint: impl Into<String>,
        err: reqwest::Error,
        otherwise: impl FnOnce(String) -> PipelineError,
    ) -> Self {
        if err.is_connect() || err.is_timeout() {
            PipelineError::Network {
                endpoint: endpoint.into(),
                reason: err.to_string(),
            }
        } else {
            otherwise(err.to_string())
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;

/// 流水线结果类型
pub type PipelineResult<T> = Result<T, PipelineError>;
