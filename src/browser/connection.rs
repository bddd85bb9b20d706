use crate::error::{AppResult, BrowserError};
use chromiumoxide::Browser;
use futures::StreamExt;
use std::sync::Arc;
use tokio::time::sleep;
use tracing::{debug, error, info};

/// 连接到以调试端口启动的浏览器
///
/// 截图器会为每个组件新建页面，所以这里只返回 Browser
pub async fn connect_to_browser(port: u16) -> AppResult<Arc<Browser>> {
    let browser_url = format!("http://localhost:{}", port);
    info!("正在连接到浏览器: {}", browser_url);

    let (browser, mut handler) = Browser::connect(&browser_url).await.map_err(|e| {
        error!("连接浏览器失败: {}", e);
        BrowserError::ConnectionFailed { port, source: e }
    })?;
    debug!("浏览器连接成功");

    // 在后台处理浏览器事件
    tokio::spawn(async move {
        while let Some(h) = handler.next().await {
            if h.is_err() {
                break;
            }
        }
    });

    // 添加短暂延迟以等待浏览器状态同步
    sleep(tokio::time::Duration::from_millis(300)).await;

    let pages = browser
        .pages()
        .await
        .map_err(|e| BrowserError::PagesUnavailable { source: e })?;
    debug!("浏览器当前有 {} 个页面", pages.len());

    Ok(Arc::new(browser))
}
