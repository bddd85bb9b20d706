use crate::browser;
use crate::clients::ComparisonClient;
use crate::config::Config;
use crate::infrastructure::{ChromeCapture, FsByteSource};
use crate::models::dialog::Dialog;
use crate::models::loaders::load_manifest;
use crate::models::run_state::Phase;
use crate::orchestrator::{BatchScheduler, RunStateMachine};
use crate::utils::logging;
use crate::workflow::ItemFlow;
use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

/// 应用主结构
pub struct App {
    config: Config,
    machine: RunStateMachine,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        // 初始化日志文件
        logging::init_log_file(&config.output_log_file)?;

        log_startup(&config);

        // 加载组件清单，环境变量覆盖清单中的配置
        let manifest = load_manifest(Path::new(&config.manifest_file)).await?;
        let run_config = manifest
            .config
            .overlay(config.screenshot.clone())
            .resolve();

        // 连接或启动浏览器
        let browser = if config.headless {
            browser::launch_headless_browser(config.chrome_executable.as_deref()).await?
        } else {
            browser::connect_to_browser(config.browser_debug_port).await?
        };

        let client = Arc::new(
            ComparisonClient::new(Duration::from_secs(config.request_timeout_secs))
                .context("无法创建 HTTP 客户端")?,
        );
        let flow = ItemFlow::new(
            Arc::new(ChromeCapture::new(browser, &config.capture_dir)),
            Arc::new(FsByteSource::new()),
            client.clone(),
        );
        let scheduler = BatchScheduler::new(flow, client);
        let machine = RunStateMachine::new(scheduler, manifest.items, run_config)?;

        Ok(Self { config, machine })
    }

    /// 运行应用主逻辑
    ///
    /// 失败后按回车从失败的批次续跑，输入 q 退出
    pub async fn run(&mut self) -> Result<()> {
        if self.machine.items().is_empty() {
            warn!("⚠️ 清单中没有组件");
        }

        info!("📁 报告目录: {}", self.machine.config().destination_path);

        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            let phase = self.machine.start().await.clone();
            if let Some(dialog) = self.machine.dialog() {
                show_dialog(&dialog);
            }

            match phase {
                Phase::Failed(_) => {
                    info!("按回车重试（从第 {} 个组件续跑），输入 q 退出", self.machine.state().offset() + 1);
                    let answer = lines.next_line().await?.unwrap_or_else(|| "q".to_string());
                    self.machine.dismiss();
                    if answer.trim().eq_ignore_ascii_case("q") {
                        break;
                    }
                }
                _ => {
                    self.machine.dismiss();
                    break;
                }
            }
        }

        info!("\n日志已保存至: {}", self.config.output_log_file);
        Ok(())
    }
}

fn show_dialog(dialog: &Dialog) {
    match dialog {
        Dialog::Loading => info!("⏳ {}", dialog.title()),
        Dialog::Message { title, body } => {
            info!("\n{}", "=".repeat(60));
            info!("💬 {}", title);
            if let Some(body) = body {
                for line in body.lines() {
                    info!("   {}", line);
                }
            }
            info!("{}", "=".repeat(60));
        }
    }
}

fn log_startup(config: &Config) {
    info!("{}", "=".repeat(60));
    info!("🚀 程序启动 - 截图对比模式");
    info!("📁 组件清单: {}", config.manifest_file);
    if config.headless {
        info!("🖥️ 浏览器: 无头模式");
    } else {
        info!("🖥️ 浏览器调试端口: {}", config.browser_debug_port);
    }
    info!("{}", "=".repeat(60));
}
