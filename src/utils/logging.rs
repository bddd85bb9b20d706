/// 日志工具模块
///
/// 提供日志初始化、格式化和输出的辅助函数
use anyhow::Result;
use std::fs;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::models::run_state::Phase;

/// 初始化 tracing，默认 `info` 级别，可用 `RUST_LOG` 覆盖
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

/// 初始化日志文件
///
/// # 参数
/// - `log_file_path`: 日志文件路径
pub fn init_log_file(log_file_path: &str) -> Result<()> {
    let log_header = format!(
        "{}\n截图对比日志 - {}\n{}\n\n",
        "=".repeat(60),
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(60)
    );
    fs::write(log_file_path, log_header)?;
    Ok(())
}

/// 记录运行开始信息
///
/// # 参数
/// - `total`: 组件总数
/// - `batch_size`: 每批数量
/// - `offset`: 起始偏移
pub fn log_run_start(total: usize, batch_size: usize, offset: usize) {
    info!("{}", "=".repeat(60));
    info!("🚀 开始截图对比 - 共 {} 个组件", total);
    info!("📋 将以每批 {} 个的方式处理", batch_size);
    if offset > 0 {
        info!("⏩ 从第 {} 个组件续跑", offset + 1);
    }
    info!("{}", "=".repeat(60));
}

/// 记录批次开始信息
///
/// # 参数
/// - `batch_num`: 批次编号
/// - `total_batches`: 批次总数
/// - `start`: 起始组件编号
/// - `end`: 结束组件编号
/// - `total`: 组件总数
pub fn log_batch_start(
    batch_num: usize,
    total_batches: usize,
    start: usize,
    end: usize,
    total: usize,
) {
    info!("\n{}", "=".repeat(60));
    info!("📦 开始处理第 {}/{} 批", batch_num, total_batches);
    info!("📄 本批组件: {}-{} / 共 {} 个", start, end, total);
    info!("{}", "=".repeat(60));
}

/// 记录批次完成信息
pub fn log_batch_complete(batch_num: usize, batch_len: usize, offset: usize, total: usize) {
    info!("\n{}", "─".repeat(60));
    info!("✓ 第 {} 批完成: {} 个组件已上传，报告已更新", batch_num, batch_len);
    info!("📊 进度: {}/{}", offset, total);
    info!("{}", "─".repeat(60));
}

/// 打印最终统计信息
pub fn print_final_stats(phase: &Phase, offset: usize, total: usize) {
    info!("\n{}", "=".repeat(60));
    info!("📊 本次运行结束");
    info!(
        "完成时间: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    info!("{}", "=".repeat(60));
    match phase {
        Phase::Succeeded => info!("✅ 成功: {}/{}", offset, total),
        Phase::Failed(reason) => {
            info!("❌ 失败: {}", reason.message);
            info!("⏸️ 已完成 {}/{}，再次运行将从第 {} 个组件续跑", offset, total, offset + 1);
        }
        other => info!("阶段: {:?}", other),
    }
    info!("{}", "=".repeat(60));
}
