use tracing_subscriber::{EnvFilter, fmt};

/// 初始化日志系统
///
/// 支持通过 RUST_LOG 环境变量控制日志级别
/// 默认级别: warn (日志写入 stderr，不干扰响应输出)
///
/// 示例:
/// - RUST_LOG=debug rureq send GET :3000/api
/// - RUST_LOG=rureq=trace rureq snippet curl :3000/api
pub fn init_logger() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,hyper=warn,reqwest=warn"));

    // try_init: a second call (e.g. from tests) must not panic
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();

    tracing::debug!("Logger initialized");
}
