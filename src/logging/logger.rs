use crate::logging::config::{LogLevel, LoggingConfig};
use anyhow::{Context, Result};
use std::fs;
use std::time::Instant;
use tracing_subscriber::{
    fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer, Registry,
};

/// 日志管理器
///
/// 持有文件日志的 WorkerGuard，保证进程退出前缓冲的日志被刷出。
pub struct LogManager {
    pub config: LoggingConfig,
    pub start_time: Instant,
    _guard: Option<tracing_appender::non_blocking::WorkerGuard>,
}

impl LogManager {
    /// 初始化日志系统（环境变量可覆盖默认配置）
    pub fn init() -> Result<Self> {
        let config = Self::load_config_from_env().unwrap_or_default();
        Self::init_with_config(config)
    }

    /// 使用指定配置初始化日志系统
    pub fn init_with_config(config: LoggingConfig) -> Result<Self> {
        // 确保日志目录存在
        if config.file_enabled {
            let log_path = config.get_effective_log_path();
            fs::create_dir_all(&log_path)
                .with_context(|| format!("无法创建日志目录: {:?}", log_path))?;
        }

        let registry = Registry::default();
        let mut layers = Vec::new();

        // 用于保存文件日志的 guard，确保缓冲不丢失
        let mut file_guard: Option<tracing_appender::non_blocking::WorkerGuard> = None;

        // 控制台日志层
        if config.console_enabled {
            layers.push(Self::create_console_layer());
        }

        // 文件日志层
        if config.file_enabled {
            let (layer, guard) = Self::create_file_layer_with_guard(&config);
            file_guard = Some(guard);
            layers.push(layer);
        }

        // RUST_LOG 优先，否则按配置级别过滤本 crate 的日志
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("gsbea={}", config.level)));
        registry.with(layers).with(filter).init();

        tracing::info!(
            "日志系统初始化完成 - 级别: {}, 控制台: {}, 文件: {}",
            config.level,
            config.console_enabled,
            config.file_enabled
        );

        Ok(Self {
            config,
            start_time: Instant::now(),
            _guard: file_guard,
        })
    }

    /// 从环境变量加载配置
    fn load_config_from_env() -> Option<LoggingConfig> {
        let mut config = LoggingConfig::default();

        if let Ok(level_str) = std::env::var("RUST_LOG") {
            if let Ok(level) = LoggingConfig::parse_level(&level_str) {
                config.level = level;
            }
        }

        if let Ok(enabled) = std::env::var("GSBEA_LOG_CONSOLE") {
            config.console_enabled = enabled.parse().unwrap_or(true);
        }

        if let Ok(enabled) = std::env::var("GSBEA_LOG_FILE") {
            config.file_enabled = enabled.parse().unwrap_or(false);
        }

        if let Ok(path) = std::env::var("GSBEA_LOG_PATH") {
            config.file_path = Some(path.into());
        }

        if let Ok(json_fmt) = std::env::var("GSBEA_LOG_JSON") {
            config.json_format = json_fmt.parse().unwrap_or(false);
        }

        Some(config)
    }

    /// 创建控制台日志层
    fn create_console_layer() -> Box<dyn Layer<Registry> + Send + Sync> {
        fmt::layer()
            .with_target(false)
            .with_thread_ids(false)
            .with_thread_names(false)
            .with_file(false)
            .with_line_number(false)
            .boxed()
    }

    /// 创建文件日志层（带 guard）
    fn create_file_layer_with_guard(
        config: &LoggingConfig,
    ) -> (
        Box<dyn Layer<Registry> + Send + Sync>,
        tracing_appender::non_blocking::WorkerGuard,
    ) {
        use tracing_appender::{non_blocking, rolling};

        let log_path = config.get_effective_log_path();
        let file_appender = rolling::daily(log_path, "gsbea.log");
        let (non_blocking, guard) = non_blocking(file_appender);

        let layer = if config.json_format {
            fmt::layer()
                .json()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(non_blocking)
                .boxed()
        } else {
            fmt::layer()
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_writer(non_blocking)
                .boxed()
        };

        (layer, guard)
    }

    /// 当前日志级别
    pub fn level(&self) -> LogLevel {
        self.config.level
    }

    /// 进程启动以来的运行秒数
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
