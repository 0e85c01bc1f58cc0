use std::path::Path;
use std::str::FromStr;

use anyhow::Result;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{
    EnvFilter,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

use crate::config::AppSettings;

pub fn init_logging(settings: &AppSettings) -> Result<()> {
    let env_filter = EnvFilter::from_str(&format!(
        "{}={}",
        settings.service_name, settings.logging.level
    ))
    .or_else(|_| EnvFilter::try_from_default_env())
    .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(env_filter);

    // 如果配置了日志文件路径, 追加按天滚动的文件输出
    match &settings.logging.file_path {
        Some(file_path) => {
            let path = Path::new(file_path);
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or_else(|| Path::new("."));
            let file_name = path
                .file_name()
                .map(|n| n.to_os_string())
                .unwrap_or_else(|| "juhe-trade.log".into());
            let file_appender = RollingFileAppender::new(Rotation::DAILY, dir, file_name);

            let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);
            // guard 必须与进程同寿命, 否则缓冲中的日志会丢失
            Box::leak(Box::new(guard));

            if settings.logging.json_format {
                registry
                    .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
                    .with(fmt::layer().with_ansi(false).with_writer(non_blocking).json())
                    .init();
            } else {
                registry
                    .with(fmt::layer().with_span_events(FmtSpan::CLOSE))
                    .with(fmt::layer().with_ansi(false).with_writer(non_blocking))
                    .init();
            }
        }
        None => {
            if settings.logging.json_format {
                registry
                    .with(fmt::layer().json().with_span_events(FmtSpan::CLOSE))
                    .init();
            } else {
                registry
                    .with(fmt::layer().with_span_events(FmtSpan::CLOSE))
                    .init();
            }
        }
    }

    tracing::info!("Logging initialized with level: {}", settings.logging.level);

    Ok(())
}
