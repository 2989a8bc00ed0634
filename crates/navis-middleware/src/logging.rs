use std::borrow::Cow;
use std::sync::Arc;

use async_trait::async_trait;
use navis_core::{Context, Middleware, NavError};
use tracing::Level;

/// 中间件配置，指导日志中间件如何输出记录。
///
/// # 教案式说明
/// - **意图（Why）**：不同应用对导航日志的级别与标签要求不同，配置结构把这些差异外部化，
///   使中间件本身保持无状态并可复用；
/// - **结构（How）**：携带注册标签 `label` 与输出级别 `level`；`label` 作为结构化字段随每条
///   事件输出，便于在同一进程内区分多个编排器；
/// - **风险提示（Trade-offs）**：动词调用与导航共用同一级别，高频数据请求若使用 `INFO`
///   可能造成日志风暴，可改为 `DEBUG` 或 `TRACE`。
#[derive(Clone, Debug)]
pub struct LoggingMiddlewareConfig {
    pub label: Cow<'static, str>,
    pub level: Level,
}

impl Default for LoggingMiddlewareConfig {
    fn default() -> Self {
        Self {
            label: Cow::Borrowed("navis"),
            level: Level::INFO,
        }
    }
}

/// LoggingMiddleware 为每次调用输出一条结构化事件。
///
/// # 教案式说明
/// - **意图（Why）**：统一记录“谁在何时去往何处”，避免业务中间件各自手写日志；
/// - **结构（How）**：读取 `Context` 上的方法、路径、查询串与 referer，按配置级别发出
///   `tracing` 事件，随后立即成功返回；
/// - **契约（What）**：从不失败，也不写 `Context`，因此与其它中间件的并发执行互不干扰。
#[derive(Clone, Debug, Default)]
pub struct LoggingMiddleware {
    config: LoggingMiddlewareConfig,
}

impl LoggingMiddleware {
    /// 基于给定配置构造中间件。
    pub fn new(config: LoggingMiddlewareConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoggingMiddlewareConfig {
        &self.config
    }
}

/// `tracing` 的事件宏要求级别为常量，这里按配置级别分派到对应宏。
macro_rules! event_at {
    ($level:expr, $($fields:tt)+) => {
        match $level {
            level if level == Level::ERROR => tracing::error!($($fields)+),
            level if level == Level::WARN => tracing::warn!($($fields)+),
            level if level == Level::INFO => tracing::info!($($fields)+),
            level if level == Level::DEBUG => tracing::debug!($($fields)+),
            _ => tracing::trace!($($fields)+),
        }
    };
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(&self, ctx: Arc<Context>) -> Result<(), NavError> {
        let referer = ctx.referer();
        event_at!(
            self.config.level,
            label = self.config.label.as_ref(),
            method = ctx.method().as_str(),
            path = ctx.path(),
            search = %ctx.search(),
            referer = referer.as_deref().unwrap_or(""),
            api = ctx.is_api(),
            "navigation observed"
        );
        Ok(())
    }
}
