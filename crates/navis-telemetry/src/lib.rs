//! navis-telemetry: navis 导航日志的零配置安装入口。
//!
//! # 教案式说明
//! - **意图（Why）**：`navis-core` 只通过 `tracing` 宏发出 span 与事件，不关心输出到哪里；
//!   应用入口调用一次 [`install`] 即可看到 `navis.navigate` span 与告警；
//! - **逻辑（How）**：组装 `EnvFilter + fmt` 两层的 `tracing-subscriber` registry 并设置为全局
//!   Subscriber，安装状态写入进程级 `OnceLock`；
//! - **契约（What）**：整个进程只允许安装一次；外部已经设置过全局 Subscriber 时拒绝覆盖。

use std::sync::OnceLock;

use tracing::dispatcher;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt};

/// 未设置 `RUST_LOG` 时使用的过滤指令。
pub const DEFAULT_DIRECTIVES: &str = "info";

/// 安装状态的全局缓存，确保 `install` 仅执行一次。
static INSTALL_STATE: OnceLock<InstallState> = OnceLock::new();

/// 安装过程可能出现的错误类型。
///
/// # 教案式说明
/// - **意图（Why）**：归纳安装阶段的全部失败路径，便于调用方在启动流程或集成测试中统一处理；
/// - **契约（What）**：所有变体都实现 [`std::error::Error`]，底层错误经 `source` 保留。
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// `install` 被重复调用。
    #[error("navis-telemetry is already installed")]
    AlreadyInstalled,
    /// 外部提前设置了全局 `tracing` Subscriber，无法再次注册。
    #[error("a global tracing subscriber is already set")]
    SubscriberAlreadySet,
    /// 默认过滤指令无法解析。
    #[error("invalid filter directives `{directives}`: {source}")]
    InvalidDirectives {
        directives: String,
        #[source]
        source: tracing_subscriber::filter::ParseError,
    },
    /// 设置全局 Subscriber 失败的底层错误。
    #[error("failed to set the global tracing subscriber: {0}")]
    SetGlobalSubscriber(#[from] tracing::subscriber::SetGlobalDefaultError),
}

struct InstallState {
    directives: String,
}

/// 以默认指令 `info` 安装全局 Subscriber；`RUST_LOG` 存在时以其为准。
pub fn install() -> Result<(), Error> {
    install_with(DEFAULT_DIRECTIVES)
}

/// 以给定的默认指令安装全局 Subscriber，例如 `"warn,navis_core=debug"`。
///
/// # 流程（How）
/// 1. 检查重复安装与外部已设置的 Subscriber；
/// 2. `RUST_LOG` 可解析时优先使用，否则解析 `default_directives`；
/// 3. 组装 `registry + EnvFilter + fmt` 并设置为全局默认；
/// 4. 记录生效的过滤指令，供 [`installed_directives`] 查询。
pub fn install_with(default_directives: &str) -> Result<(), Error> {
    if INSTALL_STATE.get().is_some() {
        return Err(Error::AlreadyInstalled);
    }
    if dispatcher::has_been_set() {
        return Err(Error::SubscriberAlreadySet);
    }

    let filter = build_env_filter(default_directives)?;
    let directives = filter.to_string();
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer());
    tracing::subscriber::set_global_default(subscriber)?;

    INSTALL_STATE
        .set(InstallState { directives })
        .map_err(|_| Error::AlreadyInstalled)
}

/// 已安装时返回生效的过滤指令。
pub fn installed_directives() -> Option<&'static str> {
    INSTALL_STATE.get().map(|state| state.directives.as_str())
}

fn build_env_filter(default_directives: &str) -> Result<EnvFilter, Error> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => parse_directives(default_directives),
    }
}

fn parse_directives(directives: &str) -> Result<EnvFilter, Error> {
    EnvFilter::try_new(directives).map_err(|source| Error::InvalidDirectives {
        directives: directives.to_owned(),
        source,
    })
}
