#![deny(unsafe_code)]
#![doc = "navis-core: 单页应用导航编排核心。"]
#![doc = ""]
#![doc = "拦截平台导航事件（片段变化或历史条目变化），为每次导航构造 [`Context`]，"]
#![doc = "并发执行中间件栈，再把结果同步回宿主地址栏与文档标题。同一条执行引擎也服务于"]
#![doc = "`get`/`post`/`put`/`delete` 等非导航调用。"]
#![doc = ""]
#![doc = "== 入口 =="]
#![doc = "- [`Navigator::builder`] / [`monitor`]：构造编排器并订阅平台事件；"]
#![doc = "- [`Navigator::generator`]：驱动单次调用的核心算法；"]
#![doc = "- [`Navigator::bootstrap`] / [`Navigator::listen`]：应用首次进入；"]
#![doc = "- [`Response`]：中间件内部发起重定向与动词调用。"]

pub mod address;
pub mod config;
pub mod context;
pub mod error;
pub mod hooks;
pub mod method;
pub mod middleware;
pub mod navigator;
pub mod platform;
pub mod prefix;
pub mod response;
pub mod task;

pub use address::Address;
pub use config::{EventMode, NavigatorConfig};
pub use context::{Context, Request};
pub use error::{ConfigError, NavError};
pub use hooks::Hooks;
pub use method::Method;
pub use middleware::{FnMiddleware, Middleware, from_fn};
pub use navigator::{Callback, Navigator, NavigatorBuilder, callback_fn, monitor};
pub use platform::{
    AddressStrategy, EventListener, HashStrategy, HistoryStrategy, Host, MemoryHost, Platform, Write,
};
pub use prefix::{decode_with_prefix, encode_with_prefix};
pub use response::Response;
pub use task::{Task, TaskQueue};

/// crate 级结果别名。
pub type Result<T, E = NavError> = core::result::Result<T, E>;
