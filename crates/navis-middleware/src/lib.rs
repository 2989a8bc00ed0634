//! navis-middleware: 面向 `navis-core` 编排器的可复用中间件组件库。
//!
//! # 教案式概览
//! - **意图（Why）**：路由分发与导航日志几乎是每个单页应用都要写的样板，集中实现后
//!   业务只需注册模式与处理器；
//! - **结构（How）**：按关注点拆分为 [`router`] 与 [`logging`] 两个模块，均实现
//!   [`navis_core::Middleware`]，可直接交给 [`navis_core::Navigator::use_middleware`]；
//! - **契约（What）**：编排器会对每次调用并发执行全部中间件，因此这里的组件不依赖
//!   彼此的执行顺序，只通过 `Context` 读写共享状态。

pub mod logging;
pub mod router;

pub use logging::{LoggingMiddleware, LoggingMiddlewareConfig};
pub use router::{RoutePattern, RouteRegistration, RouteSegment, RouteTable};
