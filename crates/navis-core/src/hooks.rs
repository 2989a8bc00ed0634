use std::future::Future;
use std::sync::Arc;

use futures_util::FutureExt;
use futures_util::future::BoxFuture;

use crate::context::Context;
use crate::error::NavError;

/// 以 Context 为参数的生命周期钩子。
pub type ContextHook = Arc<dyn Fn(Arc<Context>) -> BoxFuture<'static, ()> + Send + Sync>;
/// 错误钩子。
pub type ErrorHook = Arc<dyn Fn(NavError, Arc<Context>) -> BoxFuture<'static, ()> + Send + Sync>;

/// 可选生命周期钩子集合。
///
/// # 教案式说明
/// - **意图 (Why)**：`on_start` 作为顺序闸门在扇出前等待；`on_stop` 每次调用至多执行一次；
///   `on_error` 决定失败是被吸收还是继续上抛，因此“是否配置”本身就是语义的一部分，
///   这里用 `Option` 而非带默认实现的 trait；
/// - **契约 (What)**：钩子本身不可失败，需要拒绝导航的逻辑应写成中间件。
#[derive(Clone, Default)]
pub struct Hooks {
    pub(crate) on_start: Option<ContextHook>,
    pub(crate) on_stop: Option<ContextHook>,
    pub(crate) on_error: Option<ErrorHook>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_start<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_start = Some(Arc::new(move |ctx| hook(ctx).boxed()));
        self
    }

    pub fn on_stop<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_stop = Some(Arc::new(move |ctx| hook(ctx).boxed()));
        self
    }

    pub fn on_error<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(NavError, Arc<Context>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.on_error = Some(Arc::new(move |err, ctx| hook(err, ctx).boxed()));
        self
    }

    pub fn has_error_hook(&self) -> bool {
        self.on_error.is_some()
    }
}

impl core::fmt::Debug for Hooks {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Hooks")
            .field("on_start", &self.on_start.is_some())
            .field("on_stop", &self.on_stop.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}
