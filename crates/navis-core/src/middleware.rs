//! 中间件契约。
//!
//! 每次 `generator` 调用都会以同一个 [`Context`] 并发调用栈中的全部中间件，
//! 任一返回 `Err` 即令本次调用走失败路径；中间件之间没有顺序保证，只有共同完成。

use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;

use crate::context::Context;
use crate::error::NavError;

#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    async fn handle(&self, ctx: Arc<Context>) -> Result<(), NavError>;
}

/// 闭包适配器，见 [`from_fn`]。
#[derive(Clone)]
pub struct FnMiddleware<F> {
    f: F,
}

/// 把 `async` 闭包包装为中间件。
///
/// ```
/// use navis_core::middleware::{from_fn, Middleware};
/// use serde_json::json;
///
/// let echo = from_fn(|ctx| async move {
///     ctx.set_body(json!(ctx.path()));
///     Ok(())
/// });
/// # let _: &dyn Middleware = &echo;
/// ```
pub fn from_fn<F, Fut>(f: F) -> FnMiddleware<F>
where
    F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), NavError>> + Send + 'static,
{
    FnMiddleware { f }
}

#[async_trait]
impl<F, Fut> Middleware for FnMiddleware<F>
where
    F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), NavError>> + Send + 'static,
{
    async fn handle(&self, ctx: Arc<Context>) -> Result<(), NavError> {
        (self.f)(ctx).await
    }
}

impl<F> core::fmt::Debug for FnMiddleware<F> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("FnMiddleware")
    }
}
