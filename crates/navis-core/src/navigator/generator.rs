use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::Ordering;

use futures_util::FutureExt;
use futures_util::future::{BoxFuture, join_all};
use serde_json::Value;
use tracing::Instrument;

use super::{Navigator, NavigatorInner};
use crate::address::Address;
use crate::context::Context;
use crate::error::NavError;
use crate::method::Method;

/// 单次调用的回调：总是收到 `(错误或 None, Context)`；返回 `Err` 表示把错误继续上抛，
/// 返回 `Ok(())` 表示已处理（失败路径下即吞掉错误）。
pub type Callback =
    Box<dyn FnOnce(Option<NavError>, Arc<Context>) -> BoxFuture<'static, Result<(), NavError>> + Send>;

/// 把 `async` 闭包包装为 [`Callback`]。
pub fn callback_fn<F, Fut>(f: F) -> Callback
where
    F: FnOnce(Option<NavError>, Arc<Context>) -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), NavError>> + Send + 'static,
{
    Box::new(move |err, ctx| f(err, ctx).boxed())
}

/// 路由标志守卫：导航型调用进入时置位并登记 canonical Context，
/// 离开作用域（含失败、吞错、Future 被丢弃）时复位。
struct RoutingGuard<'a> {
    inner: &'a NavigatorInner,
    engaged: bool,
}

impl<'a> RoutingGuard<'a> {
    fn engage(inner: &'a NavigatorInner, canonical: Option<Arc<Context>>) -> Self {
        let engaged = canonical.is_some();
        if let Some(ctx) = canonical {
            let mut state = inner.state.lock();
            state.canonical = Some(ctx);
            state.routing = true;
        }
        Self { inner, engaged }
    }
}

impl Drop for RoutingGuard<'_> {
    fn drop(&mut self) {
        if self.engaged {
            self.inner.state.lock().routing = false;
        }
    }
}

impl Navigator {
    /// 驱动一次调用的完整生命周期。
    ///
    /// # 教案式说明
    /// - **意图 (Why)**：导航与动词调用共享同一个执行引擎，区别只在 `method` 是否为 `Router`；
    /// - **流程 (How)**：
    ///   1. 以站点根为基准解析目标地址；去重：`Router` 且非强制、目标的规范化地址
    ///      （路径 + 查询串 + 片段）等于 referer 时直接返回 `Ok(None)`，不构造 Context、
    ///      不执行中间件、不写地址栏；
    ///   2. 构造 Context；导航型调用登记为 canonical 并置位路由标志；目标无法解析时跳过
    ///      钩子与中间件，400 以宿主当前地址构造的 Context 交给回调；
    ///   3. 等待 `on_start`；
    ///   4. 并发扇出全部中间件并等待全部结束；成功则（导航型）把 referer 更新为规范化地址，
    ///      随后执行一次 `on_stop` 与回调；任一失败则执行一次 `on_stop`，再把首个错误交给回调；
    ///      两条路径结束时路由标志都会复位；
    ///   5. 排空延迟任务队列并等待其完成后才返回；
    /// - **契约 (What)**：
    ///   - 成功返回 `Ok(Some(body))`；
    ///   - 失败且回调吞掉错误返回 `Ok(None)`，回调上抛则返回 `Err`；
    ///   - 失败且未提供回调时错误被吸收：记录 WARN 日志、累加
    ///     [`absorbed_failures`](Navigator::absorbed_failures)，返回 `Ok(None)`；
    /// - **风险 (Trade-offs)**：导航进行中发起的动词调用不会排空队列，队列留给外层导航收尾时
    ///   排空，以保证延迟重定向严格晚于触发它的导航的回调执行。
    pub async fn generator(
        &self,
        address: &str,
        method: Method,
        force: bool,
        payload: Value,
        callback: Option<Callback>,
    ) -> Result<Option<Value>, NavError> {
        let span = tracing::debug_span!(
            "navis.navigate",
            %address,
            method = method.as_str(),
            force
        );
        self.run(address, method, force, payload, callback)
            .instrument(span)
            .await
    }

    async fn run(
        &self,
        address: &str,
        method: Method,
        force: bool,
        payload: Value,
        callback: Option<Callback>,
    ) -> Result<Option<Value>, NavError> {
        let is_router = method.is_router();
        let resolved = Address::resolve(&self.host().href(), address);
        if is_router
            && !force
            && let Ok(target) = &resolved
            && self.referer() == Some(target.location())
        {
            tracing::debug!("navigation matches referer, skipped");
            return Ok(None);
        }

        let has_callback = callback.is_some();
        let outcome = match resolved {
            Ok(target) => {
                let ctx = Context::new(self, address, target, method, payload);
                let _guard =
                    RoutingGuard::engage(&self.inner, is_router.then(|| Arc::clone(&ctx)));
                self.settle(&ctx, is_router, callback).await
            }
            Err(err) => self.reject(err, address, method, payload, callback).await,
        };

        if is_router || !self.routing() {
            self.exec_task().await;
        }

        match outcome {
            Err(err) if !has_callback => {
                self.absorb(&err);
                Ok(None)
            }
            other => other,
        }
    }

    async fn settle(
        &self,
        ctx: &Arc<Context>,
        is_router: bool,
        callback: Option<Callback>,
    ) -> Result<Option<Value>, NavError> {
        if let Some(on_start) = &self.inner.hooks.on_start {
            on_start(Arc::clone(ctx)).await;
        }

        let stacks = self.stacks();
        let results = join_all(stacks.iter().map(|middleware| middleware.handle(Arc::clone(ctx)))).await;
        let failure = results.into_iter().find_map(Result::err);

        if failure.is_none() && is_router {
            ctx.request().set_referer(ctx.request().address().location());
        }
        if let Some(on_stop) = &self.inner.hooks.on_stop {
            on_stop(Arc::clone(ctx)).await;
        }

        Self::conclude(failure, ctx, callback).await
    }

    /// 目标地址无法解析：不运行钩子与中间件，以宿主当前地址构造 Context，把 400 交给回调。
    ///
    /// 宿主地址本身也无法解析时，原错误直接返回。
    async fn reject(
        &self,
        err: NavError,
        address: &str,
        method: Method,
        payload: Value,
        callback: Option<Callback>,
    ) -> Result<Option<Value>, NavError> {
        tracing::debug!(status = err.status(), message = err.message(), "target address rejected");
        let Some(callback) = callback else {
            return Err(err);
        };
        let href = self.host().href();
        let Ok(fallback) = Address::parse(&href, &href) else {
            return Err(err);
        };
        let ctx = Context::new(self, address, fallback, method, payload);
        Self::conclude(Some(err), &ctx, Some(callback)).await
    }

    async fn conclude(
        failure: Option<NavError>,
        ctx: &Arc<Context>,
        callback: Option<Callback>,
    ) -> Result<Option<Value>, NavError> {
        match (failure, callback) {
            (None, None) => Ok(Some(ctx.body())),
            (None, Some(callback)) => {
                callback(None, Arc::clone(ctx)).await?;
                Ok(Some(ctx.body()))
            }
            (Some(err), None) => Err(err),
            (Some(err), Some(callback)) => {
                callback(Some(err), Arc::clone(ctx)).await?;
                Ok(None)
            }
        }
    }

    fn absorb(&self, err: &NavError) {
        let total = self.inner.absorbed.fetch_add(1, Ordering::Relaxed) + 1;
        tracing::warn!(
            status = err.status(),
            message = err.message(),
            total,
            "navigation failure absorbed: no callback to receive it"
        );
    }

    /// 错误中继：配置了 `on_error` 时交给它并视为已处理，否则原样上抛。
    pub(crate) async fn relay_error(&self, err: NavError, ctx: Arc<Context>) -> Result<(), NavError> {
        match &self.inner.hooks.on_error {
            Some(on_error) => {
                on_error(err, ctx).await;
                Ok(())
            }
            None => Err(err),
        }
    }
}
