//! 响应外观：把中间件里的高层调用翻译为编排器调用。
//!
//! - `redirect`/`replace`/`reload` 是导航：走去重（`reload` 强制跳过）、成功后写回地址栏；
//!   编排器正在路由时不内联执行，而是进入延迟任务队列，调用立即返回 `Ok(())`；
//! - `get`/`post`/`put`/`delete` 是动词调用：强制执行、内联执行，不触碰 referer、
//!   路由标志与地址栏，返回结果体。

use std::sync::Arc;

use serde_json::Value;

use crate::context::Context;
use crate::error::NavError;
use crate::method::Method;
use crate::navigator::Navigator;
use crate::platform::Write;

#[derive(Clone, Debug)]
pub struct Response {
    ctx: Arc<Context>,
}

impl Response {
    pub(crate) fn new(ctx: Arc<Context>) -> Self {
        Self { ctx }
    }

    pub fn context(&self) -> &Arc<Context> {
        &self.ctx
    }

    /// 追加一条历史记录并执行目标地址的中间件。
    pub async fn redirect(&self, url: &str) -> Result<(), NavError> {
        self.redirection(url, false, Write::Push).await
    }

    /// 替换当前历史记录并执行目标地址的中间件。
    pub async fn replace(&self, url: &str) -> Result<(), NavError> {
        self.redirection(url, false, Write::Replace).await
    }

    /// 以强制模式重跑当前地址。
    pub async fn reload(&self) -> Result<(), NavError> {
        let url = self.ctx.url().to_owned();
        self.redirection(&url, true, Write::Push).await
    }

    pub async fn get(&self, url: &str) -> Result<Option<Value>, NavError> {
        self.navigator()?.request(url, Method::Get, Value::Null).await
    }

    pub async fn post(&self, url: &str, data: Value) -> Result<Option<Value>, NavError> {
        self.navigator()?.request(url, Method::Post, data).await
    }

    pub async fn put(&self, url: &str, data: Value) -> Result<Option<Value>, NavError> {
        self.navigator()?.request(url, Method::Put, data).await
    }

    pub async fn delete(&self, url: &str) -> Result<Option<Value>, NavError> {
        self.navigator()?.request(url, Method::Delete, Value::Null).await
    }

    fn navigator(&self) -> Result<Navigator, NavError> {
        self.ctx
            .navigator()
            .ok_or_else(|| NavError::internal("navigator has been released"))
    }

    async fn redirection(&self, url: &str, force: bool, write: Write) -> Result<(), NavError> {
        let navigator = self.navigator()?;
        let target = navigator.platform().decode(url);
        if navigator.routing() {
            tracing::debug!(%target, force, ?write, "navigation in flight, deferring redirect");
            let deferred = navigator.clone();
            navigator.push_task(move || async move {
                if let Err(err) = deferred.navigate(target, force, write).await {
                    tracing::warn!(status = err.status(), message = err.message(), "deferred redirect failed");
                }
            });
            return Ok(());
        }
        navigator.navigate(target, force, write).await.map(|_| ())
    }
}
