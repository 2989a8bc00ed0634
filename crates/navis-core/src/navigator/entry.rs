use std::collections::HashMap;

use serde_json::Value;

use super::Navigator;
use super::generator::callback_fn;
use crate::error::NavError;
use crate::method::Method;
use crate::platform::Write;

impl Navigator {
    /// 读取平台当前路径，经 `remap` 映射后交给 [`bootstrap`](Self::bootstrap)。
    pub async fn listen(
        &self,
        remap: Option<&HashMap<String, String>>,
    ) -> Result<Option<Value>, NavError> {
        let path = self.current_path();
        let target = remap
            .and_then(|remap| remap.get(&path).cloned())
            .unwrap_or(path);
        self.bootstrap(&target).await
    }

    /// 首次进入应用：按前缀解码地址并执行导航，成功后以替换方式写回地址栏。
    ///
    /// 失败时交给 `on_error`；未配置 `on_error` 时返回 `Err`。
    pub async fn bootstrap(&self, address: &str) -> Result<Option<Value>, NavError> {
        let target = self.inner.platform.decode(address);
        tracing::debug!(%address, %target, "bootstrapping navigation");
        self.navigate(target, false, Write::Replace).await
    }

    /// 导航型调用：成功后按 `write` 写回地址栏并同步标题，失败经错误中继处理。
    pub(crate) async fn navigate(
        &self,
        target: String,
        force: bool,
        write: Write,
    ) -> Result<Option<Value>, NavError> {
        let navigator = self.clone();
        let written = target.clone();
        let callback = callback_fn(move |err, ctx| async move {
            if let Some(err) = err {
                return navigator.relay_error(err, ctx).await;
            }
            navigator.inner.platform.write(write, &written, &ctx.title());
            Ok(())
        });
        self.generator(&target, Method::Router, force, Value::Null, Some(callback))
            .await
    }

    /// 动词调用：强制执行，不触碰 referer、路由标志与地址栏。
    ///
    /// 导航请使用 [`Response`](crate::response::Response) 的 `redirect`/`replace`/`reload`，
    /// 传入 [`Method::Router`] 会得到 405。
    pub async fn request(
        &self,
        url: &str,
        method: Method,
        payload: Value,
    ) -> Result<Option<Value>, NavError> {
        if method.is_router() {
            return Err(NavError::method_not_allowed(
                "router is not a request verb; use redirect, replace or reload",
            ));
        }
        let navigator = self.clone();
        let callback = callback_fn(move |err, ctx| async move {
            match err {
                Some(err) => navigator.relay_error(err, ctx).await,
                None => Ok(()),
            }
        });
        self.generator(url, method, true, payload, Some(callback)).await
    }

    /// 平台事件入口：读取当前路径并执行导航；未被 `on_error` 处理的失败交给宿主的顶层错误通道。
    pub async fn handle_platform_event(&self) {
        let path = self.current_path();
        tracing::debug!(%path, event = self.event().as_str(), "platform navigation event");
        let navigator = self.clone();
        let callback = callback_fn(move |err, ctx| async move {
            match err {
                Some(err) => navigator.relay_error(err, ctx).await,
                None => Ok(()),
            }
        });
        if let Err(err) = self
            .generator(&path, Method::Router, false, Value::Null, Some(callback))
            .await
        {
            self.host().report_error(&err);
        }
    }
}
