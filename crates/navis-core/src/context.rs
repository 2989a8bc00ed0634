//! 单次调用的上下文。
//!
//! # 教案式说明
//! - **意图（Why）**：一次导航或动词调用需要一个稳定身份，供并发中间件共享读取请求、
//!   写入结果；`Context` 以 `Arc` 共享，可变部分（`title`、`body`、`params`、`referer`）
//!   各自以锁保护；
//! - **结构（How）**：[`Request`] 由 `Context` 独占；[`Response`] 按需构造，与 `Context`
//!   一一绑定；对编排器只持有 `Weak` 回指，不延长其生命周期；
//! - **契约（What）**：锁仅在访问器内部短暂持有，不会跨越 `await`。

use std::collections::BTreeMap;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use serde_json::Value;

use crate::address::Address;
use crate::error::NavError;
use crate::method::Method;
use crate::navigator::{Navigator, NavigatorInner};
use crate::response::Response;

/// 请求：目标地址分解结果 + 方法 + 载荷。
#[derive(Debug)]
pub struct Request {
    url: String,
    address: Address,
    method: Method,
    payload: Value,
    params: Mutex<BTreeMap<String, String>>,
    referer: Mutex<Option<String>>,
}

impl Request {
    /// 调用方传入的原始（逻辑）地址。
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn method(&self) -> Method {
        self.method
    }

    /// 随调用携带的瞬态载荷。
    pub fn payload(&self) -> &Value {
        &self.payload
    }

    /// 路由参数快照。
    pub fn params(&self) -> BTreeMap<String, String> {
        self.params.lock().clone()
    }

    pub fn param(&self, name: &str) -> Option<String> {
        self.params.lock().get(name).cloned()
    }

    /// 由路由类中间件写入匹配得到的参数；同名参数被覆盖。
    pub fn extend_params<I>(&self, params: I)
    where
        I: IntoIterator<Item = (String, String)>,
    {
        self.params.lock().extend(params);
    }

    /// 上一次成功导航的规范化地址（路径 + 查询串 + 片段，编码形式）；导航成功后更新为本次地址。
    pub fn referer(&self) -> Option<String> {
        self.referer.lock().clone()
    }

    pub(crate) fn set_referer(&self, referer: String) {
        *self.referer.lock() = Some(referer);
    }
}

/// 导航上下文。
pub struct Context {
    title: Mutex<String>,
    body: Mutex<Value>,
    request: Request,
    navigator: Weak<NavigatorInner>,
}

impl Context {
    /// 以已解析的目标地址构造上下文。
    ///
    /// # 契约说明（What）
    /// - `url` 保留调用方传入的原始地址，`address` 为其解析结果；目标无法解析时编排器以宿主
    ///   当前地址代替，此时 `url` 仍是被拒绝的原始地址；
    /// - `referer` 初始化为编排器当前的 referer 快照；
    /// - `title` 初始化为宿主当前文档标题。
    pub(crate) fn new(
        navigator: &Navigator,
        url: &str,
        address: Address,
        method: Method,
        payload: Value,
    ) -> Arc<Self> {
        let request = Request {
            url: url.to_owned(),
            address,
            method,
            payload,
            params: Mutex::new(BTreeMap::new()),
            referer: Mutex::new(navigator.referer()),
        };
        Arc::new(Self {
            title: Mutex::new(navigator.host().title()),
            body: Mutex::new(Value::Null),
            request,
            navigator: navigator.downgrade(),
        })
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    /// 与本上下文绑定的响应对象。
    pub fn response(self: &Arc<Self>) -> Response {
        Response::new(Arc::clone(self))
    }

    /// 所属编排器；编排器已释放时返回 `None`。
    pub fn navigator(&self) -> Option<Navigator> {
        self.navigator.upgrade().map(Navigator::from_inner)
    }

    pub fn title(&self) -> String {
        self.title.lock().clone()
    }

    pub fn set_title(&self, title: impl Into<String>) {
        *self.title.lock() = title.into();
    }

    /// 结果体快照。
    pub fn body(&self) -> Value {
        self.body.lock().clone()
    }

    pub fn set_body(&self, body: Value) {
        *self.body.lock() = body;
    }

    pub fn url(&self) -> &str {
        self.request.url()
    }

    pub fn method(&self) -> Method {
        self.request.method()
    }

    /// 非导航调用。
    pub fn is_api(&self) -> bool {
        !self.request.method().is_router()
    }

    pub fn path(&self) -> &str {
        self.request.address().pathname()
    }

    pub fn href(&self) -> &str {
        self.request.address().href()
    }

    pub fn origin(&self) -> String {
        self.request.address().origin()
    }

    pub fn protocol(&self) -> String {
        self.request.address().protocol()
    }

    pub fn host(&self) -> String {
        self.request.address().host()
    }

    pub fn hostname(&self) -> &str {
        self.request.address().hostname()
    }

    pub fn port(&self) -> Option<u16> {
        self.request.address().port()
    }

    pub fn username(&self) -> &str {
        self.request.address().username()
    }

    pub fn password(&self) -> Option<&str> {
        self.request.address().password()
    }

    pub fn search(&self) -> String {
        self.request.address().search()
    }

    pub fn query(&self) -> &BTreeMap<String, String> {
        self.request.address().query()
    }

    pub fn hash(&self) -> String {
        self.request.address().hash()
    }

    /// 调用载荷（历史上称为 state）。
    pub fn state(&self) -> &Value {
        self.request.payload()
    }

    pub fn params(&self) -> BTreeMap<String, String> {
        self.request.params()
    }

    pub fn referer(&self) -> Option<String> {
        self.request.referer()
    }

    pub async fn redirect(self: &Arc<Self>, url: &str) -> Result<(), NavError> {
        self.response().redirect(url).await
    }

    pub async fn replace(self: &Arc<Self>, url: &str) -> Result<(), NavError> {
        self.response().replace(url).await
    }

    pub async fn reload(self: &Arc<Self>) -> Result<(), NavError> {
        self.response().reload().await
    }

    pub async fn get(self: &Arc<Self>, url: &str) -> Result<Option<Value>, NavError> {
        self.response().get(url).await
    }

    pub async fn post(self: &Arc<Self>, url: &str, data: Value) -> Result<Option<Value>, NavError> {
        self.response().post(url, data).await
    }

    pub async fn put(self: &Arc<Self>, url: &str, data: Value) -> Result<Option<Value>, NavError> {
        self.response().put(url, data).await
    }

    pub async fn delete(self: &Arc<Self>, url: &str) -> Result<Option<Value>, NavError> {
        self.response().delete(url).await
    }
}

impl core::fmt::Debug for Context {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Context")
            .field("url", &self.request.url())
            .field("method", &self.request.method())
            .field("title", &*self.title.lock())
            .finish_non_exhaustive()
    }
}
