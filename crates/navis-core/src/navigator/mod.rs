//! # navigator 模块：导航编排器
//!
//! ## 角色定位（Why）
//! - 持有配置、中间件栈、canonical Context、referer/去重状态、路由标志与延迟任务队列；
//! - 以 [`Navigator::generator`] 驱动一次调用的完整生命周期，以 [`Navigator::bootstrap`]、
//!   [`Navigator::listen`] 与平台事件监听器作为导航入口。
//!
//! ## 结构（How）
//! - `Navigator` 是 `Arc<NavigatorInner>` 的廉价句柄，可在中间件、任务与监听器之间克隆；
//! - Context 与宿主监听器只持有 `Weak` 回指，编排器释放后它们自然失效；
//! - 中间件栈存放在 [`ArcSwap`] 中：注册走 `rcu` 整表替换，调用方读取快照无需加锁。
//!
//! ## 并发模型（What）
//! - 单次调用内中间件并发扇出、共同完成；
//! - 独立触发的两次导航不做串行化，后启动者覆盖 `canonical_context`；路由标志与去重只保护
//!   当前导航内部发起的重定向（排入延迟队列）。

mod builder;
mod entry;
mod generator;

use std::sync::Arc;
use std::sync::Weak;
use std::sync::atomic::{AtomicU64, Ordering};

use arc_swap::ArcSwap;
use parking_lot::Mutex;

use crate::config::EventMode;
use crate::context::Context;
use crate::hooks::Hooks;
use crate::middleware::Middleware;
use crate::platform::{Host, Platform};
use crate::task::TaskQueue;

pub use builder::{NavigatorBuilder, monitor};
pub use generator::{Callback, callback_fn};

/// 导航编排器句柄。
#[derive(Clone)]
pub struct Navigator {
    inner: Arc<NavigatorInner>,
}

pub(crate) struct NavigatorInner {
    platform: Platform,
    hooks: Hooks,
    stacks: ArcSwap<Vec<Arc<dyn Middleware>>>,
    state: Mutex<RouterState>,
    tasks: TaskQueue,
    absorbed: AtomicU64,
}

#[derive(Default)]
struct RouterState {
    canonical: Option<Arc<Context>>,
    routing: bool,
}

impl Navigator {
    /// 以宿主开始构建编排器。
    pub fn builder(host: Arc<dyn Host>) -> NavigatorBuilder {
        NavigatorBuilder::new(host)
    }

    pub(crate) fn from_inner(inner: Arc<NavigatorInner>) -> Self {
        Self { inner }
    }

    pub(crate) fn downgrade(&self) -> Weak<NavigatorInner> {
        Arc::downgrade(&self.inner)
    }

    /// 追加中间件，返回自身以便链式调用；相同中间件重复注册会重复执行。
    pub fn callback<I>(&self, middleware: I) -> &Self
    where
        I: IntoIterator<Item = Arc<dyn Middleware>>,
    {
        let added: Vec<Arc<dyn Middleware>> = middleware.into_iter().collect();
        if added.is_empty() {
            return self;
        }
        self.inner.stacks.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + added.len());
            next.extend(current.iter().cloned());
            next.extend(added.iter().cloned());
            next
        });
        self
    }

    /// 追加单个中间件。
    pub fn use_middleware<M: Middleware>(&self, middleware: M) -> &Self {
        self.callback([Arc::new(middleware) as Arc<dyn Middleware>])
    }

    /// 中间件栈快照。
    pub fn stacks(&self) -> Arc<Vec<Arc<dyn Middleware>>> {
        self.inner.stacks.load_full()
    }

    /// 归一化后的前缀，总以 `/` 结尾。
    pub fn prefix(&self) -> &str {
        self.inner.platform.prefix()
    }

    /// 实际生效的监听事件（降级之后）。
    pub fn event(&self) -> EventMode {
        self.inner.platform.mode()
    }

    pub fn platform(&self) -> &Platform {
        &self.inner.platform
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        self.inner.platform.host()
    }

    pub fn hooks(&self) -> &Hooks {
        &self.inner.hooks
    }

    /// 是否有导航处于中间件/收尾阶段。
    pub fn routing(&self) -> bool {
        self.inner.state.lock().routing
    }

    /// 最近一次启动的导航所对应的 Context。
    pub fn canonical_context(&self) -> Option<Arc<Context>> {
        self.inner.state.lock().canonical.clone()
    }

    /// 当前 referer：canonical Context 上记录的地址，按读取时的状态计算。
    pub fn referer(&self) -> Option<String> {
        let canonical = self.inner.state.lock().canonical.clone();
        canonical.and_then(|ctx| ctx.request().referer())
    }

    /// 因无人接收而被吸收的失败次数。
    pub fn absorbed_failures(&self) -> u64 {
        self.inner.absorbed.load(Ordering::Relaxed)
    }

    /// 待执行的延迟任务数。
    pub fn pending_tasks(&self) -> usize {
        self.inner.tasks.len()
    }

    /// 平台当前的逻辑路径。
    pub fn current_path(&self) -> String {
        self.inner.platform.current_path()
    }

    /// 登记一个延迟任务，下一次排空时执行。
    pub fn push_task<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: core::future::Future<Output = ()> + Send + 'static,
    {
        use futures_util::FutureExt;
        self.inner.tasks.push(Box::new(move || task().boxed()));
    }

    /// 排空延迟任务队列，返回执行的任务数。
    pub async fn exec_task(&self) -> usize {
        self.inner.tasks.drain().await
    }
}

impl core::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Navigator")
            .field("platform", &self.inner.platform)
            .field("hooks", &self.inner.hooks)
            .field("stacks", &self.inner.stacks.load().len())
            .field("routing", &self.routing())
            .field("tasks", &self.inner.tasks)
            .finish()
    }
}
