use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;

use arc_swap::ArcSwap;
use futures_util::FutureExt;
use parking_lot::Mutex;

use super::{Navigator, NavigatorInner, RouterState};
use crate::config::{EventMode, NavigatorConfig, normalize_prefix};
use crate::context::Context;
use crate::error::NavError;
use crate::hooks::Hooks;
use crate::middleware::Middleware;
use crate::platform::{EventListener, Host, Platform};
use crate::task::TaskQueue;

/// `NavigatorBuilder` 聚合宿主、配置、钩子与初始中间件。
///
/// # 教案级注释
/// - **意图 (Why)**：编排器一经构造即订阅平台事件，所有装配必须在此之前完成；
/// - **流程 (How)**：`build` 依次归一化前缀、选择寻址策略（必要时降级）、组装内部状态，
///   最后向宿主注册唯一的事件监听器；监听器只持有 `Weak` 回指；
/// - **契约 (What)**：同一宿主可构造多个互不影响的编排器，每个各自注册监听器。
pub struct NavigatorBuilder {
    host: Arc<dyn Host>,
    config: NavigatorConfig,
    hooks: Hooks,
    stacks: Vec<Arc<dyn Middleware>>,
}

impl NavigatorBuilder {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self {
            host,
            config: NavigatorConfig::default(),
            hooks: Hooks::default(),
            stacks: Vec::new(),
        }
    }

    pub fn config(mut self, config: NavigatorConfig) -> Self {
        self.config = config;
        self
    }

    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.config.prefix = prefix.into();
        self
    }

    pub fn event(mut self, event: EventMode) -> Self {
        self.config.event = event;
        self
    }

    pub fn hooks(mut self, hooks: Hooks) -> Self {
        self.hooks = hooks;
        self
    }

    pub fn on_start<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.hooks = self.hooks.on_start(hook);
        self
    }

    pub fn on_stop<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(Arc<Context>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.hooks = self.hooks.on_stop(hook);
        self
    }

    pub fn on_error<F, Fut>(mut self, hook: F) -> Self
    where
        F: Fn(NavError, Arc<Context>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.hooks = self.hooks.on_error(hook);
        self
    }

    pub fn middleware<M: Middleware>(mut self, middleware: M) -> Self {
        self.stacks.push(Arc::new(middleware));
        self
    }

    pub fn build(self) -> Navigator {
        let prefix = normalize_prefix(&self.config.prefix);
        let platform = Platform::select(Arc::clone(&self.host), prefix, self.config.event);
        let inner = Arc::new(NavigatorInner {
            platform,
            hooks: self.hooks,
            stacks: ArcSwap::from_pointee(self.stacks),
            state: Mutex::new(RouterState::default()),
            tasks: TaskQueue::new(),
            absorbed: AtomicU64::new(0),
        });

        let weak = Arc::downgrade(&inner);
        let listener: EventListener = Arc::new(move || {
            let weak = weak.clone();
            async move {
                if let Some(inner) = weak.upgrade() {
                    Navigator::from_inner(inner).handle_platform_event().await;
                }
            }
            .boxed()
        });
        let mode = inner.platform.mode();
        self.host.add_event_listener(mode, listener);
        tracing::debug!(
            prefix = inner.platform.prefix(),
            event = mode.as_str(),
            "navigator constructed"
        );
        Navigator::from_inner(inner)
    }
}

/// 工厂入口：按配置构造编排器，返回一个接受中间件列表并交回编排器的注册函数。
///
/// ```
/// use std::sync::Arc;
/// use navis_core::{Hooks, Middleware, MemoryHost, NavigatorConfig, from_fn, monitor};
///
/// let host = Arc::new(MemoryHost::new("http://localhost/").unwrap());
/// let create_server = monitor(NavigatorConfig::default(), Hooks::new(), host);
/// let navigator = create_server(vec![
///     Arc::new(from_fn(|_ctx| async { Ok(()) })) as Arc<dyn Middleware>,
/// ]);
/// assert_eq!(navigator.stacks().len(), 1);
/// ```
pub fn monitor(
    config: NavigatorConfig,
    hooks: Hooks,
    host: Arc<dyn Host>,
) -> impl Fn(Vec<Arc<dyn Middleware>>) -> Navigator {
    let navigator = NavigatorBuilder::new(host).config(config).hooks(hooks).build();
    move |middleware| {
        navigator.callback(middleware);
        navigator.clone()
    }
}
