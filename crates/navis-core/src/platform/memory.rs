use std::sync::Arc;

use futures_util::future::{BoxFuture, FutureExt, join_all};
use parking_lot::Mutex;
use url::Url;

use super::{EventListener, Host};
use crate::config::EventMode;
use crate::error::NavError;

/// 进程内宿主：以历史栈模拟浏览器地址栏。
///
/// # 教案式说明
/// - **意图 (Why)**：编排器的行为需要在没有浏览器的环境下验证，也需要被桌面/服务端渲染等
///   非浏览器场景复用；
/// - **逻辑 (How)**：条目列表 + 游标模拟 `history`，写操作计数供测试断言“无平台写入”；
///   事件监听器只登记不自动触发，调用方通过 [`MemoryHost::dispatch_event`]、
///   [`MemoryHost::back`] 等显式驱动；
/// - **契约 (What)**：相对地址相对当前条目解析，解析失败的写操作被忽略并记录告警。
pub struct MemoryHost {
    state: Mutex<MemoryState>,
}

struct MemoryState {
    entries: Vec<Url>,
    index: usize,
    title: String,
    supports_history: bool,
    writes: usize,
    listeners: Vec<(EventMode, EventListener)>,
    errors: Vec<NavError>,
}

impl MemoryHost {
    /// 以初始地址构造；地址非法时返回 400 错误。
    pub fn new(href: &str) -> Result<Self, NavError> {
        let url = Url::parse(href)
            .map_err(|err| NavError::bad_request(format!("invalid host href `{href}`: {err}")))?;
        Ok(Self {
            state: Mutex::new(MemoryState {
                entries: vec![url],
                index: 0,
                title: String::new(),
                supports_history: true,
                writes: 0,
                listeners: Vec::new(),
                errors: Vec::new(),
            }),
        })
    }

    /// 模拟不提供历史 API 的宿主。
    pub fn without_history(self) -> Self {
        self.state.lock().supports_history = false;
        self
    }

    /// 设置初始标题。
    pub fn with_title(self, title: &str) -> Self {
        self.state.lock().title = title.to_owned();
        self
    }

    pub fn pathname(&self) -> String {
        let state = self.state.lock();
        state.entries[state.index].path().to_owned()
    }

    /// 历史栈中的全部地址。
    pub fn entries(&self) -> Vec<String> {
        self.state
            .lock()
            .entries
            .iter()
            .map(|url| url.as_str().to_owned())
            .collect()
    }

    /// 累计的地址栏写操作次数。
    pub fn writes(&self) -> usize {
        self.state.lock().writes
    }

    /// 落到顶层错误通道的错误。
    pub fn errors(&self) -> Vec<NavError> {
        self.state.lock().errors.clone()
    }

    /// 触发指定事件的全部监听器，并返回它们的联合 Future。
    pub fn dispatch_event(&self, event: EventMode) -> BoxFuture<'static, ()> {
        let listeners: Vec<EventListener> = self
            .state
            .lock()
            .listeners
            .iter()
            .filter(|(mode, _)| *mode == event)
            .map(|(_, listener)| Arc::clone(listener))
            .collect();
        let pending: Vec<_> = listeners.iter().map(|listener| listener()).collect();
        join_all(pending).map(|_| ()).boxed()
    }

    /// 后退一条记录，按浏览器语义触发 `popstate`（以及片段变化时的 `hashchange`）。
    pub fn back(&self) -> BoxFuture<'static, ()> {
        self.traverse(-1)
    }

    /// 前进一条记录。
    pub fn forward(&self) -> BoxFuture<'static, ()> {
        self.traverse(1)
    }

    fn traverse(&self, delta: isize) -> BoxFuture<'static, ()> {
        let fragment_changed = {
            let mut state = self.state.lock();
            let Some(target) = state.index.checked_add_signed(delta) else {
                return futures_util::future::ready(()).boxed();
            };
            if target >= state.entries.len() {
                return futures_util::future::ready(()).boxed();
            }
            let before = state.entries[state.index].fragment().map(str::to_owned);
            state.index = target;
            before.as_deref() != state.entries[target].fragment()
        };
        let popstate = self.dispatch_event(EventMode::PopState);
        if fragment_changed {
            let hashchange = self.dispatch_event(EventMode::HashChange);
            async move {
                popstate.await;
                hashchange.await;
            }
            .boxed()
        } else {
            popstate
        }
    }

    fn resolve(state: &MemoryState, url: &str) -> Option<Url> {
        match state.entries[state.index].join(url) {
            Ok(resolved) => Some(resolved),
            Err(err) => {
                tracing::warn!(%url, %err, "memory host ignored unresolvable address");
                None
            }
        }
    }

    fn push_entry(state: &mut MemoryState, url: Url) {
        let next = state.index + 1;
        state.entries.truncate(next);
        state.entries.push(url);
        state.index = next;
        state.writes += 1;
    }
}

impl Host for MemoryHost {
    fn href(&self) -> String {
        let state = self.state.lock();
        state.entries[state.index].as_str().to_owned()
    }

    fn origin(&self) -> String {
        let state = self.state.lock();
        state.entries[state.index].origin().ascii_serialization()
    }

    fn protocol(&self) -> String {
        let state = self.state.lock();
        format!("{}:", state.entries[state.index].scheme())
    }

    fn hash(&self) -> String {
        let state = self.state.lock();
        state.entries[state.index]
            .fragment()
            .map(|fragment| format!("#{fragment}"))
            .unwrap_or_default()
    }

    fn supports_history(&self) -> bool {
        self.state.lock().supports_history
    }

    fn push_state(&self, title: &str, url: &str) {
        let mut state = self.state.lock();
        if let Some(resolved) = Self::resolve(&state, url) {
            Self::push_entry(&mut state, resolved);
            if !title.is_empty() {
                state.title = title.to_owned();
            }
        }
    }

    fn replace_state(&self, title: &str, url: &str) {
        let mut state = self.state.lock();
        if let Some(resolved) = Self::resolve(&state, url) {
            let index = state.index;
            state.entries[index] = resolved;
            state.writes += 1;
            if !title.is_empty() {
                state.title = title.to_owned();
            }
        }
    }

    fn set_hash(&self, fragment: &str) {
        let mut state = self.state.lock();
        let mut next = state.entries[state.index].clone();
        next.set_fragment(Some(fragment));
        // 片段未变化时浏览器不会新增条目。
        if next == state.entries[state.index] {
            state.writes += 1;
        } else {
            Self::push_entry(&mut state, next);
        }
    }

    fn location_replace(&self, href: &str) {
        let mut state = self.state.lock();
        if let Some(resolved) = Self::resolve(&state, href) {
            let index = state.index;
            state.entries[index] = resolved;
            state.writes += 1;
        }
    }

    fn title(&self) -> String {
        self.state.lock().title.clone()
    }

    fn set_title(&self, title: &str) {
        self.state.lock().title = title.to_owned();
    }

    fn add_event_listener(&self, event: EventMode, listener: EventListener) {
        self.state.lock().listeners.push((event, listener));
    }

    fn report_error(&self, error: &NavError) {
        tracing::error!(status = error.status(), message = error.message(), "uncaught navigation error");
        self.state.lock().errors.push(error.clone());
    }
}

impl core::fmt::Debug for MemoryHost {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let state = self.state.lock();
        f.debug_struct("MemoryHost")
            .field("href", &state.entries[state.index].as_str())
            .field("depth", &state.entries.len())
            .field("writes", &state.writes)
            .finish()
    }
}
