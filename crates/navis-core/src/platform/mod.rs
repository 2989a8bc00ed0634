//! # platform 模块：宿主地址栏适配
//!
//! ## 角色定位（Why）
//! - 浏览器提供两套互不兼容的寻址方式：片段（`#/path` + `hashchange`）与历史条目
//!   （`pushState` + `popstate`）。编排器只想要“读当前逻辑路径 / 写回解析结果”两个动作；
//! - 本模块把差异收敛到 [`AddressStrategy`] 的两个实现里，并在构造期一次性选定，
//!   运行期不再按模式分支。
//!
//! ## 结构（How）
//! - [`Host`]：宿主能力面（地址栏、标题、事件监听、顶层错误通道），浏览器或测试替身实现之；
//! - [`HashStrategy`] / [`HistoryStrategy`]：两种寻址策略；
//! - [`Platform`]：策略 + 宿主 + 前缀的组合，对编排器暴露逻辑路径语义；
//! - [`MemoryHost`]：进程内宿主，实现完整的历史栈语义，供测试与非浏览器嵌入使用。

mod hash;
mod history;
mod memory;

use std::sync::Arc;

use futures_util::future::BoxFuture;

use crate::config::EventMode;
use crate::error::NavError;
use crate::prefix::{decode_with_prefix, encode_with_prefix};

pub use hash::HashStrategy;
pub use history::HistoryStrategy;
pub use memory::MemoryHost;

/// 平台事件监听器：每次事件触发返回一个待驱动的 Future，由宿主负责调度。
pub type EventListener = Arc<dyn Fn() -> BoxFuture<'static, ()> + Send + Sync>;

/// 宿主能力面。
///
/// # 教案式说明
/// - **意图 (Why)**：编排器与策略只通过该 trait 接触地址栏与文档标题，浏览器绑定、
///   测试替身或桌面 WebView 均可按需实现；
/// - **契约 (What)**：
///   - `href`/`origin`/`protocol`/`hash` 反映调用瞬间的地址栏；`hash` 带 `#`，为空表示无片段；
///   - `push_state`/`replace_state` 的 `url` 可以是相对地址，由宿主相对当前地址解析；
///   - `set_hash` 接收不带 `#` 的片段内容；
///   - `add_event_listener` 注册后由宿主在事件触发时调用并驱动返回的 Future；
/// - **风险 (Trade-offs)**：真实浏览器在 `set_hash` 后会异步触发 `hashchange`，编排器依赖去重
///   吸收这次回声，替身实现无需模拟。
pub trait Host: Send + Sync {
    fn href(&self) -> String;
    fn origin(&self) -> String;
    /// 带冒号的协议，例如 `https:`、`file:`。
    fn protocol(&self) -> String;
    fn hash(&self) -> String;
    /// 宿主是否提供历史条目 API。
    fn supports_history(&self) -> bool;
    fn push_state(&self, title: &str, url: &str);
    fn replace_state(&self, title: &str, url: &str);
    fn set_hash(&self, fragment: &str);
    /// 以替换当前条目的方式跳转到完整地址。
    fn location_replace(&self, href: &str);
    fn title(&self) -> String;
    fn set_title(&self, title: &str);
    fn add_event_listener(&self, event: EventMode, listener: EventListener);

    /// 顶层错误通道；未配置 `on_error` 时平台事件触发的导航失败落到这里。
    fn report_error(&self, error: &NavError) {
        tracing::error!(status = error.status(), message = error.message(), "uncaught navigation error");
    }
}

/// 寻址策略：读取网络地址、以 push/replace 语义写回。
///
/// 读写都以“带前缀的网络地址”为单位，前缀转换由 [`Platform`] 统一完成。
pub trait AddressStrategy: Send + Sync {
    /// 策略对应的事件。
    fn mode(&self) -> EventMode;
    /// 当前网络地址；为空时返回 `prefix`。
    fn read(&self, prefix: &str) -> String;
    /// 追加一条记录。
    fn push(&self, address: &str, title: &str);
    /// 替换当前记录。
    fn replace(&self, address: &str, title: &str);
}

/// 写回方式。
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Write {
    Push,
    Replace,
}

/// 平台适配器：选定的寻址策略 + 宿主 + 前缀。
pub struct Platform {
    host: Arc<dyn Host>,
    strategy: Box<dyn AddressStrategy>,
    prefix: String,
}

impl Platform {
    /// 按请求模式选择策略。
    ///
    /// # 降级规则（How）
    /// 1. 请求 `popstate` 但宿主不支持历史 API → 片段模式；
    /// 2. 页面经 `file:` 协议加载 → 片段模式（无论请求何种模式）。
    ///
    /// `prefix` 须已归一化。
    pub fn select(host: Arc<dyn Host>, prefix: String, requested: EventMode) -> Self {
        let file_scheme = host.protocol().starts_with("file:");
        let mode = match requested {
            EventMode::PopState if !host.supports_history() || file_scheme => {
                tracing::warn!(
                    requested = requested.as_str(),
                    file_scheme,
                    "history API unavailable, falling back to hash addressing"
                );
                EventMode::HashChange
            }
            other => other,
        };
        let strategy: Box<dyn AddressStrategy> = match mode {
            EventMode::PopState => Box::new(HistoryStrategy::new(Arc::clone(&host))),
            EventMode::HashChange => Box::new(HashStrategy::new(Arc::clone(&host))),
        };
        Self {
            host,
            strategy,
            prefix,
        }
    }

    /// 实际生效的模式。
    pub fn mode(&self) -> EventMode {
        self.strategy.mode()
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn host(&self) -> &Arc<dyn Host> {
        &self.host
    }

    /// 当前逻辑路径（已剥离前缀）。
    pub fn current_path(&self) -> String {
        decode_with_prefix(&self.prefix, &self.strategy.read(&self.prefix))
    }

    pub fn encode(&self, address: &str) -> String {
        encode_with_prefix(&self.prefix, address)
    }

    pub fn decode(&self, address: &str) -> String {
        decode_with_prefix(&self.prefix, address)
    }

    /// 写回逻辑地址并同步文档标题；`title` 为空时保留宿主当前标题。
    pub fn write(&self, write: Write, address: &str, title: &str) {
        let encoded = self.encode(address);
        let title = if title.is_empty() {
            self.host.title()
        } else {
            title.to_owned()
        };
        match write {
            Write::Push => self.strategy.push(&encoded, &title),
            Write::Replace => self.strategy.replace(&encoded, &title),
        }
        self.host.set_title(&title);
        tracing::debug!(address = %encoded, ?write, mode = self.mode().as_str(), "platform address written");
    }
}

impl core::fmt::Debug for Platform {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Platform")
            .field("mode", &self.mode())
            .field("prefix", &self.prefix)
            .finish()
    }
}
