//! 编排器的数据型配置。
//!
//! # 教案式说明
//! - **意图（Why）**：前缀与监听事件属于部署期决定的数据，适合放进 TOML 等配置文件；
//!   生命周期钩子属于代码，由 [`crate::hooks::Hooks`] 单独承载；
//! - **契约（What）**：`prefix` 缺省为 `/`，`event` 缺省为 `hashchange`；读取后的前缀总是以 `/` 结尾。

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// 编排器监听的平台事件，同时决定地址栏的寻址策略。
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventMode {
    /// 基于片段（`#/path`）寻址。
    #[default]
    #[serde(rename = "hashchange")]
    HashChange,
    /// 基于历史记录条目寻址。
    #[serde(rename = "popstate")]
    PopState,
}

impl EventMode {
    /// 平台事件名。
    pub fn as_str(self) -> &'static str {
        match self {
            EventMode::HashChange => "hashchange",
            EventMode::PopState => "popstate",
        }
    }
}

/// 编排器配置。
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// 应用挂载前缀。
    pub prefix: String,
    /// 请求的寻址模式；宿主不支持时会被降级。
    pub event: EventMode,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            prefix: String::from("/"),
            event: EventMode::HashChange,
        }
    }
}

impl NavigatorConfig {
    /// 以指定前缀构造配置。
    pub fn new(prefix: impl Into<String>, event: EventMode) -> Self {
        Self {
            prefix: prefix.into(),
            event,
        }
    }

    /// 从 TOML 文本解码配置。
    ///
    /// ```
    /// use navis_core::config::{EventMode, NavigatorConfig};
    ///
    /// let config = NavigatorConfig::from_toml_str("prefix = \"/app\"\nevent = \"popstate\"").unwrap();
    /// assert_eq!(config.normalized_prefix(), "/app/");
    /// assert_eq!(config.event, EventMode::PopState);
    /// ```
    pub fn from_toml_str(source: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(source)?)
    }

    /// 归一化后的前缀：空串视为 `/`，缺失的结尾 `/` 会被补齐。
    pub fn normalized_prefix(&self) -> String {
        normalize_prefix(&self.prefix)
    }
}

pub(crate) fn normalize_prefix(prefix: &str) -> String {
    if prefix.is_empty() {
        return String::from("/");
    }
    if prefix.ends_with('/') {
        prefix.to_owned()
    } else {
        format!("{prefix}/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_uses_defaults() {
        let config = NavigatorConfig::from_toml_str("").expect("空文档应回落到默认值");
        assert_eq!(config, NavigatorConfig::default());
        assert_eq!(config.normalized_prefix(), "/");
    }

    #[test]
    fn prefix_gains_trailing_slash() {
        assert_eq!(normalize_prefix("/app"), "/app/");
        assert_eq!(normalize_prefix("/app/"), "/app/");
        assert_eq!(normalize_prefix(""), "/");
    }

    #[test]
    fn unknown_event_is_a_config_error() {
        let err = NavigatorConfig::from_toml_str("event = \"visibilitychange\"")
            .expect_err("未知事件名应解析失败");
        assert!(matches!(err, ConfigError::Toml(_)));
    }
}
