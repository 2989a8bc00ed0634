//! # error 模块说明
//!
//! ## 角色定位（Why）
//! - 导航与动词调用共享同一条中间件链路，失败也需共享同一种错误形态：`message + status`；
//! - 框架自身抛出的错误（未知方法、非法地址、编排器已释放）与中间件抛出的错误走同一条传播路径。
//!
//! ## 设计要求（What）
//! - [`NavError`] 派生 `thiserror::Error`，可 `Clone`，以便同一错误先交给 `on_stop`/回调，再交给 `on_error`；
//! - `status` 借用 HTTP 状态码语义，仅作分类器使用，不意味着发生了网络 I/O。

use thiserror::Error;

/// 框架内置使用的状态码常量。
pub mod status {
    /// 地址无法解析。
    pub const BAD_REQUEST: u16 = 400;
    /// 路由表未命中。
    pub const NOT_FOUND: u16 = 404;
    /// 未识别的方法标签。
    pub const METHOD_NOT_ALLOWED: u16 = 405;
    /// 兜底内部错误。
    pub const INTERNAL: u16 = 500;
}

/// 导航错误：携带人类可读消息与数值分类器。
///
/// # 教案式说明
/// - **意图 (Why)**：中间件以 `Err(NavError)` 表达拒绝，编排器统一捕获后依次交给 `on_stop`、
///   调用方回调与 `on_error`，因此错误必须廉价可克隆；
/// - **契约 (What)**：`status` 不做取值校验，调用方可自定义业务码；`message` 面向排障人员；
/// - **风险 (Trade-offs)**：使用 `String` 保存消息，换取跨 `await` 点自由移动的便利。
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("[{status}] {message}")]
pub struct NavError {
    status: u16,
    message: String,
}

impl NavError {
    /// 以任意状态码构造错误。
    pub fn new(status: u16, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    /// 地址解析失败。
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(status::BAD_REQUEST, message)
    }

    /// 目标未命中。
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(status::NOT_FOUND, message)
    }

    /// 方法标签不被识别。
    pub fn method_not_allowed(message: impl Into<String>) -> Self {
        Self::new(status::METHOD_NOT_ALLOWED, message)
    }

    /// 兜底内部错误。
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(status::INTERNAL, message)
    }

    /// 数值分类器。
    pub fn status(&self) -> u16 {
        self.status
    }

    /// 人类可读的描述。
    pub fn message(&self) -> &str {
        &self.message
    }
}

/// 配置解码失败。
///
/// - **意图 (Why)**：配置是数据（TOML），钩子是代码；前者解析失败需要与导航错误区分，避免被
///   `status` 分类器误读为业务失败。
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML 语法或字段类型不匹配。
    #[error("failed to decode navigator configuration: {0}")]
    Toml(#[from] toml::de::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_carries_status_and_message() {
        let err = NavError::not_found("no route for `/missing`");
        assert_eq!(err.status(), status::NOT_FOUND);
        assert_eq!(err.to_string(), "[404] no route for `/missing`");
    }

    #[test]
    fn custom_status_is_preserved() {
        let err = NavError::new(401, "login required");
        assert_eq!(err.status(), 401);
        assert_eq!(err.message(), "login required");
    }
}
