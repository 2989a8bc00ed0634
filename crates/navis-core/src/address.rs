//! 目标地址分解。
//!
//! URL 的解析完全委托给 [`url`] crate；本模块只负责把逻辑地址相对宿主当前地址解析为
//! 绝对 URL，并以访问器的形式暴露 scheme、host、path、query、fragment 等分量。

use std::borrow::Cow;
use std::collections::BTreeMap;

use url::Url;

use crate::error::NavError;

/// 一次导航或动词调用的目标地址。
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Address {
    url: Url,
    query: BTreeMap<String, String>,
}

impl Address {
    /// 相对 `base`（通常是宿主的当前 href）解析 `target`。
    ///
    /// # 契约说明（What）
    /// - `target` 可以是逻辑路径（`/users/7?tab=1`）也可以是绝对 URL；
    /// - 任一环节解析失败都返回状态码 400 的 [`NavError`]。
    pub fn parse(base: &str, target: &str) -> Result<Self, NavError> {
        let base = Url::parse(base)
            .map_err(|err| NavError::bad_request(format!("invalid base `{base}`: {err}")))?;
        let url = base
            .join(target)
            .map_err(|err| NavError::bad_request(format!("invalid address `{target}`: {err}")))?;
        // 同名键后者覆盖前者，与常见 querystring 解析器一致。
        let query = url
            .query_pairs()
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        Ok(Self { url, query })
    }

    /// 以站点根为基准解析逻辑地址。
    ///
    /// 不以 `/` 开头、也不以 `scheme://` 开头的地址按站点根解析，避免受当前目录影响。
    pub fn resolve(base: &str, target: &str) -> Result<Self, NavError> {
        Self::parse(base, &rooted(target))
    }

    /// 去掉来源后的规范化地址：路径 + 查询串 + 片段，均为编码后的形式。
    ///
    /// 同一目标无论以 `/a b` 还是 `/a%20b` 的形式给出，得到的 `location` 都相同，
    /// referer 的记录与去重比较都基于它。
    pub fn location(&self) -> String {
        format!("{}{}{}", self.pathname(), self.search(), self.hash())
    }

    /// 完整地址。
    pub fn href(&self) -> &str {
        self.url.as_str()
    }

    /// `scheme://host[:port]`；不透明来源（如 `file:`）返回 `null`。
    pub fn origin(&self) -> String {
        self.url.origin().ascii_serialization()
    }

    /// 带冒号的协议，如 `https:`。
    pub fn protocol(&self) -> String {
        format!("{}:", self.url.scheme())
    }

    /// 主机名加可选端口。
    pub fn host(&self) -> String {
        match (self.url.host_str(), self.url.port()) {
            (Some(host), Some(port)) => format!("{host}:{port}"),
            (Some(host), None) => host.to_owned(),
            (None, _) => String::new(),
        }
    }

    pub fn hostname(&self) -> &str {
        self.url.host_str().unwrap_or_default()
    }

    /// 显式端口；默认端口不显示。
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    pub fn username(&self) -> &str {
        self.url.username()
    }

    pub fn password(&self) -> Option<&str> {
        self.url.password()
    }

    /// 路径部分，总是以 `/` 开头。
    pub fn pathname(&self) -> &str {
        self.url.path()
    }

    /// 带 `?` 的原始查询串；无查询时为空串。
    pub fn search(&self) -> String {
        self.url
            .query()
            .map(|query| format!("?{query}"))
            .unwrap_or_default()
    }

    /// 解码后的查询参数。
    pub fn query(&self) -> &BTreeMap<String, String> {
        &self.query
    }

    /// 带 `#` 的片段；无片段时为空串。
    pub fn hash(&self) -> String {
        self.url
            .fragment()
            .map(|fragment| format!("#{fragment}"))
            .unwrap_or_default()
    }

    /// 底层 URL。
    pub fn as_url(&self) -> &Url {
        &self.url
    }
}

fn rooted(target: &str) -> Cow<'_, str> {
    if target.starts_with('/') || has_scheme(target) {
        Cow::Borrowed(target)
    } else {
        Cow::Owned(format!("/{target}"))
    }
}

/// 仅当地址以合法的 `scheme://` 开头时视为绝对地址。
fn has_scheme(target: &str) -> bool {
    let Some((scheme, _)) = target.split_once("://") else {
        return false;
    };
    let mut chars = scheme.chars();
    chars.next().is_some_and(|first| first.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
