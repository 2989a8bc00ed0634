use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use arc_swap::ArcSwap;
use async_trait::async_trait;
use navis_core::{Context, Method, Middleware, NavError};

/// 通配符段未命名时写入参数表使用的键。
pub const WILDCARD_PARAM: &str = "*";

/// 模式中的单个段。
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RouteSegment {
    /// 必须逐字相等。
    Literal(String),
    /// `:name`，匹配任意单个段并以 `name` 写入参数表。
    Parameter(String),
    /// `*` 或 `*name`，吞掉剩余全部段，只能位于末尾。
    Wildcard(Option<String>),
}

/// 解析后的路由模式，例如 `/users/:id`、`/files/*path`。
#[derive(Clone, PartialEq, Eq)]
pub struct RoutePattern {
    raw: String,
    segments: Vec<RouteSegment>,
}

impl RoutePattern {
    /// 解析模式字符串；空参数名或通配符不在末尾时返回 400。
    pub fn parse(pattern: &str) -> Result<Self, NavError> {
        let parts: Vec<&str> = split_segments(pattern).collect();
        let mut segments = Vec::with_capacity(parts.len());
        for (index, part) in parts.iter().enumerate() {
            let segment = if let Some(name) = part.strip_prefix(':') {
                if name.is_empty() {
                    return Err(NavError::bad_request(format!(
                        "route pattern `{pattern}` has an unnamed parameter"
                    )));
                }
                RouteSegment::Parameter(name.to_owned())
            } else if let Some(name) = part.strip_prefix('*') {
                if index + 1 != parts.len() {
                    return Err(NavError::bad_request(format!(
                        "route pattern `{pattern}` has a wildcard before its last segment"
                    )));
                }
                RouteSegment::Wildcard((!name.is_empty()).then(|| name.to_owned()))
            } else {
                RouteSegment::Literal((*part).to_owned())
            };
            segments.push(segment);
        }
        Ok(Self {
            raw: pattern.to_owned(),
            segments,
        })
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn segments(&self) -> &[RouteSegment] {
        &self.segments
    }

    /// 匹配逻辑路径（不含查询串），命中时返回提取出的参数。
    ///
    /// # 说明（Why/How）
    /// - 逐段比较，支持 `Literal`、`Parameter`、`Wildcard`；
    /// - 遇到通配符即收集剩余段并立即返回，剩余段以 `/` 重新拼接；
    /// - 段数不一致或字面量不等时返回 `None`。
    pub fn matches(&self, path: &str) -> Option<BTreeMap<String, String>> {
        let mut params = BTreeMap::new();
        let mut target = split_segments(path);

        for segment in &self.segments {
            match segment {
                RouteSegment::Literal(expected) => {
                    if target.next()? != expected.as_str() {
                        return None;
                    }
                }
                RouteSegment::Parameter(name) => {
                    let actual = target.next()?;
                    params.insert(name.clone(), actual.to_owned());
                }
                RouteSegment::Wildcard(name) => {
                    let rest: Vec<&str> = target.by_ref().collect();
                    let key = name.as_deref().unwrap_or(WILDCARD_PARAM);
                    params.insert(key.to_owned(), rest.join("/"));
                    return Some(params);
                }
            }
        }

        if target.next().is_some() {
            return None;
        }
        Some(params)
    }
}

impl FromStr for RoutePattern {
    type Err = NavError;

    fn from_str(pattern: &str) -> Result<Self, Self::Err> {
        Self::parse(pattern)
    }
}

impl fmt::Debug for RoutePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("RoutePattern").field(&self.raw).finish()
    }
}

fn split_segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// 向 [`RouteTable`] 注册的单条路由记录。
///
/// # 字段语义（What）
/// - `pattern`：匹配规则；
/// - `method`：为 `Some` 时只响应该方法，`None` 响应全部方法（含导航）；
/// - `handler`：命中后执行的中间件。
#[derive(Clone)]
pub struct RouteRegistration {
    pub pattern: RoutePattern,
    pub method: Option<Method>,
    pub handler: Arc<dyn Middleware>,
}

impl RouteRegistration {
    pub fn new<M: Middleware>(pattern: &str, handler: M) -> Result<Self, NavError> {
        Ok(Self {
            pattern: RoutePattern::parse(pattern)?,
            method: None,
            handler: Arc::new(handler),
        })
    }

    /// 限定方法。
    pub fn method(mut self, method: Method) -> Self {
        self.method = Some(method);
        self
    }

    fn accepts(&self, method: Method) -> bool {
        self.method.is_none_or(|expected| expected == method)
    }
}

impl fmt::Debug for RouteRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteRegistration")
            .field("pattern", &self.pattern)
            .field("method", &self.method)
            .finish()
    }
}

/// `RouteTable` 是基于 `ArcSwap` 的路由分发中间件，读路径零锁、写路径整表替换。
///
/// # 设计动机（Why）
/// - 编排器对每次调用扇出全部中间件，业务若各自判断路径会产生大量重复样板；
///   路由表把“按路径选处理器”收敛到一个中间件里；
/// - 路由可在应用运行期间追加或整体替换，正在执行的导航继续使用旧快照。
///
/// # 行为概览（How）
/// 1. 加载当前快照，按注册顺序寻找首个方法与模式均匹配的记录；
/// 2. 命中后把参数写入 `Request::params`，再把同一个 `Context` 交给该记录的处理器；
/// 3. 未命中时依次尝试回退处理器、严格模式下返回 404，否则视为与本中间件无关并成功返回。
///
/// # 使用契约（What）
/// - 同一 `Context` 上的参数写入覆盖同名键，多张路由表并存时请避免参数名冲突；
/// - 结构体本身 `Send + Sync`，可先以 `Arc` 交给编排器，再继续通过原句柄注册路由。
pub struct RouteTable {
    table: ArcSwap<Vec<RouteRegistration>>,
    fallback: Option<Arc<dyn Middleware>>,
    strict: bool,
}

impl RouteTable {
    pub fn new() -> Self {
        Self {
            table: ArcSwap::from_pointee(Vec::new()),
            fallback: None,
            strict: false,
        }
    }

    /// 未命中任何路由时执行的处理器；优先于严格模式。
    pub fn with_fallback<M: Middleware>(mut self, fallback: M) -> Self {
        self.fallback = Some(Arc::new(fallback));
        self
    }

    /// 未命中且无回退处理器时返回 404。
    pub fn strict(mut self) -> Self {
        self.strict = true;
        self
    }

    /// 解析模式并追加一条响应全部方法的路由。
    pub fn route<M: Middleware>(&self, pattern: &str, handler: M) -> Result<&Self, NavError> {
        Ok(self.register(RouteRegistration::new(pattern, handler)?))
    }

    /// 追加一条路由记录；对后续调用立即可见。
    pub fn register(&self, registration: RouteRegistration) -> &Self {
        self.table.rcu(|current| {
            let mut next = Vec::with_capacity(current.len() + 1);
            next.extend(current.iter().cloned());
            next.push(registration.clone());
            next
        });
        self
    }

    /// 整表替换。
    pub fn update<I>(&self, entries: I)
    where
        I: IntoIterator<Item = RouteRegistration>,
    {
        let entries: Vec<RouteRegistration> = entries.into_iter().collect();
        tracing::debug!(routes = entries.len(), "route table replaced");
        self.table.store(Arc::new(entries));
    }

    pub fn len(&self) -> usize {
        self.table.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.load().is_empty()
    }

    /// 查找首个匹配的路由，返回其处理器与提取出的参数。
    pub fn resolve(
        &self,
        method: Method,
        path: &str,
    ) -> Option<(RouteRegistration, BTreeMap<String, String>)> {
        let table = self.table.load();
        table
            .iter()
            .filter(|entry| entry.accepts(method))
            .find_map(|entry| entry.pattern.matches(path).map(|params| (entry.clone(), params)))
    }
}

impl Default for RouteTable {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.len())
            .field("fallback", &self.fallback.is_some())
            .field("strict", &self.strict)
            .finish()
    }
}

#[async_trait]
impl Middleware for RouteTable {
    async fn handle(&self, ctx: Arc<Context>) -> Result<(), NavError> {
        if let Some((entry, params)) = self.resolve(ctx.method(), ctx.path()) {
            tracing::debug!(
                pattern = entry.pattern.as_str(),
                path = ctx.path(),
                "route matched"
            );
            ctx.request().extend_params(params);
            return entry.handler.handle(ctx).await;
        }
        if let Some(fallback) = &self.fallback {
            return fallback.handle(ctx).await;
        }
        if self.strict {
            return Err(NavError::not_found(format!(
                "no route matches `{}`",
                ctx.path()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parameters_and_wildcards_are_extracted() {
        let users = RoutePattern::parse("/users/:id").expect("合法模式");
        let params = users.matches("/users/7").expect("应当命中");
        assert_eq!(params.get("id").map(String::as_str), Some("7"));
        assert!(users.matches("/users").is_none());
        assert!(users.matches("/users/7/edit").is_none());

        let files = RoutePattern::parse("/files/*").expect("合法模式");
        let params = files.matches("/files/a/b.txt").expect("应当命中");
        assert_eq!(params.get(WILDCARD_PARAM).map(String::as_str), Some("a/b.txt"));

        let named = RoutePattern::parse("/static/*path").expect("合法模式");
        let params = named.matches("/static/css/site.css").expect("应当命中");
        assert_eq!(params.get("path").map(String::as_str), Some("css/site.css"));
    }

    #[test]
    fn root_pattern_matches_only_root() {
        let root = RoutePattern::parse("/").expect("合法模式");
        assert!(root.matches("/").is_some());
        assert!(root.matches("/a").is_none());
    }

    #[test]
    fn malformed_patterns_are_rejected() {
        let unnamed = RoutePattern::parse("/users/:").expect_err("空参数名");
        assert_eq!(unnamed.status(), 400);
        let misplaced = "/files/*/meta".parse::<RoutePattern>().expect_err("通配符不在末尾");
        assert_eq!(misplaced.status(), 400);
    }
}
