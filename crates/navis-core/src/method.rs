use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::NavError;

/// 一次调用的方法标签。
///
/// `Router` 代表导航：参与去重、更新 referer 并回写地址栏；其余四个动词只借用同一条
/// 中间件链路，不触碰任何路由状态。
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    Router,
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    /// 是否为导航类调用。
    pub fn is_router(self) -> bool {
        matches!(self, Method::Router)
    }

    /// 小写标签，与日志字段保持一致。
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Router => "router",
            Method::Get => "get",
            Method::Post => "post",
            Method::Put => "put",
            Method::Delete => "delete",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = NavError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "router" => Ok(Method::Router),
            "get" => Ok(Method::Get),
            "post" => Ok(Method::Post),
            "put" => Ok(Method::Put),
            "delete" => Ok(Method::Delete),
            other => Err(NavError::method_not_allowed(format!(
                "unrecognized method `{other}`"
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::status;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!("POST".parse::<Method>(), Ok(Method::Post));
        assert_eq!("router".parse::<Method>(), Ok(Method::Router));
    }

    #[test]
    fn unknown_method_is_rejected_with_405() {
        let err = "patch".parse::<Method>().expect_err("patch 不在方法集合内");
        assert_eq!(err.status(), status::METHOD_NOT_ALLOWED);
    }

    #[test]
    fn only_router_is_navigation() {
        assert!(Method::Router.is_router());
        assert!(!Method::Get.is_router());
        assert!(!Method::Delete.is_router());
    }
}
