use std::sync::Arc;

use super::{AddressStrategy, Host};
use crate::config::EventMode;

/// 历史条目寻址：网络地址即 href 去掉 origin 的部分。
pub struct HistoryStrategy {
    host: Arc<dyn Host>,
}

impl HistoryStrategy {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }
}

impl AddressStrategy for HistoryStrategy {
    fn mode(&self) -> EventMode {
        EventMode::PopState
    }

    fn read(&self, prefix: &str) -> String {
        let href = self.host.href();
        let origin = self.host.origin();
        match href.strip_prefix(origin.as_str()) {
            Some(rest) if !rest.is_empty() => rest.to_owned(),
            _ => prefix.to_owned(),
        }
    }

    fn push(&self, address: &str, title: &str) {
        self.host.push_state(title, address);
    }

    fn replace(&self, address: &str, title: &str) {
        self.host.replace_state(title, address);
    }
}
