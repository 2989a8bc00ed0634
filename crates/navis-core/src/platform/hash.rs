use std::sync::Arc;

use super::{AddressStrategy, Host};
use crate::config::EventMode;

/// 片段寻址：网络地址保存在 `#` 之后。
pub struct HashStrategy {
    host: Arc<dyn Host>,
}

impl HashStrategy {
    pub fn new(host: Arc<dyn Host>) -> Self {
        Self { host }
    }
}

impl AddressStrategy for HashStrategy {
    fn mode(&self) -> EventMode {
        EventMode::HashChange
    }

    fn read(&self, prefix: &str) -> String {
        let hash = self.host.hash();
        match hash.strip_prefix('#') {
            Some(fragment) if !fragment.is_empty() => fragment.to_owned(),
            _ => prefix.to_owned(),
        }
    }

    fn push(&self, address: &str, _title: &str) {
        self.host.set_hash(address);
    }

    fn replace(&self, address: &str, _title: &str) {
        let href = self.host.href();
        let base = href.split_once('#').map_or(href.as_str(), |(base, _)| base);
        self.host.location_replace(&format!("{base}#{address}"));
    }
}
