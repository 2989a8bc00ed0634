//! 全局安装只能发生一次；安装后编排器的 span 与事件经由全局 Subscriber 输出。

use std::sync::Arc;

use navis_core::{MemoryHost, Navigator};
use navis_telemetry::{Error, install, install_with, installed_directives};

#[tokio::test]
async fn install_is_idempotent_and_drives_navigation_logs() {
    assert!(installed_directives().is_none());
    install_with("warn,navis_core=debug").expect("首次安装应成功");
    assert!(installed_directives().is_some());

    assert!(matches!(install(), Err(Error::AlreadyInstalled)));
    assert!(matches!(
        install_with("debug"),
        Err(Error::AlreadyInstalled)
    ));

    let host = Arc::new(MemoryHost::new("http://localhost/").expect("合法地址"));
    let navigator = Navigator::builder(host).build();
    navigator.bootstrap("/telemetry").await.expect("导航应成功");
    assert_eq!(navigator.referer().as_deref(), Some("/telemetry"));
}
