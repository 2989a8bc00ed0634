//! 平台适配层：策略选择、降级与读写语义。

use std::sync::Arc;

use navis_core::{EventMode, Host, MemoryHost, Navigator, Platform, Write};

fn host(href: &str) -> Arc<MemoryHost> {
    Arc::new(MemoryHost::new(href).expect("测试地址必须合法"))
}

#[test]
fn popstate_falls_back_to_hash_without_history_api() {
    let host = Arc::new(
        MemoryHost::new("http://localhost/")
            .expect("合法地址")
            .without_history(),
    );
    let platform = Platform::select(host, String::from("/"), EventMode::PopState);
    assert_eq!(platform.mode(), EventMode::HashChange);
}

#[test]
fn file_scheme_always_uses_hash_addressing() {
    let platform = Platform::select(
        host("file:///srv/app/index.html"),
        String::from("/"),
        EventMode::PopState,
    );
    assert_eq!(platform.mode(), EventMode::HashChange);

    let navigator = Navigator::builder(host("file:///srv/app/index.html"))
        .event(EventMode::PopState)
        .build();
    assert_eq!(navigator.event(), EventMode::HashChange);
}

#[test]
fn supported_popstate_is_kept() {
    let platform = Platform::select(host("http://localhost/"), String::from("/"), EventMode::PopState);
    assert_eq!(platform.mode(), EventMode::PopState);
}

#[test]
fn hash_read_falls_back_to_prefix() {
    let platform = Platform::select(
        host("http://localhost/index.html"),
        String::from("/app/"),
        EventMode::HashChange,
    );
    assert_eq!(platform.current_path(), "/");

    let platform = Platform::select(
        host("http://localhost/index.html#/app/users/7?tab=1"),
        String::from("/app/"),
        EventMode::HashChange,
    );
    assert_eq!(platform.current_path(), "/users/7?tab=1");
}

#[test]
fn history_read_strips_origin_and_prefix() {
    let platform = Platform::select(
        host("http://localhost:8080/app/users/7?tab=1"),
        String::from("/app/"),
        EventMode::PopState,
    );
    assert_eq!(platform.current_path(), "/users/7?tab=1");
}

#[test]
fn hash_writes_push_and_replace() {
    let host = host("http://localhost/index.html?v=2#/old");
    let platform = Platform::select(Arc::clone(&host) as Arc<dyn Host>, String::from("/app/"), EventMode::HashChange);

    platform.write(Write::Replace, "/a", "A");
    assert_eq!(host.entries(), vec![String::from("http://localhost/index.html?v=2#/app/a")]);
    assert_eq!(host.title(), "A");

    platform.write(Write::Push, "/b", "");
    assert_eq!(host.entries().len(), 2);
    assert_eq!(host.hash(), "#/app/b");
    assert_eq!(host.title(), "A", "空标题保留宿主当前标题");

    platform.write(Write::Push, "/b", "B");
    assert_eq!(host.entries().len(), 2, "相同片段不新增条目");
    assert_eq!(host.writes(), 3);
}

#[test]
fn history_writes_push_and_replace() {
    let host = Arc::new(
        MemoryHost::new("http://localhost/app/")
            .expect("合法地址")
            .with_title("Home"),
    );
    let platform = Platform::select(Arc::clone(&host) as Arc<dyn Host>, String::from("/app/"), EventMode::PopState);

    platform.write(Write::Push, "/users/7", "User");
    assert_eq!(host.pathname(), "/app/users/7");
    assert_eq!(host.entries().len(), 2);
    assert_eq!(host.title(), "User");

    platform.write(Write::Replace, "/users/8", "");
    assert_eq!(host.pathname(), "/app/users/8");
    assert_eq!(host.entries().len(), 2);
    assert_eq!(host.title(), "User");
}
