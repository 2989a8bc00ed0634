//! 路由表中间件与编排器的集成行为。

use std::sync::Arc;

use navis_core::{MemoryHost, Method, Middleware, NavError, Navigator, from_fn};
use navis_middleware::{RouteRegistration, RouteTable};
use serde_json::{Value, json};

fn navigator_with(table: Arc<RouteTable>) -> Navigator {
    let host = Arc::new(MemoryHost::new("http://localhost/").expect("合法地址"));
    let navigator = Navigator::builder(host).build();
    navigator.callback([table as Arc<dyn Middleware>]);
    navigator
}

fn echo_params() -> impl Middleware {
    from_fn(|ctx| async move {
        ctx.set_body(json!(ctx.params()));
        Ok(())
    })
}

#[tokio::test]
async fn matched_route_receives_params() {
    let table = Arc::new(RouteTable::new());
    table
        .route("/users/:id", echo_params())
        .and_then(|table| table.route("/files/*", echo_params()))
        .expect("模式合法");
    let navigator = navigator_with(Arc::clone(&table));

    let body = navigator.bootstrap("/users/42?tab=posts").await;
    assert_eq!(body, Ok(Some(json!({ "id": "42" }))));

    let body = navigator
        .request("/files/docs/readme.md", Method::Get, Value::Null)
        .await;
    assert_eq!(body, Ok(Some(json!({ "*": "docs/readme.md" }))));
}

#[tokio::test]
async fn unmatched_route_is_ignored_unless_strict() {
    let lenient = Arc::new(RouteTable::new());
    lenient.route("/users/:id", echo_params()).expect("模式合法");
    let navigator = navigator_with(lenient);
    assert_eq!(navigator.bootstrap("/nowhere").await, Ok(Some(Value::Null)));

    let strict = Arc::new(RouteTable::new().strict());
    strict.route("/users/:id", echo_params()).expect("模式合法");
    let navigator = navigator_with(strict);
    let missing = navigator.bootstrap("/nowhere").await;
    assert_eq!(missing.map_err(|err| err.status()), Err(404));
}

#[tokio::test]
async fn fallback_handles_misses() {
    let table = Arc::new(RouteTable::new().strict().with_fallback(from_fn(|ctx| async move {
        ctx.set_body(json!({ "missing": ctx.path() }));
        Ok(())
    })));
    let navigator = navigator_with(table);
    let body = navigator.bootstrap("/gone").await;
    assert_eq!(body, Ok(Some(json!({ "missing": "/gone" }))));
}

#[tokio::test]
async fn method_scoped_routes_and_hot_updates() {
    let table = Arc::new(RouteTable::new().strict());
    table.register(
        RouteRegistration::new(
            "/api/items/:id",
            from_fn(|ctx| async move {
                ctx.set_body(json!({ "deleted": ctx.request().param("id") }));
                Ok(())
            }),
        )
        .expect("模式合法")
        .method(Method::Delete),
    );
    let navigator = navigator_with(Arc::clone(&table));

    let deleted = navigator
        .request("/api/items/9", Method::Delete, Value::Null)
        .await;
    assert_eq!(deleted, Ok(Some(json!({ "deleted": "9" }))));

    let fetched = navigator
        .request("/api/items/9", Method::Get, Value::Null)
        .await;
    assert_eq!(fetched.map_err(|err| err.status()), Err(404));

    table.update([RouteRegistration::new(
        "/api/items/:id",
        from_fn(|_ctx| async { Err(NavError::new(409, "locked")) }),
    )
    .expect("模式合法")]);
    assert_eq!(table.len(), 1);
    let locked = navigator
        .request("/api/items/9", Method::Get, Value::Null)
        .await;
    assert_eq!(locked.map_err(|err| err.status()), Err(409));
}
