#![allow(dead_code, missing_docs, clippy::expect_used)]
use std::collections::HashMap;
use std::net::{SocketAddr, TcpListener};
use std::sync::LazyLock;
use std::thread;

use axum::extract::{Form, Json, Path, Query};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::{get, post};
use axum::Router;
use serde_json::{Value, json};
use tracing::info;

pub fn init_tracing() {
    // should be run once, fail otherwise, we skip that error
    let _ = tracing_subscriber::fmt()
        .pretty()
        .with_max_level(tracing::Level::DEBUG)
        .with_test_writer()
        .try_init();

    info!("Tracing initialized");
}

/// Address of the echo server, started on first use and shared by all tests.
pub static SERVER: LazyLock<SocketAddr> = LazyLock::new(|| {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind a random port");
    let addr = listener.local_addr().expect("local address");
    listener.set_nonblocking(true).expect("set non-blocking");

    thread::spawn(move || {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .expect("tokio runtime");
        runtime.block_on(async move {
            let listener = tokio::net::TcpListener::from_std(listener).expect("valid listener");
            info!(?listener, "launching echo server");
            axum::serve(listener, router()).await.expect("server launched");
        });
    });

    addr
});

pub fn url(path: &str) -> String {
    format!("http://{}{path}", *SERVER)
}

fn router() -> Router {
    Router::new()
        .route("/items", post(create_item))
        .route("/items/{id}", get(get_item))
        .route("/login", post(login))
        .route("/broken", get(broken))
}

async fn get_item(
    Path(id): Path<u64>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<Value> {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Json(json!({
        "Id": id,
        "Lang": query.get("lang"),
        "Version": header("x-version"),
        "Cookie": header("cookie"),
    }))
}

async fn create_item(Json(body): Json<Value>) -> (StatusCode, Json<Value>) {
    let item = json!({
        "Id": 1,
        "Label": body.get("label"),
    });
    (StatusCode::CREATED, Json(item))
}

async fn login(Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    Json(json!({ "User": form.get("username") }))
}

async fn broken() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
}
