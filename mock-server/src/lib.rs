use std::time::Duration;

use axum::{
    extract::Path,
    http::{Method, StatusCode},
    response::Redirect,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Widget {
    pub id: i64,
    pub name: String,
}

/// A widget with the `name` field left out.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PartialWidget {
    pub id: i64,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
}

pub fn app() -> Router {
    Router::new()
        .route("/widgets/{id}", get(get_widget))
        .route("/widgets/{id}/partial", get(get_partial_widget))
        .route("/garbage", get(garbage))
        .route("/slow/{ms}", get(slow))
        .route("/echo", any(echo))
        .route("/missing", get(missing))
        .route("/loop", get(redirect_loop))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn get_widget(Path(id): Path<i64>) -> Json<Widget> {
    Json(Widget {
        id,
        name: "widget".to_string(),
    })
}

async fn get_partial_widget(Path(id): Path<i64>) -> Json<PartialWidget> {
    Json(PartialWidget { id })
}

async fn garbage() -> &'static str {
    "not json"
}

async fn slow(Path(ms): Path<u64>) -> Json<Widget> {
    tracing::debug!(ms, "delaying response");
    tokio::time::sleep(Duration::from_millis(ms)).await;
    Json(Widget {
        id: 0,
        name: "slow".to_string(),
    })
}

async fn echo(method: Method) -> Json<Echo> {
    Json(Echo {
        method: method.as_str().to_string(),
    })
}

async fn missing() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": "not found" })),
    )
}

async fn redirect_loop() -> Redirect {
    Redirect::temporary("/loop")
}
