use axum::{
    extract::{Path, RawQuery},
    http::{HeaderMap, Method, StatusCode},
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

/// What the server saw, echoed back as JSON.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Echo {
    pub method: String,
    pub query: Vec<(String, String)>,
    pub form: Vec<(String, String)>,
    pub content_type: Option<String>,
    pub user_agent: Option<String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", any(echo))
        .route("/status/{code}", get(status).post(status))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn echo(
    method: Method,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
    body: String,
) -> Result<Json<Echo>, StatusCode> {
    let query = decode_pairs(query.as_deref().unwrap_or(""))?;
    let form = decode_pairs(&body)?;
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    Ok(Json(Echo {
        method: method.as_str().to_string(),
        query,
        form,
        content_type: header("content-type"),
        user_agent: header("user-agent"),
    }))
}

async fn status(Path(code): Path<u16>) -> Result<(StatusCode, String), StatusCode> {
    let status = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    Ok((status, format!("status {code}")))
}

fn decode_pairs(raw: &str) -> Result<Vec<(String, String)>, StatusCode> {
    serde_urlencoded::from_str(raw).map_err(|_| StatusCode::UNPROCESSABLE_ENTITY)
}
