//! Mock sealing service on an ephemeral port

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use parking_lot::Mutex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

#[derive(Deserialize)]
struct SealQuery {
    #[allow(dead_code)]
    cid: String,
    #[allow(dead_code)]
    session_key: String,
    is_link: bool,
}

#[derive(Deserialize)]
struct UnsealBody {
    path: String,
}

/// Stores sealed blocks in memory; can be told to refuse everything
#[derive(Default)]
pub struct MockService {
    blocks: Mutex<HashMap<String, Bytes>>,
    refuse: AtomicBool,
}

impl MockService {
    pub fn refuse_all(&self) {
        self.refuse.store(true, Ordering::SeqCst);
    }

    pub fn sealed_count(&self) -> usize {
        self.blocks.lock().len()
    }
}

async fn seal(State(svc): State<Arc<MockService>>, Query(q): Query<SealQuery>, body: Bytes) -> Response {
    if svc.refuse.load(Ordering::SeqCst) {
        return Json(serde_json::json!({ "path": "", "message": "sealing paused", "status_code": 1 }))
            .into_response();
    }
    // end of session carries no block
    if q.is_link && body.is_empty() {
        return Json(serde_json::json!({ "path": "", "message": "", "status_code": 0 })).into_response();
    }
    let mut blocks = svc.blocks.lock();
    let path = format!("/sealed/{}", blocks.len());
    blocks.insert(path.clone(), body);
    Json(serde_json::json!({ "path": path, "message": "", "status_code": 0 })).into_response()
}

async fn unseal(State(svc): State<Arc<MockService>>, Json(req): Json<UnsealBody>) -> Response {
    match svc.blocks.lock().get(&req.path) {
        Some(data) => data.clone().into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Serve the mock; returns its state and the base URL for `endpoint`
pub async fn spawn() -> (Arc<MockService>, String) {
    let svc = Arc::new(MockService::default());
    let app = Router::new()
        .route("/api/v0/storage/seal", post(seal))
        .route("/api/v0/storage/unseal", post(unseal))
        .with_state(svc.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (svc, format!("http://{addr}/api/v0"))
}
