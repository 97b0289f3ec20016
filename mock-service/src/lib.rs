//! Stand-in for the vector service. Accepts any body on `POST /vector/` and remembers it.
use axum::{
    body::Bytes,
    debug_handler,
    extract::State,
    http::{header::CONTENT_TYPE, HeaderMap, StatusCode},
    routing::{get, post},
    Router,
};
#[allow(unused)]
use metrics::{counter, gauge, histogram};
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc, Mutex, PoisonError,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

#[derive(Debug, Clone)]
pub struct ReceivedRequest {
    pub body: Bytes,
    pub content_type: Option<String>,
}

#[derive(Clone, Default)]
pub struct MockState {
    inner: Arc<Inner>,
}

#[derive(Default)]
struct Inner {
    keep_bodies: bool,
    failing: AtomicBool,
    count: AtomicU64,
    tps: AtomicU64,
    received: Mutex<Vec<ReceivedRequest>>,
}

impl MockState {
    /// State that keeps every request body.
    pub fn recording() -> Self {
        Self {
            inner: Arc::new(Inner {
                keep_bodies: true,
                ..Default::default()
            }),
        }
    }

    /// State that only counts requests.
    pub fn counting() -> Self {
        Self::default()
    }

    /// Answer `/vector/` with 500 while set.
    pub fn set_failing(&self, failing: bool) {
        self.inner.failing.store(failing, Ordering::Relaxed);
    }

    pub fn request_count(&self) -> u64 {
        self.inner.count.load(Ordering::Relaxed)
    }

    pub fn received(&self) -> Vec<ReceivedRequest> {
        self.inner
            .received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

pub fn router(state: MockState) -> Router {
    Router::new()
        .route("/vector/", post(vector))
        .route("/health", get(health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub async fn run(addr: SocketAddr, state: MockState) -> anyhow::Result<()> {
    let listener = TcpListener::bind(&addr).await?;
    serve(listener, state).await
}

pub async fn serve(listener: TcpListener, state: MockState) -> anyhow::Result<()> {
    info!("Mock service listening on {}", listener.local_addr()?);
    axum::serve(listener, router(state)).await?;
    Ok(())
}

/// Serve on an ephemeral localhost port in the background and return its address.
pub async fn spawn(state: MockState) -> anyhow::Result<SocketAddr> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(err) = serve(listener, state).await {
            tracing::error!("Mock service stopped: {err}");
        }
    });
    Ok(addr)
}

#[debug_handler]
async fn vector(State(state): State<MockState>, headers: HeaderMap, body: Bytes) -> StatusCode {
    counter!("mock-service.requests").increment(1);
    state.inner.count.fetch_add(1, Ordering::Relaxed);
    state.inner.tps.fetch_add(1, Ordering::Relaxed);

    debug!("Received {} byte vector payload", body.len());
    if state.inner.keep_bodies {
        let content_type = headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        state
            .inner
            .received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(ReceivedRequest { body, content_type });
    }

    if state.inner.failing.load(Ordering::Relaxed) {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    }
}

async fn health() -> StatusCode {
    StatusCode::OK
}

/** TPS Printer **/

pub async fn tps_measure_task(state: MockState) {
    loop {
        tokio::time::sleep(Duration::from_millis(1000)).await;
        let transactions = state.inner.tps.swap(0, Ordering::Relaxed);
        info!("{transactions} TPS");
    }
}
