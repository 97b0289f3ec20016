use mock_service::MockState;
use std::sync::OnceLock;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[allow(unused)]
pub fn init() {
    static ONCE_LOCK: OnceLock<()> = OnceLock::new();

    ONCE_LOCK.get_or_init(|| {
        let _ = FmtSubscriber::builder()
            .with_env_filter(
                EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| EnvFilter::new("vecload=debug,mock_service=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Start a mock service on an ephemeral port and return its base URL.
#[allow(unused)]
pub async fn mock(state: MockState) -> String {
    init();
    let addr = mock_service::spawn(state)
        .await
        .expect("mock service failed to bind");
    tracing::debug!("Mock service at {addr}");
    format!("http://{addr}")
}
