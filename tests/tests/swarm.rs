mod utils;
use utils::*;

use mock_service::MockState;
use std::num::{NonZeroU32, NonZeroUsize};
use std::time::Duration;
use vecload::prelude::*;
use vecload::{ConfigError, Error};

fn fast_swarm(host: String) -> Swarm<VectorUser> {
    Swarm::new("vector")
        .host(host)
        .spawn_rate(NonZeroU32::new(100).unwrap())
        .wait(Duration::ZERO, Duration::from_millis(5))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn swarm_drives_all_three_transactions() {
    let state = MockState::counting();
    let host = mock(state.clone()).await;

    let stats = fast_swarm(host)
        .users(NonZeroUsize::new(3).unwrap())
        .run_time(Duration::from_millis(1_500))
        .await
        .unwrap();

    assert_eq!(stats.users, 3);
    for name in [
        "send_small_payload",
        "send_medium_payload",
        "send_large_payload",
    ] {
        let transaction = stats.transaction(name).unwrap();
        assert!(transaction.success > 0, "{name} never succeeded");
        assert_eq!(transaction.error, 0);
    }

    assert_eq!(stats.total.error, 0);
    // Requests aborted mid-flight at shutdown reach the server but are not counted.
    assert!(state.request_count() >= stats.total.total());
}

#[tokio::test]
async fn swarm_counts_failures() {
    let state = MockState::counting();
    state.set_failing(true);
    let host = mock(state.clone()).await;

    let stats = fast_swarm(host)
        .run_time(Duration::from_millis(500))
        .await
        .unwrap();

    assert_eq!(stats.total.success, 0);
    assert!(stats.total.error > 0);
    assert_eq!(stats.total.error_rate, 1.);
}

#[tokio::test]
async fn weights_restrict_tasks() {
    let state = MockState::recording();
    let host = mock(state.clone()).await;

    let stats = fast_swarm(host)
        .tasks(VectorUser::task_set([1, 0, 0]).unwrap())
        .run_time(Duration::from_millis(500))
        .await
        .unwrap();

    assert!(stats.transaction("send_small_payload").is_some());
    assert!(stats.transaction("send_medium_payload").is_none());
    assert!(stats.transaction("send_large_payload").is_none());

    for request in state.received() {
        let payload: Payload = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(payload.op, Op::Dot);
    }
}

#[tokio::test]
async fn unreachable_host_counts_errors() {
    init();
    // Bind and drop to find a port with nothing listening.
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        listener.local_addr().unwrap().port()
    };

    let stats = fast_swarm(format!("http://127.0.0.1:{port}"))
        .run_time(Duration::from_millis(300))
        .await
        .unwrap();

    assert_eq!(stats.total.success, 0);
    assert!(stats.total.error > 0);
}

#[tokio::test]
async fn bad_host_is_a_config_error() {
    let res = fast_swarm("not a url".to_string())
        .run_time(Duration::from_millis(10))
        .await;

    assert!(matches!(res, Err(Error::Config(ConfigError::InvalidHost(_)))));
}

#[tokio::test]
async fn dropped_swarm_stops_its_users() {
    let state = MockState::counting();
    let host = mock(state.clone()).await;

    let res = tokio::time::timeout(
        Duration::from_millis(300),
        fast_swarm(host)
            .users(NonZeroUsize::new(3).unwrap())
            .run_time(Duration::from_secs(60)),
    )
    .await;
    assert!(res.is_err(), "swarm finished before being dropped");

    // Let requests that were already in flight land.
    tokio::time::sleep(Duration::from_millis(100)).await;
    let at_drop = state.request_count();
    assert!(at_drop > 0);

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(state.request_count(), at_drop);
}
