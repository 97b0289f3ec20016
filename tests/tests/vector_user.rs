mod utils;
use utils::*;

use mock_service::MockState;
use reqwest::Client;
use serde_json::Value;
use vecload::parse_host;
use vecload::prelude::*;

async fn user(state: MockState) -> VectorUser {
    let host = mock(state).await;
    let ctx = UserContext::new(Client::new(), parse_host(&host).unwrap());
    VectorUser::on_start(ctx).unwrap()
}

#[tokio::test]
async fn small_payload_posts_once() {
    let state = MockState::recording();
    let user = user(state.clone()).await;

    user.send_small_payload().await.unwrap();

    let received = state.received();
    assert_eq!(received.len(), 1);
    assert_eq!(state.request_count(), 1);

    // Raw body, no custom headers.
    assert_eq!(received[0].content_type, None);

    let body: Value = serde_json::from_slice(&received[0].body).unwrap();
    let object = body.as_object().unwrap();
    assert_eq!(object.len(), 3);
    assert_eq!(object["a"].as_array().unwrap().len(), 10);
    assert_eq!(object["b"].as_array().unwrap().len(), 10);
    assert_eq!(object["op"], "dot");
    assert!(object["a"].as_array().unwrap().iter().all(Value::is_f64));
}

#[tokio::test]
async fn every_task_posts_its_payload() {
    let state = MockState::recording();
    let mut user = user(state.clone()).await;

    for size in PayloadSize::ALL {
        user.execute(size).await;
    }

    let received = state.received();
    assert_eq!(received.len(), 3);

    for (request, size) in received.iter().zip(PayloadSize::ALL) {
        assert_eq!(request.body, user.payloads().get(size).as_bytes());

        let payload: Payload = serde_json::from_slice(&request.body).unwrap();
        assert_eq!(payload.a.len(), size.len());
        assert_eq!(payload.b.len(), size.len());
        assert_eq!(payload.op, size.op());
    }
}

#[tokio::test]
async fn payloads_are_reused_between_requests() {
    let state = MockState::recording();
    let user = user(state.clone()).await;

    user.send_large_payload().await.unwrap();
    user.send_large_payload().await.unwrap();

    let received = state.received();
    assert_eq!(received.len(), 2);
    assert_eq!(received[0].body, received[1].body);
}

#[tokio::test]
async fn server_errors_fail_the_transaction() {
    let state = MockState::recording();
    state.set_failing(true);
    let user = user(state.clone()).await;

    let err = user.send_medium_payload().await.unwrap_err();
    assert_eq!(err.status(), Some(reqwest::StatusCode::INTERNAL_SERVER_ERROR));
    assert_eq!(state.request_count(), 1);
}

#[tokio::test]
async fn separate_users_send_different_vectors() {
    let state = MockState::recording();
    let first = user(state.clone()).await;
    let second = user(state.clone()).await;

    first.send_small_payload().await.unwrap();
    second.send_small_payload().await.unwrap();

    let received = state.received();
    assert_ne!(received[0].body, received[1].body);
}
