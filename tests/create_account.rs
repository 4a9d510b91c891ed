//! End-to-end tests for the account-creation route.
//!
//! Each test stands up the real HTTP server on an ephemeral port with a mock
//! transaction submitter injected through the same seam production uses.

use serde_json::json;

mod common;

use common::MockSubmitter;

fn full_body() -> serde_json::Value {
    json!({
        "dealerID": "D1",
        "msisdn": "9999999999",
        "mpin": "1234",
        "balance": "100",
        "status": "active",
        "transAmount": "0",
        "transType": "init",
        "remarks": "new"
    })
}

#[tokio::test]
async fn test_successful_submission_returns_confirmation() {
    let submitter = MockSubmitter::succeeding(b"payload-ignored");
    let addr = common::start_gateway(submitter.clone()).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{}/createAccount", addr))
        .json(&full_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 200);
    assert_eq!(res.text().await.unwrap(), "Account created successfully");

    let calls = submitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].channel, "mychannel");
    assert_eq!(calls[0].chaincode, "mycontract");
    assert_eq!(
        calls[0].invocation,
        vec![
            "CreateAccount",
            "D1",
            "9999999999",
            "1234",
            "100",
            "active",
            "0",
            "init",
            "new"
        ]
    );
}

#[tokio::test]
async fn test_rejected_submission_returns_flat_500() {
    let submitter = MockSubmitter::rejecting("ENDORSEMENT_POLICY_FAILURE");
    let addr = common::start_gateway(submitter.clone()).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{}/createAccount", addr))
        .json(&full_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    assert_eq!(
        res.text().await.unwrap(),
        "Failed to create account: ENDORSEMENT_POLICY_FAILURE"
    );
    assert_eq!(submitter.call_count(), 1);
}

#[tokio::test]
async fn test_timeout_collapses_into_same_flat_500() {
    // No error classification: a timeout gets the same shape as a rejection.
    let submitter = MockSubmitter::timing_out(30);
    let addr = common::start_gateway(submitter.clone()).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{}/createAccount", addr))
        .json(&full_body())
        .send()
        .await
        .unwrap();

    assert_eq!(res.status(), 500);
    let body = res.text().await.unwrap();
    assert!(body.starts_with("Failed to create account: "));
    assert!(body.contains("timed out after 30 seconds"));
}

#[tokio::test]
async fn test_missing_field_is_forwarded_not_rejected() {
    let submitter = MockSubmitter::succeeding(b"");
    let addr = common::start_gateway(submitter.clone()).await;

    let mut body = full_body();
    body.as_object_mut().unwrap().remove("remarks");

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{}/createAccount", addr))
        .json(&body)
        .send()
        .await
        .unwrap();

    // No client-side validation: the submission still happens, with the
    // missing field forwarded as empty.
    assert_eq!(res.status(), 200);
    let calls = submitter.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].invocation.len(), 9);
    assert_eq!(calls[0].invocation[8], "");
}

#[tokio::test]
async fn test_each_request_performs_exactly_one_submission() {
    // No deduplication: identical requests submit independently.
    let submitter = MockSubmitter::succeeding(b"");
    let addr = common::start_gateway(submitter.clone()).await;

    let client = reqwest::Client::new();
    for _ in 0..2 {
        let res = client
            .post(format!("http://{}/createAccount", addr))
            .json(&full_body())
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), 200);
    }

    assert_eq!(submitter.call_count(), 2);
}

#[tokio::test]
async fn test_malformed_json_never_reaches_the_ledger() {
    let submitter = MockSubmitter::succeeding(b"");
    let addr = common::start_gateway(submitter.clone()).await;

    let client = reqwest::Client::new();
    let res = client
        .post(format!("http://{}/createAccount", addr))
        .header("content-type", "application/json")
        .body("{ not json")
        .send()
        .await
        .unwrap();

    assert!(res.status().is_client_error());
    assert_eq!(submitter.call_count(), 0);
}

#[tokio::test]
async fn test_no_other_routes_exist() {
    let submitter = MockSubmitter::succeeding(b"");
    let addr = common::start_gateway(submitter.clone()).await;

    let client = reqwest::Client::new();

    let res = client
        .get(format!("http://{}/createAccount", addr))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 405);

    let res = client
        .post(format!("http://{}/accounts", addr))
        .json(&full_body())
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), 404);

    assert_eq!(submitter.call_count(), 0);
}
