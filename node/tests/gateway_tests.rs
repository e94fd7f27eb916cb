use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde_json::json;
use std::sync::Arc;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use revenant_core::ledger::{LedgerError, LedgerReader, LedgerWriter};
use revenant_core::revival::{RevivalProtocol, RevivalStatus};
use revenant_core::ErrorKind;
use revenant_node::config::NodeConfig;
use revenant_node::ledger_store::{FallbackReader, ObjectLedger};
use revenant_node::network::{http_client, GatewayClient};
use revenant_node::server::{build_router, AppState};

const TX_ID: &str = "bNbA3TEQVL60xlgCcqdz4ZPHFZ711cZ3hmkpGttDt_U";

fn encode(s: &str) -> String {
    URL_SAFE_NO_PAD.encode(s)
}

async fn mount_entry(server: &MockServer, data: &str) {
    Mock::given(method("GET"))
        .and(path(format!("/{}", TX_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_string(data))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/tx/{}", TX_ID)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": TX_ID,
            "tags": [
                { "name": encode("App-Name"), "value": encode("RevenantBridge") },
                { "name": encode("Type"), "value": encode("AgentState") }
            ]
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_reads_data_and_decodes_tags() {
    let server = MockServer::start().await;
    mount_entry(&server, "hello").await;

    let gateway = GatewayClient::new(format!("{}/", server.uri()), http_client(5).unwrap());
    assert_eq!(gateway.read(TX_ID).await.unwrap(), b"hello".to_vec());

    let tags = gateway.tags(TX_ID).await.unwrap();
    assert_eq!(tags.len(), 2);
    assert_eq!(tags[0].name, "App-Name");
    assert_eq!(tags[0].value, "RevenantBridge");
}

#[tokio::test]
async fn test_missing_and_pending_are_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/tx/pending"))
        .respond_with(ResponseTemplate::new(202).set_body_string("Pending"))
        .mount(&server)
        .await;

    let gateway = GatewayClient::new(server.uri(), http_client(5).unwrap());
    assert!(matches!(gateway.read("missing").await, Err(LedgerError::NotFound(_))));
    assert!(matches!(gateway.tags("pending").await, Err(LedgerError::NotFound(_))));
}

#[tokio::test]
async fn test_malformed_ids_never_leave_the_process() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = GatewayClient::new(server.uri(), http_client(5).unwrap());
    assert!(matches!(gateway.read("../etc/passwd").await, Err(LedgerError::NotFound(_))));
    assert!(matches!(gateway.read("a b").await, Err(LedgerError::NotFound(_))));
}

#[tokio::test]
async fn test_revival_through_gateway() {
    let server = MockServer::start().await;
    let payload = r#"{"version":"1.0","timestamp":"2024-03-01T08:00:00.000Z","files":[{"path":"MEMORY.md","content":"remember"}],"metadata":{"source":"RevenantBridge"}}"#;
    mount_entry(&server, payload).await;

    let gateway = Arc::new(GatewayClient::new(server.uri(), http_client(5).unwrap()));
    let revival = RevivalProtocol::new(gateway);

    let revived = revival.revive(TX_ID).await.unwrap();
    assert_eq!(revived.status, RevivalStatus::Success);
    assert_eq!(revived.state.files.unwrap()[0].content, "remember");
    assert_eq!(revived.metadata.tags["Type"], "AgentState");
}

#[tokio::test]
async fn test_revival_of_html_error_page_is_corrupt() {
    let server = MockServer::start().await;
    mount_entry(&server, "<html>not a payload</html>").await;

    let revival = RevivalProtocol::new(Arc::new(GatewayClient::new(server.uri(), http_client(5).unwrap())));
    let err = revival.revive(TX_ID).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RevivalCorrupt);
}

#[tokio::test]
async fn test_fallback_reader_prefers_primary_and_falls_back_on_not_found() {
    let server = MockServer::start().await;
    let payload = r#"{"version":"1.0","timestamp":"2024-03-01T08:00:00.000Z","files":[{"path":"MEMORY.md","content":"from arweave"}],"metadata":{}}"#;
    mount_entry(&server, payload).await;

    let ledger = Arc::new(ObjectLedger::memory().unwrap());
    let gateway = Arc::new(GatewayClient::new(server.uri(), http_client(5).unwrap()));
    let reader = FallbackReader::new(ledger.clone(), gateway);

    let local = ledger.write(b"local".to_vec(), &[])
        .await
        .unwrap();
    assert_eq!(reader.read(&local.id).await.unwrap(), b"local".to_vec());
    assert_eq!(reader.read(TX_ID).await.unwrap(), payload.as_bytes().to_vec());
    assert_eq!(reader.tags(TX_ID).await.unwrap()[1].value, "AgentState");
}

#[tokio::test]
async fn test_live_node_revives_gateway_only_id() {
    let server = MockServer::start().await;
    let payload = r#"{"version":"1.0","timestamp":"2024-03-01T08:00:00.000Z","files":[{"path":"MEMORY.md","content":"from arweave"}],"metadata":{}}"#;
    mount_entry(&server, payload).await;

    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_string_lossy().into_owned();
    let uri = server.uri();
    let cfg = NodeConfig::from_lookup(|key| match key {
        "LEDGER_FS_ROOT" => Some(root.clone()),
        "ARWEAVE_GATEWAY_URL" => Some(uri.clone()),
        _ => None,
    })
    .unwrap();

    let state = AppState::from_config(&cfg).unwrap();
    assert!(state.salvage.is_live());
    let app = build_router(state, None);

    let req = axum::http::Request::builder()
        .method("POST")
        .uri("/revive")
        .header("content-type", "application/json")
        .body(axum::body::Body::from(json!({ "id": TX_ID }).to_string()))
        .unwrap();
    let response = tower::ServiceExt::oneshot(app, req).await.unwrap();
    assert_eq!(response.status(), axum::http::StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024).await.unwrap();
    let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "success");
    assert_eq!(body["state"]["files"][0]["content"], "from arweave");
}
