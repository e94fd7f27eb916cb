use serde_json::json;
use wiremock::{
    matchers::{body_partial_json, method},
    Mock, MockServer, ResponseTemplate,
};

use revenant_core::chain::{ChainError, ChainQuery};
use revenant_node::network::{http_client, SolanaRpcClient};

async fn client(server: &MockServer) -> SolanaRpcClient {
    SolanaRpcClient::new(server.uri(), "finalized", http_client(5).unwrap())
}

#[tokio::test]
async fn test_get_transaction_sends_json_parsed_request() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "jsonrpc": "2.0",
            "method": "getTransaction",
            "params": ["sig-1", { "encoding": "jsonParsed", "maxSupportedTransactionVersion": 0, "commitment": "finalized" }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "result": {
                "slot": 300,
                "blockTime": 1_710_000_000i64,
                "meta": { "err": null, "fee": 5000, "preBalances": [], "postBalances": [] },
                "transaction": {
                    "signatures": ["sig-1"],
                    "message": {
                        "accountKeys": [],
                        "recentBlockhash": "11111111111111111111111111111111",
                        "instructions": [
                            { "programId": "ComputeBudget111111111111111111111111111111", "accounts": [], "data": "3DTZbgwsozUF" },
                            { "programId": "TokenkegQfeZyiNwAJbNbGKPFXCWuBvf9Ss623VQ5DA", "program": "spl-token",
                              "parsed": { "type": "transfer", "info": { "destination": "d", "amount": "5" } } }
                        ]
                    }
                }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tx = client(&server).await.get_transaction("sig-1").await.unwrap().unwrap();
    assert_eq!(tx.slot, 300);
    assert_eq!(tx.block_time, Some(1_710_000_000));
    assert!(!tx.failed());
    assert_eq!(tx.instructions().len(), 2);
    assert!(tx.instructions()[0].parsed.is_none());
}

#[tokio::test]
async fn test_null_result_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 1, "result": null })))
        .mount(&server)
        .await;

    assert!(client(&server).await.get_transaction("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_rpc_error_object() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jsonrpc": "2.0",
            "id": 1,
            "error": { "code": -32602, "message": "Invalid param: WrongSize" }
        })))
        .mount(&server)
        .await;

    let err = client(&server).await.get_transaction("bad").await.unwrap_err();
    assert_eq!(
        err,
        ChainError::Rpc {
            code: -32602,
            message: "Invalid param: WrongSize".to_string()
        }
    );
}

#[tokio::test]
async fn test_http_failure_is_network_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let err = client(&server).await.get_transaction("sig").await.unwrap_err();
    assert!(matches!(err, ChainError::Network(_)));
}

#[tokio::test]
async fn test_garbage_body_is_decode_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client(&server).await.get_transaction("sig").await.unwrap_err();
    assert!(matches!(err, ChainError::Decode(_)));
}

#[tokio::test]
async fn test_response_without_result_key_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "jsonrpc": "2.0", "id": 7 })))
        .mount(&server)
        .await;

    let tx = client(&server).await.get_transaction("sig").await.unwrap();
    assert!(tx.is_none());
}
