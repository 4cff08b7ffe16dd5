//! Backend client tests against a mock transport

mod common;

use std::sync::Arc;

use common::MockTransport;
use gridkit_core::Row;
use gridkit_query::{FlaggedValue, QueryTemplate, SelectionFields, SelectionPreset};
use gridkit_services::{BackendClient, BackendConfig, ExecResponse, ServiceError};
use pretty_assertions::assert_eq;

fn config() -> BackendConfig {
    BackendConfig {
        backend_point: "shop".to_string(),
        user_name: "jdoe".to_string(),
        restore: vec!["prices".to_string()],
        ..Default::default()
    }
}

fn client(transport: &Arc<MockTransport>) -> BackendClient {
    BackendClient::new(config(), transport.clone())
}

#[tokio::test]
async fn test_exec_returns_rows() {
    let rows = vec![
        Row::new().with("article", "A1").with("price", 10),
        Row::new().with("article", "A2").with("price", 20),
    ];
    let transport = Arc::new(MockTransport::new().with_response(ExecResponse::success(rows.clone())));

    let result = client(&transport).exec("select * from products").await.unwrap();

    assert_eq!(result, rows);
    let log = transport.request_log();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].backend_point, "shop");
    assert_eq!(log[0].user, "jdoe");
    assert_eq!(log[0].restore, vec!["prices"]);
}

#[tokio::test]
async fn test_rejected_statement_maps_to_error() {
    let transport =
        Arc::new(MockTransport::new().with_response(ExecResponse::failure("syntax error")));

    let err = client(&transport).exec("selec").await.unwrap_err();

    assert!(matches!(err, ServiceError::Rejected(ref reason) if reason == "syntax error"));
}

#[tokio::test]
async fn test_rejection_without_message() {
    let transport = Arc::new(MockTransport::new().with_response(ExecResponse {
        ok: false,
        data: Vec::new(),
        error: None,
    }));

    let err = client(&transport).exec("select 1").await.unwrap_err();

    assert!(matches!(err, ServiceError::Rejected(_)));
}

#[tokio::test]
async fn test_transport_failure_propagates() {
    let transport = Arc::new(MockTransport::new().with_failure());

    let err = client(&transport).exec("select 1").await.unwrap_err();

    assert!(matches!(err, ServiceError::RequestFailed(_)));
    assert_eq!(transport.request_log().len(), 1);
}

#[tokio::test]
async fn test_fetch_selection_sends_escaped_statement() {
    let acme_rows = vec![Row::new().with("manufacturer", "Acme")];
    let transport = Arc::new(
        MockTransport::new()
            .with_query_response("in (''Acme'')", ExecResponse::success(acme_rows.clone())),
    );
    let preset = SelectionPreset {
        manufacturers: vec!["Acme".to_string()],
        articles: vec![FlaggedValue::new("O'Neil")],
        names: Vec::new(),
    };
    let template = QueryTemplate::select_all("products").unwrap();

    let rows = client(&transport)
        .fetch_selection(&template, &preset, &SelectionFields::default())
        .await
        .unwrap();

    assert_eq!(rows, acme_rows);
    assert_eq!(
        transport.request_log()[0].query,
        "select * from products where (manufacturer in (''Acme'')) \
         and (article ilike ''%O''''Neil%'')"
    );
}

#[tokio::test]
async fn test_empty_preset_fetches_everything() {
    let transport = Arc::new(MockTransport::new());
    let template = QueryTemplate::select_all("products").unwrap();

    client(&transport)
        .fetch_selection(&template, &SelectionPreset::default(), &SelectionFields::default())
        .await
        .unwrap();

    assert_eq!(transport.request_log()[0].query, "select * from products");
}
