//! End-to-end checks of the reqwest transport against a local mock server.

use std::sync::Arc;
use std::time::Duration;

use cronofy_api::{
    ApiErrorCode, CallContext, ClientConfig, CronofyClient, EventsRequest, ReqwestTransport,
    Transport, TransportConfig, TransportErrorKind, TransportRequest,
};
use reqwest::StatusCode;
use url::Url;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer, config: TransportConfig) -> CronofyClient {
    CronofyClient::new(
        ClientConfig::new("tok_live")
            .with_base_url(format!("{}/v1", server.uri()))
            .with_transport_config(config),
    )
    .unwrap()
}

#[tokio::test]
async fn sends_bearer_token_and_returns_body() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/calendars"))
        .and(header("Authorization", "Bearer tok_live"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"calendars\":[]}"))
        .expect(1)
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
    let url = Url::parse(&format!("{}/v1/calendars", server.uri())).unwrap();
    let response = transport
        .execute(TransportRequest::get(url, "tok_live"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, b"{\"calendars\":[]}");
}

#[tokio::test]
async fn configured_user_agent_is_sent() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(header("User-Agent", "cronofy-report/2.0"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
        .expect(1)
        .mount(&server)
        .await;

    let config = TransportConfig::default()
        .with_user_agent("cronofy-report/2.0")
        .with_connect_timeout(Duration::from_secs(1));
    assert_eq!(config.connect_timeout, Duration::from_secs(1));

    let transport = ReqwestTransport::new(&config).unwrap();
    let url = Url::parse(&format!("{}/v1/calendars", server.uri())).unwrap();
    let response = transport
        .execute(TransportRequest::get(url, "tok_live"))
        .await
        .unwrap();
    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn prebuilt_reqwest_client_is_used() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/calendars"))
        .and(header("User-Agent", "prebuilt"))
        .and(header("Authorization", "Bearer tok_live"))
        .respond_with(ResponseTemplate::new(200).set_body_string("{\"calendars\":null}"))
        .expect(1)
        .mount(&server)
        .await;

    let http = reqwest::Client::builder()
        .user_agent("prebuilt")
        .build()
        .unwrap();
    let transport: Arc<dyn Transport> = Arc::new(ReqwestTransport::from_client(http));
    let client = CronofyClient::new(
        ClientConfig::new("tok_live")
            .with_base_url(format!("{}/v1", server.uri()))
            .with_transport(transport),
    )
    .unwrap();

    let calendars = client
        .list_calendars(&CallContext::background())
        .await
        .unwrap();
    assert!(calendars.is_empty());
}

#[tokio::test]
async fn error_status_is_not_a_transport_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/calendars"))
        .respond_with(ResponseTemplate::new(404).set_body_string("not here"))
        .mount(&server)
        .await;

    let transport = ReqwestTransport::new(&TransportConfig::default()).unwrap();
    let url = Url::parse(&format!("{}/v1/calendars", server.uri())).unwrap();
    let response = transport
        .execute(TransportRequest::get(url, "tok_live"))
        .await
        .unwrap();

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn slow_server_hits_request_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let config = TransportConfig::default().with_request_timeout(Duration::from_millis(200));
    let transport = ReqwestTransport::new(&config).unwrap();
    let url = Url::parse(&format!("{}/v1/calendars", server.uri())).unwrap();
    let err = transport
        .execute(TransportRequest::get(url, "tok_live"))
        .await
        .unwrap_err();

    assert_eq!(err.kind(), TransportErrorKind::Timeout);
}

#[tokio::test]
async fn connection_refused_is_a_transport_error() {
    // Bind then drop a server so the port is very likely closed.
    let uri = {
        let server = MockServer::start().await;
        server.uri()
    };

    let client = CronofyClient::new(ClientConfig::new("tok").with_base_url(format!("{uri}/v1")))
        .unwrap();
    let err = client
        .list_calendars(&CallContext::background())
        .await
        .unwrap_err();

    assert_eq!(err.code(), ApiErrorCode::TransportError);
    assert!(err.url().is_some());
}

#[tokio::test]
async fn client_lists_events_through_reqwest() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/events"))
        .and(query_param("tzid", "Europe/Paris"))
        .and(query_param("calendar_ids[]", "cal_1"))
        .and(header("Authorization", "Bearer tok_live"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"{
                "pages": {"current": 1, "total": 1},
                "events": [
                    {"event_uid": "e1", "calendar_id": "cal_1", "summary": "Review",
                     "start": "2023-06-01T09:00:00Z", "end": "2023-06-01T10:00:00Z",
                     "participation_status": "accepted",
                     "location": {"description": "Room A,\nBuilding 2"}}
                ]
            }"#,
        ))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server, TransportConfig::default());
    let request = EventsRequest::new()
        .with_calendar_ids(["cal_1"])
        .with_tzid("Europe/Paris");
    let response = client
        .list_events(&CallContext::background(), &request)
        .await
        .unwrap();

    assert_eq!(response.events.len(), 1);
    let event = &response.events[0];
    assert!(event.accepted());
    assert!(!event.all_day);
    assert_eq!(event.location(), "Room A Building 2");
}

#[tokio::test]
async fn caller_deadline_aborts_slow_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let client = client_for(&server, TransportConfig::default());
    let ctx = CallContext::background().with_timeout(Duration::from_millis(100));
    let err = client.list_calendars(&ctx).await.unwrap_err();

    assert_eq!(err.code(), ApiErrorCode::DeadlineExceeded);
}

#[test]
fn custom_transport_can_be_shared() {
    let transport: Arc<dyn Transport> =
        Arc::new(ReqwestTransport::new(&TransportConfig::default()).unwrap());
    let first = CronofyClient::new(ClientConfig::new("a").with_transport(transport.clone()));
    let second = CronofyClient::new(ClientConfig::new("b").with_transport(transport));
    assert!(first.is_ok());
    assert!(second.is_ok());
}
