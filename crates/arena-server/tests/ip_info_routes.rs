//! IP reflector routes

use arena_core::{Method, RequestBuilder, StatusCode};
use arena_server::app::ip_info_state;
use arena_server::ipinfo::IpInfo;

#[tokio::test]
async fn test_api_reports_request() {
    let state = ip_info_state();
    let req = RequestBuilder::new(Method::Get, "/api")
        .header("host", "ip.example")
        .header("user-agent", "curl/8.4.0")
        .header("x-forwarded-for", "203.0.113.50, 10.0.0.2")
        .remote_addr("10.0.0.2:33000".parse().unwrap())
        .build();

    let res = state.handle(req).await;
    assert_eq!(res.status, StatusCode::OK);
    assert_eq!(res.content_type(), Some("application/json"));

    let info: IpInfo = serde_json::from_slice(&res.body).unwrap();
    assert_eq!(info.client_ip, "203.0.113.50");
    assert_eq!(info.user_agent, "curl/8.4.0");
    assert!(!info.server_ip.is_empty());
    assert_eq!(
        info.headers.get("X-Forwarded-For").map(String::as_str),
        Some("203.0.113.50, 10.0.0.2")
    );
    assert!(!info.headers.contains_key("Host"));
}

#[tokio::test]
async fn test_peer_address_without_port() {
    let state = ip_info_state();
    let req = RequestBuilder::new(Method::Get, "/api")
        .remote_addr("[2001:db8::1]:443".parse().unwrap())
        .build();

    let info: IpInfo = serde_json::from_slice(&state.handle(req).await.body).unwrap();
    assert_eq!(info.client_ip, "2001:db8::1");
    assert_eq!(info.user_agent, "");
}

#[tokio::test]
async fn test_html_page_and_health() {
    let state = ip_info_state();

    let page = state
        .handle(
            RequestBuilder::new(Method::Get, "/some/where")
                .header("x-real-ip", "<script>")
                .build(),
        )
        .await;
    assert_eq!(page.status, StatusCode::OK);
    let html = page.body_string().unwrap();
    assert!(html.contains("IP Information Service"));
    assert!(html.contains("&lt;script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains("<a href=\"/api\">"));
    // Reflector carries the access log only
    assert!(page.header("x-request-id").is_some());
    assert!(page.header("x-frame-options").is_none());

    let health = state
        .handle(RequestBuilder::new(Method::Get, "/health").build())
        .await;
    assert_eq!(health.body_string().as_deref(), Some("OK"));
}
