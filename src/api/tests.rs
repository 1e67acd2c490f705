use super::*;
use crate::request::{HttpMethod, MockHttpClient};
use assert_matches::assert_matches;
use serde_json::json;

const BASE: &str = "http://api.test";

fn video(id: &str, private: bool) -> serde_json::Value {
    json!({
        "id": id,
        "user_id": "u1",
        "upload_id": format!("up-{id}"),
        "asset_id": format!("asset-{id}"),
        "playback_id": format!("pb-{id}"),
        "title": format!("Video {id}"),
        "description": "",
        "isPrivate": private,
        "status": "ready",
        "created_at": "2024-05-01T10:00:00Z",
        "updated_at": "2024-05-01T10:00:00Z"
    })
}

fn api(mock: &MockHttpClient) -> VidShareApi<&MockHttpClient> {
    VidShareApi::new(mock, format!("{BASE}/")).with_token(Some("tok".to_string()))
}

#[tokio::test]
async fn attaches_bearer_token_and_json_content_type() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Get,
        "http://api.test/mux/home?page=1&limit=10",
        200,
        json!([video("v1", false)]),
    );

    let videos = api(&mock).home_videos(1, 10).await.unwrap();
    assert_eq!(videos.len(), 1);

    let (url, method, headers, body) = mock.last_request().unwrap();
    assert_eq!(url, "http://api.test/mux/home?page=1&limit=10");
    assert_eq!(method, HttpMethod::Get);
    assert_eq!(headers.get("Authorization").unwrap(), "Bearer tok");
    assert_eq!(headers.get("Content-Type").unwrap(), "application/json");
    assert!(body.is_none());
}

#[tokio::test]
async fn anonymous_requests_send_empty_bearer() {
    let mock = MockHttpClient::new();
    mock.mock_response(HttpMethod::Get, "http://api.test/mux/live-streams/active", 200, json!([]));

    let api = VidShareApi::new(&mock, BASE);
    assert!(api.active_live_streams().await.unwrap().is_empty());

    let (_, _, headers, _) = mock.last_request().unwrap();
    assert_eq!(headers.get("Authorization").unwrap(), "Bearer ");
}

#[tokio::test]
async fn session_only_endpoints_fail_without_io() {
    let mock = MockHttpClient::new();
    let api = VidShareApi::new(&mock, BASE);

    assert_matches!(api.shared_with_me().await, Err(ApiError::Unauthorized));
    assert_matches!(api.delete_comment("c1").await, Err(ApiError::Unauthorized));
    assert_eq!(mock.request_count(), 0);
}

#[tokio::test]
async fn unauthorized_status_is_distinguished() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Get,
        "http://api.test/auth/validate",
        401,
        json!({ "message": "jwt expired" }),
    );

    let err = api(&mock).validate_token().await.unwrap_err();
    assert!(err.is_unauthorized());
}

#[tokio::test]
async fn forbidden_comment_delete_uses_ownership_message() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Delete,
        "http://api.test/mux/comments/c9",
        403,
        json!({ "message": "Forbidden resource" }),
    );

    let err = api(&mock).delete_comment("c9").await.unwrap_err();
    assert_eq!(err.to_string(), "You can only delete your own comments");
}

#[tokio::test]
async fn mutation_acks_accept_empty_bodies() {
    let mock = MockHttpClient::new();
    mock.mock_raw(HttpMethod::Delete, "http://api.test/mux/v1/asset-v1", 200, "");
    mock.mock_raw(HttpMethod::Patch, "http://api.test/mux/video/v1", 200, r#"{"id":"v1"}"#);

    let api = api(&mock);
    api.delete_video("v1", "asset-v1").await.unwrap();
    api.update_video("v1", "New", "Desc").await.unwrap();

    let (_, method, _, body) = mock.last_request().unwrap();
    assert_eq!(method, HttpMethod::Patch);
    let body: serde_json::Value = serde_json::from_str(&body.unwrap()).unwrap();
    assert_eq!(body, json!({ "title": "New", "description": "Desc" }));
}

#[tokio::test]
async fn search_skips_blank_queries_and_tolerates_empty_bodies() {
    let mock = MockHttpClient::new();
    let api = api(&mock);

    assert!(api.search_users("   ").await.unwrap().is_empty());
    assert_eq!(mock.request_count(), 0);

    mock.mock_raw(HttpMethod::Get, "http://api.test/users/search?q=ana", 200, "");
    assert!(api.search_users(" ana ").await.unwrap().is_empty());

    mock.mock_raw(HttpMethod::Get, "http://api.test/users/search?q=bo", 200, "<html>");
    assert!(api.search_users("bo").await.unwrap().is_empty());

    mock.mock_response(
        HttpMethod::Get,
        "http://api.test/users/search?q=cy",
        200,
        json!([{ "id": "u3", "email": "cy@x.io", "name": "Cy", "channel_name": "cy" }]),
    );
    let users = api.search_users("cy").await.unwrap();
    assert_eq!(users[0].channel_name, "cy");
}

#[tokio::test]
async fn server_errors_surface_backend_message() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Post,
        "http://api.test/mux/share",
        400,
        json!({ "message": ["userId must be a UUID"] }),
    );

    let err = api(&mock).share_video("v1", "bad").await.unwrap_err();
    assert_matches!(err, ApiError::Server { status: 400, .. });
    assert_eq!(err.to_string(), "userId must be a UUID");
}

#[tokio::test]
async fn network_errors_are_propagated() {
    let mock = MockHttpClient::new();
    mock.mock_network_error(HttpMethod::Get, "http://api.test/mux/private", "offline");

    let err = api(&mock).my_private_videos().await.unwrap_err();
    assert_matches!(err, ApiError::Network(ref m) if m == "offline");
}

#[tokio::test]
async fn live_status_unwraps_status_field() {
    let mock = MockHttpClient::new();
    mock.mock_response(
        HttpMethod::Get,
        "http://api.test/mux/live-streams/ls1/status",
        200,
        json!({ "status": "active" }),
    );

    let status = api(&mock).live_stream_status("ls1").await.unwrap();
    assert!(status.is_active());
}

#[tokio::test]
async fn empty_playback_id_is_rejected_locally() {
    let mock = MockHttpClient::new();
    let err = api(&mock).video_details("").await.unwrap_err();
    assert_eq!(err.to_string(), "no playback id found!");
    assert_eq!(mock.request_count(), 0);
}
