//! End-to-end tests against a mock API server.
//!
//! These exercise the whole path: query composition, signing, transport,
//! envelope decoding, and streaming, with nothing stubbed out in between.

use std::sync::Arc;

use futures::StreamExt;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use chirp_api::auth::{AuthState, OAuth2Token, Oauth1Credentials};
use chirp_api::client::ClientConfig;
use chirp_api::rest::{
    ChirpClient, FieldSet, NewTweet, Page, TweetExpansion, TweetField, UserField,
};

fn server_config(server: &MockServer) -> ClientConfig {
    ClientConfig::builder()
        .with_api_base_url(server.uri())
        .with_upload_base_url(server.uri())
        .build()
}

fn app_client(server: &MockServer) -> ChirpClient {
    ChirpClient::new(
        AuthState::app_only("integration-bearer"),
        server_config(server),
    )
    .unwrap()
}

#[tokio::test]
async fn lookup_with_fields_and_expansions_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/20"))
        .and(header("Authorization", "Bearer integration-bearer"))
        .and(query_param("tweet.fields", "author_id,created_at"))
        .and(query_param("expansions", "author_id"))
        .and(query_param("user.fields", "description,verified"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"id": "20", "text": "just setting up my twttr", "author_id": "12"},
            "includes": {"users": [{"id": "12", "name": "Jack", "username": "jack", "verified": true}]}
        })))
        .mount(&server)
        .await;

    let client = app_client(&server);
    let fields = FieldSet::new()
        .with(TweetField::AuthorId)
        .with(TweetField::CreatedAt);
    let expansions = [TweetExpansion::AuthorId(
        FieldSet::new()
            .with(UserField::Verified)
            .with(UserField::Description),
    )];

    let envelope = client.tweet("20", &fields, &expansions).await.unwrap();
    assert_eq!(envelope.data.id, "20");
    assert_eq!(envelope.data.author_id.as_deref(), Some("12"));
    let includes = envelope.includes.unwrap();
    assert_eq!(includes.users[0].username, "jack");
    assert_eq!(includes.users[0].verified, Some(true));
}

#[tokio::test]
async fn empty_selection_sends_no_query_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"id": "20", "text": "just setting up my twttr"}
        })))
        .mount(&server)
        .await;

    let client = app_client(&server);
    client
        .tweet("20", &FieldSet::new(), &[])
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.query(), None);
}

#[tokio::test]
async fn pagination_walks_forward_with_returned_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/users/12/tweets"))
        .and(query_param("max_results", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "3", "text": "newest"}],
            "meta": {"result_count": 1, "next_token": "CURSOR-1"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/users/12/tweets"))
        .and(query_param("pagination_token", "CURSOR-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": [{"id": "2", "text": "older"}],
            "meta": {"result_count": 1}
        })))
        .mount(&server)
        .await;

    let client = app_client(&server);

    let first = client
        .user_timeline(
            "12",
            &FieldSet::new(),
            &[],
            &Page::new().with_max_results(5),
        )
        .await
        .unwrap();
    assert_eq!(first.data[0].id, "3");
    let cursor = first.next_token().unwrap().to_string();

    let second = client
        .user_timeline(
            "12",
            &FieldSet::new(),
            &[],
            &Page::new().with_pagination_token(cursor),
        )
        .await
        .unwrap();
    assert_eq!(second.data[0].id, "2");
    assert_eq!(second.next_token(), None);
}

#[tokio::test]
async fn filtered_stream_yields_typed_records_until_eof() {
    let server = MockServer::start().await;

    // Two records separated by a keep-alive blank line; CRLF boundaries.
    let body = "{\"data\":{\"id\":\"1\",\"text\":\"first\"}}\r\n\
                \r\n\
                {\"data\":{\"id\":\"2\",\"text\":\"second\"}}\r\n";
    Mock::given(method("GET"))
        .and(path("/2/tweets/search/stream"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body, "application/json"))
        .mount(&server)
        .await;

    let client = app_client(&server);
    let mut stream = client.filtered_stream(&FieldSet::new(), &[]).await.unwrap();

    let first = stream.next().await.unwrap().unwrap();
    assert_eq!(first.data.id, "1");
    let second = stream.next().await.unwrap().unwrap();
    assert_eq!(second.data.id, "2");
    assert!(stream.next().await.is_none());
}

#[tokio::test]
async fn concurrent_calls_share_one_token_refresh() {
    let server = MockServer::start().await;

    // The token endpoint must be hit exactly once even though two calls
    // race to refresh the same stale token.
    Mock::given(method("POST"))
        .and(path("/2/oauth2/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "fresh-token",
            "token_type": "bearer",
            "expires_in": 7200,
            "refresh_token": "rotated"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/2/users/me"))
        .and(header("Authorization", "Bearer fresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"id": "12", "name": "Jack", "username": "jack"}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let stale = OAuth2Token::new(
        "client-id",
        "stale-token",
        chrono::Utc::now() - chrono::Duration::hours(1),
    )
    .with_refresh_token("refresh-token");

    let client = Arc::new(
        ChirpClient::new(AuthState::oauth2_user(stale), server_config(&server)).unwrap(),
    );

    let a = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.me(&FieldSet::new(), &[]).await })
    };
    let b = {
        let client = Arc::clone(&client);
        tokio::spawn(async move { client.me(&FieldSet::new(), &[]).await })
    };

    let (a, b) = (a.await.unwrap(), b.await.unwrap());
    assert_eq!(a.unwrap().data.username, "jack");
    assert_eq!(b.unwrap().data.username, "jack");
    // Mock expectations verify the single refresh on drop.
}

#[tokio::test]
async fn signed_post_and_delete_round_trip() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/2/tweets"))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "data": {"id": "7", "text": "hello world"}
        })))
        .mount(&server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/2/tweets/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "data": {"deleted": true}
        })))
        .mount(&server)
        .await;

    let auth = AuthState::user_signed(
        Oauth1Credentials::new("consumer-key", "consumer-secret")
            .with_token("user-token", "user-secret"),
    );
    let client = ChirpClient::new(auth, server_config(&server)).unwrap();

    let created = client
        .create_tweet(&NewTweet::text("hello world"))
        .await
        .unwrap();
    assert_eq!(created.data.id, "7");

    let deleted = client.delete_tweet("7").await.unwrap();
    assert!(deleted.data.deleted);

    for request in server.received_requests().await.unwrap() {
        let auth_header = request
            .headers
            .get("Authorization")
            .unwrap()
            .to_str()
            .unwrap();
        assert!(auth_header.starts_with("OAuth "));
        assert!(auth_header.contains("oauth_token=\"user-token\""));
    }
}

#[tokio::test]
async fn app_only_client_cannot_act_as_a_user() {
    let server = MockServer::start().await;
    let client = app_client(&server);

    let err = client
        .create_tweet(&NewTweet::text("nope"))
        .await
        .unwrap_err();
    assert!(err.to_string().contains("user context"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn structured_error_body_fails_the_call() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/2/tweets/0"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "errors": [{
                "title": "Not Found Error",
                "type": "https://api.twitter.com/2/problems/resource-not-found",
                "resource_id": "0",
                "resource_type": "tweet"
            }]
        })))
        .mount(&server)
        .await;

    let client = app_client(&server);
    let err = client.tweet("0", &FieldSet::new(), &[]).await.unwrap_err();
    let errors = err.api_errors().unwrap();
    assert_eq!(errors[0].title, "Not Found Error");
    assert_eq!(errors[0].resource_id.as_deref(), Some("0"));
}
