//! Integration tests for the profile adapters.
//!
//! Every adapter is pointed at a local `wiremock` server through
//! `Endpoints::all_at`, so no real network traffic is made.

use std::sync::Arc;

use followback_core::{Credentials, Username};
use serde_json::json;
use wiremock::matchers::{body_json, body_string_contains, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use followback_scraper::{
    default_profile_sources, Endpoints, FailureKind, PaginationLimits, ProfileSource,
    ScraperSettings, SourceError,
};

fn settings(base: &str, credentials: Credentials) -> ScraperSettings {
    ScraperSettings {
        request_timeout_secs: 5,
        max_retries: 0,
        retry_backoff_base_ms: 0,
        page_size: 50,
        pagination: PaginationLimits::default(),
        endpoints: Endpoints::all_at(base),
        credentials,
    }
}

fn source_named(
    settings: &ScraperSettings,
    name: &str,
) -> Box<dyn ProfileSource> {
    let client = Arc::new(settings.build_client().expect("failed to build test client"));
    default_profile_sources(client, settings)
        .into_iter()
        .find(|s| s.name() == name)
        .unwrap_or_else(|| panic!("no source named {name}"))
}

fn username(raw: &str) -> Username {
    Username::parse(raw).expect("valid username")
}

fn web_profile_json() -> serde_json::Value {
    json!({
        "data": {
            "user": {
                "id": "1234567",
                "username": "natgeo",
                "full_name": "National Geographic",
                "biography": "Experience the world",
                "profile_pic_url_hd": "https://cdn.test/natgeo.jpg",
                "external_url": "https://natgeo.com",
                "is_private": false,
                "edge_followed_by": {"count": 283000000},
                "edge_follow": {"count": 150},
                "edge_owner_to_timeline_media": {"count": 29000}
            }
        }
    })
}

// ---------------------------------------------------------------------------
// mobile_api
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mobile_api_maps_web_profile_info_into_snapshot() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "natgeo"))
        .and(header("x-ig-app-id", "936619743392459"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let source = source_named(&settings, "mobile_api");
    let snapshot = source
        .fetch_profile(&username("NatGeo"))
        .await
        .expect("expected snapshot");

    assert_eq!(snapshot.username, "natgeo");
    assert_eq!(snapshot.display_name, "National Geographic");
    assert_eq!(snapshot.followers_count, 283_000_000);
    assert_eq!(snapshot.following_count, 150);
    assert_eq!(snapshot.posts_count, 29_000);
    assert!(snapshot.is_public);
    assert_eq!(snapshot.internal_user_id.as_deref(), Some("1234567"));
}

#[tokio::test]
async fn mobile_api_without_counts_is_unparseable() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"data": {"user": {"username": "natgeo"}}})),
        )
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let err = source_named(&settings, "mobile_api")
        .fetch_profile(&username("natgeo"))
        .await
        .expect_err("missing counts must fail");

    assert!(
        matches!(err, SourceError::MissingCounts { source_name: "mobile_api" }),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.kind(), FailureKind::Unparseable);
}

#[tokio::test]
async fn mobile_api_html_login_wall_is_rejected_by_content_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("<html><body>Log in</body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let err = source_named(&settings, "mobile_api")
        .fetch_profile(&username("natgeo"))
        .await
        .expect_err("html must be rejected");

    assert!(
        matches!(err, SourceError::UnexpectedContentType { .. }),
        "unexpected error: {err:?}"
    );
    assert_eq!(err.kind(), FailureKind::Unparseable);
}

#[tokio::test]
async fn mobile_api_429_is_classified_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "30"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let err = source_named(&settings, "mobile_api")
        .fetch_profile(&username("natgeo"))
        .await
        .expect_err("429 must fail");

    match err {
        SourceError::RateLimited {
            retry_after_secs, ..
        } => assert_eq!(retry_after_secs, 30),
        other => panic!("expected RateLimited, got {other:?}"),
    }
}

#[tokio::test]
async fn mobile_api_server_error_is_network_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let err = source_named(&settings, "mobile_api")
        .fetch_profile(&username("natgeo"))
        .await
        .expect_err("503 must fail");

    assert_eq!(err.kind(), FailureKind::Network);
}

// ---------------------------------------------------------------------------
// web_api_session
// ---------------------------------------------------------------------------

#[tokio::test]
async fn web_api_session_forwards_bootstrapped_cookies_and_csrf() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .insert_header("Set-Cookie", "csrftoken=tok123; Path=/")
                .set_body_raw("<html></html>", "text/html"),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(header("x-csrftoken", "tok123"))
        .and(header("cookie", "csrftoken=tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let snapshot = source_named(&settings, "web_api_session")
        .fetch_profile(&username("natgeo"))
        .await
        .expect("expected snapshot");

    assert_eq!(snapshot.followers_count, 283_000_000);
}

#[tokio::test]
async fn web_api_session_failed_bootstrap_sends_unauthenticated_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/users/web_profile_info/"))
        .and(query_param("username", "natgeo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let snapshot = source_named(&settings, "web_api_session")
        .fetch_profile(&username("natgeo"))
        .await
        .expect("bootstrap failure must not fail the source");
    assert_eq!(snapshot.followers_count, 283_000_000);

    let requests = server.received_requests().await.expect("recording enabled");
    let profile_request = requests
        .iter()
        .find(|r| r.url.path() == "/api/v1/users/web_profile_info/")
        .expect("profile request sent");
    assert!(!profile_request.headers.contains_key("x-csrftoken"));
    assert!(!profile_request.headers.contains_key("cookie"));
}

// ---------------------------------------------------------------------------
// graphql
// ---------------------------------------------------------------------------

#[tokio::test]
async fn graphql_posts_query_hash_form() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/graphql/query/"))
        .and(header("content-type", "application/x-www-form-urlencoded"))
        .and(body_string_contains("query_hash=c9100bf9110dd6361671f113dd02e7d6"))
        .and(body_string_contains("natgeo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(web_profile_json()))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let snapshot = source_named(&settings, "graphql")
        .fetch_profile(&username("natgeo"))
        .await
        .expect("expected snapshot");

    assert_eq!(snapshot.following_count, 150);
    assert_eq!(snapshot.website_url, "https://natgeo.com");
}

// ---------------------------------------------------------------------------
// profile_page
// ---------------------------------------------------------------------------

#[tokio::test]
async fn profile_page_falls_back_to_meta_description() {
    let server = MockServer::start().await;
    let html = r#"<html><head>
        <meta property="og:description" content="1.5M Followers, 321 Following, 1,024 Posts - See Instagram photos and videos from Some One (@someone)" />
        </head><body></body></html>"#;

    Mock::given(method("GET"))
        .and(path("/someone/"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let snapshot = source_named(&settings, "profile_page")
        .fetch_profile(&username("someone"))
        .await
        .expect("expected snapshot");

    assert_eq!(snapshot.followers_count, 1_500_000);
    assert_eq!(snapshot.following_count, 321);
    assert_eq!(snapshot.posts_count, 1_024);
}

#[tokio::test]
async fn profile_page_without_any_counts_reports_no_strategy() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/someone/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw("<html><body>hi</body></html>", "text/html"),
        )
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let err = source_named(&settings, "profile_page")
        .fetch_profile(&username("someone"))
        .await
        .expect_err("no counts must fail");

    assert!(
        matches!(err, SourceError::NoStrategyMatched { .. }),
        "unexpected error: {err:?}"
    );
}

// ---------------------------------------------------------------------------
// credential-gated adapters
// ---------------------------------------------------------------------------

#[tokio::test]
async fn rapidapi_without_key_is_unavailable_and_makes_no_request() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let settings = settings(&server.uri(), Credentials::default());
    let source = source_named(&settings, "rapidapi");
    assert!(!source.is_available());

    let err = source
        .fetch_profile(&username("natgeo"))
        .await
        .expect_err("missing key must fail");
    assert_eq!(err.kind(), FailureKind::Unavailable);
}

#[tokio::test]
async fn rapidapi_sends_key_headers() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/userinfo/natgeo"))
        .and(header("x-rapidapi-key", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"username": "natgeo", "follower_count": 10, "following_count": 4}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(
        &server.uri(),
        Credentials {
            rapidapi_key: Some("secret".to_owned()),
            ..Credentials::default()
        },
    );
    let snapshot = source_named(&settings, "rapidapi")
        .fetch_profile(&username("natgeo"))
        .await
        .expect("expected snapshot");

    assert_eq!(snapshot.followers_count, 10);
    assert_eq!(snapshot.following_count, 4);
}

#[tokio::test]
async fn brightdata_uses_bearer_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/scraper/instagram"))
        .and(query_param("username", "natgeo"))
        .and(header("authorization", "Bearer bd-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "user": {"username": "natgeo", "follower_count": 7, "following_count": 3, "media_count": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(
        &server.uri(),
        Credentials {
            brightdata_key: Some("bd-token".to_owned()),
            ..Credentials::default()
        },
    );
    let snapshot = source_named(&settings, "brightdata")
        .fetch_profile(&username("natgeo"))
        .await
        .expect("expected snapshot");

    assert_eq!(snapshot.followers_count, 7);
    assert_eq!(snapshot.posts_count, 1);
}

#[tokio::test]
async fn scrapingbee_proxies_profile_page_and_extracts_counts() {
    let server = MockServer::start().await;
    let html = r#"<meta property="og:description" content="2,500 Followers, 40 Following, 12 Posts - See Instagram photos" />"#;

    Mock::given(method("GET"))
        .and(path("/api/v1/"))
        .and(query_param("api_key", "sb-key"))
        .and(query_param("url", format!("{}/natgeo/", server.uri())))
        .and(query_param("premium_proxy", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(
        &server.uri(),
        Credentials {
            scrapingbee_key: Some("sb-key".to_owned()),
            ..Credentials::default()
        },
    );
    let snapshot = source_named(&settings, "scrapingbee")
        .fetch_profile(&username("natgeo"))
        .await
        .expect("expected snapshot");

    assert_eq!(snapshot.followers_count, 2_500);
    assert_eq!(snapshot.following_count, 40);
}

#[tokio::test]
async fn scrapingbee_failure_does_not_leak_api_key() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let settings = settings(
        &server.uri(),
        Credentials {
            scrapingbee_key: Some("SUPERSECRETKEY".to_owned()),
            ..Credentials::default()
        },
    );
    let err = source_named(&settings, "scrapingbee")
        .fetch_profile(&username("natgeo"))
        .await
        .expect_err("500 must fail");

    assert_eq!(err.kind(), FailureKind::Network);
    let rendered = format!("{err} {err:?}");
    assert!(!rendered.contains("SUPERSECRETKEY"), "{rendered}");
    assert!(rendered.contains("api_key=REDACTED"), "{rendered}");
}

#[tokio::test]
async fn transport_error_does_not_leak_api_key() {
    // Nothing listens on port 1, so the request fails before any response.
    let settings = settings(
        "http://127.0.0.1:1",
        Credentials {
            scrapingbee_key: Some("SUPERSECRETKEY".to_owned()),
            ..Credentials::default()
        },
    );
    let err = source_named(&settings, "scrapingbee")
        .fetch_profile(&username("natgeo"))
        .await
        .expect_err("connection refused must fail");

    assert!(matches!(err, SourceError::Http(_)), "unexpected error: {err:?}");
    let rendered = format!("{err} {err:?}");
    assert!(!rendered.contains("SUPERSECRETKEY"), "{rendered}");
}

#[tokio::test]
async fn zyte_reads_profile_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v2/scraping/instagram/profile/natgeo"))
        .and(header("authorization", "Bearer zy-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "profile": {"username": "natgeo", "full_name": "Nat Geo",
                        "edge_followed_by": {"count": 99}, "edge_follow": {"count": 9}}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(
        &server.uri(),
        Credentials {
            zyte_key: Some("zy-key".to_owned()),
            ..Credentials::default()
        },
    );
    let snapshot = source_named(&settings, "zyte")
        .fetch_profile(&username("natgeo"))
        .await
        .expect("expected snapshot");

    assert_eq!(snapshot.followers_count, 99);
    assert_eq!(snapshot.display_name, "Nat Geo");
}

#[tokio::test]
async fn apify_runs_actor_and_picks_matching_item() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/acts/apify~instagram-profile-scraper/run-sync-get-dataset-items"))
        .and(header("authorization", "Bearer ap-token"))
        .and(body_json(json!({"usernames": ["natgeo"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"username": "someone_else", "followersCount": 1, "followsCount": 1},
            {"username": "NatGeo", "fullName": "National Geographic",
             "followersCount": 5000, "followsCount": 12, "postsCount": 3}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let settings = settings(
        &server.uri(),
        Credentials {
            apify_token: Some("ap-token".to_owned()),
            ..Credentials::default()
        },
    );
    let snapshot = source_named(&settings, "apify")
        .fetch_profile(&username("natgeo"))
        .await
        .expect("expected snapshot");

    assert_eq!(snapshot.followers_count, 5_000);
    assert_eq!(snapshot.following_count, 12);
    assert_eq!(snapshot.display_name, "National Geographic");
}

#[tokio::test]
async fn apify_without_matching_item_is_unparseable() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v2/acts/apify~instagram-profile-scraper/run-sync-get-dataset-items"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"username": "someone_else", "followersCount": 1}
        ])))
        .mount(&server)
        .await;

    let settings = settings(
        &server.uri(),
        Credentials {
            apify_token: Some("ap-token".to_owned()),
            ..Credentials::default()
        },
    );
    let err = source_named(&settings, "apify")
        .fetch_profile(&username("natgeo"))
        .await
        .expect_err("another account's item must not be used");

    assert!(
        matches!(err, SourceError::MissingCounts { source_name: "apify" }),
        "unexpected error: {err:?}"
    );
}
