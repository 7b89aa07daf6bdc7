use std::sync::Arc;

use pretty_assertions::assert_eq;
use reqwest::StatusCode;
use serde_json::{Value, json};
use tokio::sync::oneshot;

use postboard::{PostStore, serve_with_shutdown};

struct TestApp {
    base: String,
    client: reqwest::Client,
    _shutdown: oneshot::Sender<()>,
}

impl TestApp {
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base, path)
    }

    async fn get_json(&self, path: &str) -> (StatusCode, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status();
        (status, resp.json().await.unwrap())
    }

    async fn titles(&self, path: &str) -> Vec<String> {
        let (status, body) = self.get_json(path).await;
        assert_eq!(status, StatusCode::OK);
        body.as_array()
            .unwrap()
            .iter()
            .map(|p| p["title"].as_str().unwrap().to_owned())
            .collect()
    }

    async fn ids(&self) -> Vec<u64> {
        let (_, body) = self.get_json("/api/posts").await;
        body.as_array().unwrap().iter().map(|p| p["id"].as_u64().unwrap()).collect()
    }
}

/// Spin up the server on an OS-assigned port with the given store.
async fn spawn_app(store: PostStore) -> TestApp {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let port = listener.local_addr().unwrap().port();
    let (tx, rx) = oneshot::channel::<()>();

    let app = postboard::app(Arc::new(store));
    tokio::spawn(async move {
        serve_with_shutdown(listener, app, async {
            rx.await.ok();
        })
        .await
        .unwrap();
    });

    TestApp {
        base: format!("http://127.0.0.1:{port}"),
        client: reqwest::Client::new(),
        _shutdown: tx,
    }
}

async fn seeded() -> TestApp {
    spawn_app(PostStore::seeded()).await
}

#[tokio::test]
async fn lists_seed_posts_in_order() {
    let app = seeded().await;
    let (status, body) = app.get_json("/api/posts").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            { "id": 1, "title": "First post", "content": "This is the first post." },
            { "id": 2, "title": "Second post", "content": "This is the second post." },
        ])
    );
}

#[tokio::test]
async fn sorts_by_title_ignoring_case() {
    let app = spawn_app(PostStore::new()).await;
    for title in ["Banana", "apple"] {
        let resp = app
            .client
            .post(app.url("/api/posts"))
            .json(&json!({ "title": title, "content": "c" }))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED);
    }

    assert_eq!(app.titles("/api/posts?sort=title").await, ["apple", "Banana"]);
    assert_eq!(app.titles("/api/posts?sort=title&direction=desc").await, ["Banana", "apple"]);
    // The stored order is untouched.
    assert_eq!(app.titles("/api/posts").await, ["Banana", "apple"]);
}

#[tokio::test]
async fn sorts_by_content() {
    let app = seeded().await;
    assert_eq!(
        app.titles("/api/posts?sort=content&direction=desc").await,
        ["Second post", "First post"]
    );
}

#[tokio::test]
async fn rejects_invalid_sort_parameters() {
    let app = seeded().await;

    let (status, body) = app.get_json("/api/posts?sort=foo").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid sort field. Use 'title' or 'content'." }));

    let (status, body) = app.get_json("/api/posts?sort=title&direction=up").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "Invalid direction. Use 'asc' or 'desc'." }));
}

#[tokio::test]
async fn create_assigns_next_id_and_keeps_extra_fields() {
    let app = seeded().await;
    let resp = app
        .client
        .post(app.url("/api/posts"))
        .json(&json!({ "title": "Third", "content": "c", "author": "ann" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(resp.headers()["location"], "/api/posts/3");
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "id": 3, "title": "Third", "content": "c", "author": "ann" }));
    assert_eq!(app.ids().await, [1, 2, 3]);
}

#[tokio::test]
async fn create_validates_title_then_content() {
    let app = seeded().await;
    let cases = [
        (json!({ "content": "c" }), "Incorrect Post Data, the title is missing from the post"),
        (json!({}), "Incorrect Post Data, the title is missing from the post"),
        (json!({ "title": "", "content": "c" }), "Incorrect Post Data, the title is missing from the post"),
        (json!({ "title": "t" }), "Incorrect Post Data, the content is missing from the post"),
        (json!({ "title": "t", "content": "" }), "Incorrect Post Data, the content is missing from the post"),
    ];

    for (payload, message) in cases {
        let resp = app.client.post(app.url("/api/posts")).json(&payload).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{payload}");
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "error": message }));
    }
    assert_eq!(app.ids().await, [1, 2]);
}

#[tokio::test]
async fn malformed_bodies_are_bad_requests() {
    let app = seeded().await;
    for body in ["{not json", "[1, 2]", ""] {
        let resp = app
            .client
            .post(app.url("/api/posts"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body:?}");
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json, json!({ "error": "Bad Request" }));
    }
}

#[tokio::test]
async fn update_merges_fields() {
    let app = seeded().await;
    let resp = app
        .client
        .put(app.url("/api/posts/2"))
        .json(&json!({ "content": "x", "id": 99, "tag": "news" }))
        .send()
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "id": 2, "title": "Second post", "content": "x", "tag": "news" }));

    let (status, fetched) = app.get_json("/api/posts/2").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, body);
}

#[tokio::test]
async fn update_rejects_non_string_title() {
    let app = seeded().await;
    let resp = app
        .client
        .put(app.url("/api/posts/1"))
        .json(&json!({ "title": 7 }))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.titles("/api/posts").await, ["First post", "Second post"]);
}

#[tokio::test]
async fn missing_posts_are_404_with_error_body() {
    let app = seeded().await;

    let resp = app.client.put(app.url("/api/posts/42")).json(&json!({})).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "error": "Post with id 42 not found" }));

    let resp = app.client.delete(app.url("/api/posts/42")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let (status, body) = app.get_json("/api/posts/abc").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Post with id abc not found" }));
}

#[tokio::test]
async fn update_of_missing_post_is_404_before_body_is_read() {
    let app = seeded().await;
    for body in ["", "{bad"] {
        let resp = app
            .client
            .put(app.url("/api/posts/42"))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{body:?}");
        let json: Value = resp.json().await.unwrap();
        assert_eq!(json, json!({ "error": "Post with id 42 not found" }));
    }

    // An existing post still rejects the same bodies.
    let resp = app
        .client
        .put(app.url("/api/posts/1"))
        .header("content-type", "application/json")
        .body("{bad")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_then_lookup_is_not_found() {
    let app = seeded().await;
    let resp = app.client.delete(app.url("/api/posts/1")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "message": "Post with id 1 has been deleted successfully." }));

    let (status, _) = app.get_json("/api/posts/1").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(app.ids().await, [2]);
}

#[tokio::test]
async fn full_scenario() {
    let app = seeded().await;

    let created: Value = app
        .client
        .post(app.url("/api/posts"))
        .json(&json!({ "title": "Third", "content": "c" }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(created["id"], 3);

    app.client.delete(app.url("/api/posts/1")).send().await.unwrap();
    assert_eq!(app.ids().await, [2, 3]);

    app.client
        .put(app.url("/api/posts/2"))
        .json(&json!({ "content": "x" }))
        .send()
        .await
        .unwrap();
    let (_, post) = app.get_json("/api/posts/2").await;
    assert_eq!(post["content"], "x");
    assert_eq!(post["title"], "Second post");
}

#[tokio::test]
async fn search_matches_title_and_content() {
    let app = seeded().await;
    assert_eq!(app.titles("/api/posts/search?title=first").await, ["First post"]);
    assert_eq!(app.titles("/api/posts/search?title=%20FIRST%20").await, ["First post"]);
    assert_eq!(app.titles("/api/posts/search").await, ["First post", "Second post"]);
    assert_eq!(app.titles("/api/posts/search?content=second&title=post").await, ["Second post"]);
    assert!(app.titles("/api/posts/search?title=first&content=second").await.is_empty());
}

#[tokio::test]
async fn cors_headers_and_preflight() {
    let app = seeded().await;

    let resp = app.client.get(app.url("/api/posts")).send().await.unwrap();
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");

    let resp = app
        .client
        .request(reqwest::Method::OPTIONS, app.url("/api/posts/1"))
        .header("origin", "http://example.com")
        .header("access-control-request-method", "PUT")
        .header("access-control-request-headers", "content-type")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert_eq!(resp.headers()["access-control-allow-origin"], "*");
    assert_eq!(resp.headers()["access-control-allow-methods"], "GET, HEAD, PUT, DELETE, OPTIONS");
    assert_eq!(resp.headers()["access-control-allow-headers"], "content-type");
}

#[tokio::test]
async fn unknown_routes_and_methods() {
    let app = seeded().await;

    let (status, body) = app.get_json("/api/nothing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not Found" }));

    let resp = app.client.patch(app.url("/api/posts")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(resp.headers()["allow"], "GET, HEAD, POST");
}

#[tokio::test]
async fn head_answers_like_get_without_body() {
    let app = seeded().await;

    let resp = app.client.head(app.url("/api/posts")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(resp.headers()["content-type"], "application/json");
    assert!(resp.bytes().await.unwrap().is_empty());

    let resp = app.client.head(app.url("/api/posts/99")).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_endpoints_answer() {
    let app = seeded().await;
    for (path, expected) in [("/healthz", "ok"), ("/readyz", "ready")] {
        let resp = app.client.get(app.url(path)).send().await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.text().await.unwrap(), expected);
    }
}
