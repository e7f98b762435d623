// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    response::Response,
    Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use jsonwebtoken::{encode, EncodingKey, Header};
use std::path::Path;
use tempfile::TempDir;
use tower::ServiceExt;
use wg_server::auth::Claims;
use wg_server::dependencies::DefaultServerDependencies;
use wg_server::error::NOT_AUTHORIZED_PAGE;
use wg_server::{Server, ServerConfig};

const SECRET: &str = "gateway-test-secret";

const DEFAULTS: &str = r#"
wikisPath = "Wikis"
rootWikiName = "IndexWiki"

[wikis.IndexWiki]
public = true

[wikis.notes]
owner = "alice"

[wikis.notes.access]
Editor = ["view", "upload"]
Guest = ["view"]
"#;

struct Fixture {
    dir: TempDir,
    app: Router,
}

impl Fixture {
    fn new() -> Self {
        Self::with_defaults(DEFAULTS)
    }

    fn with_defaults(defaults: &str) -> Self {
        let dir = TempDir::new().expect("tempdir");
        std::fs::create_dir_all(dir.path().join("Config")).expect("config dir");
        std::fs::write(dir.path().join("Config/Config.toml"), defaults).expect("defaults");

        for (wiki, page) in [
            ("IndexWiki", "<p>index</p>"),
            ("notes", "<p>notes</p><!--assets-->js<!--/assets-->"),
        ] {
            let files = dir.path().join("Wikis").join(wiki).join("files");
            std::fs::create_dir_all(&files).expect("wiki dir");
            std::fs::write(dir.path().join("Wikis").join(wiki).join("index.html"), page)
                .expect("index");
        }
        std::fs::write(dir.path().join("Wikis/notes/files/cat.png"), b"png-bytes").expect("png");
        std::fs::write(dir.path().join("Wikis/notes/files/notes.txt"), b"text").expect("txt");
        std::fs::write(dir.path().join("Wikis/IndexWiki/files/logo.svg"), b"<svg/>").expect("svg");
        std::fs::write(dir.path().join("Wikis/secret.png"), b"outside").expect("outside");

        let config = ServerConfig {
            config_root: dir.path().to_path_buf(),
            jwt_secret: Some(SECRET.to_string()),
            ..Default::default()
        };
        let state = DefaultServerDependencies::new(&config).expect("deps").into_state();
        let app = Server::with_state(config, state).router();
        Self { dir, app }
    }

    fn path(&self, rel: &str) -> std::path::PathBuf {
        self.dir.path().join(rel)
    }

    async fn send(&self, request: Request<Body>) -> Response {
        self.app.clone().oneshot(request).await.expect("response")
    }

    async fn get(&self, uri: &str, token: Option<&str>) -> Response {
        let mut builder = Request::get(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
        }
        self.send(builder.body(Body::empty()).expect("request")).await
    }
}

fn token(name: &str, level: &str) -> String {
    let claims = Claims {
        name: name.to_string(),
        level: level.to_string(),
        exp: (chrono::Utc::now().timestamp() + 3600) as usize,
    };
    encode(&Header::default(), &claims, &EncodingKey::from_secret(SECRET.as_bytes()))
        .expect("token")
}

async fn body_string(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8")
}

async fn assert_generic_denial(response: Response) {
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(body_string(response).await, NOT_AUTHORIZED_PAGE);
}

fn upload_request(wiki_header: &str, body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/upload")
        .header("x-wiki-name", wiki_header)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

fn upload_body(title: &str, contents: &[u8]) -> serde_json::Value {
    serde_json::json!({
        "wiki": "notes",
        "tiddler": { "fields": { "title": title, "text": STANDARD.encode(contents) } }
    })
}

fn create_request(body: serde_json::Value, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::post("/api/wikis").header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).expect("request")
}

#[tokio::test]
async fn root_wiki_is_public() {
    let fx = Fixture::new();
    let response = fx.get("/", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "<p>index</p>");

    let logo = fx.get("/files/logo.svg", None).await;
    assert_eq!(logo.status(), StatusCode::OK);
    assert_eq!(logo.headers()[header::CONTENT_TYPE], "image/svg+xml");
}

#[tokio::test]
async fn private_wiki_requires_a_grant() {
    let fx = Fixture::new();

    assert_generic_denial(fx.get("/notes", None).await).await;
    assert_generic_denial(fx.get("/notes", Some(&token("mallory", "Visitor"))).await).await;
    assert_generic_denial(fx.get("/notes", Some("garbage")).await).await;

    for viewer in [token("alice", "Visitor"), token("gina", "Guest")] {
        let response = fx.get("/notes", Some(&viewer)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_string(response).await, "<p>notes</p><!--assets-->js<!--/assets-->");
    }
}

#[tokio::test]
async fn missing_wiki_is_indistinguishable_from_denial() {
    let fx = Fixture::with_defaults(&format!("{DEFAULTS}\n[wikis.ghost]\npublic = true\n"));
    assert_generic_denial(fx.get("/ghost", None).await).await;
    assert_generic_denial(fx.get("/nowhere", Some(&token("alice", "Editor"))).await).await;
}

#[tokio::test]
async fn asset_section_follows_serve_plugin_setting() {
    let fx = Fixture::with_defaults(&format!("{DEFAULTS}\n[ws-server]\nservePlugin = false\n"));
    let response = fx.get("/notes", Some(&token("alice", "Editor"))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "<p>notes</p>");
}

#[tokio::test]
async fn file_download_checks_view_type_and_containment() {
    let fx = Fixture::new();
    let guest = token("gina", "Guest");

    let response = fx.get("/notes/files/cat.png", Some(&guest)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
    assert_eq!(body_string(response).await, "png-bytes");

    assert_generic_denial(fx.get("/notes/files/cat.png", None).await).await;
    assert_eq!(
        fx.get("/notes/files/notes.txt", Some(&guest)).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_eq!(
        fx.get("/notes/files/missing.png", Some(&guest)).await.status(),
        StatusCode::NOT_FOUND
    );
    assert_generic_denial(fx.get("/notes/files/..%2Fsecret.png", Some(&guest)).await).await;
    assert_generic_denial(fx.get("/notes/files/a/..%2F..%2F..%2Fsecret.png", Some(&guest)).await)
        .await;
}

#[tokio::test]
async fn upload_requires_upload_capability() {
    let fx = Fixture::new();
    let body = upload_body("dog.png", b"woof");

    assert_generic_denial(fx.send(upload_request("notes", body.clone(), None)).await).await;
    // Owner without an upload grant for their level
    assert_generic_denial(
        fx.send(upload_request("notes", body.clone(), Some(&token("alice", "Guest"))))
            .await,
    )
    .await;
    assert!(!fx.path("Wikis/notes/files/dog.png").exists());

    let response = fx
        .send(upload_request("notes", body, Some(&token("ed", "Editor"))))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert_eq!(std::fs::read(fx.path("Wikis/notes/files/dog.png")).unwrap(), b"woof");
}

#[tokio::test]
async fn upload_creates_files_directory() {
    let fx = Fixture::new();
    std::fs::remove_dir_all(fx.path("Wikis/notes/files")).unwrap();

    let response = fx
        .send(upload_request("notes", upload_body("new.gif", b"gif"), Some(&token("ed", "Editor"))))
        .await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(Path::new(&fx.path("Wikis/notes/files/new.gif")).is_file());
}

#[tokio::test]
async fn upload_rejects_bad_bodies_and_escapes() {
    let fx = Fixture::new();
    let editor = token("ed", "Editor");

    let escape = fx
        .send(upload_request("notes", upload_body("../../evil.png", b"x"), Some(&editor)))
        .await;
    assert_generic_denial(escape).await;
    assert!(!fx.path("evil.png").exists());

    let mismatched = serde_json::json!({
        "wiki": "IndexWiki",
        "tiddler": { "fields": { "title": "a.png", "text": "eA==" } }
    });
    assert_eq!(
        fx.send(upload_request("notes", mismatched, Some(&editor))).await.status(),
        StatusCode::BAD_REQUEST
    );

    let not_base64 = serde_json::json!({
        "tiddler": { "fields": { "title": "a.png", "text": "***" } }
    });
    assert_eq!(
        fx.send(upload_request("notes", not_base64, Some(&editor))).await.status(),
        StatusCode::BAD_REQUEST
    );

    let oversized = Request::post("/upload")
        .header("x-wiki-name", "notes")
        .header(header::AUTHORIZATION, format!("Bearer {}", editor))
        .body(Body::from(vec![b'a'; 10_000_001]))
        .unwrap();
    assert_eq!(fx.send(oversized).await.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn created_wiki_belongs_to_its_creator() {
    let fx = Fixture::new();
    let alice = token("alice", "Editor");

    let response = fx
        .send(create_request(serde_json::json!({ "name": "journal" }), Some(&alice)))
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: serde_json::Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(created["name"], "journal");
    assert_eq!(created["owner"], "alice");
    assert_eq!(created["public"], false);

    let local = std::fs::read_to_string(fx.path("Config/Local.toml")).expect("Local.toml");
    assert!(local.contains("journal"), "{local}");
    assert!(local.contains("owner = \"alice\""), "{local}");

    std::fs::create_dir_all(fx.path("Wikis/journal")).unwrap();
    std::fs::write(fx.path("Wikis/journal/index.html"), "<p>journal</p>").unwrap();
    assert_eq!(fx.get("/journal", Some(&alice)).await.status(), StatusCode::OK);
    assert_generic_denial(fx.get("/journal", Some(&token("bob", "Editor"))).await).await;
    assert_generic_denial(fx.get("/journal", None).await).await;
}

#[tokio::test]
async fn wiki_creation_guards() {
    let fx = Fixture::new();
    let bob = token("bob", "Editor");

    assert_generic_denial(
        fx.send(create_request(serde_json::json!({ "name": "mine" }), None)).await,
    )
    .await;
    assert_eq!(
        fx.send(create_request(serde_json::json!({ "name": "notes" }), Some(&bob)))
            .await
            .status(),
        StatusCode::CONFLICT
    );
    assert_eq!(
        fx.send(create_request(serde_json::json!({ "name": "../etc" }), Some(&bob)))
            .await
            .status(),
        StatusCode::BAD_REQUEST
    );
    assert!(!fx.path("Config/Local.toml").exists());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_creation_has_a_single_owner() {
    let fx = Fixture::new();
    let requests = (0..16).map(|i| {
        let user = format!("user{i}");
        let request = create_request(serde_json::json!({ "name": "shared" }), Some(&token(&user, "Editor")));
        let app = fx.app.clone();
        tokio::spawn(async move { (user, app.oneshot(request).await.expect("response").status()) })
    });
    let mut outcomes = Vec::new();
    for handle in requests.collect::<Vec<_>>() {
        outcomes.push(handle.await.expect("task"));
    }

    let created: Vec<&String> = outcomes
        .iter()
        .filter(|(_, status)| *status == StatusCode::CREATED)
        .map(|(user, _)| user)
        .collect();
    assert_eq!(created.len(), 1);
    assert!(outcomes
        .iter()
        .all(|(_, status)| *status == StatusCode::CREATED || *status == StatusCode::CONFLICT));

    let local = std::fs::read_to_string(fx.path("Config/Local.toml")).expect("Local.toml");
    assert!(local.contains(&format!("owner = \"{}\"", created[0])));
}

#[tokio::test]
async fn wiki_added_to_overrides_after_start_is_a_conflict() {
    let fx = Fixture::new();
    std::fs::write(fx.path("Config/Local.toml"), "[wikis.diary]\nowner = \"carol\"\n").unwrap();

    let response = fx
        .send(create_request(serde_json::json!({ "name": "diary" }), Some(&token("bob", "Editor"))))
        .await;
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let local = std::fs::read_to_string(fx.path("Config/Local.toml")).unwrap();
    assert_eq!(local, "[wikis.diary]\nowner = \"carol\"\n");
}

#[tokio::test]
async fn failed_persistence_reports_unapplied_change() {
    let fx = Fixture::new();
    // The overrides path is a directory, so re-reading it before the write fails
    std::fs::create_dir_all(fx.path("Config/Local.toml/blocked")).unwrap();

    let response = fx
        .send(create_request(
            serde_json::json!({ "name": "journal", "public": true }),
            Some(&token("alice", "Editor")),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("configuration change was not applied"));

    std::fs::create_dir_all(fx.path("Wikis/journal")).unwrap();
    std::fs::write(fx.path("Wikis/journal/index.html"), "<p>journal</p>").unwrap();
    assert_generic_denial(fx.get("/journal", None).await).await;
}

#[tokio::test]
async fn readiness_tracks_root_wiki() {
    let fx = Fixture::new();
    assert_eq!(fx.get("/readyz", None).await.status(), StatusCode::OK);

    std::fs::remove_dir_all(fx.path("Wikis/IndexWiki")).unwrap();
    assert_eq!(fx.get("/readyz", None).await.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let fx = Fixture::new();
    let response = fx.get("/healthz", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
