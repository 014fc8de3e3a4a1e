//! End-to-end router tests: auth gateway, access policy and ordered resources

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use portfolio_backend::{
    auth::{models::NewUser, JwtHandler, UserStore},
    create_router,
    db::Database,
    github::GithubClient,
    AppState,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADMIN_EMAIL: &str = "admin@portfolio.com";
const ADMIN_PASSWORD: &str = "Admin123!";

fn build_app(github_base: &str) -> Router {
    let db = Database::open_in_memory().unwrap();
    let users = UserStore::new(db.clone()).with_hash_cost(4);
    users
        .ensure_admin(&NewUser {
            name: "Portfolio Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        })
        .unwrap();

    let github = GithubClient::new(github_base, "octo", None).unwrap();
    let state = AppState::new(db, users, JwtHandler::new("integration-secret"), github);
    create_router(state)
}

fn test_app() -> Router {
    build_app("http://127.0.0.1:9")
}

async fn call(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn sign_in(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = call(
        app,
        Method::POST,
        "/api/auth/signin",
        None,
        Some(json!({ "email": email, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "sign-in failed: {}", body);
    body["token"].as_str().unwrap().to_string()
}

async fn sign_up(app: &Router, name: &str, email: &str, password: &str) -> (StatusCode, Value) {
    call(
        app,
        Method::POST,
        "/api/users",
        None,
        Some(json!({ "name": name, "email": email, "password": password })),
    )
    .await
}

fn project(title: &str) -> Value {
    json!({
        "title": title,
        "description": "D",
        "role": "R",
        "outcome": "O",
    })
}

#[tokio::test]
async fn test_signup_signin_and_project_guards() {
    let app = test_app();

    let (status, body) = sign_up(&app, "Ann", "ann@x.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["message"], "Successfully signed up!");
    assert_eq!(body["user"]["email"], "ann@x.com");
    assert_eq!(body["user"]["role"], "user");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("passwordHash").is_none());
    assert!(body["user"].get("password_hash").is_none());

    let ann = sign_in(&app, "ann@x.com", "secret1").await;

    let (status, body) = call(&app, Method::GET, "/api/projects", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_array());

    let (status, body) = call(&app, Method::POST, "/api/projects", None, Some(project("P"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Authorization token missing");

    let (status, body) =
        call(&app, Method::POST, "/api/projects", Some(&ann), Some(project("P"))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Admin privileges required");

    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, body) = call(
        &app,
        Method::POST,
        "/api/projects",
        Some(&admin),
        Some(json!({
            "title": "P",
            "description": "D",
            "role": "R",
            "outcome": "O",
            "technologies": "a, b, c",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["technologies"], json!(["a", "b", "c"]));
    assert_eq!(body["order"], 0);
    assert_eq!(body["status"], "In Progress");
    assert_eq!(body["isFeatured"], true);
}

#[tokio::test]
async fn test_invalid_tokens_are_rejected() {
    let app = test_app();

    let (status, body) = call(
        &app,
        Method::DELETE,
        "/api/projects",
        Some("not.a.token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid or expired token");

    let foreign = JwtHandler::new("some-other-secret")
        .issue(uuid::Uuid::new_v4())
        .unwrap();
    let (status, _) = call(&app, Method::DELETE, "/api/projects", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_accepted_from_cookie() {
    let app = test_app();
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/users")
        .header(header::COOKIE, format!("token={}", admin))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_deleted_user_token_is_rejected() {
    let app = test_app();
    let (_, body) = sign_up(&app, "Ann", "ann@x.com", "secret1").await;
    let ann_id = body["user"]["id"].as_str().unwrap().to_string();
    let ann = sign_in(&app, "ann@x.com", "secret1").await;

    let (status, body) = call(
        &app,
        Method::DELETE,
        &format!("/api/users/{}", ann_id),
        Some(&ann),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User deleted");

    let (status, body) = call(
        &app,
        Method::GET,
        &format!("/api/users/{}", ann_id),
        Some(&ann),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "User no longer exists");
}

#[tokio::test]
async fn test_signup_validation_and_duplicates() {
    let app = test_app();

    let (status, body) = sign_up(&app, "Ann", "ann@x.com", "12345").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Password must be at least 6 characters.");

    let (status, _) = sign_up(&app, "", "ann@x.com", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = sign_up(&app, "Ann", "not-an-email", "secret1").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = sign_up(&app, "Ann", "ann@x.com", "secret1").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = sign_up(&app, "Ann Again", "ANN@X.COM", "secret2").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Email already exists");
}

#[tokio::test]
async fn test_signin_failures_look_identical() {
    let app = test_app();
    sign_up(&app, "Ann", "ann@x.com", "secret1").await;

    let attempt = |email: &'static str, password: &'static str| {
        let app = app.clone();
        async move {
            call(
                &app,
                Method::POST,
                "/api/auth/signin",
                None,
                Some(json!({ "email": email, "password": password })),
            )
            .await
        }
    };

    let wrong_password = attempt("ann@x.com", "wrong-one").await;
    let unknown_email = attempt("bob@x.com", "secret1").await;

    assert_eq!(wrong_password.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password, unknown_email);
    assert_eq!(wrong_password.1["error"], "Email and password don't match");
}

#[tokio::test]
async fn test_user_self_or_admin_policy() {
    let app = test_app();
    let (_, ann_body) = sign_up(&app, "Ann", "ann@x.com", "secret1").await;
    let (_, bob_body) = sign_up(&app, "Bob", "bob@x.com", "secret1").await;
    let ann_id = ann_body["user"]["id"].as_str().unwrap().to_string();
    let bob_id = bob_body["user"]["id"].as_str().unwrap().to_string();
    let ann = sign_in(&app, "ann@x.com", "secret1").await;
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let ann_path = format!("/api/users/{}", ann_id);
    let bob_path = format!("/api/users/{}", bob_id);

    let (status, body) = call(&app, Method::GET, &ann_path, Some(&ann), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann");

    let (status, body) = call(&app, Method::GET, &bob_path, Some(&ann), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "Not authorized to access this resource");

    let (status, _) = call(&app, Method::GET, &bob_path, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = call(&app, Method::GET, "/api/users", Some(&ann), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(&app, Method::GET, "/api/users", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 3);

    let (status, body) = call(
        &app,
        Method::PUT,
        &ann_path,
        Some(&ann),
        Some(json!({ "name": "Ann Lee" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann Lee");

    let (status, _) = call(
        &app,
        Method::PUT,
        &ann_path,
        Some(&ann),
        Some(json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = call(
        &app,
        Method::PUT,
        &bob_path,
        Some(&admin),
        Some(json!({ "role": "admin" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "admin");

    let (status, _) = call(&app, Method::GET, "/api/users/not-a-uuid", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = call(&app, Method::GET, "/api/users/not-a-uuid", Some(&ann), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = call(&app, Method::GET, &ann_path, None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_reorder_lists_in_submitted_order() {
    let app = test_app();
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, a) = call(&app, Method::POST, "/api/projects", Some(&admin), Some(project("A"))).await;
    let (_, b) = call(&app, Method::POST, "/api/projects", Some(&admin), Some(project("B"))).await;
    assert_eq!(a["order"], 0);
    assert_eq!(b["order"], 1);

    let (status, body) = call(
        &app,
        Method::PATCH,
        "/api/projects/reorder",
        Some(&admin),
        Some(json!({ "order": [
            { "id": a["id"], "order": 1 },
            { "id": b["id"], "order": 0 },
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["title"], "B");

    let (_, listing) = call(&app, Method::GET, "/api/projects", None, None).await;
    let titles: Vec<&str> = listing
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["B", "A"]);
    assert_eq!(listing[0]["order"], 0);
    assert_eq!(listing[1]["order"], 1);

    let (status, body) = call(
        &app,
        Method::PATCH,
        "/api/projects/reorder",
        Some(&admin),
        Some(json!({ "order": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Order payload must be a non-empty array");

    let (status, _) = call(
        &app,
        Method::PATCH,
        "/api/projects/reorder",
        None,
        Some(json!({ "order": [] })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_project_crud_and_delete_all() {
    let app = test_app();
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (_, created) =
        call(&app, Method::POST, "/api/projects", Some(&admin), Some(project("A"))).await;
    let item_path = format!("/api/projects/{}", created["id"].as_str().unwrap());

    let (status, body) = call(&app, Method::GET, &item_path, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "A");

    let (status, body) = call(
        &app,
        Method::PUT,
        &item_path,
        Some(&admin),
        Some(json!({ "highlights": "x\ny, x", "status": "Completed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["highlights"], json!(["x", "y"]));
    assert_eq!(body["status"], "Completed");
    assert_eq!(body["title"], "A");

    let (status, body) = call(
        &app,
        Method::PUT,
        &item_path,
        Some(&admin),
        Some(json!({ "status": "Abandoned" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/projects",
        Some(&admin),
        Some(json!({ "description": "D", "role": "R", "outcome": "O" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Project title is required");

    let (status, body) = call(&app, Method::DELETE, &item_path, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Project deleted");

    let (status, body) = call(&app, Method::GET, &item_path, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Project not found");

    let (status, _) = call(&app, Method::GET, "/api/projects/garbage", None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    call(&app, Method::POST, "/api/projects", Some(&admin), Some(project("B"))).await;
    for _ in 0..2 {
        let (status, body) = call(&app, Method::DELETE, "/api/projects", Some(&admin), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "All projects deleted");
        let (_, listing) = call(&app, Method::GET, "/api/projects", None, None).await;
        assert_eq!(listing, json!([]));
    }
}

#[tokio::test]
async fn test_qualifications_share_the_surface() {
    let app = test_app();
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/qualifications",
        Some(&admin),
        Some(json!({
            "institution": "Centennial College",
            "program": "CET",
            "status": "Enrolled",
            "period": "2024 - Present",
            "location": "Toronto",
            "description": "Diploma",
            "highlights": "Networks,Hardware",
            "order": 4,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["type"], "college");
    assert_eq!(body["order"], 4);
    assert_eq!(body["highlights"], json!(["Networks", "Hardware"]));

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/qualifications",
        Some(&admin),
        Some(json!({ "institution": "X" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Program or degree is required");

    let (status, body) = call(&app, Method::DELETE, "/api/qualifications", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All qualifications deleted");
}

#[tokio::test]
async fn test_contacts_public_create_admin_manage() {
    let app = test_app();

    let (status, created) = call(
        &app,
        Method::POST,
        "/api/contacts",
        None,
        Some(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ADA@EXAMPLE.COM",
            "subject": "Hello",
            "message": "Let's build something together.",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["email"], "ada@example.com");

    let (status, body) = call(
        &app,
        Method::POST,
        "/api/contacts",
        None,
        Some(json!({
            "firstName": "Ada",
            "lastName": "Lovelace",
            "email": "ada@example.com",
            "subject": "Hi",
            "message": "short",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Message should be at least 10 characters");

    let (status, listing) = call(&app, Method::GET, "/api/contacts", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listing.as_array().unwrap().len(), 1);

    let item_path = format!("/api/contacts/{}", created["id"].as_str().unwrap());
    let (status, _) = call(
        &app,
        Method::PUT,
        &item_path,
        None,
        Some(json!({ "subject": "Changed" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, body) = call(
        &app,
        Method::PUT,
        &item_path,
        Some(&admin),
        Some(json!({ "subject": "Changed" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subject"], "Changed");

    let (status, body) = call(&app, Method::DELETE, &item_path, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Contact deleted");

    let (status, body) = call(&app, Method::DELETE, "/api/contacts", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "All contacts deleted");
}

#[tokio::test]
async fn test_malformed_json_gets_error_body() {
    let app = test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/users")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_signout_clears_cookie() {
    let app = test_app();
    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/auth/signout")
        .header(header::COOKIE, format!("token={}", admin))
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let cleared = response
        .headers()
        .get(header::SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap()
        .to_string();
    assert!(cleared.starts_with("token="));

    let (status, body) = call(&app, Method::GET, "/api/auth/signout", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Signed out");
}

#[tokio::test]
async fn test_health_check() {
    let (status, body) = call(&test_app(), Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn test_github_proxy_is_admin_only() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/users/someone/repos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{
            "id": 1,
            "name": "demo",
            "full_name": "someone/demo",
            "html_url": "https://github.com/someone/demo",
            "description": null,
            "homepage": null,
            "language": "Rust",
            "topics": [],
            "forks_count": 0,
            "stargazers_count": 2,
            "pushed_at": null,
            "default_branch": "main",
            "visibility": "public"
        }])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/users/ghost/repos"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({ "message": "Not Found" })))
        .mount(&server)
        .await;

    let app = build_app(&server.uri());
    let (status, _) = call(&app, Method::GET, "/api/github/repos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let admin = sign_in(&app, ADMIN_EMAIL, ADMIN_PASSWORD).await;
    let (status, body) = call(
        &app,
        Method::GET,
        "/api/github/repos?username=someone",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["repoName"], "demo");
    assert_eq!(body[0]["stars"], 2);

    let (status, body) = call(
        &app,
        Method::GET,
        "/api/github/repos?username=ghost",
        Some(&admin),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"], "Not Found");
}
