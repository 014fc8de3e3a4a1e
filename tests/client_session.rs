//! Typed client against a live server: session lifecycle and admin flows

use portfolio_backend::{
    auth::{models::NewUser, JwtHandler, UserStore},
    client::{reorder_request, ClientError, PortfolioClient, SessionStore},
    contacts::ContactPayload,
    create_router,
    db::Database,
    github::GithubClient,
    resources::{ProjectPayload, ResourcePayload},
    AppState,
};
use tempfile::TempDir;
use tokio::net::TcpListener;

const ADMIN_EMAIL: &str = "admin@portfolio.com";
const ADMIN_PASSWORD: &str = "Admin123!";

async fn spawn_server() -> String {
    let db = Database::open_in_memory().unwrap();
    let users = UserStore::new(db.clone()).with_hash_cost(4);
    users
        .ensure_admin(&NewUser {
            name: "Portfolio Admin".to_string(),
            email: ADMIN_EMAIL.to_string(),
            password: ADMIN_PASSWORD.to_string(),
        })
        .unwrap();
    let github = GithubClient::new("http://127.0.0.1:9", "octo", None).unwrap();
    let app = create_router(AppState::new(
        db,
        users,
        JwtHandler::new("client-secret"),
        github,
    ));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}", addr)
}

fn project(title: &str) -> ResourcePayload<ProjectPayload> {
    ResourcePayload::new(ProjectPayload {
        title: Some(title.to_string()),
        description: Some("D".to_string()),
        role: Some("R".to_string()),
        outcome: Some("O".to_string()),
        ..ProjectPayload::default()
    })
}

#[tokio::test]
async fn test_session_survives_restart_and_clears_on_signout() {
    let base = spawn_server().await;
    let dir = TempDir::new().unwrap();
    let session_path = dir.path().join("session.json");

    let mut client = PortfolioClient::new(&base)
        .unwrap()
        .with_session_store(SessionStore::new(&session_path));
    assert!(client.session().is_none());

    let user = client
        .signup(&NewUser {
            name: "Ann".to_string(),
            email: "ann@x.com".to_string(),
            password: "secret1".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(user.email, "ann@x.com");
    assert!(session_path.exists());

    let mut restored = PortfolioClient::new(&base)
        .unwrap()
        .with_session_store(SessionStore::new(&session_path));
    assert_eq!(restored.session().unwrap().user.id, user.id);
    assert!(!restored.is_admin());

    let err = restored.create_project(&project("P")).await.unwrap_err();
    match err {
        ClientError::Api { status, message } => {
            assert_eq!(status, 403);
            assert_eq!(message, "Admin privileges required");
        }
        other => panic!("unexpected error: {other}"),
    }

    restored.signout().await.unwrap();
    assert!(restored.session().is_none());
    assert!(!session_path.exists());
}

#[tokio::test]
async fn test_signout_clears_local_session_when_server_is_gone() {
    let dir = TempDir::new().unwrap();
    let session_path = dir.path().join("session.json");

    let base = spawn_server().await;
    let mut client = PortfolioClient::new(&base)
        .unwrap()
        .with_session_store(SessionStore::new(&session_path));
    client.signin(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();

    let mut offline = PortfolioClient::new("http://127.0.0.1:9")
        .unwrap()
        .with_session_store(SessionStore::new(&session_path));
    assert!(offline.session().is_some());

    assert!(offline.signout().await.is_err());
    assert!(offline.session().is_none());
    assert!(!session_path.exists());
}

#[tokio::test]
async fn test_admin_creates_and_reorders_projects() {
    let base = spawn_server().await;
    let mut admin = PortfolioClient::new(&base).unwrap();

    let bad = admin.signin(ADMIN_EMAIL, "wrong-password").await.unwrap_err();
    assert_eq!(bad.to_string(), "Email and password don't match");

    admin.signin(ADMIN_EMAIL, ADMIN_PASSWORD).await.unwrap();
    assert!(admin.is_admin());

    let a = admin.create_project(&project("A")).await.unwrap();
    let b = admin.create_project(&project("B")).await.unwrap();
    let c = admin.create_project(&project("C")).await.unwrap();

    let listing = admin
        .reorder_projects(&reorder_request([c.id, a.id, b.id]))
        .await
        .unwrap();
    let titles: Vec<&str> = listing.iter().map(|e| e.fields.title.as_str()).collect();
    assert_eq!(titles, vec!["C", "A", "B"]);

    let public = PortfolioClient::new(&base).unwrap();
    let listing = public.list_projects().await.unwrap();
    let orders: Vec<i64> = listing.iter().map(|e| e.order).collect();
    assert_eq!(orders, vec![0, 1, 2]);
    assert_eq!(listing[0].id, c.id);

    admin.delete_project(&a.id.to_string()).await.unwrap();
    assert_eq!(public.list_projects().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_anonymous_contact_submission() {
    let base = spawn_server().await;
    let client = PortfolioClient::new(&base).unwrap();

    let record = client
        .send_contact(&ContactPayload {
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
            phone: None,
            subject: Some("Hello".to_string()),
            message: Some("Looking forward to chatting.".to_string()),
        })
        .await
        .unwrap();
    assert_eq!(record.contact.first_name, "Ada");

    let err = client
        .send_contact(&ContactPayload::default())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "First name is required");
}
