//! Portfolio API Client
//! Mission: Typed access to the REST API with an explicit, persistent session

pub mod session;

pub use session::{Session, SessionStore};

use crate::auth::models::{NewUser, SessionUser, SignInRequest, SignInResponse, SignUpResponse};
use crate::contacts::{ContactPayload, ContactRecord};
use crate::resources::{
    Entry, Project, ProjectPayload, Qualification, QualificationPayload, ReorderEntry,
    ResourcePayload,
};
use reqwest::{Client, Method, RequestBuilder, Response};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

#[derive(Debug, Error)]
pub enum ClientError {
    /// The server answered with an error body
    #[error("{message}")]
    Api { status: u16, message: String },
    #[error("Not signed in")]
    NotSignedIn,
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("session storage failed: {0}")]
    Session(#[from] std::io::Error),
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// REST client holding at most one signed-in session
pub struct PortfolioClient {
    http: Client,
    base_url: String,
    session: Option<Session>,
    store: Option<SessionStore>,
}

impl PortfolioClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: None,
            store: None,
        })
    }

    /// Attach persistent storage and restore whatever session it holds
    pub fn with_session_store(mut self, store: SessionStore) -> Self {
        self.session = store.load();
        self.store = Some(store);
        self
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_admin(&self) -> bool {
        self.session.as_ref().is_some_and(Session::is_admin)
    }

    /// Create an account, then sign in with the same credentials
    pub async fn signup(&mut self, new_user: &NewUser) -> Result<SessionUser, ClientError> {
        let created: SignUpResponse = self
            .send(self.request(Method::POST, "/api/users").json(new_user))
            .await?;
        debug!(user_id = %created.user.id, "Account created");
        self.signin(&new_user.email, &new_user.password).await
    }

    pub async fn signin(&mut self, email: &str, password: &str) -> Result<SessionUser, ClientError> {
        let body = SignInRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response: SignInResponse = self
            .send(self.request(Method::POST, "/api/auth/signin").json(&body))
            .await?;

        let session = Session {
            token: response.token,
            user: response.user,
        };
        if let Some(store) = &self.store {
            store.save(&session)?;
        }
        info!(user_id = %session.user.id, "Signed in");
        let user = session.user.clone();
        self.session = Some(session);
        Ok(user)
    }

    /// Drop the local session even when the server call fails
    pub async fn signout(&mut self) -> Result<(), ClientError> {
        let result = self
            .send::<Value>(self.request(Method::POST, "/api/auth/signout"))
            .await;

        self.session = None;
        if let Some(store) = &self.store {
            store.clear()?;
        }

        if let Err(e) = &result {
            warn!("Sign-out request failed, local session cleared anyway: {}", e);
        }
        result.map(|_| ())
    }

    pub async fn list_projects(&self) -> Result<Vec<Entry<Project>>, ClientError> {
        self.send(self.request(Method::GET, "/api/projects")).await
    }

    pub async fn create_project(
        &self,
        payload: &ResourcePayload<ProjectPayload>,
    ) -> Result<Entry<Project>, ClientError> {
        let req = self.authed(Method::POST, "/api/projects")?.json(payload);
        self.send(req).await
    }

    pub async fn update_project(
        &self,
        id: &str,
        payload: &ResourcePayload<ProjectPayload>,
    ) -> Result<Entry<Project>, ClientError> {
        let req = self
            .authed(Method::PUT, &format!("/api/projects/{}", id))?
            .json(payload);
        self.send(req).await
    }

    pub async fn delete_project(&self, id: &str) -> Result<(), ClientError> {
        let req = self.authed(Method::DELETE, &format!("/api/projects/{}", id))?;
        self.send::<Value>(req).await.map(|_| ())
    }

    pub async fn reorder_projects(
        &self,
        order: &[ReorderEntry],
    ) -> Result<Vec<Entry<Project>>, ClientError> {
        let req = self
            .authed(Method::PATCH, "/api/projects/reorder")?
            .json(&json!({ "order": order }));
        self.send(req).await
    }

    pub async fn list_qualifications(&self) -> Result<Vec<Entry<Qualification>>, ClientError> {
        self.send(self.request(Method::GET, "/api/qualifications"))
            .await
    }

    pub async fn create_qualification(
        &self,
        payload: &ResourcePayload<QualificationPayload>,
    ) -> Result<Entry<Qualification>, ClientError> {
        let req = self.authed(Method::POST, "/api/qualifications")?.json(payload);
        self.send(req).await
    }

    pub async fn reorder_qualifications(
        &self,
        order: &[ReorderEntry],
    ) -> Result<Vec<Entry<Qualification>>, ClientError> {
        let req = self
            .authed(Method::PATCH, "/api/qualifications/reorder")?
            .json(&json!({ "order": order }));
        self.send(req).await
    }

    pub async fn send_contact(&self, payload: &ContactPayload) -> Result<ContactRecord, ClientError> {
        self.send(self.request(Method::POST, "/api/contacts").json(payload))
            .await
    }

    /// Request with the session token attached when one is present
    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.http.request(method, format!("{}{}", self.base_url, path));
        match &self.session {
            Some(session) => req.bearer_auth(&session.token),
            None => req,
        }
    }

    /// Request that needs a session; fails locally without one
    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ClientError> {
        if self.session.is_none() {
            return Err(ClientError::NotSignedIn);
        }
        Ok(self.request(method, path))
    }

    async fn send<T: DeserializeOwned>(&self, req: RequestBuilder) -> Result<T, ClientError> {
        let resp = req.send().await?;
        decode(resp).await
    }
}

/// Success bodies decode into `T`; error bodies surface the server's `error` string
async fn decode<T: DeserializeOwned>(resp: Response) -> Result<T, ClientError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp.json::<T>().await?);
    }

    let message = resp
        .json::<ErrorBody>()
        .await
        .ok()
        .and_then(|body| body.error)
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()));

    Err(ClientError::Api {
        status: status.as_u16(),
        message,
    })
}

/// Shape accepted by every `/reorder` endpoint
pub fn reorder_request<I, S>(ids_in_order: I) -> Vec<ReorderEntry>
where
    I: IntoIterator<Item = S>,
    S: ToString,
{
    ids_in_order
        .into_iter()
        .enumerate()
        .map(|(index, id)| ReorderEntry {
            id: id.to_string(),
            order: index as i64,
        })
        .collect()
}
