//! Common test utilities and fixtures
#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use roster_core::{
    error::Result, NewUser, RosterError, User, UserId, UserStore, UserSummary,
};
use roster_server::{create_router, AppState, InstanceMetadataClient};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tower::util::ServiceExt;

/// Nothing listens here, so metadata lookups fail fast
pub const DEAD_METADATA_ENDPOINT: &str = "http://127.0.0.1:9/latest/meta-data";

/// In-memory `UserStore` with auto-increment ids and a unique email constraint
#[derive(Default)]
pub struct InMemoryUserStore {
    inner: Mutex<Rows>,
}

#[derive(Default)]
struct Rows {
    users: Vec<User>,
    last_id: i64,
}

impl InMemoryUserStore {
    /// Store holding the three sample users
    pub fn seeded() -> Self {
        let store = Self::default();
        {
            let mut rows = store.inner.lock().unwrap();
            for seed in roster_storage::SEED_USERS {
                rows.last_id += 1;
                let id = UserId::new(rows.last_id);
                rows.users.push(User {
                    id,
                    name: seed.name.to_string(),
                    email: seed.email.to_string(),
                    created_at: chrono::Utc::now(),
                });
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().users.len()
    }

    pub fn find_by_email(&self, email: &str) -> Option<User> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.email == email)
            .cloned()
    }
}

fn duplicate(email: &str) -> RosterError {
    RosterError::storage(format!("Duplicate entry '{}' for key 'users.email'", email))
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.inner.lock().unwrap().users.clone())
    }

    async fn get_user(&self, id: UserId) -> Result<User> {
        self.inner
            .lock()
            .unwrap()
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or(RosterError::UserNotFound(id))
    }

    async fn create_user(&self, user: NewUser) -> Result<UserSummary> {
        let mut rows = self.inner.lock().unwrap();
        if rows.users.iter().any(|u| u.email == user.email()) {
            return Err(duplicate(user.email()));
        }

        rows.last_id += 1;
        let id = UserId::new(rows.last_id);
        rows.users.push(User {
            id,
            name: user.name().to_string(),
            email: user.email().to_string(),
            created_at: chrono::Utc::now(),
        });
        Ok(UserSummary::new(id, user))
    }

    async fn update_user(&self, id: UserId, user: NewUser) -> Result<UserSummary> {
        let mut rows = self.inner.lock().unwrap();
        if rows
            .users
            .iter()
            .any(|u| u.id != id && u.email == user.email())
        {
            return Err(duplicate(user.email()));
        }

        let row = rows
            .users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(RosterError::UserNotFound(id))?;
        row.name = user.name().to_string();
        row.email = user.email().to_string();
        Ok(UserSummary::new(id, user))
    }

    async fn delete_user(&self, id: UserId) -> Result<()> {
        let mut rows = self.inner.lock().unwrap();
        let before = rows.users.len();
        rows.users.retain(|u| u.id != id);
        if rows.users.len() == before {
            Err(RosterError::UserNotFound(id))
        } else {
            Ok(())
        }
    }
}

/// Store whose every query fails, as when the connection has dropped
pub struct BrokenUserStore;

fn broken() -> RosterError {
    RosterError::storage("Connection reset by peer (os error 104)")
}

#[async_trait]
impl UserStore for BrokenUserStore {
    async fn list_users(&self) -> Result<Vec<User>> {
        Err(broken())
    }

    async fn get_user(&self, _id: UserId) -> Result<User> {
        Err(broken())
    }

    async fn create_user(&self, _user: NewUser) -> Result<UserSummary> {
        Err(broken())
    }

    async fn update_user(&self, _id: UserId, _user: NewUser) -> Result<UserSummary> {
        Err(broken())
    }

    async fn delete_user(&self, _id: UserId) -> Result<()> {
        Err(broken())
    }
}

/// Build the real router over `store`, with metadata at `metadata_endpoint`
pub fn create_test_app_with_metadata(
    store: Arc<dyn UserStore>,
    metadata_endpoint: &str,
) -> Router {
    let metadata = InstanceMetadataClient::new(metadata_endpoint, Duration::from_millis(500))
        .expect("metadata client");
    create_router(AppState::new(store, Arc::new(metadata)))
}

pub fn create_test_app(store: Arc<dyn UserStore>) -> Router {
    create_test_app_with_metadata(store, DEAD_METADATA_ENDPOINT)
}

/// Send one request; returns status and the parsed JSON body (Null when empty)
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json).unwrap())
        }
        None => Body::empty(),
    };

    let response = app
        .clone()
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}
