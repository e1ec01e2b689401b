//! Single-connection `UserStore` backed by MySQL

use crate::error::StorageError;
use crate::users;
use async_trait::async_trait;
use roster_core::{
    error::Result,
    types::{NewUser, User, UserId, UserSummary},
    RosterError, UserStore,
};
use sqlx::{Connection, MySqlConnection};
use std::sync::Arc;
use tokio::sync::Mutex;

/// The one scoped connection the process talks to after bootstrap.
///
/// `None` once [`MySqlUserStore::close`] has run.
pub type SharedConnection = Arc<Mutex<Option<MySqlConnection>>>;

/// `UserStore` over the scoped connection produced by bootstrap.
///
/// Clones share the same connection; there is no pool. Statements from
/// concurrent requests are serialized on the connection.
#[derive(Clone)]
pub struct MySqlUserStore {
    conn: SharedConnection,
}

impl MySqlUserStore {
    pub fn new(conn: MySqlConnection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(Some(conn))),
        }
    }

    /// Close the underlying connection.
    ///
    /// Later operations fail with [`StorageError::ConnectionClosed`]. Closing
    /// an already closed store does nothing.
    pub async fn close(&self) -> std::result::Result<(), StorageError> {
        let conn = self.conn.lock().await.take();
        match conn {
            Some(conn) => {
                conn.close().await?;
                tracing::info!("Database connection closed");
                Ok(())
            }
            None => Ok(()),
        }
    }

    pub async fn is_closed(&self) -> bool {
        self.conn.lock().await.is_none()
    }
}

fn live(slot: &mut Option<MySqlConnection>) -> std::result::Result<&mut MySqlConnection, StorageError> {
    slot.as_mut().ok_or(StorageError::ConnectionClosed)
}

#[async_trait]
impl UserStore for MySqlUserStore {
    #[tracing::instrument(skip(self))]
    async fn list_users(&self) -> Result<Vec<User>> {
        let mut slot = self.conn.lock().await;
        Ok(users::get_all(live(&mut slot)?).await?)
    }

    #[tracing::instrument(skip(self))]
    async fn get_user(&self, id: UserId) -> Result<User> {
        let mut slot = self.conn.lock().await;
        users::get_by_id(live(&mut slot)?, id)
            .await?
            .ok_or(RosterError::UserNotFound(id))
    }

    #[tracing::instrument(skip_all)]
    async fn create_user(&self, user: NewUser) -> Result<UserSummary> {
        let mut slot = self.conn.lock().await;
        let id = users::create(live(&mut slot)?, &user).await?;
        tracing::debug!(%id, "User created");
        Ok(UserSummary::new(id, user))
    }

    #[tracing::instrument(skip(self, user))]
    async fn update_user(&self, id: UserId, user: NewUser) -> Result<UserSummary> {
        let mut slot = self.conn.lock().await;
        if users::update(live(&mut slot)?, id, &user).await? {
            Ok(UserSummary::new(id, user))
        } else {
            Err(RosterError::UserNotFound(id))
        }
    }

    #[tracing::instrument(skip(self))]
    async fn delete_user(&self, id: UserId) -> Result<()> {
        let mut slot = self.conn.lock().await;
        if users::delete(live(&mut slot)?, id).await? {
            Ok(())
        } else {
            Err(RosterError::UserNotFound(id))
        }
    }
}
