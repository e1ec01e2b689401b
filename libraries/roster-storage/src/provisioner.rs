//! MySQL implementation of the bootstrap side effects

use crate::bootstrap::Provisioner;
use crate::error::{Result, StorageError};
use crate::schema::{create_database_statement, validate_database_name, SeedUser, CREATE_USERS_TABLE};
use crate::store::MySqlUserStore;
use async_trait::async_trait;
use sqlx::mysql::MySqlConnectOptions;
use sqlx::{Connection, MySql, MySqlConnection, QueryBuilder};

/// Owns the admin and scoped connections while bootstrap runs.
///
/// `server` must not select a database; the scoped connection is derived
/// from it by adding `database`.
pub struct MySqlProvisioner {
    server: MySqlConnectOptions,
    database: String,
    admin: Option<MySqlConnection>,
    scoped: Option<MySqlConnection>,
}

impl MySqlProvisioner {
    pub fn new(server: MySqlConnectOptions, database: impl Into<String>) -> Result<Self> {
        let database = database.into();
        validate_database_name(&database)?;

        Ok(Self {
            server,
            database,
            admin: None,
            scoped: None,
        })
    }

    pub fn database(&self) -> &str {
        &self.database
    }

    /// Hand the scoped connection to a [`MySqlUserStore`]
    pub fn into_store(self) -> Result<MySqlUserStore> {
        self.scoped
            .map(MySqlUserStore::new)
            .ok_or(StorageError::NotConnected("scoped"))
    }
}

#[async_trait]
impl Provisioner for MySqlProvisioner {
    async fn connect_server(&mut self) -> Result<()> {
        let conn = MySqlConnection::connect_with(&self.server)
            .await
            .map_err(|e| StorageError::connection("server", e))?;
        self.admin = Some(conn);
        Ok(())
    }

    async fn ensure_database(&mut self) -> Result<()> {
        let statement = create_database_statement(&self.database)?;
        let conn = self.admin.as_mut().ok_or(StorageError::NotConnected("admin"))?;
        // Text protocol: CREATE DATABASE cannot be prepared
        sqlx::Executor::execute(conn, statement.as_str()).await?;
        tracing::debug!(database = %self.database, "CREATE DATABASE IF NOT EXISTS");
        Ok(())
    }

    async fn connect_database(&mut self) -> Result<()> {
        if let Some(admin) = self.admin.take() {
            if let Err(e) = admin.close().await {
                tracing::warn!(error = %e, "Failed to close admin connection");
            }
        }

        let options = self.server.clone().database(&self.database);
        let conn = MySqlConnection::connect_with(&options)
            .await
            .map_err(|e| StorageError::connection(self.database.clone(), e))?;
        self.scoped = Some(conn);
        Ok(())
    }

    async fn ensure_table(&mut self) -> Result<()> {
        let conn = self.scoped.as_mut().ok_or(StorageError::NotConnected("scoped"))?;
        sqlx::Executor::execute(conn, CREATE_USERS_TABLE).await?;
        Ok(())
    }

    async fn seed(&mut self, users: &[SeedUser]) -> Result<u64> {
        if users.is_empty() {
            return Ok(0);
        }

        let conn = self.scoped.as_mut().ok_or(StorageError::NotConnected("scoped"))?;

        // INSERT IGNORE skips rows whose email already exists
        let mut builder: QueryBuilder<MySql> =
            QueryBuilder::new("INSERT IGNORE INTO users (name, email) ");
        builder.push_values(users, |mut row, user| {
            row.push_bind(user.name).push_bind(user.email);
        });

        let result = builder.build().execute(conn).await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn provisioner() -> MySqlProvisioner {
        MySqlProvisioner::new(MySqlConnectOptions::new(), "appdb").unwrap()
    }

    #[test]
    fn rejects_unsafe_database_name() {
        let result = MySqlProvisioner::new(MySqlConnectOptions::new(), "app; DROP");
        assert!(matches!(result, Err(StorageError::InvalidIdentifier(_))));
    }

    #[tokio::test]
    async fn ensure_database_needs_admin_connection() {
        let mut provisioner = provisioner();
        let err = provisioner.ensure_database().await.unwrap_err();
        assert!(matches!(err, StorageError::NotConnected("admin")));
    }

    #[tokio::test]
    async fn ensure_table_needs_scoped_connection() {
        let mut provisioner = provisioner();
        let err = provisioner.ensure_table().await.unwrap_err();
        assert!(matches!(err, StorageError::NotConnected("scoped")));
    }

    #[tokio::test]
    async fn empty_seed_set_touches_nothing() {
        let mut provisioner = provisioner();
        assert_eq!(provisioner.seed(&[]).await.unwrap(), 0);
        assert!(provisioner.into_store().is_err());
    }
}
