//! Startup bootstrap state machine
//!
//! Brings the database from "may not exist" to "ready to serve":
//!
//! ```text
//! Unconnected -> AdminConnected -> DatabaseEnsured -> ScopedConnected
//!             -> TableEnsured -> Seeded -> Ready
//! ```
//!
//! The three connectivity transitions are fatal: their failure ends the run
//! with a [`BootstrapError`]. Table creation and seeding are advisory: a
//! failure is logged, recorded in the [`BootstrapReport`], and the machine
//! still advances.

use crate::error::{Result, StorageError};
use crate::schema::{SeedUser, SEED_USERS};
use async_trait::async_trait;
use std::fmt;
use std::future::Future;
use thiserror::Error;

/// The side effects each transition needs.
///
/// [`MySqlProvisioner`](crate::MySqlProvisioner) is the production
/// implementation.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Provisioner: Send {
    /// Open a connection to the server with no database selected
    async fn connect_server(&mut self) -> Result<()>;

    /// Create the configured database if it is absent
    async fn ensure_database(&mut self) -> Result<()>;

    /// Close the admin connection and reconnect scoped to the database
    async fn connect_database(&mut self) -> Result<()>;

    /// Create the users table if it is absent
    async fn ensure_table(&mut self) -> Result<()>;

    /// Insert seed rows, ignoring duplicates; returns rows actually inserted
    async fn seed(&mut self, users: &[SeedUser]) -> Result<u64>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapStage {
    Unconnected,
    AdminConnected,
    DatabaseEnsured,
    ScopedConnected,
    TableEnsured,
    Seeded,
    Ready,
}

impl BootstrapStage {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Unconnected => "unconnected",
            Self::AdminConnected => "admin-connected",
            Self::DatabaseEnsured => "database-ensured",
            Self::ScopedConnected => "scoped-connected",
            Self::TableEnsured => "table-ensured",
            Self::Seeded => "seeded",
            Self::Ready => "ready",
        }
    }
}

impl fmt::Display for BootstrapStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A fatal connectivity failure. `stage` is the state that could not be reached.
#[derive(Debug, Error)]
#[error("bootstrap could not reach {stage}: {source}")]
pub struct BootstrapError {
    pub stage: BootstrapStage,
    #[source]
    pub source: StorageError,
}

/// A non-fatal schema or seed failure
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BootstrapWarning {
    pub stage: BootstrapStage,
    pub message: String,
}

/// Outcome of a successful run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    /// Seed rows inserted by this run (0 when they already existed)
    pub seeded_rows: u64,
    pub warnings: Vec<BootstrapWarning>,
}

impl BootstrapReport {
    pub fn is_clean(&self) -> bool {
        self.warnings.is_empty()
    }
}

/// Drives a [`Provisioner`] through the bootstrap stages, one transition at a time
pub struct Bootstrapper<P> {
    provisioner: P,
    seeds: Vec<SeedUser>,
    stage: BootstrapStage,
    report: BootstrapReport,
}

impl<P: Provisioner> Bootstrapper<P> {
    pub fn new(provisioner: P) -> Self {
        Self::with_seeds(provisioner, SEED_USERS.to_vec())
    }

    pub fn with_seeds(provisioner: P, seeds: Vec<SeedUser>) -> Self {
        Self {
            provisioner,
            seeds,
            stage: BootstrapStage::Unconnected,
            report: BootstrapReport::default(),
        }
    }

    pub fn stage(&self) -> BootstrapStage {
        self.stage
    }

    pub fn report(&self) -> &BootstrapReport {
        &self.report
    }

    /// Perform the next transition and return the new stage.
    ///
    /// On a fatal error the stage is left unchanged. Advancing from `Ready`
    /// is a no-op.
    pub async fn advance(&mut self) -> std::result::Result<BootstrapStage, BootstrapError> {
        let next = match self.stage {
            BootstrapStage::Unconnected => {
                fatal(BootstrapStage::AdminConnected, self.provisioner.connect_server()).await?;
                tracing::info!("Connected to database server (no database selected)");
                BootstrapStage::AdminConnected
            }
            BootstrapStage::AdminConnected => {
                fatal(BootstrapStage::DatabaseEnsured, self.provisioner.ensure_database()).await?;
                tracing::info!("Database is present");
                BootstrapStage::DatabaseEnsured
            }
            BootstrapStage::DatabaseEnsured => {
                fatal(BootstrapStage::ScopedConnected, self.provisioner.connect_database()).await?;
                tracing::info!("Connected to application database");
                BootstrapStage::ScopedConnected
            }
            BootstrapStage::ScopedConnected => {
                match self.provisioner.ensure_table().await {
                    Ok(()) => tracing::info!("Users table ready"),
                    Err(e) => self.warn(BootstrapStage::TableEnsured, &e),
                }
                BootstrapStage::TableEnsured
            }
            BootstrapStage::TableEnsured => {
                match self.provisioner.seed(&self.seeds).await {
                    Ok(inserted) => {
                        tracing::info!(inserted, "Sample users inserted");
                        self.report.seeded_rows = inserted;
                    }
                    Err(e) => self.warn(BootstrapStage::Seeded, &e),
                }
                BootstrapStage::Seeded
            }
            BootstrapStage::Seeded | BootstrapStage::Ready => BootstrapStage::Ready,
        };

        self.stage = next;
        Ok(next)
    }

    /// Run every remaining transition, then hand back the provisioner
    /// holding the scoped connection.
    pub async fn run(mut self) -> std::result::Result<(P, BootstrapReport), BootstrapError> {
        while self.stage != BootstrapStage::Ready {
            self.advance().await?;
        }
        Ok((self.provisioner, self.report))
    }

    fn warn(&mut self, stage: BootstrapStage, err: &StorageError) {
        tracing::warn!(%stage, error = %err, "Bootstrap step failed, continuing");
        self.report.warnings.push(BootstrapWarning {
            stage,
            message: err.to_string(),
        });
    }
}

/// Await a connectivity step; its failure ends the run at `target`
async fn fatal<F>(target: BootstrapStage, step: F) -> std::result::Result<(), BootstrapError>
where
    F: Future<Output = Result<()>>,
{
    step.await.map_err(|source| {
        tracing::error!(stage = %target, error = %source, "Bootstrap failed");
        BootstrapError {
            stage: target,
            source,
        }
    })
}
