//! Roster Storage
//!
//! MySQL persistence for Roster users.
//!
//! # Architecture
//!
//! - **Bootstrap**: an explicit state machine that provisions the database,
//!   the `users` table and the seed rows before anything is served
//! - **Single connection**: bootstrap produces one scoped connection, shared
//!   by every request through [`MySqlUserStore`]; there is no pool
//! - **Vertical slice**: `users` owns its queries, all parameterized
//!
//! # Example
//!
//! ```rust,no_run
//! use roster_storage::{Bootstrapper, MySqlProvisioner};
//! use roster_core::UserStore;
//! use sqlx::mysql::MySqlConnectOptions;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = MySqlConnectOptions::new()
//!     .host("localhost")
//!     .username("admin")
//!     .password("secret");
//!
//! let provisioner = MySqlProvisioner::new(server, "appdb")?;
//! let (provisioner, report) = Bootstrapper::new(provisioner).run().await?;
//! let store = provisioner.into_store()?;
//!
//! let users = store.list_users().await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod provisioner;
mod store;

pub mod bootstrap;
pub mod schema;
pub mod users;

pub use bootstrap::{
    BootstrapError, BootstrapReport, BootstrapStage, BootstrapWarning, Bootstrapper, Provisioner,
};
pub use error::StorageError;
pub use provisioner::MySqlProvisioner;
pub use schema::{SeedUser, SEED_USERS};
pub use store::{MySqlUserStore, SharedConnection};
