//! Roster Core
//!
//! Domain types, the storage seam, and error handling shared by the
//! storage layer and the HTTP server.
//!
//! # Architecture
//!
//! - **Domain Types**: `User`, `UserId`, `NewUser`, `UserSummary`
//! - **Core Trait**: `UserStore`, implemented by `roster-storage` (MySQL)
//!   and by in-memory doubles in tests
//! - **Error Handling**: unified `RosterError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use roster_core::types::{NewUser, UserDraft};
//!
//! let draft = UserDraft {
//!     name: Some("Ada".to_string()),
//!     email: Some("ada@example.com".to_string()),
//! };
//! let user: NewUser = draft.validate().unwrap();
//! assert_eq!(user.email(), "ada@example.com");
//!
//! // Missing fields never reach storage
//! assert!(UserDraft::default().validate().is_err());
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod storage;
pub mod types;

// Re-export commonly used types
pub use error::{Result, RosterError};
pub use storage::UserStore;
pub use types::{NewUser, User, UserDraft, UserId, UserSummary};
