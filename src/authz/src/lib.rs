//! # Facilium Authorization Core
//!
//! Role-based access control for the Facilium facility-management
//! platform: a static role→permission registry, pure set-membership
//! predicates over a caller's role list, a session-bound permission
//! facade, and enforcement wrappers gating request handlers.
//!
//! Authentication is someone else's job. This crate consumes the
//! authenticated identity through [`SessionSource`] and answers one
//! question: may this caller do that?
//!
//! ## Example
//!
//! ```rust
//! use facilium_authz::{
//!     guard::require_permission, registry::permission, AccessResolver, Registry, Session,
//!     StaticSession,
//! };
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let registry = Arc::new(Registry::default());
//!     let session = Session::new("user:alice").with_roles(["manager"]);
//!     let resolver = AccessResolver::new(registry, Arc::new(StaticSession::from(session)));
//!
//!     let access = require_permission(&resolver, permission::FACILITY_CREATE).await?;
//!     assert!(access.can(permission::BOOKING_MANAGE));
//!
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod error;
pub mod gate;
pub mod guard;
pub mod predicate;
pub mod registry;
pub mod session;

// Re-export commonly used types
pub use access::{session_channel, Access, AccessResolver, AccessWatch, SessionWriter};
pub use error::{AuthzError, Result};
pub use gate::Gate;
pub use guard::Requirement;
pub use registry::{PermissionId, Registry, RoleId};
pub use session::{MemorySessions, Session, SessionSource, StaticSession};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
