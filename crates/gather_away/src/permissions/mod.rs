//! Permission management for weak-spot gathering.
//!
//! Two concerns live here:
//!
//! - [`PermissionOracle`] - the host's capability lookup (`gatheraway.use`,
//!   `gatheraway.bypass`), with [`StaticPermissions`] as an in-memory backend
//! - [`ToolPolicy`] - the blacklist/whitelist gate applied to the held tool
//!
//! # Architecture
//!
//! A hit that reaches the permission layer is evaluated in two steps:
//!
//! 1. **Bypass** - ask the oracle for `gatheraway.bypass`; a holder skips step 2
//! 2. **Tool lists** - blacklist then whitelist, both must pass
//!
//! Oracle failures never grant anything: an `Err` reads as "capability absent".
//!
//! # Examples
//!
//! ## Deny list only
//!
//! ```rust
//! use gather_away::permissions::ToolPolicy;
//! use gather_away::events::ToolId;
//!
//! let policy = ToolPolicy::builder()
//!     .blacklist(vec!["jackhammer.entity".into(), "chainsaw.entity".into()])
//!     .build();
//!
//! assert!(!policy.check(Some(&ToolId::from("chainsaw.entity")), false).is_allowed());
//! assert!(policy.check(None, false).is_allowed());
//! ```
//!
//! ## Bypass holders
//!
//! ```rust
//! use gather_away::permissions::{Capability, PermissionOracle, StaticPermissions, ToolPolicy};
//! use gather_away::events::{PlayerId, ToolId};
//!
//! let perms = StaticPermissions::new().with_grant("admin", Capability::Bypass);
//! let policy = ToolPolicy::builder()
//!     .blacklist(vec!["jackhammer.entity".into()])
//!     .build();
//!
//! let bypass = perms.has_capability(&PlayerId::new("admin"), Capability::Bypass).unwrap_or(false);
//! assert!(policy.check(Some(&ToolId::from("jackhammer.entity")), bypass).is_allowed());
//! ```

mod handler;
mod oracle;

pub use handler::{ToolDecision, ToolPolicy, ToolPolicyBuilder};
pub use oracle::{Capability, PermissionOracle, StaticPermissions};
