//! Domain types.

mod desired;
mod report;
mod scope;

pub use desired::DesiredSet;
pub use report::{SyncReport, Upsert};
pub use scope::{Scope, ScopeKind, StorageKind};
