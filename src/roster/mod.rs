//! Student records: storage, patching, validation, and the operations built on them.

pub mod patch;
mod service;
pub mod store;
pub mod types;
pub mod validate;

pub use patch::{PatchOp, PatchOperation, apply_patch};
pub use service::{RosterApi, RosterService};
pub use store::StudentStore;
pub use types::{FieldError, RosterError, Student, StudentView};
