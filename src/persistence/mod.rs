//! Durable session records
//!
//! Features:
//! - Per-room storage keys with a fixed default when no room is known
//! - JSON records validated on the way in and on the way out
//! - Every storage failure treated as "no stored value"

pub mod records;
pub mod vault;

pub use records::{PasswordRecord, SessionRecord, StorageKeys};
pub use vault::SessionVault;
