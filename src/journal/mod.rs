pub mod audit;
pub mod entry;
pub mod store;

pub use audit::{audit_entries, AuditFinding, AuditReport};
pub use entry::{EntryDecision, JournalEntry, JournalError, Reflection};
pub use store::Journal;
