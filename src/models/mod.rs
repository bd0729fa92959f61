pub mod project;
pub mod report;
pub mod time_entry;
pub mod timer;

pub use project::Project;
pub use report::{Analytics, AnalyticsRow, Ledger, LedgerRow};
pub use time_entry::{EntryKey, EntryRef, EntryUpdate, NewTimeEntry, TimeEntry};
pub use timer::Timer;
