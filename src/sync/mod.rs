//! Commit protocol and the optimistic dispatcher.

mod commit;
mod dispatcher;

pub use commit::Commit;
pub use dispatcher::{PumpReport, SharedSync, SyncDispatcher};
