//! Durable user profile: data model, consolidation and persistence.

pub mod confirm;
pub mod history;
pub mod learn;
pub(crate) mod lenient;
pub mod merge;
pub mod pending;
pub mod store;
pub mod summary;
pub mod types;

pub use confirm::{
    ConfirmationOutcome, ConfirmationReport, JudgeMethod, Verdict, apply_confirmations,
};
pub use history::{ConfirmationHistory, ConfirmationRecord, ConfirmationResult};
pub use learn::ProfileLearner;
pub use merge::{MergeContext, MergeReport, merge_candidates};
pub use pending::{PendingBook, PendingConfirmation, PendingKey};
pub use store::{LoadedProfile, ProfileStore};
pub use summary::{pending_hypotheses, summary_for_prompt};
pub use types::{
    CandidateUpdates, ItemStatus, ProfileCategory, ProfileConflict, ProfileItem, UserPreferences,
    UserProfile,
};
