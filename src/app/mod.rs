pub mod dispatch;
pub mod report;
pub mod run;

pub use dispatch::dispatch;
pub use run::{RunOptions, RunSummary, run_interview};
