//! Retry orchestration.
//!
//! [`retrier`] resolves a policy descriptor up front, then drives the
//! subject through the resulting decision function until the subject
//! succeeds or the decision aborts. Limits and timing live entirely in the
//! decision; the loop only sequences attempts.

mod run;

pub use run::{retrier, retrier_with, run_with_retry};
