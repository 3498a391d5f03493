//! Verification of Game of Life grid snapshots.
//!
//! A ground-truth snapshot is decoded once and every candidate snapshot is decoded and compared
//! against it on a bounded worker pool. Results always come back in candidate order.

pub use config::VerifyConfig;
pub use error::{DecodeError, VerifyError};
pub use format::GridFormat;
pub use oracle::Verdict;
pub use protocol::{PhasedVerdict, VerdictPair, verify_cso, verify_fm};
pub use source::{GridSource, MemorySource};

pub mod config;
pub mod error;
pub mod format;
pub mod oracle;
pub mod protocol;
pub mod scheduler;
pub mod source;
