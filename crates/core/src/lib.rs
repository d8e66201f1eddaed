mod apply;
mod batch;
mod config;
mod error;
mod exif_reader;
mod metadata;
mod naming;
mod planner;
mod sanitize;
#[cfg(test)]
mod test_support;

pub use apply::{apply_plan, ApplyResult, RenameFailure, RenameOperation};
pub use batch::{run_batch, BatchReport};
pub use config::{RunConfig, DEFAULT_EXTENSIONS};
pub use error::RenamerError;
pub use exif_reader::extract_timestamp;
pub use metadata::{PhotoFile, TimestampSource};
pub use naming::{generate_name, is_canonical_name};
pub use planner::{
    generate_plan, CandidateAction, NameRegistry, RenameCandidate, RenamePlan, RenameStats,
};
pub use sanitize::{sanitize_prefix, DEFAULT_PREFIX};
