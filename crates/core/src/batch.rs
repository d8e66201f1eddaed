use crate::apply::{apply_plan, ApplyResult};
use crate::config::RunConfig;
use crate::error::RenamerError;
use crate::planner::{generate_plan, RenamePlan};
use serde::Serialize;

/// Everything one invocation did, or would have done in dry-run mode.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub dry_run: bool,
    pub plan: RenamePlan,
    /// `None` in dry-run mode.
    pub applied: Option<ApplyResult>,
}

impl BatchReport {
    /// Files that were (or would be) left untouched because of a problem,
    /// plus entries the scan could not read.
    pub fn failure_count(&self) -> usize {
        let per_file = match &self.applied {
            Some(result) => result.failures.len(),
            None => self.plan.stats.unresolved,
        };
        per_file + self.plan.stats.unreadable_entries
    }

    pub fn has_failures(&self) -> bool {
        self.failure_count() > 0
    }
}

/// Scans, plans and then either reports or executes. Only problems with the
/// target directory itself are returned as errors.
pub fn run_batch(config: &RunConfig) -> Result<BatchReport, RenamerError> {
    let plan = generate_plan(config)?;

    if config.dry_run() {
        log::info!("dry run: {} renames planned", plan.stats.planned);
        return Ok(BatchReport {
            dry_run: true,
            plan,
            applied: None,
        });
    }

    let applied = apply_plan(&plan);
    log::info!(
        "renamed {} files, {} failed",
        applied.renamed.len(),
        applied.failures.len()
    );
    Ok(BatchReport {
        dry_run: false,
        plan,
        applied: Some(applied),
    })
}
