use crate::planner::{CandidateAction, RenamePlan};
use anyhow::{bail, Context, Result};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenameOperation {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenameFailure {
    pub original_path: PathBuf,
    pub target_path: Option<PathBuf>,
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct ApplyResult {
    pub renamed: Vec<RenameOperation>,
    pub failures: Vec<RenameFailure>,
}

/// Performs every rename in plan order. A failing file is recorded and the
/// rest of the batch still runs; nothing is rolled back.
pub fn apply_plan(plan: &RenamePlan) -> ApplyResult {
    let mut result = ApplyResult::default();

    for candidate in &plan.candidates {
        let original_path = &candidate.original_path;
        match &candidate.action {
            CandidateAction::Rename { target_path, .. } => {
                match rename_without_overwrite(original_path, target_path) {
                    Ok(()) => {
                        log::info!(
                            "renamed {} -> {}",
                            original_path.display(),
                            target_path.display()
                        );
                        result.renamed.push(RenameOperation {
                            from: original_path.clone(),
                            to: target_path.clone(),
                        });
                    }
                    Err(err) => {
                        log::warn!("{:#}", err);
                        result.failures.push(RenameFailure {
                            original_path: original_path.clone(),
                            target_path: Some(target_path.clone()),
                            message: format!("{:#}", err),
                        });
                    }
                }
            }
            CandidateAction::Unresolved { reason } => {
                result.failures.push(RenameFailure {
                    original_path: original_path.clone(),
                    target_path: None,
                    message: reason.clone(),
                });
            }
        }
    }

    result
}

fn rename_without_overwrite(from: &Path, to: &Path) -> Result<()> {
    if from == to {
        return Ok(());
    }
    if fs::symlink_metadata(to).is_ok() {
        bail!(
            "target already exists, not overwriting: {} -> {}",
            from.display(),
            to.display()
        );
    }
    fs::rename(from, to)
        .with_context(|| format!("rename failed: {} -> {}", from.display(), to.display()))
}
