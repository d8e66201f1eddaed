use crate::config::RunConfig;
use crate::error::RenamerError;
use crate::exif_reader::extract_timestamp;
use crate::metadata::{file_modified_to_local, PhotoFile, TimestampSource};
use crate::naming::{generate_name, is_canonical_name};
use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CandidateAction {
    Rename {
        target_path: PathBuf,
        timestamp: NaiveDateTime,
        source: TimestampSource,
    },
    /// Neither EXIF nor the file system produced a timestamp.
    Unresolved { reason: String },
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenameCandidate {
    pub original_path: PathBuf,
    #[serde(flatten)]
    pub action: CandidateAction,
}

impl RenameCandidate {
    pub fn target_path(&self) -> Option<&Path> {
        match &self.action {
            CandidateAction::Rename { target_path, .. } => Some(target_path),
            CandidateAction::Unresolved { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Default, PartialEq, Eq)]
pub struct RenameStats {
    pub scanned_files: usize,
    pub matched_files: usize,
    pub skipped_extension: usize,
    pub skipped_hidden: usize,
    pub skipped_already_named: usize,
    pub planned: usize,
    pub unresolved: usize,
    pub unreadable_entries: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RenamePlan {
    pub target_dir: PathBuf,
    pub prefix: String,
    pub candidates: Vec<RenameCandidate>,
    pub stats: RenameStats,
    /// Entries below the target directory that could not be read. They are
    /// left out of the plan; the rest of the batch still runs.
    pub scan_errors: Vec<String>,
}

impl RenamePlan {
    /// `(original, proposed)` pairs in scan order, unresolved files excluded.
    pub fn renames(&self) -> impl Iterator<Item = (&Path, &Path)> {
        self.candidates.iter().filter_map(|candidate| {
            candidate
                .target_path()
                .map(|target| (candidate.original_path.as_path(), target))
        })
    }
}

/// Names taken in each directory touched by one plan: the entries present
/// when the directory was first seen, plus every name assigned since.
#[derive(Debug, Default)]
pub struct NameRegistry {
    directories: HashMap<PathBuf, HashSet<String>>,
}

impl NameRegistry {
    pub fn assign(
        &mut self,
        photo: &PhotoFile,
        prefix: &str,
        timestamp: &NaiveDateTime,
    ) -> Result<PathBuf> {
        let directory = photo.directory();
        let taken = self.names_in(directory)?;
        let name = generate_name(prefix, timestamp, &photo.extension, taken);
        taken.insert(name.clone());
        Ok(directory.join(name))
    }

    fn names_in(&mut self, directory: &Path) -> Result<&mut HashSet<String>> {
        if !self.directories.contains_key(directory) {
            let names = existing_names(directory)?;
            self.directories.insert(directory.to_path_buf(), names);
        }
        self.directories
            .get_mut(directory)
            .context("directory registry entry vanished")
    }
}

pub fn generate_plan(config: &RunConfig) -> Result<RenamePlan, RenamerError> {
    let root = config.target_dir();
    if !root.exists() {
        return Err(RenamerError::DirectoryNotFound(root.to_path_buf()));
    }
    if !root.is_dir() {
        return Err(RenamerError::NotADirectory(root.to_path_buf()));
    }

    let mut stats = RenameStats::default();
    let mut scan_errors = Vec::new();
    let photos = collect_photo_files(config, &mut stats, &mut scan_errors).map_err(|source| {
        RenamerError::Scan {
            path: root.to_path_buf(),
            source,
        }
    })?;
    log::info!(
        "{}: {} of {} files matched",
        root.display(),
        stats.matched_files,
        stats.scanned_files
    );

    let mut registry = NameRegistry::default();
    let mut candidates = Vec::with_capacity(photos.len());

    for photo in photos {
        let action = match resolve_timestamp(&photo.path) {
            Some((timestamp, source)) => {
                match registry.assign(&photo, config.prefix(), &timestamp) {
                    Ok(target_path) => {
                        log::debug!(
                            "{} -> {} ({:?})",
                            photo.path.display(),
                            target_path.display(),
                            source
                        );
                        stats.planned += 1;
                        CandidateAction::Rename {
                            target_path,
                            timestamp,
                            source,
                        }
                    }
                    Err(err) => {
                        log::warn!("{}: {:#}", photo.path.display(), err);
                        stats.unresolved += 1;
                        CandidateAction::Unresolved {
                            reason: format!("{:#}", err),
                        }
                    }
                }
            }
            None => {
                log::warn!("{}: no timestamp available", photo.path.display());
                stats.unresolved += 1;
                CandidateAction::Unresolved {
                    reason: "no EXIF date and no readable modification time".to_string(),
                }
            }
        };

        candidates.push(RenameCandidate {
            original_path: photo.path,
            action,
        });
    }

    Ok(RenamePlan {
        target_dir: root.to_path_buf(),
        prefix: config.prefix().to_string(),
        candidates,
        stats,
        scan_errors,
    })
}

fn resolve_timestamp(path: &Path) -> Option<(NaiveDateTime, TimestampSource)> {
    if let Some(timestamp) = extract_timestamp(path) {
        return Some((timestamp, TimestampSource::Exif));
    }
    file_modified_to_local(path).map(|timestamp| (timestamp, TimestampSource::FileModified))
}

/// Only a failure to read the target directory itself is returned as an
/// error. Anything unreadable below it is recorded in `scan_errors`.
fn collect_photo_files(
    config: &RunConfig,
    stats: &mut RenameStats,
    scan_errors: &mut Vec<String>,
) -> Result<Vec<PhotoFile>> {
    let root = config.target_dir();
    let mut out = Vec::new();

    if config.recursive() {
        let walker = WalkDir::new(root)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                entry.depth() == 0
                    || !entry.file_type().is_dir()
                    || !config.skip_hidden()
                    || !is_hidden(entry.path())
            });
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) if err.depth() > 0 => {
                    let message = err.to_string();
                    log::warn!("skipping unreadable entry: {}", message);
                    stats.unreadable_entries += 1;
                    scan_errors.push(message);
                    continue;
                }
                Err(err) => {
                    return Err(err)
                        .with_context(|| format!("failed to walk directory: {}", root.display()));
                }
            };
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            if let Some(photo) = classify(path, config, stats) {
                out.push(photo);
            }
        }
    } else {
        let mut paths = Vec::new();
        for entry in fs::read_dir(root)
            .with_context(|| format!("failed to read directory: {}", root.display()))?
        {
            let entry =
                entry.with_context(|| format!("failed to read entry in: {}", root.display()))?;
            let path = entry.path();
            if path.is_file() {
                paths.push(path);
            }
        }
        paths.sort();
        for path in paths {
            if let Some(photo) = classify(&path, config, stats) {
                out.push(photo);
            }
        }
    }

    Ok(out)
}

fn classify(path: &Path, config: &RunConfig, stats: &mut RenameStats) -> Option<PhotoFile> {
    stats.scanned_files += 1;

    if config.skip_hidden() && is_hidden(path) {
        stats.skipped_hidden += 1;
        return None;
    }

    let Some(photo) = PhotoFile::from_path(path).filter(|p| config.accepts_extension(&p.extension))
    else {
        stats.skipped_extension += 1;
        return None;
    };

    if is_canonical_name(&photo.file_name(), config.prefix()) {
        log::debug!("{}: already renamed, skipping", path.display());
        stats.skipped_already_named += 1;
        return None;
    }

    stats.matched_files += 1;
    Some(photo)
}

fn existing_names(directory: &Path) -> Result<HashSet<String>> {
    let mut names = HashSet::new();
    for entry in fs::read_dir(directory)
        .with_context(|| format!("failed to list directory: {}", directory.display()))?
    {
        let entry =
            entry.with_context(|| format!("failed to read entry in: {}", directory.display()))?;
        names.insert(entry.file_name().to_string_lossy().to_string());
    }
    Ok(names)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().starts_with('.'))
        .unwrap_or(false)
}
