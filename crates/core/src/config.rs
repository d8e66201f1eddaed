use crate::sanitize::{sanitize_prefix, DEFAULT_PREFIX};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const DEFAULT_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "tif", "heic"];

/// Settings for one invocation. Built once, then only read.
#[derive(Debug, Clone)]
pub struct RunConfig {
    target_dir: PathBuf,
    dry_run: bool,
    extensions: BTreeSet<String>,
    prefix: String,
    recursive: bool,
    skip_hidden: bool,
}

impl RunConfig {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
            dry_run: false,
            extensions: normalize_extensions(DEFAULT_EXTENSIONS),
            prefix: DEFAULT_PREFIX.to_string(),
            recursive: false,
            skip_hidden: false,
        }
    }

    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }

    /// Replaces the allow-list. Entries are lowercased and a leading dot is
    /// dropped, so `.JPG` and `jpg` are the same extension.
    pub fn with_extensions<S: AsRef<str>>(mut self, extensions: &[S]) -> Self {
        self.extensions = normalize_extensions(extensions);
        self
    }

    pub fn with_prefix(mut self, prefix: &str) -> Self {
        self.prefix = sanitize_prefix(prefix);
        self
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Leaves dot-files and dot-directories out of the scan.
    pub fn with_skip_hidden(mut self, skip_hidden: bool) -> Self {
        self.skip_hidden = skip_hidden;
        self
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn dry_run(&self) -> bool {
        self.dry_run
    }

    pub fn extensions(&self) -> &BTreeSet<String> {
        &self.extensions
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    pub fn skip_hidden(&self) -> bool {
        self.skip_hidden
    }

    pub fn accepts_extension(&self, extension: &str) -> bool {
        self.extensions.contains(&extension.to_ascii_lowercase())
    }
}

fn normalize_extensions<S: AsRef<str>>(extensions: &[S]) -> BTreeSet<String> {
    extensions
        .iter()
        .map(|ext| ext.as_ref().trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect()
}
