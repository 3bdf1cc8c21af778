use anyhow::{Context, Result};
use git2::{Delta, Repository};
use log::debug;
use std::fs;
use std::path::Path;

/// Placeholder content for a file with no committed ancestor.
pub const NEW_FILE_CONTENT: &str = "<new file, no prior content>";
/// Placeholder content for a staged deletion.
pub const DELETED_FILE_CONTENT: &str = "<file deleted>";

/// One file recorded in the index: its path with the committed content it
/// replaces and the staged content that replaces it.
#[derive(Debug, Clone)]
pub struct StagedChange {
    pub path: String,
    pub before: String,
    pub after: String,
}

/// Read-only view of the repository the tool was invoked in.
pub struct GitRepo {
    repo: Repository,
}

impl GitRepo {
    /// Discovers the repository containing the current directory.
    pub fn discover() -> Result<Self> {
        Self::open(Path::new("."))
    }

    pub fn open(path: &Path) -> Result<Self> {
        let repo = Repository::discover(path)
            .context("No git repository found. Please run `git init` first.")?;
        Ok(Self { repo })
    }

    /// Name of the repository, taken from its working directory.
    pub fn name(&self) -> String {
        self.repo
            .workdir()
            .and_then(|dir| dir.file_name())
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unknown".to_string())
    }

    /// Paths of all files staged in the index, relative to the repo root.
    pub fn staged_files(&self) -> Result<Vec<String>> {
        Ok(self
            .staged_changes()?
            .into_iter()
            .map(|change| change.path)
            .collect())
    }

    /// Before/after content for every staged file.
    pub fn staged_changes(&self) -> Result<Vec<StagedChange>> {
        // On an unborn branch there is no HEAD tree; every staged file shows
        // up as an addition.
        let head_tree = self
            .repo
            .head()
            .ok()
            .and_then(|head| head.peel_to_tree().ok());
        let index = self.repo.index()?;

        let diff = self
            .repo
            .diff_tree_to_index(head_tree.as_ref(), Some(&index), None)
            .context("Failed to diff HEAD against the index")?;

        let mut changes = Vec::new();
        for delta in diff.deltas() {
            let Some(path) = delta
                .new_file()
                .path()
                .or_else(|| delta.old_file().path())
                .map(|p| p.to_string_lossy().into_owned())
            else {
                continue;
            };

            let before = self.committed_content(head_tree.as_ref(), &path);
            let after = self.staged_content(&index, &path, delta.status());

            changes.push(StagedChange { path, before, after });
        }

        debug!("Found {} staged change(s)", changes.len());
        Ok(changes)
    }

    /// Staged changes rendered as one labeled text section per file, or None
    /// when nothing is staged.
    pub fn staged_diff_text(&self) -> Result<Option<String>> {
        let changes = self.staged_changes()?;
        if changes.is_empty() {
            return Ok(None);
        }

        let sections: Vec<String> = changes
            .iter()
            .map(|change| format!("File: {}\n{}", change.path, change.after))
            .collect();

        Ok(Some(sections.join("\n")))
    }

    fn committed_content(&self, head_tree: Option<&git2::Tree<'_>>, path: &str) -> String {
        let blob = head_tree
            .and_then(|tree| tree.get_path(Path::new(path)).ok())
            .and_then(|entry| self.repo.find_blob(entry.id()).ok());

        match blob {
            Some(blob) => String::from_utf8_lossy(blob.content()).into_owned(),
            None => NEW_FILE_CONTENT.to_string(),
        }
    }

    fn staged_content(&self, index: &git2::Index, path: &str, status: Delta) -> String {
        if status == Delta::Deleted {
            return DELETED_FILE_CONTENT.to_string();
        }

        if let Some(entry) = index.get_path(Path::new(path), 0) {
            if let Ok(blob) = self.repo.find_blob(entry.id) {
                return String::from_utf8_lossy(blob.content()).into_owned();
            }
        }

        // The index blob may be unresolvable; fall back to the working copy.
        self.repo
            .workdir()
            .and_then(|dir| fs::read_to_string(dir.join(path)).ok())
            .unwrap_or_else(|| DELETED_FILE_CONTENT.to_string())
    }
}
