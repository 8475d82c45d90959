//! File discovery for .re1 study folders
//!
//! Handles the usual ShipX output layouts: one run subfolder per study
//! with a single .re1 inside, or loose .re1 files in one folder. Parameter
//! study folders resolve to their latest run.

use crate::constants::{PARAM_STUDY_DIR_HINTS, RE1_EXTENSIONS, RUN_DIR_PATTERN};
use regex::Regex;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::time::SystemTime;
use tracing::debug;
use walkdir::WalkDir;

static RUN_DIR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(RUN_DIR_PATTERN).expect("valid run directory pattern"));

/// One segment of a natural sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyPart {
    /// Digit run with leading zeros stripped
    Number(String),
    Text(String),
}

impl Ord for KeyPart {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (KeyPart::Number(a), KeyPart::Number(b)) => a.len().cmp(&b.len()).then_with(|| a.cmp(b)),
            (KeyPart::Number(_), KeyPart::Text(_)) => Ordering::Less,
            (KeyPart::Text(_), KeyPart::Number(_)) => Ordering::Greater,
            (KeyPart::Text(a), KeyPart::Text(b)) => a.cmp(b),
        }
    }
}

impl PartialOrd for KeyPart {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Case-insensitive sort key comparing digit runs numerically
///
/// `run2` sorts before `run10`.
pub fn natural_key(s: &str) -> Vec<KeyPart> {
    let mut parts = Vec::new();
    let mut current = String::new();
    let mut in_digits = false;

    let flush = |current: &mut String, in_digits: bool, parts: &mut Vec<KeyPart>| {
        if current.is_empty() {
            return;
        }
        let part = std::mem::take(current);
        parts.push(if in_digits {
            let trimmed = part.trim_start_matches('0');
            KeyPart::Number(if trimmed.is_empty() { "0".to_string() } else { trimmed.to_string() })
        } else {
            KeyPart::Text(part)
        });
    };

    for c in s.to_lowercase().chars() {
        let is_digit = c.is_ascii_digit();
        if is_digit != in_digits {
            flush(&mut current, in_digits, &mut parts);
            in_digits = is_digit;
        }
        current.push(c);
    }
    flush(&mut current, in_digits, &mut parts);
    parts
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default()
}

fn modified(path: &Path) -> SystemTime {
    path.metadata()
        .and_then(|m| m.modified())
        .unwrap_or(SystemTime::UNIX_EPOCH)
}

/// Immediate subdirectories of `dir`
fn child_dirs(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_dir())
        .map(|e| e.into_path())
        .collect()
}

/// .re1 files directly inside `dir`, in no particular order
fn re1_files_in(dir: &Path) -> Vec<PathBuf> {
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    RE1_EXTENSIONS
        .iter()
        .filter_map(|ext| glob::glob(&format!("{}/*.{}", escaped, ext)).ok())
        .flat_map(|paths| paths.filter_map(|p| p.ok()))
        .filter(|p| p.is_file())
        .collect()
}

/// Sort by natural key, then by modification time
fn sort_latest_last(dirs: &mut [PathBuf]) {
    dirs.sort_by_cached_key(|d| (natural_key(&file_name(d)), modified(d)));
}

/// Find `(display_name, path)` pairs for every study under `base`
///
/// Each subfolder contributes its first .re1 file under the subfolder's name.
/// When no subfolder has one, top-level files are used under their stems.
/// A missing base yields an empty list.
pub fn discover_re1s(base: &Path) -> Vec<(String, PathBuf)> {
    if !base.exists() {
        debug!("Discovery base {} does not exist", base.display());
        return Vec::new();
    }

    let mut subdirs = child_dirs(base);
    subdirs.sort_by_cached_key(|d| natural_key(&file_name(d)));

    let mut items: Vec<(String, PathBuf)> = subdirs
        .iter()
        .filter_map(|dir| {
            let mut candidates = re1_files_in(dir);
            candidates.sort_by_cached_key(|p| natural_key(&file_name(p)));
            candidates.into_iter().next().map(|file| (file_name(dir), file))
        })
        .collect();

    if items.is_empty() {
        let mut files = re1_files_in(base);
        files.sort_by_cached_key(|p| natural_key(&file_stem(p)));
        items = files.into_iter().map(|f| (file_stem(&f), f)).collect();
    }

    debug!("Discovered {} .re1 file(s) under {}", items.len(), base.display());
    items
}

/// Whether a folder name looks like a parameter study root
pub fn is_parameter_study_name(name: &str) -> bool {
    let low = name.to_lowercase();
    PARAM_STUDY_DIR_HINTS
        .iter()
        .any(|hint| low == hint.to_lowercase())
        || (low.contains("parameter") && low.contains("study"))
}

pub fn is_run_dir_name(name: &str) -> bool {
    RUN_DIR.is_match(name)
}

/// Latest run folder of a parameter study, preferring run-like names
fn latest_run_dir(study_dir: &Path) -> Option<PathBuf> {
    let subs = child_dirs(study_dir);
    let mut candidates: Vec<PathBuf> = subs
        .iter()
        .filter(|d| is_run_dir_name(&file_name(d)))
        .cloned()
        .collect();
    if candidates.is_empty() {
        candidates = subs;
    }
    sort_latest_last(&mut candidates);
    candidates.pop()
}

/// Resolve a user-supplied folder to the directory holding the run subfolders
///
/// - a parameter-study folder resolves to its latest run
/// - a case folder containing a parameter-study folder resolves through it
/// - anything else is returned unchanged
pub fn resolve_parameter_study_root(path: &Path) -> PathBuf {
    if !path.is_dir() {
        return path.to_path_buf();
    }

    if is_parameter_study_name(&file_name(path)) {
        return latest_run_dir(path).unwrap_or_else(|| path.to_path_buf());
    }

    let mut matches: Vec<PathBuf> = child_dirs(path)
        .into_iter()
        .filter(|d| is_parameter_study_name(&file_name(d)))
        .collect();
    sort_latest_last(&mut matches);
    if let Some(study_dir) = matches.pop() {
        let resolved = latest_run_dir(&study_dir).unwrap_or(study_dir);
        debug!("Resolved {} to {}", path.display(), resolved.display());
        return resolved;
    }

    path.to_path_buf()
}

/// File discovery component bound to one base folder
#[derive(Debug, Clone)]
pub struct FileDiscovery {
    base_path: PathBuf,
}

impl FileDiscovery {
    /// Create a discovery rooted at `path`, resolving parameter-study layouts
    pub fn new(path: &Path) -> Self {
        Self {
            base_path: resolve_parameter_study_root(path),
        }
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    pub fn discover(&self) -> Vec<(String, PathBuf)> {
        discover_re1s(&self.base_path)
    }
}
