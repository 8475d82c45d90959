//! Batch loading of study folders.
//!
//! Discovers .re1 files under a folder and parses them concurrently on a
//! bounded pool of blocking tasks. Files that fail are isolated: a warning
//! is recorded and a synthetic study takes their place.

pub mod discovery;

#[cfg(test)]
pub mod tests;

use self::discovery::FileDiscovery;

use crate::config::LoaderConfig;
use crate::error::{Re1Error, Result};
use crate::study::Study;

use futures::stream::{self, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Semaphore;
use tokio::task;
use tracing::{debug, info, warn};

/// Error for a parse task that panicked or was cancelled
pub(crate) fn task_failed(path: &Path, error: task::JoinError) -> Re1Error {
    let reason = if error.is_panic() {
        "parser panicked".to_string()
    } else {
        error.to_string()
    };
    Re1Error::TaskFailed {
        path: path.to_path_buf(),
        reason,
    }
}

/// Studies keyed by display name, plus warnings raised while loading
pub type LoadedStudies = (BTreeMap<String, Study>, Vec<String>);

/// Summary of one batch load
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub files_found: usize,
    pub files_loaded: usize,
    pub files_substituted: usize,
    pub elapsed_ms: u128,
}

/// Loads every study found under a folder
#[derive(Debug, Clone)]
pub struct StudyLoader {
    config: LoaderConfig,
}

impl Default for StudyLoader {
    fn default() -> Self {
        Self::new(LoaderConfig::default())
    }
}

impl StudyLoader {
    pub fn new(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Discover and load all studies under `base_dir`
    pub async fn load_folder(&self, base_dir: &Path) -> Result<LoadedStudies> {
        let (studies, warnings, _) = self.load_folder_with_stats(base_dir).await?;
        Ok((studies, warnings))
    }

    /// [`Self::load_folder`] that also reports counts and timing
    pub async fn load_folder_with_stats(
        &self,
        base_dir: &Path,
    ) -> Result<(BTreeMap<String, Study>, Vec<String>, LoadStats)> {
        let start_time = Instant::now();
        let discovery = FileDiscovery::new(base_dir);
        let pairs = discovery.discover();

        let mut warnings = Vec::new();
        let mut stats = LoadStats {
            files_found: pairs.len(),
            ..LoadStats::default()
        };

        if pairs.is_empty() {
            let message = format!(
                "No .re1 files found in '{}'. Expect one per subfolder or directly under the folder.",
                base_dir.display()
            );
            warn!("{}", message);
            warnings.push(message);
            return Ok((BTreeMap::new(), warnings, stats));
        }

        info!(
            "Loading {} studies from {} with {} workers",
            pairs.len(),
            discovery.base_path().display(),
            self.config.workers
        );

        let progress = self.progress_bar(pairs.len());
        let results = self.parse_all(pairs, progress.clone()).await?;
        if let Some(pb) = progress {
            pb.finish_with_message("done");
        }

        let mut studies = BTreeMap::new();
        for (name, path, result) in results {
            let study = match result {
                Ok(study) => {
                    stats.files_loaded += 1;
                    study
                }
                Err(e) => {
                    stats.files_substituted += 1;
                    let message = format!(
                        "Failed to read '{}': {}. Substituted with demo curve.",
                        path.display(),
                        e
                    );
                    warn!("{}", message);
                    warnings.push(message);
                    Study::demo(name.clone(), &self.config.demo_headings)?
                }
            };
            warnings.extend(study.warnings.iter().cloned());
            studies.insert(name, study);
        }

        stats.elapsed_ms = start_time.elapsed().as_millis();
        info!(
            "Loaded {} studies ({} substituted) in {}ms",
            stats.files_loaded + stats.files_substituted,
            stats.files_substituted,
            stats.elapsed_ms
        );
        Ok((studies, warnings, stats))
    }

    /// Parse files concurrently; per-file failures are returned, not raised
    async fn parse_all(
        &self,
        pairs: Vec<(String, PathBuf)>,
        progress: Option<ProgressBar>,
    ) -> Result<Vec<(String, PathBuf, Result<Study>)>> {
        let workers = self.config.workers.max(1);
        let semaphore = Arc::new(Semaphore::new(workers));
        let speed_index = self.config.speed_index;
        let tidy = Arc::new(self.config.tidy.clone());

        let results = stream::iter(pairs)
            .map(|(name, path)| {
                let sem = semaphore.clone();
                let tidy = tidy.clone();
                let progress = progress.clone();
                async move {
                    let _permit = sem.acquire_owned().await.map_err(|e| Re1Error::Interrupted {
                        reason: format!("worker pool closed: {}", e),
                    })?;

                    let task_name = name.clone();
                    let task_path = path.clone();
                    let result = task::spawn_blocking(move || {
                        Study::load(task_name, &task_path, speed_index, &tidy)
                    })
                    .await
                    .unwrap_or_else(|e| Err(task_failed(&path, e)));

                    debug!("Finished {} ({})", name, if result.is_ok() { "ok" } else { "failed" });
                    if let Some(pb) = &progress {
                        pb.inc(1);
                    }
                    Ok::<_, Re1Error>((name, path, result))
                }
            })
            .buffer_unordered(workers)
            .collect::<Vec<_>>()
            .await;

        results.into_iter().collect()
    }

    fn progress_bar(&self, len: usize) -> Option<ProgressBar> {
        if !self.config.show_progress {
            return None;
        }
        let pb = ProgressBar::new(len as u64);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        pb.set_message("parsing .re1 files");
        Some(pb)
    }
}
