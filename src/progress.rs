//! Progress reporting utilities using indicatif.
//!
//! This module provides the [`Progress`] struct which implements
//! [`ProgressCallback`] to display a spinner while walking and a bar while
//! hashing. Progress output is informational only; nothing in the indexing
//! pipeline depends on it.

use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};

/// Progress callback for the indexing phases.
///
/// Implement this trait to receive progress updates while a tree is walked
/// and hashed. Methods return nothing so a reporter cannot interrupt a scan.
pub trait ProgressCallback: Send + Sync {
    /// Called when a phase starts.
    ///
    /// # Arguments
    ///
    /// * `phase` - Name of the phase ("walking" or "hashing")
    /// * `total` - Total number of items to process, 0 if unknown
    fn on_phase_start(&self, phase: &str, total: usize);

    /// Called as items are processed.
    ///
    /// # Arguments
    ///
    /// * `current` - Number of items processed so far
    /// * `path` - Path being processed
    fn on_progress(&self, current: usize, path: &str);

    /// Called when a phase completes.
    fn on_phase_end(&self, phase: &str);

    /// Called to update the progress message.
    fn on_message(&self, _message: &str) {}
}

/// Progress reporter using indicatif.
pub struct Progress {
    multi: MultiProgress,
    walking: Mutex<Option<ProgressBar>>,
    hashing: Mutex<Option<ProgressBar>>,
    quiet: bool,
}

impl Progress {
    /// Create a new progress reporter.
    ///
    /// # Arguments
    ///
    /// * `quiet` - If true, no progress bars will be displayed.
    ///
    /// # Examples
    ///
    /// ```
    /// use dupeindex::progress::Progress;
    ///
    /// let progress = Progress::new(false);
    /// ```
    #[must_use]
    pub fn new(quiet: bool) -> Self {
        Self {
            multi: MultiProgress::new(),
            walking: Mutex::new(None),
            hashing: Mutex::new(None),
            quiet,
        }
    }

    fn walking_style() -> ProgressStyle {
        ProgressStyle::with_template("{spinner:.green} {msg} [{elapsed_precise}] {pos} files")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ ")
    }

    fn hashing_style() -> ProgressStyle {
        ProgressStyle::with_template(
            "[{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg} (ETA: {eta})",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█>-")
    }

    /// The bar that should receive updates: hashing wins over walking.
    fn active_bar(&self) -> Option<ProgressBar> {
        lock(&self.hashing)
            .clone()
            .or_else(|| lock(&self.walking).clone())
    }
}

/// Lock a bar slot, recovering from a poisoned mutex.
fn lock(slot: &Mutex<Option<ProgressBar>>) -> MutexGuard<'_, Option<ProgressBar>> {
    slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str, total: usize) {
        if self.quiet {
            return;
        }

        match phase {
            "walking" => {
                let pb = self.multi.add(ProgressBar::new_spinner());
                pb.set_style(Self::walking_style());
                pb.set_message("Walking directory");
                pb.enable_steady_tick(Duration::from_millis(100));
                *lock(&self.walking) = Some(pb);
            }
            _ => {
                let pb = self.multi.add(ProgressBar::new(total as u64));
                pb.set_style(Self::hashing_style());
                pb.set_message("Hashing");
                *lock(&self.hashing) = Some(pb);
            }
        }
    }

    fn on_progress(&self, current: usize, path: &str) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.active_bar() {
            pb.set_position(current as u64);
            pb.set_message(truncate_path(path, 30));
        }
    }

    fn on_phase_end(&self, phase: &str) {
        if self.quiet {
            return;
        }

        let (slot, message) = match phase {
            "walking" => (&self.walking, "Walking complete"),
            _ => (&self.hashing, "Hashing complete"),
        };
        if let Some(pb) = lock(slot).take() {
            pb.finish_with_message(message);
        }
    }

    fn on_message(&self, message: &str) {
        if self.quiet {
            return;
        }

        if let Some(pb) = self.active_bar() {
            pb.set_message(message.to_string());
        }
    }
}

/// Truncate a path for display in the progress bar.
fn truncate_path(path: &str, max_len: usize) -> String {
    if path.chars().count() <= max_len {
        return path.to_string();
    }

    let file_name = std::path::Path::new(path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let name_len = file_name.chars().count();
    if name_len >= max_len {
        let tail: String = file_name.chars().skip(name_len - (max_len - 3)).collect();
        return format!("...{}", tail);
    }

    format!(".../{}", file_name)
}
