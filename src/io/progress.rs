//! Multi-stack progress tracking with automatic batching for many views

use crate::io::configuration::MAX_INDIVIDUAL_PROGRESS_BARS;
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::LazyLock;

/// Coordinates progress display while stacks are loaded
///
/// Shows one bar per stack for the most recent stacks, and adds a single
/// batch bar counting finished stacks when there are too many to show.
pub struct ProgressManager {
    multi_progress: MultiProgress,
    batch_bar: Option<ProgressBar>,
    stack_bars: Vec<ProgressBar>,
    /// Stores (`label`, `slices_read`, `slice_count`) for rolling window display
    stack_states: Vec<(String, usize, usize)>,
}

impl Default for ProgressManager {
    fn default() -> Self {
        Self::new()
    }
}

static PROGRESS_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("{prefix:>12} [{bar:30.cyan/blue}] {msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏ ")
});

static BATCH_STYLE: LazyLock<ProgressStyle> = LazyLock::new(|| {
    ProgressStyle::default_bar()
        .template("[{elapsed_precise}] Stacks: [{bar:40.cyan/blue}] {pos}/{len}")
        .unwrap_or_else(|_| ProgressStyle::default_bar())
});

impl ProgressManager {
    /// Create a new progress manager drawing to stderr
    pub fn new() -> Self {
        Self::with_multi_progress(MultiProgress::new())
    }

    /// Create a progress manager drawing through an existing display
    ///
    /// Sharing the display with the logger keeps log lines above the bars.
    pub fn with_multi_progress(multi_progress: MultiProgress) -> Self {
        Self {
            multi_progress,
            batch_bar: None,
            stack_bars: Vec::new(),
            stack_states: Vec::new(),
        }
    }

    /// Initialize progress bars for `stack_count` stacks
    pub fn initialize(&mut self, stack_count: usize) {
        // Switch to batch mode for many views to avoid terminal spam
        if stack_count > MAX_INDIVIDUAL_PROGRESS_BARS + 1 {
            let batch_bar = ProgressBar::new(stack_count as u64);
            batch_bar.set_style(BATCH_STYLE.clone());
            self.batch_bar = Some(self.multi_progress.add(batch_bar));
        }

        let bars_to_create = stack_count.min(MAX_INDIVIDUAL_PROGRESS_BARS);
        for _ in 0..bars_to_create {
            let pb = ProgressBar::new(0);
            pb.set_style(PROGRESS_STYLE.clone());
            self.stack_bars.push(self.multi_progress.add(pb));
        }
    }

    /// Configure progress display for a stack about to load
    pub fn start_stack(&mut self, index: usize, label: &str, slice_count: usize) {
        if index >= self.stack_states.len() {
            self.stack_states.resize(index + 1, (String::new(), 0, 0));
        }
        if let Some(state) = self.stack_states.get_mut(index) {
            *state = (label.to_string(), 0, slice_count);
        }
        self.update_bars();
    }

    /// Report how many slices of a stack have been read
    pub fn update_slice(&mut self, index: usize, slices_read: usize) {
        if let Some(state) = self.stack_states.get_mut(index) {
            state.1 = slices_read;
        }
        self.update_bars();
    }

    /// Mark a stack as loaded and update batch progress
    pub fn complete_stack(&mut self, index: usize) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.inc(1);
        }

        if let Some(state) = self.stack_states.get_mut(index) {
            state.0 = format!("✓ {}", state.0);
            state.1 = state.2;
        }
        self.update_bars();
    }

    /// Clean up all progress displays
    pub fn finish(&self) {
        if let Some(ref batch_bar) = self.batch_bar {
            batch_bar.finish_with_message("All stacks loaded");
        }
        let _ = self.multi_progress.clear();
    }

    /// Update all progress bars to show the last N started stacks
    fn update_bars(&self) {
        let active: Vec<_> = self
            .stack_states
            .iter()
            .filter(|(label, _, _)| !label.is_empty())
            .collect();

        let start_idx = active.len().saturating_sub(MAX_INDIVIDUAL_PROGRESS_BARS);
        let visible = active.get(start_idx..).unwrap_or(&[]);

        for (bar_idx, (label, current, max)) in visible.iter().enumerate() {
            if let Some(bar) = self.stack_bars.get(bar_idx) {
                bar.set_length(*max as u64);
                bar.set_position(*current as u64);
                let max_width = max.to_string().len();
                bar.set_message(format!("{current:>max_width$}/{max} slices"));
                bar.set_prefix(label.clone());
            }
        }

        // Clear any unused bars
        for bar in self.stack_bars.iter().skip(visible.len()) {
            bar.set_length(0);
            bar.set_position(0);
            bar.set_message(String::new());
            bar.set_prefix(String::new());
        }
    }
}
