//! End-to-end fusion run: survey, validate, load, orient, fuse, write

use crate::fusion::Fuser;
use crate::io::error::Result;
use crate::io::progress::ProgressManager;
use crate::io::slices::DirectorySliceStore;
use crate::io::writer::VolumeWriter;
use crate::pipeline::config::{RunConfig, ViewSpec};
use crate::volume::loader::{LoadOutcome, StackSurvey};
use crate::volume::{Orienter, Rotation, VolumeLoader, VolumeValidator};
use indicatif::MultiProgress;
use log::info;
use std::path::PathBuf;

const REFERENCE_LABEL: &str = "Reference";

/// What a completed run produced
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Shape of the fused volume (slices, rows, columns)
    pub shape: (usize, usize, usize),
    /// Fused slice files in depth order
    pub fused_slices: Vec<PathBuf>,
    /// Intermediate directories that were written
    pub intermediate_dirs: Vec<PathBuf>,
    /// Number of corrupt slices substituted across all stacks
    pub repaired_slices: usize,
}

// A view whose first slice has been read and whose voxel count matched
struct SurveyedView<'a> {
    spec: &'a ViewSpec,
    store: DirectorySliceStore,
    survey: StackSurvey,
}

/// Orchestrates one fusion run with optional progress display
pub struct FusionRunner {
    config: RunConfig,
    progress_manager: Option<ProgressManager>,
}

impl FusionRunner {
    /// Create a runner for a validated configuration
    pub fn new(config: RunConfig) -> Self {
        let progress_manager = config.show_progress.then(ProgressManager::new);
        Self {
            config,
            progress_manager,
        }
    }

    /// Draw progress through `multi_progress` instead of a private display
    ///
    /// Has no effect when the configuration disables progress.
    #[must_use]
    pub fn with_progress(mut self, multi_progress: MultiProgress) -> Self {
        self.progress_manager = self
            .config
            .show_progress
            .then(|| ProgressManager::with_multi_progress(multi_progress));
        self
    }

    /// Execute the whole pipeline
    ///
    /// All stacks are surveyed, their voxel counts and oriented shapes are
    /// checked, and every output directory is confirmed absent before any
    /// full stack is loaded.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error; nothing after it is attempted
    pub fn run(&mut self) -> Result<RunSummary> {
        let config = &self.config;

        let reference_store = DirectorySliceStore::open(&config.reference_dir)?;
        let reference_survey = VolumeLoader::survey(&reference_store, REFERENCE_LABEL)?;
        let reference_voxels = reference_survey.voxel_count();

        info!(
            "Reference: 0,0,0 deg, Path: {}",
            reference_store.directory().display()
        );
        info!(
            "Reference stack dimensions: {} x {} x {}",
            reference_survey.dimensions.cols,
            reference_survey.dimensions.rows,
            reference_survey.slice_count
        );
        info!("Reference stack volume: {reference_voxels} voxels");

        let mut surveyed = Vec::with_capacity(config.views.len());
        for spec in &config.views {
            let label = spec.label();
            let store = DirectorySliceStore::open(&spec.directory)?;
            let survey = VolumeLoader::survey(&store, &label)?;

            info!(
                "{label} angles (X,Y,Z): {}, {}, {}",
                spec.angles.x, spec.angles.y, spec.angles.z
            );
            info!("{label} path: {}", store.directory().display());
            info!(
                "{label} stack dimensions: {} x {} x {}",
                survey.dimensions.cols, survey.dimensions.rows, survey.slice_count
            );
            info!("{label} volume: {} voxels", survey.voxel_count());

            VolumeValidator::check_voxel_count(&label, survey.voxel_count(), reference_voxels)?;
            let oriented_dim = Rotation::from_angles(spec.angles).rotated_dim(survey.dim());
            VolumeValidator::check_dim(&label, oriented_dim, reference_survey.dim())?;
            surveyed.push(SurveyedView {
                spec,
                store,
                survey,
            });
        }

        for dir in config.output_dirs() {
            VolumeWriter::ensure_absent(&dir)?;
        }

        if let Some(ref mut pm) = self.progress_manager {
            pm.initialize(surveyed.len() + 1);
        }

        let mut repaired_slices = 0;
        let reference = Self::load_stack(
            &mut self.progress_manager,
            0,
            REFERENCE_LABEL,
            &reference_store,
            reference_survey,
        )?;
        repaired_slices += reference.repairs.len();
        let reference = reference.volume;

        let mut volumes = Vec::with_capacity(surveyed.len() + 1);
        let mut intermediate_dirs = Vec::new();
        for (index, view) in surveyed.into_iter().enumerate() {
            let label = view.spec.label();
            let loaded = Self::load_stack(
                &mut self.progress_manager,
                index + 1,
                &label,
                &view.store,
                view.survey,
            )?;
            repaired_slices += loaded.repairs.len();

            info!("Orienting {label}...");
            let oriented = Orienter::orient(loaded.volume, view.spec.angles, &label);

            if config.write_intermediates {
                let dir = config.intermediate_dir(view.spec);
                VolumeWriter::write(&oriented, &dir)?;
                info!("Wrote oriented {label} to {}", dir.display());
                intermediate_dirs.push(dir);
            }
            volumes.push(oriented);
        }
        volumes.push(reference);

        if let Some(ref pm) = self.progress_manager {
            pm.finish();
        }

        info!(
            "Fusing {} volumes with mode {}...",
            volumes.len(),
            config.mode
        );
        let fused = Fuser::fuse(&volumes, config.mode)?;
        let shape = fused.dim();
        let fused_slices = VolumeWriter::write(&fused, &config.output_dir)?;
        info!(
            "Wrote {} fused slices to {}",
            fused_slices.len(),
            config.output_dir.display()
        );

        Ok(RunSummary {
            shape,
            fused_slices,
            intermediate_dirs,
            repaired_slices,
        })
    }

    fn load_stack(
        progress_manager: &mut Option<ProgressManager>,
        index: usize,
        label: &str,
        store: &DirectorySliceStore,
        survey: StackSurvey,
    ) -> Result<LoadOutcome> {
        info!("Loading {label} ({} slices)...", survey.slice_count);
        if let Some(pm) = progress_manager.as_mut() {
            pm.start_stack(index, label, survey.slice_count);
        }

        let outcome = VolumeLoader::load_surveyed(store, survey, label, &mut |slices_read| {
            if let Some(pm) = progress_manager.as_mut() {
                pm.update_slice(index, slices_read);
            }
        })?;

        if let Some(pm) = progress_manager.as_mut() {
            pm.complete_stack(index);
        }
        Ok(outcome)
    }
}
