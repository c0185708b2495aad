//! Validated run configuration built from the command line

use crate::fusion::FusionMode;
use crate::io::cli::Cli;
use crate::io::configuration::{INTERMEDIATE_INDEX_WIDTH, INTERMEDIATE_SUFFIX};
use crate::io::error::{Result, invalid_configuration};
use crate::volume::ViewAngles;
use std::path::{Path, PathBuf};

/// One rotated acquisition and its angles relative to the reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewSpec {
    /// 1-based position of the view on the command line
    pub number: usize,
    /// Directory holding the view's slices
    pub directory: PathBuf,
    /// Declared rotation angles
    pub angles: ViewAngles,
}

impl ViewSpec {
    /// Name used for the view in logs and errors
    pub fn label(&self) -> String {
        format!("View {}", self.number)
    }
}

/// Everything a fusion run needs, fixed before any stack is read
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Directory holding the reference stack
    pub reference_dir: PathBuf,
    /// Views in command-line order
    pub views: Vec<ViewSpec>,
    /// Voxel-wise reducer
    pub mode: FusionMode,
    /// Persist each oriented view before fusion
    pub write_intermediates: bool,
    /// Directory to create for the fused stack
    pub output_dir: PathBuf,
    /// Draw progress bars while loading
    pub show_progress: bool,
}

impl RunConfig {
    /// Validate parsed arguments into a run configuration
    ///
    /// Unrecognised `--mode` values fall back to mean fusion here.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FusionError::InvalidConfiguration`] if:
    /// - The reference path is not a directory
    /// - No view directories were given
    /// - The angle lists do not all match the number of view directories
    /// - A view path is not a directory
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if !cli.reference.is_dir() {
            return Err(invalid_configuration(&format!(
                "{} is not a valid directory",
                cli.reference.display()
            )));
        }

        let view_count = cli.dirs.len();
        if view_count == 0 {
            return Err(invalid_configuration(&"at least one view directory is required"));
        }

        if cli.x_angles.len() != view_count
            || cli.y_angles.len() != view_count
            || cli.z_angles.len() != view_count
        {
            return Err(invalid_configuration(&format!(
                "Mismatching numbers of angles and paths ({view_count} paths, {} x, {} y, {} z)",
                cli.x_angles.len(),
                cli.y_angles.len(),
                cli.z_angles.len()
            )));
        }

        let views = cli
            .dirs
            .iter()
            .zip(&cli.x_angles)
            .zip(&cli.y_angles)
            .zip(&cli.z_angles)
            .enumerate()
            .map(|(index, (((directory, &x), &y), &z))| {
                if directory.is_dir() {
                    Ok(ViewSpec {
                        number: index + 1,
                        directory: directory.clone(),
                        angles: ViewAngles::new(x, y, z),
                    })
                } else {
                    Err(invalid_configuration(&format!(
                        "{} is not a valid directory",
                        directory.display()
                    )))
                }
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            reference_dir: cli.reference.clone(),
            views,
            mode: FusionMode::from_arg(&cli.mode),
            write_intermediates: cli.write_intermediates,
            output_dir: cli.output.clone(),
            show_progress: cli.should_show_progress(),
        })
    }

    /// Directory an oriented view is written to when intermediates are enabled
    ///
    /// Sits beside the fused output as `<output>_viewNN`.
    pub fn intermediate_dir(&self, view: &ViewSpec) -> PathBuf {
        intermediate_dir_for(&self.output_dir, view.number)
    }

    /// Every directory the run will create, in write order
    pub fn output_dirs(&self) -> Vec<PathBuf> {
        let mut dirs = Vec::with_capacity(self.views.len() + 1);
        if self.write_intermediates {
            dirs.extend(self.views.iter().map(|view| self.intermediate_dir(view)));
        }
        dirs.push(self.output_dir.clone());
        dirs
    }
}

fn intermediate_dir_for(output_dir: &Path, number: usize) -> PathBuf {
    let name = output_dir
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let width = INTERMEDIATE_INDEX_WIDTH;
    let dir_name = format!("{name}{INTERMEDIATE_SUFFIX}{number:0width$}");
    output_dir.with_file_name(dir_name)
}
