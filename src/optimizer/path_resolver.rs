//! # Path Resolution Module
//!
//! Centralizza tutta la logica di calcolo dei path di output.
//! L'output replica esattamente la struttura dell'input, con estensione `.png`.

use crate::error::OptimizeError;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Output extension for every converted image
pub const OUTPUT_EXTENSION: &str = "png";

/// Utility per calcolare i path di output in modo centralizzato
pub struct PathResolver;

impl PathResolver {
    /// Calcola il path di output per un file dato: `<output_root>/<rel dir>/<stem>.png`
    pub fn get_output_path(
        input_path: &Path,
        input_root: &Path,
        output_root: &Path,
    ) -> Result<PathBuf, OptimizeError> {
        let file_stem = input_path.file_stem().ok_or_else(|| {
            OptimizeError::Validation(format!("Invalid file name: {}", input_path.display()))
        })?;

        let mut filename = file_stem.to_os_string();
        filename.push(".");
        filename.push(OUTPUT_EXTENSION);

        let parent = input_path.parent().unwrap_or(Path::new(""));
        let result = Self::mirror_dir(parent, input_root, output_root).join(filename);
        debug!("Resolved output path: {} -> {}", input_path.display(), result.display());

        Ok(result)
    }

    /// Directory di output corrispondente a `input_dir`
    pub fn mirror_dir(input_dir: &Path, input_root: &Path, output_root: &Path) -> PathBuf {
        match input_dir.strip_prefix(input_root) {
            Ok(relative) => output_root.join(relative),
            Err(e) => {
                debug!("[ERROR] Strip prefix failed for {}: {} - using output root", input_dir.display(), e);
                output_root.to_path_buf()
            }
        }
    }
}
