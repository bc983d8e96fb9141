//! # File Management Module
//!
//! Questo modulo gestisce le operazioni sui file e la discovery delle immagini.
//!
//! ## Responsabilità:
//! - Scansione ricorsiva della directory di input con `walkdir`
//! - Creazione immediata della struttura di directory mirror nell'output
//! - Classificazione dei file (convertibile vs saltato) per estensione
//! - Utilità per dimensioni file, KB e percentuali di risparmio
//!
//! ## Formati supportati (case-insensitive):
//! - PNG, JPG, JPEG, WebP, GIF, TIFF, TIF
//!
//! ## Semantica della scansione:
//! - Ogni directory incontrata ottiene subito la sua copia nell'output, anche se vuota
//! - Ogni immagine supportata produce esattamente un `Task` (`nome.ext` -> `nome.png`)
//! - Directory illeggibili o output non creabili interrompono la scansione
//!
//! ## Esempio:
//! ```rust,ignore
//! let queue = FileManager::collect_tasks(&config.input_dir, &config.output_dir)?;
//! info!("Found {} images", queue.len());
//! ```

use crate::error::OptimizeError;
use crate::optimizer::path_resolver::PathResolver;
use crate::optimizer::task_queue::{Task, TaskQueue};
use std::path::Path;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Extensions accepted as conversion input
pub const SUPPORTED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp", "gif", "tiff", "tif"];

/// Manages file operations and discovery
pub struct FileManager;

impl FileManager {
    /// Walk `input_root` depth-first, mirror every directory under `output_root`
    /// and queue one task per supported image.
    pub fn collect_tasks(input_root: &Path, output_root: &Path) -> Result<TaskQueue, OptimizeError> {
        let mut queue = TaskQueue::new();

        for entry in WalkDir::new(input_root) {
            let entry = entry?;
            let path = entry.path();
            let file_type = entry.file_type();

            if entry.depth() == 0 {
                if !file_type.is_dir() {
                    return Err(OptimizeError::Validation(format!(
                        "Input path is not a directory: {}",
                        path.display()
                    )));
                }
                Self::ensure_directory_exists(output_root)?;
                continue;
            }

            if file_type.is_dir() {
                info!("Entering directory: {}", path.display());
                let mirror = PathResolver::mirror_dir(path, input_root, output_root);
                Self::ensure_directory_exists(&mirror)?;
            } else if file_type.is_file() {
                if Self::is_supported_format(path) {
                    let output_path = PathResolver::get_output_path(path, input_root, output_root)?;
                    queue.enqueue(Task::new(path.to_path_buf(), output_path));
                } else {
                    info!("Skipping (not a supported image format): {}", path.display());
                }
            }
        }

        Ok(queue)
    }

    /// Create `dir` (and parents) unless it already exists
    pub fn ensure_directory_exists(dir: &Path) -> Result<(), OptimizeError> {
        if dir.is_dir() {
            return Ok(());
        }
        std::fs::create_dir_all(dir).map_err(|source| OptimizeError::CreateDir {
            path: dir.to_path_buf(),
            source,
        })?;
        info!("Created directory: {}", dir.display());
        Ok(())
    }

    /// Check if a file format is supported
    pub fn is_supported_format(path: &Path) -> bool {
        if let Some(ext) = path.extension() {
            let ext_lower = ext.to_string_lossy().to_lowercase();
            SUPPORTED_EXTENSIONS.contains(&ext_lower.as_str())
        } else {
            false
        }
    }

    /// Size of a file in bytes, `None` (with a warning) when it cannot be read
    pub fn file_size(path: &Path) -> Option<u64> {
        match std::fs::metadata(path) {
            Ok(metadata) => Some(metadata.len()),
            Err(e) => {
                warn!("Could not get size for {}: {}", path.display(), e);
                None
            }
        }
    }

    /// Kilobytes with two decimals, or `N/A`
    pub fn format_kb(size: Option<u64>) -> String {
        match size {
            Some(bytes) => format!("{:.2}", bytes as f64 / 1024.0),
            None => "N/A".to_string(),
        }
    }

    /// Get human-readable file size
    pub fn format_size(size: u64) -> String {
        const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
        let mut size = size as f64;
        let mut unit_index = 0;

        while size >= 1024.0 && unit_index < UNITS.len() - 1 {
            size /= 1024.0;
            unit_index += 1;
        }

        if unit_index == 0 {
            format!("{} {}", size as u64, UNITS[unit_index])
        } else {
            format!("{:.2} {}", size, UNITS[unit_index])
        }
    }

    /// Percentage saved, unavailable when either size is missing or the original is empty
    pub fn calculate_savings(original_size: Option<u64>, new_size: Option<u64>) -> Option<f64> {
        match (original_size, new_size) {
            (Some(original), Some(new)) if original > 0 => {
                Some(((original as f64 - new as f64) / original as f64) * 100.0)
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, b"not really an image").unwrap();
    }

    #[test]
    fn test_supported_formats_are_case_insensitive() {
        for name in ["a.png", "b.JPG", "c.jpeg", "d.WebP", "e.gif", "f.TIFF", "g.tif"] {
            assert!(FileManager::is_supported_format(Path::new(name)), "{}", name);
        }
        for name in ["a.txt", "b.bmp", "noext", "archive.png.zip"] {
            assert!(!FileManager::is_supported_format(Path::new(name)), "{}", name);
        }
    }

    #[test]
    fn test_collect_tasks_mirrors_tree() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        touch(&input.join("a.png"));
        touch(&input.join("sub").join("b.jpg"));
        touch(&input.join("sub").join("c.txt"));
        fs::create_dir_all(input.join("empty").join("deeper")).unwrap();

        let mut queue = FileManager::collect_tasks(&input, &output).unwrap();
        assert_eq!(queue.len(), 2);

        let mut outputs = Vec::new();
        while let Some(task) = queue.next_task() {
            outputs.push(task.output_path);
        }
        outputs.sort();
        assert_eq!(outputs, vec![output.join("a.png"), output.join("sub").join("b.png")]);

        assert!(output.join("sub").is_dir());
        assert!(output.join("empty").join("deeper").is_dir());
        // Nessun file viene creato dalla scansione
        assert!(!output.join("sub").join("c.png").exists());
        assert!(!output.join("a.png").exists());
    }

    #[test]
    fn test_collect_tasks_empty_tree() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        let output = temp_dir.path().join("out");
        fs::create_dir(&input).unwrap();

        let queue = FileManager::collect_tasks(&input, &output).unwrap();
        assert!(queue.is_empty());
        assert!(output.is_dir());
    }

    #[test]
    fn test_collect_tasks_missing_root_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let result = FileManager::collect_tasks(&temp_dir.path().join("missing"), &temp_dir.path().join("out"));
        assert!(matches!(result, Err(OptimizeError::Traversal(_))));
        assert!(!temp_dir.path().join("out").exists());
    }

    #[test]
    fn test_collect_tasks_uncreatable_output_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let input = temp_dir.path().join("in");
        touch(&input.join("sub").join("a.png"));
        // Un file occupa il posto della directory mirror
        let output = temp_dir.path().join("out");
        fs::create_dir(&output).unwrap();
        fs::write(output.join("sub"), b"blocker").unwrap();

        let result = FileManager::collect_tasks(&input, &output);
        assert!(matches!(result, Err(OptimizeError::CreateDir { .. })));
    }

    #[test]
    fn test_format_kb() {
        assert_eq!(FileManager::format_kb(Some(102_400)), "100.00");
        assert_eq!(FileManager::format_kb(Some(1536)), "1.50");
        assert_eq!(FileManager::format_kb(None), "N/A");
    }

    #[test]
    fn test_calculate_savings() {
        let saved = FileManager::calculate_savings(Some(100 * 1024), Some(60 * 1024)).unwrap();
        assert_eq!(format!("{:.2}", saved), "40.00");
        assert_eq!(FileManager::calculate_savings(Some(0), Some(10)), None);
        assert_eq!(FileManager::calculate_savings(None, Some(10)), None);
        assert_eq!(FileManager::calculate_savings(Some(10), None), None);

        let grew = FileManager::calculate_savings(Some(100), Some(150)).unwrap();
        assert_eq!(format!("{:.2}", grew), "-50.00");
    }

    #[test]
    fn test_format_size() {
        assert_eq!(FileManager::format_size(512), "512 B");
        assert_eq!(FileManager::format_size(2048), "2.00 KB");
        assert_eq!(FileManager::format_size(5 * 1024 * 1024), "5.00 MB");
    }

    #[test]
    fn test_file_size_missing_file() {
        assert_eq!(FileManager::file_size(&PathBuf::from("/definitely/not/here.png")), None);
    }
}
