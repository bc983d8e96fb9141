//! # Configuration Management Module
//!
//! Questo modulo gestisce tutta la configurazione dell'applicazione.
//!
//! ## Responsabilità:
//! - Definisce la struct `Config` con le directory di input/output e il pool di worker
//! - Fornisce validazione dei parametri
//! - Supporta caricamento/salvataggio configurazione da/verso file JSON
//! - Fornisce valori di default sensati per tutti i parametri
//!
//! ## Parametri di configurazione:
//! - `input_dir`: Directory radice con le immagini originali (default: `./images`)
//! - `output_dir`: Directory radice della copia ottimizzata (default: `./optimised`)
//! - `workers`: Numero di worker paralleli (default: None = core disponibili - 1, minimo 1)
//! - `show_progress`: Mostra la progress bar (default: true)
//!
//! Il programma non accetta argomenti: la configurazione viene letta da
//! `png-optimizer.json` nella directory corrente, se presente.
//!
//! ## Validazione:
//! - Controlla che workers, se specificato, sia > 0
//! - Controlla che input e output siano directory diverse
//! - Controlla che l'output non sia annidato dentro l'input
//!
//! ## Esempio:
//! ```rust,ignore
//! let config = Config {
//!     workers: Some(8),
//!     ..Default::default()
//! };
//! config.validate()?;
//! ```

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Name of the configuration file looked up in the working directory
pub const CONFIG_FILE: &str = "png-optimizer.json";

/// Configuration for a PNG optimization run
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Root of the tree containing the original images
    pub input_dir: PathBuf,
    /// Root of the mirrored tree receiving the optimized PNGs
    pub output_dir: PathBuf,
    /// Number of parallel workers (None = available parallelism - 1, min 1)
    pub workers: Option<usize>,
    /// Draw a progress bar while converting
    pub show_progress: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("./images"),
            output_dir: PathBuf::from("./optimised"),
            workers: None,
            show_progress: true,
        }
    }
}

impl Config {
    /// Validate configuration parameters
    pub fn validate(&self) -> Result<()> {
        if self.workers == Some(0) {
            return Err(anyhow::anyhow!("Number of workers must be greater than 0"));
        }

        if self.input_dir == self.output_dir {
            return Err(anyhow::anyhow!(
                "Input and output directories must differ: {}",
                self.input_dir.display()
            ));
        }

        // L'output dentro l'input verrebbe scansionato mentre lo si crea
        if let (Ok(input), Some(output)) = (
            self.input_dir.canonicalize(),
            Self::resolve_existing_prefix(&self.output_dir),
        ) {
            if output.starts_with(&input) {
                return Err(anyhow::anyhow!(
                    "Output directory {} must not be inside input directory {}",
                    self.output_dir.display(),
                    self.input_dir.display()
                ));
            }
        }

        Ok(())
    }

    /// Number of workers to spawn for this run
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(default_worker_count)
    }

    /// Load configuration from file
    pub async fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = tokio::fs::read_to_string(path).await?;
        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub async fn save_to_file(&self, path: &Path) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, content).await?;
        Ok(())
    }

    /// Canonicalizza il primo antenato esistente e riattacca il resto del path
    fn resolve_existing_prefix(path: &Path) -> Option<PathBuf> {
        let mut missing = Vec::new();
        let mut current = path;
        loop {
            if let Ok(canonical) = current.canonicalize() {
                return Some(missing.iter().rev().fold(canonical, |acc, part| acc.join(part)));
            }
            missing.push(current.file_name()?.to_os_string());
            current = current.parent()?;
            if current.as_os_str().is_empty() {
                current = Path::new(".");
            }
        }
    }
}

/// Available parallelism minus one (leaves a core to the coordinator), minimum one
pub fn default_worker_count() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
        .saturating_sub(1)
        .max(1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_config_validation() {
        let mut config = Config::default();
        assert!(config.validate().is_ok());

        config.workers = Some(0);
        assert!(config.validate().is_err());

        config.workers = Some(2);
        assert!(config.validate().is_ok());

        config.output_dir = config.input_dir.clone();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_config_rejects_output_inside_input() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config {
            input_dir: temp_dir.path().to_path_buf(),
            output_dir: temp_dir.path().join("nested").join("optimised"),
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let sibling = Config {
            input_dir: temp_dir.path().join("images"),
            output_dir: temp_dir.path().join("optimised"),
            ..Default::default()
        };
        std::fs::create_dir(&sibling.input_dir).unwrap();
        assert!(sibling.validate().is_ok());
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.input_dir, PathBuf::from("./images"));
        assert_eq!(config.output_dir, PathBuf::from("./optimised"));
        assert_eq!(config.workers, None);
        assert!(config.show_progress);
    }

    #[test]
    fn test_worker_count_policy() {
        let config = Config::default();
        assert_eq!(config.worker_count(), default_worker_count());
        assert!(config.worker_count() >= 1);

        let fixed = Config {
            workers: Some(3),
            ..Default::default()
        };
        assert_eq!(fixed.worker_count(), 3);
    }

    #[tokio::test]
    async fn test_config_save_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);

        let original_config = Config {
            input_dir: PathBuf::from("photos"),
            output_dir: PathBuf::from("photos-png"),
            workers: Some(6),
            show_progress: false,
        };

        original_config.save_to_file(&config_path).await.unwrap();
        let loaded_config = Config::from_file(&config_path).await.unwrap();

        assert_eq!(loaded_config.input_dir, PathBuf::from("photos"));
        assert_eq!(loaded_config.output_dir, PathBuf::from("photos-png"));
        assert_eq!(loaded_config.workers, Some(6));
        assert!(!loaded_config.show_progress);
    }

    #[tokio::test]
    async fn test_config_missing_file_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::from_file(&temp_dir.path().join(CONFIG_FILE)).await.unwrap();
        assert_eq!(config.output_dir, PathBuf::from("./optimised"));
    }

    #[tokio::test]
    async fn test_config_partial_file_fills_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE);
        tokio::fs::write(&config_path, r#"{ "workers": 2 }"#).await.unwrap();

        let config = Config::from_file(&config_path).await.unwrap();
        assert_eq!(config.workers, Some(2));
        assert_eq!(config.input_dir, PathBuf::from("./images"));
    }
}
