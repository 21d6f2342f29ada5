use serde::Deserialize;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::defaults;
use crate::error::GenerationError;
use crate::field::GeneratorConfig;
use crate::geometry::Domain;

fn default_count() -> usize {
    defaults::POLYGON_COUNT
}
fn default_verbose() -> bool {
    false
}

/// Settings read from `polyroute.toml`; command-line flags take precedence
#[derive(Debug, Deserialize, Default)]
pub struct FileConfig {
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub start: Option<[f64; 2]>,
    #[serde(default)]
    pub goal: Option<[f64; 2]>,
    #[serde(default)]
    pub output: Option<PathBuf>,
    #[serde(default = "default_verbose")]
    pub verbose: bool,
    #[serde(default)]
    pub domain: Option<DomainConfig>,
    #[serde(default)]
    pub generation: Option<GenerationConfig>,
}

fn default_min() -> f64 {
    0.0
}
fn default_size() -> f64 {
    defaults::DOMAIN_SIZE
}

#[derive(Debug, Deserialize, Clone)]
pub struct DomainConfig {
    #[serde(default = "default_min")]
    pub min_x: f64,
    #[serde(default = "default_min")]
    pub min_y: f64,
    #[serde(default = "default_size")]
    pub size: f64,
}

impl Default for DomainConfig {
    fn default() -> Self {
        Self {
            min_x: default_min(),
            min_y: default_min(),
            size: default_size(),
        }
    }
}

impl DomainConfig {
    pub fn to_domain(&self) -> Result<Domain, GenerationError> {
        Domain::new(self.min_x, self.min_y, self.size)
    }
}

fn default_min_edges() -> usize {
    defaults::MIN_EDGES
}
fn default_max_edges() -> usize {
    defaults::MAX_EDGES
}
fn default_max_attempts() -> u32 {
    defaults::MAX_ATTEMPTS
}
fn default_shrink_rounds() -> u32 {
    defaults::SHRINK_ROUNDS
}
fn default_shrink_factor() -> f64 {
    defaults::SHRINK_FACTOR
}

#[derive(Debug, Deserialize, Clone)]
pub struct GenerationConfig {
    #[serde(default = "default_min_edges")]
    pub min_edges: usize,
    #[serde(default = "default_max_edges")]
    pub max_edges: usize,
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    #[serde(default = "default_shrink_rounds")]
    pub shrink_rounds: u32,
    #[serde(default = "default_shrink_factor")]
    pub shrink_factor: f64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            min_edges: default_min_edges(),
            max_edges: default_max_edges(),
            max_attempts: default_max_attempts(),
            shrink_rounds: default_shrink_rounds(),
            shrink_factor: default_shrink_factor(),
        }
    }
}

impl GenerationConfig {
    pub fn to_generator_config(&self, seed: Option<u64>) -> GeneratorConfig {
        GeneratorConfig {
            min_edges: self.min_edges,
            max_edges: self.max_edges,
            max_attempts: self.max_attempts,
            shrink_rounds: self.shrink_rounds,
            shrink_factor: self.shrink_factor,
            seed,
        }
    }
}

impl FileConfig {
    /// Search the standard locations and return the first config that parses
    ///
    /// Parse failures of skipped files are returned as messages so they can be
    /// logged once the logger is configured from the result.
    pub fn load() -> (Option<Self>, Vec<String>) {
        Self::load_from(&get_config_paths())
    }

    fn load_from(paths: &[PathBuf]) -> (Option<Self>, Vec<String>) {
        let mut warnings = Vec::new();

        for path in paths {
            if path.exists()
                && let Ok(contents) = std::fs::read_to_string(path)
            {
                match toml::from_str(&contents) {
                    Ok(config) => return (Some(config), warnings),
                    Err(e) => {
                        warnings.push(format!("Failed to parse config file {:?}: {}", path, e));
                    }
                }
            }
        }
        (None, warnings)
    }

    /// Load an explicitly named config file
    pub fn from_path(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Debug logging is on if either the flag or the config file asks for it
pub fn resolve_verbose(flag: bool, config: Option<&FileConfig>) -> bool {
    flag || config.is_some_and(|c| c.verbose)
}

fn get_config_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    paths.push(PathBuf::from("polyroute.toml"));
    paths.push(PathBuf::from(".polyroute.toml"));

    if let Some(config_dir) = dirs::config_dir() {
        paths.push(config_dir.join("polyroute").join("config.toml"));
        paths.push(config_dir.join("polyroute.toml"));
    }

    if let Some(home) = dirs::home_dir() {
        paths.push(home.join(".polyroute.toml"));
        paths.push(home.join(".config").join("polyroute").join("config.toml"));
    }

    paths
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config: FileConfig = toml::from_str("").unwrap();
        assert_eq!(config.count, defaults::POLYGON_COUNT);
        assert!(config.seed.is_none());
        assert!(config.domain.is_none());
        assert!(!config.verbose);
    }

    #[test]
    fn test_parse_full_config() {
        let toml = r#"
            count = 12
            seed = 42
            start = [0.5, 0.5]
            goal = [9.5, 9.5]
            output = "scene.json"

            [domain]
            size = 20.0

            [generation]
            max_edges = 5
            max_attempts = 1000
        "#;

        let config: FileConfig = toml::from_str(toml).unwrap();
        assert_eq!(config.count, 12);
        assert_eq!(config.seed, Some(42));
        assert_eq!(config.start, Some([0.5, 0.5]));
        assert_eq!(config.output, Some(PathBuf::from("scene.json")));

        let domain = config.domain.unwrap().to_domain().unwrap();
        assert_eq!(domain.min_x, 0.0);
        assert_eq!(domain.size, 20.0);

        let generator = config.generation.unwrap().to_generator_config(config.seed);
        assert_eq!(generator.min_edges, 3);
        assert_eq!(generator.max_edges, 5);
        assert_eq!(generator.max_attempts, 1000);
        assert_eq!(generator.shrink_rounds, defaults::SHRINK_ROUNDS);
        assert_eq!(generator.seed, Some(42));
    }

    #[test]
    fn test_invalid_domain_in_config() {
        let config: FileConfig = toml::from_str("[domain]\nsize = -3.0").unwrap();
        assert!(config.domain.unwrap().to_domain().is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("polyroute.toml");
        fs::write(&path, "count = 3\nverbose = true\n").unwrap();

        let config = FileConfig::from_path(&path).unwrap();
        assert_eq!(config.count, 3);
        assert!(config.verbose);

        assert!(FileConfig::from_path(&dir.path().join("missing.toml")).is_err());
    }

    #[test]
    fn test_load_skips_unparsable_file() {
        let dir = tempdir().unwrap();
        let broken = dir.path().join("polyroute.toml");
        let good = dir.path().join(".polyroute.toml");
        fs::write(&broken, "count = \"many\"").unwrap();
        fs::write(&good, "count = 2\nverbose = true\n").unwrap();

        let paths = [dir.path().join("absent.toml"), broken, good];
        let (config, warnings) = FileConfig::load_from(&paths);
        assert_eq!(config.map(|c| c.count), Some(2));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].contains("polyroute.toml"));

        let (config, warnings) = FileConfig::load_from(&paths[..1]);
        assert!(config.is_none());
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_verbose_from_file_or_flag() {
        let quiet: FileConfig = toml::from_str("").unwrap();
        let loud: FileConfig = toml::from_str("verbose = true").unwrap();

        assert!(resolve_verbose(false, Some(&loud)));
        assert!(resolve_verbose(true, Some(&quiet)));
        assert!(resolve_verbose(true, None));
        assert!(!resolve_verbose(false, Some(&quiet)));
        assert!(!resolve_verbose(false, None));
    }
}
