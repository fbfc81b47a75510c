//! Configuration types for fetch runs.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default MediaWiki API endpoint.
pub const DEFAULT_ENDPOINT: &str = "https://dontstarve.wiki.gg/api.php";

/// Default `User-Agent` sent with every request.
pub const DEFAULT_USER_AGENT: &str = "DST-Craft-Wiki-Bot/1.0 (personal project)";

/// Which image set a run reconciles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    #[default]
    Items,
    Materials,
}

impl Mode {
    /// Returns the lowercase name used on the command line.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Materials => "materials",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "items" => Ok(Self::Items),
            "materials" => Ok(Self::Materials),
            other => Err(Error::UnknownMode(other.to_string())),
        }
    }
}

/// Settings for talking to the wiki and pacing the run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FetchConfig {
    /// `api.php` endpoint of the wiki.
    pub endpoint: String,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Number of missing filenames looked up per API call.
    pub batch_size: usize,
    /// Maximum number of candidate titles sent per API call.
    pub max_titles: usize,
    /// Pause after each download attempt, in milliseconds.
    pub download_delay_ms: u64,
    /// Pause after each batch, in milliseconds.
    pub batch_delay_ms: u64,
    /// Per-request timeout, in seconds.
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            batch_size: 10,
            max_titles: 50,
            download_delay_ms: 300,
            batch_delay_ms: 1000,
            timeout_secs: 30,
        }
    }
}

impl FetchConfig {
    /// Creates a new configuration with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the API endpoint.
    #[must_use]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the number of filenames per batch.
    #[must_use]
    pub const fn with_batch_size(mut self, size: usize) -> Self {
        self.batch_size = size;
        self
    }

    /// Sets the title cap per API call.
    #[must_use]
    pub const fn with_max_titles(mut self, max: usize) -> Self {
        self.max_titles = max;
        self
    }

    /// Sets both pauses. Tests use zero to run without sleeping.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub const fn with_delays(mut self, download: Duration, batch: Duration) -> Self {
        self.download_delay_ms = download.as_millis() as u64;
        self.batch_delay_ms = batch.as_millis() as u64;
        self
    }

    #[must_use]
    pub const fn download_delay(&self) -> Duration {
        Duration::from_millis(self.download_delay_ms)
    }

    #[must_use]
    pub const fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Input list and output directory for one mode.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ModePaths {
    /// Newline-delimited list of wanted filenames.
    pub list: PathBuf,
    /// Directory the images are saved into.
    pub out_dir: PathBuf,
}

/// Path configuration for both modes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct PathConfig {
    pub items: ModePaths,
    pub materials: ModePaths,
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            items: ModePaths {
                list: PathBuf::from("/tmp/items_needed.txt"),
                out_dir: PathBuf::from("public/images/items"),
            },
            materials: ModePaths {
                list: PathBuf::from("/tmp/materials_needed.txt"),
                out_dir: PathBuf::from("public/images/materials"),
            },
        }
    }
}

impl PathConfig {
    /// Returns the paths a mode reads from and writes to.
    #[must_use]
    pub const fn for_mode(&self, mode: Mode) -> &ModePaths {
        match mode {
            Mode::Items => &self.items,
            Mode::Materials => &self.materials,
        }
    }
}

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct AppConfig {
    pub fetch: FetchConfig,
    pub paths: PathConfig,
    /// Extra local-name to wiki-name renames, merged over the built-in table.
    pub aliases: BTreeMap<String, String>,
}

impl AppConfig {
    /// Creates a new config with default values.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Default location of the config file, e.g. `~/.config/wiki-assets/config.toml`.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("wiki-assets").join("config.toml"))
    }

    /// Loads configuration.
    ///
    /// An explicit `path` must exist. Without one, the default path is used
    /// if present, otherwise built-in defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, does not parse, or
    /// holds invalid values.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path.to_path_buf(),
            None => match Self::default_path() {
                Some(path) if path.is_file() => path,
                _ => {
                    log::debug!("No config file found, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let contents = std::fs::read_to_string(&path).map_err(|e| {
            Error::Config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Parses and validates a TOML document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] on parse failure or invalid values.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.fetch.batch_size == 0 {
            return Err(Error::Config("fetch.batch_size must be at least 1".into()));
        }
        if self.fetch.max_titles == 0 {
            return Err(Error::Config("fetch.max_titles must be at least 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_fetch_config() {
        let config = FetchConfig::default();
        assert_eq!(config.batch_size, 10);
        assert_eq!(config.max_titles, 50);
        assert_eq!(config.download_delay(), Duration::from_millis(300));
        assert_eq!(config.batch_delay(), Duration::from_secs(1));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
    }

    #[test]
    fn fetch_config_builder_pattern() {
        let config = FetchConfig::new()
            .with_endpoint("http://localhost/api.php")
            .with_batch_size(3)
            .with_max_titles(7)
            .with_delays(Duration::ZERO, Duration::from_millis(5));

        assert_eq!(config.endpoint, "http://localhost/api.php");
        assert_eq!(config.batch_size, 3);
        assert_eq!(config.max_titles, 7);
        assert_eq!(config.download_delay(), Duration::ZERO);
        assert_eq!(config.batch_delay(), Duration::from_millis(5));
    }

    #[test]
    fn mode_paths() {
        let paths = PathConfig::default();
        assert_eq!(
            paths.for_mode(Mode::Items).list,
            PathBuf::from("/tmp/items_needed.txt")
        );
        assert_eq!(
            paths.for_mode(Mode::Materials).out_dir,
            PathBuf::from("public/images/materials")
        );
    }

    #[test]
    fn mode_from_str() {
        assert_eq!("items".parse::<Mode>().unwrap(), Mode::Items);
        assert_eq!("materials".parse::<Mode>().unwrap(), Mode::Materials);
        assert!(matches!(
            "foods".parse::<Mode>(),
            Err(Error::UnknownMode(m)) if m == "foods"
        ));
        assert_eq!(Mode::default(), Mode::Items);
    }

    #[test]
    fn empty_toml_is_default() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config, AppConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = AppConfig::from_toml_str(
            r#"
            [fetch]
            batch_size = 5
            download_delay_ms = 0

            [paths.items]
            list = "needed.txt"
            out_dir = "out"

            [aliases]
            Heat_Rock = "Thermal_Stone"
            "#,
        )
        .unwrap();

        assert_eq!(config.fetch.batch_size, 5);
        assert_eq!(config.fetch.max_titles, 50);
        assert_eq!(config.fetch.download_delay(), Duration::ZERO);
        assert_eq!(config.paths.items.out_dir, PathBuf::from("out"));
        assert_eq!(config.paths.materials, PathConfig::default().materials);
        assert_eq!(config.aliases["Heat_Rock"], "Thermal_Stone");
    }

    #[test]
    fn zero_batch_size_rejected() {
        let err = AppConfig::from_toml_str("[fetch]\nbatch_size = 0\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn malformed_toml_rejected() {
        let err = AppConfig::from_toml_str("[fetch\n").unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn app_config_serializes_to_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string(&config).unwrap();
        let deserialized = AppConfig::from_toml_str(&toml_str).unwrap();
        assert_eq!(deserialized, config);
    }

    #[test]
    fn load_explicit_missing_file_fails() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = AppConfig::load(Some(&dir.path().join("missing.toml"))).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn load_explicit_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[fetch]\nmax_titles = 20\n").unwrap();
        let config = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(config.fetch.max_titles, 20);
    }
}
