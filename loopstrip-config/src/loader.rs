use anyhow::{Context, anyhow};
use loopstrip_core::CarouselConfig;
use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::debug;

/// Path of a TOML or JSON config file, relative to the loader root.
pub const CONFIG_PATH_VAR: &str = "LOOPSTRIP_CONFIG_PATH";
/// Inline JSON config.
pub const CONFIG_JSON_VAR: &str = "LOOPSTRIP_CONFIG_JSON";

const DEFAULT_FILES: &[&str] = &[
    "loopstrip.toml",
    "loopstrip.json",
    "config/loopstrip.toml",
    "config/loopstrip.json",
];

/// Source that produced the carousel configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ConfigSource {
    /// Compiled defaults.
    #[default]
    Default,
    /// File named by `$LOOPSTRIP_CONFIG_PATH`.
    EnvPath(PathBuf),
    /// `$LOOPSTRIP_CONFIG_JSON`.
    EnvInline,
    /// A default file found under the root.
    File(PathBuf),
}

/// A validated configuration and where it came from.
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    /// Validated config with overrides applied.
    pub config: CarouselConfig,
    /// Where the base config came from.
    pub source: ConfigSource,
}

/// Resolves a [`CarouselConfig`] from the environment and well-known files.
///
/// Evaluation order:
/// 1) `$LOOPSTRIP_CONFIG_PATH` (TOML or JSON file),
/// 2) `$LOOPSTRIP_CONFIG_JSON` (inline JSON),
/// 3) the first of `loopstrip.{toml,json}` / `config/loopstrip.{toml,json}`
///    under the root directory,
/// 4) defaults.
///
/// Single-field overrides (`LOOPSTRIP_AUTOPLAY`,
/// `LOOPSTRIP_AUTOPLAY_INTERVAL_MS`, `LOOPSTRIP_RESUME_COOLDOWN_MS`,
/// `LOOPSTRIP_MIN_SWIPE_PX`) apply on top of whichever source won.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    vars: HashMap<String, String>,
    root: PathBuf,
}

impl ConfigLoader {
    /// Loader over an explicit root and no environment.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            vars: HashMap::new(),
            root: root.into(),
        }
    }

    /// Loader over the process environment (after reading `.env`, if any)
    /// rooted at the current directory.
    pub fn from_process_env() -> Self {
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "loaded .env");
        }
        let root = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        Self {
            vars: env::vars().collect(),
            root,
        }
    }

    /// Set one variable, replacing any previous value.
    pub fn with_var(
        mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.vars.insert(key.into(), value.into());
        self
    }

    fn var(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    /// Resolve, override and validate.
    pub fn load(&self) -> anyhow::Result<ConfigLoad> {
        let (mut config, source) = self.resolve()?;
        self.apply_overrides(&mut config)?;
        config.validate().with_context(|| {
            format!("invalid carousel config from {source:?}")
        })?;
        debug!(?source, "carousel config loaded");
        Ok(ConfigLoad { config, source })
    }

    fn resolve(&self) -> anyhow::Result<(CarouselConfig, ConfigSource)> {
        if let Some(path_str) = self.var(CONFIG_PATH_VAR) {
            let path = self.root.join(path_str);
            let config = Self::read_file(&path)?;
            return Ok((config, ConfigSource::EnvPath(path)));
        }

        if let Some(raw) = self.var(CONFIG_JSON_VAR) {
            let parsed = ConfigFormat::Json.parse(raw).with_context(|| {
                format!("failed to parse {CONFIG_JSON_VAR}")
            })?;
            return Ok((parsed, ConfigSource::EnvInline));
        }

        if let Some(path) = self.find_default_file() {
            let config = Self::read_file(&path)?;
            return Ok((config, ConfigSource::File(path)));
        }

        Ok((CarouselConfig::default(), ConfigSource::Default))
    }

    fn apply_overrides(
        &self,
        config: &mut CarouselConfig,
    ) -> anyhow::Result<()> {
        if let Some(v) = self.parsed::<bool>("LOOPSTRIP_AUTOPLAY")? {
            config.autoplay = v;
        }
        if let Some(v) = self.parsed("LOOPSTRIP_AUTOPLAY_INTERVAL_MS")? {
            config.autoplay_interval_ms = v;
        }
        if let Some(v) = self.parsed("LOOPSTRIP_RESUME_COOLDOWN_MS")? {
            config.resume_cooldown_ms = v;
        }
        if let Some(v) = self.parsed("LOOPSTRIP_MIN_SWIPE_PX")? {
            config.min_swipe_px = v;
        }
        Ok(())
    }

    fn parsed<T>(&self, key: &str) -> anyhow::Result<Option<T>>
    where
        T: FromStr,
        T::Err: std::fmt::Display,
    {
        self.var(key)
            .map(|raw| {
                raw.trim()
                    .parse::<T>()
                    .map_err(|err| anyhow!("invalid {key}={raw}: {err}"))
            })
            .transpose()
    }

    /// Read one config file, choosing the format by extension.
    pub fn read_file(path: &Path) -> anyhow::Result<CarouselConfig> {
        let contents = fs::read_to_string(path).with_context(|| {
            format!("failed to read carousel config {}", path.display())
        })?;
        let parsed = match ConfigFormat::from_path(path) {
            Some(format) => format.parse(&contents),
            None => ConfigFormat::sniff(&contents),
        };
        parsed.with_context(|| {
            format!("invalid carousel config {}", path.display())
        })
    }

    fn find_default_file(&self) -> Option<PathBuf> {
        DEFAULT_FILES
            .iter()
            .map(|candidate| self.root.join(candidate))
            .find(|path| path.exists())
    }
}

/// On-disk and inline encodings a carousel config may use.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// TOML document.
    Toml,
    /// JSON object.
    Json,
}

impl ConfigFormat {
    /// Format implied by the file extension, if it names one.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "toml" => Some(Self::Toml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }

    /// Deserialize `contents`; absent fields take their defaults.
    pub fn parse(self, contents: &str) -> anyhow::Result<CarouselConfig> {
        let config = match self {
            Self::Toml => toml::from_str(contents)?,
            Self::Json => serde_json::from_str(contents)?,
        };
        Ok(config)
    }

    /// Try TOML, then JSON, for contents with no known extension.
    pub fn sniff(contents: &str) -> anyhow::Result<CarouselConfig> {
        Self::Toml.parse(contents).or_else(|toml_err| {
            Self::Json.parse(contents).map_err(|json_err| {
                anyhow!("neither TOML ({toml_err}) nor JSON ({json_err})")
            })
        })
    }
}
