//! Loader for craft configuration with file + environment overlays.
//!
//! Precedence, lowest first: built-in defaults, config files / inline YAML
//! (in the order they were added), then `CRAFT_`-prefixed environment
//! variables. Nested keys use a double underscore, so
//! `CRAFT_HTTP__TIMEOUT_SECS=5` sets `http.timeout_secs`. String values may
//! reference other variables as `${VAR}`; those are expanded after merging.
//!
//! ```yaml
//! http:
//!   timeout_secs: 15
//!   connect_timeout_secs: 5
//! format:
//!   locale: uk
//!   fallback_locale: en
//! sources:
//!   wordle_strong_index: 7
//! logging:
//!   level: info
//!   format: json
//! output: text
//! ```
use config::{Config, ConfigError, Environment, File, FileFormat};
use craft_common::OutputFormat;
use craft_common::observability::{LogConfig, LogFormat};
use craft_format::{DurationFormatter, Locale};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::time::Duration;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;
const ENV_PREFIX: &str = "CRAFT";

pub const DEFAULT_WHOIS_BASE: &str = "https://who.is/whois-ip/ip-address";
pub const DEFAULT_WORDLE_URL: &str = "https://www.tomsguide.com/news/what-is-todays-wordle-answer";
pub const DEFAULT_WORDLE_STRONG_INDEX: usize = 7;

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct CraftConfig {
    pub http: HttpSettings,
    pub format: FormatSettings,
    pub sources: SourceSettings,
    pub logging: LoggingSettings,
    pub output: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub connect_timeout_secs: u64,
    /// `None` keeps the client's built-in agent string.
    pub user_agent: Option<String>,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 15,
            connect_timeout_secs: 5,
            user_agent: None,
        }
    }
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormatSettings {
    pub locale: Locale,
    /// Locale used for unrecognised tags; unset means unknown tags are errors.
    pub fallback_locale: Option<Locale>,
}

impl FormatSettings {
    pub fn duration_formatter(&self) -> DurationFormatter {
        match self.fallback_locale {
            Some(locale) => DurationFormatter::new().with_fallback(locale),
            None => DurationFormatter::new(),
        }
    }
}

/// Where the scraping helpers look things up.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct SourceSettings {
    pub whois_base: String,
    pub wordle_url: String,
    /// Position of the answer among the page's `<strong>` elements.
    pub wordle_strong_index: usize,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            whois_base: DEFAULT_WHOIS_BASE.into(),
            wordle_url: DEFAULT_WORDLE_URL.into(),
            wordle_strong_index: DEFAULT_WORDLE_STRONG_INDEX,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    pub level: String,
    pub format: LogFormat,
    pub file: bool,
    pub dir: Option<PathBuf>,
    pub stderr: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "warn".into(),
            format: LogFormat::Text,
            file: false,
            dir: None,
            stderr: true,
        }
    }
}

impl LoggingSettings {
    pub fn log_config(&self, app_name: &'static str) -> LogConfig {
        LogConfig {
            app_name,
            file: self.file,
            log_dir: self.dir.clone(),
            emit_stderr: self.stderr,
            format: self.format,
            default_filter: self.level.clone(),
        }
    }
}

/// `$XDG_CONFIG_HOME/craft/craft.yaml` (or the platform equivalent).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("craft").join("craft.yaml"))
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => break,
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (files + env overrides).
pub struct CraftConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Environment,
}

impl Default for CraftConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl CraftConfigLoader {
    /// Defaults plus `CRAFT_` env overrides; add files with the `with_*` methods.
    ///
    /// ```
    /// use craft_config::CraftConfigLoader;
    ///
    /// let config = CraftConfigLoader::new()
    ///     .with_yaml_str("http:\n  timeout_secs: 3")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.http.timeout_secs, 3);
    /// assert_eq!(config.http.connect_timeout_secs, 5);
    /// ```
    pub fn new() -> Self {
        Self {
            builder: Config::builder(),
            env: Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        }
    }

    /// Attach a required YAML/TOML/JSON file; the format is inferred by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Like [`with_file`](Self::with_file) but silently skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Attach [`default_config_path`] if the platform has a config directory.
    pub fn with_default_file(self) -> Self {
        match default_config_path() {
            Some(path) => self.with_optional_file(path),
            None => self,
        }
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use craft_config::CraftConfigLoader;
    /// use craft_format::Locale;
    ///
    /// let cfg = CraftConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// format:
    ///   locale: uk
    ///   fallback_locale: en
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.format.locale, Locale::Uk);
    /// let formatter = cfg.format.duration_formatter();
    /// assert_eq!(formatter.format(61, "xx").unwrap(), "1 minute");
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, FileFormat::Yaml));
        self
    }

    /// Merge all sources, expand `${VAR}` placeholders and deserialize.
    pub fn load(self) -> Result<CraftConfig, ConfigError> {
        let cfg = self.builder.add_source(self.env).build()?;

        // Convert to serde_json::Value first
        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn expands_placeholders_inside_strings() {
        temp_env::with_var("CRAFT_TEST_HOST", Some("who.is"), || {
            let mut v = json!("https://${CRAFT_TEST_HOST}/whois-ip");
            expand_env_in_value(&mut v);
            assert_eq!(v, json!("https://who.is/whois-ip"));
        });
    }

    #[test]
    fn expands_nested_sections_and_skips_non_strings() {
        temp_env::with_var("CRAFT_TEST_AGENT", Some("agent/2"), || {
            let mut v = json!({
                "http": { "user_agent": "$CRAFT_TEST_AGENT", "timeout_secs": 3 },
                "list": ["${CRAFT_TEST_AGENT}", true, null]
            });
            expand_env_in_value(&mut v);
            assert_eq!(
                v,
                json!({
                    "http": { "user_agent": "agent/2", "timeout_secs": 3 },
                    "list": ["agent/2", true, null]
                })
            );
        });
    }

    #[test]
    fn follows_chained_variables() {
        temp_env::with_vars(
            [
                ("CRAFT_TEST_C", Some("leaf")),
                ("CRAFT_TEST_B", Some("mid-${CRAFT_TEST_C}")),
                ("CRAFT_TEST_A", Some("${CRAFT_TEST_B}-top")),
            ],
            || {
                let mut v = json!("${CRAFT_TEST_A}");
                expand_env_in_value(&mut v);
                assert_eq!(v, json!("mid-leaf-top"));
            },
        );
    }

    #[test]
    fn cycles_terminate() {
        temp_env::with_vars(
            [
                ("CRAFT_TEST_X", Some("${CRAFT_TEST_Y}")),
                ("CRAFT_TEST_Y", Some("${CRAFT_TEST_X}")),
            ],
            || {
                let mut v = json!("<${CRAFT_TEST_X}>");
                expand_env_in_value(&mut v);
                let s = v.as_str().unwrap();
                assert!(s.starts_with('<') && s.ends_with('>'));
                assert!(s.contains("${"));
            },
        );
    }

    #[test]
    fn unknown_vars_are_left_as_is() {
        let mut v = json!("hi-${CRAFT_DOES_NOT_EXIST}");
        expand_env_in_value(&mut v);
        assert_eq!(v, json!("hi-${CRAFT_DOES_NOT_EXIST}"));
    }

    #[test]
    fn defaults_are_strict_and_quiet() {
        let cfg = CraftConfig::default();
        assert_eq!(cfg.format.locale, Locale::En);
        assert_eq!(cfg.format.fallback_locale, None);
        assert!(cfg.format.duration_formatter().format(1, "fr").is_err());
        assert_eq!(cfg.sources.wordle_strong_index, 7);
        assert_eq!(cfg.logging.level, "warn");
        assert!(!cfg.logging.file);
        assert_eq!(cfg.http.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn log_config_mirrors_settings() {
        let settings = LoggingSettings {
            level: "debug".into(),
            format: LogFormat::Json,
            file: true,
            dir: Some(PathBuf::from("/tmp/craft-logs")),
            stderr: false,
        };
        let lc = settings.log_config("craft");
        assert_eq!(lc.app_name, "craft");
        assert_eq!(lc.default_filter, "debug");
        assert_eq!(lc.format, LogFormat::Json);
        assert!(lc.file && !lc.emit_stderr);
        assert_eq!(lc.log_dir, Some(PathBuf::from("/tmp/craft-logs")));
    }
}
