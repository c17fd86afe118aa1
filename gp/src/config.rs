//! GoalPlan configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main GoalPlan configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// LLM provider configuration
    pub llm: LlmConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,

    /// Text export settings
    pub export: ExportConfig,

    /// Print settings
    pub print: PrintConfig,
}

impl Config {
    /// Validate configuration before use
    ///
    /// The provider credential is the only setting read from the environment.
    /// Call this before any command that talks to the provider.
    pub fn validate(&self) -> Result<()> {
        if std::env::var(&self.llm.api_key_env).is_err() {
            return Err(eyre::eyre!(
                "LLM API key not found. Set the {} environment variable.",
                self.llm.api_key_env
            ));
        }
        Ok(())
    }

    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project-local config: .goalplan.yml
        let local_config = PathBuf::from(".goalplan.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // Try user config: ~/.config/goalplan/goalplan.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("goalplan").join("goalplan.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// LLM provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name ("gemini" or "openai")
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL
    #[serde(rename = "base-url")]
    pub base_url: String,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds, enforced by the HTTP client
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "gemini".to_string(),
            model: "gemini-3-flash-preview".to_string(),
            api_key_env: "GEMINI_API_KEY".to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            max_tokens: 8192,
            timeout_ms: 300_000,
        }
    }
}

impl LlmConfig {
    /// Read the API key from the configured environment variable
    pub fn get_api_key(&self) -> Result<String> {
        debug!(api_key_env = %self.api_key_env, "get_api_key: called");
        let key = std::env::var(&self.api_key_env)
            .map_err(|_| eyre::eyre!("Environment variable {} is not set", self.api_key_env))?;
        if key.trim().is_empty() {
            return Err(eyre::eyre!("Environment variable {} is empty", self.api_key_env));
        }
        Ok(key.trim().to_string())
    }
}

/// Prompt template overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory searched for `{name}.pmt` before the embedded templates
    pub dir: Option<String>,
}

impl PromptsConfig {
    /// Override directory with `~/` expanded
    pub fn expanded_dir(&self) -> Option<PathBuf> {
        self.dir.as_deref().map(expand_home)
    }
}

/// Text export settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Default directory for saved plans
    pub dir: String,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self { dir: ".".to_string() }
    }
}

impl ExportConfig {
    pub fn expanded_dir(&self) -> PathBuf {
        expand_home(&self.dir)
    }
}

/// Print settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PrintConfig {
    /// Command (with arguments) that receives the print layout on stdin.
    /// When unset the print layout goes to stdout.
    pub command: Option<Vec<String>>,
}

impl Default for PrintConfig {
    fn default() -> Self {
        Self {
            command: Some(vec!["lpr".to_string()]),
        }
    }
}

fn expand_home(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => dirs::home_dir()
            .map(|home| home.join(rest))
            .unwrap_or_else(|| PathBuf::from(path)),
        None => PathBuf::from(path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.export.dir, ".");
        assert_eq!(config.print.command, Some(vec!["lpr".to_string()]));
        assert!(config.prompts.dir.is_none());
    }

    #[test]
    fn test_llm_config_defaults() {
        let config = LlmConfig::default();

        assert_eq!(config.provider, "gemini");
        assert_eq!(config.model, "gemini-3-flash-preview");
        assert_eq!(config.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.base_url, "https://generativelanguage.googleapis.com");
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: openai
  model: gpt-4o
  api-key-env: MY_API_KEY
  base-url: https://api.example.com
  max-tokens: 4096
  timeout-ms: 60000

prompts:
  dir: ./my-prompts

export:
  dir: /tmp/plans

print:
  command: ["lp", "-d", "office"]
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.provider, "openai");
        assert_eq!(config.llm.model, "gpt-4o");
        assert_eq!(config.llm.api_key_env, "MY_API_KEY");
        assert_eq!(config.llm.max_tokens, 4096);
        assert_eq!(config.llm.timeout_ms, 60000);
        assert_eq!(config.prompts.expanded_dir(), Some(PathBuf::from("./my-prompts")));
        assert_eq!(config.export.expanded_dir(), PathBuf::from("/tmp/plans"));
        assert_eq!(
            config.print.command,
            Some(vec!["lp".to_string(), "-d".to_string(), "office".to_string()])
        );
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: gemini-2.5-pro
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        // Specified value
        assert_eq!(config.llm.model, "gemini-2.5-pro");

        // Defaults for unspecified
        assert_eq!(config.llm.provider, "gemini");
        assert_eq!(config.llm.api_key_env, "GEMINI_API_KEY");
        assert_eq!(config.export.dir, ".");
    }

    #[test]
    fn test_null_print_command_means_stdout() {
        let config: Config = serde_yaml::from_str("print:\n  command: null\n").unwrap();
        assert!(config.print.command.is_none());
    }

    #[test]
    #[serial]
    fn test_get_api_key_reads_env() {
        let config = LlmConfig {
            api_key_env: "GOALPLAN_TEST_KEY".to_string(),
            ..Default::default()
        };

        unsafe { std::env::set_var("GOALPLAN_TEST_KEY", " secret \n") };
        assert_eq!(config.get_api_key().unwrap(), "secret");

        unsafe { std::env::remove_var("GOALPLAN_TEST_KEY") };
        assert!(config.get_api_key().is_err());
    }

    #[test]
    #[serial]
    fn test_validate_requires_api_key() {
        let config = Config {
            llm: LlmConfig {
                api_key_env: "GOALPLAN_TEST_MISSING_KEY".to_string(),
                ..Default::default()
            },
            ..Default::default()
        };

        unsafe { std::env::remove_var("GOALPLAN_TEST_MISSING_KEY") };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("GOALPLAN_TEST_MISSING_KEY"));
    }
}
