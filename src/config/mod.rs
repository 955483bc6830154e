pub mod toml_config;

use crate::adapters::gemini::{DEFAULT_API_BASE_URL, DEFAULT_MODEL};
use crate::utils::error::{GrammateError, Result};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_required_field,
    validate_secret, validate_url, Validate,
};
use clap::Parser;
use toml_config::FileConfig;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

#[derive(Debug, Clone, Parser)]
#[command(name = "grammate")]
#[command(about = "Grammar checking service backed by a generative-language provider")]
pub struct ServerArgs {
    #[arg(long, env = "GRAMMATE_HOST", help = "Address to bind [default: 0.0.0.0]")]
    pub host: Option<String>,

    #[arg(long, env = "PORT", help = "Port to listen on [default: 5000]")]
    pub port: Option<u16>,

    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true, help = "Provider API key")]
    pub api_key: Option<String>,

    #[arg(long, env = "GEMINI_MODEL", help = "Provider model name [default: gemini-2.0-flash]")]
    pub model: Option<String>,

    #[arg(long, env = "GEMINI_API_BASE_URL", help = "Provider API base URL")]
    pub api_base_url: Option<String>,

    #[arg(long, env = "GRAMMATE_CONFIG", help = "Optional TOML configuration file")]
    pub config: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(
        long,
        env = "GRAMMATE_LOG_JSON",
        value_parser = clap::builder::BoolishValueParser::new(),
        help = "Emit logs as JSON (accepts true/false, 1/0, yes/no, on/off)"
    )]
    pub log_json: bool,
}

/// Fully resolved server settings: flag or environment first, then the
/// config file, then built-in defaults. The API key has no default.
#[derive(Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,
    pub api_key: String,
    pub model: String,
    pub api_base_url: String,
}

impl std::fmt::Debug for Settings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Settings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl Settings {
    pub fn resolve(args: &ServerArgs, file: &FileConfig) -> Result<Self> {
        let api_key = validate_required_field("GEMINI_API_KEY", &args.api_key)?.clone();

        let settings = Self {
            host: args
                .host
                .clone()
                .or_else(|| file.host().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: args.port.or(file.port()).unwrap_or(DEFAULT_PORT),
            api_key,
            model: args
                .model
                .clone()
                .or_else(|| file.model().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_base_url: args
                .api_base_url
                .clone()
                .or_else(|| file.api_base_url().map(str::to_string))
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
        };

        settings.validate()?;
        Ok(settings)
    }

    /// Reads the optional config file named by the arguments, then resolves.
    pub fn load(args: &ServerArgs) -> Result<Self> {
        let file = match &args.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path);
                FileConfig::from_file(path).map_err(|e| GrammateError::ConfigError {
                    message: format!("failed to load '{}': {}", path, e),
                })?
            }
            None => FileConfig::default(),
        };
        Self::resolve(args, &file)
    }

    /// `host:port`, resolved by the listener so names like `localhost` work.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Validate for Settings {
    fn validate(&self) -> Result<()> {
        validate_secret("GEMINI_API_KEY", &self.api_key)?;
        validate_non_empty_string("model", &self.model)?;
        validate_url("api_base_url", &self.api_base_url)?;
        validate_non_empty_string("host", &self.host)?;
        validate_positive_number("port", self.port as usize, 1)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args() -> ServerArgs {
        ServerArgs {
            host: None,
            port: None,
            api_key: Some("key".to_string()),
            model: None,
            api_base_url: None,
            config: None,
            verbose: false,
            log_json: false,
        }
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::resolve(&args(), &FileConfig::default()).unwrap();

        assert_eq!(settings.host, "0.0.0.0");
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.model, "gemini-2.0-flash");
        assert_eq!(settings.model, "gemini-2.0-flash");
        assert_eq!(settings.api_base_url, "https://generativelanguage.googleapis.com");
        assert_eq!(settings.bind_addr(), "0.0.0.0:5000");
    }

    #[test]
    fn test_missing_api_key_fails() {
        let mut args = args();
        args.api_key = None;
        let err = Settings::resolve(&args, &FileConfig::default()).unwrap_err();
        assert!(matches!(err, GrammateError::MissingConfigError { ref field } if field == "GEMINI_API_KEY"));

        args.api_key = Some("   ".to_string());
        assert!(Settings::resolve(&args, &FileConfig::default()).is_err());
    }

    #[test]
    fn test_args_override_file() {
        let file = FileConfig::from_toml_str(
            "[server]\nport = 8080\nhost = \"127.0.0.1\"\n[provider]\nmodel = \"from-file\"\n",
        )
        .unwrap();

        let mut args = args();
        args.port = Some(9090);
        let settings = Settings::resolve(&args, &file).unwrap();

        assert_eq!(settings.port, 9090);
        assert_eq!(settings.host, "127.0.0.1");
        assert_eq!(settings.model, "from-file");
    }

    #[test]
    fn test_invalid_values_rejected() {
        let mut bad_url = args();
        bad_url.api_base_url = Some("ftp://example.com".to_string());
        assert!(Settings::resolve(&bad_url, &FileConfig::default()).is_err());

        let mut bad_port = args();
        bad_port.port = Some(0);
        assert!(Settings::resolve(&bad_port, &FileConfig::default()).is_err());

        let mut bad_host = args();
        bad_host.host = Some(" ".to_string());
        assert!(Settings::resolve(&bad_host, &FileConfig::default()).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let mut args = args();
        args.api_key = Some("super-secret".to_string());
        let settings = Settings::resolve(&args, &FileConfig::default()).unwrap();
        assert!(!format!("{:?}", settings).contains("super-secret"));
    }

    #[test]
    fn test_load_reads_config_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("grammate.toml");
        std::fs::write(&path, "[server]\nport = 7070\n").unwrap();

        let mut args = args();
        args.config = Some(path.to_str().unwrap().to_string());
        let settings = Settings::load(&args).unwrap();
        assert_eq!(settings.port, 7070);

        args.config = Some(dir.path().join("missing.toml").to_str().unwrap().to_string());
        assert!(matches!(
            Settings::load(&args),
            Err(GrammateError::ConfigError { .. })
        ));
    }

    // Everything that touches these process variables lives in this one test
    // so parallel tests never observe a half-set environment.
    #[test]
    fn test_parse_from_environment() {
        const VARS: [&str; 7] = [
            "PORT",
            "GRAMMATE_HOST",
            "GEMINI_API_KEY",
            "GEMINI_MODEL",
            "GEMINI_API_BASE_URL",
            "GRAMMATE_LOG_JSON",
            "GRAMMATE_CONFIG",
        ];
        let saved: Vec<_> = VARS.iter().map(|v| (*v, std::env::var(v).ok())).collect();
        for var in VARS {
            std::env::remove_var(var);
        }

        // No key anywhere: parsing succeeds, resolution fails fast.
        let parsed = ServerArgs::try_parse_from(["grammate"]).unwrap();
        assert_eq!(parsed.api_key, None);
        assert!(matches!(
            Settings::resolve(&parsed, &FileConfig::default()),
            Err(GrammateError::MissingConfigError { ref field }) if field == "GEMINI_API_KEY"
        ));

        std::env::set_var("GEMINI_API_KEY", "env-key");
        let parsed = ServerArgs::try_parse_from(["grammate"]).unwrap();
        assert!(!parsed.log_json);
        let settings = Settings::resolve(&parsed, &FileConfig::default()).unwrap();
        assert_eq!(settings.api_key, "env-key");
        assert_eq!(settings.port, 5000);
        assert_eq!(settings.model, "gemini-2.0-flash");

        std::env::set_var("PORT", "8081");
        let parsed = ServerArgs::try_parse_from(["grammate"]).unwrap();
        assert_eq!(parsed.port, Some(8081));

        for (value, expected) in [
            ("true", true),
            ("1", true),
            ("yes", true),
            ("on", true),
            ("false", false),
            ("0", false),
            ("no", false),
        ] {
            std::env::set_var("GRAMMATE_LOG_JSON", value);
            let parsed = ServerArgs::try_parse_from(["grammate"]).unwrap();
            assert_eq!(parsed.log_json, expected, "GRAMMATE_LOG_JSON={value}");
        }

        std::env::set_var("GRAMMATE_LOG_JSON", "maybe");
        assert!(ServerArgs::try_parse_from(["grammate"]).is_err());

        for (var, value) in saved {
            match value {
                Some(value) => std::env::set_var(var, value),
                None => std::env::remove_var(var),
            }
        }
    }
}
