use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Optional `grammate.toml`. The provider credential is deliberately not a
/// file setting; it only comes from the environment or the command line.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub server: Option<ServerSection>,
    pub provider: Option<ProviderSection>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    pub host: Option<String>,
    pub port: Option<u16>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProviderSection {
    pub model: Option<String>,
    pub api_base_url: Option<String>,
}

impl FileConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        Ok(toml::from_str(&processed_content)?)
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are left as written.
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static ENV_VAR_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("valid regex"));

        ENV_VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn host(&self) -> Option<&str> {
        self.server.as_ref()?.host.as_deref()
    }

    pub fn port(&self) -> Option<u16> {
        self.server.as_ref()?.port
    }

    pub fn model(&self) -> Option<&str> {
        self.provider.as_ref()?.model.as_deref()
    }

    pub fn api_base_url(&self) -> Option<&str> {
        self.provider.as_ref()?.api_base_url.as_deref()
    }
}
