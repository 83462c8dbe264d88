//! Environment-driven configuration, resolved once at startup.

use std::path::PathBuf;

use crate::error::ConfigError;

pub const VISITS_FILE: &str = "dados_visitas.csv";
pub const GOALS_FILE: &str = "metas_equipe.csv";
pub const ACTIONS_FILE: &str = "planos_de_acao.csv";

const DEFAULT_ADVISOR_MODEL: &str = "gemini-2.5-flash";

/// Text-generation service settings. The advisor is optional: with no API
/// key it reports itself disabled instead of failing.
#[derive(Debug, Clone)]
pub struct AdvisorConfig {
    pub api_key: Option<String>,
    pub model: String,
}

impl AdvisorConfig {
    pub fn is_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub visits_path: PathBuf,
    pub goals_path: PathBuf,
    pub actions_path: PathBuf,
    /// Shared secret unlocking goal definition. Not a security boundary:
    /// a capability check for a handful of trusted operators. `None` means
    /// manager controls stay locked.
    pub manager_secret: Option<String>,
    pub advisor: AdvisorConfig,
}

impl Config {
    /// Resolve configuration from the process environment.
    pub fn resolve() -> Result<Self, ConfigError> {
        Self::resolve_from(|key| std::env::var(key).ok())
    }

    fn resolve_from<F>(env: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match env("SOLAROPS_DATA_DIR") {
            Some(raw) => validate_data_dir(&raw)?,
            None => PathBuf::from("."),
        };

        let manager_secret = match env("SOLAROPS_MANAGER_SECRET") {
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::InvalidValue {
                    key: "SOLAROPS_MANAGER_SECRET".to_string(),
                    message: "manager secret must not be blank when set".to_string(),
                });
            }
            Some(raw) => Some(raw),
            None => None,
        };

        let model = match env("SOLAROPS_AI_MODEL") {
            Some(raw) => {
                let trimmed = raw.trim().to_string();
                if trimmed.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        key: "SOLAROPS_AI_MODEL".to_string(),
                        message: "model name must not be empty".to_string(),
                    });
                }
                trimmed
            }
            None => DEFAULT_ADVISOR_MODEL.to_string(),
        };

        let api_key = env("GOOGLE_API_KEY").filter(|key| !key.trim().is_empty());

        Ok(Self {
            visits_path: data_dir.join(VISITS_FILE),
            goals_path: data_dir.join(GOALS_FILE),
            actions_path: data_dir.join(ACTIONS_FILE),
            manager_secret,
            advisor: AdvisorConfig { api_key, model },
        })
    }
}

fn validate_data_dir(raw: &str) -> Result<PathBuf, ConfigError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidValue {
            key: "SOLAROPS_DATA_DIR".to_string(),
            message: "data directory must not be empty".to_string(),
        });
    }
    Ok(PathBuf::from(trimmed))
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::path::PathBuf;

    use crate::error::ConfigError;

    fn resolve(vars: &[(&str, &str)]) -> Result<super::Config, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        super::Config::resolve_from(|key| map.get(key).cloned())
    }

    #[test]
    fn resolve_uses_working_directory_defaults() {
        let config = resolve(&[]).expect("config");
        assert_eq!(config.visits_path, PathBuf::from("./dados_visitas.csv"));
        assert_eq!(config.goals_path, PathBuf::from("./metas_equipe.csv"));
        assert_eq!(config.actions_path, PathBuf::from("./planos_de_acao.csv"));
        assert_eq!(config.manager_secret, None);
        assert!(!config.advisor.is_enabled());
        assert_eq!(config.advisor.model, "gemini-2.5-flash");
    }

    #[test]
    fn resolve_joins_store_files_under_data_dir() {
        let config = resolve(&[("SOLAROPS_DATA_DIR", "/var/lib/solarops")]).expect("config");
        assert_eq!(
            config.goals_path,
            PathBuf::from("/var/lib/solarops/metas_equipe.csv")
        );
    }

    #[test]
    fn resolve_rejects_blank_data_dir() {
        let err = resolve(&[("SOLAROPS_DATA_DIR", "   ")]).expect_err("must reject");
        let ConfigError::InvalidValue { key, .. } = err;
        assert_eq!(key, "SOLAROPS_DATA_DIR");
    }

    #[test]
    fn resolve_rejects_blank_manager_secret() {
        let err = resolve(&[("SOLAROPS_MANAGER_SECRET", "  ")]).expect_err("must reject");
        let ConfigError::InvalidValue { key, .. } = err;
        assert_eq!(key, "SOLAROPS_MANAGER_SECRET");
    }

    #[test]
    fn advisor_enabled_only_with_non_blank_key() {
        let config = resolve(&[("GOOGLE_API_KEY", "  ")]).expect("config");
        assert!(!config.advisor.is_enabled());

        let config = resolve(&[("GOOGLE_API_KEY", "key-123")]).expect("config");
        assert!(config.advisor.is_enabled());
    }

    #[test]
    fn advisor_model_can_be_overridden() {
        let config = resolve(&[("SOLAROPS_AI_MODEL", " gemini-2.5-pro ")]).expect("config");
        assert_eq!(config.advisor.model, "gemini-2.5-pro");
    }
}
