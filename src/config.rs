use std::path::PathBuf;

use crate::errors::HostError;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_STATIC_DIR: &str = "frontend/dist";

/// Host settings read from the environment.
#[derive(Clone, Debug, PartialEq)]
pub struct HostConfig {
    pub port: u16,
    /// Compiled frontend bundle (`trunk build` output).
    pub static_dir: PathBuf,
    /// Assistant API base handed to the browser. Empty means same origin.
    pub api_base: String,
}

impl HostConfig {
    pub fn from_env() -> Result<Self, HostError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, HostError> {
        let port = match lookup("PORT").map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) {
            Some(value) => match value.parse::<u16>() {
                Ok(port) if port != 0 => port,
                _ => return Err(HostError::InvalidPort { value }),
            },
            None => DEFAULT_PORT,
        };

        let static_dir = lookup("STATIC_DIR")
            .filter(|d| !d.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATIC_DIR));

        let api_base = lookup("ASSISTANT_API_BASE")
            .map(|b| b.trim().trim_end_matches('/').to_string())
            .unwrap_or_default();
        if !api_base.is_empty() && !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
            return Err(HostError::InvalidApiBase { value: api_base });
        }

        Ok(Self { port, static_dir, api_base })
    }

    /// Fails when the frontend bundle has not been built.
    pub fn check_static_dir(&self) -> Result<(), HostError> {
        if self.static_dir.is_dir() {
            Ok(())
        } else {
            Err(HostError::MissingStaticDir { path: self.static_dir.clone() })
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config(vars: &[(&str, &str)]) -> Result<HostConfig, HostError> {
        let vars: HashMap<String, String> =
            vars.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        HostConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let config = config(&[]).unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.static_dir, PathBuf::from(DEFAULT_STATIC_DIR));
        assert_eq!(config.api_base, "");
    }

    #[test]
    fn reads_all_variables() {
        let config = config(&[
            ("PORT", "3000"),
            ("STATIC_DIR", "/srv/planner"),
            ("ASSISTANT_API_BASE", "https://api.example.com/"),
        ])
        .unwrap();
        assert_eq!(config.port, 3000);
        assert_eq!(config.static_dir, PathBuf::from("/srv/planner"));
        assert_eq!(config.api_base, "https://api.example.com");
    }

    #[test]
    fn rejects_bad_port() {
        let err = config(&[("PORT", "eighty")]).unwrap_err();
        assert!(matches!(err, HostError::InvalidPort { ref value, .. } if value == "eighty"));

        assert!(matches!(config(&[("PORT", "0")]), Err(HostError::InvalidPort { .. })));
    }

    #[test]
    fn blank_port_falls_back_to_default() {
        assert_eq!(config(&[("PORT", "  ")]).unwrap().port, DEFAULT_PORT);
    }

    #[test]
    fn rejects_api_base_without_scheme() {
        let err = config(&[("ASSISTANT_API_BASE", "api.example.com")]).unwrap_err();
        assert!(matches!(err, HostError::InvalidApiBase { .. }));
    }

    #[test]
    fn missing_static_dir_is_reported() {
        let config = config(&[("STATIC_DIR", "definitely/not/here")]).unwrap();
        assert!(matches!(config.check_static_dir(), Err(HostError::MissingStaticDir { .. })));

        let here = HostConfig { static_dir: PathBuf::from("."), ..config };
        assert!(here.check_static_dir().is_ok());
    }
}
