use std::env;
use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

/// Environment variable that overrides the configured API root.
pub const API_URL_ENV: &str = "ELEGIR_CLINICA_API_URL";

pub const PRODUCTION_API_URL: &str = "https://jvalorius.pythonanywhere.com";
pub const LOCAL_API_URL: &str = "http://localhost:5000";

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Profile {
    #[default]
    Production,
    Local,
}

impl Profile {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "production" | "prod" => Some(Self::Production),
            "local" | "localhost" | "dev" => Some(Self::Local),
            _ => None,
        }
    }

    pub fn default_api_url(self) -> &'static str {
        match self {
            Self::Production => PRODUCTION_API_URL,
            Self::Local => LOCAL_API_URL,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize, Clone)]
pub struct ConfigFile {
    pub api_url: Option<String>,
    pub profile: Option<String>,
    pub timeout: Option<u64>,
    pub proxy: Option<String>,
    pub follow_redirects: Option<bool>,
    pub no_color: Option<bool>,
    #[serde(alias = "output_format")]
    pub format: Option<String>,
}

/// Picks the API root: explicit flag, then environment, then config file,
/// then the profile default.
pub fn resolve_api_url(
    flag: Option<&str>,
    env_value: Option<&str>,
    cfg: &ConfigFile,
    profile: Profile,
) -> String {
    [flag, env_value, cfg.api_url.as_deref()]
        .into_iter()
        .flatten()
        .map(str::trim)
        .find(|v| !v.is_empty())
        .unwrap_or(profile.default_api_url())
        .trim_end_matches('/')
        .to_string()
}

pub fn api_url_from_env() -> Option<String> {
    env::var(API_URL_ENV).ok()
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .map(PathBuf::from)
        .or_else(|| env::var_os("USERPROFILE").map(PathBuf::from))
        .or_else(|| {
            let drive = env::var_os("HOMEDRIVE")?;
            let path = env::var_os("HOMEPATH")?;
            Some(PathBuf::from(drive).join(path))
        })
}

pub fn default_config_path() -> Option<PathBuf> {
    Some(home_dir()?.join(".elegirclinica").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &PathBuf, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) if contents.trim().is_empty() => Ok(ConfigFile::default()),
        Ok(contents) => serde_yaml::from_str::<ConfigFile>(&contents)
            .map_err(|e| format!("failed to parse config '{}': {e}", path.display())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound && allow_missing => {
            Ok(ConfigFile::default())
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(format!("config file not found '{}'", path.display()))
        }
        Err(e) => Err(format!("failed to read config '{}': {e}", path.display())),
    }
}

fn default_config_yaml() -> String {
    format!(
        r#"# Elegir Clínica admin config
#
# Location (default):
#   ~/.elegirclinica/config.yml

# Backend (the {API_URL_ENV} environment variable wins over api_url)
profile: production
# api_url: {LOCAL_API_URL}

# HTTP
timeout: 10
follow_redirects: true
# proxy: http://127.0.0.1:8080

# Output
format: text
no_color: false
"#
    )
}

/// Writes the commented default config unless a file already exists. Returns
/// whether a file was written.
pub fn ensure_default_config_file(path: &PathBuf) -> Result<bool, String> {
    if path.exists() {
        return Ok(false);
    }
    let parent = path
        .parent()
        .ok_or_else(|| format!("invalid config path '{}'", path.display()))?;
    std::fs::create_dir_all(parent).map_err(|e| {
        format!(
            "failed to create config directory '{}': {e}",
            parent.display()
        )
    })?;
    std::fs::write(path, default_config_yaml())
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_url_precedence() {
        let cfg = ConfigFile {
            api_url: Some("http://cfg:1/".to_string()),
            ..ConfigFile::default()
        };
        assert_eq!(
            resolve_api_url(Some("http://flag:1"), Some("http://env:1"), &cfg, Profile::Local),
            "http://flag:1"
        );
        assert_eq!(
            resolve_api_url(None, Some("http://env:1"), &cfg, Profile::Local),
            "http://env:1"
        );
        assert_eq!(
            resolve_api_url(None, Some("  "), &cfg, Profile::Local),
            "http://cfg:1"
        );
        assert_eq!(
            resolve_api_url(None, None, &ConfigFile::default(), Profile::Local),
            LOCAL_API_URL
        );
        assert_eq!(
            resolve_api_url(None, None, &ConfigFile::default(), Profile::Production),
            PRODUCTION_API_URL
        );
    }

    #[test]
    fn default_config_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        assert!(!ensure_default_config_file(&path).unwrap());

        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.profile.as_deref(), Some("production"));
        assert_eq!(cfg.timeout, Some(10));
        assert_eq!(cfg.follow_redirects, Some(true));
        assert!(cfg.api_url.is_none());
    }

    #[test]
    fn missing_config_is_only_fatal_when_required() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        assert!(load_config(&path, true).is_ok());
        assert!(load_config(&path, false).is_err());
    }
}
