use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(alias = "server")]
    pub base_url: Option<String>,
    #[serde(alias = "event")]
    pub event_id: Option<String>,
    pub timeout: Option<u64>,
    pub retries: Option<u32>,
    pub retry_delay_ms: Option<u64>,
    pub debounce_ms: Option<u64>,
    pub no_color: Option<bool>,
    pub output_format: Option<String>,
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
    Some(home_dir()?.join(".attendees").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn parse_config(contents: &str, path: &Path) -> Result<ConfigFile, String> {
    serde_yaml::from_str::<Option<ConfigFile>>(contents)
        .map(Option::unwrap_or_default)
        .map_err(|e| format!("failed to parse config '{}': {e}", path.display()))
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => parse_config(&contents, path),
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
    r#"# Attendees config
#
# Location (default):
#   ~/.attendees/config.yml

# Attendees service
base_url: http://localhost:3333
# event_id: 9e9bd979-9d10-4915-b339-3786b1634f70

# HTTP
timeout: 10
retries: 2
retry_delay_ms: 500

# Search box: quiet period before a search is sent
debounce_ms: 1500

# Output: table or json
output_format: table
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<(), String> {
    if path.exists() {
        return Ok(());
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
    let contents = default_config_yaml();
    std::fs::write(path, contents)
        .map_err(|e| format!("failed to write config file '{}': {e}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_parses() {
        let cfg = parse_config(&default_config_yaml(), Path::new("config.yml")).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:3333"));
        assert_eq!(cfg.event_id, None);
        assert_eq!(cfg.debounce_ms, Some(1500));
        assert_eq!(cfg.output_format.as_deref(), Some("table"));
    }

    #[test]
    fn empty_file_is_default_config() {
        let cfg = parse_config("# nothing here\n", Path::new("config.yml")).unwrap();
        assert_eq!(cfg, ConfigFile::default());
    }

    #[test]
    fn aliases_are_accepted() {
        let cfg = parse_config("server: http://api\nevent: e1\n", Path::new("c.yml")).unwrap();
        assert_eq!(cfg.base_url.as_deref(), Some("http://api"));
        assert_eq!(cfg.event_id.as_deref(), Some("e1"));
    }

    #[test]
    fn invalid_yaml_reports_path() {
        let err = parse_config("timeout: [", Path::new("broken.yml")).unwrap_err();
        assert!(err.contains("broken.yml"));
    }

    #[test]
    fn missing_file_respects_allow_missing() {
        let path = Path::new("/nonexistent/attendees/config.yml");
        assert_eq!(load_config(path, true).unwrap(), ConfigFile::default());
        assert!(load_config(path, false).is_err());
    }

    #[test]
    fn writes_default_config_once() {
        let dir = env::temp_dir().join(format!("attendees-config-{}", std::process::id()));
        let path = dir.join("config.yml");
        ensure_default_config_file(&path).unwrap();
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.timeout, Some(10));

        std::fs::write(&path, "timeout: 3\n").unwrap();
        ensure_default_config_file(&path).unwrap();
        assert_eq!(load_config(&path, false).unwrap().timeout, Some(3));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
