use std::env;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Default, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    /// Directory served by `serve`.
    #[serde(alias = "site_root")]
    pub root: Option<String>,
    /// Dataset used by `render`; a path or an http(s) URL.
    #[serde(alias = "data_source")]
    pub data: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub no_color: Option<bool>,
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
    Some(home_dir()?.join(".orgdir").join("config.yml"))
}

pub fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\")) {
        if let Some(home) = home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}

pub fn load_config(path: &Path, allow_missing: bool) -> Result<ConfigFile, String> {
    match std::fs::read_to_string(path) {
        // An empty or comment-only file parses as null.
        Ok(contents) if contents.lines().all(is_blank_or_comment) => Ok(ConfigFile::default()),
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

fn is_blank_or_comment(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

pub fn default_config_yaml() -> String {
    r#"# orgdir config
#
# Location (default):
#   ~/.orgdir/config.yml
#
# Command-line flags override these values. For `serve`, the PORT
# environment variable sits between the flags and this file.

# Site root served by `orgdir serve` (index.html, data/, pkg/)
root: ./site

# Dataset for `orgdir render` (file path or http(s) URL)
data: ./site/data/source.json

# Listener
host: 0.0.0.0
port: 3000

# Output styling
no_color: false
"#
    .to_string()
}

pub fn ensure_default_config_file(path: &Path) -> Result<bool, String> {
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
    fn default_yaml_parses() {
        let cfg: ConfigFile = serde_yaml::from_str(&default_config_yaml()).unwrap();
        assert_eq!(cfg.port, Some(3000));
        assert_eq!(cfg.host.as_deref(), Some("0.0.0.0"));
        assert_eq!(cfg.root.as_deref(), Some("./site"));
        assert_eq!(cfg.no_color, Some(false));
    }

    #[test]
    fn missing_file_honours_allow_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.yml");
        assert_eq!(load_config(&path, true).unwrap(), ConfigFile::default());
        let err = load_config(&path, false).unwrap_err();
        assert!(err.starts_with("config file not found"));
    }

    #[test]
    fn comment_only_file_is_empty_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "# nothing yet\n\n").unwrap();
        assert_eq!(load_config(&path, false).unwrap(), ConfigFile::default());
    }

    #[test]
    fn aliases_and_bad_yaml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yml");
        std::fs::write(&path, "site_root: /srv/www\nport: 8080\n").unwrap();
        let cfg = load_config(&path, false).unwrap();
        assert_eq!(cfg.root.as_deref(), Some("/srv/www"));
        assert_eq!(cfg.port, Some(8080));

        std::fs::write(&path, "port: [nope\n").unwrap();
        assert!(load_config(&path, false)
            .unwrap_err()
            .starts_with("failed to parse config"));
    }

    #[test]
    fn ensure_writes_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.yml");
        assert!(ensure_default_config_file(&path).unwrap());
        std::fs::write(&path, "port: 1\n").unwrap();
        assert!(!ensure_default_config_file(&path).unwrap());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "port: 1\n");
    }

    #[test]
    fn tilde_expands_against_home() {
        assert_eq!(expand_tilde("/abs/path"), PathBuf::from("/abs/path"));
        if let Some(home) = home_dir() {
            assert_eq!(expand_tilde("~/x.yml"), home.join("x.yml"));
        }
    }
}
