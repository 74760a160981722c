//! Configuration loading
//!
//! Finds `xc.yaml` by walking up from the working directory, decodes it,
//! expands `${...}` references, validates it and pairs it with the optional
//! user-level config at `~/.config/xc/config.yaml`. Every file read is
//! recorded with its SHA-256 digest.

use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use xc_core::{
    ConfigOrigin, ConfigSource, ExpandEnv, GlobalConfig, LoadedConfig, ProjectConfig, XcError,
    XcResult,
};

/// Project config file name
pub const CONFIG_FILE_NAME: &str = "xc.yaml";

/// Global config location relative to $HOME
pub const GLOBAL_CONFIG_PATH: &str = ".config/xc/config.yaml";

/// Loads project and global configuration into a [`LoadedConfig`]
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    global_path: Option<PathBuf>,
    skip_global: bool,
}

impl ConfigLoader {
    /// Loader that reads the global config from its default location
    pub fn new() -> Self {
        Self::default()
    }

    /// Read the global config from `path` instead of the default location
    pub fn with_global_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.global_path = Some(path.into());
        self.skip_global = false;
        self
    }

    /// Do not read any global config
    pub fn without_global(mut self) -> Self {
        self.global_path = None;
        self.skip_global = true;
        self
    }

    /// Find xc.yaml at or above `start` and load it
    pub fn load_from_dir(&self, start: &Path) -> XcResult<LoadedConfig> {
        let dir = find_config_directory(start).ok_or(XcError::ConfigNotFound)?;
        self.load_file(&dir.join(CONFIG_FILE_NAME))
    }

    /// Find xc.yaml at or above the current directory and load it
    pub fn load(&self) -> XcResult<LoadedConfig> {
        let cwd = std::env::current_dir()?;
        self.load_from_dir(&cwd)
    }

    /// Load a specific project config file
    pub fn load_file(&self, path: &Path) -> XcResult<LoadedConfig> {
        let (project, source) = load_project_config(path)?;
        project.validate()?;

        let project_root = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut sources = vec![source];

        let global = match self.global_config_path() {
            Some(global_path) => match load_global_config(&global_path)? {
                Some((global, source)) => {
                    sources.push(source);
                    Some(global)
                }
                None => None,
            },
            None => None,
        };

        Ok(LoadedConfig {
            project,
            global,
            project_root,
            sources,
        })
    }

    fn global_config_path(&self) -> Option<PathBuf> {
        if self.skip_global {
            return None;
        }
        self.global_path.clone().or_else(default_global_path)
    }
}

/// Default global config path (~/.config/xc/config.yaml)
pub fn default_global_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .filter(|home| !home.is_empty())
        .map(|home| PathBuf::from(home).join(GLOBAL_CONFIG_PATH))
}

/// Walk up from `start` looking for xc.yaml. Returns the directory containing it.
pub fn find_config_directory(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    start
        .ancestors()
        .find(|dir| dir.join(CONFIG_FILE_NAME).is_file())
        .map(Path::to_path_buf)
}

/// Read, parse and expand a project config. Does not validate.
pub fn load_project_config(path: &Path) -> XcResult<(ProjectConfig, ConfigSource)> {
    let (contents, digest) = read_with_digest(path)?;
    let config = ProjectConfig::from_yaml_str(&contents)?.expand_env();

    debug!(path = %path.display(), digest = %digest, "loaded project config");

    Ok((
        config,
        ConfigSource {
            origin: ConfigOrigin::Project,
            path: path.to_path_buf(),
            digest,
        },
    ))
}

/// Read, parse and expand a global config. A missing file is not an error.
pub fn load_global_config(path: &Path) -> XcResult<Option<(GlobalConfig, ConfigSource)>> {
    if !path.is_file() {
        debug!(path = %path.display(), "no global config");
        return Ok(None);
    }

    let (contents, digest) = read_with_digest(path)?;
    let config = GlobalConfig::from_yaml_str(&contents)?.expand_env();

    debug!(path = %path.display(), digest = %digest, "loaded global config");

    Ok(Some((
        config,
        ConfigSource {
            origin: ConfigOrigin::Global,
            path: path.to_path_buf(),
            digest,
        },
    )))
}

/// Read a file as UTF-8 and compute the SHA-256 of its raw bytes
fn read_with_digest(path: &Path) -> XcResult<(String, String)> {
    let bytes = fs::read(path)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| XcError::Parse(format!("Invalid UTF-8 in {}: {}", path.display(), e)))?;

    Ok((contents, digest))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MINIMAL: &str = "project: App.xcodeproj\ncommands:\n  build: {}\n";

    fn write(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_find_in_start_directory() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), CONFIG_FILE_NAME, MINIMAL);

        let found = find_config_directory(temp.path()).unwrap();
        assert_eq!(found, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_find_walks_up() {
        let temp = TempDir::new().unwrap();
        write(temp.path(), CONFIG_FILE_NAME, MINIMAL);
        let nested = temp.path().join("Sources/App/Views");
        fs::create_dir_all(&nested).unwrap();

        let found = find_config_directory(&nested).unwrap();
        assert_eq!(found, temp.path().canonicalize().unwrap());
    }

    #[test]
    fn test_digest_is_sha256_hex() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "empty.yaml", "");

        let (_, digest) = read_with_digest(&path).unwrap();
        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn test_missing_global_is_none() {
        let temp = TempDir::new().unwrap();
        let result = load_global_config(&temp.path().join("nope.yaml")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_malformed_global_is_parse_error() {
        let temp = TempDir::new().unwrap();
        let path = write(temp.path(), "config.yaml", "defaults: [1, 2\n");
        assert!(matches!(load_global_config(&path), Err(XcError::Parse(_))));
    }

    #[test]
    fn test_without_global_skips_file() {
        let temp = TempDir::new().unwrap();
        let project = write(temp.path(), CONFIG_FILE_NAME, MINIMAL);
        let global = write(temp.path(), "global.yaml", "settings:\n  formatter: raw\n");

        let loaded = ConfigLoader::new()
            .with_global_path(&global)
            .without_global()
            .load_file(&project)
            .unwrap();
        assert!(loaded.global.is_none());
        assert_eq!(loaded.sources.len(), 1);
    }
}
