mod path;

use crate::model::{Defaults, Group, Server};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use path::resolve_config_path;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("server \"{0}\" not found")]
    ServerNotFound(String),

    #[error("server \"{0}\" already exists")]
    ServerAlreadyExists(String),

    #[error("group \"{0}\" not found")]
    GroupNotFound(String),

    #[error("group \"{0}\" already exists")]
    GroupAlreadyExists(String),

    #[error("parsing config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    #[error("{action} {path}: {source}")]
    Io {
        action: &'static str,
        path: PathBuf,
        source: std::io::Error,
    },
}

/// The root aggregate: ordered servers, ordered groups, one defaults record,
/// and the file it was loaded from. The on-disk YAML document is the sole
/// persisted representation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub groups: Vec<Group>,
    #[serde(default)]
    pub servers: Vec<Server>,
    #[serde(default, skip_serializing_if = "Defaults::is_empty")]
    pub defaults: Defaults,
    #[serde(skip)]
    path: PathBuf,
}

impl Config {
    /// Reads the config at `path`. A missing file is first-run, not an error:
    /// it yields an empty config with the standard port 22 default. Loaded
    /// entries are accepted as-is, without semantic validation.
    pub fn load(path: PathBuf) -> Result<Self, StoreError> {
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                return Ok(Self {
                    defaults: Defaults {
                        port: 22,
                        ..Defaults::default()
                    },
                    path,
                    ..Self::default()
                });
            }
            Err(source) => {
                return Err(StoreError::Io {
                    action: "reading config",
                    path,
                    source,
                });
            }
        };

        let mut config: Self =
            serde_yaml::from_str(&data).map_err(|source| StoreError::Parse {
                path: path.clone(),
                source,
            })?;
        config.path = path;
        Ok(config)
    }

    /// Writes the config back to its path, creating parent directories as
    /// needed. Single-user tool: no lock, no concurrent-writer protection.
    pub fn save(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|source| StoreError::Io {
                action: "creating config directory",
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let data = serde_yaml::to_string(self).map_err(|source| StoreError::Parse {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, data).map_err(|source| StoreError::Io {
            action: "writing config",
            path: self.path.clone(),
            source,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn find_server(&self, name: &str) -> Result<&Server, StoreError> {
        self.servers
            .iter()
            .find(|server| server.name == name)
            .ok_or_else(|| StoreError::ServerNotFound(name.to_string()))
    }

    pub fn add_server(&mut self, server: Server) -> Result<(), StoreError> {
        if self.servers.iter().any(|s| s.name == server.name) {
            return Err(StoreError::ServerAlreadyExists(server.name));
        }
        self.servers.push(server);
        Ok(())
    }

    /// Replaces the server named `name` in place. The replacement may carry a
    /// different name; rename-in-place keeps the entry's position.
    pub fn update_server(&mut self, name: &str, server: Server) -> Result<(), StoreError> {
        match self.servers.iter_mut().find(|s| s.name == name) {
            Some(existing) => {
                *existing = server;
                Ok(())
            }
            None => Err(StoreError::ServerNotFound(name.to_string())),
        }
    }

    pub fn remove_server(&mut self, name: &str) -> Result<(), StoreError> {
        match self.servers.iter().position(|s| s.name == name) {
            Some(index) => {
                self.servers.remove(index);
                Ok(())
            }
            None => Err(StoreError::ServerNotFound(name.to_string())),
        }
    }

    pub fn find_group(&self, name: &str) -> Result<&Group, StoreError> {
        self.groups
            .iter()
            .find(|group| group.name == name)
            .ok_or_else(|| StoreError::GroupNotFound(name.to_string()))
    }

    pub fn add_group(&mut self, group: Group) -> Result<(), StoreError> {
        if self.groups.iter().any(|g| g.name == group.name) {
            return Err(StoreError::GroupAlreadyExists(group.name));
        }
        self.groups.push(group);
        Ok(())
    }

    /// Removes a group. Servers referencing it keep their `group` field;
    /// dangling references are permitted.
    pub fn remove_group(&mut self, name: &str) -> Result<(), StoreError> {
        match self.groups.iter().position(|g| g.name == name) {
            Some(index) => {
                self.groups.remove(index);
                Ok(())
            }
            None => Err(StoreError::GroupNotFound(name.to_string())),
        }
    }

    /// Servers whose `group` field exactly equals `group`, case-sensitive.
    pub fn servers_by_group(&self, group: &str) -> Vec<&Server> {
        self.servers
            .iter()
            .filter(|server| server.group == group)
            .collect()
    }
}
