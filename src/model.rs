use serde::{Deserialize, Serialize};

fn is_zero(port: &u16) -> bool {
    *port == 0
}

/// A named SSH destination profile.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Server {
    pub name: String,
    pub host: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub group: String,
}

impl Server {
    /// One-line connection summary: `user@host`, with a `:port` suffix when
    /// the port is explicit and non-standard.
    pub fn description(&self) -> String {
        let mut desc = self.host.clone();
        if !self.user.is_empty() {
            desc = format!("{}@{}", self.user, desc);
        }
        if self.port != 0 && self.port != 22 {
            desc = format!("{}:{}", desc, self.port);
        }
        desc
    }
}

/// A named, colored tag for organizing servers. Purely cosmetic: servers
/// reference a group by name, and the reference is never enforced.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub color: String,
}

/// Fallback connection parameters applied when a server omits them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Defaults {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub user: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub port: u16,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub key: String,
}

impl Defaults {
    pub fn is_empty(&self) -> bool {
        self.user.is_empty() && self.port == 0 && self.key.is_empty()
    }
}
