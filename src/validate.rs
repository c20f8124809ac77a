use crate::model::Server;
use std::env;
use std::fs;
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,

    #[error("name too long (max 64 characters)")]
    NameTooLong,

    #[error("host is required")]
    HostRequired,

    #[error("hostname too long (max 253 characters)")]
    HostnameTooLong,

    #[error("hostname label too long (max 63 characters)")]
    HostnameLabelTooLong,

    #[error("invalid hostname format")]
    HostnameFormat,

    #[error("port must be between 0 and 65535")]
    PortOutOfRange,

    #[error("key file is a directory: {0}")]
    KeyFileIsDirectory(String),

    #[error("cannot access key file: {0}")]
    KeyFileAccess(String),
}

pub fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.is_empty() {
        return Err(ValidationError::NameRequired);
    }
    if name.len() > 64 {
        return Err(ValidationError::NameTooLong);
    }
    Ok(())
}

/// Accepts IPv4/IPv6 literals and RFC 1123 hostnames.
pub fn validate_host(host: &str) -> Result<(), ValidationError> {
    if host.is_empty() {
        return Err(ValidationError::HostRequired);
    }

    if host.parse::<IpAddr>().is_ok() {
        return Ok(());
    }

    if host.len() > 253 {
        return Err(ValidationError::HostnameTooLong);
    }

    for label in host.split('.') {
        if label.len() > 63 {
            return Err(ValidationError::HostnameLabelTooLong);
        }
        if !valid_label(label) {
            return Err(ValidationError::HostnameFormat);
        }
    }

    Ok(())
}

fn valid_label(label: &str) -> bool {
    !label.is_empty()
        && !label.starts_with('-')
        && !label.ends_with('-')
        && label
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-')
}

/// Zero is valid: it means "unset, use the default".
pub fn validate_port(port: i64) -> Result<(), ValidationError> {
    if !(0..=65535).contains(&port) {
        return Err(ValidationError::PortOutOfRange);
    }
    Ok(())
}

/// Checks key-file accessibility. Structural problems (missing file, no read
/// bit) come back as a warning string so a not-yet-deployed key does not block
/// saving the profile; a directory at the path is a hard error.
pub fn validate_key_file(path: &str) -> Result<Option<String>, ValidationError> {
    if path.is_empty() {
        return Ok(None);
    }

    let expanded = expand_path(path);
    let meta = match fs::metadata(&expanded) {
        Ok(meta) => meta,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Some(format!("key file does not exist: {}", path)));
        }
        Err(err) => return Err(ValidationError::KeyFileAccess(err.to_string())),
    };

    if meta.is_dir() {
        return Err(ValidationError::KeyFileIsDirectory(path.to_string()));
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if meta.permissions().mode() & 0o400 == 0 {
            return Ok(Some(format!("key file may not be readable: {}", path)));
        }
    }

    Ok(None)
}

/// Validates name, host, and port; the key file is deliberately excluded
/// because its problems are warnings, not errors. First failure wins.
pub fn validate_server(server: &Server) -> Result<(), ValidationError> {
    validate_name(&server.name)?;
    validate_host(&server.host)?;
    validate_port(i64::from(server.port))?;
    Ok(())
}

/// Rewrites a leading `~/` to the home directory. Everything else passes
/// through unchanged, including a bare `~`.
pub fn expand_path(path: &str) -> String {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Ok(home) = env::var("HOME") {
            return format!("{}/{}", home, stripped);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_accepts_ip_literals() {
        for host in [
            "192.168.1.1",
            "0.0.0.0",
            "255.255.255.255",
            "::1",
            "2001:0db8:85a3:0000:0000:8a2e:0370:7334",
            "2001:db8::1",
        ] {
            assert_eq!(validate_host(host), Ok(()), "host {host}");
        }
    }

    #[test]
    fn host_accepts_rfc1123_hostnames() {
        for host in [
            "localhost",
            "example.com",
            "sub.example.com",
            "server1.example.com",
            "my-server.example.com",
            "a.b.c.d.example.com",
        ] {
            assert_eq!(validate_host(host), Ok(()), "host {host}");
        }
    }

    #[test]
    fn host_rejects_bad_hostnames() {
        assert_eq!(validate_host(""), Err(ValidationError::HostRequired));
        assert_eq!(
            validate_host("-invalid.com"),
            Err(ValidationError::HostnameFormat)
        );
        assert_eq!(
            validate_host("invalid-.com"),
            Err(ValidationError::HostnameFormat)
        );
        assert_eq!(
            validate_host("invalid_host.com"),
            Err(ValidationError::HostnameFormat)
        );
        assert_eq!(
            validate_host("invalid host.com"),
            Err(ValidationError::HostnameFormat)
        );
        assert_eq!(
            validate_host("trailing.dot."),
            Err(ValidationError::HostnameFormat)
        );
    }

    #[test]
    fn host_rejects_overlong_label() {
        let label = "a".repeat(64);
        assert_eq!(
            validate_host(&format!("{label}.com")),
            Err(ValidationError::HostnameLabelTooLong)
        );
        let label = "a".repeat(63);
        assert_eq!(validate_host(&format!("{label}.com")), Ok(()));
    }

    #[test]
    fn host_rejects_overlong_hostname() {
        let host = format!("{}com", "aaaaaa.".repeat(40));
        assert!(host.len() > 253);
        assert_eq!(validate_host(&host), Err(ValidationError::HostnameTooLong));
    }

    #[test]
    fn port_range() {
        assert_eq!(validate_port(0), Ok(()));
        assert_eq!(validate_port(22), Ok(()));
        assert_eq!(validate_port(65535), Ok(()));
        assert_eq!(validate_port(65536), Err(ValidationError::PortOutOfRange));
        assert_eq!(validate_port(-1), Err(ValidationError::PortOutOfRange));
    }

    #[test]
    fn name_limits() {
        assert_eq!(validate_name(""), Err(ValidationError::NameRequired));
        assert_eq!(validate_name("web"), Ok(()));
        assert_eq!(validate_name(&"a".repeat(64)), Ok(()));
        assert_eq!(
            validate_name(&"a".repeat(65)),
            Err(ValidationError::NameTooLong)
        );
    }

    #[test]
    fn key_file_empty_path_is_fine() {
        assert_eq!(validate_key_file(""), Ok(None));
    }

    #[test]
    fn key_file_missing_is_warning() {
        let warning = validate_key_file("/definitely/not/here/id_rsa").expect("no hard error");
        let warning = warning.expect("warning expected");
        assert!(warning.contains("does not exist"));
        assert!(warning.contains("/definitely/not/here/id_rsa"));
    }

    #[test]
    fn key_file_directory_is_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().to_str().unwrap().to_string();
        assert_eq!(
            validate_key_file(&path),
            Err(ValidationError::KeyFileIsDirectory(path))
        );
    }

    #[test]
    fn key_file_existing_readable_is_clean() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("id_rsa");
        fs::write(&path, "key material").expect("write");
        assert_eq!(validate_key_file(path.to_str().unwrap()), Ok(None));
    }

    #[cfg(unix)]
    #[test]
    fn key_file_unreadable_is_warning() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("id_rsa");
        fs::write(&path, "key material").expect("write");
        fs::set_permissions(&path, fs::Permissions::from_mode(0o200)).expect("chmod");

        let warning = validate_key_file(path.to_str().unwrap()).expect("no hard error");
        assert!(warning.expect("warning expected").contains("not be readable"));
    }

    #[test]
    fn expand_path_rewrites_leading_tilde_slash() {
        temp_env::with_var("HOME", Some("/home/tester"), || {
            assert_eq!(expand_path("~/.ssh/id_rsa"), "/home/tester/.ssh/id_rsa");
            assert_eq!(expand_path("/abs/path"), "/abs/path");
            assert_eq!(expand_path("relative/path"), "relative/path");
            // A bare tilde passes through untouched.
            assert_eq!(expand_path("~"), "~");
        });
    }

    #[test]
    fn server_validation_short_circuits() {
        let mut server = Server {
            name: String::new(),
            host: "bad_host".to_string(),
            ..Server::default()
        };
        assert_eq!(
            validate_server(&server),
            Err(ValidationError::NameRequired)
        );

        server.name = "web".to_string();
        assert_eq!(
            validate_server(&server),
            Err(ValidationError::HostnameFormat)
        );

        server.host = "example.com".to_string();
        assert_eq!(validate_server(&server), Ok(()));
    }
}
