use crate::model::{Defaults, Server};
use crate::validate::expand_path;
use std::process::Command;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SshError {
    #[error("failed to execute ssh: {0}")]
    Spawn(std::io::Error),

    #[error("ssh exited with status {0}")]
    Process(std::process::ExitStatus),

    #[error("connection test failed: {0}")]
    ConnectionTestFailed(String),
}

/// Per-invocation overrides. Empty strings and a zero port mean "no override".
#[derive(Debug, Clone, Default)]
pub struct ConnectOptions {
    pub user: String,
    pub port: u16,
    pub key: String,
}

/// Merges server, defaults, and overrides into final connection parameters.
///
/// Two stages, per field: defaults fill unset server fields (port bottoms out
/// at 22), then non-empty overrides replace the result unconditionally. An
/// empty override never reverts an explicit server value.
pub fn resolve(server: &Server, defaults: &Defaults, opts: &ConnectOptions) -> Server {
    let mut resolved = server.clone();

    if resolved.user.is_empty() {
        resolved.user = defaults.user.clone();
    }
    if resolved.port == 0 {
        resolved.port = if defaults.port != 0 { defaults.port } else { 22 };
    }
    if resolved.key.is_empty() {
        resolved.key = defaults.key.clone();
    }

    if !opts.user.is_empty() {
        resolved.user = opts.user.clone();
    }
    if opts.port != 0 {
        resolved.port = opts.port;
    }
    if !opts.key.is_empty() {
        resolved.key = opts.key.clone();
    }

    resolved
}

/// Renders the argument list for the external ssh client. The order — key,
/// then port, then destination — is part of the external contract.
pub fn build_args(server: &Server) -> Vec<String> {
    let mut args = Vec::new();

    if !server.key.is_empty() {
        args.push("-i".to_string());
        args.push(expand_path(&server.key));
    }

    if server.port != 0 && server.port != 22 {
        args.push("-p".to_string());
        args.push(server.port.to_string());
    }

    let dest = if server.user.is_empty() {
        server.host.clone()
    } else {
        format!("{}@{}", server.user, server.host)
    };
    args.push(dest);

    args
}

/// The command line as a display string. Never executed as a shell string;
/// execution always goes through the argument list.
pub fn build_command(server: &Server) -> String {
    format!("ssh {}", build_args(server).join(" "))
}

/// Runs an interactive ssh session with the terminal's stdio inherited. The
/// session's own exit status is propagated opaquely.
pub fn connect(server: &Server) -> Result<(), SshError> {
    let status = Command::new("ssh")
        .args(build_args(server))
        .status()
        .map_err(SshError::Spawn)?;
    if !status.success() {
        return Err(SshError::Process(status));
    }
    Ok(())
}

fn test_args(server: &Server) -> Vec<String> {
    let mut args = build_args(server);
    args.extend(
        ["-o", "ConnectTimeout=5", "-o", "BatchMode=yes", "exit"]
            .iter()
            .map(|arg| arg.to_string()),
    );
    args
}

/// Non-interactive connectivity probe with a 5-second connect timeout. A
/// failing probe carries the client's combined output verbatim.
pub fn test_connection(server: &Server) -> Result<(), SshError> {
    let output = Command::new("ssh")
        .args(test_args(server))
        .output()
        .map_err(SshError::Spawn)?;
    if !output.status.success() {
        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        return Err(SshError::ConnectionTestFailed(combined));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn server(host: &str, user: &str, port: u16, key: &str) -> Server {
        Server {
            name: "test".to_string(),
            host: host.to_string(),
            user: user.to_string(),
            port,
            key: key.to_string(),
            group: String::new(),
        }
    }

    fn defaults(user: &str, port: u16, key: &str) -> Defaults {
        Defaults {
            user: user.to_string(),
            port,
            key: key.to_string(),
        }
    }

    #[test]
    fn resolve_fills_unset_fields_from_defaults() {
        let resolved = resolve(
            &server("example.com", "", 0, ""),
            &defaults("deploy", 2222, "~/.ssh/shared"),
            &ConnectOptions::default(),
        );
        assert_eq!(resolved.user, "deploy");
        assert_eq!(resolved.port, 2222);
        assert_eq!(resolved.key, "~/.ssh/shared");
    }

    #[test]
    fn resolve_keeps_explicit_server_values() {
        let resolved = resolve(
            &server("example.com", "admin", 2200, "/keys/own"),
            &defaults("deploy", 2222, "~/.ssh/shared"),
            &ConnectOptions::default(),
        );
        assert_eq!(resolved.user, "admin");
        assert_eq!(resolved.port, 2200);
        assert_eq!(resolved.key, "/keys/own");
    }

    #[test]
    fn resolve_port_bottoms_out_at_22() {
        let resolved = resolve(
            &server("example.com", "", 0, ""),
            &Defaults::default(),
            &ConnectOptions::default(),
        );
        assert_eq!(resolved.port, 22);
    }

    #[test]
    fn resolve_overrides_beat_everything() {
        let opts = ConnectOptions {
            user: "root".to_string(),
            port: 22022,
            key: "/keys/other".to_string(),
        };
        let resolved = resolve(
            &server("example.com", "admin", 2200, "/keys/own"),
            &defaults("deploy", 2222, "~/.ssh/shared"),
            &opts,
        );
        assert_eq!(resolved.user, "root");
        assert_eq!(resolved.port, 22022);
        assert_eq!(resolved.key, "/keys/other");
    }

    #[test]
    fn resolve_is_idempotent_under_noop_override() {
        let defaults = defaults("deploy", 2222, "");
        let opts = ConnectOptions::default();
        let once = resolve(&server("example.com", "", 0, ""), &defaults, &opts);
        let twice = resolve(&once, &defaults, &opts);
        assert_eq!(once, twice);
    }

    #[test]
    fn build_args_full_server() {
        temp_env::with_var("HOME", Some("/home/tester"), || {
            let server = server("192.168.1.1", "admin", 2222, "~/.ssh/mykey");
            assert_eq!(
                build_args(&server),
                vec![
                    "-i",
                    "/home/tester/.ssh/mykey",
                    "-p",
                    "2222",
                    "admin@192.168.1.1",
                ]
            );
            assert_eq!(
                build_command(&server),
                "ssh -i /home/tester/.ssh/mykey -p 2222 admin@192.168.1.1"
            );
        });
    }

    #[test]
    fn build_args_standard_port_omitted() {
        assert_eq!(
            build_args(&server("192.168.1.1", "", 22, "")),
            vec!["192.168.1.1"]
        );
    }

    #[test]
    fn build_args_unset_port_omitted() {
        assert_eq!(
            build_args(&server("example.com", "me", 0, "")),
            vec!["me@example.com"]
        );
    }

    #[test]
    fn test_args_appends_probe_options() {
        let args = test_args(&server("example.com", "me", 0, ""));
        assert_eq!(
            args,
            vec![
                "me@example.com",
                "-o",
                "ConnectTimeout=5",
                "-o",
                "BatchMode=yes",
                "exit",
            ]
        );
    }
}
