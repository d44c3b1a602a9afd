//! Remote-command gateway: one short-lived SSH session per invocation.
//!
//! Every call opens a fresh session against the statically configured host,
//! runs exactly one shell line, captures stdout, and tears the session down.
//! The session handle is dropped on every exit path, so teardown does not
//! depend on the outcome. stderr is not captured and there are no retries or
//! timeouts; a failed attempt surfaces once as a `RemoteError`.

pub mod catalog;

use async_trait::async_trait;
use cob_core::{RemoteConfig, RemoteError, RemoteOutput, RemoteRunner};
use ssh2::Session;
use std::io::Read;
use std::net::TcpStream;
use tracing::debug;

pub use catalog::DiagCommand;

pub struct SshGateway {
    config: RemoteConfig,
}

impl SshGateway {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl RemoteRunner for SshGateway {
    async fn execute(&self, command_line: &str) -> Result<RemoteOutput, RemoteError> {
        let config = self.config.clone();
        let line = command_line.to_string();
        debug!(event = "remote_exec", command = %line, host = %config.host);
        tokio::task::spawn_blocking(move || exec_once(&config, &line))
            .await
            .map_err(|err| RemoteError::Exec(format!("gateway task failed: {err}")))?
    }
}

fn exec_once(config: &RemoteConfig, command_line: &str) -> Result<RemoteOutput, RemoteError> {
    let addr = format!("{}:{}", config.host, config.port);
    let tcp = TcpStream::connect(&addr)
        .map_err(|err| RemoteError::Connect(format!("{addr}: {err}")))?;

    let mut session =
        Session::new().map_err(|err| RemoteError::Connect(err.to_string()))?;
    session.set_tcp_stream(tcp);
    session
        .handshake()
        .map_err(|err| RemoteError::Connect(err.to_string()))?;

    // The host key is accepted without verification. Security trade-off kept
    // from the base contract: a single operator-controlled target host.
    session
        .userauth_password(&config.username, &config.password)
        .map_err(|err| RemoteError::Auth(err.to_string()))?;
    if !session.authenticated() {
        return Err(RemoteError::Auth("authentication incomplete".to_string()));
    }

    let mut channel = session
        .channel_session()
        .map_err(|err| RemoteError::Exec(err.to_string()))?;
    channel
        .exec(command_line)
        .map_err(|err| RemoteError::Exec(err.to_string()))?;

    let mut raw = Vec::new();
    channel
        .read_to_end(&mut raw)
        .map_err(|err| RemoteError::Exec(err.to_string()))?;
    let _ = channel.wait_close();
    let exit_code = channel.exit_status().ok();

    Ok(RemoteOutput {
        command_line: command_line.to_string(),
        stdout: String::from_utf8_lossy(&raw).into_owned(),
        exit_code,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::TcpListener;

    // Binds an ephemeral port and releases it, so connecting to it gets a
    // deterministic refusal instead of depending on a fixed port being free.
    fn refused_port() -> u16 {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind ephemeral port");
        let port = listener.local_addr().expect("local addr").port();
        drop(listener);
        port
    }

    fn unreachable_config() -> RemoteConfig {
        RemoteConfig {
            host: "127.0.0.1".to_string(),
            port: refused_port(),
            username: "nobody".to_string(),
            password: "nothing".to_string(),
        }
    }

    #[tokio::test]
    async fn unreachable_host_surfaces_connect_error() {
        let gateway = SshGateway::new(unreachable_config());
        let result = gateway.execute("uptime").await;
        match result {
            Err(RemoteError::Connect(_)) => {}
            other => panic!("expected connect error, got {other:?}"),
        }
    }
}
