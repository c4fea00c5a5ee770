use std::{env, path::PathBuf};

use thiserror::Error;

/// Settings for the smoke-test client. The server binary itself takes no
/// configuration; it owns stdin/stdout and nothing else.
#[derive(Debug, Clone)]
pub struct Config {
    pub server_command: PathBuf,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("unable to locate the server binary next to the current executable")]
    ServerBinaryResolution,
}

impl Config {
    /// `CREWAI_MCP_SERVER` overrides the server command; the default is the
    /// `crewai-rules-mcp` binary in the same directory as the running
    /// executable.
    pub fn from_env() -> Result<Self, ConfigError> {
        let override_command = env::var("CREWAI_MCP_SERVER")
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
            .map(PathBuf::from);

        let server_command = match override_command {
            Some(path) => path,
            None => default_server_command()?,
        };

        Ok(Self { server_command })
    }
}

fn default_server_command() -> Result<PathBuf, ConfigError> {
    let current_exe = env::current_exe().map_err(|_| ConfigError::ServerBinaryResolution)?;
    let directory = current_exe
        .parent()
        .ok_or(ConfigError::ServerBinaryResolution)?;
    Ok(directory.join("crewai-rules-mcp"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn override_wins_and_default_resolves_sibling_binary() {
        env::set_var("CREWAI_MCP_SERVER", " /opt/mcp/crewai-rules-mcp ");
        let config = Config::from_env().expect("config should parse");
        assert_eq!(
            config.server_command,
            PathBuf::from("/opt/mcp/crewai-rules-mcp")
        );

        env::set_var("CREWAI_MCP_SERVER", "   ");
        let config = Config::from_env().expect("blank override falls back to default");
        assert_eq!(
            config.server_command.file_name().and_then(|name| name.to_str()),
            Some("crewai-rules-mcp")
        );

        env::remove_var("CREWAI_MCP_SERVER");
        let config = Config::from_env().expect("config should parse");
        assert_eq!(
            config.server_command.file_name().and_then(|name| name.to_str()),
            Some("crewai-rules-mcp")
        );
    }
}
