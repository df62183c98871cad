//! Runtime configuration for the HTTP/WebSocket listener.

use clap::Parser;

/// Command line options of the server binary.
#[derive(Parser, Debug, Clone)]
#[command(name = "grid-duel")]
#[command(about = "Matchmaking and game session server for a two-player grid game")]
#[command(version)]
pub struct ServerConfig {
    /// Address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,
}

impl ServerConfig {
    /// `(host, port)` pair suitable for `HttpServer::bind`.
    pub fn bind_addr(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_arguments() {
        let config = ServerConfig::try_parse_from(["grid-duel"]).unwrap();
        assert_eq!(config.host, "127.0.0.1");
        assert!(config.port > 0);
    }

    #[test]
    fn explicit_port_overrides_default() {
        let config = ServerConfig::try_parse_from(["grid-duel", "--host", "0.0.0.0", "--port", "8080"]).unwrap();
        assert_eq!(config.bind_addr(), ("0.0.0.0", 8080));
    }
}
