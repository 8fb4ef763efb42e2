use {
    crate::{Error, Result},
    serde::Deserialize,
    std::net::{IpAddr, SocketAddr},
};

///
/// Where [`Router::serve`](crate::Router::serve) hosts listen.
///
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Address to bind the HTTP server to.
    /// The default `bind_addr` is "127.0.0.1".
    pub bind_addr: String,

    /// Port to bind the HTTP server to.
    /// The default `bind_port` is 3000. Port 0 lets the OS pick one.
    pub bind_port: u16,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1".into(),
            bind_port: 3000,
        }
    }
}

impl HttpConfig {
    /// The socket address built from `bind_addr` and `bind_port`.
    pub fn socket_addr(&self) -> Result<SocketAddr> {
        let ip = self.bind_addr.parse::<IpAddr>().map_err(|_| {
            Error::config(format!(
                "HTTP bind_addr must be a valid IP address, got `{}`. Examples: \"127.0.0.1\", \"0.0.0.0\", \"::1\"",
                self.bind_addr
            ))
        })?;
        Ok(SocketAddr::new(ip, self.bind_port))
    }

    pub fn validate(&self) -> Result<()> {
        if self.bind_addr.trim().is_empty() {
            return Err(Error::config(
                "HTTP bind_addr is required. Set [http] bind_addr = \"0.0.0.0\" or \"127.0.0.1\" in config.",
            ));
        }
        self.socket_addr().map(|_| ())
    }
}
