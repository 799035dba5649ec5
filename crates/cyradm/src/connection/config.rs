//! Connection configuration types.

/// Connection security mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Security {
    /// No encryption (port 143). **Not recommended for production.**
    Plain,
    /// TLS from the start (port 993). **Recommended.**
    #[default]
    Tls,
}

impl Security {
    /// Returns the default port for this security mode.
    #[must_use]
    pub const fn default_port(self) -> u16 {
        match self {
            Self::Plain => 143,
            Self::Tls => 993,
        }
    }
}

/// Admin connection configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server hostname.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Security mode.
    pub security: Security,
    /// Administrator login name.
    pub administrator: String,
    /// Administrator credential.
    pub credential: String,
    /// Namespace prefix under which bare mailbox names resolve.
    pub namespace: String,
}

impl Config {
    /// Creates a new configuration for `localhost` with implicit TLS.
    #[must_use]
    pub fn new(administrator: impl Into<String>, credential: impl Into<String>) -> Self {
        Self {
            host: "localhost".to_string(),
            port: Security::Tls.default_port(),
            security: Security::Tls,
            administrator: administrator.into(),
            credential: credential.into(),
            namespace: "user.".to_string(),
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> ConfigBuilder {
        ConfigBuilder::new()
    }
}

/// Builder for connection configuration.
#[derive(Debug, Clone, Default)]
pub struct ConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    security: Security,
    administrator: String,
    credential: String,
    namespace: Option<String>,
}

impl ConfigBuilder {
    /// Creates a new builder with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the hostname (default `localhost`).
    #[must_use]
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    /// Sets the port. When unset, the security mode's default applies.
    #[must_use]
    pub const fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    /// Sets the security mode.
    #[must_use]
    pub const fn security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    /// Sets the administrator credentials.
    #[must_use]
    pub fn credentials(
        mut self,
        administrator: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        self.administrator = administrator.into();
        self.credential = credential.into();
        self
    }

    /// Sets the mailbox namespace prefix (default `user.`).
    #[must_use]
    pub fn namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub fn build(self) -> Config {
        Config {
            host: self.host.unwrap_or_else(|| "localhost".to_string()),
            port: self.port.unwrap_or_else(|| self.security.default_port()),
            security: self.security,
            administrator: self.administrator,
            credential: self.credential,
            namespace: self.namespace.unwrap_or_else(|| "user.".to_string()),
        }
    }
}
