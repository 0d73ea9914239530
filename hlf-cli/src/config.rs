//! CLI configuration from environment and flags.

use hlf_topology::Scope;
use hlf_topology::discovery::DEFAULT_DISCOVERY_TIMEOUT;
use std::time::Duration;

/// Resolved CLI settings.
///
/// Environment variables:
/// - `HLF_NAMESPACE`: namespace to query, empty for all namespaces
/// - `HLF_PUBLIC_IP`: fixed public IP, skips node discovery
/// - `HLF_DISCOVERY_TIMEOUT_SECS`: node discovery timeout (default 30, must be positive)
///
/// Flags applied with the `with_*` methods take precedence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CliConfig {
    namespace: Option<String>,
    public_ip: Option<String>,
    discovery_timeout: Duration,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            namespace: None,
            public_ip: None,
            discovery_timeout: DEFAULT_DISCOVERY_TIMEOUT,
        }
    }
}

impl CliConfig {
    /// Read configuration from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through `lookup`.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let discovery_timeout = match non_empty("HLF_DISCOVERY_TIMEOUT_SECS") {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    tracing::warn!(value = %raw, "Ignoring invalid HLF_DISCOVERY_TIMEOUT_SECS");
                    DEFAULT_DISCOVERY_TIMEOUT
                }
            },
            None => DEFAULT_DISCOVERY_TIMEOUT,
        };

        Self {
            namespace: non_empty("HLF_NAMESPACE"),
            public_ip: non_empty("HLF_PUBLIC_IP"),
            discovery_timeout,
        }
    }

    /// Override the namespace when a flag was given.
    pub fn with_namespace(mut self, namespace: Option<String>) -> Self {
        if namespace.is_some() {
            self.namespace = namespace;
        }
        self
    }

    /// Override the public IP when a flag was given.
    pub fn with_public_ip(mut self, public_ip: Option<String>) -> Self {
        if public_ip.is_some() {
            self.public_ip = public_ip;
        }
        self
    }

    /// Query scope; no namespace means every namespace.
    pub fn scope(&self) -> Scope {
        Scope::from_namespace(self.namespace.as_deref().unwrap_or_default())
    }

    /// Namespace for objects the CLI creates.
    pub fn target_namespace(&self) -> &str {
        self.namespace.as_deref().unwrap_or("default")
    }

    /// Fixed public IP, if configured.
    pub fn public_ip(&self) -> Option<&str> {
        self.public_ip.as_deref()
    }

    /// Node discovery timeout.
    pub fn discovery_timeout(&self) -> Duration {
        self.discovery_timeout
    }
}
