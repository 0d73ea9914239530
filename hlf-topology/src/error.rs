//! Error types for topology resolution.

use thiserror::Error;

/// Errors that can occur while resolving the network topology.
#[derive(Debug, Error)]
pub enum TopologyError {
    /// Kubernetes API error, propagated from the resource store unchanged.
    #[error("Kubernetes API error: {0}")]
    KubeError(#[from] kube::Error),

    /// Failure reported by a non-Kubernetes resource store.
    #[error("Resource store error listing {kind}: {message}")]
    StoreError {
        /// Resource kind being queried.
        kind: String,
        /// Store-provided description.
        message: String,
    },

    /// Public IP discovery failed on the node-port fallback path.
    #[error("Public IP discovery failed: {0}")]
    Discovery(String),

    /// A lookup matched zero records.
    #[error("{kind} not found: {key}")]
    NotFound {
        /// Resource kind.
        kind: String,
        /// The search key (full name, host/port pair, ...).
        key: String,
    },

    /// A record is structurally unusable.
    #[error("Malformed {kind} record {name}: {reason}")]
    MalformedRecord {
        /// Resource kind.
        kind: String,
        /// Record name.
        name: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Invalid configuration or request.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TopologyError {
    /// Create a not-found error for the given kind and search key.
    pub fn not_found(kind: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            kind: kind.into(),
            key: key.into(),
        }
    }

    /// Returns true if this error means a lookup matched nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Result type for topology operations.
pub type TopologyResult<T> = Result<T, TopologyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_carries_search_key() {
        let err = TopologyError::not_found("FabricPeer", "peer0.org1");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "FabricPeer not found: peer0.org1");
    }

    #[test]
    fn store_error_names_kind() {
        let err = TopologyError::StoreError {
            kind: "FabricOrdererNode".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(!err.is_not_found());
        assert_eq!(
            err.to_string(),
            "Resource store error listing FabricOrdererNode: connection refused"
        );
    }
}
