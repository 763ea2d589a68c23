use std::fmt;

use async_trait::async_trait;
use axum::http::HeaderMap;

/// How the caller identified itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Credentials {
    Bearer(String),
    ApiKey(String),
    Anonymous,
}

impl Credentials {
    /// Extract credentials from request headers: `Authorization: Bearer`
    /// first, then `X-Api-Key`, else anonymous.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        if let Some(value) = headers.get("authorization").and_then(|v| v.to_str().ok()) {
            if let Some(token) = value.strip_prefix("Bearer ") {
                return Self::Bearer(token.trim().to_string());
            }
        }
        if let Some(value) = headers.get("x-api-key").and_then(|v| v.to_str().ok()) {
            return Self::ApiKey(value.trim().to_string());
        }
        Self::Anonymous
    }

    /// The presented secret, if any.
    fn token(&self) -> Option<&str> {
        match self {
            Self::Bearer(t) | Self::ApiKey(t) => Some(t),
            Self::Anonymous => None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        matches!(self, Self::Anonymous)
    }
}

/// Operation classification the gate applies policy to.
///
/// Safe operations read and can be public-allowable; unsafe operations
/// mutate one or both stores.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OpClass {
    Safe,
    Unsafe,
}

impl fmt::Display for OpClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Safe => write!(f, "safe"),
            Self::Unsafe => write!(f, "unsafe"),
        }
    }
}

/// The paywall predicate checked before every collection operation.
#[async_trait]
pub trait AccessGate: Send + Sync {
    async fn authorize(&self, credentials: &Credentials, class: OpClass) -> bool;
}

/// Gate that admits everyone. Used when no API key is configured.
pub struct OpenGate;

#[async_trait]
impl AccessGate for OpenGate {
    async fn authorize(&self, _credentials: &Credentials, _class: OpClass) -> bool {
        true
    }
}

/// Gate keyed on a single deployment API key.
///
/// Unsafe operations always require the key. Safe operations are public
/// when `allow_anonymous_read` is set, keyed otherwise.
pub struct ApiKeyGate {
    key: String,
    allow_anonymous_read: bool,
}

impl ApiKeyGate {
    pub fn new(key: impl Into<String>, allow_anonymous_read: bool) -> Self {
        Self {
            key: key.into(),
            allow_anonymous_read,
        }
    }
}

#[async_trait]
impl AccessGate for ApiKeyGate {
    async fn authorize(&self, credentials: &Credentials, class: OpClass) -> bool {
        let keyed = credentials.token() == Some(self.key.as_str());
        match class {
            OpClass::Safe => keyed || self.allow_anonymous_read,
            OpClass::Unsafe => keyed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.insert(
                axum::http::HeaderName::from_bytes(k.as_bytes()).unwrap(),
                v.parse().unwrap(),
            );
        }
        map
    }

    #[test]
    fn credentials_from_bearer_header() {
        let creds = Credentials::from_headers(&headers(&[("authorization", "Bearer s3cret")]));
        assert_eq!(creds, Credentials::Bearer("s3cret".into()));
    }

    #[test]
    fn credentials_from_api_key_header() {
        let creds = Credentials::from_headers(&headers(&[("x-api-key", "s3cret")]));
        assert_eq!(creds, Credentials::ApiKey("s3cret".into()));
    }

    #[test]
    fn credentials_default_to_anonymous() {
        let creds = Credentials::from_headers(&HeaderMap::new());
        assert!(creds.is_anonymous());
    }

    #[tokio::test]
    async fn open_gate_admits_everyone() {
        let gate = OpenGate;
        assert!(gate.authorize(&Credentials::Anonymous, OpClass::Unsafe).await);
    }

    #[tokio::test]
    async fn api_key_gate_requires_key_for_unsafe_ops() {
        let gate = ApiKeyGate::new("k", true);
        assert!(!gate.authorize(&Credentials::Anonymous, OpClass::Unsafe).await);
        assert!(
            !gate
                .authorize(&Credentials::Bearer("wrong".into()), OpClass::Unsafe)
                .await
        );
        assert!(
            gate.authorize(&Credentials::Bearer("k".into()), OpClass::Unsafe)
                .await
        );
        assert!(
            gate.authorize(&Credentials::ApiKey("k".into()), OpClass::Unsafe)
                .await
        );
    }

    #[tokio::test]
    async fn api_key_gate_allows_anonymous_reads_when_configured() {
        let open_reads = ApiKeyGate::new("k", true);
        assert!(open_reads.authorize(&Credentials::Anonymous, OpClass::Safe).await);

        let closed_reads = ApiKeyGate::new("k", false);
        assert!(!closed_reads.authorize(&Credentials::Anonymous, OpClass::Safe).await);
        assert!(
            closed_reads
                .authorize(&Credentials::Bearer("k".into()), OpClass::Safe)
                .await
        );
    }
}
