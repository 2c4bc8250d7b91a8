use brove_core::PubKey;

/// Authentication state of one connection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SessionAuth {
    #[default]
    Unauthenticated,
    Authenticated(PubKey),
}

impl SessionAuth {
    /// The authenticated identity. An empty key counts as none.
    pub fn authed(&self) -> Option<&PubKey> {
        match self {
            SessionAuth::Authenticated(pk) if !pk.is_empty() => Some(pk),
            _ => None,
        }
    }
}

/// Immutable metadata for one inbound request.
#[derive(Debug, Clone, Default)]
pub struct ConnContext {
    /// Connection identifier, for log correlation only.
    pub conn_id: String,
    pub auth: SessionAuth,
}

impl ConnContext {
    pub fn anonymous(conn_id: impl Into<String>) -> Self {
        Self {
            conn_id: conn_id.into(),
            auth: SessionAuth::Unauthenticated,
        }
    }

    pub fn authenticated(conn_id: impl Into<String>, pubkey: impl Into<PubKey>) -> Self {
        Self {
            conn_id: conn_id.into(),
            auth: SessionAuth::Authenticated(pubkey.into()),
        }
    }

    pub fn authed(&self) -> Option<&PubKey> {
        self.auth.authed()
    }
}
