//! NIP-86 relay management calls.
//!
//! Wire shape: `{"method": "<name>", "params": [...]}`. Only the methods the
//! allowlist relay serves are modelled; anything else is a `BadRequest`.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{BroveError, Result};
use crate::identity::PubKey;

/// Raw request body.
#[derive(Debug, Clone, Deserialize)]
pub struct Request {
    pub method: String,
    #[serde(default)]
    pub params: Vec<Value>,
}

/// Response body. Exactly one of `result`/`error` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    pub fn ok(result: Value) -> Self {
        Self { result: Some(result), error: None }
    }

    pub fn error(msg: impl Into<String>) -> Self {
        Self { result: None, error: Some(msg.into()) }
    }
}

/// One listing row (`listallowedpubkeys` / `listbannedpubkeys`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PubKeyReason {
    pub pubkey: PubKey,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub reason: String,
}

/// Parsed management call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MethodParams {
    SupportedMethods,
    AllowPubKey { pubkey: PubKey, reason: String },
    BanPubKey { pubkey: PubKey, reason: String },
    ListAllowedPubKeys,
    ListBannedPubKeys,
}

/// Methods answered by this relay, in `supportedmethods` order.
pub const SUPPORTED_METHODS: &[&str] = &[
    "supportedmethods",
    "allowpubkey",
    "banpubkey",
    "listallowedpubkeys",
    "listbannedpubkeys",
];

impl MethodParams {
    pub fn from_json(s: &str) -> Result<Self> {
        let req: Request = serde_json::from_str(s)
            .map_err(|e| BroveError::BadRequest(format!("invalid management request: {e}")))?;
        Self::from_request(req)
    }

    pub fn from_request(req: Request) -> Result<Self> {
        match req.method.as_str() {
            "supportedmethods" => Ok(Self::SupportedMethods),
            "allowpubkey" => {
                let (pubkey, reason) = pubkey_and_reason(&req)?;
                Ok(Self::AllowPubKey { pubkey, reason })
            }
            "banpubkey" => {
                let (pubkey, reason) = pubkey_and_reason(&req)?;
                Ok(Self::BanPubKey { pubkey, reason })
            }
            "listallowedpubkeys" => Ok(Self::ListAllowedPubKeys),
            "listbannedpubkeys" => Ok(Self::ListBannedPubKeys),
            other => Err(BroveError::BadRequest(format!("unsupported method: {other}"))),
        }
    }

    pub fn method_name(&self) -> &'static str {
        match self {
            Self::SupportedMethods => "supportedmethods",
            Self::AllowPubKey { .. } => "allowpubkey",
            Self::BanPubKey { .. } => "banpubkey",
            Self::ListAllowedPubKeys => "listallowedpubkeys",
            Self::ListBannedPubKeys => "listbannedpubkeys",
        }
    }
}

fn pubkey_and_reason(req: &Request) -> Result<(PubKey, String)> {
    let pubkey = match req.params.first() {
        Some(Value::String(s)) => PubKey::new(s.as_str()),
        _ => {
            return Err(BroveError::BadRequest(format!(
                "{}: first param must be a pubkey string",
                req.method
            )))
        }
    };
    let reason = match req.params.get(1) {
        Some(Value::String(s)) => s.clone(),
        None | Some(Value::Null) => String::new(),
        Some(_) => {
            return Err(BroveError::BadRequest(format!(
                "{}: reason must be a string",
                req.method
            )))
        }
    };
    Ok((pubkey, reason))
}
