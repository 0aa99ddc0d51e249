//! Proxy event types exchanged with the serverless gateway.
//!
//! The shapes follow the API Gateway proxy integration: camelCase JSON,
//! flat string maps for query parameters and headers, and a string body.
//! The gateway sends `null` for absent maps and bodies, so every field
//! tolerates `null` and falls back to its default.

use std::borrow::Cow;
use std::collections::HashMap;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Deserializer, Serialize};

/// Inbound request as delivered by the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProxyRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub http_method: String,

    #[serde(deserialize_with = "null_as_default")]
    pub path: String,

    #[serde(deserialize_with = "null_as_default")]
    pub query_string_parameters: HashMap<String, String>,

    #[serde(deserialize_with = "null_as_default")]
    pub headers: HashMap<String, String>,

    #[serde(deserialize_with = "null_as_default")]
    pub body: String,

    #[serde(deserialize_with = "null_as_default")]
    pub is_base64_encoded: bool,

    #[serde(deserialize_with = "null_as_default")]
    pub request_context: RequestContext,
}

/// Subset of the gateway's request context the handler cares about.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RequestContext {
    pub request_id: Option<String>,
}

impl ProxyRequest {
    /// The body as text, base64-decoded when the gateway flagged it.
    ///
    /// A body that claims to be base64 but does not decode to UTF-8 is
    /// returned untouched.
    pub fn body_text(&self) -> Cow<'_, str> {
        if !self.is_base64_encoded {
            return Cow::Borrowed(&self.body);
        }

        match STANDARD.decode(self.body.trim()).map(String::from_utf8) {
            Ok(Ok(decoded)) => Cow::Owned(decoded),
            _ => {
                tracing::debug!("body flagged as base64 did not decode, using it verbatim");
                Cow::Borrowed(&self.body)
            }
        }
    }

    /// Look up a header by exact name.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).map(String::as_str)
    }

    /// Look up a header ignoring ASCII case in the name.
    pub fn header_ignore_case(&self, name: &str) -> Option<&str> {
        self.header(name).or_else(|| {
            self.headers
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str())
        })
    }
}

/// Outbound response handed back to the gateway.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProxyResponse {
    pub status_code: u16,

    #[serde(default)]
    pub headers: HashMap<String, String>,

    #[serde(default)]
    pub body: String,

    #[serde(default)]
    pub is_base64_encoded: bool,
}

impl ProxyResponse {
    /// A response with the given status, no headers and an empty body.
    pub fn with_status(status_code: u16) -> Self {
        Self {
            status_code,
            ..Self::default()
        }
    }
}

/// Deserialize `null` as the type's default value.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
