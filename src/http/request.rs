//! Request normalization.
//!
//! # Responsibilities
//! - Decide which encoding the caller used (query string, GraphQL body,
//!   form body, JSON body)
//! - Extract the `{query, operationName, variables}` triple
//! - Recover `variables` sent as a JSON-encoded string
//!
//! # Design Decisions
//! - Normalization is total: malformed input degrades to default fields and
//!   fails later, inside query validation, with a proper GraphQL error
//! - The query string wins over headers and body so GET requests stay
//!   cacheable regardless of Content-Type
//! - Encodings are a closed enum; adding one is a new variant plus a match arm

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::config::schema::{FormUrlEncodedMode, HeaderMatching, NormalizerConfig};
use crate::http::event::{null_as_default, ProxyRequest};

pub const CONTENT_TYPE_JSON: &str = "application/json";
pub const CONTENT_TYPE_GRAPHQL: &str = "application/graphql";
pub const CONTENT_TYPE_FORM_URL_ENCODED: &str = "application/x-www-form-urlencoded";

const CONTENT_TYPE_HEADER: &str = "Content-Type";

/// GraphQL variables keyed by name.
pub type Variables = Map<String, Value>;

/// Canonical GraphQL request handed to the query executor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GraphQlRequest {
    #[serde(deserialize_with = "null_as_default")]
    pub query: String,

    /// Empty means "unspecified".
    #[serde(deserialize_with = "null_as_default")]
    pub operation_name: String,

    #[serde(deserialize_with = "null_as_default")]
    pub variables: Variables,
}

/// Body shape accepted when `variables` arrives as a JSON-encoded string.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct CompatibilityRequest {
    #[serde(deserialize_with = "null_as_default")]
    query: String,

    #[serde(deserialize_with = "null_as_default")]
    operation_name: String,

    #[serde(deserialize_with = "null_as_default")]
    variables: String,
}

/// The encoding a request was sent with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// `query`, `operationName` and `variables` in the query string.
    QueryString,
    /// `application/graphql`: the body is the query.
    GraphQl,
    /// `application/x-www-form-urlencoded` body.
    FormUrlEncoded,
    /// JSON body; also the default for absent or unknown Content-Type.
    Json,
}

impl Encoding {
    /// Stable label for logs and metrics.
    pub fn as_str(&self) -> &'static str {
        match self {
            Encoding::QueryString => "query_string",
            Encoding::GraphQl => "graphql",
            Encoding::FormUrlEncoded => "form_urlencoded",
            Encoding::Json => "json",
        }
    }

    /// Map the first `;`-delimited segment of a Content-Type value.
    fn from_media_type(media_type: &str) -> Self {
        match media_type {
            CONTENT_TYPE_GRAPHQL => Encoding::GraphQl,
            CONTENT_TYPE_FORM_URL_ENCODED => Encoding::FormUrlEncoded,
            _ => Encoding::Json,
        }
    }
}

/// Turns proxy events into canonical GraphQL requests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestNormalizer {
    config: NormalizerConfig,
}

impl RequestNormalizer {
    /// Create a normalizer with the given behavior switches.
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    /// Decide which encoding the request uses. First match wins.
    pub fn encoding(&self, request: &ProxyRequest) -> Encoding {
        if has_query(&request.query_string_parameters) {
            return Encoding::QueryString;
        }

        let content_type = match self.config.header_matching {
            HeaderMatching::Exact => request.header(CONTENT_TYPE_HEADER),
            HeaderMatching::CaseInsensitive => request.header_ignore_case(CONTENT_TYPE_HEADER),
        }
        .unwrap_or_default();

        let media_type = content_type.split(';').next().unwrap_or_default();
        match self.config.header_matching {
            HeaderMatching::Exact => Encoding::from_media_type(media_type),
            HeaderMatching::CaseInsensitive => {
                Encoding::from_media_type(&media_type.trim().to_ascii_lowercase())
            }
        }
    }

    /// Normalize a proxy event. Never fails.
    pub fn normalize(&self, request: &ProxyRequest) -> GraphQlRequest {
        self.normalize_with_encoding(request).1
    }

    /// Normalize a proxy event, also reporting the encoding that was used.
    pub fn normalize_with_encoding(&self, request: &ProxyRequest) -> (Encoding, GraphQlRequest) {
        let encoding = self.encoding(request);
        let normalized = match encoding {
            Encoding::QueryString => {
                from_params(&request.query_string_parameters).unwrap_or_default()
            }
            Encoding::GraphQl => GraphQlRequest {
                query: request.body_text().into_owned(),
                ..GraphQlRequest::default()
            },
            Encoding::FormUrlEncoded => match self.config.form_urlencoded {
                FormUrlEncodedMode::Parse => from_form_body(&request.body_text()),
                FormUrlEncodedMode::Ignore => GraphQlRequest::default(),
            },
            Encoding::Json => from_json_body(&request.body_text()),
        };
        (encoding, normalized)
    }
}

fn has_query(params: &HashMap<String, String>) -> bool {
    params.get("query").is_some_and(|query| !query.is_empty())
}

/// Build a request from flat string fields, as sent in a query string or form.
///
/// Returns `None` unless a non-empty `query` is present.
fn from_params(params: &HashMap<String, String>) -> Option<GraphQlRequest> {
    if !has_query(params) {
        return None;
    }

    let variables = params
        .get("variables")
        .filter(|raw| !raw.is_empty())
        .and_then(|raw| try_parse_variables(raw))
        .unwrap_or_default();

    Some(GraphQlRequest {
        query: params.get("query").cloned().unwrap_or_default(),
        operation_name: params.get("operationName").cloned().unwrap_or_default(),
        variables,
    })
}

fn from_form_body(body: &str) -> GraphQlRequest {
    let mut fields = HashMap::new();
    for (key, value) in url::form_urlencoded::parse(body.as_bytes()) {
        // First occurrence wins for repeated fields.
        fields.entry(key.into_owned()).or_insert_with(|| value.into_owned());
    }

    from_params(&fields).unwrap_or_default()
}

fn from_json_body(body: &str) -> GraphQlRequest {
    let error = match serde_json::from_str::<GraphQlRequest>(body) {
        Ok(request) => return request,
        Err(error) => error,
    };

    // Most likely `variables` was sent as a string rather than an object.
    match serde_json::from_str::<CompatibilityRequest>(body) {
        Ok(compat) => {
            tracing::debug!(error = %error, "JSON body recovered through string variables");
            GraphQlRequest {
                query: compat.query,
                operation_name: compat.operation_name,
                variables: try_parse_variables(&compat.variables).unwrap_or_default(),
            }
        }
        Err(compat_error) => {
            tracing::debug!(
                error = %error,
                compat_error = %compat_error,
                "JSON body recovered field by field"
            );
            salvage_json_body(body).unwrap_or_default()
        }
    }
}

/// Keep every well-typed field of a JSON object body.
///
/// `None` unless the body is a JSON object. Fields of the wrong type are left
/// at their defaults, so `"variables": []` still leaves the query usable.
fn salvage_json_body(body: &str) -> Option<GraphQlRequest> {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return None;
    };

    let string_field = |name: &str| match fields.get(name) {
        Some(Value::String(value)) => value.clone(),
        _ => String::new(),
    };

    let variables = match fields.get("variables") {
        Some(Value::Object(variables)) => variables.clone(),
        Some(Value::String(raw)) => try_parse_variables(raw).unwrap_or_default(),
        _ => Variables::new(),
    };

    Some(GraphQlRequest {
        query: string_field("query"),
        operation_name: string_field("operationName"),
        variables,
    })
}

/// Best-effort decode of a JSON-encoded variables object.
///
/// `None` means the input was not a JSON object. Callers substitute an empty
/// map so that malformed variables never reject a request at this boundary.
pub fn try_parse_variables(raw: &str) -> Option<Variables> {
    match serde_json::from_str::<Variables>(raw) {
        Ok(variables) => Some(variables),
        Err(error) => {
            tracing::debug!(error = %error, "discarding malformed variables");
            None
        }
    }
}
