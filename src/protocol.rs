//! Wire contracts for the remote interpretation service.
//!
//! Two endpoints are consumed (see [`crate::client`]):
//!
//! - `POST /interpretar` with `{"codigo": <source>}`, answered by
//!   [`InterpretResponse`];
//! - `GET /ast?codigo=<source>`, answered by [`AstResponse`].
//!
//! Both carry an `estado` discriminator; everything else is optional. The
//! session never sees these types directly applied to the view: the
//! translation functions here produce [`model`](crate::model) values with
//! all defaulting rules applied in one place.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::model::{
    ExecutionError, ExecutionResult, NodeValue, RunOutcome, SourceLocation, SyntaxNode,
    FALLBACK_ERROR_MESSAGE,
};

/// `estado` value reporting success; anything else is a failure.
pub const STATUS_OK: &str = "exito";

/// Node object key holding the node kind.
const NODE_KIND_KEY: &str = "tipo";
/// Node object keys holding the optional location halves.
const NODE_LINE_KEY: &str = "linea";
const NODE_COLUMN_KEY: &str = "columna";

/// Request body for the interpret endpoint.
#[derive(Debug, Serialize)]
pub struct InterpretRequest<'a> {
    pub codigo: &'a str,
}

/// Response of the interpret endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct InterpretResponse {
    pub estado: String,
    pub resultado: Option<String>,
    pub tipo: Option<String>,
    pub html: Option<String>,
    pub css: Option<String>,
    pub error: Option<String>,
    pub traceback: Option<String>,
    pub linea: Option<u32>,
    pub columna: Option<u32>,
}

/// Response of the AST endpoint. The tree arrives as raw JSON and is decoded
/// separately by [`decode_root`].
#[derive(Debug, Clone, Deserialize)]
pub struct AstResponse {
    pub estado: String,
    pub ast: Option<Value>,
    pub error: Option<String>,
}

/// Translate an interpret response into the run outcome.
///
/// Success keeps the response's value fields with absent optionals folded to
/// empty strings. Failure (any `estado` other than [`STATUS_OK`]) keeps the
/// reported message, falling back to a fixed string, and pairs the location
/// halves so they are carried both-or-neither.
pub fn interpret_outcome(response: InterpretResponse) -> RunOutcome {
    if response.estado == STATUS_OK {
        RunOutcome::Success(ExecutionResult {
            value: response.resultado.unwrap_or_default(),
            value_kind: response.tipo.unwrap_or_default(),
            markup: response.html.unwrap_or_default(),
            stylesheet: response.css.unwrap_or_default(),
        })
    } else {
        RunOutcome::Failure(ExecutionError {
            message: response
                .error
                .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string()),
            location: SourceLocation::from_parts(response.linea, response.columna),
            trace: response.traceback,
        })
    }
}

/// Decode the root of an AST payload.
///
/// Returns `None` when the payload is not a node object (missing or
/// non-string kind tag); the caller treats that as an undecodable response
/// and keeps the previous tree.
pub fn decode_root(value: &Value) -> Option<SyntaxNode> {
    match decode_value(value) {
        NodeValue::Node(node) => Some(*node),
        _ => None,
    }
}

/// Decode arbitrary JSON into the node value model. Total: every shape maps
/// to some variant, with kind-less objects folded to [`NodeValue::Malformed`]
/// so the tree pane can surface them.
pub fn decode_value(value: &Value) -> NodeValue {
    match value {
        Value::Object(map) => match map.get(NODE_KIND_KEY).and_then(Value::as_str) {
            Some(kind) => {
                let location = SourceLocation::from_parts(
                    map.get(NODE_LINE_KEY).and_then(as_u32),
                    map.get(NODE_COLUMN_KEY).and_then(as_u32),
                );
                let properties = map
                    .iter()
                    .filter(|(key, _)| {
                        key.as_str() != NODE_KIND_KEY
                            && key.as_str() != NODE_LINE_KEY
                            && key.as_str() != NODE_COLUMN_KEY
                    })
                    .map(|(key, value)| (key.clone(), decode_value(value)))
                    .collect();
                NodeValue::Node(Box::new(SyntaxNode {
                    kind: kind.to_string(),
                    location,
                    properties,
                }))
            }
            None => NodeValue::Malformed,
        },
        Value::Array(items) => NodeValue::Sequence(items.iter().map(decode_value).collect()),
        scalar => NodeValue::Scalar(scalar.clone()),
    }
}

fn as_u32(value: &Value) -> Option<u32> {
    value.as_u64().and_then(|n| u32::try_from(n).ok())
}
