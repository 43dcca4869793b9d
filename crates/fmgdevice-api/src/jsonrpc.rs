// FortiManager JSON-RPC wire types
//
// Every call is a POST of `{id, method, params: [{url, data?}], session?}`
// to `/jsonrpc`. Responses carry one result per param, each with its own
// `{status: {code, message}}` block.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum::{Display, EnumString};

/// JSON-RPC method names understood by FortiManager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Method {
    Get,
    Set,
    Add,
    Update,
    Delete,
    Exec,
}

impl Method {
    /// `add` creates a new row each time, so resending it after an
    /// ambiguous failure can duplicate the object or fail with `-2`.
    pub fn is_idempotent(self) -> bool {
        !matches!(self, Self::Add)
    }
}

/// One entry of the request `params` array.
#[derive(Debug, Clone, Serialize)]
pub struct Param {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Request envelope.
#[derive(Debug, Clone, Serialize)]
pub struct Request {
    pub id: u64,
    pub method: Method,
    pub params: Vec<Param>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    pub verbose: u8,
}

/// `status` block attached to every result.
#[derive(Debug, Clone, Deserialize)]
pub struct Status {
    pub code: i64,
    #[serde(default)]
    pub message: String,
}

/// One entry of the response `result` array.
#[derive(Debug, Clone, Deserialize)]
pub struct RpcResult {
    pub status: Status,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Response envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Response {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub result: Vec<RpcResult>,
    /// Only present on the login response.
    #[serde(default)]
    pub session: Option<String>,
}
