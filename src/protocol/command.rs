//! Command definitions
//!
//! A `Command` is one wire message, either a request or the response that
//! answers it. The header fields travel as a JSON document; the body is
//! raw bytes whose encoding is up to the caller.

use std::collections::HashMap;

use bytes::Bytes;
use serde::{Deserialize, Deserializer, Serialize};

use super::codes::ResponseCode;
use super::opaque::OpaqueGenerator;

/// Language tag this client reports to the peer
pub const LANGUAGE: &str = "RUST";

/// Protocol revision this client speaks
pub const PROTOCOL_VERSION: i32 = 317;

/// Flag bit marking a response
pub const FLAG_RESPONSE: i32 = 0x01;

/// Flag bit marking a one-way request
pub const FLAG_ONEWAY: i32 = 0x02;

/// One remoting message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Command {
    /// Request code, or status code on responses
    code: i32,

    #[serde(default, deserialize_with = "null_as_default")]
    language: String,

    #[serde(default)]
    version: i32,

    /// Correlation id echoed by the peer
    opaque: i32,

    #[serde(default)]
    flag: i32,

    #[serde(default, deserialize_with = "null_as_default")]
    remark: String,

    #[serde(default, deserialize_with = "null_as_default")]
    ext_fields: HashMap<String, String>,

    #[serde(skip)]
    body: Bytes,
}

/// Peers may send `null` where we keep an empty value
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Command {
    // =========================================================================
    // Constructors
    // =========================================================================

    /// Build a request with an id from the process-wide generator
    pub fn request(code: i32, ext_fields: HashMap<String, String>) -> Self {
        Self::request_with(OpaqueGenerator::global(), code, ext_fields)
    }

    /// Build a request with an id from `generator`
    pub fn request_with(
        generator: &OpaqueGenerator,
        code: i32,
        ext_fields: HashMap<String, String>,
    ) -> Self {
        Self {
            code,
            language: LANGUAGE.to_string(),
            version: PROTOCOL_VERSION,
            opaque: generator.next_id(),
            flag: 0,
            remark: String::new(),
            ext_fields,
            body: Bytes::new(),
        }
    }

    /// Build a request that expects no response
    pub fn oneway_request(code: i32, ext_fields: HashMap<String, String>) -> Self {
        let mut command = Self::request(code, ext_fields);
        command.mark_oneway();
        command
    }

    /// Build a response answering the request with id `opaque`
    pub fn response(code: i32, opaque: i32) -> Self {
        Self {
            code,
            language: LANGUAGE.to_string(),
            version: PROTOCOL_VERSION,
            opaque,
            flag: FLAG_RESPONSE,
            remark: String::new(),
            ext_fields: HashMap::new(),
            body: Bytes::new(),
        }
    }

    // =========================================================================
    // Builder helpers
    // =========================================================================

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn with_ext_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.ext_fields.insert(key.into(), value.into());
        self
    }

    pub fn with_remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = remark.into();
        self
    }

    pub(crate) fn set_body(&mut self, body: Bytes) {
        self.body = body;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn code(&self) -> i32 {
        self.code
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn opaque(&self) -> i32 {
        self.opaque
    }

    pub fn flag(&self) -> i32 {
        self.flag
    }

    pub fn remark(&self) -> &str {
        &self.remark
    }

    pub fn ext_fields(&self) -> &HashMap<String, String> {
        &self.ext_fields
    }

    pub fn ext_field(&self, key: &str) -> Option<&str> {
        self.ext_fields.get(key).map(String::as_str)
    }

    pub fn body(&self) -> &Bytes {
        &self.body
    }

    // =========================================================================
    // Flags
    // =========================================================================

    pub fn is_response(&self) -> bool {
        self.flag & FLAG_RESPONSE == FLAG_RESPONSE
    }

    pub fn is_oneway(&self) -> bool {
        self.flag & FLAG_ONEWAY == FLAG_ONEWAY
    }

    pub fn mark_response(&mut self) {
        self.flag |= FLAG_RESPONSE;
    }

    pub fn mark_oneway(&mut self) {
        self.flag |= FLAG_ONEWAY;
    }

    /// Whether a response carries the peer's success status.
    ///
    /// Nonzero codes are application status, not transport failures.
    pub fn is_success(&self) -> bool {
        self.code == ResponseCode::SUCCESS
    }
}
