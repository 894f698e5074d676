//! Protocol Module
//!
//! Defines the remoting wire protocol spoken by brokers and name servers.
//!
//! ## Frame Format
//! ```text
//! ┌────────────┬─────────────────────┬────────────────┬───────────────┐
//! │ Total (4)  │ Type|HeaderLen (4)  │  Header (JSON) │  Body (raw)   │
//! └────────────┴─────────────────────┴────────────────┴───────────────┘
//! ```
//!
//! ### Header Fields
//! `code`, `language`, `version`, `opaque`, `flag`, `remark`, `extFields`
//!
//! ### Flag Bits
//! - 0x01: response
//! - 0x02: one-way request (no response expected)
//!
//! ### Status Codes
//! Responses reuse `code` as a status: 0 is success, anything else is a
//! peer-defined status the caller interprets.

mod codec;
mod command;
pub mod codes;
mod opaque;

pub use codec::{
    decode, decode_bytes, decode_frame, encode, read_command, read_frame, write_command,
    SerializeType, HEADER_LENGTH_MASK, LENGTH_FIELD_SIZE, MIN_FRAME_SIZE,
};
pub use codes::{RequestCode, ResponseCode};
pub use command::{Command, FLAG_ONEWAY, FLAG_RESPONSE, LANGUAGE, PROTOCOL_VERSION};
pub use opaque::OpaqueGenerator;
