//! Wire types for the compressed token program.
//!
//! Byte-exact encode and decode for instruction data and account state,
//! over a bounds-checked little-endian cursor. Building transactions,
//! proof generation and rpc access live in the client crate.

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod instructions;
pub mod proof;
pub mod state;

pub use codec::{Reader, WireDecode, WireEncode, Writer};
pub use config::ProtocolConfig;
pub use error::CTokenWireError;
pub use proof::{CompressedProof, ValidityProof};
