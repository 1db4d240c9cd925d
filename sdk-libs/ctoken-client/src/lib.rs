//! Client-side instruction builders for the compressed token program.
//!
//! Takes the wire types from `light-ctoken-wire` and produces full
//! `solana_instruction::Instruction` values: account deduplication and index
//! packing, tree-info resolution, and builders for the batch transfer, mint
//! action, associated token account and SPL-compatible instructions.

pub mod error;
pub mod instruction;

pub use error::PackError;
