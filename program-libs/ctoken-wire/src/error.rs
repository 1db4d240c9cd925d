use thiserror::Error;

pub type Result<T> = std::result::Result<T, CTokenWireError>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum CTokenWireError {
    #[error("truncated input at offset {offset}: needed {needed} bytes, {remaining} remaining")]
    TruncatedInput {
        offset: usize,
        needed: usize,
        remaining: usize,
    },
    #[error("malformed tag {tag} at offset {offset}")]
    MalformedTag { offset: usize, tag: u8 },
    #[error("unknown variant discriminant {0}")]
    UnknownVariant(u8),
    #[error("invalid proof length for {component}: expected {expected}, got {actual}")]
    InvalidProofLength {
        component: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("action requires the compressed mint snapshot but none was provided")]
    MissingMintContext,
    #[error("authority update on a compressed mint requires a validity proof")]
    MissingProof,
    #[error("rent payment of {epochs} epochs is below the minimum of {minimum}")]
    RentBelowMinimum { epochs: u16, minimum: u16 },
}
