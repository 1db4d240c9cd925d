use light_ctoken_wire::CTokenWireError;
use solana_program_error::ProgramError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, PackError>;

#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum PackError {
    #[error("account {0} has no tree info, fetch its proof context first")]
    MissingTreeInfo(usize),
    #[error("{inputs} input accounts but {proofs} proof accounts")]
    InputCountMismatch { inputs: usize, proofs: usize },
    #[error("packing program and token accounts together requires a cpi context account")]
    NoCpiContext,
    #[error("amount must be positive")]
    ZeroAmount,
    #[error(transparent)]
    Wire(#[from] CTokenWireError),
}

impl From<PackError> for ProgramError {
    fn from(error: PackError) -> Self {
        match error {
            PackError::MissingTreeInfo(_) => ProgramError::InvalidAccountData,
            PackError::InputCountMismatch { .. } => ProgramError::InvalidAccountData,
            PackError::NoCpiContext => ProgramError::NotEnoughAccountKeys,
            PackError::ZeroAmount => ProgramError::InvalidInstructionData,
            PackError::Wire(_) => ProgramError::InvalidInstructionData,
        }
    }
}
