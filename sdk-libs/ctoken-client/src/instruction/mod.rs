pub mod decompress;
pub mod mint_action;
pub mod pack_accounts;
pub mod spl_interface;
pub mod substitute;
pub mod system_accounts;
pub mod transfer2;
pub mod tree_info;

pub use decompress::{
    create_associated_token_account_idempotent_instruction,
    create_associated_token_account_instruction, decompress_accounts_idempotent, CreateAtaInputs,
    DecompressInputs, DecompressTarget,
};
pub use mint_action::{create_mint_action_instruction, MintActionInputs, MintActionSpec};
pub use pack_accounts::PackedAccounts;
pub use spl_interface::{
    create_approve_instruction, create_burn_checked_instruction, create_burn_instruction,
    create_close_account_instruction, create_freeze_account_instruction,
    create_mint_to_checked_instruction, create_mint_to_instruction, create_revoke_instruction,
    create_thaw_account_instruction, create_transfer_checked_instruction,
    create_transfer_instruction, TopUpConfig,
};
pub use substitute::{substitute_identities, PackedValue};
pub use system_accounts::{get_light_system_account_metas, SystemAccountMetaConfig};
pub use transfer2::{
    create_transfer2_instruction, CompressionSpec, InputTokenAccount, OutputTokenAccount,
    Transfer2Inputs,
};
pub use tree_info::{
    AccountKind, AccountProofInput, NextTreeInfo, PackedStateTreeInfo, TreeInfo, TreeType,
    ValidityProofWithContext,
};
