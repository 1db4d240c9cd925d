//! Builders for associated token account creation and batch decompression.

use light_ctoken_wire::{
    constants::{LIGHT_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID},
    instructions::{
        discriminators,
        extensions::{
            CompressedOnlyInstructionData, CompressibleInstructionData, CreateAtaInstructionData,
            ExtensionInstructionData,
        },
        transfer2::CompressionMode,
    },
    ProtocolConfig, WireEncode,
};
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::{
    error::{PackError, Result},
    instruction::{
        transfer2::{create_transfer2_instruction, CompressionSpec, InputTokenAccount, Transfer2Inputs},
        tree_info::{AccountKind, ValidityProofWithContext},
    },
};

#[derive(Debug, Clone)]
pub struct CreateAtaInputs {
    pub payer: Pubkey,
    pub owner: Pubkey,
    pub mint: Pubkey,
    pub ata: Pubkey,
    pub bump: u8,
    pub compressible_config_account: Pubkey,
    pub rent_sponsor: Pubkey,
    pub compressible_config: Option<CompressibleInstructionData>,
}

fn create_ata_instruction(
    inputs: &CreateAtaInputs,
    discriminator: u8,
    protocol_config: &ProtocolConfig,
) -> Result<Instruction> {
    if let Some(config) = &inputs.compressible_config {
        config.validate(protocol_config).map_err(PackError::Wire)?;
    }
    let payload = CreateAtaInstructionData {
        bump: inputs.bump,
        compressible_config: inputs.compressible_config.clone(),
    };
    let mut data = vec![discriminator];
    data.extend_from_slice(&payload.to_bytes());
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new_readonly(inputs.owner, false),
            AccountMeta::new_readonly(inputs.mint, false),
            AccountMeta::new(inputs.payer, true),
            AccountMeta::new(inputs.ata, false),
            AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
            AccountMeta::new_readonly(inputs.compressible_config_account, false),
            AccountMeta::new(inputs.rent_sponsor, false),
        ],
        data,
    })
}

/// Creates the associated token account, failing when it already exists.
pub fn create_associated_token_account_instruction(
    inputs: &CreateAtaInputs,
    protocol_config: &ProtocolConfig,
) -> Result<Instruction> {
    create_ata_instruction(inputs, discriminators::CREATE_ATA, protocol_config)
}

/// Idempotent variant, a no-op when the account already exists.
pub fn create_associated_token_account_idempotent_instruction(
    inputs: &CreateAtaInputs,
    protocol_config: &ProtocolConfig,
) -> Result<Instruction> {
    create_ata_instruction(inputs, discriminators::CREATE_ATA_IDEMPOTENT, protocol_config)
}

/// One compressed account to decompress into an onchain token account.
#[derive(Debug, Clone)]
pub struct DecompressTarget {
    pub account: InputTokenAccount,
    /// Associated token account (or program-owned account) receiving the
    /// balance.
    pub recipient: Pubkey,
    pub bump: u8,
    pub kind: AccountKind,
    /// Whether the recipient is an associated token account whose owner
    /// signs instead of the account itself.
    pub is_ata: bool,
    pub withheld_transfer_fee: u64,
    pub is_frozen: bool,
}

#[derive(Debug, Clone)]
pub struct DecompressInputs {
    pub fee_payer: Pubkey,
    pub authority: Pubkey,
    pub validity_proof: ValidityProofWithContext,
    pub targets: Vec<DecompressTarget>,
    pub output_queue: Pubkey,
    pub max_top_up: u16,
}

/// Builds one batch transfer that decompresses every target into its onchain
/// account. Each input carries a compressed-only extension pointing at its
/// compression leg. Already decompressed accounts are skipped by the program,
/// so the instruction is safe to retry; pair it with the idempotent
/// create-ATA instruction for missing recipients. Mixing token and generic
/// program accounts requires a cpi context account in the tree info.
pub fn decompress_accounts_idempotent(inputs: DecompressInputs) -> Result<Instruction> {
    let kinds: Vec<AccountKind> = inputs.targets.iter().map(|target| target.kind).collect();
    let has_token = kinds.contains(&AccountKind::Token);
    let has_program = kinds.contains(&AccountKind::Program);
    let cpi_context = if has_token && has_program {
        inputs
            .validity_proof
            .accounts
            .iter()
            .filter_map(|account| account.tree_info.as_ref())
            .find_map(|tree_info| tree_info.cpi_context)
            .map(Some)
            .ok_or(PackError::NoCpiContext)?
    } else {
        None
    };

    let compressions = inputs
        .targets
        .iter()
        .map(|target| CompressionSpec {
            mode: CompressionMode::Decompress,
            amount: target.account.amount,
            mint: target.account.mint,
            source_or_recipient: target.recipient,
            authority: None,
            pool_account: None,
            pool_index: 0,
            bump: target.bump,
            decimals: 0,
        })
        .collect();

    let in_tlv = inputs
        .targets
        .iter()
        .enumerate()
        .map(|(compression_index, target)| {
            vec![ExtensionInstructionData::CompressedOnly(
                CompressedOnlyInstructionData {
                    delegated_amount: 0,
                    withheld_transfer_fee: target.withheld_transfer_fee,
                    is_frozen: target.is_frozen,
                    compression_index: compression_index as u8,
                    is_ata: target.is_ata,
                    bump: target.bump,
                    owner_index: 0,
                },
            )]
        })
        .collect();

    create_transfer2_instruction(Transfer2Inputs {
        fee_payer: inputs.fee_payer,
        authority: inputs.authority,
        validity_proof: inputs.validity_proof,
        inputs: inputs
            .targets
            .into_iter()
            .map(|target| target.account)
            .collect(),
        outputs: vec![],
        compressions,
        output_queue: inputs.output_queue,
        max_top_up: inputs.max_top_up,
        with_transaction_hash: false,
        cpi_context,
        in_tlv: Some(in_tlv),
    })
}
