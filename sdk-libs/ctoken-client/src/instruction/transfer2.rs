//! Builder for the batch transfer instruction.

use light_ctoken_wire::{
    constants::LIGHT_TOKEN_PROGRAM_ID,
    instructions::{
        extensions::ExtensionInstructionData,
        transfer2::{
            Compression, CompressedCpiContext, CompressionMode, MultiInputTokenDataWithContext,
            MultiTokenTransferOutputData, PackedMerkleContext, Transfer2InstructionData,
        },
    },
};
use solana_instruction::Instruction;
use solana_pubkey::Pubkey;

use crate::{
    error::{PackError, Result},
    instruction::{
        pack_accounts::PackedAccounts,
        system_accounts::SystemAccountMetaConfig,
        tree_info::ValidityProofWithContext,
    },
};

/// Compressed token account being spent, aligned by position with the
/// accounts of the validity proof.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InputTokenAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub delegate: Option<Pubkey>,
    pub version: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputTokenAccount {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub delegate: Option<Pubkey>,
    pub version: u8,
}

/// One compression or decompression leg, with pubkeys still unresolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressionSpec {
    pub mode: CompressionMode,
    pub amount: u64,
    pub mint: Pubkey,
    pub source_or_recipient: Pubkey,
    pub authority: Option<Pubkey>,
    /// Token pool account for SPL legs, rent sponsor for compress-and-close.
    pub pool_account: Option<Pubkey>,
    pub pool_index: u8,
    pub bump: u8,
    pub decimals: u8,
}

#[derive(Debug, Clone)]
pub struct Transfer2Inputs {
    pub fee_payer: Pubkey,
    pub authority: Pubkey,
    pub validity_proof: ValidityProofWithContext,
    pub inputs: Vec<InputTokenAccount>,
    pub outputs: Vec<OutputTokenAccount>,
    pub compressions: Vec<CompressionSpec>,
    /// Queue new compressed accounts are appended to.
    pub output_queue: Pubkey,
    pub max_top_up: u16,
    pub with_transaction_hash: bool,
    pub cpi_context: Option<Pubkey>,
    /// Per-input extension payloads, aligned with `inputs`.
    pub in_tlv: Option<Vec<Vec<ExtensionInstructionData>>>,
}

/// Builds the batch transfer instruction. Signers first, then the fixed
/// system block, then every referenced account deduplicated by index.
pub fn create_transfer2_instruction(inputs: Transfer2Inputs) -> Result<Instruction> {
    if inputs.inputs.len() != inputs.validity_proof.accounts.len() {
        return Err(PackError::InputCountMismatch {
            inputs: inputs.inputs.len(),
            proofs: inputs.validity_proof.accounts.len(),
        });
    }

    let mut accounts = PackedAccounts::default();
    accounts.add_pre_accounts_signer_mut(inputs.fee_payer);
    accounts.add_pre_accounts_signer(inputs.authority);
    let config = match inputs.cpi_context {
        Some(cpi_context) => {
            SystemAccountMetaConfig::new_with_cpi_context(LIGHT_TOKEN_PROGRAM_ID, cpi_context)
        }
        None => SystemAccountMetaConfig::new(LIGHT_TOKEN_PROGRAM_ID),
    };
    accounts.add_system_accounts(config);

    let packed_tree_infos = inputs.validity_proof.pack_tree_infos(&mut accounts)?;

    let in_token_data = inputs
        .inputs
        .iter()
        .zip(packed_tree_infos.iter())
        .map(|(input, tree_info)| MultiInputTokenDataWithContext {
            owner: accounts.insert_or_get(input.owner),
            amount: input.amount,
            has_delegate: input.delegate.is_some(),
            delegate: input
                .delegate
                .map(|delegate| accounts.insert_or_get(delegate))
                .unwrap_or_default(),
            mint: accounts.insert_or_get(input.mint),
            version: input.version,
            merkle_context: PackedMerkleContext {
                merkle_tree_pubkey_index: tree_info.merkle_tree_pubkey_index,
                queue_pubkey_index: tree_info.queue_pubkey_index,
                leaf_index: tree_info.leaf_index,
                prove_by_index: tree_info.prove_by_index,
            },
            root_index: tree_info.root_index,
        })
        .collect();

    let out_token_data = inputs
        .outputs
        .iter()
        .map(|output| MultiTokenTransferOutputData {
            owner: accounts.insert_or_get(output.owner),
            amount: output.amount,
            has_delegate: output.delegate.is_some(),
            delegate: output
                .delegate
                .map(|delegate| accounts.insert_or_get(delegate))
                .unwrap_or_default(),
            mint: accounts.insert_or_get(output.mint),
            version: output.version,
        })
        .collect();

    let output_queue = accounts.insert_or_get(inputs.output_queue);

    let compressions = if inputs.compressions.is_empty() {
        None
    } else {
        Some(
            inputs
                .compressions
                .iter()
                .map(|spec| Compression {
                    mode: spec.mode,
                    amount: spec.amount,
                    mint: accounts.insert_or_get(spec.mint),
                    source_or_recipient: accounts.insert_or_get(spec.source_or_recipient),
                    authority: spec
                        .authority
                        .map(|authority| accounts.insert_or_get(authority))
                        .unwrap_or_default(),
                    pool_account_index: spec
                        .pool_account
                        .map(|pool| accounts.insert_or_get(pool))
                        .unwrap_or_default(),
                    pool_index: spec.pool_index,
                    bump: spec.bump,
                    decimals: spec.decimals,
                })
                .collect(),
        )
    };

    let data = Transfer2InstructionData {
        with_transaction_hash: inputs.with_transaction_hash,
        output_queue,
        max_top_up: inputs.max_top_up,
        cpi_context: inputs.cpi_context.map(|_| CompressedCpiContext {
            set_context: false,
            first_set_context: false,
            // The cpi context account is reserved at packed index 0.
            cpi_context_account_index: 0,
        }),
        compressions,
        proof: inputs.validity_proof.proof.0,
        in_token_data,
        out_token_data,
        in_tlv: inputs.in_tlv,
        ..Default::default()
    };

    let (account_metas, _, _) = accounts.to_account_metas();
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts: account_metas,
        data: data.to_bytes(),
    })
}
