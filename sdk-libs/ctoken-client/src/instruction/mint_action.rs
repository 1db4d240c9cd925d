//! Builder for the batch mint management instruction.

use light_ctoken_wire::{
    constants::LIGHT_TOKEN_PROGRAM_ID,
    error::CTokenWireError,
    instructions::mint_action::{
        Action, CompressAndCloseMintAction, CompressedMintWithContext, CreateMint,
        CreateSplMintAction, DecompressMintAction, DecompressedRecipient,
        MintActionInstructionData, MintToCompressedAction, MintToDecompressedAction, Recipient,
        RemoveMetadataKeyAction, UpdateAuthority, UpdateMetadataAuthorityAction,
        UpdateMetadataFieldAction,
    },
    CompressedProof, ProtocolConfig,
};
use solana_instruction::Instruction;
use solana_pubkey::Pubkey;

use crate::{
    error::Result,
    instruction::{
        pack_accounts::PackedAccounts, system_accounts::SystemAccountMetaConfig,
        tree_info::TreeInfo,
    },
};

/// Mint action with pubkeys still unresolved. The builder replaces them with
/// packed account indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MintActionSpec {
    MintToCompressed {
        token_account_version: u8,
        recipients: Vec<Recipient>,
    },
    UpdateMintAuthority {
        new_authority: Option<Pubkey>,
    },
    UpdateFreezeAuthority {
        new_authority: Option<Pubkey>,
    },
    CreateSplMint {
        mint_bump: u8,
    },
    MintToDecompressed {
        recipient: Pubkey,
        amount: u64,
    },
    UpdateMetadataField {
        extension_index: u8,
        field_type: u8,
        key: Vec<u8>,
        value: Vec<u8>,
    },
    UpdateMetadataAuthority {
        extension_index: u8,
        new_authority: Option<Pubkey>,
    },
    RemoveMetadataKey {
        extension_index: u8,
        key: Vec<u8>,
        idempotent: bool,
    },
    Decompress {
        rent_payment: u16,
        write_top_up: u32,
    },
    CompressAndClose {
        idempotent: bool,
    },
}

#[derive(Debug, Clone)]
pub struct MintActionInputs {
    pub fee_payer: Pubkey,
    pub authority: Pubkey,
    /// Derived from the associated spl mint pubkey.
    pub compressed_address: [u8; 32],
    /// Snapshot of the compressed mint; `None` when the mint currently lives
    /// in its decompressed account or is being created.
    pub mint: Option<CompressedMintWithContext>,
    /// Protocol state flag, not a caller choice.
    pub decompressed: bool,
    pub actions: Vec<MintActionSpec>,
    pub proof: Option<CompressedProof>,
    pub tree_info: TreeInfo,
    pub token_pool_bump: u8,
    pub token_pool_index: u8,
    pub create_mint: Option<CreateMint>,
}

/// Walks the action list tracking whether the mint is compressed, dropping
/// no-op representation changes. Compressing an already compressed mint and
/// decompressing an already decompressed one are idempotent. Encoded
/// decompress legs must prepay at least the protocol rent floor.
fn resolve_actions(
    specs: Vec<MintActionSpec>,
    initially_decompressed: bool,
    accounts: &mut PackedAccounts,
    protocol_config: &ProtocolConfig,
) -> Result<Vec<Action>> {
    let mut decompressed = initially_decompressed;
    let mut actions = Vec::with_capacity(specs.len());
    for spec in specs {
        match spec {
            MintActionSpec::MintToCompressed {
                token_account_version,
                recipients,
            } => actions.push(Action::MintToCompressed(MintToCompressedAction {
                token_account_version,
                recipients,
            })),
            MintActionSpec::UpdateMintAuthority { new_authority } => {
                actions.push(Action::UpdateMintAuthority(UpdateAuthority { new_authority }))
            }
            MintActionSpec::UpdateFreezeAuthority { new_authority } => actions.push(
                Action::UpdateFreezeAuthority(UpdateAuthority { new_authority }),
            ),
            MintActionSpec::CreateSplMint { mint_bump } => {
                actions.push(Action::CreateSplMint(CreateSplMintAction { mint_bump }))
            }
            MintActionSpec::MintToDecompressed { recipient, amount } => {
                actions.push(Action::MintToDecompressed(MintToDecompressedAction {
                    recipient: DecompressedRecipient {
                        account_index: accounts.insert_or_get(recipient),
                        amount,
                    },
                }))
            }
            MintActionSpec::UpdateMetadataField {
                extension_index,
                field_type,
                key,
                value,
            } => actions.push(Action::UpdateMetadataField(UpdateMetadataFieldAction {
                extension_index,
                field_type,
                key,
                value,
            })),
            MintActionSpec::UpdateMetadataAuthority {
                extension_index,
                new_authority,
            } => actions.push(Action::UpdateMetadataAuthority(
                UpdateMetadataAuthorityAction {
                    extension_index,
                    new_authority: new_authority.unwrap_or_default(),
                },
            )),
            MintActionSpec::RemoveMetadataKey {
                extension_index,
                key,
                idempotent,
            } => actions.push(Action::RemoveMetadataKey(RemoveMetadataKeyAction {
                extension_index,
                key,
                idempotent: idempotent as u8,
            })),
            MintActionSpec::Decompress {
                rent_payment,
                write_top_up,
            } => {
                if !decompressed {
                    if rent_payment < protocol_config.min_rent_epochs {
                        return Err(CTokenWireError::RentBelowMinimum {
                            epochs: rent_payment,
                            minimum: protocol_config.min_rent_epochs,
                        }
                        .into());
                    }
                    decompressed = true;
                    actions.push(Action::Decompress(DecompressMintAction {
                        rent_payment,
                        write_top_up,
                    }));
                }
            }
            MintActionSpec::CompressAndClose { idempotent } => {
                if decompressed {
                    decompressed = false;
                    actions.push(Action::CompressAndClose(CompressAndCloseMintAction {
                        idempotent: idempotent as u8,
                    }));
                }
            }
        }
    }
    Ok(actions)
}

pub fn create_mint_action_instruction(
    inputs: MintActionInputs,
    protocol_config: &ProtocolConfig,
) -> Result<Instruction> {
    if !inputs.decompressed && inputs.mint.is_none() && inputs.create_mint.is_none() {
        return Err(CTokenWireError::MissingMintContext.into());
    }

    let mut accounts =
        PackedAccounts::new_with_system_accounts(SystemAccountMetaConfig::new(
            LIGHT_TOKEN_PROGRAM_ID,
        ));
    accounts.add_pre_accounts_signer_mut(inputs.fee_payer);
    accounts.add_pre_accounts_signer(inputs.authority);

    accounts.insert_or_get(inputs.tree_info.tree);
    accounts.insert_or_get(inputs.tree_info.output_queue());

    let actions =
        resolve_actions(inputs.actions, inputs.decompressed, &mut accounts, protocol_config)?;

    let mut data = if inputs.decompressed {
        MintActionInstructionData::new_decompressed(inputs.compressed_address)
    } else if let Some(create_mint) = inputs.create_mint {
        let proof = inputs.proof.ok_or(CTokenWireError::MissingProof)?;
        let mint = inputs
            .mint
            .clone()
            .ok_or(CTokenWireError::MissingMintContext)?;
        MintActionInstructionData::new_mint(
            inputs.compressed_address,
            mint.root_index,
            proof,
            mint.mint,
            create_mint,
        )
    } else {
        // Checked above.
        let mint = inputs
            .mint
            .clone()
            .ok_or(CTokenWireError::MissingMintContext)?;
        MintActionInstructionData::new(mint, inputs.proof)
    }
    .with_actions(actions);
    data.token_pool_bump = inputs.token_pool_bump;
    data.token_pool_index = inputs.token_pool_index;

    let (account_metas, _, _) = accounts.to_account_metas();
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts: account_metas,
        data: data.to_bytes()?,
    })
}

#[cfg(test)]
mod tests {
    use light_ctoken_wire::{
        constants::{LIGHT_SYSTEM_PROGRAM_ID, SYSTEM_PROGRAM_ID},
        instructions::mint_action::CompressedMintInstructionData,
        state::mint::CompressedMintMetadata,
    };

    use super::*;
    use crate::{error::PackError, instruction::tree_info::TreeType};

    fn tree_info() -> TreeInfo {
        TreeInfo {
            tree: Pubkey::new_unique(),
            queue: Pubkey::new_unique(),
            tree_type: TreeType::StateV2,
            cpi_context: None,
            next_tree_info: None,
        }
    }

    fn mint_with_context() -> CompressedMintWithContext {
        CompressedMintWithContext {
            leaf_index: 100,
            prove_by_index: true,
            root_index: 5,
            address: [3; 32],
            mint: CompressedMintInstructionData {
                supply: 1_000_000,
                decimals: 9,
                metadata: CompressedMintMetadata {
                    version: 0,
                    spl_mint_initialized: false,
                    mint: Pubkey::new_unique(),
                },
                mint_authority: Some(Pubkey::new_unique()),
                freeze_authority: None,
                extensions: None,
            },
        }
    }

    fn inputs() -> MintActionInputs {
        MintActionInputs {
            fee_payer: Pubkey::new_unique(),
            authority: Pubkey::new_unique(),
            compressed_address: [3; 32],
            mint: Some(mint_with_context()),
            decompressed: false,
            actions: vec![],
            proof: None,
            tree_info: tree_info(),
            token_pool_bump: 0,
            token_pool_index: 0,
            create_mint: None,
        }
    }

    #[test]
    fn compressed_mint_end_to_end() {
        let inputs = inputs();
        let fee_payer = inputs.fee_payer;
        let authority = inputs.authority;
        let tree = inputs.tree_info.tree;
        let queue = inputs.tree_info.queue;
        let ix = create_mint_action_instruction(inputs, &ProtocolConfig::default()).unwrap();

        assert_eq!(ix.program_id, LIGHT_TOKEN_PROGRAM_ID);
        assert_eq!(ix.data[0], 103);
        assert_eq!(&ix.data[1..5], &100u32.to_le_bytes());
        assert_eq!(ix.data[5], 1);
        assert_eq!(&ix.data[6..8], &5u16.to_le_bytes());

        assert_eq!(ix.accounts[0].pubkey, fee_payer);
        assert!(ix.accounts[0].is_signer && ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, authority);
        assert!(ix.accounts[1].is_signer && !ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, LIGHT_SYSTEM_PROGRAM_ID);
        assert_eq!(ix.accounts[7].pubkey, SYSTEM_PROGRAM_ID);
        assert_eq!(ix.accounts[8].pubkey, tree);
        assert_eq!(ix.accounts[9].pubkey, queue);

        let decoded = MintActionInstructionData::from_bytes(&ix.data).unwrap();
        assert_eq!(decoded.mint.unwrap().supply, 1_000_000);
        assert!(decoded.actions.is_empty());
    }

    #[test]
    fn compressed_without_snapshot_is_rejected() {
        let mut inputs = inputs();
        inputs.mint = None;
        assert_eq!(
            create_mint_action_instruction(inputs, &ProtocolConfig::default()).unwrap_err(),
            PackError::Wire(CTokenWireError::MissingMintContext)
        );
    }

    #[test]
    fn decompressed_branch_omits_snapshot() {
        let mut inputs = inputs();
        inputs.decompressed = true;
        inputs.mint = None;
        let ix = create_mint_action_instruction(inputs, &ProtocolConfig::default()).unwrap();
        let decoded = MintActionInstructionData::from_bytes(&ix.data).unwrap();
        assert_eq!(decoded.mint, None);
        assert_eq!(decoded.proof, None);
        assert_eq!(decoded.compressed_address, [3; 32]);
    }

    #[test]
    fn compress_and_close_on_compressed_mint_is_dropped() {
        let mut inputs = inputs();
        inputs.actions = vec![MintActionSpec::CompressAndClose { idempotent: true }];
        let ix = create_mint_action_instruction(inputs, &ProtocolConfig::default()).unwrap();
        let decoded = MintActionInstructionData::from_bytes(&ix.data).unwrap();
        assert!(decoded.actions.is_empty());
    }

    #[test]
    fn decompress_then_compress_round_trips_the_state() {
        let mut inputs = inputs();
        inputs.actions = vec![
            MintActionSpec::Decompress {
                rent_payment: 2,
                write_top_up: 100,
            },
            MintActionSpec::CompressAndClose { idempotent: false },
        ];
        let ix = create_mint_action_instruction(inputs, &ProtocolConfig::default()).unwrap();
        let decoded = MintActionInstructionData::from_bytes(&ix.data).unwrap();
        assert_eq!(decoded.actions.len(), 2);
        assert!(matches!(decoded.actions[0], Action::Decompress(_)));
        assert!(matches!(decoded.actions[1], Action::CompressAndClose(_)));
    }

    #[test]
    fn decompress_rent_below_floor_is_rejected() {
        let mut inputs = inputs();
        inputs.actions = vec![MintActionSpec::Decompress {
            rent_payment: 0,
            write_top_up: 0,
        }];
        assert_eq!(
            create_mint_action_instruction(inputs.clone(), &ProtocolConfig::default())
                .unwrap_err(),
            PackError::Wire(CTokenWireError::RentBelowMinimum {
                epochs: 0,
                minimum: 2,
            })
        );

        inputs.actions = vec![MintActionSpec::Decompress {
            rent_payment: 2,
            write_top_up: 0,
        }];
        assert!(create_mint_action_instruction(inputs, &ProtocolConfig::default()).is_ok());
    }

    #[test]
    fn decompress_on_decompressed_mint_is_dropped() {
        let mut inputs = inputs();
        inputs.decompressed = true;
        inputs.mint = None;
        inputs.actions = vec![
            MintActionSpec::Decompress {
                rent_payment: 2,
                write_top_up: 0,
            },
            MintActionSpec::CompressAndClose { idempotent: false },
        ];
        let ix = create_mint_action_instruction(inputs, &ProtocolConfig::default()).unwrap();
        let decoded = MintActionInstructionData::from_bytes(&ix.data).unwrap();
        assert_eq!(decoded.actions.len(), 1);
        assert!(matches!(decoded.actions[0], Action::CompressAndClose(_)));
    }

    #[test]
    fn mint_to_decompressed_packs_the_recipient() {
        let recipient = Pubkey::new_unique();
        let mut inputs = inputs();
        inputs.actions = vec![MintActionSpec::MintToDecompressed {
            recipient,
            amount: 42,
        }];
        let ix = create_mint_action_instruction(inputs, &ProtocolConfig::default()).unwrap();
        let decoded = MintActionInstructionData::from_bytes(&ix.data).unwrap();
        let Action::MintToDecompressed(action) = &decoded.actions[0] else {
            panic!("wrong action");
        };
        // Packed after the tree and queue accounts.
        assert_eq!(action.recipient.account_index, 2);
        assert_eq!(ix.accounts[8 + 2].pubkey, recipient);
        assert_eq!(action.recipient.amount, 42);
    }

    #[test]
    fn authority_update_on_compressed_mint_needs_a_proof() {
        let mut inputs = inputs();
        inputs.actions = vec![MintActionSpec::UpdateMintAuthority {
            new_authority: None,
        }];
        assert_eq!(
            create_mint_action_instruction(inputs.clone(), &ProtocolConfig::default()).unwrap_err(),
            PackError::Wire(CTokenWireError::MissingProof)
        );

        inputs.proof = Some(CompressedProof::default());
        assert!(create_mint_action_instruction(inputs, &ProtocolConfig::default()).is_ok());
    }

    #[test]
    fn create_mint_requires_a_proof() {
        let mut inputs = inputs();
        inputs.create_mint = Some(CreateMint {
            mint_bump: 254,
            read_only_address_trees: [0; 4],
            read_only_address_tree_root_indices: [0; 4],
        });
        assert_eq!(
            create_mint_action_instruction(inputs.clone(), &ProtocolConfig::default()).unwrap_err(),
            PackError::Wire(CTokenWireError::MissingProof)
        );

        inputs.proof = Some(CompressedProof::default());
        let ix = create_mint_action_instruction(inputs, &ProtocolConfig::default()).unwrap();
        let decoded = MintActionInstructionData::from_bytes(&ix.data).unwrap();
        assert!(decoded.create_mint.is_some());
        assert!(decoded.proof.is_some());
    }
}
