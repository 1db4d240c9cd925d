//! Account reference table for packed instructions.
//!
//! [`PackedAccounts`] collects the accounts an instruction references and
//! assigns each one a stable `u8` index, in three blocks:
//! 1. **Pre-accounts** - fee payer and other signers, first.
//! 2. **System accounts** - well-known program accounts at fixed positions.
//! 3. **Packed accounts** - deduplicated dynamic accounts (trees, queues,
//!    token accounts), ordered by assigned index.

use std::collections::HashMap;

use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

use crate::instruction::system_accounts::{get_light_system_account_metas, SystemAccountMetaConfig};

#[derive(Default, Debug)]
pub struct PackedAccounts {
    /// Accounts that come before the system block, e.g. fee payer and
    /// authority.
    pub pre_accounts: Vec<AccountMeta>,
    system_accounts: Vec<AccountMeta>,
    /// Next available index for packed accounts.
    next_index: u8,
    /// Pubkey to (index, meta), for deduplication and index tracking.
    map: HashMap<Pubkey, (u8, AccountMeta)>,
}

impl PackedAccounts {
    pub fn new_with_system_accounts(config: SystemAccountMetaConfig) -> Self {
        let mut accounts = Self::default();
        accounts.add_system_accounts(config);
        accounts
    }

    pub fn add_pre_accounts_signer(&mut self, pubkey: Pubkey) {
        self.pre_accounts.push(AccountMeta {
            pubkey,
            is_signer: true,
            is_writable: false,
        });
    }

    pub fn add_pre_accounts_signer_mut(&mut self, pubkey: Pubkey) {
        self.pre_accounts.push(AccountMeta {
            pubkey,
            is_signer: true,
            is_writable: true,
        });
    }

    pub fn add_pre_accounts_meta(&mut self, account_meta: AccountMeta) {
        self.pre_accounts.push(account_meta);
    }

    /// Appends the well-known system accounts. When the config carries a cpi
    /// context account it is appended to the system block and reserves packed
    /// index 0, so it must be added before any packed insertion.
    pub fn add_system_accounts(&mut self, config: SystemAccountMetaConfig) {
        let cpi_context = config.cpi_context;
        self.system_accounts
            .extend(get_light_system_account_metas(config));
        if let Some(cpi_context) = cpi_context {
            assert_eq!(
                self.next_index, 0,
                "cpi context account must be added before packed accounts"
            );
            self.next_index = 1;
            self.system_accounts.push(AccountMeta {
                pubkey: cpi_context,
                is_signer: false,
                is_writable: true,
            });
        }
    }

    /// Returns the index of `pubkey` in the packed block, inserting it as
    /// writable non-signer if it is not yet present.
    pub fn insert_or_get(&mut self, pubkey: Pubkey) -> u8 {
        self.insert_or_get_config(pubkey, false, true)
    }

    pub fn insert_or_get_read_only(&mut self, pubkey: Pubkey) -> u8 {
        self.insert_or_get_config(pubkey, false, false)
    }

    /// On re-insertion flags are only ever upgraded, never downgraded, so an
    /// account referenced both read-only and writable ends up writable.
    pub fn insert_or_get_config(&mut self, pubkey: Pubkey, is_signer: bool, is_writable: bool) -> u8 {
        match self.map.get_mut(&pubkey) {
            Some((index, entry)) => {
                if !entry.is_writable {
                    entry.is_writable = is_writable;
                }
                if !entry.is_signer {
                    entry.is_signer = is_signer;
                }
                *index
            }
            None => {
                let index = self.next_index;
                self.next_index += 1;
                self.map.insert(
                    pubkey,
                    (
                        index,
                        AccountMeta {
                            pubkey,
                            is_signer,
                            is_writable,
                        },
                    ),
                );
                index
            }
        }
    }

    fn packed_accounts_to_metas(&self) -> Vec<AccountMeta> {
        let mut packed_accounts = self.map.values().collect::<Vec<_>>();
        // The hash map is unordered, the assigned index decides the position.
        packed_accounts.sort_by_key(|(index, _)| *index);
        packed_accounts
            .into_iter()
            .map(|(_, meta)| meta.clone())
            .collect()
    }

    fn get_offsets(&self) -> (usize, usize) {
        let system_accounts_start_offset = self.pre_accounts.len();
        let packed_accounts_start_offset =
            system_accounts_start_offset + self.system_accounts.len();
        (system_accounts_start_offset, packed_accounts_start_offset)
    }

    /// Flattens the three blocks into the instruction account list, returning
    /// the metas plus the start offsets of the system and packed blocks.
    pub fn to_account_metas(&self) -> (Vec<AccountMeta>, usize, usize) {
        let (system_offset, packed_offset) = self.get_offsets();
        let metas = [
            self.pre_accounts.clone(),
            self.system_accounts.clone(),
            self.packed_accounts_to_metas(),
        ]
        .concat();
        (metas, system_offset, packed_offset)
    }
}
