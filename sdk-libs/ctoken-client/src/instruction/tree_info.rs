//! Packing of state tree metadata into account-table indices.

use light_ctoken_wire::ValidityProof;
use solana_pubkey::Pubkey;

use crate::{
    error::{PackError, Result},
    instruction::pack_accounts::PackedAccounts,
};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TreeType {
    StateV1,
    AddressV1,
    StateV2,
    AddressV2,
}

/// Tree a rolled-over tree forwards new appends to.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct NextTreeInfo {
    pub tree: Pubkey,
    pub queue: Pubkey,
    pub tree_type: TreeType,
}

/// Snapshot of a state tree's pubkeys as fetched from the indexer.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct TreeInfo {
    pub tree: Pubkey,
    pub queue: Pubkey,
    pub tree_type: TreeType,
    pub cpi_context: Option<Pubkey>,
    pub next_tree_info: Option<NextTreeInfo>,
}

impl TreeInfo {
    /// Queue new outputs go to. A rolled-over tree keeps serving reads but
    /// appends must target its successor's queue.
    pub fn output_queue(&self) -> Pubkey {
        self.next_tree_info
            .as_ref()
            .map(|next| next.queue)
            .unwrap_or(self.queue)
    }
}

/// Proof context for one compressed account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountProofInput {
    pub hash: [u8; 32],
    pub tree_info: Option<TreeInfo>,
    pub leaf_index: u32,
    pub root_index: u16,
    pub prove_by_index: bool,
}

/// Validity proof plus the per-account context it covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidityProofWithContext {
    pub proof: ValidityProof,
    pub accounts: Vec<AccountProofInput>,
}

/// Tree metadata with pubkeys replaced by account-table indices.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct PackedStateTreeInfo {
    pub root_index: u16,
    pub prove_by_index: bool,
    pub merkle_tree_pubkey_index: u8,
    pub queue_pubkey_index: u8,
    pub leaf_index: u32,
}

/// What a proved account refers to, for cpi context requirements.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AccountKind {
    Token,
    Program,
}

impl ValidityProofWithContext {
    /// Packs each account's tree and queue into the reference table and
    /// returns the indexed tree infos, one per input account.
    pub fn pack_tree_infos(
        &self,
        accounts: &mut PackedAccounts,
    ) -> Result<Vec<PackedStateTreeInfo>> {
        self.accounts
            .iter()
            .enumerate()
            .map(|(i, account)| {
                let tree_info = account
                    .tree_info
                    .as_ref()
                    .ok_or(PackError::MissingTreeInfo(i))?;
                Ok(PackedStateTreeInfo {
                    root_index: account.root_index,
                    prove_by_index: account.prove_by_index,
                    merkle_tree_pubkey_index: accounts.insert_or_get(tree_info.tree),
                    queue_pubkey_index: accounts.insert_or_get(tree_info.output_queue()),
                    leaf_index: account.leaf_index,
                })
            })
            .collect()
    }

    /// Like [`Self::pack_tree_infos`] for instructions that mix token
    /// accounts with generic program accounts. Mixing kinds forces the
    /// instruction through the cpi context account, which must then be
    /// present in the tree info.
    pub fn pack_with_cpi_context(
        &self,
        kinds: &[AccountKind],
        accounts: &mut PackedAccounts,
    ) -> Result<Vec<PackedStateTreeInfo>> {
        let has_token = kinds.iter().any(|kind| *kind == AccountKind::Token);
        let has_program = kinds.iter().any(|kind| *kind == AccountKind::Program);
        if has_token && has_program {
            let cpi_context_present = self
                .accounts
                .iter()
                .filter_map(|account| account.tree_info.as_ref())
                .any(|tree_info| tree_info.cpi_context.is_some());
            if !cpi_context_present {
                return Err(PackError::NoCpiContext);
            }
        }
        self.pack_tree_infos(accounts)
    }
}
