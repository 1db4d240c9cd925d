//! Builders for the SPL-compatible instruction surface.
//!
//! These instructions act on decompressed token accounts and keep the SPL
//! token account tables, extended with an optional rent top-up. When
//! `max_top_up` is set the authority funds the top-up and therefore must be
//! writable, unless a dedicated fee payer is appended.

use light_ctoken_wire::{
    constants::{LIGHT_TOKEN_PROGRAM_ID, SYSTEM_PROGRAM_ID},
    instructions::{
        amounts::{discriminator_only, AmountInstructionData, CheckedInstructionData},
        discriminators,
    },
};
use solana_instruction::{AccountMeta, Instruction};
use solana_pubkey::Pubkey;

use crate::error::{PackError, Result};

/// Rent top-up parameters shared by the amount-carrying builders.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct TopUpConfig {
    pub max_top_up: Option<u16>,
    pub fee_payer: Option<Pubkey>,
}

impl TopUpConfig {
    pub fn new(max_top_up: u16) -> Self {
        Self {
            max_top_up: Some(max_top_up),
            fee_payer: None,
        }
    }

    pub fn with_fee_payer(mut self, fee_payer: Pubkey) -> Self {
        self.fee_payer = Some(fee_payer);
        self
    }
}

fn check_amount(amount: u64) -> Result<()> {
    if amount == 0 {
        return Err(PackError::ZeroAmount);
    }
    Ok(())
}

/// The authority pays the top-up out of its own lamports unless a fee payer
/// is given, so it must then sign as writable.
fn authority_meta(authority: Pubkey, top_up: &TopUpConfig) -> AccountMeta {
    if top_up.max_top_up.is_some() && top_up.fee_payer.is_none() {
        AccountMeta::new(authority, true)
    } else {
        AccountMeta::new_readonly(authority, true)
    }
}

fn append_fee_payer(accounts: &mut Vec<AccountMeta>, top_up: &TopUpConfig) {
    if let Some(fee_payer) = top_up.fee_payer {
        accounts.push(AccountMeta::new(fee_payer, true));
    }
}

fn amount_data(discriminator: u8, amount: u64, top_up: &TopUpConfig) -> Vec<u8> {
    let mut data = AmountInstructionData::new(discriminator, amount);
    if let Some(max_top_up) = top_up.max_top_up {
        data = data.with_max_top_up(max_top_up);
    }
    data.to_bytes()
}

fn checked_data(discriminator: u8, amount: u64, decimals: u8, top_up: &TopUpConfig) -> Vec<u8> {
    let mut data = CheckedInstructionData::new(discriminator, amount, decimals);
    if let Some(max_top_up) = top_up.max_top_up {
        data = data.with_max_top_up(max_top_up);
    }
    data.to_bytes()
}

pub fn create_transfer_instruction(
    source: Pubkey,
    destination: Pubkey,
    authority: Pubkey,
    amount: u64,
    top_up: TopUpConfig,
) -> Result<Instruction> {
    check_amount(amount)?;
    let mut accounts = vec![
        AccountMeta::new(source, false),
        AccountMeta::new(destination, false),
        authority_meta(authority, &top_up),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];
    append_fee_payer(&mut accounts, &top_up);
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts,
        data: amount_data(discriminators::TRANSFER, amount, &top_up),
    })
}

pub fn create_transfer_checked_instruction(
    source: Pubkey,
    mint: Pubkey,
    destination: Pubkey,
    authority: Pubkey,
    amount: u64,
    decimals: u8,
    top_up: TopUpConfig,
) -> Result<Instruction> {
    check_amount(amount)?;
    let mut accounts = vec![
        AccountMeta::new(source, false),
        AccountMeta::new_readonly(mint, false),
        AccountMeta::new(destination, false),
        authority_meta(authority, &top_up),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ];
    append_fee_payer(&mut accounts, &top_up);
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts,
        data: checked_data(discriminators::TRANSFER_CHECKED, amount, decimals, &top_up),
    })
}

pub fn create_mint_to_instruction(
    mint: Pubkey,
    destination: Pubkey,
    authority: Pubkey,
    amount: u64,
    top_up: TopUpConfig,
) -> Result<Instruction> {
    check_amount(amount)?;
    let mut accounts = vec![
        AccountMeta::new(mint, false),
        AccountMeta::new(destination, false),
        authority_meta(authority, &top_up),
    ];
    append_fee_payer(&mut accounts, &top_up);
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts,
        data: amount_data(discriminators::MINT_TO, amount, &top_up),
    })
}

pub fn create_mint_to_checked_instruction(
    mint: Pubkey,
    destination: Pubkey,
    authority: Pubkey,
    amount: u64,
    decimals: u8,
    top_up: TopUpConfig,
) -> Result<Instruction> {
    check_amount(amount)?;
    let mut accounts = vec![
        AccountMeta::new(mint, false),
        AccountMeta::new(destination, false),
        authority_meta(authority, &top_up),
    ];
    append_fee_payer(&mut accounts, &top_up);
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts,
        data: checked_data(discriminators::MINT_TO_CHECKED, amount, decimals, &top_up),
    })
}

pub fn create_burn_instruction(
    source: Pubkey,
    mint: Pubkey,
    authority: Pubkey,
    amount: u64,
    top_up: TopUpConfig,
) -> Result<Instruction> {
    check_amount(amount)?;
    let mut accounts = vec![
        AccountMeta::new(source, false),
        AccountMeta::new(mint, false),
        authority_meta(authority, &top_up),
    ];
    append_fee_payer(&mut accounts, &top_up);
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts,
        data: amount_data(discriminators::BURN, amount, &top_up),
    })
}

pub fn create_burn_checked_instruction(
    source: Pubkey,
    mint: Pubkey,
    authority: Pubkey,
    amount: u64,
    decimals: u8,
    top_up: TopUpConfig,
) -> Result<Instruction> {
    check_amount(amount)?;
    let mut accounts = vec![
        AccountMeta::new(source, false),
        AccountMeta::new(mint, false),
        authority_meta(authority, &top_up),
    ];
    append_fee_payer(&mut accounts, &top_up);
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts,
        data: checked_data(discriminators::BURN_CHECKED, amount, decimals, &top_up),
    })
}

pub fn create_approve_instruction(
    source: Pubkey,
    delegate: Pubkey,
    owner: Pubkey,
    amount: u64,
    top_up: TopUpConfig,
) -> Result<Instruction> {
    check_amount(amount)?;
    let mut accounts = vec![
        AccountMeta::new(source, false),
        AccountMeta::new_readonly(delegate, false),
        authority_meta(owner, &top_up),
    ];
    append_fee_payer(&mut accounts, &top_up);
    Ok(Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts,
        data: amount_data(discriminators::APPROVE, amount, &top_up),
    })
}

pub fn create_revoke_instruction(source: Pubkey, owner: Pubkey) -> Instruction {
    Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(source, false),
            AccountMeta::new_readonly(owner, true),
        ],
        data: discriminator_only(discriminators::REVOKE),
    }
}

pub fn create_close_account_instruction(
    source: Pubkey,
    destination: Pubkey,
    owner: Pubkey,
) -> Instruction {
    Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(source, false),
            AccountMeta::new(destination, false),
            AccountMeta::new_readonly(owner, true),
        ],
        data: discriminator_only(discriminators::CLOSE),
    }
}

pub fn create_freeze_account_instruction(
    source: Pubkey,
    mint: Pubkey,
    freeze_authority: Pubkey,
) -> Instruction {
    Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(source, false),
            AccountMeta::new_readonly(mint, false),
            AccountMeta::new_readonly(freeze_authority, true),
        ],
        data: discriminator_only(discriminators::FREEZE),
    }
}

pub fn create_thaw_account_instruction(
    source: Pubkey,
    mint: Pubkey,
    freeze_authority: Pubkey,
) -> Instruction {
    Instruction {
        program_id: LIGHT_TOKEN_PROGRAM_ID,
        accounts: vec![
            AccountMeta::new(source, false),
            AccountMeta::new_readonly(mint, false),
            AccountMeta::new_readonly(freeze_authority, true),
        ],
        data: discriminator_only(discriminators::THAW),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transfer_account_table() {
        let source = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let ix = create_transfer_instruction(
            source,
            destination,
            authority,
            100,
            TopUpConfig::default(),
        )
        .unwrap();

        assert_eq!(ix.program_id, LIGHT_TOKEN_PROGRAM_ID);
        assert_eq!(ix.accounts.len(), 4);
        assert_eq!(ix.accounts[0].pubkey, source);
        assert!(ix.accounts[0].is_writable && !ix.accounts[0].is_signer);
        assert_eq!(ix.accounts[1].pubkey, destination);
        assert!(ix.accounts[1].is_writable);
        assert_eq!(ix.accounts[2].pubkey, authority);
        assert!(ix.accounts[2].is_signer && !ix.accounts[2].is_writable);
        assert_eq!(ix.accounts[3].pubkey, SYSTEM_PROGRAM_ID);
        assert_eq!(ix.data.len(), 9);
        assert_eq!(ix.data[0], 3);
    }

    #[test]
    fn max_top_up_makes_authority_writable() {
        let ix = create_transfer_instruction(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            100,
            TopUpConfig::new(1000),
        )
        .unwrap();
        assert!(ix.accounts[2].is_signer && ix.accounts[2].is_writable);
        assert_eq!(ix.accounts.len(), 4);
        assert_eq!(ix.data.len(), 11);
        assert_eq!(&ix.data[9..], &1000u16.to_le_bytes());
    }

    #[test]
    fn fee_payer_keeps_authority_readonly() {
        let fee_payer = Pubkey::new_unique();
        let ix = create_transfer_instruction(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            100,
            TopUpConfig::new(1000).with_fee_payer(fee_payer),
        )
        .unwrap();
        assert!(ix.accounts[2].is_signer && !ix.accounts[2].is_writable);
        let last = ix.accounts.last().unwrap();
        assert_eq!(last.pubkey, fee_payer);
        assert!(last.is_signer && last.is_writable);
        assert_eq!(ix.accounts.len(), 5);
    }

    #[test]
    fn zero_amount_is_rejected() {
        let err = create_mint_to_instruction(
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            0,
            TopUpConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err, PackError::ZeroAmount);
    }

    #[test]
    fn mint_to_has_three_accounts_and_no_system_program() {
        let mint = Pubkey::new_unique();
        let destination = Pubkey::new_unique();
        let authority = Pubkey::new_unique();
        let ix =
            create_mint_to_instruction(mint, destination, authority, 5, TopUpConfig::default())
                .unwrap();
        assert_eq!(ix.accounts.len(), 3);
        assert_eq!(ix.accounts[0].pubkey, mint);
        assert!(ix.accounts[0].is_writable);
        assert_eq!(ix.accounts[1].pubkey, destination);
        assert_eq!(ix.accounts[2].pubkey, authority);
        assert_eq!(ix.data[0], 7);
    }

    #[test]
    fn transfer_checked_carries_mint_and_decimals() {
        let mint = Pubkey::new_unique();
        let ix = create_transfer_checked_instruction(
            Pubkey::new_unique(),
            mint,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            77,
            6,
            TopUpConfig::default(),
        )
        .unwrap();
        assert_eq!(ix.accounts.len(), 5);
        assert_eq!(ix.accounts[1].pubkey, mint);
        assert!(!ix.accounts[1].is_writable);
        assert_eq!(ix.data.len(), 10);
        assert_eq!(ix.data[0], 12);
        assert_eq!(ix.data[9], 6);
    }

    #[test]
    fn burn_writes_source_and_mint() {
        let source = Pubkey::new_unique();
        let mint = Pubkey::new_unique();
        let ix = create_burn_instruction(
            source,
            mint,
            Pubkey::new_unique(),
            1,
            TopUpConfig::default(),
        )
        .unwrap();
        assert_eq!(ix.accounts.len(), 3);
        assert!(ix.accounts[0].is_writable);
        assert!(ix.accounts[1].is_writable);
        assert_eq!(ix.data[0], 8);
    }

    #[test]
    fn discriminator_only_builders() {
        let source = Pubkey::new_unique();
        let owner = Pubkey::new_unique();
        let mint = Pubkey::new_unique();

        let revoke = create_revoke_instruction(source, owner);
        assert_eq!(revoke.data, vec![5]);
        assert_eq!(revoke.accounts.len(), 2);
        assert!(revoke.accounts[1].is_signer);

        let close = create_close_account_instruction(source, Pubkey::new_unique(), owner);
        assert_eq!(close.data, vec![9]);
        assert_eq!(close.accounts.len(), 3);

        let freeze = create_freeze_account_instruction(source, mint, owner);
        assert_eq!(freeze.data, vec![10]);
        assert_eq!(freeze.accounts[1].pubkey, mint);

        let thaw = create_thaw_account_instruction(source, mint, owner);
        assert_eq!(thaw.data, vec![11]);
    }

    #[test]
    fn approve_has_readonly_delegate() {
        let delegate = Pubkey::new_unique();
        let ix = create_approve_instruction(
            Pubkey::new_unique(),
            delegate,
            Pubkey::new_unique(),
            9,
            TopUpConfig::default(),
        )
        .unwrap();
        assert_eq!(ix.accounts[1].pubkey, delegate);
        assert!(!ix.accounts[1].is_writable && !ix.accounts[1].is_signer);
        assert_eq!(ix.data[0], 4);
    }
}
