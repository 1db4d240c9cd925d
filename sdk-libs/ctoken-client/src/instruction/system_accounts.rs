use light_ctoken_wire::constants::{
    ACCOUNT_COMPRESSION_AUTHORITY_PDA, ACCOUNT_COMPRESSION_PROGRAM_ID, LIGHT_SYSTEM_PROGRAM_ID,
    REGISTERED_PROGRAM_PDA, SYSTEM_PROGRAM_ID,
};
use solana_instruction::AccountMeta;
use solana_pubkey::Pubkey;

/// Configuration for the fixed system account block shared by packed
/// instructions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct SystemAccountMetaConfig {
    pub self_program: Pubkey,
    pub cpi_context: Option<Pubkey>,
}

impl SystemAccountMetaConfig {
    pub fn new(self_program: Pubkey) -> Self {
        Self {
            self_program,
            cpi_context: None,
        }
    }

    pub fn new_with_cpi_context(self_program: Pubkey, cpi_context: Pubkey) -> Self {
        Self {
            self_program,
            cpi_context: Some(cpi_context),
        }
    }
}

/// System accounts every packed instruction passes after the signers, in
/// fixed order. All read-only non-signers.
pub fn get_light_system_account_metas(config: SystemAccountMetaConfig) -> Vec<AccountMeta> {
    vec![
        AccountMeta::new_readonly(LIGHT_SYSTEM_PROGRAM_ID, false),
        AccountMeta::new_readonly(REGISTERED_PROGRAM_PDA, false),
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_AUTHORITY_PDA, false),
        AccountMeta::new_readonly(ACCOUNT_COMPRESSION_PROGRAM_ID, false),
        AccountMeta::new_readonly(config.self_program, false),
        AccountMeta::new_readonly(SYSTEM_PROGRAM_ID, false),
    ]
}

#[cfg(test)]
mod tests {
    use light_ctoken_wire::constants::LIGHT_TOKEN_PROGRAM_ID;

    use super::*;

    #[test]
    fn system_metas_are_readonly_and_ordered() {
        let metas = get_light_system_account_metas(SystemAccountMetaConfig::new(
            LIGHT_TOKEN_PROGRAM_ID,
        ));
        assert_eq!(metas.len(), 6);
        assert!(metas.iter().all(|meta| !meta.is_signer && !meta.is_writable));
        assert_eq!(metas[0].pubkey, LIGHT_SYSTEM_PROGRAM_ID);
        assert_eq!(metas[1].pubkey, REGISTERED_PROGRAM_PDA);
        assert_eq!(metas[2].pubkey, ACCOUNT_COMPRESSION_AUTHORITY_PDA);
        assert_eq!(metas[3].pubkey, ACCOUNT_COMPRESSION_PROGRAM_ID);
        assert_eq!(metas[4].pubkey, LIGHT_TOKEN_PROGRAM_ID);
        assert_eq!(metas[5].pubkey, SYSTEM_PROGRAM_ID);
    }
}
