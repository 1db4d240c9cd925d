pub mod amounts;
pub mod extensions;
pub mod mint_action;
pub mod transfer2;

/// Single-byte instruction discriminators. Fixed table, append only.
pub mod discriminators {
    pub const TRANSFER: u8 = 3;
    pub const APPROVE: u8 = 4;
    pub const REVOKE: u8 = 5;
    pub const MINT_TO: u8 = 7;
    pub const BURN: u8 = 8;
    pub const CLOSE: u8 = 9;
    pub const FREEZE: u8 = 10;
    pub const THAW: u8 = 11;
    pub const TRANSFER_CHECKED: u8 = 12;
    pub const MINT_TO_CHECKED: u8 = 14;
    pub const BURN_CHECKED: u8 = 15;
    pub const CREATE_TOKEN_ACCOUNT: u8 = 18;
    pub const CREATE_ATA: u8 = 100;
    pub const TRANSFER2: u8 = 101;
    pub const CREATE_ATA_IDEMPOTENT: u8 = 102;
    pub const MINT_ACTION: u8 = 103;
}
