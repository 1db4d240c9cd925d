//! Fixed-size instruction payloads shared with the SPL token surface.
//!
//! Amount instructions (transfer, approve, mint_to, burn) are
//! `[discriminator, amount: u64]`. Checked variants append the mint decimals.
//! Revoke, close, freeze and thaw are a bare discriminator byte. All of them
//! accept an optional trailing `max_top_up: u16` that callers set when the
//! instruction should top up the rent of a compressible token account;
//! absent means no trailing bytes at all, so legacy payloads stay valid.

use crate::{
    codec::{Reader, Writer},
    error::Result,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountInstructionData {
    pub discriminator: u8,
    pub amount: u64,
    pub max_top_up: Option<u16>,
}

impl AmountInstructionData {
    pub fn new(discriminator: u8, amount: u64) -> Self {
        Self {
            discriminator,
            amount,
            max_top_up: None,
        }
    }

    pub fn with_max_top_up(mut self, max_top_up: u16) -> Self {
        self.max_top_up = Some(max_top_up);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(11);
        writer.write_u8(self.discriminator);
        writer.write_u64(self.amount);
        write_trailing_top_up(&mut writer, self.max_top_up);
        writer.into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let data = Self {
            discriminator: reader.read_u8()?,
            amount: reader.read_u64()?,
            max_top_up: read_trailing_top_up(&mut reader)?,
        };
        Ok(data)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckedInstructionData {
    pub discriminator: u8,
    pub amount: u64,
    pub decimals: u8,
    pub max_top_up: Option<u16>,
}

impl CheckedInstructionData {
    pub fn new(discriminator: u8, amount: u64, decimals: u8) -> Self {
        Self {
            discriminator,
            amount,
            decimals,
            max_top_up: None,
        }
    }

    pub fn with_max_top_up(mut self, max_top_up: u16) -> Self {
        self.max_top_up = Some(max_top_up);
        self
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(12);
        writer.write_u8(self.discriminator);
        writer.write_u64(self.amount);
        writer.write_u8(self.decimals);
        write_trailing_top_up(&mut writer, self.max_top_up);
        writer.into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let data = Self {
            discriminator: reader.read_u8()?,
            amount: reader.read_u64()?,
            decimals: reader.read_u8()?,
            max_top_up: read_trailing_top_up(&mut reader)?,
        };
        Ok(data)
    }
}

/// Payload for revoke, close, freeze and thaw.
pub fn discriminator_only(discriminator: u8) -> Vec<u8> {
    vec![discriminator]
}

fn write_trailing_top_up(writer: &mut Writer, max_top_up: Option<u16>) {
    if let Some(value) = max_top_up {
        writer.write_u16(value);
    }
}

fn read_trailing_top_up(reader: &mut Reader<'_>) -> Result<Option<u16>> {
    if reader.is_empty() {
        Ok(None)
    } else {
        Ok(Some(reader.read_u16()?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instructions::discriminators;

    #[test]
    fn amount_payload_is_nine_bytes() {
        let data = AmountInstructionData::new(discriminators::TRANSFER, 12_345);
        let bytes = data.to_bytes();
        assert_eq!(bytes.len(), 9);
        assert_eq!(bytes[0], 3);
        assert_eq!(AmountInstructionData::from_bytes(&bytes).unwrap(), data);
    }

    #[test]
    fn checked_payload_is_ten_bytes() {
        let data = CheckedInstructionData::new(discriminators::BURN_CHECKED, u64::MAX, 9);
        let bytes = data.to_bytes();
        assert_eq!(bytes.len(), 10);
        assert_eq!(bytes[0], 15);
        assert_eq!(bytes[9], 9);
        assert_eq!(CheckedInstructionData::from_bytes(&bytes).unwrap(), data);
    }

    #[test]
    fn max_top_up_is_two_trailing_bytes() {
        let data = AmountInstructionData::new(discriminators::APPROVE, 1).with_max_top_up(500);
        let bytes = data.to_bytes();
        assert_eq!(bytes.len(), 11);
        assert_eq!(&bytes[9..], &500u16.to_le_bytes());
        let decoded = AmountInstructionData::from_bytes(&bytes).unwrap();
        assert_eq!(decoded.max_top_up, Some(500));
    }

    #[test]
    fn missing_trailing_bytes_decode_to_none() {
        let decoded =
            AmountInstructionData::from_bytes(&AmountInstructionData::new(7, 42).to_bytes())
                .unwrap();
        assert_eq!(decoded.max_top_up, None);
    }

    #[test]
    fn discriminator_only_is_one_byte() {
        assert_eq!(discriminator_only(discriminators::REVOKE), vec![5]);
        assert_eq!(discriminator_only(discriminators::THAW), vec![11]);
    }
}
