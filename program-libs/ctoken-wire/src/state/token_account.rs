//! Compressed token account leaf codec.

use solana_pubkey::Pubkey;

use crate::{
    codec::{Reader, WireDecode, WireEncode, Writer},
    error::{CTokenWireError, Result},
    state::extensions::ExtensionStruct,
};

/// Token account data as stored in a state tree leaf.
///
/// The delegate occupies a tag byte plus a fixed 32-byte slot that is
/// consumed whether or not a delegate is set, zero filled when absent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenData {
    pub mint: Pubkey,
    pub owner: Pubkey,
    pub amount: u64,
    pub delegate: Option<Pubkey>,
    /// 0 initialized, 1 frozen.
    pub state: u8,
    pub tlv: Option<Vec<ExtensionStruct>>,
}

impl TokenData {
    /// Amount the delegate may spend. The compressed-only extension's
    /// delegated amount takes precedence; otherwise a set delegate delegates
    /// the full balance.
    pub fn delegated_amount(&self) -> u64 {
        if let Some(extensions) = self.tlv.as_deref() {
            for extension in extensions {
                if let ExtensionStruct::CompressedOnly(compressed_only) = extension {
                    return compressed_only.delegated_amount;
                }
            }
        }
        if self.delegate.is_some() {
            self.amount
        } else {
            0
        }
    }
}

impl WireEncode for TokenData {
    fn encode(&self, writer: &mut Writer) {
        writer.write_pubkey(&self.mint);
        writer.write_pubkey(&self.owner);
        writer.write_u64(self.amount);
        match self.delegate.as_ref() {
            Some(delegate) => {
                writer.write_u8(1);
                writer.write_pubkey(delegate);
            }
            None => {
                writer.write_u8(0);
                writer.write_bytes(&[0u8; 32]);
            }
        }
        writer.write_u8(self.state);
        self.tlv.encode(writer);
    }
}

impl WireDecode for TokenData {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let mint = reader.read_pubkey()?;
        let owner = reader.read_pubkey()?;
        let amount = reader.read_u64()?;
        let offset = reader.offset();
        let delegate_tag = reader.read_u8()?;
        let delegate_key = reader.read_pubkey()?;
        let delegate = match delegate_tag {
            0 => None,
            1 => Some(delegate_key),
            tag => return Err(CTokenWireError::MalformedTag { offset, tag }),
        };
        Ok(Self {
            mint,
            owner,
            amount,
            delegate,
            state: reader.read_u8()?,
            tlv: Option::decode(reader)?,
        })
    }
}
