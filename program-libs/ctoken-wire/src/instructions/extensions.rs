//! Instruction-side extension TLV payloads.
//!
//! These share the discriminant space of the account-state extensions but
//! carry the data an instruction needs rather than the persisted form: the
//! compressed-only entry holds packed account indices for associated token
//! account decompression, the compressible entry holds rent prepayment
//! parameters. The client only produces the defined variants, so decoding
//! fails closed on anything else.

use solana_pubkey::Pubkey;

use crate::{
    codec::{Reader, WireDecode, WireEncode, Writer},
    config::ProtocolConfig,
    error::{CTokenWireError, Result},
    state::extensions::extension_type,
    state::token_metadata::{AdditionalMetadata, Metadata},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadataInstructionData {
    pub update_authority: Option<Pubkey>,
    pub metadata: Metadata,
    pub additional_metadata: Option<Vec<AdditionalMetadata>>,
    pub version: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressedOnlyInstructionData {
    pub delegated_amount: u64,
    pub withheld_transfer_fee: u64,
    pub is_frozen: bool,
    /// Index into the compressions vector this account settles against.
    pub compression_index: u8,
    /// When set the owner is an associated token account address and the
    /// signer check moves to the wallet at `owner_index`.
    pub is_ata: bool,
    pub bump: u8,
    pub owner_index: u8,
}

/// Derivation of the compressed owner for program-owned token accounts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressToPubkey {
    pub bump: u8,
    pub program_id: [u8; 32],
    pub seeds: Vec<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressibleInstructionData {
    pub token_account_version: u8,
    /// Prepaid rent in epochs.
    pub rent_payment: u16,
    pub compression_only: u8,
    pub write_top_up: u32,
    pub compress_to_pubkey: Option<CompressToPubkey>,
}

impl CompressibleInstructionData {
    pub fn validate(&self, config: &ProtocolConfig) -> Result<()> {
        if self.rent_payment < config.min_rent_epochs {
            return Err(CTokenWireError::RentBelowMinimum {
                epochs: self.rent_payment,
                minimum: config.min_rent_epochs,
            });
        }
        Ok(())
    }
}

/// Payload of the create-associated-token-account instructions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateAtaInstructionData {
    pub bump: u8,
    pub compressible_config: Option<CompressibleInstructionData>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionInstructionData {
    TokenMetadata(TokenMetadataInstructionData),
    CompressedOnly(CompressedOnlyInstructionData),
    Compressible(CompressibleInstructionData),
}

impl ExtensionInstructionData {
    pub fn extension_type(&self) -> u8 {
        match self {
            Self::TokenMetadata(_) => extension_type::TOKEN_METADATA,
            Self::CompressedOnly(_) => extension_type::COMPRESSED_ONLY,
            Self::Compressible(_) => extension_type::COMPRESSIBLE,
        }
    }
}

impl WireEncode for TokenMetadataInstructionData {
    fn encode(&self, writer: &mut Writer) {
        self.update_authority.encode(writer);
        self.metadata.encode(writer);
        self.additional_metadata.encode(writer);
        writer.write_u8(self.version);
    }
}

impl WireDecode for TokenMetadataInstructionData {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            update_authority: Option::decode(reader)?,
            metadata: Metadata::decode(reader)?,
            additional_metadata: Option::decode(reader)?,
            version: reader.read_u8()?,
        })
    }
}

impl WireEncode for CompressedOnlyInstructionData {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u64(self.delegated_amount);
        writer.write_u64(self.withheld_transfer_fee);
        writer.write_bool(self.is_frozen);
        writer.write_u8(self.compression_index);
        writer.write_bool(self.is_ata);
        writer.write_u8(self.bump);
        writer.write_u8(self.owner_index);
    }
}

impl WireDecode for CompressedOnlyInstructionData {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            delegated_amount: reader.read_u64()?,
            withheld_transfer_fee: reader.read_u64()?,
            is_frozen: reader.read_bool()?,
            compression_index: reader.read_u8()?,
            is_ata: reader.read_bool()?,
            bump: reader.read_u8()?,
            owner_index: reader.read_u8()?,
        })
    }
}

impl WireEncode for CompressToPubkey {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.bump);
        writer.write_bytes(&self.program_id);
        self.seeds.encode(writer);
    }
}

impl WireDecode for CompressToPubkey {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            bump: reader.read_u8()?,
            program_id: reader.read_array()?,
            seeds: Vec::decode(reader)?,
        })
    }
}

impl WireEncode for CompressibleInstructionData {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.token_account_version);
        writer.write_u16(self.rent_payment);
        writer.write_u8(self.compression_only);
        writer.write_u32(self.write_top_up);
        self.compress_to_pubkey.encode(writer);
    }
}

impl WireDecode for CompressibleInstructionData {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            token_account_version: reader.read_u8()?,
            rent_payment: reader.read_u16()?,
            compression_only: reader.read_u8()?,
            write_top_up: reader.read_u32()?,
            compress_to_pubkey: Option::decode(reader)?,
        })
    }
}

impl WireEncode for CreateAtaInstructionData {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.bump);
        self.compressible_config.encode(writer);
    }
}

impl WireDecode for CreateAtaInstructionData {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            bump: reader.read_u8()?,
            compressible_config: Option::decode(reader)?,
        })
    }
}

impl WireEncode for ExtensionInstructionData {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.extension_type());
        match self {
            Self::TokenMetadata(data) => data.encode(writer),
            Self::CompressedOnly(data) => data.encode(writer),
            Self::Compressible(data) => data.encode(writer),
        }
    }
}

impl WireDecode for ExtensionInstructionData {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            extension_type::TOKEN_METADATA => {
                Ok(Self::TokenMetadata(TokenMetadataInstructionData::decode(
                    reader,
                )?))
            }
            extension_type::COMPRESSED_ONLY => Ok(Self::CompressedOnly(
                CompressedOnlyInstructionData::decode(reader)?,
            )),
            extension_type::COMPRESSIBLE => Ok(Self::Compressible(
                CompressibleInstructionData::decode(reader)?,
            )),
            other => Err(CTokenWireError::UnknownVariant(other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn compressed_only_round_trip() {
        let data = ExtensionInstructionData::CompressedOnly(CompressedOnlyInstructionData {
            delegated_amount: 77,
            withheld_transfer_fee: 0,
            is_frozen: false,
            compression_index: 1,
            is_ata: true,
            bump: 254,
            owner_index: 3,
        });
        let bytes = data.to_bytes();
        assert_eq!(bytes[0], 31);
        assert_eq!(ExtensionInstructionData::from_bytes(&bytes).unwrap(), data);
    }

    #[test]
    fn compressible_round_trip_with_seeds() {
        let data = ExtensionInstructionData::Compressible(CompressibleInstructionData {
            token_account_version: 3,
            rent_payment: 2,
            compression_only: 1,
            write_top_up: 1000,
            compress_to_pubkey: Some(CompressToPubkey {
                bump: 255,
                program_id: [7; 32],
                seeds: vec![b"vault".to_vec(), vec![0, 1, 2]],
            }),
        });
        let bytes = data.to_bytes();
        assert_eq!(bytes[0], 32);
        assert_eq!(ExtensionInstructionData::from_bytes(&bytes).unwrap(), data);
    }

    #[test]
    fn rent_payment_below_floor_is_rejected() {
        let config = ProtocolConfig::default();
        let data = CompressibleInstructionData {
            token_account_version: 3,
            rent_payment: 1,
            compression_only: 0,
            write_top_up: 0,
            compress_to_pubkey: None,
        };
        assert_eq!(
            data.validate(&config).unwrap_err(),
            CTokenWireError::RentBelowMinimum {
                epochs: 1,
                minimum: 2,
            }
        );
        let ok = CompressibleInstructionData {
            rent_payment: 2,
            ..data
        };
        assert!(ok.validate(&config).is_ok());
    }

    #[test]
    fn unknown_extension_type_fails_closed() {
        assert_eq!(
            ExtensionInstructionData::from_bytes(&[29, 0, 0]).unwrap_err(),
            CTokenWireError::UnknownVariant(29)
        );
    }

    #[test]
    fn create_ata_round_trip() {
        let data = CreateAtaInstructionData {
            bump: 251,
            compressible_config: Some(CompressibleInstructionData {
                token_account_version: 3,
                rent_payment: 2,
                compression_only: 1,
                write_top_up: 766,
                compress_to_pubkey: None,
            }),
        };
        let bytes = data.to_bytes();
        assert_eq!(CreateAtaInstructionData::from_bytes(&bytes).unwrap(), data);

        let bare = CreateAtaInstructionData {
            bump: 0,
            compressible_config: None,
        };
        assert_eq!(bare.to_bytes(), vec![0, 0]);
    }
}
