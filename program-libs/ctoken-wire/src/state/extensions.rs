//! Account-state extension union.
//!
//! One discriminant byte per entry. Reserved slots decode to empty
//! placeholder variants so a walk over defined-but-unused types keeps the
//! stream in sync; discriminants above the reserved range fall back to an
//! opaque blob of the remaining bytes so newer onchain state still parses.

use crate::{
    codec::{Reader, WireDecode, WireEncode, Writer},
    error::Result,
    state::token_metadata::TokenMetadata,
};

/// Extension type discriminants. Fixed table, append only.
pub mod extension_type {
    pub const TOKEN_METADATA: u8 = 19;
    pub const TRANSFER_FEE: u8 = 29;
    pub const TRANSFER_HOOK: u8 = 30;
    pub const COMPRESSED_ONLY: u8 = 31;
    pub const COMPRESSIBLE: u8 = 32;

    /// First discriminant outside the reserved range.
    pub const RESERVED_LIMIT: u8 = 33;
}

/// Wire size of an extension payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtensionSize {
    Fixed(usize),
    Variable,
}

/// Payload size for every reserved discriminant. Returns `None` outside the
/// reserved range.
pub const fn extension_data_size(extension_type: u8) -> Option<ExtensionSize> {
    match extension_type {
        extension_type::TOKEN_METADATA | extension_type::COMPRESSIBLE => {
            Some(ExtensionSize::Variable)
        }
        extension_type::TRANSFER_FEE => Some(ExtensionSize::Fixed(8)),
        extension_type::TRANSFER_HOOK => Some(ExtensionSize::Fixed(1)),
        extension_type::COMPRESSED_ONLY => Some(ExtensionSize::Fixed(17)),
        0..=28 => Some(ExtensionSize::Fixed(0)),
        _ => None,
    }
}

/// Compression bookkeeping carried by accounts that exist only in their
/// compressed form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressedOnlyExtension {
    pub delegated_amount: u64,
    pub withheld_transfer_fee: u64,
    pub is_frozen: bool,
}

impl WireEncode for CompressedOnlyExtension {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u64(self.delegated_amount);
        writer.write_u64(self.withheld_transfer_fee);
        writer.write_bool(self.is_frozen);
    }
}

impl WireDecode for CompressedOnlyExtension {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            delegated_amount: reader.read_u64()?,
            withheld_transfer_fee: reader.read_u64()?,
            is_frozen: reader.read_bool()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RentConfig {
    pub min_rent: u16,
    pub full_compression_incentive: u16,
    pub rent_per_byte: u8,
    pub placeholder_bytes: [u8; 3],
}

impl WireEncode for RentConfig {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u16(self.min_rent);
        writer.write_u16(self.full_compression_incentive);
        writer.write_u8(self.rent_per_byte);
        writer.write_bytes(&self.placeholder_bytes);
    }
}

impl WireDecode for RentConfig {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            min_rent: reader.read_u16()?,
            full_compression_incentive: reader.read_u16()?,
            rent_per_byte: reader.read_u8()?,
            placeholder_bytes: reader.read_array()?,
        })
    }
}

/// Rent timing and authority data of a compressible account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressibleExtension {
    /// Version 0 is uninitialized, default is 1.
    pub version: u8,
    pub rent_authority: [u8; 32],
    pub rent_recipient: [u8; 32],
    pub last_claimed_slot: u64,
    pub write_top_up_lamports: u32,
    pub rent_config: RentConfig,
}

impl WireEncode for CompressibleExtension {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.version);
        writer.write_bytes(&self.rent_authority);
        writer.write_bytes(&self.rent_recipient);
        writer.write_u64(self.last_claimed_slot);
        writer.write_u32(self.write_top_up_lamports);
        self.rent_config.encode(writer);
    }
}

impl WireDecode for CompressibleExtension {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            version: reader.read_u8()?,
            rent_authority: reader.read_array()?,
            rent_recipient: reader.read_array()?,
            last_claimed_slot: reader.read_u64()?,
            write_top_up_lamports: reader.read_u32()?,
            rent_config: RentConfig::decode(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionStruct {
    Placeholder0,
    Placeholder1,
    Placeholder2,
    Placeholder3,
    Placeholder4,
    Placeholder5,
    Placeholder6,
    Placeholder7,
    Placeholder8,
    Placeholder9,
    Placeholder10,
    Placeholder11,
    Placeholder12,
    Placeholder13,
    Placeholder14,
    Placeholder15,
    Placeholder16,
    Placeholder17,
    Placeholder18,
    TokenMetadata(TokenMetadata),
    Placeholder20,
    Placeholder21,
    Placeholder22,
    Placeholder23,
    Placeholder24,
    Placeholder25,
    Placeholder26,
    Placeholder27,
    Placeholder28,
    /// Withheld transfer fee amount.
    TransferFee(u64),
    /// Transfer hook flag.
    TransferHook(u8),
    CompressedOnly(CompressedOnlyExtension),
    /// Account contains compressible timing data and rent authority.
    Compressible(CompressibleExtension),
    /// Discriminant outside the reserved range: the rest of the extension
    /// buffer, preserved opaquely.
    Unknown { extension_type: u8, data: Vec<u8> },
}

impl ExtensionStruct {
    pub fn extension_type(&self) -> u8 {
        match self {
            Self::Placeholder0 => 0,
            Self::Placeholder1 => 1,
            Self::Placeholder2 => 2,
            Self::Placeholder3 => 3,
            Self::Placeholder4 => 4,
            Self::Placeholder5 => 5,
            Self::Placeholder6 => 6,
            Self::Placeholder7 => 7,
            Self::Placeholder8 => 8,
            Self::Placeholder9 => 9,
            Self::Placeholder10 => 10,
            Self::Placeholder11 => 11,
            Self::Placeholder12 => 12,
            Self::Placeholder13 => 13,
            Self::Placeholder14 => 14,
            Self::Placeholder15 => 15,
            Self::Placeholder16 => 16,
            Self::Placeholder17 => 17,
            Self::Placeholder18 => 18,
            Self::TokenMetadata(_) => extension_type::TOKEN_METADATA,
            Self::Placeholder20 => 20,
            Self::Placeholder21 => 21,
            Self::Placeholder22 => 22,
            Self::Placeholder23 => 23,
            Self::Placeholder24 => 24,
            Self::Placeholder25 => 25,
            Self::Placeholder26 => 26,
            Self::Placeholder27 => 27,
            Self::Placeholder28 => 28,
            Self::TransferFee(_) => extension_type::TRANSFER_FEE,
            Self::TransferHook(_) => extension_type::TRANSFER_HOOK,
            Self::CompressedOnly(_) => extension_type::COMPRESSED_ONLY,
            Self::Compressible(_) => extension_type::COMPRESSIBLE,
            Self::Unknown { extension_type, .. } => *extension_type,
        }
    }

    fn placeholder(discriminant: u8) -> Self {
        match discriminant {
            0 => Self::Placeholder0,
            1 => Self::Placeholder1,
            2 => Self::Placeholder2,
            3 => Self::Placeholder3,
            4 => Self::Placeholder4,
            5 => Self::Placeholder5,
            6 => Self::Placeholder6,
            7 => Self::Placeholder7,
            8 => Self::Placeholder8,
            9 => Self::Placeholder9,
            10 => Self::Placeholder10,
            11 => Self::Placeholder11,
            12 => Self::Placeholder12,
            13 => Self::Placeholder13,
            14 => Self::Placeholder14,
            15 => Self::Placeholder15,
            16 => Self::Placeholder16,
            17 => Self::Placeholder17,
            18 => Self::Placeholder18,
            20 => Self::Placeholder20,
            21 => Self::Placeholder21,
            22 => Self::Placeholder22,
            23 => Self::Placeholder23,
            24 => Self::Placeholder24,
            25 => Self::Placeholder25,
            26 => Self::Placeholder26,
            27 => Self::Placeholder27,
            _ => Self::Placeholder28,
        }
    }
}

impl WireEncode for ExtensionStruct {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.extension_type());
        match self {
            Self::TokenMetadata(metadata) => metadata.encode(writer),
            Self::TransferFee(withheld) => writer.write_u64(*withheld),
            Self::TransferHook(flag) => writer.write_u8(*flag),
            Self::CompressedOnly(extension) => extension.encode(writer),
            Self::Compressible(extension) => extension.encode(writer),
            Self::Unknown { data, .. } => writer.write_bytes(data),
            _ => {}
        }
    }
}

impl WireDecode for ExtensionStruct {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let discriminant = reader.read_u8()?;
        match discriminant {
            extension_type::TOKEN_METADATA => {
                Ok(Self::TokenMetadata(TokenMetadata::decode(reader)?))
            }
            extension_type::TRANSFER_FEE => Ok(Self::TransferFee(reader.read_u64()?)),
            extension_type::TRANSFER_HOOK => Ok(Self::TransferHook(reader.read_u8()?)),
            extension_type::COMPRESSED_ONLY => {
                Ok(Self::CompressedOnly(CompressedOnlyExtension::decode(
                    reader,
                )?))
            }
            extension_type::COMPRESSIBLE => {
                Ok(Self::Compressible(CompressibleExtension::decode(reader)?))
            }
            // The size table decides between an empty reserved slot and an
            // opaque trailing blob, so payload lengths have one source.
            other => match extension_data_size(other) {
                Some(ExtensionSize::Fixed(0)) => Ok(Self::placeholder(other)),
                _ => Ok(Self::Unknown {
                    extension_type: other,
                    data: reader.read_bytes(reader.remaining())?.to_vec(),
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use solana_pubkey::Pubkey;

    use super::*;
    use crate::state::token_metadata::Metadata;

    #[test]
    fn size_table_matches_variant_payloads() {
        assert_eq!(extension_data_size(0), Some(ExtensionSize::Fixed(0)));
        assert_eq!(extension_data_size(19), Some(ExtensionSize::Variable));
        assert_eq!(extension_data_size(28), Some(ExtensionSize::Fixed(0)));
        assert_eq!(extension_data_size(29), Some(ExtensionSize::Fixed(8)));
        assert_eq!(extension_data_size(30), Some(ExtensionSize::Fixed(1)));
        assert_eq!(extension_data_size(31), Some(ExtensionSize::Fixed(17)));
        assert_eq!(extension_data_size(32), Some(ExtensionSize::Variable));
        assert_eq!(extension_data_size(33), None);

        let compressed_only = ExtensionStruct::CompressedOnly(CompressedOnlyExtension {
            delegated_amount: 1,
            withheld_transfer_fee: 2,
            is_frozen: true,
        });
        // One discriminant byte plus the fixed payload.
        assert_eq!(compressed_only.to_bytes().len(), 18);
    }

    #[test]
    fn placeholder_round_trip() {
        for discriminant in (0..=28u8).filter(|d| *d != 19) {
            let bytes = [discriminant];
            let decoded = ExtensionStruct::from_bytes(&bytes).unwrap();
            assert_eq!(decoded.extension_type(), discriminant);
            assert_eq!(decoded.to_bytes(), bytes);
        }
    }

    #[test]
    fn typed_variants_round_trip() {
        let variants = vec![
            ExtensionStruct::TokenMetadata(TokenMetadata {
                update_authority: Some(Pubkey::new_unique()),
                mint: Pubkey::new_unique(),
                metadata: Metadata {
                    name: b"Name".to_vec(),
                    symbol: b"N".to_vec(),
                    uri: b"uri".to_vec(),
                },
                additional_metadata: vec![],
            }),
            ExtensionStruct::TransferFee(12_345),
            ExtensionStruct::TransferHook(1),
            ExtensionStruct::Compressible(CompressibleExtension {
                version: 1,
                rent_authority: [3; 32],
                rent_recipient: [4; 32],
                last_claimed_slot: 432_000,
                write_top_up_lamports: 766,
                rent_config: RentConfig {
                    min_rent: 1220,
                    full_compression_incentive: 1000,
                    rent_per_byte: 10,
                    placeholder_bytes: [0; 3],
                },
            }),
        ];
        for variant in variants {
            let bytes = variant.to_bytes();
            assert_eq!(ExtensionStruct::from_bytes(&bytes).unwrap(), variant);
        }
    }

    #[test]
    fn decode_routing_follows_the_size_table() {
        for discriminant in 0..=u8::MAX {
            let bytes = [discriminant];
            let decoded = ExtensionStruct::from_bytes(&bytes);
            match extension_data_size(discriminant) {
                Some(ExtensionSize::Fixed(0)) => {
                    // Empty reserved slot, not an opaque blob.
                    let decoded = decoded.unwrap();
                    assert_eq!(decoded.extension_type(), discriminant);
                    assert!(!matches!(decoded, ExtensionStruct::Unknown { .. }));
                }
                None => {
                    assert_eq!(
                        decoded.unwrap(),
                        ExtensionStruct::Unknown {
                            extension_type: discriminant,
                            data: vec![],
                        }
                    );
                }
                // Typed payloads need more than the discriminant byte.
                Some(_) => assert!(decoded.is_err()),
            }
        }
    }

    #[test]
    fn unknown_discriminant_consumes_remaining_bytes() {
        let bytes = [40, 1, 2, 3, 4];
        let decoded = ExtensionStruct::from_bytes(&bytes).unwrap();
        assert_eq!(
            decoded,
            ExtensionStruct::Unknown {
                extension_type: 40,
                data: vec![1, 2, 3, 4],
            }
        );
        assert_eq!(decoded.to_bytes(), bytes);
    }
}
