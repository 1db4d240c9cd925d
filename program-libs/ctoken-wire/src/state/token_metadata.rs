use solana_pubkey::Pubkey;

use crate::{
    codec::{Reader, WireDecode, WireEncode, Writer},
    error::Result,
};

/// Core metadata fields, length-prefixed byte strings.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Metadata {
    pub name: Vec<u8>,
    pub symbol: Vec<u8>,
    pub uri: Vec<u8>,
}

impl WireEncode for Metadata {
    fn encode(&self, writer: &mut Writer) {
        self.name.encode(writer);
        self.symbol.encode(writer);
        self.uri.encode(writer);
    }
}

impl WireDecode for Metadata {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            name: Vec::decode(reader)?,
            symbol: Vec::decode(reader)?,
            uri: Vec::decode(reader)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalMetadata {
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

impl WireEncode for AdditionalMetadata {
    fn encode(&self, writer: &mut Writer) {
        self.key.encode(writer);
        self.value.encode(writer);
    }
}

impl WireDecode for AdditionalMetadata {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            key: Vec::decode(reader)?,
            value: Vec::decode(reader)?,
        })
    }
}

/// Token metadata extension as persisted in account state.
///
/// The update authority occupies a fixed 32-byte slot; all zero bytes mean no
/// authority, in both directions. An account explicitly owned by the all-zero
/// key is therefore not representable, which matches the onchain convention.
/// The minimum encoded size is 80 bytes (two keys plus four empty vectors).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub update_authority: Option<Pubkey>,
    pub mint: Pubkey,
    pub metadata: Metadata,
    pub additional_metadata: Vec<AdditionalMetadata>,
}

impl WireEncode for TokenMetadata {
    fn encode(&self, writer: &mut Writer) {
        writer.write_pubkey(&self.update_authority.unwrap_or_default());
        writer.write_pubkey(&self.mint);
        self.metadata.encode(writer);
        self.additional_metadata.encode(writer);
    }
}

impl WireDecode for TokenMetadata {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let update_authority = reader.read_pubkey()?;
        Ok(Self {
            update_authority: if update_authority == Pubkey::default() {
                None
            } else {
                Some(update_authority)
            },
            mint: reader.read_pubkey()?,
            metadata: Metadata::decode(reader)?,
            additional_metadata: Vec::decode(reader)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn minimal_encoding_is_80_bytes() {
        let metadata = TokenMetadata {
            update_authority: None,
            mint: Pubkey::new_unique(),
            metadata: Metadata::default(),
            additional_metadata: vec![],
        };
        let bytes = metadata.to_bytes();
        assert_eq!(bytes.len(), 80);
        assert_eq!(TokenMetadata::from_bytes(&bytes).unwrap(), metadata);
    }

    #[test]
    fn absent_authority_is_zero_filled_both_directions() {
        let metadata = TokenMetadata {
            update_authority: None,
            mint: Pubkey::new_unique(),
            metadata: Metadata {
                name: b"Token".to_vec(),
                symbol: b"TOK".to_vec(),
                uri: b"https://example.com/t.json".to_vec(),
            },
            additional_metadata: vec![],
        };
        let bytes = metadata.to_bytes();
        assert_eq!(&bytes[..32], &[0u8; 32]);

        // A caller-provided default key collapses to None on the round trip.
        let explicit_zero = TokenMetadata {
            update_authority: Some(Pubkey::default()),
            ..metadata.clone()
        };
        let decoded = TokenMetadata::from_bytes(&explicit_zero.to_bytes()).unwrap();
        assert_eq!(decoded.update_authority, None);
    }

    #[test]
    fn additional_metadata_round_trip() {
        let metadata = TokenMetadata {
            update_authority: Some(Pubkey::new_unique()),
            mint: Pubkey::new_unique(),
            metadata: Metadata {
                name: b"n".to_vec(),
                symbol: b"s".to_vec(),
                uri: b"u".to_vec(),
            },
            additional_metadata: vec![
                AdditionalMetadata {
                    key: b"k1".to_vec(),
                    value: b"v1".to_vec(),
                },
                AdditionalMetadata {
                    key: b"k2".to_vec(),
                    value: vec![],
                },
            ],
        };
        let decoded = TokenMetadata::from_bytes(&metadata.to_bytes()).unwrap();
        assert_eq!(decoded, metadata);
    }

    #[test]
    fn short_buffer_is_truncated_input() {
        let err = TokenMetadata::from_bytes(&[0u8; 79]).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CTokenWireError::TruncatedInput { .. }
        ));
    }
}
