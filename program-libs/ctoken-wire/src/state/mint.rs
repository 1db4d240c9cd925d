//! Decompressed mint account codec. The account is an spl mint (82 bytes,
//! coption authorities) followed by a 34 byte mint context and an optional
//! extensions vector.

use solana_pubkey::Pubkey;

use crate::{
    codec::{Reader, WireDecode, WireEncode, Writer},
    constants::SPL_MINT_SIZE,
    error::{CTokenWireError, Result},
    instructions::{
        extensions::{ExtensionInstructionData, TokenMetadataInstructionData},
        mint_action::CompressedMintInstructionData,
    },
    state::{extensions::ExtensionStruct, token_metadata::TokenMetadata},
};

/// SPL-compatible mint fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BaseMint {
    /// Absent means fixed supply, nothing further can be minted.
    pub mint_authority: Option<Pubkey>,
    pub supply: u64,
    pub decimals: u8,
    pub is_initialized: bool,
    pub freeze_authority: Option<Pubkey>,
}

/// Protocol-specific context appended to the spl mint layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressedMintMetadata {
    pub version: u8,
    /// True once an spl mint has been created for this compressed mint.
    pub spl_mint_initialized: bool,
    /// Pda with seed address of the compressed mint.
    pub mint: Pubkey,
}

impl WireEncode for CompressedMintMetadata {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.version);
        writer.write_bool(self.spl_mint_initialized);
        writer.write_pubkey(&self.mint);
    }
}

impl WireDecode for CompressedMintMetadata {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            version: reader.read_u8()?,
            spl_mint_initialized: reader.read_bool()?,
            mint: reader.read_pubkey()?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompressedMint {
    pub base: BaseMint,
    pub metadata: CompressedMintMetadata,
    pub extensions: Option<Vec<ExtensionStruct>>,
}

impl CompressedMint {
    /// Decodes a decompressed mint account.
    pub fn from_account_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let base = BaseMint {
            mint_authority: reader.read_coption_pubkey()?,
            supply: reader.read_u64()?,
            decimals: reader.read_u8()?,
            is_initialized: reader.read_bool()?,
            freeze_authority: reader.read_coption_pubkey()?,
        };
        debug_assert_eq!(reader.offset(), SPL_MINT_SIZE);
        let metadata = CompressedMintMetadata::decode(&mut reader)?;
        let extensions = Option::decode(&mut reader)?;
        Ok(Self {
            base,
            metadata,
            extensions,
        })
    }

    /// Empty extension vectors encode as absent so the account bytes have a
    /// single canonical form.
    pub fn to_account_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::with_capacity(SPL_MINT_SIZE + 34 + 1);
        writer.write_coption_pubkey(self.base.mint_authority.as_ref());
        writer.write_u64(self.base.supply);
        writer.write_u8(self.base.decimals);
        writer.write_bool(self.base.is_initialized);
        writer.write_coption_pubkey(self.base.freeze_authority.as_ref());
        self.metadata.encode(&mut writer);
        match self.extensions.as_deref() {
            None | Some([]) => None::<Vec<ExtensionStruct>>.encode(&mut writer),
            Some(extensions) => Some(extensions.to_vec()).encode(&mut writer),
        }
        writer.into_bytes()
    }
}

impl TryFrom<CompressedMint> for CompressedMintInstructionData {
    type Error = CTokenWireError;

    fn try_from(mint: CompressedMint) -> Result<Self> {
        let version = mint.metadata.version;
        let extensions = mint
            .extensions
            .map(|extensions| {
                extensions
                    .into_iter()
                    .map(|extension| match extension {
                        ExtensionStruct::TokenMetadata(metadata) => {
                            Ok(ExtensionInstructionData::TokenMetadata(
                                TokenMetadataInstructionData {
                                    update_authority: metadata.update_authority,
                                    metadata: metadata.metadata,
                                    additional_metadata: Some(metadata.additional_metadata),
                                    version,
                                },
                            ))
                        }
                        other => Err(CTokenWireError::UnknownVariant(other.extension_type())),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(Self {
            supply: mint.base.supply,
            decimals: mint.base.decimals,
            metadata: mint.metadata,
            mint_authority: mint.base.mint_authority,
            freeze_authority: mint.base.freeze_authority,
            extensions,
        })
    }
}

impl TryFrom<CompressedMintInstructionData> for CompressedMint {
    type Error = CTokenWireError;

    fn try_from(data: CompressedMintInstructionData) -> Result<Self> {
        let mint = data.metadata.mint;
        let extensions = data
            .extensions
            .map(|extensions| {
                extensions
                    .into_iter()
                    .map(|extension| match extension {
                        ExtensionInstructionData::TokenMetadata(metadata) => {
                            Ok(ExtensionStruct::TokenMetadata(TokenMetadata {
                                update_authority: metadata.update_authority,
                                mint,
                                metadata: metadata.metadata,
                                additional_metadata: metadata
                                    .additional_metadata
                                    .unwrap_or_default(),
                            }))
                        }
                        other => Err(CTokenWireError::UnknownVariant(other.extension_type())),
                    })
                    .collect::<Result<Vec<_>>>()
            })
            .transpose()?;

        Ok(Self {
            base: BaseMint {
                mint_authority: data.mint_authority,
                supply: data.supply,
                decimals: data.decimals,
                // Always true for compressed mints.
                is_initialized: true,
                freeze_authority: data.freeze_authority,
            },
            metadata: data.metadata,
            extensions,
        })
    }
}
