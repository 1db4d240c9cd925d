//! Batch mint management instruction. A single payload creates a compressed
//! mint, mints to compressed or decompressed recipients, rotates authorities,
//! edits metadata and moves the mint between its compressed and decompressed
//! representations.

use solana_pubkey::Pubkey;

use crate::{
    codec::{Reader, WireDecode, WireEncode, Writer},
    error::{CTokenWireError, Result},
    instructions::{discriminators, extensions::ExtensionInstructionData},
    proof::CompressedProof,
    state::mint::CompressedMintMetadata,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipient {
    pub recipient: Pubkey,
    pub amount: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintToCompressedAction {
    pub token_account_version: u8,
    pub recipients: Vec<Recipient>,
}

/// `None` revokes the authority, `Some(key)` sets a new one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateAuthority {
    pub new_authority: Option<Pubkey>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateSplMintAction {
    pub mint_bump: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressedRecipient {
    /// Index of the recipient token account in the packed accounts.
    pub account_index: u8,
    pub amount: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MintToDecompressedAction {
    pub recipient: DecompressedRecipient,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateMetadataFieldAction {
    /// Index of the metadata extension in the extensions vector.
    pub extension_index: u8,
    /// 0 name, 1 symbol, 2 uri, 3 custom key.
    pub field_type: u8,
    /// Empty for name, symbol and uri.
    pub key: Vec<u8>,
    pub value: Vec<u8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateMetadataAuthorityAction {
    pub extension_index: u8,
    /// All zero bytes revoke the authority.
    pub new_authority: Pubkey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoveMetadataKeyAction {
    pub extension_index: u8,
    pub key: Vec<u8>,
    /// Nonzero: do not error when the key does not exist.
    pub idempotent: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecompressMintAction {
    /// Prepaid rent in epochs for the decompressed mint account.
    pub rent_payment: u16,
    pub write_top_up: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressAndCloseMintAction {
    /// Nonzero: encoding while already compressed is a no-op.
    pub idempotent: u8,
}

/// Mint action union, one discriminant byte on the wire. Append only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    MintToCompressed(MintToCompressedAction),
    UpdateMintAuthority(UpdateAuthority),
    UpdateFreezeAuthority(UpdateAuthority),
    /// Create an spl mint for a compressed mint. Existing supply is minted to
    /// a token pool account, authorities move to the program cpi pda.
    CreateSplMint(CreateSplMintAction),
    /// Mint to an onchain token account without compressing.
    MintToDecompressed(MintToDecompressedAction),
    UpdateMetadataField(UpdateMetadataFieldAction),
    UpdateMetadataAuthority(UpdateMetadataAuthorityAction),
    RemoveMetadataKey(RemoveMetadataKeyAction),
    /// Move the mint into its decompressed account representation.
    Decompress(DecompressMintAction),
    /// Compress the decompressed mint account and close it.
    CompressAndClose(CompressAndCloseMintAction),
}

impl Action {
    pub fn discriminant(&self) -> u8 {
        match self {
            Self::MintToCompressed(_) => 0,
            Self::UpdateMintAuthority(_) => 1,
            Self::UpdateFreezeAuthority(_) => 2,
            Self::CreateSplMint(_) => 3,
            Self::MintToDecompressed(_) => 4,
            Self::UpdateMetadataField(_) => 5,
            Self::UpdateMetadataAuthority(_) => 6,
            Self::RemoveMetadataKey(_) => 7,
            Self::Decompress(_) => 8,
            Self::CompressAndClose(_) => 9,
        }
    }

    pub fn updates_authority(&self) -> bool {
        matches!(
            self,
            Self::UpdateMintAuthority(_)
                | Self::UpdateFreezeAuthority(_)
                | Self::UpdateMetadataAuthority(_)
        )
    }
}

impl WireEncode for Recipient {
    fn encode(&self, writer: &mut Writer) {
        writer.write_pubkey(&self.recipient);
        writer.write_u64(self.amount);
    }
}

impl WireDecode for Recipient {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            recipient: reader.read_pubkey()?,
            amount: reader.read_u64()?,
        })
    }
}

impl WireEncode for Action {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.discriminant());
        match self {
            Self::MintToCompressed(action) => {
                writer.write_u8(action.token_account_version);
                action.recipients.encode(writer);
            }
            Self::UpdateMintAuthority(action) | Self::UpdateFreezeAuthority(action) => {
                action.new_authority.encode(writer);
            }
            Self::CreateSplMint(action) => writer.write_u8(action.mint_bump),
            Self::MintToDecompressed(action) => {
                writer.write_u8(action.recipient.account_index);
                writer.write_u64(action.recipient.amount);
            }
            Self::UpdateMetadataField(action) => {
                writer.write_u8(action.extension_index);
                writer.write_u8(action.field_type);
                action.key.encode(writer);
                action.value.encode(writer);
            }
            Self::UpdateMetadataAuthority(action) => {
                writer.write_u8(action.extension_index);
                writer.write_pubkey(&action.new_authority);
            }
            Self::RemoveMetadataKey(action) => {
                writer.write_u8(action.extension_index);
                action.key.encode(writer);
                writer.write_u8(action.idempotent);
            }
            Self::Decompress(action) => {
                writer.write_u16(action.rent_payment);
                writer.write_u32(action.write_top_up);
            }
            Self::CompressAndClose(action) => writer.write_u8(action.idempotent),
        }
    }
}

impl WireDecode for Action {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        match reader.read_u8()? {
            0 => Ok(Self::MintToCompressed(MintToCompressedAction {
                token_account_version: reader.read_u8()?,
                recipients: Vec::decode(reader)?,
            })),
            1 => Ok(Self::UpdateMintAuthority(UpdateAuthority {
                new_authority: Option::decode(reader)?,
            })),
            2 => Ok(Self::UpdateFreezeAuthority(UpdateAuthority {
                new_authority: Option::decode(reader)?,
            })),
            3 => Ok(Self::CreateSplMint(CreateSplMintAction {
                mint_bump: reader.read_u8()?,
            })),
            4 => Ok(Self::MintToDecompressed(MintToDecompressedAction {
                recipient: DecompressedRecipient {
                    account_index: reader.read_u8()?,
                    amount: reader.read_u64()?,
                },
            })),
            5 => Ok(Self::UpdateMetadataField(UpdateMetadataFieldAction {
                extension_index: reader.read_u8()?,
                field_type: reader.read_u8()?,
                key: Vec::decode(reader)?,
                value: Vec::decode(reader)?,
            })),
            6 => Ok(Self::UpdateMetadataAuthority(
                UpdateMetadataAuthorityAction {
                    extension_index: reader.read_u8()?,
                    new_authority: reader.read_pubkey()?,
                },
            )),
            7 => Ok(Self::RemoveMetadataKey(RemoveMetadataKeyAction {
                extension_index: reader.read_u8()?,
                key: Vec::decode(reader)?,
                idempotent: reader.read_u8()?,
            })),
            8 => Ok(Self::Decompress(DecompressMintAction {
                rent_payment: reader.read_u16()?,
                write_top_up: reader.read_u32()?,
            })),
            9 => Ok(Self::CompressAndClose(CompressAndCloseMintAction {
                idempotent: reader.read_u8()?,
            })),
            other => Err(CTokenWireError::UnknownVariant(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CreateMint {
    pub mint_bump: u8,
    /// Placeholder for compressed mints in multiple address trees,
    /// currently zero.
    pub read_only_address_trees: [u8; 4],
    pub read_only_address_tree_root_indices: [u16; 4],
}

impl WireEncode for CreateMint {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.mint_bump);
        writer.write_bytes(&self.read_only_address_trees);
        for root_index in &self.read_only_address_tree_root_indices {
            writer.write_u16(*root_index);
        }
    }
}

impl WireDecode for CreateMint {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        let mint_bump = reader.read_u8()?;
        let read_only_address_trees = reader.read_array::<4>()?;
        let mut read_only_address_tree_root_indices = [0u16; 4];
        for root_index in &mut read_only_address_tree_root_indices {
            *root_index = reader.read_u16()?;
        }
        Ok(Self {
            mint_bump,
            read_only_address_trees,
            read_only_address_tree_root_indices,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CpiContext {
    pub set_context: bool,
    pub first_set_context: bool,
    /// Address tree index when creating a mint.
    pub in_tree_index: u8,
    pub in_queue_index: u8,
    pub out_queue_index: u8,
    pub token_out_queue_index: u8,
    /// Index of the compressed account assigned the new address,
    /// 0 is the mint.
    pub assigned_account_index: u8,
}

impl WireEncode for CpiContext {
    fn encode(&self, writer: &mut Writer) {
        writer.write_bool(self.set_context);
        writer.write_bool(self.first_set_context);
        writer.write_u8(self.in_tree_index);
        writer.write_u8(self.in_queue_index);
        writer.write_u8(self.out_queue_index);
        writer.write_u8(self.token_out_queue_index);
        writer.write_u8(self.assigned_account_index);
    }
}

impl WireDecode for CpiContext {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            set_context: reader.read_bool()?,
            first_set_context: reader.read_bool()?,
            in_tree_index: reader.read_u8()?,
            in_queue_index: reader.read_u8()?,
            out_queue_index: reader.read_u8()?,
            token_out_queue_index: reader.read_u8()?,
            assigned_account_index: reader.read_u8()?,
        })
    }
}

/// Compressed mint state as carried in instruction data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedMintInstructionData {
    pub supply: u64,
    pub decimals: u8,
    pub metadata: CompressedMintMetadata,
    /// Absent means fixed supply, nothing further can be minted.
    pub mint_authority: Option<Pubkey>,
    pub freeze_authority: Option<Pubkey>,
    pub extensions: Option<Vec<ExtensionInstructionData>>,
}

impl WireEncode for CompressedMintInstructionData {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u64(self.supply);
        writer.write_u8(self.decimals);
        self.metadata.encode(writer);
        self.mint_authority.encode(writer);
        self.freeze_authority.encode(writer);
        self.extensions.encode(writer);
    }
}

impl WireDecode for CompressedMintInstructionData {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            supply: reader.read_u64()?,
            decimals: reader.read_u8()?,
            metadata: CompressedMintMetadata::decode(reader)?,
            mint_authority: Option::decode(reader)?,
            freeze_authority: Option::decode(reader)?,
            extensions: Option::decode(reader)?,
        })
    }
}

/// Compressed mint bundled with its merkle context, the caller-facing input
/// to the mint action builders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedMintWithContext {
    pub leaf_index: u32,
    pub prove_by_index: bool,
    pub root_index: u16,
    pub address: [u8; 32],
    pub mint: CompressedMintInstructionData,
}

/// Instruction data of the mint action batch, discriminator first on the
/// wire. `mint` is `None` when the mint currently lives in its decompressed
/// account, whose state the program reads onchain; the snapshot and the
/// validity proof only travel with the compressed representation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MintActionInstructionData {
    pub leaf_index: u32,
    pub prove_by_index: bool,
    /// Address proof root when creating, validity proof root otherwise.
    pub root_index: u16,
    /// Derived from the associated spl mint pubkey.
    pub compressed_address: [u8; 32],
    pub token_pool_bump: u8,
    pub token_pool_index: u8,
    pub create_mint: Option<CreateMint>,
    pub actions: Vec<Action>,
    pub proof: Option<CompressedProof>,
    pub cpi_context: Option<CpiContext>,
    pub mint: Option<CompressedMintInstructionData>,
}

impl MintActionInstructionData {
    /// Instruction data for an existing compressed mint.
    pub fn new(mint_with_context: CompressedMintWithContext, proof: Option<CompressedProof>) -> Self {
        Self {
            leaf_index: mint_with_context.leaf_index,
            prove_by_index: mint_with_context.prove_by_index,
            root_index: mint_with_context.root_index,
            compressed_address: mint_with_context.address,
            token_pool_bump: 0,
            token_pool_index: 0,
            create_mint: None,
            actions: Vec::new(),
            proof,
            cpi_context: None,
            mint: Some(mint_with_context.mint),
        }
    }

    /// Instruction data for a mint in its decompressed representation. No
    /// snapshot and no validity proof travel on the wire.
    pub fn new_decompressed(compressed_address: [u8; 32]) -> Self {
        Self {
            leaf_index: 0,
            prove_by_index: false,
            root_index: 0,
            compressed_address,
            token_pool_bump: 0,
            token_pool_index: 0,
            create_mint: None,
            actions: Vec::new(),
            proof: None,
            cpi_context: None,
            mint: None,
        }
    }

    /// Instruction data creating a new compressed mint. The proof is
    /// required, it proves the address does not exist yet.
    pub fn new_mint(
        compressed_address: [u8; 32],
        root_index: u16,
        proof: CompressedProof,
        mint: CompressedMintInstructionData,
        create_mint: CreateMint,
    ) -> Self {
        Self {
            leaf_index: 0,
            prove_by_index: false,
            root_index,
            compressed_address,
            token_pool_bump: 0,
            token_pool_index: 0,
            create_mint: Some(create_mint),
            actions: Vec::new(),
            proof: Some(proof),
            cpi_context: None,
            mint: Some(mint),
        }
    }

    pub fn with_actions(mut self, actions: Vec<Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn with_cpi_context(mut self, cpi_context: CpiContext) -> Self {
        self.cpi_context = Some(cpi_context);
        self
    }

    /// Authority rotations on the compressed representation need the validity
    /// proof; the decompressed account is checked onchain instead.
    pub fn validate(&self) -> Result<()> {
        if self.mint.is_some()
            && self.proof.is_none()
            && self.actions.iter().any(Action::updates_authority)
        {
            return Err(CTokenWireError::MissingProof);
        }
        Ok(())
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        self.validate()?;
        let mut writer = Writer::new();
        writer.write_u8(discriminators::MINT_ACTION);
        writer.write_u32(self.leaf_index);
        writer.write_bool(self.prove_by_index);
        writer.write_u16(self.root_index);
        writer.write_bytes(&self.compressed_address);
        writer.write_u8(self.token_pool_bump);
        writer.write_u8(self.token_pool_index);
        self.create_mint.encode(&mut writer);
        self.actions.encode(&mut writer);
        self.proof.encode(&mut writer);
        self.cpi_context.encode(&mut writer);
        self.mint.encode(&mut writer);
        Ok(writer.into_bytes())
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let offset = reader.offset();
        let discriminator = reader.read_u8()?;
        if discriminator != discriminators::MINT_ACTION {
            return Err(CTokenWireError::MalformedTag {
                offset,
                tag: discriminator,
            });
        }
        Ok(Self {
            leaf_index: reader.read_u32()?,
            prove_by_index: reader.read_bool()?,
            root_index: reader.read_u16()?,
            compressed_address: reader.read_array()?,
            token_pool_bump: reader.read_u8()?,
            token_pool_index: reader.read_u8()?,
            create_mint: Option::decode(&mut reader)?,
            actions: Vec::decode(&mut reader)?,
            proof: Option::decode(&mut reader)?,
            cpi_context: Option::decode(&mut reader)?,
            mint: Option::decode(&mut reader)?,
        })
    }
}
