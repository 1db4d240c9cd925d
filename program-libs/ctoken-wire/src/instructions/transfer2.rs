//! Batch transfer instruction. One payload covers plain transfers,
//! compression, decompression and compress-and-close, each expressed through
//! packed `u8` indices into the instruction's account list.

use crate::{
    codec::{Reader, WireDecode, WireEncode, Writer},
    error::{CTokenWireError, Result},
    instructions::{discriminators, extensions::ExtensionInstructionData},
    proof::CompressedProof,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    Compress,
    Decompress,
    /// Compresses the full balance of a token account and closes it.
    /// Signer must be the owner or the rent authority; rent authority
    /// closes require the compressible extension. Not supported for SPL
    /// token accounts.
    CompressAndClose,
}

impl CompressionMode {
    pub fn to_u8(self) -> u8 {
        match self {
            Self::Compress => 0,
            Self::Decompress => 1,
            Self::CompressAndClose => 2,
        }
    }

    pub fn from_u8(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Compress),
            1 => Ok(Self::Decompress),
            2 => Ok(Self::CompressAndClose),
            other => Err(CTokenWireError::UnknownVariant(other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Compression {
    pub mode: CompressionMode,
    pub amount: u64,
    pub mint: u8,
    pub source_or_recipient: u8,
    /// Index of the owner or delegate account.
    pub authority: u8,
    /// Pool account index for SPL compression and decompression,
    /// rent sponsor index for CompressAndClose.
    pub pool_account_index: u8,
    /// Pool index for SPL compression and decompression,
    /// compressed account index for CompressAndClose.
    pub pool_index: u8,
    /// Pool bump for SPL flavors, destination index for CompressAndClose.
    pub bump: u8,
    pub decimals: u8,
}

impl Compression {
    pub fn compress_spl(
        amount: u64,
        mint: u8,
        source: u8,
        authority: u8,
        pool_account_index: u8,
        pool_index: u8,
        bump: u8,
        decimals: u8,
    ) -> Self {
        Compression {
            mode: CompressionMode::Compress,
            amount,
            mint,
            source_or_recipient: source,
            authority,
            pool_account_index,
            pool_index,
            bump,
            decimals,
        }
    }

    /// Token pools do not participate when compressing from a token account,
    /// so the pool fields stay zero.
    pub fn compress_ctoken(amount: u64, mint: u8, source: u8, authority: u8) -> Self {
        Compression {
            mode: CompressionMode::Compress,
            amount,
            mint,
            source_or_recipient: source,
            authority,
            pool_account_index: 0,
            pool_index: 0,
            bump: 0,
            decimals: 0,
        }
    }

    pub fn decompress_spl(
        amount: u64,
        mint: u8,
        recipient: u8,
        pool_account_index: u8,
        pool_index: u8,
        bump: u8,
        decimals: u8,
    ) -> Self {
        Compression {
            mode: CompressionMode::Decompress,
            amount,
            mint,
            source_or_recipient: recipient,
            authority: 0,
            pool_account_index,
            pool_index,
            bump,
            decimals,
        }
    }

    pub fn decompress_ctoken(amount: u64, mint: u8, recipient: u8) -> Self {
        Compression {
            mode: CompressionMode::Decompress,
            amount,
            mint,
            source_or_recipient: recipient,
            authority: 0,
            pool_account_index: 0,
            pool_index: 0,
            bump: 0,
            decimals: 0,
        }
    }

    pub fn compress_and_close_ctoken(
        amount: u64,
        mint: u8,
        source: u8,
        authority: u8,
        rent_sponsor_index: u8,
        compressed_account_index: u8,
        destination_index: u8,
    ) -> Self {
        Compression {
            mode: CompressionMode::CompressAndClose,
            amount,
            mint,
            source_or_recipient: source,
            authority,
            pool_account_index: rent_sponsor_index,
            pool_index: compressed_account_index,
            bump: destination_index,
            decimals: 0,
        }
    }
}

impl WireEncode for Compression {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.mode.to_u8());
        writer.write_u64(self.amount);
        writer.write_u8(self.mint);
        writer.write_u8(self.source_or_recipient);
        writer.write_u8(self.authority);
        writer.write_u8(self.pool_account_index);
        writer.write_u8(self.pool_index);
        writer.write_u8(self.bump);
        writer.write_u8(self.decimals);
    }
}

impl WireDecode for Compression {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            mode: CompressionMode::from_u8(reader.read_u8()?)?,
            amount: reader.read_u64()?,
            mint: reader.read_u8()?,
            source_or_recipient: reader.read_u8()?,
            authority: reader.read_u8()?,
            pool_account_index: reader.read_u8()?,
            pool_index: reader.read_u8()?,
            bump: reader.read_u8()?,
            decimals: reader.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedMerkleContext {
    pub merkle_tree_pubkey_index: u8,
    pub queue_pubkey_index: u8,
    pub leaf_index: u32,
    pub prove_by_index: bool,
}

impl WireEncode for PackedMerkleContext {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.merkle_tree_pubkey_index);
        writer.write_u8(self.queue_pubkey_index);
        writer.write_u32(self.leaf_index);
        writer.write_bool(self.prove_by_index);
    }
}

impl WireDecode for PackedMerkleContext {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            merkle_tree_pubkey_index: reader.read_u8()?,
            queue_pubkey_index: reader.read_u8()?,
            leaf_index: reader.read_u32()?,
            prove_by_index: reader.read_bool()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MultiInputTokenDataWithContext {
    pub owner: u8,
    pub amount: u64,
    pub has_delegate: bool,
    pub delegate: u8,
    pub mint: u8,
    pub version: u8,
    pub merkle_context: PackedMerkleContext,
    pub root_index: u16,
}

impl WireEncode for MultiInputTokenDataWithContext {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.owner);
        writer.write_u64(self.amount);
        writer.write_bool(self.has_delegate);
        writer.write_u8(self.delegate);
        writer.write_u8(self.mint);
        writer.write_u8(self.version);
        self.merkle_context.encode(writer);
        writer.write_u16(self.root_index);
    }
}

impl WireDecode for MultiInputTokenDataWithContext {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            owner: reader.read_u8()?,
            amount: reader.read_u64()?,
            has_delegate: reader.read_bool()?,
            delegate: reader.read_u8()?,
            mint: reader.read_u8()?,
            version: reader.read_u8()?,
            merkle_context: PackedMerkleContext::decode(reader)?,
            root_index: reader.read_u16()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MultiTokenTransferOutputData {
    pub owner: u8,
    pub amount: u64,
    pub has_delegate: bool,
    pub delegate: u8,
    pub mint: u8,
    pub version: u8,
}

impl WireEncode for MultiTokenTransferOutputData {
    fn encode(&self, writer: &mut Writer) {
        writer.write_u8(self.owner);
        writer.write_u64(self.amount);
        writer.write_bool(self.has_delegate);
        writer.write_u8(self.delegate);
        writer.write_u8(self.mint);
        writer.write_u8(self.version);
    }
}

impl WireDecode for MultiTokenTransferOutputData {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            owner: reader.read_u8()?,
            amount: reader.read_u64()?,
            has_delegate: reader.read_bool()?,
            delegate: reader.read_u8()?,
            mint: reader.read_u8()?,
            version: reader.read_u8()?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CompressedCpiContext {
    /// Set by the invoking program to signal the cpi context should be set.
    pub set_context: bool,
    /// Set to clear the cpi context, it could hold unrelated data from a
    /// previous transaction.
    pub first_set_context: bool,
    /// Index of the cpi context account in the packed accounts.
    pub cpi_context_account_index: u8,
}

impl WireEncode for CompressedCpiContext {
    fn encode(&self, writer: &mut Writer) {
        writer.write_bool(self.set_context);
        writer.write_bool(self.first_set_context);
        writer.write_u8(self.cpi_context_account_index);
    }
}

impl WireDecode for CompressedCpiContext {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            set_context: reader.read_bool()?,
            first_set_context: reader.read_bool()?,
            cpi_context_account_index: reader.read_u8()?,
        })
    }
}

/// Instruction data of the batch transfer, discriminator first on the wire.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Transfer2InstructionData {
    pub with_transaction_hash: bool,
    pub with_lamports_change_account_merkle_tree_index: bool,
    pub lamports_change_account_merkle_tree_index: u8,
    pub lamports_change_account_owner_index: u8,
    pub output_queue: u8,
    /// Upper bound on rent top-ups paid by the fee payer, in lamports.
    pub max_top_up: u16,
    pub cpi_context: Option<CompressedCpiContext>,
    pub compressions: Option<Vec<Compression>>,
    pub proof: Option<CompressedProof>,
    pub in_token_data: Vec<MultiInputTokenDataWithContext>,
    pub out_token_data: Vec<MultiTokenTransferOutputData>,
    pub in_lamports: Option<Vec<u64>>,
    pub out_lamports: Option<Vec<u64>>,
    pub in_tlv: Option<Vec<Vec<ExtensionInstructionData>>>,
    pub out_tlv: Option<Vec<Vec<ExtensionInstructionData>>>,
}

impl Transfer2InstructionData {
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        writer.write_u8(discriminators::TRANSFER2);
        writer.write_bool(self.with_transaction_hash);
        writer.write_bool(self.with_lamports_change_account_merkle_tree_index);
        writer.write_u8(self.lamports_change_account_merkle_tree_index);
        writer.write_u8(self.lamports_change_account_owner_index);
        writer.write_u8(self.output_queue);
        writer.write_u16(self.max_top_up);
        self.cpi_context.encode(&mut writer);
        self.compressions.encode(&mut writer);
        self.proof.encode(&mut writer);
        self.in_token_data.encode(&mut writer);
        self.out_token_data.encode(&mut writer);
        self.in_lamports.encode(&mut writer);
        self.out_lamports.encode(&mut writer);
        self.in_tlv.encode(&mut writer);
        self.out_tlv.encode(&mut writer);
        writer.into_bytes()
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let mut reader = Reader::new(bytes);
        let offset = reader.offset();
        let discriminator = reader.read_u8()?;
        if discriminator != discriminators::TRANSFER2 {
            return Err(CTokenWireError::MalformedTag {
                offset,
                tag: discriminator,
            });
        }
        Ok(Self {
            with_transaction_hash: reader.read_bool()?,
            with_lamports_change_account_merkle_tree_index: reader.read_bool()?,
            lamports_change_account_merkle_tree_index: reader.read_u8()?,
            lamports_change_account_owner_index: reader.read_u8()?,
            output_queue: reader.read_u8()?,
            max_top_up: reader.read_u16()?,
            cpi_context: Option::decode(&mut reader)?,
            compressions: Option::decode(&mut reader)?,
            proof: Option::decode(&mut reader)?,
            in_token_data: Vec::decode(&mut reader)?,
            out_token_data: Vec::decode(&mut reader)?,
            in_lamports: Option::decode(&mut reader)?,
            out_lamports: Option::decode(&mut reader)?,
            in_tlv: Option::decode(&mut reader)?,
            out_tlv: Option::decode(&mut reader)?,
        })
    }
}
