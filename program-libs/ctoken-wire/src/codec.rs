//! Bounds-checked little-endian cursor codec.
//!
//! All multi-byte integers are little endian. Composite conventions match the
//! on-chain (borsh) layouts: `Option<T>` is one presence byte in `{0, 1}`
//! followed by the payload, `Vec<T>` is a `u32` element count followed by the
//! elements, enums are one discriminant byte followed by the variant fields.

use solana_pubkey::Pubkey;

use crate::error::{CTokenWireError, Result};

/// Read cursor over an immutable byte slice. Every read is bounds checked and
/// advances the offset; failed reads leave the offset at the failure point so
/// errors report where the input ran out.
#[derive(Debug)]
pub struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take(&mut self, needed: usize) -> Result<&'a [u8]> {
        let remaining = self.remaining();
        if remaining < needed {
            return Err(CTokenWireError::TruncatedInput {
                offset: self.offset,
                needed,
                remaining,
            });
        }
        let slice = &self.data[self.offset..self.offset + needed];
        self.offset += needed;
        Ok(slice)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16(&mut self) -> Result<u16> {
        let bytes = self.take(2)?;
        Ok(u16::from_le_bytes([bytes[0], bytes[1]]))
    }

    pub fn read_u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    pub fn read_u64(&mut self) -> Result<u64> {
        let mut array = [0u8; 8];
        array.copy_from_slice(self.take(8)?);
        Ok(u64::from_le_bytes(array))
    }

    pub fn read_bool(&mut self) -> Result<bool> {
        let offset = self.offset;
        match self.read_u8()? {
            0 => Ok(false),
            1 => Ok(true),
            tag => Err(CTokenWireError::MalformedTag { offset, tag }),
        }
    }

    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8]> {
        self.take(len)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N]> {
        let mut array = [0u8; N];
        array.copy_from_slice(self.take(N)?);
        Ok(array)
    }

    pub fn read_pubkey(&mut self) -> Result<Pubkey> {
        Ok(Pubkey::new_from_array(self.read_array::<32>()?))
    }

    pub fn read_option<T>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<T>,
    ) -> Result<Option<T>> {
        if self.read_bool()? {
            Ok(Some(f(self)?))
        } else {
            Ok(None)
        }
    }

    pub fn read_vec<T>(&mut self, mut f: impl FnMut(&mut Self) -> Result<T>) -> Result<Vec<T>> {
        let len = self.read_u32()? as usize;
        // An adversarial length cannot reserve more memory than the input
        // could actually hold.
        let mut items = Vec::with_capacity(len.min(self.remaining()));
        for _ in 0..len {
            items.push(f(self)?);
        }
        Ok(items)
    }

    /// SPL token account layouts use a 4-byte little-endian presence tag and
    /// always reserve the 32-byte field, zero filled when absent.
    pub fn read_coption_pubkey(&mut self) -> Result<Option<Pubkey>> {
        let offset = self.offset;
        let tag = self.read_u32()?;
        let key = self.read_pubkey()?;
        match tag {
            0 => Ok(None),
            1 => Ok(Some(key)),
            // The error field is one byte; wider tag values saturate so a
            // nonzero high byte is not reported as a zero tag.
            _ => Err(CTokenWireError::MalformedTag {
                offset,
                tag: u8::try_from(tag).unwrap_or(u8::MAX),
            }),
        }
    }
}

/// Growable write buffer mirroring [`Reader`]. Writes cannot fail; layout
/// validation happens before encoding starts.
#[derive(Debug, Default)]
pub struct Writer {
    buf: Vec<u8>,
}

impl Writer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.buf
    }

    pub fn write_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub fn write_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_u64(&mut self, value: u64) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    pub fn write_bool(&mut self, value: bool) {
        self.buf.push(value as u8);
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    pub fn write_pubkey(&mut self, key: &Pubkey) {
        self.buf.extend_from_slice(key.as_ref());
    }

    pub fn write_option<T>(&mut self, value: Option<&T>, f: impl FnOnce(&mut Self, &T)) {
        match value {
            Some(inner) => {
                self.write_u8(1);
                f(self, inner);
            }
            None => self.write_u8(0),
        }
    }

    pub fn write_vec<T>(&mut self, items: &[T], mut f: impl FnMut(&mut Self, &T)) {
        self.write_u32(items.len() as u32);
        for item in items {
            f(self, item);
        }
    }

    pub fn write_coption_pubkey(&mut self, value: Option<&Pubkey>) {
        match value {
            Some(key) => {
                self.write_u32(1);
                self.write_pubkey(key);
            }
            None => {
                self.write_u32(0);
                self.write_bytes(&[0u8; 32]);
            }
        }
    }
}

pub trait WireEncode {
    fn encode(&self, writer: &mut Writer);

    fn to_bytes(&self) -> Vec<u8> {
        let mut writer = Writer::new();
        self.encode(&mut writer);
        writer.into_bytes()
    }
}

pub trait WireDecode: Sized {
    fn decode(reader: &mut Reader<'_>) -> Result<Self>;

    fn from_bytes(bytes: &[u8]) -> Result<Self> {
        Self::decode(&mut Reader::new(bytes))
    }
}

macro_rules! impl_wire_int {
    ($ty:ty, $read:ident, $write:ident) => {
        impl WireEncode for $ty {
            fn encode(&self, writer: &mut Writer) {
                writer.$write(*self);
            }
        }

        impl WireDecode for $ty {
            fn decode(reader: &mut Reader<'_>) -> Result<Self> {
                reader.$read()
            }
        }
    };
}

impl_wire_int!(u8, read_u8, write_u8);
impl_wire_int!(u16, read_u16, write_u16);
impl_wire_int!(u32, read_u32, write_u32);
impl_wire_int!(u64, read_u64, write_u64);
impl_wire_int!(bool, read_bool, write_bool);

impl WireEncode for Pubkey {
    fn encode(&self, writer: &mut Writer) {
        writer.write_pubkey(self);
    }
}

impl WireDecode for Pubkey {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_pubkey()
    }
}

impl<const N: usize> WireEncode for [u8; N] {
    fn encode(&self, writer: &mut Writer) {
        writer.write_bytes(self);
    }
}

impl<const N: usize> WireDecode for [u8; N] {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_array::<N>()
    }
}

impl<T: WireEncode> WireEncode for Option<T> {
    fn encode(&self, writer: &mut Writer) {
        writer.write_option(self.as_ref(), |w, inner| inner.encode(w));
    }
}

impl<T: WireDecode> WireDecode for Option<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_option(T::decode)
    }
}

impl<T: WireEncode> WireEncode for Vec<T> {
    fn encode(&self, writer: &mut Writer) {
        writer.write_vec(self, |w, item| item.encode(w));
    }
}

impl<T: WireDecode> WireDecode for Vec<T> {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        reader.read_vec(T::decode)
    }
}
