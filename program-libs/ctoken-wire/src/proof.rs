use crate::{
    codec::{Reader, WireDecode, WireEncode, Writer},
    error::{CTokenWireError, Result},
};

/// Groth16 proof in compressed form: 32-byte a, 64-byte b, 32-byte c.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompressedProof {
    pub a: [u8; 32],
    pub b: [u8; 64],
    pub c: [u8; 32],
}

impl Default for CompressedProof {
    fn default() -> Self {
        Self {
            a: [0; 32],
            b: [0; 64],
            c: [0; 32],
        }
    }
}

impl CompressedProof {
    /// Builds a proof from raw slices, validating component lengths before
    /// any bytes are copied.
    pub fn from_slices(a: &[u8], b: &[u8], c: &[u8]) -> Result<Self> {
        fn component<const N: usize>(name: &'static str, bytes: &[u8]) -> Result<[u8; N]> {
            let array: [u8; N] =
                bytes
                    .try_into()
                    .map_err(|_| CTokenWireError::InvalidProofLength {
                        component: name,
                        expected: N,
                        actual: bytes.len(),
                    })?;
            Ok(array)
        }
        Ok(Self {
            a: component("a", a)?,
            b: component("b", b)?,
            c: component("c", c)?,
        })
    }
}

impl WireEncode for CompressedProof {
    fn encode(&self, writer: &mut Writer) {
        writer.write_bytes(&self.a);
        writer.write_bytes(&self.b);
        writer.write_bytes(&self.c);
    }
}

impl WireDecode for CompressedProof {
    fn decode(reader: &mut Reader<'_>) -> Result<Self> {
        Ok(Self {
            a: reader.read_array()?,
            b: reader.read_array()?,
            c: reader.read_array()?,
        })
    }
}

/// Validity proof as returned by the prover. `None` means every referenced
/// account is proven by index and no zk proof is needed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ValidityProof(pub Option<CompressedProof>);

impl ValidityProof {
    pub fn new(proof: Option<CompressedProof>) -> Self {
        Self(proof)
    }
}

impl From<Option<CompressedProof>> for ValidityProof {
    fn from(proof: Option<CompressedProof>) -> Self {
        Self(proof)
    }
}

impl From<ValidityProof> for Option<CompressedProof> {
    fn from(proof: ValidityProof) -> Self {
        proof.0
    }
}
