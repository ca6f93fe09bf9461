//! Transport form of frames.
//!
//! A bundle is `proof ++ coeffs` for one chunk. The proof carries no length
//! prefix since its size is fixed; the coefficients are self-describing.
//! Several bundles travel together as
//! `[bundle_count: u32]([bundle_length: u32][bundle])*`.

use crate::frame::{split_serialized_frame_coeffs, Frame, FrameCoeffs};
use crate::proof::{
    deserialize_proof, serialize_proof, split_serialized_proofs, SERIALIZED_PROOF_LENGTH,
};
use crate::ser::{write_len, ByteReader, SerError, SerKind, SerResult};

/// Concatenates a serialized proof with serialized coefficients.
pub fn build_bundle(proof_bytes: &[u8], coeff_bytes: &[u8]) -> SerResult<Vec<u8>> {
    if proof_bytes.len() != SERIALIZED_PROOF_LENGTH {
        return Err(SerError::invalid_length(SerKind::Bundle, "proof"));
    }
    let mut out = Vec::with_capacity(proof_bytes.len() + coeff_bytes.len());
    out.extend_from_slice(proof_bytes);
    out.extend_from_slice(coeff_bytes);
    Ok(out)
}

pub fn parse_bundle(bytes: &[u8]) -> SerResult<Frame> {
    let mut reader = ByteReader::new(bytes, SerKind::Bundle);
    let proof = deserialize_proof(reader.read_exact(SERIALIZED_PROOF_LENGTH, "proof")?)?;
    let coeff_bytes = &bytes[reader.position()..];
    let (coeffs, consumed) = FrameCoeffs::deserialize(coeff_bytes)?;
    if consumed != coeff_bytes.len() {
        return Err(SerError::trailing_bytes(
            SerKind::Bundle,
            SERIALIZED_PROOF_LENGTH + consumed,
            coeff_bytes.len() - consumed,
        ));
    }
    Ok(Frame::new(proof, coeffs))
}

/// Interleaves concatenated proofs with a serialized frame slice into one
/// bundle per chunk.
pub fn build_bundles(proofs: &[u8], frame_coeffs: &[u8]) -> SerResult<Vec<Vec<u8>>> {
    let proofs = split_serialized_proofs(proofs)?;
    let (coeffs, _) = split_serialized_frame_coeffs(frame_coeffs)?;
    if proofs.len() != coeffs.len() {
        return Err(SerError::invalid_length(SerKind::Bundle, "proof count"));
    }
    proofs
        .into_iter()
        .zip(coeffs)
        .map(|(proof, coeffs)| build_bundle(proof, coeffs))
        .collect()
}

impl Frame {
    pub fn to_bundle(&self) -> SerResult<Vec<u8>> {
        build_bundle(&serialize_proof(&self.proof), &self.coeffs.serialize()?)
    }
}

/// Packs whole bundles into one length-prefixed container.
pub fn serialize_bundles<B: AsRef<[u8]>>(bundles: &[B]) -> SerResult<Vec<u8>> {
    let size = 4 + bundles.iter().map(|b| 4 + b.as_ref().len()).sum::<usize>();
    let mut out = Vec::with_capacity(size);
    write_len(&mut out, bundles.len(), SerKind::BundleContainer, "bundle count")?;
    for bundle in bundles {
        let bundle = bundle.as_ref();
        write_len(&mut out, bundle.len(), SerKind::BundleContainer, "bundle length")?;
        out.extend_from_slice(bundle);
    }
    Ok(out)
}

/// Inverse of [`serialize_bundles`]; the pieces borrow from `bytes`.
pub fn split_bundles(bytes: &[u8]) -> SerResult<Vec<&[u8]>> {
    let mut reader = ByteReader::new(bytes, SerKind::BundleContainer);
    let count = reader.read_u32("bundle count")? as usize;
    let mut bundles = Vec::with_capacity(count.min(reader.remaining() / 4));
    for _ in 0..count {
        let len = reader.read_u32("bundle length")? as usize;
        bundles.push(reader.read_exact(len, "bundle")?);
    }
    reader.finish()?;
    Ok(bundles)
}
