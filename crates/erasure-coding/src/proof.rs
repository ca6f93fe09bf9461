//! Proof points in the 32-byte compressed form used across implementations:
//! the big-endian x coordinate, with the two most significant bits of the
//! first byte flagging which root y is, or the point at infinity.

use crate::ser::{SerError, SerKind, SerResult};
use ark_bn254::{Fq, G1Affine};
use ark_ec::AffineRepr;
use ark_ff::{BigInteger, PrimeField};

/// Size of one serialized proof.
pub const SERIALIZED_PROOF_LENGTH: usize = 32;

const MASK: u8 = 0b11 << 6;
const COMPRESSED_SMALLEST: u8 = 0b10 << 6;
const COMPRESSED_LARGEST: u8 = 0b11 << 6;
const COMPRESSED_INFINITY: u8 = 0b01 << 6;

pub fn serialize_proof(proof: &G1Affine) -> [u8; SERIALIZED_PROOF_LENGTH] {
    let mut out = [0u8; SERIALIZED_PROOF_LENGTH];
    if proof.is_zero() {
        out[0] = COMPRESSED_INFINITY;
        return out;
    }
    out.copy_from_slice(&proof.x.into_bigint().to_bytes_be());
    // x < q < 2^254, so the flag bits are free
    out[0] |= if proof.y > -proof.y {
        COMPRESSED_LARGEST
    } else {
        COMPRESSED_SMALLEST
    };
    out
}

pub fn deserialize_proof(bytes: &[u8]) -> SerResult<G1Affine> {
    let bytes: [u8; SERIALIZED_PROOF_LENGTH] = bytes
        .try_into()
        .map_err(|_| SerError::invalid_length(SerKind::Proof, "point"))?;

    let flag = bytes[0] & MASK;
    let mut x_bytes = bytes;
    x_bytes[0] &= !MASK;

    match flag {
        COMPRESSED_INFINITY if x_bytes.iter().all(|b| *b == 0) => Ok(G1Affine::identity()),
        COMPRESSED_SMALLEST | COMPRESSED_LARGEST => {
            let x = Fq::from_be_bytes_mod_order(&x_bytes);
            if x.into_bigint().to_bytes_be() != x_bytes {
                return Err(SerError::invalid_value(SerKind::Proof, "x coordinate"));
            }
            let point = G1Affine::get_point_from_x_unchecked(x, flag == COMPRESSED_LARGEST)
                .ok_or_else(|| SerError::invalid_value(SerKind::Proof, "x coordinate"))?;
            if !point.is_on_curve() || !point.is_in_correct_subgroup_assuming_on_curve() {
                return Err(SerError::invalid_value(SerKind::Proof, "point"));
            }
            Ok(point)
        }
        _ => Err(SerError::invalid_value(SerKind::Proof, "flags")),
    }
}

/// Proofs are fixed-size, so a slice of them is plain concatenation.
pub fn serialize_proofs(proofs: &[G1Affine]) -> Vec<u8> {
    proofs.iter().flat_map(serialize_proof).collect()
}

pub fn deserialize_proofs(bytes: &[u8]) -> SerResult<Vec<G1Affine>> {
    split_serialized_proofs(bytes)?
        .into_iter()
        .map(deserialize_proof)
        .collect()
}

/// Divides concatenated proofs into their fixed-size pieces without parsing them.
pub fn split_serialized_proofs(bytes: &[u8]) -> SerResult<Vec<&[u8]>> {
    if bytes.len() % SERIALIZED_PROOF_LENGTH != 0 {
        return Err(SerError::invalid_length(SerKind::ProofSlice, "proofs"));
    }
    Ok(bytes.chunks_exact(SERIALIZED_PROOF_LENGTH).collect())
}
