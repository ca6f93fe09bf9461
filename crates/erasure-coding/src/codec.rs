//! Conversion between raw bytes and BN254 scalars.
//!
//! Every 31 bytes of input become one 32-byte big-endian symbol whose first
//! byte is zero, so each symbol is always below the field modulus. The padding
//! is not self-describing: callers carry the unpadded length themselves, or use
//! [`encode_payload`] which records it in a header symbol.

use crate::ser::{ByteReader, SerError, SerKind, SerResult};
use ark_bn254::Fr;
use ark_ff::{BigInteger, PrimeField};

/// Size of a serialized field element.
pub const BYTES_PER_SYMBOL: usize = 32;
/// Payload bytes carried by one symbol.
pub const BYTES_PER_COEFFICIENT: usize = BYTES_PER_SYMBOL - 1;

const GUARD_BYTE: u8 = 0;
const PAYLOAD_VERSION: u8 = 0;
const HEADER_BYTES_LEN: usize = BYTES_PER_SYMBOL;

/// Big-endian 32-byte encoding of a field element.
pub fn fr_to_symbol(element: &Fr) -> [u8; BYTES_PER_SYMBOL] {
    let mut out = [0u8; BYTES_PER_SYMBOL];
    out.copy_from_slice(&element.into_bigint().to_bytes_be());
    out
}

/// Parses a canonical big-endian symbol, rejecting values at or above the modulus.
pub fn symbol_to_fr(symbol: &[u8; BYTES_PER_SYMBOL]) -> Option<Fr> {
    let element = Fr::from_be_bytes_mod_order(symbol);
    (fr_to_symbol(&element) == *symbol).then_some(element)
}

/// Splits `data` into 31-byte groups, right-padding the last one with zeros,
/// and prefixes each group with a zero byte before parsing it.
pub fn bytes_to_field_elements(data: &[u8]) -> Vec<Fr> {
    data.chunks(BYTES_PER_COEFFICIENT)
        .map(|group| {
            let mut symbol = [0u8; BYTES_PER_SYMBOL];
            symbol[1..=group.len()].copy_from_slice(group);
            Fr::from_be_bytes_mod_order(&symbol)
        })
        .collect()
}

/// Inverse of [`bytes_to_field_elements`]: drops the leading byte of each
/// symbol and truncates the result to `max_data_size`.
pub fn field_elements_to_bytes(elements: &[Fr], max_data_size: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(elements.len() * BYTES_PER_COEFFICIENT);
    for element in elements {
        if out.len() >= max_data_size {
            break;
        }
        out.extend_from_slice(&fr_to_symbol(element)[1..]);
    }
    out.truncate(max_data_size);
    out
}

/// Length in bytes of `data_size` bytes once padded into symbols.
pub fn padded_size(data_size: usize) -> usize {
    data_size.div_ceil(BYTES_PER_COEFFICIENT) * BYTES_PER_SYMBOL
}

/// Payload bytes carried by `padded_len` bytes of symbols. Fails unless
/// `padded_len` is a whole number of symbols.
pub fn unpadded_size(padded_len: usize) -> SerResult<usize> {
    if padded_len % BYTES_PER_SYMBOL != 0 {
        return Err(SerError::invalid_length(SerKind::Payload, "padded length"));
    }
    Ok(padded_len / BYTES_PER_SYMBOL * BYTES_PER_COEFFICIENT)
}

/// Prefixes every 31-byte group of `data` with a zero byte, zero-filling the
/// last group.
pub fn pad_bytes(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(padded_size(data.len()));
    pad_into(&mut out, data);
    out
}

fn pad_into(out: &mut Vec<u8>, data: &[u8]) {
    for group in data.chunks(BYTES_PER_COEFFICIENT) {
        out.push(GUARD_BYTE);
        out.extend_from_slice(group);
        out.resize(out.len() + BYTES_PER_COEFFICIENT - group.len(), 0);
    }
}

/// Inverse of [`pad_bytes`]. Zero fill of the last group is kept, so the
/// output may carry up to 30 trailing zeros.
pub fn remove_internal_padding(padded: &[u8]) -> SerResult<Vec<u8>> {
    let mut out = Vec::with_capacity(unpadded_size(padded.len())?);
    for symbol in padded.chunks_exact(BYTES_PER_SYMBOL) {
        if symbol[0] != GUARD_BYTE {
            return Err(SerError::invalid_value(SerKind::Payload, "symbol guard byte"));
        }
        out.extend_from_slice(&symbol[1..]);
    }
    Ok(out)
}

/// Frames `raw` behind a header symbol holding its length, then pads it into
/// symbols.
///
/// | byte | 0     | 1       | 2..6            | 6..32 |
/// |------|-------|---------|-----------------|-------|
/// |      | guard | version | length (u32 BE) | zero  |
pub fn encode_payload(raw: &[u8]) -> SerResult<Vec<u8>> {
    let len = u32::try_from(raw.len())
        .map_err(|_| SerError::invalid_length(SerKind::Payload, "payload length"))?;

    let mut out = Vec::with_capacity(HEADER_BYTES_LEN + padded_size(raw.len()));
    out.push(GUARD_BYTE);
    out.push(PAYLOAD_VERSION);
    out.extend_from_slice(&len.to_be_bytes());
    out.resize(HEADER_BYTES_LEN, 0);
    pad_into(&mut out, raw);
    Ok(out)
}

/// Recovers the raw payload framed by [`encode_payload`]. Trailing symbols
/// beyond the declared length are ignored, since blobs are zero-padded to a
/// power of two.
pub fn decode_payload(encoded: &[u8]) -> SerResult<Vec<u8>> {
    let mut reader = ByteReader::new(encoded, SerKind::Payload);
    let header: [u8; HEADER_BYTES_LEN] = reader.read_array("header")?;
    if header[0] != GUARD_BYTE {
        return Err(SerError::invalid_value(SerKind::Payload, "header guard byte"));
    }
    if header[1] != PAYLOAD_VERSION {
        return Err(SerError::invalid_value(SerKind::Payload, "version"));
    }
    let mut len_bytes = [0u8; 4];
    len_bytes.copy_from_slice(&header[2..6]);
    let len = u32::from_be_bytes(len_bytes) as usize;

    let symbols = reader.read_exact(padded_size(len), "payload symbols")?;
    let mut out = remove_internal_padding(symbols)?;
    out.truncate(len);
    Ok(out)
}

/// Size in bytes of the smallest power-of-two blob holding a payload of
/// `payload_size` bytes plus its header.
pub fn payload_size_to_blob_size(payload_size: u32) -> u64 {
    let symbols = 1 + (payload_size as u64).div_ceil(BYTES_PER_COEFFICIENT as u64);
    symbols.next_power_of_two() * BYTES_PER_SYMBOL as u64
}
