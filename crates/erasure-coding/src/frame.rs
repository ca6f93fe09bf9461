//! Chunk coefficients and their wire format.
//!
//! A [`FrameCoeffs`] serializes as `[symbol_count: u32][symbol; symbol_count]`
//! and a slice of them as `[frame_count: u32][FrameCoeffs; frame_count]`.

use crate::codec::{fr_to_symbol, symbol_to_fr, BYTES_PER_SYMBOL};
use crate::ser::{write_len, ByteReader, SerError, SerKind, SerResult};
use ark_bn254::{Fr, G1Affine};
use std::ops::Deref;

/// Coefficients of one chunk's interpolating polynomial, lowest degree first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrameCoeffs(Vec<Fr>);

impl FrameCoeffs {
    pub fn into_inner(self) -> Vec<Fr> {
        self.0
    }

    pub fn serialized_size(&self) -> usize {
        4 + self.0.len() * BYTES_PER_SYMBOL
    }

    pub fn serialize(&self) -> SerResult<Vec<u8>> {
        let mut out = Vec::with_capacity(self.serialized_size());
        self.serialize_into(&mut out)?;
        Ok(out)
    }

    fn serialize_into(&self, out: &mut Vec<u8>) -> SerResult<()> {
        write_len(out, self.0.len(), SerKind::FrameCoeffs, "symbol count")?;
        for element in &self.0 {
            out.extend_from_slice(&fr_to_symbol(element));
        }
        Ok(())
    }

    /// Reads one frame from the front of `bytes`, returning it together with
    /// the number of bytes consumed so that packed frames can be read back to
    /// back.
    pub fn deserialize(bytes: &[u8]) -> SerResult<(Self, usize)> {
        let mut reader = ByteReader::new(bytes, SerKind::FrameCoeffs);
        let coeffs = Self::read(&mut reader)?;
        Ok((coeffs, reader.position()))
    }

    fn read(reader: &mut ByteReader<'_>) -> SerResult<Self> {
        let count = reader.read_u32("symbol count")? as usize;
        let body_len = count
            .checked_mul(BYTES_PER_SYMBOL)
            .ok_or_else(|| SerError::invalid_length(SerKind::FrameCoeffs, "symbol count"))?;
        let body = reader.read_exact(body_len, "symbols")?;
        body.chunks_exact(BYTES_PER_SYMBOL)
            .map(|symbol| {
                let mut array = [0u8; BYTES_PER_SYMBOL];
                array.copy_from_slice(symbol);
                symbol_to_fr(&array)
                    .ok_or_else(|| SerError::invalid_value(SerKind::FrameCoeffs, "symbol"))
            })
            .collect::<SerResult<Vec<_>>>()
            .map(Self)
    }
}

impl Deref for FrameCoeffs {
    type Target = [Fr];
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl From<Vec<Fr>> for FrameCoeffs {
    fn from(coeffs: Vec<Fr>) -> Self {
        Self(coeffs)
    }
}

/// A chunk's coefficients paired with the proof binding them to the blob
/// commitment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub proof: G1Affine,
    pub coeffs: FrameCoeffs,
}

impl Frame {
    pub fn new(proof: G1Affine, coeffs: FrameCoeffs) -> Self {
        Self { proof, coeffs }
    }
}

pub fn serialize_frame_coeffs_slice(frames: &[FrameCoeffs]) -> SerResult<Vec<u8>> {
    let size = 4 + frames.iter().map(FrameCoeffs::serialized_size).sum::<usize>();
    let mut out = Vec::with_capacity(size);
    write_len(&mut out, frames.len(), SerKind::FrameCoeffsSlice, "frame count")?;
    for frame in frames {
        frame.serialize_into(&mut out)?;
    }
    Ok(out)
}

pub fn deserialize_frame_coeffs_slice(bytes: &[u8]) -> SerResult<Vec<FrameCoeffs>> {
    let mut reader = ByteReader::new(bytes, SerKind::FrameCoeffsSlice);
    let count = reader.read_u32("frame count")? as usize;
    // each frame needs at least its own count prefix
    let mut frames = Vec::with_capacity(count.min(reader.remaining() / 4));
    for _ in 0..count {
        frames.push(FrameCoeffs::read(&mut reader)?);
    }
    reader.finish()?;
    Ok(frames)
}

/// Splits a serialized slice into the serialized form of each frame, without
/// parsing the symbols. Also returns the symbol count shared by every frame,
/// or `None` when the frames differ in length or there are none.
pub fn split_serialized_frame_coeffs(bytes: &[u8]) -> SerResult<(Vec<&[u8]>, Option<u32>)> {
    let mut reader = ByteReader::new(bytes, SerKind::FrameCoeffsSlice);
    let count = reader.read_u32("frame count")? as usize;
    let mut pieces = Vec::with_capacity(count.min(reader.remaining() / 4));
    let mut uniform: Option<Option<u32>> = None;
    for _ in 0..count {
        let start = reader.position();
        let symbols = reader.read_u32("symbol count")?;
        let body_len = (symbols as usize)
            .checked_mul(BYTES_PER_SYMBOL)
            .ok_or_else(|| SerError::invalid_length(SerKind::FrameCoeffsSlice, "symbol count"))?;
        reader.read_exact(body_len, "symbols")?;
        pieces.push(&bytes[start..reader.position()]);
        uniform = match uniform {
            None => Some(Some(symbols)),
            Some(Some(prev)) if prev == symbols => Some(Some(prev)),
            Some(_) => Some(None),
        };
    }
    reader.finish()?;
    Ok((pieces, uniform.flatten()))
}

/// Packs independently serialized frames back into a slice. Each piece must
/// hold exactly one frame; its symbols are copied verbatim.
pub fn combine_serialized_frame_coeffs<B: AsRef<[u8]>>(pieces: &[B]) -> SerResult<Vec<u8>> {
    let size = 4 + pieces.iter().map(|p| p.as_ref().len()).sum::<usize>();
    let mut out = Vec::with_capacity(size);
    write_len(&mut out, pieces.len(), SerKind::FrameCoeffsSlice, "frame count")?;
    for piece in pieces {
        let piece = piece.as_ref();
        let mut reader = ByteReader::new(piece, SerKind::FrameCoeffs);
        let symbols = reader.read_u32("symbol count")? as usize;
        let body_len = symbols
            .checked_mul(BYTES_PER_SYMBOL)
            .ok_or_else(|| SerError::invalid_length(SerKind::FrameCoeffs, "symbol count"))?;
        reader.read_exact(body_len, "symbols")?;
        reader.finish()?;
        out.extend_from_slice(piece);
    }
    Ok(out)
}
