use crate::frame::FrameCoeffs;
use ark_bn254::{Fr, G1Affine};
use ark_ec::{AffineRepr, CurveGroup};
use rand::{rngs::StdRng, Rng, SeedableRng};

pub fn test_data(seed: u64, n: usize) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n).map(|_| rng.gen()).collect()
}

pub fn random_elements(rng: &mut StdRng, n: usize) -> Vec<Fr> {
    (0..n).map(|_| Fr::from(rng.gen::<u64>())).collect()
}

pub fn random_frame_coeffs(seed: u64, lengths: &[usize]) -> Vec<FrameCoeffs> {
    let mut rng = StdRng::seed_from_u64(seed);
    lengths
        .iter()
        .map(|len| FrameCoeffs::from(random_elements(&mut rng, *len)))
        .collect()
}

pub fn random_proofs(seed: u64, n: usize) -> Vec<G1Affine> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..n)
        .map(|_| (G1Affine::generator() * Fr::from(rng.gen::<u64>())).into_affine())
        .collect()
}
