use ark_ec::{AffineRepr, CurveGroup};
use erasure_coding::bundle::{build_bundles, parse_bundle, serialize_bundles, split_bundles};
use erasure_coding::codec::{decode_payload, encode_payload};
use erasure_coding::frame::{
    combine_serialized_frame_coeffs, deserialize_frame_coeffs_slice,
    serialize_frame_coeffs_slice, split_serialized_frame_coeffs,
};
use erasure_coding::proof::serialize_proofs;
use erasure_coding::{
    num_systematic_chunks, Encoder, EncoderConfig, EncodingParams, Error, Fr, FrameCoeffs,
    G1Affine,
};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};

fn payload(rng: &mut StdRng, len: usize) -> Vec<u8> {
    (0..len).map(|_| rng.gen()).collect()
}

fn sample(
    rng: &mut StdRng,
    frames: &[FrameCoeffs],
    count: usize,
) -> (Vec<FrameCoeffs>, Vec<u64>) {
    let mut indices: Vec<u64> = (0..frames.len() as u64).collect();
    indices.shuffle(rng);
    indices.truncate(count);
    let sampled = indices
        .iter()
        .map(|&i| frames[i as usize].clone())
        .collect();
    (sampled, indices)
}

#[test]
fn test_roundtrip_under_erasure() {
    let _ = pretty_env_logger::try_init();
    let mut rng = StdRng::seed_from_u64(42);
    let encoder = Encoder::new(EncoderConfig::with_workers(3));

    for (num_sys, num_par, len) in [(1, 1, 10), (2, 2, 700), (3, 5, 2000), (5, 3, 4096), (8, 8, 31)] {
        let data = payload(&mut rng, len);
        let size = erasure_coding::codec::padded_size(len) as u64;
        let params = EncodingParams::from_systematic_parity(num_sys, num_par, size).unwrap();
        let (frames, _) = encoder.encode_bytes(&data, params).unwrap();
        assert_eq!(frames.len() as u64, params.num_chunks);

        let required = num_systematic_chunks(size, params.chunk_length) as usize;
        assert!(required as u64 <= num_sys);
        for count in [required, params.num_chunks as usize] {
            let (sampled, indices) = sample(&mut rng, &frames, count);
            let decoded = encoder
                .decode(&sampled, &indices, len as u64, params)
                .unwrap();
            assert_eq!(decoded, data, "{} with chunks {:?}", params, indices);
        }

        if required > 0 {
            let (sampled, indices) = sample(&mut rng, &frames, required - 1);
            assert!(matches!(
                encoder.decode(&sampled, &indices, len as u64, params),
                Err(Error::InsufficientFrames { .. })
            ));
        }
    }
}

#[test]
fn test_duplicates_are_tolerated() {
    let mut rng = StdRng::seed_from_u64(7);
    let encoder = Encoder::default();
    let data = payload(&mut rng, 1000);
    let params = EncodingParams::from_systematic_parity(2, 2, 1024 + 64).unwrap();
    let (frames, _) = encoder.encode_bytes(&data, params).unwrap();

    let (mut sampled, mut indices) = sample(&mut rng, &frames, 2);
    let baseline = encoder
        .decode(&sampled, &indices, data.len() as u64, params)
        .unwrap();
    sampled.extend(sampled.clone());
    indices.extend(indices.clone());
    let decoded = encoder
        .decode(&sampled, &indices, data.len() as u64, params)
        .unwrap();
    assert_eq!(decoded, baseline);
    assert_eq!(decoded, data);
}

#[test]
fn test_systematic_frames_hold_the_data() {
    let mut rng = StdRng::seed_from_u64(8);
    let encoder = Encoder::default();
    let input: Vec<Fr> = (0..8).map(|_| Fr::from(rng.gen::<u64>())).collect();
    let params = EncodingParams::new(4, 4);
    let (frames, indices) = encoder.encode(&input, params).unwrap();
    assert_eq!(indices, vec![0, 2, 1, 3]);
    // a payload of 8 elements needs two chunks of four
    let (sampled, picked) = sample(&mut rng, &frames, 2);
    let decoded = encoder.decode(&sampled, &picked, 8 * 31, params).unwrap();
    let expected = erasure_coding::codec::field_elements_to_bytes(&input, 8 * 31);
    assert_eq!(decoded, expected);
}

#[test]
fn test_frames_survive_transport() {
    let _ = pretty_env_logger::try_init();
    let mut rng = StdRng::seed_from_u64(9);
    let encoder = Encoder::new(EncoderConfig::with_workers(2));
    let raw = payload(&mut rng, 900);
    let blob = encode_payload(&raw).unwrap();
    let params = EncodingParams::from_systematic_parity(4, 4, blob.len() as u64).unwrap();
    let (frames, _) = encoder.encode_bytes(&blob, params).unwrap();

    let proofs: Vec<G1Affine> = (0..frames.len())
        .map(|i| (G1Affine::generator() * Fr::from(i as u64 + 1)).into_affine())
        .collect();
    let coeff_bytes = serialize_frame_coeffs_slice(&frames).unwrap();
    let (pieces, symbols) = split_serialized_frame_coeffs(&coeff_bytes).unwrap();
    assert_eq!(symbols, Some(params.chunk_length as u32));
    assert_eq!(combine_serialized_frame_coeffs(&pieces).unwrap(), coeff_bytes);

    let bundles = build_bundles(&serialize_proofs(&proofs), &coeff_bytes).unwrap();
    let container = serialize_bundles(&bundles).unwrap();

    // keep every other bundle, as if the rest were lost
    let mut received = Vec::new();
    let mut indices = Vec::new();
    for (i, bundle) in split_bundles(&container).unwrap().into_iter().enumerate() {
        if i % 2 == 1 {
            let frame = parse_bundle(bundle).unwrap();
            assert_eq!(frame.proof, proofs[i]);
            received.push(frame.coeffs);
            indices.push(i as u64);
        }
    }

    let decoded = encoder
        .decode(&received, &indices, blob.len() as u64, params)
        .unwrap();
    assert_eq!(decode_payload(&decoded).unwrap(), raw);

    let restored = deserialize_frame_coeffs_slice(&coeff_bytes).unwrap();
    assert_eq!(restored, frames);
}
