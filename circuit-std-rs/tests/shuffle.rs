mod common;

use circuit_std_rs::{
    babyjub,
    elgamal,
    shuffle::{self, EcDecompress, MatrixMultiplication, ShuffleEncrypt, ShuffleEncryptV2},
};
use common::{calculator, run_out, std_template_test_helper};
use rand::{rngs::StdRng, SeedableRng};
use witness_calc::frontend::*;

fn nums(v: &[u32]) -> Vec<BN254> {
    v.iter().map(|&x| BN254::from(x)).collect()
}

fn b8_times(k: u64) -> (BN254, BN254) {
    babyjub::mul_scalar(U256::from(k), &babyjub::base8()).unwrap()
}

#[test]
fn test_matrix_multiplication() {
    let inputs = InputSignals::new()
        .with("A", nums(&[1, 2, 3, 4, 5, 6]))
        .with("B", nums(&[7, 8, 9]));
    let out = run_out(MatrixMultiplication::new(2, 3), &inputs).unwrap();
    assert_eq!(out, nums(&[50, 122]));
    std_template_test_helper::<BN254, MatrixMultiplication>(&(3, 3));
}

fn decompress(x: BN254, s: bool, delta: BN254) -> Result<Vec<BN254>, Error> {
    let inputs = InputSignals::new()
        .with("x", vec![x])
        .with("s", vec![BN254::from(s as u32)])
        .with("delta", vec![delta]);
    run_out(EcDecompress, &inputs)
}

#[test]
fn test_ec_decompress() {
    let p = b8_times(77);
    // (x, -y) is on the curve as well and takes the other sign
    for q in [p, (p.0, -p.1)] {
        let (x, delta, s) = shuffle::compress(&q);
        assert_eq!(decompress(x, s, delta).unwrap(), vec![q.1]);
    }
    let (x, delta, s) = shuffle::compress(&p);
    assert_eq!(decompress(x, !s, delta).unwrap(), vec![-p.1]);
    std_template_test_helper::<BN254, EcDecompress>(&());
}

#[test]
fn test_ec_decompress_rejects_large_delta() {
    let p = b8_times(77);
    let (x, delta, s) = shuffle::compress(&p);
    let err = decompress(x, !s, -delta).err().unwrap();
    assert!(matches!(err, Error::ConstraintViolation(_)));
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.template, "ecDecompress");
    assert_eq!(diag.site, "cmp.out == 0");
}

#[test]
fn test_ec_decompress_rejects_points_off_curve() {
    let p = b8_times(77);
    let (x, delta, s) = shuffle::compress(&p);
    let err = decompress(x + BN254::one(), s, delta).err().unwrap();
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.template, "ecDecompress");
    assert_eq!(diag.site, "a * x2 + y2 == 1 + d * x2 * y2");
}

#[test]
fn test_shuffle_encrypt() {
    let n = 2;
    let pk = b8_times(99);
    let cards = [(b8_times(2), b8_times(3)), (b8_times(4), b8_times(5))];
    let mut x = vec![BN254::zero(); 4 * n];
    for (i, (c0, c1)) in cards.iter().enumerate() {
        x[i] = c0.0;
        x[n + i] = c0.1;
        x[2 * n + i] = c1.0;
        x[3 * n + i] = c1.1;
    }
    let r = [U256::from(9u32), U256::from(200u32)];
    let inputs = InputSignals::new()
        .with("A", nums(&[0, 1, 1, 0]))
        .with("X", x)
        .with("R", r.iter().map(|&v| BN254::from_u256(v)).collect())
        .with("pk", vec![pk.0, pk.1]);
    let calc = calculator::<BN254, _>(ShuffleEncrypt::new(n, 8));
    let signals = calc.calculate(&inputs).unwrap();
    let b = calc.main_signal(&signals, "B").unwrap();
    for i in 0..n {
        let (c0, c1) = cards[1 - i];
        let (e0, e1) = elgamal::encrypt(&c0, &c1, r[i], &pk).unwrap();
        assert_eq!([b[i], b[n + i], b[2 * n + i], b[3 * n + i]], [e0.0, e0.1, e1.0, e1.1]);
    }

    let bad = inputs.with("A", nums(&[1, 1, 0, 0]));
    let err = calc.calculate(&bad).err().unwrap();
    assert!(matches!(err, Error::ConstraintViolation(_)));
    assert_eq!(err.diagnostic().unwrap().path(), "main.permutation");
}

#[test]
fn test_shuffle_encrypt_v2() {
    let (n, bits) = (3, shuffle::NUM_BITS);
    let inputs = shuffle::random_deal::<BN254>(n, bits, StdRng::seed_from_u64(21));
    let pk = inputs.get("pk").unwrap().to_vec();
    let calc = calculator::<BN254, _>(ShuffleEncryptV2::new(n, bits));
    let signals = calc.calculate(&inputs).unwrap();
    assert_eq!(calc.main_signal(&signals, "out").unwrap(), vec![pk[0] * pk[1]]);

    // the claimed deck was not re-encrypted with this randomness
    let mut r = inputs.get("R").unwrap().to_vec();
    r[1] += BN254::one();
    let err = calc.calculate(&inputs.with("R", r)).err().unwrap();
    let diag = err.diagnostic().unwrap();
    assert_eq!(diag.template, "ShuffleEncryptV2Template");
    assert_eq!(diag.path(), "main.shuffle_encrypt");
}

#[test]
fn test_shuffle_encrypt_v2_layout() {
    let calc = calculator::<BN254, _>(ShuffleEncryptV2::new(2, shuffle::NUM_BITS));
    let layout = calc.layout();
    let main = layout.main_template().unwrap();
    assert_eq!(main.name, "ShuffleEncryptV2");
    // pk, 8 compressed rows, s_u, s_v, A, R
    assert_eq!(main.num_inputs, 2 + 8 * 2 + 4 + 4 + 2);
    let names: Vec<&str> = main.io.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(
        names,
        vec![
            "out", "pk", "UX0", "UX1", "VX0", "VX1", "s_u", "s_v", "UDelta0", "UDelta1",
            "VDelta0", "VDelta1", "A", "R"
        ]
    );
}

#[test]
fn test_shuffle_encrypt_v2_random() {
    std_template_test_helper::<BN254, ShuffleEncryptV2>(&(2, shuffle::NUM_BITS));
}

#[test]
#[should_panic]
fn test_shuffle_encrypt_v2_too_many_cards() {
    ShuffleEncryptV2::new(shuffle::MAX_CARDS + 1, shuffle::NUM_BITS);
}
