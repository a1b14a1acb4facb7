//! Integration tests for the dense linear-algebra backend.
//!
//! These tests check that the symmetric shortcuts agree with the general
//! algorithms, that matrix functions keep the rank of their input and that
//! the positive-definiteness test classifies the usual corner cases.

use geodesia_core::{
    batch::Stack,
    config::Tolerances,
    diagnostics::{CollectingSink, DiagnosticKind},
    linalg::{self, general, DenseBackend},
    numerical::max_abs_diff,
    types::{DMatrix, DVector},
    ManifoldError,
};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::sync::Arc;

fn random_spd(rng: &mut StdRng, n: usize) -> DMatrix<f64> {
    let m = DMatrix::from_fn(n, n, |_, _| rng.gen_range(-1.0..1.0));
    &m * m.transpose() + DMatrix::identity(n, n) * n as f64
}

#[test]
fn test_logm_eigen_branch_matches_general_branch() {
    let mut rng = StdRng::seed_from_u64(42);
    for n in [3, 10] {
        let batch: Vec<_> = (0..4).map(|_| random_spd(&mut rng, n)).collect();
        let logs = linalg::logm(&Stack::Batch(batch.clone())).unwrap();
        assert_eq!(logs.len(), batch.len());
        for (a, log) in batch.iter().zip(logs.iter()) {
            let reference = general::logm(a).unwrap();
            assert!(
                max_abs_diff(log, &reference) < 1e-8,
                "n = {n}: eigen and general logm differ by {}",
                max_abs_diff(log, &reference)
            );
        }
    }
}

#[test]
fn test_sylvester_shortcut_matches_general_solver() {
    let mut rng = StdRng::seed_from_u64(7);
    let a = random_spd(&mut rng, 4);
    let q = DMatrix::from_fn(4, 4, |_, _| rng.gen_range(-2.0..2.0));

    let sink = Arc::new(CollectingSink::new());
    let backend = DenseBackend::<f64>::new().with_diagnostics(sink.clone());
    let x = backend
        .solve_sylvester(&a.clone().into(), &a.clone().into(), &q.clone().into())
        .unwrap()
        .into_single()
        .unwrap();
    assert_eq!(sink.count(DiagnosticKind::FallbackBranch), 0);

    let reference = general::solve_sylvester(&a, &a, &q).unwrap();
    assert!(max_abs_diff(&x, &reference) < 1e-8);
}

#[test]
fn test_sylvester_distinct_operators_take_general_branch() {
    let sink = Arc::new(CollectingSink::new());
    let backend = DenseBackend::<f64>::new().with_diagnostics(sink.clone());
    let a = DMatrix::from_row_slice(2, 2, &[2.0, 0.0, 0.0, 3.0]);
    let b = DMatrix::from_row_slice(3, 3, &[1.0, 0.2, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0]);
    let q = DMatrix::from_element(2, 3, 1.0);

    let x = backend
        .solve_sylvester(&a.clone().into(), &b.clone().into(), &q.clone().into())
        .unwrap()
        .into_single()
        .unwrap();
    assert_eq!(x.shape(), (2, 3));
    assert!(max_abs_diff(&(&a * &x + &x * &b), &q) < 1e-12);
    assert_eq!(sink.count(DiagnosticKind::FallbackBranch), 1);
}

#[test]
fn test_matrix_functions_preserve_rank() {
    let a = DMatrix::from_row_slice(2, 2, &[2.0, 0.3, 0.3, 1.0]);
    let single = Stack::Single(a.clone());
    let batch = Stack::Batch(vec![a.clone(), a.clone(), a]);

    for input in [&single, &batch] {
        let batched = input.is_batch();
        assert_eq!(linalg::expm(input).unwrap().is_batch(), batched);
        assert_eq!(linalg::logm(input).unwrap().is_batch(), batched);
        assert_eq!(linalg::sqrtm(input).unwrap().is_batch(), batched);
        assert_eq!(linalg::is_positive_definite(input).unwrap().is_batch(), batched);
        assert_eq!(linalg::qr(input).is_batch(), batched);
        assert_eq!(linalg::solve_sylvester(input, input, input).unwrap().is_batch(), batched);
    }
}

#[test]
fn test_positive_definiteness_classification() {
    let identity = DMatrix::<f64>::identity(2, 2);
    let indefinite = DMatrix::from_diagonal(&DVector::from_vec(vec![1.0, -1.0]));
    let swap = DMatrix::from_row_slice(2, 2, &[0.0, 1.0, 1.0, 0.0]);

    assert_eq!(
        linalg::is_positive_definite(&Stack::Batch(vec![identity, indefinite, swap])).unwrap(),
        Stack::Batch(vec![true, false, false])
    );
    assert_eq!(
        linalg::is_positive_definite(&Stack::Single(DMatrix::<f64>::zeros(2, 3))).unwrap(),
        Stack::Single(false)
    );
}

#[test]
fn test_logm_of_matrix_without_real_logarithm_fails() {
    let reflection = DMatrix::from_diagonal(&DVector::from_vec(vec![-1.0, 2.0]));
    let result = linalg::logm(&Stack::Single(reflection));
    assert!(matches!(
        result,
        Err(ManifoldError::NumericalError { .. }) | Err(ManifoldError::DecompositionFailed { .. })
    ));
}

#[test]
fn test_custom_tolerances_drive_the_backend() {
    let tolerances = Tolerances::builder().parallel_batch_threshold(2).build();
    let backend = DenseBackend::with_tolerances(tolerances);
    assert_eq!(backend.tolerances().parallel_batch_threshold, 2);

    let mut rng = StdRng::seed_from_u64(3);
    let batch: Vec<_> = (0..6).map(|_| random_spd(&mut rng, 3)).collect();
    let roots = backend.sqrtm(&Stack::Batch(batch.clone())).unwrap();
    for (a, r) in batch.iter().zip(roots.iter()) {
        assert!(max_abs_diff(&(r * r), a) < 1e-9);
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn prop_expm_logm_roundtrip_on_spd(entries in prop::collection::vec(-1.0f64..1.0, 9)) {
        let m = DMatrix::from_row_slice(3, 3, &entries);
        let a = &m * m.transpose() + DMatrix::identity(3, 3);
        let log = linalg::logm(&Stack::Single(a.clone())).unwrap();
        let back = linalg::expm(&log).unwrap().into_single().unwrap();
        prop_assert!(max_abs_diff(&back, &a) < 1e-9);
    }

    #[test]
    fn prop_sqrtm_of_spd_is_spd(entries in prop::collection::vec(-1.0f64..1.0, 9)) {
        let m = DMatrix::from_row_slice(3, 3, &entries);
        let a = &m * m.transpose() + DMatrix::identity(3, 3) * 0.5;
        let root = linalg::sqrtm(&Stack::Single(a)).unwrap();
        prop_assert_eq!(linalg::is_positive_definite(&root).unwrap(), Stack::Single(true));
    }
}
