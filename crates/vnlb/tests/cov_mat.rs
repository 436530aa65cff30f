use approx::assert_relative_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};
use vnlb::{compute_cov_mat, compute_cov_mat_owned, compute_cov_mat_status, CovMatOutputs, CovMatParams};

fn random_groups(rng: &mut StdRng, num_patches: usize, patch_dim: usize) -> Vec<f32> {
    (0..num_patches * patch_dim)
        .map(|_| rng.random_range(0.0..255.0))
        .collect()
}

#[test]
fn covariance_is_symmetric() -> Result<(), vnlb::VnlbError> {
    let mut rng = StdRng::seed_from_u64(42);
    let (n, d) = (40, 12);
    let groups = random_groups(&mut rng, n, d);

    let res = compute_cov_mat_owned(&groups, n, d, 4)?;
    for i in 0..d {
        for j in 0..d {
            assert_eq!(res.cov_mat[i * d + j], res.cov_mat[j * d + i]);
        }
    }
    Ok(())
}

#[test]
fn eigenvalues_descending_and_orthonormal() -> Result<(), vnlb::VnlbError> {
    let mut rng = StdRng::seed_from_u64(7);
    let (n, d, r) = (60, 16, 8);
    let groups = random_groups(&mut rng, n, d);

    let res = compute_cov_mat_owned(&groups, n, d, r)?;
    for pair in res.eig_vals.windows(2) {
        assert!(pair[0] >= pair[1], "{} < {}", pair[0], pair[1]);
    }

    for a in 0..r {
        for b in 0..r {
            let dot: f32 = res.eig_vecs[a * d..(a + 1) * d]
                .iter()
                .zip(res.eig_vecs[b * d..(b + 1) * d].iter())
                .map(|(x, y)| x * y)
                .sum();
            let expected = if a == b { 1.0 } else { 0.0 };
            assert_relative_eq!(dot, expected, epsilon = 1e-5);
        }
    }
    Ok(())
}

#[test]
fn eigenpairs_satisfy_definition() -> Result<(), vnlb::VnlbError> {
    let mut rng = StdRng::seed_from_u64(3);
    let (n, d, r) = (30, 6, 3);
    let groups = random_groups(&mut rng, n, d);

    let res = compute_cov_mat_owned(&groups, n, d, r)?;
    let scale = res.eig_vals[0];
    for k in 0..r {
        let v = &res.eig_vecs[k * d..(k + 1) * d];
        for i in 0..d {
            let cv: f32 = (0..d).map(|j| res.cov_mat[i * d + j] * v[j]).sum();
            assert_relative_eq!(cv / scale, res.eig_vals[k] * v[i] / scale, epsilon = 1e-4);
        }
    }
    Ok(())
}

#[test]
fn trace_equals_sum_of_eigenvalues() -> Result<(), vnlb::VnlbError> {
    let mut rng = StdRng::seed_from_u64(11);
    let (n, d) = (25, 9);
    let groups = random_groups(&mut rng, n, d);

    let res = compute_cov_mat_owned(&groups, n, d, d)?;
    let trace: f32 = (0..d).map(|i| res.cov_mat[i * d + i]).sum();
    let sum: f32 = res.eig_vals.iter().sum();
    assert_relative_eq!(trace, sum, max_relative = 1e-4);
    Ok(())
}

#[test]
fn single_patch_is_degenerate() -> Result<(), vnlb::VnlbError> {
    let res = compute_cov_mat_owned(&[3.0, -1.0, 7.5, 2.0], 1, 4, 2)?;
    assert!(res.cov_mat.iter().all(|&x| x == 0.0));
    assert!(res.eig_vals.iter().all(|&x| x == 0.0));
    assert!(res.eig_vecs.iter().all(|x| x.is_finite()));
    Ok(())
}

#[test]
fn repeated_calls_are_identical() -> Result<(), vnlb::VnlbError> {
    let mut rng = StdRng::seed_from_u64(5);
    let (n, d, r) = (20, 10, 5);
    let groups = random_groups(&mut rng, n, d);

    let first = compute_cov_mat_owned(&groups, n, d, r)?;
    let results = std::thread::scope(|s| {
        let handles = (0..4)
            .map(|_| s.spawn(|| compute_cov_mat_owned(&groups, n, d, r)))
            .collect::<Vec<_>>();
        handles
            .into_iter()
            .map(|h| h.join().expect("thread panicked"))
            .collect::<Result<Vec<_>, _>>()
    })?;

    for res in results {
        assert_eq!(res, first);
    }
    Ok(())
}

#[test]
fn caller_buffers_are_filled() -> Result<(), vnlb::VnlbError> {
    let groups = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let params = CovMatParams {
        groups: &groups,
        n_sim_patches: 3,
        patch_dim: 2,
        rank: 1,
    };

    let mut cov_mat = [0.0; 4];
    let mut eig_vals = [0.0; 1];
    let mut eig_vecs = [0.0; 2];
    compute_cov_mat(
        &params,
        CovMatOutputs {
            cov_mat: &mut cov_mat,
            eig_vals: &mut eig_vals,
            eig_vecs: &mut eig_vecs,
        },
    )?;

    for x in cov_mat {
        assert_relative_eq!(x, 8.0 / 3.0, epsilon = 1e-5);
    }
    assert_relative_eq!(eig_vals[0], 16.0 / 3.0, epsilon = 1e-5);
    assert_relative_eq!(eig_vecs[0], std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
    assert_relative_eq!(eig_vecs[1], std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-5);
    Ok(())
}

#[test]
fn status_codes() {
    let groups = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
    let mut cov_mat = [0.0; 4];
    let mut eig_vals = [0.0; 2];
    let mut eig_vecs = [0.0; 4];

    let ok = compute_cov_mat_status(
        &CovMatParams {
            groups: &groups,
            n_sim_patches: 3,
            patch_dim: 2,
            rank: 2,
        },
        CovMatOutputs {
            cov_mat: &mut cov_mat,
            eig_vals: &mut eig_vals,
            eig_vecs: &mut eig_vecs,
        },
    );
    assert_eq!(ok, vnlb::STATUS_OK);

    // declared shape does not match the group buffer
    let bad_shape = compute_cov_mat_status(
        &CovMatParams {
            groups: &groups,
            n_sim_patches: 4,
            patch_dim: 2,
            rank: 2,
        },
        CovMatOutputs {
            cov_mat: &mut cov_mat,
            eig_vals: &mut eig_vals,
            eig_vecs: &mut eig_vecs,
        },
    );
    assert_eq!(bad_shape, vnlb::STATUS_INVALID_ARGUMENT);

    let non_finite = [1.0, f32::INFINITY, 3.0, 4.0, 5.0, 6.0];
    let failure = compute_cov_mat_status(
        &CovMatParams {
            groups: &non_finite,
            n_sim_patches: 3,
            patch_dim: 2,
            rank: 2,
        },
        CovMatOutputs {
            cov_mat: &mut cov_mat,
            eig_vals: &mut eig_vals,
            eig_vecs: &mut eig_vecs,
        },
    );
    assert_eq!(failure, vnlb::STATUS_NUMERICAL_FAILURE);
}
