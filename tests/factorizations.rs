use reduct::linalg::{
    eigen, eigen_back_substitute, eigen_covariance, eigen_invert, eigen_with_options, svd,
    svd_back_substitute, svd_covariance, svd_invert, svd_with_options,
};
use reduct::{Arena, Convergence, LinalgError, Matrix, QrOptions, Vector};

const TOL: f64 = 1e-10;

fn assert_near(a: f64, b: f64, tol: f64, msg: &str) {
    assert!(
        (a - b).abs() < tol,
        "{}: {} vs {} (diff {})",
        msg,
        a,
        b,
        (a - b).abs()
    );
}

fn assert_matrix_near(a: &Matrix<f64>, b: &Matrix<f64>, tol: f64, msg: &str) {
    assert_eq!(a.shape(), b.shape(), "{}: shape", msg);
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            assert_near(a[(i, j)], b[(i, j)], tol, &format!("{}[({},{})]", msg, i, j));
        }
    }
}

/// Uᵗ·diag(d)·V for the rectangular `diag(d)`.
fn svd_product(u: &Matrix<f64>, d: &Vector<f64>, v: &Matrix<f64>) -> Matrix<f64> {
    Matrix::from_fn(u.ncols(), v.ncols(), |i, j| {
        (0..d.len()).map(|k| u[(k, i)] * d[k] * v[(k, j)]).sum()
    })
}

fn design_matrix() -> Matrix<f64> {
    // Quadratic fit over six epochs
    Matrix::from_fn(6, 3, |i, j| (0.5 * i as f64 - 1.0).powi(j as i32))
}

// ── SVD ─────────────────────────────────────────────────────────────

#[test]
fn svd_tall_reconstructs_original() {
    let mut arena = Arena::new();
    let a = design_matrix();
    let original = a.clone();
    let mut u = arena.matrix(6, 6);
    let mut v = arena.matrix(3, 3);
    let d = svd(&mut arena, a, Some(&mut u), Some(&mut v))
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(d.len(), 3);
    assert!(d[0] >= d[1] && d[1] >= d[2] && d[2] > 0.0);
    assert_matrix_near(&svd_product(&u, &d, &v), &original, TOL, "UᵗDV");
    assert_matrix_near(&(&u * &u.transpose()), &Matrix::identity(6), TOL, "UUᵗ");
    assert_matrix_near(&(&v * &v.transpose()), &Matrix::identity(3), TOL, "VVᵗ");
}

#[test]
fn svd_wide_reconstructs_original() {
    let mut arena = Arena::new();
    let a = design_matrix().transpose();
    let original = a.clone();
    let mut u = arena.matrix(3, 3);
    let mut v = arena.matrix(6, 6);
    let d = svd(&mut arena, a, Some(&mut u), Some(&mut v))
        .unwrap()
        .into_value();

    assert_eq!(d.len(), 3);
    assert_matrix_near(&svd_product(&u, &d, &v), &original, TOL, "UᵗDV");
    assert_matrix_near(&(&u * &u.transpose()), &Matrix::identity(3), TOL, "UUᵗ");
    assert_matrix_near(&(&v * &v.transpose()), &Matrix::identity(6), TOL, "VVᵗ");
}

#[test]
fn svd_of_transpose_has_same_values() {
    let mut arena = Arena::new();
    let a = design_matrix();
    let d_tall = svd(&mut arena, a.clone(), None, None).unwrap().into_value();
    let d_wide = svd(&mut arena, a.transpose(), None, None)
        .unwrap()
        .into_value();
    for k in 0..3 {
        assert_near(d_tall[k], d_wide[k], TOL, &format!("σ[{}]", k));
    }
}

#[test]
fn svd_diag_sign_and_order() {
    let mut arena = Arena::new();
    let mut u = arena.matrix(2, 2);
    let mut v = arena.matrix(2, 2);
    let a = Matrix::from_rows(2, 2, &[3.0, 0.0, 0.0, -4.0]);
    let d = svd(&mut arena, a, Some(&mut u), Some(&mut v))
        .unwrap()
        .into_value();
    assert_eq!(d.as_slice(), &[4.0, 3.0]);
    assert_matrix_near(
        &svd_product(&u, &d, &v),
        &Matrix::from_rows(2, 2, &[3.0, 0.0, 0.0, -4.0]),
        TOL,
        "UᵗDV",
    );
}

#[test]
fn svd_solve_fits_quadratic() {
    let mut arena = Arena::new();
    let a = design_matrix();
    let coeffs = [0.25, -1.5, 2.0];
    let b = &a * &Vector::from_slice(&coeffs);

    let mut u = arena.matrix(6, 6);
    let mut v = arena.matrix(3, 3);
    let d = svd(&mut arena, a, Some(&mut u), Some(&mut v))
        .unwrap()
        .into_value();
    let x = svd_back_substitute(&mut arena, &u, &v, &d, &b).unwrap();
    for k in 0..3 {
        assert_near(x[k], coeffs[k], 1e-9, &format!("c[{}]", k));
    }

    // Parameter covariance (AᵗA)⁻¹ from Vᵗ
    let a = design_matrix();
    let ata = &a.transpose() * &a;
    let mut covar = arena.matrix(3, 3);
    svd_covariance(&mut covar, &v.transpose(), &d).unwrap();
    assert_matrix_near(&(&covar * &ata), &Matrix::identity(3), 1e-9, "C·AᵗA");
}

#[test]
fn svd_invert_square() {
    let mut arena = Arena::new();
    let a = Matrix::from_rows(3, 3, &[2.0, -1.0, 0.0, -1.0, 2.0, -1.0, 0.0, -1.0, 2.0]);
    let mut u = arena.matrix(3, 3);
    let mut v = arena.matrix(3, 3);
    let d = svd(&mut arena, a.clone(), Some(&mut u), Some(&mut v))
        .unwrap()
        .into_value();
    let iw = Vector::from_vec(d.as_slice().iter().map(|&s| 1.0 / s).collect());
    let inv = svd_invert(&mut arena, None, &u, &v, &iw).unwrap();
    assert_matrix_near(&(&a * &inv), &Matrix::identity(3), TOL, "A·A⁻¹");
}

#[test]
fn svd_rejects_bad_factor_shapes() {
    let mut arena = Arena::<f64>::new();
    let mut u = Matrix::zeros(2, 2);
    assert_eq!(
        svd(&mut arena, Matrix::zeros(3, 2), Some(&mut u), None).unwrap_err(),
        LinalgError::ShapeMismatch {
            expected: (3, 3),
            got: (2, 2)
        }
    );
}

#[test]
fn svd_sweep_budget_exhausted() {
    let mut arena = Arena::new();
    let options = QrOptions::default().with_max_sweeps(0);
    let a = Matrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    match svd_with_options(&mut arena, a, None, None, &options).unwrap() {
        Convergence::DidNotConverge { partial, iterations } => {
            assert_eq!(iterations, 0);
            assert_eq!(partial.len(), 2);
            assert!(partial[0] >= partial[1] && partial[1] >= 0.0);
        }
        Convergence::Converged(_) => panic!("expected the sweep budget to run out"),
    }
}

// ── Symmetric eigen ─────────────────────────────────────────────────

#[test]
fn eigen_leaves_input_and_reconstructs() {
    let mut arena = Arena::new();
    let a = &design_matrix().transpose() * &design_matrix();
    let before = a.clone();
    let mut q = arena.matrix(3, 3);
    let values = eigen(&mut arena, &a, Some(&mut q))
        .unwrap()
        .into_result()
        .unwrap();

    assert_eq!(a, before);
    assert!(values[0] >= values[1] && values[1] >= values[2]);
    let rec = Matrix::from_fn(3, 3, |i, j| {
        (0..3).map(|k| q[(i, k)] * values[k] * q[(j, k)]).sum()
    });
    assert_matrix_near(&rec, &a, 1e-9, "QΛQᵗ");
    assert_matrix_near(&(&q * &q.transpose()), &Matrix::identity(3), TOL, "QQᵗ");
}

#[test]
fn eigen_keeps_negative_values() {
    let mut arena = Arena::new();
    let a = Matrix::from_rows(2, 2, &[3.0, 0.0, 0.0, -4.0]);
    let values = eigen(&mut arena, &a, None).unwrap().into_value();
    assert_eq!(values.as_slice(), &[3.0, -4.0]);
}

#[test]
fn eigen_values_match_squared_singular_values() {
    let mut arena = Arena::new();
    let a = design_matrix();
    let ata = &a.transpose() * &a;
    let d = svd(&mut arena, a, None, None).unwrap().into_value();
    let values = eigen(&mut arena, &ata, None).unwrap().into_value();
    for k in 0..3 {
        assert_near(values[k], d[k] * d[k], 1e-9, &format!("λ[{}]", k));
    }
}

#[test]
fn eigen_solve_invert_covariance() {
    let mut arena = Arena::new();
    let a = Matrix::from_rows(3, 3, &[6.0, 2.0, 1.0, 2.0, 5.0, 2.0, 1.0, 2.0, 4.0]);
    let mut q = arena.matrix(3, 3);
    let values = eigen(&mut arena, &a, Some(&mut q)).unwrap().into_value();

    let b = Vector::from_slice(&[1.0, 2.0, 3.0]);
    let x = eigen_back_substitute(&mut arena, &q, &values, &b).unwrap();
    let ax = &a * &x;
    for i in 0..3 {
        assert_near(ax[i], b[i], TOL, &format!("(Ax)[{}]", i));
    }

    let il = Vector::from_vec(values.as_slice().iter().map(|&l| 1.0 / l).collect());
    let inv = eigen_invert(&mut arena, None, &q, &il).unwrap();
    assert_matrix_near(&(&inv * &a), &Matrix::identity(3), TOL, "A⁻¹A");

    let mut covar = arena.matrix(3, 3);
    eigen_covariance(&mut covar, &q, &values).unwrap();
    assert_matrix_near(&covar, &(&inv * &inv), TOL, "A⁻²");
}

#[test]
fn eigen_sweep_budget_exhausted() {
    let mut arena = Arena::new();
    let options = QrOptions::default().with_max_sweeps(0);
    let a = Matrix::from_rows(2, 2, &[2.0, 1.0, 1.0, 2.0]);
    let outcome = eigen_with_options(&mut arena, &a, None, &options).unwrap();
    assert!(!outcome.is_converged());
    assert_eq!(
        outcome.into_result().unwrap_err(),
        LinalgError::ConvergenceFailure { iterations: 0 }
    );
}

#[test]
fn eigen_rejects_rectangular() {
    let mut arena = Arena::<f64>::new();
    assert_eq!(
        eigen(&mut arena, &Matrix::zeros(3, 2), None).unwrap_err(),
        LinalgError::NotSquare { rows: 3, cols: 2 }
    );
}

// ── f32 ─────────────────────────────────────────────────────────────

#[test]
fn single_precision() {
    let mut arena = Arena::<f32>::new();
    let a = Matrix::from_rows(2, 2, &[2.0_f32, -1.0, -1.0, 2.0]);
    let values = eigen(&mut arena, &a, None).unwrap().into_value();
    assert!((values[0] - 3.0).abs() < 1e-5);
    assert!((values[1] - 1.0).abs() < 1e-5);

    let d = svd(&mut arena, a, None, None).unwrap().into_value();
    assert!((d[0] - 3.0).abs() < 1e-5);
    assert!((d[1] - 1.0).abs() < 1e-5);
}
