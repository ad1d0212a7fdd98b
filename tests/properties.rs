use proptest::prelude::*;
use reduct::linalg::{eigen, svd};
use reduct::{Arena, Matrix};

fn arb_matrix(max_dim: usize) -> impl Strategy<Value = Matrix<f64>> {
    (1..=max_dim, 1..=max_dim).prop_flat_map(|(m, n)| {
        prop::collection::vec(-10.0_f64..10.0, m * n)
            .prop_map(move |data| Matrix::from_rows(m, n, &data))
    })
}

fn arb_symmetric(max_dim: usize) -> impl Strategy<Value = Matrix<f64>> {
    (1..=max_dim).prop_flat_map(|n| {
        prop::collection::vec(-10.0_f64..10.0, n * n).prop_map(move |data| {
            Matrix::from_fn(n, n, |i, j| {
                let (r, c) = if i <= j { (i, j) } else { (j, i) };
                data[r * n + c]
            })
        })
    })
}

fn max_abs_diff(a: &Matrix<f64>, b: &Matrix<f64>) -> f64 {
    let mut worst = 0.0_f64;
    for i in 0..a.nrows() {
        for j in 0..a.ncols() {
            worst = worst.max((a[(i, j)] - b[(i, j)]).abs());
        }
    }
    worst
}

proptest! {
    #[test]
    fn svd_reconstructs(a in arb_matrix(7)) {
        let (m, n) = a.shape();
        let original = a.clone();
        let scale = 1.0 + original.norm_frobenius();
        let mut arena = Arena::new();
        let mut u = arena.matrix(m, m);
        let mut v = arena.matrix(n, n);
        let outcome = svd(&mut arena, a, Some(&mut u), Some(&mut v)).unwrap();
        prop_assert!(outcome.is_converged());
        let d = outcome.into_value();

        for k in 0..d.len() {
            prop_assert!(d[k] >= 0.0);
            if k > 0 {
                prop_assert!(d[k - 1] >= d[k]);
            }
        }

        let rec = Matrix::from_fn(m, n, |i, j| {
            (0..d.len()).map(|k| u[(k, i)] * d[k] * v[(k, j)]).sum()
        });
        prop_assert!(max_abs_diff(&rec, &original) < 1e-10 * scale);
        prop_assert!(max_abs_diff(&(&u * &u.transpose()), &Matrix::identity(m)) < 1e-10);
        prop_assert!(max_abs_diff(&(&v * &v.transpose()), &Matrix::identity(n)) < 1e-10);
    }

    #[test]
    fn eigen_reconstructs(a in arb_symmetric(7)) {
        let n = a.nrows();
        let scale = 1.0 + a.norm_frobenius();
        let mut arena = Arena::new();
        let mut q = arena.matrix(n, n);
        let outcome = eigen(&mut arena, &a, Some(&mut q)).unwrap();
        prop_assert!(outcome.is_converged());
        let values = outcome.into_value();

        for k in 1..n {
            prop_assert!(values[k - 1] >= values[k]);
        }

        let rec = Matrix::from_fn(n, n, |i, j| {
            (0..n).map(|k| q[(i, k)] * values[k] * q[(j, k)]).sum()
        });
        prop_assert!(max_abs_diff(&rec, &a) < 1e-10 * scale);
        prop_assert!(max_abs_diff(&(&q * &q.transpose()), &Matrix::identity(n)) < 1e-10);
    }
}
