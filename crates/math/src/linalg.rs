//! Linear algebra operations for component decomposition.

use ndarray::{Array1, Array2, Axis};

use crate::MathError;

/// Default sweep limit for [`symmetric_eigen`].
pub const DEFAULT_EIGEN_SWEEPS: usize = 100;

/// Default relative off-diagonal tolerance for [`symmetric_eigen`].
pub const DEFAULT_EIGEN_TOLERANCE: f64 = 1e-12;

/// Result of a symmetric eigendecomposition.
#[derive(Debug, Clone)]
pub struct SymmetricEigen {
    /// Eigenvalues, sorted descending.
    pub eigenvalues: Array1<f64>,
    /// Eigenvectors as columns, in eigenvalue order.
    pub eigenvectors: Array2<f64>,
    /// Number of Jacobi sweeps performed.
    pub sweeps: usize,
}

/// Sample covariance of the columns of `data`.
///
/// Columns are centered first. The divisor is `n - ddof`, floored at 1.
///
/// # Errors
/// Returns `MathError::EmptyData` if there are no rows.
pub fn covariance(data: &Array2<f64>, ddof: usize) -> Result<Array2<f64>, MathError> {
    let n = data.nrows();
    let mean = data.mean_axis(Axis(0)).ok_or(MathError::EmptyData)?;
    let centered = data - &mean;
    let divisor = n.saturating_sub(ddof).max(1) as f64;

    Ok(centered.t().dot(&centered) / divisor)
}

/// Eigendecomposition of a symmetric matrix by cyclic Jacobi rotations.
///
/// Each sweep rotates away every off-diagonal element once. Iteration stops
/// when the off-diagonal Frobenius norm falls below `tolerance` times the
/// matrix norm.
///
/// # Arguments
/// * `matrix` - Symmetric matrix (n x n)
/// * `max_sweeps` - Maximum number of full sweeps
/// * `tolerance` - Relative off-diagonal tolerance
///
/// # Errors
/// Returns an error if the matrix is not square, contains non-finite values,
/// or has not converged after `max_sweeps` sweeps.
pub fn symmetric_eigen(
    matrix: &Array2<f64>,
    max_sweeps: usize,
    tolerance: f64,
) -> Result<SymmetricEigen, MathError> {
    let n = matrix.nrows();
    if matrix.ncols() != n {
        return Err(MathError::DimensionMismatch { expected: n, actual: matrix.ncols() });
    }
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(MathError::LinearAlgebra("matrix contains non-finite values".to_string()));
    }

    let mut a = matrix.clone();
    let mut v = Array2::<f64>::eye(n);

    let total_norm = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let threshold = tolerance * total_norm;

    let mut sweeps = 0;
    let mut converged = off_diagonal_norm(&a) <= threshold;

    while !converged && sweeps < max_sweeps {
        for p in 0..n {
            for q in (p + 1)..n {
                if a[[p, q]] == 0.0 {
                    continue;
                }
                let (cos_theta, sin_theta) = compute_rotation(a[[p, p]], a[[q, q]], a[[p, q]]);
                apply_rotation(&mut a, &mut v, p, q, cos_theta, sin_theta);
            }
        }
        sweeps += 1;
        converged = off_diagonal_norm(&a) <= threshold;
    }

    if !converged {
        return Err(MathError::NonConvergence { iterations: sweeps });
    }

    // Sort eigenpairs by descending eigenvalue
    let diagonal = a.diag().to_owned();
    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&i, &j| diagonal[j].total_cmp(&diagonal[i]));

    let eigenvalues = order.iter().map(|&i| diagonal[i]).collect();
    let eigenvectors = v.select(Axis(1), &order);

    Ok(SymmetricEigen { eigenvalues, eigenvectors, sweeps })
}

fn off_diagonal_norm(a: &Array2<f64>) -> f64 {
    let n = a.nrows();
    let mut sum = 0.0;
    for i in 0..n {
        for j in (i + 1)..n {
            sum += 2.0 * a[[i, j]] * a[[i, j]];
        }
    }
    sum.sqrt()
}

/// Rotation (cos, sin) that zeroes `a[p][q]`.
fn compute_rotation(app: f64, aqq: f64, apq: f64) -> (f64, f64) {
    let tau = (aqq - app) / (2.0 * apq);
    let t = if tau >= 0.0 {
        1.0 / (tau + (1.0 + tau * tau).sqrt())
    } else {
        -1.0 / (-tau + (1.0 + tau * tau).sqrt())
    };

    let cos_theta = 1.0 / (1.0 + t * t).sqrt();
    (cos_theta, t * cos_theta)
}

fn apply_rotation(
    a: &mut Array2<f64>,
    v: &mut Array2<f64>,
    p: usize,
    q: usize,
    cos_theta: f64,
    sin_theta: f64,
) {
    let n = a.nrows();
    let app = a[[p, p]];
    let aqq = a[[q, q]];
    let apq = a[[p, q]];

    a[[p, p]] = cos_theta * cos_theta * app - 2.0 * cos_theta * sin_theta * apq
        + sin_theta * sin_theta * aqq;
    a[[q, q]] = sin_theta * sin_theta * app
        + 2.0 * cos_theta * sin_theta * apq
        + cos_theta * cos_theta * aqq;
    a[[p, q]] = 0.0;
    a[[q, p]] = 0.0;

    for i in 0..n {
        if i != p && i != q {
            let aip = a[[i, p]];
            let aiq = a[[i, q]];

            a[[i, p]] = cos_theta * aip - sin_theta * aiq;
            a[[p, i]] = a[[i, p]];

            a[[i, q]] = sin_theta * aip + cos_theta * aiq;
            a[[q, i]] = a[[i, q]];
        }
    }

    for i in 0..n {
        let vip = v[[i, p]];
        let viq = v[[i, q]];

        v[[i, p]] = cos_theta * vip - sin_theta * viq;
        v[[i, q]] = sin_theta * vip + cos_theta * viq;
    }
}

/// Inverse square root of a symmetric positive definite matrix.
///
/// Computes `V diag(1/sqrt(λ)) Vᵀ`.
///
/// # Errors
/// Returns an error if the decomposition fails or an eigenvalue is not positive.
pub fn inverse_sqrt(matrix: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    let eigen = symmetric_eigen(matrix, DEFAULT_EIGEN_SWEEPS, DEFAULT_EIGEN_TOLERANCE)?;

    if let Some(&min) = eigen.eigenvalues.iter().last() {
        if min <= 0.0 {
            return Err(MathError::LinearAlgebra(format!(
                "matrix is not positive definite (smallest eigenvalue {min:e})"
            )));
        }
    }

    let inv_sqrt = eigen.eigenvalues.mapv(|l| 1.0 / l.sqrt());
    let scaled = &eigen.eigenvectors * &inv_sqrt;
    Ok(scaled.dot(&eigen.eigenvectors.t()))
}

/// Moore-Penrose pseudo-inverse.
///
/// Uses the eigendecomposition of `AᵀA`; directions whose squared singular
/// value is below `1e-15 * max` are treated as null.
///
/// # Returns
/// Matrix of shape (ncols x nrows).
///
/// # Errors
/// Returns an error if the matrix is empty or the decomposition fails.
pub fn pseudo_inverse(matrix: &Array2<f64>) -> Result<Array2<f64>, MathError> {
    if matrix.is_empty() {
        return Err(MathError::EmptyData);
    }

    let gram = matrix.t().dot(matrix);
    let eigen = symmetric_eigen(&gram, DEFAULT_EIGEN_SWEEPS, DEFAULT_EIGEN_TOLERANCE)?;

    let largest = eigen.eigenvalues.iter().copied().fold(0.0_f64, f64::max);
    let cutoff = largest * 1e-15 * matrix.nrows().max(matrix.ncols()) as f64;
    let inv = eigen.eigenvalues.mapv(|l| if l > cutoff { 1.0 / l } else { 0.0 });

    // (AᵀA)⁺ Aᵀ = V diag(1/λ) Vᵀ Aᵀ
    let gram_pinv = (&eigen.eigenvectors * &inv).dot(&eigen.eigenvectors.t());
    Ok(gram_pinv.dot(&matrix.t()))
}
