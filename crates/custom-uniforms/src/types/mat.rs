//! Pure matrix math helpers: no Value types.
//! Column-major storage: element at (row, col) = m[col][row], matching the
//! layout uniform upload expects.
//!
//! Used by functions/constructors.rs (matrix functions) and
//! functions/operators.rs (matrix operators).

pub type M2 = [[f32; 2]; 2];
pub type M3 = [[f32; 3]; 3];
pub type M4 = [[f32; 4]; 4];

// ─── Generic ──────────────────────────────────────────────────────────────────

pub fn identity<const N: usize>() -> [[f32; N]; N] {
    let mut m = [[0.0; N]; N];
    for (i, col) in m.iter_mut().enumerate() {
        col[i] = 1.0;
    }
    m
}

pub fn mul<const N: usize>(a: &[[f32; N]; N], b: &[[f32; N]; N]) -> [[f32; N]; N] {
    let mut c = [[0.0f32; N]; N];
    for col in 0..N {
        for row in 0..N {
            for k in 0..N {
                c[col][row] += a[k][row] * b[col][k];
            }
        }
    }
    c
}

pub fn mul_vec<const N: usize>(m: &[[f32; N]; N], v: &[f32; N]) -> [f32; N] {
    let mut r = [0.0f32; N];
    for (col, column) in m.iter().enumerate() {
        for (row, out) in r.iter_mut().enumerate() {
            *out += column[row] * v[col];
        }
    }
    r
}

pub fn scale<const N: usize>(m: &[[f32; N]; N], s: f32) -> [[f32; N]; N] {
    let mut r = *m;
    for v in r.iter_mut().flatten() { *v *= s; }
    r
}

pub fn add<const N: usize>(a: &[[f32; N]; N], b: &[[f32; N]; N]) -> [[f32; N]; N] {
    let mut r = *a;
    for (x, y) in r.iter_mut().flatten().zip(b.iter().flatten()) { *x += y; }
    r
}

pub fn sub<const N: usize>(a: &[[f32; N]; N], b: &[[f32; N]; N]) -> [[f32; N]; N] {
    let mut r = *a;
    for (x, y) in r.iter_mut().flatten().zip(b.iter().flatten()) { *x -= y; }
    r
}

pub fn transpose<const N: usize>(m: &[[f32; N]; N]) -> [[f32; N]; N] {
    let mut t = [[0.0f32; N]; N];
    for i in 0..N {
        for j in 0..N {
            t[i][j] = m[j][i];
        }
    }
    t
}

// ─── Determinants ─────────────────────────────────────────────────────────────

pub fn m2_det(m: &M2) -> f32 {
    m[0][0] * m[1][1] - m[1][0] * m[0][1]
}

pub fn m3_det(m: &M3) -> f32 {
    m[0][0] * (m[1][1] * m[2][2] - m[2][1] * m[1][2])
  - m[1][0] * (m[0][1] * m[2][2] - m[2][1] * m[0][2])
  + m[2][0] * (m[0][1] * m[1][2] - m[1][1] * m[0][2])
}

/// Determinant of the 3×3 minor obtained by deleting `skip_col` and `skip_row`.
fn minor3(m: &M4, skip_col: usize, skip_row: usize) -> f32 {
    let mut sub = [[0.0f32; 3]; 3];
    for (ci, col) in (0..4).filter(|&c| c != skip_col).enumerate() {
        for (ri, row) in (0..4).filter(|&r| r != skip_row).enumerate() {
            sub[ci][ri] = m[col][row];
        }
    }
    m3_det(&sub)
}

pub fn m4_det(m: &M4) -> f32 {
    (0..4).map(|col| {
        let sign = if col % 2 == 0 { 1.0 } else { -1.0 };
        sign * m[col][0] * minor3(m, col, 0)
    }).sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_is_neutral() {
        let a: M3 = [[1., 2., 3.], [4., 5., 6.], [7., 8., 10.]];
        assert_eq!(mul(&identity::<3>(), &a), a);
        assert_eq!(mul(&a, &identity::<3>()), a);
    }

    #[test]
    fn column_major_vector_product() {
        // Columns (1,0) and (1,1): x' = x + y, y' = y.
        let shear: M2 = [[1., 0.], [1., 1.]];
        assert_eq!(mul_vec(&shear, &[2., 3.]), [5., 3.]);
    }

    #[test]
    fn determinants() {
        assert_eq!(m2_det(&[[1., 3.], [2., 4.]]), -2.0);
        assert_eq!(m3_det(&identity::<3>()), 1.0);
        let scaled = scale(&identity::<4>(), 2.0);
        assert_eq!(m4_det(&scaled), 16.0);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let a: M2 = [[1., 2.], [3., 4.]];
        assert_eq!(transpose(&a), [[1., 3.], [2., 4.]]);
    }
}
