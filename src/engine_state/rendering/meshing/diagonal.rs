//! Quad triangulation that follows the AO gradient.
//!
//! A quad `v0..v3` (top-left, top-right, bottom-right, bottom-left) can be
//! split along A-C (`v0`-`v2`) or B-D (`v1`-`v3`). Splitting along the diagonal
//! whose endpoints differ least in AO keeps the lighting interpolation smooth.

use crate::error::{MeshError, MeshResult};

/// Returns `true` to split along A-C, `false` for B-D.
///
/// `ao` holds the four vertex AO values in `v0..v3` order. Ties pick A-C.
///
/// # Errors
/// * [`MeshError::InvalidAoValues`] if `ao` does not hold exactly four values
/// * [`MeshError::AoOutOfRange`] if a value is outside `[0, 1]` or NaN
pub fn choose_optimal_diagonal(ao: &[f32]) -> MeshResult<bool> {
    let [a, b, c, d] = <[f32; 4]>::try_from(ao)
        .map_err(|_| MeshError::InvalidAoValues { count: ao.len() })?;
    for value in [a, b, c, d] {
        if !(0.0..=1.0).contains(&value) {
            return Err(MeshError::AoOutOfRange(value));
        }
    }
    Ok((a - c).abs() <= (b - d).abs())
}

/// The six indices of a quad whose first vertex is at `vertex_offset`.
///
/// A-C yields `(v0, v1, v2), (v0, v2, v3)`; B-D yields `(v0, v1, v3), (v1, v2, v3)`.
///
/// # Errors
/// [`MeshError::IndexOffsetOverflow`] if `v3` would not fit in a `u32`.
pub fn generate_triangle_indices(vertex_offset: u32, use_ac: bool) -> MeshResult<[u32; 6]> {
    if vertex_offset > u32::MAX - 3 {
        return Err(MeshError::IndexOffsetOverflow(vertex_offset));
    }
    let o = vertex_offset;
    Ok(if use_ac {
        [o, o + 1, o + 2, o, o + 2, o + 3]
    } else {
        [o, o + 1, o + 3, o + 1, o + 2, o + 3]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_smoother_diagonal() {
        assert_eq!(choose_optimal_diagonal(&[1.0, 0.5, 0.0, 0.25]), Ok(false));
        assert_eq!(choose_optimal_diagonal(&[0.25, 1.0, 0.25, 0.5]), Ok(true));
    }

    #[test]
    fn ties_pick_a_c() {
        assert_eq!(choose_optimal_diagonal(&[0.5; 4]), Ok(true));
        assert_eq!(choose_optimal_diagonal(&[1.0, 0.75, 0.5, 0.25]), Ok(true));
    }

    #[test]
    fn rejects_malformed_input() {
        assert_eq!(
            choose_optimal_diagonal(&[1.0, 1.0, 1.0]),
            Err(MeshError::InvalidAoValues { count: 3 })
        );
        assert_eq!(
            choose_optimal_diagonal(&[1.0, 1.0, 1.0, 1.5]),
            Err(MeshError::AoOutOfRange(1.5))
        );
        assert!(matches!(
            choose_optimal_diagonal(&[f32::NAN, 1.0, 1.0, 1.0]),
            Err(MeshError::AoOutOfRange(_))
        ));
    }

    #[test]
    fn indices_for_both_diagonals() {
        assert_eq!(generate_triangle_indices(4, true), Ok([4, 5, 6, 4, 6, 7]));
        assert_eq!(generate_triangle_indices(4, false), Ok([4, 5, 7, 5, 6, 7]));
    }

    #[test]
    fn offset_near_the_index_limit_is_rejected() {
        assert!(generate_triangle_indices(u32::MAX - 3, true).is_ok());
        assert_eq!(
            generate_triangle_indices(u32::MAX - 2, true),
            Err(MeshError::IndexOffsetOverflow(u32::MAX - 2))
        );
    }
}
