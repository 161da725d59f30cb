//! Vertex colors derived from ambient occlusion.
//!
//! AO values are turned into grayscale light colors and multiplied into a
//! block's base color. Only a handful of AO levels ever occur, so the grayscale
//! colors are cached by rounded AO value.

use std::collections::HashMap;

use crate::engine_state::rendering::meshing::mesh::MeshBuffer;
use crate::error::{MeshError, MeshResult};

/// Quantization applied to AO values before they are used as cache keys.
const AO_CACHE_RESOLUTION: f32 = 1000.0;

/// Linear RGB color, each channel in `[0, 1]`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct VertexColor {
    /// Red
    pub r: f32,
    /// Green
    pub g: f32,
    /// Blue
    pub b: f32,
}

impl VertexColor {
    /// Full light.
    pub const WHITE: VertexColor = VertexColor::gray(1.0);

    /// A color from its three channels.
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        VertexColor { r, g, b }
    }

    /// A color with all three channels set to `value`.
    pub const fn gray(value: f32) -> Self {
        VertexColor::new(value, value, value)
    }

    /// Channel-wise product, used to light a base color.
    pub fn modulate(self, other: VertexColor) -> Self {
        VertexColor::new(self.r * other.r, self.g * other.g, self.b * other.b)
    }

    /// Linear interpolation towards `other` by `t`.
    pub fn lerp(self, other: VertexColor, t: f32) -> Self {
        VertexColor::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
        )
    }

    /// The channels as `[r, g, b]`.
    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[f32; 3]> for VertexColor {
    fn from([r, g, b]: [f32; 3]) -> Self {
        VertexColor::new(r, g, b)
    }
}

/// Converts AO to colors and applies colors to meshes.
#[derive(Debug, Default)]
pub struct VertexColorManager {
    cache: HashMap<u32, VertexColor>,
}

impl VertexColorManager {
    /// Creates a manager with an empty color cache.
    pub fn new() -> Self {
        VertexColorManager {
            cache: HashMap::new(),
        }
    }

    /// Grayscale light color `(ao, ao, ao)`.
    ///
    /// # Errors
    /// [`MeshError::AoOutOfRange`] if `ao` is outside `[0, 1]` or NaN.
    pub fn ao_to_color(&mut self, ao: f32) -> MeshResult<VertexColor> {
        if !(0.0..=1.0).contains(&ao) {
            return Err(MeshError::AoOutOfRange(ao));
        }
        let key = (ao * AO_CACHE_RESOLUTION).round() as u32;
        Ok(*self
            .cache
            .entry(key)
            .or_insert_with(|| VertexColor::gray(key as f32 / AO_CACHE_RESOLUTION)))
    }

    /// `base` lit by `ao`.
    pub fn shade(&mut self, base: [f32; 3], ao: f32) -> MeshResult<VertexColor> {
        Ok(VertexColor::from(base).modulate(self.ao_to_color(ao)?))
    }

    /// Number of distinct AO levels converted so far.
    pub fn cached_levels(&self) -> usize {
        self.cache.len()
    }

    /// Bilinearly interpolates four corner colors over a `width x height` quad.
    ///
    /// `corners` are in top-left, top-right, bottom-right, bottom-left order.
    /// The result holds `height + 1` rows of `width + 1` colors, row 0 at the
    /// top edge and column 0 at the left edge.
    ///
    /// # Errors
    /// [`MeshError::InvalidQuadSize`] if either dimension is zero.
    pub fn interpolate_colors(
        &self,
        corners: [VertexColor; 4],
        width: usize,
        height: usize,
    ) -> MeshResult<Vec<Vec<VertexColor>>> {
        if width == 0 || height == 0 {
            return Err(MeshError::InvalidQuadSize { width, height });
        }
        let [top_left, top_right, bottom_right, bottom_left] = corners;

        let grid = (0..=height)
            .map(|row| {
                let t = row as f32 / height as f32;
                (0..=width)
                    .map(|col| {
                        let s = col as f32 / width as f32;
                        let top = top_left.lerp(top_right, s);
                        let bottom = bottom_left.lerp(bottom_right, s);
                        top.lerp(bottom, t)
                    })
                    .collect()
            })
            .collect();
        Ok(grid)
    }

    /// Replaces every vertex color of `mesh`.
    ///
    /// # Errors
    /// [`MeshError::ColorCountMismatch`] unless there is exactly one color per vertex.
    pub fn apply_vertex_colors(&self, mesh: &mut MeshBuffer, colors: &[VertexColor]) -> MeshResult<()> {
        let expected = mesh.vertex_count();
        if colors.len() != expected {
            return Err(MeshError::ColorCountMismatch {
                expected,
                actual: colors.len(),
            });
        }
        mesh.colors = colors.iter().flat_map(|c| c.to_array()).collect();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ao_maps_to_gray_and_is_cached() {
        let mut manager = VertexColorManager::new();
        assert_eq!(manager.ao_to_color(0.75), Ok(VertexColor::gray(0.75)));
        assert_eq!(manager.ao_to_color(0.75), Ok(VertexColor::gray(0.75)));
        assert_eq!(manager.ao_to_color(0.25), Ok(VertexColor::gray(0.25)));
        assert_eq!(manager.cached_levels(), 2);
    }

    #[test]
    fn ao_outside_unit_range_is_rejected() {
        let mut manager = VertexColorManager::new();
        assert_eq!(manager.ao_to_color(-0.1), Err(MeshError::AoOutOfRange(-0.1)));
        assert!(manager.ao_to_color(f32::NAN).is_err());
    }

    #[test]
    fn shading_multiplies_the_base_color() {
        let mut manager = VertexColorManager::new();
        let color = manager.shade([0.8, 0.4, 1.0], 0.5).unwrap();
        assert_eq!(color, VertexColor::new(0.4, 0.2, 0.5));
    }

    #[test]
    fn interpolation_hits_the_corners_and_midpoint() {
        let manager = VertexColorManager::new();
        let corners = [
            VertexColor::gray(1.0),
            VertexColor::gray(0.5),
            VertexColor::gray(0.0),
            VertexColor::gray(0.5),
        ];
        let grid = manager.interpolate_colors(corners, 2, 2).unwrap();
        assert_eq!(grid.len(), 3);
        assert!(grid.iter().all(|row| row.len() == 3));
        assert_eq!(grid[0][0], corners[0]);
        assert_eq!(grid[0][2], corners[1]);
        assert_eq!(grid[2][2], corners[2]);
        assert_eq!(grid[2][0], corners[3]);
        assert!((grid[1][1].r - 0.5).abs() < 1e-6);
    }

    #[test]
    fn degenerate_quad_is_rejected() {
        let manager = VertexColorManager::new();
        assert_eq!(
            manager.interpolate_colors([VertexColor::WHITE; 4], 0, 3),
            Err(MeshError::InvalidQuadSize { width: 0, height: 3 })
        );
    }

    #[test]
    fn color_count_must_match_vertices() {
        let manager = VertexColorManager::new();
        let mut mesh = MeshBuffer::new();
        mesh.positions = vec![0.0; 12];
        mesh.colors = vec![1.0; 12];
        assert_eq!(
            manager.apply_vertex_colors(&mut mesh, &[VertexColor::WHITE; 3]),
            Err(MeshError::ColorCountMismatch { expected: 4, actual: 3 })
        );
        manager
            .apply_vertex_colors(&mut mesh, &[VertexColor::gray(0.5); 4])
            .unwrap();
        assert_eq!(mesh.colors, vec![0.5; 12]);
    }
}
