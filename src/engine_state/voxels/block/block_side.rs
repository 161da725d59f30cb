//! # Block Side Module
//!
//! The six faces of a voxel, with the geometry every mesher shares: outward
//! normals, the corner positions of a face quad in emission order, and the
//! mapping from emitted vertex to ambient occlusion corner.
//!
//! ## Vertex order
//!
//! A face quad is emitted as four vertices `v0..v3` labelled top-left,
//! top-right, bottom-right and bottom-left. The labels are chosen per face so
//! that both `(v0, v1, v2)` and `(v0, v1, v3)` wind counter-clockwise when the
//! face is viewed from outside the voxel. Either triangulation diagonal
//! therefore keeps the outward winding.
//!
//! ## AO corners
//!
//! Ambient occlusion corners are numbered in the face's tangent plane rather
//! than in emission order. With `(u, v)` the two tangent axes of a face
//! (`±X: (Z, Y)`, `±Y: (X, Z)`, `±Z: (X, Y)`), corner `0` is `(-u, -v)`,
//! `1` is `(+u, -v)`, `2` is `(+u, +v)` and `3` is `(-u, +v)`. Two faces that
//! share a world-space vertex from opposite sides of a plane use the same
//! corner index for it.

use std::fmt;
use std::str::FromStr;

use cgmath::Vector3;

use crate::error::MeshError;

/// The six faces of a voxel.
///
/// The discriminant indexes every per-face table in the crate.
#[derive(PartialEq, Eq, Hash, Copy, Clone, Debug)]
pub enum BlockSide {
    /// The face pointing towards +X.
    RIGHT = 0,
    /// The face pointing towards -X.
    LEFT = 1,
    /// The face pointing towards +Y.
    TOP = 2,
    /// The face pointing towards -Y.
    BOTTOM = 3,
    /// The face pointing towards +Z.
    FRONT = 4,
    /// The face pointing towards -Z.
    BACK = 5,
}

/// Unit-cube corner positions of each face, in `v0..v3` (TL, TR, BR, BL) order.
const FACE_CORNERS: [[[i32; 3]; 4]; 6] = [
    // RIGHT (+X)
    [[1, 1, 0], [1, 1, 1], [1, 0, 1], [1, 0, 0]],
    // LEFT (-X)
    [[0, 1, 1], [0, 1, 0], [0, 0, 0], [0, 0, 1]],
    // TOP (+Y)
    [[0, 1, 1], [1, 1, 1], [1, 1, 0], [0, 1, 0]],
    // BOTTOM (-Y)
    [[1, 0, 1], [0, 0, 1], [0, 0, 0], [1, 0, 0]],
    // FRONT (+Z)
    [[1, 1, 1], [0, 1, 1], [0, 0, 1], [1, 0, 1]],
    // BACK (-Z)
    [[0, 1, 0], [1, 1, 0], [1, 0, 0], [0, 0, 0]],
];

/// AO corner index used by each emitted vertex `v0..v3` of each face.
const VERTEX_TO_CORNER: [[usize; 4]; 6] = [
    [3, 2, 1, 0], // RIGHT
    [2, 3, 0, 1], // LEFT
    [3, 2, 1, 0], // TOP
    [2, 3, 0, 1], // BOTTOM
    [2, 3, 0, 1], // FRONT
    [3, 2, 1, 0], // BACK
];

impl BlockSide {
    /// All six faces in discriminant order.
    pub fn all() -> [BlockSide; 6] {
        [
            BlockSide::RIGHT,
            BlockSide::LEFT,
            BlockSide::TOP,
            BlockSide::BOTTOM,
            BlockSide::FRONT,
            BlockSide::BACK,
        ]
    }

    /// The face perpendicular to `axis` (0 = X, 1 = Y, 2 = Z) on the given side.
    pub fn from_axis(axis: usize, positive: bool) -> BlockSide {
        match (axis, positive) {
            (0, true) => BlockSide::RIGHT,
            (0, false) => BlockSide::LEFT,
            (1, true) => BlockSide::TOP,
            (1, false) => BlockSide::BOTTOM,
            (2, true) => BlockSide::FRONT,
            _ => BlockSide::BACK,
        }
    }

    /// The axis the face is perpendicular to (0 = X, 1 = Y, 2 = Z).
    pub fn axis(self) -> usize {
        self as usize / 2
    }

    /// `true` if the normal points along the positive axis.
    pub fn is_positive(self) -> bool {
        self as usize % 2 == 0
    }

    /// Offset from a voxel to the neighbor this face looks at.
    pub fn normal(self) -> [i32; 3] {
        let mut normal = [0; 3];
        normal[self.axis()] = if self.is_positive() { 1 } else { -1 };
        normal
    }

    /// The outward normal as a float vector, for vertex attributes.
    pub fn normal_vector(self) -> Vector3<f32> {
        let [x, y, z] = self.normal();
        Vector3::new(x as f32, y as f32, z as f32)
    }

    /// The `(u, v)` tangent axes AO corners are numbered in.
    pub fn tangent_axes(self) -> (usize, usize) {
        match self.axis() {
            0 => (2, 1),
            1 => (0, 2),
            _ => (0, 1),
        }
    }

    /// Unit-cube corner positions of the face in TL, TR, BR, BL order.
    pub fn corners(self) -> [[i32; 3]; 4] {
        FACE_CORNERS[self as usize]
    }

    /// AO corner index of each emitted vertex.
    pub fn vertex_to_corner(self) -> [usize; 4] {
        VERTEX_TO_CORNER[self as usize]
    }

    /// Lower-case name of the face, as accepted by [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            BlockSide::RIGHT => "right",
            BlockSide::LEFT => "left",
            BlockSide::TOP => "top",
            BlockSide::BOTTOM => "bottom",
            BlockSide::FRONT => "front",
            BlockSide::BACK => "back",
        }
    }
}

impl fmt::Display for BlockSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BlockSide {
    type Err = MeshError;

    /// Accepts face names (`"top"`) and signed axes (`"+y"`, `"-x"`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "right" | "east" | "+x" | "px" => Ok(BlockSide::RIGHT),
            "left" | "west" | "-x" | "nx" => Ok(BlockSide::LEFT),
            "top" | "up" | "+y" | "py" => Ok(BlockSide::TOP),
            "bottom" | "down" | "-y" | "ny" => Ok(BlockSide::BOTTOM),
            "front" | "south" | "+z" | "pz" => Ok(BlockSide::FRONT),
            "back" | "north" | "-z" | "nz" => Ok(BlockSide::BACK),
            _ => Err(MeshError::InvalidFaceName(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sub(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
        [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
    }

    fn cross(a: [i32; 3], b: [i32; 3]) -> [i32; 3] {
        [
            a[1] * b[2] - a[2] * b[1],
            a[2] * b[0] - a[0] * b[2],
            a[0] * b[1] - a[1] * b[0],
        ]
    }

    fn dot(a: [i32; 3], b: [i32; 3]) -> i32 {
        a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
    }

    #[test]
    fn both_diagonals_wind_outward() {
        for side in BlockSide::all() {
            let c = side.corners();
            let n = side.normal();
            let triangles = [
                (c[0], c[1], c[2]),
                (c[0], c[2], c[3]),
                (c[0], c[1], c[3]),
                (c[1], c[2], c[3]),
            ];
            for (a, b, d) in triangles {
                assert!(dot(cross(sub(b, a), sub(d, a)), n) > 0, "{side} winds inward");
            }
        }
    }

    #[test]
    fn corners_lie_on_the_face_plane() {
        for side in BlockSide::all() {
            let plane = if side.is_positive() { 1 } else { 0 };
            for corner in side.corners() {
                assert_eq!(corner[side.axis()], plane);
            }
        }
    }

    #[test]
    fn vertex_to_corner_matches_tangent_signs() {
        for side in BlockSide::all() {
            let (u, v) = side.tangent_axes();
            for (vertex, corner) in side.corners().iter().zip(side.vertex_to_corner()) {
                let positive_u = corner == 1 || corner == 2;
                let positive_v = corner >= 2;
                assert_eq!(vertex[u] == 1, positive_u, "{side} corner {corner}");
                assert_eq!(vertex[v] == 1, positive_v, "{side} corner {corner}");
            }
        }
    }

    #[test]
    fn axis_and_sign_round_trip() {
        for side in BlockSide::all() {
            assert_eq!(BlockSide::from_axis(side.axis(), side.is_positive()), side);
        }
    }

    #[test]
    fn parses_names_and_signed_axes() {
        assert_eq!("top".parse::<BlockSide>().unwrap(), BlockSide::TOP);
        assert_eq!("+X".parse::<BlockSide>().unwrap(), BlockSide::RIGHT);
        assert_eq!("-z".parse::<BlockSide>().unwrap(), BlockSide::BACK);
        for side in BlockSide::all() {
            assert_eq!(side.name().parse::<BlockSide>().unwrap(), side);
        }
    }

    #[test]
    fn unknown_face_name_is_an_error() {
        assert_eq!(
            "diagonal".parse::<BlockSide>(),
            Err(MeshError::InvalidFaceName("diagonal".to_string()))
        );
    }
}
