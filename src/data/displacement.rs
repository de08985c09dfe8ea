//! Displacement lumps. A displacement turns a 4-sided base face into a `(2^power + 1)²` grid of offset vertices.

use glam::Vec3;
use hl2bsp_macros::BspValue;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Highest subdivision power the engine supports.
pub const MAX_DISP_POWER: i32 = 4;

#[derive(BspValue, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspDispInfo {
	/// Start position used for orientation
	pub start_position: Vec3,
	/// Index of the first vertex in the displacement vertex lump.
	pub disp_vert_start: i32,
	/// Index of the first triangle in the displacement triangle lump.
	pub disp_tri_start: i32,
	/// Grid side is `2^power + 1`.
	pub power: i32,
	pub min_tess: i32,
	pub smoothing_angle: f32,
	pub contents: i32,
	/// Index of the face this displacement was built from.
	pub map_face: u16,
	pub padding: u16,
	pub lightmap_alpha_start: i32,
	pub lightmap_sample_position_start: i32,
	/// Indexed left, top, right, bottom.
	pub edge_neighbors: [BspDispNeighbor; 4],
	/// Indexed lower left, upper left, upper right, lower right.
	pub corner_neighbors: [BspDispCornerNeighbors; 4],
	pub allowed_verts: [u32; 10],
}

/// Number of vertices along one side of a displacement of subdivision `power`, `None` if `power` is outside `0..=4`.
#[inline]
pub fn grid_side(power: i32) -> Option<usize> {
	(0..=MAX_DISP_POWER).contains(&power).then(|| (1 << power) + 1)
}

#[derive(BspValue, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspDispNeighbor {
	/// If there's a neighbour spanning the whole side it's always the first one.
	pub sub_neighbors: [BspDispSubNeighbor; 2],
}

#[derive(BspValue, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspDispSubNeighbor {
	/// Index into the displacement info lump, 0xFFFF if there's no neighbour.
	pub neighbor: u16,
	/// Counter-clockwise rotation of the neighbour relative to this displacement, in 90 degree steps.
	pub orientation: u8,
	pub span: u8,
	pub neighbor_span: u8,
	pub padding: u8,
}

#[derive(BspValue, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspDispCornerNeighbors {
	pub neighbors: [u16; 4],
	pub count: u8,
	pub padding: u8,
}

#[derive(BspValue, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspDispVert {
	/// Offset of this grid vertex from the flat base face.
	pub vector: Vec3,
	pub dist: f32,
	/// Blend between the two textures of a blended material.
	pub alpha: f32,
}
