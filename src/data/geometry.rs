//! Brush geometry lumps: edges and faces. Vertices are plain [`Vec3`](glam::Vec3)s and surface edges plain `i32`s.

use glam::IVec2;
use hl2bsp_macros::BspValue;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(BspValue, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspEdge {
	/// The index to the first vertex this edge connects
	pub a: u16,
	/// The index to the second vertex this edge connects
	pub b: u16,
}

impl BspEdge {
	/// The vertex a surface edge of this edge starts at. Negative surface edges walk the edge backwards.
	#[inline]
	pub fn start(&self, surf_edge: i32) -> u16 {
		if surf_edge.is_negative() {
			self.b
		} else {
			self.a
		}
	}
}

#[derive(BspValue, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspFace {
	/// Index of the plane the face is parallel to
	pub plane_idx: u16,
	/// Zero if the face points the same way as its plane
	pub side: u8,
	/// 1 if on a node, 0 if in a leaf
	pub on_node: u8,

	/// Index of the first edge (in the surface edge array)
	pub first_edge: i32,
	/// Number of consecutive edges (in the surface edge array)
	pub num_edges: i16,
	/// Index of the texture info structure
	pub texture_info_idx: i16,
	/// Index of the displacement info if this face is the base of a displacement, otherwise -1
	pub displacement_info_idx: i16,
	pub surface_fog_volume_id: i16,

	/// Switchable lighting styles, 255 is unused.
	pub lightmap_styles: [u8; 4],
	/// Offset of the lightmap (in bytes) in the lighting lump, or -1 if no lightmap
	pub lightmap_offset: i32,
	/// Face area in units^2
	pub area: f32,
	pub lightmap_texture_mins_in_luxels: IVec2,
	pub lightmap_texture_size_in_luxels: IVec2,
	/// Index of the original face this face was split from.
	pub orig_face: i32,
	pub num_prims: u16,
	pub first_prim_id: u16,
	pub smoothing_groups: u32,
}

impl BspFace {
	/// The displacement this face is the base of, if any.
	#[inline]
	pub fn displacement(&self) -> Option<usize> {
		usize::try_from(self.displacement_info_idx).ok()
	}
}
