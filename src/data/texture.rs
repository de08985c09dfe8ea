//! Data definitions for texture projection and material metadata.

use glam::{dvec2, Vec2, Vec3};
use hl2bsp_macros::BspValue;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

#[derive(BspValue, Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PlanarTextureProjection {
	pub u_axis: Vec3,
	pub u_offset: f32,

	pub v_axis: Vec3,
	pub v_offset: f32,
}

impl PlanarTextureProjection {
	/// Projects a position onto this plane, giving texture-space coordinates in texels.
	///
	/// Converts to double for calculation to minimise floating-point imprecision as demonstrated [here](https://github.com/Novum/vkQuake/blob/b6eb0cf5812c09c661d51e3b95fc08d88da2288a/Quake/gl_model.c#L1315).
	pub fn project(&self, point: Vec3) -> Vec2 {
		dvec2(
			point.as_dvec3().dot(self.u_axis.as_dvec3()) + self.u_offset as f64,
			point.as_dvec3().dot(self.v_axis.as_dvec3()) + self.v_offset as f64,
		)
		.as_vec2()
	}
}

#[derive(BspValue, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspTexInfo {
	/// Texture-space basis, `s` then `t`.
	pub projection: PlanarTextureProjection,
	/// Same as `projection`, but in luxels.
	pub lightmap_projection: PlanarTextureProjection,
	/// `SURF_*` flags.
	pub flags: i32,
	/// Index into the texdata lump, or -1.
	pub texture_data_idx: i32,
}

impl BspTexInfo {
	/// Never drawn, used for sky boxes.
	pub const SURF_SKY: i32 = 0x4;
	/// Don't bother referencing the texture.
	pub const SURF_NODRAW: i32 = 0x80;
	/// Don't need lightmaps.
	pub const SURF_NOLIGHT: i32 = 0x400;

	#[inline]
	pub fn has_flag(&self, flag: i32) -> bool {
		self.flags & flag != 0
	}
}

#[derive(BspValue, Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspTexData {
	/// Average color of the texture, used by radiosity.
	pub reflectivity: Vec3,
	/// Index into the texdata string table.
	pub name_string_table_idx: i32,
	pub width: i32,
	pub height: i32,
	pub view_width: i32,
	pub view_height: i32,
}

impl BspTexData {
	/// Texture size for normalizing UVs, each axis at least 1.
	#[inline]
	pub fn uv_scale(&self) -> Vec2 {
		Vec2::new(self.width.max(1) as f32, self.height.max(1) as f32)
	}
}
