//! Expanding displacements into vertex grids.
//!
//! A displacement's base face is a quad. Its first four vertices are used as the grid corners `(0,0)`, `(1,0)`,
//! `(1,1)`, `(0,1)`, in the order the face lists them, and are not reordered to match `start_position`.

use thiserror::Error;

use crate::{
	data::displacement::{grid_side, BspDispVert},
	file::{DisplacementInfo, FaceVertex},
	BspFile,
};

/// A tessellated displacement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplacementSurface {
	/// Index into [`BspFile::displacements`].
	pub displacement_idx: usize,
	/// Index into [`BspFile::faces`] of the base face.
	pub base_face: usize,
	/// Vertices along one side of the grid.
	pub side: usize,
	/// `side * side` vertices, row-major.
	pub vertices: Vec<FaceVertex>,
	/// Indices into `vertices`.
	pub triangles: Vec<[u32; 3]>,
	/// Texture name of the base face.
	pub texture: String,
}

/// Why a displacement couldn't be tessellated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DisplacementSkip {
	#[error("displacement {0} does not exist")]
	MissingDisplacement(usize),
	#[error("base face {0} does not exist or was dropped")]
	BaseFaceOutOfRange(u32),
	#[error("base face has {0} vertices, only quads can be displaced")]
	BaseFaceNotQuad(u32),
	#[error("power {0} is outside of 0..=4")]
	InvalidPower(i32),
	#[error("vertices {start}..{end} are outside of the {len} displacement vertices")]
	VertexRangeOutOfBounds { start: i64, end: i64, len: usize },
}

/// Output of [`BspFile::tessellate_displacements`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TessellationOutput {
	pub surfaces: Vec<DisplacementSurface>,
	/// Displacements that were skipped, see [`DisplacementSkip`].
	pub skipped: usize,
}

impl BspFile {
	/// Tessellates the displacement at `displacement_idx`.
	pub fn tessellate_displacement(&self, displacement_idx: usize) -> Result<DisplacementSurface, DisplacementSkip> {
		let info = self
			.displacements
			.get(displacement_idx)
			.ok_or(DisplacementSkip::MissingDisplacement(displacement_idx))?;

		let DisplacementInfo { power, vert_start, map_face, .. } = *info;

		let base_face = self.face_index_for_source_face(map_face).ok_or(DisplacementSkip::BaseFaceOutOfRange(map_face))?;
		let base = &self.faces[base_face];
		let [a, b, c, d, ..] = self.face_vertices(base) else {
			return Err(DisplacementSkip::BaseFaceNotQuad(base.num_vertices));
		};

		let side = grid_side(power).ok_or(DisplacementSkip::InvalidPower(power))?;
		let start = vert_start as i64;
		let end = start + (side * side) as i64;
		let offsets = usize::try_from(start)
			.ok()
			.and_then(|start| self.displacement_vertices.get(start..end as usize))
			.ok_or(DisplacementSkip::VertexRangeOutOfBounds {
				start,
				end,
				len: self.displacement_vertices.len(),
			})?;

		Ok(DisplacementSurface {
			displacement_idx,
			base_face,
			side,
			vertices: displaced_grid([*a, *b, *c, *d], side, offsets),
			triangles: grid_triangles(side),
			texture: base.texture.clone(),
		})
	}

	/// Tessellates every displacement, skipping (and counting) the ones that can't be.
	pub fn tessellate_displacements(&self) -> TessellationOutput {
		let mut out = TessellationOutput::default();

		for displacement_idx in 0..self.displacements.len() {
			match self.tessellate_displacement(displacement_idx) {
				Ok(surface) => out.surfaces.push(surface),
				Err(reason) => {
					log::warn!("Skipping displacement {displacement_idx}: {reason}");
					out.skipped += 1;
				}
			}
		}

		out
	}
}

/// Bilinearly interpolates `corners` (in grid order `(0,0)`, `(1,0)`, `(1,1)`, `(0,1)`) over a `side * side` grid,
/// adding each grid vertex's offset vector to its position. `offsets` must hold at least `side * side` vertices.
///
/// UVs are interpolated the same way, displacements have no projection of their own.
pub fn displaced_grid(corners: [FaceVertex; 4], side: usize, offsets: &[BspDispVert]) -> Vec<FaceVertex> {
	let [c00, c10, c11, c01] = corners;
	let max = (side.max(2) - 1) as f32;

	let mut vertices = Vec::with_capacity(side * side);
	for y in 0..side {
		let v = y as f32 / max;
		for x in 0..side {
			let u = x as f32 / max;

			let bottom = c00.position.lerp(c10.position, u);
			let top = c01.position.lerp(c11.position, u);
			let bottom_uv = c00.uv.lerp(c10.uv, u);
			let top_uv = c01.uv.lerp(c11.uv, u);

			vertices.push(FaceVertex {
				position: bottom.lerp(top, v) + offsets[y * side + x].vector,
				uv: bottom_uv.lerp(top_uv, v),
			});
		}
	}

	vertices
}

/// Two triangles per grid cell, each cell `A B C D` (`A` at `(x, y)`, going around through `(x+1, y)`) is split along `A-C`.
pub fn grid_triangles(side: usize) -> Vec<[u32; 3]> {
	let cells = side.saturating_sub(1);
	let mut triangles = Vec::with_capacity(cells * cells * 2);

	for y in 0..cells {
		for x in 0..cells {
			let a = (y * side + x) as u32;
			let b = a + 1;
			let c = ((y + 1) * side + x + 1) as u32;
			let d = ((y + 1) * side + x) as u32;

			triangles.push([a, b, c]);
			triangles.push([a, c, d]);
		}
	}

	triangles
}

#[cfg(test)]
mod tessellate_tests {
	use glam::{Vec2, Vec3};

	use super::*;

	fn offsets(count: usize, vector: Vec3) -> Vec<BspDispVert> {
		vec![BspDispVert { vector, dist: 1., alpha: 0. }; count]
	}

	fn unit_quad() -> [FaceVertex; 4] {
		[
			FaceVertex { position: Vec3::new(0., 0., 0.), uv: Vec2::new(0., 0.) },
			FaceVertex { position: Vec3::new(4., 0., 0.), uv: Vec2::new(1., 0.) },
			FaceVertex { position: Vec3::new(4., 4., 0.), uv: Vec2::new(1., 1.) },
			FaceVertex { position: Vec3::new(0., 4., 0.), uv: Vec2::new(0., 1.) },
		]
	}

	#[test]
	fn power_two_grid() {
		let side = grid_side(2).unwrap();
		assert_eq!(side, 5);

		let vertices = displaced_grid(unit_quad(), side, &offsets(25, Vec3::ZERO));
		assert_eq!(vertices.len(), 25);
		assert_eq!(grid_triangles(side).len(), 32);

		// One unit per step on a 4x4 quad.
		assert_eq!(vertices[1].position, Vec3::new(1., 0., 0.));
		assert_eq!(vertices[5].position, Vec3::new(0., 1., 0.));
		assert_eq!(vertices[12].position, Vec3::new(2., 2., 0.));
		assert_eq!(vertices[12].uv, Vec2::new(0.5, 0.5));
		assert_eq!(vertices[24].position, Vec3::new(4., 4., 0.));
	}

	#[test]
	fn offsets_are_added() {
		let mut offsets = offsets(9, Vec3::ZERO);
		offsets[0].vector = Vec3::new(0., 0., 3.);
		offsets[4].vector = Vec3::new(0., 0., -1.);

		let vertices = displaced_grid(unit_quad(), 3, &offsets);
		assert_eq!(vertices[0].position, Vec3::new(0., 0., 3.));
		assert_eq!(vertices[4].position, Vec3::new(2., 2., -1.));
		assert_eq!(vertices[8].position, Vec3::new(4., 4., 0.));
	}

	#[test]
	fn cell_split() {
		assert_eq!(grid_triangles(2), [[0, 1, 3], [0, 3, 2]]);
		assert_eq!(grid_triangles(3)[2], [1, 2, 5]);
		assert!(grid_triangles(1).is_empty());
	}
}
