//! Walking the raw lumps to rebuild polygons, texture names and texture coordinates.
//!
//! Every index in a VBSP file is untrusted, so every lookup here is bounds-checked. A broken link never fails the
//! load, it only loses the vertex, face or name that depended on it.

use glam::{Vec2, Vec3};

use crate::{
	data::{geometry::BspFace, texture::{BspTexData, BspTexInfo}},
	file::{FacePolygon, FaceVertex},
	util::read_c_string,
	BspData,
};

/// Output of [`BspData::resolve_geometry`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolvedGeometry {
	pub vertices: Vec<FaceVertex>,
	pub faces: Vec<FacePolygon>,
	/// For each face in the face lump, the index of the polygon built from it, if any.
	pub face_lookup: Vec<Option<u32>>,
	/// Faces with 3 or more edges that were dropped because fewer than 3 of their vertices could be resolved.
	pub skipped_faces: usize,
}

impl BspData {
	#[inline]
	pub fn tex_info_at(&self, tex_info_idx: i32) -> Option<&BspTexInfo> {
		self.tex_info.get(usize::try_from(tex_info_idx).ok()?)
	}

	/// The texdata referenced by the texinfo at `tex_info_idx`.
	pub fn tex_data_for(&self, tex_info_idx: i32) -> Option<&BspTexData> {
		let tex_info = self.tex_info_at(tex_info_idx)?;
		self.tex_data.get(usize::try_from(tex_info.texture_data_idx).ok()?)
	}

	/// Follows texinfo -> texdata -> string table -> string data. Returns `None` at the first broken link.
	pub fn texture_name(&self, tex_info_idx: i32) -> Option<String> {
		let tex_data = self.tex_data_for(tex_info_idx)?;
		let offset = *self.tex_data_string_table.get(usize::try_from(tex_data.name_string_table_idx).ok()?)?;
		let offset = usize::try_from(offset).ok()?;
		if offset >= self.tex_data_string_data.len() {
			return None;
		}

		read_c_string(&self.tex_data_string_data, offset)
	}

	/// Texture coordinates of `pos` on a face using the texinfo at `tex_info_idx`.
	///
	/// The projection is divided by the texture size when the texdata can be found, and left in texels otherwise.
	/// Zero if the texinfo itself can't be found.
	pub fn texture_uv(&self, pos: Vec3, tex_info_idx: i32) -> Vec2 {
		let Some(tex_info) = self.tex_info_at(tex_info_idx) else { return Vec2::ZERO };
		let uv = tex_info.projection.project(pos);

		match self.tex_data_for(tex_info_idx) {
			Some(tex_data) => uv / tex_data.uv_scale(),
			None => uv,
		}
	}

	/// Returns an iterator over the indices (into `vertices`) of the corners of `face`, in winding order.
	///
	/// Surface edges, edges or vertices that are out of range are skipped.
	pub fn face_vertex_indices<'a>(&'a self, face: &BspFace) -> impl Iterator<Item = usize> + 'a {
		let first_edge = face.first_edge as i64;
		let num_edges = face.num_edges.max(0) as i64;

		(first_edge..first_edge + num_edges).filter_map(move |i| {
			let surf_edge = *self.surface_edges.get(usize::try_from(i).ok()?)?;
			let edge = self.edges.get(surf_edge.unsigned_abs() as usize)?;
			let vertex_idx = edge.start(surf_edge) as usize;

			(vertex_idx < self.vertices.len()).then_some(vertex_idx)
		})
	}

	/// Rebuilds every face with at least 3 edges into a polygon with its own run of vertices. Vertices are never
	/// shared between polygons.
	pub fn resolve_geometry(&self) -> ResolvedGeometry {
		let mut out = ResolvedGeometry {
			face_lookup: Vec::with_capacity(self.faces.len()),
			..Default::default()
		};

		for (face_idx, face) in self.faces.iter().enumerate() {
			if face.num_edges < 3 {
				out.face_lookup.push(None);
				continue;
			}

			let tex_info_idx = face.texture_info_idx as i32;
			let first_vertex = out.vertices.len();

			for vertex_idx in self.face_vertex_indices(face) {
				let position = self.vertices[vertex_idx];
				out.vertices.push(FaceVertex {
					position,
					uv: self.texture_uv(position, tex_info_idx),
				});
			}

			let num_vertices = out.vertices.len() - first_vertex;
			if num_vertices < 3 {
				log::warn!(
					"Dropping face {face_idx}: only {num_vertices} of its {} vertices could be resolved",
					face.num_edges
				);
				out.vertices.truncate(first_vertex);
				out.face_lookup.push(None);
				out.skipped_faces += 1;
				continue;
			}

			let texture = self.texture_name(tex_info_idx).unwrap_or_else(|| {
				log::trace!("Face {face_idx} has no resolvable texture name (texinfo {tex_info_idx})");
				String::new()
			});

			out.face_lookup.push(Some(out.faces.len() as u32));
			out.faces.push(FacePolygon {
				first_vertex: first_vertex as u32,
				num_vertices: num_vertices as u32,
				texture,
				source_face: face_idx as u32,
			});
		}

		out
	}
}
