//! The resolved model of one VBSP file, as handed to mesh building.

use std::{path::Path, sync::Arc};

use glam::{Vec2, Vec3};
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::{
	data::displacement::BspDispVert,
	entities::{parse_entities, BspEntity},
	BspData, BspParseError, BspParseInput, BspResult,
};

/// A reconstructed vertex. Each one belongs to exactly one [`FacePolygon`] or displacement grid.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FaceVertex {
	pub position: Vec3,
	/// Texture-space coordinates, divided by the texture size when it's known.
	pub uv: Vec2,
}

/// A brush polygon as a run of [`BspFile::vertices`]. Not triangulated, consumers fan-triangulate it.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct FacePolygon {
	pub first_vertex: u32,
	/// Always at least 3.
	pub num_vertices: u32,
	/// Texture name from the string table, empty if it couldn't be resolved.
	pub texture: String,
	/// Index of the face in the face lump this was built from.
	pub source_face: u32,
}

impl FacePolygon {
	/// Range of this polygon's vertices in [`BspFile::vertices`].
	#[inline]
	pub fn vertex_range(&self) -> std::ops::Range<usize> {
		self.first_vertex as usize..(self.first_vertex + self.num_vertices) as usize
	}
}

/// The parts of a displacement info needed for tessellation.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DisplacementInfo {
	pub start_position: Vec3,
	/// Subdivision power, grid side is `2^power + 1`.
	pub power: i32,
	/// Index of the first grid vertex in [`BspFile::displacement_vertices`].
	pub vert_start: i32,
	/// Index of the base face in the face lump.
	pub map_face: u32,
}

/// Everything the mesh building stage needs from one map file.
///
/// Built once per load and never changed afterwards. Loading the same bytes twice gives equal values.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspFile {
	pub version: i32,
	pub map_revision: i32,

	pub vertices: Vec<FaceVertex>,
	pub faces: Vec<FacePolygon>,
	pub displacements: Vec<DisplacementInfo>,
	pub displacement_vertices: Vec<BspDispVert>,
	pub entities: Vec<BspEntity>,

	/// Faces dropped because fewer than 3 of their vertices could be resolved.
	pub skipped_faces: usize,

	face_lookup: Vec<Option<u32>>,
}

impl BspFile {
	/// Reads and parses the map at `path`.
	pub fn load(path: impl AsRef<Path>) -> BspResult<Self> {
		let path = path.as_ref();
		let bsp = std::fs::read(path).map_err(|err| BspParseError::Io {
			path: path.to_owned(),
			source: Arc::new(err),
		})?;

		Self::parse(BspParseInput { bsp: &bsp })
	}

	/// Parses a map from memory. Nothing is returned unless the whole header and every required lump is valid.
	pub fn parse(input: BspParseInput) -> BspResult<Self> {
		Ok(Self::from_data(&BspData::parse(input)?))
	}

	/// Resolves already parsed lump data.
	pub fn from_data(data: &BspData) -> Self {
		let geometry = data.resolve_geometry();

		let file = Self {
			version: data.header.version,
			map_revision: data.header.map_revision,
			vertices: geometry.vertices,
			faces: geometry.faces,
			displacements: data
				.displacement_infos
				.iter()
				.map(|info| DisplacementInfo {
					start_position: info.start_position,
					power: info.power,
					vert_start: info.disp_vert_start,
					map_face: info.map_face as u32,
				})
				.collect(),
			displacement_vertices: data.displacement_vertices.clone(),
			entities: parse_entities(&data.entities),
			skipped_faces: geometry.skipped_faces,
			face_lookup: geometry.face_lookup,
		};

		log::info!(
			"BSP parsed: {} vertices, {} faces ({} dropped), {} displacements, {} displacement vertices, {} entities",
			file.vertices.len(),
			file.faces.len(),
			file.skipped_faces,
			file.displacements.len(),
			file.displacement_vertices.len(),
			file.entities.len(),
		);

		file
	}

	/// The polygon built from face `source_face` of the face lump, `None` if that face doesn't exist or was dropped.
	pub fn face_for_source_face(&self, source_face: u32) -> Option<&FacePolygon> {
		self.faces.get(self.face_index_for_source_face(source_face)?)
	}

	/// Index into [`faces`](Self::faces) of the polygon built from face `source_face` of the face lump.
	pub fn face_index_for_source_face(&self, source_face: u32) -> Option<usize> {
		let idx = (*self.face_lookup.get(source_face as usize)?)?;
		let idx = idx as usize;
		(idx < self.faces.len()).then_some(idx)
	}

	/// The vertices of `face`.
	#[inline]
	pub fn face_vertices(&self, face: &FacePolygon) -> &[FaceVertex] {
		self.vertices.get(face.vertex_range()).unwrap_or_default()
	}
}
