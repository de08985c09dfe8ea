//! Turning a [`BspFile`] into triangle meshes, one per texture.

pub mod materials;
pub mod settings;

use std::collections::HashMap;

use glam::{Vec2, Vec3};

use crate::{file::FaceVertex, BspFile};
use materials::MaterialMap;
use settings::ImportSettings;

/// A mesh exported from a BSP file. Positions are already scaled and flipped according to the [`ImportSettings`] used.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExportedMesh {
	pub positions: Vec<Vec3>,
	/// Texture coordinates, normalized by the texture size when it's known.
	pub uvs: Vec<Vec2>,
	/// Triangle list.
	pub indices: Vec<[u32; 3]>,

	pub texture: String,
	/// Material for `texture` from the [`MaterialMap`], `None` if it has no entry.
	pub material: Option<String>,

	/// Source face indices of the brush polygons in this mesh.
	pub faces: Vec<u32>,
	/// Indices of the displacements in this mesh.
	pub displacements: Vec<usize>,
}

impl ExportedMesh {
	fn push_vertices(&mut self, vertices: &[FaceVertex], settings: &ImportSettings) -> u32 {
		let first_index = self.positions.len() as u32;
		for vertex in vertices {
			self.positions.push(settings.transform_position(vertex.position));
			self.uvs.push(vertex.uv);
		}
		first_index
	}

	fn push_triangle(&mut self, triangle: [u32; 3], settings: &ImportSettings) {
		let [a, b, c] = triangle;
		self.indices.push(if settings.flip_yz { [a, c, b] } else { [a, b, c] });
	}
}

/// The output of [`BspFile::build_meshes`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshOutput {
	/// One mesh per texture, in the order the textures first appear.
	pub meshes: Vec<ExportedMesh>,
	/// Displacements that couldn't be tessellated.
	pub skipped_displacements: usize,
}

impl MeshOutput {
	#[inline]
	pub fn triangle_count(&self) -> usize {
		self.meshes.iter().map(|mesh| mesh.indices.len()).sum()
	}
}

impl ImportSettings {
	/// Applies `flip_yz` and `world_scale` to a map-space position.
	#[inline]
	pub fn transform_position(&self, pos: Vec3) -> Vec3 {
		let pos = if self.flip_yz { pos * Vec3::new(1., -1., 1.) } else { pos };
		pos * self.world_scale
	}
}

/// Triangles of a convex polygon with `num_vertices` corners, fanning out from the first.
pub fn fan_triangles(num_vertices: u32) -> impl Iterator<Item = [u32; 3]> {
	(0..num_vertices.saturating_sub(2)).map(|t| [0, t + 1, t + 2])
}

impl BspFile {
	/// Builds one mesh per texture out of every brush polygon and, if enabled, every displacement.
	///
	/// The base faces of displacements are included like any other face.
	pub fn build_meshes(&self, settings: &ImportSettings, materials: &MaterialMap) -> MeshOutput {
		let mut out = MeshOutput::default();
		let mut mesh_for_texture: HashMap<String, usize> = HashMap::new();

		for face in &self.faces {
			let mesh = mesh_for(&mut out.meshes, &mut mesh_for_texture, &face.texture);
			mesh.faces.push(face.source_face);

			let first_index = mesh.push_vertices(self.face_vertices(face), settings);
			for triangle in fan_triangles(face.num_vertices) {
				mesh.push_triangle(triangle.map(|i| first_index + i), settings);
			}
		}

		if settings.import_displacements {
			let tessellation = self.tessellate_displacements();
			out.skipped_displacements = tessellation.skipped;

			for surface in &tessellation.surfaces {
				let mesh = mesh_for(&mut out.meshes, &mut mesh_for_texture, &surface.texture);
				mesh.displacements.push(surface.displacement_idx);

				let first_index = mesh.push_vertices(&surface.vertices, settings);
				for triangle in &surface.triangles {
					mesh.push_triangle(triangle.map(|i| first_index + i), settings);
				}
			}
		}

		for mesh in &mut out.meshes {
			mesh.material = materials.lookup(&mesh.texture).map(str::to_string);
			if mesh.material.is_none() && !mesh.texture.is_empty() {
				log::debug!("No material mapped for texture {:?}", mesh.texture);
			}
		}

		log::info!(
			"Built {} meshes with {} triangles ({} displacements skipped)",
			out.meshes.len(),
			out.triangle_count(),
			out.skipped_displacements
		);

		out
	}
}

fn mesh_for<'a>(meshes: &'a mut Vec<ExportedMesh>, mesh_for_texture: &mut HashMap<String, usize>, texture: &str) -> &'a mut ExportedMesh {
	let idx = *mesh_for_texture.entry(texture.to_string()).or_insert_with(|| {
		meshes.push(ExportedMesh {
			texture: texture.to_string(),
			..Default::default()
		});
		meshes.len() - 1
	});

	&mut meshes[idx]
}
