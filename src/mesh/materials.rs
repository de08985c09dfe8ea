//! Texture name to material lookup.

use std::{collections::HashMap, path::Path};

use serde::Deserialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MaterialMapError {
	#[error("Reading material map: {0}")]
	Io(#[from] std::io::Error),
	#[error("Parsing material map: {0}")]
	Json(#[from] serde_json::Error),
}

/// Maps texture names (as stored in the map's string data) to material paths in the target project.
///
/// Texture names are compared case-insensitively, keys are stored lower-case.
#[derive(Debug, Clone, Default, PartialEq, derive_more::Deref, derive_more::DerefMut)]
pub struct MaterialMap {
	#[deref]
	#[deref_mut]
	pub inner: HashMap<String, String>,
}

#[derive(Deserialize)]
struct MaterialEntry {
	texture_name: String,
	material_path: String,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum MaterialMapJson {
	/// `{ "TOOLS/TOOLSNODRAW": "/Game/Materials/NoDraw" }`
	Object(HashMap<String, String>),
	/// `[{ "texture_name": "TOOLS/TOOLSNODRAW", "material_path": "/Game/Materials/NoDraw" }]`
	Entries(Vec<MaterialEntry>),
}

impl MaterialMap {
	pub fn new() -> Self {
		Self::default()
	}

	/// Parses either a JSON object of `texture: material` pairs, or an array of `{ texture_name, material_path }` objects.
	pub fn from_json_str(src: &str) -> Result<Self, MaterialMapError> {
		let pairs: Vec<(String, String)> = match serde_json::from_str(src)? {
			MaterialMapJson::Object(map) => map.into_iter().collect(),
			MaterialMapJson::Entries(entries) => entries.into_iter().map(|entry| (entry.texture_name, entry.material_path)).collect(),
		};

		let mut map = Self::new();
		for (texture, material) in pairs {
			map.insert_material(&texture, material);
		}

		log::debug!("Loaded {} material mappings", map.len());
		Ok(map)
	}

	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, MaterialMapError> {
		Self::from_json_str(&std::fs::read_to_string(path)?)
	}

	/// Adds or replaces the material for `texture`.
	pub fn insert_material(&mut self, texture: &str, material: impl Into<String>) {
		self.inner.insert(texture.to_lowercase(), material.into());
	}

	/// Material path for `texture`, ignoring case.
	pub fn lookup(&self, texture: &str) -> Option<&str> {
		self.inner.get(&texture.to_lowercase()).map(String::as_str)
	}
}
