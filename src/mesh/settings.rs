//! Import configuration.

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// INI section the settings are read from.
pub const SETTINGS_SECTION: &str = "import";

#[derive(Error, Debug)]
pub enum ImportSettingsError {
	#[error("Reading settings: {0}")]
	Ini(#[from] ini::Error),
	#[error("Parsing settings: {0}")]
	Syntax(#[from] ini::ParseError),
	#[error("Invalid value {value:?} for setting {key}, expected {expected}")]
	InvalidValue { key: &'static str, value: String, expected: &'static str },
}

/// Controls how a parsed map is turned into meshes. Nothing here affects parsing itself.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSettings {
	/// Multiplied into every position. The default converts Source units (inches) to centimetres.
	pub world_scale: f32,
	/// Mirror the Y axis to go from Source's right-handed space to a left-handed one. Triangle winding is reversed
	/// so faces keep pointing the same way.
	pub flip_yz: bool,
	/// Where to load the [`MaterialMap`](super::materials::MaterialMap) from, if anywhere.
	pub material_json_path: Option<PathBuf>,
	/// Include displacement surfaces in the meshes.
	pub import_displacements: bool,
}

impl Default for ImportSettings {
	fn default() -> Self {
		Self {
			world_scale: 2.54,
			flip_yz: true,
			material_json_path: None,
			import_displacements: true,
		}
	}
}

impl ImportSettings {
	/// Reads settings from the `[import]` section of an INI document. Keys that aren't present keep their defaults.
	///
	/// ```ini
	/// [import]
	/// world_scale = 1.0
	/// flip_yz = false
	/// material_json_path = materials.json
	/// ```
	pub fn from_ini_str(src: &str) -> Result<Self, ImportSettingsError> {
		Self::from_ini(&Ini::load_from_str(src)?)
	}

	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ImportSettingsError> {
		Self::from_ini(&Ini::load_from_file(path)?)
	}

	pub fn from_ini(ini: &Ini) -> Result<Self, ImportSettingsError> {
		let mut settings = Self::default();
		let Some(section) = ini.section(Some(SETTINGS_SECTION)) else {
			log::debug!("No [{SETTINGS_SECTION}] section, using default import settings");
			return Ok(settings);
		};

		if let Some(value) = section.get("world_scale") {
			settings.world_scale = value
				.trim()
				.parse::<f32>()
				.ok()
				.filter(|scale| scale.is_finite() && *scale > 0.)
				.ok_or_else(|| invalid("world_scale", value, "a positive number"))?;
		}
		if let Some(value) = section.get("flip_yz") {
			settings.flip_yz = parse_bool("flip_yz", value)?;
		}
		if let Some(value) = section.get("material_json_path") {
			let value = value.trim();
			settings.material_json_path = (!value.is_empty()).then(|| PathBuf::from(value));
		}
		if let Some(value) = section.get("import_displacements") {
			settings.import_displacements = parse_bool("import_displacements", value)?;
		}

		Ok(settings)
	}
}

fn parse_bool(key: &'static str, value: &str) -> Result<bool, ImportSettingsError> {
	match value.trim().to_ascii_lowercase().as_str() {
		"true" | "1" | "yes" | "on" => Ok(true),
		"false" | "0" | "no" | "off" => Ok(false),
		_ => Err(invalid(key, value, "a boolean")),
	}
}

fn invalid(key: &'static str, value: &str, expected: &'static str) -> ImportSettingsError {
	ImportSettingsError::InvalidValue { key, value: value.to_string(), expected }
}

#[cfg(test)]
mod settings_tests {
	use super::*;

	#[test]
	fn defaults() {
		let settings = ImportSettings::from_ini_str("").unwrap();
		assert_eq!(settings, ImportSettings::default());
		assert_eq!(settings.world_scale, 2.54);
		assert!(settings.flip_yz);
		assert!(settings.import_displacements);
	}

	#[test]
	fn overrides() {
		let settings = ImportSettings::from_ini_str(
			"[import]\nworld_scale = 1.0\nflip_yz = false\nmaterial_json_path = maps/materials.json\n\n[other]\nflip_yz = true\n",
		)
		.unwrap();

		assert_eq!(settings.world_scale, 1.);
		assert!(!settings.flip_yz);
		assert_eq!(settings.material_json_path, Some(PathBuf::from("maps/materials.json")));
		assert!(settings.import_displacements);
	}

	#[test]
	fn invalid_values() {
		assert!(matches!(
			ImportSettings::from_ini_str("[import]\nworld_scale = -2"),
			Err(ImportSettingsError::InvalidValue { key: "world_scale", .. })
		));
		assert!(matches!(
			ImportSettings::from_ini_str("[import]\nimport_displacements = maybe"),
			Err(ImportSettingsError::InvalidValue { key: "import_displacements", .. })
		));
	}
}
