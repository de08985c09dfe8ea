//! Parsing the entity lump.
//!
//! The lump is a flat list of `{ "key" "value" ... }` blocks. Map compilers and editors don't always agree on the
//! details, so the scanner never fails: anything it doesn't understand is skipped.

use std::collections::HashMap;

use glam::Vec3;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Euler angles in degrees, as stored in an entity's `angles` key.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityRotation {
	pub pitch: f32,
	pub yaw: f32,
	pub roll: f32,
}

/// The keys of one entity block the importer cares about. Missing or malformed keys are left at their defaults.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BspEntity {
	/// `targetname`
	pub name: String,
	/// `classname`
	pub class: String,
	pub origin: Vec3,
	/// `angles`
	pub rotation: EntityRotation,
	/// Either a path to a model file, or `*N` for brush model `N` of this map.
	pub model: String,
}

impl BspEntity {
	/// Builds an entity from the key/value pairs of one block. Keys are expected to be lower-case.
	pub fn from_properties(properties: &HashMap<String, String>) -> Self {
		let mut entity = Self::default();

		if let Some(name) = properties.get("targetname") {
			entity.name = name.clone();
		}
		if let Some(class) = properties.get("classname") {
			entity.class = class.clone();
		}
		if let Some([x, y, z]) = properties.get("origin").and_then(|value| parse_triple(value)) {
			entity.origin = Vec3::new(x, y, z);
		}
		if let Some([pitch, yaw, roll]) = properties.get("angles").and_then(|value| parse_triple(value)) {
			entity.rotation = EntityRotation { pitch, yaw, roll };
		}
		if let Some(model) = properties.get("model") {
			entity.model = model.clone();
		}

		entity
	}

	/// If `model` references one of the map's own brush models (`*N`), returns `N`.
	pub fn brush_model_idx(&self) -> Option<usize> {
		self.model.strip_prefix('*')?.parse().ok()
	}
}

/// Parses 3 whitespace-separated numbers, see [`parse_leading_float`]. Any other count of parts is `None`.
fn parse_triple(value: &str) -> Option<[f32; 3]> {
	let parts: SmallVec<[f32; 3]> = value.split_whitespace().map(parse_leading_float).collect();
	parts.into_inner().ok()
}

/// Parses the number at the start of `s`, ignoring anything after it (`"1.5abc"` is 1.5). 0 if there is none.
pub fn parse_leading_float(s: &str) -> f32 {
	let bytes = s.as_bytes();
	let digits_from = |mut i: usize| {
		while bytes.get(i).is_some_and(u8::is_ascii_digit) {
			i += 1;
		}
		i
	};

	let mut end = if matches!(bytes.first(), Some(b'+' | b'-')) { 1 } else { 0 };
	end = digits_from(end);
	if bytes.get(end) == Some(&b'.') {
		end = digits_from(end + 1);
	}
	if matches!(bytes.get(end), Some(b'e' | b'E')) {
		let sign = usize::from(matches!(bytes.get(end + 1), Some(b'+' | b'-')));
		let exponent_end = digits_from(end + 1 + sign);
		if exponent_end > end + 1 + sign {
			end = exponent_end;
		}
	}

	s[..end].parse().unwrap_or(0.)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanState {
	Outside,
	InBlock,
}

/// Parses every entity block in `text`, in order.
///
/// - Text outside of blocks, and anything inside a block that isn't a quoted `"key" "value"` pair, is skipped.
/// - A key without a quoted value is dropped.
/// - A string missing its closing quote runs to the end of the text.
/// - If a key appears more than once in a block, the last value is used.
/// - Blocks with no pairs, and a final block that is never closed, produce no entity.
pub fn parse_entities(text: &str) -> Vec<BspEntity> {
	let mut entities = Vec::new();
	let mut properties: HashMap<String, String> = HashMap::new();
	let mut state = ScanState::Outside;
	let mut chars = text.chars().peekable();

	loop {
		while chars.next_if(|c| matches!(c, ' ' | '\t' | '\r' | '\n')).is_some() {}
		let Some(c) = chars.next() else { break };

		match (state, c) {
			(ScanState::Outside, '{') => {
				state = ScanState::InBlock;
				properties.clear();
			}
			(ScanState::Outside, _) => {}

			(ScanState::InBlock, '}') => {
				if !properties.is_empty() {
					entities.push(BspEntity::from_properties(&properties));
				}
				properties.clear();
				state = ScanState::Outside;
			}
			(ScanState::InBlock, '"') => {
				let key: String = chars.by_ref().take_while(|c| *c != '"').collect();

				while chars.next_if(|c| matches!(c, ' ' | '\t')).is_some() {}
				// Leave whatever is there for the next pass, it might be the closing brace.
				if chars.next_if_eq(&'"').is_none() {
					continue;
				}

				let value: String = chars.by_ref().take_while(|c| *c != '"').collect();
				properties.insert(key.to_ascii_lowercase(), value);
			}
			(ScanState::InBlock, _) => {}
		}
	}

	if state == ScanState::InBlock {
		log::warn!("Entity lump ends inside an unclosed block, dropping it");
	}

	entities
}

#[cfg(test)]
mod entity_tests {
	use super::*;

	#[test]
	fn single_block() {
		let entities = parse_entities(r#"{"classname" "info_player_start" "origin" "0 0 64"}"#);
		assert_eq!(
			entities,
			[BspEntity {
				class: "info_player_start".into(),
				origin: Vec3::new(0., 0., 64.),
				..Default::default()
			}]
		);
		assert_eq!(entities[0].name, "");
		assert_eq!(entities[0].model, "");
	}

	#[test]
	fn multiple_blocks() {
		let text = "{\n\"classname\" \"worldspawn\"\n\"skyname\" \"sky_day01_01\"\n}\n\
			{\n\"targetname\" \"door_1\"\r\n\"classname\" \"func_door\"\n\"model\" \"*3\"\n\"angles\" \"0 90 0\"\n}\n\0";
		let entities = parse_entities(text);

		assert_eq!(entities.len(), 2);
		assert_eq!(entities[0].class, "worldspawn");
		assert_eq!(entities[1].name, "door_1");
		assert_eq!(entities[1].rotation, EntityRotation { pitch: 0., yaw: 90., roll: 0. });
		assert_eq!(entities[1].brush_model_idx(), Some(3));
	}

	#[test]
	fn unterminated_quote() {
		let entities = parse_entities(r#"{"classname" "foo"#);
		assert!(entities.len() <= 1);

		// The value runs to the end of the text, so the closing brace is part of it.
		assert!(parse_entities(r#"{"classname" "foo}"#).is_empty());
		assert!(parse_entities(r#"{"classn"#).is_empty());
	}

	#[test]
	fn last_value_wins() {
		let entities = parse_entities(r#"{ "classname" "a" "classname" "b" "Origin" "1 2 3" }"#);
		assert_eq!(entities[0].class, "b");
		assert_eq!(entities[0].origin, Vec3::new(1., 2., 3.));
	}

	#[test]
	fn malformed_fields() {
		let entities = parse_entities(r#"{ "classname" "light" "origin" "1 2" "angles" "x 45 0" }"#);
		assert_eq!(entities[0].origin, Vec3::ZERO);
		assert_eq!(entities[0].rotation, EntityRotation { pitch: 0., yaw: 45., roll: 0. });

		let entities = parse_entities(r#"{ "origin" "1.5abc -2. 3e1x" }"#);
		assert_eq!(entities[0].origin, Vec3::new(1.5, -2., 30.));
	}

	#[test]
	fn leading_floats() {
		assert_eq!(parse_leading_float("64"), 64.);
		assert_eq!(parse_leading_float("-0.25"), -0.25);
		assert_eq!(parse_leading_float("+.5"), 0.5);
		assert_eq!(parse_leading_float("1.5abc"), 1.5);
		assert_eq!(parse_leading_float("2e"), 2.);
		assert_eq!(parse_leading_float("2e-1z"), 0.2);
		assert_eq!(parse_leading_float("abc"), 0.);
		assert_eq!(parse_leading_float("-"), 0.);
		assert_eq!(parse_leading_float(""), 0.);
	}

	#[test]
	fn skipped_text() {
		// Junk outside of blocks, a key with no value, and an empty block.
		let entities = parse_entities("junk { \"lonely\" } {} garbage { \"classname\"\t\"prop_static\" \"model\" \"models/a.mdl\" }");
		assert_eq!(entities.len(), 1);
		assert_eq!(entities[0].class, "prop_static");
		assert_eq!(entities[0].model, "models/a.mdl");
		assert_eq!(entities[0].brush_model_idx(), None);
	}
}
