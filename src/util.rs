/// Displays bytes in string form if they make up a string, else just displays them as bytes.
pub(crate) fn display_magic_number(bytes: &[u8]) -> String {
	std::str::from_utf8(bytes).map(str::to_owned).unwrap_or(format!("{bytes:?}"))
}

/// Reads a null-terminated string starting at `offset`, stopping at the end of `data` if no terminator is found.
///
/// Returns `None` if `offset` is outside of `data`.
pub(crate) fn read_c_string(data: &[u8], offset: usize) -> Option<String> {
	let bytes = data.get(offset..)?;
	let end = bytes.iter().position(|b| *b == 0).unwrap_or(bytes.len());

	Some(String::from_utf8_lossy(&bytes[..end]).into_owned())
}

#[test]
fn c_string() {
	let data = b"tools/nodraw\0brick/wall01\0tail";
	assert_eq!(read_c_string(data, 0).as_deref(), Some("tools/nodraw"));
	assert_eq!(read_c_string(data, 13).as_deref(), Some("brick/wall01"));
	assert_eq!(read_c_string(data, 26).as_deref(), Some("tail"));
	assert_eq!(read_c_string(data, data.len()).as_deref(), Some(""));
	assert_eq!(read_c_string(data, data.len() + 1), None);
}

#[test]
fn magic_number_display() {
	assert_eq!(display_magic_number(b"VBSP"), "VBSP");
	assert_eq!(display_magic_number(&[0xFF, 0, 1, 2]), "[255, 0, 1, 2]");
}
