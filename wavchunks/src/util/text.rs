use crate::error::Result;
use crate::macros::err;

/// The text encoding for use in ID3v2 frames
#[derive(Debug, Clone, Eq, PartialEq, Copy, Hash)]
#[repr(u8)]
pub enum TextEncoding {
	/// ISO-8859-1
	Latin1 = 0,
	/// UTF-16 with a byte order mark
	UTF16 = 1,
	/// UTF-16 big endian
	UTF16BE = 2,
	/// UTF-8
	UTF8 = 3,
}

impl TextEncoding {
	/// Get a `TextEncoding` from a u8, must be 0-3 inclusive
	pub fn from_u8(byte: u8) -> Option<Self> {
		match byte {
			0 => Some(Self::Latin1),
			1 => Some(Self::UTF16),
			2 => Some(Self::UTF16BE),
			3 => Some(Self::UTF8),
			_ => None,
		}
	}

	fn terminator(self) -> &'static [u8] {
		match self {
			TextEncoding::Latin1 | TextEncoding::UTF8 => &[0],
			TextEncoding::UTF16 | TextEncoding::UTF16BE => &[0, 0],
		}
	}

	/// Encode `text`, optionally appending the terminator for this encoding
	///
	/// Characters outside of Latin-1 are replaced with `?` when encoding as [`TextEncoding::Latin1`].
	pub(crate) fn encode(self, text: &str, terminated: bool) -> Vec<u8> {
		let mut out = match self {
			TextEncoding::Latin1 => text
				.chars()
				.map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
				.collect(),
			TextEncoding::UTF16 => {
				let mut out = vec![0xFF, 0xFE];
				out.extend(text.encode_utf16().flat_map(u16::to_le_bytes));
				out
			},
			TextEncoding::UTF16BE => text.encode_utf16().flat_map(u16::to_be_bytes).collect(),
			TextEncoding::UTF8 => text.as_bytes().to_vec(),
		};

		if terminated {
			out.extend_from_slice(self.terminator());
		}

		out
	}

	/// Split `bytes` at the first terminator, returning the text before it and everything after
	///
	/// Without a terminator, all of `bytes` is the text.
	pub(crate) fn split_terminated(self, bytes: &[u8]) -> (&[u8], &[u8]) {
		let width = self.terminator().len();

		let end = bytes
			.chunks_exact(width)
			.position(|unit| unit.iter().all(|b| *b == 0))
			.map(|position| position * width);

		match end {
			Some(end) => (&bytes[..end], &bytes[end + width..]),
			None => (bytes, &[]),
		}
	}

	/// Decode `bytes`, trailing NULs are trimmed
	///
	/// # Errors
	///
	/// The text is invalid for the encoding, or UTF-16 text lacks a byte order mark
	pub(crate) fn decode(self, bytes: &[u8]) -> Result<String> {
		let text: String = match self {
			TextEncoding::Latin1 => bytes.iter().copied().map(char::from).collect(),
			TextEncoding::UTF8 => match std::str::from_utf8(bytes) {
				Ok(text) => text.to_owned(),
				Err(_) => err!(TextDecode("Expected a UTF-8 string")),
			},
			TextEncoding::UTF16BE => utf16_decode(bytes, u16::from_be_bytes)?,
			TextEncoding::UTF16 => match bytes {
				[] => String::new(),
				[0xFE, 0xFF, rest @ ..] => utf16_decode(rest, u16::from_be_bytes)?,
				[0xFF, 0xFE, rest @ ..] => utf16_decode(rest, u16::from_le_bytes)?,
				_ => err!(TextDecode("UTF-16 string has an invalid byte order mark")),
			},
		};

		Ok(trim_end_nulls_str(&text).to_owned())
	}
}

fn utf16_decode(bytes: &[u8], endianness: fn([u8; 2]) -> u16) -> Result<String> {
	if bytes.len() % 2 != 0 {
		err!(TextDecode("UTF-16 string has an odd length"));
	}

	let units = bytes
		.chunks_exact(2)
		.map(|unit| endianness([unit[0], unit[1]]));

	match char::decode_utf16(units).collect::<std::result::Result<String, _>>() {
		Ok(text) => Ok(text),
		Err(_) => err!(TextDecode("Given an invalid UTF-16 string")),
	}
}

pub(crate) fn trim_end_nulls_str(text: &str) -> &str {
	text.trim_end_matches('\0')
}
