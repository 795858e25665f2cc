use crate::error::Result;
use crate::macros::decode_err;

use std::fmt::{Display, Formatter};

use byteorder::{ByteOrder, LittleEndian};

/// The `fact` chunk, holding the number of sample frames of compressed audio
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct FactChunk {
	/// The number of sample frames in the `data` chunk
	pub sample_length: u32,
}

impl FactChunk {
	pub(crate) fn parse(content: &[u8]) -> Result<Self> {
		if content.len() != 4 {
			decode_err!(@BAIL Fact, "Fact chunk is not exactly 4 bytes");
		}

		Ok(Self {
			sample_length: LittleEndian::read_u32(content),
		})
	}

	pub(crate) fn write_to(&self, out: &mut Vec<u8>) {
		out.extend_from_slice(&self.sample_length.to_le_bytes());
	}
}

impl Display for FactChunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "fact: {} sample frame(s)", self.sample_length)
	}
}
