use super::ParseContext;
use crate::error::{ErrorKind, Result, WavError};
use crate::macros::{decode_err, err};
use crate::util::alloc::copy_bytes;

use std::fmt::{Display, Formatter};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

const CUE_POINT_SIZE: usize = 24;

/// A single point in a `cue ` chunk
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct CuePoint {
	/// The identifier referenced by `LIST`/`adtl` entries
	pub id: [u8; 4],
	/// The sample position in playback order
	pub position: u32,
	/// The fourcc of the chunk holding the point, normally `data`
	pub data_chunk_id: [u8; 4],
	/// The offset of the chunk holding the point, 0 for a single `data` chunk
	pub chunk_start: u32,
	/// The offset of the block holding the point, 0 for uncompressed audio
	pub block_start: u32,
	/// The sample offset of the point within the block
	pub sample_offset: u32,
}

impl CuePoint {
	fn read(reader: &mut &[u8]) -> Result<Self> {
		let mut id = [0; 4];
		std::io::Read::read_exact(reader, &mut id)?;
		let position = reader.read_u32::<LittleEndian>()?;
		let mut data_chunk_id = [0; 4];
		std::io::Read::read_exact(reader, &mut data_chunk_id)?;

		Ok(Self {
			id,
			position,
			data_chunk_id,
			chunk_start: reader.read_u32::<LittleEndian>()?,
			block_start: reader.read_u32::<LittleEndian>()?,
			sample_offset: reader.read_u32::<LittleEndian>()?,
		})
	}

	fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
		out.extend_from_slice(&self.id);
		out.write_u32::<LittleEndian>(self.position)?;
		out.extend_from_slice(&self.data_chunk_id);
		out.write_u32::<LittleEndian>(self.chunk_start)?;
		out.write_u32::<LittleEndian>(self.block_start)?;
		out.write_u32::<LittleEndian>(self.sample_offset)?;
		Ok(())
	}
}

/// The `cue ` chunk, a list of marked positions in the audio
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CueChunk {
	/// The cue points, in stored order
	pub points: Vec<CuePoint>,
	/// Bytes following the declared points, kept verbatim
	pub trailing: Vec<u8>,
}

impl CueChunk {
	pub(crate) fn parse(content: &[u8], ctx: &mut ParseContext) -> Result<Self> {
		if content.len() < 4 {
			decode_err!(@BAIL Cue, "Cue chunk is too short to hold a point count");
		}

		let reader = &mut &content[..];
		let declared = reader.read_u32::<LittleEndian>()? as usize;

		let available = reader.len() / CUE_POINT_SIZE;
		let count = if declared > available {
			ctx.recover(WavError::new(ErrorKind::MalformedRecord(
				"Cue chunk declares more points than it holds",
			)))?;
			available
		} else {
			declared
		};

		let mut points = Vec::with_capacity(count);
		for _ in 0..count {
			points.push(CuePoint::read(reader)?);
		}

		log::debug!("Found cue chunk with {} point(s)", points.len());

		Ok(Self {
			points,
			trailing: copy_bytes(reader)?,
		})
	}

	pub(crate) fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
		let Ok(count) = u32::try_from(self.points.len()) else {
			err!(TooMuchData);
		};

		out.write_u32::<LittleEndian>(count)?;
		for point in &self.points {
			point.write_to(out)?;
		}

		out.extend_from_slice(&self.trailing);
		Ok(())
	}
}

impl Display for CueChunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "cue: {} point(s)", self.points.len())?;
		for point in &self.points {
			write!(
				f,
				"\n\t{} @ {} in {}",
				String::from_utf8_lossy(&point.id),
				point.position,
				String::from_utf8_lossy(&point.data_chunk_id)
			)?;
		}

		Ok(())
	}
}
