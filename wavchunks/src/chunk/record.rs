//! The `tag + size + body` record walker shared by every container
//!
//! RIFF chunks, LIST sub-chunks and ID3v2 frames all share the same shape, and only differ in
//! the byte order of the size field and how many bytes of the body the size leaves out.

use crate::config::ChunkPadding;
use crate::error::Result;
use crate::macros::err;
use crate::util::synchsafe::SynchsafeInteger;

use std::marker::PhantomData;

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// The size of a record header, the fourcc followed by the size field
pub(crate) const RECORD_HEADER_SIZE: usize = 8;

/// Describes how a record's size field is stored
pub(crate) trait RecordLayout {
	/// The byte order of the size field
	type Order: ByteOrder;

	/// The number of body bytes the size field does not count
	const SIZE_BIAS: u32;

	fn read_size(raw: &[u8]) -> u32 {
		Self::Order::read_u32(raw)
	}

	fn write_size(size: u32, out: &mut [u8]) -> Result<()> {
		Self::Order::write_u32(out, size);
		Ok(())
	}
}

/// RIFF chunks and LIST sub-chunks
pub(crate) struct RiffRecord;

impl RecordLayout for RiffRecord {
	type Order = LittleEndian;

	const SIZE_BIAS: u32 = 0;
}

/// ID3v2.3 frames, the two flag bytes follow the size and are not counted by it
pub(crate) struct Id3Record;

impl RecordLayout for Id3Record {
	type Order = BigEndian;

	const SIZE_BIAS: u32 = 2;
}

/// ID3v2.4 frames, same as [`Id3Record`] with a synchsafe size
pub(crate) struct Id3v24Record;

impl RecordLayout for Id3v24Record {
	type Order = BigEndian;

	const SIZE_BIAS: u32 = 2;

	fn read_size(raw: &[u8]) -> u32 {
		BigEndian::read_u32(raw).unsynch()
	}

	fn write_size(size: u32, out: &mut [u8]) -> Result<()> {
		BigEndian::write_u32(out, size.synch()?);
		Ok(())
	}
}

/// A single record borrowed from its container
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct RawChunk<'a> {
	pub fourcc: [u8; 4],
	/// The size as stored in the header
	pub size: u32,
	/// `size + SIZE_BIAS` bytes, unless the record was clamped
	pub content: &'a [u8],
}

pub(crate) struct Records<'a, L>
where
	L: RecordLayout,
{
	data: &'a [u8],
	pos: usize,
	padding: ChunkPadding,
	_phantom: PhantomData<L>,
}

impl<'a, L: RecordLayout> Records<'a, L> {
	#[must_use]
	pub const fn new(data: &'a [u8], padding: ChunkPadding) -> Self {
		Self {
			data,
			pos: 0,
			padding,
			_phantom: PhantomData,
		}
	}

	/// Read the next record
	///
	/// Returns `Ok(None)` once fewer than [`RECORD_HEADER_SIZE`] bytes remain, see [`Records::remainder`].
	///
	/// # Errors
	///
	/// The record's body extends past the end of the container. The walker does not advance.
	pub fn next(&mut self) -> Result<Option<RawChunk<'a>>> {
		let Some((fourcc, size, body_len)) = self.header() else {
			return Ok(None);
		};

		let body_start = self.pos + RECORD_HEADER_SIZE;
		if body_len > self.data.len() - body_start {
			err!(TruncatedInput);
		}

		let content = &self.data[body_start..body_start + body_len];
		self.advance(body_start + body_len, size);

		Ok(Some(RawChunk {
			fourcc,
			size,
			content,
		}))
	}

	/// Take the next record, cutting its body short at the end of the container
	///
	/// This consumes everything up to the end of the container if the record is truncated.
	pub fn next_clamped(&mut self) -> Option<RawChunk<'a>> {
		let (fourcc, size, body_len) = self.header()?;

		let body_start = self.pos + RECORD_HEADER_SIZE;
		let body_end = body_start.saturating_add(body_len).min(self.data.len());

		let content = &self.data[body_start..body_end];
		self.advance(body_end, size);

		Some(RawChunk {
			fourcc,
			size,
			content,
		})
	}

	/// Everything that has not been consumed yet
	pub fn remainder(&self) -> &'a [u8] {
		&self.data[self.pos..]
	}

	/// Consume everything that has not been consumed yet
	pub fn take_remainder(&mut self) -> &'a [u8] {
		let rest = self.remainder();
		self.pos = self.data.len();
		rest
	}

	fn header(&self) -> Option<([u8; 4], u32, usize)> {
		let header = self
			.data
			.get(self.pos..self.pos.checked_add(RECORD_HEADER_SIZE)?)?;

		let mut fourcc = [0; 4];
		fourcc.copy_from_slice(&header[..4]);

		let size = L::read_size(&header[4..]);
		let body_len = u64::from(size) + u64::from(L::SIZE_BIAS);

		Some((fourcc, size, usize::try_from(body_len).unwrap_or(usize::MAX)))
	}

	fn advance(&mut self, body_end: usize, size: u32) {
		// Chunks are expected to start on even boundaries, and are padded
		// with a 0 if necessary. This is NOT the null terminator of the value,
		// and it is NOT included in the chunk's size
		let pad = usize::from(self.padding.pad_len(u64::from(size)) == 1);
		self.pos = body_end.saturating_add(pad).min(self.data.len());
	}
}

/// Write a single record, the size field is derived from `content`
pub(crate) fn write_record<L: RecordLayout>(
	out: &mut Vec<u8>,
	fourcc: [u8; 4],
	content: &[u8],
	padding: ChunkPadding,
) -> Result<()> {
	let Some(size) = content
		.len()
		.checked_sub(L::SIZE_BIAS as usize)
		.and_then(|size| u32::try_from(size).ok())
	else {
		err!(TooMuchData);
	};

	let mut size_field = [0; 4];
	L::write_size(size, &mut size_field)?;

	out.extend_from_slice(&fourcc);
	out.extend_from_slice(&size_field);
	out.extend_from_slice(content);

	if padding.pad_len(u64::from(size)) == 1 {
		out.push(0);
	}

	Ok(())
}

#[cfg(test)]
mod tests {
	use super::{Id3Record, Id3v24Record, Records, RiffRecord, write_record};
	use crate::config::ChunkPadding;
	use crate::error::ErrorKind;

	#[test_log::test]
	fn walks_padded_records() {
		let data = [
			b'a', b'b', b'c', b'd', 3, 0, 0, 0, 1, 2, 3, 0, // odd body, padded
			b'e', b'f', b'g', b'h', 2, 0, 0, 0, 4, 5, // even body
			0xAA, 0xBB, // too short for a header
		];

		let mut records = Records::<RiffRecord>::new(&data, ChunkPadding::Even);

		let first = records.next().unwrap().unwrap();
		assert_eq!(&first.fourcc, b"abcd");
		assert_eq!(first.size, 3);
		assert_eq!(first.content, &[1, 2, 3]);

		let second = records.next().unwrap().unwrap();
		assert_eq!(&second.fourcc, b"efgh");
		assert_eq!(second.content, &[4, 5]);

		assert!(records.next().unwrap().is_none());
		assert_eq!(records.remainder(), &[0xAA, 0xBB]);
	}

	#[test_log::test]
	fn unpadded_records() {
		let data = [
			b'a', b'b', b'c', b'd', 1, 0, 0, 0, 9, b'e', b'f', b'g', b'h', 0, 0, 0, 0,
		];

		let mut records = Records::<RiffRecord>::new(&data, ChunkPadding::None);
		assert_eq!(records.next().unwrap().unwrap().content, &[9]);
		assert_eq!(&records.next().unwrap().unwrap().fourcc, b"efgh");
		assert!(records.next().unwrap().is_none());
		assert!(records.remainder().is_empty());
	}

	#[test_log::test]
	fn truncated_record_does_not_advance() {
		let data = [b'a', b'b', b'c', b'd', 10, 0, 0, 0, 1, 2];

		let mut records = Records::<RiffRecord>::new(&data, ChunkPadding::Even);
		let err = records.next().unwrap_err();
		assert!(matches!(err.kind(), ErrorKind::TruncatedInput));
		assert_eq!(records.remainder(), &data);

		let clamped = records.next_clamped().unwrap();
		assert_eq!(clamped.size, 10);
		assert_eq!(clamped.content, &[1, 2]);
		assert!(records.remainder().is_empty());
	}

	#[test_log::test]
	fn id3_frame_size_bias() {
		// A declared size of 5 covers the body, the 2 flag bytes come on top
		let data = [b'T', b'I', b'T', b'2', 0, 0, 0, 5, 0, 0, 3, b'a', b'b', b'c', 0];

		let mut records = Records::<Id3Record>::new(&data, ChunkPadding::None);
		let frame = records.next().unwrap().unwrap();
		assert_eq!(frame.size, 5);
		assert_eq!(frame.content.len(), 7);

		let mut out = Vec::new();
		write_record::<Id3Record>(&mut out, frame.fourcc, frame.content, ChunkPadding::None)
			.unwrap();
		assert_eq!(out, data);
	}

	#[test_log::test]
	fn id3v24_synchsafe_size() {
		let content = vec![0; 130];

		let mut out = Vec::new();
		write_record::<Id3v24Record>(&mut out, *b"TIT2", &content, ChunkPadding::None).unwrap();
		// 128 is stored as 0x01 0x00
		assert_eq!(&out[4..8], &[0, 0, 1, 0]);

		let mut records = Records::<Id3v24Record>::new(&out, ChunkPadding::None);
		assert_eq!(records.next().unwrap().unwrap().content.len(), 130);
	}

	#[test_log::test]
	fn written_length() {
		let mut out = Vec::new();
		write_record::<RiffRecord>(&mut out, *b"abcd", &[1, 2, 3], ChunkPadding::Even).unwrap();
		assert_eq!(out, [b'a', b'b', b'c', b'd', 3, 0, 0, 0, 1, 2, 3, 0]);
	}
}
