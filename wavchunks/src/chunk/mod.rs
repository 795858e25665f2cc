//! The chunks of a RIFF/WAVE file
//!
//! A file is a flat sequence of [`Chunk`]s following the [`RiffHeader`]. Every chunk the crate
//! understands is parsed into a typed value, everything else is kept verbatim as an
//! [`UnrecognizedChunk`], so a parsed file can always be written back.

mod cue;
mod data;
mod fact;
mod fmt;
mod id3;
mod list;
pub(crate) mod record;

pub use crate::util::text::TextEncoding;
pub use cue::{CueChunk, CuePoint};
pub use data::{DataChunk, DecodedData};
pub use fact::FactChunk;
pub use fmt::{AudioFormat, FmtChunk};
pub use id3::{Id3Chunk, Id3Frame, Id3FrameKey, Id3Tag};
pub use list::{
	AdtlEntry, AdtlKey, AdtlList, InfoKey, InfoList, LabeledTextInfo, ListChunk, ListKind,
};

use crate::config::{ChunkPadding, ParseOptions};
use crate::error::{ErrorKind, Result, WavError};
use crate::macros::{decode_err, parse_mode_choice};
use crate::util::alloc::copy_bytes;
use crate::wav::{FieldId, FieldOrder};
use record::{RawChunk, RecordLayout};

use std::fmt::{Display, Formatter};

use byteorder::{ByteOrder, LittleEndian};

/// The size of the RIFF header, `"RIFF"`, the file size and the form type
pub(crate) const RIFF_HEADER_SIZE: usize = 12;

/// The kinds of chunks an error can be bound to
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ChunkType {
	/// The RIFF header
	Riff,
	/// `fmt `
	Format,
	/// `fact`
	Fact,
	/// `data`
	Data,
	/// `cue `
	Cue,
	/// `LIST`
	List,
	/// `LIST`/`INFO`
	Info,
	/// `LIST`/`adtl`
	AssociatedData,
	/// `ID3 `/`id3 `
	Id3,
}

impl Display for ChunkType {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let name = match self {
			ChunkType::Riff => "RIFF",
			ChunkType::Format => "fmt",
			ChunkType::Fact => "fact",
			ChunkType::Data => "data",
			ChunkType::Cue => "cue",
			ChunkType::List => "LIST",
			ChunkType::Info => "LIST/INFO",
			ChunkType::AssociatedData => "LIST/adtl",
			ChunkType::Id3 => "ID3",
		};

		f.write_str(name)
	}
}

/// The 12 bytes at the start of every RIFF file
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RiffHeader {
	/// The size as stored in the file
	///
	/// This is never trusted, and is recomputed when the file is written.
	pub size: u32,
	/// The form type, always `WAVE` for a parsed file
	pub form_type: [u8; 4],
}

impl RiffHeader {
	pub(crate) fn parse(data: &[u8]) -> Result<Self> {
		if data.len() < RIFF_HEADER_SIZE {
			decode_err!(@BAIL Riff, "File is too short to hold a RIFF header");
		}

		if &data[..4] != b"RIFF" {
			decode_err!(@BAIL Riff, "File does not start with \"RIFF\"");
		}

		let mut form_type = [0; 4];
		form_type.copy_from_slice(&data[8..12]);

		if &form_type != b"WAVE" {
			decode_err!(@BAIL Riff, "RIFF form type is not \"WAVE\"");
		}

		let size = LittleEndian::read_u32(&data[4..8]);
		log::debug!("Verified RIFF header, declared size: {size}");

		Ok(Self { size, form_type })
	}
}

impl Default for RiffHeader {
	fn default() -> Self {
		Self {
			size: 4,
			form_type: *b"WAVE",
		}
	}
}

/// A record whose contents are kept verbatim
///
/// This is used for unknown top-level chunks, unknown records inside a container, and
/// recognized chunks whose contents could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnrecognizedChunk {
	/// The record's fourcc
	pub fourcc: [u8; 4],
	/// The size as stored in the file
	///
	/// This can differ from the length of `content` if the record was cut short. It is
	/// recomputed from `content` when the record is written.
	pub declared_size: u32,
	/// The record's contents
	pub content: Vec<u8>,
}

impl UnrecognizedChunk {
	/// Create a new record, the declared size is taken from `content`
	///
	/// # Errors
	///
	/// `content` is longer than [`u32::MAX`]
	pub fn new(fourcc: [u8; 4], content: Vec<u8>) -> Result<Self> {
		let Ok(declared_size) = u32::try_from(content.len()) else {
			return Err(WavError::new(ErrorKind::TooMuchData));
		};

		Ok(Self {
			fourcc,
			declared_size,
			content,
		})
	}

	pub(crate) fn from_raw(raw: RawChunk<'_>) -> Result<Self> {
		Ok(Self {
			fourcc: raw.fourcc,
			declared_size: raw.size,
			content: copy_bytes(raw.content)?,
		})
	}

	pub(crate) fn write_to<L: RecordLayout>(
		&self,
		out: &mut Vec<u8>,
		padding: ChunkPadding,
	) -> Result<()> {
		record::write_record::<L>(out, self.fourcc, &self.content, padding)
	}
}

impl Display for UnrecognizedChunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"{}: {} byte(s), unrecognized",
			String::from_utf8_lossy(&self.fourcc),
			self.content.len()
		)
	}
}

/// A single top-level chunk
#[derive(Debug, Clone, PartialEq)]
#[allow(missing_docs)]
pub enum Chunk {
	Format(FmtChunk),
	Fact(FactChunk),
	Data(DataChunk),
	Cue(CueChunk),
	List(ListChunk),
	Id3(Id3Chunk),
	Unrecognized(UnrecognizedChunk),
}

impl Chunk {
	/// The fourcc the chunk is written with
	pub fn fourcc(&self) -> [u8; 4] {
		match self {
			Chunk::Format(_) => *b"fmt ",
			Chunk::Fact(_) => *b"fact",
			Chunk::Data(_) => *b"data",
			Chunk::Cue(_) => *b"cue ",
			Chunk::List(_) => *b"LIST",
			Chunk::Id3(id3) => id3.fourcc,
			Chunk::Unrecognized(unrecognized) => unrecognized.fourcc,
		}
	}

	/// Parse a single chunk
	///
	/// Recognized chunks with malformed contents are recovered with [`ParseContext::recover`],
	/// and then kept as [`Chunk::Unrecognized`].
	pub(crate) fn parse(raw: RawChunk<'_>, ctx: &mut ParseContext) -> Result<Self> {
		let discovered = ctx.fields.clone();

		match Self::parse_contents(raw, ctx) {
			Ok(chunk) => Ok(chunk),
			Err(err) if is_recoverable(&err) => {
				// Fields of a container that failed to parse were never kept
				ctx.fields = discovered;
				ctx.recover(err)?;

				log::debug!(
					"Keeping malformed chunk \"{}\" verbatim",
					String::from_utf8_lossy(&raw.fourcc)
				);
				Ok(Chunk::Unrecognized(UnrecognizedChunk::from_raw(raw)?))
			},
			Err(err) => Err(err),
		}
	}

	fn parse_contents(raw: RawChunk<'_>, ctx: &mut ParseContext) -> Result<Self> {
		let chunk = match &raw.fourcc {
			b"fmt " => Chunk::Format(FmtChunk::parse(raw.content)?),
			b"fact" => Chunk::Fact(FactChunk::parse(raw.content)?),
			b"data" => Chunk::Data(DataChunk::parse(raw.content)?),
			b"cue " => Chunk::Cue(CueChunk::parse(raw.content, ctx)?),
			b"LIST" => Chunk::List(ListChunk::parse(raw.content, ctx)?),
			b"ID3 " | b"id3 " => Chunk::Id3(Id3Chunk::parse(raw.fourcc, raw.content, ctx)?),
			_ => {
				log::debug!(
					"Found unrecognized chunk \"{}\", size: {}",
					String::from_utf8_lossy(&raw.fourcc),
					raw.size
				);
				Chunk::Unrecognized(UnrecognizedChunk::from_raw(raw)?)
			},
		};

		Ok(chunk)
	}
}

impl Display for Chunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Chunk::Format(fmt) => fmt.fmt(f),
			Chunk::Fact(fact) => fact.fmt(f),
			Chunk::Data(data) => data.fmt(f),
			Chunk::Cue(cue) => cue.fmt(f),
			Chunk::List(list) => list.fmt(f),
			Chunk::Id3(id3) => id3.fmt(f),
			Chunk::Unrecognized(unrecognized) => unrecognized.fmt(f),
		}
	}
}

/// Errors that only affect a single chunk or record
fn is_recoverable(err: &WavError) -> bool {
	matches!(
		err.kind(),
		ErrorKind::FileDecoding(_)
			| ErrorKind::MalformedRecord(_)
			| ErrorKind::TruncatedInput
			| ErrorKind::TextDecode(_)
			| ErrorKind::StringFromUtf8(_)
	)
}

/// State threaded through a single parse
pub(crate) struct ParseContext {
	pub(crate) options: ParseOptions,
	/// Every error recovered from so far
	pub(crate) warnings: Vec<WavError>,
	/// Recognized fields, in the order they were found
	pub(crate) fields: FieldOrder,
}

impl ParseContext {
	pub(crate) fn new(options: ParseOptions) -> Self {
		Self {
			options,
			warnings: Vec::new(),
			fields: FieldOrder::new(),
		}
	}

	/// Recover from `err` according to the parsing mode
	///
	/// In [`ParsingMode::Strict`](crate::config::ParsingMode::Strict), `err` is returned.
	/// Otherwise it is logged and kept, and the caller is expected to carry on.
	pub(crate) fn recover(&mut self, err: WavError) -> Result<()> {
		let parse_mode = self.options.parsing_mode;
		parse_mode_choice!(
			parse_mode,
			STRICT: return Err(err),
			DEFAULT: {
				log::warn!("Recovered from: {err}");
				self.warnings.push(err);
				Ok(())
			}
		)
	}

	/// Record a container, or a field with no container
	pub(crate) fn discover(&mut self, field: FieldId) {
		self.fields.push(field);
	}

	/// Record a field of `container`
	///
	/// If an earlier container of the same kind was already found, the field is placed before it,
	/// so it is still written.
	pub(crate) fn discover_in(&mut self, field: FieldId, container: FieldId) {
		if !self.fields.contains(field) {
			self.fields.insert_before(field, container);
		}
	}
}
