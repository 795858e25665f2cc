//! Whole RIFF/WAVE files

mod fields;
mod properties;
mod read;
mod write;

pub use fields::{FieldId, FieldOrder};
pub(crate) use fields::Selection;
pub use properties::WavProperties;

use crate::chunk::{
	AdtlList, Chunk, CueChunk, DataChunk, FactChunk, FmtChunk, Id3Tag, InfoList, ListKind,
	RiffHeader,
};
use crate::codec;
use crate::config::{ParseOptions, WriteOptions};
use crate::error::{Result, WavError};
use crate::macros::decode_err;

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// A RIFF/WAVE file
///
/// The file owns its chunks in stored order. Lookups such as [`WavFile::fmt`] and
/// [`WavFile::info`] return the first chunk of their kind.
///
/// # Examples
///
/// ```rust,no_run
/// use wavchunks::config::{ParseOptions, WriteOptions};
/// use wavchunks::wav::WavFile;
///
/// # fn main() -> wavchunks::error::Result<()> {
/// let mut file = WavFile::read_from_path("test.wav", ParseOptions::new())?;
///
/// if let Some(info) = file.info_mut() {
/// 	info.set_title(String::from("Foo title"));
/// }
///
/// // Items keep the order they were found in
/// file.save_to_path("test.wav", WriteOptions::default())?;
/// # Ok(()) }
/// ```
#[derive(Debug, Default)]
pub struct WavFile {
	pub(crate) header: RiffHeader,
	pub(crate) chunks: Vec<Chunk>,
	pub(crate) trailing: Vec<u8>,
	pub(crate) fields: FieldOrder,
	pub(crate) warnings: Vec<WavError>,
}

macro_rules! find_chunk {
	($chunks:expr, $pattern:pat => $value:expr) => {
		$chunks.find_map(|chunk| match chunk {
			$pattern => Some($value),
			_ => None,
		})
	};
}

impl WavFile {
	/// Create an empty file
	pub fn new() -> Self {
		Self::default()
	}

	/// Read a file from `reader`
	///
	/// The reader is read to the end before parsing.
	///
	/// # Errors
	///
	/// * `reader` fails to read
	/// * See [`WavFile::parse`]
	pub fn read_from<R>(reader: &mut R, parse_options: ParseOptions) -> Result<Self>
	where
		R: Read,
	{
		let mut data = Vec::new();
		reader.read_to_end(&mut data)?;

		read::parse(&data, parse_options)
	}

	/// Parse a file from bytes
	///
	/// # Errors
	///
	/// * The bytes do not start with a RIFF header of form type `WAVE`
	/// * A chunk is malformed, and the [`ParsingMode`](crate::config::ParsingMode) does not allow
	///   recovering from it. Recovered errors are available in [`WavFile::warnings`].
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::config::ParseOptions;
	/// use wavchunks::wav::WavFile;
	///
	/// # fn main() -> wavchunks::error::Result<()> {
	/// let bytes = b"RIFF\x04\x00\x00\x00WAVE";
	/// let file = WavFile::parse(bytes, ParseOptions::new())?;
	///
	/// assert!(file.chunks().is_empty());
	/// assert!(WavFile::parse(b"RIFF", ParseOptions::new()).is_err());
	/// # Ok(()) }
	/// ```
	pub fn parse(data: &[u8], parse_options: ParseOptions) -> Result<Self> {
		read::parse(data, parse_options)
	}

	/// Read a file from a path
	///
	/// # Errors
	///
	/// * The file cannot be opened or read
	/// * See [`WavFile::parse`]
	pub fn read_from_path<P>(path: P, parse_options: ParseOptions) -> Result<Self>
	where
		P: AsRef<Path>,
	{
		let mut file = File::open(path)?;
		Self::read_from(&mut file, parse_options)
	}

	/// Write the file, including only the fields listed in `order`
	///
	/// Within each container, the records are written in the order of their fields in `order`.
	/// The output is built in memory first, nothing is written to `writer` on error.
	///
	/// # Errors
	///
	/// * Decoded samples cannot be encoded with the file's format chunk
	/// * A chunk is too large for its size field
	/// * `writer` fails to write
	pub fn write_to<W>(&self, writer: &mut W, order: &FieldOrder, write_options: WriteOptions) -> Result<()>
	where
		W: Write,
	{
		let bytes = write::build(self, Selection::listed(order), write_options)?;
		writer.write_all(&bytes)?;
		Ok(())
	}

	/// Write the file, including the fields in [`WavFile::fields`]
	///
	/// Unlike [`WavFile::write_to`], every container keeps the order its records are stored in.
	///
	/// # Errors
	///
	/// See [`WavFile::write_to`]
	pub fn dump_to<W>(&self, writer: &mut W, write_options: WriteOptions) -> Result<()>
	where
		W: Write,
	{
		let bytes = write::build(self, Selection::stored(&self.fields), write_options)?;
		writer.write_all(&bytes)?;
		Ok(())
	}

	/// Write the file to a path, including the fields in [`WavFile::fields`]
	///
	/// Any existing file is replaced.
	///
	/// # Errors
	///
	/// * The file cannot be created
	/// * See [`WavFile::write_to`]
	pub fn save_to_path<P>(&self, path: P, write_options: WriteOptions) -> Result<()>
	where
		P: AsRef<Path>,
	{
		// Build before truncating the destination
		let bytes = write::build(self, Selection::stored(&self.fields), write_options)?;

		let mut file = File::create(path)?;
		file.write_all(&bytes)?;
		Ok(())
	}

	/// The file's RIFF header, as read
	pub fn header(&self) -> &RiffHeader {
		&self.header
	}

	/// The chunks, in stored order
	pub fn chunks(&self) -> &[Chunk] {
		&self.chunks
	}

	/// The chunks, in stored order
	pub fn chunks_mut(&mut self) -> &mut Vec<Chunk> {
		&mut self.chunks
	}

	/// The first `fmt ` chunk
	pub fn fmt(&self) -> Option<&FmtChunk> {
		find_chunk!(self.chunks.iter(), Chunk::Format(fmt) => fmt)
	}

	/// The first `fact` chunk
	pub fn fact(&self) -> Option<&FactChunk> {
		find_chunk!(self.chunks.iter(), Chunk::Fact(fact) => fact)
	}

	/// The first `data` chunk
	pub fn data(&self) -> Option<&DataChunk> {
		find_chunk!(self.chunks.iter(), Chunk::Data(data) => data)
	}

	/// The first `data` chunk
	pub fn data_mut(&mut self) -> Option<&mut DataChunk> {
		find_chunk!(self.chunks.iter_mut(), Chunk::Data(data) => data)
	}

	/// The first `cue ` chunk
	pub fn cue(&self) -> Option<&CueChunk> {
		find_chunk!(self.chunks.iter(), Chunk::Cue(cue) => cue)
	}

	/// The first `LIST`/`INFO` chunk
	pub fn info(&self) -> Option<&InfoList> {
		find_chunk!(self.chunks.iter(), Chunk::List(list) => match &list.kind {
			ListKind::Info(info) => info,
			_ => return None,
		})
	}

	/// The first `LIST`/`INFO` chunk
	pub fn info_mut(&mut self) -> Option<&mut InfoList> {
		find_chunk!(self.chunks.iter_mut(), Chunk::List(list) => match &mut list.kind {
			ListKind::Info(info) => info,
			_ => return None,
		})
	}

	/// The first `LIST`/`adtl` chunk
	pub fn adtl(&self) -> Option<&AdtlList> {
		find_chunk!(self.chunks.iter(), Chunk::List(list) => match &list.kind {
			ListKind::AssociatedData(adtl) => adtl,
			_ => return None,
		})
	}

	/// The first `LIST`/`adtl` chunk
	pub fn adtl_mut(&mut self) -> Option<&mut AdtlList> {
		find_chunk!(self.chunks.iter_mut(), Chunk::List(list) => match &mut list.kind {
			ListKind::AssociatedData(adtl) => adtl,
			_ => return None,
		})
	}

	/// The tag of the first interpreted `ID3 ` chunk
	pub fn id3(&self) -> Option<&Id3Tag> {
		find_chunk!(self.chunks.iter(), Chunk::Id3(id3) => id3.tag.as_ref()?)
	}

	/// The tag of the first interpreted `ID3 ` chunk
	pub fn id3_mut(&mut self) -> Option<&mut Id3Tag> {
		find_chunk!(self.chunks.iter_mut(), Chunk::Id3(id3) => id3.tag.as_mut()?)
	}

	/// The recognized fields, in the order they were found
	///
	/// This is the order used by [`WavFile::dump_to`] and [`WavFile::save_to_path`]. A field that
	/// is added to the file must also be added here to be written.
	pub fn fields(&self) -> &FieldOrder {
		&self.fields
	}

	/// The recognized fields, in the order they were found
	pub fn fields_mut(&mut self) -> &mut FieldOrder {
		&mut self.fields
	}

	/// Errors that were recovered from while parsing
	pub fn warnings(&self) -> &[WavError] {
		&self.warnings
	}

	/// Bytes following the last chunk that could not form one
	pub fn trailing(&self) -> &[u8] {
		&self.trailing
	}

	/// Decode every `data` chunk with the first `fmt ` chunk
	///
	/// # Errors
	///
	/// * The file has no `fmt ` chunk
	/// * See [`DataChunk::decode`]
	pub fn decode_samples(&mut self) -> Result<()> {
		let Some(fmt) = self.fmt().cloned() else {
			decode_err!(@BAIL Format, "Cannot decode samples without a format chunk");
		};

		for chunk in &mut self.chunks {
			if let Chunk::Data(data) = chunk {
				data.decode_in_place(&fmt)?;
			}
		}

		Ok(())
	}

	/// Convert A-law and µ-law audio to PCM, at the smallest width that holds every sample
	///
	/// Every `data` chunk is decoded and the first `fmt ` chunk is replaced with the PCM
	/// descriptor. Returns `false`, leaving the file untouched, if the audio is not companded.
	///
	/// To write a compact file without changing the tree, see [`WriteOptions::compact`].
	///
	/// # Errors
	///
	/// The samples cannot be decoded, see [`DataChunk::decode`]
	pub fn compact(&mut self) -> Result<bool> {
		let Some(source) = self.fmt().cloned() else {
			return Ok(false);
		};

		if !source.effective_format().is_companded() {
			return Ok(false);
		}

		let target = self.compact_format(&source)?;

		let mut converted = Vec::new();
		for data in self.data_chunks() {
			let mut data = data.clone();
			data.convert(&source, &target)?;
			converted.push(data);
		}

		let data_chunks = self.chunks.iter_mut().filter_map(|chunk| match chunk {
			Chunk::Data(data) => Some(data),
			_ => None,
		});
		for (data, new_data) in data_chunks.zip(converted) {
			*data = new_data;
		}

		if let Some(fmt) = find_chunk!(self.chunks.iter_mut(), Chunk::Format(fmt) => fmt) {
			log::debug!("Compacted {} to {} bit PCM", source.audio_format, target.bits_per_sample);
			*fmt = target;
		}

		Ok(true)
	}

	/// The file's audio properties, or `None` without a `fmt ` chunk
	///
	/// # Errors
	///
	/// A `data` chunk holds decoded samples, and the `fmt ` chunk describes an encoding with no codec
	pub fn properties(&self) -> Result<Option<WavProperties>> {
		let Some(fmt) = self.fmt() else {
			return Ok(None);
		};

		let mut stream_len = 0;
		for data in self.data_chunks() {
			stream_len += data.encoded_len(fmt)? as u64;
		}

		Ok(Some(properties::read_properties(fmt, self.fact(), stream_len)))
	}

	pub(crate) fn data_chunks(&self) -> impl Iterator<Item = &DataChunk> {
		self.chunks.iter().filter_map(|chunk| match chunk {
			Chunk::Data(data) => Some(data),
			_ => None,
		})
	}

	/// The PCM descriptor compacted audio is written with
	pub(crate) fn compact_format(&self, source: &FmtChunk) -> Result<FmtChunk> {
		let mut samples = Vec::new();
		for data in self.data_chunks() {
			samples.extend(data.all_samples(source)?);
		}

		codec::compact_format(source, &samples)
	}
}
