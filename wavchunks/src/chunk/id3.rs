//! The `ID3 ` wrapper chunk
//!
//! Some writers store an ID3v2 tag inside a RIFF chunk named `ID3 ` or `id3 `. Only the frame
//! layer of the tag is interpreted, frames are kept as raw payloads and decoded on request.

use super::record::{Id3Record, Id3v24Record, RecordLayout, Records, write_record};
use super::{ParseContext, TextEncoding, UnrecognizedChunk};
use crate::config::ChunkPadding;
use crate::error::{ErrorKind, Result, WavError};
use crate::macros::{decode_err, encode_err, err, fourcc_keys, try_vec};
use crate::util::alloc::copy_bytes;
use crate::util::synchsafe::SynchsafeInteger;
use crate::wav::{FieldId, Selection};

use std::fmt::{Display, Formatter};

use byteorder::{BigEndian, ByteOrder};

const ID3_HEADER_SIZE: usize = 10;
const FRAME_FLAGS_SIZE: usize = 2;

// Unsynchronisation, extended header and footer change how the frames are laid out
const UNSUPPORTED_TAG_FLAGS: u8 = 0x80 | 0x40 | 0x10;

fourcc_keys! {
	/// The ID3v2 frames with a known meaning
	pub enum Id3FrameKey {
		/// `TPE1`, lead artist
		Artist => b"TPE1",
		/// `COMM`, a comment with a language and description
		Comment => b"COMM",
		/// `TIT2`
		Title => b"TIT2",
		/// `TDRC`, recording time
		RecordingDate => b"TDRC",
		/// `TALB`
		Album => b"TALB",
		/// `TRCK`
		Track => b"TRCK",
		/// `TCON`
		Genre => b"TCON",
		/// `TXXX`, user defined text with a description
		UserText => b"TXXX",
	}
}

/// A single ID3v2 frame
///
/// The payload is everything following the frame's size field: the two flag bytes, then the
/// frame's body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Frame {
	/// The frame's kind
	pub key: Id3FrameKey,
	/// The flag bytes followed by the body
	pub payload: Vec<u8>,
}

impl Id3Frame {
	/// Create a text frame with no flags set
	///
	/// `COMM` frames get an unknown (`XXX`) language and `COMM`/`TXXX` frames an empty description.
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::{Id3Frame, Id3FrameKey, TextEncoding};
	///
	/// # fn main() -> wavchunks::error::Result<()> {
	/// let frame = Id3Frame::new_text(Id3FrameKey::Title, TextEncoding::UTF8, "Foo title");
	///
	/// assert_eq!(frame.flags(), [0, 0]);
	/// assert_eq!(frame.encoding(), Some(TextEncoding::UTF8));
	/// assert_eq!(frame.text()?, "Foo title");
	/// # Ok(()) }
	/// ```
	pub fn new_text(key: Id3FrameKey, encoding: TextEncoding, text: &str) -> Self {
		let mut payload = vec![0, 0, encoding as u8];

		match key {
			Id3FrameKey::Comment => {
				payload.extend_from_slice(b"XXX");
				payload.extend(encoding.encode("", true));
			},
			Id3FrameKey::UserText => payload.extend(encoding.encode("", true)),
			_ => {},
		}

		payload.extend(encoding.encode(text, false));
		Self { key, payload }
	}

	/// The frame's flag bytes
	pub fn flags(&self) -> [u8; 2] {
		match self.payload.get(..FRAME_FLAGS_SIZE) {
			Some(flags) => [flags[0], flags[1]],
			None => [0; 2],
		}
	}

	/// The frame's body
	pub fn body(&self) -> &[u8] {
		self.payload.get(FRAME_FLAGS_SIZE..).unwrap_or_default()
	}

	/// The text encoding the body declares in its first byte
	pub fn encoding(&self) -> Option<TextEncoding> {
		self.body().first().copied().and_then(TextEncoding::from_u8)
	}

	/// Decode the frame's text
	///
	/// The language and description of `COMM` frames and the description of `TXXX` frames are
	/// skipped.
	///
	/// # Errors
	///
	/// * The body is empty, or declares an unknown text encoding
	/// * The text is invalid for its encoding
	pub fn text(&self) -> Result<String> {
		let Some((_, mut content)) = self.body().split_first() else {
			err!(TextDecode("ID3v2 frame has no body"));
		};

		let Some(encoding) = self.encoding() else {
			err!(TextDecode("ID3v2 frame declares an unknown text encoding"));
		};

		if self.key == Id3FrameKey::Comment {
			if content.len() < 3 {
				err!(TextDecode("COMM frame is too short to hold a language"));
			}

			content = &content[3..];
		}

		// Skip the description
		if matches!(self.key, Id3FrameKey::Comment | Id3FrameKey::UserText) {
			let (description, rest) = encoding.split_terminated(content);
			encoding.decode(description)?;
			content = rest;
		}

		encoding.decode(content)
	}
}

/// An ID3v2.3 or ID3v2.4 tag
///
/// Frames with an unknown id, or an id that was already seen, are kept verbatim. A frame is only
/// written if its [`FieldId`] appears in the [`FieldOrder`](crate::wav::FieldOrder) before
/// [`FieldId::Id3Tag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Tag {
	pub(crate) major_version: u8,
	pub(crate) revision: u8,
	pub(crate) flags: u8,
	pub(crate) frames: Vec<Id3Frame>,
	pub(crate) unrecognized: Vec<UnrecognizedChunk>,
	pub(crate) padding_len: usize,
}

impl Default for Id3Tag {
	fn default() -> Self {
		Self {
			major_version: 4,
			revision: 0,
			flags: 0,
			frames: Vec::new(),
			unrecognized: Vec::new(),
			padding_len: 0,
		}
	}
}

impl Id3Tag {
	/// Create a new empty ID3v2.4 tag
	pub fn new() -> Self {
		Self::default()
	}

	/// The major version, 3 or 4
	pub fn major_version(&self) -> u8 {
		self.major_version
	}

	/// The revision, the second version byte
	pub fn revision(&self) -> u8 {
		self.revision
	}

	/// The header flags
	pub fn flags(&self) -> u8 {
		self.flags
	}

	/// The number of zero bytes following the last frame
	pub fn padding_len(&self) -> usize {
		self.padding_len
	}

	/// Set the number of zero bytes following the last frame
	pub fn set_padding_len(&mut self, padding_len: usize) {
		self.padding_len = padding_len;
	}

	/// The frames, in stored order
	pub fn frames(&self) -> &[Id3Frame] {
		&self.frames
	}

	/// Get a frame by its key
	pub fn get(&self, key: Id3FrameKey) -> Option<&Id3Frame> {
		self.frames.iter().find(|frame| frame.key == key)
	}

	/// Insert a frame, replacing any frame with the same key
	pub fn insert(&mut self, frame: Id3Frame) {
		match self.frames.iter_mut().find(|f| f.key == frame.key) {
			Some(existing) => *existing = frame,
			None => self.frames.push(frame),
		}
	}

	/// Remove a frame by its key
	pub fn remove(&mut self, key: Id3FrameKey) -> Option<Id3Frame> {
		let position = self.frames.iter().position(|frame| frame.key == key)?;
		Some(self.frames.remove(position))
	}

	/// Frames that were kept verbatim
	pub fn unrecognized(&self) -> &[UnrecognizedChunk] {
		&self.unrecognized
	}

	/// Frames that were kept verbatim
	///
	/// These are always written, after the recognized frames.
	pub fn unrecognized_mut(&mut self) -> &mut Vec<UnrecognizedChunk> {
		&mut self.unrecognized
	}

	/// Whether the tag holds no frames at all
	pub fn is_empty(&self) -> bool {
		self.frames.is_empty() && self.unrecognized.is_empty()
	}

	fn parse_frames<L: RecordLayout>(&mut self, data: &[u8], ctx: &mut ParseContext) -> Result<()> {
		let mut records = Records::<L>::new(data, ChunkPadding::None);

		// Padding starts where a frame id would be a zero byte
		while !matches!(records.remainder().first(), None | Some(0)) {
			let record = match records.next() {
				Ok(Some(record)) => record,
				Ok(None) => break,
				Err(_) => decode_err!(@BAIL Id3, "ID3v2 frame extends past the end of the tag"),
			};

			match Id3FrameKey::from_fourcc(record.fourcc) {
				Some(key) if self.get(key).is_none() => {
					self.frames.push(Id3Frame {
						key,
						payload: copy_bytes(record.content)?,
					});
					ctx.discover_in(FieldId::Id3(key), FieldId::Id3Tag);
				},
				_ => {
					log::debug!(
						"Keeping ID3v2 frame \"{}\" verbatim",
						String::from_utf8_lossy(&record.fourcc)
					);
					self.unrecognized.push(UnrecognizedChunk::from_raw(record)?);
				},
			}
		}

		let padding = records.take_remainder();
		if padding.iter().any(|b| *b != 0) {
			decode_err!(@BAIL Id3, "ID3v2 tag has data after its frames that is not padding");
		}

		self.padding_len = padding.len();
		Ok(())
	}

	fn write_frames<L: RecordLayout>(&self, out: &mut Vec<u8>, selection: Selection<'_>) -> Result<()> {
		let frames = selection.arrange(&self.frames, FieldId::Id3Tag, |frame| FieldId::Id3(frame.key));
		for frame in frames {
			if frame.payload.len() < FRAME_FLAGS_SIZE {
				encode_err!(@BAIL Id3, "ID3v2 frame payload is missing its flags");
			}

			write_record::<L>(out, frame.key.fourcc(), &frame.payload, ChunkPadding::None)?;
		}

		for record in &self.unrecognized {
			record.write_to::<L>(out, ChunkPadding::None)?;
		}

		Ok(())
	}
}

/// An `ID3 ` or `id3 ` chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Id3Chunk {
	/// The chunk's fourcc, `ID3 ` or `id3 `
	pub fourcc: [u8; 4],
	/// The tag, if it could be interpreted
	pub tag: Option<Id3Tag>,
	/// Bytes following the tag, or the entire chunk if there is no tag
	pub trailing: Vec<u8>,
}

impl Id3Chunk {
	/// Create an `ID3 ` chunk holding `tag`
	pub fn new(tag: Id3Tag) -> Self {
		Self {
			fourcc: *b"ID3 ",
			tag: Some(tag),
			trailing: Vec::new(),
		}
	}

	pub(crate) fn parse(fourcc: [u8; 4], content: &[u8], ctx: &mut ParseContext) -> Result<Self> {
		let opaque = |content: &[u8]| -> Result<Self> {
			Ok(Self {
				fourcc,
				tag: None,
				trailing: copy_bytes(content)?,
			})
		};

		let Some(header) = content
			.get(..ID3_HEADER_SIZE)
			.filter(|header| header.starts_with(b"ID3"))
		else {
			log::debug!("ID3 chunk does not hold an ID3v2 tag, keeping it verbatim");
			return opaque(content);
		};

		let (major_version, revision, flags) = (header[3], header[4], header[5]);
		if !matches!(major_version, 3 | 4) || flags & UNSUPPORTED_TAG_FLAGS != 0 {
			log::debug!(
				"Keeping ID3v2.{major_version} tag with flags {flags:#04x} verbatim"
			);
			return opaque(content);
		}

		let size = BigEndian::read_u32(&header[6..]).unsynch() as usize;
		if size > content.len() - ID3_HEADER_SIZE {
			decode_err!(@BAIL Id3, "ID3v2 tag size exceeds the chunk");
		}

		let tag_end = ID3_HEADER_SIZE + size;
		let mut tag = Id3Tag {
			major_version,
			revision,
			flags,
			..Id3Tag::default()
		};

		let frames = &content[ID3_HEADER_SIZE..tag_end];
		match major_version {
			3 => tag.parse_frames::<Id3Record>(frames, ctx)?,
			_ => tag.parse_frames::<Id3v24Record>(frames, ctx)?,
		}

		ctx.discover(FieldId::Id3Tag);
		log::debug!(
			"Parsed ID3v2.{major_version} tag: {} frame(s), {} unrecognized, {} byte(s) of padding",
			tag.frames.len(),
			tag.unrecognized.len(),
			tag.padding_len
		);

		Ok(Self {
			fourcc,
			tag: Some(tag),
			trailing: copy_bytes(&content[tag_end..])?,
		})
	}

	/// The chunk's contents, or `None` if the tag has nothing left to write
	pub(crate) fn contents(&self, selection: Selection<'_>) -> Result<Option<Vec<u8>>> {
		let Some(tag) = &self.tag else {
			return Ok(Some(copy_bytes(&self.trailing)?));
		};

		let mut frames = Vec::new();
		match tag.major_version {
			3 => tag.write_frames::<Id3Record>(&mut frames, selection)?,
			_ => tag.write_frames::<Id3v24Record>(&mut frames, selection)?,
		}

		if frames.is_empty() && self.trailing.is_empty() {
			log::debug!("Omitting empty ID3 chunk");
			return Ok(None);
		}

		let Ok(size) = u32::try_from(frames.len() + tag.padding_len) else {
			return Err(WavError::new(ErrorKind::TooMuchData));
		};

		let mut out = Vec::with_capacity(ID3_HEADER_SIZE + frames.len() + self.trailing.len());
		out.extend_from_slice(b"ID3");
		out.extend_from_slice(&[tag.major_version, tag.revision, tag.flags]);
		out.extend_from_slice(&size.synch()?.to_be_bytes());
		out.extend_from_slice(&frames);
		out.extend_from_slice(&try_vec![0; tag.padding_len]);
		out.extend_from_slice(&self.trailing);

		Ok(Some(out))
	}
}

impl Display for Id3Chunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		let Some(tag) = &self.tag else {
			return write!(f, "ID3: {} byte(s), opaque", self.trailing.len());
		};

		write!(
			f,
			"ID3: v2.{}.{}, {} frame(s), {} unrecognized",
			tag.major_version,
			tag.revision,
			tag.frames.len(),
			tag.unrecognized.len()
		)?;

		for frame in &tag.frames {
			match frame.text() {
				Ok(text) => write!(f, "\n\t{}: {text}", frame.key)?,
				Err(_) => write!(f, "\n\t{}: {} byte(s)", frame.key, frame.body().len())?,
			}
		}

		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::{Id3Chunk, Id3Frame, Id3FrameKey, Id3Tag};
	use crate::chunk::ParseContext;
	use crate::chunk::TextEncoding;
	use crate::config::ParseOptions;
	use crate::wav::{FieldId, FieldOrder, Selection};

	fn tag_bytes(major_version: u8, frames: &[u8], padding: usize) -> Vec<u8> {
		let size = (frames.len() + padding) as u32;

		let mut out = b"ID3".to_vec();
		out.extend_from_slice(&[major_version, 0, 0]);
		// Small enough for the synchsafe and plain encodings to match
		assert!(size < 0x80);
		out.extend_from_slice(&size.to_be_bytes());
		out.extend_from_slice(frames);
		out.resize(out.len() + padding, 0);
		out
	}

	#[test_log::test]
	fn frame_size_excludes_flags() {
		// TIT2, size 5, 2 flag bytes, then a 5 byte body
		let frames = b"TIT2\x00\x00\x00\x05\x00\x00\x03abcd";
		let content = tag_bytes(3, frames, 0);

		let mut ctx = ParseContext::new(ParseOptions::new());
		let chunk = Id3Chunk::parse(*b"id3 ", &content, &mut ctx).unwrap();

		let tag = chunk.tag.as_ref().unwrap();
		let title = tag.get(Id3FrameKey::Title).unwrap();
		assert_eq!(title.payload.len(), 7);
		assert_eq!(title.text().unwrap(), "abcd");
		assert_eq!(
			ctx.fields.iter().collect::<Vec<_>>(),
			[FieldId::Id3(Id3FrameKey::Title), FieldId::Id3Tag]
		);

		let written = chunk.contents(Selection::stored(&ctx.fields)).unwrap().unwrap();
		assert_eq!(written, content);
	}

	#[test_log::test]
	fn padding_and_unknown_frames() {
		let mut frames = b"TPE1\x00\x00\x00\x04\x00\x00\x00abc".to_vec();
		frames.extend_from_slice(b"PRIV\x00\x00\x00\x02\x00\x00\xAA\xBB");
		let content = tag_bytes(4, &frames, 6);

		let mut ctx = ParseContext::new(ParseOptions::new());
		let chunk = Id3Chunk::parse(*b"ID3 ", &content, &mut ctx).unwrap();

		let tag = chunk.tag.as_ref().unwrap();
		assert_eq!(tag.padding_len(), 6);
		assert_eq!(tag.unrecognized().len(), 1);
		assert_eq!(tag.unrecognized()[0].content, [0, 0, 0xAA, 0xBB]);
		assert_eq!(
			tag.get(Id3FrameKey::Artist).unwrap().text().unwrap(),
			"abc"
		);

		assert_eq!(chunk.contents(Selection::stored(&ctx.fields)).unwrap().unwrap(), content);
	}

	#[test_log::test]
	fn unsupported_tags_are_opaque() {
		let mut ctx = ParseContext::new(ParseOptions::new());

		let v2 = tag_bytes(2, b"TT2\x00\x00\x02\x00a", 0);
		let chunk = Id3Chunk::parse(*b"ID3 ", &v2, &mut ctx).unwrap();
		assert!(chunk.tag.is_none());
		assert_eq!(chunk.trailing, v2);

		let mut unsynchronised = tag_bytes(3, &[], 0);
		unsynchronised[5] = 0x80;
		let chunk = Id3Chunk::parse(*b"ID3 ", &unsynchronised, &mut ctx).unwrap();
		assert!(chunk.tag.is_none());

		let chunk = Id3Chunk::parse(*b"ID3 ", b"junk", &mut ctx).unwrap();
		assert_eq!(chunk.contents(Selection::stored(&FieldOrder::new())).unwrap().unwrap(), b"junk");
	}

	#[test_log::test]
	fn oversized_tag() {
		let mut content = tag_bytes(3, &[], 0);
		content[9] = 20;

		let mut ctx = ParseContext::new(ParseOptions::new());
		assert!(Id3Chunk::parse(*b"ID3 ", &content, &mut ctx).is_err());
	}

	#[test_log::test]
	fn comment_text() {
		let frame = Id3Frame::new_text(Id3FrameKey::Comment, TextEncoding::UTF16, "Comment");
		assert_eq!(frame.text().unwrap(), "Comment");

		let frame = Id3Frame::new_text(Id3FrameKey::UserText, TextEncoding::Latin1, "\u{00e9}t\u{00e9}");
		assert_eq!(frame.text().unwrap(), "\u{00e9}t\u{00e9}");
	}

	#[test_log::test]
	fn empty_tag_omitted() {
		let mut tag = Id3Tag::new();
		tag.insert(Id3Frame::new_text(Id3FrameKey::Album, TextEncoding::UTF8, "Album"));

		let chunk = Id3Chunk::new(tag);
		assert!(chunk.contents(Selection::stored(&FieldOrder::new())).unwrap().is_none());

		let written = chunk
			.contents(Selection::listed(&FieldOrder::from_names(["TALB", "ID3"]).unwrap()))
			.unwrap()
			.unwrap();
		assert_eq!(&written[..5], b"ID3\x04\x00");
	}
}
