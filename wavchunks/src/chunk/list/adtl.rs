use crate::chunk::record::{Records, RiffRecord, write_record};
use crate::chunk::{ParseContext, UnrecognizedChunk};
use crate::config::ChunkPadding;
use crate::error::{ErrorKind, Result, WavError};
use crate::macros::fourcc_keys;
use crate::util::alloc::copy_bytes;
use crate::util::text::trim_end_nulls_str;
use crate::wav::{FieldId, Selection};

use std::fmt::{Display, Formatter};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};

const CUE_ID_SIZE: usize = 4;
const LABELED_TEXT_INFO_SIZE: usize = 16;

fourcc_keys! {
	/// The `LIST`/`adtl` records with a known meaning
	pub enum AdtlKey {
		/// `labl`, a cue point's label
		Label => b"labl",
		/// `note`, a comment on a cue point
		Note => b"note",
		/// `ltxt`, text attached to a region starting at a cue point
		LabeledText => b"ltxt",
	}
}

/// The fixed fields of an `ltxt` record
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub struct LabeledTextInfo {
	/// The length of the region, in samples
	pub sample_length: u32,
	/// What the text describes, such as `scrp` for a script
	pub purpose: [u8; 4],
	#[allow(missing_docs)]
	pub country: u16,
	#[allow(missing_docs)]
	pub language: u16,
	#[allow(missing_docs)]
	pub dialect: u16,
	#[allow(missing_docs)]
	pub code_page: u16,
}

impl LabeledTextInfo {
	fn read(reader: &mut &[u8]) -> Result<Self> {
		let sample_length = reader.read_u32::<LittleEndian>()?;
		let mut purpose = [0; 4];
		std::io::Read::read_exact(reader, &mut purpose)?;

		Ok(Self {
			sample_length,
			purpose,
			country: reader.read_u16::<LittleEndian>()?,
			language: reader.read_u16::<LittleEndian>()?,
			dialect: reader.read_u16::<LittleEndian>()?,
			code_page: reader.read_u16::<LittleEndian>()?,
		})
	}

	fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
		out.write_u32::<LittleEndian>(self.sample_length)?;
		out.extend_from_slice(&self.purpose);
		out.write_u16::<LittleEndian>(self.country)?;
		out.write_u16::<LittleEndian>(self.language)?;
		out.write_u16::<LittleEndian>(self.dialect)?;
		out.write_u16::<LittleEndian>(self.code_page)?;
		Ok(())
	}
}

/// A single `labl`, `note` or `ltxt` record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdtlEntry {
	/// The record's kind
	pub key: AdtlKey,
	/// The [`CuePoint::id`](crate::chunk::CuePoint::id) the record belongs to
	pub cue_id: [u8; 4],
	/// The fixed fields of an `ltxt` record
	///
	/// This is only written for [`AdtlKey::LabeledText`], which uses the default if it is `None`.
	pub text_info: Option<LabeledTextInfo>,
	/// The record's text, as stored
	pub text: String,
}

impl AdtlEntry {
	/// Create a new entry
	///
	/// A NUL terminator is appended to `text` if it has none.
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::{AdtlEntry, AdtlKey};
	///
	/// let entry = AdtlEntry::new(AdtlKey::Label, *b"cue1", String::from("Chorus"));
	/// assert_eq!(entry.text, "Chorus\0");
	/// assert_eq!(entry.trimmed_text(), "Chorus");
	/// ```
	pub fn new(key: AdtlKey, cue_id: [u8; 4], mut text: String) -> Self {
		if !text.ends_with('\0') {
			text.push('\0');
		}

		let text_info = (key == AdtlKey::LabeledText).then(LabeledTextInfo::default);

		Self {
			key,
			cue_id,
			text_info,
			text,
		}
	}

	/// The entry's text, with trailing NULs trimmed
	pub fn trimmed_text(&self) -> &str {
		trim_end_nulls_str(&self.text)
	}

	fn parse(key: AdtlKey, content: &[u8]) -> Result<Self> {
		let prefix_len = match key {
			AdtlKey::LabeledText => CUE_ID_SIZE + LABELED_TEXT_INFO_SIZE,
			_ => CUE_ID_SIZE,
		};

		if content.len() < prefix_len {
			return Err(WavError::new(ErrorKind::MalformedRecord(
				"adtl record is too short for its fixed fields",
			)));
		}

		let reader = &mut &content[..];

		let mut cue_id = [0; 4];
		std::io::Read::read_exact(reader, &mut cue_id)?;

		let text_info = match key {
			AdtlKey::LabeledText => Some(LabeledTextInfo::read(reader)?),
			_ => None,
		};

		let Ok(text) = std::str::from_utf8(reader) else {
			return Err(WavError::new(ErrorKind::TextDecode(
				"adtl record text is not valid UTF-8",
			)));
		};

		Ok(Self {
			key,
			cue_id,
			text_info,
			text: text.to_owned(),
		})
	}

	fn contents(&self) -> Result<Vec<u8>> {
		let mut out = Vec::with_capacity(CUE_ID_SIZE + LABELED_TEXT_INFO_SIZE + self.text.len());
		out.extend_from_slice(&self.cue_id);

		if self.key == AdtlKey::LabeledText {
			self.text_info.unwrap_or_default().write_to(&mut out)?;
		}

		out.extend_from_slice(self.text.as_bytes());
		Ok(out)
	}
}

/// A `LIST`/`adtl` chunk
///
/// Every entry is keyed by its kind and cue point id. Records with an unknown key, or a
/// key and cue point id that were already seen, are kept verbatim.
///
/// Entries are only written if their kind's [`FieldId`] appears in the [`FieldOrder`](crate::wav::FieldOrder) before
/// [`FieldId::AdtlList`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AdtlList {
	pub(crate) entries: Vec<AdtlEntry>,
	pub(crate) unrecognized: Vec<UnrecognizedChunk>,
	pub(crate) trailing: Vec<u8>,
}

impl AdtlList {
	/// Create a new empty `AdtlList`
	pub fn new() -> Self {
		Self::default()
	}

	/// The entries, in stored order
	pub fn entries(&self) -> &[AdtlEntry] {
		&self.entries
	}

	/// Get the entry of kind `key` for a cue point
	pub fn get(&self, key: AdtlKey, cue_id: [u8; 4]) -> Option<&AdtlEntry> {
		self.entries
			.iter()
			.find(|entry| entry.key == key && entry.cue_id == cue_id)
	}

	/// Get the label of a cue point, with trailing NULs trimmed
	pub fn label(&self, cue_id: [u8; 4]) -> Option<&str> {
		self.get(AdtlKey::Label, cue_id)
			.map(AdtlEntry::trimmed_text)
	}

	/// Get the note on a cue point, with trailing NULs trimmed
	pub fn note(&self, cue_id: [u8; 4]) -> Option<&str> {
		self.get(AdtlKey::Note, cue_id)
			.map(AdtlEntry::trimmed_text)
	}

	/// Insert an entry, replacing any entry with the same kind and cue point id
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::{AdtlEntry, AdtlKey, AdtlList};
	///
	/// let mut adtl = AdtlList::new();
	/// adtl.insert(AdtlEntry::new(AdtlKey::Label, *b"cue1", String::from("Intro")));
	/// adtl.insert(AdtlEntry::new(AdtlKey::Label, *b"cue1", String::from("Verse")));
	///
	/// assert_eq!(adtl.entries().len(), 1);
	/// assert_eq!(adtl.label(*b"cue1"), Some("Verse"));
	/// ```
	pub fn insert(&mut self, entry: AdtlEntry) {
		match self
			.entries
			.iter_mut()
			.find(|e| e.key == entry.key && e.cue_id == entry.cue_id)
		{
			Some(existing) => *existing = entry,
			None => self.entries.push(entry),
		}
	}

	/// Remove the entry of kind `key` for a cue point
	pub fn remove(&mut self, key: AdtlKey, cue_id: [u8; 4]) -> Option<AdtlEntry> {
		let position = self
			.entries
			.iter()
			.position(|entry| entry.key == key && entry.cue_id == cue_id)?;

		Some(self.entries.remove(position))
	}

	/// Records that were kept verbatim
	pub fn unrecognized(&self) -> &[UnrecognizedChunk] {
		&self.unrecognized
	}

	/// Records that were kept verbatim
	///
	/// These are always written, after the entries.
	pub fn unrecognized_mut(&mut self) -> &mut Vec<UnrecognizedChunk> {
		&mut self.unrecognized
	}

	/// Bytes following the last record that could not form one
	pub fn trailing(&self) -> &[u8] {
		&self.trailing
	}

	/// Whether the list holds no entries and no unrecognized records
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty() && self.unrecognized.is_empty()
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext) -> Result<Self> {
		let mut list = Self::default();
		let mut records = Records::<RiffRecord>::new(data, ctx.options.padding);

		// A truncated record is kept with the trailing bytes
		while let Ok(Some(record)) = records.next() {
			let Some(key) = AdtlKey::from_fourcc(record.fourcc) else {
				log::debug!(
					"Keeping unknown adtl record \"{}\"",
					String::from_utf8_lossy(&record.fourcc)
				);
				list.unrecognized.push(UnrecognizedChunk::from_raw(record)?);
				continue;
			};

			let entry = match AdtlEntry::parse(key, record.content) {
				Ok(entry) => entry,
				Err(err) => {
					ctx.recover(err)?;
					list.unrecognized.push(UnrecognizedChunk::from_raw(record)?);
					continue;
				},
			};

			if list.get(key, entry.cue_id).is_some() {
				log::debug!("Keeping duplicate adtl record \"{key}\"");
				list.unrecognized.push(UnrecognizedChunk::from_raw(record)?);
				continue;
			}

			list.entries.push(entry);
			ctx.discover_in(FieldId::Adtl(key), FieldId::AdtlList);
		}

		let trailing = records.take_remainder();
		if !trailing.is_empty() {
			ctx.recover(WavError::new(ErrorKind::MalformedRecord(
				"adtl list ends with a partial record",
			)))?;
		}

		list.trailing = copy_bytes(trailing)?;
		ctx.discover(FieldId::AdtlList);

		log::debug!(
			"Parsed adtl list: {} entries, {} unrecognized record(s)",
			list.entries.len(),
			list.unrecognized.len()
		);

		Ok(list)
	}

	/// Write the records, returning whether anything was written
	pub(crate) fn write_to(
		&self,
		out: &mut Vec<u8>,
		selection: Selection<'_>,
		padding: ChunkPadding,
	) -> Result<bool> {
		let start = out.len();

		let entries = selection.arrange(&self.entries, FieldId::AdtlList, |entry| {
			FieldId::Adtl(entry.key)
		});
		for entry in entries {
			write_record::<RiffRecord>(out, entry.key.fourcc(), &entry.contents()?, padding)?;
		}

		for record in &self.unrecognized {
			record.write_to::<RiffRecord>(out, padding)?;
		}

		out.extend_from_slice(&self.trailing);
		Ok(out.len() > start)
	}
}

impl Display for AdtlList {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"LIST/adtl: {} entries, {} unrecognized",
			self.entries.len(),
			self.unrecognized.len()
		)?;

		for entry in &self.entries {
			write!(
				f,
				"\n\t{} ({}): {}",
				entry.key,
				String::from_utf8_lossy(&entry.cue_id),
				entry.trimmed_text()
			)?;
		}

		Ok(())
	}
}
