use crate::chunk::record::{Records, RiffRecord, write_record};
use crate::chunk::{ParseContext, UnrecognizedChunk};
use crate::config::ChunkPadding;
use crate::error::{ErrorKind, Result, WavError};
use crate::macros::fourcc_keys;
use crate::util::alloc::copy_bytes;
use crate::util::text::trim_end_nulls_str;
use crate::wav::{FieldId, Selection};

use std::fmt::{Display, Formatter};

fourcc_keys! {
	/// The `LIST`/`INFO` items with a known meaning
	pub enum InfoKey {
		/// `IART`
		Artist => b"IART",
		/// `INAM`
		Title => b"INAM",
		/// `IPRD`, the product the file belongs to
		Album => b"IPRD",
		/// `ICRD`
		CreationDate => b"ICRD",
		/// `IGNR`
		Genre => b"IGNR",
		/// `ICMT`
		Comment => b"ICMT",
		/// `ITRK`
		Track => b"ITRK",
		/// `ISFT`, the software that created the file
		Software => b"ISFT",
	}
}

macro_rules! impl_accessor {
	($($name:ident => $key:ident;)+) => {
		paste::paste! {
			$(
				#[doc = "Get the [`InfoKey::" $key "`] item, with trailing NULs trimmed"]
				pub fn $name(&self) -> Option<&str> {
					self.get(InfoKey::$key)
				}

				#[doc = "Set the [`InfoKey::" $key "`] item, see [`InfoList::insert`]"]
				pub fn [<set_ $name>](&mut self, value: String) {
					self.insert(InfoKey::$key, value)
				}

				#[doc = "Remove the [`InfoKey::" $key "`] item"]
				pub fn [<remove_ $name>](&mut self) {
					let _ = self.remove(InfoKey::$key);
				}
			)+
		}
	}
}

/// A `LIST`/`INFO` chunk
///
/// Items are UTF-8 text, stored exactly as they appear in the file, including any NUL
/// terminator. Records with an unknown key, or a key that was already seen, are kept verbatim.
///
/// An item is only written if its [`FieldId`] appears in the [`FieldOrder`](crate::wav::FieldOrder)
/// before [`FieldId::InfoList`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InfoList {
	pub(crate) items: Vec<(InfoKey, String)>,
	pub(crate) unrecognized: Vec<UnrecognizedChunk>,
	pub(crate) trailing: Vec<u8>,
}

impl InfoList {
	/// Create a new empty `InfoList`
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::InfoList;
	///
	/// let info = InfoList::new();
	/// assert!(info.is_empty());
	/// ```
	pub fn new() -> Self {
		Self::default()
	}

	impl_accessor!(
		artist        => Artist;
		title         => Title;
		album         => Album;
		creation_date => CreationDate;
		genre         => Genre;
		comment       => Comment;
		track         => Track;
		software      => Software;
	);

	/// Get an item's text, with trailing NULs trimmed
	pub fn get(&self, key: InfoKey) -> Option<&str> {
		self.get_raw(key).map(trim_end_nulls_str)
	}

	/// Get an item's text as stored
	pub fn get_raw(&self, key: InfoKey) -> Option<&str> {
		self.items
			.iter()
			.find(|(k, _)| *k == key)
			.map(|(_, v)| v.as_str())
	}

	/// Insert an item, replacing any item with the same key
	///
	/// A NUL terminator is appended to `value` if it has none.
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::{InfoKey, InfoList};
	///
	/// let mut info = InfoList::new();
	/// info.insert(InfoKey::Title, String::from("Foo title"));
	///
	/// assert_eq!(info.title(), Some("Foo title"));
	/// assert_eq!(info.get_raw(InfoKey::Title), Some("Foo title\0"));
	/// ```
	pub fn insert(&mut self, key: InfoKey, mut value: String) {
		if !value.ends_with('\0') {
			value.push('\0');
		}

		match self.items.iter_mut().find(|(k, _)| *k == key) {
			Some((_, existing)) => *existing = value,
			None => self.items.push((key, value)),
		}
	}

	/// Remove an item, returning its text as stored
	pub fn remove(&mut self, key: InfoKey) -> Option<String> {
		let position = self.items.iter().position(|(k, _)| *k == key)?;
		Some(self.items.remove(position).1)
	}

	/// Iterate over the items, in stored order
	pub fn items(&self) -> impl Iterator<Item = (InfoKey, &str)> {
		self.items.iter().map(|(k, v)| (*k, v.as_str()))
	}

	/// Records that were kept verbatim
	pub fn unrecognized(&self) -> &[UnrecognizedChunk] {
		&self.unrecognized
	}

	/// Records that were kept verbatim
	///
	/// These are always written, after the items.
	pub fn unrecognized_mut(&mut self) -> &mut Vec<UnrecognizedChunk> {
		&mut self.unrecognized
	}

	/// Bytes following the last record that could not form one
	pub fn trailing(&self) -> &[u8] {
		&self.trailing
	}

	/// Whether the list holds no items and no unrecognized records
	pub fn is_empty(&self) -> bool {
		self.items.is_empty() && self.unrecognized.is_empty()
	}

	pub(crate) fn parse(data: &[u8], ctx: &mut ParseContext) -> Result<Self> {
		let mut list = Self::default();
		let mut records = Records::<RiffRecord>::new(data, ctx.options.padding);

		loop {
			let record = match records.next() {
				Ok(Some(record)) => record,
				// A truncated record is kept with the trailing bytes
				Ok(None) | Err(_) => break,
			};

			let Some(key) = InfoKey::from_fourcc(record.fourcc) else {
				log::debug!(
					"Keeping unknown INFO record \"{}\"",
					String::from_utf8_lossy(&record.fourcc)
				);
				list.unrecognized.push(UnrecognizedChunk::from_raw(record)?);
				continue;
			};

			if list.get_raw(key).is_some() {
				log::debug!("Keeping duplicate INFO record \"{key}\"");
				list.unrecognized.push(UnrecognizedChunk::from_raw(record)?);
				continue;
			}

			match std::str::from_utf8(record.content) {
				Ok(text) => {
					list.items.push((key, text.to_owned()));
					ctx.discover_in(FieldId::Info(key), FieldId::InfoList);
				},
				Err(_) => {
					ctx.recover(WavError::new(ErrorKind::TextDecode(
						"INFO item is not valid UTF-8",
					)))?;
					list.unrecognized.push(UnrecognizedChunk::from_raw(record)?);
				},
			}
		}

		let trailing = records.take_remainder();
		if !trailing.is_empty() {
			ctx.recover(WavError::new(ErrorKind::MalformedRecord(
				"INFO list ends with a partial record",
			)))?;
		}

		list.trailing = copy_bytes(trailing)?;
		ctx.discover(FieldId::InfoList);

		log::debug!(
			"Parsed INFO list: {} item(s), {} unrecognized record(s)",
			list.items.len(),
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

		let items = selection.arrange(&self.items, FieldId::InfoList, |(key, _)| FieldId::Info(*key));
		for (key, value) in items {
			write_record::<RiffRecord>(out, key.fourcc(), value.as_bytes(), padding)?;
		}

		for record in &self.unrecognized {
			record.write_to::<RiffRecord>(out, padding)?;
		}

		out.extend_from_slice(&self.trailing);
		Ok(out.len() > start)
	}
}

impl Display for InfoList {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"LIST/INFO: {} item(s), {} unrecognized",
			self.items.len(),
			self.unrecognized.len()
		)?;

		for (key, value) in &self.items {
			write!(f, "\n\t{key}: {}", trim_end_nulls_str(value))?;
		}

		Ok(())
	}
}
