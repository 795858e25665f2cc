use crate::chunk::{AdtlKey, Id3FrameKey, InfoKey};
use crate::error::{ErrorKind, Result, WavError};

use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// A recognized field, or the container holding it
///
/// Every field displays as, and parses from, its record's fourcc. The containers use `INFO`,
/// `adtl` and `ID3`.
///
/// # Examples
///
/// ```rust
/// use wavchunks::chunk::InfoKey;
/// use wavchunks::wav::FieldId;
///
/// # fn main() -> wavchunks::error::Result<()> {
/// let field = "INAM".parse::<FieldId>()?;
/// assert_eq!(field, FieldId::Info(InfoKey::Title));
/// assert_eq!(FieldId::InfoList.to_string(), "INFO");
///
/// assert!("ABCD".parse::<FieldId>().is_err());
/// # Ok(()) }
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum FieldId {
	/// An item of a `LIST`/`INFO` chunk
	Info(InfoKey),
	/// The `LIST`/`INFO` chunk
	InfoList,
	/// An entry kind of a `LIST`/`adtl` chunk
	Adtl(AdtlKey),
	/// The `LIST`/`adtl` chunk
	AdtlList,
	/// A frame of an ID3v2 tag
	Id3(Id3FrameKey),
	/// The `ID3 ` chunk
	Id3Tag,
}

impl FromStr for FieldId {
	type Err = WavError;

	fn from_str(s: &str) -> Result<Self> {
		match s {
			"INFO" => return Ok(FieldId::InfoList),
			"adtl" => return Ok(FieldId::AdtlList),
			"ID3" => return Ok(FieldId::Id3Tag),
			_ => {},
		}

		let field = <[u8; 4]>::try_from(s.as_bytes()).ok().and_then(|fourcc| {
			InfoKey::from_fourcc(fourcc)
				.map(FieldId::Info)
				.or_else(|| AdtlKey::from_fourcc(fourcc).map(FieldId::Adtl))
				.or_else(|| Id3FrameKey::from_fourcc(fourcc).map(FieldId::Id3))
		});

		field.ok_or_else(|| WavError::new(ErrorKind::UnknownField(s.to_owned())))
	}
}

impl Display for FieldId {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			FieldId::Info(key) => key.fmt(f),
			FieldId::InfoList => f.write_str("INFO"),
			FieldId::Adtl(key) => key.fmt(f),
			FieldId::AdtlList => f.write_str("adtl"),
			FieldId::Id3(key) => key.fmt(f),
			FieldId::Id3Tag => f.write_str("ID3"),
		}
	}
}

/// An ordered list of the fields to write
///
/// A container's fields are only written if they appear before the container itself. Fields
/// after their container, or with no container in the list, are left out. Unrecognized records
/// are always written, after the others.
///
/// [`WavFile::write_to`](crate::wav::WavFile::write_to) also writes the records in the order of
/// their fields. [`WavFile::dump_to`](crate::wav::WavFile::dump_to) keeps the order the records
/// are stored in.
///
/// A parsed file holds the order its fields were found in, see [`WavFile::fields`](crate::wav::WavFile::fields).
///
/// # Examples
///
/// ```rust
/// use wavchunks::chunk::InfoKey;
/// use wavchunks::wav::{FieldId, FieldOrder};
///
/// # fn main() -> wavchunks::error::Result<()> {
/// // Only write the title and artist, in that order
/// let order = FieldOrder::from_names(["INAM", "IART", "INFO"])?;
///
/// assert!(order.contains(FieldId::Info(InfoKey::Title)));
/// assert!(!order.contains(FieldId::Info(InfoKey::Genre)));
/// # Ok(()) }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldOrder {
	fields: Vec<FieldId>,
}

impl FieldOrder {
	/// Create an empty `FieldOrder`
	pub fn new() -> Self {
		Self::default()
	}

	/// Every field, each container following its own fields
	pub fn all() -> Self {
		let info = InfoKey::ALL
			.iter()
			.copied()
			.map(FieldId::Info)
			.chain([FieldId::InfoList]);
		let adtl = AdtlKey::ALL
			.iter()
			.copied()
			.map(FieldId::Adtl)
			.chain([FieldId::AdtlList]);
		let id3 = Id3FrameKey::ALL
			.iter()
			.copied()
			.map(FieldId::Id3)
			.chain([FieldId::Id3Tag]);

		info.chain(adtl).chain(id3).collect()
	}

	/// Create a `FieldOrder` from field names
	///
	/// # Errors
	///
	/// A name does not belong to any field, see [`FieldId`]
	pub fn from_names<I, S>(names: I) -> Result<Self>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		names
			.into_iter()
			.map(|name| name.as_ref().parse::<FieldId>())
			.collect()
	}

	/// Append a field, this does nothing if it is already in the list
	pub fn push(&mut self, field: FieldId) {
		if !self.contains(field) {
			self.fields.push(field);
		}
	}

	/// Insert a field right before `anchor`, or append it if `anchor` is not in the list
	///
	/// A field that is already in the list is moved.
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::InfoKey;
	/// use wavchunks::wav::{FieldId, FieldOrder};
	///
	/// # fn main() -> wavchunks::error::Result<()> {
	/// let mut order = FieldOrder::from_names(["INAM", "INFO"])?;
	/// order.insert_before(FieldId::Info(InfoKey::Artist), FieldId::InfoList);
	///
	/// assert_eq!(order.to_string(), "INAM, IART, INFO");
	/// # Ok(()) }
	/// ```
	pub fn insert_before(&mut self, field: FieldId, anchor: FieldId) {
		self.remove(field);

		match self.fields.iter().position(|f| *f == anchor) {
			Some(position) => self.fields.insert(position, field),
			None => self.fields.push(field),
		}
	}

	/// Remove a field, returning whether it was in the list
	pub fn remove(&mut self, field: FieldId) -> bool {
		let len = self.fields.len();
		self.fields.retain(|f| *f != field);
		self.fields.len() != len
	}

	/// Whether `field` is in the list
	pub fn contains(&self, field: FieldId) -> bool {
		self.fields.contains(&field)
	}

	/// Iterate over the fields, in order
	pub fn iter(&self) -> impl Iterator<Item = FieldId> + '_ {
		self.fields.iter().copied()
	}

	/// The number of fields in the list
	pub fn len(&self) -> usize {
		self.fields.len()
	}

	/// Whether the list is empty
	pub fn is_empty(&self) -> bool {
		self.fields.is_empty()
	}

	fn position(&self, field: FieldId) -> Option<usize> {
		self.fields.iter().position(|f| *f == field)
	}
}

/// The fields included in a write, and whether their order is imposed on the records
#[derive(Debug, Copy, Clone)]
pub(crate) struct Selection<'a> {
	order: &'a FieldOrder,
	reorder: bool,
}

impl<'a> Selection<'a> {
	/// Every container keeps its stored record order
	pub(crate) fn stored(order: &'a FieldOrder) -> Self {
		Self {
			order,
			reorder: false,
		}
	}

	/// Records follow the order of their fields, records of the same field keep their stored order
	pub(crate) fn listed(order: &'a FieldOrder) -> Self {
		Self {
			order,
			reorder: true,
		}
	}

	/// The records of `container` to write, in the order to write them
	///
	/// Only records whose field is listed before `container` are selected.
	pub(crate) fn arrange<'r, T>(
		self,
		records: &'r [T],
		container: FieldId,
		field: impl Fn(&T) -> FieldId,
	) -> Vec<&'r T> {
		let Some(end) = self.order.position(container) else {
			return Vec::new();
		};

		let listed = &self.order.fields[..end];
		let mut selected = records
			.iter()
			.filter_map(|record| {
				let position = listed.iter().position(|f| *f == field(record))?;
				Some((position, record))
			})
			.collect::<Vec<_>>();

		if self.reorder {
			selected.sort_by_key(|(position, _)| *position);
		}

		selected.into_iter().map(|(_, record)| record).collect()
	}
}

impl FromIterator<FieldId> for FieldOrder {
	fn from_iter<T: IntoIterator<Item = FieldId>>(iter: T) -> Self {
		let mut order = Self::new();
		for field in iter {
			order.push(field);
		}

		order
	}
}

impl Display for FieldOrder {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		for (index, field) in self.fields.iter().enumerate() {
			if index > 0 {
				f.write_str(", ")?;
			}

			field.fmt(f)?;
		}

		Ok(())
	}
}
