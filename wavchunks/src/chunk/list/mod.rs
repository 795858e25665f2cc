mod adtl;
mod info;

pub use adtl::{AdtlEntry, AdtlKey, AdtlList, LabeledTextInfo};
pub use info::{InfoKey, InfoList};

use super::ParseContext;
use crate::config::ChunkPadding;
use crate::error::Result;
use crate::macros::decode_err;
use crate::util::alloc::copy_bytes;
use crate::wav::Selection;

use std::fmt::{Display, Formatter};

/// The contents of a `LIST` chunk, determined by its list type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListKind {
	/// `INFO`, textual metadata
	Info(InfoList),
	/// `adtl`, labels and notes attached to cue points
	AssociatedData(AdtlList),
	/// Any other list type, kept verbatim
	Other {
		/// The list type
		list_type: [u8; 4],
		/// Everything following the list type
		content: Vec<u8>,
	},
}

/// A `LIST` chunk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListChunk {
	/// The list's contents
	pub kind: ListKind,
}

impl ListChunk {
	/// Create a `LIST` chunk holding `kind`
	pub fn new(kind: ListKind) -> Self {
		Self { kind }
	}

	/// The list type, the first 4 bytes of the chunk
	pub fn list_type(&self) -> [u8; 4] {
		match &self.kind {
			ListKind::Info(_) => *b"INFO",
			ListKind::AssociatedData(_) => *b"adtl",
			ListKind::Other { list_type, .. } => *list_type,
		}
	}

	pub(crate) fn parse(content: &[u8], ctx: &mut ParseContext) -> Result<Self> {
		if content.len() < 4 {
			decode_err!(@BAIL List, "LIST chunk is too short to hold a list type");
		}

		let mut list_type = [0; 4];
		list_type.copy_from_slice(&content[..4]);

		let records = &content[4..];
		let kind = match &list_type {
			b"INFO" => ListKind::Info(InfoList::parse(records, ctx)?),
			b"adtl" => ListKind::AssociatedData(AdtlList::parse(records, ctx)?),
			_ => {
				log::debug!(
					"Keeping LIST chunk of type \"{}\" verbatim",
					String::from_utf8_lossy(&list_type)
				);
				ListKind::Other {
					list_type,
					content: copy_bytes(records)?,
				}
			},
		};

		Ok(Self { kind })
	}

	/// The chunk's contents, or `None` if the list has nothing left to write
	pub(crate) fn contents(
		&self,
		selection: Selection<'_>,
		padding: ChunkPadding,
	) -> Result<Option<Vec<u8>>> {
		let mut out = self.list_type().to_vec();

		let written = match &self.kind {
			ListKind::Info(info) => info.write_to(&mut out, selection, padding)?,
			ListKind::AssociatedData(adtl) => adtl.write_to(&mut out, selection, padding)?,
			ListKind::Other { content, .. } => {
				out.extend_from_slice(content);
				return Ok(Some(out));
			},
		};

		if !written {
			log::debug!(
				"Omitting empty LIST chunk of type \"{}\"",
				String::from_utf8_lossy(&self.list_type())
			);
			return Ok(None);
		}

		Ok(Some(out))
	}
}

impl Display for ListChunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match &self.kind {
			ListKind::Info(info) => info.fmt(f),
			ListKind::AssociatedData(adtl) => adtl.fmt(f),
			ListKind::Other { list_type, content } => write!(
				f,
				"LIST/{}: {} byte(s)",
				String::from_utf8_lossy(list_type),
				content.len()
			),
		}
	}
}
