use super::ChunkPadding;

/// Options for [`WavFile::write_to`](crate::wav::WavFile::write_to) and friends
///
/// By default, odd-sized records are padded and samples are written in their stored format.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct WriteOptions {
	pub(crate) padding: ChunkPadding,
	pub(crate) compact: bool,
}

impl WriteOptions {
	/// Same as [`WriteOptions::default`]
	#[must_use]
	pub const fn new() -> Self {
		Self {
			padding: ChunkPadding::Even,
			compact: false,
		}
	}

	/// Whether odd-sized chunks and records are followed by a pad byte
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::config::{ChunkPadding, WriteOptions};
	///
	/// // The consumer of this file expects records packed back to back
	/// let options = WriteOptions::new().padding(ChunkPadding::None);
	/// ```
	pub fn padding(mut self, padding: ChunkPadding) -> Self {
		self.padding = padding;
		self
	}

	/// Whether to write A-law/µ-law audio as PCM at the smallest width that holds every sample
	///
	/// The `fmt ` chunk is rewritten to match in the output only. The in-memory file is left
	/// untouched, see [`WavFile::compact`](crate::wav::WavFile::compact) to apply the change to
	/// the file itself. Other formats are written unchanged.
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::config::WriteOptions;
	///
	/// let options = WriteOptions::new().compact(true);
	/// ```
	pub fn compact(mut self, compact: bool) -> Self {
		self.compact = compact;
		self
	}
}

impl Default for WriteOptions {
	fn default() -> Self {
		Self::new()
	}
}
