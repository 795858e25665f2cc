use super::ChunkPadding;

/// How the parser reacts to malformed input
///
/// Set with [`ParseOptions::parsing_mode`]. Outside of [`ParsingMode::Strict`], every recovered
/// anomaly is logged with `log::warn!` and kept in [`WavFile::warnings`](crate::wav::WavFile::warnings).
///
/// # Examples
///
/// ```rust,no_run
/// use wavchunks::config::{ParseOptions, ParsingMode};
/// use wavchunks::wav::WavFile;
///
/// # fn main() -> wavchunks::error::Result<()> {
/// // Reject anything malformed
/// let parse_options = ParseOptions::new().parsing_mode(ParsingMode::Strict);
/// let file = WavFile::read_from_path("foo.wav", parse_options)?;
/// # Ok(()) }
/// ```
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[non_exhaustive]
pub enum ParsingMode {
	/// The first anomaly fails the whole parse
	///
	/// * Text that fails to decode is an error
	/// * A cue chunk declaring more points than it holds is an error
	Strict,
	/// Anything that cannot be interpreted is kept as opaque bytes
	///
	/// * Text that fails to decode leaves its record unrecognized
	/// * A malformed recognized chunk is kept as an unrecognized chunk
	/// * A final chunk running past the end of the input is kept with the trailing bytes
	#[default]
	BestAttempt,
	/// [`ParsingMode::BestAttempt`], but a final chunk running past the end of the input keeps
	/// whatever bytes are available
	///
	/// * A truncated `data` chunk holds the bytes that were read
	Relaxed,
}

/// Options for [`WavFile::parse`](crate::wav::WavFile::parse) and friends
///
/// | Option             | Default                     |
/// |--------------------|-----------------------------|
/// | `parsing_mode`     | [`ParsingMode::BestAttempt`] |
/// | `padding`          | [`ChunkPadding::Even`]      |
/// | `decode_samples`   | `false`                     |
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct ParseOptions {
	pub(crate) parsing_mode: ParsingMode,
	pub(crate) padding: ChunkPadding,
	pub(crate) decode_samples: bool,
}

impl Default for ParseOptions {
	fn default() -> Self {
		Self::new()
	}
}

impl ParseOptions {
	/// Same as [`ParseOptions::default`]
	///
	/// ```rust
	/// use wavchunks::config::ParseOptions;
	///
	/// assert_eq!(ParseOptions::new(), ParseOptions::default());
	/// ```
	#[must_use]
	pub const fn new() -> Self {
		Self {
			parsing_mode: ParsingMode::BestAttempt,
			padding: ChunkPadding::Even,
			decode_samples: false,
		}
	}

	/// See [`ParsingMode`]
	pub fn parsing_mode(&mut self, parsing_mode: ParsingMode) -> Self {
		self.parsing_mode = parsing_mode;
		*self
	}

	/// Whether odd-sized chunks are expected to be followed by a pad byte
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::config::{ChunkPadding, ParseOptions};
	///
	/// let parse_options = ParseOptions::new().padding(ChunkPadding::None);
	/// ```
	pub fn padding(&mut self, padding: ChunkPadding) -> Self {
		self.padding = padding;
		*self
	}

	/// Whether to decode the contents of every `data` chunk into channels while parsing
	///
	/// Samples are decoded with the first `fmt ` chunk in the file. When disabled, `data`
	/// chunks hold raw bytes until [`WavFile::decode_samples`](crate::wav::WavFile::decode_samples)
	/// is called.
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::config::ParseOptions;
	///
	/// // Decode the audio up front for editing
	/// let parse_options = ParseOptions::new().decode_samples(true);
	/// ```
	pub fn decode_samples(&mut self, decode_samples: bool) -> Self {
		self.decode_samples = decode_samples;
		*self
	}
}
