//! Contains the errors that can arise within wavchunks
//!
//! The primary error is [`WavError`]. The type of error is determined by [`ErrorKind`],
//! which can be extended at any time.

use crate::chunk::ChunkType;

use std::collections::TryReserveError;
use std::fmt::{Debug, Display, Formatter};

/// Alias for `Result<T, WavError>`
pub type Result<T> = std::result::Result<T, WavError>;

/// The types of errors that can occur
#[derive(Debug)]
#[non_exhaustive]
pub enum ErrorKind {
	// Structural errors
	/// Attempted to read past the end of the available bytes
	TruncatedInput,
	/// A record's boundaries are inconsistent with its declared size
	///
	/// This is a recoverable error outside of [`ParsingMode::Strict`](crate::config::ParsingMode::Strict),
	/// in which case it will be reported through [`WavFile::warnings`](crate::wav::WavFile::warnings).
	MalformedRecord(&'static str),
	/// Attempting to read/write an abnormally large amount of data
	TooMuchData,
	/// Errors that occur while decoding a chunk
	FileDecoding(FileDecodingError),
	/// Errors that occur while encoding a chunk
	FileEncoding(FileEncodingError),

	// Sample related errors
	/// The `audio_format`/`bits_per_sample` pair has no sample codec
	UnsupportedFormat {
		/// The `audio_format` code of the `fmt ` chunk
		format: u16,
		/// The `bits_per_sample` of the `fmt ` chunk
		bits_per_sample: u16,
	},
	/// Attempted to interleave channels of unequal lengths
	ChannelLengthMismatch {
		/// The index of the first offending channel
		channel: usize,
		/// The length of the first channel
		expected: usize,
		/// The length of the offending channel
		found: usize,
	},
	/// The encoded sample data would not decode back to the provided samples
	EncodingRoundTrip {
		/// The expected number of samples
		expected: usize,
		/// The number of samples the encoded data would decode to
		actual: usize,
	},
	/// A sample cannot be represented in the target format
	InvalidSample(&'static str),

	// Field list errors
	/// A name in a field inclusion list does not name a recognized field
	UnknownField(String),

	// Conversions for external errors
	/// Errors that arise while decoding text
	TextDecode(&'static str),
	/// Unable to convert bytes to a String
	StringFromUtf8(std::string::FromUtf8Error),
	/// Represents all cases of [`std::io::Error`], other than an unexpected EOF
	Io(std::io::Error),
	/// Failure to allocate enough memory
	Alloc(TryReserveError),
	/// This should **never** be encountered
	Infallible(std::convert::Infallible),
}

macro_rules! chunk_error {
	($(#[$meta:meta])* $name:ident => $variant:ident) => {
		$(#[$meta])*
		pub struct $name {
			chunk: ChunkType,
			description: &'static str,
		}

		impl $name {
			#[doc = concat!("Create a `", stringify!($name), "` bound to a [`ChunkType`]")]
			#[must_use]
			pub const fn new(chunk: ChunkType, description: &'static str) -> Self {
				Self { chunk, description }
			}

			/// The chunk the error arose in
			pub fn chunk(&self) -> ChunkType {
				self.chunk
			}

			/// Returns the error description
			pub fn description(&self) -> &str {
				self.description
			}
		}

		impl Debug for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				write!(f, "{:?}: {:?}", self.chunk, self.description)
			}
		}

		impl Display for $name {
			fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
				write!(f, "{}: {}", self.chunk, self.description)
			}
		}

		impl From<$name> for WavError {
			fn from(input: $name) -> Self {
				Self::new(ErrorKind::$variant(input))
			}
		}
	};
}

chunk_error! {
	/// An error that arises while decoding a chunk
	FileDecodingError => FileDecoding
}

chunk_error! {
	/// An error that arises while encoding a chunk
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::ChunkType;
	/// use wavchunks::error::FileEncodingError;
	///
	/// let data_error = FileEncodingError::new(ChunkType::Data, "Samples do not fit the format");
	/// assert_eq!(data_error.chunk(), ChunkType::Data);
	/// assert_eq!(data_error.to_string(), "data: Samples do not fit the format");
	/// ```
	FileEncodingError => FileEncoding
}

/// Errors that could occur within wavchunks
pub struct WavError {
	pub(crate) kind: ErrorKind,
}

impl WavError {
	/// Create a `WavError` from an [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::error::{ErrorKind, WavError};
	///
	/// let truncated = WavError::new(ErrorKind::TruncatedInput);
	/// ```
	#[must_use]
	pub const fn new(kind: ErrorKind) -> Self {
		Self { kind }
	}

	/// Returns the [`ErrorKind`]
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::error::{ErrorKind, WavError};
	///
	/// let truncated = WavError::new(ErrorKind::TruncatedInput);
	/// if let ErrorKind::TruncatedInput = truncated.kind() {
	/// 	println!("Where's the rest of the file?");
	/// }
	/// ```
	pub fn kind(&self) -> &ErrorKind {
		&self.kind
	}
}

impl std::error::Error for WavError {}

impl Debug for WavError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(f, "{:?}", self.kind)
	}
}

impl From<std::io::Error> for WavError {
	fn from(input: std::io::Error) -> Self {
		// Readers only ever run over in-memory buffers
		match input.kind() {
			std::io::ErrorKind::UnexpectedEof => Self::new(ErrorKind::TruncatedInput),
			_ => Self::new(ErrorKind::Io(input)),
		}
	}
}

impl From<std::string::FromUtf8Error> for WavError {
	fn from(input: std::string::FromUtf8Error) -> Self {
		Self::new(ErrorKind::StringFromUtf8(input))
	}
}

impl From<TryReserveError> for WavError {
	fn from(input: TryReserveError) -> Self {
		Self::new(ErrorKind::Alloc(input))
	}
}

impl From<std::convert::Infallible> for WavError {
	fn from(input: std::convert::Infallible) -> Self {
		Self::new(ErrorKind::Infallible(input))
	}
}

impl Display for WavError {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self.kind {
			// Conversions
			ErrorKind::StringFromUtf8(ref err) => write!(f, "{err}"),
			ErrorKind::Io(ref err) => write!(f, "{err}"),
			ErrorKind::Alloc(ref err) => write!(f, "{err}"),

			ErrorKind::TruncatedInput => {
				write!(f, "Attempted to read past the end of the input")
			},
			ErrorKind::MalformedRecord(message) => write!(f, "Malformed record: {message}"),
			ErrorKind::TooMuchData => write!(
				f,
				"Attempted to read/write an abnormally large amount of data"
			),
			ErrorKind::FileDecoding(ref file_decode_err) => write!(f, "{file_decode_err}"),
			ErrorKind::FileEncoding(ref file_encode_err) => write!(f, "{file_encode_err}"),

			ErrorKind::UnsupportedFormat {
				format,
				bits_per_sample,
			} => write!(
				f,
				"No sample codec for audio format {format:#06x} with {bits_per_sample} bits per \
				 sample"
			),
			ErrorKind::ChannelLengthMismatch {
				channel,
				expected,
				found,
			} => write!(
				f,
				"Channel {channel} has {found} samples, expected {expected} to match channel 0"
			),
			ErrorKind::EncodingRoundTrip { expected, actual } => write!(
				f,
				"Encoded data would decode to {actual} samples, expected {expected}"
			),
			ErrorKind::InvalidSample(message) => write!(f, "Invalid sample: {message}"),
			ErrorKind::UnknownField(ref name) => {
				write!(f, "\"{name}\" is not a recognized field name")
			},
			ErrorKind::TextDecode(message) => write!(f, "Text decoding: {message}"),

			ErrorKind::Infallible(_) => write!(f, "A expected condition was not upheld"),
		}
	}
}
