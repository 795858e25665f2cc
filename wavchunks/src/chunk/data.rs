use super::FmtChunk;
use crate::codec::{self, Sample, SampleCodec, to_channels, to_interleaved};
use crate::error::Result;
use crate::macros::{decode_err, encode_err};
use crate::util::alloc::copy_bytes;

use std::borrow::Cow;
use std::fmt::{Display, Formatter};

/// The samples of a decoded `data` chunk
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DecodedData {
	/// One sequence of samples per channel, all of equal length
	pub channels: Vec<Vec<Sample>>,
	/// Trailing bytes that did not form a whole frame, written back verbatim
	pub remainder: Vec<u8>,
}

impl DecodedData {
	/// The number of samples in a single channel
	pub fn frames(&self) -> usize {
		self.channels.first().map_or(0, Vec::len)
	}
}

/// The contents of a `data` chunk
///
/// A `data` chunk holds raw bytes until it is decoded with a format descriptor, see
/// [`DataChunk::decode`] and [`WavFile::decode_samples`](crate::wav::WavFile::decode_samples).
#[derive(Debug, Clone, PartialEq)]
pub enum DataChunk {
	/// The undecoded contents, written back verbatim
	Raw(Vec<u8>),
	/// Decoded samples, re-encoded with the file's format descriptor when written
	Decoded(DecodedData),
}

impl DataChunk {
	pub(crate) fn parse(content: &[u8]) -> Result<Self> {
		Ok(Self::Raw(copy_bytes(content)?))
	}

	/// Decode the chunk's contents with `fmt`
	///
	/// Only whole frames, one sample of every channel, are decoded. Any trailing bytes are kept
	/// in [`DecodedData::remainder`]. If the chunk is already decoded, this is a copy of its samples.
	///
	/// # Errors
	///
	/// `fmt` describes an unsupported encoding, or declares zero channels
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::{AudioFormat, DataChunk, FmtChunk};
	/// use wavchunks::codec::Sample;
	///
	/// # fn main() -> wavchunks::error::Result<()> {
	/// let fmt = FmtChunk::new(AudioFormat::Pcm, 2, 8000, 8);
	/// let data = DataChunk::Raw(vec![1, 2, 3, 4, 5]);
	///
	/// let decoded = data.decode(&fmt)?;
	/// assert_eq!(decoded.channels[0], [Sample::Int(1), Sample::Int(3)]);
	/// assert_eq!(decoded.channels[1], [Sample::Int(2), Sample::Int(4)]);
	/// assert_eq!(decoded.remainder, [5]);
	/// # Ok(()) }
	/// ```
	pub fn decode(&self, fmt: &FmtChunk) -> Result<DecodedData> {
		match self {
			Self::Raw(raw) => decode_raw(fmt, raw),
			Self::Decoded(decoded) => Ok(decoded.clone()),
		}
	}

	/// Replace the raw contents with their decoded samples
	///
	/// This does nothing if the chunk is already decoded.
	///
	/// # Errors
	///
	/// See [`DataChunk::decode`]
	pub fn decode_in_place(&mut self, fmt: &FmtChunk) -> Result<()> {
		if let Self::Raw(raw) = self {
			*self = Self::Decoded(decode_raw(fmt, raw)?);
		}

		Ok(())
	}

	/// The decoded channels, if the chunk has been decoded
	pub fn channels(&self) -> Option<&[Vec<Sample>]> {
		match self {
			Self::Raw(_) => None,
			Self::Decoded(decoded) => Some(&decoded.channels),
		}
	}

	/// The decoded channels, if the chunk has been decoded
	pub fn channels_mut(&mut self) -> Option<&mut Vec<Vec<Sample>>> {
		match self {
			Self::Raw(_) => None,
			Self::Decoded(decoded) => Some(&mut decoded.channels),
		}
	}

	/// The length of the chunk's contents once encoded with `fmt`
	///
	/// # Errors
	///
	/// The chunk is decoded, and `fmt` describes an encoding with no codec
	pub(crate) fn encoded_len(&self, fmt: &FmtChunk) -> Result<usize> {
		match self {
			Self::Raw(raw) => Ok(raw.len()),
			Self::Decoded(decoded) => {
				let codec = SampleCodec::for_format(fmt)?;
				let samples = decoded.frames() * decoded.channels.len();

				Ok(samples * codec.stride() + decoded.remainder.len())
			},
		}
	}

	/// Every sample of the chunk, including those in a trailing partial frame
	pub(crate) fn all_samples(&self, fmt: &FmtChunk) -> Result<Vec<Sample>> {
		let decoded = match self {
			Self::Raw(raw) => Cow::Owned(decode_raw(fmt, raw)?),
			Self::Decoded(decoded) => Cow::Borrowed(decoded),
		};

		let mut samples = to_interleaved(&decoded.channels)?;
		samples.extend(codec::decode(
			fmt,
			&decoded.remainder,
			decoded.remainder.len(),
		)?);

		Ok(samples)
	}

	/// The bytes to write, decoded samples are encoded with `fmt`
	pub(crate) fn to_bytes(&self, fmt: Option<&FmtChunk>) -> Result<Cow<'_, [u8]>> {
		match self {
			Self::Raw(raw) => Ok(Cow::Borrowed(raw)),
			Self::Decoded(decoded) => {
				let Some(fmt) = fmt else {
					encode_err!(@BAIL Data, "Decoded samples can only be written with a format chunk");
				};

				let mut bytes = codec::encode(fmt, &to_interleaved(&decoded.channels)?)?;
				bytes.extend_from_slice(&decoded.remainder);
				Ok(Cow::Owned(bytes))
			},
		}
	}

	/// The bytes to write, with every sample decoded with `source` and encoded with `target`
	pub(crate) fn to_bytes_converted(&self, source: &FmtChunk, target: &FmtChunk) -> Result<Vec<u8>> {
		codec::encode(target, &self.all_samples(source)?)
	}

	/// Convert decoded samples of `source` to `target`, a PCM format holding the same values
	pub(crate) fn convert(&mut self, source: &FmtChunk, target: &FmtChunk) -> Result<()> {
		let mut decoded = self.decode(source)?;

		let remainder = codec::decode(source, &decoded.remainder, decoded.remainder.len())?;
		decoded.remainder = codec::encode(target, &remainder)?;

		*self = Self::Decoded(decoded);
		Ok(())
	}
}

fn decode_raw(fmt: &FmtChunk, raw: &[u8]) -> Result<DecodedData> {
	let codec = SampleCodec::for_format(fmt)?;
	let num_channels = usize::from(fmt.num_channels);
	if num_channels == 0 {
		decode_err!(@BAIL Format, "Format chunk declares zero channels");
	}

	let frame_len = codec.stride() * num_channels;
	let whole_frames_len = raw.len() - raw.len() % frame_len;

	let samples = codec::decode(fmt, raw, whole_frames_len)?;
	log::debug!(
		"Decoded {} sample(s), {} byte(s) left over",
		samples.len(),
		raw.len() - whole_frames_len
	);

	Ok(DecodedData {
		channels: to_channels(fmt, &samples)?,
		remainder: copy_bytes(&raw[whole_frames_len..])?,
	})
}

impl Display for DataChunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Raw(raw) => write!(f, "data: {} byte(s)", raw.len()),
			Self::Decoded(decoded) => write!(
				f,
				"data: {} channel(s) x {} sample(s), {} byte(s) left over",
				decoded.channels.len(),
				decoded.frames(),
				decoded.remainder.len()
			),
		}
	}
}
