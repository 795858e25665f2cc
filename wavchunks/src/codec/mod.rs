//! Conversion between raw `data` chunk bytes and numeric samples
//!
//! The encoding is selected by the [`FmtChunk`]'s (effective) [`AudioFormat`] and its sample width,
//! `bits_per_sample / 8`:
//!
//! | Format          | Width      | Samples                                                         |
//! |-----------------|------------|-----------------------------------------------------------------|
//! | PCM (1)         | 1          | Unsigned integers                                               |
//! | PCM (1)         | 2..=8      | Signed little-endian integers                                   |
//! | IEEE float (3)  | 4 or 8     | `f32`/`f64`, widened to `f64`                                   |
//! | A-law (6)       | 1..=8      | One byte per sample, expanded to a signed integer of the width  |
//! | µ-law (7)       | 1..=8      | One byte per sample, expanded to a signed integer of the width  |
//! | ADPCM (2)       | 0          | IMA ADPCM, grouped into `i64` samples (see below)               |
//!
//! ADPCM is only supported with 2 or 4 bits per sample. The stream is decompressed to 16-bit
//! values, widened to `bits_per_sample` bytes each, and every 8 bytes of the result form one
//! sample. With 4 bits per sample, one byte of input holds one sample. With 2, two bytes do.
//!
//! Every other combination is [`ErrorKind::UnsupportedFormat`](crate::error::ErrorKind::UnsupportedFormat).

mod adpcm;
mod channels;
mod g711;
mod pcm;

pub use channels::{to_channels, to_interleaved};

use crate::chunk::{AudioFormat, FmtChunk};
use crate::error::Result;
use crate::macros::err;
use crate::util::alloc::VecFallibleCapacity;

use std::fmt::{Display, Formatter};

/// A single decoded sample
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum Sample {
	/// A sample of an integer format (PCM, A-law, µ-law, ADPCM)
	Int(i64),
	/// A sample of a floating point format
	Float(f64),
}

impl Display for Sample {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Sample::Int(value) => write!(f, "{value}"),
			Sample::Float(value) => write!(f, "{value}"),
		}
	}
}

/// The resolved sample encoding of a format descriptor
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) enum SampleCodec {
	Pcm { width: usize },
	Float { width: usize },
	ALaw { width: usize },
	MuLaw { width: usize },
	Adpcm { linear_width: usize },
}

impl SampleCodec {
	pub(crate) fn for_format(fmt: &FmtChunk) -> Result<Self> {
		let width = fmt.sample_width();
		let format = fmt.effective_format();

		let codec = match (format, width) {
			// A zero width selects a wholly different decoder, never a degenerate PCM one
			(AudioFormat::Adpcm, 0) => match fmt.bits_per_sample {
				2 | 4 => Some(Self::Adpcm {
					linear_width: usize::from(fmt.bits_per_sample),
				}),
				_ => None,
			},
			(_, 0) | (AudioFormat::Adpcm, _) => None,
			(AudioFormat::Pcm, 1..=8) => Some(Self::Pcm { width }),
			(AudioFormat::IeeeFloat, 4 | 8) => Some(Self::Float { width }),
			(AudioFormat::ALaw, 1..=8) => Some(Self::ALaw { width }),
			(AudioFormat::MuLaw, 1..=8) => Some(Self::MuLaw { width }),
			_ => None,
		};

		match codec {
			Some(codec) => Ok(codec),
			None => err!(UnsupportedFormat {
				format: format.code(),
				bits_per_sample: fmt.bits_per_sample,
			}),
		}
	}

	/// The number of input bytes making up a single sample
	pub(crate) fn stride(self) -> usize {
		match self {
			Self::Pcm { width } | Self::Float { width } => width,
			Self::ALaw { .. } | Self::MuLaw { .. } => 1,
			Self::Adpcm { linear_width } => adpcm::stride(linear_width),
		}
	}
}

/// Decode the first `byte_count` bytes of `raw` into samples
///
/// A trailing partial sample is ignored, see [`DataChunk`](crate::chunk::DataChunk) for a
/// lossless alternative.
///
/// # Errors
///
/// * [`ErrorKind::UnsupportedFormat`](crate::error::ErrorKind::UnsupportedFormat) - `fmt` describes an encoding with no codec
/// * [`ErrorKind::TruncatedInput`](crate::error::ErrorKind::TruncatedInput) - `byte_count` exceeds the length of `raw`
///
/// # Examples
///
/// ```rust
/// use wavchunks::chunk::{AudioFormat, FmtChunk};
/// use wavchunks::codec::{self, Sample};
///
/// # fn main() -> wavchunks::error::Result<()> {
/// let fmt = FmtChunk::new(AudioFormat::Pcm, 1, 8000, 16);
///
/// // The final byte is half of a sample
/// let samples = codec::decode(&fmt, &[0x01, 0x00, 0xFF, 0xFF, 0x7F], 5)?;
/// assert_eq!(samples, [Sample::Int(1), Sample::Int(-1)]);
/// # Ok(()) }
/// ```
pub fn decode(fmt: &FmtChunk, raw: &[u8], byte_count: usize) -> Result<Vec<Sample>> {
	let codec = SampleCodec::for_format(fmt)?;

	let Some(raw) = raw.get(..byte_count) else {
		err!(TruncatedInput);
	};

	if let SampleCodec::Adpcm { linear_width } = codec {
		let samples = adpcm::decode(raw, linear_width)?;
		return Ok(samples.into_iter().map(Sample::Int).collect());
	}

	let stride = codec.stride();
	let mut samples = Vec::try_with_capacity_stable(raw.len() / stride)?;
	for sample in raw.chunks_exact(stride) {
		let decoded = match codec {
			SampleCodec::Pcm { width } => Sample::Int(pcm::read_int(sample, width)?),
			SampleCodec::Float { width } => Sample::Float(pcm::read_float(sample, width)?),
			SampleCodec::ALaw { width } => {
				Sample::Int(expand(g711::alaw_to_linear(sample[0]), width))
			},
			SampleCodec::MuLaw { width } => {
				Sample::Int(expand(g711::ulaw_to_linear(sample[0]), width))
			},
			SampleCodec::Adpcm { .. } => unreachable!("ADPCM is decoded as a whole buffer"),
		};

		samples.push(decoded);
	}

	Ok(samples)
}

/// Encode `samples` with the encoding described by `fmt`
///
/// This is the inverse of [`decode`] for every sample `decode` can produce.
///
/// # Errors
///
/// * [`ErrorKind::UnsupportedFormat`](crate::error::ErrorKind::UnsupportedFormat) - `fmt` describes an encoding with no codec
/// * [`ErrorKind::InvalidSample`](crate::error::ErrorKind::InvalidSample) - A sample is of the wrong kind, or out of range
/// * [`ErrorKind::EncodingRoundTrip`](crate::error::ErrorKind::EncodingRoundTrip) - ADPCM samples do not fill a whole number of bytes
///
/// # Examples
///
/// ```rust
/// use wavchunks::chunk::{AudioFormat, FmtChunk};
/// use wavchunks::codec::{self, Sample};
///
/// # fn main() -> wavchunks::error::Result<()> {
/// let fmt = FmtChunk::new(AudioFormat::IeeeFloat, 1, 8000, 32);
///
/// let bytes = codec::encode(&fmt, &[Sample::Float(0.5)])?;
/// assert_eq!(bytes, 0.5_f32.to_le_bytes());
/// # Ok(()) }
/// ```
pub fn encode(fmt: &FmtChunk, samples: &[Sample]) -> Result<Vec<u8>> {
	let codec = SampleCodec::for_format(fmt)?;

	if let SampleCodec::Adpcm { linear_width } = codec {
		let mut values = Vec::try_with_capacity_stable(samples.len())?;
		for sample in samples {
			let Sample::Int(value) = *sample else {
				err!(InvalidSample("Expected an integer sample"));
			};
			values.push(value);
		}

		return adpcm::encode(&values, linear_width);
	}

	let mut out = Vec::try_with_capacity_stable(samples.len().saturating_mul(codec.stride()))?;
	for sample in samples {
		match codec {
			SampleCodec::Pcm { width } => pcm::write_int(&mut out, sample, width)?,
			SampleCodec::Float { width } => pcm::write_float(&mut out, sample, width)?,
			SampleCodec::ALaw { width } => out.push(compress(
				sample,
				width,
				g711::alaw_to_linear,
				g711::linear_to_alaw,
			)?),
			SampleCodec::MuLaw { width } => out.push(compress(
				sample,
				width,
				g711::ulaw_to_linear,
				g711::linear_to_ulaw,
			)?),
			SampleCodec::Adpcm { .. } => unreachable!("ADPCM is encoded as a whole buffer"),
		}
	}

	Ok(out)
}

/// The output of [`encode_compact`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompactEncoding {
	/// The encoded samples
	pub bytes: Vec<u8>,
	/// The descriptor matching [`CompactEncoding::bytes`], if it differs from the input descriptor
	pub format: Option<FmtChunk>,
}

/// Encode `samples`, writing companded audio as PCM at the smallest width that holds every sample
///
/// For A-law and µ-law, the samples are written as PCM with the smallest width whose range contains
/// every sample, a width of 1 covering `0..=255`, and any wider width covering the signed range.
/// The returned [`CompactEncoding::format`] holds the adjusted descriptor. `fmt` itself is never modified.
///
/// For every other format, this is identical to [`encode`].
///
/// # Errors
///
/// See [`encode`]
///
/// # Examples
///
/// ```rust
/// use wavchunks::chunk::{AudioFormat, FmtChunk};
/// use wavchunks::codec::{self, Sample};
///
/// # fn main() -> wavchunks::error::Result<()> {
/// let fmt = FmtChunk::new(AudioFormat::ALaw, 1, 8000, 16);
///
/// let compact = codec::encode_compact(&fmt, &[Sample::Int(-300), Sample::Int(300)])?;
/// assert_eq!(compact.bytes, [0xD4, 0xFE, 0x2C, 0x01]);
///
/// let new_format = compact.format.unwrap();
/// assert_eq!(new_format.audio_format, AudioFormat::Pcm);
/// assert_eq!(new_format.bits_per_sample, 16);
///
/// // The input samples are untouched
/// assert_eq!(fmt.audio_format, AudioFormat::ALaw);
/// # Ok(()) }
/// ```
pub fn encode_compact(fmt: &FmtChunk, samples: &[Sample]) -> Result<CompactEncoding> {
	if !fmt.effective_format().is_companded() {
		return Ok(CompactEncoding {
			bytes: encode(fmt, samples)?,
			format: None,
		});
	}

	let format = compact_format(fmt, samples)?;
	Ok(CompactEncoding {
		bytes: encode(&format, samples)?,
		format: Some(format),
	})
}

/// The PCM descriptor [`encode_compact`] would write `samples` with
pub(crate) fn compact_format(fmt: &FmtChunk, samples: &[Sample]) -> Result<FmtChunk> {
	let mut width = 1;
	for sample in samples {
		let Sample::Int(value) = *sample else {
			err!(InvalidSample("Expected an integer sample"));
		};

		loop {
			let (min, max) = pcm::int_range(width);
			if value >= min && value <= max {
				break;
			}
			width += 1;
		}
	}

	let block_align = u16::try_from(width)
		.ok()
		.and_then(|width| width.checked_mul(fmt.num_channels));
	let Some(block_align) = block_align else {
		err!(TooMuchData);
	};

	Ok(FmtChunk {
		audio_format: AudioFormat::Pcm,
		num_channels: fmt.num_channels,
		sample_rate: fmt.sample_rate,
		byte_rate: fmt.sample_rate.saturating_mul(u32::from(block_align)),
		block_align,
		// At most 8 bytes wide
		bits_per_sample: (width * 8) as u16,
		extra_format_bytes: None,
	})
}

// 16-bit linear PCM to a signed sample of `width` bytes
fn expand(linear: i16, width: usize) -> i64 {
	let linear = i64::from(linear);
	match width {
		1 => linear >> 8,
		_ => linear << ((width - 2) * 8),
	}
}

fn compress(
	sample: &Sample,
	width: usize,
	decompress: fn(u8) -> i16,
	compress: fn(i16) -> u8,
) -> Result<u8> {
	let Sample::Int(value) = *sample else {
		err!(InvalidSample("Expected an integer sample"));
	};

	let (min, max) = if width == 1 {
		(i64::from(i8::MIN), i64::from(i8::MAX))
	} else {
		pcm::int_range(width)
	};

	if value < min || value > max {
		err!(InvalidSample("Integer sample is out of range for the sample width"));
	}

	if width != 1 {
		// Checked above, `value` fits in 16 bits once shifted down
		let linear = (value >> ((width - 2) * 8)) as i16;
		return Ok(compress(linear));
	}

	// Checked above, `value` fits in 8 bits
	let code = compress(((value << 8) | 0x80) as i16);
	if expand(decompress(code), 1) == value {
		return Ok(code);
	}

	// Expanding to 8 bits discards the low byte, so the nearest code may land in a neighboring step
	Ok((0..=u8::MAX)
		.find(|candidate| expand(decompress(*candidate), 1) == value)
		.unwrap_or(code))
}
