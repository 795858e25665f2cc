use crate::error::Result;
use crate::macros::decode_err;

use std::fmt::{Display, Formatter};

use byteorder::{ByteOrder, LittleEndian, ReadBytesExt, WriteBytesExt};

const PCM: u16 = 0x0001;
const ADPCM: u16 = 0x0002;
const IEEE_FLOAT: u16 = 0x0003;
const ALAW: u16 = 0x0006;
const MULAW: u16 = 0x0007;
const EXTENSIBLE: u16 = 0xFFFE;

/// The minimum size of a `fmt ` chunk
pub(crate) const FMT_CHUNK_MIN_SIZE: usize = 16;

/// The `audio_format` code of a `fmt ` chunk
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum AudioFormat {
	/// Integer PCM (1)
	Pcm,
	/// IMA ADPCM (2)
	Adpcm,
	/// IEEE floating point (3)
	IeeeFloat,
	/// ITU G.711 A-law (6)
	ALaw,
	/// ITU G.711 µ-law (7)
	MuLaw,
	/// `WAVE_FORMAT_EXTENSIBLE` (0xFFFE), the real format is stored in the extra format bytes
	Extensible,
	/// Any other format code, kept as-is
	Other(u16),
}

impl AudioFormat {
	/// Get an `AudioFormat` from its numeric code
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::AudioFormat;
	///
	/// assert_eq!(AudioFormat::from_u16(1), AudioFormat::Pcm);
	/// assert_eq!(AudioFormat::from_u16(99), AudioFormat::Other(99));
	/// ```
	pub fn from_u16(code: u16) -> Self {
		match code {
			PCM => Self::Pcm,
			ADPCM => Self::Adpcm,
			IEEE_FLOAT => Self::IeeeFloat,
			ALAW => Self::ALaw,
			MULAW => Self::MuLaw,
			EXTENSIBLE => Self::Extensible,
			other => Self::Other(other),
		}
	}

	/// The numeric code of the format
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::AudioFormat;
	///
	/// assert_eq!(AudioFormat::MuLaw.code(), 7);
	/// assert_eq!(AudioFormat::from_u16(0x55).code(), 0x55);
	/// ```
	pub fn code(self) -> u16 {
		match self {
			Self::Pcm => PCM,
			Self::Adpcm => ADPCM,
			Self::IeeeFloat => IEEE_FLOAT,
			Self::ALaw => ALAW,
			Self::MuLaw => MULAW,
			Self::Extensible => EXTENSIBLE,
			Self::Other(code) => code,
		}
	}

	/// Whether the format is one of the G.711 companding formats
	pub fn is_companded(self) -> bool {
		matches!(self, Self::ALaw | Self::MuLaw)
	}
}

impl Display for AudioFormat {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		match self {
			Self::Pcm => f.write_str("PCM"),
			Self::Adpcm => f.write_str("ADPCM"),
			Self::IeeeFloat => f.write_str("IEEE float"),
			Self::ALaw => f.write_str("A-law"),
			Self::MuLaw => f.write_str("µ-law"),
			Self::Extensible => f.write_str("extensible"),
			Self::Other(code) => write!(f, "{code:#06x}"),
		}
	}
}

/// The format descriptor of a WAV file
///
/// This describes how the contents of every `data` chunk are encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FmtChunk {
	/// The sample encoding
	pub audio_format: AudioFormat,
	/// The number of interleaved channels
	pub num_channels: u16,
	/// Samples per second, per channel
	pub sample_rate: u32,
	/// Bytes per second, `sample_rate * block_align` for uncompressed formats
	pub byte_rate: u32,
	/// Bytes per frame, one sample of every channel
	pub block_align: u16,
	/// Bits per sample of a single channel
	pub bits_per_sample: u16,
	/// Everything following the first 16 bytes, kept verbatim
	///
	/// The first two bytes are normally the little-endian size of the remaining extension.
	pub extra_format_bytes: Option<Vec<u8>>,
}

impl FmtChunk {
	/// Create a descriptor for uncompressed audio, deriving `byte_rate` and `block_align`
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::{AudioFormat, FmtChunk};
	///
	/// let fmt = FmtChunk::new(AudioFormat::Pcm, 2, 44100, 16);
	/// assert_eq!(fmt.block_align, 4);
	/// assert_eq!(fmt.byte_rate, 176_400);
	/// ```
	pub fn new(
		audio_format: AudioFormat,
		num_channels: u16,
		sample_rate: u32,
		bits_per_sample: u16,
	) -> Self {
		let block_align = (bits_per_sample / 8).saturating_mul(num_channels);
		Self {
			audio_format,
			num_channels,
			sample_rate,
			byte_rate: sample_rate.saturating_mul(u32::from(block_align)),
			block_align,
			bits_per_sample,
			extra_format_bytes: None,
		}
	}

	/// The byte width of a single sample, `bits_per_sample / 8`
	///
	/// This is `0` for formats with less than 8 bits per sample, such as ADPCM.
	pub fn sample_width(&self) -> usize {
		usize::from(self.bits_per_sample / 8)
	}

	/// The format used to encode samples
	///
	/// For [`AudioFormat::Extensible`], this is the sub-format stored in the extension, provided
	/// the extension is large enough to hold one. Otherwise, this is [`FmtChunk::audio_format`].
	///
	/// # Examples
	///
	/// ```rust
	/// use wavchunks::chunk::{AudioFormat, FmtChunk};
	///
	/// let mut fmt = FmtChunk::new(AudioFormat::Extensible, 2, 48000, 24);
	/// assert_eq!(fmt.effective_format(), AudioFormat::Extensible);
	///
	/// // cbSize, valid bits, channel mask, then the sub-format GUID starting with the code
	/// let mut extension = vec![22, 0, 24, 0, 3, 0, 0, 0, 1, 0];
	/// extension.extend_from_slice(&[0; 14]);
	/// fmt.extra_format_bytes = Some(extension);
	///
	/// assert_eq!(fmt.effective_format(), AudioFormat::Pcm);
	/// ```
	pub fn effective_format(&self) -> AudioFormat {
		if self.audio_format != AudioFormat::Extensible {
			return self.audio_format;
		}

		match self.extra_format_bytes.as_deref() {
			Some(extra) if extra.len() >= 24 => {
				AudioFormat::from_u16(LittleEndian::read_u16(&extra[8..10]))
			},
			_ => self.audio_format,
		}
	}

	/// The valid bits per sample declared by a `WAVE_FORMAT_EXTENSIBLE` extension
	pub(crate) fn valid_bits_per_sample(&self) -> Option<u16> {
		if self.audio_format != AudioFormat::Extensible {
			return None;
		}

		match self.extra_format_bytes.as_deref() {
			Some(extra) if extra.len() >= 24 => Some(LittleEndian::read_u16(&extra[2..4])),
			_ => None,
		}
	}

	pub(crate) fn parse(mut content: &[u8]) -> Result<Self> {
		if content.len() < FMT_CHUNK_MIN_SIZE {
			decode_err!(@BAIL Format, "Format chunk is smaller than 16 bytes");
		}

		let reader = &mut content;
		let audio_format = AudioFormat::from_u16(reader.read_u16::<LittleEndian>()?);
		let num_channels = reader.read_u16::<LittleEndian>()?;
		let sample_rate = reader.read_u32::<LittleEndian>()?;
		let byte_rate = reader.read_u32::<LittleEndian>()?;
		let block_align = reader.read_u16::<LittleEndian>()?;
		let bits_per_sample = reader.read_u16::<LittleEndian>()?;

		let extra_format_bytes = if reader.is_empty() {
			None
		} else {
			Some(crate::util::alloc::copy_bytes(reader)?)
		};

		log::debug!(
			"Found format chunk: {audio_format}, {num_channels} channel(s), {sample_rate} Hz, \
			 {bits_per_sample} bits per sample"
		);

		Ok(Self {
			audio_format,
			num_channels,
			sample_rate,
			byte_rate,
			block_align,
			bits_per_sample,
			extra_format_bytes,
		})
	}

	pub(crate) fn write_to(&self, out: &mut Vec<u8>) -> Result<()> {
		out.write_u16::<LittleEndian>(self.audio_format.code())?;
		out.write_u16::<LittleEndian>(self.num_channels)?;
		out.write_u32::<LittleEndian>(self.sample_rate)?;
		out.write_u32::<LittleEndian>(self.byte_rate)?;
		out.write_u16::<LittleEndian>(self.block_align)?;
		out.write_u16::<LittleEndian>(self.bits_per_sample)?;

		if let Some(extra) = &self.extra_format_bytes {
			out.extend_from_slice(extra);
		}

		Ok(())
	}
}

impl Display for FmtChunk {
	fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
		write!(
			f,
			"fmt: {}, {} channel(s), {} Hz, {} B/s, block align {}, {} bits per sample",
			self.audio_format,
			self.num_channels,
			self.sample_rate,
			self.byte_rate,
			self.block_align,
			self.bits_per_sample
		)?;

		if let Some(extra) = &self.extra_format_bytes {
			write!(f, ", {} extra byte(s)", extra.len())?;
		}

		Ok(())
	}
}
