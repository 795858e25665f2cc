//! Read, edit, and write RIFF/WAVE files without losing a byte.
//!
//! A [`WavFile`](wav::WavFile) is a tree of [`Chunk`](chunk::Chunk)s. Chunks that are understood
//! (`fmt `, `fact`, `data`, `cue `, `LIST`/`INFO`, `LIST`/`adtl`, and `ID3 `) are decoded into
//! typed structures, and everything else is kept as opaque bytes. Writing a file that was read
//! and left unchanged reproduces the input.
//!
//! # Examples
//!
//! ## Reading a file
//!
//! ```rust,no_run
//! # fn main() -> wavchunks::error::Result<()> {
//! use wavchunks::config::ParseOptions;
//! use wavchunks::wav::WavFile;
//!
//! let file = WavFile::read_from_path("test.wav", ParseOptions::new())?;
//!
//! if let Some(properties) = file.properties()? {
//! 	println!("{} Hz, {} channel(s)", properties.sample_rate(), properties.channels());
//! }
//!
//! if let Some(title) = file.info().and_then(|info| info.title()) {
//! 	println!("Title: {title}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Working with samples
//!
//! ```rust
//! # fn main() -> wavchunks::error::Result<()> {
//! use wavchunks::chunk::{AudioFormat, FmtChunk};
//! use wavchunks::codec::{self, Sample};
//!
//! let fmt = FmtChunk::new(AudioFormat::Pcm, 2, 44100, 16);
//!
//! let raw = [0x01, 0x00, 0xFF, 0xFF];
//! let samples = codec::decode(&fmt, &raw, raw.len())?;
//! assert_eq!(samples, [Sample::Int(1), Sample::Int(-1)]);
//!
//! let channels = codec::to_channels(&fmt, &samples)?;
//! assert_eq!(channels, [vec![Sample::Int(1)], vec![Sample::Int(-1)]]);
//!
//! assert_eq!(codec::encode(&fmt, &samples)?, raw);
//! # Ok(())
//! # }
//! ```
//!
//! ## Writing a file
//!
//! ```rust
//! # fn main() -> wavchunks::error::Result<()> {
//! use wavchunks::chunk::{AudioFormat, Chunk, DataChunk, FmtChunk};
//! use wavchunks::config::WriteOptions;
//! use wavchunks::wav::WavFile;
//!
//! let mut file = WavFile::new();
//! file.chunks_mut()
//! 	.push(Chunk::Format(FmtChunk::new(AudioFormat::Pcm, 1, 8000, 8)));
//! file.chunks_mut()
//! 	.push(Chunk::Data(DataChunk::Raw(vec![0x80; 8000])));
//!
//! let mut bytes = Vec::new();
//! file.dump_to(&mut bytes, WriteOptions::default())?;
//!
//! assert_eq!(&bytes[..4], b"RIFF");
//! # Ok(())
//! # }
//! ```
//!
//! # Important notes
//!
//! Only the fields listed in a [`FieldOrder`](wav::FieldOrder) are written. A parsed file
//! remembers the fields it was read with, so fields added afterwards must also be added to
//! [`WavFile::fields_mut`](wav::WavFile::fields_mut).
#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod chunk;
pub mod codec;
pub mod config;
pub mod error;
pub(crate) mod macros;
mod util;
pub mod wav;

pub use util::text::TextEncoding;

pub mod prelude {
	//! A prelude for commonly used items in the library.
	//!
	//! This module is intended to be wildcard imported.
	//!
	//! ```rust
	//! use wavchunks::prelude::*;
	//! ```

	pub use crate::chunk::{Chunk, DataChunk, FmtChunk};
	pub use crate::codec::Sample;
	pub use crate::config::{ParseOptions, WriteOptions};
	pub use crate::wav::{FieldId, FieldOrder, WavFile};
}
