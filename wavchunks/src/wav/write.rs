use super::{Selection, WavFile};
use crate::chunk::record::{RiffRecord, write_record};
use crate::chunk::{Chunk, RIFF_HEADER_SIZE};
use crate::config::WriteOptions;
use crate::error::Result;
use crate::macros::err;

use std::borrow::Cow;

/// Serialize `file` into a new buffer
pub(super) fn build(file: &WavFile, selection: Selection<'_>, write_options: WriteOptions) -> Result<Vec<u8>> {
	let padding = write_options.padding;
	let source = file.fmt();

	// Companded audio is written as PCM, in place of the first format chunk
	let target = match source {
		Some(fmt) if write_options.compact && fmt.effective_format().is_companded() => {
			let target = file.compact_format(fmt)?;
			log::debug!(
				"Writing {} audio as {} bit PCM",
				fmt.audio_format,
				target.bits_per_sample
			);
			Some(target)
		},
		_ => None,
	};
	let mut pending_format = target.clone();

	let mut out = Vec::new();
	out.extend_from_slice(b"RIFF");
	out.extend_from_slice(&[0; 4]);
	out.extend_from_slice(&file.header.form_type);

	for chunk in &file.chunks {
		let contents = match chunk {
			Chunk::Format(fmt) => {
				let mut bytes = Vec::new();
				match pending_format.take() {
					Some(target) => target.write_to(&mut bytes)?,
					None => fmt.write_to(&mut bytes)?,
				}

				Cow::Owned(bytes)
			},
			Chunk::Fact(fact) => {
				let mut bytes = Vec::with_capacity(4);
				fact.write_to(&mut bytes);
				Cow::Owned(bytes)
			},
			Chunk::Data(data) => match (source, &target) {
				(Some(source), Some(target)) => Cow::Owned(data.to_bytes_converted(source, target)?),
				_ => data.to_bytes(source)?,
			},
			Chunk::Cue(cue) => {
				let mut bytes = Vec::new();
				cue.write_to(&mut bytes)?;
				Cow::Owned(bytes)
			},
			Chunk::List(list) => match list.contents(selection, padding)? {
				Some(bytes) => Cow::Owned(bytes),
				None => continue,
			},
			Chunk::Id3(id3) => match id3.contents(selection)? {
				Some(bytes) => Cow::Owned(bytes),
				None => continue,
			},
			Chunk::Unrecognized(unrecognized) => Cow::Borrowed(unrecognized.content.as_slice()),
		};

		write_record::<RiffRecord>(&mut out, chunk.fourcc(), &contents, padding)?;
	}

	out.extend_from_slice(&file.trailing);

	let Ok(riff_size) = u32::try_from(out.len() - 8) else {
		err!(TooMuchData);
	};

	out[4..8].copy_from_slice(&riff_size.to_le_bytes());
	log::debug!(
		"Built file: {} byte(s) of chunks, RIFF size: {riff_size}",
		out.len() - RIFF_HEADER_SIZE
	);

	Ok(out)
}

#[cfg(test)]
mod tests {
	use crate::chunk::{
		AudioFormat, Chunk, DataChunk, FmtChunk, InfoKey, InfoList, ListChunk, ListKind,
	};
	use crate::codec::Sample;
	use crate::config::{ChunkPadding, ParseOptions, WriteOptions};
	use crate::wav::{FieldOrder, WavFile};

	fn file(fmt: FmtChunk, data: DataChunk) -> WavFile {
		let mut file = WavFile::new();
		file.chunks_mut().push(Chunk::Format(fmt));
		file.chunks_mut().push(Chunk::Data(data));
		file
	}

	fn dump(file: &WavFile, write_options: WriteOptions) -> Vec<u8> {
		let mut out = Vec::new();
		file.dump_to(&mut out, write_options).unwrap();
		out
	}

	#[test_log::test]
	fn recomputes_sizes() {
		let file = file(
			FmtChunk::new(AudioFormat::Pcm, 1, 8000, 8),
			DataChunk::Raw(vec![1, 2, 3]),
		);

		let bytes = dump(&file, WriteOptions::default());
		// 12 + (8 + 16) + (8 + 3 + 1)
		assert_eq!(bytes.len(), 48);
		assert_eq!(&bytes[4..8], &40_u32.to_le_bytes());
		assert_eq!(&bytes[40..44], &3_u32.to_le_bytes());
		assert_eq!(bytes[47], 0);

		let unpadded = dump(&file, WriteOptions::default().padding(ChunkPadding::None));
		assert_eq!(unpadded.len(), 47);
	}

	#[test_log::test]
	fn nothing_written_on_error() {
		// 8 bit PCM can't hold a float
		let data = DataChunk::Raw(Vec::new());
		let mut file = file(FmtChunk::new(AudioFormat::Pcm, 1, 8000, 8), data);
		file.data_mut()
			.unwrap()
			.decode_in_place(&FmtChunk::new(AudioFormat::Pcm, 1, 8000, 8))
			.unwrap();
		file.data_mut().unwrap().channels_mut().unwrap()[0].push(Sample::Float(0.5));

		let mut out = Vec::new();
		assert!(file.dump_to(&mut out, WriteOptions::default()).is_err());
		assert!(out.is_empty());
	}

	#[test_log::test]
	fn compact_write_leaves_tree() {
		let alaw = FmtChunk::new(AudioFormat::ALaw, 1, 8000, 16);
		let file = file(alaw.clone(), DataChunk::Raw(vec![0xD5, 0x55]));

		let bytes = dump(&file, WriteOptions::default().compact(true));
		assert_eq!(file.fmt(), Some(&alaw));

		let written = WavFile::parse(&bytes, ParseOptions::new()).unwrap();
		let fmt = written.fmt().unwrap();
		assert_eq!(fmt.audio_format, AudioFormat::Pcm);
		// -8 needs a signed width
		assert_eq!(fmt.bits_per_sample, 16);
		assert_eq!(
			written.data(),
			Some(&DataChunk::Raw(vec![8, 0, 0xF8, 0xFF]))
		);
	}

	#[test_log::test]
	fn empty_list_omitted() {
		let mut file = file(
			FmtChunk::new(AudioFormat::Pcm, 1, 8000, 8),
			DataChunk::Raw(vec![0, 0]),
		);
		let without_list = dump(&file, WriteOptions::default());

		let mut info = InfoList::new();
		info.insert(InfoKey::Title, String::from("Title"));
		file.chunks_mut()
			.push(Chunk::List(ListChunk::new(ListKind::Info(info))));

		// No fields were discovered, so the title is left out
		assert_eq!(dump(&file, WriteOptions::default()), without_list);

		*file.fields_mut() = FieldOrder::from_names(["INAM", "INFO"]).unwrap();
		let with_list = dump(&file, WriteOptions::default());
		assert_eq!(with_list.len(), without_list.len() + 8 + 4 + 8 + 6);
	}
}
