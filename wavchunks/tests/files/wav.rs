use crate::util::{chunk, dump, fmt, full_file, list, parse, riff};

use wavchunks::chunk::{AudioFormat, Chunk, CuePoint, DataChunk, InfoKey, ListKind};
use wavchunks::codec::Sample;
use wavchunks::config::{ParseOptions, ParsingMode, WriteOptions};
use wavchunks::error::ErrorKind;
use wavchunks::wav::{FieldId, FieldOrder, WavFile};

use std::time::Duration;

#[test_log::test]
fn read() {
	let file = parse(&full_file());
	assert!(file.warnings().is_empty());
	assert_eq!(file.chunks().len(), 7);

	let fmt = file.fmt().unwrap();
	assert_eq!(fmt.audio_format, AudioFormat::Pcm);
	assert_eq!(fmt.num_channels, 2);

	let properties = file.properties().unwrap().unwrap();
	assert_eq!(properties.sample_rate(), 8000);
	assert_eq!(properties.bit_depth(), 16);
	// 2 frames at 8000 Hz
	assert_eq!(properties.duration(), Duration::ZERO);

	assert_eq!(
		file.cue().unwrap().points,
		[CuePoint {
			id: [1, 0, 0, 0],
			position: 0,
			data_chunk_id: *b"data",
			chunk_start: 0,
			block_start: 0,
			sample_offset: 1,
		}]
	);

	let info = file.info().unwrap();
	assert_eq!(info.title(), Some("Foo title"));
	assert_eq!(info.artist(), Some("Bar artist"));
	assert_eq!(info.unrecognized()[0].fourcc, *b"XTRA");

	assert_eq!(file.adtl().unwrap().label([1, 0, 0, 0]), Some("Intro"));

	let Some(Chunk::Unrecognized(unknown)) = file.chunks().last() else {
		panic!("expected the unknown chunk to be kept");
	};
	assert_eq!(unknown.fourcc, *b"XTRA");
	assert_eq!(unknown.content, b"abc");
}

#[test_log::test]
fn round_trip() {
	let bytes = full_file();
	let file = parse(&bytes);

	assert_eq!(dump(&file), bytes);
}

#[test_log::test]
fn round_trip_decoded() {
	let bytes = full_file();
	let file = WavFile::parse(&bytes, ParseOptions::new().decode_samples(true)).unwrap();

	assert_eq!(
		file.data().unwrap().channels().unwrap(),
		[
			vec![Sample::Int(1), Sample::Int(-1)],
			vec![Sample::Int(2), Sample::Int(-2)]
		]
	);
	assert_eq!(dump(&file), bytes);
}

#[test_log::test]
fn field_order_discovered() {
	let file = parse(&full_file());
	assert_eq!(
		file.fields().to_string(),
		"INAM, IART, INFO, labl, adtl, TIT2, ID3"
	);
}

#[test_log::test]
fn write_subset_of_fields() {
	let file = parse(&full_file());

	let order = FieldOrder::from_names(["INAM", "INFO"]).unwrap();
	let mut out = Vec::new();
	file.write_to(&mut out, &order, WriteOptions::default())
		.unwrap();

	let written = parse(&out);
	let info = written.info().unwrap();
	assert_eq!(info.title(), Some("Foo title"));
	assert_eq!(info.artist(), None);
	// Unrecognized records are always written
	assert_eq!(info.unrecognized().len(), 1);

	// The adtl list had nothing left to write
	assert!(written.adtl().is_none());

	// Only the unknown frame is left in the tag
	let id3 = written.id3().unwrap();
	assert!(id3.frames().is_empty());
	assert_eq!(id3.unrecognized().len(), 1);

	assert_eq!(written.fields().to_string(), "INAM, INFO, ID3");
}

#[test_log::test]
fn properties_of_undecodable_samples() {
	let mut file = WavFile::parse(&full_file(), ParseOptions::new().decode_samples(true)).unwrap();

	let Some(Chunk::Format(fmt)) = file.chunks_mut().first_mut() else {
		panic!("expected the format chunk first");
	};
	fmt.audio_format = AudioFormat::Other(99);

	// The decoded samples have no length without a codec
	let err = file.properties().unwrap_err();
	assert!(matches!(
		err.kind(),
		ErrorKind::UnsupportedFormat { format: 99, .. }
	));

	// Raw samples are measured as-is
	let mut raw = parse(&full_file());
	let Some(Chunk::Format(fmt)) = raw.chunks_mut().first_mut() else {
		panic!("expected the format chunk first");
	};
	fmt.audio_format = AudioFormat::Other(99);
	assert!(raw.properties().unwrap().is_some());
}

#[test_log::test]
fn edit_info() {
	let mut file = parse(&full_file());

	let info = file.info_mut().unwrap();
	info.set_artist(String::from("Baz artist, the second"));
	info.insert(InfoKey::Genre, String::from("Classical"));
	file.fields_mut()
		.insert_before(FieldId::Info(InfoKey::Genre), FieldId::InfoList);

	let bytes = dump(&file);
	assert_eq!(
		u32::from_le_bytes(bytes[4..8].try_into().unwrap()) as usize,
		bytes.len() - 8
	);

	let file = parse(&bytes);
	assert!(file.warnings().is_empty());

	let info = file.info().unwrap();
	assert_eq!(info.artist(), Some("Baz artist, the second"));
	assert_eq!(info.genre(), Some("Classical"));
	assert_eq!(
		info.items().map(|(key, _)| key).collect::<Vec<_>>(),
		[InfoKey::Title, InfoKey::Artist, InfoKey::Genre]
	);
}

#[test_log::test]
fn new_info_list() {
	let mut file = parse(&riff(&[fmt(1, 1, 8000, 8), chunk(b"data", &[0x80])]));
	assert!(file.info().is_none());

	let mut info = wavchunks::chunk::InfoList::new();
	info.set_title(String::from("Foo title"));
	file.chunks_mut().push(Chunk::List(
		wavchunks::chunk::ListChunk::new(ListKind::Info(info)),
	));

	*file.fields_mut() = FieldOrder::from_names(["INAM", "INFO"]).unwrap();

	let file = parse(&dump(&file));
	assert_eq!(file.info().unwrap().title(), Some("Foo title"));
}

#[test_log::test]
fn edit_samples() {
	let mut file = WavFile::parse(&full_file(), ParseOptions::new().decode_samples(true)).unwrap();

	let channels = file.data_mut().unwrap().channels_mut().unwrap();
	channels[0][1] = Sample::Int(i64::from(i16::MIN));
	channels[1][1] = Sample::Int(i64::from(i16::MAX));

	let file = parse(&dump(&file));
	assert_eq!(
		file.data(),
		Some(&DataChunk::Raw(vec![1, 0, 2, 0, 0x00, 0x80, 0xFF, 0x7F]))
	);
}

#[test_log::test]
fn channel_length_mismatch() {
	let mut file = WavFile::parse(&full_file(), ParseOptions::new().decode_samples(true)).unwrap();
	file.data_mut().unwrap().channels_mut().unwrap()[0].push(Sample::Int(0));

	let mut out = Vec::new();
	let err = file.dump_to(&mut out, WriteOptions::default()).unwrap_err();
	assert!(matches!(
		err.kind(),
		ErrorKind::ChannelLengthMismatch {
			channel: 1,
			expected: 3,
			found: 2
		}
	));
	assert!(out.is_empty());
}

#[test_log::test]
fn cue_count_exceeds_points() {
	let mut cue = vec![2, 0, 0, 0];
	cue.extend_from_slice(&[0; 24]);
	let bytes = riff(&[chunk(b"cue ", &cue)]);

	let file = parse(&bytes);
	assert_eq!(file.cue().unwrap().points.len(), 1);
	assert!(matches!(
		file.warnings()[0].kind(),
		ErrorKind::MalformedRecord(_)
	));

	let err = WavFile::parse(&bytes, ParseOptions::new().parsing_mode(ParsingMode::Strict))
		.unwrap_err();
	assert!(matches!(err.kind(), ErrorKind::MalformedRecord(_)));
}

#[test_log::test]
fn unknown_list_type() {
	let bytes = riff(&[list(b"exif", &[chunk(b"ecor", b"Foo\0")])]);
	let file = parse(&bytes);

	let Some(Chunk::List(list)) = file.chunks().first() else {
		panic!("expected a LIST chunk");
	};
	assert_eq!(list.list_type(), *b"exif");
	assert_eq!(dump(&file), bytes);
}

#[test_log::test]
fn compact() {
	let bytes = riff(&[fmt(7, 1, 8000, 8), chunk(b"data", &[0xFF, 0x80])]);

	let mut file = parse(&bytes);
	assert!(file.compact().unwrap());

	let fmt = file.fmt().unwrap();
	assert_eq!(fmt.audio_format, AudioFormat::Pcm);
	// 0 and 125 both fit in an unsigned byte
	assert_eq!(fmt.bits_per_sample, 8);

	let written = parse(&dump(&file));
	assert_eq!(written.fmt(), Some(fmt));
	assert_eq!(written.data(), Some(&DataChunk::Raw(vec![0, 125])));

	// Only companded audio is compacted
	assert!(!file.compact().unwrap());
}

#[test_log::test]
fn compact_every_data_chunk() {
	let bytes = riff(&[
		fmt(7, 1, 8000, 8),
		chunk(b"data", &[0xFF]),
		list(b"INFO", &[chunk(b"INAM", b"Foo title\0")]),
		chunk(b"data", &[0x80]),
	]);

	let mut file = parse(&bytes);
	assert!(file.compact().unwrap());

	let written = parse(&dump(&file));
	let data = written
		.chunks()
		.iter()
		.filter_map(|chunk| match chunk {
			Chunk::Data(data) => Some(data),
			_ => None,
		})
		.collect::<Vec<_>>();
	assert_eq!(
		data,
		[&DataChunk::Raw(vec![0]), &DataChunk::Raw(vec![125])]
	);
	assert_eq!(written.info().unwrap().title(), Some("Foo title"));
}

#[test_log::test]
fn save_to_path() {
	let file = parse(&full_file());

	let dir = tempfile::tempdir().unwrap();
	let path = dir.path().join("full.wav");
	file.save_to_path(&path, WriteOptions::default()).unwrap();

	let read = WavFile::read_from_path(&path, ParseOptions::new()).unwrap();
	assert_eq!(dump(&read), full_file());
}
