use crate::util::{chunk, dump, id3v24, parse, riff};

use wavchunks::TextEncoding;
use wavchunks::chunk::{Chunk, Id3Frame, Id3FrameKey};
use wavchunks::config::{ParseOptions, ParsingMode, WriteOptions};
use wavchunks::wav::{FieldId, FieldOrder, WavFile};

#[test_log::test]
fn frame_size_excludes_flags() {
	let bytes = riff(&[chunk(b"ID3 ", &id3v24(&[(b"TIT2", b"\x03Song")], 0))]);
	let file = parse(&bytes);

	let frame = file.id3().unwrap().get(Id3FrameKey::Title).unwrap();
	// A declared size of 5, plus the 2 flag bytes
	assert_eq!(frame.payload.len(), 7);
	assert_eq!(frame.body(), b"\x03Song");
	assert_eq!(frame.text().unwrap(), "Song");

	assert_eq!(dump(&file), bytes);
}

#[test_log::test]
fn lowercase_chunk_id() {
	let bytes = riff(&[chunk(b"id3 ", &id3v24(&[(b"TPE1", b"\x00Foo")], 2))]);
	let file = parse(&bytes);

	assert_eq!(file.chunks()[0].fourcc(), *b"id3 ");
	assert_eq!(file.id3().unwrap().padding_len(), 2);
	assert_eq!(dump(&file), bytes);
}

#[test_log::test]
fn opaque_tags() {
	// ID3v2.2
	let mut v22 = id3v24(&[], 0);
	v22[3] = 2;
	// Unsynchronisation
	let mut unsynchronised = id3v24(&[(b"TIT2", b"\x03Song")], 0);
	unsynchronised[5] = 0x80;

	for tag in [v22, unsynchronised, b"not a tag".to_vec()] {
		let bytes = riff(&[chunk(b"ID3 ", &tag)]);
		let file = parse(&bytes);

		let Chunk::Id3(id3) = &file.chunks()[0] else {
			panic!("expected an ID3 chunk");
		};
		assert!(id3.tag.is_none());
		assert_eq!(id3.trailing, tag);
		assert_eq!(dump(&file), bytes);
	}
}

#[test_log::test]
fn truncated_frame() {
	let mut tag = id3v24(&[(b"TIT2", b"\x03Song")], 0);
	// Claim more than the tag holds
	tag[17] = 0x20;
	let bytes = riff(&[chunk(b"ID3 ", &tag)]);

	let file = parse(&bytes);
	assert!(file.id3().is_none());
	assert!(matches!(file.chunks()[0], Chunk::Unrecognized(_)));
	assert_eq!(file.warnings().len(), 1);
	assert_eq!(dump(&file), bytes);

	assert!(
		WavFile::parse(&bytes, ParseOptions::new().parsing_mode(ParsingMode::Strict)).is_err()
	);
}

#[test_log::test]
fn add_frame() {
	let bytes = riff(&[chunk(b"ID3 ", &id3v24(&[(b"TIT2", b"\x03Song")], 0))]);
	let mut file = parse(&bytes);

	let tag = file.id3_mut().unwrap();
	tag.insert(Id3Frame::new_text(
		Id3FrameKey::Comment,
		TextEncoding::UTF8,
		"Foo comment",
	));
	file.fields_mut()
		.insert_before(FieldId::Id3(Id3FrameKey::Comment), FieldId::Id3Tag);

	let file = parse(&dump(&file));
	let tag = file.id3().unwrap();
	assert_eq!(tag.frames().len(), 2);
	assert_eq!(
		tag.get(Id3FrameKey::Comment).unwrap().text().unwrap(),
		"Foo comment"
	);
}

#[test_log::test]
fn frame_order() {
	let frames: [(&[u8; 4], &[u8]); 2] = [(b"TPE1", b"\x03Foo"), (b"TIT2", b"\x03Song")];
	let bytes = riff(&[chunk(b"ID3 ", &id3v24(&frames, 0))]);
	let file = parse(&bytes);

	// Frames keep their stored order
	assert_eq!(dump(&file), bytes);

	// Unless an order is requested
	let order = FieldOrder::from_names(["TIT2", "TPE1", "ID3"]).unwrap();
	let mut out = Vec::new();
	file.write_to(&mut out, &order, WriteOptions::default())
		.unwrap();
	assert_eq!(
		out,
		riff(&[chunk(b"ID3 ", &id3v24(&[frames[1], frames[0]], 0))])
	);
}
