#![no_main]

use std::io::Cursor;

use libfuzzer_sys::fuzz_target;
use wavchunks::config::ParseOptions;
use wavchunks::wav::WavFile;

fuzz_target!(|data: Vec<u8>| {
	let _ = WavFile::read_from(&mut Cursor::new(data), ParseOptions::new().decode_samples(true));
});
