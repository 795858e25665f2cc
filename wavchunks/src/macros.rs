macro_rules! try_vec {
	($elem:expr; $size:expr) => {{ $crate::util::alloc::fallible_vec_from_element($elem, $size)? }};
}

// Returns `Err(WavError::new(ErrorKind::Variant ...))`
//
// - err!(TooMuchData)
// - err!(TextDecode("message"))
// - err!(UnsupportedFormat { format, bits_per_sample })
macro_rules! err {
	($variant:ident) => {
		return Err(crate::error::WavError::new(
			crate::error::ErrorKind::$variant,
		))
	};
	($variant:ident($reason:expr)) => {
		return Err(crate::error::WavError::new(
			crate::error::ErrorKind::$variant($reason),
		))
	};
	($variant:ident { $($field:ident $(: $value:expr)?),+ $(,)? }) => {
		return Err(crate::error::WavError::new(
			crate::error::ErrorKind::$variant { $($field $(: $value)?),+ },
		))
	};
}

// Builds a chunk-bound error, converted to `WavError`
//
// - decode_err!(Format, "message")        -> FileDecodingError for ChunkType::Format
// - decode_err!(@BAIL Format, "message")  -> same, returned as `Err`
//
// `encode_err!` is the same for `FileEncodingError`
macro_rules! decode_err {
	(@BAIL $chunk_ty:ident, $reason:literal) => {
		return Err(decode_err!($chunk_ty, $reason))
	};
	($chunk_ty:ident, $reason:literal) => {
		crate::error::WavError::from(crate::error::FileDecodingError::new(
			crate::chunk::ChunkType::$chunk_ty,
			$reason,
		))
	};
}

macro_rules! encode_err {
	(@BAIL $chunk_ty:ident, $reason:literal) => {
		return Err(encode_err!($chunk_ty, $reason))
	};
	($chunk_ty:ident, $reason:literal) => {
		crate::error::WavError::from(crate::error::FileEncodingError::new(
			crate::chunk::ChunkType::$chunk_ty,
			$reason,
		))
	};
}

// Branches on a `ParsingMode`, `STRICT` and `RELAXED` fall back to `DEFAULT` when omitted
//
// parse_mode_choice!(
// 	parse_mode,
// 	STRICT: expr,
// 	RELAXED: expr,
// 	DEFAULT: expr
// )
macro_rules! parse_mode_choice {
	(
		$parse_mode:ident,
		$(STRICT: $strict_handler:expr,)?
		$(RELAXED: $relaxed_handler:expr,)?
		DEFAULT: $default:expr
	) => {
		match $parse_mode {
			$(crate::config::ParsingMode::Strict => $strict_handler,)?
			$(crate::config::ParsingMode::Relaxed => $relaxed_handler,)?
			#[allow(unreachable_patterns)]
			_ => $default,
		}
	};
}

// Defines a closed set of record keys, each bound to its fourcc
//
// Usage:
//
// fourcc_keys! {
// 	/// Enum docs
// 	pub enum Name {
// 		/// Variant docs
// 		Variant => b"ABCD",
// 	}
// }
macro_rules! fourcc_keys {
	(
		$(#[$enum_meta:meta])*
		$vis:vis enum $name:ident {
			$($(#[$meta:meta])* $variant:ident => $fourcc:literal),+ $(,)?
		}
	) => {
		$(#[$enum_meta])*
		#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
		$vis enum $name {
			$($(#[$meta])* $variant),+
		}

		impl $name {
			/// Every key, in canonical order
			pub const ALL: &'static [$name] = &[$($name::$variant),+];

			/// The fourcc identifying the key's record
			pub fn fourcc(self) -> [u8; 4] {
				match self {
					$($name::$variant => *$fourcc),+
				}
			}

			/// Get a key from its record's fourcc
			pub fn from_fourcc(fourcc: [u8; 4]) -> Option<Self> {
				match &fourcc {
					$($fourcc => Some($name::$variant),)+
					_ => None,
				}
			}
		}

		impl std::fmt::Display for $name {
			fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
				f.write_str(&String::from_utf8_lossy(&self.fourcc()))
			}
		}
	};
}

pub(crate) use {decode_err, encode_err, err, fourcc_keys, parse_mode_choice, try_vec};
