use std::cell::Cell;

thread_local! {
	static GLOBAL_OPTIONS: Cell<GlobalOptions> = const { Cell::new(GlobalOptions::new()) };
}

pub(crate) fn global_options() -> GlobalOptions {
	GLOBAL_OPTIONS.get()
}

/// Thread-wide limits, applied with [`apply_global_options`]
///
/// Unlike [`ParseOptions`](super::ParseOptions), these are not passed to each call. They apply to
/// every read and write made on the current thread.
///
/// # Examples
///
/// ```rust
/// use wavchunks::config::{GlobalOptions, apply_global_options};
///
/// // Refuse any chunk over 64 MiB
/// apply_global_options(GlobalOptions::new().allocation_limit(64 * 1024 * 1024));
/// ```
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[non_exhaustive]
pub struct GlobalOptions {
	pub(crate) allocation_limit: usize,
}

impl GlobalOptions {
	/// The largest buffer allocated for a single chunk or record by default, 1 GiB
	pub const DEFAULT_ALLOCATION_LIMIT: usize = 1 << 30;

	/// Same as [`GlobalOptions::default`]
	#[must_use]
	pub const fn new() -> Self {
		Self {
			allocation_limit: Self::DEFAULT_ALLOCATION_LIMIT,
		}
	}

	/// The largest buffer to allocate for a single chunk, record, or sample buffer
	///
	/// Anything larger fails with [`ErrorKind::TooMuchData`](crate::error::ErrorKind::TooMuchData).
	pub fn allocation_limit(&mut self, allocation_limit: usize) -> Self {
		self.allocation_limit = allocation_limit;
		*self
	}
}

impl Default for GlobalOptions {
	fn default() -> Self {
		Self::new()
	}
}

/// Replace the [`GlobalOptions`] of the current thread
pub fn apply_global_options(options: GlobalOptions) {
	GLOBAL_OPTIONS.set(options);
}
