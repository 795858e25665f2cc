//! Allocations bounded by [`GlobalOptions::allocation_limit`](crate::config::GlobalOptions::allocation_limit)
//!
//! Every buffer sized from a value read out of a file goes through here.

use crate::config::global_options;
use crate::error::Result;
use crate::macros::err;

fn check_limit(len: usize) -> Result<()> {
	let limit = global_options().allocation_limit;
	if len > limit {
		log::warn!("Refusing to allocate {len} element(s), the limit is {limit}");
		err!(TooMuchData);
	}

	Ok(())
}

/// `Vec::with_capacity`, but fallible and bounded by the allocation limit
pub(crate) trait VecFallibleCapacity: Sized {
	/// Named `try_with_capacity_stable` to avoid conflicts with the nightly `Vec::try_with_capacity`
	fn try_with_capacity_stable(capacity: usize) -> Result<Self>;
}

impl<T> VecFallibleCapacity for Vec<T> {
	fn try_with_capacity_stable(capacity: usize) -> Result<Self> {
		check_limit(capacity)?;

		let mut vec = Vec::new();
		vec.try_reserve_exact(capacity)?;
		Ok(vec)
	}
}

/// A `Vec` of `len` copies of `element`, see [`try_vec!`](crate::macros::try_vec)
pub(crate) fn fallible_vec_from_element<T>(element: T, len: usize) -> Result<Vec<T>>
where
	T: Clone,
{
	let mut vec = Vec::try_with_capacity_stable(len)?;
	vec.resize(len, element);
	Ok(vec)
}

/// Copy a borrowed record body into an owned buffer
pub(crate) fn copy_bytes(content: &[u8]) -> Result<Vec<u8>> {
	let mut owned = Vec::try_with_capacity_stable(content.len())?;
	owned.extend_from_slice(content);
	Ok(owned)
}
