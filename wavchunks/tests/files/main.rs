#![allow(missing_docs)]

mod id3;
mod list;
pub(crate) mod util;
mod wav;
