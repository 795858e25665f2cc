pub(crate) mod alloc;
pub(crate) mod synchsafe;
pub(crate) mod text;
