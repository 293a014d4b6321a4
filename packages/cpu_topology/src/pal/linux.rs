mod bindings;
mod filesystem;
mod platform;
mod sibling_list;

pub(crate) use bindings::*;
pub(crate) use filesystem::*;
pub(crate) use platform::*;
