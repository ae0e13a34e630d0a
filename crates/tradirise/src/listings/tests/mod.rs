pub(crate) mod common;

mod catalog;
