pub mod handler;
pub mod tag;

// vim: ts=4
