#![forbid(unsafe_code)]
//! Arbor — a directory tree printer built on descriptor-relative traversal.

pub mod cli;
pub mod render;
pub mod tree;
