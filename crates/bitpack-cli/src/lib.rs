//! `bitpack-cli`: command-line front end for the `bitpack` codec.
//!
//! The binaries in `src/bin` are thin wrappers over [`cli`].

pub mod cli;
