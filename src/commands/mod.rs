//! Business logic behind each of the five binaries, kept separate from
//! argument parsing the way the reference toolkit's `commands` module is,
//! even though none of these commands takes subcommands of its own.

pub mod decode;
pub mod encode;
pub mod extract;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{path:?}: {source}")]
    Io { path: std::path::PathBuf, #[source] source: std::io::Error },
    #[error("{path:?}: not a recognized PNG image: {source}")]
    Image { path: std::path::PathBuf, #[source] source: png::DecodingError },
    #[error("{path:?}: {source}")]
    Rbyte { path: std::path::PathBuf, #[source] source: crate::rbyte::Error },
}

pub type Result<T> = std::result::Result<T, CommandError>;
