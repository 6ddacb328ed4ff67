//! # `d88fat8`
//!
//! Reads D88 floppy disk images from the NEC PC-6001/6601, PC-8001/8801,
//! PC-9801, and Toshiba Pasopia lines, decodes the FAT8 filesystem inside
//! them, and extracts user files under host-safe names. Two BASIC
//! obfuscation schemes these machines used (PC-98 bit rotation, PC-88
//! position-keyed XOR) are reversed along the way, and the separate RBYTE
//! bitmap format some of these disks carry can be converted to and from
//! PNG.
//!
//! ## Architecture
//!
//! Mirrors the layering a retro disk toolkit usually needs:
//! * [`img`] decodes the D88 container into tracks and sectors, understanding
//!   nothing about what the sectors mean.
//! * [`bios::fat8`] is the raw FAT8 cell encoding, analogous to a
//!   `bios::fat` module in a toolkit that has to support several FAT
//!   variants, except there is only one cell scheme here.
//! * [`fs::fat8`] imposes filesystem semantics on top: format detection,
//!   directory parsing, chain analysis, reconstruction, and host filename
//!   generation.
//! * [`charset`] and [`obfuscation`] are shared leaf modules both `fs::fat8`
//!   and the binaries depend on.
//! * [`rbyte`] is the unrelated bitmap codec some disks' boot files use.
//! * [`commands`] holds the business logic behind each binary, kept
//!   separate from argument parsing.

pub mod bios;
pub mod charset;
pub mod commands;
pub mod fs;
pub mod img;
pub mod obfuscation;
pub mod rbyte;

/// Shorthand for a boxed error, used at the binary/command boundary where
/// container errors, filesystem errors, and I/O errors all need to flow
/// through the same `?`.
pub type DynErr = Box<dyn std::error::Error>;
pub type StdResult = Result<(), DynErr>;
