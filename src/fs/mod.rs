//! Filesystem semantics layered on top of [`crate::img`]'s raw container
//! parsing. Only FAT8 is implemented — this toolkit never needs to support
//! more than the one filesystem these machines used.

pub mod fat8;
