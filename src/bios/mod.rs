//! Low-level, hardware-adjacent logic shared by more than one filesystem
//! concern. For this toolkit that's just the FAT8 cell scheme.

pub mod fat8;
