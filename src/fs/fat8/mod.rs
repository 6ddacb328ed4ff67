//! FAT8 filesystem semantics built on top of [`crate::img`]'s container
//! parsing: detecting which vintage layout a disk uses, walking its
//! directory and FAT, and reconstructing each file's data.
//!
//! Faults below the disk level (a bad chain, a missing sector, a duplicate
//! name) never abort the whole disk — they're recorded on the offending
//! [`FileRecord`] as a [`EntryFault`] and every other entry proceeds, per
//! the error-handling design's "partial outputs are retained" rule.

pub mod chain;
pub mod detect;
pub mod directory;
pub mod format;
pub mod names;
pub mod sectors;
mod reconstruct;

use std::collections::HashSet;

use thiserror::Error;

use crate::img::DiskInfo;

use chain::{Chain, ChainFault};
use detect::DetectError;
use directory::{duplicate_raw_names, split_metadata_track, Attribute, RawEntry};
use format::Geometry;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no known FAT8 layout matches this disk's geometry")]
    FormatUnknown(#[from] DetectError),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Per-entry fault, attached to the entry's [`FileRecord`] rather than
/// aborting the disk. Mirrors spec §7's DirectoryFault/FATFault/
/// ReconstructionFault kinds.
#[derive(Debug, Clone)]
pub enum EntryFault {
    DuplicateName { other_index: usize },
    Chain(ChainFault),
    MissingSector { cluster: u8 },
    ClusterOverlap { other_index: usize, cluster: u8 },
}

/// One directory slot's full analysis: its raw fields, derived chain,
/// reconstructed data (if the chain and every sector checked out), and any
/// faults found along the way. Built in three immutable phases — directory
/// parse, chain walk, reconstruction — each handed forward to the next
/// rather than mutated in place.
#[derive(Debug, Clone)]
pub struct FileRecord {
    pub index: usize,
    pub raw_name: [u8; 6],
    pub raw_ext: [u8; 3],
    pub name: String,
    pub ext: String,
    pub attrs: HashSet<Attribute>,
    pub chain: Chain,
    pub data: Option<Vec<u8>>,
    pub host_name: String,
    pub faults: Vec<EntryFault>,
}

impl FileRecord {
    pub fn is_clean(&self) -> bool {
        self.faults.is_empty()
    }
}

/// Everything recovered from one disk: its geometry, every directory slot
/// (live, deleted, or otherwise) as a [`FileRecord`], and the raw FAT/
/// autorun bytes for the dump log.
#[derive(Debug, Clone)]
pub struct AnalyzedDisk {
    pub geometry: Geometry,
    pub entries: Vec<FileRecord>,
    pub fat: Vec<u8>,
    pub autorun: Option<Vec<u8>>,
}

/// Runs the full §4.D-§4.H pipeline on one disk.
pub fn analyze(disk: &DiskInfo) -> Result<AnalyzedDisk> {
    let geometry = detect::detect(disk)?;
    let track_bytes = sectors::metadata_track_bytes(disk, &geometry).unwrap_or_default();
    let meta = split_metadata_track(&track_bytes, geometry.sector_size, geometry.sectors_per_track);

    let dup_pairs = duplicate_raw_names(&meta.entries);

    let mut chains: Vec<(usize, Chain)> = Vec::new();
    for entry in meta.entries.iter().filter(|e| e.is_live()) {
        let c = chain::walk(&meta.fat, &geometry, entry.head_cluster);
        chains.push((entry.index, c));
    }
    let overlaps = chain::find_overlaps(&chains);
    let chain_by_index: std::collections::HashMap<usize, Chain> = chains.into_iter().collect();

    let mut used_names: HashSet<String> = HashSet::new();
    let mut entries = Vec::with_capacity(meta.entries.len());
    for raw in &meta.entries {
        entries.push(build_record(raw, &chain_by_index, disk, &geometry, &dup_pairs, &overlaps, &mut used_names));
    }

    Ok(AnalyzedDisk { geometry, entries, fat: meta.fat, autorun: meta.autorun })
}

fn build_record(
    raw: &RawEntry,
    chain_by_index: &std::collections::HashMap<usize, Chain>,
    disk: &DiskInfo,
    geometry: &Geometry,
    dup_pairs: &[(usize, usize)],
    overlaps: &[(usize, usize, u8)],
    used_names: &mut HashSet<String>,
) -> FileRecord {
    let name = geometry.charset.decode(&raw.raw_name, crate::charset::MINIMAL_CONTROLS);
    let ext = geometry.charset.decode(&raw.raw_ext, crate::charset::MINIMAL_CONTROLS);

    let mut faults = Vec::new();
    for &(a, b) in dup_pairs {
        if a == raw.index {
            faults.push(EntryFault::DuplicateName { other_index: b });
        } else if b == raw.index {
            faults.push(EntryFault::DuplicateName { other_index: a });
        }
    }
    for &(a, b, cluster) in overlaps {
        if a == raw.index {
            faults.push(EntryFault::ClusterOverlap { other_index: b, cluster });
        } else if b == raw.index {
            faults.push(EntryFault::ClusterOverlap { other_index: a, cluster });
        }
    }

    let chain = chain_by_index
        .get(&raw.index)
        .cloned()
        .unwrap_or(Chain { clusters: Vec::new(), terminator: None, fault: None });
    if let Some(f) = chain.fault {
        faults.push(EntryFault::Chain(f));
    }

    let data = if raw.is_live() && chain.is_ok() {
        match reconstruct::reconstruct(disk, geometry, &chain) {
            Ok(bytes) => Some(bytes),
            Err(reconstruct::Error::MissingSector { cluster }) => {
                faults.push(EntryFault::MissingSector { cluster });
                None
            }
        }
    } else {
        None
    };

    let candidate = names::to_host_fs_name(&name, &ext, &raw.attrs, geometry.charset);
    let host_name = names::disambiguate(&candidate, used_names);

    FileRecord {
        index: raw.index,
        raw_name: raw.raw_name,
        raw_ext: raw.raw_ext,
        name,
        ext,
        attrs: raw.attrs.clone(),
        chain,
        data,
        host_name,
        faults,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::img::{SectorRecord, TrackAndSide};
    use std::collections::BTreeMap;

    /// Builds a minimal 35-track, 1-side, 16-sector PC-8000 1D disk with one
    /// file ("HELLO.BAS", 1 cluster) on its metadata track.
    fn one_file_disk() -> DiskInfo {
        let sector_size = 256;
        let sectors_per_track = 16;
        let mut tracks = BTreeMap::new();

        for t in 0..35u8 {
            let mut sectors = Vec::new();
            for n in 1..=sectors_per_track {
                sectors.push(SectorRecord {
                    sector_number: n as u8,
                    data_offset: 0,
                    data: vec![0u8; sector_size],
                    sectors_in_track: sectors_per_track as u16,
                });
            }
            tracks.insert(TrackAndSide { track: t, side: 0 }, sectors);
        }

        // track 18 is the metadata track for this format (16 sectors/track,
        // clusters_per_track=2, sector_size 256). Per the fixed metadata
        // layout, virtual sector 1 is the first directory sector, vsector
        // 13 is autorun, and vsectors 14-16 hold the three FAT copies.
        let mut dir_sector = vec![0u8; sector_size];
        dir_sector[0..6].copy_from_slice(b"HELLO ");
        dir_sector[6..9].copy_from_slice(b"BAS");
        dir_sector[9] = 0; // attrs
        dir_sector[10] = 2; // head cluster
        // terminate the directory
        dir_sector[16] = 0xff;

        let mut fat_sector = vec![0u8; sector_size];
        fat_sector[2] = 0xfe; // cluster 2 terminal full

        let meta_sectors = tracks.get_mut(&TrackAndSide { track: 18, side: 0 }).unwrap();
        meta_sectors[0].data = dir_sector;
        meta_sectors[13].data = fat_sector; // virtual sector 14 (1-based)

        DiskInfo {
            name_or_comment: None,
            write_protected: false,
            disk_size: 0,
            disk_suffix: String::new(),
            tracks,
        }
    }

    #[test]
    fn analyzes_a_disk_with_one_clean_file() {
        let disk = one_file_disk();
        let analyzed = analyze(&disk).unwrap();
        assert_eq!(analyzed.geometry.name, "PC-8000/PC-8800 5.25\" 1D");
        assert_eq!(analyzed.entries.len(), 1);
        let entry = &analyzed.entries[0];
        assert!(entry.is_clean());
        assert_eq!(entry.host_name, "HELLO.BAS");
        assert!(entry.data.is_some());
    }
}
