//! # D88 Disk Image Module
//!
//! A D88 file is a container, not a filesystem: a small disk header
//! followed by a table of track offsets, and at each offset a run of
//! sectors, each with its own 16-byte header. Several disk images can be
//! concatenated back to back in a single `.d88` file (a "multi-disk" D88);
//! [`parse_all`] walks that outer structure and hands each inner disk's byte
//! range to [`parse_disk`].
//!
//! This module only understands the container. Making sense of what the
//! sectors mean — FAT8 clusters, directory entries, file data — is
//! [`crate::fs::fat8`]'s job; `img` hands it a [`DiskInfo`] plus a
//! track/side → sector lookup and nothing more.

use std::collections::BTreeMap;
use thiserror::Error;

const TRACK_TABLE_OFFSET: usize = 0x20;
const TRACK_ENTRY_SIZE: usize = 4;
const SECTOR_HEADER_SIZE: usize = 16;
/// Maximum number of track-table entries a D88 disk header can have.
const MAX_TRACK_ENTRIES: usize = 164;

#[derive(Error, Debug)]
pub enum Error {
    #[error("file is too small to contain a D88 disk header")]
    TooSmallForHeader,
    #[error("disk size field ({found}) exceeds the remaining file length ({available})")]
    DiskSizeTooLarge { found: usize, available: usize },
    #[error("disk size field ({0}) is too small to hold a track table")]
    DiskSizeTooSmall(usize),
    #[error("offset of the first track ({0:#x}) is not aligned to the track table entry size")]
    MisalignedFirstTrackOffset(usize),
    #[error("track table entry {index} has offset {offset:#x}, smaller than an earlier track's offset")]
    TrackOffsetOutOfOrder { index: usize, offset: usize },
    #[error("track {index} at offset {offset:#x} runs past the end of the declared disk size")]
    TrackSpillsPastEnd { index: usize, offset: usize },
    #[error("sector data at offset {offset:#x} runs past the end of the declared disk size")]
    SectorSpillsPastEnd { offset: usize },
    #[error("track {track}, side {side}, sector {sector} appears more than once")]
    DuplicateSector { track: u8, side: u8, sector: u8 },
    #[error("sectors-per-track for track {track}, side {side} changed mid-track ({first} then {second})")]
    SectorsPerTrackVaries { track: u8, side: u8, first: u16, second: u16 },
    #[error("sector data ranges overlap at offset {0:#x}")]
    OverlappingSectorData(usize),
    #[error("track table has no terminating zero/disk-size entry before running off the header")]
    TrackTableUnterminated,
}

pub type Result<T> = std::result::Result<T, Error>;

/// Identifies a physical track by cylinder number and head/side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrackAndSide {
    pub track: u8,
    pub side: u8,
}

/// One sector's header fields plus its data slice, as found in the D88
/// file. `sectors_in_track` is the header's own claim about how many
/// sectors share this track — used by `fs::fat8` to detect disks whose
/// physical sectors need virtual subdivision.
#[derive(Debug, Clone)]
pub struct SectorRecord {
    pub sector_number: u8,
    pub data_offset: usize,
    pub data: Vec<u8>,
    pub sectors_in_track: u16,
}

/// Disk-level header fields plus the fully parsed track/sector map.
#[derive(Debug, Clone)]
pub struct DiskInfo {
    pub name_or_comment: Option<Vec<u8>>,
    pub write_protected: bool,
    pub disk_size: usize,
    /// Suffix applied to output filenames when more than one disk is
    /// packed into a single D88 file (`" #Disk02"`, etc); empty for a
    /// single-disk file.
    pub disk_suffix: String,
    pub tracks: BTreeMap<TrackAndSide, Vec<SectorRecord>>,
}

impl DiskInfo {
    pub fn found_tracks(&self) -> usize {
        self.tracks.keys().map(|k| k.track as usize + 1).max().unwrap_or(0)
    }

    pub fn found_sides(&self) -> usize {
        self.tracks.keys().map(|k| k.side as usize + 1).max().unwrap_or(1)
    }

    pub fn largest_sector_size(&self) -> usize {
        self.tracks
            .values()
            .flat_map(|s| s.iter())
            .map(|s| s.data.len())
            .max()
            .unwrap_or(0)
    }

    pub fn sectors(&self, track: u8, side: u8) -> Option<&[SectorRecord]> {
        self.tracks.get(&TrackAndSide { track, side }).map(|v| v.as_slice())
    }
}

/// Parses every disk packed into a D88 file (usually just one). Each
/// element's byte range within `bytes` is determined the same way MS-DOS
/// `COPY /B a.d88+b.d88 out.d88` would produce one: concatenated whole
/// disks, each self-describing its own size via the header at its start.
pub fn parse_all(bytes: &[u8]) -> Result<Vec<DiskInfo>> {
    let mut disks = Vec::new();
    let mut offset = 0;
    let mut idx = 1;
    while offset < bytes.len() {
        let is_sole = idx == 1 && bytes.len() == disk_size_field(&bytes[offset..])?;
        let disk = parse_disk(&bytes[offset..], idx, is_sole)?;
        offset += disk.disk_size;
        disks.push(disk);
        idx += 1;
    }
    Ok(disks)
}

fn disk_size_field(bytes: &[u8]) -> Result<usize> {
    if bytes.len() < TRACK_TABLE_OFFSET + TRACK_ENTRY_SIZE {
        return Err(Error::TooSmallForHeader);
    }
    Ok(u32::from_le_bytes(bytes[0x1c..0x20].try_into().unwrap()) as usize)
}

/// Parses a single disk starting at the beginning of `bytes`. `disk_idx`
/// is the 1-based position of this disk within its D88 file, used only to
/// compute [`DiskInfo::disk_suffix`]; `is_sole_disk` suppresses that
/// suffix even when `disk_idx` is 1.
pub fn parse_disk(bytes: &[u8], disk_idx: usize, is_sole_disk: bool) -> Result<DiskInfo> {
    if bytes.len() < TRACK_TABLE_OFFSET + TRACK_ENTRY_SIZE {
        return Err(Error::TooSmallForHeader);
    }
    let name_or_comment = {
        let raw = &bytes[0..0x10];
        let trimmed = trim_trailing_nul(raw);
        if trimmed.is_empty() { None } else { Some(trimmed.to_vec()) }
    };
    let write_protected = bytes[0x1a] & 0x10 != 0;
    let disk_size = u32::from_le_bytes(bytes[0x1c..0x20].try_into().unwrap()) as usize;
    if disk_size > bytes.len() {
        return Err(Error::DiskSizeTooLarge { found: disk_size, available: bytes.len() });
    }
    if disk_size <= TRACK_TABLE_OFFSET + TRACK_ENTRY_SIZE {
        return Err(Error::DiskSizeTooSmall(disk_size));
    }

    let track_offsets = read_track_table(bytes, disk_size)?;

    let mut tracks: BTreeMap<TrackAndSide, Vec<SectorRecord>> = BTreeMap::new();
    let mut nominal_sectors_in_track: BTreeMap<TrackAndSide, u16> = BTreeMap::new();
    let mut all_ranges: Vec<(usize, usize)> = Vec::new();

    for track_offset in track_offsets {
        let mut cursor = track_offset;
        let mut key: Option<TrackAndSide> = None;
        let mut sectors = Vec::new();
        while cursor + SECTOR_HEADER_SIZE <= disk_size {
            let header = &bytes[cursor..cursor + SECTOR_HEADER_SIZE];
            let trk = header[0];
            let side = header[1];
            match &key {
                None => key = Some(TrackAndSide { track: trk, side }),
                Some(k) if k.track != trk || k.side != side => break,
                _ => {}
            }
            let sec_num = header[2];
            let sec_size_code = header[3];
            let nominal_data_size = 128usize << sec_size_code;
            let sectors_in_track = u16::from_le_bytes(header[4..6].try_into().unwrap());
            let data_offset = cursor + SECTOR_HEADER_SIZE;
            if data_offset + nominal_data_size > disk_size {
                return Err(Error::SectorSpillsPastEnd { offset: data_offset });
            }
            if sectors.iter().any(|s: &SectorRecord| s.sector_number == sec_num) {
                return Err(Error::DuplicateSector { track: trk, side, sector: sec_num });
            }
            let k = key.unwrap();
            match nominal_sectors_in_track.get(&k) {
                None => {
                    nominal_sectors_in_track.insert(k, sectors_in_track);
                }
                Some(&prev) if prev != sectors_in_track => {
                    return Err(Error::SectorsPerTrackVaries {
                        track: trk,
                        side,
                        first: prev,
                        second: sectors_in_track,
                    });
                }
                _ => {}
            }
            all_ranges.push((data_offset, data_offset + nominal_data_size));
            sectors.push(SectorRecord {
                sector_number: sec_num,
                data_offset,
                data: bytes[data_offset..data_offset + nominal_data_size].to_vec(),
                sectors_in_track,
            });
            cursor += SECTOR_HEADER_SIZE + nominal_data_size;
        }
        if let Some(k) = key {
            tracks.insert(k, sectors);
        }
    }

    all_ranges.sort_unstable();
    let mut cursor = 0usize;
    for (start, end) in all_ranges {
        if start < cursor {
            return Err(Error::OverlappingSectorData(start));
        }
        cursor = end;
    }

    let disk_suffix = if is_sole_disk {
        String::new()
    } else {
        format!(" #Disk{:02}", disk_idx)
    };

    Ok(DiskInfo { name_or_comment, write_protected, disk_size, disk_suffix, tracks })
}

fn read_track_table(bytes: &[u8], disk_size: usize) -> Result<Vec<usize>> {
    let mut offsets = Vec::new();
    for i in 0..MAX_TRACK_ENTRIES {
        let start = TRACK_TABLE_OFFSET + i * TRACK_ENTRY_SIZE;
        if start + TRACK_ENTRY_SIZE > bytes.len() {
            break;
        }
        if i > 0 {
            if let Some(&min_seen) = offsets.iter().min() {
                if start >= min_seen {
                    break;
                }
            }
        }
        let offset = u32::from_le_bytes(bytes[start..start + TRACK_ENTRY_SIZE].try_into().unwrap()) as usize;
        if i == 0 && offset != 0 && (offset - TRACK_TABLE_OFFSET) % TRACK_ENTRY_SIZE != 0 {
            return Err(Error::MisalignedFirstTrackOffset(offset));
        }
        if offset != 0 && offset != disk_size {
            if let Some(&min_seen) = offsets.iter().min() {
                if offset < min_seen {
                    return Err(Error::TrackOffsetOutOfOrder { index: i, offset });
                }
            }
            if offset + SECTOR_HEADER_SIZE >= disk_size {
                return Err(Error::TrackSpillsPastEnd { index: i, offset });
            }
            offsets.push(offset);
        } else {
            return Ok(offsets);
        }
    }
    Err(Error::TrackTableUnterminated)
}

fn trim_trailing_nul(raw: &[u8]) -> &[u8] {
    let end = raw.iter().rposition(|&b| b != 0).map(|p| p + 1).unwrap_or(0);
    &raw[..end]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_d88(tracks: &[(u8, u8, Vec<Vec<u8>>)]) -> Vec<u8> {
        let mut body = Vec::new();
        for (trk, side, sectors) in tracks {
            for (i, data) in sectors.iter().enumerate() {
                body.push(*trk);
                body.push(*side);
                body.push(i as u8);
                body.push(0); // sector size code 0 => 128 bytes nominal
                body.extend_from_slice(&(sectors.len() as u16).to_le_bytes());
                body.extend_from_slice(&[0u8; 10]);
                body.extend_from_slice(data);
            }
        }
        let header_len = TRACK_TABLE_OFFSET + MAX_TRACK_ENTRIES * TRACK_ENTRY_SIZE;
        let mut out = vec![0u8; header_len];
        out.extend_from_slice(&body);
        let disk_size = out.len() as u32;
        out[0x1c..0x20].copy_from_slice(&disk_size.to_le_bytes());
        let mut real_offsets = Vec::new();
        let mut cursor = header_len;
        for (_, _, sectors) in tracks {
            real_offsets.push(cursor);
            for data in sectors {
                cursor += SECTOR_HEADER_SIZE + data.len();
            }
        }
        for (i, off) in real_offsets.iter().enumerate() {
            let entry_start = TRACK_TABLE_OFFSET + i * TRACK_ENTRY_SIZE;
            out[entry_start..entry_start + 4].copy_from_slice(&(*off as u32).to_le_bytes());
        }
        out
    }

    #[test]
    fn parses_a_single_track_single_sector_disk() {
        let d88 = minimal_d88(&[(0, 0, vec![vec![0xaa; 128]])]);
        let disk = parse_disk(&d88, 1, true).unwrap();
        assert_eq!(disk.found_tracks(), 1);
        assert_eq!(disk.found_sides(), 1);
        let sectors = disk.sectors(0, 0).unwrap();
        assert_eq!(sectors.len(), 1);
        assert_eq!(sectors[0].data, vec![0xaa; 128]);
    }

    #[test]
    fn rejects_file_too_small_for_header() {
        let err = parse_disk(&[0u8; 4], 1, true).unwrap_err();
        assert!(matches!(err, Error::TooSmallForHeader));
    }

    #[test]
    fn rejects_disk_size_larger_than_file() {
        let mut d88 = minimal_d88(&[(0, 0, vec![vec![0; 128]])]);
        let too_big = (d88.len() as u32) + 1000;
        d88[0x1c..0x20].copy_from_slice(&too_big.to_le_bytes());
        let err = parse_disk(&d88, 1, true).unwrap_err();
        assert!(matches!(err, Error::DiskSizeTooLarge { .. }));
    }

    #[test]
    fn detects_duplicate_sector_numbers() {
        let mut d88 = minimal_d88(&[(0, 0, vec![vec![1; 128], vec![2; 128]])]);
        // force the second sector's header to claim the same sector number
        d88[TRACK_TABLE_OFFSET + MAX_TRACK_ENTRIES * TRACK_ENTRY_SIZE + SECTOR_HEADER_SIZE + 128 + 2] = 0;
        let err = parse_disk(&d88, 1, true).unwrap_err();
        assert!(matches!(err, Error::DuplicateSector { .. }));
    }

    #[test]
    fn multi_track_multi_side_round_trip() {
        let d88 = minimal_d88(&[
            (0, 0, vec![vec![1; 128], vec![2; 128]]),
            (0, 1, vec![vec![3; 128]]),
            (1, 0, vec![vec![4; 128]]),
        ]);
        let disk = parse_disk(&d88, 1, true).unwrap();
        assert_eq!(disk.found_tracks(), 2);
        assert_eq!(disk.found_sides(), 2);
        assert_eq!(disk.sectors(0, 0).unwrap().len(), 2);
        assert_eq!(disk.sectors(0, 1).unwrap()[0].data, vec![3; 128]);
    }
}
