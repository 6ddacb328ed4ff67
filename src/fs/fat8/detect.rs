//! Format detection: matching a disk's physical geometry (and, when more
//! than one table entry shares that geometry, its boot sector) against
//! [`super::format::KNOWN_FORMATS`]. Spec §4.D.

use crate::img::DiskInfo;

use super::format::{Geometry, KnownFormat, KNOWN_FORMATS};

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectError {
    /// No table entry's (tracks, sides, sectors/track) matches this disk.
    #[error("no known FAT8 layout matches this disk's physical geometry")]
    NoPhysicalMatch,
}

/// Picks the best [`KnownFormat`] for `disk`: first narrows to entries
/// whose physical geometry matches exactly, then (if more than one
/// remains) ranks by how many of its `sector1_hints` the disk's first
/// sector of track 0 satisfies, breaking ties by table order.
pub fn detect(disk: &DiskInfo) -> Result<Geometry, DetectError> {
    let tracks = disk.found_tracks();
    let sides = disk.found_sides();
    let physical_sectors_per_track = disk
        .sectors(0, 0)
        .map(|s| s.len())
        .unwrap_or(0);
    let physical_sector_size = disk.largest_sector_size();
    let (sector_size, sectors_per_track) = virtual_shift(physical_sector_size, physical_sectors_per_track);

    let candidates: Vec<&KnownFormat> = KNOWN_FORMATS
        .iter()
        .filter(|f| f.matches_physical(tracks, sides, sectors_per_track))
        .collect();

    if candidates.is_empty() {
        return Err(DetectError::NoPhysicalMatch);
    }
    if candidates.len() == 1 {
        return Ok(candidates[0].to_geometry(sector_size));
    }

    let sector1 = disk
        .sectors(0, 0)
        .and_then(|s| s.first())
        .map(|s| s.data.as_slice())
        .unwrap_or(&[]);

    let best = candidates
        .iter()
        .enumerate()
        .max_by_key(|(table_index, f)| (f.hint_score(sector1), std::cmp::Reverse(*table_index)))
        .map(|(_, f)| *f)
        .expect("candidates is non-empty");

    Ok(best.to_geometry(sector_size))
}

/// Spec §3's "virtual sector" rule: a physical sector bigger than 256 bytes
/// on a track with fewer than 16 sectors is repeatedly split in two until
/// neither condition holds, so the known-format table (which only lists
/// virtual sector counts) and everything downstream always sees sectors of
/// at most 256 bytes.
fn virtual_shift(mut sector_size: usize, mut sectors_per_track: usize) -> (usize, usize) {
    while sector_size > 0x100 && sectors_per_track < 16 {
        sector_size >>= 1;
        sectors_per_track <<= 1;
    }
    (sector_size, sectors_per_track)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::img::{SectorRecord, TrackAndSide};
    use std::collections::BTreeMap;

    fn disk_with_geometry(tracks: u8, sides: u8, sectors_per_track: usize, sector_size: usize, sector1: Vec<u8>) -> DiskInfo {
        let mut map = BTreeMap::new();
        for t in 0..tracks {
            for s in 0..sides {
                let mut sectors = Vec::new();
                for n in 0..sectors_per_track {
                    let data = if t == 0 && s == 0 && n == 0 {
                        sector1.clone()
                    } else {
                        vec![0u8; sector_size]
                    };
                    sectors.push(SectorRecord {
                        sector_number: (n + 1) as u8,
                        data_offset: 0,
                        data,
                        sectors_in_track: sectors_per_track as u16,
                    });
                }
                map.insert(TrackAndSide { track: t, side: s }, sectors);
            }
        }
        DiskInfo {
            name_or_comment: None,
            write_protected: false,
            disk_size: 0,
            disk_suffix: String::new(),
            tracks: map,
        }
    }

    #[test]
    fn unambiguous_geometry_matches_directly() {
        let disk = disk_with_geometry(35, 1, 16, 256, vec![0u8; 256]);
        let geo = detect(&disk).unwrap();
        assert_eq!(geo.name, "PC-8000/PC-8800 5.25\" 1D");
    }

    #[test]
    fn ambiguous_geometry_breaks_tie_with_sector1_hint() {
        let sector1 = vec![0u8; 128];
        let disk = disk_with_geometry(77, 2, 26, 128, sector1);
        let geo = detect(&disk).unwrap();
        assert_eq!(geo.name, "PC-9800 8\" 2D/3.5\" 2HD/5.25\" 2HD");
    }

    #[test]
    fn unknown_geometry_is_reported() {
        let disk = disk_with_geometry(12, 1, 3, 256, vec![0u8; 256]);
        assert_eq!(detect(&disk), Err(DetectError::NoPhysicalMatch));
    }

    #[test]
    fn oversized_physical_sectors_are_virtually_shifted_before_matching() {
        // 8 physical sectors of 512 bytes/track normalizes to 16 virtual
        // sectors of 256 bytes, matching the same table entry as a disk
        // dumped with the sectors already split.
        let disk = disk_with_geometry(35, 1, 8, 512, vec![0u8; 512]);
        let geo = detect(&disk).unwrap();
        assert_eq!(geo.name, "PC-8000/PC-8800 5.25\" 1D");
        assert_eq!(geo.sector_size, 256);
        assert_eq!(geo.sectors_per_track, 16);
    }

    #[test]
    fn virtual_shift_halves_until_sector_size_or_count_threshold() {
        assert_eq!(virtual_shift(512, 8), (256, 16));
        assert_eq!(virtual_shift(1024, 4), (256, 16));
        assert_eq!(virtual_shift(256, 16), (256, 16));
        assert_eq!(virtual_shift(128, 26), (128, 26));
    }
}
