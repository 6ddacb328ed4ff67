//! Virtual-sector bookkeeping: turns the physical sectors [`crate::img`]
//! found on a track into the fixed-size logical sectors FAT8 clusters are
//! built from. On most formats a physical sector *is* a virtual sector; on
//! a few, physical sectors are bigger than [`Geometry::sector_size`] and
//! hold several virtual sectors back to back.

use crate::img::DiskInfo;

use super::format::Geometry;

/// Concatenates every physical sector of (`track`, `side`), in ascending
/// sector-number order, into one byte string. This is the raw material
/// both the metadata-track splitter and cluster reader slice virtual
/// sectors out of.
pub fn concat_track(disk: &DiskInfo, track: u8, side: u8) -> Option<Vec<u8>> {
    let sectors = disk.sectors(track, side)?;
    let mut ordered: Vec<&crate::img::SectorRecord> = sectors.iter().collect();
    ordered.sort_by_key(|s| s.sector_number);
    let mut out = Vec::new();
    for s in ordered {
        out.extend_from_slice(&s.data);
    }
    Some(out)
}

/// Slices out virtual sector `n` (1-based, matching D88 sector numbering)
/// of (`track`, `side`), where each virtual sector is `geometry.sector_size`
/// bytes.
pub fn virtual_sector(disk: &DiskInfo, geometry: &Geometry, track: u8, side: u8, n: usize) -> Option<Vec<u8>> {
    let bytes = concat_track(disk, track, side)?;
    let start = (n - 1) * geometry.sector_size;
    let end = start + geometry.sector_size;
    if end > bytes.len() {
        return None;
    }
    Some(bytes[start..end].to_vec())
}

/// Reads every virtual sector belonging to `cluster`, concatenated in
/// order. Returns `None` if any constituent sector is missing from the
/// image (a torn or partially-dumped disk).
pub fn cluster_bytes(disk: &DiskInfo, geometry: &Geometry, cluster: u8) -> Option<Vec<u8>> {
    let (track, side, first_sector) = geometry.cluster_to_track_side_sector(cluster);
    let virtual_sectors_per_cluster = geometry.sectors_per_track / geometry.clusters_per_track;
    let mut out = Vec::with_capacity(geometry.bytes_per_cluster());
    for i in 0..virtual_sectors_per_cluster {
        let n = first_sector + i;
        out.extend(virtual_sector(disk, geometry, track as u8, side as u8, n)?);
    }
    Some(out)
}

/// Reads the first `virtual sector count` worth of bytes that make up the
/// whole metadata track (directory + FAT + optional autorun), in virtual
/// sector order.
pub fn metadata_track_bytes(disk: &DiskInfo, geometry: &Geometry) -> Option<Vec<u8>> {
    concat_track(disk, geometry.metadata_track as u8, geometry.metadata_side as u8)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::fat8::format::CharsetKind;
    use crate::obfuscation::Scheme;
    use crate::img::{SectorRecord, TrackAndSide};
    use std::collections::BTreeMap;

    fn disk_with_one_track(sector_data: Vec<Vec<u8>>) -> DiskInfo {
        let mut tracks = BTreeMap::new();
        let sectors: Vec<SectorRecord> = sector_data
            .into_iter()
            .enumerate()
            .map(|(i, data)| SectorRecord {
                sector_number: (i + 1) as u8,
                data_offset: 0,
                data,
                sectors_in_track: 1,
            })
            .collect();
        tracks.insert(TrackAndSide { track: 0, side: 0 }, sectors);
        DiskInfo {
            name_or_comment: None,
            write_protected: false,
            disk_size: 0,
            disk_suffix: String::new(),
            tracks,
        }
    }

    fn test_geometry() -> Geometry {
        Geometry {
            name: "test".into(),
            tracks: 1,
            fat_tracks: 1,
            sides: 1,
            sectors_per_track: 4,
            sector_size: 4,
            charset: CharsetKind::Pc98,
            obfuscation: Scheme::None,
            metadata_track: 0,
            metadata_side: 0,
            clusters_per_track: 2,
            side_is_cluster_lsb: false,
        }
    }

    #[test]
    fn concatenates_sectors_in_order() {
        let disk = disk_with_one_track(vec![vec![1, 1, 1, 1], vec![2, 2, 2, 2]]);
        let bytes = concat_track(&disk, 0, 0).unwrap();
        assert_eq!(bytes, vec![1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn reads_a_cluster_spanning_two_virtual_sectors() {
        let disk = disk_with_one_track(vec![vec![1; 4], vec![2; 4]]);
        let geo = test_geometry();
        // cluster 0 -> track 0, side 0, sub 0 -> first virtual sector 1
        let bytes = cluster_bytes(&disk, &geo, 0).unwrap();
        assert_eq!(bytes, vec![1, 1, 1, 1, 2, 2, 2, 2]);
    }

    #[test]
    fn missing_sector_yields_none() {
        let disk = disk_with_one_track(vec![vec![1; 4]]);
        let geo = test_geometry();
        assert!(cluster_bytes(&disk, &geo, 0).is_none());
    }
}
