//! Turning a validated cluster chain into the file's actual byte content.
//! Spec §4.G.

use thiserror::Error;

use crate::bios::fat8::Cell;
use crate::img::DiskInfo;

use super::chain::Chain;
use super::format::Geometry;
use super::sectors;

#[derive(Error, Debug)]
pub enum Error {
    #[error("cluster {cluster} referenced by this file's chain has no corresponding sector in the image")]
    MissingSector { cluster: u8 },
}

/// Concatenates every cluster in `chain`, truncating the final cluster to
/// the virtual-sector count its terminal code claims, then strips a
/// trailing `NUL*, 0x1A` EOF marker if one is present.
pub fn reconstruct(disk: &DiskInfo, geometry: &Geometry, chain: &Chain) -> Result<Vec<u8>, Error> {
    let mut out = Vec::new();
    let last_index = chain.clusters.len().saturating_sub(1);
    for (i, &cluster) in chain.clusters.iter().enumerate() {
        let bytes = sectors::cluster_bytes(disk, geometry, cluster)
            .ok_or(Error::MissingSector { cluster })?;
        if i == last_index {
            if let Some(Cell::TerminalPartial { sectors: n }) = chain.terminator {
                let keep = (geometry.sector_size * n as usize).min(bytes.len());
                out.extend_from_slice(&bytes[..keep]);
                continue;
            }
        }
        out.extend_from_slice(&bytes);
    }
    Ok(strip_eof_marker(out, geometry.sector_size))
}

/// Strips a trailing `0x1A` end-of-file marker and the `NUL` padding after
/// it, but only within the final virtual sector of the final cluster — a
/// `...0x1A, 0x00...` run earlier in the file is ordinary data and is left
/// alone. Within that final sector, `NUL` bytes with no following `0x1A`
/// are also left in place; some BASIC programs keep embedded NULs that
/// aren't padding.
fn strip_eof_marker(bytes: Vec<u8>, sector_size: usize) -> Vec<u8> {
    if sector_size == 0 || bytes.len() < sector_size {
        return strip_eof_marker_from_sector(&bytes);
    }
    let split_at = bytes.len() - sector_size;
    let mut out = bytes[..split_at].to_vec();
    out.extend_from_slice(&strip_eof_marker_from_sector(&bytes[split_at..]));
    out
}

fn strip_eof_marker_from_sector(sector: &[u8]) -> Vec<u8> {
    let trimmed_len = sector.iter().rposition(|&b| b != 0).map_or(0, |p| p + 1);
    if trimmed_len > 0 && sector[trimmed_len - 1] == 0x1a {
        sector[..trimmed_len - 1].to_vec()
    } else {
        sector.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::fat8::chain::walk;
    use crate::fs::fat8::format::CharsetKind;
    use crate::img::{SectorRecord, TrackAndSide};
    use crate::obfuscation::Scheme;
    use std::collections::BTreeMap;

    fn geo() -> Geometry {
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

    fn disk(sector_data: Vec<Vec<u8>>) -> DiskInfo {
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

    #[test]
    fn reconstructs_full_cluster() {
        let d = disk(vec![vec![b'A'; 4], vec![b'B'; 4]]);
        let g = geo();
        let mut fat = [0xffu8; 32];
        fat[0] = 0xfe;
        let chain = walk(&fat, &g, 0);
        let data = reconstruct(&d, &g, &chain).unwrap();
        assert_eq!(data, b"AAAABBBB");
    }

    #[test]
    fn truncates_final_partial_cluster() {
        let d = disk(vec![vec![b'A'; 4], vec![b'B'; 4]]);
        let g = geo();
        let mut fat = [0xffu8; 32];
        fat[0] = 0xc1; // terminal, 1 virtual sector of this 2-sector cluster
        let chain = walk(&fat, &g, 0);
        let data = reconstruct(&d, &g, &chain).unwrap();
        assert_eq!(data, b"AAAA");
    }

    #[test]
    fn strips_trailing_nul_and_eof_marker() {
        let bytes = vec![b'h', b'i', 0x1a, 0, 0, 0];
        assert_eq!(strip_eof_marker(bytes.clone(), bytes.len()), vec![b'h', b'i']);
    }

    #[test]
    fn leaves_nuls_without_eof_marker_untouched() {
        let bytes = vec![b'h', b'i', 0, 0];
        assert_eq!(strip_eof_marker(bytes.clone(), bytes.len()), bytes);
    }

    #[test]
    fn does_not_strip_an_eof_marker_outside_the_final_sector() {
        // First (non-final) 4-byte sector ends in what looks like an EOF
        // marker; the final sector has none. Only the final sector is
        // examined, so nothing here is touched.
        let bytes = vec![b'A', b'A', 0x1a, 0, b'B', b'B', b'B', b'B'];
        assert_eq!(strip_eof_marker(bytes.clone(), 4), bytes);
    }

    #[test]
    fn missing_sector_is_reported() {
        let d = disk(vec![vec![b'A'; 4]]); // only one sector; cluster needs two
        let g = geo();
        let mut fat = [0xffu8; 32];
        fat[0] = 0xfe;
        let chain = walk(&fat, &g, 0);
        let err = reconstruct(&d, &g, &chain).unwrap_err();
        assert!(matches!(err, Error::MissingSector { cluster: 0 }));
    }
}
