//! Geometry parameters and the known-format table used to detect which of
//! ~11 vintage disk layouts a given D88 disk actually is.

use crate::charset;
use crate::obfuscation::Scheme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharsetKind {
    Pc98,
    Pc6001,
}

impl CharsetKind {
    pub fn decode(&self, bytes: &[u8], preserve: &[u8]) -> String {
        match self {
            CharsetKind::Pc98 => charset::pc98::decode(bytes, preserve),
            CharsetKind::Pc6001 => charset::pc6001::decode(bytes, preserve),
        }
    }

    pub fn encode(&self, text: &str, strict: bool) -> Result<Vec<u8>, charset::Error> {
        match self {
            CharsetKind::Pc98 => charset::pc98::encode(text, strict),
            CharsetKind::Pc6001 => charset::pc6001::encode(text, strict),
        }
    }
}

/// Fully resolved layout parameters for one disk. Produced either by a
/// [`KnownFormat`] table match or by the raw heuristics in
/// [`super::detect`] when nothing in the table matches.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub name: String,
    pub tracks: usize,
    pub fat_tracks: usize,
    pub sides: usize,
    pub sectors_per_track: usize,
    pub sector_size: usize,
    pub charset: CharsetKind,
    pub obfuscation: Scheme,
    pub metadata_track: usize,
    pub metadata_side: usize,
    pub clusters_per_track: usize,
    pub side_is_cluster_lsb: bool,
}

impl Geometry {
    pub fn bytes_per_cluster(&self) -> usize {
        self.sector_size * (self.sectors_per_track / self.clusters_per_track)
    }

    pub fn total_clusters(&self) -> usize {
        self.tracks * self.sides * self.clusters_per_track
    }

    /// Maps a cluster number to (track, side, first virtual sector of that
    /// cluster), per spec §3's "Cluster address space".
    pub fn cluster_to_track_side_sector(&self, cluster: u8) -> (usize, usize, usize) {
        let c = cluster as usize;
        let (track, side, sub_cluster) = if self.side_is_cluster_lsb {
            let track = c / self.sides / self.clusters_per_track;
            let side = c % self.sides;
            let sub = (c / self.sides) % self.clusters_per_track;
            (track, side, sub)
        } else {
            let track = c / self.clusters_per_track / self.sides;
            let side = (c / self.clusters_per_track) % self.sides;
            let sub = c % self.clusters_per_track;
            (track, side, sub)
        };
        let first_sector = 1 + sub_cluster * (self.sectors_per_track / self.clusters_per_track);
        (track, side, first_sector)
    }

    pub fn first_metadata_cluster(&self) -> usize {
        (self.metadata_track * self.sides + self.metadata_side) * self.clusters_per_track
    }
}

/// One entry in the built-in table of known vintage layouts. `sector1_hints`
/// are boot-sector predicates used only to break ties between entries whose
/// physical (tracks, sides, sectors) all match; see [`super::detect`].
pub struct KnownFormat {
    pub name: &'static str,
    /// Vintage manual or "seen in the wild" provenance for this entry;
    /// carried over from the reference implementation's `src` field.
    pub src: &'static str,
    pub tracks: usize,
    pub sides: usize,
    pub sectors: usize,
    pub fat_tracks: usize,
    pub sector1_hints: &'static [fn(&[u8]) -> bool],
    pub charset: CharsetKind,
    pub obfuscation: Scheme,
    pub metadata_track: usize,
    pub metadata_side: usize,
    pub clusters_per_track: usize,
    pub side_is_cluster_lsb: bool,
}

fn hint_len_128(sector1: &[u8]) -> bool {
    sector1.len() == 128
}
fn hint_len_not_128(sector1: &[u8]) -> bool {
    sector1.len() != 128
}
fn hint_starts_sys(sector1: &[u8]) -> bool {
    sector1.starts_with(b"SYS")
}
fn hint_starts_ipl(sector1: &[u8]) -> bool {
    sector1.starts_with(b"IPL")
}
fn hint_starts_rxr(sector1: &[u8]) -> bool {
    sector1.starts_with(b"RXR")
}
fn hint_starts_zeros(sector1: &[u8]) -> bool {
    sector1.starts_with(&[0, 0, 0, 0])
}

/// From PC-9801UV21 BASIC User's Manual.
pub static KNOWN_FORMATS: &[KnownFormat] = &[
    KnownFormat {
        name: "PC-9800 3.5\" 2DD/5.25\" 2DD",
        src: "from PC-9801UV21 BASIC User's Manual",
        tracks: 80,
        fat_tracks: 80,
        sides: 2,
        sectors: 16,
        sector1_hints: &[],
        charset: CharsetKind::Pc98,
        obfuscation: Scheme::Pc98,
        metadata_track: 40,
        metadata_side: 0,
        clusters_per_track: 1,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-9800 8\" 2D/3.5\" 2HD/5.25\" 2HD",
        src: "from PC-9801UV21 BASIC User's Manual",
        tracks: 77,
        fat_tracks: 77,
        sides: 2,
        sectors: 26,
        sector1_hints: &[hint_len_128],
        charset: CharsetKind::Pc98,
        obfuscation: Scheme::Pc98,
        metadata_track: 35,
        metadata_side: 0,
        clusters_per_track: 1,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-9800 8\" 2D/3.5\" 2HD/5.25\" 2HD (wild type, 78 tracks)",
        src: "seen in the wild",
        tracks: 78,
        fat_tracks: 77,
        sides: 2,
        sectors: 26,
        sector1_hints: &[hint_len_128],
        charset: CharsetKind::Pc98,
        obfuscation: Scheme::Pc98,
        metadata_track: 35,
        metadata_side: 0,
        clusters_per_track: 1,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-8000/PC-8800 5.25\" 1D",
        src: "from PC-8801 mkII BASIC User's Manual, PC-8001 mkII SR N80SR-BASIC Reference Manual, PC-8001 N-BASIC Programming Textbook",
        tracks: 35,
        fat_tracks: 35,
        sides: 1,
        sectors: 16,
        sector1_hints: &[],
        charset: CharsetKind::Pc98,
        obfuscation: Scheme::Pc88,
        metadata_track: 18,
        metadata_side: 0,
        clusters_per_track: 2,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-8000/PC-8800 5.25\" 2D",
        src: "from PC-8801 mkII MR N88-BASIC / N88-Japanese BASIC Guide Book, PC-8801 mkII BASIC User's Manual, PC-8001 mkII SR N80SR-BASIC Reference Manual",
        tracks: 40,
        fat_tracks: 40,
        sides: 2,
        sectors: 16,
        sector1_hints: &[],
        charset: CharsetKind::Pc98,
        obfuscation: Scheme::Pc88,
        metadata_track: 18,
        metadata_side: 1,
        clusters_per_track: 2,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-8801 mkII 8\" 2D/5.25\" 2HD",
        src: "from PC-8801 mkII MR N88-BASIC / N88-Japanese BASIC Guide Book, PC-8801 mkII BASIC User's Manual, PC-8001 mkII SR N80SR-BASIC Reference Manual",
        tracks: 77,
        fat_tracks: 77,
        sides: 2,
        sectors: 26,
        sector1_hints: &[hint_len_not_128],
        charset: CharsetKind::Pc98,
        obfuscation: Scheme::Pc88,
        metadata_track: 35,
        metadata_side: 0,
        clusters_per_track: 1,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-6001 mkII 5.25\" 1D",
        src: "from PC 6001mkII User Manual",
        tracks: 35,
        fat_tracks: 35,
        sides: 1,
        sectors: 16,
        sector1_hints: &[hint_starts_sys],
        charset: CharsetKind::Pc6001,
        obfuscation: Scheme::None,
        metadata_track: 18,
        metadata_side: 0,
        clusters_per_track: 2,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-6001 mkII 5.25\" 1D (wild type, 36 tracks)",
        src: "seen in the wild",
        tracks: 36,
        fat_tracks: 35,
        sides: 1,
        sectors: 16,
        sector1_hints: &[hint_starts_sys],
        charset: CharsetKind::Pc6001,
        obfuscation: Scheme::None,
        metadata_track: 18,
        metadata_side: 0,
        clusters_per_track: 2,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-6601 3.5\" 1D (wild type)",
        src: "seen in the wild",
        tracks: 40,
        fat_tracks: 40,
        sides: 1,
        sectors: 16,
        sector1_hints: &[hint_starts_sys],
        charset: CharsetKind::Pc6001,
        obfuscation: Scheme::None,
        metadata_track: 18,
        metadata_side: 0,
        clusters_per_track: 2,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-6601 SR 3.5\" 1DD (wild type)",
        src: "seen in the wild",
        tracks: 80,
        fat_tracks: 80,
        sides: 1,
        sectors: 16,
        sector1_hints: &[hint_starts_ipl, hint_starts_rxr],
        charset: CharsetKind::Pc6001,
        obfuscation: Scheme::None,
        metadata_track: 37,
        metadata_side: 0,
        clusters_per_track: 2,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "PC-6601 SR 3.5\" 1DD (wild type, 81 tracks)",
        src: "seen in the wild",
        tracks: 81,
        fat_tracks: 80,
        sides: 1,
        sectors: 16,
        sector1_hints: &[hint_starts_ipl, hint_starts_rxr],
        charset: CharsetKind::Pc6001,
        obfuscation: Scheme::None,
        metadata_track: 37,
        metadata_side: 0,
        clusters_per_track: 2,
        side_is_cluster_lsb: false,
    },
    KnownFormat {
        name: "Pasopia 5.25\" 2D (wild type)",
        src: "seen in the wild",
        tracks: 40,
        fat_tracks: 40,
        sides: 2,
        sectors: 16,
        sector1_hints: &[hint_starts_zeros],
        charset: CharsetKind::Pc98,
        obfuscation: Scheme::None,
        metadata_track: 18,
        metadata_side: 0,
        clusters_per_track: 2,
        side_is_cluster_lsb: true,
    },
];

impl KnownFormat {
    pub fn matches_physical(&self, tracks: usize, sides: usize, sectors_per_track: usize) -> bool {
        self.tracks == tracks && self.sides == sides && self.sectors == sectors_per_track
    }

    pub fn hint_score(&self, sector1: &[u8]) -> usize {
        self.sector1_hints.iter().filter(|f| f(sector1)).count()
    }

    pub fn to_geometry(&self, sector_size: usize) -> Geometry {
        Geometry {
            name: self.name.to_string(),
            tracks: self.tracks,
            fat_tracks: self.fat_tracks,
            sides: self.sides,
            sectors_per_track: self.sectors,
            sector_size,
            charset: self.charset,
            obfuscation: self.obfuscation,
            metadata_track: self.metadata_track,
            metadata_side: self.metadata_side,
            clusters_per_track: self.clusters_per_track,
            side_is_cluster_lsb: self.side_is_cluster_lsb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_table_has_eleven_entries() {
        assert_eq!(KNOWN_FORMATS.len(), 11);
    }

    #[test]
    fn pc98_8inch_and_pc8801_distinguish_by_sector1_length() {
        let pc98 = &KNOWN_FORMATS[1];
        let pc88 = &KNOWN_FORMATS[5];
        assert!(pc98.matches_physical(77, 2, 26));
        assert!(pc88.matches_physical(77, 2, 26));
        let short_sector = vec![0u8; 128];
        let long_sector = vec![0u8; 256];
        assert_eq!(pc98.hint_score(&short_sector), 1);
        assert_eq!(pc88.hint_score(&short_sector), 0);
        assert_eq!(pc98.hint_score(&long_sector), 0);
        assert_eq!(pc88.hint_score(&long_sector), 1);
    }

    #[test]
    fn cluster_mapping_without_side_lsb() {
        let geo = KNOWN_FORMATS[3].to_geometry(256); // PC-8000 1D, 2 sides=1, cpt=2
        // cluster 0 -> track 0, side 0, sub 0; cluster 1 -> track 0, side 0, sub 1
        assert_eq!(geo.cluster_to_track_side_sector(0), (0, 0, 1));
        assert_eq!(geo.cluster_to_track_side_sector(1), (0, 0, 9));
        assert_eq!(geo.cluster_to_track_side_sector(2), (1, 0, 1));
    }

    #[test]
    fn cluster_mapping_with_side_lsb() {
        let geo = KNOWN_FORMATS[10].to_geometry(256); // Pasopia, side_is_cluster_lsb
        assert_eq!(geo.sides, 2);
        // cluster 0: track 0, side 0, sub 0
        assert_eq!(geo.cluster_to_track_side_sector(0), (0, 0, 1));
        // cluster 1: side = 1 % 2 = 1, track = 1/2/2 = 0, sub = (1/2) % 2 = 0
        assert_eq!(geo.cluster_to_track_side_sector(1), (0, 1, 1));
    }

    #[test]
    fn first_metadata_cluster_matches_track_side() {
        let geo = KNOWN_FORMATS[0].to_geometry(256);
        assert_eq!(geo.first_metadata_cluster(), geo.metadata_track * geo.sides + geo.metadata_side);
    }
}
