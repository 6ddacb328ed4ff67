//! End-to-end run of `fat8_d88_tool` against a synthetic PC-8000/PC-8800
//! 5.25" 1D image (35 tracks, 1 side, 16 sectors of 256 bytes, metadata on
//! track 18) holding a single clean file, mirroring the disk built by
//! `d88fat8::fs::fat8`'s own unit test but serialized as real D88 bytes.

use assert_cmd::prelude::*;
use std::process::Command;

type StdResult = Result<(), Box<dyn std::error::Error>>;

const SECTOR_SIZE: usize = 256;
const SECTORS_PER_TRACK: u16 = 16;
const TRACKS: u8 = 35;

fn build_d88() -> Vec<u8> {
    let track_count = TRACKS as usize;
    let track_table_entries = track_count + 1; // trailing zero terminator
    let track_table_len = track_table_entries * 4;
    let header_len = 0x20 + track_table_len;
    let track_len = SECTORS_PER_TRACK as usize * (16 + SECTOR_SIZE);
    let disk_size = header_len + track_count * track_len;

    let mut bytes = vec![0u8; disk_size];

    // Per-track sector data, filled in after the loop below for the
    // metadata track.
    let mut track_sector_data: Vec<Vec<Vec<u8>>> =
        (0..track_count).map(|_| vec![vec![0u8; SECTOR_SIZE]; SECTORS_PER_TRACK as usize]).collect();

    // Track 18 (0-indexed) is the metadata track: virtual sector 1 holds
    // the directory, virtual sector 13 the autorun data, and virtual
    // sectors 14-16 the three FAT copies (sectors_per_track=16, so FAT
    // copies sit at 16-2, 16-1, 16-0 and autorun at 16-3). clusters_per_track=2
    // on this format, so cluster 2 (track 1) is the file's one-cluster body.
    let dir = &mut track_sector_data[18][0];
    dir[0..6].copy_from_slice(b"HELLO ");
    dir[6..9].copy_from_slice(b"BAS");
    dir[9] = 0; // attrs
    dir[10] = 2; // head cluster
    dir[16] = 0xff; // terminate the directory after this one entry

    let fat = &mut track_sector_data[18][13]; // virtual sector 14 (1-based)
    fat[2] = 0xfe; // cluster 2: terminal, full

    // Cluster 2 lives on track 1, side 0, virtual sectors 1-8
    // (clusters_per_track=2, 16 sectors/track => 8 virtual sectors/cluster;
    // cluster 2 is track 1's first cluster, since global cluster numbers
    // run track*clusters_per_track + sub_cluster).
    for sector in track_sector_data[1][0..8].iter_mut() {
        sector.fill(b'A');
    }

    // -- disk header --
    bytes[0x1a] = 0x00;
    bytes[0x1c..0x20].copy_from_slice(&(disk_size as u32).to_le_bytes());

    // -- track table + track/sector bodies --
    let mut cursor = header_len;
    for t in 0..track_count {
        bytes[0x20 + t * 4..0x20 + t * 4 + 4].copy_from_slice(&(cursor as u32).to_le_bytes());
        for (i, data) in track_sector_data[t].iter().enumerate() {
            let sector_number = (i + 1) as u8;
            bytes[cursor] = t as u8; // track
            bytes[cursor + 1] = 0; // side
            bytes[cursor + 2] = sector_number;
            bytes[cursor + 3] = 1; // size code: 128 << 1 = 256
            bytes[cursor + 4..cursor + 6].copy_from_slice(&SECTORS_PER_TRACK.to_le_bytes());
            cursor += 16;
            bytes[cursor..cursor + SECTOR_SIZE].copy_from_slice(data);
            cursor += SECTOR_SIZE;
        }
    }
    // trailing zero track-table entry is already zero from the initial fill.

    bytes
}

#[test]
fn extracts_a_clean_file_from_a_synthetic_disk() -> StdResult {
    let dir = tempfile::tempdir()?;
    let d88_path = dir.path().join("hello.d88");
    std::fs::write(&d88_path, build_d88())?;

    let mut cmd = Command::cargo_bin("fat8_d88_tool")?;
    cmd.arg(&d88_path).assert().success();

    let out_dir = dir.path().join("hello [FAT8 Contents]");
    assert!(out_dir.is_dir());
    assert!(out_dir.join("_fat8_d88_output.txt").exists());
    assert!(out_dir.join("HELLO.BAS").exists());
    assert_eq!(std::fs::read(out_dir.join("HELLO.BAS"))?, vec![b'A'; 8 * SECTOR_SIZE]);
    Ok(())
}
