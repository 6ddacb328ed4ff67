//! `fat8_d88_tool` business logic: unpack every disk in one or more D88
//! files into a sibling `<name> [FAT8 Contents]` directory holding the
//! boot sector, directory/FAT sectors, autorun sector, every reconstructed
//! user file, and a text analysis log. Spec §6/§7.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use crate::fs::fat8::{self, directory, sectors, AnalyzedDisk, EntryFault, FileRecord};
use crate::img::{self, DiskInfo};
use crate::obfuscation::Scheme;

use super::CommandError;

/// Runs the tool over every input path in turn. A single malformed input
/// file is logged and skipped rather than aborting the whole batch, since
/// each `.d88` argument is an independent unit of work.
pub fn run(paths: &[PathBuf]) -> crate::StdResult {
    for path in paths {
        if let Err(e) = process_file(path) {
            log::error!("{path:?}: {e}");
        }
    }
    Ok(())
}

fn process_file(path: &Path) -> crate::StdResult {
    let bytes = std::fs::read(path).map_err(|source| CommandError::Io { path: path.to_path_buf(), source })?;
    let disks = img::parse_all(&bytes)?;
    for disk in &disks {
        process_disk(path, disk)?;
    }
    Ok(())
}

fn process_disk(path: &Path, disk: &DiskInfo) -> crate::StdResult {
    let out_dir = unique_sibling_dir(path, &disk.disk_suffix);
    std::fs::create_dir_all(&out_dir)?;

    let log = match fat8::analyze(disk) {
        Ok(analyzed) => {
            let log = build_log(path, &disk.disk_suffix, &analyzed);
            write_disk_contents(&out_dir, disk, &analyzed)?;
            log
        }
        Err(fat8::Error::FormatUnknown(_)) => {
            log::warn!("{path:?}{}: no known FAT8 layout matches this disk; emitting a diagnostic log only", disk.disk_suffix);
            build_unknown_format_log(path, disk)
        }
    };
    println!("{log}");
    std::fs::write(out_dir.join("_fat8_d88_output.txt"), &log)?;
    Ok(())
}

/// Picks `<basename> [FAT8 Contents]`, or that name with a ` (N)` suffix if
/// it's already taken by output from an earlier run or an earlier disk in
/// a multi-disk image.
fn unique_sibling_dir(path: &Path, disk_suffix: &str) -> PathBuf {
    let parent = path.parent().unwrap_or_else(|| Path::new("."));
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or("disk");
    let base = format!("{stem}{disk_suffix} [FAT8 Contents]");
    let mut candidate = parent.join(&base);
    let mut n = 2;
    while candidate.exists() {
        candidate = parent.join(format!("{base} ({n})"));
        n += 1;
    }
    candidate
}

fn build_unknown_format_log(path: &Path, disk: &DiskInfo) -> String {
    let mut log = String::new();
    let _ = writeln!(log, "=== {:?}{} ===", path, disk.disk_suffix);
    let _ = writeln!(log, "format: <unknown>");
    let _ = writeln!(
        log,
        "tracks found={} sides found={} largest sector={}",
        disk.found_tracks(),
        disk.found_sides(),
        disk.largest_sector_size()
    );
    let _ = writeln!(log, "no entry in the known-format table matches this disk's physical geometry; skipping directory/FAT/file extraction.");
    log
}

fn build_log(path: &Path, disk_suffix: &str, analyzed: &AnalyzedDisk) -> String {
    let geometry = &analyzed.geometry;
    let mut log = String::new();
    let _ = writeln!(log, "=== {:?}{} ===", path, disk_suffix);
    let _ = writeln!(log, "format: {}", geometry.name);
    let _ = writeln!(log, "source: {}", geometry.name);
    let _ = writeln!(
        log,
        "tracks={} sides={} sectors/track={} sector_size={} clusters/track={}",
        geometry.tracks, geometry.sides, geometry.sectors_per_track, geometry.sector_size, geometry.clusters_per_track
    );
    let _ = writeln!(log, "metadata track={} side={}", geometry.metadata_track, geometry.metadata_side);
    let _ = writeln!(log, "obfuscation: {:?}", geometry.obfuscation);
    let _ = writeln!(log);
    let _ = writeln!(log, "-- directory ({} slots) --", analyzed.entries.len());
    for entry in &analyzed.entries {
        let size = entry.data.as_ref().map(|d| d.len()).unwrap_or(0);
        let _ = writeln!(
            log,
            "[{:3}] {:<24} attrs={:?} clusters={} size={} faults={}",
            entry.index,
            entry.host_name,
            sorted_attrs(entry),
            entry.chain.clusters.len(),
            size,
            entry.faults.len()
        );
        for fault in &entry.faults {
            let _ = writeln!(log, "        ! {}", describe_fault(fault));
        }
    }
    let _ = writeln!(log);
    let _ = writeln!(log, "-- FAT ({} bytes) --", analyzed.fat.len());
    let _ = writeln!(log, "autorun present: {}", analyzed.autorun.is_some());
    log
}

fn sorted_attrs(entry: &FileRecord) -> Vec<String> {
    let mut names: Vec<String> = entry.attrs.iter().map(|a| format!("{a:?}")).collect();
    names.sort();
    names
}

fn describe_fault(fault: &EntryFault) -> String {
    match fault {
        EntryFault::DuplicateName { other_index } => format!("duplicate name, also slot {other_index}"),
        EntryFault::Chain(c) => format!("chain fault: {c:?}"),
        EntryFault::MissingSector { cluster } => format!("cluster {cluster} has no corresponding sector in the image"),
        EntryFault::ClusterOverlap { other_index, cluster } => {
            format!("cluster {cluster} also claimed by slot {other_index}")
        }
    }
}

fn write_disk_contents(out_dir: &Path, disk: &DiskInfo, analyzed: &AnalyzedDisk) -> std::io::Result<()> {
    let geometry = &analyzed.geometry;

    if let Some(boot) = sectors::virtual_sector(disk, geometry, 0, 0, 1) {
        write_with_dump(out_dir, "_boot_sector", "dat", &boot, geometry)?;
    }

    // Fixed metadata-track layout (spec §3/§4.E): directory occupies
    // virtual sectors 1..sectors_per_track-4, autorun sits at
    // sectors_per_track-3, and the three FAT copies fill the rest.
    let dir_sectors = geometry.sectors_per_track.saturating_sub(4);

    for n in 1..=dir_sectors {
        if let Some(sector) = sectors::virtual_sector(disk, geometry, geometry.metadata_track as u8, geometry.metadata_side as u8, n) {
            write_with_dump(out_dir, &format!("_dir_sector_{n}"), "dat", &sector, geometry)?;
        }
    }
    write_with_dump(out_dir, "_fat_sector_1", "dat", &analyzed.fat, geometry)?;
    if let Some(autorun) = &analyzed.autorun {
        write_with_dump(out_dir, "_AutoRun", "dat", autorun, geometry)?;
    }

    for entry in &analyzed.entries {
        let Some(data) = &entry.data else { continue };
        std::fs::write(out_dir.join(&entry.host_name), data)?;
        if entry.attrs.contains(&directory::Attribute::Obfuscated) && geometry.obfuscation != Scheme::None {
            let plain = geometry.obfuscation.deobfuscate(data);
            let deob_name = format!("{}.deobfuscated", entry.host_name);
            std::fs::write(out_dir.join(deob_name), plain)?;
        }
    }
    Ok(())
}

fn write_with_dump(out_dir: &Path, stem: &str, ext: &str, bytes: &[u8], geometry: &crate::fs::fat8::format::Geometry) -> std::io::Result<()> {
    std::fs::write(out_dir.join(format!("{stem}.{ext}")), bytes)?;
    let text = geometry.charset.decode(bytes, crate::charset::ASCII_CONTROLS);
    std::fs::write(out_dir.join(format!("{stem}_{ext}_utf8_dump.txt")), text)?;
    Ok(())
}
