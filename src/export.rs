//! End-to-end export of a waypoint file
//!
//! All artifacts are derived in memory first; nothing touches the output
//! directory until the input has been fully decoded. Each file is then written
//! to a temporary sibling and renamed into place.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::{
    commands::{build_commands, render_commands},
    config::Config,
    container::{self, ContainerFormat},
    generic::to_generic,
    nbt::decode,
    records::{extract_records, to_csv},
    utils::format_size,
};

pub const JSON_FILE: &str = "waypoints.json";
pub const CSV_FILE: &str = "waypoints.csv";
pub const COMMANDS_FILE: &str = "create_waypoints.txt";

/// Everything produced from one input, not yet written anywhere
#[derive(Debug, Clone)]
pub struct Artifacts {
    pub format: ContainerFormat,
    pub decompressed_size: usize,
    pub root_name: String,
    pub top_level_keys: Vec<String>,
    pub json: String,
    /// `None` when no waypoint rows were found
    pub csv: Option<String>,
    pub commands: String,
    pub record_count: usize,
    pub command_count: usize,
    pub group_count: usize,
}

/// Result of [`dump_waypoints`]
#[derive(Debug, Clone)]
pub struct ExportSummary {
    pub format: ContainerFormat,
    pub record_count: usize,
    pub command_count: usize,
    pub group_count: usize,
    pub written: Vec<PathBuf>,
}

/// Decompress, decode and render every artifact from raw file bytes
pub fn derive_artifacts(data: &[u8], config: &Config) -> crate::Result<Artifacts> {
    let container = container::open(data, &config.zip_entry)?;
    let root = decode(&container.data)?;

    let tree = to_generic(&root);
    let records = extract_records(&tree, &config.default_group_id);
    let grouped = build_commands(&root.tag, config);

    let top_level_keys = root
        .compound()
        .map(|c| c.keys().cloned().collect())
        .unwrap_or_default();

    Ok(Artifacts {
        format: container.format,
        decompressed_size: container.data.len(),
        root_name: root.name.clone(),
        top_level_keys,
        json: tree.to_pretty_string(),
        csv: to_csv(&records),
        commands: render_commands(&grouped),
        record_count: records.len(),
        command_count: grouped.values().map(Vec::len).sum(),
        group_count: grouped.len(),
    })
}

/// Read `input` and derive its artifacts without writing anything
pub fn inspect_file(input: &Path, config: &Config) -> Result<Artifacts> {
    let data = fs::read(input).with_context(|| format!("Failed to read {}", input.display()))?;
    info!("Read {} ({})", input.display(), format_size(data.len() as u64));

    derive_artifacts(&data, config)
        .with_context(|| format!("Failed to decode {}", input.display()))
}

/// Export `input` into `out_dir`: structured JSON, CSV rows when any were
/// found, and the grouped command file
pub fn dump_waypoints(input: &Path, out_dir: &Path, config: &Config) -> Result<ExportSummary> {
    let artifacts = inspect_file(input, config)?;

    fs::create_dir_all(out_dir)
        .with_context(|| format!("Failed to create {}", out_dir.display()))?;

    let mut written = Vec::new();

    let path = out_dir.join(JSON_FILE);
    write_atomic(&path, artifacts.json.as_bytes())?;
    info!("Wrote {}", path.display());
    written.push(path);

    match &artifacts.csv {
        Some(csv) => {
            let path = out_dir.join(CSV_FILE);
            write_atomic(&path, csv.as_bytes())?;
            info!("Wrote {} ({} rows)", path.display(), artifacts.record_count);
            written.push(path);
        }
        None => warn!("No waypoint rows found, {} not generated", CSV_FILE),
    }

    let path = out_dir.join(COMMANDS_FILE);
    write_atomic(&path, artifacts.commands.as_bytes())?;
    info!(
        "Wrote {} ({} commands in {} groups)",
        path.display(),
        artifacts.command_count,
        artifacts.group_count
    );
    written.push(path);

    Ok(ExportSummary {
        format: artifacts.format,
        record_count: artifacts.record_count,
        command_count: artifacts.command_count,
        group_count: artifacts.group_count,
        written,
    })
}

/// Write to `<name>.tmp` next to `path`, then rename over it
fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let mut tmp_name = path.file_name().unwrap_or_default().to_os_string();
    tmp_name.push(".tmp");
    let tmp = path.with_file_name(tmp_name);

    fs::write(&tmp, contents).with_context(|| format!("Failed to write {}", tmp.display()))?;
    fs::rename(&tmp, path).with_context(|| {
        let _ = fs::remove_file(&tmp);
        format!("Failed to move {} into place", path.display())
    })?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{DecodeError, Error};
    use crate::nbt::{writer::NbtWriter, TagType};

    fn sample() -> Vec<u8> {
        NbtWriter::root("")
            .begin_compound("groups")
            .begin_compound("mines")
            .string("name", "mines")
            .end()
            .end()
            .begin_compound("waypoints")
            .begin_compound("a")
            .string("name", "Shaft")
            .string("groupId", "mines")
            .int("x", 1)
            .int("y", 12)
            .int("z", 2)
            .int("color", 0xFFAA00)
            .end()
            .end()
            .finish()
    }

    #[test]
    fn test_derive_artifacts() {
        let artifacts = derive_artifacts(&sample(), &Config::default()).unwrap();
        assert_eq!(artifacts.format, ContainerFormat::Raw);
        assert_eq!(artifacts.root_name, "");
        assert_eq!(artifacts.top_level_keys, ["groups", "waypoints"]);
        assert_eq!(artifacts.record_count, 1);
        assert_eq!((artifacts.command_count, artifacts.group_count), (1, 1));
        assert!(artifacts.json.starts_with("{\n  \"_name\": \"\",\n"));
        assert!(artifacts.json.ends_with("}\n"));
        assert_eq!(
            artifacts.commands,
            "# Group: mines\n\nwaypoint create \"[Mines] Shaft\" minecraft:overworld 1 12 2 gold\n\n"
        );
    }

    #[test]
    fn test_no_rows_means_no_csv() {
        let data = NbtWriter::root("")
            .begin_list("tags", TagType::String, 1)
            .item_string("x")
            .end_list()
            .finish();
        let artifacts = derive_artifacts(&data, &Config::default()).unwrap();
        assert_eq!(artifacts.csv, None);
        assert_eq!(artifacts.commands, "");
    }

    #[test]
    fn test_deepest_document_renders() {
        let mut data = vec![10, 0, 0];
        for _ in 0..crate::nbt::MAX_DEPTH {
            data.extend_from_slice(&[10, 0, 1, b'n']);
        }
        data.extend(std::iter::repeat(0).take(crate::nbt::MAX_DEPTH + 1));

        let artifacts = derive_artifacts(&data, &Config::default()).unwrap();
        assert_eq!(artifacts.record_count, 0);
        assert_eq!(artifacts.json.matches("\"_name\": \"n\"").count(), crate::nbt::MAX_DEPTH);
    }

    #[test]
    fn test_decode_error_surfaces() {
        let err = derive_artifacts(&[0x08, 0x00, 0x00], &Config::default()).unwrap_err();
        assert!(matches!(err, Error::Decode(DecodeError::RootNotCompound(8))));
    }

    #[test]
    fn test_write_atomic_replaces_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        fs::write(&path, "old").unwrap();

        write_atomic(&path, b"new").unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "new");
        assert!(!dir.path().join("out.txt.tmp").exists());
    }
}
