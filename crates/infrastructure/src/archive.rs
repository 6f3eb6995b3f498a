//! Bundle a directory of export files into a single `.tar.zst` archive and back.

use anyhow::{Result, anyhow};
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use tar::{Archive, Builder};
use tracing::debug;

pub const ARCHIVE_EXTENSION: &str = "tar.zst";
pub const ARCHIVE_MIME_TYPE: &str = "application/zstd";

/// zstd level used for bundles (1-22)
const COMPRESSION_LEVEL: i32 = 3;

/// Pack the regular files directly inside `folder` into `archive_path`.
pub fn pack_folder(folder: &Path, archive_path: &Path) -> Result<u64> {
    if !folder.is_dir() {
        return Err(anyhow!("Path is not a directory: {:?}", folder));
    }

    let mut entries: Vec<_> = fs::read_dir(folder)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_file()).unwrap_or(false))
        .collect();
    entries.sort_by_key(|e| e.file_name());

    let output = BufWriter::new(File::create(archive_path)?);
    let encoder = zstd::stream::write::Encoder::new(output, COMPRESSION_LEVEL)?;
    let mut builder = Builder::new(encoder);

    for entry in &entries {
        debug!("Adding to archive: {:?}", entry.file_name());
        let mut file = File::open(entry.path())?;
        builder.append_file(entry.file_name(), &mut file)?;
    }

    let encoder = builder.into_inner()?;
    encoder.finish()?.flush()?;

    let size = fs::metadata(archive_path)?.len();
    debug!(
        "Archive created: files={}, compressed={} bytes",
        entries.len(),
        size
    );
    Ok(size)
}

/// Extract an archive produced by `pack_folder` into `target_folder`.
pub fn unpack_archive(archive_path: &Path, target_folder: &Path) -> Result<()> {
    if !target_folder.exists() {
        fs::create_dir_all(target_folder)?;
    }
    if !target_folder.is_dir() {
        return Err(anyhow!(
            "Target path is not a directory: {:?}",
            target_folder
        ));
    }

    let input = BufReader::new(File::open(archive_path)?);
    let decoder = zstd::stream::read::Decoder::new(input)?;
    let mut archive = Archive::new(decoder);
    archive.set_preserve_permissions(false);
    archive.set_unpack_xattrs(false);
    // `unpack` refuses entries that would escape the target folder
    archive.unpack(target_folder)?;

    debug!("Extracted archive to: {:?}", target_folder);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_unpack() {
        let source = tempfile::tempdir().unwrap();
        fs::write(source.path().join("companies.csv"), "company_id,name\nSYS-1,Acme\n").unwrap();
        fs::write(source.path().join("manifest.json"), "{}").unwrap();
        fs::create_dir(source.path().join("nested")).unwrap();

        let out = tempfile::tempdir().unwrap();
        let archive = out.path().join("bundle.tar.zst");
        let size = pack_folder(source.path(), &archive).unwrap();
        assert!(size > 0);

        let target = out.path().join("unpacked");
        unpack_archive(&archive, &target).unwrap();
        assert_eq!(
            fs::read_to_string(target.join("companies.csv")).unwrap(),
            "company_id,name\nSYS-1,Acme\n"
        );
        assert!(target.join("manifest.json").is_file());
        assert!(!target.join("nested").exists());
    }

    #[test]
    fn test_unpack_rejects_garbage() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("bad.tar.zst");
        fs::write(&archive, b"not an archive").unwrap();
        assert!(unpack_archive(&archive, &dir.path().join("out")).is_err());
    }
}
