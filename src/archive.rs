//! Zip packaging for bulk downloads.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::{Result, ShareError};

/// File name of the archive inside its directory.
pub const ARCHIVE_NAME: &str = "downloaded_files.zip";

/// Write `files` into `dir/downloaded_files.zip`, each under its base name.
///
/// Directory structure is flattened; entries keep input order. Zip writing is
/// blocking and runs on the blocking pool.
pub async fn package_as_archive(files: Vec<PathBuf>, dir: &Path) -> Result<PathBuf> {
    let archive_path = dir.join(ARCHIVE_NAME);
    let target = archive_path.clone();

    let count = tokio::task::spawn_blocking(move || write_archive(&files, &target)).await??;

    tracing::info!(path = %archive_path.display(), files = count, "Archive written");
    Ok(archive_path)
}

fn write_archive(files: &[PathBuf], archive_path: &Path) -> Result<usize> {
    let mut zip = ZipWriter::new(BufWriter::new(File::create(archive_path)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for path in files {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ShareError::NotFound(path.display().to_string()))?;

        zip.start_file(name, options)?;
        let mut reader = BufReader::new(File::open(path)?);
        std::io::copy(&mut reader, &mut zip)?;
    }

    zip.finish()?;
    Ok(files.len())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    #[tokio::test]
    async fn test_entries_use_base_names() {
        let src = tempfile::tempdir().unwrap();
        let nested = src.path().join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();
        std::fs::write(nested.join("deep.txt"), b"deep").unwrap();
        std::fs::write(src.path().join("top.txt"), b"top").unwrap();

        let out = tempfile::tempdir().unwrap();
        let archive = package_as_archive(
            vec![nested.join("deep.txt"), src.path().join("top.txt")],
            out.path(),
        )
        .await
        .unwrap();

        assert_eq!(archive, out.path().join(ARCHIVE_NAME));

        let mut zip = zip::ZipArchive::new(File::open(&archive).unwrap()).unwrap();
        assert_eq!(zip.len(), 2);
        assert_eq!(zip.by_index(0).unwrap().name(), "deep.txt");
        assert_eq!(zip.by_index(1).unwrap().name(), "top.txt");

        let mut content = String::new();
        zip.by_name("deep.txt").unwrap().read_to_string(&mut content).unwrap();
        assert_eq!(content, "deep");
    }

    #[tokio::test]
    async fn test_missing_input_fails() {
        let out = tempfile::tempdir().unwrap();
        let result = package_as_archive(vec![out.path().join("nope.txt")], out.path()).await;
        assert!(result.is_err());
    }
}
