use crate::domain::{ArchiveFormat, ArchiveSpec, ExtractionError};
use std::fs::{self, File};
use std::io::{ErrorKind, Read};
use std::path::{Path, PathBuf};

/// Extracts a classified archive into `dest` and returns the extracted
/// regular files in entry order (the order defines each candidate's
/// extraction index, so it must be deterministic).
///
/// Directories are created but not returned. Entries that would escape
/// `dest` are skipped. Corrupt, password-protected, and unsupported-variant
/// archives all produce a typed [`ExtractionError`]; the resolver treats
/// every one of them as "this source produced nothing".
pub fn extract(spec: &ArchiveSpec, dest: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    fs::create_dir_all(dest).map_err(|source| ExtractionError::Io {
        path: dest.to_path_buf(),
        source,
    })?;

    let files = match spec.format {
        ArchiveFormat::Zip => extract_zip(&spec.path, dest),
        ArchiveFormat::TarGz => {
            let file = open_archive(&spec.path)?;
            extract_tar(spec, flate2::read::GzDecoder::new(file), dest)
        }
        ArchiveFormat::TarBz2 => {
            let file = open_archive(&spec.path)?;
            extract_tar(spec, bzip2::read::BzDecoder::new(file), dest)
        }
        ArchiveFormat::TarXz => {
            let file = open_archive(&spec.path)?;
            extract_tar(spec, xz2::read::XzDecoder::new(file), dest)
        }
        ArchiveFormat::SevenZ => extract_sevenz(spec, dest),
    }?;

    tracing::debug!(
        archive = %spec.path.display(),
        format = %spec.format,
        files = files.len(),
        "archive extracted"
    );
    Ok(files)
}

fn open_archive(path: &Path) -> Result<File, ExtractionError> {
    File::open(path).map_err(|source| ExtractionError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn extract_zip(path: &Path, dest: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let file = open_archive(path)?;
    let mut archive = zip::ZipArchive::new(file).map_err(|error| zip_error(path, error))?;

    let mut extracted = Vec::new();
    for index in 0..archive.len() {
        let mut entry = archive
            .by_index(index)
            .map_err(|error| zip_error(path, error))?;
        if entry.is_dir() {
            continue;
        }
        let Some(relative) = entry.enclosed_name() else {
            continue;
        };
        let out_path = dest.join(relative);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent).map_err(|source| ExtractionError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        let mut out = File::create(&out_path).map_err(|source| ExtractionError::Io {
            path: out_path.clone(),
            source,
        })?;
        std::io::copy(&mut entry, &mut out)
            .map_err(|source| classify_io_error(ArchiveFormat::Zip, path, source))?;
        extracted.push(out_path);
    }
    Ok(extracted)
}

fn extract_tar<R: Read>(
    spec: &ArchiveSpec,
    reader: R,
    dest: &Path,
) -> Result<Vec<PathBuf>, ExtractionError> {
    let mut archive = tar::Archive::new(reader);
    let entries = archive
        .entries()
        .map_err(|source| classify_io_error(spec.format, &spec.path, source))?;

    let mut extracted = Vec::new();
    for entry in entries {
        // Decompression failures in the underlying stream surface here.
        let mut entry =
            entry.map_err(|source| classify_io_error(spec.format, &spec.path, source))?;
        if !entry.header().entry_type().is_file() {
            continue;
        }
        let relative = entry
            .path()
            .map_err(|source| classify_io_error(spec.format, &spec.path, source))?
            .into_owned();
        let unpacked = entry
            .unpack_in(dest)
            .map_err(|source| classify_io_error(spec.format, &spec.path, source))?;
        if unpacked {
            extracted.push(dest.join(relative));
        }
    }
    Ok(extracted)
}

#[cfg(feature = "sevenz")]
fn extract_sevenz(spec: &ArchiveSpec, dest: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    sevenz_rust::decompress_file(&spec.path, dest).map_err(|error| ExtractionError::Corrupt {
        format: ArchiveFormat::SevenZ,
        path: spec.path.clone(),
        detail: error.to_string(),
    })?;
    let mut files = Vec::new();
    collect_files(dest, &mut files).map_err(|source| ExtractionError::Io {
        path: dest.to_path_buf(),
        source,
    })?;
    Ok(files)
}

#[cfg(not(feature = "sevenz"))]
fn extract_sevenz(spec: &ArchiveSpec, _dest: &Path) -> Result<Vec<PathBuf>, ExtractionError> {
    let _ = spec;
    Err(ExtractionError::Unsupported {
        format: ArchiveFormat::SevenZ,
        reason: "built without the 'sevenz' feature".to_string(),
    })
}

#[cfg(feature = "sevenz")]
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> std::io::Result<()> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|entry| entry.file_name());
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else {
            files.push(path);
        }
    }
    Ok(())
}

fn zip_error(path: &Path, error: zip::result::ZipError) -> ExtractionError {
    match error {
        zip::result::ZipError::Io(source) => ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        },
        zip::result::ZipError::UnsupportedArchive(reason) => ExtractionError::Unsupported {
            format: ArchiveFormat::Zip,
            reason: reason.to_string(),
        },
        other => ExtractionError::Corrupt {
            format: ArchiveFormat::Zip,
            path: path.to_path_buf(),
            detail: other.to_string(),
        },
    }
}

/// A decode failure inside a compressed stream arrives as `InvalidData` or a
/// truncated read; everything else is a genuine filesystem problem.
fn classify_io_error(
    format: ArchiveFormat,
    path: &Path,
    source: std::io::Error,
) -> ExtractionError {
    match source.kind() {
        ErrorKind::InvalidData | ErrorKind::UnexpectedEof | ErrorKind::InvalidInput => {
            ExtractionError::Corrupt {
                format,
                path: path.to_path_buf(),
                detail: source.to_string(),
            }
        }
        _ => ExtractionError::Io {
            path: path.to_path_buf(),
            source,
        },
    }
}
