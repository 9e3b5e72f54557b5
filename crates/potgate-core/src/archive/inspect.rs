use crate::domain::{ArchiveFormat, ArchiveSpec};
use std::fs::File;
use std::io::Read;
use std::path::Path;

const ZIP_MAGICS: [&[u8]; 3] = [b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"];
const GZIP_MAGIC: &[u8] = b"\x1f\x8b";
const BZIP2_MAGIC: &[u8] = b"BZh";
const XZ_MAGIC: &[u8] = b"\xfd7zXZ\x00";
const SEVENZ_MAGIC: &[u8] = b"7z\xbc\xaf\x27\x1c";

const ARCHIVE_URL_SUFFIXES: [(&str, ArchiveFormat); 8] = [
    (".zip", ArchiveFormat::Zip),
    (".tar.gz", ArchiveFormat::TarGz),
    (".tgz", ArchiveFormat::TarGz),
    (".tar.bz2", ArchiveFormat::TarBz2),
    (".tbz2", ArchiveFormat::TarBz2),
    (".tar.xz", ArchiveFormat::TarXz),
    (".txz", ArchiveFormat::TarXz),
    (".7z", ArchiveFormat::SevenZ),
];

/// Classifies a local file as an archive, or `None` for plain files.
///
/// The first 16 bytes are checked against known signatures before the
/// filename extension is consulted; compressed streams shipped without an
/// extension (or with a wrong one) are still recognized. Unreadable files
/// fall through to extension matching rather than erroring: a plain text
/// artifact is the common case and must stay cheap.
pub fn classify(path: &Path) -> Option<ArchiveSpec> {
    if let Some(format) = sniff_signature(path) {
        return Some(ArchiveSpec::new(path, format));
    }
    classify_name(&path.to_string_lossy()).map(|format| ArchiveSpec::new(path, format))
}

pub fn is_archive(path: &Path) -> bool {
    classify(path).is_some()
}

/// Suffix-only classification for URLs, where no bytes are available yet.
pub fn is_archive_url(url: &str) -> bool {
    classify_name(url).is_some()
}

fn sniff_signature(path: &Path) -> Option<ArchiveFormat> {
    let mut header = [0u8; 16];
    let mut file = File::open(path).ok()?;
    let read = file.read(&mut header).ok()?;
    let header = &header[..read];

    if ZIP_MAGICS.iter().any(|magic| header.starts_with(magic)) {
        return Some(ArchiveFormat::Zip);
    }
    if header.starts_with(SEVENZ_MAGIC) {
        return Some(ArchiveFormat::SevenZ);
    }
    if header.starts_with(XZ_MAGIC) {
        return Some(ArchiveFormat::TarXz);
    }
    if header.starts_with(GZIP_MAGIC) {
        return Some(ArchiveFormat::TarGz);
    }
    if header.starts_with(BZIP2_MAGIC) {
        return Some(ArchiveFormat::TarBz2);
    }
    None
}

fn classify_name(name: &str) -> Option<ArchiveFormat> {
    let lower = name.to_ascii_lowercase();
    ARCHIVE_URL_SUFFIXES
        .iter()
        .find(|(suffix, _)| lower.ends_with(suffix))
        .map(|(_, format)| *format)
}
