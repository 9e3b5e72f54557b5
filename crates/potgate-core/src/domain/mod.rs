pub mod errors;

pub use errors::{ExtractionError, SourceError, ValidationError};

use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

/// Interatomic-potential file format understood by the validator.
///
/// The variants mirror the LAMMPS `pair_style` families the acquisition
/// pipeline handles; anything else is carried as `Unknown` and validated
/// with the general content rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PotentialFormat {
    Sw,
    EamFuncfl,
    EamAlloy,
    EamFs,
    Meam,
    Tersoff,
    #[default]
    Unknown,
}

impl PotentialFormat {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sw => "sw",
            Self::EamFuncfl => "eam",
            Self::EamAlloy => "alloy",
            Self::EamFs => "fs",
            Self::Meam => "meam",
            Self::Tersoff => "tersoff",
            Self::Unknown => "potential",
        }
    }

    pub const fn extension(self) -> &'static str {
        match self {
            Self::Sw => "sw",
            Self::EamFuncfl => "eam",
            Self::EamAlloy => "eam.alloy",
            Self::EamFs => "eam.fs",
            Self::Meam => "meam",
            Self::Tersoff => "tersoff",
            Self::Unknown => "pot",
        }
    }

    /// Infers the format from a filename. Longest suffix wins so that
    /// `Cu.eam.alloy` maps to the alloy format rather than funcfl.
    pub fn from_path(path: &Path) -> Self {
        let name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        if name.ends_with(".eam.alloy") {
            Self::EamAlloy
        } else if name.ends_with(".eam.fs") {
            Self::EamFs
        } else if name.ends_with(".eam") {
            Self::EamFuncfl
        } else if name.ends_with(".sw") {
            Self::Sw
        } else if name.ends_with(".meam") {
            Self::Meam
        } else if name.ends_with(".tersoff") {
            Self::Tersoff
        } else {
            Self::Unknown
        }
    }

    /// Maps a caller-supplied potential-type hint such as "EAM" or
    /// "eam/alloy" onto a format variant.
    pub fn from_hint(hint: &str) -> Self {
        match hint
            .trim()
            .to_ascii_lowercase()
            .replace(['-', '_', ' '], "/")
            .as_str()
        {
            "sw" | "stillinger/weber" => Self::Sw,
            "eam" | "eam/funcfl" | "funcfl" => Self::EamFuncfl,
            "eam/alloy" | "alloy" => Self::EamAlloy,
            "eam/fs" | "fs" | "finnis/sinclair" => Self::EamFs,
            "meam" => Self::Meam,
            "tersoff" => Self::Tersoff,
            _ => Self::Unknown,
        }
    }
}

impl Display for PotentialFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Supported archive container formats, detected by signature before
/// extension (remote servers frequently mislabel downloads).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ArchiveFormat {
    Zip,
    TarGz,
    TarBz2,
    TarXz,
    SevenZ,
}

impl ArchiveFormat {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Zip => "zip",
            Self::TarGz => "tar.gz",
            Self::TarBz2 => "tar.bz2",
            Self::TarXz => "tar.xz",
            Self::SevenZ => "7z",
        }
    }
}

impl Display for ArchiveFormat {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str((*self).as_str())
    }
}

/// An on-disk file classified as an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveSpec {
    pub path: PathBuf,
    pub format: ArchiveFormat,
}

impl ArchiveSpec {
    pub fn new(path: impl Into<PathBuf>, format: ArchiveFormat) -> Self {
        Self {
            path: path.into(),
            format,
        }
    }
}

/// A file that might be the potential the caller asked for.
///
/// The score is computed once during ranking and never mutated afterwards;
/// `extraction_index` preserves archive entry order and breaks score ties
/// deterministically.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PotentialCandidate {
    pub path: PathBuf,
    pub format: PotentialFormat,
    pub score: i32,
    pub element: String,
    pub extraction_index: usize,
}

impl PotentialCandidate {
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or_default()
            .to_string()
    }
}

/// Outcome of the content checks on a single potential file.
///
/// Content problems are reported here, never as errors; I/O problems are a
/// separate [`ValidationError`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub message: String,
    pub data_line_count: usize,
}

impl ValidationResult {
    pub fn pass(message: impl Into<String>, data_line_count: usize) -> Self {
        Self {
            is_valid: true,
            message: message.into(),
            data_line_count,
        }
    }

    pub fn fail(message: impl Into<String>, data_line_count: usize) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
            data_line_count,
        }
    }
}

/// Result of a full acquisition attempt, returned to the coordinating
/// caller. Never an `Err`: exhaustion is `success = false` plus a hand-off
/// message for the external search collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveOutcome {
    pub success: bool,
    pub file_path: Option<PathBuf>,
    pub message: String,
}

impl ResolveOutcome {
    pub fn resolved(file_path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            success: true,
            file_path: Some(file_path.into()),
            message: message.into(),
        }
    }

    pub fn exhausted(message: impl Into<String>) -> Self {
        Self {
            success: false,
            file_path: None,
            message: message.into(),
        }
    }
}

/// Gate verdict for the working directory: downstream simulation stages may
/// run iff `can_continue` is true.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateStatus {
    pub can_continue: bool,
    pub message: String,
}
