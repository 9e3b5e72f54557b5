//! Source resolution: walks a prioritized strategy list until one source
//! yields an artifact that survives scoring and validation.

mod fetch;
mod sources;

pub use fetch::{Fetch, FileFetcher, HttpFetcher};
pub use sources::{kim_archive_url, SourceEntry, SourceTable};

use crate::archive;
use crate::candidate::{self, ScoreWeights};
use crate::sw;
use crate::domain::{
    ArchiveFormat, PotentialFormat, ResolveOutcome, SourceError, ValidationError,
    ValidationResult,
};
use crate::validate::{self, ValidationLimits};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCRATCH_PREFIX: &str = ".potgate-scratch-";

/// Heuristic knobs for one resolver instance.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    pub weights: ScoreWeights,
    pub limits: ValidationLimits,
    pub sources: SourceTable,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            weights: ScoreWeights::default(),
            limits: ValidationLimits::default(),
            sources: SourceTable::built_in(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Strategy<'a> {
    CustomUrl(&'a str),
    KnownDirect(&'a str),
    KnownArchive(&'a str),
}

impl Strategy<'_> {
    fn url(&self) -> &str {
        match self {
            Self::CustomUrl(url) | Self::KnownDirect(url) | Self::KnownArchive(url) => url,
        }
    }

    const fn describe(&self) -> &'static str {
        match self {
            Self::CustomUrl(_) => "custom URL",
            Self::KnownDirect(_) => "known direct source",
            Self::KnownArchive(_) => "known archive source",
        }
    }
}

/// Finds, downloads, and validates a potential file for one element,
/// promoting the accepted artifact into the working directory.
///
/// Every strategy writes to its own uniquely named scratch directory and
/// only a single copy promotes the winner, so an abandoned acquisition
/// leaves no partial state behind.
pub struct Resolver<F: Fetch> {
    workdir: PathBuf,
    fetcher: F,
    config: ResolverConfig,
}

impl<F: Fetch> Resolver<F> {
    pub fn new(workdir: impl Into<PathBuf>, fetcher: F) -> Self {
        Self::with_config(workdir, fetcher, ResolverConfig::default())
    }

    pub fn with_config(workdir: impl Into<PathBuf>, fetcher: F, config: ResolverConfig) -> Self {
        Self {
            workdir: workdir.into(),
            fetcher,
            config,
        }
    }

    /// Tries each source strategy in order and returns the first artifact
    /// that passes scoring and validation. Never returns an error:
    /// exhaustion produces `success = false` with a hand-off message for
    /// the external search collaborator.
    pub fn resolve(
        &self,
        element: &str,
        potential_type: &str,
        custom_url: Option<&str>,
    ) -> ResolveOutcome {
        let hint = PotentialFormat::from_hint(potential_type);

        // Known SW parameter sets are written locally before any network
        // strategy runs; the download path is for everything else.
        if matches!(hint, PotentialFormat::Sw | PotentialFormat::Unknown)
            && sw::parameters_for(element).is_some()
        {
            match self.try_local_sw(element) {
                Ok((path, validation)) => {
                    tracing::info!(element, file = %path.display(), "SW potential created locally");
                    return ResolveOutcome::resolved(
                        path,
                        format!("built-in SW parameter table succeeded: {}", validation.message),
                    );
                }
                Err(error) => {
                    tracing::warn!(element, error = %error, "local SW creation failed, trying sources");
                }
            }
        }

        let mut strategies = Vec::new();
        if let Some(url) = custom_url {
            strategies.push(Strategy::CustomUrl(url));
        }
        for url in self.config.sources.direct_urls(element, hint) {
            strategies.push(Strategy::KnownDirect(url));
        }
        for url in self.config.sources.archive_urls(element, hint) {
            strategies.push(Strategy::KnownArchive(url));
        }

        let strategy_count = strategies.len();
        for strategy in strategies {
            let url = strategy.url();
            tracing::debug!(strategy = strategy.describe(), url, element, "trying source");
            let attempt = match strategy {
                Strategy::CustomUrl(url) if archive::is_archive_url(url) => {
                    self.try_archive_url(url, element, hint)
                }
                Strategy::CustomUrl(url) | Strategy::KnownDirect(url) => {
                    self.try_direct_url(url, element, hint)
                }
                Strategy::KnownArchive(url) => self.try_archive_url(url, element, hint),
            };
            match attempt {
                Ok((path, validation)) => {
                    tracing::info!(
                        strategy = strategy.describe(),
                        url,
                        file = %path.display(),
                        "potential acquired"
                    );
                    return ResolveOutcome::resolved(
                        path,
                        format!("{} succeeded ({url}): {}", strategy.describe(), validation.message),
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        strategy = strategy.describe(),
                        url,
                        error = %error,
                        "source produced nothing, advancing"
                    );
                }
            }
        }

        ResolveOutcome::exhausted(self.handoff_message(element, hint, strategy_count))
    }

    /// Writes the element's SW file from the built-in parameter table into
    /// a scratch directory, validates it, and promotes it as
    /// `<element>.sw`. Same scratch-then-promote discipline as the
    /// download strategies, so nothing unvalidated touches the workdir.
    fn try_local_sw(&self, element: &str) -> Result<(PathBuf, ValidationResult), SourceError> {
        let scratch = self.scratch_dir()?;
        let created = sw::create_sw_file(scratch.path(), element).map_err(|error| match error {
            sw::SwCreateError::Io { path, source } => SourceError::Io { path, source },
            other => SourceError::NoCandidate(other.to_string()),
        })?;
        let validation = self.validate_candidate(&created, PotentialFormat::Sw, element)?;
        if !validation.is_valid {
            return Err(SourceError::NoCandidate(format!(
                "generated SW file rejected: {}",
                validation.message
            )));
        }
        let name = created
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("potential.sw")
            .to_string();
        let promoted = self.promote(&created, &name)?;
        Ok((promoted, validation))
    }

    /// Downloads a single file and validates it. A download whose bytes
    /// carry an archive signature is rerouted through extraction: remote
    /// servers frequently mislabel bundles as plain files.
    fn try_direct_url(
        &self,
        url: &str,
        element: &str,
        hint: PotentialFormat,
    ) -> Result<(PathBuf, ValidationResult), SourceError> {
        let scratch = self.scratch_dir()?;
        let file_name = trailing_name(url, "download.pot");
        let downloaded = scratch.path().join(file_name);
        self.fetcher.fetch(url, &downloaded)?;

        if let Some(spec) = archive::classify(&downloaded) {
            tracing::debug!(url, format = %spec.format, "direct download is actually an archive");
            return self.accept_from_archive(&spec.path, &scratch, element, hint);
        }

        let format = declared_format(&downloaded, hint);
        let validation = self.validate_candidate(&downloaded, format, element)?;
        if !validation.is_valid {
            return Err(SourceError::NoCandidate(format!(
                "'{file_name}' rejected: {}",
                validation.message
            )));
        }
        let promoted = self.promote(&downloaded, file_name)?;
        Ok((promoted, validation))
    }

    /// Downloads an archive, extracts it, and walks the ranked candidates
    /// until one validates. A failed candidate is discarded and the next
    /// is tried before the whole URL is abandoned.
    fn try_archive_url(
        &self,
        url: &str,
        element: &str,
        hint: PotentialFormat,
    ) -> Result<(PathBuf, ValidationResult), SourceError> {
        let scratch = self.scratch_dir()?;
        let archive_name = trailing_name(url, "download.archive");
        let downloaded = scratch.path().join(archive_name);
        self.fetcher.fetch(url, &downloaded)?;
        self.accept_from_archive(&downloaded, &scratch, element, hint)
    }

    fn accept_from_archive(
        &self,
        archive_path: &Path,
        scratch: &TempDir,
        element: &str,
        hint: PotentialFormat,
    ) -> Result<(PathBuf, ValidationResult), SourceError> {
        let spec = archive::classify(archive_path).ok_or_else(|| {
            SourceError::Extraction(crate::domain::ExtractionError::Unrecognized {
                path: archive_path.to_path_buf(),
            })
        })?;
        let extracted = archive::extract(&spec, &scratch.path().join("contents"))?;
        if extracted.is_empty() {
            return Err(SourceError::NoCandidate(
                "archive contained no files".to_string(),
            ));
        }

        let ranked = candidate::rank(&extracted, element, &self.config.weights);
        let mut rejections = Vec::new();
        for candidate in ranked.iter().filter(|candidate| candidate.score > 0) {
            let format = declared_format(&candidate.path, hint);
            let validation = self.validate_candidate(&candidate.path, format, element)?;
            if validation.is_valid {
                let promoted = self.promote(&candidate.path, &promoted_name(element, format, candidate))?;
                return Ok((promoted, validation));
            }
            tracing::debug!(
                candidate = %candidate.file_name(),
                score = candidate.score,
                reason = %validation.message,
                "archive candidate rejected"
            );
            rejections.push(format!("{}: {}", candidate.file_name(), validation.message));
        }

        Err(SourceError::NoCandidate(format!(
            "no candidate in archive survived validation ({})",
            rejections.join("; ")
        )))
    }

    fn validate_candidate(
        &self,
        path: &Path,
        format: PotentialFormat,
        element: &str,
    ) -> Result<ValidationResult, SourceError> {
        validate::validate(path, format, element, &self.config.limits).map_err(io_failure)
    }

    /// Single atomic-enough promotion step: the scratch copy becomes the
    /// working-directory artifact, the scratch directory is dropped.
    fn promote(&self, source: &Path, name: &str) -> Result<PathBuf, SourceError> {
        let dest = self.workdir.join(name);
        fs::copy(source, &dest).map_err(|error| SourceError::Io {
            path: dest.clone(),
            source: error,
        })?;
        Ok(dest)
    }

    fn scratch_dir(&self) -> Result<TempDir, SourceError> {
        fs::create_dir_all(&self.workdir).map_err(|source| SourceError::Io {
            path: self.workdir.clone(),
            source,
        })?;
        tempfile::Builder::new()
            .prefix(SCRATCH_PREFIX)
            .tempdir_in(&self.workdir)
            .map_err(|source| SourceError::Io {
                path: self.workdir.clone(),
                source,
            })
    }

    fn handoff_message(
        &self,
        element: &str,
        hint: PotentialFormat,
        strategy_count: usize,
    ) -> String {
        let min_lines = self.config.limits.min_data_lines_for(hint);
        let archive_formats = [
            ArchiveFormat::Zip,
            ArchiveFormat::TarGz,
            ArchiveFormat::TarBz2,
            ArchiveFormat::TarXz,
            ArchiveFormat::SevenZ,
        ]
        .map(ArchiveFormat::as_str)
        .join(", ");
        format!(
            "all {strategy_count} sources exhausted for {element}; external search needed: \
             find a {element} potential (sw, eam, eam/alloy, eam/fs, meam, or tersoff) \
             with at least {min_lines} numeric data lines, as a direct file or an archive \
             ({archive_formats}), then retry with the URL"
        )
    }
}

/// Falls back to the caller's potential-type hint when the filename does
/// not pin down a format.
fn declared_format(path: &Path, hint: PotentialFormat) -> PotentialFormat {
    match PotentialFormat::from_path(path) {
        PotentialFormat::Unknown => hint,
        inferred => inferred,
    }
}

fn trailing_name<'url>(url: &'url str, fallback: &'url str) -> &'url str {
    match url.rsplit('/').next() {
        Some(name) if !name.is_empty() && name.contains('.') => name,
        _ => fallback,
    }
}

/// Deterministic working-directory name for an archive-derived potential:
/// `<element>_<format-label>.<format-ext>`, or the candidate's own name
/// when even the format is unknown.
fn promoted_name(
    element: &str,
    format: PotentialFormat,
    candidate: &crate::domain::PotentialCandidate,
) -> String {
    if format == PotentialFormat::Unknown {
        candidate.file_name()
    } else {
        format!("{element}_{}.{}", format.label(), format.extension())
    }
}

fn io_failure(error: ValidationError) -> SourceError {
    match error {
        ValidationError::NotFound { path } => SourceError::Io {
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "file vanished"),
            path,
        },
        ValidationError::Unreadable { path, source } => SourceError::Io { path, source },
    }
}
