//! Workflow gate: holds the "may the simulation stages run" decision.
//!
//! The gate tracks two artifact slots, a validated potential file and a
//! readable structure file. A slot holds a path only while the file behind
//! it passes its checks; deleted or corrupted files empty the slot again on
//! the next status check. The gate itself never returns errors.

use crate::common;
use crate::domain::{GateStatus, PotentialFormat, ValidationResult};
use crate::validate::{self, ValidationLimits};
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::fs;
use std::path::{Path, PathBuf};

const POTENTIAL_PATTERNS: [&str; 6] = [
    "*.eam",
    "*.eam.alloy",
    "*.eam.fs",
    "*.sw",
    "*.meam",
    "*.tersoff",
];
const STRUCTURE_PATTERNS: [&str; 1] = ["*.lmp"];

/// Persistent gate over one working directory.
pub struct WorkflowGate {
    workdir: PathBuf,
    limits: ValidationLimits,
    potential_globs: GlobSet,
    structure_globs: GlobSet,
    potential: Option<PathBuf>,
    structure: Option<PathBuf>,
}

impl WorkflowGate {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self::with_limits(workdir, ValidationLimits::default())
    }

    pub fn with_limits(workdir: impl Into<PathBuf>, limits: ValidationLimits) -> Self {
        Self {
            workdir: workdir.into(),
            limits,
            potential_globs: build_globset(&POTENTIAL_PATTERNS),
            structure_globs: build_globset(&STRUCTURE_PATTERNS),
            potential: None,
            structure: None,
        }
    }

    /// Re-evaluates both slots against the filesystem and reports whether
    /// downstream stages may run. Recorded paths are re-verified every
    /// call; an empty slot triggers a directory rescan, so artifacts
    /// produced by other processes are picked up without being recorded.
    pub fn check_status(&mut self) -> GateStatus {
        if !self.workdir.is_dir() {
            self.potential = None;
            self.structure = None;
            return GateStatus {
                can_continue: false,
                message: format!(
                    "working directory does not exist: '{}'",
                    self.workdir.display()
                ),
            };
        }

        let potential_note = self.refresh_potential();
        let structure_note = self.refresh_structure();
        let can_continue = self.potential.is_some() && self.structure.is_some();

        GateStatus {
            can_continue,
            message: format!("potential: {potential_note} | structure: {structure_note}"),
        }
    }

    /// Validates `path` and fills the potential slot iff it passes. The
    /// element is taken from the filename; files that do not name one are
    /// validated with the format rules only.
    pub fn record_potential(&mut self, path: &Path) -> ValidationResult {
        let result = check_potential_file(path, &self.limits);
        if result.is_valid {
            self.potential = Some(path.to_path_buf());
        }
        result
    }

    /// Checks `path` for structure-file plausibility and fills the
    /// structure slot iff it passes.
    pub fn record_structure(&mut self, path: &Path) -> ValidationResult {
        let result = check_structure_file(path);
        if result.is_valid {
            self.structure = Some(path.to_path_buf());
        }
        result
    }

    /// Only the first match (by name) is ever validated: downstream stages
    /// scan the same directory and would pick that file, so skipping past
    /// an invalid one would open the gate on a directory that still trips
    /// up the simulation. The failure reason is carried into the status.
    fn refresh_potential(&mut self) -> String {
        if let Some(path) = self.potential.take() {
            if path.is_file() {
                let note = display_name(&path);
                self.potential = Some(path);
                return note;
            }
            tracing::warn!(file = %path.display(), "recorded potential vanished");
        }
        let Some(first) = self.scan(&self.potential_globs).into_iter().next() else {
            return "missing (no potential file in workdir)".to_string();
        };
        let result = check_potential_file(&first, &self.limits);
        if result.is_valid {
            let note = display_name(&first);
            self.potential = Some(first);
            note
        } else {
            format!("{} failed validation: {}", display_name(&first), result.message)
        }
    }

    fn refresh_structure(&mut self) -> String {
        if let Some(path) = self.structure.take() {
            if path.is_file() {
                let note = display_name(&path);
                self.structure = Some(path);
                return note;
            }
            tracing::warn!(file = %path.display(), "recorded structure vanished");
        }
        let Some(first) = self.scan(&self.structure_globs).into_iter().next() else {
            return "missing (no structure file (.lmp) in workdir)".to_string();
        };
        let result = check_structure_file(&first);
        if result.is_valid {
            let note = display_name(&first);
            self.structure = Some(first);
            note
        } else {
            format!("{} failed validation: {}", display_name(&first), result.message)
        }
    }

    /// Files in the workdir whose names match `globs`, sorted by name so
    /// repeated scans pick the same file.
    fn scan(&self, globs: &GlobSet) -> Vec<PathBuf> {
        let Ok(entries) = fs::read_dir(&self.workdir) else {
            return Vec::new();
        };
        let mut matches: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.is_file())
            .filter(|path| {
                path.file_name()
                    .map(|name| globs.is_match(name))
                    .unwrap_or(false)
            })
            .collect();
        matches.sort();
        matches
    }
}

fn check_potential_file(path: &Path, limits: &ValidationLimits) -> ValidationResult {
    let format = PotentialFormat::from_path(path);
    let element = path
        .file_name()
        .and_then(|name| name.to_str())
        .and_then(common::detect_in_filename)
        .unwrap_or("unknown");
    match validate::validate(path, format, element, limits) {
        Ok(result) => result,
        Err(error) => ValidationResult::fail(error.to_string(), 0),
    }
}

/// A structure file is plausible when it is readable and has at least one
/// non-blank line. Geometry checks belong to the simulation stage.
fn check_structure_file(path: &Path) -> ValidationResult {
    match fs::read_to_string(path) {
        Ok(content) => {
            let nonblank = content.lines().filter(|line| !line.trim().is_empty()).count();
            if nonblank == 0 {
                ValidationResult::fail("structure file is empty", 0)
            } else {
                ValidationResult::pass(
                    format!("structure file readable: {nonblank} non-blank lines"),
                    nonblank,
                )
            }
        }
        Err(error) => ValidationResult::fail(format!("structure file unreadable: {error}"), 0),
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .and_then(|name| name.to_str())
        .unwrap_or("<non-utf8 name>")
        .to_string()
}

fn build_globset(patterns: &[&str]) -> GlobSet {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        if let Ok(glob) = Glob::new(pattern) {
            builder.add(glob);
        }
    }
    builder.build().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::WorkflowGate;
    use std::fmt::Write as _;
    use std::fs;
    use tempfile::TempDir;

    fn funcfl_body(rows: usize) -> String {
        let mut body = String::from("Au functional fit\n");
        body.push_str("79 196.97 4.08 fcc\n");
        body.push_str("500 5.0100e-04 500 1.0120e-02 5.0600\n");
        for index in 0..rows {
            writeln!(body, "{:.6e}", (index as f64) * 1.5e-3).expect("write to string");
        }
        body
    }

    #[test]
    fn empty_workdir_blocks_and_names_both_artifacts() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut gate = WorkflowGate::new(temp.path());

        let status = gate.check_status();
        assert!(!status.can_continue);
        assert!(status.message.contains("potential"));
        assert!(status.message.contains("structure"));
    }

    #[test]
    fn rescan_picks_up_files_written_by_other_processes() {
        let temp = TempDir::new().expect("tempdir should be created");
        fs::write(temp.path().join("Au_eam.eam"), funcfl_body(220))
            .expect("potential fixture should be written");
        fs::write(temp.path().join("gold.lmp"), "LAMMPS data file\n4 atoms\n")
            .expect("structure fixture should be written");

        let mut gate = WorkflowGate::new(temp.path());
        let status = gate.check_status();
        assert!(status.can_continue, "{}", status.message);
        assert!(status.message.contains("Au_eam.eam"));
        assert!(status.message.contains("gold.lmp"));
    }

    #[test]
    fn invalid_first_match_halts_even_with_a_valid_file_behind_it() {
        let temp = TempDir::new().expect("tempdir should be created");
        // sorts before the valid file and fails validation
        fs::write(temp.path().join("Aa_bad.eam"), "too\nshort\n")
            .expect("decoy fixture should be written");
        fs::write(temp.path().join("Cu_good.eam"), funcfl_body(220))
            .expect("potential fixture should be written");
        fs::write(temp.path().join("copper.lmp"), "LAMMPS data file\n4 atoms\n")
            .expect("structure fixture should be written");

        let mut gate = WorkflowGate::new(temp.path());
        let status = gate.check_status();
        assert!(!status.can_continue, "{}", status.message);
        assert!(status.message.contains("Aa_bad.eam"));
        assert!(!status.message.contains("Cu_good.eam"));
    }

    #[test]
    fn halt_message_carries_the_validation_failure_reason() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut body = funcfl_body(220);
        body.push_str("# placeholder until the real table lands\n");
        fs::write(temp.path().join("Au_eam.eam"), body).expect("fixture should be written");

        let mut gate = WorkflowGate::new(temp.path());
        let status = gate.check_status();
        assert!(!status.can_continue);
        assert!(status.message.contains("Au_eam.eam"));
        assert!(
            status.message.contains("placeholder"),
            "failure reason should surface: {}",
            status.message
        );
    }

    #[test]
    fn missing_workdir_gets_its_own_sub_status() {
        let temp = TempDir::new().expect("tempdir should be created");
        let gone = temp.path().join("never-created");

        let mut gate = WorkflowGate::new(&gone);
        let status = gate.check_status();
        assert!(!status.can_continue);
        assert!(status.message.contains("working directory does not exist"));
    }

    #[test]
    fn invalid_potential_never_fills_the_slot() {
        let temp = TempDir::new().expect("tempdir should be created");
        let bogus = temp.path().join("Au_eam.eam");
        fs::write(&bogus, "too\nshort\n").expect("fixture should be written");

        let mut gate = WorkflowGate::new(temp.path());
        let result = gate.record_potential(&bogus);
        assert!(!result.is_valid);
        assert!(!gate.check_status().can_continue);
    }

    #[test]
    fn deleting_an_artifact_flips_the_gate_back() {
        let temp = TempDir::new().expect("tempdir should be created");
        let potential = temp.path().join("Au_eam.eam");
        let structure = temp.path().join("gold.lmp");
        fs::write(&potential, funcfl_body(220)).expect("potential fixture should be written");
        fs::write(&structure, "LAMMPS data file\n4 atoms\n")
            .expect("structure fixture should be written");

        let mut gate = WorkflowGate::new(temp.path());
        assert!(gate.record_potential(&potential).is_valid);
        assert!(gate.record_structure(&structure).is_valid);
        assert!(gate.check_status().can_continue);

        fs::remove_file(&structure).expect("fixture should be removable");
        let status = gate.check_status();
        assert!(!status.can_continue);
        assert!(status.message.contains("Au_eam.eam"));
    }
}
