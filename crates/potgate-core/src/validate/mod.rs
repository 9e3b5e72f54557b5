//! Structural and numeric sanity checks for potential files.
//!
//! Two phases: a general phase shared by every format (dummy-marker scan,
//! minimum line count) and a format-specific phase. Content problems are
//! reported through [`ValidationResult`], never as errors; only I/O failures
//! become [`ValidationError`], so callers can tell "could not read" apart
//! from "read but invalid".

use crate::domain::{PotentialFormat, ValidationError, ValidationResult};
use std::fs;
use std::path::Path;

/// Markers that expose syntactically valid but semantically fake files.
/// Remote indexes and machine-generated stand-ins emit these routinely; one
/// hit anywhere is sufficient cause for rejection.
const DUMMY_MARKERS: [&str; 8] = [
    "dummy",
    "placeholder",
    "demonstration",
    "example",
    "todo",
    "fixme",
    "replace with actual",
    "# ... more data ...",
];

const MEAM_KEYWORDS: [&str; 5] = ["rc", "delr", "augt1", "gsmooth_factor", "beta"];
const MEAM_HEADER_WINDOW: usize = 20;

/// Validation thresholds. The defaults are heuristic constants tuned against
/// real repository contents; they are data, not invariants.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ValidationLimits {
    /// General phase: fewer non-empty lines than this fails everything.
    pub min_nonempty_lines: usize,
    /// EAM tables smaller than this cannot be real tabulations.
    pub eam_min_numeric_lines: usize,
    /// Minimum nrho / nr tabulation point counts in a funcfl header.
    pub eam_min_tabulation_points: f64,
    pub max_atomic_number: f64,
    pub max_atomic_mass: f64,
    pub max_lattice_constant: f64,
    pub sw_min_parameter_rows: usize,
    pub meam_min_lines: usize,
    pub meam_min_keywords: usize,
    pub general_min_lines: usize,
    pub general_min_data_lines: usize,
}

impl Default for ValidationLimits {
    fn default() -> Self {
        Self {
            min_nonempty_lines: 3,
            eam_min_numeric_lines: 200,
            eam_min_tabulation_points: 100.0,
            max_atomic_number: 118.0,
            max_atomic_mass: 300.0,
            max_lattice_constant: 10.0,
            sw_min_parameter_rows: 1,
            meam_min_lines: 10,
            meam_min_keywords: 2,
            general_min_lines: 10,
            general_min_data_lines: 10,
        }
    }
}

impl ValidationLimits {
    /// Minimum numeric-data-line requirement for a format, quoted in the
    /// delegated-search hand-off message.
    pub fn min_data_lines_for(&self, format: PotentialFormat) -> usize {
        match format {
            PotentialFormat::EamFuncfl | PotentialFormat::EamAlloy | PotentialFormat::EamFs => {
                self.eam_min_numeric_lines
            }
            PotentialFormat::Sw => self.sw_min_parameter_rows,
            PotentialFormat::Meam => self.meam_min_lines,
            PotentialFormat::Tersoff | PotentialFormat::Unknown => self.general_min_data_lines,
        }
    }
}

/// Runs both validation phases on `path` for the declared or inferred
/// `format`. `element` is only carried into the report message.
pub fn validate(
    path: &Path,
    format: PotentialFormat,
    element: &str,
    limits: &ValidationLimits,
) -> Result<ValidationResult, ValidationError> {
    if !path.exists() {
        return Err(ValidationError::NotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path).map_err(|source| ValidationError::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(validate_content(&content, format, element, limits))
}

fn validate_content(
    content: &str,
    format: PotentialFormat,
    element: &str,
    limits: &ValidationLimits,
) -> ValidationResult {
    let lines: Vec<&str> = content.lines().collect();
    let numeric = numeric_line_count(&lines);

    // Dummy detection runs before everything else; a marker anywhere
    // invalidates the file regardless of surrounding plausible data.
    let content_lower = content.to_ascii_lowercase();
    for marker in DUMMY_MARKERS {
        if content_lower.contains(marker) {
            return ValidationResult::fail(
                format!("dummy/placeholder content detected: '{marker}'"),
                numeric,
            );
        }
    }

    let nonempty = lines.iter().filter(|line| !line.trim().is_empty()).count();
    if nonempty < limits.min_nonempty_lines {
        return ValidationResult::fail(
            format!("file too short: {nonempty} non-empty lines"),
            numeric,
        );
    }

    match format {
        PotentialFormat::Sw => validate_sw(&lines, numeric, element, limits),
        PotentialFormat::EamFuncfl => validate_eam_funcfl(&lines, numeric, element, limits),
        PotentialFormat::EamAlloy | PotentialFormat::EamFs => {
            validate_eam_table(format, numeric, element, limits)
        }
        PotentialFormat::Meam => validate_meam(&lines, numeric, element, limits),
        PotentialFormat::Tersoff | PotentialFormat::Unknown => {
            validate_general(&lines, numeric, element, limits)
        }
    }
}

fn validate_sw(
    lines: &[&str],
    numeric: usize,
    element: &str,
    limits: &ValidationLimits,
) -> ValidationResult {
    if numeric < limits.sw_min_parameter_rows {
        return ValidationResult::fail(
            format!("SW file has no parameter rows ({numeric} found)"),
            numeric,
        );
    }
    ValidationResult::pass(
        format!(
            "SW potential for {element} passed: {} lines, {numeric} parameter rows",
            lines.len()
        ),
        numeric,
    )
}

fn validate_eam_funcfl(
    lines: &[&str],
    numeric: usize,
    element: &str,
    limits: &ValidationLimits,
) -> ValidationResult {
    // line 2: atomic number, mass, lattice constant, lattice type
    let Some(header) = lines.get(1).map(|line| tokens(line)) else {
        return ValidationResult::fail("funcfl header line missing", numeric);
    };
    if header.len() < 4 {
        return ValidationResult::fail(
            format!("funcfl header needs >=4 tokens, found {}", header.len()),
            numeric,
        );
    }
    let Some([atomic_number, mass, lattice]) = parse_first::<3>(&header) else {
        return ValidationResult::fail("non-numeric values in funcfl header", numeric);
    };
    if atomic_number <= 0.0 || atomic_number > limits.max_atomic_number {
        return ValidationResult::fail(format!("implausible atomic number {atomic_number}"), numeric);
    }
    if mass <= 0.0 || mass > limits.max_atomic_mass {
        return ValidationResult::fail(format!("implausible atomic mass {mass}"), numeric);
    }
    if lattice <= 0.0 || lattice > limits.max_lattice_constant {
        return ValidationResult::fail(
            format!("implausible lattice constant {lattice}"),
            numeric,
        );
    }

    // line 3: nrho, drho, nr, dr, cutoff
    let Some(grid_line) = lines.get(2).map(|line| tokens(line)) else {
        return ValidationResult::fail("funcfl tabulation line missing", numeric);
    };
    let Some(grid) = parse_first::<5>(&grid_line) else {
        return ValidationResult::fail("invalid funcfl tabulation parameters", numeric);
    };
    if grid.iter().any(|value| *value <= 0.0) {
        return ValidationResult::fail("non-positive tabulation parameter", numeric);
    }
    let (nrho, nr) = (grid[0], grid[2]);
    if nrho < limits.eam_min_tabulation_points || nr < limits.eam_min_tabulation_points {
        return ValidationResult::fail(
            format!("too few tabulation points: nrho={nrho}, nr={nr}"),
            numeric,
        );
    }

    validate_eam_table(PotentialFormat::EamFuncfl, numeric, element, limits)
}

fn validate_eam_table(
    format: PotentialFormat,
    numeric: usize,
    element: &str,
    limits: &ValidationLimits,
) -> ValidationResult {
    if numeric < limits.eam_min_numeric_lines {
        return ValidationResult::fail(
            format!(
                "insufficient numeric data: {numeric} lines (EAM needs >={})",
                limits.eam_min_numeric_lines
            ),
            numeric,
        );
    }
    ValidationResult::pass(
        format!("EAM ({format}) potential for {element} passed: {numeric} data lines"),
        numeric,
    )
}

fn validate_meam(
    lines: &[&str],
    numeric: usize,
    element: &str,
    limits: &ValidationLimits,
) -> ValidationResult {
    if lines.len() < limits.meam_min_lines {
        return ValidationResult::fail(
            format!("MEAM file too short: {} lines", lines.len()),
            numeric,
        );
    }
    let keyword_lines = lines
        .iter()
        .take(MEAM_HEADER_WINDOW)
        .filter(|line| {
            let lower = line.to_ascii_lowercase();
            MEAM_KEYWORDS.iter().any(|keyword| lower.contains(keyword))
        })
        .count();
    if keyword_lines < limits.meam_min_keywords {
        return ValidationResult::fail(
            format!("MEAM parameters missing: {keyword_lines} keyword lines in header"),
            numeric,
        );
    }
    ValidationResult::pass(
        format!(
            "MEAM potential for {element} passed: {} lines, {keyword_lines} parameter lines",
            lines.len()
        ),
        numeric,
    )
}

fn validate_general(
    lines: &[&str],
    numeric: usize,
    element: &str,
    limits: &ValidationLimits,
) -> ValidationResult {
    if lines.len() < limits.general_min_lines {
        return ValidationResult::fail(
            format!("file too short for an unrecognized format: {} lines", lines.len()),
            numeric,
        );
    }
    let data_lines = lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            !trimmed.is_empty() && !trimmed.starts_with('#')
        })
        .count();
    if data_lines < limits.general_min_data_lines {
        return ValidationResult::fail(
            format!("insufficient data content: {data_lines} data lines"),
            numeric,
        );
    }
    ValidationResult::pass(
        format!("general potential for {element} passed: {data_lines} data lines"),
        numeric,
    )
}

/// Count of lines whose first whitespace token parses as a number,
/// ignoring comment lines. This is the `data_line_count` reported for
/// observability.
fn numeric_line_count(lines: &[&str]) -> usize {
    lines
        .iter()
        .filter(|line| {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                return false;
            }
            trimmed
                .split_whitespace()
                .next()
                .is_some_and(|token| token.parse::<f64>().is_ok())
        })
        .count()
}

fn tokens(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Parses the first `N` tokens as numbers, or `None` if any fails.
fn parse_first<const N: usize>(tokens: &[&str]) -> Option<[f64; N]> {
    if tokens.len() < N {
        return None;
    }
    let mut values = [0.0; N];
    for (slot, token) in values.iter_mut().zip(tokens) {
        *slot = token.parse().ok()?;
    }
    Some(values)
}

#[cfg(test)]
mod tests {
    use super::{validate, ValidationLimits};
    use crate::domain::{PotentialFormat, ValidationError};
    use std::fmt::Write as _;
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).expect("fixture should be written");
        path
    }

    /// A funcfl body with a plausible gold header and `rows` numeric lines.
    fn funcfl_body(rows: usize) -> String {
        let mut body = String::from("Au functional fit\n");
        body.push_str("79 196.97 4.08 fcc\n");
        body.push_str("500 5.0100e-04 500 1.0120e-02 5.0600\n");
        for index in 0..rows.saturating_sub(2) {
            writeln!(body, "{:.6e}", (index as f64) * 1.5e-3).expect("write to string");
        }
        body
    }

    fn check(path: &Path, format: PotentialFormat) -> crate::domain::ValidationResult {
        validate(path, format, "Au", &ValidationLimits::default()).expect("file should be readable")
    }

    #[test]
    fn funcfl_accepts_at_two_hundred_numeric_lines() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_fixture(&temp, "Au_u3.eam", &funcfl_body(200));

        let result = check(&path, PotentialFormat::EamFuncfl);
        assert!(result.is_valid, "{}", result.message);
        assert_eq!(result.data_line_count, 200);
    }

    #[test]
    fn funcfl_rejects_at_one_hundred_ninety_nine() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = write_fixture(&temp, "Au_u3.eam", &funcfl_body(199));

        let result = check(&path, PotentialFormat::EamFuncfl);
        assert!(!result.is_valid);
        assert_eq!(result.data_line_count, 199);
        assert!(result.message.contains("insufficient numeric data"));
    }

    #[test]
    fn funcfl_rejects_out_of_range_header_values() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut body = funcfl_body(250);
        // atomic number 250 is not a real element
        body = body.replacen("79 196.97 4.08", "250 196.97 4.08", 1);
        let path = write_fixture(&temp, "Au_u3.eam", &body);

        let result = check(&path, PotentialFormat::EamFuncfl);
        assert!(!result.is_valid);
        assert!(result.message.contains("atomic number"));
    }

    #[test]
    fn funcfl_rejects_sparse_tabulation_grids() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut body = funcfl_body(250);
        body = body.replacen(
            "500 5.0100e-04 500 1.0120e-02 5.0600",
            "50 5.0100e-04 50 1.0120e-02 5.0600",
            1,
        );
        let path = write_fixture(&temp, "Au_u3.eam", &body);

        let result = check(&path, PotentialFormat::EamFuncfl);
        assert!(!result.is_valid);
        assert!(result.message.contains("tabulation points"));
    }

    #[test]
    fn dummy_markers_reject_even_with_plentiful_data() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut body = funcfl_body(300);
        body.push_str("# placeholder until the real table lands\n");
        let path = write_fixture(&temp, "Au_u3.eam", &body);

        let result = check(&path, PotentialFormat::EamFuncfl);
        assert!(!result.is_valid);
        assert!(result.message.contains("placeholder"));
    }

    #[test]
    fn alloy_tables_skip_the_header_position_checks() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut body = String::from("multi-element alloy comment\nAu Cu\nmixed header tokens\n");
        for index in 0..210 {
            writeln!(body, "{:.6e}", (index as f64) * 2.0e-3).expect("write to string");
        }
        let path = write_fixture(&temp, "AuCu.eam.alloy", &body);

        let result = check(&path, PotentialFormat::EamAlloy);
        assert!(result.is_valid, "{}", result.message);
    }

    #[test]
    fn sw_needs_one_parameter_row() {
        let temp = TempDir::new().expect("tempdir should be created");
        let bare = write_fixture(
            &temp,
            "Si.sw",
            "# Stillinger-Weber silicon\nSi Si Si epsilon sigma\nno numbers here either\n",
        );
        let result = check(&bare, PotentialFormat::Sw);
        assert!(!result.is_valid);
        assert_eq!(result.data_line_count, 0);

        let numeric = write_fixture(
            &temp,
            "Si2.sw",
            "# Stillinger-Weber silicon\nSi Si Si header\n2.1683 2.0951 1.80 21.0 1.20 -0.33\n7.049556277 0.6022245584 4.0\n",
        );
        let result = check(&numeric, PotentialFormat::Sw);
        assert!(result.is_valid, "{}", result.message);
    }

    #[test]
    fn meam_requires_keywords_in_the_header_window() {
        let temp = TempDir::new().expect("tempdir should be created");
        let mut body = String::from("rc = 4.0\ndelr = 0.1\n");
        for _ in 0..12 {
            body.push_str("0.5 0.5 0.5\n");
        }
        let path = write_fixture(&temp, "Ti.meam", &body);
        let result = check(&path, PotentialFormat::Meam);
        assert!(result.is_valid, "{}", result.message);

        let mut bare = String::new();
        for _ in 0..12 {
            bare.push_str("0.5 0.5 0.5\n");
        }
        let path = write_fixture(&temp, "Ti2.meam", &bare);
        let result = check(&path, PotentialFormat::Meam);
        assert!(!result.is_valid);
    }

    #[test]
    fn unknown_formats_use_the_general_rule() {
        let temp = TempDir::new().expect("tempdir should be created");
        let short = write_fixture(&temp, "mystery.pot", "a\nb\nc\nd\n");
        let result = check(&short, PotentialFormat::Unknown);
        assert!(!result.is_valid);

        let mut body = String::new();
        for index in 0..15 {
            writeln!(body, "{index} 1.0 2.0").expect("write to string");
        }
        let long = write_fixture(&temp, "mystery2.pot", &body);
        let result = check(&long, PotentialFormat::Unknown);
        assert!(result.is_valid, "{}", result.message);
    }

    #[test]
    fn missing_files_are_io_errors_not_invalid_content() {
        let temp = TempDir::new().expect("tempdir should be created");
        let missing = temp.path().join("nowhere.eam");
        let error = validate(
            &missing,
            PotentialFormat::EamFuncfl,
            "Au",
            &ValidationLimits::default(),
        )
        .expect_err("missing file should be an error");
        assert!(matches!(error, ValidationError::NotFound { .. }));
    }
}
