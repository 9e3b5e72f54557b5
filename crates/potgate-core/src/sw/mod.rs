//! Local Stillinger-Weber potential generation.
//!
//! For a handful of diamond-lattice elements the SW parameters are
//! published constants, so the file can be written from a built-in table
//! without touching the network. The resolver tries this before any
//! download strategy.

use std::fs;
use std::path::{Path, PathBuf};

/// One element's Stillinger-Weber parameter set, in LAMMPS `pair_sw`
/// order: the two- and three-body coefficients plus the literature source.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwParameters {
    pub epsilon: f64,
    pub sigma: f64,
    pub a: f64,
    pub lambda: f64,
    pub gamma: f64,
    pub costheta0: f64,
    pub big_a: f64,
    pub big_b: f64,
    pub p: f64,
    pub q: f64,
    pub tol: f64,
    pub reference: &'static str,
}

const SW_TABLE: [(&str, SwParameters); 3] = [
    (
        "Si",
        SwParameters {
            epsilon: 2.1683,
            sigma: 2.0951,
            a: 1.80,
            lambda: 21.0,
            gamma: 1.20,
            costheta0: -0.333333333333,
            big_a: 7.049556277,
            big_b: 0.6022245584,
            p: 4.0,
            q: 0.0,
            tol: 0.0,
            reference: "Stillinger & Weber, Phys. Rev. B 31, 5262 (1985)",
        },
    ),
    (
        "Ge",
        SwParameters {
            epsilon: 1.9321,
            sigma: 2.4499,
            a: 1.80,
            lambda: 31.0,
            gamma: 1.20,
            costheta0: -0.333333333333,
            big_a: 7.049556277,
            big_b: 0.6022245584,
            p: 4.0,
            q: 0.0,
            tol: 0.0,
            reference: "Ding & Andersen, Phys. Rev. B 34, 6987 (1986)",
        },
    ),
    (
        "C",
        SwParameters {
            epsilon: 2.3890,
            sigma: 1.4276,
            a: 1.80,
            lambda: 100.0,
            gamma: 1.20,
            costheta0: -0.333333333333,
            big_a: 7.049556277,
            big_b: 0.6022245584,
            p: 4.0,
            q: 0.0,
            tol: 0.0,
            reference: "Erhart & Albe, Phys. Rev. B 71, 035211 (2005)",
        },
    ),
];

#[derive(Debug, thiserror::Error)]
pub enum SwCreateError {
    #[error("no SW parameters for '{element}' (available: {available})")]
    NoParameters { element: String, available: String },
    #[error("could not write SW file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Case-insensitive lookup in the built-in parameter table.
pub fn parameters_for(element: &str) -> Option<&'static SwParameters> {
    SW_TABLE
        .iter()
        .find(|(symbol, _)| symbol.eq_ignore_ascii_case(element.trim()))
        .map(|(_, params)| params)
}

pub fn available_elements() -> Vec<&'static str> {
    SW_TABLE.iter().map(|(symbol, _)| *symbol).collect()
}

fn render(element: &str, params: &SwParameters) -> String {
    format!(
        "# Stillinger-Weber potential for {element}\n\
         # {reference}\n\
         \n\
         {element} {element} {element} {epsilon} {sigma} {a} {lambda} {gamma} {costheta0}\n\
         {big_a} {big_b} {p} {q} {tol}\n",
        reference = params.reference,
        epsilon = params.epsilon,
        sigma = params.sigma,
        a = params.a,
        lambda = params.lambda,
        gamma = params.gamma,
        costheta0 = params.costheta0,
        big_a = params.big_a,
        big_b = params.big_b,
        p = params.p,
        q = params.q,
        tol = params.tol,
    )
}

/// Writes `<element>.sw` into `dir` from the built-in table and returns
/// the path. The element symbol's canonical capitalization is used in the
/// filename and the parameter lines.
pub fn create_sw_file(dir: &Path, element: &str) -> Result<PathBuf, SwCreateError> {
    let canonical = SW_TABLE
        .iter()
        .find(|(symbol, _)| symbol.eq_ignore_ascii_case(element.trim()));
    let Some((symbol, params)) = canonical else {
        return Err(SwCreateError::NoParameters {
            element: element.to_string(),
            available: available_elements().join(", "),
        });
    };

    let path = dir.join(format!("{symbol}.sw"));
    fs::write(&path, render(symbol, params)).map_err(|source| SwCreateError::Io {
        path: path.clone(),
        source,
    })?;
    tracing::debug!(file = %path.display(), element = *symbol, "SW potential written");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::{available_elements, create_sw_file, parameters_for, SwCreateError};
    use crate::domain::PotentialFormat;
    use crate::validate::{self, ValidationLimits};
    use tempfile::TempDir;

    #[test]
    fn table_covers_the_diamond_lattice_elements() {
        assert_eq!(available_elements(), ["Si", "Ge", "C"]);
        assert_eq!(parameters_for("si").map(|p| p.epsilon), Some(2.1683));
        assert_eq!(parameters_for("Ge").map(|p| p.lambda), Some(31.0));
        assert!(parameters_for("Cu").is_none());
    }

    #[test]
    fn created_file_passes_sw_validation() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = create_sw_file(temp.path(), "si").expect("SW file should be written");
        assert!(path.ends_with("Si.sw"));

        let result = validate::validate(&path, PotentialFormat::Sw, "Si", &ValidationLimits::default())
            .expect("file should be readable");
        assert!(result.is_valid, "{}", result.message);

        let body = std::fs::read_to_string(&path).expect("file should be readable");
        assert!(body.contains("Stillinger & Weber, Phys. Rev. B 31, 5262 (1985)"));
        assert!(body.contains("Si Si Si 2.1683"));
    }

    #[test]
    fn unknown_elements_name_the_available_ones() {
        let temp = TempDir::new().expect("tempdir should be created");
        let error = create_sw_file(temp.path(), "Au").expect_err("gold has no SW entry");
        match error {
            SwCreateError::NoParameters { available, .. } => {
                assert!(available.contains("Si"));
                assert!(available.contains("Ge"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
