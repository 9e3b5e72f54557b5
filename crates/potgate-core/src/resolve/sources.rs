//! Known-source URL tables for direct potential files and archive bundles.

use crate::domain::PotentialFormat;
use serde::Deserialize;

const LAMMPS_POTENTIALS_BASE: &str =
    "https://raw.githubusercontent.com/lammps/lammps/develop/potentials/";
const OPENKIM_DOWNLOAD_BASE: &str = "https://openkim.org/download/";

/// One known source: an element, an optional format restriction, and the
/// URLs to try in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceEntry {
    pub element: String,
    /// Potential-type hint this entry satisfies ("eam", "sw", ...); empty
    /// means any.
    #[serde(default)]
    pub format: String,
    pub urls: Vec<String>,
}

impl SourceEntry {
    fn matches(&self, element: &str, format: PotentialFormat) -> bool {
        if !self.element.eq_ignore_ascii_case(element) {
            return false;
        }
        if self.format.is_empty() || format == PotentialFormat::Unknown {
            return true;
        }
        PotentialFormat::from_hint(&self.format) == format
            || eam_family(PotentialFormat::from_hint(&self.format)) && eam_family(format)
    }
}

fn eam_family(format: PotentialFormat) -> bool {
    matches!(
        format,
        PotentialFormat::EamFuncfl | PotentialFormat::EamAlloy | PotentialFormat::EamFs
    )
}

/// Prioritized URL tables consulted by the resolver: `direct` entries point
/// at single potential files, `archives` at zip/tar/txz bundles that need
/// extraction. User manifests (JSON) can extend both lists.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SourceTable {
    #[serde(default)]
    pub direct: Vec<SourceEntry>,
    #[serde(default)]
    pub archives: Vec<SourceEntry>,
}

impl SourceTable {
    pub fn empty() -> Self {
        Self {
            direct: Vec::new(),
            archives: Vec::new(),
        }
    }

    /// The curated sources that are known to serve real files.
    pub fn built_in() -> Self {
        let direct = vec![
            entry("Si", "sw", &["Si.sw"]),
            entry("Si", "tersoff", &["Si.tersoff", "SiC.tersoff"]),
            entry("Cu", "eam", &["Cu_u3.eam"]),
            entry("Au", "eam", &["Au_u3.eam"]),
            entry("Ag", "eam", &["Ag_u3.eam"]),
            entry("Al", "eam", &["Al_jnp.eam", "Al_mm.eam.fs"]),
            entry("Ni", "eam", &["Ni_u3.eam"]),
            entry("Pd", "eam", &["Pd_u3.eam"]),
            entry("Pt", "eam", &["Pt_u3.eam"]),
            SourceEntry {
                element: "Ti".to_string(),
                format: "meam".to_string(),
                urls: vec![
                    "https://www.ctcms.nist.gov/potentials/Download/2006--Kim-Y-M-Lee-B-J-Baskes-M-I--Ti/1/Ti.meam"
                        .to_string(),
                ],
            },
        ];
        let archives = vec![
            SourceEntry {
                element: "Ti".to_string(),
                format: String::new(),
                urls: vec![kim_archive_url(
                    "EAM_Dynamo_MishinMehlPapaconstantopoulos_2004_Ti__MO_748534961139_005",
                )],
            },
            SourceEntry {
                element: "Cu".to_string(),
                format: String::new(),
                urls: vec![kim_archive_url(
                    "EAM_Dynamo_GolaPastewka_2018_CuAu__MO_426403318662_000",
                )],
            },
        ];
        Self { direct, archives }
    }

    /// Appends another table's entries after the existing ones, preserving
    /// lookup priority of the receiver.
    pub fn merge(&mut self, other: SourceTable) {
        self.direct.extend(other.direct);
        self.archives.extend(other.archives);
    }

    pub fn direct_urls(&self, element: &str, format: PotentialFormat) -> Vec<&str> {
        matching_urls(&self.direct, element, format)
    }

    pub fn archive_urls(&self, element: &str, format: PotentialFormat) -> Vec<&str> {
        matching_urls(&self.archives, element, format)
    }
}

fn matching_urls<'table>(
    entries: &'table [SourceEntry],
    element: &str,
    format: PotentialFormat,
) -> Vec<&'table str> {
    entries
        .iter()
        .filter(|entry| entry.matches(element, format))
        .flat_map(|entry| entry.urls.iter().map(String::as_str))
        .collect()
}

fn entry(element: &str, format: &str, files: &[&str]) -> SourceEntry {
    SourceEntry {
        element: element.to_string(),
        format: format.to_string(),
        urls: files
            .iter()
            .map(|file| format!("{LAMMPS_POTENTIALS_BASE}{file}"))
            .collect(),
    }
}

/// Builds the archive download URL for an OpenKIM model id.
pub fn kim_archive_url(model_id: &str) -> String {
    format!("{OPENKIM_DOWNLOAD_BASE}{model_id}.txz")
}
