//! Ranks downloaded or extracted files by how likely each is to be the
//! potential the caller asked for.

use crate::domain::{PotentialCandidate, PotentialFormat};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Filename keywords worth +`name_keyword` each (distinct matches only, so
/// the bonus is naturally capped).
const NAME_KEYWORDS: [&str; 5] = ["potential", "eam", "sw", "tersoff", "meam"];

/// Physical-unit / domain keywords looked for in the first 1 KB of content.
const CONTENT_KEYWORDS: [&str; 4] = ["eV", "Angstrom", "lattice", "atomic"];

const CONTENT_SNIFF_BYTES: usize = 1024;

/// Additive scoring weights. The defaults encode empirically tuned domain
/// judgment, not correctness requirements; callers may override them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreWeights {
    pub ext_eam_funcfl: i32,
    pub ext_eam_alloy: i32,
    pub ext_eam_fs: i32,
    pub ext_sw: i32,
    pub ext_tersoff: i32,
    pub ext_meam: i32,
    pub ext_table: i32,
    pub ext_unknown_text: i32,
    pub element_in_name: i32,
    pub element_prefix: i32,
    pub name_keyword: i32,
    pub content_keyword: i32,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            ext_eam_funcfl: 10,
            ext_eam_alloy: 9,
            ext_eam_fs: 8,
            ext_sw: 7,
            ext_tersoff: 6,
            ext_meam: 5,
            ext_table: 2,
            ext_unknown_text: 1,
            element_in_name: 5,
            element_prefix: 3,
            name_keyword: 2,
            content_keyword: 1,
        }
    }
}

impl ScoreWeights {
    fn extension_priority(&self, name: &str, content_head: Option<&str>) -> i32 {
        let lower = name.to_ascii_lowercase();
        if lower.ends_with(".eam.alloy") {
            self.ext_eam_alloy
        } else if lower.ends_with(".eam.fs") {
            self.ext_eam_fs
        } else if lower.ends_with(".eam") {
            self.ext_eam_funcfl
        } else if lower.ends_with(".sw") {
            self.ext_sw
        } else if lower.ends_with(".tersoff") {
            self.ext_tersoff
        } else if lower.ends_with(".meam") {
            self.ext_meam
        } else if lower.ends_with(".table") {
            self.ext_table
        } else if content_head.is_some() {
            // Unrecognized but textual; binary garbage contributes nothing.
            self.ext_unknown_text
        } else {
            0
        }
    }
}

/// Computes the additive likelihood score for one file.
///
/// Content is read at most once (first 1 KB); any read failure simply
/// contributes zero instead of raising.
pub fn score(path: &Path, expected_element: &str, weights: &ScoreWeights) -> i32 {
    let name = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    let name_lower = name.to_ascii_lowercase();
    let content_head = read_text_head(path);

    let mut total = weights.extension_priority(name, content_head.as_deref());

    let element_lower = expected_element.to_ascii_lowercase();
    if !element_lower.is_empty() && name_lower.contains(&element_lower) {
        total += weights.element_in_name;
        if name_lower.starts_with(&element_lower) {
            total += weights.element_prefix;
        }
    }

    for keyword in NAME_KEYWORDS {
        if name_lower.contains(keyword) {
            total += weights.name_keyword;
        }
    }

    if let Some(head) = &content_head {
        for keyword in CONTENT_KEYWORDS {
            if head.contains(keyword) {
                total += weights.content_keyword;
            }
        }
    }

    total
}

/// Scores every path and returns candidates best-first.
///
/// Ordering is score descending with the extraction index (position in
/// `paths`) as the tie-break, so equal-scored candidates are always tried
/// in the order the archive yielded them.
pub fn rank(
    paths: &[std::path::PathBuf],
    expected_element: &str,
    weights: &ScoreWeights,
) -> Vec<PotentialCandidate> {
    let mut candidates: Vec<PotentialCandidate> = paths
        .iter()
        .enumerate()
        .map(|(extraction_index, path)| PotentialCandidate {
            path: path.clone(),
            format: PotentialFormat::from_path(path),
            score: score(path, expected_element, weights),
            element: expected_element.to_string(),
            extraction_index,
        })
        .collect();
    // stable sort: ties keep ascending extraction order
    candidates.sort_by(|a, b| b.score.cmp(&a.score));
    candidates
}

/// First 1 KB of the file as text, or `None` when unreadable or binary.
fn read_text_head(path: &Path) -> Option<String> {
    let mut buffer = [0u8; CONTENT_SNIFF_BYTES];
    let mut file = File::open(path).ok()?;
    let read = file.read(&mut buffer).ok()?;
    let head = &buffer[..read];
    if head.contains(&0) {
        return None;
    }
    Some(String::from_utf8_lossy(head).into_owned())
}

#[cfg(test)]
mod tests {
    use super::{rank, score, ScoreWeights};
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    fn touch(dir: &TempDir, name: &str, body: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, body).expect("fixture should be written");
        path
    }

    #[test]
    fn extension_and_element_bonuses_add_up() {
        let temp = TempDir::new().expect("tempdir should be created");
        let weights = ScoreWeights::default();

        // .eam (10) + element in name (5) + prefix (3) + "eam" keyword (2)
        let gold = touch(&temp, "Au_u3.eam", "1.0\n2.0\n");
        assert_eq!(score(&gold, "Au", &weights), 20);

        // same file scored for the wrong element loses the +8
        assert_eq!(score(&gold, "Cu", &weights), 12);
    }

    #[test]
    fn content_keywords_contribute_one_point_each() {
        let temp = TempDir::new().expect("tempdir should be created");
        let weights = ScoreWeights::default();

        let plain = touch(&temp, "data.table", "1.0 2.0\n");
        let annotated = touch(
            &temp,
            "notes.table",
            "# units eV, distances in Angstrom\n# lattice constant for atomic rows\n",
        );
        assert_eq!(score(&annotated, "", &weights) - score(&plain, "", &weights), 4);
    }

    #[test]
    fn binary_garbage_scores_zero_base() {
        let temp = TempDir::new().expect("tempdir should be created");
        let weights = ScoreWeights::default();
        let path = temp.path().join("blob.bin");
        fs::write(&path, [0u8, 159, 146, 150]).expect("fixture should be written");

        assert_eq!(score(&path, "", &weights), 0);
    }

    #[test]
    fn equal_scores_keep_extraction_order() {
        let temp = TempDir::new().expect("tempdir should be created");
        let weights = ScoreWeights::default();
        let first = touch(&temp, "Ni_a.eam", "1.0\n");
        let second = touch(&temp, "Ni_b.eam", "1.0\n");

        let ranked = rank(&[first.clone(), second.clone()], "Ni", &weights);
        assert_eq!(ranked[0].score, ranked[1].score);
        assert_eq!(ranked[0].path, first);
        assert_eq!(ranked[0].extraction_index, 0);
        assert_eq!(ranked[1].extraction_index, 1);

        // reversed input order flips the winner
        let ranked = rank(&[second.clone(), first], "Ni", &weights);
        assert_eq!(ranked[0].path, second);
    }

    #[test]
    fn higher_scores_rank_first() {
        let temp = TempDir::new().expect("tempdir should be created");
        let weights = ScoreWeights::default();
        let readme = touch(&temp, "readme.txt", "see the paper\n");
        let table = touch(&temp, "Au_potential.eam", "1.0\n");

        let ranked = rank(&[readme, table.clone()], "Au", &weights);
        assert_eq!(ranked[0].path, table);
    }
}
