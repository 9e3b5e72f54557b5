//! Periodic-table symbol lookups used for element detection in filenames.

/// Element symbols indexed by atomic number minus one (H..Og).
pub const ELEMENT_SYMBOLS: [&str; 118] = [
    "H", "He", "Li", "Be", "B", "C", "N", "O", "F", "Ne", "Na", "Mg", "Al", "Si", "P", "S", "Cl",
    "Ar", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge", "As",
    "Se", "Br", "Kr", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd",
    "In", "Sn", "Sb", "Te", "I", "Xe", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu",
    "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt",
    "Au", "Hg", "Tl", "Pb", "Bi", "Po", "At", "Rn", "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np",
    "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs",
    "Mt", "Ds", "Rg", "Cn", "Nh", "Fl", "Mc", "Lv", "Ts", "Og",
];

/// Canonicalizes a symbol's capitalization and checks it against the table.
pub fn normalize_symbol(symbol: &str) -> Option<&'static str> {
    let trimmed = symbol.trim();
    if trimmed.is_empty() || trimmed.len() > 2 {
        return None;
    }
    ELEMENT_SYMBOLS
        .iter()
        .find(|known| known.eq_ignore_ascii_case(trimmed))
        .copied()
}

/// Guesses the element a potential file is for from its filename.
///
/// The stem is split on non-alphabetic characters and each token is matched
/// against the symbol table. Exact-case prefixes win over case-insensitive
/// ones so that `potential_Au.eam` reports gold rather than polonium, and
/// two-letter symbols are tried before one-letter ones so that `CuAu` is
/// not reported as carbon. Earlier tokens win: files are conventionally
/// named `<element>_<provenance>.<format>`.
pub fn detect_in_filename(filename: &str) -> Option<&'static str> {
    let stem = filename.split('.').next().unwrap_or(filename);
    let tokens: Vec<&str> = stem
        .split(|c: char| !c.is_ascii_alphabetic())
        .filter(|token| !token.is_empty())
        .collect();

    for token in &tokens {
        if let Some(symbol) = match_token(token, true) {
            return Some(symbol);
        }
    }
    for token in &tokens {
        if let Some(symbol) = match_token(token, false) {
            return Some(symbol);
        }
    }
    None
}

fn match_token(token: &str, exact_case: bool) -> Option<&'static str> {
    let lengths = [2usize, 1usize];
    for len in lengths {
        if token.len() < len {
            continue;
        }
        let prefix = &token[..len];
        let matched = ELEMENT_SYMBOLS.iter().find(|known| {
            if exact_case {
                **known == prefix
            } else {
                known.eq_ignore_ascii_case(prefix)
            }
        });
        if let Some(symbol) = matched {
            return Some(symbol);
        }
    }
    None
}
