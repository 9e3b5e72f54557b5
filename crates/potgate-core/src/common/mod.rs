pub mod elements;

pub use elements::{detect_in_filename, normalize_symbol, ELEMENT_SYMBOLS};
