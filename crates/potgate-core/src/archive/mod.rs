mod extract;
mod inspect;

pub use extract::extract;
pub use inspect::{classify, is_archive, is_archive_url};
