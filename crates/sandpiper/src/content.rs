mod collections;
mod front_matter;
mod page;
mod post;
mod repository;
mod sorting;

use std::path::Path;

pub use collections::*;
pub use front_matter::*;
pub use page::*;
pub use post::*;
pub use repository::*;
pub use sorting::*;

/// Returns the slug for the content file at the given path: its file stem.
pub(crate) fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .filter(|stem| !stem.is_empty())
        .map(ToOwned::to_owned)
}
