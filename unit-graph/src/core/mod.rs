//! Pipeline plumbing: source discovery, line scanning, summaries.

pub mod fs_scan;
pub mod normalize;
pub mod scanner;
pub mod summary;
pub mod traits;
pub mod vpath;
