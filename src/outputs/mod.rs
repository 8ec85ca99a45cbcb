//! Output rendering for the command line.
//!
//! - [`markdown`]: quick stats and an article listing as Markdown
//! - [`json`]: the filtered article set as pretty-printed JSON

pub mod json;
pub mod markdown;
