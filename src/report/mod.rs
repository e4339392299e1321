// Report rendering module.
// Builds the daily report page and the history index for GitHub Pages.

pub mod html;
pub mod index;

pub use html::{build_report, page_filename, save_report};
pub use index::generate_index;
