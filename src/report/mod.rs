/// Renders resolutions and candidate listings as text or JSON.
pub mod formatter;

pub use formatter::{
    format_identity, format_matches_as_text, format_resolution_as_json,
    format_resolution_as_text, format_summary_as_text, NOT_FOUND_MESSAGE,
};
