/// The whole user-facing surface: settings sidebar, client details, upload
/// controls, submit button and status area. The file inputs are only cleared
/// by the page after an accepted submit, so a failed one can be retried as-is.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");
