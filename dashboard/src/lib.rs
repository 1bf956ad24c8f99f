//! lotwatch dashboard – backend access, report submission, detection
//! listing and text rendering for the `lotwatch` command.

pub mod api;
pub mod listing;
pub mod render;
pub mod report;

#[cfg(test)]
mod stub;
