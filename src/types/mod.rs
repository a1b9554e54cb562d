// ABOUTME: Validated domain types shared by packaging and deployment.
// ABOUTME: Covers site names and timestamped archive names.

mod archive_name;
mod site_name;

pub use archive_name::{ARCHIVE_EXTENSION, ArchiveName, ArchiveNameError, TIMESTAMP_FORMAT};
pub use site_name::{SiteName, SiteNameError};
