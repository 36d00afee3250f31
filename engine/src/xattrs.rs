//! Extended-attribute access.
//!
//! The source attribute is whatever the NTFS driver exposed; the two
//! destination attributes are this tool's own contract, consumed by
//! file-manager display plugins. Platform errors (attribute missing,
//! unsupported filesystem, permission denied) degrade to absence or a
//! recorded warning; they never abort a run.

use std::path::Path;

use crate::crtime::TimestampRecord;

/// Creation-time attribute set by the NTFS driver on the source.
pub const SOURCE_CRTIME_ATTR: &str = "system.ntfs_crtime";

/// Destination attribute holding the canonical 8-byte little-endian ticks.
pub const DEST_RAW_ATTR: &str = "user.ntfs_crtime";

/// Destination attribute holding the long-format UTF-8 string.
pub const DEST_READABLE_ATTR: &str = "user.ntfs_crtime_readable";

/// Fetch the source creation-time attribute.
///
/// Any retrieval error is treated as "no timestamp available".
pub fn read_source_timestamp(path: &Path) -> Option<Vec<u8>> {
    xattr::get(path, SOURCE_CRTIME_ATTR).ok().flatten()
}

/// Attach both derived attributes to a copied destination file.
///
/// Returns false if either set fails. The caller records this as a
/// warning-level outcome: the file content is already committed, so
/// attribute loss must not fail the copy.
pub fn write_destination_attributes(path: &Path, record: &TimestampRecord) -> bool {
    let raw_ok = xattr::set(path, DEST_RAW_ATTR, &record.raw).is_ok();
    let readable_ok = xattr::set(path, DEST_READABLE_ATTR, record.readable.as_bytes()).is_ok();
    raw_ok && readable_ok
}
