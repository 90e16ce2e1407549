//! # Primitives
//!
//! Hardcoded runtime constants for the Verdant core.
//!
//! These values are compiled into the binary. The app layer may override the
//! ones marked as defaults through its configuration.

/// Filter value that disables category filtering.
pub const ALL_CATEGORIES: &str = "all";

/// Sort key the marketplace starts with.
pub const DEFAULT_SORT_KEY: &str = "price";

/// Category preselected on a fresh upload draft.
pub const DEFAULT_UPLOAD_CATEGORY: &str = "reforestation";

/// Default delay between submitting an upload and reaching the
/// completion step, in milliseconds.
pub const PROCESSING_DELAY_MS: u64 = 2000;

/// Substring of a content type that classifies an attachment as an image.
pub const IMAGE_CONTENT_MARKER: &str = "image";

/// Bytes in one mebibyte.
pub const BYTES_PER_MIB: u64 = 1024 * 1024;

// =============================================================================
// INPUT VALIDATION LIMITS
// =============================================================================

/// Maximum length for a single form field value.
///
/// The upload draft rejects longer values.
pub const MAX_FIELD_LENGTH: usize = 4096;

/// Maximum length for an attachment display name.
pub const MAX_ATTACHMENT_NAME_LENGTH: usize = 255;

/// Maximum number of attachments accepted in one request.
pub const MAX_ATTACHMENTS_PER_REQUEST: usize = 50;
