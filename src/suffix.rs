//! Download URL grammar: building and parsing the `/<id>/<filename>` suffix.
//!
//! The download endpoint hides the repository structure behind a stable
//! static path, so the only client-visible coordinates of an asset are its
//! opaque id and its filename. This module owns that grammar in both
//! directions: [`download_url`] builds public URLs for the view models and
//! [`parse_suffix`] validates incoming request suffixes.

use crate::error::DownloadRejection;
use crate::utils::is_blank;

/// The static base path of the download endpoint
pub const DOWNLOAD_PATH: &str = "/bin/download";

/// The extension of the download endpoint
pub const DOWNLOAD_EXTENSION: &str = "file";

const SUFFIX_SEPARATOR: char = '/';

/// A well-formed download suffix: the opaque asset id and the filename.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DownloadSuffix {
    /// Opaque asset identifier
    pub id: String,
    /// Filename as carried in the URL
    pub filename: String,
}

/// Parses the request suffix into `(id, filename)`.
///
/// The suffix is well-formed iff splitting on `/` (preserving empty segments)
/// yields exactly three parts: an empty leading segment from the leading
/// slash, a non-blank id, and a non-blank filename. No normalization and no
/// decoding happen here; the HTTP layer has already percent-decoded the path.
pub fn parse_suffix(suffix: &str) -> Result<DownloadSuffix, DownloadRejection> {
    let malformed = || DownloadRejection::MalformedSuffix {
        suffix: suffix.to_string(),
    };

    if is_blank(suffix) {
        return Err(malformed());
    }

    let parts: Vec<&str> = suffix.split(SUFFIX_SEPARATOR).collect();
    let [lead, id, filename] = parts.as_slice() else {
        return Err(malformed());
    };

    if !lead.is_empty() || is_blank(id) || is_blank(filename) {
        return Err(malformed());
    }

    Ok(DownloadSuffix {
        id: id.to_string(),
        filename: filename.to_string(),
    })
}

/// Builds the public download URL for an asset, or `None` when either part
/// is blank (a blank part would produce a URL the endpoint rejects anyway).
pub fn download_url(id: &str, filename: &str) -> Option<String> {
    if is_blank(id) || is_blank(filename) {
        tracing::error!(
            id,
            filename,
            "missing required information for a download URL"
        );
        return None;
    }
    Some(format!(
        "{DOWNLOAD_PATH}.{DOWNLOAD_EXTENSION}/{id}/{filename}"
    ))
}
