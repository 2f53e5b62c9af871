//! `Content-Disposition` header formatting for download responses.

use crate::utils::is_blank;

const ATTACHMENT_DISPOSITION: &str = "attachment";
const INLINE_DISPOSITION: &str = "inline";

/// Produces the `Content-Disposition` header value for a download response.
///
/// With `force_download` the disposition is `attachment`, carrying the
/// filename when one is present; otherwise the file is served `inline` and
/// the filename is ignored.
///
/// The filename is not quote-escaped. Callers reject malformed filenames
/// upstream: a blank filename never reaches a successful response because the
/// endpoint turns it into a 404 during suffix parsing.
pub fn content_disposition(force_download: bool, filename: &str) -> String {
    if !force_download {
        return INLINE_DISPOSITION.to_string();
    }
    if is_blank(filename) {
        return ATTACHMENT_DISPOSITION.to_string();
    }
    format!("{ATTACHMENT_DISPOSITION}; filename=\"{filename}\"")
}
