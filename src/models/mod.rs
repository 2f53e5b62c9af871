//! View-model assemblers for the content components.
//!
//! A view model gathers the display data one page component needs: it
//! consumes an asset handle plus the component's own authored properties and
//! exposes flat, serializable fields to templates. Missing inputs produce
//! omitted fields, never errors.

pub mod download;
pub mod video;

pub use download::{ComponentStyle, DownloadModel, DownloadProps, DownloadSource, UploadedFile};
pub use video::{ALLOWED_VIDEO_MIME_TYPES, PRELOAD_DEFAULT_NONE, VideoModel, VideoProps, VideoSource};

/// Returns the preferred value: the asset-provided one when the component is
/// configured to take it from the asset and it is non-blank, otherwise the
/// component's own property.
pub(crate) fn prefer_asset_value(
    from_asset: bool,
    asset_value: Option<&str>,
    own_value: Option<String>,
) -> Option<String> {
    if from_asset {
        if let Some(value) = asset_value {
            if !crate::utils::is_blank(value) {
                return Some(value.to_string());
            }
        }
    }
    own_value
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_value_wins_only_when_flagged_and_non_blank() {
        assert_eq!(
            prefer_asset_value(true, Some("Asset Title"), Some("Own".into())),
            Some("Asset Title".to_string())
        );
        assert_eq!(
            prefer_asset_value(false, Some("Asset Title"), Some("Own".into())),
            Some("Own".to_string())
        );
        assert_eq!(
            prefer_asset_value(true, Some("   "), Some("Own".into())),
            Some("Own".to_string())
        );
        assert_eq!(prefer_asset_value(true, None, None), None);
    }
}
