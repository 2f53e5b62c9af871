//! Video component view model.

use crate::store::{AssetHandle, Rendition};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

/// MIME types the `<video>` element is given sources for.
pub const ALLOWED_VIDEO_MIME_TYPES: [&str; 5] = [
    "video/3gpp",
    "video/x-flv",
    "video/mp4",
    "video/ogg",
    "video/webm",
];

/// Default value of the `preload` attribute
pub const PRELOAD_DEFAULT_NONE: &str = "none";

/// Authored properties of the video component.
#[derive(Clone, Debug)]
pub struct VideoProps {
    /// Authored title
    pub title: Option<String>,
    /// Authored description
    pub description: Option<String>,
    /// Take the title from the asset metadata when non-blank
    pub title_from_asset: bool,
    /// Take the description from the asset metadata when non-blank
    pub description_from_asset: bool,
    /// Render without player controls
    pub hide_control: bool,
    /// Loop playback
    pub loop_enabled: bool,
    /// Start playback automatically (implies muted in browsers)
    pub autoplay: bool,
    /// Value for the `preload` attribute
    pub preload: String,
}

impl Default for VideoProps {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            title_from_asset: false,
            description_from_asset: false,
            hide_control: false,
            loop_enabled: false,
            autoplay: false,
            preload: PRELOAD_DEFAULT_NONE.to_string(),
        }
    }
}

/// One `<source>` entry of the video element.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, ToSchema)]
pub struct VideoSource {
    /// URL of the rendition
    pub src: String,
    /// MIME type of the rendition
    #[serde(rename = "type")]
    pub mime_type: String,
}

/// Flat view of the video component, ready for template consumption.
#[derive(Clone, Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VideoModel {
    /// Playable sources, best first; empty when the asset is unusable
    pub sources: Vec<VideoSource>,

    /// Poster image URL, when a non-original image rendition exists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,

    /// Display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Display description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Hide the player controls
    pub hide_control: bool,

    /// Loop playback
    #[serde(rename = "loop")]
    pub loop_enabled: bool,

    /// Start playback automatically
    pub autoplay: bool,

    /// `preload` attribute value
    pub preload: String,
}

impl VideoModel {
    /// Assembles the model from an optional asset plus component properties.
    ///
    /// A missing asset, a blank original MIME type, or a type outside
    /// [`ALLOWED_VIDEO_MIME_TYPES`] all yield a model with no sources; the
    /// authored attributes are carried regardless so the empty player still
    /// renders consistently.
    pub fn build(asset: Option<Arc<dyn AssetHandle>>, props: &VideoProps) -> Self {
        let mut model = Self {
            sources: Vec::new(),
            poster: None,
            title: props.title.clone(),
            description: props.description.clone(),
            hide_control: props.hide_control,
            loop_enabled: props.loop_enabled,
            autoplay: props.autoplay,
            preload: props.preload.clone(),
        };

        let Some(asset) = asset else {
            return model;
        };

        let metadata = asset.metadata();
        model.title = super::prefer_asset_value(
            props.title_from_asset,
            metadata.title.as_deref(),
            model.title.take(),
        );
        model.description = super::prefer_asset_value(
            props.description_from_asset,
            metadata.description.as_deref(),
            model.description.take(),
        );
        let Some(original) = asset.original() else {
            tracing::error!(id = %asset.id(), "asset has no original rendition");
            return model;
        };

        let original_mime = original.mime_type();
        if crate::utils::is_blank(original_mime) || !is_allowed_mime(original_mime) {
            tracing::error!(
                id = %asset.id(),
                mime_type = %original_mime,
                "asset type is not an allowed video type"
            );
            return model;
        }

        model.sources.push(source_for(&original));
        for rendition in asset.renditions() {
            let mime = rendition.mime_type();
            if mime != original_mime && is_allowed_mime(mime) {
                model.sources.push(source_for(&rendition));
            }
        }

        model.poster = asset
            .image_preview()
            .filter(|r| r.path() != original.path())
            .map(|r| r.path().to_string());

        model
    }
}

fn is_allowed_mime(mime: &str) -> bool {
    ALLOWED_VIDEO_MIME_TYPES
        .iter()
        .any(|allowed| allowed.eq_ignore_ascii_case(mime))
}

fn source_for(rendition: &Arc<dyn Rendition>) -> VideoSource {
    VideoSource {
        src: rendition.path().to_string(),
        mime_type: rendition.mime_type().to_string(),
    }
}
