//! Download component view model.

use crate::store::AssetHandle;
use crate::suffix::download_url;
use crate::utils::{byte_count_to_display_size, is_blank};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

const JPEG_EXTENSION: &str = ".jpeg";
const IMAGE_SERVLET_EXTENSION: &str = ".coreimg.jpeg";

/// What the download component points at.
///
/// The two modes have overlapping but not identical metadata sources, so the
/// distinction is an explicit variant instead of a nullable reference: a
/// referenced managed asset carries its own id, filename, and metadata, while
/// an uploaded file child only has what was stored with the upload.
pub enum DownloadSource {
    /// A managed asset referenced by the component
    Asset(Arc<dyn AssetHandle>),
    /// A file uploaded directly onto the component
    UploadedFile(UploadedFile),
}

/// Data available for a file uploaded directly onto the component.
#[derive(Clone, Debug, Default)]
pub struct UploadedFile {
    /// Identifier of the uploaded file's content node, when assigned
    pub id: Option<String>,
    /// Stored filename
    pub filename: Option<String>,
    /// Content type recorded at upload time
    pub content_type: Option<String>,
    /// Raw size in bytes, when recorded
    pub size_bytes: Option<u64>,
}

/// Authored properties of the download component itself.
#[derive(Clone, Debug, Default)]
pub struct DownloadProps {
    /// Resolved resource path of the component (for the thumbnail URL)
    pub resource_path: String,
    /// Authored title
    pub title: Option<String>,
    /// Authored description
    pub description: Option<String>,
    /// Authored call-to-action text
    pub action_text: Option<String>,
    /// Take the title from the asset metadata when non-blank
    pub title_from_asset: bool,
    /// Take the description from the asset metadata when non-blank
    pub description_from_asset: bool,
    /// Last-modified stamp of the component node, epoch milliseconds
    pub last_modified_ms: Option<i64>,
}

/// Style/policy values inherited by the component.
#[derive(Clone, Debug, Default)]
pub struct ComponentStyle {
    /// Default call-to-action text when the component has none
    pub action_text: Option<String>,
    /// Heading element to use for the title (e.g. "h3")
    pub title_type: Option<String>,
    /// Show the thumbnail image
    pub display_image: bool,
    /// Show the file size
    pub display_size: bool,
    /// Show the file format
    pub display_format: bool,
    /// Show the filename
    pub display_filename: bool,
}

/// Flat view of the download component, ready for template consumption.
#[derive(Clone, Debug, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DownloadModel {
    /// Public URL of the file download endpoint for this asset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,

    /// Display title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Display description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Call-to-action text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub action_text: Option<String>,

    /// Thumbnail URL with a cache-busting last-modified segment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_path: Option<String>,

    /// Heading element for the title
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_type: Option<String>,

    /// Filename of the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,

    /// Declared format of the file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,

    /// Human-readable size, present iff a raw byte count is available
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,

    /// Whether templates should render the thumbnail
    pub display_image: bool,
    /// Whether templates should render the size
    pub display_size: bool,
    /// Whether templates should render the format
    pub display_format: bool,
    /// Whether templates should render the filename
    pub display_filename: bool,
}

impl DownloadModel {
    /// Assembles the model from a tagged source plus component properties
    /// and optional style values.
    pub fn build(
        source: DownloadSource,
        props: &DownloadProps,
        style: Option<&ComponentStyle>,
    ) -> Self {
        let mut model = Self {
            title: props.title.clone(),
            description: props.description.clone(),
            action_text: props.action_text.clone(),
            ..Self::default()
        };

        if let Some(style) = style {
            if model.action_text.as_deref().is_none_or(is_blank) {
                model.action_text = style.action_text.clone();
            }
            model.title_type = style.title_type.clone();
            model.display_image = style.display_image;
            model.display_size = style.display_size;
            model.display_format = style.display_format;
            model.display_filename = style.display_filename;
        }

        match source {
            DownloadSource::Asset(asset) => model.fill_from_asset(&asset, props),
            DownloadSource::UploadedFile(file) => model.fill_from_uploaded_file(&file),
        }
        model
    }

    fn fill_from_asset(&mut self, asset: &Arc<dyn AssetHandle>, props: &DownloadProps) {
        let mut last_modified = props.last_modified_ms.unwrap_or(0);
        if let Some(asset_modified) = asset.last_modified_ms() {
            last_modified = last_modified.max(asset_modified);
        }

        self.filename = Some(asset.filename().to_string());
        self.download_url = download_url(asset.id(), asset.filename());

        let metadata = asset.metadata();
        self.format = metadata.format.clone();
        self.size = metadata.size_bytes.map(byte_count_to_display_size);

        let mut image_path = format!("{}{}", props.resource_path, IMAGE_SERVLET_EXTENSION);
        if last_modified > 0 {
            image_path.push_str(&format!("/{last_modified}{JPEG_EXTENSION}"));
        }
        self.image_path = Some(image_path);

        self.title = super::prefer_asset_value(
            props.title_from_asset,
            metadata.title.as_deref(),
            self.title.take(),
        );
        self.description = super::prefer_asset_value(
            props.description_from_asset,
            metadata.description.as_deref(),
            self.description.take(),
        );
    }

    fn fill_from_uploaded_file(&mut self, file: &UploadedFile) {
        self.filename = file.filename.clone();
        self.download_url = match (&file.id, &file.filename) {
            (Some(id), Some(filename)) => download_url(id, filename),
            _ => None,
        };
        self.format = file.content_type.clone();
        self.size = file.size_bytes.map(byte_count_to_display_size);
    }
}

// unwrap/expect are acceptable in tests for concise failure-on-error assertions
#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::AssetMetadata;
    use crate::store::memory::MemoryAsset;

    fn pdf_asset() -> Arc<dyn AssetHandle> {
        Arc::new(
            MemoryAsset::new(
                "8d7e96d4-501a-4ade-93d5-a5956b13a5df",
                "Download_Test_PDF.pdf",
                "application/pdf",
                b"%PDF-1.4".to_vec(),
            )
            .with_last_modified_ms(1_500_000)
            .with_metadata(AssetMetadata {
                title: Some("Asset Title".into()),
                description: Some("Asset description".into()),
                format: Some("application/pdf".into()),
                size_bytes: Some(5 * 1024 * 1024),
            }),
        )
    }

    fn props() -> DownloadProps {
        DownloadProps {
            resource_path: "/content/page/jcr:content/par/download".into(),
            title: Some("Component Title".into()),
            description: Some("Component description".into()),
            last_modified_ms: Some(1_000_000),
            ..DownloadProps::default()
        }
    }

    #[test]
    fn asset_mode_builds_url_size_and_thumbnail() {
        let model = DownloadModel::build(DownloadSource::Asset(pdf_asset()), &props(), None);

        assert_eq!(
            model.download_url.as_deref(),
            Some("/bin/download.file/8d7e96d4-501a-4ade-93d5-a5956b13a5df/Download_Test_PDF.pdf")
        );
        assert_eq!(model.filename.as_deref(), Some("Download_Test_PDF.pdf"));
        assert_eq!(model.format.as_deref(), Some("application/pdf"));
        assert_eq!(model.size.as_deref(), Some("5 MB"));
        // Asset stamp (1_500_000) is newer than the component stamp
        assert_eq!(
            model.image_path.as_deref(),
            Some("/content/page/jcr:content/par/download.coreimg.jpeg/1500000.jpeg")
        );
    }

    #[test]
    fn component_stamp_wins_when_newer() {
        let mut props = props();
        props.last_modified_ms = Some(2_000_000);
        let model = DownloadModel::build(DownloadSource::Asset(pdf_asset()), &props, None);
        assert!(
            model
                .image_path
                .unwrap()
                .ends_with(".coreimg.jpeg/2000000.jpeg")
        );
    }

    #[test]
    fn missing_timestamps_omit_the_cache_busting_segment() {
        let asset: Arc<dyn AssetHandle> = Arc::new(MemoryAsset::new(
            "id-1",
            "a.pdf",
            "application/pdf",
            vec![],
        ));
        let mut props = props();
        props.last_modified_ms = None;
        let model = DownloadModel::build(DownloadSource::Asset(asset), &props, None);
        assert_eq!(
            model.image_path.as_deref(),
            Some("/content/page/jcr:content/par/download.coreimg.jpeg")
        );
    }

    #[test]
    fn title_and_description_prefer_asset_metadata_when_flagged() {
        let mut props = props();
        props.title_from_asset = true;
        props.description_from_asset = true;
        let model = DownloadModel::build(DownloadSource::Asset(pdf_asset()), &props, None);
        assert_eq!(model.title.as_deref(), Some("Asset Title"));
        assert_eq!(model.description.as_deref(), Some("Asset description"));

        let model = DownloadModel::build(DownloadSource::Asset(pdf_asset()), &self::props(), None);
        assert_eq!(model.title.as_deref(), Some("Component Title"));
    }

    #[test]
    fn style_supplies_action_text_and_display_flags() {
        let style = ComponentStyle {
            action_text: Some("Download now".into()),
            title_type: Some("h3".into()),
            display_image: true,
            display_size: true,
            display_format: false,
            display_filename: true,
        };
        let mut props = props();
        props.action_text = None;
        let model = DownloadModel::build(DownloadSource::Asset(pdf_asset()), &props, Some(&style));
        assert_eq!(model.action_text.as_deref(), Some("Download now"));
        assert_eq!(model.title_type.as_deref(), Some("h3"));
        assert!(model.display_image);
        assert!(!model.display_format);

        // An authored action text is not overridden by the style
        props.action_text = Some("Grab it".into());
        let model = DownloadModel::build(DownloadSource::Asset(pdf_asset()), &props, Some(&style));
        assert_eq!(model.action_text.as_deref(), Some("Grab it"));
    }

    #[test]
    fn uploaded_file_mode_uses_recorded_fields() {
        let file = UploadedFile {
            id: Some("upload-1".into()),
            filename: Some("notes.txt".into()),
            content_type: Some("text/plain".into()),
            size_bytes: Some(2048),
        };
        let model = DownloadModel::build(DownloadSource::UploadedFile(file), &props(), None);
        assert_eq!(
            model.download_url.as_deref(),
            Some("/bin/download.file/upload-1/notes.txt")
        );
        assert_eq!(model.format.as_deref(), Some("text/plain"));
        assert_eq!(model.size.as_deref(), Some("2 KB"));
        // Uploaded files carry no thumbnail
        assert!(model.image_path.is_none());
    }

    #[test]
    fn url_is_omitted_when_id_or_filename_is_missing() {
        let file = UploadedFile {
            id: None,
            filename: Some("notes.txt".into()),
            ..UploadedFile::default()
        };
        let model = DownloadModel::build(DownloadSource::UploadedFile(file), &props(), None);
        assert!(model.download_url.is_none());

        let no_size = UploadedFile {
            id: Some("upload-1".into()),
            filename: Some("notes.txt".into()),
            ..UploadedFile::default()
        };
        let model = DownloadModel::build(DownloadSource::UploadedFile(no_size), &props(), None);
        assert!(model.size.is_none(), "size must be omitted without a byte count");
    }

    #[test]
    fn serialization_omits_absent_fields_and_uses_camel_case() {
        let model = DownloadModel::build(DownloadSource::Asset(pdf_asset()), &props(), None);
        let value = serde_json::to_value(&model).unwrap();
        assert!(value.get("downloadUrl").is_some());
        assert!(value.get("titleType").is_none());
        assert_eq!(value["displayImage"], false);
    }
}
