//! Declared response schema for the `mediaItems` listing endpoint.
//!
//! Decoded and validated once at the API boundary. Only the fields this
//! tool reads are declared; everything else in the response is ignored.
//!
//! See: <https://developers.google.com/photos/library/reference/rest/v1/mediaItems/list>

use serde::Deserialize;

/// Wire shape of one listing response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PageBody {
    /// Items in this batch. The API omits the field entirely on an empty
    /// page, so absence decodes as an empty vec.
    #[serde(default)]
    pub media_items: Vec<MediaItem>,
    /// Continuation cursor. Absent on the last page.
    pub next_page_token: Option<String>,
}

/// One batch of listing results plus pagination bookkeeping.
///
/// `page_token` records the cursor that was *used to fetch* this page (so
/// the first page carries `None`), while `next_page_token` is the cursor
/// the endpoint handed back for the following page. A page without a
/// continuation cursor is the last page.
#[derive(Debug)]
pub struct Page {
    /// Cursor this page was fetched with.
    pub page_token: Option<String>,
    /// Media items in this page, in API order.
    pub media_items: Vec<MediaItem>,
    /// Cursor for the next page, when one exists.
    pub next_page_token: Option<String>,
}

impl Page {
    pub(crate) fn from_body(page_token: Option<String>, body: PageBody) -> Self {
        Self {
            page_token,
            media_items: body.media_items,
            next_page_token: body.next_page_token,
        }
    }

    /// Whether the endpoint advertised a continuation cursor.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.next_page_token.is_some()
    }
}

/// A single photo or video record.
///
/// `base_url` is a capability URL: fetching actual bytes requires a size
/// suffix (see the download module).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaItem {
    /// Stable item identifier.
    pub id: String,
    /// User-supplied description, when present.
    #[serde(default)]
    pub description: Option<String>,
    /// Link to the item in the Google Photos UI.
    pub product_url: String,
    /// Capability URL for the item's bytes.
    pub base_url: String,
    /// MIME type, e.g. `image/jpeg`.
    pub mime_type: String,
    /// Original upload filename.
    pub filename: String,
    /// Nested capture metadata.
    pub media_metadata: MediaMetadata,
}

/// Capture metadata nested inside a media item.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaMetadata {
    /// Capture timestamp, RFC 3339.
    pub creation_time: String,
    /// Pixel width, as a decimal string (the API's convention).
    #[serde(default)]
    pub width: Option<String>,
    /// Pixel height, as a decimal string.
    #[serde(default)]
    pub height: Option<String>,
    /// Photo-specific camera metadata, when the item is a photo.
    #[serde(default)]
    pub photo: Option<PhotoMetadata>,
    /// Video-specific metadata, when the item is a video.
    #[serde(default)]
    pub video: Option<VideoMetadata>,
}

/// Camera metadata for photos. Every field is optional on the wire.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhotoMetadata {
    /// Camera manufacturer.
    #[serde(default)]
    pub camera_make: Option<String>,
    /// Camera model.
    #[serde(default)]
    pub camera_model: Option<String>,
    /// Focal length in millimetres.
    #[serde(default)]
    pub focal_length: Option<f64>,
    /// Aperture f-number.
    #[serde(default)]
    pub aperture_f_number: Option<f64>,
    /// ISO equivalent.
    #[serde(default)]
    pub iso_equivalent: Option<u64>,
    /// Exposure time, e.g. `"1/250"`.
    #[serde(default)]
    pub exposure_time: Option<String>,
}

/// Metadata for videos.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoMetadata {
    /// Camera manufacturer.
    #[serde(default)]
    pub camera_make: Option<String>,
    /// Camera model.
    #[serde(default)]
    pub camera_model: Option<String>,
    /// Frame rate.
    #[serde(default)]
    pub fps: Option<f64>,
    /// Server-side processing status.
    #[serde(default)]
    pub status: Option<String>,
}
