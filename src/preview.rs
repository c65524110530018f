use crate::photo::Photo;
use crate::tagging::Tag;

const DEFAULT_THUMB_WIDTH: u32 = 400;
const DEFAULT_THUMB_HEIGHT: u32 = 300;

/// Which records the preview grid shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PreviewFilter {
    #[default]
    All,
    Tag(Tag),
    /// Records carrying the sentinel and nothing else.
    Untagged,
}

impl PreviewFilter {
    /// Filter buttons in display order.
    pub const OPTIONS: [PreviewFilter; 7] = [
        PreviewFilter::All,
        PreviewFilter::Tag(Tag::Portrait),
        PreviewFilter::Tag(Tag::Nature),
        PreviewFilter::Tag(Tag::Landscape),
        PreviewFilter::Tag(Tag::Urban),
        PreviewFilter::Tag(Tag::Documentary),
        PreviewFilter::Untagged,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PreviewFilter::All => "All",
            PreviewFilter::Tag(tag) => tag.as_str(),
            PreviewFilter::Untagged => "Untagged",
        }
    }

    pub fn matches(self, photo: &Photo) -> bool {
        match self {
            PreviewFilter::All => true,
            PreviewFilter::Untagged => photo.tags.len() == 1,
            PreviewFilter::Tag(tag) => photo.has_tag(tag.as_str()),
        }
    }
}

/// Grid cell for one record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    /// Collection index of the record at the time the list was derived.
    pub index: usize,
    pub id: String,
    pub src: String,
    pub width: u32,
    pub height: u32,
    pub alt: String,
}

/// Prefers the first alternate rendition, else the primary image.
pub fn thumbnail_for(index: usize, photo: &Photo) -> Thumbnail {
    let (src, width, height) = match photo.src_set.as_ref().and_then(|set| set.first()) {
        Some(alt) => (alt.src.clone(), alt.width, alt.height),
        None => (
            photo.src.clone(),
            photo.width.filter(|&w| w > 0).unwrap_or(DEFAULT_THUMB_WIDTH),
            photo.height.filter(|&h| h > 0).unwrap_or(DEFAULT_THUMB_HEIGHT),
        ),
    };
    Thumbnail {
        index,
        id: photo.id.clone(),
        src,
        width,
        height,
        alt: photo.alt.clone(),
    }
}

pub fn filtered(photos: &[Photo], filter: PreviewFilter) -> Vec<Thumbnail> {
    photos
        .iter()
        .enumerate()
        .filter(|(_, p)| filter.matches(p))
        .map(|(i, p)| thumbnail_for(i, p))
        .collect()
}
