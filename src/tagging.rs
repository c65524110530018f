use crate::photo::{Photo, SENTINEL_TAG};

/// Fixed tagging vocabulary, in key-binding order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Portrait,
    Nature,
    Landscape,
    Urban,
    Documentary,
}

impl Tag {
    pub const ALL: [Tag; 5] = [
        Tag::Portrait,
        Tag::Nature,
        Tag::Landscape,
        Tag::Urban,
        Tag::Documentary,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::Portrait => "portrait",
            Tag::Nature => "nature",
            Tag::Landscape => "landscape",
            Tag::Urban => "urban",
            Tag::Documentary => "documentary",
        }
    }

    /// Digit key bound to this tag.
    pub fn digit(self) -> char {
        match self {
            Tag::Portrait => '1',
            Tag::Nature => '2',
            Tag::Landscape => '3',
            Tag::Urban => '4',
            Tag::Documentary => '5',
        }
    }

    pub fn from_digit(digit: char) -> Option<Tag> {
        Tag::ALL.into_iter().find(|t| t.digit() == digit)
    }
}

/// Flips membership of `tag` on a copy of `photo`.
///
/// The sentinel cannot be toggled. A present tag is removed entirely
/// (every duplicate), an absent one is appended, and the result always
/// starts with the sentinel if it was missing.
pub fn toggle_tag(photo: &Photo, tag: &str) -> Photo {
    let mut next = photo.clone();
    if tag == SENTINEL_TAG {
        return next;
    }
    if next.has_tag(tag) {
        next.tags.retain(|t| t != tag);
    } else {
        next.tags.push(tag.to_string());
    }
    next.ensure_sentinel();
    next
}
