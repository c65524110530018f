use crate::navigator::{Direction, Navigator};
use crate::persist::SaveQueue;
use crate::photo::Photo;
use crate::preview::{self, PreviewFilter, Thumbnail};
use crate::store::Gallery;
use crate::tagging::{self, Tag};

/// Input events the UI turns keys and clicks into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    ToggleTag(Tag),
    Next,
    Previous,
    SetFilter(PreviewFilter),
    /// Click on a preview cell, with the collection index and id of the
    /// thumbnail that was drawn.
    OpenPreview { index: usize, id: String },
}

/// All mutable state of a review session.
pub struct Session {
    gallery: Gallery,
    navigator: Navigator,
    filter: PreviewFilter,
    scroll_to_viewer: bool,
    saves: SaveQueue,
}

impl Session {
    pub fn new(gallery: Gallery, saves: SaveQueue) -> Self {
        let navigator = Navigator::new(gallery.photos());
        Self {
            gallery,
            navigator,
            filter: PreviewFilter::default(),
            scroll_to_viewer: false,
            saves,
        }
    }

    pub fn gallery(&self) -> &Gallery {
        &self.gallery
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn filter(&self) -> PreviewFilter {
        self.filter
    }

    pub fn current(&self) -> Option<&Photo> {
        self.navigator
            .current_index()
            .and_then(|i| self.gallery.get(i))
    }

    pub fn thumbnails(&self) -> Vec<Thumbnail> {
        preview::filtered(self.gallery.photos(), self.filter)
    }

    /// Returns true once after a preview click moved the cursor.
    pub fn take_scroll_request(&mut self) -> bool {
        std::mem::take(&mut self.scroll_to_viewer)
    }

    pub fn apply(&mut self, command: Command) {
        tracing::debug!(?command, cursor = self.navigator.cursor(), "apply");
        match command {
            Command::ToggleTag(tag) => self.toggle_tag(tag),
            Command::Next => {
                self.advance(Direction::Next);
            }
            Command::Previous => {
                self.advance(Direction::Previous);
            }
            Command::SetFilter(filter) => self.filter = filter,
            Command::OpenPreview { index, id } => {
                self.open_preview(index, &id);
            }
        }
    }

    /// Toggles `tag` on the current photo. Does not move or save.
    pub fn toggle_tag(&mut self, tag: Tag) {
        let Some(index) = self.navigator.current_index() else {
            return;
        };
        self.gallery
            .update_photo(index, |p| tagging::toggle_tag(p, tag.as_str()));
        self.navigator.rebuild(self.gallery.photos());
    }

    /// Moves one step in `direction` if that stays in range. Returns whether
    /// a move happened.
    pub fn advance(&mut self, direction: Direction) -> bool {
        match self.navigator.target(direction) {
            Some(target) => {
                self.save_and_move(target);
                true
            }
            None => false,
        }
    }

    /// Marks the current photo reviewed, queues a save of the resulting
    /// collection and puts the cursor on `target`.
    pub fn save_and_move(&mut self, target: usize) {
        let Some(index) = self.navigator.current_index() else {
            return;
        };
        self.gallery.update_photo(index, Photo::marked_fixed);
        tracing::debug!(index, to = target, revision = self.gallery.revision(), "marked fixed");
        self.navigator.rebuild(self.gallery.photos());
        self.saves.enqueue(self.gallery.snapshot());
        self.navigator.set_cursor(target);
    }

    /// Jumps to the photo behind a clicked preview cell. `index` is trusted
    /// only while the record there still has `id`; otherwise the id table
    /// decides. Clicks that no longer resolve to a record are ignored.
    pub fn open_preview(&mut self, index: usize, id: &str) -> bool {
        let resolved = match self.gallery.get(index) {
            Some(p) if p.id == id => Some(index),
            _ => self.navigator.index_of_id(id),
        };
        let Some(pos) = resolved.and_then(|i| self.navigator.position_of(i)) else {
            tracing::debug!(index, id, "preview click did not resolve");
            return false;
        };
        self.navigator.set_cursor(pos);
        self.scroll_to_viewer = true;
        true
    }
}
