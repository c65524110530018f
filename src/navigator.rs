use std::collections::HashMap;

use crate::photo::Photo;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Previous,
    Next,
}

/// Unreviewed photos first, then fixed ones, each group in collection order.
pub fn display_order(photos: &[Photo]) -> Vec<usize> {
    let (mut open, fixed): (Vec<usize>, Vec<usize>) =
        (0..photos.len()).partition(|&i| !photos[i].fixed);
    open.extend(fixed);
    open
}

/// Display order plus the cursor into it.
///
/// Alongside the order it keeps explicit lookup tables (collection index to
/// display position, id to collection index) so callers never have to match
/// records by identity.
#[derive(Debug, Default)]
pub struct Navigator {
    order: Vec<usize>,
    positions: Vec<usize>,
    by_id: HashMap<String, usize>,
    cursor: usize,
}

impl Navigator {
    pub fn new(photos: &[Photo]) -> Self {
        let mut nav = Self::default();
        nav.rebuild(photos);
        nav
    }

    /// Recomputes everything from `photos` and re-clamps the cursor.
    pub fn rebuild(&mut self, photos: &[Photo]) {
        self.order = display_order(photos);

        self.positions = vec![0; photos.len()];
        for (pos, &index) in self.order.iter().enumerate() {
            self.positions[index] = pos;
        }

        self.by_id.clear();
        for (index, photo) in photos.iter().enumerate() {
            if self.by_id.contains_key(&photo.id) {
                tracing::warn!(id = %photo.id, index, "duplicate photo id; keeping first");
                continue;
            }
            self.by_id.insert(photo.id.clone(), index);
        }

        self.set_cursor(self.cursor);
    }

    #[cfg(test)]
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Collection index shown at the cursor.
    pub fn current_index(&self) -> Option<usize> {
        self.order.get(self.cursor).copied()
    }

    pub fn set_cursor(&mut self, pos: usize) {
        self.cursor = pos.min(self.order.len().saturating_sub(1));
    }

    /// Neighbouring position in `direction`, if it stays inside the order.
    pub fn target(&self, direction: Direction) -> Option<usize> {
        match direction {
            Direction::Previous => self.cursor.checked_sub(1),
            Direction::Next => Some(self.cursor + 1).filter(|&p| p < self.order.len()),
        }
    }

    pub fn position_of(&self, index: usize) -> Option<usize> {
        self.positions.get(index).copied()
    }

    pub fn index_of_id(&self, id: &str) -> Option<usize> {
        self.by_id.get(id).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn photos(fixed: &[bool]) -> Vec<Photo> {
        fixed
            .iter()
            .enumerate()
            .map(|(i, &f)| {
                let mut p = Photo::new(format!("p{}", i), format!("{}.jpg", i));
                p.fixed = f;
                p
            })
            .collect()
    }

    #[test]
    fn order_partitions_stably() {
        let ps = photos(&[true, false, true, false, false]);
        assert_eq!(display_order(&ps), vec![1, 3, 4, 0, 2]);
    }

    #[test]
    fn order_is_permutation_and_deterministic() {
        let ps = photos(&[false, true, true, false, true, false, false]);
        let first = display_order(&ps);
        let mut sorted = first.clone();
        sorted.sort_unstable();
        assert_eq!(sorted, (0..ps.len()).collect::<Vec<_>>());
        assert_eq!(display_order(&ps), first);
    }

    #[test]
    fn positions_invert_the_order() {
        let ps = photos(&[true, false, false]);
        let nav = Navigator::new(&ps);
        for (pos, &index) in nav.order().iter().enumerate() {
            assert_eq!(nav.position_of(index), Some(pos));
        }
        assert_eq!(nav.position_of(3), None);
    }

    #[test]
    fn targets_respect_bounds() {
        let ps = photos(&[false, false, false]);
        let mut nav = Navigator::new(&ps);
        assert_eq!(nav.target(Direction::Previous), None);
        assert_eq!(nav.target(Direction::Next), Some(1));
        nav.set_cursor(2);
        assert_eq!(nav.target(Direction::Next), None);
        assert_eq!(nav.target(Direction::Previous), Some(1));
    }

    #[test]
    fn cursor_clamped_after_shrink() {
        let mut nav = Navigator::new(&photos(&[false; 4]));
        nav.set_cursor(10);
        assert_eq!(nav.cursor(), 3);
        nav.rebuild(&photos(&[false; 2]));
        assert_eq!(nav.cursor(), 1);
        nav.rebuild(&[]);
        assert_eq!(nav.cursor(), 0);
        assert_eq!(nav.current_index(), None);
        assert_eq!(nav.target(Direction::Next), None);
    }

    #[test]
    fn duplicate_ids_resolve_to_first() {
        let mut ps = photos(&[false, false]);
        ps[1].id = "p0".to_string();
        let nav = Navigator::new(&ps);
        assert_eq!(nav.index_of_id("p0"), Some(0));
        assert_eq!(nav.index_of_id("nope"), None);
    }
}
