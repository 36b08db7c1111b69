use std::fmt;

/// Identifies an item by the container it belongs to and its position there.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemId {
    pub container: usize,
    pub index: usize,
}

impl ItemId {
    pub fn new(container: usize, index: usize) -> Self {
        Self { container, index }
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.container, self.index)
    }
}

/// A single image as seen by a row.
///
/// Natural dimensions are fixed at construction. A zero in either of them
/// means the image has not been measured yet; such items keep a zero display
/// size until a later pass supplies real dimensions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Item {
    pub id: ItemId,
    natural_width: u32,
    natural_height: u32,
    pub display_width: u32,
    pub display_height: u32,
    pub is_row_terminal: bool,
}

impl Item {
    pub fn new(id: ItemId, natural_width: u32, natural_height: u32) -> Self {
        Self {
            id,
            natural_width,
            natural_height,
            display_width: 0,
            display_height: 0,
            is_row_terminal: false,
        }
    }

    pub fn natural_width(&self) -> u32 {
        self.natural_width
    }

    pub fn natural_height(&self) -> u32 {
        self.natural_height
    }

    pub fn has_known_size(&self) -> bool {
        self.natural_width != 0 && self.natural_height != 0
    }

    /// Width this item takes at `height` while keeping its aspect ratio.
    pub(crate) fn width_at(&self, height: u32) -> Option<u32> {
        if !self.has_known_size() {
            return None;
        }

        let aspect = f64::from(self.natural_width) / f64::from(self.natural_height);
        Some((aspect * f64::from(height)).round() as u32)
    }

    /// Resizes the item so its height matches `height`. Unmeasured items are left alone.
    pub(crate) fn fit_to_height(&mut self, height: u32) {
        if let Some(width) = self.width_at(height) {
            self.display_width = width;
            self.display_height = height;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_display_matches_container_and_index() {
        assert_eq!(ItemId::new(2, 14).to_string(), "2-14");
    }

    #[test]
    fn fit_keeps_aspect_ratio() {
        let mut item = Item::new(ItemId::new(0, 0), 300, 200);
        item.fit_to_height(100);
        assert_eq!((item.display_width, item.display_height), (150, 100));
    }

    #[test]
    fn fit_rounds_to_nearest_pixel() {
        let mut item = Item::new(ItemId::new(0, 0), 400, 300);
        item.fit_to_height(200);
        // 4 / 3 * 200 = 266.67
        assert_eq!(item.display_width, 267);
    }

    #[test]
    fn unknown_dimensions_are_not_fitted() {
        let mut item = Item::new(ItemId::new(0, 0), 0, 300);
        item.fit_to_height(200);
        assert_eq!((item.display_width, item.display_height), (0, 0));
        assert!(!item.has_known_size());
    }
}
