use log::{debug, trace};

use super::item::{Item, ItemId};

/// Per-row facts reported alongside the placements of a finished layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RowSummary {
    pub id: usize,
    pub height: u32,
    pub item_count: usize,
    /// Whether rendering scaled the row down to the container width.
    pub stretched: bool,
}

/// A horizontal run of items sharing one height.
///
/// Items are packed greedily. The row height only ever shrinks while packing,
/// so no item is scaled above its natural size until `render` scales the whole
/// row down to fit the container.
#[derive(Clone, Debug)]
pub struct Row {
    id: usize,
    container_width: u32,
    padding: u32,
    height: u32,
    /// Sum of the display widths of `items`.
    used_width: u32,
    stretched: bool,
    items: Vec<Item>,
}

impl Row {
    pub fn new(id: usize, container_width: u32, padding: u32) -> Self {
        Self {
            id,
            container_width,
            padding,
            height: 0,
            used_width: 0,
            stretched: false,
            items: Vec::new(),
        }
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn used_width(&self) -> u32 {
        self.used_width
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn is_stretched(&self) -> bool {
        self.stretched
    }

    /// Places a new item at the end of the row.
    ///
    /// The first item, or any measured item shorter than the row, sets the row
    /// height and refits everything already placed. Other items are fitted to
    /// the current height.
    pub fn create_item(&mut self, id: ItemId, natural_width: u32, natural_height: u32) {
        let mut item = Item::new(id, natural_width, natural_height);

        if self.height == 0 || (natural_height != 0 && natural_height < self.height) {
            self.adjust_row_height(natural_height);
        }
        item.fit_to_height(self.height);

        trace!(
            "row {}: placed {} {}x{} as {}x{}",
            self.id,
            id,
            natural_width,
            natural_height,
            item.display_width,
            item.display_height
        );

        self.used_width = self.used_width.saturating_add(item.display_width);
        self.items.push(item);
    }

    /// Sets the row height and refits every measured item to it.
    pub fn adjust_row_height(&mut self, height: u32) {
        self.height = height;
        for item in &mut self.items {
            item.fit_to_height(height);
        }
        self.recalculate_used_width();
    }

    pub fn recalculate_used_width(&mut self) {
        self.used_width =
            self.items.iter().fold(0u32, |sum, item| sum.saturating_add(item.display_width));
    }

    pub fn is_full(&self) -> bool {
        self.available_width() <= 0
    }

    pub fn available_width(&self) -> i64 {
        i64::from(self.container_width) - i64::from(self.used_width)
    }

    /// Finalizes display sizes.
    ///
    /// A row wider than the container (after reserving padding between items)
    /// is scaled down so items plus padding span exactly the container width,
    /// with the last item absorbing rounding drift and marked as terminal.
    /// Narrower rows keep their fitted sizes and get no terminal mark.
    pub fn render(&mut self) {
        if self.items.is_empty() {
            return;
        }

        let gaps = self.items.len() as i64 - 1;
        let target_width = i64::from(self.container_width) - gaps * i64::from(self.padding);
        let used_width = i64::from(self.used_width);

        self.stretched = used_width > 0 && used_width > target_width;
        if !self.stretched {
            debug!(
                "row {}: {} items at height {}, {}px of {}px used",
                self.id,
                self.items.len(),
                self.height,
                self.used_width,
                self.container_width
            );
            return;
        }

        let adjustment = target_width.max(0) as f64 / used_width as f64;
        self.height = (f64::from(self.height) * adjustment).round() as u32;

        let last = self.items.len() - 1;
        let mut actual_used_width = 0i64;
        for (index, item) in self.items.iter_mut().enumerate() {
            item.display_height = self.height;

            if index < last {
                item.display_width = (f64::from(item.display_width) * adjustment).round() as u32;
                actual_used_width += i64::from(item.display_width) + i64::from(self.padding);
            } else {
                let remainder = i64::from(self.container_width) - actual_used_width;
                item.display_width = remainder.clamp(0, i64::from(u32::MAX)) as u32;
                item.is_row_terminal = true;
            }
        }
        self.recalculate_used_width();

        debug!(
            "row {}: {} items scaled by {:.4} to height {}",
            self.id,
            self.items.len(),
            adjustment,
            self.height
        );
    }

    pub fn summary(&self) -> RowSummary {
        RowSummary {
            id: self.id,
            height: self.height,
            item_count: self.items.len(),
            stretched: self.stretched,
        }
    }

    pub(crate) fn into_items(self) -> Vec<Item> {
        self.items
    }
}
