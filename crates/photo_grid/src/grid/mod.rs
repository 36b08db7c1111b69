pub mod item;
pub mod row;

use item::{Item, ItemId};
use row::{Row, RowSummary};

/// Final size of one item as handed to whatever applies the layout.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Placement {
    pub id: ItemId,
    pub row_id: usize,
    pub display_width: u32,
    pub display_height: u32,
    pub is_row_terminal: bool,
}

impl Placement {
    fn from_item(row_id: usize, item: Item) -> Self {
        Self {
            id: item.id,
            row_id,
            display_width: item.display_width,
            display_height: item.display_height,
            is_row_terminal: item.is_row_terminal,
        }
    }

    /// Space to leave after this item. Only terminal items of stretched rows
    /// go without it; the last item of an underfilled row keeps its margin.
    pub fn trailing_margin(&self, padding: u32) -> u32 {
        if self.is_row_terminal {
            0
        } else {
            padding
        }
    }
}

/// Result of arranging one container.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Layout {
    pub container_width: u32,
    pub padding: u32,
    pub placements: Vec<Placement>,
    pub rows: Vec<RowSummary>,
}

impl Layout {
    pub fn row(&self, id: usize) -> Option<&RowSummary> {
        self.rows.iter().find(|row| row.id == id)
    }

    pub fn row_placements(&self, id: usize) -> impl Iterator<Item = &Placement> + '_ {
        self.placements.iter().filter(move |placement| placement.row_id == id)
    }

    pub fn placement(&self, id: ItemId) -> Option<&Placement> {
        self.placements.iter().find(|placement| placement.id == id)
    }

    /// Height of all rows stacked with `row_gap` pixels between them.
    pub fn total_height(&self, row_gap: u32) -> u64 {
        let heights: u64 = self.rows.iter().map(|row| u64::from(row.height)).sum();
        let gaps = self.rows.len().saturating_sub(1) as u64;
        heights + gaps * u64::from(row_gap)
    }
}

/// Rows of a single container, built during one layout pass.
#[derive(Clone, Debug)]
pub struct Grid {
    width: u32,
    padding: u32,
    rows: Vec<Row>,
}

impl Grid {
    pub fn new(width: u32, padding: u32) -> Self {
        Self { width, padding, rows: Vec::new() }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn padding(&self) -> u32 {
        self.padding
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Appends a new row and returns it for filling.
    ///
    /// Row ids are positions in the grid, so they stay sequential.
    pub fn create_row(&mut self) -> &mut Row {
        let id = self.rows.len();
        self.rows.push(Row::new(id, self.width, self.padding));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Flattens the grid into placements. Empty rows are dropped from the summary.
    pub fn into_layout(self) -> Layout {
        let mut layout = Layout {
            container_width: self.width,
            padding: self.padding,
            placements: Vec::new(),
            rows: Vec::with_capacity(self.rows.len()),
        };

        for row in self.rows {
            if row.is_empty() {
                continue;
            }

            layout.rows.push(row.summary());
            let row_id = row.id();
            layout
                .placements
                .extend(row.into_items().into_iter().map(|item| Placement::from_item(row_id, item)));
        }

        layout
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_get_sequential_ids() {
        let mut grid = Grid::new(640, 2);
        assert_eq!(grid.create_row().id(), 0);
        assert_eq!(grid.create_row().id(), 1);
        assert_eq!(grid.create_row().id(), 2);
        assert_eq!(grid.rows().len(), 3);
    }

    #[test]
    fn into_layout_skips_empty_rows() {
        let mut grid = Grid::new(300, 0);
        let row = grid.create_row();
        row.create_item(ItemId::new(0, 0), 600, 200);
        row.render();
        grid.create_row();

        let layout = grid.into_layout();
        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.placements.len(), 1);
        assert_eq!(layout.placements[0].row_id, 0);
        assert_eq!(layout.placements[0].display_width, 300);
        assert_eq!(layout.placements[0].display_height, 100);
    }

    #[test]
    fn trailing_margin_follows_terminal_flag() {
        let mut placement = Placement {
            id: ItemId::new(0, 0),
            row_id: 0,
            display_width: 10,
            display_height: 10,
            is_row_terminal: false,
        };
        assert_eq!(placement.trailing_margin(3), 3);

        placement.is_row_terminal = true;
        assert_eq!(placement.trailing_margin(3), 0);
    }

    #[test]
    fn total_height_adds_gaps_between_rows() {
        let layout = Layout {
            container_width: 100,
            padding: 0,
            placements: Vec::new(),
            rows: vec![
                RowSummary { id: 0, height: 50, item_count: 2, stretched: true },
                RowSummary { id: 1, height: 40, item_count: 1, stretched: false },
            ],
        };

        assert_eq!(layout.total_height(5), 95);
        assert_eq!(Layout::default().total_height(5), 0);
    }
}
