mod grid;
mod reflow;

use std::time::Duration;

use log::debug;

pub use grid::{
    item::{Item, ItemId},
    row::{Row, RowSummary},
    Grid, Layout, Placement,
};
pub use reflow::{
    adapter::{ContainerSnapshot, GridAdapter, StaticGrid},
    scheduler::{ReflowScheduler, ReflowState},
};

/// Largest padding accepted by [`GridOptions::validate`].
pub const MAX_PADDING: u32 = 99;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum GridError {
    #[error("container width must be positive")]
    ZeroContainerWidth,
    #[error("padding of {0}px is out of range (0..=99)")]
    PaddingOutOfRange(u32),
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridOptions {
    /// Horizontal space between neighbouring items, in pixels.
    pub padding: u32,
    /// Quiet period a reflow waits for before running, in milliseconds.
    pub quiet_interval_ms: u64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self { padding: 1, quiet_interval_ms: 100 }
    }
}

impl GridOptions {
    pub fn quiet_interval(&self) -> Duration {
        Duration::from_millis(self.quiet_interval_ms)
    }

    pub fn validate(&self) -> Result<(), GridError> {
        if self.padding > MAX_PADDING {
            return Err(GridError::PaddingOutOfRange(self.padding));
        }
        Ok(())
    }
}

/// One image submitted for layout. Zero dimensions mean "not measured yet".
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemInput {
    pub id: ItemId,
    pub natural_width: u32,
    pub natural_height: u32,
}

impl ItemInput {
    pub fn new(id: ItemId, natural_width: u32, natural_height: u32) -> Self {
        Self { id, natural_width, natural_height }
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct LayoutEngine;

impl LayoutEngine {
    /// Packs `items` into rows that span `container_width`.
    ///
    /// Single forward pass: an item that overflows a row stays in it, the row
    /// is rendered and the next item opens a new row. The last row is rendered
    /// whether or not it is full.
    pub fn arrange(
        &self,
        container_width: u32,
        padding: u32,
        items: &[ItemInput],
    ) -> Result<Layout, GridError> {
        if container_width == 0 {
            return Err(GridError::ZeroContainerWidth);
        }

        let mut grid = Grid::new(container_width, padding);
        let mut row = grid.create_row();

        for input in items {
            row.create_item(input.id, input.natural_width, input.natural_height);

            if row.is_full() {
                row.render();
                row = grid.create_row();
            }
        }
        row.render();

        let layout = grid.into_layout();
        debug!(
            "arranged {} items into {} rows at width {}",
            layout.placements.len(),
            layout.rows.len(),
            container_width
        );

        Ok(layout)
    }

    /// Arranges every container independently with a shared padding.
    pub fn arrange_containers(
        &self,
        padding: u32,
        containers: &[ContainerSnapshot],
    ) -> Vec<Result<Layout, GridError>> {
        containers
            .iter()
            .map(|container| self.arrange(container.width, padding, &container.items))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inputs(sizes: &[(u32, u32)]) -> Vec<ItemInput> {
        sizes
            .iter()
            .enumerate()
            .map(|(index, &(w, h))| ItemInput::new(ItemId::new(0, index), w, h))
            .collect()
    }

    #[test]
    fn single_wide_item_is_scaled_down() {
        let layout = LayoutEngine.arrange(400, 0, &inputs(&[(600, 400)])).unwrap();

        assert_eq!(layout.rows.len(), 1);
        let placement = layout.placements[0];
        assert_eq!(placement.display_width, 400);
        assert_eq!(placement.display_height, 267);
        assert!(placement.is_row_terminal);
    }

    #[test]
    fn underfilled_row_is_left_as_is() {
        let layout = LayoutEngine.arrange(630, 5, &inputs(&[(300, 200), (300, 200)])).unwrap();

        assert_eq!(layout.rows.len(), 1);
        assert!(!layout.rows[0].stretched);
        for placement in &layout.placements {
            assert_eq!((placement.display_width, placement.display_height), (300, 200));
            assert!(!placement.is_row_terminal);
            assert_eq!(placement.trailing_margin(5), 5);
        }
    }

    #[test]
    fn unmeasured_item_is_tolerated() {
        let layout = LayoutEngine.arrange(500, 2, &inputs(&[(0, 0)])).unwrap();

        assert_eq!(layout.placements.len(), 1);
        assert_eq!(layout.placements[0].display_width, 0);
        assert_eq!(layout.placements[0].display_height, 0);
    }

    #[test]
    fn remeasured_item_is_sized_on_next_pass() {
        let first = LayoutEngine.arrange(500, 0, &inputs(&[(0, 0), (200, 100)])).unwrap();
        assert_eq!(first.placements[0].display_width, 0);

        let second = LayoutEngine.arrange(500, 0, &inputs(&[(300, 100), (200, 100)])).unwrap();
        let fresh = LayoutEngine.arrange(500, 0, &inputs(&[(300, 100), (200, 100)])).unwrap();
        assert_eq!(second, fresh);
        assert_eq!(second.placements[0].display_width, 300);
        assert_eq!(second.placements[0].display_height, 100);
    }

    #[test]
    fn overflowing_item_closes_the_row() {
        // 300 + 300 fills 500, so the third item opens row 1.
        let layout =
            LayoutEngine.arrange(500, 4, &inputs(&[(300, 200), (300, 200), (150, 100)])).unwrap();

        assert_eq!(layout.rows.len(), 2);
        let rows: Vec<_> = layout.placements.iter().map(|p| p.row_id).collect();
        assert_eq!(rows, vec![0, 0, 1]);

        let first_row: u32 = layout.row_placements(0).map(|p| p.display_width).sum();
        assert_eq!(first_row + 4, 500);
        assert!(layout.placements[1].is_row_terminal);
        assert!(!layout.placements[2].is_row_terminal);
        assert_eq!(layout.row(1).map(|row| row.height), Some(100));
    }

    #[test]
    fn exactly_full_last_row_leaves_no_empty_row() {
        let layout = LayoutEngine.arrange(400, 0, &inputs(&[(200, 100), (200, 100)])).unwrap();

        assert_eq!(layout.rows.len(), 1);
        assert_eq!(layout.placements.len(), 2);
    }

    #[test]
    fn empty_input_produces_empty_layout() {
        let layout = LayoutEngine.arrange(400, 3, &[]).unwrap();
        assert!(layout.placements.is_empty());
        assert!(layout.rows.is_empty());
    }

    #[test]
    fn zero_container_width_is_rejected() {
        assert_eq!(
            LayoutEngine.arrange(0, 1, &inputs(&[(10, 10)])),
            Err(GridError::ZeroContainerWidth)
        );
    }

    #[test]
    fn containers_are_arranged_independently() {
        let containers = vec![
            ContainerSnapshot::new(400, inputs(&[(600, 400)])),
            ContainerSnapshot::new(0, Vec::new()),
        ];
        let results = LayoutEngine.arrange_containers(2, &containers);

        assert_eq!(results.len(), 2);
        assert_eq!(results[0].as_ref().map(|layout| layout.padding), Ok(2));
        assert_eq!(results[1], Err(GridError::ZeroContainerWidth));
    }

    #[test]
    fn options_default_and_validation() {
        let options = GridOptions::default();
        assert_eq!(options.padding, 1);
        assert_eq!(options.quiet_interval(), Duration::from_millis(100));
        assert!(options.validate().is_ok());

        let options = GridOptions { padding: 100, ..GridOptions::default() };
        assert_eq!(options.validate(), Err(GridError::PaddingOutOfRange(100)));
    }
}
