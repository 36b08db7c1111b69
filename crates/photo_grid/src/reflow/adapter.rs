use crate::{ItemId, ItemInput, Layout};

/// Width and items of one container, read at the start of a layout pass.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerSnapshot {
    pub width: u32,
    pub items: Vec<ItemInput>,
}

impl ContainerSnapshot {
    pub fn new(width: u32, items: Vec<ItemInput>) -> Self {
        Self { width, items }
    }
}

/// The UI side of a photo grid: supplies measurements and applies results.
pub trait GridAdapter {
    fn containers(&self) -> Vec<ContainerSnapshot>;

    fn apply(&mut self, container: usize, layout: &Layout);
}

/// In-memory grid that keeps the last layout applied to each container.
#[derive(Clone, Debug, Default)]
pub struct StaticGrid {
    containers: Vec<ContainerSnapshot>,
    applied: Vec<Option<Layout>>,
}

impl StaticGrid {
    pub fn new(containers: Vec<ContainerSnapshot>) -> Self {
        let applied = vec![None; containers.len()];
        Self { containers, applied }
    }

    pub fn layout(&self, container: usize) -> Option<&Layout> {
        self.applied.get(container).and_then(Option::as_ref)
    }

    /// Records the natural size of an item once it is known.
    pub fn set_natural_size(&mut self, id: ItemId, width: u32, height: u32) -> bool {
        let item = self
            .containers
            .get_mut(id.container)
            .and_then(|container| container.items.iter_mut().find(|item| item.id == id));

        match item {
            Some(item) => {
                item.natural_width = width;
                item.natural_height = height;
                true
            },
            None => false,
        }
    }

    pub fn set_width(&mut self, container: usize, width: u32) -> bool {
        match self.containers.get_mut(container) {
            Some(snapshot) => {
                snapshot.width = width;
                true
            },
            None => false,
        }
    }
}

impl GridAdapter for StaticGrid {
    fn containers(&self) -> Vec<ContainerSnapshot> {
        self.containers.clone()
    }

    fn apply(&mut self, container: usize, layout: &Layout) {
        if let Some(slot) = self.applied.get_mut(container) {
            *slot = Some(layout.clone());
        }
    }
}
