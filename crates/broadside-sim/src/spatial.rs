//! Uniform grid used for per-viewer visibility queries.
//!
//! Rebuilt from scratch every tick; never updated incrementally. Combat does
//! not use it: projectile and terrain checks are direct pairwise tests.

use std::collections::HashMap;

use hecs::{Entity, World};

use broadside_core::components::{Island, Pickup, Role, Vessel};
use broadside_core::enums::EntityKind;
use broadside_core::types::Position;

/// Grid-based spatial partitioning of bots, escorts, pickups and islands.
#[derive(Debug)]
pub struct SpatialGrid {
    cell_size: f64,
    cells: HashMap<(i32, i32), Vec<SpatialEntry>>,
}

/// Entry in a spatial cell.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpatialEntry {
    pub entity: Entity,
    pub kind: EntityKind,
    pub x: f64,
    pub y: f64,
}

impl SpatialGrid {
    pub fn new(cell_size: f64) -> Self {
        Self {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// Cell coordinates containing a world position.
    #[inline]
    pub fn world_to_cell(&self, x: f64, y: f64) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    pub fn clear(&mut self) {
        self.cells.clear();
    }

    pub fn insert(&mut self, entity: Entity, kind: EntityKind, pos: Position) {
        let cell = self.world_to_cell(pos.x, pos.y);
        self.cells.entry(cell).or_default().push(SpatialEntry {
            entity,
            kind,
            x: pos.x,
            y: pos.y,
        });
    }

    /// Total number of indexed entries.
    pub fn len(&self) -> usize {
        self.cells.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }

    /// Re-bucket every bot, escort, pickup and island from the world.
    pub fn rebuild(&mut self, world: &World) {
        self.clear();

        for (entity, (pos, _vessel, role)) in world.query::<(&Position, &Vessel, &Role)>().iter() {
            match role.kind() {
                EntityKind::Bot | EntityKind::Escort => self.insert(entity, role.kind(), *pos),
                _ => {}
            }
        }
        for (entity, (pos, _pickup)) in world.query::<(&Position, &Pickup)>().iter() {
            self.insert(entity, EntityKind::Pickup, *pos);
        }
        for (entity, (pos, _island)) in world.query::<(&Position, &Island)>().iter() {
            self.insert(entity, EntityKind::Island, *pos);
        }
    }

    /// Entries in the 3x3 block of cells around `pos`, optionally filtered by kind.
    pub fn query_neighborhood(&self, pos: Position, filter: Option<EntityKind>) -> Vec<SpatialEntry> {
        let (cx, cy) = self.world_to_cell(pos.x, pos.y);
        let mut results = Vec::new();
        for dx in -1..=1 {
            for dy in -1..=1 {
                if let Some(entries) = self.cells.get(&(cx + dx, cy + dy)) {
                    results.extend(
                        entries
                            .iter()
                            .filter(|e| filter.is_none_or(|k| e.kind == k))
                            .copied(),
                    );
                }
            }
        }
        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entity_pair() -> (World, Entity, Entity) {
        let mut world = World::new();
        let a = world.spawn((1u8,));
        let b = world.spawn((2u8,));
        (world, a, b)
    }

    #[test]
    fn world_to_cell_floors_negative() {
        let grid = SpatialGrid::new(1000.0);
        assert_eq!(grid.world_to_cell(999.0, 1000.0), (0, 1));
        assert_eq!(grid.world_to_cell(-1.0, 0.0), (-1, 0));
    }

    #[test]
    fn neighborhood_covers_adjacent_cells_only() {
        let (_world, a, b) = entity_pair();
        let mut grid = SpatialGrid::new(1000.0);
        grid.insert(a, EntityKind::Bot, Position::new(1500.0, 1500.0));
        grid.insert(b, EntityKind::Bot, Position::new(3500.0, 1500.0));

        let hits = grid.query_neighborhood(Position::new(500.0, 500.0), None);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].entity, a);
    }

    #[test]
    fn neighborhood_filters_by_kind() {
        let (_world, a, b) = entity_pair();
        let mut grid = SpatialGrid::new(1000.0);
        grid.insert(a, EntityKind::Pickup, Position::new(100.0, 100.0));
        grid.insert(b, EntityKind::Island, Position::new(200.0, 100.0));

        let islands = grid.query_neighborhood(Position::new(0.0, 0.0), Some(EntityKind::Island));
        assert_eq!(islands.len(), 1);
        assert_eq!(islands[0].entity, b);
        assert_eq!(grid.len(), 2);

        grid.clear();
        assert!(grid.is_empty());
    }
}
