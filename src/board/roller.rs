//! Rolling puzzle: whole rows and columns shift on a torus

use rand::Rng;

use super::mesh::Mesh;
use super::{Direction, GridCoord, TileId};
use crate::config::Border;

#[derive(Debug, Clone)]
pub struct RollerBoard {
    mesh: Mesh,
    side: i32,
}

impl RollerBoard {
    pub fn new(side: u32) -> Self {
        Self {
            mesh: Mesh::quad_grid(side),
            side: side as i32,
        }
    }

    pub fn with_border(mut self, border: Option<Border>) -> Self {
        self.mesh = self.mesh.with_border(border, self.side as u32);
        self
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    pub fn side(&self) -> i32 {
        self.side
    }

    /// Tiles sharing the column (up/down) or row (left/right) of `id`
    fn line_of(&self, id: TileId, dir: Direction) -> Vec<TileId> {
        let Some(origin) = self.mesh.tile(id).map(|t| t.grid()) else {
            return Vec::new();
        };
        self.mesh
            .tiles()
            .iter()
            .enumerate()
            .filter(|(_, t)| {
                if dir.is_vertical() {
                    t.grid().col == origin.col
                } else {
                    t.grid().row == origin.row
                }
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Shift the line through `id` one cell in `dir`, wrapping at the edge
    pub fn roll_tiles(&mut self, id: TileId, dir: Direction) -> bool {
        let line = self.line_of(id, dir);
        if line.is_empty() {
            return false;
        }
        for &t in &line {
            self.mesh.translate_tile(t, dir);
        }
        log::debug!("Rolled {} tiles through {} {:?}", line.len(), id, dir);
        true
    }

    /// Random legal rolls, `side * side * 4` of them
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let rolls = self.side * self.side * 4;
        let n = self.mesh.len();
        for _ in 0..rolls {
            let id = rng.random_range(0..n);
            let dir = Direction::ALL[rng.random_range(0..Direction::ALL.len())];
            self.roll_tiles(id, dir);
        }
        log::info!("Shuffled roller with {} rolls", rolls);
    }

    pub fn is_solved(&self) -> bool {
        self.mesh.tiles().iter().enumerate().all(|(slot, t)| {
            t.grid() == GridCoord::new(slot as i32 / self.side, slot as i32 % self.side)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn grids(board: &RollerBoard) -> Vec<GridCoord> {
        board.mesh().tiles().iter().map(|t| t.grid()).collect()
    }

    #[test]
    fn test_roll_row_right() {
        let mut board = RollerBoard::new(4);
        assert!(board.roll_tiles(5, Direction::Right));
        // Row 1 shifted, tile 7 wrapped to column 0
        assert_eq!(board.mesh().tile(4).unwrap().grid(), GridCoord::new(1, 1));
        assert_eq!(board.mesh().tile(7).unwrap().grid(), GridCoord::new(1, 0));
        assert_eq!(board.mesh().tile(0).unwrap().grid(), GridCoord::new(0, 0));
        assert!(!board.is_solved());

        // The wrapped tile is drawn in the first column
        let c = board.mesh().centroid(7).unwrap();
        assert_eq!(board.mesh().hit_test(c), Some(7));
        assert!((c.x - -0.75).abs() < 1e-5);
    }

    #[test]
    fn test_roll_column_up() {
        let mut board = RollerBoard::new(3);
        assert!(board.roll_tiles(4, Direction::Up));
        assert_eq!(board.mesh().tile(1).unwrap().grid(), GridCoord::new(2, 1));
        assert_eq!(board.mesh().tile(7).unwrap().grid(), GridCoord::new(1, 1));
        board.roll_tiles(4, Direction::Down);
        assert!(board.is_solved());
        assert!(board.mesh().at_initial_positions());
    }

    #[test]
    fn test_shuffle_keeps_cells_unique() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut board = RollerBoard::new(5);
        board.shuffle(&mut rng);
        let mut cells = grids(&board);
        cells.sort_by_key(|g| (g.row, g.col));
        cells.dedup();
        assert_eq!(cells.len(), 25);
        for id in 0..25 {
            let c = board.mesh().centroid(id).unwrap();
            assert_eq!(board.mesh().hit_test(c), Some(id));
        }
    }

    proptest! {
        #[test]
        fn test_roll_wraparound(side in 2u32..7, pick in 0usize..36, dir_index in 0usize..4) {
            let mut board = RollerBoard::new(side);
            let id = pick % board.mesh().len();
            let dir = Direction::ALL[dir_index];
            let before = grids(&board);
            for _ in 0..side {
                board.roll_tiles(id, dir);
            }
            prop_assert_eq!(grids(&board), before);
            prop_assert!(board.is_solved());
        }
    }
}
