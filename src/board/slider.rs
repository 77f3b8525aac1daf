//! Sliding puzzle (15-puzzle family)
//!
//! The board holds `side * side` quads. The last one is the blank: it keeps
//! the last buffer slot, is never drawn and never hit-tested, and every slide
//! is a chain of swaps with it.

use rand::Rng;

use super::mesh::Mesh;
use super::{Direction, GridCoord, TileId};
use crate::config::Border;

#[derive(Debug, Clone)]
pub struct SliderBoard {
    mesh: Mesh,
    side: i32,
    blank: TileId,
}

impl SliderBoard {
    /// Square board with `side * side - 1` numbered tiles and one blank
    pub fn new(side: u32) -> Self {
        let mut mesh = Mesh::quad_grid(side);
        let blank = mesh.len() - 1;
        if let Some(tile) = mesh.tile_mut(blank) {
            tile.mark_blank();
        }
        Self {
            mesh,
            side: side as i32,
            blank,
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

    pub fn blank(&self) -> TileId {
        self.blank
    }

    /// Grid cell currently holding the blank
    pub fn blank_cell(&self) -> GridCoord {
        self.mesh
            .tile(self.blank)
            .map(|t| t.grid())
            .unwrap_or(GridCoord::NONE)
    }

    /// Drawable shapes: the blank occupies the last slot and is skipped
    pub fn visible_shapes(&self) -> usize {
        self.mesh.len().saturating_sub(1)
    }

    /// Direction `id` would move, toward the blank, if it shares exactly one
    /// of row or column with it
    pub fn can_slide(&self, id: TileId) -> Option<Direction> {
        if id == self.blank {
            return None;
        }
        let tile = self.mesh.tile(id)?;
        let blank = self.mesh.tile(self.blank)?;
        tile.direction_to(blank)
    }

    /// Shift `id` and every tile between it and the blank one cell toward the
    /// blank. Returns false (and changes nothing) for an illegal slide.
    pub fn slide_tiles(&mut self, id: TileId) -> bool {
        let Some(dir) = self.can_slide(id) else {
            return false;
        };
        let Some(target) = self.mesh.tile(id).map(|t| t.grid()) else {
            return false;
        };

        // Walk from the blank back toward the pressed tile
        let step = dir.opposite().step();
        let mut cell = self.blank_cell();
        let mut chain = Vec::new();
        while cell != target {
            cell = cell.offset(step);
            match self.mesh.tile_at(cell) {
                Some(t) => chain.push(t),
                None => return false,
            }
        }

        for t in chain {
            self.mesh.swap_tiles(t, self.blank);
        }
        log::debug!("Slid tile {} {:?}, blank now at {:?}", id, dir, self.blank_cell());
        true
    }

    /// Uniform random permutation, corrected to a solvable arrangement
    pub fn shuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        let n = self.mesh.len();
        for i in (1..n).rev() {
            let j = rng.random_range(0..=i);
            self.mesh.swap_tiles(i, j);
        }

        if !self.is_solvable() {
            // Exchanging two numbered tiles flips the inversion parity
            let blank = self.blank;
            let numbered: Vec<TileId> = self
                .reading_order()
                .into_iter()
                .filter(|&id| id != blank)
                .take(2)
                .collect();
            if let [a, b] = numbered[..] {
                self.mesh.swap_tiles(a, b);
            }
        }
        log::info!("Shuffled slider, {} inversions", self.inversions());
    }

    /// Tile ids in row-major cell order
    fn reading_order(&self) -> Vec<TileId> {
        let mut order = Vec::with_capacity(self.mesh.len());
        for row in 0..self.side {
            for col in 0..self.side {
                if let Some(id) = self.mesh.tile_at(GridCoord::new(row, col)) {
                    order.push(id);
                }
            }
        }
        order
    }

    /// Pairs of numbered tiles that appear out of order in reading order
    pub fn inversions(&self) -> usize {
        let numbers: Vec<u32> = self
            .reading_order()
            .into_iter()
            .filter(|&id| id != self.blank)
            .filter_map(|id| self.mesh.tile(id).map(|t| t.number()))
            .collect();
        numbers
            .iter()
            .enumerate()
            .map(|(i, a)| numbers[i + 1..].iter().filter(|b| a > b).count())
            .sum()
    }

    /// Whether the arrangement can reach the solved state by slides
    pub fn is_solvable(&self) -> bool {
        let inversions = self.inversions();
        if self.side % 2 == 1 {
            inversions % 2 == 0
        } else {
            // Blank row counted from the bottom, starting at 1
            let blank_row = (self.side - self.blank_cell().row) as usize;
            (inversions + blank_row) % 2 == 1
        }
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

    fn grid_of(board: &SliderBoard, id: TileId) -> GridCoord {
        board.mesh().tile(id).unwrap().grid()
    }

    #[test]
    fn test_fifteen_puzzle_layout() {
        let board = SliderBoard::new(4);
        assert_eq!(board.mesh().len(), 16);
        assert_eq!(board.visible_shapes(), 15);
        assert_eq!(board.blank(), 15);
        assert_eq!(board.blank_cell(), GridCoord::new(3, 3));
        assert!(board.is_solved());
        assert!(board.is_solvable());
        // The blank is never hit
        let c = board.mesh().centroid(15).unwrap();
        assert_eq!(board.mesh().hit_test(c), None);
    }

    #[test]
    fn test_slide_adjacent_moves_only_one_tile() {
        let mut board = SliderBoard::new(4);
        let before: Vec<GridCoord> = (0..16).map(|id| grid_of(&board, id)).collect();
        assert_eq!(board.can_slide(14), Some(Direction::Right));
        assert!(board.slide_tiles(14));

        assert_eq!(board.blank_cell(), GridCoord::new(3, 2));
        assert_eq!(grid_of(&board, 14), GridCoord::new(3, 3));
        let unmoved = (0..14).filter(|&id| grid_of(&board, id) == before[id]).count();
        assert_eq!(unmoved, 14);
    }

    #[test]
    fn test_slide_chain() {
        let mut board = SliderBoard::new(4);
        // Tile at (3,1) is id 13, (3,2) is id 14
        assert!(board.slide_tiles(13));
        assert_eq!(board.blank_cell(), GridCoord::new(3, 1));
        assert_eq!(grid_of(&board, 14), GridCoord::new(3, 3));
        assert_eq!(grid_of(&board, 13), GridCoord::new(3, 2));
        assert!(!board.is_solved());
    }

    #[test]
    fn test_slide_vertical_chain() {
        let mut board = SliderBoard::new(3);
        // Column 2 holds ids 2, 5 and the blank 8
        assert_eq!(board.can_slide(2), Some(Direction::Down));
        assert!(board.slide_tiles(2));
        assert_eq!(board.blank_cell(), GridCoord::new(0, 2));
        assert_eq!(grid_of(&board, 2), GridCoord::new(1, 2));
        assert_eq!(grid_of(&board, 5), GridCoord::new(2, 2));
    }

    #[test]
    fn test_illegal_slide_is_noop() {
        let mut board = SliderBoard::new(4);
        let revision = board.mesh().buffer().revision();
        assert_eq!(board.can_slide(0), None);
        assert!(!board.slide_tiles(0));
        assert!(!board.slide_tiles(board.blank()));
        assert_eq!(board.mesh().buffer().revision(), revision);
    }

    #[test]
    fn test_shuffle_is_solvable() {
        for seed in 0..20 {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut board = SliderBoard::new(4);
            board.shuffle(&mut rng);
            assert!(board.is_solvable(), "seed {seed}");

            let mut odd = SliderBoard::new(3);
            odd.shuffle(&mut rng);
            assert!(odd.is_solvable(), "seed {seed}");
        }
    }

    #[test]
    fn test_shuffle_keeps_cells_unique() {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut board = SliderBoard::new(4);
        board.shuffle(&mut rng);
        let mut cells: Vec<GridCoord> = (0..16).map(|id| grid_of(&board, id)).collect();
        cells.sort_by_key(|g| (g.row, g.col));
        cells.dedup();
        assert_eq!(cells.len(), 16);
    }

    #[test]
    fn test_single_swap_is_unsolvable() {
        let mut board = SliderBoard::new(4);
        board.mesh.swap_tiles(0, 1);
        assert_eq!(board.inversions(), 1);
        assert!(!board.is_solvable());
    }

    proptest! {
        #[test]
        fn test_slide_legality(seed in 0u64..500, pick in 0usize..16) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut board = SliderBoard::new(4);
            board.shuffle(&mut rng);

            let blank = board.blank_cell();
            let cell = grid_of(&board, pick);
            let aligned = (cell.row == blank.row) ^ (cell.col == blank.col);
            prop_assert_eq!(board.can_slide(pick).is_some(), aligned);

            if aligned {
                prop_assert!(board.slide_tiles(pick));
                prop_assert_eq!(board.blank_cell(), cell);
                prop_assert!(board.is_solvable());
            }
        }
    }
}
