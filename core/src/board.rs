use core::ops::{Index, IndexMut};
use ndarray::Array2;

use crate::*;

/// Grid geometry plus every tile's mine, adjacency and play state.
///
/// Tiles live in a `(height, width)` array, so the flat tile index is the row-major position.
#[derive(Clone, Debug, PartialEq)]
pub struct Board {
    config: GameConfig,
    tiles: Array2<Tile>,
}

impl Board {
    /// Empty board: all tiles hidden, no mines yet.
    pub fn new(config: GameConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            tiles: Array2::default(config.nd_shape()),
        })
    }

    pub fn from_layout(layout: &MineLayout) -> Self {
        let config = layout.game_config();
        let mut board = Self {
            config,
            tiles: Array2::default(config.nd_shape()),
        };
        board.apply_layout(layout);
        board
    }

    /// Draws mines with `generator` and computes every adjacency count.
    pub fn place_mines(&mut self, generator: impl MinefieldGenerator) -> Result<()> {
        let layout = generator.generate(self.config)?;
        self.apply_layout(&layout);
        Ok(())
    }

    fn apply_layout(&mut self, layout: &MineLayout) {
        self.tiles.fill(Tile::default());
        for index in layout.mine_indices() {
            self[index].mine = true;
        }
        for index in 0..self.tile_count() {
            let count = self
                .adjacent_indices(index)
                .filter(|&neighbor| self[neighbor].mine)
                .count();
            self[index].adjacent_mines = count as u8;
        }
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    pub fn width(&self) -> Coord {
        self.config.width
    }

    pub fn height(&self) -> Coord {
        self.config.height
    }

    pub fn tile_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn mine_count(&self) -> CellCount {
        self.config.mines
    }

    pub fn safe_tiles(&self) -> CellCount {
        self.config.safe_tiles()
    }

    pub fn validate_index(&self, index: TileIndex) -> Result<TileIndex> {
        if index < self.tile_count() {
            Ok(index)
        } else {
            Err(GameError::InvalidIndex {
                index,
                tile_count: self.tile_count(),
            })
        }
    }

    pub fn index_of(&self, coords: Coord2) -> Result<TileIndex> {
        if coords.0 < self.width() && coords.1 < self.height() {
            Ok(usize::from(coords.1) * usize::from(self.width()) + usize::from(coords.0))
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    /// Inverse of [`Board::index_of`]; `index` must be in range.
    pub fn coords_of(&self, index: TileIndex) -> Coord2 {
        let width = usize::from(self.width());
        let column = index % width;
        let row = (index - column) / width;
        (column as Coord, row as Coord)
    }

    pub fn tile(&self, index: TileIndex) -> Result<&Tile> {
        let index = self.validate_index(index)?;
        Ok(&self[index])
    }

    /// In-bounds neighbors of `index` without wraparound: 3 in a corner, 5 on an edge, 8 inside.
    ///
    /// The iterator does not borrow the board so tiles can be mutated while walking it.
    pub fn adjacent_indices(&self, index: TileIndex) -> impl Iterator<Item = TileIndex> + use<> {
        let width = usize::from(self.width());
        NeighborIter::new(self.coords_of(index), self.config.size())
            .map(move |(x, y)| usize::from(y) * width + usize::from(x))
    }

    pub fn adjacent_mine_count(&self, index: TileIndex) -> Result<u8> {
        Ok(self.tile(index)?.adjacent_mines)
    }

    pub fn iter(&self) -> impl Iterator<Item = (TileIndex, &Tile)> {
        self.tiles.iter().enumerate()
    }
}

impl Index<TileIndex> for Board {
    type Output = Tile;

    fn index(&self, index: TileIndex) -> &Self::Output {
        &self.tiles[self.coords_of(index).to_nd_index()]
    }
}

impl IndexMut<TileIndex> for Board {
    fn index_mut(&mut self, index: TileIndex) -> &mut Self::Output {
        let nd_index = self.coords_of(index).to_nd_index();
        &mut self.tiles[nd_index]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board(size: Coord2, mines: &[TileIndex]) -> Board {
        Board::from_layout(&MineLayout::from_indices(size, mines).unwrap())
    }

    fn sorted_neighbors(board: &Board, index: TileIndex) -> Vec<TileIndex> {
        let mut neighbors: Vec<_> = board.adjacent_indices(index).collect();
        neighbors.sort_unstable();
        neighbors
    }

    #[test]
    fn new_board_is_hidden_and_mine_free() {
        let board = Board::new(GameConfig::new(4, 3, 2).unwrap()).unwrap();

        assert_eq!(board.tile_count(), 12);
        assert!(board.iter().all(|(_, tile)| !tile.is_mine()));
        assert!(board.iter().all(|(_, tile)| tile.state() == TileState::Hidden));
    }

    #[test]
    fn new_board_rejects_invalid_config() {
        let config = GameConfig::new_unchecked(3, 3, 9);
        assert!(matches!(
            Board::new(config),
            Err(GameError::InvalidConfiguration { .. })
        ));
    }

    #[test]
    fn place_mines_sets_counts() {
        let mut board = Board::new(GameConfig::new(5, 5, 6).unwrap()).unwrap();
        board
            .place_mines(RandomMinefieldGenerator::new(99, PlacementStrategy::Auto))
            .unwrap();

        assert_eq!(board.iter().filter(|(_, tile)| tile.is_mine()).count(), 6);
        for index in 0..board.tile_count() {
            let expected = board
                .adjacent_indices(index)
                .filter(|&n| board[n].is_mine())
                .count() as u8;
            assert_eq!(board.adjacent_mine_count(index).unwrap(), expected);
        }
    }

    #[test]
    fn neighbors_match_grid_position() {
        let board = board((3, 3), &[8]);

        assert_eq!(sorted_neighbors(&board, 0), vec![1, 3, 4]);
        assert_eq!(sorted_neighbors(&board, 1), vec![0, 2, 3, 4, 5]);
        assert_eq!(sorted_neighbors(&board, 4), vec![0, 1, 2, 3, 5, 6, 7, 8]);
        assert_eq!(sorted_neighbors(&board, 8), vec![4, 5, 7]);
    }

    #[test]
    fn neighbors_never_wrap_rows() {
        let board = board((4, 2), &[]);

        // index 3 is the end of row 0; index 4 starts row 1 and is not adjacent
        assert_eq!(sorted_neighbors(&board, 3), vec![2, 6, 7]);
        assert_eq!(sorted_neighbors(&board, 4), vec![0, 1, 5]);
    }

    #[test]
    fn adjacency_counts_for_forced_corner_mine() {
        let board = board((3, 3), &[8]);

        assert_eq!(board.adjacent_mine_count(0).unwrap(), 0);
        assert_eq!(board.adjacent_mine_count(4).unwrap(), 1);
        assert_eq!(board.adjacent_mine_count(5).unwrap(), 1);
        assert_eq!(board.adjacent_mine_count(2).unwrap(), 0);
    }

    #[test]
    fn index_and_coords_round_trip() {
        let board = board((5, 3), &[]);

        assert_eq!(board.index_of((4, 2)).unwrap(), 14);
        assert_eq!(board.coords_of(14), (4, 2));
        assert_eq!(board.index_of((5, 0)), Err(GameError::InvalidCoords));
    }

    #[test]
    fn out_of_range_index_fails_fast() {
        let board = board((2, 2), &[]);

        assert_eq!(
            board.adjacent_mine_count(4),
            Err(GameError::InvalidIndex {
                index: 4,
                tile_count: 4
            })
        );
    }
}
