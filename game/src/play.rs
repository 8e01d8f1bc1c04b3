//! Player movement rules.

use crate::board::{Board, Direction, Tile};

/// A running game: a board plus the player's cell.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,
    player: (usize, usize),
}

impl Game {
    /// Start a game on the given board, player on the spawn cell.
    pub fn new(board: Board) -> Self {
        let player = board.start_position().unwrap_or((1, 1));
        Self { board, player }
    }

    /// Start a game on the standard maze.
    pub fn standard() -> Self {
        Self::new(Board::standard())
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// The player's current cell as `(x, y)`.
    pub fn player(&self) -> (usize, usize) {
        self.player
    }

    /// Put the player back on the spawn cell.
    pub fn reset(&mut self) {
        self.player = self.board.start_position().unwrap_or((1, 1));
    }

    /// Move one cell in `direction` if the destination exists and is
    /// passable. Returns whether the player moved.
    pub fn try_move(&mut self, direction: Direction) -> bool {
        let (dx, dy) = direction.delta();
        let (x, y) = self.player;

        let Some(nx) = x.checked_add_signed(dx) else {
            return false;
        };
        let Some(ny) = y.checked_add_signed(dy) else {
            return false;
        };

        if !self.board.is_passable(nx, ny) {
            return false;
        }

        self.player = (nx, ny);
        true
    }

    /// Whether the player is standing on the exit cell.
    pub fn at_exit(&self) -> bool {
        let (x, y) = self.player;
        self.board.tile(x, y) == Tile::Exit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawns_on_the_start_cell() {
        let game = Game::standard();
        assert_eq!(game.player(), (0, 2));
        assert!(!game.at_exit());
    }

    #[test]
    fn moves_onto_open_floor() {
        let mut game = Game::standard();
        assert!(game.try_move(Direction::Right));
        assert_eq!(game.player(), (1, 2));
    }

    #[test]
    fn walls_block_movement() {
        let mut game = Game::standard();
        // (0, 1) and (0, 3) are walls around the spawn cell
        assert!(!game.try_move(Direction::Up));
        assert!(!game.try_move(Direction::Down));
        assert_eq!(game.player(), (0, 2));
    }

    #[test]
    fn board_edge_blocks_movement() {
        let mut game = Game::standard();
        assert!(!game.try_move(Direction::Left));
        assert_eq!(game.player(), (0, 2));
    }

    #[test]
    fn reset_returns_to_spawn() {
        let mut game = Game::standard();
        game.try_move(Direction::Right);
        game.try_move(Direction::Up);
        game.reset();
        assert_eq!(game.player(), (0, 2));
    }

    #[test]
    fn exit_detection() {
        let mut game = Game::standard();
        game.player = (15, 8);
        assert!(game.at_exit());
    }

    #[test]
    fn walks_a_known_corridor() {
        let mut game = Game::standard();
        // Right along row 2, up into the row-1 corridor
        assert!(game.try_move(Direction::Right));
        assert!(game.try_move(Direction::Up));
        assert_eq!(game.player(), (1, 1));
        // Row 0 is the outer wall
        assert!(!game.try_move(Direction::Up));
    }
}
