//! Maze game logic.
//!
//! Board representation and movement rules for the maze console.
//! This crate is pure arithmetic: it knows nothing about registers,
//! pixels, or controllers, and is fully testable on the host. The
//! kernel maps controller buttons onto [`Direction`] values and
//! paints [`Tile`] cells into the framebuffer.

#![no_std]

pub mod board;
pub mod play;

pub use board::{BOARD_COLS, BOARD_ROWS, Board, CELL_PIXELS, Direction, Tile};
pub use play::Game;
