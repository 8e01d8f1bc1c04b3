//! Maze console kernel.
//!
//! Boot order matters: console first (so everything after it can
//! log), then the controller pins, then the mailbox-provisioned
//! framebuffer. After that the kernel settles into the polling loop:
//! sample the pad, dispatch on changed button state, sleep a frame.

#![no_std]
#![no_main]

use core::panic::PanicInfo;
use drivers::console;
use drivers::hal::framebuffer::{FrameBuffer, FrameBufferConfig, color};
use drivers::hal::input::Buttons;
use drivers::hal::serial::SerialConfig;
use drivers::hal::timer::MonotonicTimer;
use drivers::peripheral::snes::{SnesController, SnesPins};
use drivers::platform::bcm283x::framebuffer::Bcm283xFramebuffer;
use drivers::platform::bcm283x::gpio::Bcm283xGpio;
use drivers::platform::bcm283x::timer::SystemTimer;
use game::{BOARD_COLS, BOARD_ROWS, CELL_PIXELS, Direction, Game};
use log::{LevelFilter, error, info};

/// Controller poll interval: roughly one 60 Hz frame.
const FRAME_DELAY_US: u32 = 16_667;

const MOVES: [(Buttons, Direction); 4] = [
    (Buttons::LEFT, Direction::Left),
    (Buttons::RIGHT, Direction::Right),
    (Buttons::UP, Direction::Up),
    (Buttons::DOWN, Direction::Down),
];

#[unsafe(no_mangle)]
pub extern "C" fn kernel_main() -> ! {
    if console::init_console(SerialConfig::default()).is_err() {
        loop {}
    }
    let _ = console::init_logging(LevelFilter::Info);
    info!("maze console starting");

    let timer = unsafe { SystemTimer::new() };

    let mut pad = SnesController::new(
        unsafe { Bcm283xGpio::new() },
        unsafe { SystemTimer::new() },
        SnesPins::default(),
    );
    if let Err(e) = pad.init() {
        error!("controller pin setup failed: {:?}", e);
    }

    let mut fb = match unsafe { Bcm283xFramebuffer::new(FrameBufferConfig::default()) } {
        Ok(fb) => Some(fb),
        Err(e) => {
            error!("cannot initialize frame buffer: {}", e);
            None
        }
    };

    let mut maze = Game::standard();
    if let Some(fb) = fb.as_mut() {
        draw_board(fb, &maze);
        draw_player(fb, &maze);
    }

    let mut held = Buttons::empty();
    loop {
        if let Ok(buttons) = pad.sample() {
            if buttons != held {
                if let Some(fb) = fb.as_mut() {
                    dispatch(fb, &mut maze, buttons);
                }
                held = buttons;
            }
        }

        timer.delay_us(FRAME_DELAY_US);
    }
}

/// Apply one changed button snapshot to the game and the screen.
fn dispatch(fb: &mut Bcm283xFramebuffer, maze: &mut Game, buttons: Buttons) {
    if buttons.contains(Buttons::START) {
        let prev = maze.player();
        maze.reset();
        repaint_cell(fb, maze, prev);
        draw_player(fb, maze);
    }

    for (button, direction) in MOVES {
        if buttons.contains(button) {
            let prev = maze.player();
            if maze.try_move(direction) {
                repaint_cell(fb, maze, prev);
                draw_player(fb, maze);
            }
        }
    }
}

fn cell_color(maze: &Game, (x, y): (usize, usize)) -> u32 {
    if maze.board().is_passable(x, y) {
        color::WHITE
    } else {
        color::BLACK
    }
}

fn paint_cell(fb: &mut Bcm283xFramebuffer, (x, y): (usize, usize), color: u32) {
    fb.draw_rect(
        x as u32 * CELL_PIXELS,
        y as u32 * CELL_PIXELS,
        CELL_PIXELS,
        CELL_PIXELS,
        color,
    );
}

/// Restore a cell to its board color after the player leaves it.
fn repaint_cell(fb: &mut Bcm283xFramebuffer, maze: &Game, cell: (usize, usize)) {
    paint_cell(fb, cell, cell_color(maze, cell));
}

fn draw_board(fb: &mut Bcm283xFramebuffer, maze: &Game) {
    for y in 0..BOARD_ROWS {
        for x in 0..BOARD_COLS {
            repaint_cell(fb, maze, (x, y));
        }
    }
}

/// The player square: red, or green once it stands on the exit.
fn draw_player(fb: &mut Bcm283xFramebuffer, maze: &Game) {
    let color = if maze.at_exit() {
        color::GREEN
    } else {
        color::RED
    };
    paint_cell(fb, maze.player(), color);
}

#[panic_handler]
fn panic(info: &PanicInfo) -> ! {
    error!("kernel panic: {}", info);
    loop {}
}
