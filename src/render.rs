use std::io::{self, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::style::{Color, Print, ResetColor, SetForegroundColor};
use crossterm::terminal::{self, Clear, ClearType};
use crossterm::QueueableCommand;
use unicode_width::UnicodeWidthStr;

use maze_chase::{Cell, Game, GhostKind, GhostMode, Phase, Tile};

const CELL_W: usize = 2;
// Rows above the board (HUD) and below it (banner).
const HUD_ROWS: usize = 1;
const BANNER_ROWS: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    Player,
    Ghost,
    Frightened,
    Eyes,
    Wall,
    Empty,
    Dot,
    Power,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenCell {
    pub glyph: Glyph,
    pub color: Color,
}

const BLANK: ScreenCell = ScreenCell {
    glyph: Glyph::Empty,
    color: Color::Reset,
};

/// Diffing terminal renderer. Only cells that changed since the last frame
/// are redrawn.
pub struct Renderer {
    last: Vec<ScreenCell>,
    last_hud: String,
    last_banner: String,
    needs_full: bool,
    origin_x: u16,
    origin_y: u16,
}

impl Renderer {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            last: vec![BLANK; rows * cols],
            last_hud: String::new(),
            last_banner: String::new(),
            needs_full: true,
            origin_x: 0,
            origin_y: HUD_ROWS as u16,
        }
    }

    /// Force a full redraw on the next frame, e.g. after a new board.
    pub fn invalidate(&mut self) {
        self.needs_full = true;
    }

    pub fn render(&mut self, stdout: &mut Stdout, game: &Game) -> io::Result<()> {
        let grid = game.grid();
        let (rows, cols) = (grid.rows(), grid.cols());
        if self.last.len() != rows * cols {
            self.last = vec![BLANK; rows * cols];
            self.needs_full = true;
        }
        let needed_h = (rows + HUD_ROWS + BANNER_ROWS) as u16;
        let needed_w = (cols * CELL_W) as u16;

        stdout.queue(MoveTo(0, 0))?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < needed_w || term_h < needed_h {
            stdout.queue(Clear(ClearType::All))?;
            let msg = format!(
                "Terminal too small. Need at least {}x{} (cols x rows). Current: {}x{}.",
                needed_w, needed_h, term_w, term_h
            );
            stdout.queue(Print(msg))?;
            stdout.flush()?;
            self.needs_full = true;
            return Ok(());
        }

        let origin_x = (term_w - needed_w) / 2;
        let origin_y = (term_h - needed_h) / 2 + HUD_ROWS as u16;
        if origin_x != self.origin_x || origin_y != self.origin_y {
            self.origin_x = origin_x;
            self.origin_y = origin_y;
            self.needs_full = true;
        }
        if self.needs_full {
            stdout.queue(Clear(ClearType::All))?;
        }

        let hud = hud_line(game);
        if self.needs_full || hud != self.last_hud {
            stdout.queue(MoveTo(self.origin_x, self.origin_y - 1))?;
            stdout.queue(SetForegroundColor(Color::White))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(Print(&hud))?;
            stdout.queue(ResetColor)?;
            self.last_hud = hud;
        }

        let blink = game.tick_count() % 2 == 1;
        for row in 0..rows {
            for col in 0..cols {
                let cell = cell_for(game, Cell::new(row, col), blink);
                let idx = row * cols + col;
                if self.needs_full || cell != self.last[idx] {
                    self.last[idx] = cell;
                    self.draw_cell(stdout, row, col, cell)?;
                }
            }
        }

        let banner = banner_line(game);
        if self.needs_full || banner != self.last_banner {
            stdout.queue(MoveTo(self.origin_x, self.origin_y + rows as u16))?;
            stdout.queue(Clear(ClearType::CurrentLine))?;
            stdout.queue(SetForegroundColor(banner_color(game.phase())))?;
            stdout.queue(Print(&banner))?;
            stdout.queue(ResetColor)?;
            self.last_banner = banner;
        }
        self.needs_full = false;

        stdout.flush()?;
        Ok(())
    }

    fn draw_cell(
        &self,
        stdout: &mut Stdout,
        row: usize,
        col: usize,
        cell: ScreenCell,
    ) -> io::Result<()> {
        let text = match cell.glyph {
            Glyph::Player => "😃",
            Glyph::Ghost => "👻",
            Glyph::Frightened => "😱",
            Glyph::Eyes => "👀",
            Glyph::Wall => "██",
            Glyph::Empty => "  ",
            Glyph::Dot => "· ",
            Glyph::Power => "● ",
        };
        let x_pos = self.origin_x + (col * CELL_W) as u16;
        let y_pos = self.origin_y + row as u16;
        stdout.queue(MoveTo(x_pos, y_pos))?;
        stdout.queue(SetForegroundColor(cell.color))?;
        stdout.queue(Print(text))?;
        let w = UnicodeWidthStr::width(text);
        if w < CELL_W {
            for _ in 0..(CELL_W - w) {
                stdout.queue(Print(' '))?;
            }
        }
        stdout.queue(ResetColor)?;
        Ok(())
    }
}

/// What to draw at `cell`. The player sits on top, then ghosts, then
/// collectibles, then the maze itself.
pub fn cell_for(game: &Game, cell: Cell, blink: bool) -> ScreenCell {
    if game.player().pos == cell {
        return ScreenCell {
            glyph: Glyph::Player,
            color: Color::Yellow,
        };
    }
    // Prefer a live ghost over a pair of eyes sharing the cell.
    let ghost = game
        .ghosts()
        .iter()
        .filter(|g| g.pos == cell)
        .min_by_key(|g| g.mode == GhostMode::Eaten);
    if let Some(ghost) = ghost {
        return match ghost.mode {
            GhostMode::Normal => ScreenCell {
                glyph: Glyph::Ghost,
                color: ghost_color(ghost.kind),
            },
            GhostMode::Frightened => ScreenCell {
                glyph: Glyph::Frightened,
                color: if blink { Color::White } else { Color::Blue },
            },
            GhostMode::Eaten => ScreenCell {
                glyph: Glyph::Eyes,
                color: Color::DarkGrey,
            },
        };
    }
    let items = game.collectibles();
    if items.pellets().contains(&cell) {
        return if blink {
            BLANK
        } else {
            ScreenCell {
                glyph: Glyph::Power,
                color: Color::Magenta,
            }
        };
    }
    if items.dots().contains(&cell) {
        return ScreenCell {
            glyph: Glyph::Dot,
            color: Color::White,
        };
    }
    match game.grid().tile(cell) {
        Tile::Wall => ScreenCell {
            glyph: Glyph::Wall,
            color: Color::Blue,
        },
        Tile::Open => BLANK,
    }
}

pub fn ghost_color(kind: GhostKind) -> Color {
    match kind {
        GhostKind::Blinky => Color::Red,
        GhostKind::Pinky => Color::Magenta,
        GhostKind::Inky => Color::Cyan,
        GhostKind::Clyde => Color::DarkYellow,
    }
}

fn hud_line(game: &Game) -> String {
    let items = game.collectibles();
    let mut hud = format!(
        "Score: {}  Dots: {}  Pellets: {}",
        game.score(),
        items.dots().len(),
        items.pellets().len()
    );
    if let Some(ticks) = game.frightened_remaining() {
        let secs = frighten_secs(ticks, game.config().tick_ms);
        hud.push_str(&format!("  Power: {secs}s"));
    }
    hud.push_str(&format!("  Seed: {}", game.seed()));
    hud
}

/// Whole seconds left, rounded up so the HUD never shows 0 while it runs.
fn frighten_secs(ticks: u32, tick_ms: u64) -> u64 {
    u64::from(ticks).saturating_mul(tick_ms).div_ceil(1000)
}

fn banner_line(game: &Game) -> String {
    match game.phase() {
        Phase::NotStarted => "Press s to start (q to quit)".to_string(),
        Phase::Running => "(r to restart, q to quit)".to_string(),
        Phase::Lost => format!(
            "GAME OVER - Final Score: {} (s to play again, q to quit)",
            game.score()
        ),
        Phase::Won => format!(
            "YOU WIN - Final Score: {} (s to play again, q to quit)",
            game.score()
        ),
    }
}

fn banner_color(phase: Phase) -> Color {
    match phase {
        Phase::NotStarted | Phase::Running => Color::White,
        Phase::Lost => Color::Red,
        Phase::Won => Color::Green,
    }
}
