//! Terminal painting
//!
//! The mesh is drawn with upper half blocks: each cell carries two
//! framebuffer rows, the top one as foreground and the bottom one as
//! background. Text is overlaid on top of it.

use std::io::{self, Stdout, Write};

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::style::{
    Attribute, Color, Print, ResetColor, SetAttribute, SetBackgroundColor, SetForegroundColor,
};
use crossterm::terminal::{self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{execute, queue};

use irreverso_runtime::BootSequencer;
use irreverso_shell::AccessScreen;
use irreverso_visual::{Surface, Viewport};

const FALLBACK: Color = Color::Rgb { r: 4, g: 6, b: 10 };
const INK: Color = Color::Rgb { r: 214, g: 226, b: 240 };
const DIM: Color = Color::Rgb { r: 120, g: 136, b: 156 };
const ALERT: Color = Color::Rgb { r: 255, g: 70, b: 90 };

/// Alternate screen held for the lifetime of the guard
pub struct Screen;

impl Screen {
    pub fn enter() -> io::Result<Self> {
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        Ok(Screen)
    }
}

impl Drop for Screen {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), ResetColor, Show, LeaveAlternateScreen);
    }
}

/// Terminal size in cells, 80x24 when it cannot be read
pub fn cells() -> (u16, u16) {
    terminal::size().unwrap_or((80, 24))
}

/// Viewport matching `cells`: one column per pixel, two rows per cell
pub fn viewport_for(cols: u16, rows: u16) -> Viewport {
    Viewport::new(f32::from(cols), f32::from(rows) * 2.0, 1.0)
}

pub struct BootPainter {
    out: Stdout,
    viewport: Viewport,
    cells: (u16, u16),
}

impl BootPainter {
    pub fn new(viewport: Viewport) -> Self {
        BootPainter {
            out: io::stdout(),
            viewport,
            cells: cells(),
        }
    }

    pub fn paint(&mut self, seq: &BootSequencer) -> io::Result<()> {
        let now = cells();
        if now != self.cells {
            self.cells = now;
            self.viewport
                .resize(f32::from(now.0), f32::from(now.1) * 2.0);
        }
        let (cols, rows) = self.cells;

        match seq.renderer().framebuffer() {
            Some(surface) => self.mesh(surface, cols, rows)?,
            None => {
                queue!(self.out, SetBackgroundColor(FALLBACK), Clear(ClearType::All))?;
            }
        }

        queue!(
            self.out,
            SetBackgroundColor(Color::Reset),
            MoveTo(2, 1),
            SetForegroundColor(INK),
            SetAttribute(Attribute::Bold),
            Print(clip(seq.title(), cols)),
            SetAttribute(Attribute::Reset),
            MoveTo(2, 2),
            SetForegroundColor(if seq.glitch() { ALERT } else { DIM }),
            Print(clip(seq.narrative(), cols)),
        )?;

        let footer_row = rows.saturating_sub(1);
        let log_rows = usize::from(footer_row.saturating_sub(4));
        let lines = seq.visible_lines();
        let start = lines.len().saturating_sub(log_rows);
        queue!(self.out, SetForegroundColor(INK))?;
        for (row, line) in (4u16..).zip(&lines[start..]) {
            queue!(self.out, MoveTo(2, row), Print(clip(line, cols)))?;
        }

        queue!(
            self.out,
            MoveTo(2, footer_row),
            SetForegroundColor(DIM),
            Print(clip(&seq.footer(), cols)),
            ResetColor,
        )?;
        self.out.flush()
    }

    fn mesh(&mut self, surface: &Surface, cols: u16, rows: u16) -> io::Result<()> {
        let (width, height) = surface.size();
        if width == 0 || height == 0 {
            return Ok(());
        }
        let sample = |col: u16, pixel_row: u32| {
            let x = u32::from(col) * width / u32::from(cols.max(1));
            let y = pixel_row * height / (u32::from(rows.max(1)) * 2);
            surface.pixel(x, y).map_or(FALLBACK, |[r, g, b, _]| Color::Rgb { r, g, b })
        };

        for row in 0..rows {
            queue!(self.out, MoveTo(0, row))?;
            for col in 0..cols {
                let top = sample(col, u32::from(row) * 2);
                let bottom = sample(col, u32::from(row) * 2 + 1);
                queue!(
                    self.out,
                    SetForegroundColor(top),
                    SetBackgroundColor(bottom),
                    Print('▀')
                )?;
            }
        }
        Ok(())
    }
}

pub fn paint_access(out: &mut Stdout, screen: &AccessScreen) -> io::Result<()> {
    let (cols, _) = cells();
    queue!(
        out,
        SetBackgroundColor(Color::Reset),
        Clear(ClearType::All),
        MoveTo(2, 1),
        SetForegroundColor(ALERT),
        SetAttribute(Attribute::Bold),
        Print(clip(screen.header(), cols)),
        SetAttribute(Attribute::Reset),
        SetForegroundColor(INK),
    )?;
    for (row, line) in (3u16..).zip(screen.lines()) {
        queue!(out, MoveTo(2, row), Print(clip(&line, cols)))?;
    }
    queue!(out, ResetColor)?;
    out.flush()
}

fn clip(text: &str, cols: u16) -> String {
    text.chars().take(usize::from(cols.saturating_sub(4))).collect()
}
