/// Terminal renderer — all terminal output lives here.
///
/// Drawing goes into an in-memory cell grid scaled from canvas units to
/// terminal cells; `present` writes the grid out with queued crossterm
/// commands.  Keeping the grid lets the game-over overlay blend its colour
/// over what is already on screen instead of erasing it.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    QueueableCommand,
};
use rock_shooter::render::{Font, Renderer, Rgb};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BACKGROUND: Rgb = Rgb::BLACK;
const C_DEFAULT_FG: Rgb = Rgb::WHITE;

fn to_crossterm(c: Rgb) -> Color {
    Color::Rgb { r: c.r, g: c.g, b: c.b }
}

/// Columns a glyph occupies.  Emoji are double width; variation
/// selectors take no space.
fn char_width(c: char) -> usize {
    match c as u32 {
        0xFE00..=0xFE0F | 0x200D => 0,
        0x1100..=0x115F | 0x2E80..=0xA4CF | 0xAC00..=0xD7A3 | 0xF900..=0xFAFF => 2,
        0x1F000.. => 2,
        _ => 1,
    }
}

fn str_width(s: &str) -> usize {
    s.chars().map(char_width).sum()
}

// ── Cell grid ─────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
struct Cell {
    text: String,
    fg: Rgb,
    bg: Rgb,
    /// Covered by the right half of a wide glyph to its left.
    continuation: bool,
}

impl Cell {
    fn blank() -> Self {
        Cell {
            text: " ".to_string(),
            fg: C_DEFAULT_FG,
            bg: C_BACKGROUND,
            continuation: false,
        }
    }
}

pub struct TerminalRenderer<W: Write> {
    out: W,
    cols: u16,
    rows: u16,
    canvas_width: f64,
    canvas_height: f64,
    cells: Vec<Cell>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, cols: u16, rows: u16, canvas_width: f64, canvas_height: f64) -> Self {
        let mut renderer = TerminalRenderer {
            out,
            cols: 0,
            rows: 0,
            canvas_width: canvas_width.max(1.0),
            canvas_height: canvas_height.max(1.0),
            cells: Vec::new(),
        };
        renderer.resize(cols, rows);
        renderer
    }

    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cells = vec![Cell::blank(); self.cols as usize * self.rows as usize];
        log::debug!("Terminal grid resized to {}x{}", self.cols, self.rows);
    }

    #[cfg(test)]
    fn writer(&mut self) -> &mut W {
        &mut self.out
    }

    fn col_of(&self, x: f64) -> i64 {
        (x / self.canvas_width * self.cols as f64).floor() as i64
    }

    fn row_of(&self, y: f64) -> i64 {
        (y / self.canvas_height * self.rows as f64).floor() as i64
    }

    fn index(&self, col: i64, row: i64) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as i64 || row >= self.rows as i64 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    /// Blank whatever glyph covers a cell, so that it can be overwritten.
    /// A wide glyph is cleared as a whole, whether the cell holds its head
    /// or its right half; otherwise the row would print too many columns.
    fn evict(&mut self, col: i64, row: i64) {
        let mut head = col;
        while head > 0 && self.index(head, row).is_some_and(|i| self.cells[i].continuation) {
            head -= 1;
        }
        let Some(h) = self.index(head, row) else {
            return;
        };
        let width = str_width(&self.cells[h].text).max(1) as i64;
        if head + width <= col {
            return;
        }
        for c in head..head + width {
            if let Some(i) = self.index(c, row) {
                let bg = self.cells[i].bg;
                self.cells[i] = Cell { bg, ..Cell::blank() };
            }
        }
    }

    /// Write `text` starting at a cell, clipping at the grid edges.  A wide
    /// glyph that does not fit entirely on the grid is skipped.
    fn put_str(&mut self, col: i64, row: i64, text: &str, fg: Rgb) {
        let mut c = col;
        let mut last: Option<usize> = None;
        for ch in text.chars() {
            let width = char_width(ch) as i64;
            if width == 0 {
                // Attach combining marks to the glyph just written.
                if let Some(i) = last {
                    self.cells[i].text.push(ch);
                }
                continue;
            }
            last = None;
            if (c..c + width).all(|x| self.index(x, row).is_some()) {
                for x in c..c + width {
                    self.evict(x, row);
                }
                if let Some(i) = self.index(c, row) {
                    let bg = self.cells[i].bg;
                    self.cells[i] = Cell {
                        text: ch.to_string(),
                        fg,
                        bg,
                        continuation: false,
                    };
                    last = Some(i);
                }
                for x in c + 1..c + width {
                    if let Some(j) = self.index(x, row) {
                        self.cells[j].continuation = true;
                    }
                }
            }
            c += width;
        }
    }

    fn put_centred(&mut self, text: &str, x: f64, y: f64, fg: Rgb) {
        let col = self.col_of(x) - str_width(text) as i64 / 2;
        let row = self.row_of(y);
        self.put_str(col, row, text, fg);
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn clear(&mut self) -> std::io::Result<()> {
        self.cells.iter_mut().for_each(|c| *c = Cell::blank());
        Ok(())
    }

    // Cells can't be rotated, so `_rotation` is dropped.
    fn draw_glyph_at(&mut self, glyph: &str, x: f64, y: f64, _rotation: f64) -> std::io::Result<()> {
        self.put_centred(glyph, x, y, C_DEFAULT_FG);
        Ok(())
    }

    fn draw_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Rgb) -> std::io::Result<()> {
        let (c0, r0) = (self.col_of(x), self.row_of(y));
        // Anything smaller than a cell still shows as one cell.
        let c1 = self.col_of(x + w).max(c0 + 1);
        let r1 = self.row_of(y + h).max(r0 + 1);
        for row in r0..r1 {
            for col in c0..c1 {
                self.evict(col, row);
                if let Some(i) = self.index(col, row) {
                    let bg = self.cells[i].bg;
                    self.cells[i] = Cell {
                        text: "█".to_string(),
                        fg: color,
                        bg,
                        continuation: false,
                    };
                }
            }
        }
        Ok(())
    }

    // A terminal has one font size; every `Font` prints the same.
    fn draw_text(&mut self, text: &str, x: f64, y: f64, _font: Font, color: Rgb) -> std::io::Result<()> {
        self.put_centred(text, x, y, color);
        Ok(())
    }

    fn fill_overlay(&mut self, color: Rgb, alpha: f64) -> std::io::Result<()> {
        for cell in &mut self.cells {
            cell.fg = color.over(cell.fg, alpha);
            cell.bg = color.over(cell.bg, alpha);
        }
        Ok(())
    }

    fn present(&mut self) -> std::io::Result<()> {
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for cell in &self.cells[start..start + self.cols as usize] {
                if cell.continuation {
                    continue;
                }
                self.out.queue(style::SetForegroundColor(to_crossterm(cell.fg)))?;
                self.out.queue(style::SetBackgroundColor(to_crossterm(cell.bg)))?;
                self.out.queue(Print(&cell.text))?;
            }
        }

        park_cursor(&mut self.out)?;
        self.out.flush()
    }
}

/// Park the cursor in a harmless spot with default colours.
fn park_cursor<W: Write>(out: &mut W) -> std::io::Result<()> {
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, 0))?;
    Ok(())
}
