use crate::math::Vec2;
use crate::paint::Painter;
use crate::palette::Rgba;
use crossterm::{
    cursor,
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::io::{self, Write};

// Braille: each terminal cell is 2x4 dots.
pub(crate) const SUB_X: u32 = 2;
pub(crate) const SUB_Y: u32 = 4;

/// Minimum alpha for a dot to count as ink.
const INK_ALPHA: u8 = 32;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Cell {
    pub(crate) ch: char,
    pub(crate) fg: Color,
    pub(crate) bg: Color,
}

impl Default for Cell {
    fn default() -> Self {
        Self {
            ch: ' ',
            fg: Color::White,
            bg: Color::Black,
        }
    }
}

pub(crate) struct CellBuffer {
    pub(crate) w: u16,
    pub(crate) h: u16,
    pub(crate) cells: Vec<Cell>,
}

impl CellBuffer {
    pub(crate) fn new(w: u16, h: u16) -> Self {
        Self {
            w,
            h,
            cells: vec![Cell::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u16, y: u16) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn set(&mut self, x: u16, y: u16, c: Cell) {
        if x < self.w && y < self.h {
            let i = self.idx(x, y);
            self.cells[i] = c;
        }
    }
    #[cfg(test)]
    pub(crate) fn get(&self, x: u16, y: u16) -> Option<Cell> {
        (x < self.w && y < self.h).then(|| self.cells[self.idx(x, y)])
    }
}

/// Braille-resolution RGBA ink over a per-row background.
///
/// Each primitive blends a dot at most once (tracked by `stamp`), so
/// overlapping stamps inside one stroke do not darken translucent colours.
pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Rgba>,
    pub(crate) bg_rows: Vec<Rgba>,
    stamp: Vec<u32>,
    op: u32,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        let n = (w as usize) * (h as usize);
        Self {
            w,
            h,
            px: vec![Rgba::default(); n],
            bg_rows: vec![Rgba::rgb(0, 0, 0); h as usize],
            stamp: vec![0; n],
            op: 0,
        }
    }

    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }

    pub(crate) fn clear(&mut self) {
        self.px.fill(Rgba::default());
        self.bg_rows.fill(Rgba::rgb(0, 0, 0));
    }

    fn begin_op(&mut self) {
        self.op = self.op.wrapping_add(1);
        if self.op == 0 {
            self.stamp.fill(0);
            self.op = 1;
        }
    }

    fn blend_once(&mut self, x: i32, y: i32, src: Rgba) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h {
            return;
        }
        let i = self.idx(x, y);
        if self.stamp[i] == self.op {
            return;
        }
        self.stamp[i] = self.op;
        self.px[i] = blend_over(self.px[i], src);
    }

    /// Paint every dot whose centre satisfies `inside`, within a bounding box.
    fn shade<F>(&mut self, min: Vec2, max: Vec2, color: Rgba, inside: F)
    where
        F: Fn(Vec2) -> bool,
    {
        let x0 = min.x.floor().max(0.0) as i32;
        let y0 = min.y.floor().max(0.0) as i32;
        let x1 = (max.x.ceil() as i32).min(self.w as i32 - 1);
        let y1 = (max.y.ceil() as i32).min(self.h as i32 - 1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                if inside(Vec2::new(x as f32 + 0.5, y as f32 + 0.5)) {
                    self.blend_once(x, y, color);
                }
            }
        }
    }
}

fn blend_over(dst: Rgba, src: Rgba) -> Rgba {
    let sa = src.a as f32 / 255.0;
    let da = dst.a as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 1e-6 {
        return Rgba::default();
    }

    let blend = |sc: u8, dc: u8| -> u8 {
        let sc = sc as f32 / 255.0;
        let dc = dc as f32 / 255.0;
        let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
        (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
    };

    Rgba {
        r: blend(src.r, dst.r),
        g: blend(src.g, dst.g),
        b: blend(src.b, dst.b),
        a: (out_a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
    }
}

fn dist_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.x * ab.x + ab.y * ab.y;
    if len2 <= 1e-9 {
        return p.dist(a);
    }
    let ap = p - a;
    let t = ((ap.x * ab.x + ap.y * ab.y) / len2).clamp(0.0, 1.0);
    p.dist(a + ab * t)
}

/// Maps logical pixels onto the braille canvas.
pub(crate) struct BrailleSurface<'a> {
    pub(crate) canvas: &'a mut PixelCanvas,
    pub(crate) px_per_dot: f32,
}

impl BrailleSurface<'_> {
    fn to_dots(&self, p: Vec2) -> Vec2 {
        p * (1.0 / self.px_per_dot)
    }

    fn disc(&mut self, c: Vec2, r: f32, color: Rgba) {
        if r < 0.75 {
            // Too small to cover a dot centre reliably; light the dot it sits in.
            self.canvas.blend_once(c.x.floor() as i32, c.y.floor() as i32, color);
            return;
        }
        let pad = Vec2::new(r, r);
        self.canvas
            .shade(c - pad, c + pad, color, |p| p.dist(c) <= r);
    }
}

impl Painter for BrailleSurface<'_> {
    fn hline(&mut self, y: f32, color: Rgba) {
        let row = (y / self.px_per_dot).floor();
        if row >= 0.0 && (row as usize) < self.canvas.bg_rows.len() {
            self.canvas.bg_rows[row as usize] = color;
        }
    }

    fn fill_circle(&mut self, center: Vec2, diameter: f32, color: Rgba) {
        self.canvas.begin_op();
        let c = self.to_dots(center);
        self.disc(c, diameter * 0.5 / self.px_per_dot, color);
    }

    fn stroke_circle(&mut self, center: Vec2, diameter: f32, weight: f32, color: Rgba) {
        self.canvas.begin_op();
        let c = self.to_dots(center);
        let r = diameter * 0.5 / self.px_per_dot;
        let half = (weight * 0.5 / self.px_per_dot).max(0.5);
        let (inner, outer) = ((r - half).max(0.0), r + half);
        let pad = Vec2::new(outer, outer);
        self.canvas.shade(c - pad, c + pad, color, |p| {
            let d = p.dist(c);
            d >= inner && d <= outer
        });
    }

    fn polyline(&mut self, points: &[Vec2], weight: f32, color: Rgba) {
        self.canvas.begin_op();
        let half = (weight * 0.5 / self.px_per_dot).max(0.5);
        let pad = Vec2::new(half, half);
        for seg in points.windows(2) {
            let a = self.to_dots(seg[0]);
            let b = self.to_dots(seg[1]);
            let min = Vec2::new(a.x.min(b.x), a.y.min(b.y)) - pad;
            let max = Vec2::new(a.x.max(b.x), a.y.max(b.y)) + pad;
            self.canvas
                .shade(min, max, color, |p| dist_to_segment(p, a, b) <= half);
        }
    }
}

/* -----------------------------
   Braille encoding: 2×4 dots -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: u32, dy: u32) -> u8 {
    // (0,0)=1 (0,1)=2 (0,2)=4 (0,3)=64
    // (1,0)=8 (1,1)=16 (1,2)=32 (1,3)=128
    match (dx, dy) {
        (0, 0) => 0x01,
        (0, 1) => 0x02,
        (0, 2) => 0x04,
        (0, 3) => 0x40,
        (1, 0) => 0x08,
        (1, 1) => 0x10,
        (1, 2) => 0x20,
        (1, 3) => 0x80,
        _ => 0x00,
    }
}

fn to_color(c: Rgba) -> Color {
    Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer) {
    let cols = out.w as u32;
    let rows = out.h as u32;

    for cy in 0..rows {
        // background: mean of the four dot rows behind this cell
        let (mut br, mut bgc, mut bb, mut bn) = (0u32, 0u32, 0u32, 0u32);
        for dy in 0..SUB_Y {
            if let Some(c) = canvas.bg_rows.get((cy * SUB_Y + dy) as usize) {
                br += c.r as u32;
                bgc += c.g as u32;
                bb += c.b as u32;
                bn += 1;
            }
        }
        let bg = if bn > 0 {
            Rgba::rgb((br / bn) as u8, (bgc / bn) as u8, (bb / bn) as u8)
        } else {
            Rgba::rgb(0, 0, 0)
        };

        for cx in 0..cols {
            let px0 = cx * SUB_X;
            let py0 = cy * SUB_Y;

            let mut mask: u8 = 0;
            let (mut sum_r, mut sum_g, mut sum_b, mut sum_a) = (0u32, 0u32, 0u32, 0u32);
            let mut ink_count: u32 = 0;

            for dy in 0..SUB_Y {
                for dx in 0..SUB_X {
                    let x = px0 + dx;
                    let y = py0 + dy;
                    if x >= canvas.w || y >= canvas.h {
                        continue;
                    }
                    let p = canvas.px[canvas.idx(x, y)];
                    if p.a >= INK_ALPHA {
                        mask |= braille_bit(dx, dy);
                        sum_r += p.r as u32;
                        sum_g += p.g as u32;
                        sum_b += p.b as u32;
                        sum_a += p.a as u32;
                        ink_count += 1;
                    }
                }
            }

            let ch = char::from_u32(0x2800 + (mask as u32)).unwrap_or(' ');
            let fg = if ink_count > 0 {
                let ink = Rgba::rgb(
                    (sum_r / ink_count) as u8,
                    (sum_g / ink_count) as u8,
                    (sum_b / ink_count) as u8,
                );
                let a = sum_a as f32 / ink_count as f32 / 255.0;
                to_color(bg.lerp(ink, a))
            } else {
                Color::White
            };

            out.set(
                cx as u16,
                cy as u16,
                Cell {
                    ch: if mask == 0 { ' ' } else { ch },
                    fg,
                    bg: to_color(bg),
                },
            );
        }
    }
}

pub(crate) fn draw_text(buf: &mut CellBuffer, x: u16, y: u16, s: &str, fg: Color, bg: Color) {
    for (i, ch) in s.chars().enumerate() {
        let xx = x.saturating_add(i as u16);
        if xx >= buf.w || y >= buf.h {
            break;
        }
        buf.set(xx, y, Cell { ch, fg, bg });
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
    full_redraw: bool,
    active: bool,
}

impl Terminal {
    /// An armed terminal: dropping it restores the screen and leaves raw mode.
    fn armed(out: io::Stdout, cols: u16, rows: u16) -> Self {
        Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            canvas: PixelCanvas::new(cols as u32 * SUB_X, rows as u32 * SUB_Y),
            full_redraw: true,
            active: true,
        }
    }

    pub(crate) fn begin() -> anyhow::Result<Self> {
        terminal::enable_raw_mode()?;
        // From here on any early return goes through Drop.
        let mut term = Self::armed(io::stdout(), 0, 0);
        execute!(
            term.out,
            EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;

        let (cols, rows) = terminal::size()?;
        term.resize(cols, rows);
        Ok(term)
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        queue!(
            self.out,
            EndSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            DisableMouseCapture,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
        self.prev = CellBuffer::new(cols, rows);
        self.cur = CellBuffer::new(cols, rows);
        self.canvas = PixelCanvas::new(cols as u32 * SUB_X, rows as u32 * SUB_Y);
        self.full_redraw = true;
    }

    pub(crate) fn present(&mut self) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if !self.full_redraw && c == self.prev.cells[i] {
                    continue;
                }

                queue!(self.out, cursor::MoveTo(x, y))?;

                if last_fg != Some(c.fg) {
                    queue!(self.out, SetForegroundColor(c.fg))?;
                    last_fg = Some(c.fg);
                }
                if last_bg != Some(c.bg) {
                    queue!(self.out, SetBackgroundColor(c.bg))?;
                    last_bg = Some(c.bg);
                }

                queue!(self.out, Print(c.ch))?;
            }
        }

        queue!(self.out, ResetColor, EndSynchronizedUpdate)?;
        self.out.flush()?;
        self.prev.cells.copy_from_slice(&self.cur.cells);
        self.full_redraw = false;
        Ok(())
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = self.end();
    }
}
