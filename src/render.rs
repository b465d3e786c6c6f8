use crate::geometry::Point;
use crate::retained::DrawItem;
use crate::surface::{Paint, Stroke};
use crossterm::{
    cursor,
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{
        self, BeginSynchronizedUpdate, Clear, ClearType, DisableLineWrap, EnableLineWrap,
        EndSynchronizedUpdate, EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use std::f64::consts::PI;
use std::io::{self, Write};

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
    pub(crate) fn clear(&mut self, bg: Color) {
        for c in &mut self.cells {
            *c = Cell { bg, ..Cell::default() };
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Pixel {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl Pixel {
    fn paint(p: Paint, opacity: f64) -> Self {
        let (r, g, b) = p.rgb();
        let a = (opacity.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
        Self { r, g, b, a }
    }
}

pub(crate) struct PixelCanvas {
    pub(crate) w: u32,
    pub(crate) h: u32,
    pub(crate) px: Vec<Pixel>,
}

impl PixelCanvas {
    pub(crate) fn new(w: u32, h: u32) -> Self {
        Self {
            w,
            h,
            px: vec![Pixel::default(); (w as usize) * (h as usize)],
        }
    }
    pub(crate) fn idx(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.w as usize) + (x as usize)
    }
    pub(crate) fn clear(&mut self, p: Pixel) {
        self.px.fill(p);
    }
    pub(crate) fn get(&self, x: u32, y: u32) -> Pixel {
        if x >= self.w || y >= self.h {
            return Pixel::default();
        }
        self.px[self.idx(x, y)]
    }
    fn blend_over(&mut self, x: i32, y: i32, src: Pixel) {
        if x < 0 || y < 0 {
            return;
        }
        let (x, y) = (x as u32, y as u32);
        if x >= self.w || y >= self.h {
            return;
        }
        let i = self.idx(x, y);
        let dst = self.px[i];

        let sa = src.a as f32 / 255.0;
        let da = dst.a as f32 / 255.0;

        let out_a = sa + da * (1.0 - sa);
        if out_a <= 1e-6 {
            self.px[i] = Pixel::default();
            return;
        }

        let blend = |sc: u8, dc: u8| -> u8 {
            let sc = sc as f32 / 255.0;
            let dc = dc as f32 / 255.0;
            let out = (sc * sa + dc * da * (1.0 - sa)) / out_a;
            (out.clamp(0.0, 1.0) * 255.0 + 0.5) as u8
        };

        self.px[i] = Pixel {
            r: blend(src.r, dst.r),
            g: blend(src.g, dst.g),
            b: blend(src.b, dst.b),
            a: (out_a.clamp(0.0, 1.0) * 255.0 + 0.5) as u8,
        };
    }
}

pub(crate) struct Terminal {
    pub(crate) out: io::Stdout,
    pub(crate) cols: u16,
    pub(crate) rows: u16,
    pub(crate) prev: CellBuffer,
    pub(crate) cur: CellBuffer,
    pub(crate) canvas: PixelCanvas,
}

/// Braille: 2×4 pixels per cell; the bottom row is kept for the status line.
fn canvas_for(cols: u16, rows: u16) -> PixelCanvas {
    PixelCanvas::new(cols as u32 * 2, rows.saturating_sub(1) as u32 * 4)
}

impl Terminal {
    pub(crate) fn begin() -> anyhow::Result<Self> {
        let mut out = io::stdout();
        execute!(
            out,
            EnterAlternateScreen,
            cursor::Hide,
            DisableLineWrap,
            terminal::Clear(ClearType::All)
        )?;
        terminal::enable_raw_mode()?;

        let (cols, rows) = terminal::size()?;
        Ok(Self {
            out,
            cols,
            rows,
            prev: CellBuffer::new(cols, rows),
            cur: CellBuffer::new(cols, rows),
            canvas: canvas_for(cols, rows),
        })
    }

    pub(crate) fn end(&mut self) -> anyhow::Result<()> {
        queue!(
            self.out,
            BeginSynchronizedUpdate,
            ResetColor,
            Clear(ClearType::All),
            cursor::Show,
            EnableLineWrap,
            EndSynchronizedUpdate,
            LeaveAlternateScreen
        )?;
        self.out.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    pub(crate) fn resize_if_needed(&mut self) -> anyhow::Result<bool> {
        let (c, r) = terminal::size()?;
        if c == self.cols && r == self.rows {
            return Ok(false);
        }
        self.cols = c;
        self.rows = r;
        self.prev = CellBuffer::new(c, r);
        self.cur = CellBuffer::new(c, r);
        self.canvas = canvas_for(c, r);
        execute!(self.out, Clear(ClearType::All))?;
        Ok(true)
    }

    pub(crate) fn present(&mut self, diff_only: bool) -> anyhow::Result<()> {
        queue!(self.out, BeginSynchronizedUpdate)?;

        let mut last_fg = None;
        let mut last_bg = None;

        for y in 0..self.rows {
            for x in 0..self.cols {
                let i = self.cur.idx(x, y);
                let c = self.cur.cells[i];
                if diff_only && c == self.prev.cells[i] {
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
        Ok(())
    }
}

/* -----------------------------
   Braille encoding: 2×4 pixels -> U+2800..U+28FF
------------------------------ */

fn braille_bit(dx: u32, dy: u32) -> u8 {
    // Dot mapping:
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

pub(crate) fn canvas_to_cells(canvas: &PixelCanvas, out: &mut CellBuffer, bg: Color) {
    let cols = out.w as u32;
    let rows = (canvas.h + 3) / 4;

    for cy in 0..rows.min(out.h as u32) {
        for cx in 0..cols {
            let px0 = cx * 2;
            let py0 = cy * 4;

            let mut mask: u8 = 0;
            let mut sum_r: u32 = 0;
            let mut sum_g: u32 = 0;
            let mut sum_b: u32 = 0;
            let mut ink_count: u32 = 0;

            for dy in 0..4 {
                for dx in 0..2 {
                    let p = canvas.get(px0 + dx, py0 + dy);
                    // threshold: treat alpha as ink
                    if p.a >= 32 {
                        mask |= braille_bit(dx, dy);
                        sum_r += p.r as u32;
                        sum_g += p.g as u32;
                        sum_b += p.b as u32;
                        ink_count += 1;
                    }
                }
            }

            if ink_count == 0 {
                continue;
            }
            let ch = char::from_u32(0x2800 + (mask as u32)).unwrap_or(' ');
            let fg = Color::Rgb {
                r: (sum_r / ink_count) as u8,
                g: (sum_g / ink_count) as u8,
                b: (sum_b / ink_count) as u8,
            };
            out.set(cx as u16, cy as u16, Cell { ch, fg, bg });
        }
    }
}

/* -----------------------------
   Vector scene -> braille pixels
------------------------------ */

/// Uniform scene-to-pixel mapping, centred on the canvas.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Viewport {
    pub(crate) scale: f64,
    pub(crate) x0: f64,
    pub(crate) y0: f64,
}

impl Viewport {
    pub(crate) fn fit(scene_w: f64, scene_h: f64, px_w: u32, px_h: u32) -> Self {
        let scale = (px_w as f64 / scene_w).min(px_h as f64 / scene_h);
        Self {
            scale,
            x0: (px_w as f64 - scene_w * scale) * 0.5,
            y0: (px_h as f64 - scene_h * scale) * 0.5,
        }
    }

    pub(crate) fn map(&self, p: Point) -> (f64, f64) {
        (self.x0 + p.x * self.scale, self.y0 + p.y * self.scale)
    }
}

/// A marker glyph, drawn as a whole cell on top of the braille layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Glyph {
    pub(crate) col: u16,
    pub(crate) row: u16,
    pub(crate) ch: char,
    pub(crate) fg: Color,
    /// Fill of the disc under the glyph, if it sits on one.
    pub(crate) bg: Option<Color>,
}

fn paint_color(p: Paint) -> Color {
    let (r, g, b) = p.rgb();
    Color::Rgb { r, g, b }
}

/// On/off for a point `arc` scene units along a dashed stroke.
fn dash_on(stroke: &Stroke, arc: f64) -> bool {
    match stroke.dash {
        Some(d) if d > 0.0 => ((arc / d).floor() as i64).rem_euclid(2) == 0,
        _ => true,
    }
}

pub(crate) fn rasterize(items: &[DrawItem<'_>], vp: Viewport, canvas: &mut PixelCanvas) -> Vec<Glyph> {
    let mut glyphs = Vec::new();
    // a marker is a disc followed by its glyph at the same centre
    let mut last_disc: Option<(Point, Paint)> = None;
    for item in items {
        match item {
            DrawItem::Circle { center, radius, fill, stroke } => {
                last_disc = fill.map(|f| (*center, f));
                let (cx, cy) = vp.map(*center);
                let r = (radius * vp.scale).max(0.5);
                if let Some(f) = fill {
                    fill_disc(canvas, cx, cy, r, Pixel::paint(*f, 1.0));
                }
                if let Some(s) = stroke {
                    stroke_circle(canvas, cx, cy, r, *radius, s);
                }
            }
            DrawItem::Line { from, to, stroke } => {
                last_disc = None;
                if let Some(s) = stroke {
                    stroke_line(canvas, vp.map(*from), vp.map(*to), vp.scale, s);
                }
            }
            DrawItem::Text { at, content, fill } => {
                let Some(ch) = content.chars().next() else {
                    continue;
                };
                let (x, y) = vp.map(*at);
                if x < 0.0 || y < 0.0 {
                    continue;
                }
                glyphs.push(Glyph {
                    col: (x / 2.0) as u16,
                    row: (y / 4.0) as u16,
                    ch,
                    fg: paint_color(fill.unwrap_or(Paint::White)),
                    bg: last_disc.filter(|(c, _)| c == at).map(|(_, f)| paint_color(f)),
                });
            }
        }
    }
    glyphs
}

fn fill_disc(canvas: &mut PixelCanvas, cx: f64, cy: f64, r: f64, p: Pixel) {
    let (x_lo, x_hi) = ((cx - r).floor() as i32, (cx + r).ceil() as i32);
    let (y_lo, y_hi) = ((cy - r).floor() as i32, (cy + r).ceil() as i32);
    for y in y_lo..=y_hi {
        for x in x_lo..=x_hi {
            let dx = x as f64 + 0.5 - cx;
            let dy = y as f64 + 0.5 - cy;
            if dx * dx + dy * dy <= r * r {
                canvas.blend_over(x, y, p);
            }
        }
    }
}

/// `scene_r` is the radius before scaling; dashes are measured in scene units.
fn stroke_circle(canvas: &mut PixelCanvas, cx: f64, cy: f64, r: f64, scene_r: f64, s: &Stroke) {
    let p = Pixel::paint(s.color, s.opacity);
    let steps = ((2.0 * PI * r) * 2.0).max(24.0) as usize;
    for i in 0..steps {
        let theta = 2.0 * PI * i as f64 / steps as f64;
        if !dash_on(s, theta * scene_r) {
            continue;
        }
        let x = cx + r * theta.cos();
        let y = cy + r * theta.sin();
        canvas.blend_over(x.floor() as i32, y.floor() as i32, p);
    }
}

fn stroke_line(canvas: &mut PixelCanvas, a: (f64, f64), b: (f64, f64), scale: f64, s: &Stroke) {
    let p = Pixel::paint(s.color, s.opacity);
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len = (dx * dx + dy * dy).sqrt();
    let steps = (len.ceil() as usize).max(1);
    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        if scale > 0.0 && !dash_on(s, t * len / scale) {
            continue;
        }
        let x = a.0 + dx * t;
        let y = a.1 + dy * t;
        canvas.blend_over(x.floor() as i32, y.floor() as i32, p);
    }
}

/// `bg` is used for glyphs that do not sit on a disc.
pub(crate) fn draw_glyphs(buf: &mut CellBuffer, glyphs: &[Glyph], bg: Color) {
    for g in glyphs {
        buf.set(g.col, g.row, Cell { ch: g.ch, fg: g.fg, bg: g.bg.unwrap_or(bg) });
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_fits_and_centers() {
        let vp = Viewport::fit(800.0, 800.0, 400, 200);
        assert_eq!(vp.scale, 0.25);
        assert_eq!(vp.map(Point::new(400.0, 400.0)), (200.0, 100.0));
        assert_eq!(vp.map(Point::ZERO), (100.0, 0.0));
    }

    #[test]
    fn filled_disc_inks_its_center_only() {
        let mut canvas = PixelCanvas::new(40, 40);
        let items = [DrawItem::Circle {
            center: Point::new(20.0, 20.0),
            radius: 5.0,
            fill: Some(Paint::Blue),
            stroke: None,
        }];
        let vp = Viewport::fit(40.0, 40.0, 40, 40);
        let glyphs = rasterize(&items, vp, &mut canvas);
        assert!(glyphs.is_empty());
        assert_eq!(canvas.get(20, 20), Pixel { r: 0, g: 0, b: 255, a: 255 });
        assert_eq!(canvas.get(0, 0).a, 0);
        assert_eq!(canvas.get(30, 20).a, 0);
    }

    #[test]
    fn dashed_outline_has_gaps() {
        let mut canvas = PixelCanvas::new(200, 200);
        let items = [DrawItem::Circle {
            center: Point::new(100.0, 100.0),
            radius: 80.0,
            fill: None,
            stroke: Some(Stroke::dashed(Paint::White, 1.0, 4.0)),
        }];
        rasterize(&items, Viewport::fit(200.0, 200.0, 200, 200), &mut canvas);
        let inked = canvas.px.iter().filter(|p| p.a > 0).count();
        let circumference = (2.0 * PI * 80.0) as usize;
        assert!(inked > circumference / 4, "too sparse: {inked}");
        assert!(inked < circumference, "no gaps: {inked}");
        assert_eq!(canvas.get(100, 100).a, 0);
    }

    #[test]
    fn dash_pattern_alternates() {
        let s = Stroke::dashed(Paint::White, 1.0, 4.0);
        assert!(dash_on(&s, 0.0));
        assert!(dash_on(&s, 3.9));
        assert!(!dash_on(&s, 4.1));
        assert!(dash_on(&s, 8.0));
        assert!(dash_on(&Stroke::solid(Paint::White, 1.0), 4.1));
    }

    #[test]
    fn text_becomes_a_cell_glyph() {
        let mut canvas = PixelCanvas::new(80, 80);
        let items = [DrawItem::Text { at: Point::new(21.0, 41.0), content: "☉", fill: Some(Paint::Black) }];
        let glyphs = rasterize(&items, Viewport::fit(80.0, 80.0, 80, 80), &mut canvas);
        assert_eq!(
            glyphs,
            vec![Glyph { col: 10, row: 10, ch: '☉', fg: Color::Rgb { r: 0, g: 0, b: 0 }, bg: None }]
        );
    }

    #[test]
    fn glyph_takes_the_disc_under_it_as_background() {
        let mut canvas = PixelCanvas::new(80, 80);
        let at = Point::new(21.0, 41.0);
        let items = [
            DrawItem::Circle { center: at, radius: 10.0, fill: Some(Paint::Red), stroke: None },
            DrawItem::Text { at, content: "♂", fill: Some(Paint::White) },
            DrawItem::Text { at: Point::new(61.0, 41.0), content: "x", fill: None },
        ];
        let glyphs = rasterize(&items, Viewport::fit(80.0, 80.0, 80, 80), &mut canvas);
        assert_eq!(glyphs[0].bg, Some(Color::Rgb { r: 255, g: 0, b: 0 }));
        assert_eq!(glyphs[1].bg, None);
    }

    /// Draws one frame of the real scene into an 80x24 terminal and returns the
    /// cell under each body's glyph.
    fn marker_cells() -> Vec<(char, Cell)> {
        use crate::driver::Driver;
        use crate::retained::RetainedScene;
        use crate::surface::Surface;
        use crate::world::WorldState;

        let mut driver = Driver::start(WorldState::new(240.0), RetainedScene::new(800.0, 800.0)).unwrap();
        driver.tick();
        let scene = driver.surface();
        let (cols, rows) = (80u16, 24u16);
        let mut canvas = canvas_for(cols, rows);
        let mut buf = CellBuffer::new(cols, rows);
        let (w, h) = scene.size();
        let vp = Viewport::fit(w, h, canvas.w, canvas.h);
        let glyphs = rasterize(&scene.draw_list(), vp, &mut canvas);
        canvas_to_cells(&canvas, &mut buf, Color::Black);
        draw_glyphs(&mut buf, &glyphs, Color::Black);
        glyphs.iter().map(|g| (g.ch, buf.cells[buf.idx(g.col, g.row)])).collect()
    }

    fn cell_for(cells: &[(char, Cell)], ch: char) -> Cell {
        cells.iter().find(|(c, _)| *c == ch).map(|(_, cell)| *cell).unwrap()
    }

    #[test]
    fn markers_keep_their_colour_in_the_terminal() {
        let cells = marker_cells();
        assert_eq!(cells.len(), 7);

        let sun = cell_for(&cells, '☉');
        assert_eq!(sun.ch, '☉');
        assert_eq!(sun.bg, Color::Rgb { r: 255, g: 255, b: 0 });
        assert_eq!(sun.fg, Color::Rgb { r: 0, g: 0, b: 0 });

        let venus = cell_for(&cells, '♀');
        assert_eq!(venus.bg, Color::Rgb { r: 255, g: 192, b: 203 });

        let mars = cell_for(&cells, '♂');
        assert_eq!(mars.bg, Color::Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(mars.fg, Color::Rgb { r: 255, g: 255, b: 255 });

        for (ch, cell) in &cells {
            assert_ne!(cell.fg, cell.bg, "{ch} is invisible");
        }
    }

    #[test]
    fn full_cell_becomes_full_braille() {
        let mut canvas = PixelCanvas::new(2, 4);
        canvas.clear(Pixel { r: 255, g: 0, b: 0, a: 255 });
        let mut buf = CellBuffer::new(1, 2);
        canvas_to_cells(&canvas, &mut buf, Color::Black);
        assert_eq!(buf.cells[0].ch, '\u{28FF}');
        assert_eq!(buf.cells[0].fg, Color::Rgb { r: 255, g: 0, b: 0 });
        // status row untouched
        assert_eq!(buf.cells[1], Cell::default());
    }
}
