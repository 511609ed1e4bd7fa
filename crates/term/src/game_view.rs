//! GameView: maps a game snapshot into a terminal framebuffer.
//!
//! The grid is shown as one top-down slice per plane, top plane first, five
//! slices to a band. Pure (no I/O), so it can be unit-tested.

use crate::core::{GameSnapshot, Piece};
use crate::fb::{CellStyle, FrameBuffer, Rgb};
use crate::types::{PieceShape, SessionState};

/// Slices drawn side by side before wrapping to the next band.
pub const SLICES_PER_BAND: usize = 5;

/// Width reserved for the score/next panel.
pub const PANEL_WIDTH: u16 = 20;

const BG: Rgb = Rgb::new(0, 0, 0);
const WELL_BG: Rgb = Rgb::new(28, 28, 38);
const LOW_CUBE: Rgb = Rgb::new(70, 110, 220);
const HIGH_CUBE: Rgb = Rgb::new(240, 120, 60);

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

/// Where everything lands for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Layout {
    pub origin_x: u16,
    pub origin_y: u16,
    pub slice_w: u16,
    pub slice_h: u16,
    pub planes: usize,
    pub rows: usize,
    pub cols: usize,
    cell_w: u16,
}

impl Layout {
    /// Top-left corner (frame included) of a plane's slice.
    pub fn slice_origin(&self, plane: usize) -> (u16, u16) {
        let order = self.planes - 1 - plane;
        let band = (order / SLICES_PER_BAND) as u16;
        let slot = (order % SLICES_PER_BAND) as u16;
        let x = self.origin_x + slot * (self.slice_w + 1);
        // One label row above each slice.
        let y = self.origin_y + band * (self.slice_h + 1) + 1;
        (x, y)
    }

    /// Terminal position of the first column of a grid cell.
    pub fn cell_pos(&self, plane: usize, row: usize, col: usize) -> (u16, u16) {
        let (x, y) = self.slice_origin(plane);
        (x + 1 + col as u16 * self.cell_w, y + 1 + row as u16)
    }

    pub fn grid_width(&self) -> u16 {
        let slots = self.planes.min(SLICES_PER_BAND) as u16;
        slots * (self.slice_w + 1) - 1
    }

    pub fn grid_height(&self) -> u16 {
        let bands = self.planes.div_ceil(SLICES_PER_BAND) as u16;
        bands * (self.slice_h + 1)
    }
}

/// Terminal renderer for the plane-slice view.
pub struct GameView {
    /// Grid cell width in terminal columns.
    cell_w: u16,
}

impl Default for GameView {
    fn default() -> Self {
        // 2x1 makes cells roughly square in most terminal fonts.
        Self { cell_w: 2 }
    }
}

impl GameView {
    pub fn new(cell_w: u16) -> Self {
        Self { cell_w: cell_w.max(1) }
    }

    pub fn layout(&self, snap: &GameSnapshot, viewport: Viewport) -> Layout {
        let mut layout = Layout {
            origin_x: 0,
            origin_y: 0,
            slice_w: snap.cols as u16 * self.cell_w + 2,
            slice_h: snap.rows as u16 + 2,
            planes: snap.planes,
            rows: snap.rows,
            cols: snap.cols,
            cell_w: self.cell_w,
        };
        let content_w = layout.grid_width() + 2 + PANEL_WIDTH;
        layout.origin_x = viewport.width.saturating_sub(content_w) / 2;
        layout.origin_y = viewport.height.saturating_sub(layout.grid_height()) / 2;
        layout
    }

    /// Render into an existing framebuffer, resizing it to the viewport.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::plain(Rgb::new(220, 220, 220), BG).cell(' '));

        let layout = self.layout(snap, viewport);
        for plane in 0..snap.planes {
            self.draw_slice(fb, snap, &layout, plane);
        }
        self.draw_side_panel(fb, snap, &layout);

        match snap.state {
            SessionState::Paused => self.draw_overlay(fb, &layout, "PAUSED", "p: resume"),
            SessionState::GameOver => self.draw_overlay(fb, &layout, "GAME OVER", "n: new game"),
            SessionState::Playing => {}
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    fn draw_slice(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout, plane: usize) {
        let (x, y) = layout.slice_origin(plane);
        let full = snap.fill_count(plane) == snap.rows * snap.cols;

        let label = CellStyle::plain(Rgb::new(150, 150, 160), BG);
        let label = if full { label.bold() } else { label };
        fb.put_char(x, y - 1, 'P', label);
        fb.put_u32(x + 1, y - 1, plane as u32, label);

        let frame = CellStyle::plain(Rgb::new(110, 110, 120), BG);
        fb.draw_box(x, y, layout.slice_w, layout.slice_h, frame);

        let empty = CellStyle::plain(Rgb::new(70, 70, 85), WELL_BG).dim();
        let frozen = CellStyle::plain(plane_color(plane, snap.planes), WELL_BG);
        let active = CellStyle::plain(Rgb::new(255, 255, 255), WELL_BG).bold();

        for row in 0..snap.rows {
            for col in 0..snap.cols {
                let (px, py) = layout.cell_pos(plane, row, col);
                let (ch, style) = if snap.is_active(plane, row, col) {
                    ('▓', active)
                } else if snap.is_occupied(plane, row, col) {
                    ('█', frozen)
                } else {
                    ('·', empty)
                };
                fb.fill_rect(px, py, self.cell_w, 1, ch, style);
            }
        }
    }

    fn draw_side_panel(&self, fb: &mut FrameBuffer, snap: &GameSnapshot, layout: &Layout) {
        let x = layout.origin_x + layout.grid_width() + 2;
        if x >= fb.width() {
            return;
        }

        let label = CellStyle::plain(Rgb::new(220, 220, 220), BG).bold();
        let value = CellStyle::plain(Rgb::new(200, 200, 200), BG);
        let help = value.dim();

        let mut y = layout.origin_y;
        fb.put_str(x, y, "SCORE", label);
        fb.put_u32(x, y + 1, snap.score, value);
        y += 3;

        fb.put_str(x, y, "HIGH SCORE", label);
        fb.put_u32(x, y + 1, snap.high_score, value);
        y += 3;

        fb.put_str(x, y, "NEXT", label);
        match snap.next {
            Some(shape) => {
                fb.put_str(x + 5, y, shape_name(shape), value);
                self.draw_preview(fb, x, y + 1, shape);
            }
            None => {
                fb.put_str(x + 5, y, "-", value);
            }
        }
        y += 4;

        fb.put_str(x, y, "DROP", label);
        let ms = (snap.timeout_secs * 1000.0).round() as u32;
        let end = fb.put_u32(x, y + 1, ms, value);
        fb.put_str(end, y + 1, " ms", value);
        y += 3;

        fb.put_str(x, y, "STATE", label);
        fb.put_str(x, y + 1, snap.state.as_str(), value);
        y += 3;

        for line in [
            "←→ ↑↓  move",
            "space  drop",
            "x / z  rotate",
            "p      pause",
            "n      new game",
            "q      quit",
        ] {
            fb.put_str(x, y, line, help);
            y += 1;
        }
    }

    /// Top-down footprint of the next shape.
    fn draw_preview(&self, fb: &mut FrameBuffer, x: u16, y: u16, shape: PieceShape) {
        let style = CellStyle::plain(Rgb::new(180, 180, 190), BG);
        for cell in Piece::preview(shape).cells() {
            let px = x + cell.col as u16 * self.cell_w;
            fb.fill_rect(px, y + cell.row as u16, self.cell_w, 1, '█', style);
        }
    }

    fn draw_overlay(&self, fb: &mut FrameBuffer, layout: &Layout, title: &str, hint: &str) {
        let w = layout.grid_width();
        let mid_y = layout.origin_y + layout.grid_height() / 2;
        let box_w = (title.chars().count().max(hint.chars().count()) as u16 + 4).min(w);
        let box_x = layout.origin_x + (w.saturating_sub(box_w)) / 2;

        let style = CellStyle::plain(Rgb::new(255, 255, 255), BG).bold();
        fb.fill_rect(box_x, mid_y - 2, box_w, 4, ' ', style);
        fb.draw_box(box_x, mid_y - 2, box_w, 4, style);
        fb.put_str_centered(box_x, box_w, mid_y - 1, title, style);
        fb.put_str_centered(box_x, box_w, mid_y, hint, CellStyle { bold: false, ..style });
    }
}

/// Cube color by height: cool at the floor, warm near the ceiling.
fn plane_color(plane: usize, planes: usize) -> Rgb {
    let t = if planes > 1 {
        (plane * 255 / (planes - 1)) as u8
    } else {
        0
    };
    LOW_CUBE.mix(HIGH_CUBE, t)
}

fn shape_name(shape: PieceShape) -> &'static str {
    match shape {
        PieceShape::L => "L",
        PieceShape::Z => "Z",
        PieceShape::T => "T",
        PieceShape::I => "I",
        PieceShape::O => "O",
        PieceShape::Single => "single",
    }
}
