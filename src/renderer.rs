use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Paragraph};

use crate::config::{
    COLOR_BORDER, COLOR_FOOD, COLOR_OBSTACLE, COLOR_PLAY_BG, COLOR_SNAKE_BODY, COLOR_SNAKE_HEAD,
    COLOR_SNAKE_TAIL, COLUMNS_PER_CELL, GLYPH_FOOD, GLYPH_OBSTACLE, GLYPH_SNAKE_BODY, GridSize,
};
use crate::game::{GamePhase, SegmentKind, Snapshot};
use crate::input::ButtonLayout;
use crate::snake::{GridCell, Rotation};
use crate::ui::menu::{render_game_over_overlay, render_menu, render_settings};

/// Where the logical screen landed inside the terminal on the last frame.
///
/// One grid cell is drawn as `COLUMNS_PER_CELL` columns by one row.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Viewport {
    pub area: Rect,
    pub cell_size: u32,
}

impl Viewport {
    /// Centres a board of `bounds` cells inside `frame_area`, leaving room for
    /// a one-cell border. Returns `None` when the terminal is too small.
    #[must_use]
    pub fn centered(frame_area: Rect, bounds: GridSize, cell_size: u32) -> Option<Self> {
        let width = bounds.width.checked_mul(COLUMNS_PER_CELL)?;
        let height = bounds.height;
        if frame_area.width < width.saturating_add(2)
            || frame_area.height < height.saturating_add(2)
        {
            return None;
        }

        let x = frame_area.x + (frame_area.width - width) / 2;
        let y = frame_area.y + (frame_area.height - height) / 2;
        Some(Self {
            area: Rect::new(x, y, width, height),
            cell_size,
        })
    }

    /// Terminal rectangle covering one grid cell, or `None` off the board.
    #[must_use]
    pub fn cell_rect(&self, cell: GridCell) -> Option<Rect> {
        let column = u16::try_from(cell.x).ok()?.checked_mul(COLUMNS_PER_CELL)?;
        let row = u16::try_from(cell.y).ok()?;
        if column >= self.area.width || row >= self.area.height {
            return None;
        }

        Some(Rect::new(
            self.area.x + column,
            self.area.y + row,
            COLUMNS_PER_CELL,
            1,
        ))
    }

    /// Terminal rectangle covering a pixel rectangle of the logical screen,
    /// clipped to the board and at least one cell in each dimension.
    #[must_use]
    pub fn pixel_rect(&self, x: i32, y: i32, width: i32, height: i32) -> Rect {
        let cell = i64::from(self.cell_size.max(1));
        let columns = i64::from(COLUMNS_PER_CELL);
        let to_u16 = |value: i64| u16::try_from(value.max(0)).unwrap_or(u16::MAX);

        let column = to_u16(i64::from(x) * columns / cell);
        let row = to_u16(i64::from(y) / cell);
        let span_x = to_u16(i64::from(width) * columns / cell).max(1);
        let span_y = to_u16(i64::from(height) / cell).max(1);

        Rect::new(
            self.area.x.saturating_add(column),
            self.area.y.saturating_add(row),
            span_x,
            span_y,
        )
        .intersection(self.area)
    }

    /// Maps a terminal cell to the logical pixel at its centre.
    #[must_use]
    pub fn to_pixels(&self, column: u16, row: u16) -> Option<(i32, i32)> {
        if column < self.area.x
            || row < self.area.y
            || column >= self.area.right()
            || row >= self.area.bottom()
        {
            return None;
        }

        let cell = i32::try_from(self.cell_size).ok()?;
        let columns = i32::from(COLUMNS_PER_CELL);
        let x = i32::from(column - self.area.x) * cell / columns + cell / (2 * columns);
        let y = i32::from(row - self.area.y) * cell + cell / 2;
        Some((x, y))
    }
}

/// Renders the full frame from the snapshot and returns the board placement.
pub fn render(
    frame: &mut Frame<'_>,
    snapshot: &Snapshot<'_>,
    buttons: &ButtonLayout,
    cell_size: u32,
) -> Option<Viewport> {
    let Some(viewport) = Viewport::centered(frame.area(), snapshot.bounds, cell_size) else {
        render_too_small(frame, snapshot.bounds);
        return None;
    };

    let border = Rect::new(
        viewport.area.x - 1,
        viewport.area.y - 1,
        viewport.area.width + 2,
        viewport.area.height + 2,
    );
    frame.render_widget(
        Block::bordered()
            .border_style(Style::new().fg(COLOR_BORDER))
            .style(Style::new().bg(COLOR_PLAY_BG)),
        border,
    );

    match snapshot.phase {
        GamePhase::Menu => render_menu(frame, &viewport, buttons),
        GamePhase::Settings => render_settings(frame, &viewport, buttons, snapshot.volume),
        GamePhase::Playing => render_board(frame, &viewport, snapshot),
        GamePhase::GameOver => {
            render_board(frame, &viewport, snapshot);
            if let Some(overlay) = snapshot.overlay {
                render_game_over_overlay(frame, &viewport, overlay);
            }
        }
    }

    Some(viewport)
}

fn render_board(frame: &mut Frame<'_>, viewport: &Viewport, snapshot: &Snapshot<'_>) {
    let buffer = frame.buffer_mut();

    for obstacle in snapshot.obstacles {
        if let Some(rect) = viewport.cell_rect(*obstacle) {
            buffer.set_string(rect.x, rect.y, GLYPH_OBSTACLE, Style::new().fg(COLOR_OBSTACLE));
        }
    }

    if let Some(rect) = snapshot.food.and_then(|food| viewport.cell_rect(food)) {
        buffer.set_string(rect.x, rect.y, GLYPH_FOOD, Style::new().fg(COLOR_FOOD));
    }

    for segment in &snapshot.segments {
        let Some(rect) = viewport.cell_rect(segment.cell) else {
            continue;
        };

        let (glyph, style) = match segment.kind {
            SegmentKind::Head(rotation) => (
                head_glyph(rotation),
                Style::new()
                    .fg(COLOR_SNAKE_HEAD)
                    .add_modifier(Modifier::BOLD),
            ),
            SegmentKind::Tail(rotation) => {
                (tail_glyph(rotation), Style::new().fg(COLOR_SNAKE_TAIL))
            }
            SegmentKind::Body => (GLYPH_SNAKE_BODY, Style::new().fg(COLOR_SNAKE_BODY)),
        };
        buffer.set_string(rect.x, rect.y, glyph, style);
    }
}

/// Head glyph; the unrotated head faces left and rotations are clockwise.
fn head_glyph(rotation: Rotation) -> &'static str {
    match rotation {
        Rotation::Deg0 => "◀█",
        Rotation::Deg90 => "▲▲",
        Rotation::Deg180 => "█▶",
        Rotation::Deg270 => "▼▼",
    }
}

fn tail_glyph(rotation: Rotation) -> &'static str {
    match rotation {
        Rotation::Deg0 => "█▌",
        Rotation::Deg90 => "▀▀",
        Rotation::Deg180 => "▐█",
        Rotation::Deg270 => "▄▄",
    }
}

fn render_too_small(frame: &mut Frame<'_>, bounds: GridSize) {
    let message = format!(
        "Terminal too small: need {}x{}",
        u32::from(bounds.width) * u32::from(COLUMNS_PER_CELL) + 2,
        u32::from(bounds.height) + 2
    );
    frame.render_widget(
        Paragraph::new(message).alignment(Alignment::Center),
        frame.area(),
    );
}

#[cfg(test)]
mod tests {
    use ratatui::layout::Rect;

    use crate::config::GridSize;
    use crate::snake::GridCell;

    use super::Viewport;

    const GRID: GridSize = GridSize {
        width: 32,
        height: 24,
    };

    fn viewport() -> Viewport {
        Viewport::centered(Rect::new(0, 0, 80, 30), GRID, 20).expect("80x30 fits the board")
    }

    #[test]
    fn board_is_centred_in_frame() {
        assert_eq!(viewport().area, Rect::new(8, 3, 64, 24));
    }

    #[test]
    fn small_terminal_has_no_viewport() {
        assert_eq!(Viewport::centered(Rect::new(0, 0, 60, 30), GRID, 20), None);
        assert_eq!(Viewport::centered(Rect::new(0, 0, 80, 25), GRID, 20), None);
    }

    #[test]
    fn cells_map_to_two_columns() {
        let viewport = viewport();

        assert_eq!(viewport.cell_rect(GridCell::new(0, 0)), Some(Rect::new(8, 3, 2, 1)));
        assert_eq!(viewport.cell_rect(GridCell::new(31, 23)), Some(Rect::new(70, 26, 2, 1)));
        assert_eq!(viewport.cell_rect(GridCell::new(32, 0)), None);
        assert_eq!(viewport.cell_rect(GridCell::new(-1, 0)), None);
    }

    #[test]
    fn clicks_map_back_to_pixels() {
        let viewport = viewport();

        assert_eq!(viewport.to_pixels(8, 3), Some((5, 10)));
        assert_eq!(viewport.to_pixels(9, 3), Some((15, 10)));
        assert_eq!(viewport.to_pixels(40, 18), Some((325, 310)));
        assert_eq!(viewport.to_pixels(7, 3), None);
        assert_eq!(viewport.to_pixels(72, 3), None);
    }

    #[test]
    fn start_button_click_lands_inside_button() {
        let viewport = viewport();
        let rect = viewport.pixel_rect(270, 300, 100, 50);

        assert_eq!(rect, Rect::new(35, 18, 10, 2));
        let (x, y) = viewport
            .to_pixels(rect.x, rect.y)
            .expect("button is on the board");
        assert!((270..=370).contains(&x));
        assert!((300..=350).contains(&y));
    }
}
