use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Clear, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::audio::MAX_VOLUME;
use crate::config::{COLOR_BORDER, COLOR_BUTTON_BG, COLOR_BUTTON_FG, COLOR_GAME_OVER, COLOR_TITLE};
use crate::game::GameOverOverlay;
use crate::input::{Button, ButtonLayout};
use crate::renderer::Viewport;

/// Draws the title screen with its start and settings buttons.
pub fn render_menu(frame: &mut Frame<'_>, viewport: &Viewport, buttons: &ButtonLayout) {
    let [_, title_row, _, hint_row, _] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(viewport.area);

    frame.render_widget(
        Paragraph::new(Line::from("S N A K E"))
            .alignment(Alignment::Center)
            .style(Style::new().fg(COLOR_TITLE).add_modifier(Modifier::BOLD)),
        title_row,
    );
    frame.render_widget(
        Paragraph::new(Line::from("[Enter] start   [Tab] settings   [Q] quit"))
            .alignment(Alignment::Center)
            .style(Style::new().fg(COLOR_BORDER)),
        hint_row,
    );

    render_button(frame, viewport, &buttons.start);
    render_button(frame, viewport, &buttons.settings);
}

/// Draws the settings screen: volume buttons, current volume, back button.
pub fn render_settings(
    frame: &mut Frame<'_>,
    viewport: &Viewport,
    buttons: &ButtonLayout,
    volume: u8,
) {
    let [_, title_row, _, volume_row, hint_row, _] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Min(0),
    ])
    .areas(viewport.area);

    frame.render_widget(
        Paragraph::new(Line::from("SETTINGS"))
            .alignment(Alignment::Center)
            .style(Style::new().fg(COLOR_TITLE).add_modifier(Modifier::BOLD)),
        title_row,
    );
    frame.render_widget(
        Paragraph::new(Line::from(format!("Music volume: {volume}/{MAX_VOLUME}")))
            .alignment(Alignment::Center),
        volume_row,
    );
    frame.render_widget(
        Paragraph::new(Line::from("[+]/[-] volume   [Esc] back"))
            .alignment(Alignment::Center)
            .style(Style::new().fg(COLOR_BORDER)),
        hint_row,
    );

    render_button(frame, viewport, &buttons.volume_up);
    render_button(frame, viewport, &buttons.volume_down);
    render_button(frame, viewport, &buttons.back);
}

/// Draws the game-over message as a centered popup over the board.
pub fn render_game_over_overlay(
    frame: &mut Frame<'_>,
    viewport: &Viewport,
    overlay: GameOverOverlay,
) {
    let popup = centered_popup(viewport.area, 50, 30);
    frame.render_widget(Clear, popup);

    let lines = vec![
        Line::from(overlay.title).style(
            Style::new()
                .fg(COLOR_GAME_OVER)
                .add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(overlay.cause.unwrap_or("")),
    ];
    frame.render_widget(
        Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(Block::bordered().border_style(Style::new().fg(COLOR_GAME_OVER))),
        popup,
    );
}

fn render_button(frame: &mut Frame<'_>, viewport: &Viewport, button: &Button) {
    let area = viewport.pixel_rect(button.x, button.y, button.width, button.height);
    if area.is_empty() {
        return;
    }

    let label = fit_label(button.label, usize::from(area.width));
    frame.render_widget(
        Paragraph::new(Line::from(label))
            .alignment(Alignment::Center)
            .style(
                Style::new()
                    .fg(COLOR_BUTTON_FG)
                    .bg(COLOR_BUTTON_BG)
                    .add_modifier(Modifier::BOLD),
            ),
        area,
    );
}

/// Truncates `label` to at most `width` terminal columns.
fn fit_label(label: &str, width: usize) -> String {
    let mut used = 0;
    let mut fitted = String::new();
    for ch in label.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if used + ch_width > width {
            break;
        }
        used += ch_width;
        fitted.push(ch);
    }
    fitted
}

fn centered_popup(area: Rect, width_percent: u16, height_percent: u16) -> Rect {
    let [_, mid, _] = Layout::vertical([
        Constraint::Percentage((100 - height_percent) / 2),
        Constraint::Percentage(height_percent),
        Constraint::Percentage((100 - height_percent) / 2),
    ])
    .areas(area);

    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - width_percent) / 2),
        Constraint::Percentage(width_percent),
        Constraint::Percentage((100 - width_percent) / 2),
    ])
    .areas(mid);

    center
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use ratatui::layout::Rect;

    use crate::input::ButtonLayout;
    use crate::config::GridSize;
    use crate::renderer::Viewport;

    use super::{fit_label, render_menu};

    #[test]
    fn labels_are_truncated_to_button_width() {
        assert_eq!(fit_label("SETTINGS", 10), "SETTINGS");
        assert_eq!(fit_label("SETTINGS", 5), "SETTI");
        assert_eq!(fit_label("BACK", 0), "");
    }

    #[test]
    fn menu_draws_both_button_labels() {
        let grid = GridSize {
            width: 32,
            height: 24,
        };
        let viewport = Viewport::centered(Rect::new(0, 0, 80, 30), grid, 20).expect("board fits");
        let buttons = ButtonLayout::for_screen(640);
        let mut terminal = Terminal::new(TestBackend::new(80, 30)).expect("test backend");

        terminal
            .draw(|frame| render_menu(frame, &viewport, &buttons))
            .expect("draw succeeds");

        let buffer = terminal.backend().buffer();
        let row = |y: u16| -> String { (0..80).map(|x| buffer[(x, y)].symbol()).collect() };
        assert!(row(18).contains("START"));
        assert!(row(23).contains("SETTINGS"));
    }
}
