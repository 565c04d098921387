use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{App, HeaderMode};
use crate::ui::constants::{FOOTER_HEIGHT, HEADER_HEIGHT, LOGS_HEADER_HEIGHT};
use crate::ui::panels::{
    draw_connection_form, draw_file_list, draw_help_header, draw_logs_header, draw_status_footer,
};
use crate::ui::pickers::draw_file_picker_modal;

pub(crate) mod constants;
mod helpers;
mod panels;
mod pickers;

pub(crate) fn draw_ui(frame: &mut Frame<'_>, app: &App) {
    let header_height = match app.header_mode {
        HeaderMode::Help => HEADER_HEIGHT,
        HeaderMode::Logs => LOGS_HEADER_HEIGHT,
        HeaderMode::Off => 0,
    };
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(header_height),
                Constraint::Min(1),
                Constraint::Length(FOOTER_HEIGHT),
            ]
            .as_ref(),
        )
        .split(frame.area());

    match app.header_mode {
        HeaderMode::Help => draw_help_header(frame, layout[0]),
        HeaderMode::Logs => draw_logs_header(frame, app, layout[0]),
        HeaderMode::Off => {}
    }

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)].as_ref())
        .split(layout[1]);
    draw_connection_form(frame, app, body[0]);
    draw_file_list(frame, app, body[1]);

    draw_status_footer(frame, app, layout[2]);

    if app.file_picker.is_some() {
        draw_file_picker_modal(frame, app);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn draw_ui_smoke_in_every_header_mode() {
        let mut app = App::for_test();
        for mode in [HeaderMode::Help, HeaderMode::Logs, HeaderMode::Off] {
            app.header_mode = mode;
            let backend = TestBackend::new(100, 30);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal.draw(|frame| draw_ui(frame, &app)).unwrap();
        }
    }
}
