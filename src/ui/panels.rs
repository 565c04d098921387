use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph, Wrap};

use crate::app::App;
use crate::app::constants::LOG_NO_LOGS_MESSAGE;
use crate::model::FormField;
use crate::ui::constants::{APP_TITLE, HELP_TEXT, LABEL_WIDTH};
use crate::ui::helpers::{action_line, field_line, truncate_text};

pub(crate) fn draw_help_header(frame: &mut Frame<'_>, area: Rect) {
    let title = Paragraph::new(format!("{APP_TITLE} | {HELP_TEXT}"))
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL))
        .alignment(Alignment::Center);
    frame.render_widget(title, area);
}

pub(crate) fn draw_logs_header(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let lines: Vec<Line> = if app.log_lines.is_empty() {
        vec![Line::from(LOG_NO_LOGS_MESSAGE)]
    } else {
        app.log_lines
            .iter()
            .rev()
            .take(visible.max(1))
            .rev()
            .map(|line| Line::from(line.as_str()))
            .collect()
    };
    let logs = Paragraph::new(lines)
        .style(Style::default().fg(Color::Gray))
        .block(Block::default().borders(Borders::ALL).title(Line::from(
            Span::styled(
                "Recent activity",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            ),
        )));
    frame.render_widget(logs, area);
}

pub(crate) fn draw_connection_form(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(Span::styled(
            "Connection",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let value_width = inner
        .width
        .saturating_sub(2 + LABEL_WIDTH as u16 + 2) as usize;
    let form = &app.form;
    let lines = vec![
        field_line(
            "Host",
            &form.host,
            form.active_field == FormField::Host,
            false,
            LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "Username",
            &form.username,
            form.active_field == FormField::Username,
            false,
            LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "Password",
            &form.password,
            form.active_field == FormField::Password,
            true,
            LABEL_WIDTH,
            value_width,
        ),
        field_line(
            "Remote path",
            &form.remote_path,
            form.active_field == FormField::RemotePath,
            false,
            LABEL_WIDTH,
            value_width,
        ),
        Line::from(""),
        action_line("Select files", form.active_field == FormField::ActionSelect),
        action_line("Upload files", form.active_field == FormField::ActionUpload),
    ];
    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
    render_form_cursor(frame, app, inner);
}

fn render_form_cursor(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let (row, col) = match app.form.active_field {
        FormField::Host => (0, app.form.host.chars().count()),
        FormField::Username => (1, app.form.username.chars().count()),
        FormField::Password => (2, app.form.password.chars().count()),
        FormField::RemotePath => (3, app.form.remote_path.chars().count()),
        FormField::ActionSelect | FormField::ActionUpload => return,
    };
    if row >= area.height as usize {
        return;
    }
    let indicator_len = 2u16;
    let label_len = LABEL_WIDTH as u16 + 2;
    let cursor_x = area.x + indicator_len + label_len + col as u16;
    let cursor_y = area.y + row as u16;
    frame.set_cursor_position((cursor_x, cursor_y));
}

pub(crate) fn draw_file_list(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let files = app.workflow.files();
    let title = format!("Selected files ({})", files.len());
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(Span::styled(
            title,
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let items: Vec<ListItem> = if files.is_empty() {
        vec![ListItem::new("No files selected yet")]
    } else {
        files
            .iter()
            .map(|file| {
                ListItem::new(truncate_text(
                    &file.display().to_string(),
                    inner.width as usize,
                ))
            })
            .collect()
    };
    frame.render_widget(List::new(items), inner);
}

pub(crate) fn draw_status_footer(frame: &mut Frame<'_>, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(Line::from(Span::styled(
            "Status",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let status = Paragraph::new(app.status.as_str()).wrap(Wrap { trim: true });
    frame.render_widget(
        status,
        Rect {
            x: inner.x,
            y: inner.y,
            width: inner.width,
            height: 1,
        },
    );
    if inner.height < 2 {
        return;
    }
    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(Color::Green).bg(Color::DarkGray))
        .percent(u16::from(app.progress));
    frame.render_widget(
        gauge,
        Rect {
            x: inner.x,
            y: inner.y + 1,
            width: inner.width,
            height: 1,
        },
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::path::PathBuf;

    #[test]
    fn draw_main_panels_smoke() {
        let mut app = App::for_test();
        app.form.host = "example.com".to_string();
        app.workflow.select_files(vec![PathBuf::from("/tmp/a.txt")]);
        app.status = "Uploaded a.txt".to_string();
        app.progress = 50;
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                let form_area = Rect {
                    height: 12,
                    ..area
                };
                draw_connection_form(frame, &app, form_area);
                let footer = Rect {
                    y: 20,
                    height: 4,
                    ..area
                };
                draw_status_footer(frame, &app, footer);
            })
            .unwrap();
    }

    #[test]
    fn draw_file_list_and_logs_smoke() {
        let mut app = App::for_test();
        app.log_line("Ready");
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|frame| {
                let area = frame.area();
                let list_area = Rect {
                    height: 12,
                    ..area
                };
                draw_file_list(frame, &app, list_area);
                let logs_area = Rect {
                    y: 14,
                    height: 8,
                    ..area
                };
                draw_logs_header(frame, &app, logs_area);
            })
            .unwrap();
    }
}
