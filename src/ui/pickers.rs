use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Borders, List, ListItem, Paragraph};

use crate::app::App;
use crate::ui::constants::{PICKER_FOOTER_HEIGHT, PICKER_HEIGHT, PICKER_WIDTH};
use crate::ui::helpers::{centered_rect, draw_popup_frame, list_state};

pub(crate) fn draw_file_picker_modal(frame: &mut Frame<'_>, app: &App) {
    let picker = match &app.file_picker {
        Some(picker) => picker,
        None => return,
    };
    let area = centered_rect(PICKER_WIDTH, PICKER_HEIGHT, frame.area());
    let inner = draw_popup_frame(
        frame,
        area,
        "Pick files to upload",
        Style::default().fg(Color::White),
    );

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(PICKER_FOOTER_HEIGHT),
            ]
            .as_ref(),
        )
        .split(inner);

    let header = Paragraph::new(format!(
        "Dir: {} | {} marked",
        picker.cwd.display(),
        picker.marked.len()
    ))
    .style(Style::default().fg(Color::Gray));
    frame.render_widget(header, layout[0]);

    let items: Vec<ListItem> = if picker.entries.is_empty() {
        vec![ListItem::new("Empty")]
    } else {
        picker
            .entries
            .iter()
            .map(|entry| {
                if entry.is_dir {
                    ListItem::new(format!("    {}/", entry.name))
                } else {
                    let mark = if picker.is_marked(&entry.path) {
                        "[x]"
                    } else {
                        "[ ]"
                    };
                    ListItem::new(format!("{mark} {}", entry.name))
                }
            })
            .collect()
    };

    let list = List::new(items)
        .highlight_style(Style::default().add_modifier(Modifier::BOLD))
        .highlight_symbol(Span::styled("> ", Style::default().fg(Color::White)));
    frame.render_stateful_widget(
        list,
        layout[1],
        &mut list_state(picker.selected, picker.entries.len()),
    );

    let footer = Paragraph::new(
        "Space to mark, Enter to open/mark, A to accept, H for hidden, Backspace to go up, Esc to cancel",
    )
    .style(Style::default().fg(Color::Gray))
    .block(Block::default().borders(Borders::TOP));
    frame.render_widget(footer, layout[2]);
}
