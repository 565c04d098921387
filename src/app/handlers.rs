use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, HeaderMode};
use crate::model::FormField;

impl App {
    /// Returns `Ok(true)` when the application should quit.
    pub(crate) fn handle_key(&mut self, key: KeyEvent) -> Result<bool> {
        if key.code == KeyCode::F(1) {
            self.cycle_header_mode();
            return Ok(false);
        }
        if self.file_picker.is_some() {
            return self.handle_picker_key(key);
        }
        self.handle_form_key(key)
    }

    fn cycle_header_mode(&mut self) {
        self.header_mode = match self.header_mode {
            HeaderMode::Help => HeaderMode::Logs,
            HeaderMode::Logs => HeaderMode::Off,
            HeaderMode::Off => HeaderMode::Help,
        };
    }

    fn handle_form_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.form.active_field = self.form.active_field.next();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.active_field = self.form.active_field.previous();
            }
            KeyCode::Enter => match self.form.active_field {
                FormField::ActionSelect => self.open_file_picker()?,
                FormField::ActionUpload => self.start_upload(),
                _ => self.form.active_field = self.form.active_field.next(),
            },
            KeyCode::Backspace => {
                if let Some(value) = self.active_value_mut() {
                    value.pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(value) = self.active_value_mut() {
                    value.push(c);
                }
            }
            _ => {}
        }
        Ok(false)
    }

    fn active_value_mut(&mut self) -> Option<&mut String> {
        match self.form.active_field {
            FormField::Host => Some(&mut self.form.host),
            FormField::Username => Some(&mut self.form.username),
            FormField::Password => Some(&mut self.form.password),
            FormField::RemotePath => Some(&mut self.form.remote_path),
            FormField::ActionSelect | FormField::ActionUpload => None,
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) -> Result<bool> {
        match key.code {
            KeyCode::Esc => self.close_file_picker(),
            KeyCode::Up => {
                if let Some(picker) = &mut self.file_picker {
                    picker.selected = picker.selected.saturating_sub(1);
                }
            }
            KeyCode::Down => {
                if let Some(picker) = &mut self.file_picker {
                    if picker.selected + 1 < picker.entries.len() {
                        picker.selected += 1;
                    }
                }
            }
            KeyCode::Char(' ') => self.toggle_selected_entry(),
            KeyCode::Enter => {
                let entry = self
                    .file_picker
                    .as_ref()
                    .and_then(|picker| picker.entries.get(picker.selected).cloned());
                match entry {
                    Some(entry) if entry.is_dir => self.load_picker_dir(entry.path)?,
                    Some(_) => self.toggle_selected_entry(),
                    None => {}
                }
            }
            KeyCode::Backspace => {
                let parent = self
                    .file_picker
                    .as_ref()
                    .and_then(|picker| picker.cwd.parent().map(|dir| dir.to_path_buf()));
                if let Some(parent) = parent {
                    self.load_picker_dir(parent)?;
                }
            }
            KeyCode::Char('h') => {
                if let Some(picker) = &mut self.file_picker {
                    picker.show_hidden = !picker.show_hidden;
                }
                self.reload_picker_dir()?;
            }
            KeyCode::Char('a') => self.confirm_file_selection(),
            _ => {}
        }
        Ok(false)
    }

    fn toggle_selected_entry(&mut self) {
        if let Some(picker) = &mut self.file_picker {
            if let Some(entry) = picker.entries.get(picker.selected).cloned() {
                if !entry.is_dir {
                    picker.toggle_mark(&entry.path);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;
    use std::path::PathBuf;

    use crate::model::{FileEntry, FilePickerState};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    #[test]
    fn typing_fills_the_active_field() {
        let mut app = App::for_test();
        type_text(&mut app, "example.com");
        assert_eq!(app.form.host, "example.com");
        app.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(app.form.host, "example.co");
        app.handle_key(key(KeyCode::Tab)).unwrap();
        type_text(&mut app, "deploy");
        assert_eq!(app.form.username, "deploy");
    }

    #[test]
    fn enter_on_an_input_field_advances() {
        let mut app = App::for_test();
        app.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(app.form.active_field, FormField::Username);
    }

    #[test]
    fn f1_cycles_header_modes() {
        let mut app = App::for_test();
        assert_eq!(app.header_mode, HeaderMode::Help);
        app.handle_key(key(KeyCode::F(1))).unwrap();
        assert_eq!(app.header_mode, HeaderMode::Logs);
        app.handle_key(key(KeyCode::F(1))).unwrap();
        assert_eq!(app.header_mode, HeaderMode::Off);
        app.handle_key(key(KeyCode::F(1))).unwrap();
        assert_eq!(app.header_mode, HeaderMode::Help);
    }

    #[test]
    fn picker_space_marks_files_but_not_directories() {
        let mut app = App::for_test();
        app.file_picker = Some(FilePickerState {
            cwd: PathBuf::from("/tmp"),
            entries: vec![
                FileEntry {
                    name: "docs".to_string(),
                    path: PathBuf::from("/tmp/docs"),
                    is_dir: true,
                },
                FileEntry {
                    name: "a.txt".to_string(),
                    path: PathBuf::from("/tmp/a.txt"),
                    is_dir: false,
                },
            ],
            selected: 0,
            marked: vec![],
            show_hidden: false,
        });
        app.handle_key(key(KeyCode::Char(' '))).unwrap();
        assert!(app.file_picker.as_ref().unwrap().marked.is_empty());
        app.handle_key(key(KeyCode::Down)).unwrap();
        app.handle_key(key(KeyCode::Char(' '))).unwrap();
        assert_eq!(
            app.file_picker.as_ref().unwrap().marked,
            vec![PathBuf::from("/tmp/a.txt")]
        );
        app.handle_key(key(KeyCode::Char('a'))).unwrap();
        assert_eq!(app.workflow.files(), &[PathBuf::from("/tmp/a.txt")]);
        assert_eq!(app.status, "1 files selected");
    }

    #[test]
    fn picker_escape_cancels_without_changing_selection() {
        let mut app = App::for_test();
        app.workflow.select_files(vec![PathBuf::from("/tmp/old.txt")]);
        let previous_status = app.workflow.status().to_string();
        app.status = previous_status.clone();
        app.file_picker = Some(FilePickerState {
            cwd: PathBuf::from("/tmp"),
            entries: vec![],
            selected: 0,
            marked: vec![PathBuf::from("/tmp/new.txt")],
            show_hidden: false,
        });
        app.handle_key(key(KeyCode::Esc)).unwrap();
        assert!(app.file_picker.is_none());
        assert_eq!(app.workflow.files(), &[PathBuf::from("/tmp/old.txt")]);
        assert_eq!(app.status, previous_status);
    }
}
