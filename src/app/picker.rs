use std::path::PathBuf;

use anyhow::Result;

use crate::app::App;
use crate::app::constants::STATUS_UPLOAD_RUNNING;
use crate::app::helpers::{read_dir_entries, resolve_picker_start};
use crate::model::FilePickerState;

impl App {
    /// Opens the local file picker, pre-marking the current selection so an
    /// accepted pick always replaces the whole set.
    pub(crate) fn open_file_picker(&mut self) -> Result<()> {
        if self.upload_in_flight() {
            self.set_status(STATUS_UPLOAD_RUNNING);
            return Ok(());
        }
        let start_dir = match self.last_picker_dir.clone().filter(|dir| dir.is_dir()) {
            Some(dir) => dir,
            None => resolve_picker_start()?,
        };
        let entries = read_dir_entries(&start_dir, false)?;
        self.file_picker = Some(FilePickerState {
            cwd: start_dir,
            entries,
            selected: 0,
            marked: self.workflow.files().to_vec(),
            show_hidden: false,
        });
        Ok(())
    }

    pub(crate) fn load_picker_dir(&mut self, dir: PathBuf) -> Result<()> {
        let show_hidden = self
            .file_picker
            .as_ref()
            .map(|picker| picker.show_hidden)
            .unwrap_or(false);
        let entries = read_dir_entries(&dir, show_hidden)?;
        if let Some(picker) = &mut self.file_picker {
            picker.cwd = dir;
            picker.entries = entries;
            picker.selected = 0;
        }
        Ok(())
    }

    pub(crate) fn reload_picker_dir(&mut self) -> Result<()> {
        let Some(cwd) = self.file_picker.as_ref().map(|picker| picker.cwd.clone()) else {
            return Ok(());
        };
        self.load_picker_dir(cwd)
    }

    pub(crate) fn close_file_picker(&mut self) {
        if let Some(picker) = self.file_picker.take() {
            self.last_picker_dir = Some(picker.cwd);
        }
    }

    /// Accepts the marked files. An empty mark set behaves like a cancelled
    /// pick: the previous selection, status and progress stay untouched.
    pub(crate) fn confirm_file_selection(&mut self) {
        let Some(picker) = self.file_picker.take() else {
            return;
        };
        self.last_picker_dir = Some(picker.cwd.clone());
        if picker.marked.is_empty() {
            return;
        }
        self.workflow.select_files(picker.marked);
        self.progress = self.workflow.progress();
        let status = self.workflow.status().to_string();
        self.set_status(status);
    }
}
