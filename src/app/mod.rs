use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::mpsc;

use anyhow::Result;

use crate::app::constants::STATUS_READY;
use crate::app::helpers::log_path;
use crate::app::logging::prune_log_file;
use crate::model::{ConnectionForm, FilePickerState, UploadUpdate};
use crate::ssh::Ssh2Backend;
use crate::workflow::{SftpBackend, UploadWorkflow};

pub(crate) mod constants;
mod handlers;
pub(crate) mod helpers;
pub(crate) mod logging;
mod picker;
mod upload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum HeaderMode {
    Help,
    Logs,
    Off,
}

pub(crate) struct App {
    pub(crate) log_path: PathBuf,
    pub(crate) log_lines: VecDeque<String>,
    pub(crate) status: String,
    pub(crate) progress: u8,
    pub(crate) form: ConnectionForm,
    pub(crate) workflow: UploadWorkflow,
    pub(crate) file_picker: Option<FilePickerState>,
    pub(crate) last_picker_dir: Option<PathBuf>,
    pub(crate) header_mode: HeaderMode,
    pub(crate) upload_rx: Option<mpsc::Receiver<UploadUpdate>>,
    backend: Arc<dyn SftpBackend>,
}

impl App {
    pub(crate) fn new() -> Result<Self> {
        let log_path = log_path()?;
        prune_log_file(&log_path);
        let mut app = Self::with_backend(log_path, Arc::new(Ssh2Backend::default()));
        app.set_status(STATUS_READY);
        Ok(app)
    }

    fn with_backend(log_path: PathBuf, backend: Arc<dyn SftpBackend>) -> Self {
        Self {
            log_path,
            log_lines: VecDeque::new(),
            status: String::new(),
            progress: 0,
            form: ConnectionForm::default(),
            workflow: UploadWorkflow::default(),
            file_picker: None,
            last_picker_dir: None,
            header_mode: HeaderMode::Help,
            upload_rx: None,
            backend,
        }
    }

    pub(crate) fn upload_in_flight(&self) -> bool {
        self.upload_rx.is_some()
    }
}

#[cfg(test)]
impl App {
    pub(crate) fn for_test() -> Self {
        Self::for_test_with_backend(Arc::new(
            crate::workflow::tests::MockSftpBackend::default(),
        ))
    }

    pub(crate) fn for_test_with_backend(backend: Arc<dyn SftpBackend>) -> Self {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        let log_path = std::env::temp_dir().join(format!("sftp-up-test-{nanos}.log"));
        Self::with_backend(log_path, backend)
    }
}
