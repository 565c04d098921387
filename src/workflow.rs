use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::model::ConnectionParams;

pub(crate) const MSG_NO_FILES: &str = "No files selected";
pub(crate) const MSG_MISSING_DETAILS: &str = "Please fill all connection details";
pub(crate) const MSG_ALL_UPLOADED: &str = "All files uploaded successfully";

/// One error kind per workflow step. Only the rendered message reaches the
/// status line; the kinds exist for callers and tests.
#[derive(Debug, Error)]
pub(crate) enum UploadError {
    #[error("{0}")]
    Validation(String),
    #[error("connect failed: {0}")]
    Connect(String),
    #[error("remote directory failed: {0}")]
    RemoteFs(String),
    #[error("transfer of {name} failed: {message}")]
    Transfer { name: String, message: String },
}

/// An authenticated SFTP session. `dir_exists` reports `Ok(false)` only on a
/// definitive not-found; permission or connectivity failures surface as
/// errors instead of being mistaken for a missing directory.
pub(crate) trait SftpSession {
    fn dir_exists(&mut self, path: &str) -> Result<bool, UploadError>;
    fn create_dir(&mut self, path: &str) -> Result<(), UploadError>;
    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), UploadError>;
    fn close(&mut self);
}

pub(crate) trait SftpBackend: Send + Sync {
    fn connect(&self, conn: &ConnectionParams) -> Result<Box<dyn SftpSession>, UploadError>;
}

/// The upload workflow: the selected local files plus the two outputs the
/// presentation layer observes, a status string and a 0-100 progress value.
/// Holds no UI handles; status and progress changes are mirrored to the
/// caller through an observer callback.
#[derive(Debug, Clone, Default)]
pub(crate) struct UploadWorkflow {
    files: Vec<PathBuf>,
    progress: u8,
    status: String,
}

impl UploadWorkflow {
    pub(crate) fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub(crate) fn progress(&self) -> u8 {
        self.progress
    }

    pub(crate) fn status(&self) -> &str {
        &self.status
    }

    /// Replaces the selection with `picked`, keeping its order. An empty
    /// pick (the user cancelled) leaves everything untouched.
    pub(crate) fn select_files(&mut self, picked: Vec<PathBuf>) {
        if picked.is_empty() {
            return;
        }
        self.status = format!("{} files selected", picked.len());
        self.files = picked;
        self.progress = 0;
    }

    /// Runs the full upload sequence: validate, connect, ensure the remote
    /// directory, transfer each file in selection order. Any step failure
    /// aborts the remainder, sets the status to `Error - <message>` and
    /// resets progress to 0; files already transferred stay on the remote.
    /// The session is closed on every exit path past connect.
    pub(crate) fn run_upload(
        &mut self,
        conn: &ConnectionParams,
        backend: &dyn SftpBackend,
        observer: &mut dyn FnMut(&str, u8),
    ) -> Result<(), UploadError> {
        if self.files.is_empty() {
            self.report(MSG_NO_FILES, observer);
            return Err(UploadError::Validation(MSG_NO_FILES.to_string()));
        }
        if !conn.is_complete() {
            self.report(MSG_MISSING_DETAILS, observer);
            return Err(UploadError::Validation(MSG_MISSING_DETAILS.to_string()));
        }

        self.report(format!("Connecting to {}...", conn.host), observer);
        let mut session = match backend.connect(conn) {
            Ok(session) => session,
            Err(err) => {
                self.fail(&err, observer);
                return Err(err);
            }
        };

        let result = self.transfer_all(conn, session.as_mut(), observer);
        session.close();

        match result {
            Ok(()) => {
                self.progress = 100;
                self.report(MSG_ALL_UPLOADED, observer);
                Ok(())
            }
            Err(err) => {
                self.fail(&err, observer);
                Err(err)
            }
        }
    }

    fn transfer_all(
        &mut self,
        conn: &ConnectionParams,
        session: &mut dyn SftpSession,
        observer: &mut dyn FnMut(&str, u8),
    ) -> Result<(), UploadError> {
        if !session.dir_exists(&conn.remote_path)? {
            session.create_dir(&conn.remote_path)?;
        }
        let files = self.files.clone();
        let total = files.len();
        for (index, file) in files.iter().enumerate() {
            let name = file_basename(file)?;
            let remote = remote_target(&conn.remote_path, &name);
            session.upload(file, &remote)?;
            self.progress = ((index + 1) * 100 / total) as u8;
            self.report(format!("Uploaded {name}"), observer);
        }
        Ok(())
    }

    fn report(&mut self, status: impl Into<String>, observer: &mut dyn FnMut(&str, u8)) {
        self.status = status.into();
        observer(&self.status, self.progress);
    }

    fn fail(&mut self, err: &UploadError, observer: &mut dyn FnMut(&str, u8)) {
        self.progress = 0;
        self.report(format!("Error - {err}"), observer);
    }
}

/// The file name component of a local path; source directory structure is
/// discarded so every file lands flat in the remote directory.
pub(crate) fn file_basename(path: &Path) -> Result<String, UploadError> {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| UploadError::Transfer {
            name: path.display().to_string(),
            message: "missing file name".to_string(),
        })
}

pub(crate) fn remote_target(remote_dir: &str, name: &str) -> String {
    format!("{}/{}", remote_dir.trim_end_matches('/'), name)
}
