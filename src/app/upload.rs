use std::sync::Arc;
use std::sync::mpsc;

use crate::app::App;
use crate::app::constants::STATUS_UPLOAD_RUNNING;
use crate::model::UploadUpdate;

impl App {
    /// Runs the upload workflow on a worker thread so the form stays
    /// responsive; the workflow itself stays strictly sequential. A second
    /// invocation while one run is in flight is rejected.
    pub(crate) fn start_upload(&mut self) {
        if self.upload_in_flight() {
            self.set_status(STATUS_UPLOAD_RUNNING);
            return;
        }
        let conn = self.form.params();
        let mut workflow = self.workflow.clone();
        let backend = Arc::clone(&self.backend);
        let (tx, rx) = mpsc::channel();
        std::thread::spawn(move || {
            let report_tx = tx.clone();
            let result = workflow.run_upload(&conn, backend.as_ref(), &mut |status, progress| {
                let _ = report_tx.send(UploadUpdate::Report {
                    status: status.to_string(),
                    progress,
                });
            });
            let _ = tx.send(UploadUpdate::Done(result.map_err(|err| err.to_string())));
        });
        self.upload_rx = Some(rx);
    }

    pub(crate) fn poll_upload_progress(&mut self) {
        let Some(rx) = self.upload_rx.take() else {
            return;
        };
        let mut done = false;
        while let Ok(update) = rx.try_recv() {
            match update {
                UploadUpdate::Report { status, progress } => {
                    self.progress = progress;
                    self.set_status(status);
                }
                UploadUpdate::Done(_) => done = true,
            }
        }
        if !done {
            self.upload_rx = Some(rx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;
    use std::time::{Duration, Instant};

    use crate::model::ConnectionParams;
    use crate::workflow::tests::{Call, MockSftpBackend};
    use crate::workflow::{
        MSG_ALL_UPLOADED, MSG_NO_FILES, SftpBackend, SftpSession, UploadError,
    };

    #[derive(Default)]
    struct SlowBackend {
        inner: MockSftpBackend,
    }

    impl SftpBackend for SlowBackend {
        fn connect(&self, conn: &ConnectionParams) -> Result<Box<dyn SftpSession>, UploadError> {
            std::thread::sleep(Duration::from_millis(200));
            self.inner.connect(conn)
        }
    }

    fn fill_form(app: &mut App) {
        app.form.host = "example.com".to_string();
        app.form.username = "deploy".to_string();
        app.form.password = "secret".to_string();
        app.form.remote_path = "/srv/incoming".to_string();
    }

    fn drain(app: &mut App) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while app.upload_in_flight() && Instant::now() < deadline {
            app.poll_upload_progress();
            std::thread::sleep(Duration::from_millis(2));
        }
        assert!(!app.upload_in_flight(), "upload did not finish in time");
    }

    #[test]
    fn upload_round_trip_reports_success() {
        let backend = Arc::new(MockSftpBackend::default());
        let mut app = App::for_test_with_backend(backend.clone());
        fill_form(&mut app);
        app.workflow
            .select_files(vec![PathBuf::from("/tmp/a.txt"), PathBuf::from("/tmp/b.txt")]);
        app.start_upload();
        drain(&mut app);
        assert_eq!(app.progress, 100);
        assert_eq!(app.status, MSG_ALL_UPLOADED);
        let calls = backend.script.lock().unwrap().calls.clone();
        let uploads = calls.iter().filter(|call| matches!(call, Call::Upload(_))).count();
        assert_eq!(uploads, 2);
    }

    #[test]
    fn upload_without_files_reports_validation_message() {
        let backend = Arc::new(MockSftpBackend::default());
        let mut app = App::for_test_with_backend(backend.clone());
        fill_form(&mut app);
        app.start_upload();
        drain(&mut app);
        assert_eq!(app.status, MSG_NO_FILES);
        assert!(backend.script.lock().unwrap().calls.is_empty());
    }

    #[test]
    fn second_invocation_while_running_is_rejected() {
        let mut app = App::for_test_with_backend(Arc::new(SlowBackend::default()));
        fill_form(&mut app);
        app.workflow.select_files(vec![PathBuf::from("/tmp/a.txt")]);
        app.start_upload();
        assert!(app.upload_in_flight());
        app.start_upload();
        assert_eq!(app.status, STATUS_UPLOAD_RUNNING);
        drain(&mut app);
        assert_eq!(app.status, MSG_ALL_UPLOADED);
    }
}
