use std::fs;
use std::io::Write;
use std::path::Path;

use crate::app::App;
use crate::app::constants::{
    LOG_MAX_ENTRIES, LOG_MAX_IN_MEMORY, LOG_RETENTION_DAYS, LOG_SEPARATOR, LOG_TIMESTAMP_FORMAT,
};

impl App {
    pub(crate) fn set_status(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.status = message.clone();
        self.log_line(&message);
    }

    pub(crate) fn log_line(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format(LOG_TIMESTAMP_FORMAT);
        let line = format!("{timestamp}{LOG_SEPARATOR}{message}");
        if let Some(parent) = self.log_path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        if let Ok(mut file) = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
        {
            let _ = writeln!(file, "{line}");
        }
        self.log_lines.push_back(line);
        while self.log_lines.len() > LOG_MAX_IN_MEMORY {
            self.log_lines.pop_front();
        }
    }
}

pub(crate) fn prune_log_file(path: &Path) {
    let Ok(content) = fs::read_to_string(path) else {
        return;
    };
    let cutoff = chrono::Local::now().naive_local() - chrono::Duration::days(LOG_RETENTION_DAYS);
    let mut kept: Vec<&str> = content
        .lines()
        .filter(|line| {
            line.split_once(LOG_SEPARATOR)
                .and_then(|(stamp, _)| {
                    chrono::NaiveDateTime::parse_from_str(stamp, LOG_TIMESTAMP_FORMAT).ok()
                })
                .is_some_and(|stamp| stamp >= cutoff)
        })
        .collect();
    if kept.len() > LOG_MAX_ENTRIES {
        kept = kept.split_off(kept.len() - LOG_MAX_ENTRIES);
    }
    if kept.is_empty() {
        let _ = fs::remove_file(path);
    } else {
        let _ = fs::write(path, kept.join("\n") + "\n");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_path() -> std::path::PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap_or_default()
            .as_nanos();
        std::env::temp_dir().join(format!("sftp-up-log-test-{nanos}.log"))
    }

    #[test]
    fn prune_log_file_drops_old_and_malformed_lines() {
        let path = temp_log_path();
        let now = chrono::Local::now().naive_local();
        let old = now - chrono::Duration::days(LOG_RETENTION_DAYS + 1);
        let recent = now - chrono::Duration::days(1);
        let old_line = format!("{}{LOG_SEPARATOR}old entry", old.format(LOG_TIMESTAMP_FORMAT));
        let recent_line = format!(
            "{}{LOG_SEPARATOR}recent entry",
            recent.format(LOG_TIMESTAMP_FORMAT)
        );
        fs::write(&path, format!("{old_line}\ngarbage\n{recent_line}\n")).unwrap();
        prune_log_file(&path);
        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old entry"));
        assert!(!content.contains("garbage"));
        assert!(content.contains("recent entry"));
        fs::remove_file(&path).ok();
    }

    #[test]
    fn prune_log_file_removes_a_fully_stale_file() {
        let path = temp_log_path();
        let old = chrono::Local::now().naive_local()
            - chrono::Duration::days(LOG_RETENTION_DAYS + 2);
        let line = format!("{}{LOG_SEPARATOR}stale", old.format(LOG_TIMESTAMP_FORMAT));
        fs::write(&path, format!("{line}\n")).unwrap();
        prune_log_file(&path);
        assert!(!path.exists());
    }

    #[test]
    fn set_status_updates_status_and_memory_log() {
        let mut app = App::for_test();
        app.set_status("Uploaded demo.txt");
        assert_eq!(app.status, "Uploaded demo.txt");
        assert!(
            app.log_lines
                .back()
                .is_some_and(|line| line.ends_with("Uploaded demo.txt"))
        );
        fs::remove_file(&app.log_path).ok();
    }
}
