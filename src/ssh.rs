use std::fs;
use std::io::{self, Read, Write};
use std::net::{TcpStream, ToSocketAddrs};
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD_NO_PAD as Base64;
use ssh2::{CheckResult, KnownHostFileKind, OpenFlags, OpenType, Session};

use crate::model::ConnectionParams;
use crate::workflow::{SftpBackend, SftpSession, UploadError};

const SSH_PORT: u16 = 22;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
const UPLOAD_BUFFER_SIZE: usize = 8192;
const REMOTE_DIR_MODE: i32 = 0o755;
const REMOTE_FILE_MODE: i32 = 0o644;

// SSH_FX_NO_SUCH_FILE from the SFTP protocol.
const SFTP_NO_SUCH_FILE: i32 = 2;

/// What to do with a host key that is not already trusted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum HostKeyPolicy {
    /// Accept an unknown host and append it to known_hosts. A changed key is
    /// still rejected.
    #[default]
    TrustOnFirstUse,
    /// Require the session host key to match this SHA256 fingerprint
    /// (OpenSSH rendering, `SHA256:<base64>`).
    #[allow(dead_code)]
    PinnedFingerprint(String),
    /// Require the host to already be present in known_hosts.
    #[allow(dead_code)]
    RejectUnknown,
}

#[derive(Debug, Default)]
pub(crate) struct Ssh2Backend {
    pub(crate) host_key_policy: HostKeyPolicy,
}

impl SftpBackend for Ssh2Backend {
    fn connect(&self, conn: &ConnectionParams) -> Result<Box<dyn SftpSession>, UploadError> {
        let session = connect_session(conn, &self.host_key_policy)
            .map_err(|err| UploadError::Connect(format!("{err:#}")))?;
        let sftp = session
            .sftp()
            .map_err(|err| UploadError::Connect(format!("open sftp: {err}")))?;
        Ok(Box::new(Ssh2Session { session, sftp }))
    }
}

struct Ssh2Session {
    session: Session,
    sftp: ssh2::Sftp,
}

impl SftpSession for Ssh2Session {
    fn dir_exists(&mut self, path: &str) -> Result<bool, UploadError> {
        match self.sftp.stat(Path::new(path)) {
            Ok(_) => Ok(true),
            Err(err) if is_not_found(&err) => Ok(false),
            Err(err) => Err(UploadError::RemoteFs(format!("stat {path}: {err}"))),
        }
    }

    fn create_dir(&mut self, path: &str) -> Result<(), UploadError> {
        self.sftp
            .mkdir(Path::new(path), REMOTE_DIR_MODE)
            .map_err(|err| UploadError::RemoteFs(format!("mkdir {path}: {err}")))
    }

    fn upload(&mut self, local: &Path, remote: &str) -> Result<(), UploadError> {
        upload_file(&self.sftp, local, remote).map_err(|err| UploadError::Transfer {
            name: local
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| local.display().to_string()),
            message: format!("{err:#}"),
        })
    }

    fn close(&mut self) {
        let _ = self.session.disconnect(None, "done", None);
    }
}

fn connect_session(conn: &ConnectionParams, policy: &HostKeyPolicy) -> Result<Session> {
    let address = format!("{}:{SSH_PORT}", conn.host);
    let mut last_err = None;
    let mut tcp = None;
    for addr in address.to_socket_addrs().context("resolve address")? {
        match TcpStream::connect_timeout(&addr, CONNECT_TIMEOUT) {
            Ok(stream) => {
                tcp = Some(stream);
                break;
            }
            Err(err) => last_err = Some(err),
        }
    }
    let tcp = tcp.ok_or_else(|| {
        let err = last_err
            .unwrap_or_else(|| io::Error::new(io::ErrorKind::Other, "no address resolved"));
        anyhow::anyhow!("connect tcp failed: {err}")
    })?;
    tcp.set_read_timeout(Some(CONNECT_TIMEOUT)).ok();
    tcp.set_write_timeout(Some(CONNECT_TIMEOUT)).ok();

    let mut session = Session::new().context("create session")?;
    session.set_timeout(CONNECT_TIMEOUT.as_millis() as u32);
    session.set_tcp_stream(tcp);
    session.handshake().context("ssh handshake")?;

    verify_host_key(&session, &conn.host, policy)?;

    session
        .userauth_password(&conn.username, &conn.password)
        .context("password auth")?;
    if !session.authenticated() {
        anyhow::bail!("Authentication failed");
    }

    Ok(session)
}

fn verify_host_key(session: &Session, host: &str, policy: &HostKeyPolicy) -> Result<()> {
    if let HostKeyPolicy::PinnedFingerprint(expected) = policy {
        let actual = host_key_fingerprint(session)?;
        if &actual != expected {
            anyhow::bail!("host key {actual} does not match pinned {expected}");
        }
        return Ok(());
    }

    let (key, key_type) = session.host_key().context("no host key presented")?;
    let mut known_hosts = session.known_hosts().context("init known hosts")?;
    let path = known_hosts_path();
    if path.exists() {
        known_hosts
            .read_file(&path, KnownHostFileKind::OpenSSH)
            .context("read known_hosts")?;
    }

    match known_hosts.check_port(host, SSH_PORT, key) {
        CheckResult::Match => Ok(()),
        CheckResult::Mismatch => anyhow::bail!(
            "host key for {host} changed, remove the stale entry from {} if this is expected",
            path.display()
        ),
        CheckResult::NotFound => match policy {
            HostKeyPolicy::TrustOnFirstUse => {
                known_hosts
                    .add(host, key, "added by sftp-up", key_type.into())
                    .context("add known host")?;
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent).context("create .ssh directory")?;
                }
                known_hosts
                    .write_file(&path, KnownHostFileKind::OpenSSH)
                    .context("write known_hosts")?;
                Ok(())
            }
            _ => anyhow::bail!("unknown host key for {host}"),
        },
        CheckResult::Failure => anyhow::bail!("host key check failed for {host}"),
    }
}

fn host_key_fingerprint(session: &Session) -> Result<String> {
    let hash = session
        .host_key_hash(ssh2::HashType::Sha256)
        .context("host key hash unavailable")?;
    Ok(format!("SHA256:{}", Base64.encode(hash)))
}

fn known_hosts_path() -> PathBuf {
    dirs::home_dir()
        .map(|home| home.join(".ssh").join("known_hosts"))
        .unwrap_or_else(|| PathBuf::from("known_hosts"))
}

fn is_not_found(err: &ssh2::Error) -> bool {
    matches!(err.code(), ssh2::ErrorCode::SFTP(SFTP_NO_SUCH_FILE))
}

fn upload_file(sftp: &ssh2::Sftp, local_path: &Path, remote_path: &str) -> Result<()> {
    let mut local = fs::File::open(local_path).context("open local file")?;
    let mut remote = sftp
        .open_mode(
            Path::new(remote_path),
            OpenFlags::CREATE | OpenFlags::TRUNCATE | OpenFlags::WRITE,
            REMOTE_FILE_MODE,
            OpenType::File,
        )
        .context("open remote file")?;
    let mut buffer = [0u8; UPLOAD_BUFFER_SIZE];
    loop {
        let read = local.read(&mut buffer).context("read local file")?;
        if read == 0 {
            break;
        }
        remote
            .write_all(&buffer[..read])
            .context("write remote file")?;
    }
    Ok(())
}
