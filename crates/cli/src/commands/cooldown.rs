//! Per-session output suppression.
//!
//! Hooks may invoke `ctxpack agent` on every prompt. With a session ID, a
//! tombstone file records the last emission; while it is younger than the
//! cooldown window, the command prints nothing.
//!
//! Tombstones live in a directory only the current user can enter, so other
//! users cannot suppress someone else's packets.

use std::fs::{DirBuilder, OpenOptions};
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};
use tracing::{debug, warn};

const TOMBSTONE_PREFIX: &str = "ctx-agent-";

#[cfg(unix)]
const DIR_MODE: u32 = 0o700;
#[cfg(unix)]
const FILE_MODE: u32 = 0o600;

/// Tombstone store for one session.
#[derive(Debug, Clone)]
pub struct Cooldown {
    path: PathBuf,
    window: Duration,
}

impl Cooldown {
    /// Tombstone under the per-user state directory.
    ///
    /// An empty session means "no cooldown" and yields `None`.
    pub fn for_session(session: &str, window: Duration) -> Option<Self> {
        Self::in_dir(&state_dir(), session, window)
    }

    pub fn in_dir(dir: &Path, session: &str, window: Duration) -> Option<Self> {
        let session = session.trim();
        if session.is_empty() {
            return None;
        }
        Some(Self {
            path: dir.join(format!("{TOMBSTONE_PREFIX}{}", sanitize(session))),
            window,
        })
    }

    /// True while the tombstone is younger than the window.
    pub fn is_active(&self) -> bool {
        if self.window.is_zero() {
            return false;
        }
        let Ok(modified) = std::fs::metadata(&self.path).and_then(|m| m.modified()) else {
            return false;
        };
        SystemTime::now()
            .duration_since(modified)
            .map(|age| age < self.window)
            .unwrap_or(true)
    }

    /// Record an emission. Failures are logged, never fatal.
    pub fn touch(&self) {
        if self.window.is_zero() {
            return;
        }
        if let Some(parent) = self.path.parent()
            && let Err(e) = private_dir_builder().create(parent)
        {
            warn!(dir = %parent.display(), error = %e, "Failed to create cooldown directory");
            return;
        }
        match private_file_options().open(&self.path) {
            Ok(_) => debug!(path = %self.path.display(), "Cooldown tombstone written"),
            Err(e) => warn!(path = %self.path.display(), error = %e, "Failed to write cooldown tombstone"),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn private_dir_builder() -> DirBuilder {
    let mut builder = DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::DirBuilderExt;
        builder.mode(DIR_MODE);
    }
    builder
}

/// Truncating open so the modification time moves on every emission.
fn private_file_options() -> OpenOptions {
    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(FILE_MODE);
    }
    options
}

/// `$XDG_RUNTIME_DIR/ctxpack`, else a per-user directory in the system temp dir.
fn state_dir() -> PathBuf {
    match std::env::var_os("XDG_RUNTIME_DIR").filter(|v| !v.is_empty()) {
        Some(runtime) => PathBuf::from(runtime).join("ctxpack"),
        None => std::env::temp_dir().join(user_dir_name()),
    }
}

#[cfg(unix)]
fn user_dir_name() -> String {
    // SAFETY: geteuid has no preconditions and cannot fail.
    let uid = unsafe { libc::geteuid() };
    format!("ctxpack-{uid}")
}

#[cfg(not(unix))]
fn user_dir_name() -> String {
    let user = std::env::var("USERNAME").unwrap_or_default();
    format!("ctxpack-{}", sanitize(&user))
}

/// Keep session IDs from escaping the state directory.
fn sanitize(session: &str) -> String {
    session
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
