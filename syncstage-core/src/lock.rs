use crate::config::CONFIG_DIR;
use anyhow::{anyhow, Context, Result};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::{SystemTime, UNIX_EPOCH};

const LOCK_FILE_NAME: &str = "syncstage.lock";
const STALE_LOCK_TIMEOUT_SECS: u64 = 300; // 5 minutes

/// Advisory lock held while a run mutates a root.
///
/// A lock directory created by `acquire` is removed again on release once it
/// is empty, so applying runs leave no trace in the root.
#[derive(Debug)]
pub struct LockFile {
    path: PathBuf,
    pid: u32,
    timestamp: u64,
    created_dir: bool,
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl LockFile {
    /// Acquire the lock stored in `<root>/.syncstage`.
    pub fn acquire_for_root(root: &Path) -> Result<Self> {
        Self::acquire(&root.join(CONFIG_DIR))
    }

    /// Acquire a lock file inside `lock_dir`
    pub fn acquire(lock_dir: &Path) -> Result<Self> {
        let lock_path = lock_dir.join(LOCK_FILE_NAME);

        if lock_path.exists() {
            let content = fs::read_to_string(&lock_path).context("Failed to read lock file")?;

            // Format: "pid:timestamp"
            if let Some((pid, timestamp)) = content.trim().split_once(':') {
                let pid = pid.parse::<u32>().unwrap_or(0);
                let timestamp = timestamp.parse::<u64>().unwrap_or(0);

                if now_secs().saturating_sub(timestamp) > STALE_LOCK_TIMEOUT_SECS {
                    tracing::info!("removing stale lock {}", lock_path.display());
                    fs::remove_file(&lock_path).context("Failed to remove stale lock file")?;
                } else if is_process_running(pid) {
                    return Err(anyhow!(
                        "Another syncstage process is already running (PID: {}). \
                        If this is incorrect, remove the lock file at: {}",
                        pid,
                        lock_path.display()
                    ));
                } else {
                    tracing::info!("removing orphaned lock {}", lock_path.display());
                    fs::remove_file(&lock_path).context("Failed to remove orphaned lock file")?;
                }
            }
        }

        let pid = process::id();
        let timestamp = now_secs();

        let created_dir = !lock_dir.exists();
        fs::create_dir_all(lock_dir).context("Failed to create lock directory")?;

        let mut file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)
            .with_context(|| format!("Failed to create lock file {}", lock_path.display()))?;

        file.write_all(format!("{pid}:{timestamp}").as_bytes())
            .context("Failed to write lock file")?;

        Ok(Self {
            path: lock_path,
            pid,
            timestamp,
            created_dir,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Release the lock if the file still carries our content.
    pub fn release(self) -> Result<()> {
        self.remove_if_owned()
    }

    fn remove_if_owned(&self) -> Result<()> {
        if self.path.exists() {
            let content = fs::read_to_string(&self.path).context("Failed to read lock file")?;
            if content.trim() == format!("{}:{}", self.pid, self.timestamp) {
                fs::remove_file(&self.path).context("Failed to remove lock file")?;
                self.remove_created_dir();
            }
        }
        Ok(())
    }

    fn remove_created_dir(&self) {
        if !self.created_dir {
            return;
        }
        if let Some(dir) = self.path.parent() {
            // Only succeeds once the directory is empty.
            if let Err(e) = fs::remove_dir(dir) {
                tracing::debug!("keeping lock directory {}: {}", dir.display(), e);
            }
        }
    }
}

impl Drop for LockFile {
    fn drop(&mut self) {
        if let Err(e) = self.remove_if_owned() {
            tracing::debug!("lock cleanup failed: {:#}", e);
        }
    }
}

/// Check if a process with the given PID is running
#[cfg(unix)]
fn is_process_running(pid: u32) -> bool {
    if pid == 0 {
        return false;
    }
    // Signal 0 only checks that the process exists
    #[allow(clippy::cast_possible_wrap)]
    unsafe {
        libc::kill(pid as libc::pid_t, 0) == 0
    }
}

#[cfg(windows)]
fn is_process_running(pid: u32) -> bool {
    use winapi::um::handleapi::CloseHandle;
    use winapi::um::processthreadsapi::OpenProcess;
    use winapi::um::winnt::PROCESS_QUERY_INFORMATION;

    unsafe {
        let handle = OpenProcess(PROCESS_QUERY_INFORMATION, 0, pid);
        if handle.is_null() {
            false
        } else {
            CloseHandle(handle);
            true
        }
    }
}

#[cfg(not(any(unix, windows)))]
fn is_process_running(_pid: u32) -> bool {
    false
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_acquire_lock_for_root() {
        let temp_dir = TempDir::new().unwrap();

        let lock = LockFile::acquire_for_root(temp_dir.path()).unwrap();
        let expected = temp_dir.path().join(".syncstage").join(LOCK_FILE_NAME);
        assert_eq!(lock.path(), expected);
        assert!(expected.exists());
        assert_eq!(lock.pid, process::id());

        lock.release().unwrap();
        assert!(!expected.exists());
        assert!(!temp_dir.path().join(".syncstage").exists());
    }

    #[test]
    fn test_existing_lock_dir_is_kept() {
        let temp_dir = TempDir::new().unwrap();
        let lock_dir = temp_dir.path().join(".syncstage");
        fs::create_dir_all(&lock_dir).unwrap();
        fs::write(lock_dir.join("config.toml"), "roots = []\n").unwrap();

        let lock = LockFile::acquire(&lock_dir).unwrap();
        lock.release().unwrap();

        assert!(lock_dir.join("config.toml").exists());
        assert!(!lock_dir.join(LOCK_FILE_NAME).exists());
    }

    #[test]
    fn test_double_acquire_fails() {
        let temp_dir = TempDir::new().unwrap();

        let _lock1 = LockFile::acquire_for_root(temp_dir.path()).unwrap();

        let result = LockFile::acquire_for_root(temp_dir.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("already running"));
    }

    #[test]
    fn test_stale_lock_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let lock_dir = temp_dir.path().join(".syncstage");
        fs::create_dir_all(&lock_dir).unwrap();
        let lock_path = lock_dir.join(LOCK_FILE_NAME);

        let old_timestamp = now_secs() - (STALE_LOCK_TIMEOUT_SECS + 100);
        fs::write(&lock_path, format!("{}:{}", process::id(), old_timestamp)).unwrap();

        let lock = LockFile::acquire(&lock_dir).unwrap();
        assert!(lock_path.exists());
        lock.release().unwrap();
    }

    #[test]
    fn test_orphaned_lock_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let lock_dir = temp_dir.path().join(".syncstage");
        fs::create_dir_all(&lock_dir).unwrap();
        let lock_path = lock_dir.join(LOCK_FILE_NAME);

        fs::write(&lock_path, format!("999999:{}", now_secs() - 10)).unwrap();

        let lock = LockFile::acquire(&lock_dir).unwrap();
        assert!(lock_path.exists());
        lock.release().unwrap();
    }

    #[test]
    fn test_lock_drop_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let lock_path = temp_dir.path().join(".syncstage").join(LOCK_FILE_NAME);

        {
            let _lock = LockFile::acquire_for_root(temp_dir.path()).unwrap();
            assert!(lock_path.exists());
        }

        assert!(!lock_path.exists());
    }

    #[test]
    fn test_foreign_lock_is_left_alone() {
        let temp_dir = TempDir::new().unwrap();
        let lock = LockFile::acquire_for_root(temp_dir.path()).unwrap();
        let lock_path = lock.path().to_path_buf();

        fs::write(&lock_path, "1:1").unwrap();
        lock.release().unwrap();

        assert!(lock_path.exists());
    }

    #[test]
    fn test_process_running_detection() {
        assert!(is_process_running(process::id()));
        assert!(!is_process_running(999_999));
    }
}
