use crate::errors::Error;
use crate::eve::{json, Event};
use crate::task::CancelToken;

use log::*;
use std::fs::File;
use std::io::{BufRead, BufReader, Seek, SeekFrom};
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Follows a single eve file as suricata appends to it.
///
/// On EOF the iterator sleeps for the poll interval and tries again, so `next` only
/// returns `None` once the cancel token fires. A line without its newline yet is held
/// back until the rest of it is written.
pub struct EveTail {
    path: PathBuf,
    inner: BufReader<File>,
    partial: String,
    line_no: usize,
    poll_interval: Duration,
    cancel: CancelToken,
    lines_skipped: usize,
}

impl EveTail {
    pub fn open<P: AsRef<Path>>(path: P, cancel: CancelToken) -> Result<Self, Error> {
        let path = path.as_ref().to_path_buf();
        let f = File::open(&path).map_err(|source| Error::Unreadable {
            path: path.clone(),
            source,
        })?;
        info!("Tailing {:?}", path);
        Ok(EveTail {
            path,
            inner: BufReader::new(f),
            partial: String::new(),
            line_no: 0,
            poll_interval: DEFAULT_POLL_INTERVAL,
            cancel,
            lines_skipped: 0,
        })
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    /// Skip what is already in the file and only yield lines appended from now on.
    pub fn from_end(mut self) -> Result<Self, Error> {
        self.inner.seek(SeekFrom::End(0))?;
        self.partial.clear();
        Ok(self)
    }

    pub fn lines_skipped(&self) -> usize {
        self.lines_skipped
    }

    fn wait(&self) {
        trace!("No new data in {:?}, sleeping {:?}", self.path, self.poll_interval);
        std::thread::sleep(self.poll_interval);
    }
}

impl Iterator for EveTail {
    type Item = Event;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.cancel.is_cancelled() {
                debug!("Stopped tailing {:?} after {} lines", self.path, self.line_no);
                return None;
            }

            match self.inner.read_line(&mut self.partial) {
                Ok(0) => {
                    self.wait();
                    continue;
                }
                Ok(_) => {
                    if !self.partial.ends_with('\n') {
                        continue;
                    }
                }
                Err(e) => {
                    self.line_no += 1;
                    self.lines_skipped += 1;
                    warn!("I cannot use data at {:?}:{}: {}. Ignoring it.", self.path, self.line_no, e);
                    self.partial.clear();
                    continue;
                }
            }

            self.line_no += 1;
            let line = std::mem::take(&mut self.partial);
            let line = line.trim_end_matches(|c: char| c == '\n' || c == '\r');
            match json::JsonParser::parse(line) {
                Ok(event) => return Some(event),
                Err(e) => {
                    self.lines_skipped += 1;
                    warn!(
                        "I cannot use data at {:?}:{}: '{}' ({}). Ignoring it.",
                        self.path, self.line_no, line, e
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn follows_appended_lines() {
        let _ = env_logger::try_init();

        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("eve.json");
        let mut f = File::create(&path).expect("Failed to create");
        f.write_all(b"{\"n\":1}\nnot json\n{\"n\":")
            .expect("Failed to write");
        f.flush().expect("Failed to flush");

        let cancel = CancelToken::default();
        let mut tail = EveTail::open(&path, cancel.clone())
            .expect("Failed to open")
            .with_poll_interval(Duration::from_millis(5));

        assert_eq!(tail.next().and_then(|e| e.u64_at(&["n"])), Some(1));

        let writer = std::thread::spawn(move || {
            std::thread::sleep(Duration::from_millis(30));
            f.write_all(b"2}\n").expect("Failed to write");
            f.flush().expect("Failed to flush");
        });

        assert_eq!(tail.next().and_then(|e| e.u64_at(&["n"])), Some(2));
        assert_eq!(tail.lines_skipped(), 1);
        writer.join().expect("Writer panicked");

        cancel.cancel();
        assert!(tail.next().is_none());
    }

    #[test]
    fn from_end_skips_existing_lines() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("eve.json");
        let mut f = File::create(&path).expect("Failed to create");
        f.write_all(b"{\"n\":1}\n").expect("Failed to write");
        f.flush().expect("Failed to flush");

        let cancel = CancelToken::default();
        let mut tail = EveTail::open(&path, cancel.clone())
            .expect("Failed to open")
            .with_poll_interval(Duration::from_millis(5))
            .from_end()
            .expect("Failed to seek");

        f.write_all(b"{\"n\":2}\n").expect("Failed to write");
        f.flush().expect("Failed to flush");

        assert_eq!(tail.next().and_then(|e| e.u64_at(&["n"])), Some(2));
        cancel.cancel();
        assert!(tail.next().is_none());
    }

    #[test]
    fn blank_lines_are_counted() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let path = dir.path().join("eve.json");
        std::fs::write(&path, "\n   \n{\"n\":1}\n").expect("Failed to write");

        let cancel = CancelToken::default();
        let mut tail = EveTail::open(&path, cancel).expect("Failed to open");

        assert_eq!(tail.next().and_then(|e| e.u64_at(&["n"])), Some(1));
        assert_eq!(tail.lines_skipped(), 2);
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().expect("Failed to create temp dir");
        let err = EveTail::open(dir.path().join("nope.json"), CancelToken::default())
            .err()
            .expect("Expected an error");
        assert!(matches!(err, Error::Unreadable { .. }));
    }
}
