use crate::errors::Error;
use crate::eve::{json, Event};
use crate::filter::EventFilter;

use log::*;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

/// What to do with an input file that cannot be opened or is not valid UTF-8.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilePolicy {
    /// Log a warning and continue with the next file.
    Warn,
    /// Continue with the next file, only logging at debug level.
    Ignore,
    /// Yield an [`Error::Unreadable`] and end the sequence.
    FailFast,
}

impl Default for FilePolicy {
    fn default() -> Self {
        FilePolicy::Warn
    }
}

/// Reads eve files in order, one line at a time.
///
/// Every call to [`EveReader::events`] starts over from the first file.
#[derive(Clone, Debug)]
pub struct EveReader {
    files: Vec<PathBuf>,
    policy: FilePolicy,
}

impl EveReader {
    pub fn new<I, P>(files: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        EveReader {
            files: files.into_iter().map(Into::into).collect(),
            policy: FilePolicy::default(),
        }
    }

    pub fn with_policy(mut self, policy: FilePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    pub fn policy(&self) -> FilePolicy {
        self.policy
    }

    pub fn events(&self) -> Events<'_> {
        Events {
            files: self.files.iter(),
            policy: self.policy,
            current: None,
            failed: false,
            events_read: 0,
            lines_skipped: 0,
            files_skipped: 0,
        }
    }

    /// Events accepted by `filter`. Errors from a fail-fast file policy pass through.
    pub fn accepted<'a, F>(&'a self, filter: &'a F) -> Accepted<'a, F>
    where
        F: EventFilter + ?Sized,
    {
        Accepted {
            events: self.events(),
            filter,
        }
    }
}

struct OpenFile<'a> {
    path: &'a Path,
    inner: BufReader<File>,
    line_no: usize,
    buf: String,
}

impl<'a> OpenFile<'a> {
    fn next_line(&mut self) -> std::io::Result<Option<(usize, &str)>> {
        self.buf.clear();
        let bytes_read = self.inner.read_line(&mut self.buf)?;
        if bytes_read == 0 {
            return Ok(None);
        }
        self.line_no += 1;
        let line = self.buf.trim_end_matches(|c: char| c == '\n' || c == '\r');
        Ok(Some((self.line_no, line)))
    }
}

/// Lazy sequence of decoded events over every file of an [`EveReader`].
pub struct Events<'a> {
    files: std::slice::Iter<'a, PathBuf>,
    policy: FilePolicy,
    current: Option<OpenFile<'a>>,
    failed: bool,
    events_read: usize,
    lines_skipped: usize,
    files_skipped: usize,
}

impl<'a> Events<'a> {
    pub fn events_read(&self) -> usize {
        self.events_read
    }

    pub fn lines_skipped(&self) -> usize {
        self.lines_skipped
    }

    pub fn files_skipped(&self) -> usize {
        self.files_skipped
    }

    fn file_failed(&mut self, path: &Path, e: std::io::Error) -> Option<Error> {
        match self.policy {
            FilePolicy::Warn => {
                warn!("I cannot use file {:?}: {}. Ignoring it.", path, e);
                self.files_skipped += 1;
                None
            }
            FilePolicy::Ignore => {
                debug!("Skipping file {:?}: {}", path, e);
                self.files_skipped += 1;
                None
            }
            FilePolicy::FailFast => {
                error!("I cannot use file {:?}: {}", path, e);
                self.failed = true;
                Some(Error::Unreadable {
                    path: path.to_path_buf(),
                    source: e,
                })
            }
        }
    }
}

impl<'a> Iterator for Events<'a> {
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.failed {
                return None;
            }

            let open = match self.current.as_mut() {
                Some(open) => open,
                None => {
                    let path = self.files.next()?;
                    match File::open(path) {
                        Ok(f) => {
                            info!("Reading events from {:?}", path);
                            self.current = Some(OpenFile {
                                path: path.as_path(),
                                inner: BufReader::new(f),
                                line_no: 0,
                                buf: String::new(),
                            });
                        }
                        Err(e) => {
                            if let Some(err) = self.file_failed(path, e) {
                                return Some(Err(err));
                            }
                        }
                    }
                    continue;
                }
            };

            let path = open.path;
            let decoded = match open.next_line() {
                Ok(Some((line_no, line))) => Ok(Some(json::JsonParser::parse(line).map_err(
                    |e| {
                        warn!(
                            "I cannot use data at {:?}:{}: '{}' ({}). Ignoring it.",
                            path, line_no, line, e
                        );
                    },
                ))),
                Ok(None) => Ok(None),
                Err(e) => Err(e),
            };

            match decoded {
                Ok(Some(Ok(event))) => {
                    self.events_read += 1;
                    return Some(Ok(event));
                }
                Ok(Some(Err(()))) => self.lines_skipped += 1,
                Ok(None) => {
                    debug!("Finished {:?} after {} lines", path, open.line_no);
                    self.current = None;
                }
                Err(e) => {
                    self.current = None;
                    if let Some(err) = self.file_failed(path, e) {
                        return Some(Err(err));
                    }
                }
            }
        }
    }
}

/// Events of an [`EveReader`] that pass a filter.
pub struct Accepted<'a, F: ?Sized> {
    events: Events<'a>,
    filter: &'a F,
}

impl<'a, F: ?Sized> Accepted<'a, F> {
    /// Counters of the underlying read.
    pub fn events(&self) -> &Events<'a> {
        &self.events
    }
}

impl<'a, F> Iterator for Accepted<'a, F>
where
    F: EventFilter + ?Sized,
{
    type Item = Result<Event, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.events.next()? {
                Ok(event) => {
                    if self.filter.accept(&event) {
                        return Some(Ok(event));
                    }
                }
                Err(e) => return Some(Err(e)),
            }
        }
    }
}
