//! Streaming reader for the `omit =` block of a coverage manifest.
//!
//! Only the entries between the `omit =` marker and the `[report]` section
//! header matter. Everything before the marker is skipped, and reading stops
//! at the header without consuming the rest of the file.

use std::io::{self, BufRead, Lines};

/// Line that opens the list of excluded path patterns.
pub const OMIT_MARKER: &str = "omit =";

/// Section header that ends the list of excluded path patterns.
pub const REPORT_MARKER: &str = "[report]";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ScanState {
    /// Before the omit block.
    Scanning,
    /// Inside the omit block.
    Checking,
    /// Past the `[report]` header or the end of input.
    Finished,
}

/// Iterator over the trimmed path patterns listed in the omit block.
///
/// Blank lines and `#` comments are skipped wherever they appear.
///
/// # Examples
///
/// ```
/// use hassfest_coverage::omit::OmitEntries;
///
/// let manifest = "[run]\nsource = homeassistant\nomit =\n    tests/*\n[report]\nskip = x\n";
/// let entries: Vec<String> = OmitEntries::new(manifest.as_bytes())
///     .collect::<Result<_, _>>()
///     .expect("in-memory reads cannot fail");
/// assert_eq!(entries, vec!["tests/*"]);
/// ```
pub struct OmitEntries<R> {
    lines: Lines<R>,
    state: ScanState,
}

impl<R: BufRead> OmitEntries<R> {
    /// Wraps a buffered reader positioned at the start of the manifest.
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            state: ScanState::Scanning,
        }
    }
}

impl<R: BufRead> Iterator for OmitEntries<R> {
    type Item = io::Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        while self.state != ScanState::Finished {
            let raw = match self.lines.next() {
                Some(Ok(raw)) => raw,
                Some(Err(err)) => {
                    self.state = ScanState::Finished;
                    return Some(Err(err));
                }
                None => {
                    self.state = ScanState::Finished;
                    return None;
                }
            };

            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            match self.state {
                ScanState::Scanning => {
                    if line == OMIT_MARKER {
                        self.state = ScanState::Checking;
                    }
                }
                ScanState::Checking if line == REPORT_MARKER => {
                    self.state = ScanState::Finished;
                }
                ScanState::Checking => return Some(Ok(line.to_owned())),
                ScanState::Finished => {}
            }
        }

        None
    }
}
