//! Shared helpers for working with `/`-delimited manifest paths.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};

/// Wildcard marker recognised in manifest path segments.
pub const WILDCARD: char = '*';

/// Generic helper for representing slash-separated paths.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Path<T> {
    segments: Vec<T>,
    absolute: bool,
}

impl<T> Path<T> {
    /// Builds a path from iterator segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use hassfest_common::path::Path;
    ///
    /// let path = Path::<String>::new(["homeassistant", "components"]);
    /// assert_eq!(path.segments(), &["homeassistant", "components"]);
    /// ```
    #[must_use]
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<T>,
    {
        Self {
            segments: segments.into_iter().map(Into::into).collect(),
            absolute: false,
        }
    }

    /// Returns the path segments as a slice.
    #[must_use]
    pub fn segments(&self) -> &[T] {
        &self.segments
    }

    /// Returns the number of segments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Returns `true` when the path has no segments.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns `true` when the path was written with a leading `/`.
    #[must_use]
    pub fn is_absolute(&self) -> bool {
        self.absolute
    }
}

impl Path<String> {
    /// Parses a manifest path from its textual representation.
    ///
    /// Empty segments produced by leading, trailing, or repeated separators are
    /// discarded, as are `.` segments. A leading `/` marks the path absolute.
    ///
    /// # Examples
    ///
    /// ```
    /// use hassfest_common::path::ManifestPath;
    ///
    /// let parsed = ManifestPath::from("homeassistant/components/hue/*");
    /// assert_eq!(parsed.len(), 4);
    /// let compact = ManifestPath::from("./script//hassfest/");
    /// assert_eq!(compact.segments(), &["script", "hassfest"]);
    /// assert!(!compact.is_absolute());
    /// ```
    #[must_use]
    pub fn from(path: &str) -> Self {
        let mut parsed = Self::new(
            path.split('/')
                .filter(|segment| !segment.is_empty() && *segment != "."),
        );
        parsed.absolute = path.starts_with('/');
        parsed
    }

    /// Returns the final path segment when present.
    #[must_use]
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns the segment at `index` when present.
    #[must_use]
    pub fn segment(&self, index: usize) -> Option<&str> {
        self.segments.get(index).map(String::as_str)
    }

    /// Returns `true` when the final segment is exactly the wildcard.
    #[must_use]
    pub fn is_full_wildcard(&self) -> bool {
        self.last() == Some("*")
    }

    /// Drops trailing segments that contain a wildcard.
    ///
    /// The result is the deepest ancestor guaranteed to be a concrete path.
    /// A pattern made only of wildcards collapses to the empty path, which
    /// resolves to the base directory.
    ///
    /// # Examples
    ///
    /// ```
    /// use hassfest_common::path::ManifestPath;
    ///
    /// let pattern = ManifestPath::from("homeassistant/components/*/ws_*");
    /// assert_eq!(pattern.concrete_ancestor().to_string(), "homeassistant/components");
    /// ```
    #[must_use]
    pub fn concrete_ancestor(&self) -> Self {
        let concrete = self
            .segments
            .iter()
            .rposition(|segment| !segment.contains(WILDCARD))
            .map_or(0, |index| index + 1);

        Self {
            segments: self.segments.iter().take(concrete).cloned().collect(),
            absolute: self.absolute,
        }
    }

    /// Joins the path onto `base`; absolute paths ignore `base`.
    #[must_use]
    pub fn resolve(&self, base: &Utf8Path) -> Utf8PathBuf {
        let mut resolved = if self.absolute {
            Utf8PathBuf::from("/")
        } else {
            base.to_owned()
        };
        for segment in &self.segments {
            resolved.push(segment);
        }
        resolved
    }
}

impl fmt::Display for Path<String> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.absolute {
            f.write_str("/")?;
        }
        f.write_str(&self.segments.join("/"))
    }
}

/// Convenience alias for manifest paths composed of text segments.
pub type ManifestPath = Path<String>;
