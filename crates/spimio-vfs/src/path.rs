//! Pure POSIX path algebra.
//!
//! A [`PurePath`] is a parsed `(drive, root, segments)` triple. Parsing
//! never looks at a filesystem: empty and `.` segments are dropped, `..` is
//! kept verbatim, and a part carrying a root discards everything before it.
//!
//! The POSIX flavour never produces a drive; the field exists so that
//! equality and `relative_to` follow the usual `(drive, root, parts)` rules.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use crate::error::PathError;

/// Path separator.
pub const SEP: char = '/';

/// A parsed path with no filesystem attached.
///
/// Equality, ordering and hashing look only at the parsed triple, so
/// `"a//b/./c"` and `"a/b/c"` are the same path.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PurePath {
    drive: String,
    root: String,
    segments: Vec<String>,
}

/// Split one string into (root, segments).
fn parse_str(s: &str) -> (bool, Vec<String>) {
    let rooted = s.starts_with(SEP);
    let segments = s
        .split(SEP)
        .filter(|seg| !seg.is_empty() && *seg != ".")
        .map(str::to_string)
        .collect();
    (rooted, segments)
}

impl PurePath {
    /// Parse a single path string.
    ///
    /// ```
    /// use spimio_vfs::PurePath;
    ///
    /// let p = PurePath::new("sub-01//ses-1/./a.h5");
    /// assert_eq!(p.to_string(), "sub-01/ses-1/a.h5");
    /// assert_eq!(PurePath::new("").to_string(), ".");
    /// assert_eq!(PurePath::new("//x").to_string(), "/x");
    /// ```
    pub fn new(s: &str) -> Self {
        Self::from_parts([s])
    }

    /// Parse and concatenate several strings, left to right.
    ///
    /// A part that starts with `/` restarts the path from the root.
    pub fn from_parts<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = PurePath::default();
        for part in parts {
            path = path.join(&PurePath::parse_one(part.as_ref()));
        }
        path
    }

    fn parse_one(s: &str) -> Self {
        let (rooted, segments) = parse_str(s);
        Self {
            drive: String::new(),
            root: if rooted { SEP.to_string() } else { String::new() },
            segments,
        }
    }

    /// Build a relative path from segments that are already split.
    ///
    /// Segments that are empty or `.` are dropped; a segment containing a
    /// separator is split so the invariant "no separator inside a segment"
    /// holds.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut path = PurePath::default();
        for seg in segments {
            path.segments.extend(parse_str(seg.as_ref()).1);
        }
        path
    }

    pub fn drive(&self) -> &str {
        &self.drive
    }

    pub fn root(&self) -> &str {
        &self.root
    }

    /// Segments after the root.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Anchor followed by segments, the way `pathlib` reports `parts`.
    pub fn parts(&self) -> Vec<&str> {
        let anchor = self.anchor();
        let mut parts = Vec::with_capacity(self.segments.len() + 1);
        if !anchor.is_empty() {
            parts.push(anchor);
        }
        parts.extend(self.segments.iter().map(String::as_str));
        parts
    }

    fn anchor(&self) -> &str {
        if self.drive.is_empty() {
            &self.root
        } else {
            &self.drive
        }
    }

    pub fn is_absolute(&self) -> bool {
        !self.root.is_empty()
    }

    /// The same segments with drive and root stripped.
    pub fn strip_root(&self) -> Self {
        Self {
            drive: String::new(),
            root: String::new(),
            segments: self.segments.clone(),
        }
    }

    /// Final segment, or `""` for `/` and `.`.
    pub fn name(&self) -> &str {
        self.segments.last().map(String::as_str).unwrap_or("")
    }

    /// Final `.ext` of the name, including the dot.
    ///
    /// ```
    /// use spimio_vfs::PurePath;
    ///
    /// assert_eq!(PurePath::new("a/b.ome.h5").suffix(), ".h5");
    /// assert_eq!(PurePath::new("a/.hidden").suffix(), "");
    /// assert_eq!(PurePath::new("a/trailing.").suffix(), "");
    /// ```
    pub fn suffix(&self) -> &str {
        let name = self.name();
        match name.rfind('.') {
            Some(i) if i > 0 && i < name.len() - 1 => &name[i..],
            _ => "",
        }
    }

    /// All suffixes of the name, in order.
    pub fn suffixes(&self) -> Vec<&str> {
        let name = self.name();
        if name.ends_with('.') {
            return Vec::new();
        }
        let trimmed = name.trim_start_matches('.');
        let offset = name.len() - trimmed.len();
        let mut out = Vec::new();
        for (i, _) in trimmed.match_indices('.') {
            let start = offset + i;
            let end = name[start + 1..]
                .find('.')
                .map(|j| start + 1 + j)
                .unwrap_or(name.len());
            out.push(&name[start..end]);
        }
        out
    }

    /// Name without its final suffix.
    pub fn stem(&self) -> &str {
        let name = self.name();
        &name[..name.len() - self.suffix().len()]
    }

    /// Join another path onto this one.
    ///
    /// If `other` is rooted it replaces this path entirely.
    pub fn join(&self, other: &PurePath) -> PurePath {
        if !other.root.is_empty() || !other.drive.is_empty() {
            let drive = if other.drive.is_empty() {
                self.drive.clone()
            } else {
                other.drive.clone()
            };
            return PurePath {
                drive,
                root: other.root.clone(),
                segments: other.segments.clone(),
            };
        }
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        PurePath {
            drive: self.drive.clone(),
            root: self.root.clone(),
            segments,
        }
    }

    /// Append one segment without re-parsing it.
    ///
    /// `name` must be a single segment; listing code uses this with names
    /// that came out of a path split.
    pub fn child(&self, name: &str) -> PurePath {
        let mut segments = self.segments.clone();
        segments.push(name.to_string());
        PurePath {
            drive: self.drive.clone(),
            root: self.root.clone(),
            segments,
        }
    }

    /// Logical parent. `/` and `.` are their own parents.
    pub fn parent(&self) -> PurePath {
        self.ancestor(0).unwrap_or_else(|| self.clone())
    }

    /// Number of strict ancestors.
    pub fn ancestor_count(&self) -> usize {
        self.segments.len()
    }

    /// The `index`-th ancestor, nearest first.
    pub fn ancestor(&self, index: usize) -> Option<PurePath> {
        let len = self.segments.len();
        if index >= len {
            return None;
        }
        Some(PurePath {
            drive: self.drive.clone(),
            root: self.root.clone(),
            segments: self.segments[..len - index - 1].to_vec(),
        })
    }

    /// Replace the final segment.
    ///
    /// ```
    /// use spimio_vfs::PurePath;
    ///
    /// let p = PurePath::new("a/b.h5");
    /// assert_eq!(p.with_name("c.json").unwrap(), PurePath::new("a/c.json"));
    /// assert!(p.with_name("x/y").is_err());
    /// assert!(PurePath::new("/").with_name("x").is_err());
    /// ```
    pub fn with_name(&self, name: &str) -> Result<PurePath, PathError> {
        if self.name().is_empty() {
            return Err(PathError::EmptyName(self.to_string()));
        }
        let parsed = PurePath::new(name);
        if name.is_empty()
            || name.ends_with(SEP)
            || parsed.is_absolute()
            || parsed.segments.len() != 1
        {
            return Err(PathError::InvalidName(name.to_string()));
        }
        Ok(self.replace_name(name.to_string()))
    }

    /// Replace, add or remove the final suffix.
    ///
    /// ```
    /// use spimio_vfs::PurePath;
    ///
    /// assert_eq!(PurePath::new("a/b.h5").with_suffix(".json").unwrap(), PurePath::new("a/b.json"));
    /// assert_eq!(PurePath::new("a/b").with_suffix(".h5").unwrap(), PurePath::new("a/b.h5"));
    /// assert_eq!(PurePath::new("a/b.h5").with_suffix("").unwrap(), PurePath::new("a/b"));
    /// assert!(PurePath::new("a/b").with_suffix("h5").is_err());
    /// ```
    pub fn with_suffix(&self, suffix: &str) -> Result<PurePath, PathError> {
        if suffix.contains(SEP) || suffix == "." || (!suffix.is_empty() && !suffix.starts_with('.'))
        {
            return Err(PathError::InvalidSuffix(suffix.to_string()));
        }
        let name = self.name();
        if name.is_empty() {
            return Err(PathError::EmptyName(self.to_string()));
        }
        let stem = &name[..name.len() - self.suffix().len()];
        Ok(self.replace_name(format!("{stem}{suffix}")))
    }

    fn replace_name(&self, name: String) -> PurePath {
        let mut segments = self.segments.clone();
        segments.pop();
        segments.push(name);
        PurePath {
            drive: self.drive.clone(),
            root: self.root.clone(),
            segments,
        }
    }

    /// The part of this path below `other`.
    ///
    /// Drive and root count as parts: a rooted path is never relative to
    /// a relative one. POSIX paths fold case by identity.
    ///
    /// ```
    /// use spimio_vfs::PurePath;
    ///
    /// let p = PurePath::new("/sub-01/ses-1/a.h5");
    /// assert_eq!(p.relative_to(&PurePath::new("/sub-01")).unwrap(), PurePath::new("ses-1/a.h5"));
    /// assert!(p.relative_to(&PurePath::new("sub-01")).is_err());
    /// ```
    pub fn relative_to(&self, other: &PurePath) -> Result<PurePath, PathError> {
        let same_anchor = self.drive == other.drive && self.root == other.root;
        if !same_anchor || !self.segments.starts_with(&other.segments) {
            return Err(PathError::NotRelative {
                path: self.to_string(),
                other: other.to_string(),
            });
        }
        Ok(PurePath::from_segments(&self.segments[other.segments.len()..]))
    }

    /// Whether `relative_to(other)` would succeed. `p.is_relative_to(p)` holds.
    pub fn is_relative_to(&self, other: &PurePath) -> bool {
        self.relative_to(other).is_ok()
    }

    /// Strictly below `other`.
    pub fn is_descendant_of(&self, other: &PurePath) -> bool {
        self.relative_to(other)
            .map(|rel| !rel.segments.is_empty())
            .unwrap_or(false)
    }

    /// Strictly above `other`.
    pub fn is_ancestor_of(&self, other: &PurePath) -> bool {
        other.is_descendant_of(self)
    }
}

impl fmt::Display for PurePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let anchor = format!("{}{}", self.drive, self.root);
        if anchor.is_empty() && self.segments.is_empty() {
            return f.write_str(".");
        }
        write!(f, "{anchor}{}", self.segments.join("/"))
    }
}

impl FromStr for PurePath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(PurePath::new(s))
    }
}

impl From<&str> for PurePath {
    fn from(s: &str) -> Self {
        PurePath::new(s)
    }
}
