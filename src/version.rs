use std::cmp::Ordering;
use std::fmt;

use crate::error::{ReleaseError, Result};

/// Index of a version segment that can be incremented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    Minor,
    Patch,
}

impl Segment {
    fn index(&self) -> usize {
        match self {
            Segment::Minor => 1,
            Segment::Patch => 2,
        }
    }
}

/// Semantic version as an ordered sequence of numeric segments.
///
/// Always carries at least three segments (missing trailing segments parse
/// as zero), and may carry more. Values are immutable; the derivation
/// methods return new versions.
#[derive(Debug, Clone)]
pub struct SemanticVersion {
    segments: Vec<u64>,
}

// Equality must agree with the zero-extending comparison: 1.2.3 == 1.2.3.0
impl PartialEq for SemanticVersion {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for SemanticVersion {}

impl SemanticVersion {
    /// Parse a version string, tolerating a leading `v`/`V` and fewer than
    /// three segments ("1.2" parses as 1.2.0).
    pub fn parse(s: &str) -> Result<Self> {
        let trimmed = s.trim();
        let body = trimmed
            .strip_prefix('v')
            .or_else(|| trimmed.strip_prefix('V'))
            .unwrap_or(trimmed);
        if body.is_empty() {
            return Err(ReleaseError::version(format!("empty version: '{}'", s)));
        }

        let mut segments = Vec::new();
        for part in body.split('.') {
            let n = part.parse::<u64>().map_err(|_| {
                ReleaseError::version(format!("invalid version segment '{}' in '{}'", part, s))
            })?;
            segments.push(n);
        }
        while segments.len() < 3 {
            segments.push(0);
        }
        Ok(SemanticVersion { segments })
    }

    pub fn segments(&self) -> &[u64] {
        &self.segments
    }

    pub fn major(&self) -> u64 {
        self.segments[0]
    }

    /// New version with the patch segment forced to the given value.
    pub fn with_patch(&self, patch: u64) -> Self {
        let mut segments = self.segments.clone();
        segments[2] = patch;
        SemanticVersion { segments }
    }

    /// New version with the given segment incremented by one. Lower
    /// segments are left as they are.
    pub fn incremented(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments[segment.index()] += 1;
        SemanticVersion { segments }
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.segments.iter().map(|s| s.to_string()).collect();
        write!(f, "{}", parts.join("."))
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i).copied().unwrap_or(0);
            let b = other.segments.get(i).copied().unwrap_or(0);
            match a.cmp(&b) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The half-open interval `[min, max)` of tags accepted as the current
/// release line for a given base version.
#[derive(Debug, Clone)]
pub struct VersionWindow {
    min: SemanticVersion,
    max: SemanticVersion,
}

impl VersionWindow {
    pub fn from_base(base: &SemanticVersion) -> Self {
        let min = base.with_patch(0);
        let max = min.incremented(Segment::Minor);
        VersionWindow { min, max }
    }

    pub fn min(&self) -> &SemanticVersion {
        &self.min
    }

    pub fn contains(&self, v: &SemanticVersion) -> bool {
        self.min <= *v && *v < self.max
    }
}

/// Outcome of version resolution: the last released version inside the
/// window (if any) and the version the next release should carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub current: Option<SemanticVersion>,
    pub next: SemanticVersion,
}

/// Resolve the current and next version from a base version and the tags
/// present in the repository.
///
/// The tag list is sorted ascending here; callers may pass tags in any
/// order. Tags outside the one-minor-wide window around the base version
/// are ignored, so release lines for other minors can coexist in the same
/// repository.
pub fn resolve(base: &SemanticVersion, tags: &[SemanticVersion]) -> Resolution {
    let window = VersionWindow::from_base(base);

    let mut sorted = tags.to_vec();
    sorted.sort();

    let mut current: Option<SemanticVersion> = None;
    for v in &sorted {
        log::debug!("comparing against: {}", v);
        if window.contains(v) {
            current = Some(v.clone());
        }
    }

    let mut next = match &current {
        Some(v) => v.incremented(Segment::Patch),
        None => window.min().clone(),
    };
    if next < *base {
        next = base.clone();
    }

    Resolution { current, next }
}

/// Parse a list of tag names into versions, dropping anything that does
/// not look like a semantic version.
pub fn parse_tag_versions(tags: &[String]) -> Vec<SemanticVersion> {
    let mut versions = Vec::new();
    for tag in tags {
        if tag.is_empty() {
            continue;
        }
        match SemanticVersion::parse(tag) {
            Ok(v) => {
                log::debug!("found version {}", v);
                versions.push(v);
            }
            Err(err) => {
                log::debug!("failure interpreting tag version on {}: {}", tag, err);
            }
        }
    }
    versions.sort();
    versions
}
