use std::cmp::Ordering;
use std::fmt;

/// A Maven version string together with the override semantics Maven applies
/// during dependency mediation.
///
/// Maven distinguishes "soft" requirements (a plain version, used as a
/// default that yields to anything more specific) from "hard" requirements
/// (a bracketed/parenthesized range or pinned form, which must be honored).
/// `Version` does not attempt full numeric magnitude comparison for
/// override purposes — mediation only cares about soft vs. hard — but it
/// does provide a total order (via [`MavenVersion`]) so resolution output
/// can be sorted deterministically.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Version {
    raw: String,
}

impl Version {
    pub fn new(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    pub fn empty() -> Self {
        Self { raw: String::new() }
    }

    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn is_empty(&self) -> bool {
        self.raw.is_empty()
    }

    pub fn is_snapshot(&self) -> bool {
        self.raw.ends_with("-SNAPSHOT") || self.raw.eq_ignore_ascii_case("LATEST")
    }

    /// A version is "hard" if it names a range or exact-pin form (`[1.0]`,
    /// `[1.0,2.0)`, `(,2.0]`, ...). An unresolved property token is always
    /// soft, since it carries no real requirement yet.
    pub fn is_hard(&self) -> bool {
        if self.raw.contains("${") {
            return false;
        }
        let trimmed = self.raw.trim();
        trimmed.starts_with('[') || trimmed.starts_with('(')
    }

    pub fn is_soft(&self) -> bool {
        !self.is_hard()
    }

    /// Returns true if `incoming` must replace the version currently
    /// installed (`self`) for the same coordinate: soft→hard replaces;
    /// anything else keeps the installed version.
    pub fn should_override(&self, incoming: &Version) -> bool {
        self.is_soft() && incoming.is_hard()
    }

    fn parsed(&self) -> MavenVersion {
        MavenVersion::parse(&self.raw)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.raw)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        self.parsed().cmp(&other.parsed())
    }
}

/// A parsed, comparable Maven version, used only to give [`Version`] a total
/// order for deterministic output sorting.
#[derive(Debug, Clone, Eq, PartialEq)]
struct MavenVersion {
    segments: Vec<Segment>,
}

#[derive(Debug, Clone, Eq, PartialEq)]
enum Segment {
    Numeric(u64),
    Qualifier(QualifierKind),
    Text(String),
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord)]
enum QualifierKind {
    Alpha,
    Beta,
    Milestone,
    Rc,
    Snapshot,
    Release,
    Sp,
}

impl MavenVersion {
    fn parse(raw: &str) -> Self {
        let cleaned = raw.trim().trim_start_matches(['[', '(']).trim_end_matches([']', ')']);
        let segments = cleaned
            .split(['.', '-'])
            .filter(|s| !s.is_empty())
            .map(Segment::classify)
            .collect();
        Self { segments }
    }
}

impl Segment {
    fn classify(token: &str) -> Segment {
        if let Ok(n) = token.parse::<u64>() {
            return Segment::Numeric(n);
        }
        let lower = token.to_ascii_lowercase();
        match lower.as_str() {
            "alpha" | "a" => Segment::Qualifier(QualifierKind::Alpha),
            "beta" | "b" => Segment::Qualifier(QualifierKind::Beta),
            "milestone" | "m" => Segment::Qualifier(QualifierKind::Milestone),
            "rc" | "cr" => Segment::Qualifier(QualifierKind::Rc),
            "snapshot" => Segment::Qualifier(QualifierKind::Snapshot),
            "" | "ga" | "final" | "release" => Segment::Qualifier(QualifierKind::Release),
            "sp" => Segment::Qualifier(QualifierKind::Sp),
            _ => Segment::Text(lower),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Segment::Qualifier(_) => 0,
            Segment::Text(_) => 1,
            Segment::Numeric(_) => 2,
        }
    }
}

impl Ord for MavenVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        let len = self.segments.len().max(other.segments.len());
        for i in 0..len {
            let a = self.segments.get(i);
            let b = other.segments.get(i);
            let ordering = match (a, b) {
                (Some(a), Some(b)) => compare_segments(a, b),
                (Some(a), None) => compare_segment_to_empty(a),
                (None, Some(b)) => compare_segment_to_empty(b).reverse(),
                (None, None) => Ordering::Equal,
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    }
}

impl PartialOrd for MavenVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn compare_segment_to_empty(segment: &Segment) -> Ordering {
    match segment {
        Segment::Numeric(n) if *n == 0 => Ordering::Equal,
        Segment::Qualifier(QualifierKind::Release) => Ordering::Equal,
        Segment::Qualifier(q) if *q < QualifierKind::Release => Ordering::Less,
        _ => Ordering::Greater,
    }
}

fn compare_segments(a: &Segment, b: &Segment) -> Ordering {
    if a.rank() != b.rank() {
        return a.rank().cmp(&b.rank());
    }
    match (a, b) {
        (Segment::Numeric(x), Segment::Numeric(y)) => x.cmp(y),
        (Segment::Qualifier(x), Segment::Qualifier(y)) => x.cmp(y),
        (Segment::Text(x), Segment::Text(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
