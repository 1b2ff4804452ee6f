//! Severity module - vulnerability severities and count aggregation

/// Severity of a single vulnerability finding.
///
/// The set is closed; severities the scanning service may add later are
/// deliberately not represented. Text that does not map to a known
/// severity is ignored during aggregation rather than rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// High severity finding
    High,
    /// Medium severity finding
    Medium,
    /// Low severity finding
    Low,
}

impl Severity {
    /// Get the severity name in its canonical text form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::High => "HIGH",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        }
    }

    /// Parse a severity from text, case-insensitively.
    ///
    /// Returns `None` for unrecognized text; callers decide whether that
    /// is an error or (as in aggregation) something to skip.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "HIGH" => Some(Severity::High),
            "MEDIUM" => Some(Severity::Medium),
            "LOW" => Some(Severity::Low),
            _ => None,
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid severity: {}", s))
    }
}

/// Count-by-severity summary of a set of vulnerability findings.
///
/// Aggregation is commutative and associative: aggregating a full set of
/// findings at once gives the same result as merging aggregates of any
/// partition of it, in any order. This lets callers aggregate partial
/// fetches independently.
///
/// # Examples
///
/// ```
/// use stevedore_domain::{Severity, VulnerabilityAggregate};
///
/// let aggregate = VulnerabilityAggregate::aggregate([
///     Severity::High,
///     Severity::Low,
///     Severity::High,
/// ]);
/// assert_eq!(aggregate.high, 2);
/// assert_eq!(aggregate.medium, 0);
/// assert_eq!(aggregate.low, 1);
/// assert_eq!(aggregate.total(), 3);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct VulnerabilityAggregate {
    /// Number of high severity findings
    pub high: u64,
    /// Number of medium severity findings
    pub medium: u64,
    /// Number of low severity findings
    pub low: u64,
}

impl VulnerabilityAggregate {
    /// Create an aggregate from pre-counted buckets.
    pub const fn new(high: u64, medium: u64, low: u64) -> Self {
        Self { high, medium, low }
    }

    /// Count a sequence of severity-tagged findings into buckets.
    pub fn aggregate<I>(findings: I) -> Self
    where
        I: IntoIterator<Item = Severity>,
    {
        let mut counts = Self::default();
        for severity in findings {
            match severity {
                Severity::High => counts.high += 1,
                Severity::Medium => counts.medium += 1,
                Severity::Low => counts.low += 1,
            }
        }
        counts
    }

    /// Count a sequence of raw severity strings into buckets.
    ///
    /// Unrecognized severities do not increment any bucket.
    pub fn aggregate_texts<I, T>(findings: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Self::aggregate(findings.into_iter().filter_map(|s| Severity::parse(s.as_ref())))
    }

    /// Combine two partial aggregates.
    pub fn merge(self, other: Self) -> Self {
        Self {
            high: self.high + other.high,
            medium: self.medium + other.medium,
            low: self.low + other.low,
        }
    }

    /// Total findings across all buckets.
    pub fn total(&self) -> u64 {
        self.high + self.medium + self.low
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_parse_case_insensitive() {
        assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
        assert_eq!(Severity::parse("medium"), Some(Severity::Medium));
        assert_eq!(Severity::parse(" Low "), Some(Severity::Low));
        assert_eq!(Severity::parse("CRITICAL"), None);
        assert_eq!(Severity::parse(""), None);
    }

    #[test]
    fn test_aggregate_counts() {
        let aggregate = VulnerabilityAggregate::aggregate([
            Severity::High,
            Severity::Medium,
            Severity::Medium,
            Severity::Low,
        ]);
        assert_eq!(aggregate, VulnerabilityAggregate::new(1, 2, 1));
    }

    #[test]
    fn test_aggregate_empty() {
        let aggregate = VulnerabilityAggregate::aggregate([]);
        assert_eq!(aggregate.total(), 0);
    }

    #[test]
    fn test_aggregate_texts_skips_unrecognized() {
        let aggregate =
            VulnerabilityAggregate::aggregate_texts(["HIGH", "bogus", "low", "CRITICAL", "HIGH"]);
        assert_eq!(aggregate, VulnerabilityAggregate::new(2, 0, 1));
        assert_eq!(aggregate.total(), 3);
    }

    #[test]
    fn test_merge() {
        let left = VulnerabilityAggregate::new(1, 2, 3);
        let right = VulnerabilityAggregate::new(4, 0, 1);
        assert_eq!(left.merge(right), VulnerabilityAggregate::new(5, 2, 4));
    }
}
