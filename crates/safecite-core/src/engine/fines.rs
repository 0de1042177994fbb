//! Penalty exposure estimate. Pure arithmetic over a fixed range table.

use std::fmt;
use std::str::FromStr;

/// OSHA violation classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ViolationType {
    #[default]
    Serious,
    Willful,
    Repeat,
    Other,
}

impl ViolationType {
    /// Parse leniently: unknown text falls back to [`ViolationType::Serious`].
    pub fn parse_or_default(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }

    /// Per-violation `(min, max)` penalty in dollars.
    pub fn base_range(self) -> (u64, u64) {
        match self {
            ViolationType::Serious => (1_000, 16_131),
            ViolationType::Willful => (10_000, 161_310),
            ViolationType::Repeat => (1_000, 161_310),
            ViolationType::Other => (0, 16_131),
        }
    }
}

impl FromStr for ViolationType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serious" => Ok(ViolationType::Serious),
            "willful" => Ok(ViolationType::Willful),
            "repeat" => Ok(ViolationType::Repeat),
            "other" => Ok(ViolationType::Other),
            other => Err(format!("unknown violation type: {other}")),
        }
    }
}

impl fmt::Display for ViolationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ViolationType::Serious => write!(f, "serious"),
            ViolationType::Willful => write!(f, "willful"),
            ViolationType::Repeat => write!(f, "repeat"),
            ViolationType::Other => write!(f, "other"),
        }
    }
}

/// Total exposure for a set of violations of one type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViolationEstimate {
    pub min: u64,
    pub max: u64,
    pub count: u64,
}

/// Multiply the per-type base range by the number of violations.
///
/// No rounding and no cap. An empty list is a valid 0/0 estimate.
pub fn estimate(violations: &[String], violation_type: ViolationType) -> ViolationEstimate {
    let count = violations.len() as u64;
    let (base_min, base_max) = violation_type.base_range();
    ViolationEstimate {
        min: base_min * count,
        max: base_max * count,
        count,
    }
}

/// Render an estimate for the agent.
pub fn format_estimate(
    violations: &[String],
    violation_type: ViolationType,
    est: &ViolationEstimate,
) -> String {
    let (base_min, base_max) = violation_type.base_range();
    let mut out = format!(
        "💰 Estimated OSHA penalty exposure ({violation_type})\n\
         • Violations: {}\n\
         • Per violation: ${} - ${}\n\
         • Total range: ${} - ${}",
        est.count,
        dollars(base_min),
        dollars(base_max),
        dollars(est.min),
        dollars(est.max),
    );
    for (i, v) in violations.iter().enumerate() {
        out.push_str(&format!("\n  {}. {}", i + 1, v.trim()));
    }
    out
}

/// Format a whole-dollar amount with thousands separators.
fn dollars(amount: u64) -> String {
    let digits = amount.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
