//! Renders a regulation record into the user-facing verdict text.

use crate::data::Regulation;

/// Bullet text appended to "NOT COMPLIANT" and "PROHIBITED" verdicts.
pub const CORRECTIVE_ACTION: &str = "Corrective action: stop the affected work, correct the \
condition before resuming, and document the fix for inspection.";

/// Render a record as a cited verdict.
///
/// ```text
/// ⛔ NOT COMPLIANT: Section 1910.28(b)(1)
/// • Open edges 4 ft or more above a lower level need fall protection.
/// • Penalty: up to $16,131 per serious violation
/// • Corrective action: ...
/// ```
pub fn format_regulation(reg: &Regulation) -> String {
    let mut out = String::new();

    let icon = reg.icon.trim();
    if !icon.is_empty() {
        out.push_str(icon);
        out.push(' ');
    }
    out.push_str(&format!("{}: Section {}\n", reg.decision, reg.citation));
    out.push_str(&format!("• {}", reg.summary));

    if let Some(penalty) = &reg.penalty_range {
        out.push_str(&format!("\n• Penalty: {penalty}"));
    }
    if reg.verdict().requires_corrective_action() {
        out.push_str(&format!("\n• {CORRECTIVE_ACTION}"));
    }
    out
}
