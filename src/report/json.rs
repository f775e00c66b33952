use crate::report::{EerSummary, ReportError};

pub fn render_summary_json(summary: &EerSummary) -> Result<String, ReportError> {
    let mut out = serde_json::to_string_pretty(summary)?;
    out.push('\n');
    Ok(out)
}
