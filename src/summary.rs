//! Console summary of the most frequent errors

use syslog_insight_types::ErrorCount;

const TITLE: &str = "--- Top Errors Found ---";
const RULE: &str = "------------------------";

/// Render the ranked error list for the console
///
/// `table_empty` tells whether any error was counted at all, so that a
/// zero limit is not reported as "No errors found."
pub fn render(top_errors: &[ErrorCount], table_empty: bool) -> String {
    let body = if table_empty {
        "No errors found.\n".to_string()
    } else {
        top_errors
            .iter()
            .map(|entry| format!("Count: {:<4} | Error: {}\n", entry.count, entry.message))
            .collect()
    };

    format!("\n{TITLE}\n{body}{RULE}\n")
}
