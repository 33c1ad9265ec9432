use orbit::{Error, ErrorCategory};

const INTERNAL_SUMMARY: &str = "Something went wrong inside orbit.";

/// Plain-text rendering for the default (non-JSON) output mode.
pub trait HumanOutput {
    fn render_human(&self) -> String;
}

/// Title, message and hint. Code and details only in debug mode; internal
/// errors keep their raw detail out of the default output.
fn render_error(err: &Error, debug: bool) -> String {
    let mut out = format!("\nError: {}\n", err.title());
    if err.category() == ErrorCategory::Internal && !debug {
        out.push_str(&format!("  {}\n", INTERNAL_SUMMARY));
    } else {
        out.push_str(&format!("  {}\n", err.message()));
    }
    if let Some(hint) = err.hint() {
        out.push_str(&format!("  Hint: {}\n", hint));
    }
    if debug {
        out.push_str(&format!("  Code: {}\n", err.code()));
        if let Ok(details) = serde_json::to_string_pretty(&err.details()) {
            out.push_str(&format!("  Details: {}\n", details));
        }
        out.push_str(&format!("  Debug: {:?}\n", err));
    }
    out
}

pub fn print_error(err: &Error, debug: bool) {
    eprint!("{}", render_error(err, debug));
}
