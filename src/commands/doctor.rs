use clap::Args;

use orbit::environment::{self, DoctorReport};
use orbit::tools::ToolDetector;
use orbit::{ErrorCategory, SystemRunner};

use super::{CmdResult, GlobalArgs};
use crate::output::HumanOutput;

#[derive(Args, Debug, Default)]
pub struct DoctorArgs {}

impl HumanOutput for DoctorReport {
    fn render_human(&self) -> String {
        let mut out = String::from("Environment check:\n");
        for tool in &self.tools {
            let mark = match (tool.installed, tool.required) {
                (true, _) => "ok",
                (false, true) => "MISSING",
                (false, false) => "-",
            };
            let version = tool.version.as_deref().unwrap_or("");
            let kind = if tool.required { "" } else { " (optional)" };
            out.push_str(&format!("  {:<8} {:<10} {}{}\n", mark, tool.name, version, kind));
        }
        if self.healthy {
            out.push_str("\nAll required tools are installed.");
        } else {
            out.push_str(&format!(
                "\nMissing required tools: {}",
                self.missing_required.join(", ")
            ));
        }
        out
    }
}

/// Exits with the environment category's code when a required tool is missing.
pub fn run(_args: DoctorArgs, _global: &GlobalArgs) -> CmdResult<DoctorReport> {
    let runner = SystemRunner;
    let report = environment::doctor(&ToolDetector::new(&runner));
    let exit_code = if report.healthy {
        0
    } else {
        ErrorCategory::Environment.exit_code()
    };
    Ok((report, exit_code))
}
