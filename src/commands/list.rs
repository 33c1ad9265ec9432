use clap::Args;
use serde::Serialize;

use orbit::framework::{Framework, FrameworkCategory};
use orbit::utils::suggest;
use orbit::{log_status, FrameworkId, FrameworkRegistry};

use super::{CmdResult, GlobalArgs};
use crate::output::HumanOutput;

#[derive(Args, Debug, Default)]
pub struct ListArgs {
    /// Show details for one framework
    pub framework: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameworkSummary {
    pub id: FrameworkId,
    pub name: &'static str,
    pub description: &'static str,
    pub category: FrameworkCategory,
}

#[derive(Debug, Serialize)]
#[serde(tag = "view", rename_all = "camelCase")]
pub enum ListOutput {
    All { frameworks: Vec<FrameworkSummary> },
    Detail { framework: Framework },
}

impl HumanOutput for ListOutput {
    fn render_human(&self) -> String {
        match self {
            ListOutput::All { frameworks } => {
                let mut out = String::from("Available frameworks:\n");
                for fw in frameworks {
                    out.push_str(&format!("  {:<10} {} - {}\n", fw.id, fw.name, fw.description));
                }
                out.push_str("\nRun \"orbit list <framework>\" for details.");
                out
            }
            ListOutput::Detail { framework } => {
                let mut out = format!(
                    "{} ({})\n  {}\n  {}\n",
                    framework.name, framework.id, framework.description, framework.website
                );
                out.push_str(&format!(
                    "  Requires: {}\n\nStacks:\n",
                    framework.required_tools.join(", ")
                ));
                for (preset, stack) in &framework.stacks {
                    out.push_str(&format!("  {:<9} {}\n", preset.as_str(), stack.description));
                    if !stack.dependencies.is_empty() {
                        out.push_str(&format!(
                            "            deps: {}\n",
                            stack.dependencies.join(" ")
                        ));
                    }
                    if !stack.dev_dependencies.is_empty() {
                        out.push_str(&format!(
                            "            dev:  {}\n",
                            stack.dev_dependencies.join(" ")
                        ));
                    }
                }
                out.trim_end().to_string()
            }
        }
    }
}

pub fn run(args: ListArgs, _global: &GlobalArgs) -> CmdResult<ListOutput> {
    let registry = FrameworkRegistry::new();

    let Some(id) = args.framework else {
        let frameworks = registry
            .all()
            .map(|fw| FrameworkSummary {
                id: fw.id,
                name: fw.name,
                description: fw.description,
                category: fw.category,
            })
            .collect();
        return Ok((ListOutput::All { frameworks }, 0));
    };

    match registry.lookup(&id) {
        Ok(framework) => Ok((
            ListOutput::Detail {
                framework: framework.clone(),
            },
            0,
        )),
        Err(err) => {
            let ids: Vec<&str> = registry.ids().iter().map(|known| known.as_str()).collect();
            if let Some(hint) = suggest::did_you_mean(&id, &ids) {
                log_status!("list", "{}", hint);
            }
            Err(err)
        }
    }
}
