mod human;
mod response;

pub use human::{print_error, HumanOutput};
pub use response::print_json_result;

use serde::Serialize;

use crate::commands::{CmdResult, GlobalArgs};

/// Print a command's outcome in the selected mode and return the process exit code.
pub fn finish<T: Serialize + HumanOutput>(result: CmdResult<T>, global: &GlobalArgs) -> i32 {
    if global.json {
        let (json, exit_code) = response::map_cmd_result_to_json(result);
        if let Err(err) = print_json_result(json) {
            tracing::warn!(code = err.code(), "failed to write response: {}", err.message());
        }
        return exit_code;
    }

    match result {
        Ok((data, exit_code)) => {
            let rendered = data.render_human();
            if !rendered.is_empty() {
                println!("{}", rendered);
            }
            exit_code
        }
        Err(err) => {
            print_error(&err, global.settings.debug);
            err.exit_code()
        }
    }
}
