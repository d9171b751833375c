//! cil-tracker main entrypoint.

use cil_tracker::run;
use cil_tracker::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(&e);
        std::process::exit(1);
    }
}
