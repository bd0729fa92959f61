//! rTimeBilling main entrypoint.

use rtimebilling::run;
use rtimebilling::ui::messages::error;

fn main() {
    if let Err(e) = run() {
        error(format!("Error: {e}"));
        std::process::exit(1);
    }
}
