// Runs every walkthrough, or the ones named on the command line:
//   owning-value [--config demo.toml] [copy-constructor|move-constructor|move-assignment|owning-array ...]
use std::process::ExitCode;

use owning_value::demo::{self, Scenario};

fn main() -> ExitCode {
    demo::main_with(&Scenario::ALL)
}
