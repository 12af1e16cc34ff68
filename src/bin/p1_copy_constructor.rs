// Pattern 1: Copy Construction
// Two lines are built, summed, and the sum is copied into fresh storage.
use std::process::ExitCode;

use owning_value::demo::{self, Scenario};

fn main() -> ExitCode {
    demo::main_with(&[Scenario::CopyConstructor])
}
