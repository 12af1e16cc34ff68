// Pattern 3: Copy and Move Assignment
use std::process::ExitCode;

use owning_value::demo::{self, Scenario};

fn main() -> ExitCode {
    demo::main_with(&[Scenario::MoveAssignment])
}
