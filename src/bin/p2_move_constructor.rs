// Pattern 2: Move Construction
// The sum is moved out of a temporary, which is left empty.
use std::process::ExitCode;

use owning_value::demo::{self, Scenario};

fn main() -> ExitCode {
    demo::main_with(&[Scenario::MoveConstructor])
}
