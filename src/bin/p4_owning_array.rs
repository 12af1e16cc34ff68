// Pattern 4: An Owning Array
// Subscripting, copies and moves of a heap-allocated run of f64.
use std::process::ExitCode;

use owning_value::demo::{self, Scenario};

fn main() -> ExitCode {
    demo::main_with(&[Scenario::OwningArray])
}
