//! The walkthroughs behind the demo binaries.
//!
//! Each [`Scenario`] exercises the ownership operations in a fixed order,
//! narrates every step to a writer and returns a [`Report`] of the final
//! state of its bindings. The narration is for people; tests look at the
//! report.

use std::fmt;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::str::FromStr;

use colored::Colorize;
use thiserror::Error;
use tracing::info;

use crate::array::OwningArray;
use crate::config::{ConfigError, DemoConfig};
use crate::error::OwnError;
use crate::value::OwningValue;

#[derive(Error, Debug)]
pub enum DemoError {
    #[error(transparent)]
    Own(#[from] OwnError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to write narration: {0}")]
    Io(#[from] io::Error),

    #[error("unknown scenario '{0}' (expected one of: copy-constructor, move-constructor, move-assignment, owning-array)")]
    UnknownScenario(String),

    #[error("usage: {0}")]
    Usage(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scenario {
    CopyConstructor,
    MoveConstructor,
    MoveAssignment,
    OwningArray,
}

impl Scenario {
    pub const ALL: [Scenario; 4] = [
        Scenario::CopyConstructor,
        Scenario::MoveConstructor,
        Scenario::MoveAssignment,
        Scenario::OwningArray,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Scenario::CopyConstructor => "copy-constructor",
            Scenario::MoveConstructor => "move-constructor",
            Scenario::MoveAssignment => "move-assignment",
            Scenario::OwningArray => "owning-array",
        }
    }

    fn title(self) -> &'static str {
        match self {
            Scenario::CopyConstructor => "Copy construction",
            Scenario::MoveConstructor => "Move construction",
            Scenario::MoveAssignment => "Copy and move assignment",
            Scenario::OwningArray => "Owning array",
        }
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Scenario {
    type Err = DemoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Scenario::ALL
            .into_iter()
            .find(|scenario| scenario.name() == s)
            .ok_or_else(|| DemoError::UnknownScenario(s.to_string()))
    }
}

/// Final state of one binding.
#[derive(Debug, Clone, PartialEq)]
pub enum Snapshot {
    Empty,
    Scalar(i32),
    Array(Vec<f64>),
}

impl Snapshot {
    pub fn of_value(value: &OwningValue) -> Self {
        value.get().map_or(Snapshot::Empty, |v| Snapshot::Scalar(*v))
    }

    pub fn of_array(array: &OwningArray) -> Self {
        array
            .as_slice()
            .map_or(Snapshot::Empty, |elems| Snapshot::Array(elems.to_vec()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub scenario: Scenario,
    bindings: Vec<(&'static str, Snapshot)>,
}

impl Report {
    fn new(scenario: Scenario) -> Self {
        Self {
            scenario,
            bindings: Vec::new(),
        }
    }

    fn record(&mut self, name: &'static str, snapshot: Snapshot) {
        self.bindings.push((name, snapshot));
    }

    pub fn get(&self, name: &str) -> Option<&Snapshot> {
        self.bindings
            .iter()
            .find(|(binding, _)| *binding == name)
            .map(|(_, snapshot)| snapshot)
    }

    /// The scalar a binding ended with; `None` if it is missing, empty or an array.
    pub fn scalar(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            Snapshot::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    /// Whether `name` ended up owning nothing (moved out or destroyed).
    pub fn is_vacated(&self, name: &str) -> bool {
        matches!(self.get(name), Some(Snapshot::Empty))
    }

    pub fn bindings(&self) -> impl Iterator<Item = (&'static str, &Snapshot)> {
        self.bindings.iter().map(|(name, snapshot)| (*name, snapshot))
    }
}

fn addr<T>(handle: Option<*const T>) -> String {
    match handle {
        Some(ptr) => format!("{ptr:p}"),
        None => "null".to_string(),
    }
}

/// Console narration of a scenario.
pub struct Narrator<W> {
    out: W,
}

impl<W: Write> Narrator<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn heading(&mut self, title: &str) -> io::Result<()> {
        writeln!(self.out, "{}", format!("======== {title} ========").bold().cyan())
    }

    fn step(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "  {text}")
    }

    fn note(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "  {}", text.yellow())
    }

    fn constructed(&mut self, name: &str, value: &OwningValue) -> io::Result<()> {
        self.step(&format!(
            "{} {name} = {value} at {}",
            "construct".green(),
            addr(value.handle())
        ))
    }

    fn copied(&mut self, from: (&str, &OwningValue), to: (&str, &OwningValue)) -> io::Result<()> {
        self.step(&format!(
            "{} {} = {} from {} into {} ({})",
            "copy".green(),
            to.0,
            to.1,
            from.0,
            addr(to.1.handle()),
            addr(from.1.handle()),
        ))
    }

    fn moved(&mut self, from: (&str, &OwningValue), to: (&str, &OwningValue)) -> io::Result<()> {
        self.step(&format!(
            "{} {} = {} adopting {} from {}, which is now {}",
            "move".magenta(),
            to.0,
            to.1,
            addr(to.1.handle()),
            from.0,
            from.1,
        ))
    }
}

/// Runs one scenario, narrating into `narrator`. The config is validated
/// first, so a hand-built one with out-of-range fields is an error, not a panic.
pub fn run<W: Write>(
    scenario: Scenario,
    config: &DemoConfig,
    narrator: &mut Narrator<W>,
) -> Result<Report, DemoError> {
    config.validate()?;
    info!(scenario = scenario.name(), "running");
    narrator.heading(scenario.title())?;
    let report = match scenario {
        Scenario::CopyConstructor => copy_constructor(config, narrator)?,
        Scenario::MoveConstructor => move_constructor(config, narrator)?,
        Scenario::MoveAssignment => move_assignment(config, narrator)?,
        Scenario::OwningArray => owning_array(config, narrator)?,
    };
    writeln!(narrator.out)?;
    Ok(report)
}

pub fn run_all<W: Write>(
    config: &DemoConfig,
    narrator: &mut Narrator<W>,
) -> Result<Vec<Report>, DemoError> {
    config.validate()?;
    Scenario::ALL
        .into_iter()
        .map(|scenario| run(scenario, config, narrator))
        .collect()
}

fn copy_constructor<W: Write>(
    config: &DemoConfig,
    n: &mut Narrator<W>,
) -> Result<Report, DemoError> {
    let line_1 = OwningValue::new(config.scalar.first)?;
    n.constructed("line_1", &line_1)?;
    let line_2 = OwningValue::new(config.scalar.second)?;
    n.constructed("line_2", &line_2)?;

    n.heading("Trial 1: line_3 = line_1 + line_2")?;
    let line_3 = (&line_1 + &line_2)?;
    n.constructed("line_3", &line_3)?;

    n.heading("Trial 2: line_3_2 = copy of line_3")?;
    let line_3_2 = line_3.try_clone()?;
    n.copied(("line_3", &line_3), ("line_3_2", &line_3_2))?;

    let mut report = Report::new(Scenario::CopyConstructor);
    report.record("line_1", Snapshot::of_value(&line_1));
    report.record("line_2", Snapshot::of_value(&line_2));
    report.record("line_3", Snapshot::of_value(&line_3));
    report.record("line_3_2", Snapshot::of_value(&line_3_2));
    Ok(report)
}

fn move_constructor<W: Write>(
    config: &DemoConfig,
    n: &mut Narrator<W>,
) -> Result<Report, DemoError> {
    let line_1 = OwningValue::new(config.scalar.first)?;
    n.constructed("line_1", &line_1)?;
    let line_2 = OwningValue::new(config.scalar.second)?;
    n.constructed("line_2", &line_2)?;

    n.heading("Trial 1: line_3 = line_1 + line_2")?;
    let mut temporary = line_1.checked_add(&line_2)?;
    n.constructed("temporary", &temporary)?;
    let line_3 = temporary.take();
    n.moved(("temporary", &temporary), ("line_3", &line_3))?;

    n.heading("Trial 2: line_3_2 = copy of line_3")?;
    let mut line_3_2 = line_3.try_clone()?;
    n.copied(("line_3", &line_3), ("line_3_2", &line_3_2))?;

    n.heading("Trial 3: line_3_2 = line_2")?;
    let before = line_3_2.handle();
    line_3_2.copy_assign(&line_2)?;
    n.step(&format!(
        "{} line_3_2 = {} written into {}",
        "copy-assign".green(),
        line_3_2,
        addr(before)
    ))?;
    n.note(&format!(
        "line_3_2 stays at {} while line_2 stays at {}: the storage is not shared",
        addr(line_3_2.handle()),
        addr(line_2.handle())
    ))?;

    let mut report = Report::new(Scenario::MoveConstructor);
    report.record("line_1", Snapshot::of_value(&line_1));
    report.record("line_2", Snapshot::of_value(&line_2));
    report.record("temporary", Snapshot::of_value(&temporary));
    report.record("line_3", Snapshot::of_value(&line_3));
    report.record("line_3_2", Snapshot::of_value(&line_3_2));
    Ok(report)
}

fn move_assignment<W: Write>(
    config: &DemoConfig,
    n: &mut Narrator<W>,
) -> Result<Report, DemoError> {
    let line_1 = OwningValue::new(config.scalar.first)?;
    n.constructed("line_1", &line_1)?;
    let line_2 = OwningValue::new(config.scalar.second)?;
    n.constructed("line_2", &line_2)?;

    n.heading("Trial 1: line_3 = line_1 + line_2")?;
    let line_3 = line_1.add(&line_2)?;
    n.constructed("line_3", &line_3)?;

    n.heading("Trial 2: line_3_2 = copy of line_3")?;
    let mut line_3_2 = line_3.try_clone()?;
    n.copied(("line_3", &line_3), ("line_3_2", &line_3_2))?;

    n.heading("Trial 3: line_3_2 = line_2")?;
    line_3_2.copy_assign(&line_2)?;
    n.step(&format!(
        "{} line_3_2 = {} at {}",
        "copy-assign".green(),
        line_3_2,
        addr(line_3_2.handle())
    ))?;

    n.heading("Trial 4: line_4 = line_4 + line_3_2")?;
    let mut line_4 = OwningValue::new(config.scalar.fourth)?;
    n.constructed("line_4", &line_4)?;
    let mut temporary = (&line_4 + &line_3_2)?;
    n.constructed("temporary", &temporary)?;
    let released = addr(line_4.handle());
    line_4.move_assign(&mut temporary);
    n.step(&format!(
        "{} line_4 = {}, released {}, adopted {}",
        "move-assign".magenta(),
        line_4,
        released,
        addr(line_4.handle())
    ))?;

    let mut report = Report::new(Scenario::MoveAssignment);
    report.record("line_1", Snapshot::of_value(&line_1));
    report.record("line_2", Snapshot::of_value(&line_2));
    report.record("line_3", Snapshot::of_value(&line_3));
    report.record("line_3_2", Snapshot::of_value(&line_3_2));
    report.record("line_4", Snapshot::of_value(&line_4));
    report.record("temporary", Snapshot::of_value(&temporary));

    n.heading("Cleanup")?;
    temporary.destroy();
    n.step(&format!(
        "{} temporary: already empty, nothing freed",
        "destroy".red()
    ))?;
    let freed = addr(line_3_2.handle());
    line_3_2.destroy();
    n.step(&format!("{} line_3_2: freed {freed}", "destroy".red()))?;
    n.note("the remaining lines are freed when they go out of scope")?;

    Ok(report)
}

fn describe<T>(before: Option<*const T>, after: Option<*const T>) -> &'static str {
    if before == after {
        "overwritten in place"
    } else {
        "reallocated to the source length"
    }
}

fn owning_array<W: Write>(
    config: &DemoConfig,
    n: &mut Narrator<W>,
) -> Result<Report, DemoError> {
    let len = config.array.len;
    let mut vector = OwningArray::filled(len, config.array.fill)?;
    vector[0] = config.array.fill * 2.0;
    n.step(&format!(
        "{} vector of size {} at {}: {:?}",
        "construct".green(),
        vector.len(),
        addr(vector.handle()),
        vector
    ))?;

    n.heading("Copy")?;
    let copy = vector.try_clone()?;
    n.step(&format!(
        "{} copy of size {} at {}",
        "copy".green(),
        copy.len(),
        addr(copy.handle())
    ))?;

    n.heading("Move")?;
    let mut moved = vector.take();
    n.step(&format!(
        "{} moved adopts {}, vector is now {:?} with size {}",
        "move".magenta(),
        addr(moved.handle()),
        vector,
        vector.len()
    ))?;

    n.heading("Copy assignment")?;
    let mut single = OwningArray::filled(1, 0.0)?;
    let before = single.handle();
    let after = single.copy_assign(&copy)?.handle();
    n.step(&format!(
        "{} single = copy: {}",
        "copy-assign".green(),
        describe(before, after)
    ))?;
    let mut same = OwningArray::filled(len, 0.0)?;
    let before = same.handle();
    let after = same.copy_assign(&moved)?.handle();
    n.step(&format!(
        "{} same = moved: {}",
        "copy-assign".green(),
        describe(before, after)
    ))?;

    n.heading("Move assignment")?;
    vector.move_assign(&mut moved);
    n.step(&format!(
        "{} vector takes back {} from moved",
        "move-assign".magenta(),
        addr(vector.handle())
    ))?;
    moved.destroy();

    let mut report = Report::new(Scenario::OwningArray);
    report.record("vector", Snapshot::of_array(&vector));
    report.record("copy", Snapshot::of_array(&copy));
    report.record("moved", Snapshot::of_array(&moved));
    report.record("single", Snapshot::of_array(&single));
    report.record("same", Snapshot::of_array(&same));
    Ok(report)
}

/// Parsed command line of the demo binaries:
/// `[--config <path>] [scenario ...]`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CliArgs {
    pub config: Option<PathBuf>,
    pub scenarios: Vec<Scenario>,
}

impl CliArgs {
    pub fn parse<I>(args: I) -> Result<Self, DemoError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut parsed = CliArgs::default();
        let mut args = args.into_iter();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--config" | "-c" => {
                    let path = args
                        .next()
                        .ok_or_else(|| DemoError::Usage("--config needs a path".to_string()))?;
                    parsed.config = Some(PathBuf::from(path));
                }
                flag if flag.starts_with('-') => {
                    return Err(DemoError::Usage(format!("unknown flag '{flag}'")));
                }
                name => parsed.scenarios.push(name.parse()?),
            }
        }
        Ok(parsed)
    }
}

fn drive(args: CliArgs, defaults: &[Scenario]) -> Result<(), DemoError> {
    let config = DemoConfig::load(args.config.as_deref())?;
    crate::trace::init(&config.output);
    colored::control::set_override(config.output.color);

    let scenarios = if args.scenarios.is_empty() {
        defaults.to_vec()
    } else {
        args.scenarios
    };

    let stdout = io::stdout();
    let mut narrator = Narrator::new(stdout.lock());
    for scenario in scenarios {
        run(scenario, &config, &mut narrator)?;
    }
    Ok(())
}

/// Entry point shared by the binaries. Runs `defaults` unless scenarios are
/// named on the command line.
pub fn main_with(defaults: &[Scenario]) -> ExitCode {
    let result = CliArgs::parse(std::env::args().skip(1)).and_then(|args| drive(args, defaults));
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{} {err}", "error:".red().bold());
            ExitCode::FAILURE
        }
    }
}
