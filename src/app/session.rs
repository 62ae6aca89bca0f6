use crate::core::engine::{GpaEngine, SetOutcome, NO_GRADE};
use crate::core::report::render_table;
use crate::utils::error::{GpaError, Result};
use std::io::{BufRead, Write};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Set { code: String, label: String },
    Clear { code: String },
    Show,
    Gpa,
    Grades,
    Help,
    Quit,
}

impl Command {
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_ascii_lowercase();
        let args: Vec<&str> = parts.collect();

        let command = match (verb.as_str(), args.as_slice()) {
            ("set", [code, label]) => Command::Set {
                code: code.to_string(),
                label: label.to_string(),
            },
            ("clear", [code]) => Command::Clear {
                code: code.to_string(),
            },
            ("show", []) => Command::Show,
            ("gpa", []) => Command::Gpa,
            ("grades", []) => Command::Grades,
            ("help", []) | ("?", []) => Command::Help,
            ("quit", []) | ("exit", []) => Command::Quit,
            _ => {
                return Err(GpaError::ParseError {
                    input: line.to_string(),
                    reason: "unknown command, type 'help' for usage".to_string(),
                })
            }
        };
        Ok(command)
    }
}

const HELP: &str = "\
Commands:
  set <CODE> <LABEL>   assign a grade
  clear <CODE>         remove a grade
  show                 print the grade sheet
  gpa                  print the current GPA
  grades               list the grade scale
  help                 show this message
  quit                 leave the session";

/// Line-oriented front end over one engine.
pub struct Session<'a> {
    engine: &'a mut GpaEngine,
    strict: bool,
}

impl<'a> Session<'a> {
    pub fn new(engine: &'a mut GpaEngine, strict: bool) -> Self {
        Self { engine, strict }
    }

    /// Runs until `quit` or end of input. Command errors are reported and
    /// the session keeps going; only I/O failures end it early.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, output: &mut W) -> Result<()> {
        writeln!(output, "Type 'help' for commands.")?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let command = match Command::parse(line) {
                Ok(command) => command,
                Err(e) => {
                    writeln!(output, "error: {}", e.user_friendly_message())?;
                    continue;
                }
            };

            if command == Command::Quit {
                break;
            }

            match self.execute(command) {
                Ok(reply) => writeln!(output, "{}", reply)?,
                Err(e) => {
                    tracing::debug!("Session command failed: {}", e);
                    writeln!(output, "error: {}", e.user_friendly_message())?;
                }
            }
            output.flush()?;
        }

        Ok(())
    }

    pub fn execute(&mut self, command: Command) -> Result<String> {
        match command {
            Command::Set { code, label } => self.apply(&code, &label),
            Command::Clear { code } => self.apply(&code, NO_GRADE),
            Command::Show => Ok(render_table(self.engine).trim_end().to_string()),
            Command::Gpa => {
                let summary = self.engine.summary();
                Ok(format!(
                    "GPA {} ({} of {} subjects graded)",
                    summary.gpa, summary.graded_subjects, summary.total_subjects
                ))
            }
            Command::Grades => Ok(self
                .engine
                .registry()
                .scale()
                .entries()
                .iter()
                .map(|entry| format!("{} - {} points", entry.label, entry.point))
                .collect::<Vec<_>>()
                .join("\n")),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    fn apply(&mut self, code: &str, label: &str) -> Result<String> {
        let outcome = if self.strict {
            self.engine.set_grade_strict(code, label)?
        } else {
            self.engine.set_grade(code, label)?
        };

        let gpa = self.engine.compute_gpa();
        Ok(match outcome {
            SetOutcome::Assigned { point } => {
                format!("{} = {} ({} points), GPA {}", code, label, point, gpa)
            }
            SetOutcome::Cleared => format!("{} cleared, GPA {}", code, gpa),
            SetOutcome::Ignored => format!("{} is not in this catalog, ignored", code),
        })
    }
}
