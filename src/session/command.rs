//! The session command language.
//!
//! Each command has exactly one text form, and `Display` and `FromStr`
//! round-trip through it. A line whose tokens are all cube moves (in either
//! case) is a move sequence. Anything else is a command name, optionally
//! followed by a parenthesised argument list:
//!
//! ```text
//! R U F'          eofb           solve(3)
//! x'              fr(axis="ud")  comment("2c2e")
//! check("eo", 1)  sort("time", true)  scramble("R' U' F ...")
//! ```

use crate::config::SortOrder;
use crate::core::algorithm::Algorithm;
use crate::core::moves::{Move, Turn};
use crate::core::orientation::Rotation;
use crate::core::step::{Axis, Step, StepKind};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Errors parsing a command line
#[derive(Clone, Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("No such command: {0}")]
    UnknownCommand(String),

    #[error("Bad arguments for '{command}': {reason}")]
    BadArguments { command: String, reason: String },
}

/// One user action on a session.
#[derive(Clone, Debug, PartialEq)]
pub enum Command {
    /// Moves for the side currently being worked on.
    Moves(Algorithm),
    /// Turn the displayed cube; ticks are quarter turns clockwise.
    Rotate(Rotation, u8),
    /// Start an EO or DR step on the given axis.
    Step(Step),
    /// Start HTR on the axis of the solved DR.
    Htr,
    /// Start floppy reduction, by default on the DR axis.
    Fr(Option<Axis>),
    Slice(Option<Axis>),
    Finish,
    Insertions,
    Niss,
    Solve(usize),
    Comment(String),
    Done,
    Obscure,
    Save,
    Reset,
    Back,
    /// Load the saved solution at a 1-based index and continue from it.
    Check(StepKind, usize),
    Forget(StepKind, usize),
    Sort(SortOrder, bool),
    /// Retype the solution of an insertions step, with the cursor as a byte
    /// offset into the text.
    Replace(String, usize),
    /// A given scramble, or a random one.
    Scramble(Option<String>),
    Undo,
}

impl Command {
    /// Whether undo can reverse this command.
    pub fn is_undoable(&self) -> bool {
        matches!(self, Command::Moves(_) | Command::Niss)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Moves(alg) => write!(f, "{}", alg),
            Command::Rotate(rotation, ticks) => {
                let suffix = Turn::from_ticks(*ticks).map(Turn::suffix).unwrap_or("");
                write!(f, "{}{}", rotation.letter(), suffix)
            }
            Command::Step(step) => write!(f, "{}", step),
            Command::Htr => write!(f, "htr"),
            Command::Fr(None) => write!(f, "fr"),
            Command::Fr(Some(axis)) => write!(f, "fr({})", quote(axis.as_str())),
            Command::Slice(None) => write!(f, "slice"),
            Command::Slice(Some(axis)) => write!(f, "slice({})", quote(axis.as_str())),
            Command::Finish => write!(f, "finish"),
            Command::Insertions => write!(f, "insertions"),
            Command::Niss => write!(f, "niss"),
            Command::Solve(n) => write!(f, "solve({})", n),
            Command::Comment(text) => write!(f, "comment({})", quote(text)),
            Command::Done => write!(f, "done"),
            Command::Obscure => write!(f, "obscure"),
            Command::Save => write!(f, "save"),
            Command::Reset => write!(f, "reset"),
            Command::Back => write!(f, "back"),
            Command::Check(kind, index) => write!(f, "check({}, {})", quote(kind.as_str()), index),
            Command::Forget(kind, index) => {
                write!(f, "forget({}, {})", quote(kind.as_str()), index)
            }
            Command::Sort(order, grouped) => {
                write!(f, "sort({}, {})", quote(&order.to_string()), grouped)
            }
            Command::Replace(text, cursor) => write!(f, "replace({}, {})", quote(text), cursor),
            Command::Scramble(None) => write!(f, "scramble"),
            Command::Scramble(Some(scramble)) => write!(f, "scramble({})", quote(scramble)),
            Command::Undo => write!(f, "undo"),
        }
    }
}

fn quote(text: &str) -> String {
    format!("\"{}\"", text.replace('\\', "\\\\").replace('"', "\\\""))
}

#[derive(Clone, Debug, PartialEq)]
enum Arg {
    Text(String),
    Number(usize),
    Flag(bool),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        if text.is_empty() {
            return Err(CommandError::Empty);
        }
        if let Some(alg) = parse_moves(text) {
            return Ok(Command::Moves(alg));
        }

        let (name, args) = match text.find('(') {
            Some(open) => {
                let name = text[..open].trim();
                let inner = text[open + 1..]
                    .strip_suffix(')')
                    .ok_or_else(|| bad(name, "missing ')'"))?;
                (name, parse_args(inner).map_err(|reason| bad(name, &reason))?)
            }
            None => (text, Vec::new()),
        };

        if let Some(rotation) = parse_rotation(name) {
            return no_args(name, &args, rotation);
        }

        match name {
            "htr" => no_args(name, &args, Command::Htr),
            "finish" => no_args(name, &args, Command::Finish),
            "insertions" => no_args(name, &args, Command::Insertions),
            "niss" => no_args(name, &args, Command::Niss),
            "done" => no_args(name, &args, Command::Done),
            "obscure" => no_args(name, &args, Command::Obscure),
            "save" => no_args(name, &args, Command::Save),
            "reset" => no_args(name, &args, Command::Reset),
            "back" => no_args(name, &args, Command::Back),
            "undo" => no_args(name, &args, Command::Undo),
            "fr" => Ok(Command::Fr(optional_axis(name, &args)?)),
            "slice" => Ok(Command::Slice(optional_axis(name, &args)?)),
            "solve" => match args.as_slice() {
                [] => Ok(Command::Solve(1)),
                [Arg::Number(n)] => Ok(Command::Solve(*n)),
                _ => Err(bad(name, "expected a number of solutions")),
            },
            "comment" => match args.as_slice() {
                [Arg::Text(text)] => Ok(Command::Comment(text.clone())),
                _ => Err(bad(name, "expected a quoted comment")),
            },
            "check" | "forget" => {
                let (kind, index) = match args.as_slice() {
                    [Arg::Text(kind), Arg::Number(index)] => (kind, *index),
                    _ => return Err(bad(name, "expected a step kind and an index")),
                };
                let kind: StepKind = kind
                    .to_ascii_lowercase()
                    .parse()
                    .map_err(|_| bad(name, &format!("bad step type '{}'", kind)))?;
                if name == "check" {
                    Ok(Command::Check(kind, index))
                } else {
                    Ok(Command::Forget(kind, index))
                }
            }
            "sort" => {
                let (order, grouped) = match args.as_slice() {
                    [Arg::Text(order)] => (order, false),
                    [Arg::Text(order), Arg::Flag(grouped)] => (order, *grouped),
                    _ => return Err(bad(name, "expected a sort order and an optional flag")),
                };
                let order: SortOrder = order.parse().map_err(|e| bad(name, &format!("{}", e)))?;
                Ok(Command::Sort(order, grouped))
            }
            "replace" => match args.as_slice() {
                [Arg::Text(text), Arg::Number(cursor)] => {
                    Ok(Command::Replace(text.clone(), *cursor))
                }
                _ => Err(bad(name, "expected quoted moves and a cursor position")),
            },
            "scramble" => match args.as_slice() {
                [] => Ok(Command::Scramble(None)),
                [Arg::Text(scramble)] => Ok(Command::Scramble(Some(scramble.clone()))),
                _ => Err(bad(name, "expected a quoted scramble")),
            },
            _ => match name.parse::<Step>() {
                Ok(step) if matches!(step.kind(), StepKind::Eo | StepKind::Dr) => {
                    no_args(name, &args, Command::Step(step))
                }
                _ => Err(CommandError::UnknownCommand(name.to_string())),
            },
        }
    }
}

fn bad(command: &str, reason: &str) -> CommandError {
    CommandError::BadArguments {
        command: command.to_string(),
        reason: reason.to_string(),
    }
}

fn no_args(name: &str, args: &[Arg], command: Command) -> Result<Command, CommandError> {
    if args.is_empty() {
        Ok(command)
    } else {
        Err(bad(name, "takes no arguments"))
    }
}

fn optional_axis(name: &str, args: &[Arg]) -> Result<Option<Axis>, CommandError> {
    match args {
        [] => Ok(None),
        [Arg::Text(axis)] => match axis.parse::<Axis>() {
            Ok(Axis::Any) | Err(_) => Err(bad(name, &format!("bad axis '{}'", axis))),
            Ok(axis) => Ok(Some(axis)),
        },
        _ => Err(bad(name, "expected an axis")),
    }
}

/// A line of plain moves, read case-insensitively.
fn parse_moves(text: &str) -> Option<Algorithm> {
    let moves = text
        .split_whitespace()
        .map(|token| token.to_ascii_uppercase().parse::<Move>().ok())
        .collect::<Option<Vec<Move>>>()?;
    Some(Algorithm::from_moves(moves, Vec::new()))
}

fn parse_rotation(name: &str) -> Option<Command> {
    let mut chars = name.chars();
    let rotation = Rotation::from_char(chars.next()?)?;
    let ticks = match chars.as_str() {
        "" => 1,
        "2" => 2,
        "'" => 3,
        _ => return None,
    };
    Some(Command::Rotate(rotation, ticks))
}

/// Split a comma separated argument list. A leading `name=` is accepted
/// and ignored, so `fr(axis="ud")` and `fr("ud")` are the same.
fn parse_args(inner: &str) -> Result<Vec<Arg>, String> {
    let mut args = Vec::new();
    let mut rest = inner.trim();
    while !rest.is_empty() {
        rest = skip_keyword(rest);
        let (arg, after) = match rest.strip_prefix('"') {
            Some(quoted) => parse_quoted(quoted)?,
            None => {
                let end = rest.find(',').unwrap_or(rest.len());
                (parse_bare(rest[..end].trim())?, &rest[end..])
            }
        };
        args.push(arg);

        rest = after.trim_start();
        if let Some(after) = rest.strip_prefix(',') {
            rest = after.trim_start();
            if rest.is_empty() {
                return Err("trailing comma".to_string());
            }
        } else if !rest.is_empty() {
            return Err(format!("unexpected '{}'", rest));
        }
    }
    Ok(args)
}

fn skip_keyword(text: &str) -> &str {
    let end = text
        .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
        .unwrap_or(text.len());
    if end == 0 {
        return text;
    }
    match text[end..].trim_start().strip_prefix('=') {
        Some(value) => value.trim_start(),
        None => text,
    }
}

fn parse_quoted(text: &str) -> Result<(Arg, &str), String> {
    let mut value = String::new();
    let mut escaped = false;
    for (i, c) in text.char_indices() {
        if escaped {
            value.push(c);
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return Ok((Arg::Text(value), &text[i + 1..]));
        } else {
            value.push(c);
        }
    }
    Err("unterminated string".to_string())
}

fn parse_bare(token: &str) -> Result<Arg, String> {
    if token.is_empty() {
        return Err("empty argument".to_string());
    }
    match token {
        "true" | "True" => Ok(Arg::Flag(true)),
        "false" | "False" => Ok(Arg::Flag(false)),
        _ => Ok(token
            .parse::<usize>()
            .map(Arg::Number)
            .unwrap_or_else(|_| Arg::Text(token.to_string()))),
    }
}
