//! Console command parsing

use std::fmt;
use std::str::FromStr;

use crate::table::RowAction;

/// Screens reachable with `open`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenKind {
    Dashboard,
    Courses,
    Blogs,
    News,
    Students,
}

impl FromStr for ScreenKind {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dashboard" => Ok(ScreenKind::Dashboard),
            "courses" | "course" => Ok(ScreenKind::Courses),
            "blogs" | "blog" => Ok(ScreenKind::Blogs),
            "news" => Ok(ScreenKind::News),
            "students" | "student" | "users" => Ok(ScreenKind::Students),
            _ => Err(CommandError::UnknownScreen(s.to_string())),
        }
    }
}

impl fmt::Display for ScreenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ScreenKind::Dashboard => "dashboard",
            ScreenKind::Courses => "courses",
            ScreenKind::Blogs => "blogs",
            ScreenKind::News => "news",
            ScreenKind::Students => "students",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Open(ScreenKind),
    Refresh,
    Next,
    Prev,
    Add,
    Row(RowAction, usize),
    Confirm,
    Cancel,
    Escape,
    Backdrop,
    ClickBody,
    Set { field: String, value: String },
    Submit,
    Toggle(usize),
    Show,
    Help,
    Quit,
}

/// Error types for command parsing
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command '{0}', type 'help' for a list")]
    Unknown(String),

    #[error("Unknown screen '{0}', expected dashboard, courses, blogs, news or students")]
    UnknownScreen(String),

    #[error("Usage: {0}")]
    Usage(&'static str),

    #[error("Row numbers start at 1, got '{0}'")]
    InvalidRow(String),
}

pub const HELP: &str = "\
Commands:
  dashboard                 show the dashboard
  open <screen>             courses, blogs, news or students
  refresh                   refetch the current screen
  next | prev               change page (blogs)
  add                       open the add form
  view N | edit N | delete N
                            act on row N of the current page
  confirm | cancel          answer a delete confirmation
  esc | backdrop | click-body
                            keyboard and pointer input for the open modal
  set <field> <value>       edit a form field
  submit                    save the open form
  toggle N                  flip a course's active status
  show                      redraw the screen
  help | quit
";

fn parse_row(arg: Option<&str>, usage: &'static str) -> Result<usize, CommandError> {
    let arg = arg.ok_or(CommandError::Usage(usage))?;
    match arg.parse::<usize>() {
        Ok(row) if row >= 1 => Ok(row),
        _ => Err(CommandError::InvalidRow(arg.to_string())),
    }
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };
        let arg = if rest.is_empty() { None } else { Some(rest) };

        let no_args = |command: Command, usage: &'static str| match arg {
            None => Ok(command),
            Some(_) => Err(CommandError::Usage(usage)),
        };

        match word.to_lowercase().as_str() {
            "" => Err(CommandError::Empty),
            "dashboard" => no_args(Command::Open(ScreenKind::Dashboard), "dashboard"),
            "open" => arg
                .ok_or(CommandError::Usage("open <screen>"))?
                .parse()
                .map(Command::Open),
            "refresh" => no_args(Command::Refresh, "refresh"),
            "next" => no_args(Command::Next, "next"),
            "prev" => no_args(Command::Prev, "prev"),
            "add" => no_args(Command::Add, "add"),
            "view" => Ok(Command::Row(RowAction::View, parse_row(arg, "view N")?)),
            "edit" => Ok(Command::Row(RowAction::Edit, parse_row(arg, "edit N")?)),
            "delete" => Ok(Command::Row(RowAction::Delete, parse_row(arg, "delete N")?)),
            "toggle" => Ok(Command::Toggle(parse_row(arg, "toggle N")?)),
            "confirm" => no_args(Command::Confirm, "confirm"),
            "cancel" => no_args(Command::Cancel, "cancel"),
            "esc" | "escape" => no_args(Command::Escape, "esc"),
            "backdrop" => no_args(Command::Backdrop, "backdrop"),
            "click-body" => no_args(Command::ClickBody, "click-body"),
            "set" => {
                let usage = CommandError::Usage("set <field> <value>");
                let rest = arg.ok_or(usage.clone())?;
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err(usage);
                }
                Ok(Command::Set {
                    field: field.to_string(),
                    value: value.to_string(),
                })
            }
            "submit" | "save" => no_args(Command::Submit, "submit"),
            "show" | "ls" => no_args(Command::Show, "show"),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_open() {
        assert_eq!("open blogs".parse::<Command>(), Ok(Command::Open(ScreenKind::Blogs)));
        assert_eq!("dashboard".parse::<Command>(), Ok(Command::Open(ScreenKind::Dashboard)));
        assert_eq!(
            "open library".parse::<Command>(),
            Err(CommandError::UnknownScreen("library".to_string()))
        );
        assert_eq!("open".parse::<Command>(), Err(CommandError::Usage("open <screen>")));
    }

    #[test]
    fn test_parse_rows_are_one_based() {
        assert_eq!("edit 3".parse::<Command>(), Ok(Command::Row(RowAction::Edit, 3)));
        assert_eq!("toggle 1".parse::<Command>(), Ok(Command::Toggle(1)));
        assert_eq!(
            "delete 0".parse::<Command>(),
            Err(CommandError::InvalidRow("0".to_string()))
        );
        assert_eq!("view".parse::<Command>(), Err(CommandError::Usage("view N")));
    }

    #[test]
    fn test_parse_set_keeps_spaces_in_value() {
        assert_eq!(
            "set title  How AI is Changing the World ".parse::<Command>(),
            Ok(Command::Set {
                field: "title".to_string(),
                value: "How AI is Changing the World".to_string()
            })
        );
        assert_eq!(
            "set sourceLink".parse::<Command>(),
            Ok(Command::Set {
                field: "sourceLink".to_string(),
                value: String::new()
            })
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "launch".parse::<Command>(),
            Err(CommandError::Unknown("launch".to_string()))
        );
        assert_eq!("refresh now".parse::<Command>(), Err(CommandError::Usage("refresh")));
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!("ESC".parse::<Command>(), Ok(Command::Escape));
        assert_eq!("Open News".parse::<Command>(), Ok(Command::Open(ScreenKind::News)));
    }
}
