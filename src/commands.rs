use std::str::FromStr;

use thiserror::Error;

use crate::console::{CourseField, StudentField};

pub const HELP: &str = "\
Commands:
  list                      reload the student list
  search <query>            filter students on the backend
  clear                     clear the search and reload
  add                       open the add-student dialog
  edit <id>                 edit a student from the list
  delete <id>               delete a student
  view <id>                 open a student's detail view
  back                      return to the student list
  enroll                    open the enroll-course dialog
  edit-course <id>          edit a course of the selected student
  remove-course <id>        delete a course
  set <field> <value>       set a field of the open dialog
  save | cancel             save or close the open dialog
  reset-demo                restore the backend demo data
  show | help | quit";

/// A field of whichever dialog is open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Student(StudentField),
    Course(CourseField),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    List,
    Search(String),
    ClearSearch,
    AddStudent,
    EditStudent(i64),
    DeleteStudent(i64),
    ViewStudent(i64),
    Back,
    EnrollCourse,
    EditCourse(i64),
    RemoveCourse(i64),
    Set(FormField, String),
    Save,
    Cancel,
    ResetDemo,
    Show,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("empty command")]
    Empty,

    #[error("unknown command '{0}' (try 'help')")]
    Unknown(String),

    #[error("'{0}' needs an argument")]
    MissingArgument(&'static str),

    #[error("'{0}' is not a valid id")]
    InvalidId(String),

    #[error("unknown field '{0}'")]
    UnknownField(String),
}

fn parse_id(raw: &str) -> Result<i64, CommandError> {
    raw.parse::<i64>()
        .map_err(|_| CommandError::InvalidId(raw.to_string()))
}

fn parse_field(raw: &str) -> Result<FormField, CommandError> {
    if let Ok(field) = raw.parse::<StudentField>() {
        return Ok(FormField::Student(field));
    }
    if let Ok(field) = raw.parse::<CourseField>() {
        return Ok(FormField::Course(field));
    }
    Err(CommandError::UnknownField(raw.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        let id_arg = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                parse_id(rest)
            }
        };

        match verb {
            "" => Err(CommandError::Empty),
            "list" | "refresh" => Ok(Command::List),
            "search" => {
                if rest.is_empty() {
                    Err(CommandError::MissingArgument("search"))
                } else {
                    Ok(Command::Search(rest.to_string()))
                }
            }
            "clear" => Ok(Command::ClearSearch),
            "add" => Ok(Command::AddStudent),
            "edit" => id_arg("edit").map(Command::EditStudent),
            "delete" => id_arg("delete").map(Command::DeleteStudent),
            "view" => id_arg("view").map(Command::ViewStudent),
            "back" => Ok(Command::Back),
            "enroll" => Ok(Command::EnrollCourse),
            "edit-course" => id_arg("edit-course").map(Command::EditCourse),
            "remove-course" => id_arg("remove-course").map(Command::RemoveCourse),
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((field, value)) => (field, value.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    return Err(CommandError::MissingArgument("set"));
                }
                Ok(Command::Set(parse_field(field)?, value.to_string()))
            }
            "save" => Ok(Command::Save),
            "cancel" => Ok(Command::Cancel),
            "reset-demo" => Ok(Command::ResetDemo),
            "show" => Ok(Command::Show),
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
    fn parses_simple_verbs() {
        assert_eq!("list".parse::<Command>(), Ok(Command::List));
        assert_eq!("  back  ".parse::<Command>(), Ok(Command::Back));
        assert_eq!("save".parse::<Command>(), Ok(Command::Save));
        assert_eq!("exit".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn search_keeps_the_whole_query() {
        assert_eq!(
            "search  ann lee".parse::<Command>(),
            Ok(Command::Search("ann lee".to_string()))
        );
        assert_eq!(
            "search".parse::<Command>(),
            Err(CommandError::MissingArgument("search"))
        );
    }

    #[test]
    fn id_commands() {
        assert_eq!("edit 5".parse::<Command>(), Ok(Command::EditStudent(5)));
        assert_eq!("delete 7".parse::<Command>(), Ok(Command::DeleteStudent(7)));
        assert_eq!("view 2".parse::<Command>(), Ok(Command::ViewStudent(2)));
        assert_eq!("remove-course 12".parse::<Command>(), Ok(Command::RemoveCourse(12)));
        assert_eq!(
            "edit five".parse::<Command>(),
            Err(CommandError::InvalidId("five".to_string()))
        );
        assert_eq!(
            "delete".parse::<Command>(),
            Err(CommandError::MissingArgument("delete"))
        );
    }

    #[test]
    fn set_routes_to_the_right_form() {
        assert_eq!(
            "set city Mexico City".parse::<Command>(),
            Ok(Command::Set(
                FormField::Student(StudentField::City),
                "Mexico City".to_string()
            ))
        );
        assert_eq!(
            "set final_grade 88.5".parse::<Command>(),
            Ok(Command::Set(
                FormField::Course(CourseField::FinalGrade),
                "88.5".to_string()
            ))
        );
        assert_eq!(
            "set email".parse::<Command>(),
            Ok(Command::Set(
                FormField::Student(StudentField::Email),
                String::new()
            ))
        );
        assert_eq!(
            "set username bob".parse::<Command>(),
            Err(CommandError::UnknownField("username".to_string()))
        );
    }

    #[test]
    fn rejects_unknown_and_empty() {
        assert_eq!("".parse::<Command>(), Err(CommandError::Empty));
        assert_eq!(
            "frobnicate".parse::<Command>(),
            Err(CommandError::Unknown("frobnicate".to_string()))
        );
    }
}
