use anyhow::{Context, bail};
use pottery_model::{Field, OperationId};

/// One console line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Empty,
    Ops,
    Fields,
    Set(Field, String),
    Unset(Field),
    Show,
    Needs(OperationId),
    Wait,
    Help,
    Quit,
    Trigger(OperationId),
}

pub const HELP: &str = "\
commands:
  ops                    list operations and what they need
  fields                 show every field value
  set <field> <value>    edit a field (the value may contain spaces)
  unset <field>          clear a field
  show                   print the result and error displays
  needs <operation>      required fields of an operation and who can fill them
  wait                   wait for in-flight requests
  help                   this text
  quit                   leave after in-flight requests finish
  <operation>            send an operation, e.g. `create-task`";

impl Command {
    pub fn parse(line: &str) -> anyhow::Result<Self> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((w, r)) => (w, r.trim()),
            None => (line, ""),
        };

        let cmd = match word {
            "" => Command::Empty,
            "ops" => Command::Ops,
            "fields" => Command::Fields,
            "show" => Command::Show,
            "wait" => Command::Wait,
            "help" | "?" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "set" => {
                let (field, value) = match rest.split_once(char::is_whitespace) {
                    Some((f, v)) => (f, v.trim()),
                    None => (rest, ""),
                };
                if field.is_empty() {
                    bail!("usage: set <field> <value>");
                }
                Command::Set(field.parse()?, value.to_string())
            }
            "unset" => Command::Unset(rest.parse().context("usage: unset <field>")?),
            "needs" => Command::Needs(rest.parse().context("usage: needs <operation>")?),
            other => Command::Trigger(
                other
                    .parse()
                    .with_context(|| format!("unknown command {other:?}, try `help`"))?,
            ),
        };

        if matches!(cmd, Command::Trigger(_)) && !rest.is_empty() {
            bail!("operations take no arguments; set fields first");
        }
        Ok(cmd)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords() {
        assert_eq!(Command::parse("").unwrap(), Command::Empty);
        assert_eq!(Command::parse("  ops ").unwrap(), Command::Ops);
        assert_eq!(Command::parse("exit").unwrap(), Command::Quit);
        assert_eq!(Command::parse("?").unwrap(), Command::Help);
    }

    #[test]
    fn set_keeps_spaces_in_value() {
        assert_eq!(
            Command::parse("set uploadFile /tmp/My Files/a.java").unwrap(),
            Command::Set(Field::UploadFile, "/tmp/My Files/a.java".into())
        );
    }

    #[test]
    fn set_without_value_blanks_the_field() {
        assert_eq!(
            Command::parse("set sha1").unwrap(),
            Command::Set(Field::Sha1, String::new())
        );
        assert!(Command::parse("set").is_err());
    }

    #[test]
    fn operations() {
        assert_eq!(
            Command::parse("tag-repo").unwrap(),
            Command::Trigger(OperationId::TagRepo)
        );
        assert_eq!(
            Command::parse("needs request-test").unwrap(),
            Command::Needs(OperationId::RequestTest)
        );
        assert!(Command::parse("tag-repo now").is_err());
    }

    #[test]
    fn unknown_words() {
        let err = Command::parse("frobnicate").unwrap_err();
        assert!(err.to_string().contains("frobnicate"));
        assert!(Command::parse("unset nothing").is_err());
    }
}
