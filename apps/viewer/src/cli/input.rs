//! Line commands read from the prompt.

use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Next,
    Previous,
    Shuffle,
    Flip,
    TogglePlay,
    /// Category filter; keeps the current search text.
    Filter(String),
    /// Search text; keeps the current category.
    Search(String),
    ClearFilter,
    SelectDeck(String),
    ListDecks,
    Reload,
    Swipe(f64),
    DismissTooltip,
    Help,
    Quit,
}

#[derive(Debug, Error, PartialEq)]
pub enum CommandError {
    #[error("unknown command: {0} (type 'help')")]
    Unknown(String),

    #[error("{0} needs an argument")]
    MissingArgument(&'static str),

    #[error("invalid swipe distance: {0}")]
    InvalidSwipe(String),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        let argument = |name: &'static str| {
            if rest.is_empty() {
                Err(CommandError::MissingArgument(name))
            } else {
                Ok(rest.to_string())
            }
        };

        match word.to_lowercase().as_str() {
            "" | "n" | "next" => Ok(Self::Next),
            "p" | "prev" | "previous" => Ok(Self::Previous),
            "s" | "shuffle" => Ok(Self::Shuffle),
            "f" | "flip" => Ok(Self::Flip),
            "play" | "pause" => Ok(Self::TogglePlay),
            "filter" => argument("filter").map(Self::Filter),
            // An empty search is allowed and clears the text.
            "search" => Ok(Self::Search(rest.to_string())),
            "clear" => Ok(Self::ClearFilter),
            "deck" => argument("deck").map(Self::SelectDeck),
            "decks" => Ok(Self::ListDecks),
            "reload" => Ok(Self::Reload),
            "swipe" => {
                let value = argument("swipe")?;
                value
                    .parse()
                    .map(Self::Swipe)
                    .map_err(|_| CommandError::InvalidSwipe(value))
            }
            "gotit" => Ok(Self::DismissTooltip),
            "h" | "help" | "?" => Ok(Self::Help),
            "q" | "quit" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

pub const HELP: &str = "\
Commands:
  n, next            next card (Enter also works)
  p, prev            previous card
  f, flip            show or hide the answer
  s, shuffle         shuffle the current view
  play               start or stop auto-play
  filter <category>  filter by category ('all' for every category)
  search <text>      search questions and answers
  clear              clear category and search
  decks              list decks
  deck <id>          switch deck
  reload             fetch the deck again
  swipe <dx>         horizontal swipe in pixels (negative = left)
  q, quit            exit";

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_navigation() {
        assert_eq!("".parse::<Command>(), Ok(Command::Next));
        assert_eq!(" N ".parse::<Command>(), Ok(Command::Next));
        assert_eq!("prev".parse::<Command>(), Ok(Command::Previous));
        assert_eq!("play".parse::<Command>(), Ok(Command::TogglePlay));
        assert_eq!("q".parse::<Command>(), Ok(Command::Quit));
    }

    #[test]
    fn parses_arguments() {
        assert_eq!(
            "filter Cloud Concepts".parse::<Command>(),
            Ok(Command::Filter("Cloud Concepts".to_string()))
        );
        assert_eq!("search  IaaS ".parse::<Command>(), Ok(Command::Search("IaaS".to_string())));
        assert_eq!("search".parse::<Command>(), Ok(Command::Search(String::new())));
        assert_eq!("deck az-900".parse::<Command>(), Ok(Command::SelectDeck("az-900".to_string())));
        assert_eq!("swipe -75".parse::<Command>(), Ok(Command::Swipe(-75.0)));
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(
            "deck".parse::<Command>(),
            Err(CommandError::MissingArgument("deck"))
        );
        assert_eq!(
            "swipe left".parse::<Command>(),
            Err(CommandError::InvalidSwipe("left".to_string()))
        );
        assert_eq!(
            "jump".parse::<Command>(),
            Err(CommandError::Unknown("jump".to_string()))
        );
    }
}
