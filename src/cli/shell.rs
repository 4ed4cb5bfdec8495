//! Interactive command loop.

use anyhow::Result;
use rand::Rng;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

use topo::render::{MarkerId, MarkerLayer};
use topo::{Command, Session};

use crate::print;

const HELP: &str = "\
Commands:
  find [name; name; ...]   geocode names (no names: one per line, end with an empty line)
  clear                    remove all places
  save <name>              save found places and print a share URL
  load <id|url>            load a saved list
  list                     show the current places
  label <n>                toggle the label of place n
  quiz                     start the quiz
  answer <n>               answer the current question
  next                     next question
  stop                     leave the quiz
  stats                    quiz score
  help                     this text
  quit                     exit";

#[derive(Debug, PartialEq)]
pub enum ShellCommand {
    Run(Command),
    /// `find` without names: read them from the following lines
    FindMultiline,
    List,
    Stats,
    Help,
    Quit,
}

/// Parse one input line. Blank lines yield `Ok(None)`.
pub fn parse_line(line: &str) -> Result<Option<ShellCommand>, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    let command = match word.to_lowercase().as_str() {
        "find" if rest.is_empty() => ShellCommand::FindMultiline,
        "find" => ShellCommand::Run(Command::Find(rest.replace(';', "\n"))),
        "clear" => ShellCommand::Run(Command::Clear),
        "save" => ShellCommand::Run(Command::Save {
            name: rest.to_string(),
        }),
        "load" if rest.contains("://") => ShellCommand::Run(Command::Open {
            url: rest.to_string(),
        }),
        "load" => ShellCommand::Run(Command::Load {
            id: rest.to_string(),
        }),
        "label" => ShellCommand::Run(Command::ToggleLabel(MarkerId(position(rest)?))),
        "quiz" => ShellCommand::Run(Command::EnterQuiz),
        "answer" | "a" => ShellCommand::Run(Command::Answer(position(rest)?)),
        "next" | "n" => ShellCommand::Run(Command::NextQuestion),
        "stop" => ShellCommand::Run(Command::ExitQuiz),
        "list" | "ls" => ShellCommand::List,
        "stats" => ShellCommand::Stats,
        "help" | "?" => ShellCommand::Help,
        "quit" | "exit" | "q" => ShellCommand::Quit,
        other => return Err(format!("unknown command '{}', try 'help'", other)),
    };
    Ok(Some(command))
}

/// 1-based number on screen to 0-based index.
fn position(arg: &str) -> Result<usize, String> {
    match arg.parse::<usize>() {
        Ok(n) if n > 0 => Ok(n - 1),
        _ => Err(format!("expected a number from 1, got '{}'", arg)),
    }
}

async fn read_names(lines: &mut Lines<BufReader<Stdin>>) -> Result<String> {
    let mut text = String::new();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            break;
        }
        text.push_str(&line);
        text.push('\n');
    }
    Ok(text)
}

pub async fn run<R: Rng>(session: &mut Session<MarkerLayer, R>) -> Result<()> {
    println!("{}", HELP);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let command = match parse_line(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(message) => {
                eprintln!("! {}", message);
                continue;
            }
        };

        let command = match command {
            ShellCommand::Run(command) => command,
            ShellCommand::FindMultiline => {
                println!("Enter place names, one per line, then an empty line:");
                Command::Find(read_names(&mut lines).await?)
            }
            ShellCommand::List => {
                print::places(session);
                continue;
            }
            ShellCommand::Stats => {
                print::stats(&session.quiz().stats());
                continue;
            }
            ShellCommand::Help => {
                println!("{}", HELP);
                continue;
            }
            ShellCommand::Quit => break,
        };

        match session.dispatch(command).await {
            Ok(outcome) => print::outcome(session, &outcome),
            // The session already turned the error into a status message
            Err(err) => eprintln!("! {}", err),
        }
    }
    Ok(())
}
