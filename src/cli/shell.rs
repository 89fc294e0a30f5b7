use std::io::{self, BufRead};

use rustyline::{
    completion::{Completer, Pair},
    error::ReadlineError,
    history::DefaultHistory,
    Context as ReadlineContext, Editor, Helper, Highlighter, Hinter, Validator,
};

use crate::cli::context::{CliError, CliMode, CommandResult, LoopControl, ShellContext};
use crate::cli::output;

const SCRIPT_ENV: &str = "DIME_TRACK_CLI_SCRIPT";

pub fn run_cli() -> Result<(), CliError> {
    let mode = if std::env::var_os(SCRIPT_ENV).is_some() {
        CliMode::Script
    } else {
        CliMode::Interactive
    };

    let mut context = ShellContext::new(mode)?;
    match mode {
        CliMode::Interactive => run_interactive(&mut context),
        CliMode::Script => run_script(&mut context),
    }
}

fn run_interactive(context: &mut ShellContext) -> Result<(), CliError> {
    let mut editor = Editor::<CommandCompleter, DefaultHistory>::new()?;
    editor.set_helper(Some(CommandCompleter::new(context.command_names())));

    output::info("Type `help` for a list of commands.");
    drive(context, |prompt| match editor.readline(prompt) {
        Ok(line) => {
            if !line.trim().is_empty() {
                editor.add_history_entry(line.trim()).ok();
            }
            Ok(Some(line))
        }
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => {
            output::info("Exiting shell.");
            Ok(None)
        }
        Err(err) => Err(err.into()),
    })
}

fn run_script(context: &mut ShellContext) -> Result<(), CliError> {
    let mut lines = io::stdin().lock().lines();
    drive(context, |_prompt| lines.next().transpose().map_err(CliError::from))
}

/// Feeds lines from `next_line` to the command table until it runs dry or a
/// command asks to exit. Command failures are reported and the loop goes on.
fn drive<F>(context: &mut ShellContext, mut next_line: F) -> Result<(), CliError>
where
    F: FnMut(&str) -> Result<Option<String>, CliError>,
{
    while context.running {
        let prompt = context.prompt();
        let Some(line) = next_line(&prompt)? else {
            break;
        };
        match handle_line(context, &line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => context.report_error(err),
        }
    }
    Ok(())
}

/// Tokenizes and dispatches one line. Blank lines and `#` comments are skipped.
pub(crate) fn handle_line(context: &mut ShellContext, line: &str) -> CommandResult {
    let tokens = match shell_words::split(line) {
        Ok(tokens) => tokens,
        Err(err) => {
            context.print_warning(&format!("Could not parse `{}`: {err}", line.trim()));
            return Ok(LoopControl::Continue);
        }
    };
    let Some((command, rest)) = tokens.split_first() else {
        return Ok(LoopControl::Continue);
    };
    if command.starts_with('#') {
        return Ok(LoopControl::Continue);
    }

    let args: Vec<&str> = rest.iter().map(String::as_str).collect();
    context.last_command = Some(line.trim().to_string());

    let outcome = context.dispatch(&command.to_lowercase(), &args)?;
    if outcome == LoopControl::Exit {
        context.running = false;
    }
    Ok(outcome)
}

/// Completes the command word; arguments are left alone.
#[derive(Helper, Hinter, Highlighter, Validator)]
struct CommandCompleter {
    commands: Vec<&'static str>,
}

impl CommandCompleter {
    fn new(mut commands: Vec<&'static str>) -> Self {
        commands.sort_unstable();
        commands.dedup();
        Self { commands }
    }

    fn matches(&self, prefix: &str) -> Vec<Pair> {
        let prefix = prefix.to_ascii_lowercase();
        self.commands
            .iter()
            .filter(|name| name.starts_with(&prefix))
            .map(|name| Pair {
                display: name.to_string(),
                replacement: format!("{name} "),
            })
            .collect()
    }
}

impl Completer for CommandCompleter {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &ReadlineContext<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let head = &line[..pos];
        let start = head.len() - head.trim_start().len();
        if head[start..].contains(char::is_whitespace) {
            return Ok((pos, Vec::new()));
        }
        Ok((start, self.matches(&head[start..])))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completes_only_the_command_word() {
        let completer = CommandCompleter::new(vec!["summary", "remove", "report", "summary"]);
        let names: Vec<_> = completer.matches("RE").into_iter().map(|p| p.display).collect();
        assert_eq!(names, vec!["remove", "report"]);
        assert!(completer.matches("x").is_empty());
    }

    #[test]
    fn quoted_arguments_stay_together() {
        let tokens = shell_words::split(r#"add-expense "Dinner out" 42 "Food & Dining""#).unwrap();
        assert_eq!(tokens, vec!["add-expense", "Dinner out", "42", "Food & Dining"]);
    }
}
