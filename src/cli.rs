use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use crate::action::{Action, ActionRequest};
use crate::config::{self, Config};
use crate::error::Result;
use crate::session::Session;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Read configuration from this file instead of ~/.b24timeman.conf
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    /// Start the workday
    Start,
    /// Take a break
    Pause,
    /// Continue after a break, or reopen a closed workday
    Continue,
    /// End the workday
    Close,
    /// Check that the portal is reachable
    Check,
}

impl Command {
    /// The remote action this command sends, if it sends one.
    fn action(self) -> Option<Action> {
        match self {
            Command::Start => Some(Action::Open),
            Command::Pause => Some(Action::Pause),
            Command::Continue => Some(Action::Reopen),
            Command::Close => Some(Action::Close),
            Command::Check => None,
        }
    }
}

pub async fn run(cli: Cli) -> Result<()> {
    // A bare invocation means the user wants to be told what exists.
    // help/--help/--version and unknown commands never get this far: clap
    // resolves them during parsing, before any config or network activity.
    let Some(command) = cli.command else {
        Cli::command().print_long_help()?;
        return Ok(());
    };

    let config_path = match cli.config {
        Some(path) => path,
        None => config::default_path()?,
    };

    let Some(config) = Config::load(&config_path).await? else {
        // Setup guidance, not a failure
        println!(
            "Please, create {} with your configuration",
            config_path.display()
        );
        println!();
        println!("{}", config::TEMPLATE);
        return Ok(());
    };

    let session = Session::new(&config)?;

    match command.action() {
        None => check(&session).await,
        Some(action) => {
            let sessid = session.login().await?;
            let request = ActionRequest::new(action, &sessid);
            session.send_action(&request).await?;
            info!(action = action.wire_name(), "workday action accepted");
            Ok(())
        }
    }
}

async fn check(session: &Session) -> Result<()> {
    if session.probe().await {
        println!("{}", "Bitrix24 seems to be alive".green());
    } else {
        println!("{}", "Sorry, its dead".red());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn every_command_token_maps_to_its_remote_action() {
        let cases = [
            ("start", Some(Action::Open)),
            ("pause", Some(Action::Pause)),
            ("continue", Some(Action::Reopen)),
            ("close", Some(Action::Close)),
            ("check", None),
        ];
        for (token, expected) in cases {
            let cli = Cli::try_parse_from(["b24timeman", token]).unwrap();
            assert_eq!(cli.command.unwrap().action(), expected, "token {token}");
        }
    }

    #[test]
    fn unknown_tokens_never_reach_dispatch() {
        let err = Cli::try_parse_from(["b24timeman", "frobnicate"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSubcommand);
    }

    #[test]
    fn help_is_resolved_during_parsing() {
        let err = Cli::try_parse_from(["b24timeman", "help"]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DisplayHelp);
    }

    #[test]
    fn bare_invocation_parses_to_no_command() {
        let cli = Cli::try_parse_from(["b24timeman"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn config_path_can_be_overridden() {
        let cli =
            Cli::try_parse_from(["b24timeman", "--config", "/tmp/alt.conf", "check"]).unwrap();
        assert_eq!(cli.config.unwrap(), PathBuf::from("/tmp/alt.conf"));
        assert_eq!(cli.command, Some(Command::Check));
    }

    #[test]
    fn verbosity_flag_accumulates() {
        let cli = Cli::try_parse_from(["b24timeman", "-vv", "start"]).unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.command, Some(Command::Start));
    }
}
