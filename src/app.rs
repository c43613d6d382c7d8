use crate::api::{HttpTimerApi, TimerApi};
use crate::config::ClientConfig;
use crate::controller::{TapOutcome, TimerController};
use crate::errors::{ClientError, CommandError};
use crate::focus::{ElementKind, TapTarget};
use crate::ui::TerminalView;
use crate::view::TimerView;
use std::str::FromStr;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{info, warn};

pub type TerminalController = TimerController<HttpTimerApi, TerminalView>;

const HELP: &str = concat!(
    "commands: start | pause | reset | tap [button|link|circles]",
    " | template <id> | progress | status | help | quit"
);

/// Composition root: the only place a controller is created.
pub fn build(config: &ClientConfig) -> Result<TerminalController, ClientError> {
    let api = HttpTimerApi::new(config.base_url.clone(), config.request_timeout)?;
    Ok(TimerController::new(
        api,
        TerminalView::stdout(),
        config.controller,
        config.template_id,
    ))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    Reset,
    Tap(TapTarget),
    Template(u32),
    Progress,
    Status,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(name) = words.next() else {
            return Err(CommandError::Empty);
        };

        match name.to_ascii_lowercase().as_str() {
            "start" | "s" => Ok(Self::Start),
            "pause" | "p" => Ok(Self::Pause),
            "reset" | "r" => Ok(Self::Reset),
            "tap" | "t" => {
                let ancestry = words
                    .map(|word| {
                        word.parse::<ElementKind>().map_err(|_| CommandError::BadArgument {
                            command: "tap",
                            expected: "button, link, circles or background",
                        })
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                if ancestry.is_empty() {
                    Ok(Self::Tap(TapTarget::background()))
                } else {
                    Ok(Self::Tap(TapTarget::new(ancestry)))
                }
            }
            "template" => words
                .next()
                .and_then(|id| id.parse::<u32>().ok())
                .filter(|id| *id > 0)
                .map(Self::Template)
                .ok_or(CommandError::BadArgument {
                    command: "template",
                    expected: "a positive template id",
                }),
            "progress" => Ok(Self::Progress),
            "status" => Ok(Self::Status),
            "help" | "?" => Ok(Self::Help),
            "quit" | "q" | "exit" => Ok(Self::Quit),
            other => Err(CommandError::Unknown(other.to_string())),
        }
    }
}

/// Runs one command. Returns `false` once the user asked to quit.
pub async fn dispatch<A, V>(controller: &TimerController<A, V>, command: Command) -> bool
where
    A: TimerApi,
    V: TimerView,
{
    match command {
        Command::Start => controller.start().await,
        Command::Pause => controller.pause().await,
        Command::Reset => controller.reset().await,
        Command::Tap(target) => match controller.handle_tap(&target).await {
            TapOutcome::Ignored => info!("tap ignored"),
            TapOutcome::Counted { remaining } => info!(remaining, "focus circle removed"),
            TapOutcome::Abandoned => info!("session abandoned"),
        },
        Command::Template(id) => controller.set_template_id(id).await,
        Command::Progress => controller.refresh_progress().await,
        Command::Status => controller.refresh().await,
        Command::Help => println!("{HELP}"),
        Command::Quit => return false,
    }
    true
}

/// Reads commands line by line until `quit` or end of input.
pub async fn run<A, V, R>(controller: &TimerController<A, V>, input: R) -> std::io::Result<()>
where
    A: TimerApi,
    V: TimerView,
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }
        match line.parse::<Command>() {
            Ok(command) => {
                if !dispatch(controller, command).await {
                    break;
                }
            }
            Err(err) => warn!("{err}"),
        }
    }
    Ok(())
}
