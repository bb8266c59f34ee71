//! Line-oriented control console
//!
//! Reads commands from stdin and drives the running keyer. Speed, radio,
//! baud and message changes are saved to the settings file straight away.

use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use cw_keyer::{ButtonEdge, Keyer};
use cw_radio::{RadioDriver, RadioModel};
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::settings::Settings;

const HELP: &str = "\
commands:
  send <text>          send text now
  message <n> <text>   store text in slot n
  select <n>           choose the slot a short press sends
  messages             list stored messages
  play                 send the selected message
  tune start|stop      hold or drop the tune carrier
  press | release      simulate the trigger button
  wpm <n>              set speed
  radio <model>        set radio model (next start)
  baud <n>             set baud rate (next start)
  freq                 read frequency and mode
  status               keyer status as JSON
  quit";

/// A console line that could not be understood
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),

    #[error("usage: {0}")]
    Usage(&'static str),

    #[error("invalid number '{0}'")]
    Number(String),

    #[error("unknown radio model '{0}'")]
    Model(String),
}

/// One console command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Send(String),
    StoreMessage { slot: usize, text: String },
    SelectMessage(usize),
    ListMessages,
    Play,
    TuneStart,
    TuneStop,
    Press,
    Release,
    Wpm(u8),
    Radio(RadioModel),
    Baud(u32),
    Frequency,
    Status,
    Help,
    Quit,
}

fn number<T: FromStr>(word: &str) -> Result<T, CommandError> {
    word.parse().map_err(|_| CommandError::Number(word.to_string()))
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "send" if !rest.is_empty() => Ok(Command::Send(rest.to_string())),
            "send" => Err(CommandError::Usage("send <text>")),
            "message" => {
                let (slot, text) = rest
                    .split_once(char::is_whitespace)
                    .ok_or(CommandError::Usage("message <n> <text>"))?;
                Ok(Command::StoreMessage {
                    slot: number(slot)?,
                    text: text.trim().to_string(),
                })
            }
            "select" if !rest.is_empty() => Ok(Command::SelectMessage(number(rest)?)),
            "select" => Err(CommandError::Usage("select <n>")),
            "messages" => Ok(Command::ListMessages),
            "play" => Ok(Command::Play),
            "tune" => match rest {
                "start" => Ok(Command::TuneStart),
                "stop" => Ok(Command::TuneStop),
                _ => Err(CommandError::Usage("tune start|stop")),
            },
            "press" => Ok(Command::Press),
            "release" => Ok(Command::Release),
            "wpm" if !rest.is_empty() => Ok(Command::Wpm(number(rest)?)),
            "wpm" => Err(CommandError::Usage("wpm <n>")),
            "radio" => RadioModel::from_name(&rest.to_ascii_uppercase())
                .map(Command::Radio)
                .ok_or_else(|| CommandError::Model(rest.to_string())),
            "baud" if !rest.is_empty() => Ok(Command::Baud(number(rest)?)),
            "baud" => Err(CommandError::Usage("baud <n>")),
            "freq" => Ok(Command::Frequency),
            "status" => Ok(Command::Status),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" => Ok(Command::Quit),
            _ => Err(CommandError::Unknown(word.to_string())),
        }
    }
}

/// The console state: a keyer and the settings it was started from
pub struct Console<R> {
    keyer: Keyer<R>,
    settings: Settings,
    settings_path: Option<PathBuf>,
}

impl<R: RadioDriver + 'static> Console<R> {
    /// Wrap a started keyer. Changes are saved to `settings_path` when set.
    pub fn new(keyer: Keyer<R>, settings: Settings, settings_path: Option<PathBuf>) -> Self {
        Self {
            keyer,
            settings,
            settings_path,
        }
    }

    #[cfg(test)]
    pub fn keyer(&self) -> &Keyer<R> {
        &self.keyer
    }

    #[cfg(test)]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    fn save(&self) -> anyhow::Result<()> {
        match &self.settings_path {
            Some(path) => self.settings.save_to(path),
            None => Ok(()),
        }
    }

    /// Run one command, returning the text to show
    pub async fn execute(&mut self, command: Command) -> anyhow::Result<String> {
        match command {
            Command::Send(text) => {
                self.keyer.enqueue_transmission(&text, true).await?;
                Ok(format!("queued {:?}", text))
            }
            Command::StoreMessage { slot, text } => {
                self.settings.set_message(slot, &text)?;
                if slot == self.settings.current_message {
                    self.keyer.set_current_message(&self.settings.messages[slot]);
                }
                self.save()?;
                Ok(format!("message {} = {:?}", slot, self.settings.messages[slot]))
            }
            Command::SelectMessage(slot) => {
                self.settings.select_message(slot)?;
                self.keyer.set_current_message(self.settings.current_message_text());
                self.save()?;
                Ok(format!("selected message {}", slot))
            }
            Command::ListMessages => Ok(self
                .settings
                .messages
                .iter()
                .enumerate()
                .map(|(i, text)| {
                    let marker = if i == self.settings.current_message { '*' } else { ' ' };
                    format!("{}{}: {}", marker, i, text)
                })
                .collect::<Vec<_>>()
                .join("\n")),
            Command::Play => {
                self.keyer.send_current_message().await?;
                Ok(format!("queued {:?}", self.keyer.current_message()))
            }
            Command::TuneStart => {
                let hz = self.keyer.tune_trigger_start().await?;
                Ok(format!("tuning on {} Hz", hz))
            }
            Command::TuneStop => {
                let snapshot = self.keyer.tune_trigger_stop().await?;
                Ok(format!("restored {} Hz", snapshot.frequency_hz))
            }
            Command::Press => Ok(edge_reply(self.keyer.button(ButtonEdge::Pressed))),
            Command::Release => Ok(edge_reply(self.keyer.button(ButtonEdge::Released))),
            Command::Wpm(wpm) => {
                let applied = self.keyer.set_wpm(wpm);
                self.settings.set_wpm(applied);
                self.save()?;
                Ok(format!("{} WPM", applied))
            }
            Command::Radio(model) => {
                self.settings.radio = model.name().to_string();
                self.save()?;
                Ok(format!("radio {} (takes effect on restart)", model))
            }
            Command::Baud(baud) => {
                self.settings.baud_rate = baud;
                self.save()?;
                Ok(format!("baud {} (takes effect on restart)", baud))
            }
            Command::Frequency => {
                let mut radio = self.keyer.radio().lock().await;
                let hz = radio.get_frequency().await?;
                let mode = radio.get_mode().await?;
                Ok(format!("{} Hz {}", hz, radio.mode_to_string(mode)))
            }
            Command::Status => serde_json::to_string(&self.keyer.status())
                .context("Failed to serialize status"),
            Command::Help => Ok(HELP.to_string()),
            Command::Quit => Ok(String::new()),
        }
    }

    /// Drop the tune carrier if one is up
    pub async fn shutdown(&self) {
        if self.keyer.is_tuning() {
            if let Err(e) = self.keyer.tune_trigger_stop().await {
                warn!("Tune stop on exit: {}", e);
            }
        }
        info!("Keyer shutting down");
    }
}

fn edge_reply(accepted: bool) -> String {
    if accepted {
        "ok".to_string()
    } else {
        "button busy, edge dropped".to_string()
    }
}

/// Read commands from stdin until `quit`, end of input or Ctrl-C
pub async fn run<R: RadioDriver + 'static>(mut console: Console<R>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("Type 'help' for commands");

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read console input")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else { break };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(Command::Quit) => break,
            Ok(command) => match console.execute(command).await {
                Ok(reply) => println!("{}", reply),
                Err(e) => println!("error: {:#}", e),
            },
            Err(e) => println!("error: {}", e),
        }
    }

    console.shutdown().await;
    Ok(())
}
