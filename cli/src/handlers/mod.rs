pub mod implementations;
pub mod printing;
pub mod utils;


use std::{str::FromStr, sync::Arc};

use anyhow::{anyhow, bail};
use clap::Subcommand;
use strum::{Display, EnumString};
use tokio::sync::broadcast;

use tunescout_catalog::{Catalog, MediaKind};
use tunescout_core::{config::Settings, haptic::HapticFeedbackManager, preferences::Preferences};

use crate::termination::Interrupted;

/// Everything a command needs from its surroundings.
pub struct Context<C: Catalog> {
    pub settings: Settings,
    pub catalog: Arc<C>,
    pub preferences: Preferences,
    pub haptics: Arc<dyn HapticFeedbackManager>,
    pub interrupt_rx: broadcast::Receiver<Interrupted>,
}

pub trait CommandHandler {
    type Output;

    async fn handle<C, S, W1, W2>(
        &self,
        ctx: Context<C>,
        stdin: S,
        stdout: &mut W1,
        stderr: &mut W2,
    ) -> Self::Output
    where
        C: Catalog,
        S: utils::StdIn + 'static,
        W1: std::fmt::Write + Send,
        W2: std::fmt::Write + Send;
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Search the catalog once and print the results
    Search {
        /// The search term
        term: String,
        /// The kind of media to search for (e.g. music, podcast, musicVideo), defaults to the configured media
        #[clap(long)]
        media: Option<MediaKind>,
        /// The maximum number of results, defaults to the configured limit
        #[clap(long)]
        limit: Option<u32>,
    },
    /// Start an interactive search session, reading queries from stdin
    ///
    /// Every line typed updates the query, and the catalog is searched once the query settles.
    /// Lines starting with ':' are commands, type ':help' to list them.
    Interactive {
        /// The query to search for as soon as the session starts
        #[clap(long, default_value = "")]
        initial_query: String,
    },
    /// Print the effective preferences
    Prefs,
}

/// A tab of the app's bottom bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Tab {
    Home,
    Search,
    Settings,
}

/// A line of input in an interactive session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// Anything that isn't a command is the new query.
    Query(String),
    Search,
    Clear,
    /// Select the result at this index.
    Open(usize),
    Tab(Tab),
    Haptics(bool),
    Help,
    Quit,
}

pub const INTERACTIVE_HELP: &str = "\
Type to update the query. Commands:
\t:search            search for the current query now
\t:clear             clear the query and the results
\t:open <n>          select the n-th result
\t:tab <tab>         switch to the home, search, or settings tab
\t:haptics <on|off>  enable or disable haptic feedback
\t:help              show this message
\t:quit              end the session
";

impl FromStr for Input {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let Some(command) = line.strip_prefix(':') else {
            return Ok(Self::Query(line.to_owned()));
        };

        let mut words = command.split_whitespace();
        let input = match words.next() {
            Some("search") => Self::Search,
            Some("clear") => Self::Clear,
            Some("open") => {
                let index = words.next().ok_or_else(|| anyhow!(":open needs an index"))?;
                Self::Open(index.parse()?)
            }
            Some("tab") => {
                let tab = words.next().ok_or_else(|| anyhow!(":tab needs a tab"))?;
                Self::Tab(tab.parse()?)
            }
            Some("haptics") => match words.next() {
                Some("on") => Self::Haptics(true),
                Some("off") => Self::Haptics(false),
                _ => bail!(":haptics needs 'on' or 'off'"),
            },
            Some("help") => Self::Help,
            Some("quit" | "q" | "exit") => Self::Quit,
            Some(other) => bail!("unknown command ':{other}'"),
            None => bail!("empty command"),
        };

        if let Some(extra) = words.next() {
            bail!("unexpected argument '{extra}'");
        }

        Ok(input)
    }
}
