use std::{fmt::Write, sync::Arc};

use tokio::sync::{broadcast, mpsc::UnboundedReceiver};

use tunescout_catalog::{Catalog, SearchRequest};
use tunescout_core::{
    haptic::{HapticFeedbackManager, HapticFeedbackType},
    navigation::{HapticNavigationEventListener, NavigationEventListener, Screen},
    preferences::{HAPTIC_FEEDBACK_ENABLED, Preferences},
};
use tunescout_search::{SearchEvent, SearchState, SearchStateProvider, SessionSettings};

use super::{Command, CommandHandler, Context, INTERACTIVE_HELP, Input, Tab, printing, utils};
use crate::termination::Interrupted;

impl CommandHandler for Command {
    type Output = anyhow::Result<()>;

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
        W1: Write + Send,
        W2: Write + Send,
    {
        let Context {
            settings,
            catalog,
            preferences,
            haptics,
            interrupt_rx,
        } = ctx;
        let session_settings = SessionSettings::from(&settings.search);

        match self {
            Self::Search { term, media, limit } => {
                let request = SearchRequest::new(term.as_str())
                    .media(media.unwrap_or(session_settings.media))
                    .limit(limit.unwrap_or(session_settings.limit));

                let response = catalog.search(request).await?;

                write!(
                    stdout,
                    "{}",
                    printing::result_list(
                        &format!("Found {} results for {term:?}", response.result_count),
                        &response.results
                    )?
                )?;
            }
            Self::Interactive { initial_query } => {
                if stdin.is_terminal() {
                    write!(stdout, "{INTERACTIVE_HELP}")?;
                }

                let (provider, state_rx) =
                    SearchStateProvider::start(initial_query.as_str(), catalog, session_settings);
                let line_rx = utils::spawn_line_reader(stdin);

                let session = InteractiveSession::new(provider, &preferences, haptics);
                let outcome = session
                    .main_loop(state_rx, line_rx, interrupt_rx, stdout, stderr)
                    .await?;

                match outcome {
                    Some(Interrupted::UserInt) => writeln!(stdout, "exited per user request")?,
                    Some(Interrupted::OsSigInt) => writeln!(stdout, "exited because of an os sig int")?,
                    Some(Interrupted::OsSigTerm) => {
                        writeln!(stdout, "exited because of an os sig term")?;
                    }
                    Some(Interrupted::OsSigQuit) => {
                        writeln!(stdout, "exited because of an os sig quit")?;
                    }
                    None => {}
                }
            }
            Self::Prefs => write!(stdout, "{}", printing::preferences(&preferences)?)?,
        }

        Ok(())
    }
}

/// A search session driven by lines of input.
pub struct InteractiveSession<'a, C: Catalog> {
    provider: SearchStateProvider<C>,
    preferences: &'a Preferences,
    haptics: Arc<dyn HapticFeedbackManager>,
    navigation: HapticNavigationEventListener,
}

impl<'a, C: Catalog> InteractiveSession<'a, C> {
    pub fn new(
        provider: SearchStateProvider<C>,
        preferences: &'a Preferences,
        haptics: Arc<dyn HapticFeedbackManager>,
    ) -> Self {
        haptics.set_enabled(preferences.get(&HAPTIC_FEEDBACK_ENABLED));
        let navigation = HapticNavigationEventListener::new(haptics.clone());

        Self {
            provider,
            preferences,
            haptics,
            navigation,
        }
    }

    /// Print every state the session publishes while feeding it the lines read from stdin.
    ///
    /// Runs until the user quits, the session is interrupted, or stdin closes and the last
    /// search has settled. Returns why the session was cut short, if it was.
    ///
    /// # Errors
    ///
    /// Fails if the output can't be written.
    pub async fn main_loop<W1: Write + Send, W2: Write + Send>(
        self,
        mut state_rx: UnboundedReceiver<SearchState>,
        mut line_rx: UnboundedReceiver<String>,
        mut interrupt_rx: broadcast::Receiver<Interrupted>,
        stdout: &mut W1,
        stderr: &mut W2,
    ) -> anyhow::Result<Option<Interrupted>> {
        let mut haptics_watch = self.preferences.observe(&HAPTIC_FEEDBACK_ENABLED);
        let mut stdin_closed = false;

        let outcome = loop {
            tokio::select! {
                biased;

                Ok(interrupted) = interrupt_rx.recv() => break Some(interrupted),
                Some(state) = state_rx.recv() => {
                    write!(stdout, "{}", printing::search_state(&state)?)?;
                    if stdin_closed && !self.provider.has_active_task() {
                        break None;
                    }
                }
                Some(enabled) = haptics_watch.changed() => {
                    self.haptics.set_enabled(enabled);
                    writeln!(stdout, "[haptics] {}", if enabled { "on" } else { "off" })?;
                }
                line = line_rx.recv(), if !stdin_closed => match line.map(|line| line.parse::<Input>()) {
                    Some(Ok(Input::Quit)) => break Some(Interrupted::UserInt),
                    Some(Ok(input)) => self.handle_input(input, stdout, stderr)?,
                    Some(Err(e)) => writeln!(stderr, "{e}")?,
                    None => {
                        log::debug!("stdin closed, finishing the session");
                        stdin_closed = true;
                        if !self.provider.has_active_task() {
                            break None;
                        }
                    }
                },
            }
        };

        self.provider.dispose();

        Ok(outcome)
    }

    fn handle_input<W1: Write, W2: Write>(
        &self,
        input: Input,
        stdout: &mut W1,
        stderr: &mut W2,
    ) -> anyhow::Result<()> {
        match input {
            Input::Query(query) => self.provider.handle_event(SearchEvent::UpdateQuery(query)),
            Input::Search => self.provider.handle_event(SearchEvent::Search),
            Input::Clear => self.provider.handle_event(SearchEvent::ClearQuery),
            Input::Open(index) => {
                let state = self.provider.state();
                let Some(result) = state.results().get(index) else {
                    writeln!(stderr, "no result at index {index}")?;
                    return Ok(());
                };

                self.haptics.perform_haptic(HapticFeedbackType::Selection);
                write!(stdout, "{}", printing::result_details(result)?)?;
                state
                    .event_sink()
                    .send(SearchEvent::ClickResult(result.clone()));
            }
            Input::Tab(tab) => {
                self.haptics.perform_haptic(HapticFeedbackType::TabClick);
                let screen = match tab {
                    Tab::Home => Screen::Home,
                    Tab::Search => Screen::Search {
                        initial_query: self.provider.state().query().to_owned(),
                    },
                    Tab::Settings => Screen::Settings,
                };
                self.navigation.go_to(&screen);
                writeln!(stdout, "[tab] {screen}")?;
            }
            Input::Haptics(enabled) => self.preferences.set(&HAPTIC_FEEDBACK_ENABLED, enabled),
            Input::Help => write!(stdout, "{INTERACTIVE_HELP}")?,
            Input::Quit => {}
        }

        Ok(())
    }
}
