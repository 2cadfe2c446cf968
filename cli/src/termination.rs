#[cfg(unix)]
use tokio::signal::unix::{SignalKind, signal};
use tokio::sync::broadcast;

/// Why an interactive session ended early.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interrupted {
    OsSigInt,
    OsSigQuit,
    OsSigTerm,
    UserInt,
}

#[derive(Debug, Clone)]
pub struct Terminator {
    interrupt_tx: broadcast::Sender<Interrupted>,
}

impl Terminator {
    #[must_use]
    pub const fn new(interrupt_tx: broadcast::Sender<Interrupted>) -> Self {
        Self { interrupt_tx }
    }

    /// Send an interrupt signal to the session.
    ///
    /// # Errors
    ///
    /// Fails if the interrupt signal cannot be sent (e.g. the receiver has been dropped)
    pub fn terminate(&mut self, interrupted: Interrupted) -> anyhow::Result<()> {
        self.interrupt_tx.send(interrupted)?;

        Ok(())
    }
}

#[cfg(unix)]
async fn terminate_by_unix_signal(mut terminator: Terminator) -> anyhow::Result<()> {
    let mut interrupt_signal = signal(SignalKind::interrupt())?;
    let mut term_signal = signal(SignalKind::terminate())?;
    let mut quit_signal = signal(SignalKind::quit())?;

    let interrupted = tokio::select! {
        _ = interrupt_signal.recv() => Interrupted::OsSigInt,
        _ = term_signal.recv() => Interrupted::OsSigTerm,
        _ = quit_signal.recv() => Interrupted::OsSigQuit,
    };

    terminator.terminate(interrupted)
}

#[cfg(not(unix))]
async fn terminate_by_ctrl_c(mut terminator: Terminator) -> anyhow::Result<()> {
    tokio::signal::ctrl_c().await?;
    terminator.terminate(Interrupted::OsSigInt)
}

/// Create a broadcast channel for retrieving the session kill signal, and start listening for
/// OS signals.
///
/// Must be called from within a tokio runtime.
#[must_use]
pub fn create_termination() -> (Terminator, broadcast::Receiver<Interrupted>) {
    let (tx, rx) = broadcast::channel(1);
    let terminator = Terminator::new(tx);

    let listener = terminator.clone();
    tokio::spawn(async move {
        #[cfg(unix)]
        let result = terminate_by_unix_signal(listener).await;
        #[cfg(not(unix))]
        let result = terminate_by_ctrl_c(listener).await;

        if let Err(e) = result {
            log::error!("failed to listen for termination signals: {e}");
        }
    });

    (terminator, rx)
}
