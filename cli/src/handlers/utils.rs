use core::fmt;
use std::io::{self, BufRead, IsTerminal};

use tokio::sync::mpsc;

pub struct WriteAdapter<W>(pub W);

impl<W> fmt::Write for WriteAdapter<W>
where
    W: io::Write,
{
    fn write_str(&mut self, s: &str) -> Result<(), fmt::Error> {
        self.0.write_all(s.as_bytes()).map_err(|_| fmt::Error)?;
        self.0.flush().map_err(|_| fmt::Error)
    }

    fn write_fmt(&mut self, args: fmt::Arguments<'_>) -> Result<(), fmt::Error> {
        self.0.write_fmt(args).map_err(|_| fmt::Error)?;
        self.0.flush().map_err(|_| fmt::Error)
    }
}

pub trait StdIn: Send + Sync {
    fn is_terminal(&self) -> bool;
    fn lines(&self) -> impl Iterator<Item = io::Result<String>>;
}

impl StdIn for io::Stdin {
    fn is_terminal(&self) -> bool {
        self.lock().is_terminal()
    }
    fn lines(&self) -> impl Iterator<Item = io::Result<String>> {
        io::BufReader::new(self.lock()).lines()
    }
}

/// Forward the lines of `stdin` to the returned receiver, from a dedicated thread.
///
/// The channel closes once `stdin` hits EOF or fails to read, or the receiver is dropped.
pub fn spawn_line_reader<S>(stdin: S) -> mpsc::UnboundedReceiver<String>
where
    S: StdIn + 'static,
{
    let (line_tx, line_rx) = mpsc::unbounded_channel();

    // not a `spawn_blocking` task, the runtime would wait on a read that never returns at shutdown
    std::thread::spawn(move || {
        for line in stdin.lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("failed to read from stdin: {e}");
                    break;
                }
            }
        }
    });

    line_rx
}
