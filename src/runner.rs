//! Background thread that drives an [`ArpEngine`] in real time.

use crossbeam_channel::{Receiver, RecvTimeoutError, Sender};

use arpeggio_core::compat::{Arc, AtomicBool, Ordering};

use crate::{ArpEngine, Result};

/// Commands sent to the runner thread.
pub(crate) enum RunnerCommand {
    /// Deadlines changed; recompute the wait.
    Wake,
    Shutdown,
}

/// Owns the runner thread. Dropping the handle stops the thread and waits
/// for it to finish.
pub struct RunnerHandle {
    engine: ArpEngine,
    cmd_tx: Sender<RunnerCommand>,
    running: Arc<AtomicBool>,
    thread: Option<std::thread::JoinHandle<()>>,
}

impl RunnerHandle {
    pub(crate) fn spawn(engine: ArpEngine) -> Result<Self> {
        let (cmd_tx, cmd_rx) = crossbeam_channel::bounded::<RunnerCommand>(16);
        let running = Arc::new(AtomicBool::new(true));
        let running_clone = running.clone();
        let thread_engine = engine.clone();

        let thread = std::thread::Builder::new()
            .name("arp-runner".into())
            .spawn(move || {
                run_loop(&thread_engine, &cmd_rx);
                running_clone.store(false, Ordering::Release);
            })?;

        Ok(Self {
            engine,
            cmd_tx,
            running,
            thread: Some(thread),
        })
    }

    pub(crate) fn command_sender(&self) -> Sender<RunnerCommand> {
        self.cmd_tx.clone()
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }

    /// Stop the runner thread and wait for it to finish. The engine keeps
    /// its state and can be polled manually or handed to a new runner.
    pub fn shutdown(&mut self) {
        let _ = self.cmd_tx.send(RunnerCommand::Shutdown);
        if let Some(handle) = self.thread.take() {
            let _ = handle.join();
            self.engine.clear_runner();
        }
    }
}

impl Drop for RunnerHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

fn run_loop(engine: &ArpEngine, cmd_rx: &Receiver<RunnerCommand>) {
    tracing::info!("Arpeggiator runner started");

    loop {
        engine.poll();

        // Idle timer: block until enable (or anything else) wakes us.
        let command = match engine.next_deadline() {
            Some(deadline) => {
                let wait = deadline.saturating_sub(engine.now());
                match cmd_rx.recv_timeout(wait) {
                    Ok(command) => Some(command),
                    Err(RecvTimeoutError::Timeout) => None,
                    Err(RecvTimeoutError::Disconnected) => break,
                }
            }
            None => match cmd_rx.recv() {
                Ok(command) => Some(command),
                Err(_) => break,
            },
        };

        if let Some(RunnerCommand::Shutdown) = command {
            break;
        }
    }

    tracing::info!("Arpeggiator runner stopped");
}
