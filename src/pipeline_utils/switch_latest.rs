use std::future::Future;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

/// Switch-to-latest bookkeeping through generation counters.
///
/// Every request started with [`SwitchLatest::spawn`] gets the next generation
/// number and runs on its own task. Its output is only handed out by
/// [`SwitchLatest::latest`] while that generation is still the newest one,
/// anything older is dropped. The superseded tasks keep running to completion,
/// only their results are ignored.
pub struct SwitchLatest<T> {
    generation: u64,
    awaiting: bool,
    tx: UnboundedSender<(u64, T)>,
    rx: UnboundedReceiver<(u64, T)>,
}

impl<T: Send + 'static> SwitchLatest<T> {
    pub fn new() -> Self {
        let (tx, rx) = unbounded_channel();
        SwitchLatest {
            generation: 0,
            awaiting: false,
            tx,
            rx,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// True while the newest generation has a request that hasn't answered yet.
    pub fn is_awaiting(&self) -> bool {
        self.awaiting
    }

    /// Starts `request` as the newest generation, superseding every earlier one.
    pub fn spawn<F>(&mut self, request: F) -> u64
    where
        F: Future<Output = T> + Send + 'static,
    {
        self.generation += 1;
        self.awaiting = true;
        let generation = self.generation;
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let output = request.await;
            // the receiver is gone once the pipeline stopped, nobody cares anymore
            let _ = tx.send((generation, output));
        });
        generation
    }

    /// Supersedes every earlier generation without starting a request.
    pub fn supersede(&mut self) -> u64 {
        self.generation += 1;
        self.awaiting = false;
        self.generation
    }

    /// Waits for the output of the newest generation. Cancel safe.
    pub async fn latest(&mut self) -> (u64, T) {
        loop {
            match self.rx.recv().await {
                Some((generation, output)) if generation == self.generation => {
                    self.awaiting = false;
                    return (generation, output);
                }
                Some((generation, _)) => {
                    debug!(
                        "Discarding stale response #{} (current #{})",
                        generation, self.generation
                    );
                }
                // self.tx keeps the channel open
                None => std::future::pending::<()>().await,
            }
        }
    }
}

impl<T: Send + 'static> Default for SwitchLatest<T> {
    fn default() -> Self {
        Self::new()
    }
}
