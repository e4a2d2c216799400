//! Detached, best-effort identification history recording.
//!
//! Writes are queued to a background task rather than awaited by the caller:
//! the identification itself has already succeeded, so a failed write is
//! logged and swallowed, never surfaced to the user. Queueing instead of
//! dropping the future keeps failures observable in logs.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};
use uuid::Uuid;

use avis_core::{HistoryRepository, NewIdentification};

enum Command {
    Record {
        user_id: Uuid,
        identification: NewIdentification,
    },
    /// Ack once every previously queued write has been processed.
    Flush(oneshot::Sender<()>),
}

/// Handle to the background history writer task.
#[derive(Clone)]
pub struct HistoryWriter {
    tx: mpsc::UnboundedSender<Command>,
}

impl HistoryWriter {
    /// Spawn the writer task over the given repository.
    pub fn spawn(history: Arc<dyn HistoryRepository>) -> Self {
        let (tx, mut rx) = mpsc::unbounded_channel();

        tokio::spawn(async move {
            while let Some(command) = rx.recv().await {
                match command {
                    Command::Record {
                        user_id,
                        identification,
                    } => match history.append(user_id, identification.clone()).await {
                        Ok(id) => debug!(
                            subsystem = "flows",
                            component = "history_writer",
                            op = "record",
                            user_id = %user_id,
                            species = %identification.species,
                            record_id = %id,
                            "Identification recorded"
                        ),
                        Err(e) => warn!(
                            subsystem = "flows",
                            component = "history_writer",
                            op = "record",
                            user_id = %user_id,
                            species = %identification.species,
                            error = %e,
                            "History write failed; identification result unaffected"
                        ),
                    },
                    Command::Flush(ack) => {
                        let _ = ack.send(());
                    }
                }
            }
        });

        Self { tx }
    }

    /// Queue one identification for recording.
    ///
    /// Anonymous use is allowed for identification, just not history
    /// tracking: with no user, recording is skipped silently.
    pub fn record(&self, user_id: Option<Uuid>, identification: NewIdentification) {
        let Some(user_id) = user_id else {
            debug!(
                subsystem = "flows",
                component = "history_writer",
                species = %identification.species,
                "No authenticated user; skipping history record"
            );
            return;
        };

        if self
            .tx
            .send(Command::Record {
                user_id,
                identification,
            })
            .is_err()
        {
            warn!(
                subsystem = "flows",
                component = "history_writer",
                "History writer task stopped; dropping record"
            );
        }
    }

    /// Wait until all queued writes have been processed.
    ///
    /// Test hook; production callers never await history writes.
    pub async fn flush(&self) {
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.tx.send(Command::Flush(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }
}
