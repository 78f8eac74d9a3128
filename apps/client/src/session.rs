//! Timer-driven quiz session.
//!
//! [`QuizSession`] owns a [`QuizEngine`] and runs its deferred transitions on
//! the tokio runtime. Every state change bumps a revision counter that
//! observers can wait on.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use linguacard_core::{Card, QuizEngine, QuizMode, QuizSettings, QuizView, Result, Scheduled};
use tokio::sync::watch;
use tracing::debug;

struct QuizSessionInner {
    engine: Mutex<QuizEngine>,
    revision: watch::Sender<u64>,
    /// Timers spawned and not yet fired.
    pending: AtomicUsize,
}

/// Shared handle to a running quiz. Cheap to clone.
///
/// Methods that start a timed transition spawn a task, so they must be
/// called from within a tokio runtime.
#[derive(Clone)]
pub struct QuizSession {
    inner: Arc<QuizSessionInner>,
}

impl QuizSession {
    pub fn new(settings: QuizSettings) -> Self {
        Self::with_engine(QuizEngine::new(settings))
    }

    pub fn with_engine(engine: QuizEngine) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            inner: Arc::new(QuizSessionInner {
                engine: Mutex::new(engine),
                revision,
                pending: AtomicUsize::new(0),
            }),
        }
    }

    /// Start a new quiz. Timers from the previous quiz become no-ops.
    pub fn start(&self, cards: &[Card], mode: QuizMode) {
        self.engine().initialize(cards, mode);
        self.bump();
    }

    pub fn view(&self) -> QuizView {
        self.engine().view()
    }

    /// Read engine state under the lock.
    pub fn inspect<T>(&self, f: impl FnOnce(&QuizEngine) -> T) -> T {
        f(&self.engine())
    }

    pub fn is_complete(&self) -> bool {
        self.engine().is_complete()
    }

    pub fn submit_typed_answer(&self, text: &str) -> Result<()> {
        self.engine().submit_typed_answer(text)?;
        self.bump();
        Ok(())
    }

    pub fn select_option(&self, option: &str) -> Result<()> {
        self.engine().select_option(option)?;
        self.bump();
        Ok(())
    }

    /// Check the current answer; the next card follows after the reveal delay.
    pub fn check_answer(&self) -> Result<()> {
        let next = self.engine().check_answer()?;
        self.bump();
        self.schedule(next);
        Ok(())
    }

    pub fn select_match_item(&self, item_id: &str) -> Result<()> {
        let next = self.engine().select_match_item(item_id)?;
        self.bump();
        if let Some(next) = next {
            self.schedule(next);
        }
        Ok(())
    }

    /// Receiver notified on every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.inner.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.inner.revision.borrow()
    }

    /// Wait until every spawned timer has fired.
    pub async fn settle(&self) {
        let mut changes = self.subscribe();
        while self.inner.pending.load(Ordering::SeqCst) > 0 {
            if changes.changed().await.is_err() {
                break;
            }
        }
    }

    fn schedule(&self, scheduled: Scheduled) {
        let Scheduled { delay, event } = scheduled;
        self.inner.pending.fetch_add(1, Ordering::SeqCst);

        let session = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let applied = session.engine().apply(event);
            session.inner.pending.fetch_sub(1, Ordering::SeqCst);
            if !applied {
                debug!(?event, "timer fired for a finished transition");
            }
            session.bump();
        });
    }

    fn engine(&self) -> MutexGuard<'_, QuizEngine> {
        self.inner.engine.lock().expect("quiz engine lock")
    }

    fn bump(&self) {
        self.inner.revision.send_modify(|rev| *rev += 1);
    }
}
