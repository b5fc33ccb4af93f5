//! Start/stop coordination
//!
//! `Idle -> Running -> Stopping -> Stopped`
//!
//! While idle the persisted history is restored. Running joins the poller
//! and the renderer on the current executor. Once both have returned the
//! strip is switched off and the history is written back.

use alloc::vec::Vec;
use core::fmt::Debug;

use embassy_futures::join::join;
use log::{error, info, warn};
use thiserror_no_std::Error;

use crate::driver::LedDriver;
use crate::feed::ColorFeed;
use crate::history::{HistoryBuffer, HistoryStore};
use crate::poller::ColorPoller;
use crate::renderer::StripRenderer;
use crate::shutdown::ShutdownToken;

/// Storage for the encoded history between runs
pub trait HistoryRepository {
    type Error: Debug;

    /// Read the persisted history, `Ok(None)` when nothing was saved yet
    fn load(&mut self) -> Result<Option<Vec<u8>>, Self::Error>;

    /// Replace the persisted history
    fn save(&mut self, data: &[u8]) -> Result<(), Self::Error>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleState {
    Idle,
    Running,
    Stopping,
    Stopped,
}

#[derive(Debug, Error)]
pub enum LifecycleError<E: Debug> {
    #[error("lifecycle has already been started")]
    AlreadyStarted,
    #[error("LED driver failed: {0:?}")]
    Driver(E),
}

pub struct Lifecycle<'a, R: HistoryRepository, const N: usize> {
    store: &'a HistoryStore<N>,
    shutdown: &'a ShutdownToken,
    repository: R,
    state: LifecycleState,
}

impl<'a, R: HistoryRepository, const N: usize> Lifecycle<'a, R, N> {
    pub fn new(store: &'a HistoryStore<N>, shutdown: &'a ShutdownToken, repository: R) -> Self {
        Self {
            store,
            shutdown,
            repository,
            state: LifecycleState::Idle,
        }
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn repository(&self) -> &R {
        &self.repository
    }

    /// Load the persisted history into the store.
    ///
    /// Missing or unreadable state leaves an empty history. Returns the
    /// number of restored colors.
    pub fn restore(&mut self) -> usize {
        let layout = self.store.layout();
        let history = match self.repository.load() {
            Ok(Some(data)) => HistoryBuffer::load(layout, &data),
            Ok(None) => {
                info!("lifecycle: no persisted history, starting empty");
                HistoryBuffer::new(layout)
            }
            Err(err) => {
                warn!("lifecycle: failed to read persisted history: {:?}", err);
                HistoryBuffer::new(layout)
            }
        };

        let restored = history.len();
        self.store.replace(history);
        info!("lifecycle: restored {} colors", restored);
        restored
    }

    /// Run the poller and the renderer until shutdown, then clean up.
    ///
    /// A driver error stops both activities; cleanup still runs and the
    /// error is returned afterwards.
    pub async fn run<F, D, const LEDS: usize>(
        &mut self,
        poller: &mut ColorPoller<'_, F, N>,
        renderer: &mut StripRenderer<'_, D, LEDS, N>,
    ) -> Result<(), LifecycleError<D::Error>>
    where
        F: ColorFeed,
        D: LedDriver<LEDS>,
    {
        if self.state != LifecycleState::Idle {
            return Err(LifecycleError::AlreadyStarted);
        }
        self.transition(LifecycleState::Running);

        let shutdown = self.shutdown;
        let render = async {
            let result = renderer.run().await;
            if let Err(err) = &result {
                error!("lifecycle: renderer failed: {:?}", err);
                shutdown.request();
            }
            result
        };
        let (rendered, ()) = join(render, poller.run()).await;

        self.transition(LifecycleState::Stopping);
        if let Err(err) = renderer.driver_mut().off() {
            error!("lifecycle: failed to turn the strip off: {:?}", err);
        }
        self.persist();
        self.transition(LifecycleState::Stopped);

        rendered.map_err(LifecycleError::Driver)
    }

    /// Write the current history to the repository, logging failures
    pub fn persist(&mut self) {
        let history = self.store.buffer();
        let encoded = match history.encode() {
            Ok(encoded) => encoded,
            Err(err) => {
                error!("lifecycle: failed to encode history: {}", err);
                return;
            }
        };

        match self.repository.save(encoded.as_bytes()) {
            Ok(()) => info!("lifecycle: saved {} colors", history.len()),
            Err(err) => error!("lifecycle: failed to save history: {:?}", err),
        }
    }

    fn transition(&mut self, next: LifecycleState) {
        info!("lifecycle: {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}
