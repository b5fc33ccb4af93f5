//! Integration tests for the lifecycle controller driving the poller and the
//! renderer together.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use cheerlights_composer::{
    Brightness, ColorFeed, ColorPoller, HexColor, HistoryRepository, HistoryStore, LedDriver,
    Lifecycle, LifecycleError, LifecycleState, RendererConfig, Rgb, ShutdownToken, StripLayout,
    StripRenderer,
};
use embassy_futures::block_on;
use embassy_futures::join::join;
use embassy_time::{Duration, Instant, Timer};

const LEDS: usize = 30;
const CAPACITY: usize = 16;
const POLL_INTERVAL: Duration = Duration::from_millis(200);

// -----------------------------------------------------------------------------
// Collaborators
// -----------------------------------------------------------------------------

/// Feed cycling through a fixed list of answers
struct CyclingFeed {
    answers: &'static [&'static str],
    queries: Rc<Cell<usize>>,
}

impl ColorFeed for CyclingFeed {
    type Error = &'static str;

    async fn current_hex(&mut self) -> Result<HexColor, Self::Error> {
        let index = self.queries.get();
        self.queries.set(index + 1);
        let answer = self.answers[index % self.answers.len()];
        if answer.is_empty() {
            return Err("connection refused");
        }
        HexColor::try_from(answer).map_err(|()| "answer too long")
    }
}

#[derive(Default)]
struct StripLog {
    frames: Vec<[Rgb; LEDS]>,
    /// Frames written after shutdown was requested
    late_frames: usize,
}

struct SharedDriver {
    log: Rc<RefCell<StripLog>>,
    shutdown: &'static ShutdownToken,
    fail_at: Option<usize>,
}

impl LedDriver<LEDS> for SharedDriver {
    type Error = &'static str;

    fn write(&mut self, colors: &[Rgb; LEDS]) -> Result<(), Self::Error> {
        let mut log = self.log.borrow_mut();
        if self.fail_at == Some(log.frames.len()) {
            self.fail_at = None;
            return Err("spi bus error");
        }
        if self.shutdown.is_requested() && colors.iter().any(|pixel| *pixel != Rgb::default()) {
            log.late_frames += 1;
        }
        log.frames.push(*colors);
        Ok(())
    }
}

#[derive(Default)]
struct MemoryRepository {
    stored: Option<Vec<u8>>,
    saves: usize,
    fail_load: bool,
}

impl HistoryRepository for MemoryRepository {
    type Error = &'static str;

    fn load(&mut self) -> Result<Option<Vec<u8>>, Self::Error> {
        if self.fail_load {
            return Err("permission denied");
        }
        Ok(self.stored.clone())
    }

    fn save(&mut self, data: &[u8]) -> Result<(), Self::Error> {
        self.saves += 1;
        self.stored = Some(data.to_vec());
        Ok(())
    }
}

fn layout() -> StripLayout {
    StripLayout::new(LEDS, 3, 2).unwrap()
}

fn leak<T>(value: T) -> &'static T {
    Box::leak(Box::new(value))
}

fn renderer_config() -> RendererConfig {
    RendererConfig {
        brightness: Brightness::FULL,
        speed: 1,
        frame_delay: Duration::from_millis(2),
    }
}

// -----------------------------------------------------------------------------
// Restore
// -----------------------------------------------------------------------------

#[test]
fn restore_reads_persisted_history() {
    let store: HistoryStore<CAPACITY> = HistoryStore::new(layout());
    let shutdown = ShutdownToken::new();
    let repository = MemoryRepository {
        stored: Some(b"[[255,0,0],[0,0,255]]".to_vec()),
        ..MemoryRepository::default()
    };
    let mut lifecycle = Lifecycle::new(&store, &shutdown, repository);

    assert_eq!(lifecycle.restore(), 2);
    assert_eq!(
        store.snapshot().as_slice(),
        &[Rgb::new(255, 0, 0), Rgb::new(0, 0, 255)]
    );
    assert_eq!(lifecycle.state(), LifecycleState::Idle);
}

#[test]
fn restore_tolerates_malformed_state() {
    let store: HistoryStore<CAPACITY> = HistoryStore::new(layout());
    store.append(Rgb::new(1, 2, 3));
    let shutdown = ShutdownToken::new();
    let repository = MemoryRepository {
        stored: Some(b"[(255, 0, 0), oops]".to_vec()),
        ..MemoryRepository::default()
    };
    let mut lifecycle = Lifecycle::new(&store, &shutdown, repository);

    assert_eq!(lifecycle.restore(), 0);
    assert!(store.is_empty());
}

#[test]
fn restore_tolerates_unreadable_state() {
    let store: HistoryStore<CAPACITY> = HistoryStore::new(layout());
    let shutdown = ShutdownToken::new();
    let repository = MemoryRepository {
        fail_load: true,
        ..MemoryRepository::default()
    };
    let mut lifecycle = Lifecycle::new(&store, &shutdown, repository);

    assert_eq!(lifecycle.restore(), 0);
    assert!(store.is_empty());
}

// -----------------------------------------------------------------------------
// Run and shutdown
// -----------------------------------------------------------------------------

#[test]
fn shutdown_mid_run_turns_strip_off_and_persists() {
    let store: &'static HistoryStore<CAPACITY> = leak(HistoryStore::new(layout()));
    let shutdown: &'static ShutdownToken = leak(ShutdownToken::new());
    let queries = Rc::new(Cell::new(0));
    let log = Rc::new(RefCell::new(StripLog::default()));

    let feed = CyclingFeed {
        answers: &["#ff0000", "", "#00ff00", "#00ff00", "#0000ff"],
        queries: queries.clone(),
    };
    let driver = SharedDriver {
        log: log.clone(),
        shutdown,
        fail_at: None,
    };
    let mut poller = ColorPoller::new(feed, store, shutdown, POLL_INTERVAL);
    let mut renderer: StripRenderer<'_, SharedDriver, LEDS, CAPACITY> =
        StripRenderer::new(driver, store, shutdown, renderer_config()).unwrap();
    let mut lifecycle = Lifecycle::new(store, shutdown, MemoryRepository::default());
    lifecycle.restore();

    let started = Instant::now();
    let mut requested_at = Instant::now();
    let (result, ()) = block_on(join(lifecycle.run(&mut poller, &mut renderer), async {
        Timer::after(Duration::from_millis(50)).await;
        requested_at = Instant::now();
        assert!(shutdown.request());
    }));

    assert!(result.is_ok());
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    assert!(requested_at.elapsed() < POLL_INTERVAL);
    assert!(started.elapsed() >= Duration::from_millis(50));

    // Only the first query ran before shutdown
    assert_eq!(queries.get(), 1);
    assert_eq!(store.snapshot().as_slice(), &[Rgb::new(255, 0, 0)]);

    let log = log.borrow();
    assert!(log.frames.len() > 1);
    assert_eq!(log.late_frames, 0);
    let last = log.frames.last().unwrap();
    assert!(last.iter().all(|pixel| *pixel == Rgb::default()));

    let repository = lifecycle.repository();
    assert_eq!(repository.saves, 1);
    assert_eq!(repository.stored.as_deref(), Some(&b"[[255,0,0]]"[..]));
}

#[test]
fn poller_failures_keep_the_animation_running() {
    let store: &'static HistoryStore<CAPACITY> = leak(HistoryStore::new(layout()));
    let shutdown: &'static ShutdownToken = leak(ShutdownToken::new());
    let queries = Rc::new(Cell::new(0));
    let log = Rc::new(RefCell::new(StripLog::default()));

    let feed = CyclingFeed {
        answers: &["", "#12", "#00ff00"],
        queries: queries.clone(),
    };
    let driver = SharedDriver {
        log: log.clone(),
        shutdown,
        fail_at: None,
    };
    let mut poller = ColorPoller::new(feed, store, shutdown, Duration::from_millis(10));
    let mut renderer: StripRenderer<'_, SharedDriver, LEDS, CAPACITY> =
        StripRenderer::new(driver, store, shutdown, renderer_config()).unwrap();
    let mut lifecycle = Lifecycle::new(store, shutdown, MemoryRepository::default());

    let (result, ()) = block_on(join(lifecycle.run(&mut poller, &mut renderer), async {
        while store.is_empty() {
            Timer::after(Duration::from_millis(5)).await;
        }
        shutdown.request();
    }));

    assert!(result.is_ok());
    assert!(queries.get() >= 3);
    assert_eq!(store.snapshot().as_slice(), &[Rgb::new(0, 255, 0)]);
    assert!(log.borrow().frames.len() > 2);
    assert_eq!(
        lifecycle.repository().stored.as_deref(),
        Some(&b"[[0,255,0]]"[..])
    );
}

#[test]
fn driver_failure_still_cleans_up() {
    let store: &'static HistoryStore<CAPACITY> = leak(HistoryStore::new(layout()));
    let shutdown: &'static ShutdownToken = leak(ShutdownToken::new());
    let log = Rc::new(RefCell::new(StripLog::default()));

    let feed = CyclingFeed {
        answers: &["#ff00ff"],
        queries: Rc::new(Cell::new(0)),
    };
    let driver = SharedDriver {
        log: log.clone(),
        shutdown,
        fail_at: Some(5),
    };
    let mut poller = ColorPoller::new(feed, store, shutdown, Duration::from_secs(30));
    let mut renderer: StripRenderer<'_, SharedDriver, LEDS, CAPACITY> =
        StripRenderer::new(driver, store, shutdown, renderer_config()).unwrap();
    let mut lifecycle = Lifecycle::new(store, shutdown, MemoryRepository::default());

    let started = Instant::now();
    let result = block_on(lifecycle.run(&mut poller, &mut renderer));

    assert!(matches!(result, Err(LifecycleError::Driver("spi bus error"))));
    assert!(started.elapsed() < Duration::from_secs(5));
    assert!(shutdown.is_requested());
    assert_eq!(lifecycle.state(), LifecycleState::Stopped);
    assert_eq!(lifecycle.repository().saves, 1);

    // The off frame lands after the failed write
    let log = log.borrow();
    assert_eq!(log.frames.len(), 6);
    assert!(log.frames[5].iter().all(|pixel| *pixel == Rgb::default()));
}

#[test]
fn lifecycle_runs_only_once() {
    let store: &'static HistoryStore<CAPACITY> = leak(HistoryStore::new(layout()));
    let shutdown: &'static ShutdownToken = leak(ShutdownToken::new());
    shutdown.request();

    let feed = CyclingFeed {
        answers: &["#ffffff"],
        queries: Rc::new(Cell::new(0)),
    };
    let driver = SharedDriver {
        log: Rc::new(RefCell::new(StripLog::default())),
        shutdown,
        fail_at: None,
    };
    let mut poller = ColorPoller::new(feed, store, shutdown, POLL_INTERVAL);
    let mut renderer: StripRenderer<'_, SharedDriver, LEDS, CAPACITY> =
        StripRenderer::new(driver, store, shutdown, renderer_config()).unwrap();
    let mut lifecycle = Lifecycle::new(store, shutdown, MemoryRepository::default());

    assert!(block_on(lifecycle.run(&mut poller, &mut renderer)).is_ok());
    assert!(matches!(
        block_on(lifecycle.run(&mut poller, &mut renderer)),
        Err(LifecycleError::AlreadyStarted)
    ));
}
