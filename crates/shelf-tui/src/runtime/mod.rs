//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Async handlers return a `UiEvent`; the runtime spawns them and sends the
//!   result to `inbox_tx`
//! - The event loop drains `inbox_rx` each frame
//! - Synchronous handlers (session writes) return their event directly and it
//!   is dispatched immediately
//!
//! Structure:
//! - `mod.rs`: Core runtime (TuiRuntime, event loop, effect dispatch)
//! - `inbox.rs`: Inbox channel types
//! - `handlers/`: Effect handler implementations (HTTP, storage)

mod handlers;
mod inbox;

use std::future::Future;
use std::io::Stdout;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use inbox::{UiEventReceiver, UiEventSender};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use shelf_core::Config;
use shelf_core::api::ApiClient;
use shelf_core::auth::{AuthGateway, Route, SessionStore};
use shelf_core::catalog::{ListStatus, ProductSource, SortPreferences};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Target frame rate while something is moving (~60fps).
pub const FRAME_DURATION: Duration = Duration::from_millis(16);

/// Poll duration when idle (no task running, no debounce pending).
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(100);

/// Full-screen TUI runtime.
///
/// Owns the terminal, the state, and every I/O client. Terminal state is
/// restored on drop and on panic.
pub struct TuiRuntime {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    pub state: AppState,
    inbox_tx: UiEventSender,
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
    last_terminal_event: Instant,
    /// Route requested on the command line; resolved by the guard after boot.
    requested: Route,
    source: ProductSource,
    gateway: AuthGateway,
    session: SessionStore,
    preferences: SortPreferences,
}

impl TuiRuntime {
    pub fn new(config: &Config, requested: Route) -> Result<Self> {
        let api = ApiClient::from_config(config).context("Failed to build HTTP client")?;
        let session = SessionStore::open_default();
        let preferences = SortPreferences::load(session.persistent_tier());

        // Set up panic hook BEFORE entering alternate screen
        terminal::install_panic_hook();
        let terminal = terminal::setup_terminal().context("Failed to setup terminal")?;

        let state = AppState::from_config(config, preferences.spec());
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        let now = Instant::now();
        Ok(Self {
            terminal,
            state,
            inbox_tx,
            inbox_rx,
            last_tick: now,
            last_terminal_event: now,
            requested,
            source: ProductSource::new(api.clone()),
            gateway: AuthGateway::new(api, config.token_expires_in_mins),
            session,
            preferences,
        })
    }

    /// Runs the main event loop until the user quits.
    pub fn run(&mut self) -> Result<()> {
        terminal::enable_input_features()?;

        let has_refresh_token = matches!(self.session.refresh_token(), Ok(Some(_)));
        self.dispatch_event(UiEvent::Init {
            requested: self.requested.clone(),
            tier: self.session.active_tier(),
            has_refresh_token,
        });

        let result = self.event_loop();

        let _ = terminal::disable_input_features();

        result
    }

    fn event_loop(&mut self) -> Result<()> {
        let mut dirty = true;

        while !self.state.tui.should_quit {
            let mut events = self.collect_events()?;

            // Frame goes first so layout is current before other events
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                if matches!(&event, UiEvent::Terminal(_)) {
                    self.last_terminal_event = Instant::now();
                }

                // Only Tick triggers render - this caps frame rate at tick cadence
                let marks_dirty = matches!(&event, UiEvent::Tick);

                let effects = update::update(&mut self.state, event);
                if marks_dirty {
                    dirty = true;
                }
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        Ok(())
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects inbox results, terminal input, and the tick.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        // Fast polling while a spinner is visible or a debounce deadline is
        // close; slow polling otherwise.
        let recent_terminal_activity = self.last_terminal_event.elapsed() < IDLE_POLL_DURATION;
        let needs_fast_poll = self.state.tui.tasks.is_any_running()
            || self.state.tui.booting
            || self.state.tui.catalog.view.is_debouncing()
            || matches!(
                self.state.tui.catalog.view.status(),
                ListStatus::Loading | ListStatus::Refreshing
            )
            || recent_terminal_activity;

        let tick_interval = if needs_fast_poll {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    fn dispatch_event(&mut self, event: UiEvent) {
        let effects = update::update(&mut self.state, event);
        if !effects.is_empty() {
            self.execute_effects(effects);
        }
    }

    /// Spawns an async handler and sends its event to the inbox.
    fn spawn_effect<F, Fut>(&self, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        tokio::spawn(async move {
            let _ = tx.send(f().await);
        });
    }

    /// Spawns an async task with a uniform TaskStarted/TaskCompleted lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, cancelable: bool, f: F)
    where
        F: FnOnce(Option<CancellationToken>) -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let cancel = cancelable.then(CancellationToken::new);
        let started = TaskStarted {
            id,
            cancel: cancel.clone(),
        };
        let _ = tx.send(UiEvent::TaskStarted { kind, started });
        tokio::spawn(async move {
            let inner = f(cancel).await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::CancelTask { token } => {
                if let Some(cancel) = token {
                    cancel.cancel();
                }
            }

            // Catalog
            UiEffect::FetchProducts { key } => {
                debug!(page = key.page, search = ?key.search, "fetching products");
                let source = self.source.clone();
                self.spawn_effect(move || handlers::fetch_products(source, key));
            }
            UiEffect::PersistSort { spec } => {
                handlers::persist_sort(&mut self.preferences, spec);
            }

            // Auth
            UiEffect::Login {
                task,
                credentials,
                remember,
            } => {
                let gateway = self.gateway.clone();
                self.spawn_task(TaskKind::Login, task, true, move |cancel| {
                    handlers::login(gateway, credentials, remember, cancel)
                });
            }
            UiEffect::Register {
                task,
                registration,
                remember,
            } => {
                let gateway = self.gateway.clone();
                self.spawn_task(TaskKind::Register, task, true, move |cancel| {
                    handlers::register(gateway, registration, remember, cancel)
                });
            }
            UiEffect::SilentRefresh { task } => {
                let gateway = self.gateway.clone();
                let session = self.session.clone();
                self.spawn_task(TaskKind::SilentRefresh, task, false, move |_| {
                    handlers::silent_refresh(gateway, session)
                });
            }
            UiEffect::FetchUser { req } => {
                let gateway = self.gateway.clone();
                let session = self.session.clone();
                self.spawn_effect(move || handlers::fetch_user(gateway, session, req));
            }
            UiEffect::ResetPassword { task, email } => {
                self.spawn_task(TaskKind::PasswordReset, task, true, move |cancel| {
                    handlers::reset_password(email, cancel)
                });
            }

            // Session storage
            UiEffect::SaveSession { tokens, remember } => {
                let event = handlers::save_session(&self.session, &tokens, remember);
                self.dispatch_event(event);
            }
            UiEffect::SaveRefreshedSession { tokens } => {
                let event = handlers::save_refreshed_session(&self.session, &tokens);
                self.dispatch_event(event);
            }
            UiEffect::ClearSession => {
                let event = handlers::clear_session(&self.session);
                self.dispatch_event(event);
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::restore_terminal();
    }
}
