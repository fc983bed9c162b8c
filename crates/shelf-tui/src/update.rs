//! TUI reducer (update function).
//!
//! All state mutations happen here. The runtime calls `update(app, event)`
//! and executes the returned effects.

use std::time::Instant;

use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use shelf_core::auth::{Route, Tier, guard};
use shelf_core::validation::AuthSubmission;
use tracing::debug;

use crate::common::TaskKind;
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::features::auth::{self, FormAction};
use crate::features::catalog::{self, CatalogFocus};
use crate::mutations::StateMutation;
use crate::overlays::{Overlay, OverlayRequest, OverlayTransition};
use crate::state::{AppState, TuiState};

/// The main reducer function.
pub fn update(app: &mut AppState, event: UiEvent) -> Vec<UiEffect> {
    update_at(app, event, Instant::now())
}

/// Reducer with an explicit clock, used by tests to drive the debounce.
pub fn update_at(app: &mut AppState, event: UiEvent, now: Instant) -> Vec<UiEffect> {
    match event {
        UiEvent::Tick => {
            app.tui.spinner_frame = app.tui.spinner_frame.wrapping_add(1);
            app.tui.toasts.prune(now);
            if !app.tui.booting && app.tui.route == Route::Products {
                catalog::tick_catalog(&mut app.tui.catalog, now)
            } else {
                vec![]
            }
        }
        UiEvent::Frame { width, height } => {
            app.tui.viewport = (width, height);
            vec![]
        }
        UiEvent::Terminal(term_event) => handle_terminal_event(app, term_event, now),
        UiEvent::Init {
            requested,
            tier,
            has_refresh_token,
        } => {
            app.tui.booting = true;
            app.tui.pending_route = Some(requested);
            if has_refresh_token {
                let task = app.tui.task_seq.next_id();
                vec![UiEffect::SilentRefresh { task }]
            } else {
                handle_session_changed(app, tier, now)
            }
        }
        UiEvent::TaskStarted { kind, started } => {
            app.tui.tasks.state_mut(kind).on_started(&started);
            vec![]
        }
        UiEvent::TaskCompleted { kind, completed } => {
            if !app.tui.tasks.state_mut(kind).finish_if_active(completed.id) {
                debug!(?kind, "dropping result of superseded task");
                return vec![];
            }
            update_at(app, *completed.result, now)
        }
        UiEvent::ProductsLoaded { key, result } => {
            catalog::handle_products_loaded(&mut app.tui.catalog, &key, result, now);
            vec![]
        }
        UiEvent::LoginFinished { result, remember } => {
            if result.is_ok() {
                app.tui.login.password.clear();
            }
            let (effects, mutations) = auth::handle_login_finished(result, remember);
            apply_mutations(&mut app.tui, mutations, now);
            effects
        }
        UiEvent::RegisterFinished {
            result,
            registration,
            remember,
        } => {
            let (effects, mutations) = auth::handle_register_finished(
                &mut app.tui.task_seq,
                result,
                &registration,
                remember,
            );
            apply_mutations(&mut app.tui, mutations, now);
            effects
        }
        UiEvent::SilentRefreshFinished { result } => match result {
            Ok(tokens) => vec![UiEffect::SaveRefreshedSession { tokens }],
            Err(err) => {
                debug!("silent refresh failed, continuing logged out: {err}");
                vec![UiEffect::ClearSession]
            }
        },
        UiEvent::UserLoaded { req, result } => {
            let mutations = auth::handle_user_loaded(&mut app.tui.auth, req, result);
            apply_mutations(&mut app.tui, mutations, now);
            vec![]
        }
        UiEvent::PasswordResetFinished { result } => {
            let mutations = auth::handle_password_reset_finished(result);
            apply_mutations(&mut app.tui, mutations, now);
            vec![]
        }
        UiEvent::SessionChanged { tier } => handle_session_changed(app, tier, now),
        UiEvent::SessionWriteFailed { error } => {
            apply_mutations(
                &mut app.tui,
                vec![StateMutation::error(format!("Couldn't save session: {error}"))],
                now,
            );
            vec![]
        }
    }
}

pub fn apply_mutations(tui: &mut TuiState, mutations: Vec<StateMutation>, now: Instant) {
    for mutation in mutations {
        match mutation {
            StateMutation::PushToast { level, message } => tui.toasts.push(level, message, now),
        }
    }
}

/// Switches screens. Leaving the products screen tears its view down;
/// entering it issues the fetch for the current key if needed.
fn navigate(tui: &mut TuiState, route: Route, now: Instant) -> Vec<UiEffect> {
    if tui.route == Route::Products && route != Route::Products {
        tui.catalog.teardown();
    }
    let entering_catalog = route == Route::Products && tui.route != Route::Products;
    debug!(from = %tui.route, to = %route, "navigate");
    tui.route = route;

    if entering_catalog {
        tui.catalog
            .view
            .start(now)
            .map(|key| UiEffect::FetchProducts { key })
            .into_iter()
            .collect()
    } else {
        vec![]
    }
}

/// Reacts to the session store settling on `tier`: finishes startup routing,
/// follows login and logout, and loads the current user.
fn handle_session_changed(app: &mut AppState, tier: Option<Tier>, now: Instant) -> Vec<UiEffect> {
    let tui = &mut app.tui;
    let was_authenticated = tui.auth.is_authenticated();
    let authenticated = tier.is_some();
    if authenticated {
        tui.auth.tier = tier;
    } else {
        tui.auth.sign_out();
    }

    let mut effects = Vec::new();
    if tui.booting {
        tui.booting = false;
        let requested = tui.pending_route.take().unwrap_or(Route::Products);
        effects.extend(navigate(tui, guard(requested, authenticated), now));
    } else if authenticated {
        if let Route::Login { from } = &tui.route {
            let target = from.as_deref().cloned().unwrap_or(Route::Products);
            effects.extend(navigate(tui, target, now));
        }
    } else {
        if was_authenticated {
            app.overlay = None;
            apply_mutations(tui, vec![StateMutation::info("Signed out")], now);
        }
        if tui.route.is_protected() {
            let target = guard(tui.route.clone(), false);
            effects.extend(navigate(tui, target, now));
        }
    }

    if authenticated && tui.auth.user.is_none() && !tui.auth.user_req.has_active() {
        effects.push(UiEffect::FetchUser {
            req: tui.auth.user_req.begin(),
        });
    }
    effects
}

fn handle_terminal_event(app: &mut AppState, event: Event, now: Instant) -> Vec<UiEffect> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => handle_key(app, key, now),
        Event::Paste(text) => {
            handle_paste(app, &text, now);
            vec![]
        }
        _ => vec![],
    }
}

fn handle_paste(app: &mut AppState, text: &str, now: Instant) {
    if let Some(overlay) = &mut app.overlay {
        overlay.handle_paste(text);
        return;
    }
    match app.tui.route {
        Route::Login { .. } => app.tui.login.paste(text),
        Route::Products => catalog::handle_catalog_paste(&mut app.tui.catalog, text, now),
        Route::NotFound { .. } => {}
    }
}

fn is_ctrl_c(key: &KeyEvent) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c')
}

fn handle_key(app: &mut AppState, key: KeyEvent, now: Instant) -> Vec<UiEffect> {
    if let Some(overlay) = &mut app.overlay {
        let update = overlay.handle_key(key);
        apply_mutations(&mut app.tui, update.mutations, now);
        match update.transition {
            OverlayTransition::Stay => {}
            OverlayTransition::Close => app.overlay = None,
            OverlayTransition::Open(request) => app.overlay = Some(Overlay::open(request)),
        }
        return update.effects;
    }

    if app.tui.booting {
        return if is_ctrl_c(&key) || key.code == KeyCode::Char('q') {
            vec![UiEffect::Quit]
        } else {
            vec![]
        };
    }

    match app.tui.route {
        Route::Login { .. } => handle_login_key(&mut app.tui, key, now),
        Route::Products => handle_products_key(app, key, now),
        Route::NotFound { .. } => match key.code {
            KeyCode::Enter => {
                let authenticated = app.tui.auth.is_authenticated();
                navigate(&mut app.tui, guard(Route::Products, authenticated), now)
            }
            KeyCode::Esc | KeyCode::Char('q') => vec![UiEffect::Quit],
            _ if is_ctrl_c(&key) => vec![UiEffect::Quit],
            _ => vec![],
        },
    }
}

fn handle_login_key(tui: &mut TuiState, key: KeyEvent, now: Instant) -> Vec<UiEffect> {
    let locked = tui.tasks.is_authenticating();
    match tui.login.handle_key(key, locked) {
        FormAction::None => vec![],
        FormAction::Quit => vec![UiEffect::Quit],
        FormAction::Cancel => {
            let mut effects = Vec::new();
            for kind in [TaskKind::Login, TaskKind::Register, TaskKind::PasswordReset] {
                let state = tui.tasks.state_mut(kind);
                if state.is_running() {
                    effects.push(UiEffect::CancelTask {
                        token: state.take_cancel(),
                    });
                }
            }
            if !effects.is_empty() {
                apply_mutations(tui, vec![StateMutation::info("Cancelled")], now);
            }
            effects
        }
        FormAction::Submit {
            submission,
            remember,
        } => {
            let task = tui.task_seq.next_id();
            match submission {
                AuthSubmission::Login(credentials) => vec![UiEffect::Login {
                    task,
                    credentials,
                    remember,
                }],
                AuthSubmission::Register(registration) => vec![UiEffect::Register {
                    task,
                    registration,
                    remember,
                }],
            }
        }
        FormAction::ResetPassword { email } => {
            if email.is_empty() {
                apply_mutations(
                    tui,
                    vec![StateMutation::error("Enter your email first")],
                    now,
                );
                vec![]
            } else if tui.tasks.password_reset.is_running() {
                vec![]
            } else {
                let task = tui.task_seq.next_id();
                vec![UiEffect::ResetPassword { task, email }]
            }
        }
    }
}

fn handle_products_key(app: &mut AppState, key: KeyEvent, now: Instant) -> Vec<UiEffect> {
    if is_ctrl_c(&key) {
        return vec![UiEffect::Quit];
    }
    let plain = key.modifiers.difference(KeyModifiers::SHIFT).is_empty();
    if app.tui.catalog.focus == CatalogFocus::Table && plain {
        match key.code {
            KeyCode::Char('q') => return vec![UiEffect::Quit],
            KeyCode::Char('?') => {
                app.overlay = Some(Overlay::open(OverlayRequest::Help));
                return vec![];
            }
            KeyCode::Char('n') => {
                app.overlay = Some(Overlay::open(OverlayRequest::ProductForm));
                return vec![];
            }
            KeyCode::Char('L') => return vec![UiEffect::ClearSession],
            _ => {}
        }
    }

    let (effects, mutations) = catalog::handle_catalog_key(&mut app.tui.catalog, key, now);
    apply_mutations(&mut app.tui, mutations, now);
    effects
}
