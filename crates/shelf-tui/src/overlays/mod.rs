//! Overlay modules for the TUI.
//!
//! Overlays are modal UI components that temporarily take over keyboard input.
//! Each overlay owns its state, key handler, and render function.
//!
//! - `product_form.rs`: add-product form
//! - `help.rs`: key binding reference
//! - `render_utils.rs`: shared rendering helpers (also used by screens)

pub mod help;
pub mod product_form;
pub mod render_utils;

use crossterm::event::KeyEvent;
pub use help::HelpState;
pub use product_form::ProductFormState;
use ratatui::Frame;
use ratatui::layout::Rect;

use crate::effects::UiEffect;
use crate::mutations::StateMutation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OverlayRequest {
    ProductForm,
    Help,
}

#[derive(Debug)]
pub enum OverlayTransition {
    Stay,
    Close,
    Open(OverlayRequest),
}

/// Update returned by overlay key handlers.
#[derive(Debug)]
pub struct OverlayUpdate {
    pub transition: OverlayTransition,
    pub mutations: Vec<StateMutation>,
    pub effects: Vec<UiEffect>,
}

impl OverlayUpdate {
    fn new(transition: OverlayTransition) -> Self {
        Self {
            transition,
            mutations: Vec::new(),
            effects: Vec::new(),
        }
    }

    pub fn stay() -> Self {
        Self::new(OverlayTransition::Stay)
    }

    pub fn close() -> Self {
        Self::new(OverlayTransition::Close)
    }

    pub fn open(request: OverlayRequest) -> Self {
        Self::new(OverlayTransition::Open(request))
    }

    #[must_use]
    pub fn with_mutations(mut self, mutations: Vec<StateMutation>) -> Self {
        self.mutations = mutations;
        self
    }
}

#[derive(Debug)]
pub enum Overlay {
    ProductForm(ProductFormState),
    Help(HelpState),
}

impl Overlay {
    pub fn open(request: OverlayRequest) -> Self {
        match request {
            OverlayRequest::ProductForm => Overlay::ProductForm(ProductFormState::default()),
            OverlayRequest::Help => Overlay::Help(HelpState),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        match self {
            Overlay::ProductForm(p) => p.render(frame, area),
            Overlay::Help(h) => h.render(frame, area),
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        match self {
            Overlay::ProductForm(p) => p.handle_key(key),
            Overlay::Help(h) => h.handle_key(key),
        }
    }

    pub fn handle_paste(&mut self, text: &str) {
        if let Overlay::ProductForm(p) = self {
            p.paste(text);
        }
    }
}

/// Extension trait for `Option<Overlay>` providing convenience render helpers.
pub trait OverlayExt {
    fn render(&self, frame: &mut Frame, area: Rect);
}

impl OverlayExt for Option<Overlay> {
    fn render(&self, frame: &mut Frame, area: Rect) {
        if let Some(overlay) = self {
            overlay.render(frame, area);
        }
    }
}
