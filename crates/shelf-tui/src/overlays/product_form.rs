//! Add-product form.
//!
//! The product only lives in the confirmation toast; nothing is sent to the API.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Color;
use shelf_core::validation::{FieldErrors, validate_product};

use super::OverlayUpdate;
use super::render_utils::{InputHint, OverlayConfig, render_form_field, render_overlay};
use crate::common::TextField;
use crate::mutations::StateMutation;

const FIELDS: [(&str, &str); 4] = [
    ("title", "Title"),
    ("price", "Price"),
    ("brand", "Brand"),
    ("sku", "SKU"),
];

#[derive(Debug, Default)]
pub struct ProductFormState {
    /// title, price, brand, sku
    inputs: [TextField; 4],
    focus: usize,
    errors: FieldErrors,
}

impl ProductFormState {
    pub fn value(&self, field: &str) -> &str {
        FIELDS
            .iter()
            .position(|(name, _)| *name == field)
            .map_or("", |idx| self.inputs[idx].value())
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    fn submit(&mut self) -> OverlayUpdate {
        let [title, price, brand, sku] = &self.inputs;
        match validate_product(title.value(), price.value(), brand.value(), sku.value()) {
            Ok(product) => OverlayUpdate::close()
                .with_mutations(vec![StateMutation::success(product.confirmation())]),
            Err(errors) => {
                if let Some(idx) = FIELDS
                    .iter()
                    .position(|(name, _)| errors.get(name).is_some())
                {
                    self.focus = idx;
                }
                self.errors = errors;
                OverlayUpdate::stay()
            }
        }
    }

    pub fn paste(&mut self, text: &str) {
        self.inputs[self.focus].paste(text);
        self.errors.remove(FIELDS[self.focus].0);
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> OverlayUpdate {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => OverlayUpdate::close(),
            KeyCode::Char('c') if ctrl => OverlayUpdate::close(),
            KeyCode::Char('s') if ctrl => self.submit(),
            KeyCode::Enter if self.focus + 1 == FIELDS.len() => self.submit(),
            KeyCode::Enter | KeyCode::Tab | KeyCode::Down => {
                self.focus = (self.focus + 1) % FIELDS.len();
                OverlayUpdate::stay()
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = (self.focus + FIELDS.len() - 1) % FIELDS.len();
                OverlayUpdate::stay()
            }
            _ => {
                if self.inputs[self.focus].handle_key(key) {
                    self.errors.remove(FIELDS[self.focus].0);
                }
                OverlayUpdate::stay()
            }
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let hints = [
            InputHint::new("Tab", "next"),
            InputHint::new("^S", "save"),
            InputHint::new("Esc", "cancel"),
        ];
        let layout = render_overlay(
            frame,
            area,
            area.height,
            &OverlayConfig {
                title: "Add product",
                border_color: Color::Green,
                width: 56,
                height: FIELDS.len() as u16 * 2 + 3,
                hints: &hints,
            },
        );

        let mut y = layout.body.y;
        for (idx, (name, label)) in FIELDS.iter().enumerate() {
            let row = Rect::new(layout.body.x, y, layout.body.width, 2);
            render_form_field(
                frame,
                row,
                label,
                &self.inputs[idx],
                idx == self.focus,
                self.errors.get(name),
            );
            y += 2;
        }
    }
}
