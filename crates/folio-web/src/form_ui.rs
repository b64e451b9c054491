#![forbid(unsafe_code)]

//! Presentation state of the contact form: per-field decoration and the
//! submit button.

use std::collections::BTreeMap;

use folio_core::form::{FormField, trim_field};

/// `focused` / `has-value` classes of one field group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FieldDecor {
    pub focused: bool,
    pub has_value: bool,
}

/// Submit button appearance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubmitButton {
    pub enabled: bool,
    pub label: String,
}

#[derive(Debug, Clone)]
pub struct FormUi {
    decor: BTreeMap<FormField, FieldDecor>,
    button: SubmitButton,
    rest_label: String,
    busy_label: String,
}

impl FormUi {
    #[must_use]
    pub fn new(rest_label: impl Into<String>, busy_label: impl Into<String>) -> Self {
        let rest_label = rest_label.into();
        Self {
            decor: FormField::ALL
                .iter()
                .map(|f| (*f, FieldDecor::default()))
                .collect(),
            button: SubmitButton {
                enabled: true,
                label: rest_label.clone(),
            },
            rest_label,
            busy_label: busy_label.into(),
        }
    }

    #[must_use]
    pub fn decor(&self, field: FormField) -> FieldDecor {
        self.decor.get(&field).copied().unwrap_or_default()
    }

    #[must_use]
    pub const fn button(&self) -> &SubmitButton {
        &self.button
    }

    /// Mark the field focused. Returns the new decoration if it changed.
    pub fn focus(&mut self, field: FormField) -> Option<FieldDecor> {
        self.update(field, |d| d.focused = true)
    }

    /// Clear focus and record whether the field holds a non-blank value.
    pub fn blur(&mut self, field: FormField, value: &str) -> Option<FieldDecor> {
        let has_value = !trim_field(value).is_empty();
        self.update(field, |d| {
            d.focused = false;
            d.has_value = has_value;
        })
    }

    /// Record a field's value without touching focus (initial page state).
    pub fn seed(&mut self, field: FormField, value: &str) -> Option<FieldDecor> {
        let has_value = !trim_field(value).is_empty();
        self.update(field, |d| d.has_value = has_value)
    }

    /// Forget every `has-value` mark after the form is reset.
    pub fn reset_values(&mut self) -> Vec<(FormField, FieldDecor)> {
        let mut changed = Vec::new();
        for field in FormField::ALL {
            if let Some(decor) = self.update(field, |d| d.has_value = false) {
                changed.push((field, decor));
            }
        }
        changed
    }

    /// Disable the button and show the busy label.
    pub fn begin_sending(&mut self) -> &SubmitButton {
        self.button = SubmitButton {
            enabled: false,
            label: self.busy_label.clone(),
        };
        &self.button
    }

    /// Re-enable the button with its resting label.
    pub fn finish_sending(&mut self) -> &SubmitButton {
        self.button = SubmitButton {
            enabled: true,
            label: self.rest_label.clone(),
        };
        &self.button
    }

    fn update(&mut self, field: FormField, f: impl FnOnce(&mut FieldDecor)) -> Option<FieldDecor> {
        let decor = self.decor.entry(field).or_default();
        let before = *decor;
        f(decor);
        (*decor != before).then_some(*decor)
    }
}
