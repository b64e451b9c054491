#![forbid(unsafe_code)]

//! JSON input parser for DOM signals forwarded by the page shim.
//!
//! [`parse_encoded_input_to_event`] accepts one JSON object per signal and
//! returns the corresponding [`HostEvent`]. Kinds the controller has no use
//! for return `Ok(None)`.
//!
//! ```text
//! {"kind":"scroll","y":120.5}
//! {"kind":"click","target":"link-about","ancestors":["nav-menu","navbar"],"href":"#about"}
//! {"kind":"key","phase":"down","key":"Escape"}
//! {"kind":"submit","fields":{"name":"Ana","email":"ana@example.com","message":"Hi"}}
//! ```
//!
//! Feature-gated behind `input-parser`.

use folio_core::event::{
    ClickEvent, ElementId, HostEvent, IntersectionEntry, KeyCode, KeyEvent, KeyEventKind,
    Modifiers, PointerEvent, PointerKind,
};
use folio_core::form::{FormField, FormFieldValue};
use folio_core::scroll::Section;
use serde::Deserialize;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Unknown key or pointer phase value.
    UnknownPhase(String),
    /// Form field name the page does not have.
    UnknownFormField(String),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::UnknownPhase(phase) => write!(f, "unknown phase: {phase}"),
            Self::UnknownFormField(name) => write!(f, "unknown form field: {name}"),
        }
    }
}

impl std::error::Error for InputParseError {}

#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    phase: Option<String>,
    #[serde(default)]
    y: Option<f64>,
    #[serde(default)]
    dark: Option<bool>,
    #[serde(default)]
    target: Option<String>,
    #[serde(default)]
    ancestors: Vec<String>,
    #[serde(default)]
    href: Option<String>,
    #[serde(default, rename = "newTab")]
    new_tab: bool,
    #[serde(default)]
    key: Option<String>,
    #[serde(default)]
    mods: Option<i32>,
    #[serde(default)]
    repeat: Option<bool>,
    #[serde(default)]
    field: Option<String>,
    #[serde(default)]
    value: Option<String>,
    #[serde(default)]
    fields: Option<RawFields>,
    #[serde(default)]
    intersecting: Option<bool>,
    #[serde(default)]
    ratio: Option<f64>,
    #[serde(default)]
    sections: Option<Vec<RawSection>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawFields {
    name: String,
    email: String,
    subject: String,
    message: String,
}

#[derive(Debug, Deserialize)]
struct RawSection {
    id: String,
    top: f64,
    height: f64,
}

/// Parse one JSON-encoded DOM signal into a [`HostEvent`].
///
/// Returns `Ok(None)` for unknown kinds, `Err` for malformed JSON or missing
/// required fields.
pub fn parse_encoded_input_to_event(json: &str) -> Result<Option<HostEvent>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;

    match raw.kind.as_str() {
        "scroll" => {
            let y = raw.y.ok_or(InputParseError::MissingField("y"))?;
            Ok(Some(HostEvent::Scroll { y }))
        }
        "layout" => parse_layout(raw).map(Some),
        "theme" => {
            let prefers_dark = raw.dark.ok_or(InputParseError::MissingField("dark"))?;
            Ok(Some(HostEvent::ThemeChange { prefers_dark }))
        }
        "click" => parse_click(raw).map(Some),
        "key" => parse_key(&raw).map(Some),
        "submit" => {
            let fields = raw.fields.ok_or(InputParseError::MissingField("fields"))?;
            Ok(Some(HostEvent::Submit(FormFieldValue::new(
                fields.name,
                fields.email,
                fields.subject,
                fields.message,
            ))))
        }
        "focus" => {
            let field = parse_form_field(raw.field.as_deref())?;
            Ok(Some(HostEvent::FieldFocus { field }))
        }
        "blur" => {
            let field = parse_form_field(raw.field.as_deref())?;
            Ok(Some(HostEvent::FieldBlur {
                field,
                value: raw.value.unwrap_or_default(),
            }))
        }
        "pointer" => parse_pointer(raw).map(Some),
        "intersect" => {
            let target = raw.target.ok_or(InputParseError::MissingField("target"))?;
            let is_intersecting = raw
                .intersecting
                .ok_or(InputParseError::MissingField("intersecting"))?;
            Ok(Some(HostEvent::Intersection(IntersectionEntry {
                target: ElementId::new(target),
                is_intersecting,
                ratio: raw.ratio.unwrap_or(0.0).clamp(0.0, 1.0),
            })))
        }
        _ => Ok(None),
    }
}

fn parse_layout(raw: RawInput) -> Result<HostEvent, InputParseError> {
    let sections = raw
        .sections
        .ok_or(InputParseError::MissingField("sections"))?
        .into_iter()
        .map(|s| Section::new(s.id, s.top, s.height))
        .collect();
    Ok(HostEvent::Layout(sections))
}

fn parse_click(raw: RawInput) -> Result<HostEvent, InputParseError> {
    let target = raw.target.ok_or(InputParseError::MissingField("target"))?;
    let mut click = ClickEvent::on(target).within(raw.ancestors);
    if let Some(href) = raw.href.filter(|h| !h.is_empty()) {
        click = click.with_href(href);
    }
    if raw.new_tab {
        click = click.new_tab();
    }
    Ok(HostEvent::Click(click))
}

fn parse_key(raw: &RawInput) -> Result<HostEvent, InputParseError> {
    let kind = match raw.phase.as_deref().unwrap_or("down") {
        "down" if raw.repeat.unwrap_or(false) => KeyEventKind::Repeat,
        "down" => KeyEventKind::Press,
        "up" => KeyEventKind::Release,
        other => return Err(InputParseError::UnknownPhase(other.to_string())),
    };
    let key = raw
        .key
        .as_deref()
        .filter(|k| !k.is_empty())
        .ok_or(InputParseError::MissingField("key"))?;
    Ok(HostEvent::Key(
        KeyEvent::new(parse_key_code(key))
            .with_modifiers(parse_modifiers(raw.mods))
            .with_kind(kind),
    ))
}

fn parse_key_code(key: &str) -> KeyCode {
    match key {
        "Escape" | "Esc" => KeyCode::Escape,
        "Enter" | "NumpadEnter" => KeyCode::Enter,
        "Tab" => KeyCode::Tab,
        other => {
            let mut chars = other.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => KeyCode::Char(c),
                _ => KeyCode::Other,
            }
        }
    }
}

fn parse_modifiers(mods: Option<i32>) -> Modifiers {
    let bits = mods.unwrap_or(0).clamp(0, i32::from(u8::MAX)) as u8;
    Modifiers::from_bits_truncate(bits)
}

fn parse_form_field(name: Option<&str>) -> Result<FormField, InputParseError> {
    let name = name.ok_or(InputParseError::MissingField("field"))?;
    FormField::from_name(name).ok_or_else(|| InputParseError::UnknownFormField(name.to_string()))
}

fn parse_pointer(raw: RawInput) -> Result<HostEvent, InputParseError> {
    let kind = match raw.phase.as_deref() {
        Some("down") => PointerKind::Down,
        Some("up") => PointerKind::Up,
        Some("leave") => PointerKind::Leave,
        Some(other) => return Err(InputParseError::UnknownPhase(other.to_string())),
        None => return Err(InputParseError::MissingField("phase")),
    };
    let target = raw.target.ok_or(InputParseError::MissingField("target"))?;
    Ok(HostEvent::Pointer(PointerEvent {
        kind,
        target: ElementId::new(target),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn parse(json: &str) -> HostEvent {
        parse_encoded_input_to_event(json)
            .expect("parse ok")
            .expect("some event")
    }

    #[test]
    fn scroll_and_theme() {
        assert_eq!(
            parse(r#"{"kind":"scroll","y":120.5}"#),
            HostEvent::Scroll { y: 120.5 }
        );
        assert_eq!(
            parse(r#"{"kind":"theme","dark":true}"#),
            HostEvent::ThemeChange { prefers_dark: true }
        );
    }

    #[test]
    fn click_with_ancestors_and_new_tab() {
        let event = parse(
            r#"{"kind":"click","target":"gh","ancestors":["footer"],"href":"https://github.com","newTab":true}"#,
        );
        assert_eq!(
            event,
            HostEvent::Click(
                ClickEvent::on("gh")
                    .within(["footer"])
                    .with_href("https://github.com")
                    .new_tab()
            )
        );
    }

    #[test]
    fn empty_href_is_dropped() {
        assert_eq!(
            parse(r#"{"kind":"click","target":"x","href":""}"#),
            HostEvent::Click(ClickEvent::on("x"))
        );
    }

    #[test]
    fn key_phases() {
        assert_eq!(
            parse(r#"{"kind":"key","key":"Escape"}"#),
            HostEvent::Key(KeyEvent::new(KeyCode::Escape))
        );
        assert_eq!(
            parse(r#"{"kind":"key","phase":"up","key":"a","mods":4}"#),
            HostEvent::Key(
                KeyEvent::new(KeyCode::Char('a'))
                    .with_modifiers(Modifiers::CTRL)
                    .with_kind(KeyEventKind::Release)
            )
        );
        assert_eq!(
            parse(r#"{"kind":"key","key":"ArrowUp","repeat":true}"#),
            HostEvent::Key(KeyEvent::new(KeyCode::Other).with_kind(KeyEventKind::Repeat))
        );
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"key","phase":"hold","key":"a"}"#),
            Err(InputParseError::UnknownPhase("hold".into()))
        );
    }

    #[test]
    fn submit_defaults_missing_fields_to_empty() {
        assert_eq!(
            parse(r#"{"kind":"submit","fields":{"name":"Ana","message":"Hi"}}"#),
            HostEvent::Submit(FormFieldValue::new("Ana", "", "", "Hi"))
        );
    }

    #[test]
    fn focus_and_blur() {
        assert_eq!(
            parse(r#"{"kind":"focus","field":"email"}"#),
            HostEvent::FieldFocus {
                field: FormField::Email
            }
        );
        assert_eq!(
            parse(r#"{"kind":"blur","field":"subject","value":"Hello"}"#),
            HostEvent::FieldBlur {
                field: FormField::Subject,
                value: "Hello".into()
            }
        );
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"focus","field":"phone"}"#),
            Err(InputParseError::UnknownFormField("phone".into()))
        );
    }

    #[test]
    fn pointer_and_intersection() {
        assert_eq!(
            parse(r#"{"kind":"pointer","phase":"leave","target":"btn"}"#),
            HostEvent::Pointer(PointerEvent {
                kind: PointerKind::Leave,
                target: ElementId::new("btn"),
            })
        );
        assert_eq!(
            parse(r#"{"kind":"intersect","target":"card-1","intersecting":true,"ratio":1.5}"#),
            HostEvent::Intersection(IntersectionEntry {
                target: ElementId::new("card-1"),
                is_intersecting: true,
                ratio: 1.0,
            })
        );
    }

    #[test]
    fn layout_sections_in_order() {
        assert_eq!(
            parse(
                r#"{"kind":"layout","sections":[{"id":"home","top":0,"height":600},{"id":"about","top":600,"height":400}]}"#
            ),
            HostEvent::Layout(vec![
                Section::new("home", 0.0, 600.0),
                Section::new("about", 600.0, 400.0),
            ])
        );
    }

    #[test]
    fn unknown_kind_is_none() {
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"resize","w":10}"#),
            Ok(None)
        );
    }

    #[test]
    fn errors() {
        assert!(matches!(
            parse_encoded_input_to_event("not json"),
            Err(InputParseError::Json(_))
        ));
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"scroll"}"#),
            Err(InputParseError::MissingField("y"))
        );
        assert_eq!(
            parse_encoded_input_to_event(r#"{"kind":"pointer","target":"b"}"#),
            Err(InputParseError::MissingField("phase"))
        );
        assert_eq!(
            InputParseError::MissingField("y").to_string(),
            "missing required field: y"
        );
    }
}
