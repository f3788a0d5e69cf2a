//! Dashboard input forms
//!
//! Each form keeps the identifier of the page surface it stands in for.

use crate::consts::dashboard_consts::surfaces;
use crate::indicator::{IndicatorId, NewIndicator, Position};
use std::path::PathBuf;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FormKind {
    CreateIndicator,
    UpdateIndicator,
    ChangeBackground,
    UploadImage,
}

impl FormKind {
    pub fn id(&self) -> &'static str {
        match self {
            FormKind::CreateIndicator => surfaces::CREATE_INDICATOR_FORM,
            FormKind::UpdateIndicator => surfaces::UPDATE_INDICATOR_FORM,
            FormKind::ChangeBackground => surfaces::CHANGE_BACKGROUND_FORM,
            FormKind::UploadImage => surfaces::IMAGE_FORM,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            FormKind::CreateIndicator => "Create indicator",
            FormKind::UpdateIndicator => "Update indicator",
            FormKind::ChangeBackground => "Change background",
            FormKind::UploadImage => "Upload background image",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub label: &'static str,
    pub value: String,
}

impl FormField {
    fn new(label: &'static str, value: impl Into<String>) -> Self {
        Self {
            label,
            value: value.into(),
        }
    }
}

/// What a submitted form asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    Create(NewIndicator),
    Update { id: IndicatorId, value: String },
    ChangeBackground(String),
    UploadImage(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub kind: FormKind,
    pub fields: Vec<FormField>,
    pub focus: usize,
}

impl FormState {
    /// Create form, prefilled with the last position clicked on the background.
    pub fn create_indicator(position: Position) -> Self {
        Self::new(
            FormKind::CreateIndicator,
            vec![
                FormField::new("Name", ""),
                FormField::new("Value", ""),
                FormField::new("Unit", ""),
                FormField::new("X", position.x.to_string()),
                FormField::new("Y", position.y.to_string()),
            ],
        )
    }

    pub fn update_indicator(id: Option<&IndicatorId>) -> Self {
        Self::new(
            FormKind::UpdateIndicator,
            vec![
                FormField::new("ID", id.map(|id| id.to_string()).unwrap_or_default()),
                FormField::new("Value", ""),
            ],
        )
    }

    pub fn change_background() -> Self {
        Self::new(
            FormKind::ChangeBackground,
            vec![FormField::new(surfaces::CHANGE_BACKGROUND_NUMBER, "")],
        )
    }

    pub fn upload_image() -> Self {
        Self::new(
            FormKind::UploadImage,
            vec![FormField::new(surfaces::IMAGE_INPUT, "")],
        )
    }

    fn new(kind: FormKind, fields: Vec<FormField>) -> Self {
        Self {
            kind,
            fields,
            focus: 0,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.fields.len();
    }

    pub fn focus_previous(&mut self) {
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    pub fn push_char(&mut self, c: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(c);
        }
    }

    pub fn pop_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    fn field(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|field| field.value.trim())
            .unwrap_or_default()
    }

    /// Validates the fields and turns them into a submission.
    pub fn submit(&self) -> Result<Submission, String> {
        match self.kind {
            FormKind::CreateIndicator => {
                let name = self.field(0);
                if name.is_empty() {
                    return Err("Name is required".to_string());
                }
                let x = parse_coordinate("X", self.field(3))?;
                let y = parse_coordinate("Y", self.field(4))?;
                Ok(Submission::Create(NewIndicator::new(
                    name.to_string(),
                    self.field(1).to_string(),
                    self.field(2).to_string(),
                    x,
                    y,
                )))
            }
            FormKind::UpdateIndicator => {
                let id = self.field(0);
                if id.is_empty() {
                    return Err("ID is required".to_string());
                }
                Ok(Submission::Update {
                    id: IndicatorId::new(id),
                    value: self.field(1).to_string(),
                })
            }
            FormKind::ChangeBackground => {
                let index = self.field(0);
                if index.is_empty() {
                    return Err("Background number is required".to_string());
                }
                Ok(Submission::ChangeBackground(index.to_string()))
            }
            FormKind::UploadImage => {
                let path = self.field(0);
                if path.is_empty() {
                    return Err("No file selected".to_string());
                }
                Ok(Submission::UploadImage(PathBuf::from(path)))
            }
        }
    }
}

fn parse_coordinate(label: &str, raw: &str) -> Result<i32, String> {
    raw.parse::<i32>()
        .map_err(|_| format!("{} must be a whole number, got {:?}", label, raw))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_into(form: &mut FormState, text: &str) {
        for c in text.chars() {
            form.push_char(c);
        }
    }

    #[test]
    fn test_create_form_uses_clicked_position() {
        let mut form = FormState::create_indicator(Position { x: 240, y: 96 });
        assert_eq!(form.kind.id(), "create-indicator-form");
        type_into(&mut form, "Pressure");
        form.focus_next();
        type_into(&mut form, "1,5");
        form.focus_next();
        type_into(&mut form, "bar");

        assert_eq!(
            form.submit(),
            Ok(Submission::Create(NewIndicator::new(
                "Pressure".into(),
                "1,5".into(),
                "bar".into(),
                240,
                96
            )))
        );
    }

    #[test]
    fn test_create_form_rejects_bad_coordinates() {
        let mut form = FormState::create_indicator(Position::default());
        type_into(&mut form, "Temp");
        form.focus = 3;
        form.pop_char();
        type_into(&mut form, "left");
        assert!(form.submit().is_err());
    }

    #[test]
    fn test_upload_form_requires_a_file() {
        let form = FormState::upload_image();
        assert_eq!(form.submit(), Err("No file selected".to_string()));
    }

    #[test]
    fn test_focus_wraps_around() {
        let mut form = FormState::update_indicator(None);
        form.focus_previous();
        assert_eq!(form.focus, 1);
        form.focus_next();
        assert_eq!(form.focus, 0);
    }
}
