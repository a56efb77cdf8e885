//! New-cow form validation.
//!
//! # Responsibility
//! - Validate raw form input against the current herd.
//! - Produce normalized `NewCow` fields for record creation.
//!
//! # Invariants
//! - Ear tag and pen are trimmed before checks and storage.
//! - Ear tag uniqueness is an exact, case-sensitive match.
//! - All failing fields are reported together, in form order.

use crate::model::cow::{Cow, CowSex, CowStatus, NewCow};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Form field a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CowField {
    EarTag,
    Sex,
    Pen,
    Weight,
}

impl CowField {
    pub fn name(self) -> &'static str {
        match self {
            Self::EarTag => "ear_tag",
            Self::Sex => "sex",
            Self::Pen => "pen",
            Self::Weight => "weight",
        }
    }
}

/// Why a field was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldErrorKind {
    Required,
    AlreadyExists,
    /// Weight is not a positive number.
    NotPositive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: CowField,
    pub kind: FieldErrorKind,
}

impl FieldError {
    pub(crate) fn new(field: CowField, kind: FieldErrorKind) -> Self {
        Self { field, kind }
    }
}

impl Display for FieldError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match (self.field, self.kind) {
            (CowField::EarTag, FieldErrorKind::Required) => f.write_str("Ear tag is required"),
            (CowField::EarTag, FieldErrorKind::AlreadyExists) => {
                f.write_str("A cow with this ear tag already exists")
            }
            (CowField::Sex, _) => f.write_str("Please select sex"),
            (CowField::Pen, _) => f.write_str("Pen is required"),
            (CowField::Weight, _) => f.write_str("Weight must be a positive number"),
            (field, kind) => write!(f, "invalid `{}`: {kind:?}", field.name()),
        }
    }
}

impl Error for FieldError {}

/// Raw values captured by the add-cow form.
#[derive(Debug, Clone, PartialEq)]
pub struct CowDraft {
    pub ear_tag: String,
    pub sex: Option<CowSex>,
    pub pen: String,
    pub status: CowStatus,
    /// Free text; blank means "not weighed".
    pub weight: String,
}

impl Default for CowDraft {
    fn default() -> Self {
        Self {
            ear_tag: String::new(),
            sex: None,
            pen: String::new(),
            status: CowStatus::Active,
            weight: String::new(),
        }
    }
}

impl CowDraft {
    /// Validates the draft against `existing` cows.
    ///
    /// # Errors
    /// Returns every failing field when any check fails.
    pub fn validate(&self, existing: &[Cow]) -> Result<NewCow, Vec<FieldError>> {
        let mut errors = Vec::new();

        let ear_tag = self.ear_tag.trim();
        if ear_tag.is_empty() {
            errors.push(FieldError::new(CowField::EarTag, FieldErrorKind::Required));
        } else if existing.iter().any(|cow| cow.ear_tag == ear_tag) {
            errors.push(FieldError::new(
                CowField::EarTag,
                FieldErrorKind::AlreadyExists,
            ));
        }

        if self.sex.is_none() {
            errors.push(FieldError::new(CowField::Sex, FieldErrorKind::Required));
        }

        let pen = self.pen.trim();
        if pen.is_empty() {
            errors.push(FieldError::new(CowField::Pen, FieldErrorKind::Required));
        }

        let weight = match parse_weight(&self.weight) {
            Ok(weight) => weight,
            Err(err) => {
                errors.push(err);
                None
            }
        };

        match self.sex {
            Some(sex) if errors.is_empty() => Ok(NewCow {
                ear_tag: ear_tag.to_string(),
                sex,
                pen: pen.to_string(),
                status: self.status,
                weight,
            }),
            _ => Err(errors),
        }
    }
}

fn parse_weight(raw: &str) -> Result<Option<f64>, FieldError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
        _ => Err(FieldError::new(CowField::Weight, FieldErrorKind::NotPositive)),
    }
}

#[cfg(test)]
mod tests {
    use super::{CowDraft, CowField, FieldErrorKind};
    use crate::model::cow::{Cow, CowSex, CowStatus, NewCow};

    fn draft() -> CowDraft {
        CowDraft {
            ear_tag: "  COW-100 ".to_string(),
            sex: Some(CowSex::Male),
            pen: " B2 ".to_string(),
            status: CowStatus::InTreatment,
            weight: "412.5".to_string(),
        }
    }

    fn existing(tag: &str) -> Cow {
        Cow::create(
            NewCow {
                ear_tag: tag.to_string(),
                sex: CowSex::Female,
                pen: "A1".to_string(),
                status: CowStatus::Active,
                weight: None,
            },
            0,
        )
    }

    #[test]
    fn valid_draft_is_trimmed() {
        let fields = draft().validate(&[]).expect("draft should validate");
        assert_eq!(fields.ear_tag, "COW-100");
        assert_eq!(fields.pen, "B2");
        assert_eq!(fields.weight, Some(412.5));
        assert_eq!(fields.status, CowStatus::InTreatment);
    }

    #[test]
    fn duplicate_tag_is_case_sensitive() {
        let herd = [existing("COW-100")];
        let errors = draft().validate(&herd).expect_err("duplicate must fail");
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, CowField::EarTag);
        assert_eq!(errors[0].kind, FieldErrorKind::AlreadyExists);

        let herd = [existing("cow-100")];
        assert!(draft().validate(&herd).is_ok());
    }

    #[test]
    fn blank_form_reports_every_required_field() {
        let errors = CowDraft::default()
            .validate(&[])
            .expect_err("blank form must fail");
        let fields: Vec<_> = errors.iter().map(|err| err.field).collect();
        assert_eq!(fields, [CowField::EarTag, CowField::Sex, CowField::Pen]);
    }

    #[test]
    fn weight_must_be_positive_number() {
        for bad in ["0", "-3", "heavy", "NaN", "inf"] {
            let mut input = draft();
            input.weight = bad.to_string();
            let errors = input.validate(&[]).expect_err("bad weight must fail");
            assert_eq!(errors[0].field, CowField::Weight, "input `{bad}`");
        }

        let mut unweighed = draft();
        unweighed.weight = "   ".to_string();
        assert_eq!(unweighed.validate(&[]).unwrap().weight, None);
    }

    #[test]
    fn messages_are_user_facing() {
        let errors = CowDraft::default().validate(&[]).unwrap_err();
        assert_eq!(errors[0].to_string(), "Ear tag is required");
    }
}
