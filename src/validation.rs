//! Form validation for a single student, run before anything is submitted.
//!
//! Validation is a pure function of the typed-in [`StudentDetails`] (and the
//! current date, for the date-of-birth check). It never reaches the server;
//! a non-empty [`FormErrors`] simply blocks submission.

use crate::data::student::{StudentDetails, StudentField};
use jiff::{Zoned, civil::Date};
use regex::Regex;
use serde::Serialize;
use std::{collections::BTreeMap, sync::LazyLock};

static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[1-9][0-9]{0,15}$").expect("phone pattern is valid"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"));

const EMAIL_FIELDS: [StudentField; 3] = [
    StudentField::FatherEmail,
    StudentField::MotherEmail,
    StudentField::GuardianEmail,
];
const PHONE_FIELDS: [StudentField; 3] = [
    StudentField::FatherContact,
    StudentField::MotherContact,
    StudentField::GuardianContact,
];

/// Field name to human-readable message, one entry per violated field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FormErrors(BTreeMap<StudentField, &'static str>);

impl FormErrors {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn get(&self, field: StudentField) -> Option<&'static str> {
        self.0.get(&field).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StudentField, &'static str)> + '_ {
        self.0.iter().map(|(field, message)| (*field, *message))
    }

    fn flag(&mut self, field: StudentField, message: &'static str) {
        self.0.entry(field).or_insert(message);
    }
}

const fn required_message(field: StudentField) -> &'static str {
    match field {
        StudentField::Name => "Name is required",
        StudentField::RollNumber => "Roll Number is required",
        StudentField::Class => "Class is required",
        StudentField::Section => "Section is required",
        StudentField::Gender => "Gender is required",
        StudentField::DateOfBirth => "Date of Birth is required",
        StudentField::FatherName => "Father's name is required",
        StudentField::MotherName => "Mother's name is required",
        StudentField::FatherContact => "Father's contact is required",
        StudentField::MotherContact => "Mother's contact is required",
        _ => "This field is required",
    }
}

/// `local@domain.tld` with no whitespace and a single `@`.
/// Dots inside the local part are not policed.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

#[must_use]
pub fn is_valid_phone(value: &str) -> bool {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    PHONE.is_match(&compact)
}

/// Validates against today's date in the system time zone.
#[must_use]
pub fn validate(details: &StudentDetails) -> FormErrors {
    validate_on(details, Zoned::now().date())
}

#[must_use]
pub fn validate_on(details: &StudentDetails, today: Date) -> FormErrors {
    let mut errors = FormErrors::default();

    for field in StudentField::REQUIRED {
        if details.field(field).trim().is_empty() {
            errors.flag(field, required_message(field));
        }
    }

    for field in EMAIL_FIELDS {
        let value = details.field(field);
        if !value.trim().is_empty() && !is_valid_email(value) {
            errors.flag(field, "Invalid email format");
        }
    }

    for field in PHONE_FIELDS {
        let value = details.field(field);
        if !value.trim().is_empty() && !is_valid_phone(value) {
            errors.flag(field, "Invalid phone number");
        }
    }

    if !details.date_of_birth.trim().is_empty() {
        match details.birth_date() {
            None => errors.flag(StudentField::DateOfBirth, "Invalid date of birth"),
            Some(born) if born > today => {
                errors.flag(StudentField::DateOfBirth, "Date of Birth cannot be in the future");
            }
            Some(_) => {}
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::civil::date;

    fn today() -> Date {
        date(2026, 10, 16)
    }

    fn complete() -> StudentDetails {
        StudentDetails {
            name: "Asha".into(),
            roll_number: "12".into(),
            class: "5".into(),
            section: "A".into(),
            gender: "Female".into(),
            date_of_birth: "2012-05-01".into(),
            father_name: "Ravi".into(),
            father_contact: "+919876543210".into(),
            mother_name: "Lata".into(),
            mother_contact: "9876500000".into(),
            ..StudentDetails::default()
        }
    }

    #[test]
    fn complete_record_is_valid() {
        assert!(validate_on(&complete(), today()).is_empty());
    }

    #[test]
    fn missing_name_flags_only_name() {
        let details = StudentDetails {
            name: "   ".into(),
            ..complete()
        };

        let errors = validate_on(&details, today());

        assert_eq!(errors.len(), 1);
        assert_eq!(errors.get(StudentField::Name), Some("Name is required"));
    }

    #[test]
    fn bad_father_email_flags_only_that_field() {
        let details = StudentDetails {
            father_email: Some("not-an-email".into()),
            ..complete()
        };

        let errors = validate_on(&details, today());

        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get(StudentField::FatherEmail),
            Some("Invalid email format")
        );
    }

    #[test]
    fn empty_optional_emails_are_not_checked() {
        let details = StudentDetails {
            mother_email: Some(String::new()),
            guardian_email: Some("lata@example.org".into()),
            ..complete()
        };

        assert!(validate_on(&details, today()).is_empty());
    }

    #[test]
    fn empty_form_lists_every_required_field() {
        let errors = validate_on(&StudentDetails::default(), today());

        assert_eq!(errors.len(), StudentField::REQUIRED.len());
        assert_eq!(
            errors.get(StudentField::FatherContact),
            Some("Father's contact is required")
        );
    }

    #[test]
    fn phone_rules() {
        assert!(is_valid_phone("+91 98765 43210"));
        assert!(is_valid_phone("9"));
        assert!(is_valid_phone("1234567890123456"));
        assert!(!is_valid_phone("12345678901234567"));
        assert!(!is_valid_phone("0987654321"));
        assert!(!is_valid_phone("98-765"));
        assert!(!is_valid_phone("++91"));
        assert!(!is_valid_phone("1٢٣٤٥"));
        assert!(!is_valid_phone("１２３"));
    }

    #[test]
    fn guardian_contact_checked_only_when_present() {
        let details = StudentDetails {
            guardian_contact: Some("call me".into()),
            ..complete()
        };

        let errors = validate_on(&details, today());

        assert_eq!(
            errors.iter().collect::<Vec<_>>(),
            vec![(StudentField::GuardianContact, "Invalid phone number")]
        );
    }

    #[test]
    fn email_rules() {
        assert!(is_valid_email("ravi@example.com"));
        assert!(!is_valid_email("ravi@example"));
        assert!(!is_valid_email("ravi example@x.com"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("ravi@@example.com"));
        assert!(!is_valid_email(" ravi@example.com"));
    }

    #[test]
    fn permissive_local_parts_are_accepted() {
        assert!(is_valid_email("john..doe@example.com"));
        assert!(is_valid_email("a.@b.com"));
        assert!(is_valid_email(".a@b.com"));
        assert!(is_valid_email("ravi@mail.example.co.in"));
    }

    #[test]
    fn date_of_birth_must_parse_and_not_be_in_the_future() {
        let garbled = StudentDetails {
            date_of_birth: "01/05/2012".into(),
            ..complete()
        };
        let future = StudentDetails {
            date_of_birth: "2030-01-01".into(),
            ..complete()
        };

        assert_eq!(
            validate_on(&garbled, today()).get(StudentField::DateOfBirth),
            Some("Invalid date of birth")
        );
        assert_eq!(
            validate_on(&future, today()).get(StudentField::DateOfBirth),
            Some("Date of Birth cannot be in the future")
        );
    }
}
