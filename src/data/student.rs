use jiff::{Timestamp, civil::Date};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const CLASSES: [&str; 12] = ["1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12"];
pub const SECTIONS: [&str; 6] = ["A", "B", "C", "D", "E", "F"];
pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

/// Everything about a student that a user can type into the form.
///
/// Required fields default to empty strings when absent from a request body;
/// the store does not insist on them, only the form validator does.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentDetails {
    pub name: String,
    pub roll_number: String,
    pub class: String,
    pub section: String,
    pub gender: String,
    pub date_of_birth: String,
    pub father_name: String,
    pub father_contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub father_email: Option<String>,
    pub mother_name: String,
    pub mother_contact: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mother_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_contact: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub guardian_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub permanent_address: Option<String>,
}

impl StudentDetails {
    /// The raw text of a field, with absent optional fields read as `""`.
    #[must_use]
    pub fn field(&self, field: StudentField) -> &str {
        fn optional(value: &Option<String>) -> &str {
            value.as_deref().unwrap_or_default()
        }

        match field {
            StudentField::Name => &self.name,
            StudentField::RollNumber => &self.roll_number,
            StudentField::Class => &self.class,
            StudentField::Section => &self.section,
            StudentField::Gender => &self.gender,
            StudentField::DateOfBirth => &self.date_of_birth,
            StudentField::FatherName => &self.father_name,
            StudentField::FatherContact => &self.father_contact,
            StudentField::FatherEmail => optional(&self.father_email),
            StudentField::MotherName => &self.mother_name,
            StudentField::MotherContact => &self.mother_contact,
            StudentField::MotherEmail => optional(&self.mother_email),
            StudentField::GuardianName => optional(&self.guardian_name),
            StudentField::GuardianContact => optional(&self.guardian_contact),
            StudentField::GuardianEmail => optional(&self.guardian_email),
            StudentField::CurrentAddress => optional(&self.current_address),
            StudentField::PermanentAddress => optional(&self.permanent_address),
        }
    }

    /// Turns optional fields left blank in a form into absent ones.
    pub fn drop_blank_optionals(&mut self) {
        for slot in [
            &mut self.father_email,
            &mut self.mother_email,
            &mut self.guardian_name,
            &mut self.guardian_contact,
            &mut self.guardian_email,
            &mut self.current_address,
            &mut self.permanent_address,
        ] {
            if slot.as_deref().is_some_and(|value| value.trim().is_empty()) {
                *slot = None;
            }
        }
    }

    #[must_use]
    pub fn birth_date(&self) -> Option<Date> {
        self.date_of_birth.trim().parse().ok()
    }

    /// Age in completed years on `today`, if the date of birth parses and is not in the future.
    #[must_use]
    pub fn age_on(&self, today: Date) -> Option<i16> {
        let born = self.birth_date()?;
        if born > today {
            return None;
        }

        let mut age = today.year() - born.year();
        if (today.month(), today.day()) < (born.month(), born.day()) {
            age -= 1;
        }
        Some(age)
    }

    /// e.g. `May 1, 2012`
    #[must_use]
    pub fn formatted_birth_date(&self) -> Option<String> {
        self.birth_date()
            .map(|date| date.strftime("%B %-d, %Y").to_string())
    }
}

/// A stored student: the typed-in details plus the server-managed id and timestamps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentRecord {
    pub id: String,
    #[serde(flatten)]
    pub details: StudentDetails,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl StudentRecord {
    #[must_use]
    pub fn new(details: StudentDetails) -> Self {
        let now = Timestamp::now();
        Self {
            id: Uuid::new_v4().to_string(),
            details,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, patch: StudentPatch) {
        patch.merge_into(&mut self.details);
        self.updated_at = Timestamp::now();
    }

    /// `needle` must already be lowercase.
    #[must_use]
    pub fn matches(&self, needle: &str) -> bool {
        let details = &self.details;
        [
            &details.name,
            &details.roll_number,
            &details.class,
            &details.section,
            &details.father_name,
            &details.mother_name,
        ]
        .into_iter()
        .any(|haystack| haystack.to_lowercase().contains(needle))
    }
}

/// A partial update. Present fields overwrite, absent fields are left alone.
///
/// An optional field sent as `""` clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub roll_number: Option<String>,
    pub class: Option<String>,
    pub section: Option<String>,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub father_name: Option<String>,
    pub father_contact: Option<String>,
    pub father_email: Option<String>,
    pub mother_name: Option<String>,
    pub mother_contact: Option<String>,
    pub mother_email: Option<String>,
    pub guardian_name: Option<String>,
    pub guardian_contact: Option<String>,
    pub guardian_email: Option<String>,
    pub current_address: Option<String>,
    pub permanent_address: Option<String>,
}

fn overwrite(slot: &mut String, value: Option<String>) {
    if let Some(value) = value {
        *slot = value;
    }
}

fn overwrite_optional(slot: &mut Option<String>, value: Option<String>) {
    if let Some(value) = value {
        *slot = Some(value).filter(|value| !value.is_empty());
    }
}

impl StudentPatch {
    pub fn merge_into(self, details: &mut StudentDetails) {
        let Self {
            name,
            roll_number,
            class,
            section,
            gender,
            date_of_birth,
            father_name,
            father_contact,
            father_email,
            mother_name,
            mother_contact,
            mother_email,
            guardian_name,
            guardian_contact,
            guardian_email,
            current_address,
            permanent_address,
        } = self;

        overwrite(&mut details.name, name);
        overwrite(&mut details.roll_number, roll_number);
        overwrite(&mut details.class, class);
        overwrite(&mut details.section, section);
        overwrite(&mut details.gender, gender);
        overwrite(&mut details.date_of_birth, date_of_birth);
        overwrite(&mut details.father_name, father_name);
        overwrite(&mut details.father_contact, father_contact);
        overwrite_optional(&mut details.father_email, father_email);
        overwrite(&mut details.mother_name, mother_name);
        overwrite(&mut details.mother_contact, mother_contact);
        overwrite_optional(&mut details.mother_email, mother_email);
        overwrite_optional(&mut details.guardian_name, guardian_name);
        overwrite_optional(&mut details.guardian_contact, guardian_contact);
        overwrite_optional(&mut details.guardian_email, guardian_email);
        overwrite_optional(&mut details.current_address, current_address);
        overwrite_optional(&mut details.permanent_address, permanent_address);
    }
}

/// A patch that replaces every field, so absent optionals in `details` clear the stored ones.
impl From<StudentDetails> for StudentPatch {
    fn from(details: StudentDetails) -> Self {
        let cleared = |value: Option<String>| Some(value.unwrap_or_default());

        Self {
            name: Some(details.name),
            roll_number: Some(details.roll_number),
            class: Some(details.class),
            section: Some(details.section),
            gender: Some(details.gender),
            date_of_birth: Some(details.date_of_birth),
            father_name: Some(details.father_name),
            father_contact: Some(details.father_contact),
            father_email: cleared(details.father_email),
            mother_name: Some(details.mother_name),
            mother_contact: Some(details.mother_contact),
            mother_email: cleared(details.mother_email),
            guardian_name: cleared(details.guardian_name),
            guardian_contact: cleared(details.guardian_contact),
            guardian_email: cleared(details.guardian_email),
            current_address: cleared(details.current_address),
            permanent_address: cleared(details.permanent_address),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum StudentField {
    Name,
    RollNumber,
    Class,
    Section,
    Gender,
    DateOfBirth,
    FatherName,
    FatherContact,
    FatherEmail,
    MotherName,
    MotherContact,
    MotherEmail,
    GuardianName,
    GuardianContact,
    GuardianEmail,
    CurrentAddress,
    PermanentAddress,
}

impl StudentField {
    pub const REQUIRED: [Self; 10] = [
        Self::Name,
        Self::RollNumber,
        Self::Class,
        Self::Section,
        Self::Gender,
        Self::DateOfBirth,
        Self::FatherName,
        Self::MotherName,
        Self::FatherContact,
        Self::MotherContact,
    ];

    /// The camelCase name used on the wire and as the HTML form field name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::RollNumber => "rollNumber",
            Self::Class => "class",
            Self::Section => "section",
            Self::Gender => "gender",
            Self::DateOfBirth => "dateOfBirth",
            Self::FatherName => "fatherName",
            Self::FatherContact => "fatherContact",
            Self::FatherEmail => "fatherEmail",
            Self::MotherName => "motherName",
            Self::MotherContact => "motherContact",
            Self::MotherEmail => "motherEmail",
            Self::GuardianName => "guardianName",
            Self::GuardianContact => "guardianContact",
            Self::GuardianEmail => "guardianEmail",
            Self::CurrentAddress => "currentAddress",
            Self::PermanentAddress => "permanentAddress",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Name => "Full Name",
            Self::RollNumber => "Roll Number",
            Self::Class => "Class",
            Self::Section => "Section",
            Self::Gender => "Gender",
            Self::DateOfBirth => "Date of Birth",
            Self::FatherName => "Father's Name",
            Self::FatherContact => "Father's Contact",
            Self::FatherEmail => "Father's Email",
            Self::MotherName => "Mother's Name",
            Self::MotherContact => "Mother's Contact",
            Self::MotherEmail => "Mother's Email",
            Self::GuardianName => "Guardian's Name",
            Self::GuardianContact => "Guardian's Contact",
            Self::GuardianEmail => "Guardian's Email",
            Self::CurrentAddress => "Current Address",
            Self::PermanentAddress => "Permanent Address",
        }
    }

    #[must_use]
    pub fn is_required(self) -> bool {
        Self::REQUIRED.contains(&self)
    }
}
