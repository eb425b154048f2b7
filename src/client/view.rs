//! HTML for a [`Snapshot`]. Rendering is a pure function of the snapshot and
//! today's date, which is only used for the age shown next to the date of birth.

use crate::{
    client::controller::{Banner, Connectivity, CurrentRecord, RecordMode, Snapshot},
    data::student::{CLASSES, GENDERS, SECTIONS, StudentDetails, StudentField},
    maud_conveniences::{detail_row, form_element, select, text_input, textarea, title},
    validation::FormErrors,
};
use jiff::civil::Date;
use maud::{Markup, html};

pub fn render_app(snapshot: &Snapshot, today: Date) -> Markup {
    html! {
        div class="container mx-auto px-4 py-8" {
            div class="text-center mb-8" {
                h1 class="text-3xl font-bold text-gray-900 mb-4" {
                    "Student Information Management"
                }
                p class="text-gray-600 max-w-2xl mx-auto" {
                    "Manage comprehensive student information including personal details, academic records, parent information, and contact details."
                }
                (render_status(snapshot.connectivity))
            }

            @if let Some(banner) = &snapshot.banner {
                (render_banner(banner))
            }

            div class="max-w-6xl mx-auto" {
                @match (&snapshot.record, snapshot.mode) {
                    (Some(record), RecordMode::Viewing) => {
                        (render_record(record, today))
                    }
                    _ => {
                        (render_form(snapshot))
                    }
                }
            }
        }
    }
}

pub fn render_status(connectivity: Connectivity) -> Markup {
    html! {
        div id="api_status" class="mt-4 flex items-center justify-center gap-2" {
            @match connectivity {
                Connectivity::Checking => {
                    span class="text-sm text-blue-600" {"Checking API connection..."}
                }
                Connectivity::Connected => {
                    span class="text-sm text-green-600" {"Connected to Database"}
                }
                Connectivity::Disconnected => {
                    span class="text-sm text-orange-600" {"Running in Local Mode"}
                    form method="post" action="/" {
                        button type="submit" name="action" value="refresh" class="px-2 py-1 text-xs bg-orange-100 text-orange-700 rounded hover:bg-orange-200" {
                            "Refresh"
                        }
                    }
                }
            }
        }
    }
}

pub fn render_banner(banner: &Banner) -> Markup {
    html! {
        div id="error_banner" class="max-w-6xl mx-auto mb-6" {
            div class="bg-red-50 border border-red-200 rounded-lg p-4 flex items-center justify-between" {
                span class="text-red-800" {(banner.message)}
                @if banner.retryable {
                    form method="post" action="/" {
                        button type="submit" name="action" value="refresh" class="px-3 py-1 text-sm bg-red-100 text-red-700 rounded hover:bg-red-200" {
                            "Retry"
                        }
                    }
                }
            }
        }
    }
}

fn form_field(details: &StudentDetails, errors: &FormErrors, field: StudentField) -> Markup {
    let id = field.as_str();
    let label = field.label();
    let value = details.field(field);
    let error = errors.get(field);
    let required = field.is_required();

    match field {
        StudentField::Class => {
            let control = select(id, "Select Class", &CLASSES, value);
            form_element(id, label, required, error, control)
        }
        StudentField::Section => {
            let control = select(id, "Select Section", &SECTIONS, value);
            form_element(id, label, required, error, control)
        }
        StudentField::Gender => {
            let control = select(id, "Select Gender", &GENDERS, value);
            form_element(id, label, required, error, control)
        }
        StudentField::DateOfBirth => {
            form_element(id, label, required, error, text_input(id, "date", value))
        }
        StudentField::CurrentAddress | StudentField::PermanentAddress => {
            form_element(id, label, required, error, textarea(id, value))
        }
        StudentField::FatherEmail | StudentField::MotherEmail | StudentField::GuardianEmail => {
            form_element(id, label, required, error, text_input(id, "email", value))
        }
        StudentField::FatherContact
        | StudentField::MotherContact
        | StudentField::GuardianContact => {
            form_element(id, label, required, error, text_input(id, "tel", value))
        }
        _ => form_element(id, label, required, error, text_input(id, "text", value)),
    }
}

fn fieldset(
    legend: &str,
    details: &StudentDetails,
    errors: &FormErrors,
    fields: &[StudentField],
) -> Markup {
    html! {
        fieldset class="mb-6" {
            legend class="text-lg font-semibold text-gray-800 mb-2" {(legend)}
            div class="grid grid-cols-1 md:grid-cols-2 gap-x-6" {
                @for f in fields {
                    (form_field(details, errors, *f))
                }
            }
        }
    }
}

pub fn render_form(snapshot: &Snapshot) -> Markup {
    let details = &snapshot.draft;
    let errors = &snapshot.form_errors;
    let (submit_label, cancel_value) = match snapshot.mode {
        RecordMode::Editing => ("Update Student Information", "cancel_edit"),
        _ => ("Save Student Information", "clear"),
    };
    let editing_id = match snapshot.mode {
        RecordMode::Editing => snapshot.record.as_ref().and_then(CurrentRecord::id),
        _ => None,
    };

    html! {
        div class="bg-white rounded-lg shadow-md p-6" {
            (title("Student Information Form"))
            form id="student_form" method="post" action="/" novalidate {
                @if let Some(id) = editing_id {
                    input type="hidden" name="id" value=(id) {}
                }
                (fieldset("Personal Information", details, errors, &[
                    StudentField::Name,
                    StudentField::RollNumber,
                    StudentField::Class,
                    StudentField::Section,
                    StudentField::Gender,
                    StudentField::DateOfBirth,
                ]))
                (fieldset("Parent Information", details, errors, &[
                    StudentField::FatherName,
                    StudentField::FatherContact,
                    StudentField::FatherEmail,
                    StudentField::MotherName,
                    StudentField::MotherContact,
                    StudentField::MotherEmail,
                ]))
                (fieldset("Guardian Information (optional)", details, errors, &[
                    StudentField::GuardianName,
                    StudentField::GuardianContact,
                    StudentField::GuardianEmail,
                ]))
                (fieldset("Address Information", details, errors, &[
                    StudentField::CurrentAddress,
                    StudentField::PermanentAddress,
                ]))

                div class="flex gap-3 justify-end" {
                    button type="submit" name="action" value=(cancel_value) class="bg-gray-200 hover:bg-gray-300 font-bold py-2 px-4 rounded" {
                        "Cancel"
                    }
                    button type="submit" name="action" value="submit" class="bg-blue-600 hover:bg-blue-800 text-white font-bold py-2 px-4 rounded" {
                        (submit_label)
                    }
                }
            }
        }
    }
}

pub fn render_record(record: &CurrentRecord, today: Date) -> Markup {
    let details = record.details();
    let birth = match (details.formatted_birth_date(), details.age_on(today)) {
        (Some(formatted), Some(age)) => format!("{formatted} ({age} years old)"),
        (Some(formatted), None) => formatted,
        (None, _) => details.date_of_birth.clone(),
    };
    let optional = |value: &Option<String>| value.clone().unwrap_or_else(|| "-".to_string());
    let parent = |name: &str, contact: &str| format!("{name} ({contact})");

    html! {
        div class="space-y-6" {
            div class="flex items-center justify-between" {
                (title("Student Information Display"))
                form method="post" action="/" class="flex gap-3" {
                    @if let Some(id) = record.id() {
                        input type="hidden" name="id" value=(id) {}
                    }
                    button type="submit" name="action" value="edit" class="bg-gray-200 hover:bg-gray-300 font-bold py-2 px-4 rounded" {
                        "Edit Information"
                    }
                    button type="submit" name="action" value="clear" class="bg-gray-200 hover:bg-gray-300 font-bold py-2 px-4 rounded" {
                        "Add New Student"
                    }
                }
            }
            @if !record.is_saved() {
                p class="text-sm text-orange-600" {"Saved locally only"}
            }
            div class="bg-white rounded-lg shadow-md p-6 grid grid-cols-1 md:grid-cols-2 gap-x-6" {
                dl {
                    (detail_row("Full Name", &details.name))
                    (detail_row("Roll Number", &details.roll_number))
                    (detail_row("Class", format!("{} - {}", details.class, details.section)))
                    (detail_row("Gender", &details.gender))
                    (detail_row("Date of Birth", birth))
                }
                dl {
                    (detail_row("Father", parent(&details.father_name, &details.father_contact)))
                    (detail_row("Father's Email", optional(&details.father_email)))
                    (detail_row("Mother", parent(&details.mother_name, &details.mother_contact)))
                    (detail_row("Mother's Email", optional(&details.mother_email)))
                    @if let Some(guardian) = &details.guardian_name {
                        (detail_row("Guardian", guardian))
                        (detail_row("Guardian's Contact", optional(&details.guardian_contact)))
                        (detail_row("Guardian's Email", optional(&details.guardian_email)))
                    }
                    (detail_row("Current Address", optional(&details.current_address)))
                    (detail_row("Permanent Address", optional(&details.permanent_address)))
                }
            }
        }
    }
}
