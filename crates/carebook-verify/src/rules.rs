//! Semantic rules evaluated after the structural phase passed.
//!
//! These run on typed values and cover what a JSON Schema cannot say well:
//! allow-listed email domains, URL shape, and the cross-field emergency
//! contact requirement.

use carebook_contracts::{intake::IntakeForm, validate::FieldViolation};

/// Email domains accepted on intake forms.
pub const ALLOWED_EMAIL_DOMAINS: [&str; 2] = ["hdfc.com", "sbi.com"];

/// From this age on an intake form must list an `emergency` contact.
pub const EMERGENCY_CONTACT_AGE: u32 = 60;

pub const EMERGENCY_CONTACT_KEY: &str = "emergency";

/// Run every intake rule and return all violations found.
pub fn check_intake(form: &IntakeForm) -> Vec<FieldViolation> {
    [
        check_email(&form.email),
        form.file_drive.as_deref().and_then(check_file_drive),
        check_emergency_contact(form),
    ]
    .into_iter()
    .flatten()
    .collect()
}

pub fn check_email(email: &str) -> Option<FieldViolation> {
    let Some((local, domain)) = email.split_once('@') else {
        return Some(FieldViolation::new("email", "must be an email address"));
    };

    if local.is_empty() || domain.contains('@') || !domain.contains('.') {
        return Some(FieldViolation::new("email", "must be an email address"));
    }

    let domain = domain.to_ascii_lowercase();
    if !ALLOWED_EMAIL_DOMAINS.contains(&domain.as_str()) {
        return Some(FieldViolation::new(
            "email",
            format!("domain must be one of {:?}", ALLOWED_EMAIL_DOMAINS),
        ));
    }

    None
}

pub fn check_file_drive(url: &str) -> Option<FieldViolation> {
    let rest = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"));

    match rest {
        Some(rest) if !rest.is_empty() && !rest.starts_with('/') => None,
        _ => Some(FieldViolation::new(
            "file_drive",
            "must be an http(s) URL with a host",
        )),
    }
}

/// Cross-field rule: older patients need an emergency contact.
pub fn check_emergency_contact(form: &IntakeForm) -> Option<FieldViolation> {
    if form.age >= EMERGENCY_CONTACT_AGE && !form.contact_no.contains_key(EMERGENCY_CONTACT_KEY) {
        return Some(FieldViolation::new(
            "contact_no",
            format!(
                "patients aged {EMERGENCY_CONTACT_AGE} or over must list an '{EMERGENCY_CONTACT_KEY}' contact"
            ),
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    fn form(age: u32, contacts: &[(&str, &str)]) -> IntakeForm {
        IntakeForm {
            name: "Joy".to_string(),
            email: "joy2020@sbi.com".to_string(),
            file_drive: None,
            age,
            weight: 50.5,
            height: 1.79,
            married: false,
            allergies: None,
            contact_no: contacts
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect::<BTreeMap<_, _>>(),
            address: None,
        }
    }

    #[test]
    fn email_on_allowed_domain_passes() {
        assert!(check_email("joy2020@sbi.com").is_none());
        assert!(check_email("a.b@HDFC.com").is_none());
    }

    #[test]
    fn email_on_other_domain_fails() {
        let failure = check_email("joy@gmail.com").unwrap();
        assert_eq!(failure.field, "email");
        assert!(failure.constraint.contains("sbi.com"));
    }

    #[test]
    fn malformed_email_fails() {
        assert!(check_email("not-an-email").is_some());
        assert!(check_email("@sbi.com").is_some());
        assert!(check_email("a@b@sbi.com").is_some());
    }

    #[test]
    fn file_drive_requires_http_scheme_and_host() {
        assert!(check_file_drive("https://drive/joy-checkup-files").is_none());
        assert!(check_file_drive("http://files.example.org/x").is_none());
        assert!(check_file_drive("ftp://drive/x").is_some());
        assert!(check_file_drive("https://").is_some());
        assert!(check_file_drive("No Checkup").is_some());
    }

    #[test]
    fn senior_without_emergency_contact_is_rejected() {
        let failure = check_emergency_contact(&form(60, &[("phone1", "9100202")])).unwrap();
        assert_eq!(failure.field, "contact_no");
        assert!(failure.constraint.contains("emergency"));
    }

    #[test]
    fn senior_with_emergency_contact_passes() {
        let f = form(75, &[("phone1", "9100202"), ("emergency", "8927622")]);
        assert!(check_emergency_contact(&f).is_none());
    }

    #[test]
    fn younger_patient_needs_no_emergency_contact() {
        assert!(check_emergency_contact(&form(59, &[("phone1", "9100202")])).is_none());
    }

    #[test]
    fn check_intake_collects_every_failure() {
        let mut f = form(80, &[]);
        f.email = "joy@gmail.com".to_string();
        f.file_drive = Some("drive".to_string());

        let fields: Vec<String> = check_intake(&f).into_iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["email", "file_drive", "contact_no"]);
    }
}
