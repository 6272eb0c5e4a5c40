use chrono::NaiveDate;

use crate::error::MondayError;

const MIN_PHONE_DIGITS: usize = 7;
const MAX_PHONE_DIGITS: usize = 15;

pub fn validate_id(id: &str) -> Result<(), MondayError> {
    if id.is_empty() || !id.bytes().all(|b| b.is_ascii_digit()) {
        return Err(MondayError::Validation(format!("Invalid ID: {:?}", id)));
    }
    Ok(())
}

pub fn validate_email(email: &str) -> Result<(), MondayError> {
    let invalid = || MondayError::Validation(format!("Invalid email: {:?}", email));

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    let labels: Vec<&str> = domain.split('.').collect();
    if labels.len() < 2 || labels.iter().any(|l| l.is_empty()) {
        return Err(invalid());
    }
    Ok(())
}

/// Accepts an optional leading `+` followed by 7 to 15 digits. Spaces,
/// dashes and parentheses are ignored.
pub fn validate_phone(phone: &str) -> Result<(), MondayError> {
    let invalid = || MondayError::Validation(format!("Invalid phone number: {:?}", phone));

    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let mut digits = 0usize;
    for c in rest.chars() {
        match c {
            '0'..='9' => digits += 1,
            ' ' | '-' | '(' | ')' => {}
            _ => return Err(invalid()),
        }
    }

    if !(MIN_PHONE_DIGITS..=MAX_PHONE_DIGITS).contains(&digits) {
        return Err(invalid());
    }
    Ok(())
}

pub fn validate_country_code(code: &str) -> Result<(), MondayError> {
    if code.len() != 2 || !code.bytes().all(|b| b.is_ascii_uppercase()) {
        return Err(MondayError::Validation(format!(
            "Country code must be two uppercase letters, got {:?}",
            code
        )));
    }
    Ok(())
}

pub fn validate_coordinates(lat: f64, lng: f64) -> Result<(), MondayError> {
    if !lat.is_finite() || !(-90.0..=90.0).contains(&lat) {
        return Err(MondayError::Validation(format!("Latitude out of range: {}", lat)));
    }
    if !lng.is_finite() || !(-180.0..=180.0).contains(&lng) {
        return Err(MondayError::Validation(format!("Longitude out of range: {}", lng)));
    }
    Ok(())
}

/// Status labels are addressed by palette index: 0-19 for the standard
/// palette and 101-110 for the extended one.
pub fn validate_status_index(index: u32) -> Result<(), MondayError> {
    match index {
        0..=19 | 101..=110 => Ok(()),
        _ => Err(MondayError::Validation(format!("Invalid status index: {}", index))),
    }
}

pub fn validate_date(date: &str) -> Result<NaiveDate, MondayError> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .map_err(|_| MondayError::Validation(format!("Date must be YYYY-MM-DD, got {:?}", date)))
}

pub fn validate_time(time: &str) -> Result<(), MondayError> {
    chrono::NaiveTime::parse_from_str(time, "%H:%M:%S")
        .map(|_| ())
        .map_err(|_| MondayError::Validation(format!("Time must be HH:MM:SS, got {:?}", time)))
}

pub fn validate_url(url: &str) -> Result<(), MondayError> {
    let ok = url
        .strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .map_or(false, |rest| !rest.is_empty() && !rest.contains(char::is_whitespace));
    if !ok {
        return Err(MondayError::Validation(format!("Invalid URL: {:?}", url)));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids() {
        assert!(validate_id("1234567890").is_ok());
        assert!(validate_id("").is_err());
        assert!(validate_id("12a").is_err());
        assert!(validate_id("-1").is_err());
    }

    #[test]
    fn test_emails() {
        assert!(validate_email("jane@example.com").is_ok());
        assert!(validate_email("jane.doe+tag@mail.example.co.uk").is_ok());
        assert!(validate_email("jane@localhost").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("jane@@example.com").is_err());
        assert!(validate_email("jane@example..com").is_err());
        assert!(validate_email("jane doe@example.com").is_err());
        assert!(validate_email("jane.example.com").is_err());
    }

    #[test]
    fn test_phones() {
        assert!(validate_phone("+14155552671").is_ok());
        assert!(validate_phone("(415) 555-2671").is_ok());
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("+1234567890123456").is_err());
        assert!(validate_phone("555-CALL-NOW").is_err());
    }

    #[test]
    fn test_country_codes() {
        assert!(validate_country_code("US").is_ok());
        assert!(validate_country_code("us").is_err());
        assert!(validate_country_code("USA").is_err());
    }

    #[test]
    fn test_coordinates() {
        assert!(validate_coordinates(40.7128, -74.0060).is_ok());
        assert!(validate_coordinates(90.0, 180.0).is_ok());
        assert!(validate_coordinates(90.1, 0.0).is_err());
        assert!(validate_coordinates(0.0, -180.5).is_err());
        assert!(validate_coordinates(f64::NAN, 0.0).is_err());
    }

    #[test]
    fn test_status_indices() {
        assert!(validate_status_index(0).is_ok());
        assert!(validate_status_index(19).is_ok());
        assert!(validate_status_index(20).is_err());
        assert!(validate_status_index(105).is_ok());
        assert!(validate_status_index(111).is_err());
    }

    #[test]
    fn test_dates_and_times() {
        assert!(validate_date("2024-02-29").is_ok());
        assert!(validate_date("2023-02-29").is_err());
        assert!(validate_date("29/02/2024").is_err());
        assert!(validate_time("13:45:00").is_ok());
        assert!(validate_time("25:00:00").is_err());
    }

    #[test]
    fn test_urls() {
        assert!(validate_url("https://monday.com").is_ok());
        assert!(validate_url("http://example.com/a b").is_err());
        assert!(validate_url("ftp://example.com").is_err());
        assert!(validate_url("https://").is_err());
    }
}
