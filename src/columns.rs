use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

use crate::error::MondayError;
use crate::validator;

/// A value written to a board column, in the JSON shape the API expects for
/// that column type.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnValue {
    Text(String),
    LongText(String),
    Number(f64),
    Status { label: String },
    StatusIndex { index: u32 },
    Date { date: String, time: Option<String> },
    Email { email: String, text: String },
    Phone { phone: String, country_short_name: String },
    Location { lat: f64, lng: f64, address: String },
    Checkbox(bool),
    Link { url: String, text: String },
    Dropdown { labels: Vec<String> },
    People { person_ids: Vec<u64> },
}

impl ColumnValue {
    pub fn text(text: impl Into<String>) -> Self {
        ColumnValue::Text(text.into())
    }

    pub fn long_text(text: impl Into<String>) -> Self {
        ColumnValue::LongText(text.into())
    }

    pub fn number(value: f64) -> Result<Self, MondayError> {
        if !value.is_finite() {
            return Err(MondayError::Validation(format!("Number must be finite, got {}", value)));
        }
        Ok(ColumnValue::Number(value))
    }

    pub fn status(label: impl Into<String>) -> Result<Self, MondayError> {
        let label = label.into();
        if label.trim().is_empty() {
            return Err(MondayError::Validation("Status label must not be empty".into()));
        }
        Ok(ColumnValue::Status { label })
    }

    pub fn status_index(index: u32) -> Result<Self, MondayError> {
        validator::validate_status_index(index)?;
        Ok(ColumnValue::StatusIndex { index })
    }

    pub fn date(date: impl Into<String>, time: Option<String>) -> Result<Self, MondayError> {
        let date = date.into();
        validator::validate_date(&date)?;
        if let Some(t) = &time {
            validator::validate_time(t)?;
        }
        Ok(ColumnValue::Date { date, time })
    }

    pub fn email(email: impl Into<String>, text: impl Into<String>) -> Result<Self, MondayError> {
        let email = email.into();
        validator::validate_email(&email)?;
        Ok(ColumnValue::Email { email, text: text.into() })
    }

    pub fn phone(
        phone: impl Into<String>,
        country_short_name: impl Into<String>,
    ) -> Result<Self, MondayError> {
        let phone = phone.into();
        let country_short_name = country_short_name.into();
        validator::validate_phone(&phone)?;
        validator::validate_country_code(&country_short_name)?;
        Ok(ColumnValue::Phone { phone, country_short_name })
    }

    pub fn location(lat: f64, lng: f64, address: impl Into<String>) -> Result<Self, MondayError> {
        validator::validate_coordinates(lat, lng)?;
        Ok(ColumnValue::Location { lat, lng, address: address.into() })
    }

    pub fn checkbox(checked: bool) -> Self {
        ColumnValue::Checkbox(checked)
    }

    pub fn link(url: impl Into<String>, text: impl Into<String>) -> Result<Self, MondayError> {
        let url = url.into();
        validator::validate_url(&url)?;
        Ok(ColumnValue::Link { url, text: text.into() })
    }

    pub fn dropdown<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ColumnValue::Dropdown {
            labels: labels.into_iter().map(Into::into).collect(),
        }
    }

    pub fn people(person_ids: Vec<u64>) -> Self {
        ColumnValue::People { person_ids }
    }

    pub fn to_json(&self) -> Value {
        match self {
            ColumnValue::Text(text) => Value::String(text.clone()),
            ColumnValue::LongText(text) => json!({ "text": text }),
            ColumnValue::Number(n) => Value::String(n.to_string()),
            ColumnValue::Status { label } => json!({ "label": label }),
            ColumnValue::StatusIndex { index } => json!({ "index": index }),
            ColumnValue::Date { date, time } => match time {
                Some(t) => json!({ "date": date, "time": t }),
                None => json!({ "date": date }),
            },
            ColumnValue::Email { email, text } => json!({ "email": email, "text": text }),
            ColumnValue::Phone { phone, country_short_name } => {
                json!({ "phone": phone, "countryShortName": country_short_name })
            }
            ColumnValue::Location { lat, lng, address } => json!({
                "lat": lat.to_string(),
                "lng": lng.to_string(),
                "address": address,
            }),
            // Unchecking is done by clearing the column.
            ColumnValue::Checkbox(true) => json!({ "checked": "true" }),
            ColumnValue::Checkbox(false) => Value::Null,
            ColumnValue::Link { url, text } => json!({ "url": url, "text": text }),
            ColumnValue::Dropdown { labels } => json!({ "labels": labels }),
            ColumnValue::People { person_ids } => json!({
                "personsAndTeams": person_ids
                    .iter()
                    .map(|id| json!({ "id": id, "kind": "person" }))
                    .collect::<Vec<_>>(),
            }),
        }
    }
}

impl Serialize for ColumnValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Column values keyed by column id, for `create_item` and
/// `change_multiple_column_values`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnValues {
    values: BTreeMap<String, ColumnValue>,
}

impl ColumnValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column_id: impl Into<String>, value: ColumnValue) -> Self {
        self.insert(column_id, value);
        self
    }

    pub fn insert(&mut self, column_id: impl Into<String>, value: ColumnValue) {
        self.values.insert(column_id.into(), value);
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn to_json(&self) -> Value {
        let map: Map<String, Value> = self
            .values
            .iter()
            .map(|(id, value)| (id.clone(), value.to_json()))
            .collect();
        Value::Object(map)
    }

    /// The API takes column values as a JSON-encoded string argument.
    pub fn to_json_string(&self) -> String {
        self.to_json().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_values() {
        assert_eq!(ColumnValue::text("hello").to_json(), json!("hello"));
        assert_eq!(ColumnValue::number(42.5).unwrap().to_json(), json!("42.5"));
        assert_eq!(ColumnValue::number(3.0).unwrap().to_json(), json!("3"));
        assert_eq!(ColumnValue::long_text("notes").to_json(), json!({ "text": "notes" }));
        assert!(ColumnValue::number(f64::INFINITY).is_err());
    }

    #[test]
    fn test_status_values() {
        let json = serde_json::to_string(&ColumnValue::status("Done").unwrap()).unwrap();
        assert_eq!(json, r#"{"label":"Done"}"#);

        let json = serde_json::to_string(&ColumnValue::status_index(1).unwrap()).unwrap();
        assert_eq!(json, r#"{"index":1}"#);

        assert!(ColumnValue::status("  ").is_err());
        assert!(ColumnValue::status_index(50).is_err());
    }

    #[test]
    fn test_date_value() {
        let date = ColumnValue::date("2024-06-01", Some("09:30:00".into())).unwrap();
        let json = serde_json::to_string(&date).unwrap();
        assert!(json.contains("\"date\":\"2024-06-01\""));
        assert!(json.contains("\"time\":\"09:30:00\""));

        let date_only = ColumnValue::date("2024-06-01", None).unwrap();
        assert_eq!(date_only.to_json(), json!({ "date": "2024-06-01" }));

        assert!(ColumnValue::date("06/01/2024", None).is_err());
    }

    #[test]
    fn test_contact_values() {
        let email = ColumnValue::email("jane@example.com", "Jane").unwrap();
        assert_eq!(email.to_json(), json!({ "email": "jane@example.com", "text": "Jane" }));
        assert!(ColumnValue::email("not-an-email", "x").is_err());

        let phone = ColumnValue::phone("+14155552671", "US").unwrap();
        let json = serde_json::to_string(&phone).unwrap();
        assert!(json.contains("\"phone\":\"+14155552671\""));
        assert!(json.contains("\"countryShortName\":\"US\""));
        assert!(ColumnValue::phone("+14155552671", "usa").is_err());
    }

    #[test]
    fn test_location_value() {
        let location = ColumnValue::location(40.7128, -74.006, "New York").unwrap();
        let json = serde_json::to_string(&location).unwrap();
        assert!(json.contains("\"lat\":\"40.7128\""));
        assert!(json.contains("\"lng\":\"-74.006\""));
        assert!(json.contains("\"address\":\"New York\""));
        assert!(ColumnValue::location(91.0, 0.0, "").is_err());
    }

    #[test]
    fn test_checkbox_link_dropdown_people() {
        assert_eq!(ColumnValue::checkbox(true).to_json(), json!({ "checked": "true" }));
        assert_eq!(ColumnValue::checkbox(false).to_json(), Value::Null);

        let link = ColumnValue::link("https://monday.com", "monday").unwrap();
        assert_eq!(link.to_json(), json!({ "url": "https://monday.com", "text": "monday" }));
        assert!(ColumnValue::link("monday.com", "x").is_err());

        let dropdown = ColumnValue::dropdown(["High", "Urgent"]);
        assert_eq!(dropdown.to_json(), json!({ "labels": ["High", "Urgent"] }));

        let people = ColumnValue::people(vec![12, 34]);
        assert_eq!(
            people.to_json(),
            json!({ "personsAndTeams": [
                { "id": 12, "kind": "person" },
                { "id": 34, "kind": "person" },
            ]})
        );
    }

    #[test]
    fn test_column_values_encoding() {
        let values = ColumnValues::new()
            .with("status", ColumnValue::status("Working on it").unwrap())
            .with("text0", ColumnValue::text("hi"));
        assert_eq!(values.len(), 2);

        let encoded = values.to_json_string();
        let decoded: Value = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded["status"]["label"], "Working on it");
        assert_eq!(decoded["text0"], "hi");
    }
}
