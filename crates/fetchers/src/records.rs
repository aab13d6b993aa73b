//! Typed records for each endpoint.

use crate::client::FetchResponse;
use crate::error::FetchError;
use serde_json::Value;

fn lookup<'a>(response: &'a FetchResponse, path: &[&str]) -> Result<&'a Value, FetchError> {
    let mut value = &response.body;
    for key in path {
        value = value.get(key).ok_or_else(|| missing(response, path))?;
    }
    Ok(value)
}

fn missing(response: &FetchResponse, path: &[&str]) -> FetchError {
    FetchError::MissingField {
        status: response.status,
        field: path.join("."),
    }
}

fn string_field(response: &FetchResponse, path: &[&str]) -> Result<String, FetchError> {
    lookup(response, path)?
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| missing(response, path))
}

/// Counters come back as numbers or as preformatted strings.
fn counter_field(response: &FetchResponse, field: &str) -> Result<String, FetchError> {
    match lookup(response, &[field])? {
        Value::Number(n) => Ok(n.to_string()),
        Value::String(s) => Ok(s.clone()),
        _ => Err(missing(response, &[field])),
    }
}

/// A random fact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FactRecord {
    pub text: String,
}

impl TryFrom<&FetchResponse> for FactRecord {
    type Error = FetchError;

    fn try_from(response: &FetchResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            text: string_field(response, &["text"])?,
        })
    }
}

/// A random dog picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DogImage {
    pub url: String,
}

impl TryFrom<&FetchResponse> for DogImage {
    type Error = FetchError;

    fn try_from(response: &FetchResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            url: string_field(response, &["message"])?,
        })
    }
}

/// Current bitcoin price in USD, as formatted by the provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitcoinPrice {
    pub rate: String,
}

impl TryFrom<&FetchResponse> for BitcoinPrice {
    type Error = FetchError;

    fn try_from(response: &FetchResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            rate: string_field(response, &["bpi", "USD", "rate"])?,
        })
    }
}

/// Nationwide covid counters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CovidStatus {
    pub infected: String,
    pub recovered: String,
    pub died: String,
    pub infected_today: String,
    pub recovered_today: String,
    pub died_today: String,
}

impl TryFrom<&FetchResponse> for CovidStatus {
    type Error = FetchError;

    fn try_from(response: &FetchResponse) -> Result<Self, Self::Error> {
        Ok(Self {
            infected: counter_field(response, "infected")?,
            recovered: counter_field(response, "recovered")?,
            died: counter_field(response, "died")?,
            infected_today: counter_field(response, "infectedToday")?,
            recovered_today: counter_field(response, "recoveredToday")?,
            died_today: counter_field(response, "diedToday")?,
        })
    }
}

/// Image URL of a cat saying `word`, `size` pixels tall.
pub fn cat_image_url(base: &str, word: &str, size: i64) -> String {
    format!(
        "{}/cat/says/{}?size={}",
        base.trim_end_matches('/'),
        urlencoding::encode(word),
        size
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ok(body: Value) -> FetchResponse {
        FetchResponse { status: 200, body }
    }

    #[test]
    fn test_nested_field() {
        let response = ok(json!({ "bpi": { "USD": { "rate": "43,210.55" } } }));
        let price = BitcoinPrice::try_from(&response).unwrap();
        assert_eq!(price.rate, "43,210.55");
    }

    #[test]
    fn test_missing_field_names_path() {
        let response = ok(json!({ "bpi": { "EUR": { "rate": "1" } } }));
        let err = BitcoinPrice::try_from(&response).unwrap_err();
        assert!(matches!(err, FetchError::MissingField { status: 200, ref field } if field == "bpi.USD.rate"));
    }

    #[test]
    fn test_wrong_type_is_an_error() {
        let response = ok(json!({ "text": 42 }));
        assert!(FactRecord::try_from(&response).is_err());
    }

    #[test]
    fn test_covid_accepts_numbers_and_strings() {
        let response = ok(json!({
            "infected": 11_526_000,
            "recovered": "10,600,000",
            "died": 43_186,
            "infectedToday": 0,
            "recoveredToday": 12,
            "diedToday": "0",
            "sourceUrl": "ignored"
        }));
        let status = CovidStatus::try_from(&response).unwrap();
        assert_eq!(status.infected, "11526000");
        assert_eq!(status.recovered, "10,600,000");
        assert_eq!(status.died_today, "0");
    }

    #[test]
    fn test_cat_url_encodes_word() {
        assert_eq!(
            cat_image_url("https://cataas.com/", "hello world", 300),
            "https://cataas.com/cat/says/hello%20world?size=300"
        );
    }
}
