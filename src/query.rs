use serde::{Deserialize, Serialize};

use crate::error::SearchError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CabinClass {
    Economy,
    PremiumEconomy,
    Business,
    First,
}

impl CabinClass {
    pub fn from_str_loose(s: &str) -> Result<Self, SearchError> {
        match s {
            "economy" => Ok(Self::Economy),
            "premium-economy" | "premium_economy" => Ok(Self::PremiumEconomy),
            "business" => Ok(Self::Business),
            "first" => Ok(Self::First),
            _ => Err(SearchError::Validation(format!("invalid cabin class: {s}"))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Economy => "economy",
            Self::PremiumEconomy => "premium_economy",
            Self::Business => "business",
            Self::First => "first",
        }
    }
}

mod return_date {
    use serde::{Deserialize, Deserializer, Serializer};

    // The wire shape carries returnDate as a plain string, empty when absent.
    pub fn serialize<S: Serializer>(v: &Option<String>, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(v.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<String>, D::Error> {
        let s = String::deserialize(d)?;
        Ok(if s.is_empty() { None } else { Some(s) })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchParams {
    pub origin: String,
    pub destination: String,
    pub depart_date: String,
    #[serde(with = "return_date")]
    pub return_date: Option<String>,
    pub passengers: u32,
    pub cabin_class: CabinClass,
}

fn validate_airport(code: &str) -> Result<(), SearchError> {
    if code.len() != 3 || !code.chars().all(|c| c.is_ascii_uppercase()) {
        return Err(SearchError::InvalidAirport(code.to_string()));
    }
    Ok(())
}

fn days_in_month(year: u32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 => {
            if (year % 4 == 0 && year % 100 != 0) || year % 400 == 0 {
                29
            } else {
                28
            }
        }
        _ => 0,
    }
}

fn parse_date(date: &str) -> Result<(u32, u32, u32), SearchError> {
    let parts: Vec<&str> = date.split('-').collect();
    if parts.len() != 3 {
        return Err(SearchError::InvalidDate(date.to_string()));
    }
    let year: u32 = parts[0]
        .parse()
        .map_err(|_| SearchError::InvalidDate(date.to_string()))?;
    let month: u32 = parts[1]
        .parse()
        .map_err(|_| SearchError::InvalidDate(date.to_string()))?;
    let day: u32 = parts[2]
        .parse()
        .map_err(|_| SearchError::InvalidDate(date.to_string()))?;

    if year < 2000 || !(1..=12).contains(&month) {
        return Err(SearchError::InvalidDate(date.to_string()));
    }

    if day < 1 || day > days_in_month(year, month) {
        return Err(SearchError::InvalidDate(date.to_string()));
    }

    Ok((year, month, day))
}

impl SearchParams {
    pub fn validate(&self) -> Result<(), SearchError> {
        validate_airport(&self.origin)?;
        validate_airport(&self.destination)?;
        let depart = parse_date(&self.depart_date)?;

        if let Some(ref ret) = self.return_date {
            let ret = parse_date(ret)?;
            if ret < depart {
                return Err(SearchError::Validation(
                    "return date cannot be earlier than departure date".into(),
                ));
            }
        }

        if self.passengers == 0 {
            return Err(SearchError::Validation(
                "at least one passenger required".into(),
            ));
        }

        if self.passengers > 9 {
            return Err(SearchError::Validation(format!(
                "passengers ({}) exceeds maximum of 9",
                self.passengers
            )));
        }

        Ok(())
    }

    pub fn to_url_params(&self) -> Vec<(String, String)> {
        vec![
            ("origin".to_string(), self.origin.clone()),
            ("destination".to_string(), self.destination.clone()),
            ("departDate".to_string(), self.depart_date.clone()),
            (
                "returnDate".to_string(),
                self.return_date.clone().unwrap_or_default(),
            ),
            ("passengers".to_string(), self.passengers.to_string()),
            ("cabinClass".to_string(), self.cabin_class.as_str().to_string()),
        ]
    }

    pub fn from_url_params(params: &[(String, String)]) -> Result<Self, SearchError> {
        let get = |key: &str| {
            params
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        let origin = get("origin")
            .ok_or_else(|| SearchError::Validation("missing origin parameter".into()))?;
        let destination = get("destination")
            .ok_or_else(|| SearchError::Validation("missing destination parameter".into()))?;
        let depart_date = get("departDate")
            .ok_or_else(|| SearchError::Validation("missing departDate parameter".into()))?;

        let return_date = match get("returnDate") {
            Some("") | None => None,
            Some(d) => Some(d.to_string()),
        };

        let passengers = get("passengers")
            .and_then(|v| v.parse().ok())
            .filter(|&n| n >= 1)
            .unwrap_or(1);

        let cabin_class = get("cabinClass")
            .and_then(|v| CabinClass::from_str_loose(v).ok())
            .unwrap_or(CabinClass::Economy);

        Ok(Self {
            origin: origin.to_string(),
            destination: destination.to_string(),
            depart_date: depart_date.to_string(),
            return_date,
            passengers,
            cabin_class,
        })
    }

    pub fn to_query_string(&self) -> String {
        self.to_url_params()
            .iter()
            .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
            .collect::<Vec<_>>()
            .join("&")
    }
}

pub fn parse_query_string(qs: &str) -> Vec<(String, String)> {
    qs.trim_start_matches('?')
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((k, v)) => (decode_component(k), decode_component(v)),
            None => (decode_component(pair), String::new()),
        })
        .collect()
}

fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

fn decode_component(s: &str) -> String {
    let mut out = Vec::with_capacity(s.len());
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'%' if i + 2 < bytes.len() => {
                match s.get(i + 1..i + 3).and_then(|h| u8::from_str_radix(h, 16).ok()) {
                    Some(b) => {
                        out.push(b);
                        i += 3;
                    }
                    None => {
                        out.push(b'%');
                        i += 1;
                    }
                }
            }
            b'+' => {
                out.push(b' ');
                i += 1;
            }
            b => {
                out.push(b);
                i += 1;
            }
        }
    }
    String::from_utf8_lossy(&out).into_owned()
}
