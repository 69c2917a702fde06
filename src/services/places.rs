use reqwest::header::USER_AGENT;
use serde::Deserialize;
use tracing::warn;
use url::Url;

use crate::error::AppError;

const RESULT_LIMIT: usize = 8;
const NAME_LIMIT: usize = 50;

/// Terms that mark a geocoder hit as lodging rather than a street or a
/// train station.
const LODGING_WORDS: &[&str] = &["hotel", "hostel", "resort", "inn", "lodge", "pension"];

#[derive(Debug, Clone)]
pub struct PlaceResult {
    pub name: String,
    pub address: String,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub kind: String,
    pub city: String,
}

/// Outcome of a lodging search. A broken or empty lookup carries a soft
/// message for the form instead of an error.
#[derive(Debug, Clone, Default)]
pub struct PlaceSearch {
    pub results: Vec<PlaceResult>,
    pub message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawPlace {
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    class: Option<String>,
    #[serde(default)]
    extratags: Option<RawExtraTags>,
}

#[derive(Debug, Default, Deserialize)]
struct RawExtraTags {
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    website: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Free-text lodging search against a Nominatim-style endpoint. One GET per
/// query, no retry, no cancellation; failures degrade to an empty list.
#[derive(Debug, Clone)]
pub struct PlaceLookup {
    client: reqwest::Client,
    base_url: String,
    user_agent: String,
}

impl PlaceLookup {
    pub fn new(base_url: String, user_agent: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url,
            user_agent,
        }
    }

    pub async fn search(&self, query: &str) -> PlaceSearch {
        let query = query.trim();
        if query.chars().count() < 3 {
            return PlaceSearch::default();
        }
        match self.fetch(query).await {
            Ok(results) if results.is_empty() => PlaceSearch {
                results,
                message: Some(
                    "No accommodations found. You can fill in the details by hand.".to_string(),
                ),
            },
            Ok(results) => PlaceSearch {
                results,
                message: None,
            },
            Err(err) => {
                warn!("place lookup failed: {err}");
                PlaceSearch {
                    results: Vec::new(),
                    message: Some(
                        "Place lookup failed. You can fill in the details by hand.".to_string(),
                    ),
                }
            }
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<PlaceResult>, AppError> {
        let url = Url::parse_with_params(
            &self.base_url,
            [
                ("q", format!("{query} hotel")),
                ("format", "json".to_string()),
                ("limit", "10".to_string()),
                ("addressdetails", "1".to_string()),
                ("extratags", "1".to_string()),
            ],
        )
        .map_err(|err| AppError::Config(format!("invalid places url: {err}")))?;

        let body = self
            .client
            .get(url)
            .header(USER_AGENT, &self.user_agent)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        reduce_places(&body).map_err(|err| AppError::Other(err.into()))
    }
}

/// Reduces a raw geocoder response to lodging candidates: filter by the
/// lodging heuristics, keep at most eight, map to `PlaceResult`.
pub fn reduce_places(body: &str) -> Result<Vec<PlaceResult>, serde_json::Error> {
    let places: Vec<RawPlace> = serde_json::from_str(body)?;
    Ok(places
        .iter()
        .filter(|place| looks_like_lodging(place))
        .take(RESULT_LIMIT)
        .map(PlaceResult::from_raw)
        .collect())
}

fn looks_like_lodging(place: &RawPlace) -> bool {
    let name = place.display_name.to_lowercase();
    let kind = place.kind.as_deref().unwrap_or_default().to_lowercase();
    let class = place.class.as_deref().unwrap_or_default().to_lowercase();

    kind.contains("hotel")
        || kind.contains("hostel")
        || kind.contains("guest")
        || class.contains("tourism")
        || LODGING_WORDS.iter().any(|word| name.contains(word))
}

impl PlaceResult {
    fn from_raw(place: &RawPlace) -> Self {
        let first_segment = place
            .display_name
            .split(',')
            .next()
            .unwrap_or_default()
            .trim()
            .to_string();

        let mut name = place
            .name
            .clone()
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| first_segment.clone());
        if name.is_empty() {
            name = "Hotel".to_string();
        }
        if name.chars().count() > NAME_LIMIT {
            name = if first_segment.is_empty() {
                name.chars().take(NAME_LIMIT).collect()
            } else {
                first_segment.clone()
            };
        }

        let lowered = place.display_name.to_lowercase();
        let kind = if lowered.contains("hostel") {
            "Hostel"
        } else if lowered.contains("resort") {
            "Resort"
        } else if lowered.contains("inn") {
            "Inn"
        } else if lowered.contains("lodge") {
            "Lodge"
        } else if lowered.contains("pension") {
            "Pension"
        } else {
            "Hotel"
        };

        let segments: Vec<&str> = place.display_name.split(',').map(str::trim).collect();
        let city = if segments.len() >= 3 {
            segments[segments.len() - 3].to_string()
        } else {
            segments.get(1).copied().unwrap_or_default().to_string()
        };

        let tags = place.extratags.as_ref();
        Self {
            name,
            address: place.display_name.clone(),
            phone: tags
                .and_then(|t| t.phone.clone())
                .filter(|value| !value.is_empty()),
            website: tags
                .and_then(|t| t.website.clone().or_else(|| t.url.clone()))
                .filter(|value| !value.is_empty()),
            kind: kind.to_string(),
            city,
        }
    }
}
