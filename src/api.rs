use crate::config::Config;
use crate::error::CatalogError;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::time::Duration;
use tracing::{debug, warn};

/// Genre or tag attached to a game in a catalog response.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ItemFacet {
    #[serde(default)]
    pub id: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub slug: String,
}

/// A single game as returned by the catalog.
///
/// Only `id` is structurally required by the grid; every other field may be
/// absent or null in a response and is rendered with a placeholder instead.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct CatalogItem {
    #[serde(default)]
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub background_image: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub released: Option<String>,
    #[serde(default)]
    pub metacritic: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub genres: Vec<ItemFacet>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<ItemFacet>,
}

pub const UNTITLED: &str = "Untitled game";

impl CatalogItem {
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.trim().is_empty() => name,
            _ => UNTITLED,
        }
    }

    pub fn rating_label(&self) -> String {
        match self.rating {
            Some(r) => format!("{:.2}", r),
            None => "–".to_string(),
        }
    }

    /// Release date, when the catalog sent a well-formed `YYYY-MM-DD`.
    pub fn released_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(self.released.as_deref()?.trim(), "%Y-%m-%d").ok()
    }

    /// Release date for display. Unparseable values are shown as sent.
    pub fn released_label(&self) -> Option<String> {
        match (self.released_date(), self.released.as_deref()) {
            (Some(date), _) => Some(date.format("%b %-d, %Y").to_string()),
            (None, Some(raw)) if !raw.trim().is_empty() => Some(raw.trim().to_string()),
            _ => None,
        }
    }
}

/// One page of results. Replaced wholesale on every fetch.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResultPage {
    pub items: Vec<CatalogItem>,
    pub total: u64,
}

/// Parameters of a single `/games` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameQuery {
    pub page: u32,
    pub page_size: u32,
    pub search: String,
    /// Comma-joined genre names.
    pub genres: String,
    /// Comma-joined tag names.
    pub tags: String,
}

impl GameQuery {
    /// Query-string pairs; empty optional parameters are left out.
    pub fn params(&self, api_key: Option<&str>) -> Vec<(&'static str, String)> {
        let mut params = Vec::with_capacity(6);
        if let Some(key) = api_key.filter(|k| !k.is_empty()) {
            params.push(("key", key.to_string()));
        }
        params.push(("page", self.page.to_string()));
        params.push(("page_size", self.page_size.to_string()));
        for (name, value) in [("search", &self.search), ("genres", &self.genres), ("tags", &self.tags)] {
            if !value.is_empty() {
                params.push((name, value.clone()));
            }
        }
        params
    }
}

#[derive(Deserialize)]
struct GamesEnvelope {
    #[serde(default)]
    count: Option<u64>,
    #[serde(default)]
    results: Option<Vec<serde_json::Value>>,
}

/// Parse a `/games` response body.
///
/// A body that is not JSON or has no `results` array is malformed. A single
/// result that does not fit `CatalogItem` keeps its id (if any) and falls back
/// to placeholders so that one bad entry cannot blank the grid.
pub fn parse_results(body: &str) -> Result<ResultPage, CatalogError> {
    let envelope: GamesEnvelope =
        serde_json::from_str(body).map_err(|e| CatalogError::MalformedResponse(e.to_string()))?;
    let raw = envelope
        .results
        .ok_or_else(|| CatalogError::MalformedResponse("missing `results` array".to_string()))?;

    if raw.is_empty() {
        return Err(CatalogError::EmptyResult);
    }

    let items: Vec<CatalogItem> = raw
        .into_iter()
        .map(|value| match serde_json::from_value::<CatalogItem>(value.clone()) {
            Ok(item) => item,
            Err(e) => {
                let id = value.get("id").and_then(|v| v.as_u64()).unwrap_or_default();
                warn!(id, error = %e, "catalog item did not match schema, using placeholders");
                CatalogItem { id, ..CatalogItem::default() }
            }
        })
        .collect();

    let total = envelope.count.unwrap_or(items.len() as u64);
    Ok(ResultPage { items, total })
}

fn error_detail(body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["error", "detail", "message"] {
            if let Some(msg) = value.get(key).and_then(|v| v.as_str()) {
                return msg.to_string();
            }
        }
    }
    body.trim().chars().take(200).collect()
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// HTTP client for the remote game catalog.
#[derive(Clone)]
pub struct CatalogClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl CatalogClient {
    pub fn new(config: &Config) -> Result<Self, CatalogError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
        })
    }

    pub fn games_url(&self) -> String {
        format!("{}/games", self.base_url)
    }

    /// Fetch one page of games.
    pub async fn get_games(&self, query: &GameQuery) -> Result<ResultPage, CatalogError> {
        debug!(
            page = query.page,
            search = %query.search,
            genres = %query.genres,
            tags = %query.tags,
            "requesting games"
        );
        let response = self
            .http
            .get(self.games_url())
            .query(&query.params(self.api_key.as_deref()))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(CatalogError::Status {
                status: status.as_u16(),
                message: error_detail(&body),
            });
        }
        parse_results(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query() -> GameQuery {
        GameQuery {
            page: 2,
            page_size: 40,
            search: String::new(),
            genres: "Action,Indie".to_string(),
            tags: String::new(),
        }
    }

    #[test]
    fn test_params_skip_empty_values() {
        let params = query().params(None);
        assert_eq!(
            params,
            vec![
                ("page", "2".to_string()),
                ("page_size", "40".to_string()),
                ("genres", "Action,Indie".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_include_key_first() {
        let params = query().params(Some("secret"));
        assert_eq!(params[0], ("key", "secret".to_string()));
        assert!(query().params(Some("")).iter().all(|(k, _)| *k != "key"));
    }

    #[test]
    fn test_parse_results_full_item() {
        let body = r#"{
            "count": 812,
            "next": "https://api.example/games?page=2",
            "results": [{
                "id": 3498,
                "name": "Grand Theft Auto V",
                "background_image": "https://media.example/gta5.jpg",
                "rating": 4.47,
                "released": "2013-09-17",
                "metacritic": 92,
                "genres": [{"id": 4, "name": "Action", "slug": "action", "games_count": 1}],
                "tags": [{"id": 31, "name": "Singleplayer", "slug": "singleplayer", "language": "eng"}]
            }]
        }"#;
        let page = parse_results(body).unwrap();
        assert_eq!(page.total, 812);
        assert_eq!(page.items.len(), 1);
        let item = &page.items[0];
        assert_eq!(item.id, 3498);
        assert_eq!(item.display_name(), "Grand Theft Auto V");
        assert_eq!(item.rating, Some(4.47));
        assert_eq!(item.released_date(), NaiveDate::from_ymd_opt(2013, 9, 17));
        assert_eq!(item.released_label().as_deref(), Some("Sep 17, 2013"));
        assert_eq!(item.genres[0].name, "Action");
        assert_eq!(item.tags[0].slug, "singleplayer");
    }

    #[test]
    fn test_parse_results_missing_fields_use_placeholders() {
        let body = r#"{"results": [{"id": 7, "background_image": null, "genres": null}]}"#;
        let page = parse_results(body).unwrap();
        let item = &page.items[0];
        assert_eq!(item.display_name(), UNTITLED);
        assert!(item.background_image.is_none());
        assert!(item.genres.is_empty());
        assert_eq!(item.rating_label(), "–");
        assert_eq!(page.total, 1);
    }

    #[test]
    fn test_released_label_falls_back_to_raw_value() {
        let tba = CatalogItem { id: 1, released: Some("TBA".to_string()), ..CatalogItem::default() };
        assert_eq!(tba.released_date(), None);
        assert_eq!(tba.released_label().as_deref(), Some("TBA"));

        let blank = CatalogItem { id: 2, released: Some("  ".to_string()), ..CatalogItem::default() };
        assert_eq!(blank.released_label(), None);
        assert_eq!(CatalogItem::default().released_label(), None);
    }

    #[test]
    fn test_parse_results_bad_item_keeps_id() {
        let body = r#"{"count": 2, "results": [{"id": 1, "name": 42}, {"id": 2, "name": "Ok"}]}"#;
        let page = parse_results(body).unwrap();
        assert_eq!(page.items[0].id, 1);
        assert_eq!(page.items[0].display_name(), UNTITLED);
        assert_eq!(page.items[1].display_name(), "Ok");
    }

    #[test]
    fn test_parse_results_empty_is_empty_result() {
        let err = parse_results(r#"{"count": 0, "results": []}"#).unwrap_err();
        assert!(matches!(err, CatalogError::EmptyResult));
    }

    #[test]
    fn test_parse_results_malformed() {
        let err = parse_results(r#"{"count": 3}"#).unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse(_)));

        let err = parse_results("<html>gateway</html>").unwrap_err();
        assert!(matches!(err, CatalogError::MalformedResponse(_)));
    }

    #[test]
    fn test_error_detail_prefers_json_field() {
        assert_eq!(error_detail(r#"{"error": "The key parameter is not provided"}"#), "The key parameter is not provided");
        assert_eq!(error_detail("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn test_catalog_item_json_round_trip() {
        let item = CatalogItem {
            id: 28,
            name: Some("Red Dead Redemption 2".to_string()),
            background_image: None,
            rating: Some(4.59),
            released: Some("2018-10-26".to_string()),
            metacritic: Some(96),
            genres: vec![ItemFacet { id: 4, name: "Action".to_string(), slug: "action".to_string() }],
            tags: Vec::new(),
        };
        let json = serde_json::to_string(&item).unwrap();
        let back: CatalogItem = serde_json::from_str(&json).unwrap();
        assert_eq!(back, item);
    }
}
