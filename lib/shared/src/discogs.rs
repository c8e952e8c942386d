use std::fmt;
use std::str::FromStr;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// How to pick one master when a search returns several.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Always take the first search result.
    #[default]
    First,
    /// Ask the disambiguator when there is more than one result.
    Prompt,
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "first" => Ok(Strategy::First),
            "prompt" => Ok(Strategy::Prompt),
            other => Err(format!("unknown strategy '{other}', expected 'first' or 'prompt'")),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::First => f.write_str("first"),
            Strategy::Prompt => f.write_str("prompt"),
        }
    }
}

/// A request for one cover image.
///
/// A non-blank `release_id` takes precedence; otherwise both `artist` and
/// `title` must be set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResolutionRequest {
    pub artist: Option<String>,
    pub title: Option<String>,
    pub release_id: Option<String>,
    #[serde(default)]
    pub strategy: Strategy,
}

impl ResolutionRequest {
    pub fn search(artist: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            artist: Some(artist.into()),
            title: Some(title.into()),
            ..Default::default()
        }
    }

    pub fn release(release_id: impl Into<String>) -> Self {
        Self {
            release_id: Some(release_id.into()),
            ..Default::default()
        }
    }

    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// The release identifier, if one was given and is not blank.
    pub fn release_id(&self) -> Option<&str> {
        self.release_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    Primary,
    Secondary,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Image {
    pub uri: String,
    #[serde(rename = "type")]
    pub kind: ImageType,
}

impl Image {
    pub fn is_primary(&self) -> bool {
        self.kind == ImageType::Primary
    }
}

// One candidate master from `/database/search`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub cover_image: String,
    pub resource_url: String,
    #[serde(default, deserialize_with = "deserialize_year")]
    pub year: Option<String>,
}

impl SearchResult {
    /// Text shown to whoever picks between several results: the title,
    /// followed by the release year in parentheses when Discogs reports one.
    pub fn label(&self) -> String {
        match &self.year {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SearchResponse {
    #[serde(default)]
    pub results: Vec<SearchResult>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct MasterRelease {
    #[serde(default)]
    pub images: Vec<Image>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Release {
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub master_id: Option<u64>,
    #[serde(default)]
    pub master_url: Option<String>,
}

impl Release {
    /// The master URL, but only when the release also carries a master id.
    pub fn master_url(&self) -> Option<&str> {
        match (self.master_id, self.master_url.as_deref()) {
            (Some(_), Some(url)) if !url.is_empty() => Some(url),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCover {
    pub image_uri: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Candidate {
    pub label: String,
}

impl From<&SearchResult> for Candidate {
    fn from(result: &SearchResult) -> Self {
        Candidate {
            label: result.label(),
        }
    }
}

// Discogs sends `year` as a string in search results, but a number elsewhere
fn deserialize_year<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    struct YearVisitor;

    impl<'de> Visitor<'de> for YearVisitor {
        type Value = Option<String>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a year as a string or an integer")
        }

        fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let value = value.trim();
            Ok((!value.is_empty() && value != "0").then(|| value.to_string()))
        }

        fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok((value != 0).then(|| value.to_string()))
        }

        fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok((value > 0).then(|| value.to_string()))
        }

        fn visit_none<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }

        fn visit_unit<E>(self) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            Ok(None)
        }
    }

    deserializer.deserialize_any(YearVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn search_result_accepts_string_or_numeric_year() {
        let from_string: SearchResult = serde_json::from_value(json!({
            "id": 1,
            "title": "Radiohead - OK Computer",
            "cover_image": "http://img/ok.jpg",
            "resource_url": "http://api/masters/1",
            "year": "1997"
        }))
        .unwrap();
        let from_number: SearchResult = serde_json::from_value(json!({
            "id": 1,
            "title": "Radiohead - OK Computer",
            "cover_image": "http://img/ok.jpg",
            "resource_url": "http://api/masters/1",
            "year": 1997
        }))
        .unwrap();

        assert_eq!(from_string.year.as_deref(), Some("1997"));
        assert_eq!(from_string, from_number);
        assert_eq!(from_string.label(), "Radiohead - OK Computer (1997)");
    }

    #[test]
    fn search_result_without_year_or_cover() {
        let result: SearchResult = serde_json::from_value(json!({
            "id": 7,
            "title": "Artist - Album",
            "resource_url": "http://api/masters/7",
            "year": null
        }))
        .unwrap();

        assert_eq!(result.year, None);
        assert_eq!(result.cover_image, "");
        assert_eq!(result.label(), "Artist - Album");
    }

    #[test]
    fn unknown_image_types_do_not_fail() {
        let master: MasterRelease = serde_json::from_value(json!({
            "images": [
                { "uri": "http://img/a.jpg", "type": "secondary" },
                { "uri": "http://img/b.jpg", "type": "thumbnail" },
                { "uri": "http://img/c.jpg", "type": "primary", "width": 600 }
            ]
        }))
        .unwrap();

        let kinds: Vec<_> = master.images.iter().map(|i| i.kind).collect();
        assert_eq!(
            kinds,
            vec![ImageType::Secondary, ImageType::Other, ImageType::Primary]
        );
        assert!(master.images[2].is_primary());
    }

    #[test]
    fn release_master_url_requires_both_fields() {
        let with_both: Release = serde_json::from_value(json!({
            "master_id": 123,
            "master_url": "http://api/masters/123",
            "images": []
        }))
        .unwrap();
        let url_only: Release = serde_json::from_value(json!({
            "master_url": "http://api/masters/123"
        }))
        .unwrap();

        assert_eq!(with_both.master_url(), Some("http://api/masters/123"));
        assert_eq!(url_only.master_url(), None);
        assert!(url_only.images.is_empty());
    }

    #[test]
    fn empty_search_response() {
        let response: SearchResponse = serde_json::from_value(json!({})).unwrap();
        assert!(response.results.is_empty());
    }

    #[test]
    fn strategy_parsing() {
        assert_eq!("first".parse::<Strategy>(), Ok(Strategy::First));
        assert_eq!(" Prompt ".parse::<Strategy>(), Ok(Strategy::Prompt));
        assert!("ask".parse::<Strategy>().is_err());
        assert_eq!(Strategy::default(), Strategy::First);
    }

    #[test]
    fn blank_release_id_is_treated_as_absent() {
        let blank = ResolutionRequest {
            release_id: Some("   ".into()),
            ..ResolutionRequest::search("A", "B")
        };
        assert_eq!(blank.release_id(), None);
        assert_eq!(ResolutionRequest::release(" r42 ").release_id(), Some("r42"));
    }
}
