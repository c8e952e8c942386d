//! Turns an artist/title pair or a release identifier into one cover image.

use std::sync::{Arc, LazyLock};

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use regex::Regex;
use serde::de::DeserializeOwned;
use shared::discogs::{
    Candidate, Image, MasterRelease, Release, ResolutionRequest, ResolvedCover, SearchResponse,
    SearchResult, Strategy,
};
use tracing::{debug, info};
use url::Url;

use crate::{
    discogs::{DISCOGS_API_URL, PLACEHOLDER_IMAGE},
    disambiguate::FirstCandidate,
    error::{CoverError, Result},
    traits::{ApiClient, Disambiguator},
};

/// Same character set `encodeURIComponent` leaves alone.
const QUERY_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

static DIGIT_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[0-9]+").expect("digit pattern is valid"));

/// Extracts the first run of ASCII digits, e.g. `"[r12345]"` -> `"12345"`.
pub fn parse_release_id(raw: &str) -> Option<&str> {
    DIGIT_RUN.find(raw).map(|m| m.as_str())
}

/// Name of the query parameter carrying the album title in searches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TitleParam {
    #[default]
    Title,
    ReleaseTitle,
}

impl TitleParam {
    pub fn as_str(&self) -> &'static str {
        match self {
            TitleParam::Title => "title",
            TitleParam::ReleaseTitle => "release_title",
        }
    }
}

/// A resolved cover together with its downloaded bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverImage {
    pub image_uri: String,
    pub bytes: Vec<u8>,
}

pub struct Resolver {
    client: Arc<dyn ApiClient>,
    disambiguator: Arc<dyn Disambiguator>,
    api_base: String,
    skip_placeholder: bool,
    title_param: TitleParam,
}

impl Resolver {
    pub fn builder() -> ResolverBuilder {
        ResolverBuilder::new()
    }

    /// Resolves `request` to a single image URI.
    ///
    /// Network calls happen in order (search or release, then master) and
    /// every failure aborts the resolution.
    pub async fn resolve(&self, request: &ResolutionRequest, token: &str) -> Result<ResolvedCover> {
        if token.trim().is_empty() {
            return Err(CoverError::MissingCredential);
        }

        let image_uri = match request.release_id() {
            Some(raw) => self.resolve_release(raw, token).await?,
            None => self.resolve_search(request, token).await?,
        };

        info!("Resolved cover image: {image_uri}");
        Ok(ResolvedCover { image_uri })
    }

    /// Resolves `request` and downloads the image it points to.
    pub async fn fetch_cover(&self, request: &ResolutionRequest, token: &str) -> Result<CoverImage> {
        let cover = self.resolve(request, token).await?;
        let bytes = self.client.fetch_bytes(&cover.image_uri).await?;
        debug!("Downloaded {} bytes from {}", bytes.len(), cover.image_uri);
        Ok(CoverImage {
            image_uri: cover.image_uri,
            bytes,
        })
    }

    async fn resolve_release(&self, raw: &str, token: &str) -> Result<String> {
        let id = parse_release_id(raw)
            .ok_or_else(|| CoverError::InvalidIdentifierFormat(raw.to_string()))?;
        info!("Looking up release {id}");

        let release: Release = self
            .fetch(&format!("{}/releases/{id}", self.api_base), token)
            .await?;

        if let Some(master_url) = release.master_url() {
            let master: MasterRelease = self.fetch(master_url, token).await?;
            if let Some(uri) = self.primary_image(&master.images) {
                return Ok(uri.to_string());
            }
            debug!("Master of release {id} has no primary image, using the release's own");
        }

        self.primary_image(&release.images)
            .map(str::to_string)
            .ok_or_else(|| CoverError::NoPrimaryImage(format!("release {id}")))
    }

    async fn resolve_search(&self, request: &ResolutionRequest, token: &str) -> Result<String> {
        let artist = request.artist.as_deref().map(str::trim).unwrap_or_default();
        let title = request.title.as_deref().map(str::trim).unwrap_or_default();
        if artist.is_empty() || title.is_empty() {
            return Err(CoverError::MissingSearchTerms);
        }
        info!("Searching masters for '{artist} - {title}'");

        let search_url = format!(
            "{}/database/search?type=master&artist={}&{}={}",
            self.api_base,
            utf8_percent_encode(artist, QUERY_COMPONENT),
            self.title_param.as_str(),
            utf8_percent_encode(title, QUERY_COMPONENT),
        );
        let response: SearchResponse = self.fetch(&search_url, token).await?;
        if response.results.is_empty() {
            return Err(CoverError::NoResultsFound {
                artist: artist.to_string(),
                title: title.to_string(),
            });
        }

        let selected = self.select(&response.results, request.strategy).await?;
        debug!("Selected '{}' ({})", selected.title, selected.resource_url);

        let master: MasterRelease = self.fetch(&selected.resource_url, token).await?;
        if let Some(uri) = self.primary_image(&master.images) {
            return Ok(uri.to_string());
        }
        if self.is_usable(&selected.cover_image) {
            debug!("No primary image on master, falling back to search cover");
            return Ok(selected.cover_image.clone());
        }

        Err(CoverError::NoPrimaryImage(format!(
            "\"{artist} - {title}\" (master {})",
            selected.id
        )))
    }

    async fn select<'a>(
        &self,
        results: &'a [SearchResult],
        strategy: Strategy,
    ) -> Result<&'a SearchResult> {
        if results.len() == 1 || strategy == Strategy::First {
            return Ok(&results[0]);
        }

        let candidates: Vec<Candidate> = results.iter().map(Candidate::from).collect();
        debug!(
            "Asking {} disambiguator to choose among {} results",
            self.disambiguator.name(),
            candidates.len()
        );
        let index = self.disambiguator.choose_one(&candidates).await?;
        results
            .get(index)
            .ok_or_else(|| CoverError::InvalidChoice((index + 1).to_string()))
    }

    async fn fetch<T: DeserializeOwned>(&self, url: &str, token: &str) -> Result<T> {
        let value = self.client.fetch_json(url, token).await?;
        serde_json::from_value(value).map_err(|source| CoverError::Decode {
            url: url.to_string(),
            source,
        })
    }

    fn primary_image<'a>(&self, images: &'a [Image]) -> Option<&'a str> {
        images
            .iter()
            .filter(|image| image.is_primary())
            .map(|image| image.uri.as_str())
            .find(|uri| self.is_usable(uri))
    }

    fn is_usable(&self, uri: &str) -> bool {
        !uri.is_empty() && !(self.skip_placeholder && uri.contains(PLACEHOLDER_IMAGE))
    }
}

pub struct ResolverBuilder {
    client: Option<Arc<dyn ApiClient>>,
    disambiguator: Option<Arc<dyn Disambiguator>>,
    api_base: Option<String>,
    skip_placeholder: bool,
    title_param: TitleParam,
}

impl ResolverBuilder {
    pub fn new() -> Self {
        Self {
            client: None,
            disambiguator: None,
            api_base: None,
            skip_placeholder: false,
            title_param: TitleParam::default(),
        }
    }

    pub fn client(mut self, client: Arc<dyn ApiClient>) -> Self {
        self.client = Some(client);
        self
    }

    pub fn disambiguator(mut self, disambiguator: Arc<dyn Disambiguator>) -> Self {
        self.disambiguator = Some(disambiguator);
        self
    }

    pub fn api_base(mut self, url: &str) -> Self {
        self.api_base = Some(url.to_string());
        self
    }

    /// Treat Discogs' placeholder artwork as if no image was present.
    pub fn skip_placeholder(mut self, skip: bool) -> Self {
        self.skip_placeholder = skip;
        self
    }

    pub fn title_param(mut self, param: TitleParam) -> Self {
        self.title_param = param;
        self
    }

    pub fn build(self) -> Result<Resolver> {
        let client = self.client.ok_or(CoverError::NotConfigured("API client"))?;
        let api_base = self
            .api_base
            .unwrap_or_else(|| DISCOGS_API_URL.to_string());
        let api_base = Url::parse(api_base.trim_end_matches('/'))?
            .as_str()
            .trim_end_matches('/')
            .to_string();

        Ok(Resolver {
            client,
            disambiguator: self
                .disambiguator
                .unwrap_or_else(|| Arc::new(FirstCandidate)),
            api_base,
            skip_placeholder: self.skip_placeholder,
            title_param: self.title_param,
        })
    }
}

impl Default for ResolverBuilder {
    fn default() -> Self {
        Self::new()
    }
}
