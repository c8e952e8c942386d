mod client;

pub use client::{DiscogsClient, DiscogsClientBuilder};

/// Public Discogs API root.
pub const DISCOGS_API_URL: &str = "https://api.discogs.com";

/// Filename Discogs serves when a release has no artwork.
pub const PLACEHOLDER_IMAGE: &str = "default-release.png";
