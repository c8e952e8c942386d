pub mod discogs;
