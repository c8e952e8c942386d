pub mod disambiguate;
pub mod discogs;
pub mod error;
pub mod resolver;
pub mod traits;

pub use disambiguate::{parse_choice, FirstCandidate};
pub use discogs::{DiscogsClient, DiscogsClientBuilder};
pub use error::{CoverError, ErrorKind, Result};
pub use resolver::{CoverImage, Resolver, ResolverBuilder, TitleParam};
pub use traits::{ApiClient, Disambiguator};
