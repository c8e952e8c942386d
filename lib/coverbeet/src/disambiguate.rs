use async_trait::async_trait;
use shared::discogs::Candidate;

use crate::error::{CoverError, Result};
use crate::traits::Disambiguator;

/// Maps a 1-based selection typed by a user to a zero-based index.
///
/// The trimmed input must be an integer in `1..=count`.
pub fn parse_choice(input: &str, count: usize) -> Result<usize> {
    let trimmed = input.trim();
    match trimmed.parse::<usize>() {
        Ok(choice) if (1..=count).contains(&choice) => Ok(choice - 1),
        _ => Err(CoverError::InvalidChoice(trimmed.to_string())),
    }
}

/// Always picks the first candidate.
#[derive(Debug, Clone, Copy, Default)]
pub struct FirstCandidate;

#[async_trait]
impl Disambiguator for FirstCandidate {
    fn name(&self) -> &'static str {
        "first"
    }

    async fn choose_one(&self, candidates: &[Candidate]) -> Result<usize> {
        if candidates.is_empty() {
            return Err(CoverError::InvalidChoice(String::new()));
        }
        Ok(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("1", 3, 0)]
    #[case("2", 3, 1)]
    #[case(" 3\n", 3, 2)]
    fn test_parse_choice_valid(#[case] input: &str, #[case] count: usize, #[case] index: usize) {
        assert_eq!(parse_choice(input, count).unwrap(), index);
    }

    #[rstest]
    #[case("0")]
    #[case("4")]
    #[case("7")]
    #[case("-1")]
    #[case("abc")]
    #[case("2abc")]
    #[case("")]
    fn test_parse_choice_invalid(#[case] input: &str) {
        let err = parse_choice(input, 3).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidChoice);
    }

    #[tokio::test]
    async fn test_first_candidate() {
        let candidates = vec![
            Candidate { label: "A - One".into() },
            Candidate { label: "A - Two".into() },
        ];
        assert_eq!(FirstCandidate.choose_one(&candidates).await.unwrap(), 0);
        assert!(FirstCandidate.choose_one(&[]).await.is_err());
    }
}
