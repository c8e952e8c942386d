use std::{path::PathBuf, process::ExitCode, sync::Arc, time::Duration};

use clap::{Parser, ValueEnum};
use coverbeet::{DiscogsClient, Resolver, TitleParam};
use shared::discogs::{ResolutionRequest, Strategy};

mod config;
mod output;
mod prompt;

use config::AppConfig;
use prompt::ConsolePrompt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Take the first search result
    First,
    /// Ask which result to use when there are several
    Prompt,
}

impl From<StrategyArg> for Strategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::First => Strategy::First,
            StrategyArg::Prompt => Strategy::Prompt,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum TitleParamArg {
    Title,
    ReleaseTitle,
}

impl From<TitleParamArg> for TitleParam {
    fn from(arg: TitleParamArg) -> Self {
        match arg {
            TitleParamArg::Title => TitleParam::Title,
            TitleParamArg::ReleaseTitle => TitleParam::ReleaseTitle,
        }
    }
}

/// Download album cover art from Discogs.
///
/// Reads the access token from DISCOGS_TOKEN (a `.env` file is honoured)
/// unless --token is given.
#[derive(Debug, Parser)]
#[command(name = "discogs-cover", version = env!("CARGO_PKG_VERSION"), about)]
struct Flags {
    /// Artist name to search for
    #[clap(long, required_unless_present = "release_id", requires = "title")]
    artist: Option<String>,
    /// Album title to search for
    #[clap(long, required_unless_present = "release_id", requires = "artist")]
    title: Option<String>,
    /// Discogs release id, e.g. 12345, r12345 or [r12345]; skips the search
    #[clap(long)]
    release_id: Option<String>,
    /// Directory to save cover.jpg into (created if missing)
    #[clap(long, default_value = ".")]
    target: PathBuf,
    /// How to pick between several search results
    #[clap(long, value_enum, default_value_t = StrategyArg::Prompt)]
    strategy: StrategyArg,
    /// How many answers the prompt accepts before giving up
    #[clap(long, default_value_t = 1, value_parser = clap::value_parser!(u16).range(1..))]
    prompt_attempts: u16,
    /// Treat Discogs' placeholder artwork as no artwork
    #[clap(long)]
    skip_placeholder: bool,
    /// Query parameter used for the album title in searches
    #[clap(long, value_enum, default_value_t = TitleParamArg::Title)]
    title_param: TitleParamArg,
    /// Discogs personal access token (overrides DISCOGS_TOKEN)
    #[clap(long)]
    token: Option<String>,
    /// Per-request timeout in seconds
    #[clap(long)]
    timeout: Option<u64>,
    /// Log every request
    #[clap(short, long)]
    verbose: bool,
}

impl Flags {
    fn request(&self) -> ResolutionRequest {
        ResolutionRequest {
            artist: self.artist.clone(),
            title: self.title.clone(),
            release_id: self.release_id.clone(),
            strategy: self.strategy.into(),
        }
    }
}

async fn run(flags: Flags, config: AppConfig) -> anyhow::Result<()> {
    let token = config.token(flags.token.as_deref())?;

    let mut client = DiscogsClient::builder();
    if let Some(user_agent) = &config.user_agent {
        client = client.user_agent(user_agent);
    }
    if let Some(secs) = flags.timeout {
        client = client.timeout(Duration::from_secs(secs));
    }

    let resolver = Resolver::builder()
        .client(Arc::new(client.build()?))
        .disambiguator(Arc::new(ConsolePrompt::stdio(flags.prompt_attempts.into())))
        .api_base(&config.api_url)
        .skip_placeholder(flags.skip_placeholder || config.skip_placeholder)
        .title_param(flags.title_param.into())
        .build()?;

    let request = flags.request();
    match request.release_id() {
        Some(id) => println!("Searching for release ID \"{id}\"..."),
        None => println!(
            "Searching for \"{} - {}\"...",
            request.artist.as_deref().unwrap_or_default(),
            request.title.as_deref().unwrap_or_default()
        ),
    }

    let cover = resolver.fetch_cover(&request, &token).await?;
    let path = output::save_cover(&flags.target, &cover.bytes).await?;
    println!("Cover art successfully saved to {}", path.display());
    Ok(())
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let flags = Flags::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(if flags.verbose { "debug" } else { "warn" }),
    )
    .init();

    let config = AppConfig::from_env();

    let rt = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(err) => {
            eprintln!("Error: {err}");
            return ExitCode::FAILURE;
        }
    };

    match rt.block_on(run(flags, config)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[test]
    fn verify_cli() {
        Flags::command().debug_assert();
    }

    #[test]
    fn test_search_flags() {
        let flags = Flags::try_parse_from([
            "discogs-cover",
            "--artist",
            "Radiohead",
            "--title",
            "OK Computer",
            "--target",
            "/tmp/covers",
        ])
        .unwrap();

        assert_eq!(
            flags.request(),
            ResolutionRequest::search("Radiohead", "OK Computer").with_strategy(Strategy::Prompt)
        );
        assert_eq!(flags.target, PathBuf::from("/tmp/covers"));
        assert_eq!(flags.prompt_attempts, 1);
    }

    #[test]
    fn test_release_id_alone_is_enough() {
        let flags =
            Flags::try_parse_from(["discogs-cover", "--release-id", "[r12345]", "--strategy", "first"])
                .unwrap();

        assert_eq!(flags.request().release_id(), Some("[r12345]"));
        assert_eq!(flags.request().strategy, Strategy::First);
        assert_eq!(flags.target, PathBuf::from("."));
    }

    #[rstest]
    #[case(&["discogs-cover"])]
    #[case(&["discogs-cover", "--artist", "Radiohead"])]
    #[case(&["discogs-cover", "--title", "OK Computer"])]
    #[case(&["discogs-cover", "--release-id", "1", "--prompt-attempts", "0"])]
    #[case(&["discogs-cover", "--release-id", "1", "--strategy", "random"])]
    fn test_rejected_flags(#[case] args: &[&str]) {
        assert!(Flags::try_parse_from(args).is_err());
    }

    #[test]
    fn test_title_param_flag() {
        let flags = Flags::try_parse_from([
            "discogs-cover",
            "--release-id",
            "1",
            "--title-param",
            "release-title",
        ])
        .unwrap();

        assert_eq!(TitleParam::from(flags.title_param), TitleParam::ReleaseTitle);
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_any_request() {
        let flags = Flags::try_parse_from(["discogs-cover", "--release-id", "1"]).unwrap();
        let config = AppConfig::from_lookup(|_| None);

        let err = run(flags, config).await.unwrap_err();

        assert!(err.to_string().starts_with("Discogs token is missing."));
    }
}
