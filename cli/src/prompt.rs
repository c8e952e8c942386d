use async_trait::async_trait;
use coverbeet::{parse_choice, CoverError, Disambiguator, Result};
use shared::discogs::Candidate;
use tokio::{
    io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout},
    sync::Mutex,
};
use tracing::warn;

/// Lists candidates on a terminal and reads a 1-based selection.
///
/// With `attempts == 1` an invalid answer fails immediately; larger values
/// re-ask until the attempts run out.
pub struct ConsolePrompt<R, W> {
    io: Mutex<(R, W)>,
    attempts: usize,
}

impl ConsolePrompt<BufReader<Stdin>, Stdout> {
    pub fn stdio(attempts: usize) -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout(), attempts)
    }
}

impl<R, W> ConsolePrompt<R, W> {
    pub fn new(input: R, output: W, attempts: usize) -> Self {
        Self {
            io: Mutex::new((input, output)),
            attempts: attempts.max(1),
        }
    }

    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }
}

fn io_failure(err: std::io::Error) -> CoverError {
    warn!("Prompt I/O failed: {err}");
    CoverError::InvalidChoice(format!("terminal I/O failed: {err}"))
}

#[async_trait]
impl<R, W> Disambiguator for ConsolePrompt<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    fn name(&self) -> &'static str {
        "console"
    }

    async fn choose_one(&self, candidates: &[Candidate]) -> Result<usize> {
        let mut guard = self.io.lock().await;
        let (input, output) = &mut *guard;

        let mut listing = String::from("Multiple results found. Please choose one:\n");
        for (index, candidate) in candidates.iter().enumerate() {
            listing.push_str(&format!("[{}] {}\n", index + 1, candidate.label));
        }
        output.write_all(listing.as_bytes()).await.map_err(io_failure)?;

        let mut attempt = 1;
        loop {
            output
                .write_all(b"Enter the number of your choice: ")
                .await
                .map_err(io_failure)?;
            output.flush().await.map_err(io_failure)?;

            let mut answer = String::new();
            let read = input.read_line(&mut answer).await.map_err(io_failure)?;
            if read == 0 {
                return Err(CoverError::InvalidChoice(String::new()));
            }

            match parse_choice(&answer, candidates.len()) {
                Ok(index) => return Ok(index),
                Err(err) if attempt >= self.attempts => return Err(err),
                Err(_) => {
                    attempt += 1;
                    output
                        .write_all(b"Invalid choice, try again.\n")
                        .await
                        .map_err(io_failure)?;
                }
            }
        }
    }
}
