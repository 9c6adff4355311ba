//! Console service: reads operator commands line by line and reports back.

use anyhow::{Context, Result};
use async_trait::async_trait;
use console::style;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use super::parser::{parse_line, OperatorCommand, PUBLISH_PREFIX};
use crate::domains::posts::publish_post;
use crate::kernel::{BotDeps, Service};

pub struct ConsoleService<R, W> {
    deps: BotDeps,
    input: R,
    output: W,
}

impl ConsoleService<BufReader<Stdin>, Stdout> {
    pub fn stdio(deps: BotDeps) -> Self {
        Self::new(deps, BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ConsoleService<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(deps: BotDeps, input: R, output: W) -> Self {
        Self {
            deps,
            input,
            output,
        }
    }

    /// Handle one line of input. Unrecognised lines produce no output.
    pub async fn handle_line(&mut self, line: &str) -> Result<()> {
        let Some(command) = parse_line(line) else {
            debug!("ignoring console input");
            return Ok(());
        };

        let feedback = match command {
            OperatorCommand::MissingText => {
                info!("Publish command without text");
                format!(
                    "{} Usage: {} <text>",
                    style("Post text is missing.").yellow(),
                    PUBLISH_PREFIX
                )
            }
            OperatorCommand::Publish(text) => match publish_post(&text, &self.deps).await {
                Ok(post_id) => format!("{} {}", style("New post published:").green(), post_id),
                Err(e) => format!("{} {}", style("Publish failed:").red(), e),
            },
        };

        self.write_line(&feedback).await
    }

    /// Read and handle lines until input ends or `shutdown` is cancelled.
    pub async fn serve(&mut self, shutdown: &CancellationToken) -> Result<()> {
        let mut buf = Vec::new();

        loop {
            buf.clear();
            let read = tokio::select! {
                _ = shutdown.cancelled() => break,
                read = self.input.read_until(b'\n', &mut buf) => {
                    read.context("Failed to read console input")?
                }
            };

            if read == 0 {
                info!("console input closed");
                break;
            }

            // Input in another encoding is not fatal; it just won't parse.
            let line = String::from_utf8_lossy(&buf);
            self.handle_line(&line).await?;
        }

        Ok(())
    }

    async fn write_line(&mut self, line: &str) -> Result<()> {
        self.output
            .write_all(format!("{}\n", line).as_bytes())
            .await
            .context("Failed to write console output")?;
        self.output
            .flush()
            .await
            .context("Failed to flush console output")
    }
}

#[async_trait]
impl<R, W> Service for ConsoleService<R, W>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    fn name(&self) -> &'static str {
        "console"
    }

    async fn run(self: Box<Self>, shutdown: CancellationToken) -> Result<()> {
        let mut console = self;
        console.serve(&shutdown).await
    }
}
