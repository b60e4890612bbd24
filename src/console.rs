use async_trait::async_trait;
use std::io;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};

/// The human side of the intake.
#[async_trait]
pub trait HumanIo: Send {
    /// Displays an assistant turn.
    async fn show(&mut self, text: &str) -> io::Result<()>;

    /// Blocks for one line of input. `None` means the stream is closed.
    async fn read_reply(&mut self) -> io::Result<Option<String>>;
}

pub struct Console<R, W> {
    reader: R,
    writer: W,
}

impl<R, W> Console<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    pub fn into_writer(self) -> W {
        self.writer
    }
}

impl Console<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

#[async_trait]
impl<R, W> HumanIo for Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn show(&mut self, text: &str) -> io::Result<()> {
        self.writer
            .write_all(format!("\n{}\n> ", text.trim_end()).as_bytes())
            .await?;
        self.writer.flush().await
    }

    async fn read_reply(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.reader.read_line(&mut line).await? == 0 {
            return Ok(None);
        }

        let line = line.strip_suffix('\n').unwrap_or(&line);
        let line = line.strip_suffix('\r').unwrap_or(line);
        Ok(Some(line.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn reads_lines_until_the_stream_closes() {
        let mut console = Console::new("Checkout Revamp\r\n\nlast line".as_bytes(), Vec::new());

        assert_eq!(
            console.read_reply().await.unwrap(),
            Some("Checkout Revamp".to_string())
        );
        assert_eq!(console.read_reply().await.unwrap(), Some(String::new()));
        assert_eq!(
            console.read_reply().await.unwrap(),
            Some("last line".to_string())
        );
        assert_eq!(console.read_reply().await.unwrap(), None);
    }

    #[tokio::test]
    async fn shows_text_followed_by_a_prompt() {
        let mut console = Console::new(&b""[..], Vec::new());
        console.show("What is the project name?\n").await.unwrap();

        let written = String::from_utf8(console.into_writer()).unwrap();
        assert_eq!(written, "\nWhat is the project name?\n> ");
    }
}
