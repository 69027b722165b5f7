use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::error;

/// A raw input line. Invalid UTF-8 is kept so it can be answered per line.
pub type RawLine = std::result::Result<String, std::string::FromUtf8Error>;

/// Sequential, one-shot reader of newline-terminated input lines.
pub struct LineSource<R> {
    reader: R,
    buf: Vec<u8>,
    exhausted: bool,
}

impl<R: AsyncBufRead + Unpin> LineSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            buf: Vec::new(),
            exhausted: false,
        }
    }

    /// Blocks until the next line is available. `None` once input is closed,
    /// and on every call after that.
    pub async fn next_line(&mut self) -> Option<RawLine> {
        if self.exhausted {
            return None;
        }

        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf).await {
            Ok(0) => {
                self.exhausted = true;
                None
            }
            Ok(_) => {
                strip_line_ending(&mut self.buf);
                Some(String::from_utf8(std::mem::take(&mut self.buf)))
            }
            Err(e) => {
                error!("Failed to read from input, treating as end of input: {}", e);
                self.exhausted = true;
                None
            }
        }
    }
}

fn strip_line_ending(buf: &mut Vec<u8>) {
    if buf.last() == Some(&b'\n') {
        buf.pop();
        if buf.last() == Some(&b'\r') {
            buf.pop();
        }
    }
}
