use async_trait::async_trait;
use std::io;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use textgen_rust::{
    Error, Result,
    generator::{GeneratedSequence, GenerationRequest, ModelLoader, TextGenerator},
};
use tokio::io::{AsyncRead, AsyncWrite, ReadBuf};

/// Mock generator that continues the prompt with a fixed suffix
#[derive(Debug, Clone)]
pub struct MockTextGenerator {
    pub suffix: String,
    pub requests: Arc<Mutex<Vec<GenerationRequest>>>,
    /// Prompts that fail with the given message instead of generating
    pub failures: Arc<Mutex<Vec<(String, String)>>>,
    /// Prompts that make the generator panic
    pub panics_on: Option<String>,
    pub empty: bool,
}

impl MockTextGenerator {
    pub fn new() -> Self {
        Self {
            suffix: " and then some.".to_string(),
            requests: Arc::new(Mutex::new(Vec::new())),
            failures: Arc::new(Mutex::new(Vec::new())),
            panics_on: None,
            empty: false,
        }
    }

    pub fn with_suffix(mut self, suffix: &str) -> Self {
        self.suffix = suffix.to_string();
        self
    }

    pub fn with_failure(self, prompt: &str, message: &str) -> Self {
        self.failures
            .lock()
            .unwrap()
            .push((prompt.to_string(), message.to_string()));
        self
    }

    pub fn with_panic_on(mut self, prompt: &str) -> Self {
        self.panics_on = Some(prompt.to_string());
        self
    }

    pub fn with_no_sequences(mut self) -> Self {
        self.empty = true;
        self
    }

    pub fn get_requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl TextGenerator for MockTextGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<Vec<GeneratedSequence>> {
        self.requests.lock().unwrap().push(request.clone());

        if self.panics_on.as_deref() == Some(request.prompt.as_str()) {
            panic!("generator crashed on {}", request.prompt);
        }

        let failure = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(prompt, _)| *prompt == request.prompt)
            .map(|(_, message)| message.clone());
        if let Some(message) = failure {
            return Err(Error::generation(message));
        }

        if self.empty {
            return Ok(Vec::new());
        }

        Ok(vec![GeneratedSequence::new(format!(
            "{}{}",
            request.prompt, self.suffix
        ))])
    }
}

impl Default for MockTextGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Mock loader handing out a clone of its generator, or failing
#[derive(Debug)]
pub struct MockModelLoader {
    pub generator: MockTextGenerator,
    pub error: Option<String>,
    pub calls: AtomicUsize,
}

impl MockModelLoader {
    pub fn new(generator: MockTextGenerator) -> Self {
        Self {
            generator,
            error: None,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: &str) -> Self {
        Self {
            generator: MockTextGenerator::new(),
            error: Some(error.to_string()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ModelLoader for MockModelLoader {
    async fn initialize(&self) -> Result<Box<dyn TextGenerator>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if let Some(ref error) = self.error {
            return Err(Error::load(error.clone()));
        }

        Ok(Box::new(self.generator.clone()))
    }
}

/// Input that yields `data` once, then fails every further read
#[derive(Debug)]
pub struct FailingReader {
    pub data: Option<Vec<u8>>,
}

impl FailingReader {
    pub fn after(data: &str) -> Self {
        Self {
            data: Some(data.as_bytes().to_vec()),
        }
    }
}

impl AsyncRead for FailingReader {
    fn poll_read(
        mut self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        buf: &mut ReadBuf<'_>,
    ) -> Poll<io::Result<()>> {
        match self.data.take() {
            Some(data) => {
                buf.put_slice(&data);
                Poll::Ready(Ok(()))
            }
            None => Poll::Ready(Err(io::Error::new(
                io::ErrorKind::ConnectionReset,
                "input pipe reset",
            ))),
        }
    }
}

/// Output whose consumer has gone away
#[derive(Debug, Default)]
pub struct BrokenWriter;

impl AsyncWrite for BrokenWriter {
    fn poll_write(
        self: Pin<&mut Self>,
        _cx: &mut Context<'_>,
        _buf: &[u8],
    ) -> Poll<io::Result<usize>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed")))
    }

    fn poll_flush(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Err(io::Error::new(io::ErrorKind::BrokenPipe, "stdout closed")))
    }

    fn poll_shutdown(self: Pin<&mut Self>, _cx: &mut Context<'_>) -> Poll<io::Result<()>> {
        Poll::Ready(Ok(()))
    }
}
