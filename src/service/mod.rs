pub mod emitter;
pub mod fsm;
pub mod handler;
pub mod parser;
pub mod source;

pub use emitter::{Response, ResponseEmitter};
pub use fsm::{ServiceEvent, ServiceState, ServiceStateMachine, Termination};
pub use handler::{GenerationHandler, MAX_LENGTH, NUM_SEQUENCES};
pub use parser::{Request, ValidatedPrompt};
pub use source::{LineSource, RawLine};

use crate::{
    Error, Result,
    config::Config,
    generator::{ModelLoader, OpenAiLoader, TextGenerator},
};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncWrite, BufReader, Stdin, Stdout};
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

/// Loads the configured model and serves stdin until it closes.
pub async fn run(config: Config) -> Result<Termination> {
    let loader = OpenAiLoader::new(config.generator);
    ServiceLoop::stdio().run(&loader).await
}

/// Owns the generator for the whole process and answers each input line
/// with exactly one output line, in order.
pub struct ServiceLoop<R, W> {
    fsm: ServiceStateMachine,
    source: LineSource<R>,
    emitter: ResponseEmitter<W>,
}

impl ServiceLoop<BufReader<Stdin>, Stdout> {
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> ServiceLoop<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            fsm: ServiceStateMachine::new(),
            source: LineSource::new(input),
            emitter: ResponseEmitter::new(output),
        }
    }

    /// Runs the service to completion.
    ///
    /// Only a load failure or a broken output channel returns early; every
    /// per-line failure is answered on the output and the loop continues.
    pub async fn run(mut self, loader: &dyn ModelLoader) -> Result<Termination> {
        self.fsm.transition(ServiceEvent::StartLoading)?;
        info!("Loading model...");

        let generator: Arc<dyn TextGenerator> = match loader.initialize().await {
            Ok(generator) => Arc::from(generator),
            Err(e) => return self.abort(e).await,
        };

        self.fsm.transition(ServiceEvent::ModelLoaded)?;
        info!("Model loaded.");

        let mut lines = 0usize;
        let mut errors = 0usize;

        while let Some(line) = self.source.next_line().await {
            self.fsm.transition(ServiceEvent::LineReceived)?;
            lines += 1;

            let response = process_line(Arc::clone(&generator), line).await;
            if !response.is_success() {
                errors += 1;
            }

            self.emitter.emit(&response).await?;
            self.fsm.transition(ServiceEvent::ResponseEmitted)?;
        }

        self.fsm.transition(ServiceEvent::InputExhausted)?;
        info!(lines, errors, "Input closed, shutting down");

        Ok(Termination::Normal)
    }

    /// Reports an initialization failure and terminates without reading input.
    pub async fn abort(mut self, err: Error) -> Result<Termination> {
        let err = match err {
            Error::Load(_) => err,
            other => Error::load(other.to_string()),
        };
        error!("{}", err);

        if self.fsm.current_state() == ServiceState::Uninitialized {
            self.fsm.transition(ServiceEvent::StartLoading)?;
        }
        self.fsm.transition(ServiceEvent::LoadFailed)?;

        self.emitter.emit(&Response::from(&err)).await?;

        Ok(Termination::Fatal)
    }
}

/// Handles one line on its own task so that a panic in the generator is
/// answered like any other per-line failure.
async fn process_line(generator: Arc<dyn TextGenerator>, line: RawLine) -> Response {
    let task = tokio::spawn(async move {
        let raw = match line {
            Ok(raw) => raw,
            Err(e) => return Response::from(&Error::parse(e.to_string())),
        };

        match parser::parse(&raw) {
            Ok(request) => {
                debug!("Handling request with {} prompt chars", request.prompt.len());
                GenerationHandler::new(generator.as_ref())
                    .handle(&request)
                    .await
            }
            Err(e) => {
                warn!("Rejected malformed request: {}", e);
                Response::from(&e)
            }
        }
    });

    match task.await {
        Ok(response) => response,
        Err(e) => {
            error!("Request processing aborted: {}", e);
            Response::error(join_error_message(e))
        }
    }
}

fn join_error_message(err: JoinError) -> String {
    if !err.is_panic() {
        return err.to_string();
    }

    let payload = err.into_panic();
    if let Some(msg) = payload.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "request processing panicked".to_string()
    }
}
