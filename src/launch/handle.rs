//! Live view of a running compose launch

use super::ComposeInvocation;
use tokio::sync::mpsc;
use tokio_stream::wrappers::UnboundedReceiverStream;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogStream {
    Stdout,
    Stderr,
}

/// A piece of subprocess output, in emission order per stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogChunk {
    pub stream: LogStream,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LaunchEvent {
    Log(LogChunk),
    /// Terminal event; `None` when the process was killed by a signal
    Exited(Option<i32>),
}

/// Receiving end of a launch.
///
/// Dropping or closing the handle only stops delivery. The compose process
/// keeps running and its pipes keep being drained.
#[derive(Debug)]
pub struct LaunchHandle {
    invocation: ComposeInvocation,
    events: mpsc::UnboundedReceiver<LaunchEvent>,
}

impl LaunchHandle {
    pub(crate) fn new(
        invocation: ComposeInvocation,
        events: mpsc::UnboundedReceiver<LaunchEvent>,
    ) -> Self {
        Self { invocation, events }
    }

    pub fn invocation(&self) -> &ComposeInvocation {
        &self.invocation
    }

    /// Next event, or `None` once the process exited and all output was delivered.
    pub async fn next(&mut self) -> Option<LaunchEvent> {
        self.events.recv().await
    }

    pub fn into_stream(self) -> UnboundedReceiverStream<LaunchEvent> {
        UnboundedReceiverStream::new(self.events)
    }

    /// Stops delivery. Already buffered events can still be drained with [`next`](Self::next).
    pub fn close(&mut self) {
        self.events.close();
    }

    /// Collects everything until exit. Returns the exit code and all chunks.
    pub async fn wait(mut self) -> (Option<i32>, Vec<LogChunk>) {
        let mut chunks = Vec::new();
        let mut code = None;
        while let Some(event) = self.next().await {
            match event {
                LaunchEvent::Log(chunk) => chunks.push(chunk),
                LaunchEvent::Exited(c) => code = c,
            }
        }
        (code, chunks)
    }
}
