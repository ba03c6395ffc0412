//! # Prompt Call Logging
//!
//! [`CallLogger`] records one [`CallLogRow`] per successful completion call. It is used
//! either around a single call with [`CallLogger::capture`], or as provider middleware via
//! [`CallLogger::intercept`], which wraps any [`AiProvider`] in a [`LoggedProvider`].
//!
//! Recording never affects the call itself: a failed call adds no row and its error is
//! returned untouched, and a failure while recording is reported through `tracing` while
//! the original result still reaches the caller.

use crate::{
    errors::PromptError,
    providers::ai::AiProvider,
    types::{Completion, CompletionRequest},
};
use async_trait::async_trait;
use serde::Serialize;
use std::{
    fmt::Display,
    future::Future,
    io,
    sync::{Arc, Mutex},
};
use thiserror::Error;
use tracing::{debug, error};

/// Errors raised while recording or exporting call data.
#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("The call log lock was poisoned by a panicking thread")]
    Poisoned,
    #[error("Failed to write call log as CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("Failed to flush call log output: {0}")]
    Io(#[from] io::Error),
}

/// A snapshot of one completion call.
///
/// Fields are `None` when the request did not set the parameter or the reply had no
/// choices.
#[derive(Serialize, Debug, Clone, PartialEq, Default)]
pub struct CallLogRow {
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
    pub user_content: Option<String>,
    pub system_role: Option<String>,
    pub response_content: Option<String>,
}

impl CallLogRow {
    /// The column names of the exported table, in order.
    pub const COLUMNS: [&'static str; 6] = [
        "model",
        "temperature",
        "max_tokens",
        "user_content",
        "system_role",
        "response_content",
    ];

    pub fn from_call(request: &CompletionRequest, completion: &Completion) -> Self {
        Self {
            model: request.model.clone(),
            temperature: request.temperature,
            max_tokens: request.max_tokens,
            user_content: request.user_content().map(str::to_string),
            system_role: request.system_prompt().map(str::to_string),
            response_content: completion.content().map(str::to_string),
        }
    }
}

/// An append-only, thread-safe log of completion calls.
///
/// Clones share the same underlying log.
#[derive(Debug, Clone, Default)]
pub struct CallLogger {
    rows: Arc<Mutex<Vec<CallLogRow>>>,
}

impl CallLogger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Awaits `call` and, if it succeeds, records a row built from `request` and the reply.
    pub async fn capture<Fut, E>(
        &self,
        request: &CompletionRequest,
        call: Fut,
    ) -> Result<Completion, E>
    where
        Fut: Future<Output = Result<Completion, E>>,
        E: Display,
    {
        let completion = match call.await {
            Ok(completion) => completion,
            Err(e) => {
                error!("Error in executing completion call: {e}");
                return Err(e);
            }
        };

        if let Err(e) = self.record(request, &completion) {
            error!("Error in capturing call data: {e}");
        }

        Ok(completion)
    }

    fn record(
        &self,
        request: &CompletionRequest,
        completion: &Completion,
    ) -> Result<(), LoggingError> {
        let row = CallLogRow::from_call(request, completion);
        debug!(model = ?row.model, "Recording completion call");
        self.rows
            .lock()
            .map_err(|_| LoggingError::Poisoned)?
            .push(row);
        Ok(())
    }

    /// Wraps a provider so that every completion it issues is recorded in this log.
    pub fn intercept(&self, inner: Box<dyn AiProvider>) -> LoggedProvider {
        LoggedProvider {
            inner,
            logger: self.clone(),
        }
    }

    /// Exports the accumulated rows, one per successful call, in call order.
    pub fn rows(&self) -> Result<Vec<CallLogRow>, LoggingError> {
        Ok(self
            .rows
            .lock()
            .map_err(|_| LoggingError::Poisoned)?
            .clone())
    }

    pub fn len(&self) -> Result<usize, LoggingError> {
        Ok(self.rows.lock().map_err(|_| LoggingError::Poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool, LoggingError> {
        Ok(self.len()? == 0)
    }

    pub fn clear(&self) -> Result<(), LoggingError> {
        self.rows
            .lock()
            .map_err(|_| LoggingError::Poisoned)?
            .clear();
        Ok(())
    }

    /// Writes the log as a CSV table with a header row. Missing values are empty cells.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), LoggingError> {
        let rows = self.rows()?;
        let mut csv_writer = csv::Writer::from_writer(writer);

        // serde only emits the header with the first record.
        if rows.is_empty() {
            csv_writer.write_record(CallLogRow::COLUMNS)?;
        }
        for row in &rows {
            csv_writer.serialize(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

/// An [`AiProvider`] that records every successful completion in a [`CallLogger`].
#[derive(Debug, Clone)]
pub struct LoggedProvider {
    inner: Box<dyn AiProvider>,
    logger: CallLogger,
}

impl LoggedProvider {
    pub fn logger(&self) -> &CallLogger {
        &self.logger
    }
}

#[async_trait]
impl AiProvider for LoggedProvider {
    async fn complete(&self, request: &CompletionRequest) -> Result<Completion, PromptError> {
        self.logger
            .capture(request, self.inner.complete(request))
            .await
    }
}
