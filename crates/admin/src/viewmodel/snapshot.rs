//! Whole-snapshot load state shared by the view-models.

use chrono::{DateTime, Utc};

use crate::error::ClientError;

/// Where a snapshot is in its fetch cycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadPhase {
    /// Nothing requested yet.
    #[default]
    Idle,
    /// A fetch is in flight.
    Loading,
    /// The last fetch succeeded.
    Loaded,
    /// The last fetch failed; the message is for display.
    LoadError(String),
}

/// The latest successfully fetched value plus the state of the last fetch.
///
/// Data is only ever replaced as a whole. A failed fetch keeps whatever
/// was loaded before.
#[derive(Debug)]
pub struct Snapshot<T> {
    data: Option<T>,
    phase: LoadPhase,
    loaded_at: Option<DateTime<Utc>>,
    loads: u64,
}

impl<T> Default for Snapshot<T> {
    fn default() -> Self {
        Self {
            data: None,
            phase: LoadPhase::Idle,
            loaded_at: None,
            loads: 0,
        }
    }
}

impl<T> Snapshot<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter `Loading`.
    pub fn begin(&mut self) {
        self.phase = LoadPhase::Loading;
    }

    /// Apply the outcome of a fetch.
    ///
    /// On success the data is swapped in whole; on failure it is untouched.
    /// The error is handed back for the caller to report.
    ///
    /// # Errors
    ///
    /// Returns the fetch error unchanged.
    pub fn finish(&mut self, outcome: Result<T, ClientError>) -> Result<(), ClientError> {
        match outcome {
            Ok(data) => {
                self.data = Some(data);
                self.phase = LoadPhase::Loaded;
                self.loaded_at = Some(Utc::now());
                self.loads += 1;
                Ok(())
            }
            Err(err) => {
                self.phase = LoadPhase::LoadError(err.user_message());
                Err(err)
            }
        }
    }

    #[must_use]
    pub const fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    #[must_use]
    pub const fn phase(&self) -> &LoadPhase {
        &self.phase
    }

    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.phase, LoadPhase::Loading)
    }

    /// Message of the last failed fetch, if the last fetch failed.
    #[must_use]
    pub fn error(&self) -> Option<&str> {
        match &self.phase {
            LoadPhase::LoadError(message) => Some(message),
            _ => None,
        }
    }

    /// When the current data arrived.
    #[must_use]
    pub const fn loaded_at(&self) -> Option<DateTime<Utc>> {
        self.loaded_at
    }

    /// Number of successful fetches so far.
    #[must_use]
    pub const fn loads(&self) -> u64 {
        self.loads
    }
}
