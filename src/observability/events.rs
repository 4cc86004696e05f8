//! Observability events for salesquery
//!
//! Every lifecycle and query event logged by the service is named here.
//! Log lines carry the name in their `event` field.

use std::fmt;

/// Observable events in salesquery
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Boot & Lifecycle
    /// Startup begins
    BootStart,
    /// Configuration loaded
    ConfigLoaded,
    /// Dataset opened into the store
    DatasetLoaded,
    /// Server bound, ready for requests
    Serving,

    // Query operations
    /// Query received
    QueryReceived,
    /// Predicate built and ordering resolved
    QueryPlanned,
    /// Query executed successfully
    QueryExecuted,
    /// Query rejected before execution
    QueryRejected,
    /// Query failed in storage
    QueryFailed,
    /// Query with active criteria matched nothing
    QueryEmpty,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            // Boot & Lifecycle
            Event::BootStart => "BOOT_START",
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::DatasetLoaded => "DATASET_LOADED",
            Event::Serving => "SERVING",

            // Query
            Event::QueryReceived => "QUERY_RECEIVED",
            Event::QueryPlanned => "QUERY_PLANNED",
            Event::QueryExecuted => "QUERY_EXECUTED",
            Event::QueryRejected => "QUERY_REJECTED",
            Event::QueryFailed => "QUERY_FAILED",
            Event::QueryEmpty => "QUERY_EMPTY",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_names() {
        assert_eq!(Event::BootStart.as_str(), "BOOT_START");
        assert_eq!(Event::QueryEmpty.as_str(), "QUERY_EMPTY");
        assert_eq!(Event::Serving.to_string(), "SERVING");
    }
}
