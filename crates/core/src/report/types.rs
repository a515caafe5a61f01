//! Types for report generation.

use serde::{Deserialize, Serialize};

/// Trades listed in a context summary before truncation.
pub const MAX_SUMMARY_TRADES: usize = 10;

/// Confirmed work-order details used to ground a report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkOrderContext {
    pub number: String,
    pub description: Option<String>,
    pub entity: Option<String>,
    pub trades: Vec<String>,
}

impl WorkOrderContext {
    pub fn new(number: impl Into<String>) -> Self {
        Self {
            number: number.into(),
            description: None,
            entity: None,
            trades: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_trades<I, S>(mut self, trades: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.trades = trades.into_iter().map(Into::into).collect();
        self
    }

    /// Plain-text block describing the work order.
    ///
    /// Lists at most [`MAX_SUMMARY_TRADES`] trades, followed by `...` when
    /// more exist.
    pub fn summary(&self) -> String {
        let shown: Vec<&str> = self
            .trades
            .iter()
            .take(MAX_SUMMARY_TRADES)
            .map(String::as_str)
            .collect();
        let ellipsis = if self.trades.len() > MAX_SUMMARY_TRADES {
            "..."
        } else {
            ""
        };

        format!(
            "Work Order Number: {}\nClient Description: {}\nRelevant Trades: {}{}",
            self.number,
            self.description.as_deref().unwrap_or(""),
            shown.join(", "),
            ellipsis
        )
    }
}

/// Media already uploaded to the model provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaHandle {
    pub uri: String,
    pub mime_type: String,
}

impl MediaHandle {
    pub fn new(uri: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            mime_type: mime_type.into(),
        }
    }
}

/// Input of a single report generation.
#[derive(Debug, Clone, Default)]
pub struct ReportRequest {
    pub media: Vec<MediaHandle>,
    pub context: Option<WorkOrderContext>,
}

impl ReportRequest {
    pub fn new(media: Vec<MediaHandle>) -> Self {
        Self {
            media,
            context: None,
        }
    }

    pub fn with_context(mut self, context: WorkOrderContext) -> Self {
        self.context = Some(context);
        self
    }
}
