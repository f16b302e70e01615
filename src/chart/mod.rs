//! Visualization of a period's progress. [GenericChartRenderer] is the main artifact of this
//! module, the actual renderer is picked when the crate is built.

#[cfg(feature = "chart")]
pub mod terminal;

use thiserror::Error;

use crate::{stats::Statistics, store::period::Period};

#[derive(Debug, Error)]
pub enum ChartError {
    /// No renderer is available. The message is meant for the user.
    #[error("{0}")]
    Unavailable(String),
}

/// Draws the daily counts of a period together with its statistics.
#[cfg_attr(test, mockall::automock)]
pub trait ChartRenderer {
    fn render(&self, period: &Period, stats: &Statistics) -> Result<String, ChartError>;
}

/// Serves as the renderer used by the command line.
pub struct GenericChartRenderer {
    inner: Box<dyn ChartRenderer>,
}

impl GenericChartRenderer {
    pub fn new() -> Self {
        cfg_if::cfg_if! {
            if #[cfg(feature = "chart")] {
                Self {
                    inner: Box::new(terminal::TerminalChart::default()),
                }
            } else {
                Self {
                    inner: Box::new(MissingRenderer),
                }
            }
        }
    }
}

impl Default for GenericChartRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ChartRenderer for GenericChartRenderer {
    fn render(&self, period: &Period, stats: &Statistics) -> Result<String, ChartError> {
        self.inner.render(period, stats)
    }
}

#[cfg(not(feature = "chart"))]
struct MissingRenderer;

#[cfg(not(feature = "chart"))]
impl ChartRenderer for MissingRenderer {
    fn render(&self, _period: &Period, _stats: &Statistics) -> Result<String, ChartError> {
        Err(ChartError::Unavailable(
            "Plotting requires wordtrack to be built with the `chart` feature.".into(),
        ))
    }
}
