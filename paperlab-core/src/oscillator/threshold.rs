//! Overbought/oversold edge detection.
//!
//! Edges are triggered on consecutive ready oscillator values, never on levels:
//! a value sitting inside a zone produces nothing after the bar it entered.

use crate::series::{Band, Series};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ThresholdLevels {
    pub overbought: f64,
    pub oversold: f64,
}

impl ThresholdLevels {
    pub fn new(overbought: f64, oversold: f64) -> Self {
        Self {
            overbought,
            oversold,
        }
    }

    /// Zone above the overbought level: `{100, overbought}`.
    pub fn overbought_band(&self) -> Band {
        Band::new(100.0, self.overbought)
    }

    /// Zone below the oversold level: `{oversold, 0}`.
    pub fn oversold_band(&self) -> Band {
        Band::new(self.oversold, 0.0)
    }
}

impl Default for ThresholdLevels {
    fn default() -> Self {
        Self::new(80.0, 20.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdEdge {
    EnterOverbought,
    ExitOverbought,
    EnterOversold,
    ExitOversold,
}

impl ThresholdEdge {
    /// The single edge crossed between `prev` and `curr`, if any.
    ///
    /// When one jump crosses both levels, leaving the zone the value came from
    /// wins over entering the opposite zone.
    pub fn classify(prev: f64, curr: f64, levels: &ThresholdLevels) -> Option<Self> {
        let ob = levels.overbought;
        let os = levels.oversold;
        if prev <= os && curr > os {
            Some(ThresholdEdge::ExitOversold)
        } else if prev >= ob && curr < ob {
            Some(ThresholdEdge::ExitOverbought)
        } else if prev < ob && curr >= ob {
            Some(ThresholdEdge::EnterOverbought)
        } else if prev > os && curr <= os {
            Some(ThresholdEdge::EnterOversold)
        } else {
            None
        }
    }

    /// `1` enter overbought, `2` exit overbought, `3` enter oversold, `4` exit oversold.
    pub fn code(self) -> f64 {
        match self {
            ThresholdEdge::EnterOverbought => 1.0,
            ThresholdEdge::ExitOverbought => 2.0,
            ThresholdEdge::EnterOversold => 3.0,
            ThresholdEdge::ExitOversold => 4.0,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            ThresholdEdge::EnterOverbought => "entering overbought region",
            ThresholdEdge::ExitOverbought => "leaving overbought region",
            ThresholdEdge::EnterOversold => "entering oversold region",
            ThresholdEdge::ExitOversold => "leaving oversold region",
        }
    }

    pub fn is_overbought(self) -> bool {
        matches!(
            self,
            ThresholdEdge::EnterOverbought | ThresholdEdge::ExitOverbought
        )
    }
}

/// Per-bar edge series over an oscillator.
#[derive(Debug, Clone)]
pub struct ThresholdDetector {
    levels: ThresholdLevels,
    edges: Series<Option<ThresholdEdge>>,
}

impl ThresholdDetector {
    pub fn new(levels: ThresholdLevels) -> Self {
        Self {
            levels,
            edges: Series::new(),
        }
    }

    pub fn levels(&self) -> &ThresholdLevels {
        &self.levels
    }

    /// Record the edge at `index`. Both values must be ready for an edge to fire.
    pub fn update(
        &mut self,
        index: usize,
        prev: Option<f64>,
        curr: Option<f64>,
    ) -> Option<ThresholdEdge> {
        let edge = match (prev, curr) {
            (Some(prev), Some(curr)) => ThresholdEdge::classify(prev, curr, &self.levels),
            _ => None,
        };
        self.edges.set(index, edge);
        edge
    }

    /// Run the detector over a plain sequence of oscillator values.
    pub fn detect_all(&mut self, values: &[f64]) -> Vec<Option<ThresholdEdge>> {
        self.clear();
        values
            .iter()
            .enumerate()
            .map(|(i, &curr)| {
                let prev = i.checked_sub(1).map(|p| values[p]);
                self.update(i, prev, Some(curr))
            })
            .collect()
    }

    pub fn edge(&self, index: usize) -> Option<ThresholdEdge> {
        self.edges.get(index)
    }

    pub fn truncate(&mut self, len: usize) {
        self.edges.truncate(len);
    }

    pub fn clear(&mut self) {
        self.edges.clear();
    }
}
