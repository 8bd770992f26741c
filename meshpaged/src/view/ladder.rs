use serde::{Deserialize, Serialize};
use anyhow::{bail, ensure, Result};

/// One quality tier: nodes with etx below `below` get `label`.
/// The last rung has no bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rung {
    #[serde(default)]
    pub below: Option<f64>,
    pub label: String,
}

impl Rung {
    fn bounded(below: f64, label: &str) -> Self {
        Self { below: Some(below), label: label.to_string() }
    }

    fn unbounded(label: &str) -> Self {
        Self { below: None, label: label.to_string() }
    }
}

/// Immutable table of quality tiers, ordered best first.
#[derive(Debug, Clone, PartialEq)]
pub struct Ladder {
    rungs: Vec<Rung>,
}

impl Ladder {
    /// Validate and wrap a rung table. Thresholds must be finite and strictly
    /// ascending, and only the last rung may be unbounded.
    pub fn new(rungs: Vec<Rung>) -> Result<Self> {
        ensure!(!rungs.is_empty(), "Quality ladder must have at least one rung");

        let last = rungs.len() - 1;
        let mut previous: Option<f64> = None;
        for (i, rung) in rungs.iter().enumerate() {
            match (i == last, rung.below) {
                (true, None) => {}
                (true, Some(_)) => bail!("Last ladder rung {:?} must not have a bound", rung.label),
                (false, None) => bail!("Ladder rung {:?} must have a bound", rung.label),
                (false, Some(below)) => {
                    ensure!(below.is_finite(), "Ladder rung {:?} has a non-finite bound", rung.label);
                    if let Some(prev) = previous {
                        ensure!(
                            below > prev,
                            "Ladder bounds must be strictly ascending ({} after {})",
                            below,
                            prev
                        );
                    }
                    previous = Some(below);
                }
            }
        }

        Ok(Self { rungs })
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.rungs.iter().map(|r| r.label.as_str())
    }

    pub fn cursor(&self) -> LadderCursor<'_> {
        LadderCursor { ladder: self, pos: 0 }
    }
}

impl Default for Ladder {
    fn default() -> Self {
        Self {
            rungs: default_rungs(),
        }
    }
}

pub fn default_rungs() -> Vec<Rung> {
    vec![
        Rung::bounded(1.0, "Excellent"),
        Rung::bounded(2.0, "Good"),
        Rung::bounded(3.0, "Fair"),
        Rung::bounded(5.0, "Slow"),
        Rung::bounded(10.0, "Poor"),
        Rung::unbounded("Improbable"),
    ]
}

/// Position on the ladder. Only moves forward, so callers must feed etx
/// values in ascending order.
#[derive(Debug, Clone)]
pub struct LadderCursor<'a> {
    ladder: &'a Ladder,
    pos: usize,
}

impl<'a> LadderCursor<'a> {
    /// Step past every rung whose bound `etx` reaches and return the new position.
    pub fn advance(&mut self, etx: f64) -> usize {
        while let Some(below) = self.ladder.rungs[self.pos].below {
            if etx < below {
                break;
            }
            self.pos += 1;
        }
        self.pos
    }

    pub fn rung(&self) -> &'a Rung {
        &self.ladder.rungs[self.pos]
    }
}
