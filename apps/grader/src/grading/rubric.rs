//! Rubric: named, weighted grading criteria handed to the model as context.
//!
//! Weights are prompt text only: they are never summed, normalized or enforced.

use std::fmt;

/// A single grading criterion and its weight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Criterion {
    pub name: String,
    pub weight: u32,
}

/// Ordered list of criteria. Order is preserved in the rendered prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rubric {
    criteria: Vec<Criterion>,
}

impl Rubric {
    pub fn new<I, S>(criteria: I) -> Self
    where
        I: IntoIterator<Item = (S, u32)>,
        S: Into<String>,
    {
        Self {
            criteria: criteria
                .into_iter()
                .map(|(name, weight)| Criterion {
                    name: name.into(),
                    weight,
                })
                .collect(),
        }
    }

    pub fn criteria(&self) -> &[Criterion] {
        &self.criteria
    }
}

impl Default for Rubric {
    /// Graduate-level essay rubric.
    fn default() -> Self {
        Self::new([
            ("Depth", 40),
            ("Originality", 30),
            ("Clarity", 20),
            ("Evidence", 10),
        ])
    }
}

impl fmt::Display for Rubric {
    /// Renders as `Depth: 40, Originality: 30, ...`, names verbatim.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, c) in self.criteria.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}: {}", c.name, c.weight)?;
        }
        Ok(())
    }
}
