//! # Part & Timeline Normalizer
//!
//! Partitions a tune into its musical parts and makes every timeline region
//! (first/second time endings, "second of N" brackets) start and end on a
//! measure boundary.
//!
//! ## Timeline measure splitting
//!
//! BWW lets a timeline bracket open or close in the middle of a measure.
//! Such a measure is cut at its timeline boundaries:
//!
//! ```text
//! | B_4 '2 C_4 _' D_4 |   ->   | B_4 |  '2 C_4 _'  |  D_4 |
//!   left ........ right         left   (none)       right
//! ```
//!
//! The first piece keeps the left barline and time signature, the last piece
//! keeps the right barline.
//!
//! ## Part assembly
//!
//! Measures accumulate into the current part until a heavy right barline (or
//! the last measure) closes it. A heavy repeat-start left barline marks the
//! part as repeated.
//!
//! ## Related Modules
//! - `crate::model` - `Measure`, `Barline`, `MusicPart`
//! - `crate::embellishment` - Previous stage

use crate::model::{BarlineTimeline, Boundary, Measure, MusicPart, Symbol, Tune};

/// Split timeline measures of `tune` in place, then partition it into parts.
pub fn normalize_parts(tune: &mut Tune) -> Vec<MusicPart> {
    let split = split_timeline_measures(tune);
    let parts = assemble_parts(&tune.measures);
    log::debug!(
        "'{}': {} measure(s) split, {} part(s)",
        tune.title,
        split,
        parts.len()
    );
    parts
}

/// Replace every measure whose timeline regions do not line up with its
/// boundaries by its pieces. Returns how many measures were split.
pub fn split_timeline_measures(tune: &mut Tune) -> usize {
    let mut split = 0;
    let measures = std::mem::take(&mut tune.measures);
    for measure in measures {
        if measure.has_timeline() && needs_split(&measure) {
            split += 1;
            tune.measures.extend(split_measure(measure));
        } else {
            tune.measures.push(measure);
        }
    }
    split
}

/// A start anywhere but first, or an end anywhere but last.
fn needs_split(measure: &Measure) -> bool {
    let last = measure.symbols.len().saturating_sub(1);
    measure
        .symbols
        .iter()
        .enumerate()
        .any(|(i, symbol)| match symbol {
            Symbol::TimeLine(t) => match t.boundary {
                Boundary::Start => i > 0,
                Boundary::End => i < last,
            },
            _ => false,
        })
}

fn split_measure(measure: Measure) -> Vec<Measure> {
    let mut pieces: Vec<Vec<Symbol>> = Vec::new();
    let mut current = Vec::new();

    for symbol in measure.symbols {
        match &symbol {
            Symbol::TimeLine(t) if t.boundary == Boundary::Start => {
                if !current.is_empty() {
                    pieces.push(std::mem::take(&mut current));
                }
                current.push(symbol);
            }
            Symbol::TimeLine(_) => {
                current.push(symbol);
                pieces.push(std::mem::take(&mut current));
            }
            _ => current.push(symbol),
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    let count = pieces.len();
    pieces
        .into_iter()
        .enumerate()
        .map(|(i, symbols)| Measure {
            left_barline: if i == 0 { measure.left_barline } else { None },
            time: if i == 0 { measure.time } else { None },
            right_barline: if i + 1 == count {
                measure.right_barline
            } else {
                None
            },
            symbols,
        })
        .collect()
}

/// Partition measures into parts at heavy right barlines.
pub fn assemble_parts(measures: &[Measure]) -> Vec<MusicPart> {
    let mut parts = Vec::new();
    let mut current = MusicPart::default();

    for (i, measure) in measures.iter().enumerate() {
        if measure
            .left_barline
            .map_or(false, |b| b.is_heavy() && b.timeline == BarlineTimeline::RepeatStart)
        {
            current.with_repeat = true;
        }
        current.measures.push(measure.clone());

        let heavy_end = measure.right_barline.map_or(false, |b| b.is_heavy());
        if heavy_end || i + 1 == measures.len() {
            parts.push(std::mem::take(&mut current));
        }
    }
    parts
}

/// The parts of one tune with 1-based access and a forward cursor.
///
/// The cursor (`has_next` / `next_part` / `reset`) is independent of the
/// indexed accessor: [`TuneParts::part`] never moves it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TuneParts {
    parts: Vec<MusicPart>,
    cursor: usize,
}

impl TuneParts {
    pub fn new(parts: Vec<MusicPart>) -> Self {
        Self { parts, cursor: 0 }
    }

    /// Normalize `tune` and wrap the result.
    pub fn from_tune(tune: &mut Tune) -> Self {
        Self::new(normalize_parts(tune))
    }

    /// Part `number`, counting from 1. `None` for 0 or past the end.
    pub fn part(&self, number: usize) -> Option<&MusicPart> {
        number.checked_sub(1).and_then(|i| self.parts.get(i))
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MusicPart> {
        self.parts.iter()
    }

    pub fn has_next(&self) -> bool {
        self.cursor < self.parts.len()
    }

    pub fn next_part(&mut self) -> Option<&MusicPart> {
        let part = self.parts.get(self.cursor)?;
        self.cursor += 1;
        Some(part)
    }

    pub fn reset(&mut self) {
        self.cursor = 0;
    }
}

/// Hook for carrying timeline regions across parts.
pub trait TimelineDistributor {
    fn distribute(&self, tune: Tune) -> Tune;
}

/// Leaves every tune untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct InertDistributor;

impl TimelineDistributor for InertDistributor {
    fn distribute(&self, tune: Tune) -> Tune {
        log::debug!("'{}': cross-part timeline distribution skipped", tune.title);
        tune
    }
}

/// Distribute timeline regions across parts with the default distributor.
pub fn normalize_timeline(tune: Tune) -> Tune {
    normalize_timeline_with(tune, &InertDistributor)
}

pub fn normalize_timeline_with(tune: Tune, distributor: &dyn TimelineDistributor) -> Tune {
    distributor.distribute(tune)
}
