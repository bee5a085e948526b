//! # Embellishment Expander
//!
//! Turns each notated embellishment into the explicit gracenote pitches a
//! piper plays.
//!
//! ## Purpose
//!
//! BWW writes a doubling, a grip or a strike as one unpitched glyph. The
//! gracenotes it stands for depend on the melody note that follows it, so
//! expansion is a second pass over the finished model:
//!
//! ```text
//! dbla LA_4  ->  Note { pitch: LowA, embellishment: Doubling }
//!            ->  expanded_embellishment: [HighG, LowA, D]
//! ```
//!
//! ## Dispatch
//!
//! An [`EmbellishmentTable`] maps an embellishment's (type, variant) identity
//! to an [`ExpansionStrategy`]. The table is an ordinary value: build the
//! standard one with [`EmbellishmentTable::standard`], register extra
//! strategies on it, and hand it to an [`Expander`].
//!
//! ## Failure
//!
//! A combination with no table entry, or a strategy that cannot realise the
//! embellishment before its melody note, is logged as an error and leaves
//! `expanded_embellishment` at `None` ("not expanded"), never at an empty list.
//!
//! ## Related Modules
//! - `table` - The standard realisations
//! - `crate::builder` - Produces the notated embellishments
//! - `crate::parts` - Next stage

mod table;

#[cfg(test)]
mod tests;

use crate::error::Warning;
use crate::model::{
    Embellishment, EmbellishmentType, EmbellishmentVariant, ExpandedEmbellishment, Model, Pitch,
    Symbol,
};
use std::collections::HashMap;
use std::fmt;

/// Computes the gracenote pitches of one embellished note.
pub trait ExpansionStrategy: Send + Sync {
    /// `symbol` is the note being expanded, `melody` its resolved pitch.
    /// Returns `None` when the embellishment has no realisation on `melody`.
    fn expand(&self, symbol: &Symbol, melody: Pitch) -> Option<Vec<Pitch>>;
}

impl<F> ExpansionStrategy for F
where
    F: Fn(&Embellishment, Pitch) -> Option<Vec<Pitch>> + Send + Sync,
{
    fn expand(&self, symbol: &Symbol, melody: Pitch) -> Option<Vec<Pitch>> {
        let embellishment = symbol.note()?.embellishment.as_ref()?;
        self(embellishment, melody)
    }
}

/// Identity of an embellishment for table lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EmbellishmentKey {
    pub kind: EmbellishmentType,
    pub variant: EmbellishmentVariant,
}

impl EmbellishmentKey {
    pub fn new(kind: EmbellishmentType, variant: EmbellishmentVariant) -> Self {
        Self { kind, variant }
    }
}

impl From<&Embellishment> for EmbellishmentKey {
    fn from(embellishment: &Embellishment) -> Self {
        Self::new(embellishment.kind, embellishment.variant)
    }
}

impl fmt::Display for EmbellishmentKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}/{:?}", self.kind, self.variant)
    }
}

/// Strategy registry keyed by embellishment identity.
#[derive(Default)]
pub struct EmbellishmentTable {
    strategies: HashMap<EmbellishmentKey, Box<dyn ExpansionStrategy>>,
}

impl EmbellishmentTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The table of every embellishment the builder can produce.
    pub fn standard() -> Self {
        let mut table = Self::new();
        table::register_standard(&mut table);
        table
    }

    /// Add or replace the strategy for `key`.
    pub fn register<S>(&mut self, key: EmbellishmentKey, strategy: S)
    where
        S: ExpansionStrategy + 'static,
    {
        self.strategies.insert(key, Box::new(strategy));
    }

    pub fn get(&self, key: &EmbellishmentKey) -> Option<&dyn ExpansionStrategy> {
        self.strategies.get(key).map(|s| &**s)
    }

    pub fn contains(&self, key: &EmbellishmentKey) -> bool {
        self.strategies.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }
}

impl fmt::Debug for EmbellishmentTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EmbellishmentTable")
            .field("entries", &self.strategies.len())
            .finish()
    }
}

/// Expand every embellishment of `model` with the standard table.
pub fn expand(mut model: Model) -> Model {
    Expander::standard().expand_model(&mut model);
    model
}

/// Runs a table over a model.
#[derive(Debug)]
pub struct Expander {
    table: EmbellishmentTable,
}

impl Expander {
    pub fn new(table: EmbellishmentTable) -> Self {
        Self { table }
    }

    pub fn standard() -> Self {
        Self::new(EmbellishmentTable::standard())
    }

    /// Expand in place. Never fails; problems come back as warnings.
    pub fn expand_model(&self, model: &mut Model) -> Vec<Warning> {
        let mut warnings = Vec::new();
        let mut expanded = 0usize;

        for (t, tune) in model.tunes.iter_mut().enumerate() {
            for (m, measure) in tune.measures.iter_mut().enumerate() {
                for symbol in measure.symbols.iter_mut() {
                    let Some((key, melody)) = expandable(symbol) else {
                        continue;
                    };
                    let pitches = self
                        .table
                        .get(&key)
                        .ok_or_else(|| format!("no expansion for {}", key))
                        .and_then(|strategy| {
                            strategy.expand(symbol, melody).ok_or_else(|| {
                                format!("{} cannot be played before {:?}", key, melody)
                            })
                        });

                    match pitches {
                        Ok(pitches) => {
                            if let Some(note) = symbol.note_mut() {
                                note.expanded_embellishment = Some(ExpandedEmbellishment { pitches });
                                expanded += 1;
                            }
                        }
                        Err(message) => {
                            let warning = Warning::new(t + 1, m + 1, message);
                            log::error!("{}", warning);
                            warnings.push(warning);
                        }
                    }
                }
            }
        }

        log::debug!(
            "expanded {} embellishment(s), {} failure(s)",
            expanded,
            warnings.len()
        );
        warnings
    }
}

/// The lookup key and melody pitch of a valid, embellished note.
fn expandable(symbol: &Symbol) -> Option<(EmbellishmentKey, Pitch)> {
    let note = symbol.note().filter(|n| n.is_valid())?;
    let embellishment = note.embellishment.as_ref()?;
    Some((EmbellishmentKey::from(embellishment), note.pitch))
}
