//! # Music Model Types
//!
//! This module defines the structured music model produced from a BWW document.
//!
//! ## Type Hierarchy
//! ```text
//! Model
//!   └── Vec<Tune>
//!         ├── title, tune_type, composer, footer, tempo
//!         └── Vec<Measure>
//!               ├── left_barline / right_barline: Option<Barline>
//!               ├── time: Option<TimeSignature>
//!               └── Vec<Symbol>
//!
//! Symbol (enum, exactly one kind)
//!   ├── Note
//!   │     ├── pitch: Pitch (LowG..HighA, or None)
//!   │     ├── length: Length (Whole..ThirtySecond, or None)
//!   │     ├── dots, accidental, fermata, tie
//!   │     ├── embellishment: Option<Embellishment>
//!   │     └── expanded_embellishment: Option<ExpandedEmbellishment>
//!   ├── Rest
//!   ├── Tuplet (Start | End, visible, played)
//!   ├── TimeLine (Start | End, kind)
//!   └── TempoChange
//! ```
//!
//! ## Key Concepts
//!
//! ### Incomplete notes
//! While the builder is still merging glyphs, a note can carry an
//! embellishment, accidental or tie but no pitch/length yet. Such a note is
//! not [`Note::is_valid`]; the next melody glyph completes it. Validity is a
//! state of the one `Note` type, not a separate type.
//!
//! ### Sentinels
//! `Pitch::None`, `Length::None`, `Accidental::None` ... are real values that
//! survive serialization, so a persisted model round-trips exactly.
//!
//! ### Heavy barlines
//! [`BarlineType::is_heavy`] is total over all variants; every variant other
//! than `Regular` counts as heavy.

use serde::{Deserialize, Serialize};

/// The nine notes of the bagpipe chanter scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Pitch {
    #[default]
    None,
    LowG,
    LowA,
    B,
    C,
    D,
    E,
    F,
    HighG,
    HighA,
}

impl Pitch {
    /// Parse an upper-case melody prefix (`LG`, `LA`, `B` .. `HG`, `HA`).
    pub fn from_melody_prefix(s: &str) -> Self {
        match s {
            "LG" => Pitch::LowG,
            "LA" => Pitch::LowA,
            "B" => Pitch::B,
            "C" => Pitch::C,
            "D" => Pitch::D,
            "E" => Pitch::E,
            "F" => Pitch::F,
            "HG" => Pitch::HighG,
            "HA" => Pitch::HighA,
            _ => Pitch::None,
        }
    }

    /// Parse a lower-case glyph suffix (`lg`, `la`, `b` .. `hg`, `ha`).
    pub fn from_code(s: &str) -> Self {
        match s {
            "lg" => Pitch::LowG,
            "la" => Pitch::LowA,
            "b" => Pitch::B,
            "c" => Pitch::C,
            "d" => Pitch::D,
            "e" => Pitch::E,
            "f" => Pitch::F,
            "hg" => Pitch::HighG,
            "ha" => Pitch::HighA,
            _ => Pitch::None,
        }
    }

    /// Pitch named by a grace-note letter (`a`..`g` and `t` for high A).
    ///
    /// `a` is low A and `g` is high G, as in the single grace glyphs.
    pub fn from_grace_letter(c: char) -> Self {
        match c {
            'a' => Pitch::LowA,
            'b' => Pitch::B,
            'c' => Pitch::C,
            'd' => Pitch::D,
            'e' => Pitch::E,
            'f' => Pitch::F,
            'g' => Pitch::HighG,
            't' => Pitch::HighA,
            _ => Pitch::None,
        }
    }

    pub fn is_none(&self) -> bool {
        *self == Pitch::None
    }
}

/// Note length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Length {
    #[default]
    None,
    Whole,
    Half,
    Quarter,
    Eighth,
    Sixteenth,
    ThirtySecond,
}

impl Length {
    /// Parse the numeric suffix of a melody or rest glyph.
    pub fn from_suffix(s: &str) -> Self {
        match s {
            "1" => Length::Whole,
            "2" => Length::Half,
            "4" => Length::Quarter,
            "8" => Length::Eighth,
            "16" => Length::Sixteenth,
            "32" => Length::ThirtySecond,
            _ => Length::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Accidental {
    #[default]
    None,
    Sharp,
    Flat,
    Natural,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Tie {
    #[default]
    None,
    Start,
    End,
}

/// The embellishment families known to the expander.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EmbellishmentType {
    SingleGrace,
    DoubleGrace,
    Doubling,
    Strike,
    DoubleStrike,
    TripleStrike,
    Grip,
    Taorluath,
    Bubbly,
    Birl,
    ThrowD,
    Pele,
    Edre,
    Dare,
    Darodo,
    Chedare,
    Crunluath,
}

/// Which gracenote leads the embellishment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum EmbellishmentVariant {
    #[default]
    None,
    G,
    Half,
    Thumb,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum EmbellishmentWeight {
    #[default]
    None,
    Light,
    Heavy,
}

/// An embellishment as notated: one glyph, before expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Embellishment {
    #[serde(rename = "type")]
    pub kind: EmbellishmentType,
    #[serde(default)]
    pub variant: EmbellishmentVariant,
    #[serde(default)]
    pub weight: EmbellishmentWeight,
    /// Grace pitch fixed by the glyph itself (single and double graces only).
    #[serde(default)]
    pub pitch: Pitch,
    /// Second grace pitch of a double grace.
    #[serde(default)]
    pub second_pitch: Pitch,
}

impl Embellishment {
    pub fn new(kind: EmbellishmentType) -> Self {
        Self {
            kind,
            variant: EmbellishmentVariant::None,
            weight: EmbellishmentWeight::None,
            pitch: Pitch::None,
            second_pitch: Pitch::None,
        }
    }

    pub fn single_grace(pitch: Pitch) -> Self {
        Self {
            pitch,
            ..Self::new(EmbellishmentType::SingleGrace)
        }
    }

    pub fn with_variant(mut self, variant: EmbellishmentVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn with_weight(mut self, weight: EmbellishmentWeight) -> Self {
        self.weight = weight;
        self
    }
}

/// The explicit grace pitches an embellishment is played as.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExpandedEmbellishment {
    pub pitches: Vec<Pitch>,
}

/// A melody note, possibly still incomplete while glyphs are being merged.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Note {
    #[serde(default)]
    pub pitch: Pitch,
    #[serde(default)]
    pub length: Length,
    #[serde(default)]
    pub dots: u8,
    #[serde(default)]
    pub accidental: Accidental,
    #[serde(default)]
    pub fermata: bool,
    #[serde(default)]
    pub tie: Tie,
    #[serde(default)]
    pub embellishment: Option<Embellishment>,
    /// `None` means "not expanded", which is not the same as an empty list.
    #[serde(default)]
    pub expanded_embellishment: Option<ExpandedEmbellishment>,
}

impl Note {
    pub fn new(pitch: Pitch, length: Length) -> Self {
        Self {
            pitch,
            length,
            ..Self::default()
        }
    }

    /// A note is playable once it has both a pitch and a length.
    pub fn is_valid(&self) -> bool {
        self.pitch != Pitch::None && self.length != Length::None
    }

    /// Has only forward-looking information (embellishment, accidental or
    /// tie) and is waiting for the melody glyph that completes it.
    ///
    /// A note with neither pitch nor length and nothing else on it is not
    /// incomplete: it came from a melody glyph that did not decode.
    pub fn is_incomplete(&self) -> bool {
        let forward = self.embellishment.is_some()
            || self.accidental != Accidental::None
            || self.tie != Tie::None;
        forward && self.pitch == Pitch::None && self.length == Length::None
    }

    /// Incomplete and carrying an embellishment.
    pub fn is_embellishment_only(&self) -> bool {
        self.is_incomplete() && self.embellishment.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Rest {
    pub length: Length,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Boundary {
    Start,
    End,
}

/// Tuplet bracket boundary: `visible` notes played in the time of `played`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tuplet {
    pub boundary: Boundary,
    pub visible: u8,
    pub played: u8,
}

impl Tuplet {
    pub fn start(visible: u8, played: u8) -> Self {
        Self {
            boundary: Boundary::Start,
            visible,
            played,
        }
    }

    pub fn end(visible: u8, played: u8) -> Self {
        Self {
            boundary: Boundary::End,
            visible,
            played,
        }
    }
}

/// Alternate ending / repeat bracket kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeLineKind {
    First,
    Second,
    SecondOf2,
    SecondOf3,
    SecondOf4,
    SecondOf5,
    SecondOf6,
    SecondOf7,
    SecondOf8,
    SecondOf2And4,
    Bis,
    Intro,
    Singling,
    Doubling,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeLine {
    pub boundary: Boundary,
    pub kind: TimeLineKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TempoChange {
    pub bpm: u32,
}

/// One entry in a measure. Exactly one kind is present at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Symbol {
    Note(Note),
    Rest(Rest),
    Tuplet(Tuplet),
    TimeLine(TimeLine),
    TempoChange(TempoChange),
}

impl Symbol {
    pub fn note(&self) -> Option<&Note> {
        match self {
            Symbol::Note(note) => Some(note),
            _ => None,
        }
    }

    pub fn note_mut(&mut self) -> Option<&mut Note> {
        match self {
            Symbol::Note(note) => Some(note),
            _ => None,
        }
    }

    /// A note with both pitch and length.
    pub fn is_valid_note(&self) -> bool {
        matches!(self, Symbol::Note(note) if note.is_valid())
    }

    pub fn is_timeline(&self) -> bool {
        matches!(self, Symbol::TimeLine(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarlineType {
    #[default]
    Regular,
    Heavy,
    HeavyHeavy,
    LightHeavy,
    HeavyLight,
}

impl BarlineType {
    pub fn is_heavy(&self) -> bool {
        match self {
            BarlineType::Regular => false,
            BarlineType::Heavy
            | BarlineType::HeavyHeavy
            | BarlineType::LightHeavy
            | BarlineType::HeavyLight => true,
        }
    }
}

/// Repeat marker carried by a barline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum BarlineTimeline {
    #[default]
    None,
    RepeatStart,
    RepeatEnd,
}

/// Segno / da capo style navigation marks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Navigation {
    Segno,
    DalSegno,
    DaCapoAlFine,
    Fine,
    Coda,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Barline {
    #[serde(rename = "type")]
    pub kind: BarlineType,
    #[serde(default)]
    pub timeline: BarlineTimeline,
    #[serde(default)]
    pub navigation: Option<Navigation>,
}

impl Barline {
    pub fn new(kind: BarlineType) -> Self {
        Self {
            kind,
            timeline: BarlineTimeline::None,
            navigation: None,
        }
    }

    pub fn with_timeline(mut self, timeline: BarlineTimeline) -> Self {
        self.timeline = timeline;
        self
    }

    pub fn is_heavy(&self) -> bool {
        self.kind.is_heavy()
    }
}

/// Special time signature glyphs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeSymbol {
    #[default]
    None,
    Common,
    Cut,
}

/// Time signature (e.g., 2/4, 6/8, C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeSignature {
    pub beats: u8,
    pub beat_type: u8,
    #[serde(default)]
    pub symbol: TimeSymbol,
}

impl TimeSignature {
    pub fn new(beats: u8, beat_type: u8) -> Self {
        Self {
            beats,
            beat_type,
            symbol: TimeSymbol::None,
        }
    }

    pub fn common() -> Self {
        Self {
            symbol: TimeSymbol::Common,
            ..Self::new(4, 4)
        }
    }

    pub fn cut() -> Self {
        Self {
            symbol: TimeSymbol::Cut,
            ..Self::new(2, 2)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Measure {
    #[serde(default)]
    pub left_barline: Option<Barline>,
    #[serde(default)]
    pub right_barline: Option<Barline>,
    #[serde(default)]
    pub time: Option<TimeSignature>,
    #[serde(default)]
    pub symbols: Vec<Symbol>,
}

impl Measure {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
            && self.left_barline.is_none()
            && self.right_barline.is_none()
    }

    pub fn has_timeline(&self) -> bool {
        self.symbols.iter().any(Symbol::is_timeline)
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Tune {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub tune_type: String,
    #[serde(default)]
    pub composer: String,
    #[serde(default)]
    pub footer: String,
    #[serde(default)]
    pub tempo: u32,
    #[serde(default)]
    pub measures: Vec<Measure>,
}

/// A structural section of a tune, delimited by heavy barlines.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct MusicPart {
    pub measures: Vec<Measure>,
    pub with_repeat: bool,
}

/// All tunes of one document.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Model {
    pub tunes: Vec<Tune>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pitch_codes() {
        assert_eq!(Pitch::from_melody_prefix("LG"), Pitch::LowG);
        assert_eq!(Pitch::from_melody_prefix("HA"), Pitch::HighA);
        assert_eq!(Pitch::from_melody_prefix("X"), Pitch::None);
        assert_eq!(Pitch::from_code("hg"), Pitch::HighG);
        assert_eq!(Pitch::from_grace_letter('t'), Pitch::HighA);
        assert_eq!(Pitch::from_grace_letter('a'), Pitch::LowA);
    }

    #[test]
    fn test_length_suffix() {
        assert_eq!(Length::from_suffix("1"), Length::Whole);
        assert_eq!(Length::from_suffix("32"), Length::ThirtySecond);
        assert_eq!(Length::from_suffix("3"), Length::None);
    }

    #[test]
    fn test_note_validity() {
        assert!(Note::new(Pitch::LowA, Length::Eighth).is_valid());
        assert!(!Note::new(Pitch::None, Length::Eighth).is_valid());
        assert!(!Note::new(Pitch::LowA, Length::None).is_valid());

        // an undecodable melody glyph is invalid but not waiting for anything
        let bare = Note::default();
        assert!(!bare.is_valid());
        assert!(!bare.is_incomplete());

        let tied = Note {
            tie: Tie::Start,
            ..Note::default()
        };
        assert!(tied.is_incomplete());
        assert!(!tied.is_embellishment_only());

        let sharp = Note {
            accidental: Accidental::Sharp,
            ..Note::default()
        };
        assert!(sharp.is_incomplete());

        let mut grace = Note::default();
        grace.embellishment = Some(Embellishment::single_grace(Pitch::LowA));
        assert!(grace.is_incomplete());
        assert!(grace.is_embellishment_only());
    }

    #[test]
    fn test_heavy_barlines() {
        assert!(!BarlineType::Regular.is_heavy());
        for kind in [
            BarlineType::Heavy,
            BarlineType::HeavyHeavy,
            BarlineType::LightHeavy,
            BarlineType::HeavyLight,
        ] {
            assert!(kind.is_heavy(), "{:?} should be heavy", kind);
        }
    }

    #[test]
    fn test_symbol_accessors() {
        let note = Symbol::Note(Note::new(Pitch::B, Length::Quarter));
        assert!(note.is_valid_note());
        assert!(note.note().is_some());

        let rest = Symbol::Rest(Rest { length: Length::Quarter });
        assert!(!rest.is_valid_note());
        assert!(rest.note().is_none());

        let timeline = Symbol::TimeLine(TimeLine {
            boundary: Boundary::Start,
            kind: TimeLineKind::First,
        });
        assert!(timeline.is_timeline());
    }
}
