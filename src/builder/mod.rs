//! # Model Builder
//!
//! Converts the raw parse tree into the music [`Model`](crate::model::Model).
//!
//! ## Purpose
//!
//! A BWW staff is a flat stream of glyphs. Most glyphs do not stand for a
//! symbol of their own: they modify a neighbour. The builder walks the stream
//! once, keeping the measure under construction as a one-symbol lookback
//! buffer:
//!
//! | Glyph | Effect |
//! |-------|--------|
//! | melody (`LA_8`) | completes the previous incomplete note, or pushes a new note |
//! | gracenote (`ag`, `dbla`, `grp` ...) | pushes an incomplete note carrying the embellishment |
//! | accidental, `^ts` | same as a gracenote, carrying an accidental or a tie start |
//! | dot, `^te`, `^tX`, fermata | modifies the previous valid note |
//! | postfix tuplet (`^3`) | brackets the preceding run of notes |
//! | barline | closes the measure |
//!
//! ## Error policy
//!
//! An unparsable tempo aborts the tune with [`BwwError::BuildError`].
//! Attachment problems (a dot with nothing to attach to, a broken tuplet run,
//! a dangling gracenote) are logged, recorded as [`Warning`]s and the glyph is
//! dropped.
//!
//! ## Related Modules
//! - `glyphs` - Text decoding of individual glyphs
//! - `tuplets` - Postfix tuplet resolution
//! - `crate::embellishment` - Next stage, expands embellishments

pub mod glyphs;
pub mod tuplets;

use crate::error::{BwwError, Warning};
use crate::grammar::*;
use crate::model::*;
use glyphs::Terminator;

/// Build the model of a whole document, discarding warnings after logging them.
pub fn build(tree: RawTree) -> Result<Model, BwwError> {
    Builder::new().build(tree)
}

/// Model builder. Collects the warnings of every tune it builds.
#[derive(Debug, Default)]
pub struct Builder {
    warnings: Vec<Warning>,
}

impl Builder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn build(&mut self, tree: RawTree) -> Result<Model, BwwError> {
        let mut tunes = Vec::with_capacity(tree.tunes.len());
        for (i, raw) in tree.tunes.iter().enumerate() {
            tunes.push(self.build_tune(i + 1, raw)?);
        }
        log::debug!(
            "built {} tune(s), {} warning(s)",
            tunes.len(),
            self.warnings.len()
        );
        Ok(Model { tunes })
    }

    /// Build one tune. `index` is the 1-based position of the tune in its
    /// document, used in errors and warnings.
    pub fn build_tune(&mut self, index: usize, raw: &RawTune) -> Result<Tune, BwwError> {
        let mut tune = Tune::default();

        for param in &raw.header {
            match param {
                HeaderParam::Tempo { value } => tune.tempo = parse_tempo(index, value)?,
                HeaderParam::Description(d) => route_description(&mut tune, d),
                HeaderParam::Version { text } => log::debug!("tune {}: version '{}'", index, text),
                HeaderParam::Config { name, .. } => {
                    log::debug!("tune {}: ignoring config '{}'", index, name)
                }
            }
        }

        let mut measures = MeasureBuilder::new(index);
        for item in &raw.body {
            match item {
                BodyItem::Staff(staff) => {
                    for glyph in &staff.glyphs {
                        measures.push_glyph(glyph);
                    }
                }
                BodyItem::Tempo { value } => {
                    let bpm = parse_tempo(index, value)?;
                    measures.push_symbol(Symbol::TempoChange(TempoChange { bpm }));
                }
                BodyItem::Description(d) => route_description(&mut tune, d),
            }
        }

        let (built, warnings) = measures.finish();
        tune.measures = built;
        self.warnings.extend(warnings);
        Ok(tune)
    }

    pub fn take_warnings(&mut self) -> Vec<Warning> {
        std::mem::take(&mut self.warnings)
    }
}

fn parse_tempo(tune: usize, value: &str) -> Result<u32, BwwError> {
    value.trim().parse().map_err(|_| BwwError::BuildError {
        tune,
        message: format!("Invalid tempo '{}'", value),
    })
}

fn route_description(tune: &mut Tune, description: &Description) {
    let text = description.text.clone();
    match description.tag() {
        Some("T") => tune.title = text,
        Some("Y") => tune.tune_type = text,
        Some("M") => tune.composer = text,
        Some("F") => tune.footer = text,
        _ => {}
    }
}

/// Per-tune glyph stream state.
struct MeasureBuilder {
    tune: usize,
    measures: Vec<Measure>,
    current: Measure,
    /// Navigation mark for the right barline of the current measure.
    navigation: Option<Navigation>,
    open_timeline: Option<TimeLineKind>,
    /// An old style `^tX` tie is waiting for its closing note.
    tie_end_pending: bool,
    /// Between a clef and the first note: accidentals here are the key.
    in_prelude: bool,
    warnings: Vec<Warning>,
}

impl MeasureBuilder {
    fn new(tune: usize) -> Self {
        Self {
            tune,
            measures: Vec::new(),
            current: Measure::default(),
            navigation: None,
            open_timeline: None,
            tie_end_pending: false,
            in_prelude: false,
            warnings: Vec::new(),
        }
    }

    fn warn(&mut self, message: String) {
        let warning = Warning::new(self.tune, self.measures.len() + 1, message);
        log::warn!("{}", warning);
        self.warnings.push(warning);
    }

    fn push_symbol(&mut self, symbol: Symbol) {
        self.current.symbols.push(symbol);
    }

    /// The last symbol, when it is a note still waiting for its melody glyph.
    fn incomplete_tail(&mut self) -> Option<&mut Note> {
        self.current
            .symbols
            .last_mut()
            .and_then(Symbol::note_mut)
            .filter(|n| n.is_incomplete())
    }

    /// The last symbol, when it is a complete note.
    fn valid_tail(&mut self) -> Option<&mut Note> {
        self.current
            .symbols
            .last_mut()
            .and_then(Symbol::note_mut)
            .filter(|n| n.is_valid())
    }

    fn push_glyph(&mut self, glyph: &Glyph) {
        use GlyphKind::*;

        if let Some(terminator) = glyphs::terminator(glyph.kind) {
            self.in_prelude = false;
            match terminator {
                Terminator::Right(barline) => self.close_measure(Some(barline)),
                Terminator::Left(barline) => {
                    self.close_measure(None);
                    self.current.left_barline = Some(barline);
                }
            }
            return;
        }

        if let Some(embellishment) = glyphs::embellishment(glyph.kind, &glyph.text) {
            self.in_prelude = false;
            match self.incomplete_tail().filter(|n| n.embellishment.is_none()) {
                Some(note) => note.embellishment = Some(embellishment),
                None => self.push_symbol(Symbol::Note(Note {
                    embellishment: Some(embellishment),
                    ..Note::default()
                })),
            }
            return;
        }

        match glyph.kind {
            Clef => self.in_prelude = true,
            TimeSignature | CommonTime | CutTime => {
                match glyphs::time_signature(glyph.kind, &glyph.text) {
                    Some(time) => self.current.time = Some(time),
                    None => self.warn(format!("unusable time signature '{}'", glyph.text)),
                }
            }
            Sharp | Flat | Natural => {
                if self.in_prelude {
                    log::debug!("key signature accidental '{}'", glyph.text);
                    return;
                }
                let accidental = glyphs::accidental(glyph.kind);
                match self
                    .incomplete_tail()
                    .filter(|n| n.accidental == Accidental::None)
                {
                    Some(note) => note.accidental = accidental,
                    None => self.push_symbol(Symbol::Note(Note {
                        accidental,
                        ..Note::default()
                    })),
                }
            }
            Melody => {
                self.in_prelude = false;
                let (pitch, length) = glyphs::melody(&glyph.text);
                let tie_end = std::mem::take(&mut self.tie_end_pending);
                match self.incomplete_tail() {
                    Some(note) => {
                        note.pitch = pitch;
                        note.length = length;
                        if tie_end {
                            note.tie = Tie::End;
                        }
                    }
                    None => {
                        let mut note = Note::new(pitch, length);
                        if tie_end {
                            note.tie = Tie::End;
                        }
                        self.push_symbol(Symbol::Note(note));
                    }
                }
            }
            Rest => {
                self.in_prelude = false;
                let length = glyphs::rest_length(&glyph.text);
                self.push_symbol(Symbol::Rest(crate::model::Rest { length }));
            }
            SingleDot | DoubleDot => {
                let dots = glyphs::dots(glyph.kind);
                match self.valid_tail() {
                    Some(note) => note.dots = dots,
                    None => self.warn(format!("dot '{}' without a preceding note", glyph.text)),
                }
            }
            TieStart => match self.incomplete_tail() {
                Some(note) => note.tie = Tie::Start,
                None => self.push_symbol(Symbol::Note(Note {
                    tie: Tie::Start,
                    ..Note::default()
                })),
            },
            TieEnd => match self.valid_tail() {
                Some(note) => note.tie = Tie::End,
                None => self.warn("tie end without a preceding note".to_string()),
            },
            TieOld => match self.valid_tail() {
                Some(note) => {
                    note.tie = Tie::Start;
                    self.tie_end_pending = true;
                }
                None => self.warn(format!("tie '{}' without a preceding note", glyph.text)),
            },
            Fermata => match self.valid_tail() {
                Some(note) => note.fermata = true,
                None => self.warn(format!("fermata '{}' without a preceding note", glyph.text)),
            },
            TupletStart | TupletEnd | TupletMarker => self.push_tuplet(glyph),
            TimeLineStart => match glyphs::timeline_start(&glyph.text) {
                Some(kind) => {
                    self.open_timeline = Some(kind);
                    self.push_symbol(Symbol::TimeLine(TimeLine {
                        boundary: Boundary::Start,
                        kind,
                    }));
                }
                None => self.warn(format!("unknown timeline '{}'", glyph.text)),
            },
            TimeLineEnd => {
                let kind = if glyph.text == "bis_'" {
                    self.open_timeline.take().or(Some(TimeLineKind::Bis))
                } else {
                    self.open_timeline.take()
                };
                match kind {
                    Some(kind) => self.push_symbol(Symbol::TimeLine(TimeLine {
                        boundary: Boundary::End,
                        kind,
                    })),
                    None => self.warn("timeline end without an open timeline".to_string()),
                }
            }
            Segno => {
                self.current
                    .left_barline
                    .get_or_insert_with(|| crate::model::Barline::new(BarlineType::Regular))
                    .navigation = Some(Navigation::Segno);
            }
            DalSegno | DaCapoAlFine | Fine | Coda => {
                self.navigation = glyphs::navigation(glyph.kind);
            }
            Space => {}
            // barlines and gracenotes are handled above
            _ => log::debug!("glyph '{}' has no model effect", glyph.text),
        }
    }

    fn push_tuplet(&mut self, glyph: &Glyph) {
        let Some((_, visible, played, rest)) = split_tuplet(&glyph.text) else {
            self.warn(format!("unknown tuplet '{}'", glyph.text));
            return;
        };
        match glyph.kind {
            GlyphKind::TupletStart => self.push_symbol(Symbol::Tuplet(Tuplet::start(visible, played))),
            GlyphKind::TupletEnd => self.push_symbol(Symbol::Tuplet(Tuplet::end(visible, played))),
            _ => {
                log::debug!("postfix tuplet '{}' (pitch '{}')", glyph.text, rest);
                if let Err(message) =
                    tuplets::close_postfix(&mut self.current.symbols, visible, played)
                {
                    self.warn(format!("tuplet '{}' dropped: {}", glyph.text, message));
                }
            }
        }
    }

    /// Drop notes that never received their melody glyph.
    fn sweep_incomplete(&mut self) {
        let before = self.current.symbols.len();
        self.current
            .symbols
            .retain(|s| !matches!(s, Symbol::Note(n) if n.is_incomplete()));
        let dropped = before - self.current.symbols.len();
        if dropped > 0 {
            self.warn(format!("{} dangling gracenote(s) dropped", dropped));
        }
    }

    fn close_measure(&mut self, right: Option<Barline>) {
        self.sweep_incomplete();
        let mut measure = std::mem::take(&mut self.current);
        let navigation = self.navigation.take();

        if measure.symbols.is_empty() && measure.left_barline.is_none() {
            // nothing to emit; keep what the barline glyphs said
            self.current.time = measure.time;
            if let Some(previous) = self.measures.last_mut() {
                if let Some(barline) = right.filter(Barline::is_heavy) {
                    previous.right_barline = Some(barline);
                }
                if let Some(navigation) = navigation {
                    previous
                        .right_barline
                        .get_or_insert_with(|| Barline::new(BarlineType::Regular))
                        .navigation = Some(navigation);
                }
            }
            return;
        }

        let mut right = right;
        if let Some(navigation) = navigation {
            right
                .get_or_insert_with(|| Barline::new(BarlineType::Regular))
                .navigation = Some(navigation);
        }
        measure.right_barline = right;
        self.measures.push(measure);
    }

    fn finish(mut self) -> (Vec<Measure>, Vec<Warning>) {
        self.sweep_incomplete();
        if self.current.symbols.is_empty() {
            if let Some(barline) = self.current.left_barline.take() {
                log::debug!(
                    "tune {}: trailing {:?} barline with no notes dropped",
                    self.tune,
                    barline.kind
                );
            }
        }
        if !self.current.symbols.is_empty() || self.navigation.is_some() {
            self.close_measure(None);
        }
        if let Some(kind) = self.open_timeline {
            log::debug!("tune {}: timeline {:?} left open", self.tune, kind);
        }
        (self.measures, self.warnings)
    }
}
