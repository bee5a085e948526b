//! # Raw Parse Tree and Glyph Alphabet
//!
//! The raw tree mirrors the BWW grammar one to one and carries no musical
//! meaning yet:
//!
//! ```text
//! RawTree
//!   └── Vec<RawTune>
//!         ├── header: Vec<HeaderParam>   (version, config, tempo, description)
//!         ├── body: Vec<BodyItem>        (staff, tempo change, description)
//!         └── span: byte range of the tune in the source
//!
//! Staff
//!   └── Vec<Glyph>   (kind from the closed alphabet + original text)
//! ```
//!
//! Every staff word is classified into exactly one [`GlyphKind`]. Unknown words
//! are rejected by [`classify`]; anything that has the right shape is accepted
//! even when it makes no sense musically (a dot with no note before it, a
//! melody glyph with an odd length suffix). The model builder deals with those.

use std::ops::Range;

/// The parsed document: one entry per tune, in source order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTree {
    pub tunes: Vec<RawTune>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct RawTune {
    pub header: Vec<HeaderParam>,
    pub body: Vec<BodyItem>,
    /// Byte range of this tune in the original input.
    pub span: Range<usize>,
}

impl RawTune {
    /// The last title description of the tune, if any.
    pub fn title(&self) -> Option<&str> {
        let in_header = self.header.iter().filter_map(|p| match p {
            HeaderParam::Description(d) => Some(d),
            _ => None,
        });
        let in_body = self.body.iter().filter_map(|b| match b {
            BodyItem::Description(d) => Some(d),
            _ => None,
        });
        in_header
            .chain(in_body)
            .filter(|d| d.tag() == Some("T"))
            .last()
            .map(|d| d.text.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum HeaderParam {
    /// `Bagpipe Reader:1.0`
    Version { text: String },
    /// `Name,(v1,v2,...)` or `Name,value`
    Config { name: String, values: Vec<String> },
    /// `TuneTempo,90`, value kept as text
    Tempo { value: String },
    /// `"text",(T,L,0,0,Times New Roman,...)`
    Description(Description),
}

/// A quoted description line with its named sub-fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Description {
    pub text: String,
    pub fields: Vec<String>,
}

impl Description {
    /// The leading field tag: `T`itle, t`Y`pe, co`M`poser, `F`ooter, `I`nline.
    pub fn tag(&self) -> Option<&str> {
        self.fields.first().map(|f| f.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum BodyItem {
    Staff(Staff),
    Tempo { value: String },
    Description(Description),
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Staff {
    pub glyphs: Vec<Glyph>,
}

/// One staff word with its classification and position.
#[derive(Debug, Clone, PartialEq)]
pub struct Glyph {
    pub kind: GlyphKind,
    pub text: String,
    pub line: usize,
    pub column: usize,
}

/// The closed BWW glyph alphabet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GlyphKind {
    // staff structure
    Clef,
    Barline,
    StaffEnd,
    PartEnd,
    RepeatEnd,
    PartStart,
    RepeatStart,
    // meter
    TimeSignature,
    CommonTime,
    CutTime,
    // accidentals
    Sharp,
    Flat,
    Natural,
    // notes
    Melody,
    Rest,
    // gracenotes
    SingleGrace,
    DoubleGrace,
    Doubling,
    HalfDoubling,
    ThumbDoubling,
    Strike,
    GStrike,
    ThumbStrike,
    HalfStrike,
    DoubleStrike,
    GDoubleStrike,
    ThumbDoubleStrike,
    HalfDoubleStrike,
    TripleStrike,
    GTripleStrike,
    ThumbTripleStrike,
    HalfTripleStrike,
    Grip,
    GGrip,
    ThumbGrip,
    HalfGrip,
    Taorluath,
    GTaorluath,
    ThumbTaorluath,
    HalfTaorluath,
    Bubbly,
    HalfBubbly,
    Birl,
    ABirl,
    GBirl,
    ThumbBirl,
    ThrowD,
    HeavyThrowD,
    HalfThrowD,
    HalfHeavyThrowD,
    Pele,
    ThumbPele,
    HalfPele,
    Edre,
    GEdre,
    ThumbEdre,
    HalfEdre,
    Dare,
    Darodo,
    HalfDarodo,
    Chedare,
    Crunluath,
    // note modifiers
    SingleDot,
    DoubleDot,
    TieStart,
    TieEnd,
    TieOld,
    Fermata,
    // groupings
    TupletStart,
    TupletEnd,
    TupletMarker,
    TimeLineStart,
    TimeLineEnd,
    // navigation
    Segno,
    DalSegno,
    DaCapoAlFine,
    Fine,
    Coda,
    // layout
    Space,
}

const PITCH_CODES: [&str; 9] = ["lg", "la", "b", "c", "d", "e", "f", "hg", "ha"];

/// Tuplet codes with their (visible, played) note counts, longest code first
/// so that `^43s` is not read as a `4`.
pub const TUPLET_TABLE: [(&str, u8, u8); 9] = [
    ("43", 4, 3),
    ("46", 4, 6),
    ("53", 5, 3),
    ("54", 5, 4),
    ("64", 6, 4),
    ("74", 7, 4),
    ("76", 7, 6),
    ("2", 2, 3),
    ("3", 3, 2),
];

pub(crate) fn is_pitch_code(s: &str) -> bool {
    PITCH_CODES.contains(&s)
}

fn pitch_rank(code: &str) -> Option<usize> {
    PITCH_CODES.iter().position(|p| *p == code)
}

/// Split a tuplet glyph (`^3s`, `^76e`, `^3la`) into its code and the rest.
pub(crate) fn split_tuplet(text: &str) -> Option<(&'static str, u8, u8, &str)> {
    let rest = text.strip_prefix('^')?;
    TUPLET_TABLE
        .iter()
        .find(|(code, _, _)| rest.starts_with(code))
        .map(|(code, visible, played)| (*code, *visible, *played, &rest[code.len()..]))
}

/// Returns the glyph word with its prefix stripped when the rest is a pitch code.
fn pitched<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.strip_prefix(prefix).filter(|p| is_pitch_code(p))
}

fn is_number(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn is_melody(text: &str) -> bool {
    let Some((prefix, length)) = text.split_once('_') else {
        return false;
    };
    let letters = prefix.trim_end_matches(|c: char| c == 'l' || c == 'r');
    let flags = prefix.len() - letters.len();
    !letters.is_empty()
        && flags <= 1
        && letters.chars().all(|c| c.is_ascii_uppercase())
        && is_number(length)
}

fn is_time_signature(text: &str) -> bool {
    matches!(text.split_once('_'), Some((beats, beat_type)) if is_number(beats) && is_number(beat_type))
}

/// X grace followed by a lower Y grace (`dlg`, `gla`, `thg`).
fn is_double_grace(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    let first_rank = match first {
        'd' => 4,
        'e' => 5,
        'f' => 6,
        'g' => 7,
        't' => 8,
        _ => return false,
    };
    matches!(pitch_rank(chars.as_str()), Some(rank) if rank < first_rank)
}

/// Classify one staff word. Returns `None` for words outside the alphabet.
pub fn classify(text: &str) -> Option<GlyphKind> {
    use GlyphKind::*;

    let exact = match text {
        "&" => Some(Clef),
        "!" => Some(Barline),
        "!t" => Some(StaffEnd),
        "!I" => Some(PartEnd),
        "''!I" => Some(RepeatEnd),
        "I!" => Some(PartStart),
        "I!''" => Some(RepeatStart),
        "C" => Some(CommonTime),
        "C_" => Some(CutTime),
        "space" => Some(Space),
        "segno" => Some(Segno),
        "dalsegno" => Some(DalSegno),
        "dacapoalfine" => Some(DaCapoAlFine),
        "fine" => Some(Fine),
        "coda" => Some(Coda),
        "grp" | "grpb" => Some(Grip),
        "hgrp" => Some(HalfGrip),
        "tar" | "tarb" => Some(Taorluath),
        "gtar" => Some(GTaorluath),
        "ttar" => Some(ThumbTaorluath),
        "htar" => Some(HalfTaorluath),
        "bubly" => Some(Bubbly),
        "hbubly" => Some(HalfBubbly),
        "brl" => Some(Birl),
        "abr" => Some(ABirl),
        "gbr" => Some(GBirl),
        "tbr" => Some(ThumbBirl),
        "thrd" => Some(ThrowD),
        "hvthrd" => Some(HeavyThrowD),
        "hthrd" => Some(HalfThrowD),
        "hhvthrd" => Some(HalfHeavyThrowD),
        "lgstd" => Some(GStrike),
        "ltstd" => Some(ThumbStrike),
        "lhstd" => Some(HalfStrike),
        "lpeld" => Some(Pele),
        "ltpeld" => Some(ThumbPele),
        "lhpeld" => Some(HalfPele),
        "edre" => Some(Edre),
        "gedre" => Some(GEdre),
        "tedre" => Some(ThumbEdre),
        "dre" => Some(HalfEdre),
        "dare" => Some(Dare),
        "darodo" => Some(Darodo),
        "hdarodo" => Some(HalfDarodo),
        "chedare" => Some(Chedare),
        "crunl" => Some(Crunluath),
        "^ts" => Some(TieStart),
        "^te" => Some(TieEnd),
        "_'" | "bis_'" => Some(TimeLineEnd),
        "'1" | "'2" | "'22" | "'23" | "'24" | "'25" | "'26" | "'27" | "'28" | "'224" | "'bis"
        | "'intro" | "'si" | "'do" => Some(TimeLineStart),
        _ => None,
    };
    if exact.is_some() {
        return exact;
    }

    if text.len() == 2 && text.ends_with('g') && matches!(text.as_bytes()[0], b'a'..=b'g' | b't') {
        return Some(SingleGrace);
    }
    if let Some(rest) = text.strip_prefix("REST_") {
        return is_number(rest).then_some(Rest);
    }
    if is_time_signature(text) {
        return Some(TimeSignature);
    }
    if is_melody(text) {
        return Some(Melody);
    }
    if text.starts_with('^') {
        if let Some(pitch) = pitched(text, "^t") {
            // ^te is the tie end, matched above
            return (pitch != "e").then_some(TieOld);
        }
        let (_, _, _, rest) = split_tuplet(text)?;
        return match rest {
            "s" => Some(TupletStart),
            "e" => Some(TupletEnd),
            "" => Some(TupletMarker),
            p if is_pitch_code(p) => Some(TupletMarker),
            _ => None,
        };
    }
    if pitched(text, "''").is_some() {
        return Some(DoubleDot);
    }
    if pitched(text, "'").is_some() {
        return Some(SingleDot);
    }

    // Prefix families, longest prefixes first where they overlap.
    let families: [(&str, GlyphKind); 24] = [
        ("sharp", Sharp),
        ("flat", Flat),
        ("natural", Natural),
        ("fermat", Fermata),
        ("hdb", HalfDoubling),
        ("tdb", ThumbDoubling),
        ("db", Doubling),
        ("gst2", GDoubleStrike),
        ("tst2", ThumbDoubleStrike),
        ("hst2", HalfDoubleStrike),
        ("st2", DoubleStrike),
        ("gst3", GTripleStrike),
        ("tst3", ThumbTripleStrike),
        ("hst3", HalfTripleStrike),
        ("st3", TripleStrike),
        ("gst", GStrike),
        ("tst", ThumbStrike),
        ("hst", HalfStrike),
        ("str", Strike),
        ("ggrp", GGrip),
        ("tgrp", ThumbGrip),
        ("tpel", ThumbPele),
        ("hpel", HalfPele),
        ("pel", Pele),
    ];
    if let Some((_, kind)) = families
        .iter()
        .find(|(prefix, _)| pitched(text, prefix).is_some())
    {
        return Some(*kind);
    }

    if is_double_grace(text) {
        return Some(DoubleGrace);
    }
    None
}
