//! Decoding of glyph text into model values.
//!
//! The parser has already classified every word, so these functions only look
//! at the parts of the text that carry data: pitch prefixes and suffixes,
//! length suffixes, numbers. Text that does not decode yields the `None`
//! sentinel of the target type; validity is judged by the caller.

use crate::grammar::GlyphKind;
use crate::model::*;

/// `LA_8`, `HGr_16`, `Bl_4` -> pitch and length.
pub fn melody(text: &str) -> (Pitch, Length) {
    match text.split_once('_') {
        Some((prefix, suffix)) => {
            let letters = prefix.trim_end_matches(|c: char| c == 'l' || c == 'r');
            (Pitch::from_melody_prefix(letters), Length::from_suffix(suffix))
        }
        None => (Pitch::None, Length::None),
    }
}

/// `REST_4` -> quarter.
pub fn rest_length(text: &str) -> Length {
    text.strip_prefix("REST_")
        .map(Length::from_suffix)
        .unwrap_or(Length::None)
}

/// `6_8`, `C`, `C_`. `None` when a number does not fit.
pub fn time_signature(kind: GlyphKind, text: &str) -> Option<TimeSignature> {
    match kind {
        GlyphKind::CommonTime => Some(TimeSignature::common()),
        GlyphKind::CutTime => Some(TimeSignature::cut()),
        _ => {
            let (beats, beat_type) = text.split_once('_')?;
            Some(TimeSignature::new(beats.parse().ok()?, beat_type.parse().ok()?))
        }
    }
}

pub fn accidental(kind: GlyphKind) -> Accidental {
    match kind {
        GlyphKind::Sharp => Accidental::Sharp,
        GlyphKind::Flat => Accidental::Flat,
        GlyphKind::Natural => Accidental::Natural,
        _ => Accidental::None,
    }
}

/// `'la` -> 1, `''la` -> 2.
pub fn dots(kind: GlyphKind) -> u8 {
    match kind {
        GlyphKind::DoubleDot => 2,
        _ => 1,
    }
}

pub fn timeline_start(text: &str) -> Option<TimeLineKind> {
    let kind = match text {
        "'1" => TimeLineKind::First,
        "'2" => TimeLineKind::Second,
        "'22" => TimeLineKind::SecondOf2,
        "'23" => TimeLineKind::SecondOf3,
        "'24" => TimeLineKind::SecondOf4,
        "'25" => TimeLineKind::SecondOf5,
        "'26" => TimeLineKind::SecondOf6,
        "'27" => TimeLineKind::SecondOf7,
        "'28" => TimeLineKind::SecondOf8,
        "'224" => TimeLineKind::SecondOf2And4,
        "'bis" => TimeLineKind::Bis,
        "'intro" => TimeLineKind::Intro,
        "'si" => TimeLineKind::Singling,
        "'do" => TimeLineKind::Doubling,
        _ => return None,
    };
    Some(kind)
}

pub fn navigation(kind: GlyphKind) -> Option<Navigation> {
    match kind {
        GlyphKind::Segno => Some(Navigation::Segno),
        GlyphKind::DalSegno => Some(Navigation::DalSegno),
        GlyphKind::DaCapoAlFine => Some(Navigation::DaCapoAlFine),
        GlyphKind::Fine => Some(Navigation::Fine),
        GlyphKind::Coda => Some(Navigation::Coda),
        _ => None,
    }
}

/// How a structure glyph ends the current measure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Terminator {
    /// Closes the measure with this right barline.
    Right(Barline),
    /// Closes the measure and opens the next one with this left barline.
    Left(Barline),
}

pub fn terminator(kind: GlyphKind) -> Option<Terminator> {
    use BarlineType::*;
    let terminator = match kind {
        GlyphKind::Barline | GlyphKind::StaffEnd => Terminator::Right(Barline::new(Regular)),
        GlyphKind::PartEnd => Terminator::Right(Barline::new(LightHeavy)),
        GlyphKind::RepeatEnd => Terminator::Right(
            Barline::new(LightHeavy).with_timeline(BarlineTimeline::RepeatEnd),
        ),
        GlyphKind::PartStart => Terminator::Left(Barline::new(HeavyLight)),
        GlyphKind::RepeatStart => Terminator::Left(
            Barline::new(HeavyLight).with_timeline(BarlineTimeline::RepeatStart),
        ),
        _ => return None,
    };
    Some(terminator)
}

/// The embellishment a gracenote glyph stands for, `None` for other glyphs.
pub fn embellishment(kind: GlyphKind, text: &str) -> Option<Embellishment> {
    use EmbellishmentType as T;
    use EmbellishmentVariant as V;
    use EmbellishmentWeight as W;

    // light strikes and peles on D are spelled with a leading `l`
    let light = if text.starts_with('l') { W::Light } else { W::None };

    let (ty, variant, weight) = match kind {
        GlyphKind::SingleGrace => {
            let first = text.chars().next().unwrap_or_default();
            return Some(Embellishment::single_grace(Pitch::from_grace_letter(first)));
        }
        GlyphKind::DoubleGrace => {
            let mut chars = text.chars();
            let first = chars.next().unwrap_or_default();
            return Some(Embellishment {
                pitch: Pitch::from_grace_letter(first),
                second_pitch: Pitch::from_code(chars.as_str()),
                ..Embellishment::new(T::DoubleGrace)
            });
        }
        GlyphKind::Doubling => (T::Doubling, V::None, W::None),
        GlyphKind::HalfDoubling => (T::Doubling, V::Half, W::None),
        GlyphKind::ThumbDoubling => (T::Doubling, V::Thumb, W::None),
        GlyphKind::Strike => (T::Strike, V::None, W::None),
        GlyphKind::GStrike => (T::Strike, V::G, light),
        GlyphKind::ThumbStrike => (T::Strike, V::Thumb, light),
        GlyphKind::HalfStrike => (T::Strike, V::Half, light),
        GlyphKind::DoubleStrike => (T::DoubleStrike, V::None, W::None),
        GlyphKind::GDoubleStrike => (T::DoubleStrike, V::G, W::None),
        GlyphKind::ThumbDoubleStrike => (T::DoubleStrike, V::Thumb, W::None),
        GlyphKind::HalfDoubleStrike => (T::DoubleStrike, V::Half, W::None),
        GlyphKind::TripleStrike => (T::TripleStrike, V::None, W::None),
        GlyphKind::GTripleStrike => (T::TripleStrike, V::G, W::None),
        GlyphKind::ThumbTripleStrike => (T::TripleStrike, V::Thumb, W::None),
        GlyphKind::HalfTripleStrike => (T::TripleStrike, V::Half, W::None),
        GlyphKind::Grip => (T::Grip, V::None, W::None),
        GlyphKind::GGrip => (T::Grip, V::G, W::None),
        GlyphKind::ThumbGrip => (T::Grip, V::Thumb, W::None),
        GlyphKind::HalfGrip => (T::Grip, V::Half, W::None),
        GlyphKind::Taorluath => (T::Taorluath, V::None, W::None),
        GlyphKind::GTaorluath => (T::Taorluath, V::G, W::None),
        GlyphKind::ThumbTaorluath => (T::Taorluath, V::Thumb, W::None),
        GlyphKind::HalfTaorluath => (T::Taorluath, V::Half, W::None),
        GlyphKind::Bubbly => (T::Bubbly, V::None, W::None),
        GlyphKind::HalfBubbly => (T::Bubbly, V::Half, W::None),
        GlyphKind::Birl => (T::Birl, V::None, W::Light),
        GlyphKind::ABirl => (T::Birl, V::None, W::None),
        GlyphKind::GBirl => (T::Birl, V::G, W::None),
        GlyphKind::ThumbBirl => (T::Birl, V::Thumb, W::None),
        GlyphKind::ThrowD => (T::ThrowD, V::None, W::Light),
        GlyphKind::HeavyThrowD => (T::ThrowD, V::None, W::Heavy),
        GlyphKind::HalfThrowD => (T::ThrowD, V::Half, W::Light),
        GlyphKind::HalfHeavyThrowD => (T::ThrowD, V::Half, W::Heavy),
        GlyphKind::Pele => (T::Pele, V::None, light),
        GlyphKind::ThumbPele => (T::Pele, V::Thumb, light),
        GlyphKind::HalfPele => (T::Pele, V::Half, light),
        GlyphKind::Edre => (T::Edre, V::None, W::None),
        GlyphKind::GEdre => (T::Edre, V::G, W::None),
        GlyphKind::ThumbEdre => (T::Edre, V::Thumb, W::None),
        GlyphKind::HalfEdre => (T::Edre, V::Half, W::None),
        GlyphKind::Dare => (T::Dare, V::None, W::None),
        GlyphKind::Darodo => (T::Darodo, V::None, W::None),
        GlyphKind::HalfDarodo => (T::Darodo, V::Half, W::None),
        GlyphKind::Chedare => (T::Chedare, V::None, W::None),
        GlyphKind::Crunluath => (T::Crunluath, V::None, W::None),
        _ => return None,
    };
    Some(Embellishment::new(ty).with_variant(variant).with_weight(weight))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::classify;

    fn decode(text: &str) -> Option<Embellishment> {
        classify(text).and_then(|kind| embellishment(kind, text))
    }

    #[test]
    fn test_melody() {
        assert_eq!(melody("LA_8"), (Pitch::LowA, Length::Eighth));
        assert_eq!(melody("HGr_16"), (Pitch::HighG, Length::Sixteenth));
        assert_eq!(melody("Fl_32"), (Pitch::F, Length::ThirtySecond));
        assert_eq!(melody("LX_4"), (Pitch::None, Length::Quarter));
        assert_eq!(melody("B_3"), (Pitch::B, Length::None));
    }

    #[test]
    fn test_time_signatures() {
        assert_eq!(
            time_signature(GlyphKind::TimeSignature, "6_8"),
            Some(TimeSignature::new(6, 8))
        );
        assert_eq!(
            time_signature(GlyphKind::CommonTime, "C"),
            Some(TimeSignature::common())
        );
        assert_eq!(time_signature(GlyphKind::TimeSignature, "4_1024"), None);
    }

    #[test]
    fn test_terminators() {
        assert_eq!(
            terminator(GlyphKind::RepeatStart),
            Some(Terminator::Left(
                Barline::new(BarlineType::HeavyLight).with_timeline(BarlineTimeline::RepeatStart)
            ))
        );
        assert_eq!(
            terminator(GlyphKind::StaffEnd),
            Some(Terminator::Right(Barline::new(BarlineType::Regular)))
        );
        assert_eq!(terminator(GlyphKind::Melody), None);
    }

    #[test]
    fn test_graces() {
        assert_eq!(decode("ag"), Some(Embellishment::single_grace(Pitch::LowA)));
        assert_eq!(decode("tg"), Some(Embellishment::single_grace(Pitch::HighA)));

        let double = decode("gla").unwrap();
        assert_eq!(double.kind, EmbellishmentType::DoubleGrace);
        assert_eq!((double.pitch, double.second_pitch), (Pitch::HighG, Pitch::LowA));
    }

    #[test]
    fn test_variants_and_weights() {
        let strike = decode("lgstd").unwrap();
        assert_eq!(strike.kind, EmbellishmentType::Strike);
        assert_eq!(strike.variant, EmbellishmentVariant::G);
        assert_eq!(strike.weight, EmbellishmentWeight::Light);

        let strike = decode("gstd").unwrap();
        assert_eq!(strike.weight, EmbellishmentWeight::None);

        let throw = decode("hhvthrd").unwrap();
        assert_eq!(throw.variant, EmbellishmentVariant::Half);
        assert_eq!(throw.weight, EmbellishmentWeight::Heavy);

        assert_eq!(decode("brl").unwrap().weight, EmbellishmentWeight::Light);
        assert_eq!(decode("abr").unwrap().weight, EmbellishmentWeight::None);
        assert_eq!(decode("dre").unwrap().variant, EmbellishmentVariant::Half);
        assert_eq!(decode("LA_4"), None);
    }
}
