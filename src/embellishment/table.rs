//! The standard embellishment realisations.
//!
//! Every function here takes the notated embellishment and the pitch of the
//! melody note it decorates and returns the grace pitches in playing order,
//! or `None` when the embellishment cannot be played before that note.

use super::{EmbellishmentKey, EmbellishmentTable};
use crate::model::{Embellishment, EmbellishmentType, EmbellishmentVariant, EmbellishmentWeight, Pitch};
use Pitch::{HighA, HighG, LowA, LowG, B, C, D, E, F};

const ALL_VARIANTS: [EmbellishmentVariant; 4] = [
    EmbellishmentVariant::None,
    EmbellishmentVariant::G,
    EmbellishmentVariant::Half,
    EmbellishmentVariant::Thumb,
];

pub(super) fn register_standard(table: &mut EmbellishmentTable) {
    use EmbellishmentType as T;
    use EmbellishmentVariant as V;

    table.register(EmbellishmentKey::new(T::SingleGrace, V::None), single_grace);
    table.register(EmbellishmentKey::new(T::DoubleGrace, V::None), double_grace);

    for variant in [V::None, V::Half, V::Thumb] {
        table.register(EmbellishmentKey::new(T::Doubling, variant), doubling);
    }
    for variant in ALL_VARIANTS {
        table.register(EmbellishmentKey::new(T::Strike, variant), strike);
        table.register(EmbellishmentKey::new(T::DoubleStrike, variant), double_strike);
        table.register(EmbellishmentKey::new(T::TripleStrike, variant), triple_strike);
        table.register(EmbellishmentKey::new(T::Grip, variant), grip);
        table.register(EmbellishmentKey::new(T::Taorluath, variant), taorluath);
        table.register(EmbellishmentKey::new(T::Edre, variant), edre);
    }
    for variant in [V::None, V::Half] {
        table.register(EmbellishmentKey::new(T::Bubbly, variant), bubbly);
        table.register(EmbellishmentKey::new(T::ThrowD, variant), throw_d);
        table.register(EmbellishmentKey::new(T::Darodo, variant), bubbly);
    }
    for variant in [V::None, V::G, V::Thumb] {
        table.register(EmbellishmentKey::new(T::Birl, variant), birl);
    }
    for variant in [V::None, V::Thumb, V::Half] {
        table.register(EmbellishmentKey::new(T::Pele, variant), pele);
    }
    table.register(EmbellishmentKey::new(T::Dare, V::None), fixed(&[F, E, HighG, E]));
    table.register(EmbellishmentKey::new(T::Chedare, V::None), fixed(&[HighG, F, E, HighG, E]));
    table.register(
        EmbellishmentKey::new(T::Crunluath, V::None),
        fixed(&[LowG, D, LowG, E, LowA, F, LowA]),
    );
}

/// A strategy that ignores the melody note.
fn fixed(pitches: &'static [Pitch]) -> impl Fn(&Embellishment, Pitch) -> Option<Vec<Pitch>> {
    move |_: &Embellishment, _: Pitch| Some(pitches.to_vec())
}

/// The leading gracenote a G or thumb variant adds.
fn lead(variant: EmbellishmentVariant) -> Option<Pitch> {
    match variant {
        EmbellishmentVariant::G => Some(HighG),
        EmbellishmentVariant::Thumb => Some(HighA),
        EmbellishmentVariant::None | EmbellishmentVariant::Half => None,
    }
}

fn with_lead(variant: EmbellishmentVariant, mut body: Vec<Pitch>) -> Vec<Pitch> {
    if let Some(pitch) = lead(variant) {
        body.insert(0, pitch);
    }
    body
}

/// Gracenote struck below a melody note.
fn strike_pitch(melody: Pitch, light: bool) -> Option<Pitch> {
    match melody {
        D if light => Some(C),
        LowA | B | C | D => Some(LowG),
        E => Some(LowA),
        F => Some(E),
        HighG => Some(F),
        HighA => Some(HighG),
        LowG | Pitch::None => None,
    }
}

fn is_light(embellishment: &Embellishment) -> bool {
    embellishment.weight == EmbellishmentWeight::Light
}

fn single_grace(embellishment: &Embellishment, _melody: Pitch) -> Option<Vec<Pitch>> {
    (!embellishment.pitch.is_none()).then(|| vec![embellishment.pitch])
}

fn double_grace(embellishment: &Embellishment, _melody: Pitch) -> Option<Vec<Pitch>> {
    if embellishment.pitch.is_none() || embellishment.second_pitch.is_none() {
        return None;
    }
    Some(vec![embellishment.pitch, embellishment.second_pitch])
}

fn doubling(embellishment: &Embellishment, melody: Pitch) -> Option<Vec<Pitch>> {
    let tail = match melody {
        LowG | LowA | B | C => vec![melody, D],
        D => vec![D, E],
        E => vec![E, F],
        F => vec![F, HighG],
        HighG => vec![HighG, F],
        HighA => vec![HighA, HighG],
        Pitch::None => return None,
    };
    let mut pitches = match embellishment.variant {
        EmbellishmentVariant::None if !matches!(melody, HighG | HighA) => vec![HighG],
        EmbellishmentVariant::Thumb if melody == HighA => return None,
        EmbellishmentVariant::Thumb => vec![HighA],
        _ => Vec::new(),
    };
    pitches.extend(tail);
    Some(pitches)
}

/// `repeats` strikes on the melody note, `[S, M, S, ...]`.
fn strikes(embellishment: &Embellishment, melody: Pitch, repeats: usize) -> Option<Vec<Pitch>> {
    let low = strike_pitch(melody, is_light(embellishment))?;
    let mut body = Vec::new();
    let leading_melody = !matches!(embellishment.variant, EmbellishmentVariant::None);
    if leading_melody {
        if lead(embellishment.variant) == Some(melody) {
            return None;
        }
        body.push(melody);
    }
    body.push(low);
    for _ in 1..repeats {
        body.push(melody);
        body.push(low);
    }
    Some(with_lead(embellishment.variant, body))
}

fn strike(embellishment: &Embellishment, melody: Pitch) -> Option<Vec<Pitch>> {
    strikes(embellishment, melody, 1)
}

fn double_strike(embellishment: &Embellishment, melody: Pitch) -> Option<Vec<Pitch>> {
    strikes(embellishment, melody, 2)
}

fn triple_strike(embellishment: &Embellishment, melody: Pitch) -> Option<Vec<Pitch>> {
    strikes(embellishment, melody, 3)
}

fn grip_body(melody: Pitch) -> Vec<Pitch> {
    if melody == D {
        vec![LowG, B, LowG]
    } else {
        vec![LowG, D, LowG]
    }
}

fn grip(embellishment: &Embellishment, melody: Pitch) -> Option<Vec<Pitch>> {
    if melody.is_none() {
        return None;
    }
    Some(with_lead(embellishment.variant, grip_body(melody)))
}

fn taorluath(embellishment: &Embellishment, melody: Pitch) -> Option<Vec<Pitch>> {
    if melody.is_none() {
        return None;
    }
    let mut body = grip_body(melody);
    body.push(E);
    Some(with_lead(embellishment.variant, body))
}

/// Bubbly and darodo share one figure.
fn bubbly(embellishment: &Embellishment, _melody: Pitch) -> Option<Vec<Pitch>> {
    let mut pitches = vec![LowG, D, LowG, C, LowG];
    if embellishment.variant == EmbellishmentVariant::Half {
        pitches.remove(0);
    }
    Some(pitches)
}

fn birl(embellishment: &Embellishment, _melody: Pitch) -> Option<Vec<Pitch>> {
    let body = if is_light(embellishment) {
        vec![LowG, LowA, LowG]
    } else {
        vec![LowA, LowG, LowA, LowG]
    };
    Some(with_lead(embellishment.variant, body))
}

fn throw_d(embellishment: &Embellishment, _melody: Pitch) -> Option<Vec<Pitch>> {
    let heavy = embellishment.weight == EmbellishmentWeight::Heavy;
    let half = embellishment.variant == EmbellishmentVariant::Half;
    let pitches = match (half, heavy) {
        (false, false) => vec![LowG, D, C],
        (false, true) => vec![LowG, D, LowG, C],
        (true, false) => vec![D, C],
        (true, true) => vec![D, LowG, C],
    };
    Some(pitches)
}

fn pele(embellishment: &Embellishment, melody: Pitch) -> Option<Vec<Pitch>> {
    let upper = match melody {
        LowA | B | C | D => E,
        E => F,
        F => HighG,
        HighG => HighA,
        LowG | HighA | Pitch::None => return None,
    };
    let low = strike_pitch(melody, is_light(embellishment))?;
    let mut pitches = match embellishment.variant {
        EmbellishmentVariant::Half => Vec::new(),
        EmbellishmentVariant::Thumb => vec![HighA],
        _ => vec![HighG],
    };
    pitches.extend([melody, upper, melody, low]);
    Some(pitches)
}

fn edre(embellishment: &Embellishment, _melody: Pitch) -> Option<Vec<Pitch>> {
    let mut body = vec![E, LowA, F, LowA];
    if embellishment.variant == EmbellishmentVariant::Half {
        body.remove(0);
    }
    Some(with_lead(embellishment.variant, body))
}
