use super::*;
use crate::model::Note;
use crate::{build, parse};
use Pitch::{HighA, HighG, LowA, LowG, B, C, D, E, F};

fn expanded_source(body: &str) -> (Model, Vec<Warning>) {
    let source = format!("TuneTempo,90\n{}", body);
    let mut model = build(parse(source.as_bytes()).unwrap()).unwrap();
    let warnings = Expander::standard().expand_model(&mut model);
    (model, warnings)
}

fn graces(model: &Model) -> Vec<Option<Vec<Pitch>>> {
    model.tunes[0]
        .measures
        .iter()
        .flat_map(|m| m.symbols.iter())
        .filter_map(Symbol::note)
        .map(|n| n.expanded_embellishment.as_ref().map(|e| e.pitches.clone()))
        .collect()
}

#[test]
fn test_single_grace_ignores_melody() {
    let (model, warnings) = expanded_source("& gg LA_4 eg C_4 !t");
    assert!(warnings.is_empty());
    assert_eq!(
        graces(&model),
        vec![Some(vec![HighG]), Some(vec![E])]
    );
}

#[test]
fn test_doublings() {
    let (model, warnings) = expanded_source("& dblg LG_4 dbd D_4 hdbe E_4 tdbf F_4 dbhg HG_4 !t");
    assert!(warnings.is_empty());
    assert_eq!(
        graces(&model),
        vec![
            Some(vec![HighG, LowG, D]),
            Some(vec![HighG, D, E]),
            Some(vec![E, F]),
            Some(vec![HighA, F, HighG]),
            Some(vec![HighG, F]),
        ]
    );
}

#[test]
fn test_grips_and_taorluaths() {
    let (model, _) = expanded_source("& grp B_4 grp D_4 ggrpc C_4 tar LA_4 ttar D_4 !t");
    assert_eq!(
        graces(&model),
        vec![
            Some(vec![LowG, D, LowG]),
            Some(vec![LowG, B, LowG]),
            Some(vec![HighG, LowG, D, LowG]),
            Some(vec![LowG, D, LowG, E]),
            Some(vec![HighA, LowG, B, LowG, E]),
        ]
    );
}

#[test]
fn test_strikes_follow_melody() {
    let (model, _) = expanded_source("& strla LA_4 gstd D_4 lgstd D_4 thrd D_4 !t");
    assert_eq!(
        graces(&model),
        vec![
            Some(vec![LowG]),
            Some(vec![HighG, D, LowG]),
            Some(vec![HighG, D, C]),
            Some(vec![LowG, D, C]),
        ]
    );
}

#[test]
fn test_unrealisable_embellishment_stays_unexpanded() {
    // no thumb doubling on high A
    let (model, warnings) = expanded_source("& tdbha HA_4 dbla LA_4 !t");
    assert_eq!(warnings.len(), 1);
    assert_eq!(warnings[0].measure, 1);
    assert_eq!(
        graces(&model),
        vec![None, Some(vec![HighG, LowA, D])]
    );
}

#[test]
fn test_missing_table_entry_is_not_an_empty_expansion() {
    let mut table = EmbellishmentTable::new();
    table.register(
        EmbellishmentKey::new(EmbellishmentType::SingleGrace, EmbellishmentVariant::None),
        |e: &Embellishment, _: Pitch| Some(vec![e.pitch]),
    );
    let expander = Expander::new(table);

    let mut model = build(parse(b"& ag LA_4 dbla LA_4 !t").unwrap()).unwrap();
    let warnings = expander.expand_model(&mut model);
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].message.contains("no expansion for Doubling/None"));
    assert_eq!(graces(&model), vec![Some(vec![LowA]), None]);
}

#[test]
fn test_custom_strategy_sees_the_symbol() {
    struct Echo;
    impl ExpansionStrategy for Echo {
        fn expand(&self, symbol: &Symbol, melody: Pitch) -> Option<Vec<Pitch>> {
            let note = symbol.note()?;
            Some(vec![note.pitch, melody])
        }
    }

    let mut table = EmbellishmentTable::standard();
    let before = table.len();
    table.register(
        EmbellishmentKey::new(EmbellishmentType::Doubling, EmbellishmentVariant::None),
        Echo,
    );
    assert_eq!(table.len(), before);

    let mut model = build(parse(b"& dbc C_4 !t").unwrap()).unwrap();
    let warnings = Expander::new(table).expand_model(&mut model);
    assert!(warnings.is_empty());
    assert_eq!(graces(&model), vec![Some(vec![C, C])]);
}

#[test]
fn test_notes_without_embellishment_are_skipped() {
    let mut model = Model::default();
    let mut tune = crate::model::Tune::default();
    let mut measure = crate::model::Measure::default();
    measure.symbols.push(Symbol::Note(Note::new(LowA, crate::model::Length::Quarter)));
    tune.measures.push(measure);
    model.tunes.push(tune);

    let before = model.clone();
    let warnings = Expander::standard().expand_model(&mut model);
    assert!(warnings.is_empty());
    assert_eq!(model, before);
}

#[test]
fn test_every_builder_embellishment_has_an_entry() {
    let table = EmbellishmentTable::standard();
    for text in [
        "ag", "dlg", "dbla", "hdbla", "tdbla", "strla", "gstla", "tstla", "hstla", "st2la",
        "gst2la", "tst2la", "hst2la", "st3la", "gst3la", "tst3la", "hst3la", "grp", "ggrpla",
        "tgrpla", "hgrp", "tar", "gtar", "ttar", "htar", "bubly", "hbubly", "brl", "abr", "gbr",
        "tbr", "thrd", "hvthrd", "hthrd", "hhvthrd", "pella", "tpella", "hpella", "edre",
        "gedre", "tedre", "dre", "dare", "darodo", "hdarodo", "chedare", "crunl",
    ] {
        let kind = crate::grammar::classify(text).unwrap();
        let embellishment = crate::builder::glyphs::embellishment(kind, text).unwrap();
        assert!(
            table.contains(&EmbellishmentKey::from(&embellishment)),
            "no table entry for '{}'",
            text
        );
    }
}

#[test]
fn test_expand_is_deterministic() {
    let source = b"& gg LA_4 grp B_4 tar D_4 ! dbe E_4 brl LA_4 !t";
    let once = expand(build(parse(source).unwrap()).unwrap());
    let twice = expand(build(parse(source).unwrap()).unwrap());
    assert_eq!(once, twice);
}
