//! YAML persistence of the music model.
//!
//! Every field is written, `None` sentinels and unexpanded embellishments
//! included, so `from_yaml(&to_yaml(&model)?)?` gives back an equal model.
//! Golden files in the integration tests rely on this.

use crate::error::BwwError;
use crate::model::Model;

pub fn to_yaml(model: &Model) -> Result<String, BwwError> {
    Ok(serde_yaml::to_string(model)?)
}

pub fn from_yaml(text: &str) -> Result<Model, BwwError> {
    Ok(serde_yaml::from_str(text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    #[test]
    fn test_sentinels_survive() {
        let mut note = Note::new(Pitch::None, Length::Eighth);
        note.embellishment = Some(Embellishment::new(EmbellishmentType::Grip));
        let model = Model {
            tunes: vec![Tune {
                title: "Sentinels".to_string(),
                measures: vec![Measure {
                    symbols: vec![Symbol::Note(note)],
                    ..Measure::default()
                }],
                ..Tune::default()
            }],
        };

        let text = to_yaml(&model).unwrap();
        assert!(text.contains("pitch: None"));
        assert!(text.contains("expanded_embellishment: null"));
        assert_eq!(from_yaml(&text).unwrap(), model);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            from_yaml("tunes: [ {title: 3, measures: oops} ]"),
            Err(BwwError::Serialization(_))
        ));
    }
}
