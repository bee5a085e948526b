//! # bww
//!
//! Parser and music model builder for BWW, the text notation used by bagpipe
//! music software.
//!
//! ## Pipeline
//!
//! ```text
//! bytes ──parse──> RawTree ──build──> Model ──expand──> Model ──normalize_parts──> Vec<MusicPart>
//! ```
//!
//! 1. [`parse`] - tokenizes and parses the document into a [`RawTree`]
//! 2. [`build`] - converts the raw tree into a [`Model`] of tunes and measures
//! 3. [`expand`] - realises every embellishment as explicit gracenote pitches
//! 4. [`normalize_parts`] - splits timeline measures and partitions a tune into parts
//!
//! [`import`] runs all four stages under a [`PipelineConfig`].
//!
//! ## Example
//! ```rust
//! use bww::{import, PipelineConfig};
//!
//! let source = b"\"Scotland the Brave\",(T,L,0,0)\nTuneTempo,80\n\
//!     & sharpf sharpc 4_4 I!'' LA_4 gg LA_4 ! dbb B_4 ''!I\n";
//!
//! let import = import(source, &PipelineConfig::default()).unwrap();
//! let tune = &import.model.tunes[0];
//! assert_eq!(tune.title, "Scotland the Brave");
//! assert_eq!(tune.measures.len(), 2);
//! assert_eq!(import.parts[0].len(), 1);
//! assert!(import.parts[0].part(1).unwrap().with_repeat);
//! ```

pub mod builder;
pub mod config;
pub mod embellishment;
pub mod error;
pub mod grammar;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod parts;
pub mod split;
pub mod yaml;

pub use builder::{build, Builder};
pub use config::PipelineConfig;
pub use embellishment::{expand, EmbellishmentTable, Expander};
pub use error::*;
pub use grammar::RawTree;
pub use model::*;
pub use parser::parse;
pub use parts::{normalize_parts, normalize_timeline, TuneParts};
pub use split::{split_tunes, TuneSource};

/// The outcome of a whole-pipeline import.
#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub model: Model,
    /// Parts of each tune, same order as `model.tunes`. Empty when part
    /// normalization is turned off.
    pub parts: Vec<TuneParts>,
    /// Every recoverable problem, in the order it was found.
    pub warnings: Vec<Warning>,
}

/// Run the whole pipeline over one document.
///
/// In strict mode the first recoverable warning fails the import with
/// [`BwwError::StrictError`].
pub fn import(bytes: &[u8], config: &PipelineConfig) -> Result<Import, BwwError> {
    let tree = parse(bytes)?;

    let mut builder = Builder::new();
    let mut model = builder.build(tree)?;
    let mut warnings = builder.take_warnings();

    if config.expand_embellishments {
        warnings.extend(Expander::standard().expand_model(&mut model));
    }

    let mut parts = Vec::new();
    if config.normalize_parts {
        let tunes = std::mem::take(&mut model.tunes);
        for tune in tunes {
            let mut tune = normalize_timeline(tune);
            parts.push(TuneParts::from_tune(&mut tune));
            model.tunes.push(tune);
        }
    }

    if config.strict {
        if let Some(first) = warnings.first() {
            return Err(BwwError::StrictError {
                count: warnings.len(),
                first: first.clone(),
            });
        }
    }

    Ok(Import {
        model,
        parts,
        warnings,
    })
}
