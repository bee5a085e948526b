//! Postfix tuplet resolution.
//!
//! A marker such as `^3` comes after the notes it groups. Resolving it means
//! finding the run of `visible` notes that ends the measure so far and
//! bracketing it with one Start and one End boundary:
//!
//! ```text
//! LA_8 B_8 C_8 ^3      ->  [Start 3:2] LA B C [End 3:2]
//! ^3s LA_8 B_8 C_8 ^3  ->  [Start 3:2] LA B C [End 3:2]     (Start reused)
//! ^76e LA_8 B_8 C_8 ^3 ->  [End 7:6] [Start 3:2] LA B C [End 3:2]
//! ```

use crate::model::{Boundary, Symbol, Tuplet};

/// Bracket the last `visible` symbols of a measure as a tuplet.
///
/// Fails, leaving `symbols` untouched, when there are fewer than `visible`
/// symbols or when one of them is not a valid note.
pub fn close_postfix(symbols: &mut Vec<Symbol>, visible: u8, played: u8) -> Result<(), String> {
    let count = visible as usize;
    if symbols.len() < count {
        return Err(format!(
            "tuplet needs {} notes but the measure has {} symbol(s)",
            count,
            symbols.len()
        ));
    }

    let run_start = symbols.len() - count;
    if let Some(position) = symbols[run_start..]
        .iter()
        .position(|s| !s.is_valid_note())
    {
        return Err(format!(
            "tuplet run contains a non-note at position {}",
            run_start + position + 1
        ));
    }

    let open = run_start
        .checked_sub(1)
        .and_then(|before| match &symbols[before] {
            Symbol::Tuplet(t) if t.boundary == Boundary::Start => Some(*t),
            _ => None,
        });

    match open {
        Some(start) => {
            symbols.push(Symbol::Tuplet(Tuplet::end(start.visible, start.played)));
        }
        None => {
            symbols.insert(run_start, Symbol::Tuplet(Tuplet::start(visible, played)));
            symbols.push(Symbol::Tuplet(Tuplet::end(visible, played)));
        }
    }
    Ok(())
}
