use crate::error::BwwError;
use crate::parser::parse;

/// The source bytes of one tune of a multi-tune file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TuneSource<'a> {
    /// Last title description of the tune, empty when it has none
    pub title: String,
    pub bytes: &'a [u8],
}

/// Split a BWW file into its tunes, in document order.
///
/// Each slice runs from the tune's first header line to the end of its last
/// staff, so re-parsing a slice gives back exactly that tune.
pub fn split_tunes(bytes: &[u8]) -> Result<Vec<TuneSource<'_>>, BwwError> {
    let tree = parse(bytes)?;
    Ok(tree
        .tunes
        .iter()
        .map(|tune| TuneSource {
            title: tune.title().unwrap_or_default().to_string(),
            bytes: &bytes[tune.span.clone()],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const FILE: &[u8] = b"Bagpipe Reader:1.0\n\
        \"Highland Laddie\",(T,L,0,0,Times New Roman,16,700,0,0,18,0,0,0)\n\
        & sharpf sharpc 2_4 I!'' LA_4 !t\n\
        Bagpipe Reader:1.0\n\
        \"Caf\xe9 Reel\",(T,L,0,0)\n\
        & 2_2 HA_4 !I\n";

    #[test]
    fn test_split_by_title() {
        let tunes = split_tunes(FILE).unwrap();
        assert_eq!(tunes.len(), 2);
        assert_eq!(tunes[0].title, "Highland Laddie");
        assert!(tunes[0].bytes.starts_with(b"Bagpipe Reader:1.0\n\"Highland"));
        assert!(tunes[0].bytes.ends_with(b"LA_4 !t"));
        assert_eq!(tunes[1].title, "Caf\u{e9} Reel");
        assert!(tunes[1].bytes.ends_with(b"HA_4 !I"));
    }

    #[test]
    fn test_slices_reparse_to_one_tune() {
        for tune in split_tunes(FILE).unwrap() {
            let tree = parse(tune.bytes).unwrap();
            assert_eq!(tree.tunes.len(), 1);
            assert_eq!(tree.tunes[0].title().unwrap_or_default(), tune.title);
        }
    }

    #[test]
    fn test_untitled_tune() {
        let tunes = split_tunes(b"TuneTempo,80\n& LA_4 !t").unwrap();
        assert_eq!(tunes.len(), 1);
        assert_eq!(tunes[0].title, "");
    }
}
