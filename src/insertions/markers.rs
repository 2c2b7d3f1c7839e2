//! Annotated rendering of an edited algorithm.

use super::wide::WideMove;
use super::Edit;
use crate::core::moves::Move;
use std::collections::BTreeMap;

const INSERTION_GLYPHS: [&str; 6] = ["@", "#", "$", "%", "&", "*"];
const REPLACEMENT_BRACKETS: [(&str, &str); 3] = [("[", "]"), ("{", "}"), ("<", ">")];

/// Original moves with a symbol at every edit, and what each symbol means.
#[derive(Clone, PartialEq, Eq, Debug, Default)]
pub struct Markers {
    /// Space-separated original moves interleaved with symbols. Replaced
    /// spans are wrapped in an opening and closing bracket.
    pub text: String,
    /// Symbol to the moves it stands for. Replacements are keyed by their
    /// opening bracket.
    pub symbols: BTreeMap<String, Vec<WideMove>>,
}

impl Markers {
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Symbol for the `n`th insertion: `@`, `#`, ... then `@@`, `##`, ...
fn insertion_symbol(n: usize) -> String {
    let glyph = INSERTION_GLYPHS[n % INSERTION_GLYPHS.len()];
    glyph.repeat(n / INSERTION_GLYPHS.len() + 1)
}

fn replacement_brackets(n: usize) -> (String, String) {
    let (open, close) = REPLACEMENT_BRACKETS[n % REPLACEMENT_BRACKETS.len()];
    let times = n / REPLACEMENT_BRACKETS.len() + 1;
    (open.repeat(times), close.repeat(times))
}

/// Render `edits`, which must be ordered by position in `original`.
pub fn add_markers(original: &[Move], edits: &[Edit]) -> Markers {
    let mut tokens: Vec<String> = Vec::new();
    let mut symbols = BTreeMap::new();
    let mut copied = 0usize;
    let (mut insertions, mut replacements) = (0usize, 0usize);

    let mut copy_to = |tokens: &mut Vec<String>, end: usize| {
        let end = end.min(original.len());
        if copied < end {
            tokens.extend(original[copied..end].iter().map(Move::to_string));
            copied = end;
        }
    };

    for edit in edits {
        match edit {
            Edit::Insertion { pos, moves } => {
                copy_to(&mut tokens, *pos);
                let symbol = insertion_symbol(insertions);
                insertions += 1;
                tokens.push(symbol.clone());
                symbols.insert(symbol, moves.clone());
            }
            Edit::Replacement { start, end, moves } => {
                copy_to(&mut tokens, *start);
                let (open, close) = replacement_brackets(replacements);
                replacements += 1;
                tokens.push(open.clone());
                copy_to(&mut tokens, *end);
                tokens.push(close);
                symbols.insert(open, moves.clone());
            }
        }
    }
    copy_to(&mut tokens, original.len());

    Markers {
        text: tokens.join(" "),
        symbols,
    }
}
