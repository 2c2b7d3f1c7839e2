//! Longest-common-subsequence alignment of two move lists.

use std::ops::Range;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Tag {
    Equal,
    Replace,
    Delete,
    Insert,
}

/// One aligned span: `old[old]` corresponds to `new[new]`.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Opcode {
    pub tag: Tag,
    pub old: Range<usize>,
    pub new: Range<usize>,
}

/// Align `old` against `new` and describe how to turn one into the other.
///
/// Spans cover both inputs completely and in order. Unmatched elements
/// between two matches become a single replace, delete or insert span.
pub fn opcodes<T: PartialEq>(old: &[T], new: &[T]) -> Vec<Opcode> {
    let m = old.len();
    let n = new.len();

    let mut dp = vec![vec![0u32; n + 1]; m + 1];
    for i in (0..m).rev() {
        for j in (0..n).rev() {
            dp[i][j] = if old[i] == new[j] {
                dp[i + 1][j + 1] + 1
            } else {
                dp[i + 1][j].max(dp[i][j + 1])
            };
        }
    }

    let mut matched = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    while i < m && j < n {
        if old[i] == new[j] {
            matched.push((i, j));
            i += 1;
            j += 1;
        } else if dp[i + 1][j] >= dp[i][j + 1] {
            i += 1;
        } else {
            j += 1;
        }
    }
    // sentinel so the trailing gap is flushed like any other
    matched.push((m, n));

    let mut codes: Vec<Opcode> = Vec::new();
    let (mut i, mut j) = (0usize, 0usize);
    for (mi, mj) in matched {
        let tag = match (i < mi, j < mj) {
            (true, true) => Some(Tag::Replace),
            (true, false) => Some(Tag::Delete),
            (false, true) => Some(Tag::Insert),
            (false, false) => None,
        };
        if let Some(tag) = tag {
            codes.push(Opcode {
                tag,
                old: i..mi,
                new: j..mj,
            });
        }
        if mi < m && mj < n {
            match codes.last_mut() {
                Some(last) if last.tag == Tag::Equal => {
                    last.old.end = mi + 1;
                    last.new.end = mj + 1;
                }
                _ => codes.push(Opcode {
                    tag: Tag::Equal,
                    old: mi..mi + 1,
                    new: mj..mj + 1,
                }),
            }
        }
        i = mi + 1;
        j = mj + 1;
    }
    codes
}
