//! Longest-common-subsequence alignment between two hashed sequences.
//!
//! [`compare`] produces a minimal edit script descriptor; [`reduce`] replays
//! it left to right as skip/remove/add events. Elements are caller-supplied
//! hashes rather than raw values, so reordered or duplicate structurally
//! equal elements are recognized without deep comparison.

/// One step of the edit script.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKind {
    /// The elements are aligned (hashes equal); consume one from each side.
    Skip,
    /// Consume one element from the first sequence.
    Remove,
    /// Consume one element from the second sequence.
    Add,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    value: u32,
    kind: EditKind,
}

/// Edit-script descriptor over two sequences, with the shared prefix and
/// suffix trimmed off so the DP grid covers only the interior difference.
#[derive(Debug, Clone)]
pub struct LcsMatrix {
    prefix: usize,
    suffix: usize,
    /// Interior length of the second sequence.
    rows: usize,
    /// Interior length of the first sequence.
    cols: usize,
    cells: Vec<Cell>,
}

impl LcsMatrix {
    fn at(&self, i: usize, j: usize) -> Cell {
        self.cells[i * (self.cols + 1) + j]
    }

    /// Length of the minimal edit script (removes + adds).
    pub fn distance(&self) -> u32 {
        self.at(0, 0).value
    }
}

/// Build the edit-script descriptor for transforming `a` into `b`.
///
/// The grid is filled backward from the end, so `cell(i, j).value` is the
/// edit distance from position `(i, j)` to the end of both sequences and
/// `cell(i, j).kind` records the locally optimal move. Ties between a
/// remove and an add are broken in favor of the remove, which makes
/// remove-then-add the canonical order for a replaced element.
pub fn compare<T: PartialEq>(a: &[T], b: &[T]) -> LcsMatrix {
    let prefix = common_prefix(a, b);
    let suffix = if prefix < a.len() && prefix < b.len() {
        // Never let prefix + suffix overlap past the shorter sequence.
        common_suffix(a, b).min(a.len().min(b.len()) - prefix)
    } else {
        0
    };

    let cols = a.len() - prefix - suffix;
    let rows = b.len() - prefix - suffix;
    let w = cols + 1;

    let mut cells = vec![
        Cell {
            value: 0,
            kind: EditKind::Skip,
        };
        (rows + 1) * w
    ];
    // Bottom row: only removals from `a` remain.
    for j in 0..cols {
        cells[rows * w + j] = Cell {
            value: (cols - j) as u32,
            kind: EditKind::Remove,
        };
    }
    // Right column: only additions from `b` remain.
    for i in 0..rows {
        cells[i * w + cols] = Cell {
            value: (rows - i) as u32,
            kind: EditKind::Add,
        };
    }

    for j in (0..cols).rev() {
        for i in (0..rows).rev() {
            cells[i * w + j] = if a[prefix + j] == b[prefix + i] {
                Cell {
                    value: cells[(i + 1) * w + (j + 1)].value,
                    kind: EditKind::Skip,
                }
            } else {
                let remove = cells[i * w + (j + 1)].value;
                let add = cells[(i + 1) * w + j].value;
                if remove <= add {
                    Cell {
                        value: remove + 1,
                        kind: EditKind::Remove,
                    }
                } else {
                    Cell {
                        value: add + 1,
                        kind: EditKind::Add,
                    }
                }
            };
        }
    }

    LcsMatrix {
        prefix,
        suffix,
        rows,
        cols,
        cells,
    }
}

/// Fold `f` over the edit script left to right.
///
/// `f` receives `(accumulator, kind, i, j)` where `i` indexes the second
/// sequence and `j` the first, both in the coordinates of the original
/// (untrimmed) inputs. The trimmed prefix and suffix are re-emitted as
/// `Skip` events first and last. For `Add` events `j` is the index in the
/// first sequence before which the element is inserted, and may equal its
/// length; `Skip` and `Remove` events always carry in-range indices.
pub fn reduce<R, F>(lcs: &LcsMatrix, init: R, mut f: F) -> R
where
    F: FnMut(R, EditKind, usize, usize) -> R,
{
    let mut r = init;

    for k in 0..lcs.prefix {
        r = f(r, EditKind::Skip, k, k);
    }

    let (mut i, mut j) = (0, 0);
    while i < lcs.rows || j < lcs.cols {
        let kind = lcs.at(i, j).kind;
        r = f(r, kind, lcs.prefix + i, lcs.prefix + j);
        match kind {
            EditKind::Skip => {
                i += 1;
                j += 1;
            }
            EditKind::Remove => j += 1,
            EditKind::Add => i += 1,
        }
    }

    for k in 0..lcs.suffix {
        r = f(
            r,
            EditKind::Skip,
            lcs.prefix + lcs.rows + k,
            lcs.prefix + lcs.cols + k,
        );
    }

    r
}

fn common_prefix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    let l = a.len().min(b.len());
    let mut i = 0;
    while i < l && a[i] == b[i] {
        i += 1;
    }
    i
}

fn common_suffix<T: PartialEq>(a: &[T], b: &[T]) -> usize {
    // Leave at least one element on each side for the DP interior.
    let l = a.len().min(b.len()).saturating_sub(1);
    let mut i = 0;
    while i < l && a[a.len() - 1 - i] == b[b.len() - 1 - i] {
        i += 1;
    }
    i
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script(a: &[i32], b: &[i32]) -> Vec<(EditKind, usize, usize)> {
        let m = compare(a, b);
        reduce(&m, Vec::new(), |mut acc, kind, i, j| {
            acc.push((kind, i, j));
            acc
        })
    }

    #[test]
    fn equal_sequences_are_all_skips() {
        let events = script(&[1, 2, 3], &[1, 2, 3]);
        assert!(events.iter().all(|(k, _, _)| *k == EditKind::Skip));
        assert_eq!(events.len(), 3);
        assert_eq!(compare(&[1, 2, 3], &[1, 2, 3]).distance(), 0);
    }

    #[test]
    fn single_removal_in_the_middle() {
        let events = script(&[1, 2, 3], &[1, 3]);
        assert_eq!(
            events,
            vec![
                (EditKind::Skip, 0, 0),
                (EditKind::Remove, 1, 1),
                (EditKind::Skip, 1, 2),
            ]
        );
    }

    #[test]
    fn single_insertion_in_the_middle() {
        let events = script(&[1, 3], &[1, 2, 3]);
        assert_eq!(
            events,
            vec![
                (EditKind::Skip, 0, 0),
                (EditKind::Add, 1, 1),
                (EditKind::Skip, 2, 1),
            ]
        );
    }

    #[test]
    fn replace_prefers_remove_first() {
        let events = script(&[1, 2], &[1, 9]);
        assert_eq!(
            events,
            vec![
                (EditKind::Skip, 0, 0),
                (EditKind::Remove, 1, 1),
                (EditKind::Add, 1, 2),
            ]
        );
    }

    #[test]
    fn empty_to_full_is_all_adds() {
        let events = script(&[], &[1, 2]);
        assert_eq!(
            events,
            vec![(EditKind::Add, 0, 0), (EditKind::Add, 1, 0)]
        );
    }

    #[test]
    fn full_to_empty_is_all_removes() {
        let events = script(&[1, 2], &[]);
        assert_eq!(
            events,
            vec![(EditKind::Remove, 0, 0), (EditKind::Remove, 0, 1)]
        );
    }

    #[test]
    fn overlapping_prefix_and_suffix_stay_in_bounds() {
        // Candidate suffix overlaps the prefix; the clamp keeps the interior
        // well-formed.
        let a = [1, 2, 1];
        let b = [1, 2, 2, 1];
        let events = script(&a, &b);
        for (kind, i, j) in &events {
            match kind {
                EditKind::Skip => {
                    assert!(*i < b.len() && *j < a.len());
                    assert_eq!(a[*j], b[*i]);
                }
                EditKind::Remove => assert!(*j < a.len()),
                EditKind::Add => assert!(*i < b.len() && *j <= a.len()),
            }
        }
        // Replay the script and check it transforms a into b.
        let mut out: Vec<i32> = Vec::new();
        for (kind, i, j) in events {
            match kind {
                EditKind::Skip => out.push(a[j]),
                EditKind::Remove => {}
                EditKind::Add => out.push(b[i]),
            }
        }
        assert_eq!(out, b);
    }

    #[test]
    fn distance_counts_minimal_edits() {
        assert_eq!(compare(&[1, 2, 3], &[1, 3]).distance(), 1);
        assert_eq!(compare(&[1, 2], &[1, 9]).distance(), 2);
        assert_eq!(compare::<i32>(&[], &[]).distance(), 0);
    }

    #[test]
    fn duplicate_elements_align() {
        // The script for [a, a] -> [a, a, a] is one insertion.
        assert_eq!(compare(&[7, 7], &[7, 7, 7]).distance(), 1);
    }
}
