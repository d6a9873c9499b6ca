//! Minimum-cost assignment of input segments to contiguous reference spans.
//!
//! Each segment in turn claims a slice of the reference whose length is
//! within `window` of the segment's own length; the rest of the reference
//! is aligned recursively against the remaining segments. Subproblems are
//! keyed by `(reference offset, segment index)` and memoized, then the
//! winning path is read back out of the memo table.

use std::collections::HashMap;
use std::marker::PhantomData;

use crate::types::{Correspondence, Span};

/// How the subproblem at a memo key was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    /// No segments left; any remaining reference is orphaned.
    Exhausted,
    /// Reference used up; every remaining segment is elided at its end.
    ElideRest,
    /// The last segment takes the whole remaining reference.
    TakeRest,
    /// The remaining segments spell the remaining reference exactly.
    ExactPartition,
    /// The head segment takes `[offset, end)`.
    WindowedSearch { end: usize },
}

#[derive(Debug, Clone, Copy)]
struct Node {
    cost: f64,
    step: Step,
}

struct Solver<'a, T, S, E, F> {
    reference: &'a [T],
    segments: &'a [S],
    window: usize,
    cost: F,
    /// `suffix_lengths[i]` = total moras in `segments[i..]`
    suffix_lengths: Vec<usize>,
    memo: HashMap<(usize, usize), Node>,
    _error: PhantomData<fn() -> E>,
}

impl<'a, T, S, E, F> Solver<'a, T, S, E, F>
where
    T: PartialEq + Clone,
    S: AsRef<[T]>,
    F: FnMut(&[T], &[T]) -> Result<f64, E>,
{
    fn new(reference: &'a [T], segments: &'a [S], window: usize, cost: F) -> Self {
        let mut suffix_lengths = vec![0; segments.len() + 1];
        for i in (0..segments.len()).rev() {
            suffix_lengths[i] = suffix_lengths[i + 1] + segments[i].as_ref().len();
        }
        Self {
            reference,
            segments,
            window,
            cost,
            suffix_lengths,
            memo: HashMap::new(),
            _error: PhantomData,
        }
    }

    /// Minimum cost of aligning `reference[offset..]` with `segments[index..]`.
    fn best(&mut self, offset: usize, index: usize) -> Result<f64, E> {
        if let Some(node) = self.memo.get(&(offset, index)) {
            return Ok(node.cost);
        }

        let reference = self.reference;
        let segments = self.segments;
        let rest = &reference[offset..];
        let remaining = &segments[index..];

        let node = if rest.is_empty() && remaining.is_empty() {
            Node {
                cost: 0.0,
                step: Step::Exhausted,
            }
        } else if remaining.is_empty() {
            Node {
                cost: (self.cost)(rest, &[])?,
                step: Step::Exhausted,
            }
        } else if rest.is_empty() {
            let flattened: Vec<T> = remaining
                .iter()
                .flat_map(|s| s.as_ref().iter().cloned())
                .collect();
            Node {
                cost: (self.cost)(&[], &flattened)?,
                step: Step::ElideRest,
            }
        } else if remaining.len() == 1 {
            Node {
                cost: (self.cost)(rest, remaining[0].as_ref())?,
                step: Step::TakeRest,
            }
        } else if self.is_exact(offset, index) {
            Node {
                cost: 0.0,
                step: Step::ExactPartition,
            }
        } else {
            self.search(offset, index)?
        };

        self.memo.insert((offset, index), node);
        Ok(node.cost)
    }

    /// Cheap pre-check for the exact-partition fast path.
    fn is_exact(&self, offset: usize, index: usize) -> bool {
        let rest = &self.reference[offset..];
        self.suffix_lengths[index] == rest.len()
            && self.segments[index..]
                .iter()
                .flat_map(|s| s.as_ref().iter())
                .eq(rest.iter())
    }

    /// Try every head length in the window; the first minimum wins.
    fn search(&mut self, offset: usize, index: usize) -> Result<Node, E> {
        let reference = self.reference;
        let segments = self.segments;
        let head = segments[index].as_ref();
        let available = reference.len() - offset;

        let shortest = head.len().saturating_sub(self.window);
        let longest = head.len() + self.window;

        // Lengths past the end of the reference collapse onto `available`
        let mut best = Node {
            cost: f64::INFINITY,
            step: Step::WindowedSearch {
                end: offset + shortest.min(available),
            },
        };
        let mut previous: Option<usize> = None;

        for len in shortest..=longest {
            let len = len.min(available);
            if previous == Some(len) {
                continue;
            }
            previous = Some(len);

            let end = offset + len;
            let head_cost = (self.cost)(&reference[offset..end], head)?;
            let tail_cost = self.best(end, index + 1)?;
            let total = head_cost + tail_cost;
            if total < best.cost {
                best = Node {
                    cost: total,
                    step: Step::WindowedSearch { end },
                };
            }
        }

        Ok(best)
    }

    /// Walk the memo table from the root and emit one span per segment.
    fn spans(&self) -> Vec<Span> {
        let mut spans = Vec::with_capacity(self.segments.len());
        let (mut offset, mut index) = (0, 0);

        while let Some(node) = self.memo.get(&(offset, index)) {
            match node.step {
                Step::Exhausted => break,
                Step::ElideRest => {
                    spans.extend((index..self.segments.len()).map(|_| Span::new(offset, offset)));
                    break;
                }
                Step::TakeRest => {
                    spans.push(Span::new(offset, self.reference.len()));
                    break;
                }
                Step::ExactPartition => {
                    let mut start = offset;
                    for segment in &self.segments[index..] {
                        let end = start + segment.as_ref().len();
                        spans.push(Span::new(start, end));
                        start = end;
                    }
                    break;
                }
                Step::WindowedSearch { end } => {
                    spans.push(Span::new(offset, end));
                    offset = end;
                    index += 1;
                }
            }
        }

        spans
    }
}

/// Align `segments` onto `reference`, minimizing the summed `cost`.
///
/// `cost(reference_slice, segment)` scores one assignment. Every segment
/// receives exactly one span; consecutive spans abut, the first starts
/// at 0 and the last ends at `reference.len()` whenever there is at least
/// one segment. On equal totals the shortest head span wins.
pub fn solve<T, S, E, F>(
    reference: &[T],
    segments: &[S],
    window: usize,
    cost: F,
) -> Result<Correspondence, E>
where
    T: PartialEq + Clone,
    S: AsRef<[T]>,
    F: FnMut(&[T], &[T]) -> Result<f64, E>,
{
    let mut solver = Solver::new(reference, segments, window, cost);
    let cost = solver.best(0, 0)?;
    let spans = solver.spans();
    log::trace!(
        "solved {} segments over {} moras: cost {}, {} subproblems",
        segments.len(),
        reference.len(),
        cost,
        solver.memo.len()
    );
    Ok(Correspondence { cost, spans })
}
