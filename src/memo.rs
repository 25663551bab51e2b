//! Input-equality memoization for derived computations.
//!
//! Consumers recombine requirement tables from many layered inputs on every
//! state change; most changes leave most inputs untouched. [Memo] caches the
//! last `(input, output)` pair so a recomputation with equal inputs is free.
//! No framework involved: the cache key is plain input equality, so identity
//! surrogates (revision counters, snapshot ids) work as well as structural
//! comparison.

/// Memoize a computation by its last input.
///
/// ```
/// use reachkit::Memo;
///
/// let mut fixpoints = Memo::default();
/// let mut runs = 0;
///
/// // keyed by a revision counter that bumps when settings change
/// for revision in [1u64, 1, 1, 2] {
///     fixpoints.get_or_compute(revision, |_| {
///         runs += 1;
///     });
/// }
/// assert_eq!(runs, 2);
/// ```
#[derive(Clone, Default, Debug)]
pub struct Memo<I, O> {
    last: Option<(I, O)>,
}

impl<I: PartialEq, O: Clone> Memo<I, O> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// Return the cached output for an equal input, or compute and cache it
    pub fn get_or_compute<F>(&mut self, input: I, compute: F) -> O
    where
        F: FnOnce(&I) -> O,
    {
        if let Some((cached_input, cached_output)) = &self.last {
            if *cached_input == input {
                return cached_output.clone();
            }
        }
        let output = compute(&input);
        self.last = Some((input, output.clone()));
        output
    }

    /// Drop the cached pair (forces the next call to recompute)
    pub fn invalidate(&mut self) {
        self.last = None;
    }
}
