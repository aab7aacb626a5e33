use rand::{
    RngCore,
    distr::{Distribution, StandardUniform},
};

use crate::core::PieceKind;

/// Source of upcoming piece kinds.
///
/// Every random number generator is a source drawing uniformly and
/// independently over the seven kinds (no bag, repeats allowed). Seed the
/// generator, or use a [`PieceSequence`], for reproducible spawns.
///
/// # Example
///
/// ```
/// use blockfall_engine::PieceSource as _;
/// use rand::SeedableRng as _;
/// use rand_pcg::Pcg32;
///
/// let mut a = Pcg32::seed_from_u64(7);
/// let mut b = Pcg32::seed_from_u64(7);
/// for _ in 0..20 {
///     assert_eq!(a.next_piece(), b.next_piece());
/// }
/// ```
pub trait PieceSource {
    fn next_piece(&mut self) -> PieceKind;
}

impl<R> PieceSource for R
where
    R: RngCore + ?Sized,
{
    fn next_piece(&mut self) -> PieceKind {
        StandardUniform.sample(self)
    }
}

/// Scripted source that cycles through a fixed list of kinds.
///
/// Useful for tests and for reproducing a reported piece order exactly.
#[derive(Debug, Clone)]
pub struct PieceSequence {
    kinds: Vec<PieceKind>,
    next: usize,
}

impl PieceSequence {
    /// # Panics
    ///
    /// Panics if `kinds` is empty.
    #[must_use]
    pub fn new<I>(kinds: I) -> Self
    where
        I: IntoIterator<Item = PieceKind>,
    {
        let kinds: Vec<_> = kinds.into_iter().collect();
        assert!(!kinds.is_empty(), "piece sequence must not be empty");
        Self { kinds, next: 0 }
    }
}

impl PieceSource for PieceSequence {
    fn next_piece(&mut self) -> PieceKind {
        let kind = self.kinds[self.next];
        self.next = (self.next + 1) % self.kinds.len();
        kind
    }
}
