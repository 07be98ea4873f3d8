const WORD_BITS: usize = 64;

/// A growable bitset indexed by route slot.
///
/// Missing words are treated as zeros, so sets of different lengths can be
/// combined freely.
#[derive(Debug, Clone, Default)]
pub struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    pub fn zero() -> Self {
        Self { words: Vec::new() }
    }

    /// A set with the first `len` bits enabled.
    pub fn ones(len: usize) -> Self {
        let mut words = vec![u64::max_value(); len / WORD_BITS];
        let rem = len % WORD_BITS;
        if rem != 0 {
            words.push((1u64 << rem) - 1);
        }
        Self { words }
    }

    pub fn intersect_with(&mut self, other: &Self) {
        self.words.truncate(other.words.len());
        self.words
            .iter_mut()
            .zip(other.words.iter())
            .for_each(|(lhs, rhs)| *lhs &= rhs)
    }

    pub fn union_with(&mut self, other: &Self) {
        if self.words.len() < other.words.len() {
            self.words.resize(other.words.len(), 0);
        }
        self.words
            .iter_mut()
            .zip(other.words.iter())
            .for_each(|(lhs, rhs)| *lhs |= rhs)
    }

    pub fn set(&mut self, index: usize) {
        let idx = index / WORD_BITS;
        if idx >= self.words.len() {
            self.words.resize(idx + 1, 0);
        }
        self.words[idx] |= 1u64 << (index % WORD_BITS);
    }

    pub fn is_zero(&self) -> bool {
        self.words.iter().all(|&w| w == 0)
    }

    pub fn iter_ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(i, &w)| {
            let mut rest = w;
            std::iter::from_fn(move || {
                if rest == 0 {
                    return None;
                }
                let bit = rest.trailing_zeros() as usize;
                rest &= rest - 1;
                Some(i * WORD_BITS + bit)
            })
        })
    }
}
