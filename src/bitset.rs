#[derive(Eq, PartialEq, Clone, Debug, Hash)]
pub(crate) struct BitSet {
    bits: Vec<usize>,
    len: usize,
}

const BITS_PER_WORD: usize = std::mem::size_of::<usize>() * 8;

impl BitSet {
    /// An empty set able to hold offsets `0..len`.
    pub(crate) fn new(len: usize) -> BitSet {
        BitSet {
            bits: vec![0; (len + BITS_PER_WORD - 1) / BITS_PER_WORD],
            len,
        }
    }

    /// A set with every offset in `0..len` present.
    pub(crate) fn full(len: usize) -> BitSet {
        let mut set = BitSet::new(len);
        set.fill();
        set
    }

    fn fill(&mut self) {
        for word in self.bits.iter_mut() {
            *word = usize::MAX;
        }

        let tail = self.len % BITS_PER_WORD;
        if tail != 0 {
            if let Some(last) = self.bits.last_mut() {
                *last = (1 << tail) - 1;
            }
        }
    }

    pub(crate) fn get(&self, offset: usize) -> bool {
        self.bits[offset / BITS_PER_WORD] & (1 << offset % BITS_PER_WORD) != 0
    }

    /// Returns true if the bit was not already set.
    #[cfg(test)]
    pub(crate) fn insert(&mut self, offset: usize) -> bool {
        let was_set = self.get(offset);
        self.bits[offset / BITS_PER_WORD] |= 1 << offset % BITS_PER_WORD;
        !was_set
    }

    /// Returns true if the bit was set.
    pub(crate) fn remove(&mut self, offset: usize) -> bool {
        let was_set = self.get(offset);
        self.bits[offset / BITS_PER_WORD] &= !(1 << offset % BITS_PER_WORD);
        was_set
    }

    pub(crate) fn pop_cnt(&self) -> usize {
        self.bits.iter().map(|word| word.count_ones() as usize).sum()
    }

    #[cfg(test)]
    pub(crate) fn is_subset(&self, other: &BitSet) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(a, b)| a & !b == 0)
    }

    pub(crate) fn iter(&self) -> BitSetIterator {
        self.into_iter()
    }
}

impl<'a> IntoIterator for &'a BitSet {
    type Item = usize;
    type IntoIter = BitSetIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        BitSetIterator {
            bitset: self,
            index: 0,
        }
    }
}

pub(crate) struct BitSetIterator<'a> {
    bitset: &'a BitSet,
    index: usize,
}

impl<'a> Iterator for BitSetIterator<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.bitset.len {
            let word = self.bitset.bits[self.index / BITS_PER_WORD] >> (self.index % BITS_PER_WORD);

            // skip the rest of an exhausted word in one step
            if word == 0 {
                self.index = (self.index / BITS_PER_WORD + 1) * BITS_PER_WORD;
                continue;
            }

            let found = self.index + word.trailing_zeros() as usize;
            self.index = found + 1;
            return Some(found);
        }

        None
    }
}
