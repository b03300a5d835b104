//! Incrementally maintained transitive closure over dense node indices
//! `0..node_count`. Answers "is `to` reachable from `from`" in O(1);
//! inserting an edge costs O((ancestors + descendants) * n / 64).

#[derive(Clone, Debug, Default, PartialEq, Eq)]
struct BitSet {
    words: Vec<u64>,
}

impl BitSet {
    fn with_capacity(bits: usize) -> Self {
        BitSet {
            words: vec![0; (bits + 63) / 64],
        }
    }

    fn insert(&mut self, bit: usize) {
        self.words[bit / 64] |= 1u64 << (bit % 64);
    }

    fn contains(&self, bit: usize) -> bool {
        self.words
            .get(bit / 64)
            .map(|word| word & (1u64 << (bit % 64)) != 0)
            .unwrap_or(false)
    }

    fn union_with(&mut self, other: &BitSet) {
        for (word, other_word) in self.words.iter_mut().zip(other.words.iter()) {
            *word |= *other_word;
        }
    }

    fn ones(&self) -> impl Iterator<Item = usize> + '_ {
        self.words.iter().enumerate().flat_map(|(index, word)| {
            let word = *word;
            (0..64usize)
                .filter(move |bit| word & (1u64 << bit) != 0)
                .map(move |bit| index * 64 + bit)
        })
    }
}

#[derive(Clone, Debug)]
pub(crate) struct Reachability {
    /// `descendants[n]`: nodes reachable from `n` over one or more edges
    descendants: Vec<BitSet>,
    /// `ancestors[n]`: nodes `n` is reachable from
    ancestors: Vec<BitSet>,
}

impl Reachability {
    pub fn new(node_count: usize) -> Self {
        Reachability {
            descendants: vec![BitSet::with_capacity(node_count); node_count],
            ancestors: vec![BitSet::with_capacity(node_count); node_count],
        }
    }

    /// A node always reaches itself.
    pub fn reachable(&self, from: usize, to: usize) -> bool {
        from == to || self.descendants[from].contains(to)
    }

    /// Records the edge `parent -> child`. The caller rules out cycles first.
    pub fn connect(&mut self, parent: usize, child: usize) {
        let mut sources = self.ancestors[parent].clone();
        sources.insert(parent);
        let mut targets = self.descendants[child].clone();
        targets.insert(child);

        for source in sources.ones() {
            self.descendants[source].union_with(&targets);
        }
        for target in targets.ones() {
            self.ancestors[target].union_with(&sources);
        }
    }
}
