use std::{collections::HashSet, marker::PhantomData, ptr};

/// Unordered pairs of nodes, keyed by node identity rather than content.
pub struct PairSet<'a, TNode> {
    pairs: HashSet<(usize, usize)>,
    _nodes: PhantomData<&'a TNode>,
}

impl<'a, TNode> PairSet<'a, TNode> {
    pub fn has(&self, a: &'a TNode, b: &'a TNode) -> bool {
        self.pairs.contains(&key(a, b))
    }

    pub fn add(&mut self, a: &'a TNode, b: &'a TNode) {
        self.pairs.insert(key(a, b));
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }
}

impl<TNode> Default for PairSet<'_, TNode> {
    fn default() -> Self {
        Self {
            pairs: Default::default(),
            _nodes: PhantomData,
        }
    }
}

fn key<TNode>(a: &TNode, b: &TNode) -> (usize, usize) {
    let a = ptr::from_ref(a) as usize;
    let b = ptr::from_ref(b) as usize;
    (a.min(b), a.max(b))
}
