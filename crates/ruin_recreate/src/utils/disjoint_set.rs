use fxhash::FxHashMap;

/// Disjoint set union over arbitrary `usize` ids.
pub struct DisjointSet {
    parent: FxHashMap<usize, usize>,
    num_components: usize,
}

impl DisjointSet {
    pub fn new(ids: &[usize]) -> Self {
        DisjointSet {
            parent: ids.iter().map(|&id| (id, id)).collect(),
            num_components: ids.len(),
        }
    }

    pub fn num_components(&self) -> usize {
        self.num_components
    }

    pub fn find(&mut self, i: usize) -> usize {
        let parent = *self.parent.get(&i).unwrap_or(&i);
        if parent == i {
            i
        } else {
            let root = self.find(parent);
            self.parent.insert(i, root);
            root
        }
    }

    pub fn union(&mut self, i: usize, j: usize) {
        let root_i = self.find(i);
        let root_j = self.find(j);
        if root_i != root_j {
            // Keep the smaller id as root so component order is stable
            let (root, child) = if root_i < root_j {
                (root_i, root_j)
            } else {
                (root_j, root_i)
            };
            self.parent.insert(child, root);
            self.num_components -= 1;
        }
    }

    /// Components in order of their smallest member, members in input order.
    pub fn components(&mut self, ids: &[usize]) -> Vec<Vec<usize>> {
        let mut roots: Vec<usize> = Vec::new();
        let mut components: FxHashMap<usize, Vec<usize>> = FxHashMap::default();

        for &id in ids {
            let root = self.find(id);
            components
                .entry(root)
                .or_insert_with(|| {
                    roots.push(root);
                    Vec::new()
                })
                .push(id);
        }

        roots
            .into_iter()
            .filter_map(|root| components.remove(&root))
            .collect()
    }
}
