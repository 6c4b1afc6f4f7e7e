//! A priority heap keyed by variables or literals.

use crate::literal::{Lit, Var};

/// Index types that can key a [`KeyedHeap`].
pub(crate) trait HeapKey: Copy {
    fn as_index(self) -> usize;

    /// Number of value slots needed for `count` variables.
    fn slot_count(count: usize) -> usize;
}

impl HeapKey for Var {
    fn as_index(self) -> usize {
        Var::as_index(self)
    }

    fn slot_count(count: usize) -> usize {
        count
    }
}

impl HeapKey for Lit {
    fn as_index(self) -> usize {
        Lit::as_index(self)
    }

    fn slot_count(count: usize) -> usize {
        count * 2
    }
}

pub(crate) type VarHeap<T> = KeyedHeap<Var, T>;
pub(crate) type LitHeap<T> = KeyedHeap<Lit, T>;

#[derive(Debug, Clone)]
pub(crate) struct KeyedHeap<K, T> {
    /// The value for each key
    values: Vec<T>,
    /// The binary max-heap containing the keys
    heap: Vec<K>,
    /// The positions of the keys in the heap
    positions: Vec<Option<usize>>,
}

impl<K, T> Default for KeyedHeap<K, T> {
    fn default() -> Self {
        Self { values: Vec::default(), heap: Vec::default(), positions: Vec::default() }
    }
}

impl<K, T> KeyedHeap<K, T>
where
    K: HeapKey,
    T: Default + Copy + Ord,
{
    pub(crate) fn set_var_count(&mut self, count: usize) {
        self.values.resize_with(K::slot_count(count), Default::default);
        self.positions.resize_with(K::slot_count(count), Default::default);
    }

    /// Returns the key with the highest value.
    pub(crate) fn peek(&self) -> Option<K> {
        self.heap.first().copied()
    }

    pub(crate) fn update_value<F>(&mut self, key: K, update_fn: F) -> T
    where
        F: FnOnce(T) -> T,
    {
        let value = &mut self.values[key.as_index()];
        let orig_value = *value;
        *value = update_fn(orig_value);
        let new_value = *value;
        if let Some(pos) = self.positions[key.as_index()] {
            if new_value >= orig_value {
                self.sift_up(pos);
            } else {
                self.sift_down(pos);
            }
        }
        new_value
    }

    #[allow(dead_code)]
    pub(crate) fn get_value(&self, key: K) -> T {
        self.values[key.as_index()]
    }

    /// Adds the provided key to the heap.
    pub(crate) fn add(&mut self, key: K) {
        if self.positions[key.as_index()].is_some() {
            // already contained in heap
            return;
        }
        // add key at the end and sift upwards
        let idx = self.heap.len();
        self.heap.push(key);
        self.positions[key.as_index()] = Some(idx);
        self.sift_up(idx);
    }

    pub(crate) fn add_and_set(&mut self, key: K, value: T) {
        if self.positions[key.as_index()].is_some() {
            self.update_value(key, |_| value);
        } else {
            self.values[key.as_index()] = value;
            self.add(key);
        }
    }

    /// Removes the provided key from the heap.
    pub(crate) fn remove(&mut self, key: K) {
        let Some(pos) = self.positions[key.as_index()].take() else {
            return;
        };
        // swap it with the last element and sift it down afterwards
        self.heap.swap_remove(pos);
        if pos >= self.heap.len() {
            // we removed a child element from the heap
            return;
        }
        // update the moved key
        let moved_key = self.heap[pos];
        self.positions[moved_key.as_index()] = Some(pos);
        // the moved key came from a leaf, it may have to go either way
        self.sift_up(pos);
        self.sift_down(pos);
    }

    pub(crate) fn contained(&self, key: K) -> bool {
        self.positions[key.as_index()].is_some()
    }

    fn sift_up(&mut self, pos: usize) {
        let key = self.heap[pos];
        let Some(parent) = self.parent(pos) else {
            return;
        };
        let parent_key = self.heap[parent];
        if self.values[key.as_index()] > self.values[parent_key.as_index()] {
            self.swap(pos, parent);
            self.sift_up(parent);
        }
    }

    fn sift_down(&mut self, pos: usize) {
        let mut largest_idx = pos;

        if let Some(left_idx) = self.left(pos).filter(|&idx| {
            self.values[self.heap[idx].as_index()] > self.values[self.heap[largest_idx].as_index()]
        }) {
            largest_idx = left_idx;
        }

        if let Some(right_idx) = self.right(pos).filter(|&idx| {
            self.values[self.heap[idx].as_index()] > self.values[self.heap[largest_idx].as_index()]
        }) {
            largest_idx = right_idx;
        }

        if largest_idx != pos {
            // swap with largest child
            self.swap(pos, largest_idx);
            // continue recursively
            self.sift_down(largest_idx);
        }
    }

    fn swap(&mut self, a: usize, b: usize) {
        let key_a = self.heap[a];
        let key_b = self.heap[b];
        self.heap.swap(a, b);
        self.positions[key_a.as_index()] = Some(b);
        self.positions[key_b.as_index()] = Some(a);
    }

    /// Return the left child position, if it is in the heap
    fn left(&self, pos: usize) -> Option<usize> {
        let child_pos = 2 * pos + 1;
        Some(child_pos).filter(|&pos| pos < self.heap.len())
    }

    /// Return the right child position, if it is in the heap
    fn right(&self, pos: usize) -> Option<usize> {
        let child_pos = 2 * pos + 2;
        Some(child_pos).filter(|&pos| pos < self.heap.len())
    }

    /// Return the parent position, if it is in the heap
    fn parent(&self, pos: usize) -> Option<usize> {
        if pos == 0 {
            return None;
        }
        let parent_pos = (pos - 1) / 2;
        Some(parent_pos)
    }
}

impl<K, T> KeyedHeap<K, T>
where
    K: HeapKey,
    T: Default + Copy + Ord + std::ops::MulAssign,
{
    /// Rescaling values does not change the relative order in the heap.
    pub(crate) fn rescale(&mut self, rescale_factor: T) {
        self.values.iter_mut().for_each(|value| {
            *value *= rescale_factor;
        });
    }

    /// Rescales only the values of keys currently contained in the heap.
    pub(crate) fn rescale_contained(&mut self, rescale_factor: T) {
        for &key in &self.heap {
            self.values[key.as_index()] *= rescale_factor;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn heap() {
        let mut heap = VarHeap::<i32>::default();
        heap.set_var_count(4);
        let vars: Vec<_> = (0..4).map(Var::from_index).collect();
        for &var in &vars {
            heap.add(var);
        }

        heap.update_value(vars[2], |_| 2);
        heap.update_value(vars[1], |_| 6);

        assert_eq!(heap.peek(), Some(vars[1]));
        heap.remove(vars[1]);

        assert_eq!(heap.peek(), Some(vars[2]));

        heap.add(vars[1]);
        assert_eq!(heap.peek(), Some(vars[1]));
    }

    #[test]
    fn lit_heap() {
        let mut heap = LitHeap::<i32>::default();
        heap.set_var_count(2);
        let a = Var::from_index(0);
        let b = Var::from_index(1);
        for lit in [a.positive(), a.negative(), b.positive(), b.negative()] {
            heap.add(lit);
        }

        heap.update_value(a.negative(), |_| 5);
        heap.update_value(b.positive(), |_| 3);

        assert_eq!(heap.peek(), Some(a.negative()));
        heap.remove(a.negative());
        heap.remove(a.positive());
        assert_eq!(heap.peek(), Some(b.positive()));

        // values survive removal and re-insertion
        heap.add(a.negative());
        assert_eq!(heap.peek(), Some(a.negative()));
    }

    #[test]
    fn remove_keeps_heap_order() {
        let mut heap = VarHeap::<i32>::default();
        heap.set_var_count(7);
        let vars: Vec<_> = (0..7).map(Var::from_index).collect();
        // lays out a heap where removing a deep key forces the swapped-in
        // leaf to move up, not down
        for (&var, value) in vars.iter().zip([10, 2, 9, 1, 1, 8, 8]) {
            heap.add_and_set(var, value);
        }
        heap.remove(vars[3]);

        let mut drained = Vec::new();
        while let Some(var) = heap.peek() {
            drained.push(heap.get_value(var));
            heap.remove(var);
        }
        assert_eq!(drained, vec![10, 9, 8, 8, 2, 1]);
    }

    #[test]
    fn rescale_contained_skips_removed() {
        let mut heap = VarHeap::<i32>::default();
        heap.set_var_count(3);
        let vars: Vec<_> = (0..3).map(Var::from_index).collect();
        for &var in &vars {
            heap.add_and_set(var, 10);
        }

        heap.remove(vars[1]);
        heap.rescale_contained(3);

        assert_eq!(heap.get_value(vars[0]), 30);
        assert_eq!(heap.get_value(vars[1]), 10);
        assert_eq!(heap.get_value(vars[2]), 30);
    }
}
