//! Two-watched-literal scheme

use super::propagation::assignment::Assignment;
use crate::{clause::alloc::ClauseId, datastructure::LitVec, literal::Lit};

/// Bidirectional index between clauses and their two watched literals.
///
/// `by_lit` maps a literal to the clauses watching it, `by_clause` maps a
/// clause to its watched pair. Unit clauses are never watched; their literal
/// is forced once at the root level.
#[derive(Debug, Clone, Default)]
pub(crate) struct WatchList {
    by_lit: LitVec<Vec<ClauseId>>,
    by_clause: Vec<Option<[Lit; 2]>>,
}

impl WatchList {
    pub(crate) fn set_var_count(&mut self, count: usize) {
        self.by_lit.set_var_count(count);
    }

    /// Starts watching `pair` for `id`.
    pub(crate) fn watch(&mut self, id: ClauseId, pair: [Lit; 2]) {
        debug_assert!(pair[0] != pair[1]);
        if id.as_index() >= self.by_clause.len() {
            self.by_clause.resize(id.as_index() + 1, None);
        }
        debug_assert!(self.by_clause[id.as_index()].is_none());
        self.by_clause[id.as_index()] = Some(pair);
        self.by_lit[pair[0]].push(id);
        self.by_lit[pair[1]].push(id);
    }

    pub(crate) fn watched(&self, id: ClauseId) -> [Lit; 2] {
        self.by_clause[id.as_index()].expect("clause is watched")
    }

    pub(crate) fn other_watch(&self, id: ClauseId, lit: Lit) -> Lit {
        let [fst, snd] = self.watched(id);
        if fst == lit {
            snd
        } else {
            debug_assert_eq!(snd, lit);
            fst
        }
    }

    pub(crate) fn is_satisfied(&self, id: ClauseId, assignment: &Assignment) -> bool {
        let [fst, snd] = self.watched(id);
        assignment.value(fst) == Some(true) || assignment.value(snd) == Some(true)
    }

    /// Tries to move the watch of `id` from `falsified` to a literal that is
    /// not falsified. Returns `false` if no replacement exists.
    pub(crate) fn update(
        &mut self,
        id: ClauseId,
        lits: &[Lit],
        falsified: Lit,
        assignment: &Assignment,
    ) -> bool {
        let other = self.other_watch(id, falsified);
        for &lit in lits {
            if lit == falsified || lit == other {
                continue;
            }
            if assignment.value(lit) != Some(false) {
                let pair = self.by_clause[id.as_index()]
                    .as_mut()
                    .expect("clause is watched");
                for watch in pair.iter_mut() {
                    if *watch == falsified {
                        *watch = lit;
                    }
                }
                let watchers = &mut self.by_lit[falsified];
                let pos = watchers
                    .iter()
                    .position(|&c| c == id)
                    .expect("watched clause is indexed under its watch");
                watchers.remove(pos);
                self.by_lit[lit].push(id);
                return true;
            }
        }
        false
    }

    /// Stops watching `id` entirely. No-op for unwatched clauses.
    pub(crate) fn remove_clause(&mut self, id: ClauseId) {
        let Some(slot) = self.by_clause.get_mut(id.as_index()) else {
            return;
        };
        if let Some([fst, snd]) = slot.take() {
            self.by_lit[fst].retain(|&c| c != id);
            self.by_lit[snd].retain(|&c| c != id);
        }
    }

    pub(crate) fn watchers(&self, lit: Lit) -> &[ClauseId] {
        &self.by_lit[lit]
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::cdcl::propagation::trail::DecLvl;
    use crate::clause::alloc::Allocator;

    fn lit(l: i32) -> Lit {
        Lit::from_dimacs(l)
    }

    fn lits(dimacs: &[i32]) -> Vec<Lit> {
        dimacs.iter().map(|&l| Lit::from_dimacs(l)).collect()
    }

    #[test]
    fn watch_moves_to_unfalsified_literal() {
        let mut alloc = Allocator::default();
        let clause = lits(&[1, 2, 3]);
        let id = alloc.add(&clause);

        let mut watches = WatchList::default();
        watches.set_var_count(4);
        watches.watch(id, [clause[0], clause[1]]);

        let mut assignment = Assignment::default();
        assignment.set_var_count(4);
        assignment.assign(lit(-1), DecLvl::new(1), None);

        assert!(watches.update(id, &clause, lit(1), &assignment));
        assert_eq!(watches.watched(id), [lit(3), lit(2)]);
        assert!(watches.watchers(lit(1)).is_empty());
        assert_eq!(watches.watchers(lit(3)), &[id]);
    }

    #[test]
    fn watch_stays_when_rest_is_falsified() {
        let mut alloc = Allocator::default();
        let clause = lits(&[1, 2, 3]);
        let id = alloc.add(&clause);

        let mut watches = WatchList::default();
        watches.set_var_count(4);
        watches.watch(id, [clause[0], clause[1]]);

        let mut assignment = Assignment::default();
        assignment.set_var_count(4);
        assignment.assign(lit(-1), DecLvl::new(1), None);
        assignment.assign(lit(-3), DecLvl::new(1), None);

        assert!(!watches.update(id, &clause, lit(1), &assignment));
        assert_eq!(watches.other_watch(id, lit(1)), lit(2));
    }

    #[test]
    fn satisfied_watch_is_detected() {
        let mut alloc = Allocator::default();
        let clause = lits(&[1, 2]);
        let id = alloc.add(&clause);

        let mut watches = WatchList::default();
        watches.set_var_count(4);
        watches.watch(id, [clause[0], clause[1]]);

        let mut assignment = Assignment::default();
        assignment.set_var_count(4);
        assert!(!watches.is_satisfied(id, &assignment));
        assignment.assign(lit(2), DecLvl::new(1), None);
        assert!(watches.is_satisfied(id, &assignment));
    }

    #[test]
    fn removed_clause_leaves_no_watches() {
        let mut alloc = Allocator::default();
        let clause = lits(&[1, 2]);
        let id = alloc.add(&clause);

        let mut watches = WatchList::default();
        watches.set_var_count(4);
        watches.watch(id, [clause[0], clause[1]]);
        watches.remove_clause(id);

        assert!(watches.watchers(lit(1)).is_empty());
        assert!(watches.watchers(lit(2)).is_empty());

        // unit clauses were never watched, removing them is a no-op
        let unit = alloc.add(&lits(&[3]));
        watches.remove_clause(unit);
    }
}
