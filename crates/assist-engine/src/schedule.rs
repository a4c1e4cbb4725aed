//! Ordering of the actions needed for a request.

use std::cmp::Reverse;
use std::collections::{BTreeMap, BTreeSet, BinaryHeap};

use crate::error::EngineError;
use crate::plan::{ActionRef, Plan};

/// A deterministic execution order over a subset of a plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Schedule {
    order: Vec<ActionRef>,
    /// Scheduled predecessors of each scheduled action, by either relation.
    predecessors: BTreeMap<ActionRef, Vec<ActionRef>>,
}

impl Schedule {
    /// Schedule the named actions and everything they transitively depend on.
    ///
    /// `must_run_after` edges order actions but never add one.
    ///
    /// # Errors
    /// Returns `EngineError::UnknownAction` for a name not in the plan and
    /// `EngineError::RelationCycle` if the relations among the scheduled
    /// actions are cyclic.
    pub fn for_requests<S: AsRef<str>>(plan: &Plan, requested: &[S]) -> Result<Self, EngineError> {
        let mut roots = Vec::with_capacity(requested.len());
        for name in requested {
            let name = name.as_ref();
            let action = plan.find(name).ok_or_else(|| EngineError::UnknownAction {
                name: name.to_owned(),
                available: plan.names().join(", "),
            })?;
            roots.push(action);
        }

        let mut included = BTreeSet::new();
        let mut stack = roots;
        while let Some(action) = stack.pop() {
            if !included.insert(action) {
                continue;
            }
            if let Some(a) = plan.get(action) {
                stack.extend(a.depends_on.iter().copied());
            }
        }
        Self::build(plan, &included)
    }

    /// Schedule every action of the plan.
    ///
    /// # Errors
    /// Returns `EngineError::RelationCycle` if the plan's relations are cyclic.
    pub fn all(plan: &Plan) -> Result<Self, EngineError> {
        let included = plan.actions().map(|(r, _)| r).collect();
        Self::build(plan, &included)
    }

    /// Kahn's algorithm over the included actions; the ready action with the
    /// lowest registration index goes first.
    fn build(plan: &Plan, included: &BTreeSet<ActionRef>) -> Result<Self, EngineError> {
        let mut predecessors: BTreeMap<ActionRef, Vec<ActionRef>> = BTreeMap::new();
        let mut successors: BTreeMap<ActionRef, Vec<ActionRef>> = BTreeMap::new();
        for &action in included {
            let Some(a) = plan.get(action) else { continue };
            let mut preds: Vec<ActionRef> = a
                .depends_on
                .iter()
                .chain(&a.must_run_after)
                .copied()
                .filter(|p| included.contains(p))
                .collect();
            preds.sort_unstable();
            preds.dedup();
            for &p in &preds {
                successors.entry(p).or_default().push(action);
            }
            predecessors.insert(action, preds);
        }

        let mut pending: BTreeMap<ActionRef, usize> = predecessors
            .iter()
            .map(|(action, preds)| (*action, preds.len()))
            .collect();
        let mut ready: BinaryHeap<Reverse<ActionRef>> = pending
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(action, _)| Reverse(*action))
            .collect();

        let mut order = Vec::with_capacity(included.len());
        while let Some(Reverse(action)) = ready.pop() {
            order.push(action);
            for &next in successors.get(&action).map_or(&[][..], Vec::as_slice) {
                if let Some(count) = pending.get_mut(&next) {
                    *count = count.saturating_sub(1);
                    if *count == 0 {
                        ready.push(Reverse(next));
                    }
                }
            }
        }

        if order.len() < predecessors.len() {
            return Err(EngineError::RelationCycle {
                cycle: find_cycle(plan, &predecessors),
            });
        }

        tracing::debug!(
            scheduled = order.len(),
            order = %order.iter().map(|a| plan.name_of(*a)).collect::<Vec<_>>().join(", "),
            "schedule computed"
        );
        Ok(Self {
            order,
            predecessors,
        })
    }

    pub fn order(&self) -> &[ActionRef] {
        &self.order
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn contains(&self, action: ActionRef) -> bool {
        self.predecessors.contains_key(&action)
    }

    /// Index of `action` in the order.
    pub fn position(&self, action: ActionRef) -> Option<usize> {
        self.order.iter().position(|a| *a == action)
    }

    /// Scheduled actions that must finish before `action` starts.
    pub fn predecessors(&self, action: ActionRef) -> &[ActionRef] {
        self.predecessors.get(&action).map_or(&[], Vec::as_slice)
    }

    /// Group the order into waves; every action's predecessors lie in
    /// earlier waves. Within a wave actions keep schedule order.
    pub fn levels(&self) -> Vec<Vec<ActionRef>> {
        let mut depth: BTreeMap<ActionRef, usize> = BTreeMap::new();
        let mut levels: Vec<Vec<ActionRef>> = Vec::new();
        for &action in &self.order {
            let level = self
                .predecessors(action)
                .iter()
                .filter_map(|p| depth.get(p))
                .map(|d| d.saturating_add(1))
                .max()
                .unwrap_or(0);
            depth.insert(action, level);
            if levels.len() <= level {
                levels.resize_with(level.saturating_add(1), Vec::new);
            }
            if let Some(wave) = levels.get_mut(level) {
                wave.push(action);
            }
        }
        levels
    }
}

/// Name one cycle among `predecessors`, found by three-color DFS.
fn find_cycle(plan: &Plan, predecessors: &BTreeMap<ActionRef, Vec<ActionRef>>) -> String {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Color {
        Gray,
        Black,
    }

    fn visit(
        action: ActionRef,
        predecessors: &BTreeMap<ActionRef, Vec<ActionRef>>,
        color: &mut BTreeMap<ActionRef, Color>,
        stack: &mut Vec<ActionRef>,
    ) -> Option<Vec<ActionRef>> {
        match color.get(&action) {
            Some(Color::Black) => return None,
            Some(Color::Gray) => {
                let start = stack.iter().position(|a| *a == action).unwrap_or(0);
                let mut cycle = stack.get(start..).unwrap_or(stack.as_slice()).to_vec();
                cycle.push(action);
                return Some(cycle);
            }
            None => {}
        }
        color.insert(action, Color::Gray);
        stack.push(action);
        for &p in predecessors.get(&action).map_or(&[][..], Vec::as_slice) {
            if let Some(cycle) = visit(p, predecessors, color, stack) {
                return Some(cycle);
            }
        }
        stack.pop();
        color.insert(action, Color::Black);
        None
    }

    let mut color = BTreeMap::new();
    for &action in predecessors.keys() {
        let mut stack = Vec::new();
        if let Some(cycle) = visit(action, predecessors, &mut color, &mut stack) {
            // Walked along predecessor edges; print in execution direction.
            return cycle
                .iter()
                .rev()
                .map(|a| plan.name_of(*a))
                .collect::<Vec<_>>()
                .join(" -> ");
        }
    }
    String::from("<unknown>")
}
