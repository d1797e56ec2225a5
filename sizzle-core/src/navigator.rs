//! Step navigation state machine.
//!
//! `next`/`previous` clamp at the ends. `go_to` validates instead of clamping,
//! since a direct jump usually comes from untrusted input. Closing the
//! overlay keeps the current index so reopening resumes where the user was.

use thiserror::Error;

use crate::config::SizzleConfig;
use crate::types::{Equipment, Ingredient, RecipeStep};

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationError {
    #[error("Step index {index} out of range for {len} steps")]
    InvalidIndex { index: usize, len: usize },

    #[error("No step with id {id}")]
    UnknownStep { id: i64 },
}

/// Direction of the most recent index change, for slide animations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transition {
    #[default]
    None,
    Forward,
    Backward,
    Jump,
}

/// How a navigator starts out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NavigatorOptions {
    /// Open the step overlay immediately instead of waiting for `open()`.
    pub start_open: bool,
}

impl From<&SizzleConfig> for NavigatorOptions {
    fn from(config: &SizzleConfig) -> Self {
        Self {
            start_open: config.start_open,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StepNavigator {
    steps: Vec<RecipeStep>,
    index: usize,
    is_overlay_open: bool,
    last_transition: Transition,
}

impl StepNavigator {
    pub fn new(steps: Vec<RecipeStep>, options: NavigatorOptions) -> Self {
        Self {
            steps,
            index: 0,
            is_overlay_open: options.start_open,
            last_transition: Transition::None,
        }
    }

    /// Advance one step. Returns whether the index moved.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> bool {
        if !self.can_go_next() {
            return false;
        }
        self.index += 1;
        self.last_transition = Transition::Forward;
        true
    }

    /// Go back one step. Returns whether the index moved.
    pub fn previous(&mut self) -> bool {
        if !self.can_go_prev() {
            return false;
        }
        self.index -= 1;
        self.last_transition = Transition::Backward;
        true
    }

    /// Jump to `index`. Out-of-range requests leave the state untouched.
    pub fn go_to(&mut self, index: usize) -> Result<(), NavigationError> {
        if index >= self.steps.len() {
            tracing::debug!(index, len = self.steps.len(), "ignoring out-of-range step jump");
            return Err(NavigationError::InvalidIndex {
                index,
                len: self.steps.len(),
            });
        }
        if index != self.index {
            self.last_transition = match index.cmp(&self.index) {
                std::cmp::Ordering::Greater if index == self.index + 1 => Transition::Forward,
                std::cmp::Ordering::Less if index + 1 == self.index => Transition::Backward,
                _ => Transition::Jump,
            };
            self.index = index;
        }
        Ok(())
    }

    /// Jump to the step with the given id.
    pub fn go_to_step_id(&mut self, id: i64) -> Result<(), NavigationError> {
        match self.steps.iter().position(|s| s.id == id) {
            Some(index) => self.go_to(index),
            None => Err(NavigationError::UnknownStep { id }),
        }
    }

    pub fn open(&mut self) {
        self.is_overlay_open = true;
    }

    pub fn close(&mut self) {
        self.is_overlay_open = false;
    }

    pub fn toggle(&mut self) {
        self.is_overlay_open = !self.is_overlay_open;
    }

    /// Swap in a new step list: back to the first step, overlay closed.
    pub fn replace_steps(&mut self, steps: Vec<RecipeStep>) {
        self.steps = steps;
        self.index = 0;
        self.is_overlay_open = false;
        self.last_transition = Transition::None;
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn is_overlay_open(&self) -> bool {
        self.is_overlay_open
    }

    pub fn last_transition(&self) -> Transition {
        self.last_transition
    }

    pub fn steps(&self) -> &[RecipeStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// `None` only when there are no steps.
    pub fn current_step(&self) -> Option<&RecipeStep> {
        self.steps.get(self.index)
    }

    pub fn can_go_next(&self) -> bool {
        self.index + 1 < self.steps.len()
    }

    pub fn can_go_prev(&self) -> bool {
        self.index > 0
    }

    /// Fraction of the recipe reached, `(index + 1) / len`; 0.0 with no steps.
    pub fn progress(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        (self.index + 1) as f64 / self.steps.len() as f64
    }

    /// Ingredients used by the current step.
    pub fn current_ingredients(&self) -> &[Ingredient] {
        self.current_step()
            .map(|s| s.ingredients.as_slice())
            .unwrap_or(&[])
    }

    /// Equipment used by the current step.
    pub fn current_equipment(&self) -> &[Equipment] {
        self.current_step()
            .map(|s| s.equipment.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn steps(n: i64) -> Vec<RecipeStep> {
        (1..=n)
            .map(|i| RecipeStep::new(i, format!("Step {}", i)))
            .collect()
    }

    fn navigator(n: i64) -> StepNavigator {
        StepNavigator::new(steps(n), NavigatorOptions::default())
    }

    #[test]
    fn test_next_clamps_at_end() {
        let mut nav = navigator(3);
        assert!(nav.next());
        assert!(nav.next());
        assert!(!nav.next());
        assert!(!nav.next());
        assert_eq!(nav.index(), 2);
        assert!(!nav.can_go_next());
        assert!(nav.can_go_prev());
    }

    #[test]
    fn test_previous_clamps_at_start() {
        let mut nav = navigator(3);
        assert!(!nav.previous());
        assert_eq!(nav.index(), 0);
        assert_eq!(nav.last_transition(), Transition::None);

        nav.next();
        assert!(nav.previous());
        assert_eq!(nav.index(), 0);
        assert_eq!(nav.last_transition(), Transition::Backward);
    }

    #[test]
    fn test_go_to_rejects_out_of_range() {
        let mut nav = navigator(3);
        nav.next();
        assert_eq!(
            nav.go_to(5),
            Err(NavigationError::InvalidIndex { index: 5, len: 3 })
        );
        assert_eq!(nav.index(), 1);
        assert_eq!(nav.last_transition(), Transition::Forward);
    }

    #[test]
    fn test_go_to_transitions() {
        let mut nav = navigator(5);
        nav.go_to(1).unwrap();
        assert_eq!(nav.last_transition(), Transition::Forward);
        nav.go_to(4).unwrap();
        assert_eq!(nav.last_transition(), Transition::Jump);
        nav.go_to(3).unwrap();
        assert_eq!(nav.last_transition(), Transition::Backward);
        assert_eq!(nav.current_step().unwrap().id, 4);
    }

    #[test]
    fn test_go_to_step_id() {
        let mut nav = navigator(3);
        nav.go_to_step_id(3).unwrap();
        assert_eq!(nav.index(), 2);
        assert_eq!(
            nav.go_to_step_id(42),
            Err(NavigationError::UnknownStep { id: 42 })
        );
        assert_eq!(nav.index(), 2);
    }

    #[test]
    fn test_close_keeps_index() {
        let mut nav = navigator(3);
        nav.open();
        nav.next();
        nav.close();
        assert!(!nav.is_overlay_open());
        nav.open();
        assert!(nav.is_overlay_open());
        assert_eq!(nav.index(), 1);
    }

    #[test]
    fn test_start_open_is_configurable() {
        let closed = navigator(2);
        assert!(!closed.is_overlay_open());

        let open = StepNavigator::new(steps(2), NavigatorOptions { start_open: true });
        assert!(open.is_overlay_open());
    }

    #[test]
    fn test_replace_steps_resets() {
        let mut nav = StepNavigator::new(steps(3), NavigatorOptions { start_open: true });
        nav.next();
        nav.next();
        nav.replace_steps(steps(5));
        assert_eq!(nav.index(), 0);
        assert!(!nav.is_overlay_open());
        assert_eq!(nav.len(), 5);
        assert_eq!(nav.last_transition(), Transition::None);
    }

    #[test]
    fn test_progress() {
        let mut nav = navigator(4);
        assert_eq!(nav.progress(), 0.25);
        nav.go_to(3).unwrap();
        assert_eq!(nav.progress(), 1.0);
    }

    #[test]
    fn test_empty_navigator() {
        let mut nav = navigator(0);
        assert!(nav.is_empty());
        assert!(nav.current_step().is_none());
        assert!(!nav.can_go_next());
        assert!(!nav.can_go_prev());
        assert!(!nav.next());
        assert_eq!(nav.progress(), 0.0);
        assert!(nav.go_to(0).is_err());
        assert!(nav.current_ingredients().is_empty());
    }

    #[test]
    fn test_current_chips() {
        let mut list = steps(2);
        list[1].ingredients.push(Ingredient::new("Salt"));
        list[1].equipment.push(Equipment::new("Pan"));
        let mut nav = StepNavigator::new(list, NavigatorOptions::default());
        assert!(nav.current_ingredients().is_empty());
        nav.next();
        assert_eq!(nav.current_ingredients()[0].name, "Salt");
        assert_eq!(nav.current_equipment()[0].name, "Pan");
    }
}
