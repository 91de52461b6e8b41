//! Discrete commands delivered by the host between ticks.
//!
//! Input handling (keys, buttons) produces [`Command`]s and pushes them onto
//! a [`CommandQueue`]. The host drains the queue before each tick so that a
//! command never interleaves with a running step.

use std::collections::VecDeque;

use rand::Rng;
use tracing::debug;

use crate::{entity::Category, simulator::ClusterSimulator};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Spawn one entity of the given category.
    AddEntity(Category),
    /// Replace the population with this many random entities.
    Repopulate(usize),
    /// Show or hide the connectivity overlay. Stored by the host only.
    SetOverlayEnabled(bool),
}

/// FIFO of pending commands with a single consumer.
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, command: Command) {
        self.pending.push_back(command);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Applies every pending command, oldest first.
    ///
    /// Population commands go to `sim`; the overlay toggle is written to
    /// `overlay_enabled`, which the host owns.
    ///
    /// ### Returns
    /// The number of commands applied.
    pub fn drain_into<R: Rng>(
        &mut self,
        sim: &mut ClusterSimulator<R>,
        overlay_enabled: &mut bool,
    ) -> usize {
        let applied = self.pending.len();
        for command in self.pending.drain(..) {
            debug!(?command, "applying command");
            match command {
                Command::AddEntity(category) => {
                    sim.add_entity(category);
                }
                Command::Repopulate(count) => sim.repopulate(count),
                Command::SetOverlayEnabled(on) => *overlay_enabled = on,
            }
        }
        applied
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn sim() -> ClusterSimulator {
        ClusterSimulator::seeded(5, Config::default()).expect("default config is valid")
    }

    #[test]
    fn drain_applies_commands_in_order() {
        let mut sim = sim();
        let mut overlay = true;
        let mut queue = CommandQueue::new();

        queue.push(Command::AddEntity(Category::Cube));
        queue.push(Command::Repopulate(4));
        queue.push(Command::AddEntity(Category::Troll));
        queue.push(Command::SetOverlayEnabled(false));
        assert_eq!(queue.len(), 4);

        let applied = queue.drain_into(&mut sim, &mut overlay);

        assert_eq!(applied, 4);
        assert!(queue.is_empty());
        // The repopulate wiped the cube, then the troll was appended.
        assert_eq!(sim.store().len(), 5);
        assert_eq!(sim.entities()[4].category(), Category::Troll);
        assert!(!overlay);
    }

    #[test]
    fn draining_an_empty_queue_changes_nothing() {
        let mut sim = sim();
        sim.repopulate(3);
        let mut overlay = false;

        assert_eq!(CommandQueue::new().drain_into(&mut sim, &mut overlay), 0);
        assert_eq!(sim.store().len(), 3);
        assert!(!overlay);
    }
}
