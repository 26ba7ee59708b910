//! Task table
//!
//! The long-lived tasks are registered once during bring-up. Each slot
//! carries the task's static metadata plus its fault state, which only moves
//! from `Running` to `Faulted`.

use crate::config::TaskConfig;
use crate::core::error::{CoreError, Result};
use crate::core::traits::{EmbassyState, SharedState};
use crate::log_info;

/// Static task description
pub type TaskMetadata = TaskConfig;

/// Handle naming a registered task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TaskId {
    index: u8,
    name: &'static str,
}

impl TaskId {
    pub fn index(&self) -> usize {
        self.index as usize
    }

    /// Name stamped into every log line the task produces
    pub fn name(&self) -> &'static str {
        self.name
    }
}

/// Fault state of a task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TaskState {
    Running,
    /// Terminal: the task is suspended for good
    Faulted,
}

#[derive(Clone, Copy)]
struct Slot {
    metadata: TaskMetadata,
    state: TaskState,
}

struct Table<const T: usize> {
    slots: [Option<Slot>; T],
    count: usize,
}

/// Fixed-capacity registry of up to `T` tasks
pub struct TaskRegistry<const T: usize> {
    table: EmbassyState<Table<T>>,
}

impl<const T: usize> TaskRegistry<T> {
    const INDEX_FITS: () = assert!(T <= u8::MAX as usize + 1, "task index must fit in u8");

    pub const fn new() -> Self {
        let () = Self::INDEX_FITS;
        Self {
            table: EmbassyState::new(Table {
                slots: [None; T],
                count: 0,
            }),
        }
    }

    /// Add a task in the `Running` state
    pub fn register(&self, metadata: TaskMetadata) -> Result<TaskId> {
        let id = self.table.with_mut(|table| {
            if table.count >= T {
                return Err(CoreError::ResourceExhausted);
            }
            let index = table.count;
            table.slots[index] = Some(Slot {
                metadata,
                state: TaskState::Running,
            });
            table.count += 1;
            Ok(TaskId {
                index: index as u8,
                name: metadata.name,
            })
        })?;

        log_info!(
            "registered task '{}' (prio {})",
            metadata.name,
            metadata.priority
        );
        Ok(id)
    }

    pub fn state(&self, id: &TaskId) -> Option<TaskState> {
        self.table
            .with(|table| table.slots.get(id.index()).copied().flatten())
            .map(|slot| slot.state)
    }

    pub fn metadata(&self, id: &TaskId) -> Option<TaskMetadata> {
        self.table
            .with(|table| table.slots.get(id.index()).copied().flatten())
            .map(|slot| slot.metadata)
    }

    pub fn len(&self) -> usize {
        self.table.with(|table| table.count)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn faulted_count(&self) -> usize {
        self.table.with(|table| {
            table
                .slots
                .iter()
                .flatten()
                .filter(|slot| slot.state == TaskState::Faulted)
                .count()
        })
    }

    /// Move a task to `Faulted`, returning its previous state
    pub(crate) fn mark_faulted(&self, id: &TaskId) -> Option<TaskState> {
        self.table.with_mut(|table| {
            let slot = table.slots.get_mut(id.index())?.as_mut()?;
            let previous = slot.state;
            slot.state = TaskState::Faulted;
            Some(previous)
        })
    }
}

impl<const T: usize> Default for TaskRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}
