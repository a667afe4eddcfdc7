use std::collections::VecDeque;

use bevy::prelude::*;

/// Maximum number of undo groups to keep.
pub const MAX_UNDO_GROUPS: usize = 100;

/// Entities created by one commit, undone together.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UndoGroup {
    pub label: String,
    pub entities: Vec<Entity>,
}

/// Resource holding the scatter undo history, oldest first.
#[derive(Resource, Debug)]
pub struct ScatterUndoHistory {
    groups: VecDeque<UndoGroup>,
}

impl Default for ScatterUndoHistory {
    fn default() -> Self {
        Self {
            groups: VecDeque::with_capacity(MAX_UNDO_GROUPS),
        }
    }
}

impl ScatterUndoHistory {
    /// Records a group, dropping the oldest once full. Empty groups are ignored.
    pub fn push(&mut self, group: UndoGroup) {
        if group.entities.is_empty() {
            return;
        }
        if self.groups.len() >= MAX_UNDO_GROUPS {
            self.groups.pop_front();
        }
        self.groups.push_back(group);
    }

    pub fn pop(&mut self) -> Option<UndoGroup> {
        self.groups.pop_back()
    }

    pub fn can_undo(&self) -> bool {
        !self.groups.is_empty()
    }

    pub fn undo_label(&self) -> Option<&str> {
        self.groups.back().map(|g| g.label.as_str())
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

/// Message requesting that the most recent scatter commit be undone.
#[derive(Message, Debug, Clone, Copy, Default)]
pub struct UndoScatter;

pub(crate) fn undo_input(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut undo: MessageWriter<UndoScatter>,
) {
    let ctrl = keyboard.pressed(KeyCode::ControlLeft) || keyboard.pressed(KeyCode::ControlRight);
    if ctrl && keyboard.just_pressed(KeyCode::KeyZ) {
        undo.write(UndoScatter);
    }
}

pub(crate) fn apply_undo(
    mut commands: Commands,
    mut requests: MessageReader<UndoScatter>,
    mut history: ResMut<ScatterUndoHistory>,
) {
    for _ in requests.read() {
        let Some(group) = history.pop() else {
            debug!("Nothing to undo.");
            continue;
        };
        for entity in &group.entities {
            if let Ok(mut entity_commands) = commands.get_entity(*entity) {
                entity_commands.despawn();
            }
        }
        info!("Undid '{}' ({} objects).", group.label, group.entities.len());
    }
}
