use helica_fha::{Method, ObjectId};
use serde::{Deserialize, Serialize};

/// Where a pick sequence stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SelectionState {
    /// No pick sequence in progress.
    #[default]
    Inactive,
    /// Waiting for the first object.
    AwaitingFirst {
        /// The method the picked objects will feed.
        method: Method,
    },
    /// Waiting for the target, the reference is known.
    AwaitingSecond {
        /// The method the picked objects will feed.
        method: Method,
        /// The first pick.
        reference: ObjectId,
    },
}

/// A finished pick sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PickCompleted {
    /// The method to compute.
    pub method: Method,
    /// First pick, `None` for world-relative axes.
    pub reference: Option<ObjectId>,
    /// Last pick.
    pub target: ObjectId,
}

/// Picking of the objects that define a new axis set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    state: SelectionState,
    highlighted: Option<ObjectId>,
}

impl Selection {
    /// An inactive selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> SelectionState {
        self.state
    }

    /// Whether a pick sequence is in progress.
    pub fn is_active(&self) -> bool {
        self.state != SelectionState::Inactive
    }

    /// The object under the pointer while picking.
    pub fn highlighted(&self) -> Option<ObjectId> {
        self.highlighted
    }

    /// Start a pick sequence for `method`. Does nothing while one is in progress.
    pub fn activate(&mut self, method: Method) {
        if self.is_active() {
            return;
        }
        self.state = SelectionState::AwaitingFirst { method };
        self.highlighted = None;
    }

    /// Pick an object, `None` for a miss.
    ///
    /// Returns the completed pick once the last object of the sequence is
    /// picked; the selection is then inactive again.
    pub fn pick(&mut self, object: Option<ObjectId>) -> Option<PickCompleted> {
        let object = object?;
        match self.state {
            SelectionState::Inactive => None,
            SelectionState::AwaitingFirst { method } if !method.needs_reference() => {
                self.reset();
                Some(PickCompleted {
                    method,
                    reference: None,
                    target: object,
                })
            }
            SelectionState::AwaitingFirst { method } => {
                self.state = SelectionState::AwaitingSecond {
                    method,
                    reference: object,
                };
                None
            }
            SelectionState::AwaitingSecond { method, reference } => {
                self.reset();
                Some(PickCompleted {
                    method,
                    reference: Some(reference),
                    target: object,
                })
            }
        }
    }

    /// Abort the pick sequence.
    pub fn cancel(&mut self) {
        self.reset();
    }

    /// Track the object under the pointer. Ignored while inactive.
    pub fn hover(&mut self, object: Option<ObjectId>) {
        if self.is_active() {
            self.highlighted = object;
        }
    }

    /// Instruction for the current step, `None` while inactive.
    pub fn prompt(&self) -> Option<&'static str> {
        let prompt = match self.state {
            SelectionState::Inactive => return None,
            SelectionState::AwaitingFirst {
                method: Method::WorldRelative,
            } => "Select the target object.\nFHA will be relative to the world system.",
            SelectionState::AwaitingFirst {
                method: Method::Relational,
            } => "Select the first object.\nRHA will use this as the start.",
            SelectionState::AwaitingFirst { .. } => {
                "Select the base object.\nFHA will be relative to this system."
            }
            SelectionState::AwaitingSecond {
                method: Method::Relational,
                ..
            } => "Select the second object.\nRHA will use this as the end.",
            SelectionState::AwaitingSecond { .. } => "Select the target object.",
        };
        Some(prompt)
    }

    fn reset(&mut self) {
        self.state = SelectionState::Inactive;
        self.highlighted = None;
    }
}
