//! Editor state container.
//!
//! Every mutation is an [`EditorAction`] run through [`reduce`]; subscribers
//! see the resulting state after each dispatch. A store is a plain value, so
//! any number of independent editors can exist side by side.

use std::path::PathBuf;

use crate::geometry::Transformation;

/// Where an uploaded image came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    pub name: String,
    pub mime: String,
    pub path: Option<PathBuf>,
    pub size: u64,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageState {
    pub url: Option<String>,
    pub file: Option<FileDescriptor>,
    pub loaded: bool,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorState {
    pub image: ImageState,
    pub transformations: Transformation,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EditorAction {
    SetImage { file: FileDescriptor, url: String },
    ResetImage,
    SetScale(f32),
    SetOffset { x: f32, y: f32 },
    SetTransformation(Transformation),
    ResetTransformations,
}

/// Apply one action to `state`.
pub fn reduce(state: &mut EditorState, action: EditorAction) {
    match action {
        EditorAction::SetImage { file, url } => {
            state.image.file = Some(file);
            state.image.url = Some(url);
            state.image.loaded = true;
        }
        EditorAction::ResetImage => {
            // Never leave a transformation paired with no image
            *state = EditorState::default();
        }
        EditorAction::SetScale(scale) => state.transformations.scale = scale,
        EditorAction::SetOffset { x, y } => {
            state.transformations.offset_x = x;
            state.transformations.offset_y = y;
        }
        EditorAction::SetTransformation(t) => state.transformations = t,
        EditorAction::ResetTransformations => state.transformations = Transformation::default(),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&EditorState)>;

#[derive(Default)]
pub struct EditorStore {
    state: EditorState,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl std::fmt::Debug for EditorStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorStore")
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EditorStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn dispatch(&mut self, action: EditorAction) {
        tracing::trace!(?action, "dispatch");
        reduce(&mut self.state, action);
        for (_, listener) in &mut self.listeners {
            listener(&self.state);
        }
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&EditorState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false when `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    pub fn set_image(&mut self, file: FileDescriptor, url: String) {
        self.dispatch(EditorAction::SetImage { file, url });
    }

    pub fn reset_image(&mut self) {
        self.dispatch(EditorAction::ResetImage);
    }

    pub fn set_scale(&mut self, scale: f32) {
        self.dispatch(EditorAction::SetScale(scale));
    }

    pub fn set_offset(&mut self, x: f32, y: f32) {
        self.dispatch(EditorAction::SetOffset { x, y });
    }

    /// Replace scale and offset in a single dispatch.
    pub fn set_transformation(&mut self, transformation: Transformation) {
        self.dispatch(EditorAction::SetTransformation(transformation));
    }

    pub fn reset_transformations(&mut self) {
        self.dispatch(EditorAction::ResetTransformations);
    }
}
