use bevy::prelude::*;

/// Index of the body's node in the [`SceneGraph`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Component)]
pub struct NodeIndex(pub usize);

/// Entity of the anchor the body's label hangs from
#[derive(Debug, Clone, Copy, Component)]
pub struct LabelAnchor(pub Entity);

/// Marks the 3D point a label is attached to
#[derive(Debug, Clone, Copy, Component)]
pub struct BodyLabel {
    pub body: Entity,
}

/// UI text that follows a [`BodyLabel`] anchor on screen
#[derive(Debug, Clone, Copy, Component)]
pub struct LabelText {
    pub anchor: Entity,
}

/// Texture requested for a body, swapped in once the image finishes loading
#[derive(Debug, Clone, Component)]
pub struct PendingTexture {
    pub path: String,
    pub image: Handle<Image>,
}

#[derive(Debug, Clone, Copy, Component)]
pub struct Star;

/// Everything spawned while composing the scene, torn down on reset
#[derive(Debug, Clone, Copy, Component)]
pub struct SceneMember;

/// The composed scene graph driving every body entity
#[derive(Resource, Deref, DerefMut)]
pub struct SceneGraph(pub orrery::Orrery);
