//! Bevy plugin for surface_scatter: drives the scatter tool from the mouse and keyboard,
//! draws its preview with gizmos and spawns committed objects as entities.
//!
//! Surfaces are avian3d colliders, so add `PhysicsPlugins` alongside [`SurfaceScatterPlugin`].
#![forbid(unsafe_code)]

use avian3d::prelude::SpatialQuery;
use bevy::input::mouse::AccumulatedMouseScroll;
use bevy::prelude::*;
use bevy::window::PrimaryWindow;
use surface_scatter::input::{ToolEvent, ToolKey, ViewState};

#[cfg(feature = "ron")]
pub use assets::{ActiveScatterPreset, ScatterPresetAsset, ScatterPresetAssetLoader};
pub use draw::{GhostInstance, GizmoDraw, ScatterGhost};
pub use events::{MessageSink, ScatterEventFilter, ScatterMessage};
pub use factory::{EntityFactory, ScatterPlaced};
pub use history::{ScatterUndoHistory, UndoGroup, UndoScatter, MAX_UNDO_GROUPS};
pub use session::{
    BevyScatterTool, ScatterCamera, ScatterParams, ScatterSession, ScatterTemplate,
    ScatterTemplateLibrary,
};
pub use surface::{scatter_ray, AvianSurface};

#[cfg(feature = "ron")]
mod assets;
mod draw;
mod events;
mod factory;
mod history;
mod session;
mod surface;

/// Convenient re-exports for common types. Import with `use bevy_surface_scatter::prelude::*;`.
///
/// Core types whose names clash with Bevy's (`Ray`, `Plane`, `Sphere`) are not re-exported.
pub mod prelude {
    pub use surface_scatter::prelude::{
        EventSink, RegenerateReason, ScatterEvent, ScatterEventKind, ScatterPreset,
        ScatterSettings, ToolPhase,
    };

    #[cfg(feature = "ron")]
    pub use crate::assets::{ActiveScatterPreset, ScatterPresetAsset, ScatterPresetAssetLoader};
    pub use crate::draw::ScatterGhost;
    pub use crate::events::{ScatterEventFilter, ScatterMessage};
    pub use crate::factory::ScatterPlaced;
    pub use crate::history::{ScatterUndoHistory, UndoScatter};
    pub use crate::session::{
        ScatterCamera, ScatterParams, ScatterSession, ScatterTemplate, ScatterTemplateLibrary,
    };
    pub use crate::SurfaceScatterPlugin;
}

/// Bevy plugin providing the scatter tool's resources, message types and systems.
///
/// Nothing happens until a [`ScatterSession`] resource is inserted. While it exists:
/// the cursor of the [`ScatterCamera`] previews the disc, scroll resizes it (Alt passes
/// scroll through), Space commits, Tab cycles templates and Ctrl+Z undoes commits.
pub struct SurfaceScatterPlugin;

impl Plugin for SurfaceScatterPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ScatterMessage>()
            .add_message::<UndoScatter>()
            .init_resource::<ScatterEventFilter>()
            .init_resource::<ScatterUndoHistory>()
            .init_resource::<ScatterTemplateLibrary>();

        #[cfg(feature = "ron")]
        app.init_asset::<ScatterPresetAsset>()
            .init_asset_loader::<ScatterPresetAssetLoader>()
            .add_systems(
                Update,
                assets::apply_loaded_presets
                    .run_if(resource_exists::<ScatterSession>)
                    .before(drive_scatter_tool),
            );

        app.add_systems(
            Update,
            (
                cycle_template,
                sync_active_template,
                drive_scatter_tool,
                render_scatter_preview,
            )
                .chain()
                .run_if(resource_exists::<ScatterSession>),
        )
        .add_systems(Update, (history::undo_input, history::apply_undo).chain())
        .add_systems(Update, hide_ghosts.run_if(resource_removed::<ScatterSession>));
    }
}

fn cycle_template(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut library: ResMut<ScatterTemplateLibrary>,
) {
    if keyboard.just_pressed(KeyCode::Tab) {
        library.cycle();
        if let Some(template) = library.active() {
            info!("Scatter template: {}.", template.name);
        }
    }
}

fn sync_active_template(
    library: Res<ScatterTemplateLibrary>,
    mut session: ResMut<ScatterSession>,
    mut writer: MessageWriter<ScatterMessage>,
    filter: Res<ScatterEventFilter>,
) {
    if !library.is_changed() && !session.is_added() {
        return;
    }
    let mut sink = MessageSink {
        writer: &mut writer,
        filter: &filter,
    };
    session.tool.set_template(library.active().cloned(), &mut sink);
}

#[allow(clippy::too_many_arguments)]
fn drive_scatter_tool(
    mut commands: Commands,
    mut session: ResMut<ScatterSession>,
    mut history: ResMut<ScatterUndoHistory>,
    spatial_query: SpatialQuery,
    cameras: Query<(&Camera, &GlobalTransform), With<ScatterCamera>>,
    windows: Query<&Window, With<PrimaryWindow>>,
    scroll: Res<AccumulatedMouseScroll>,
    keyboard: Res<ButtonInput<KeyCode>>,
    mut writer: MessageWriter<ScatterMessage>,
    filter: Res<ScatterEventFilter>,
) {
    let Ok((camera, camera_transform)) = cameras.single() else {
        return;
    };
    let cursor_ray = windows
        .single()
        .ok()
        .and_then(|window| window.cursor_position())
        .and_then(|cursor| camera.viewport_to_world(camera_transform, cursor).ok())
        .and_then(scatter_ray);
    let view = ViewState::new(cursor_ray, *camera_transform.up());

    let alt = keyboard.any_pressed([KeyCode::AltLeft, KeyCode::AltRight]);
    let mut events = vec![ToolEvent::PointerMoved];
    if scroll.delta.y != 0.0 {
        // Scrolling down grows the disc.
        events.push(ToolEvent::Scroll {
            delta: -scroll.delta.y,
            alt,
        });
    }
    if keyboard.just_pressed(KeyCode::Space) {
        events.push(ToolEvent::KeyDown(ToolKey::Commit));
    }

    let surface = AvianSurface::new(&spatial_query);
    let mut factory = EntityFactory::new(&mut commands, &mut history);
    let mut sink = MessageSink {
        writer: &mut writer,
        filter: &filter,
    };
    for event in events {
        session
            .tool
            .handle_event(event, &view, &surface, &mut factory, &mut sink);
    }
    factory.finish();
}

fn render_scatter_preview(
    mut commands: Commands,
    session: Res<ScatterSession>,
    mut gizmos: Gizmos,
    mut ghosts: Query<
        (
            Entity,
            &mut Mesh3d,
            &mut MeshMaterial3d<StandardMaterial>,
            &mut Transform,
            &mut Visibility,
        ),
        With<ScatterGhost>,
    >,
) {
    let mut draw = GizmoDraw::new(&mut gizmos);
    session.tool.render(&mut draw);
    draw::sync_ghosts(&mut commands, &mut ghosts, draw.into_ghosts());
}

fn hide_ghosts(mut ghosts: Query<&mut Visibility, With<ScatterGhost>>) {
    for mut visibility in ghosts.iter_mut() {
        *visibility = Visibility::Hidden;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn template_library_changes_reach_the_session() {
        let mut app = App::new();
        app.add_message::<ScatterMessage>()
            .init_resource::<ScatterEventFilter>()
            .init_resource::<ScatterTemplateLibrary>()
            .insert_resource(ScatterSession::with_disc(2.0, 4, Some(11)))
            .add_systems(Update, sync_active_template);

        app.update();
        assert!(app.world().resource::<ScatterSession>().tool.params().template().is_none());

        app.world_mut()
            .resource_mut::<ScatterTemplateLibrary>()
            .push(ScatterTemplate::new("rock"));
        app.update();
        let session = app.world().resource::<ScatterSession>();
        assert_eq!(
            session.tool.params().template().map(|t| t.name.as_str()),
            Some("rock")
        );
    }

    #[test]
    fn removing_the_session_hides_ghosts() {
        let mut app = App::new();
        app.insert_resource(ScatterSession::with_disc(2.0, 4, Some(11)))
            .add_systems(Update, hide_ghosts.run_if(resource_removed::<ScatterSession>));
        let ghost = app
            .world_mut()
            .spawn((ScatterGhost, Visibility::Visible))
            .id();

        app.update();
        assert_eq!(
            app.world().get::<Visibility>(ghost),
            Some(&Visibility::Visible)
        );

        app.world_mut().remove_resource::<ScatterSession>();
        app.update();
        assert_eq!(
            app.world().get::<Visibility>(ghost),
            Some(&Visibility::Hidden)
        );
    }
}
