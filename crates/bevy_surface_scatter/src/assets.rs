use core::result::Result;

use bevy::asset::io::Reader;
use bevy::asset::{AssetLoader, LoadContext};
use bevy::prelude::*;
use bevy::reflect::TypePath;
use bevy::tasks::ConditionalSendFuture;
use serde::{Deserialize, Serialize};
use surface_scatter::params::ScatterPreset;

use crate::events::{MessageSink, ScatterEventFilter, ScatterMessage};
use crate::session::ScatterSession;

/// Asset wrapping a [`ScatterPreset`]: disc size plus tool settings.
#[derive(Asset, TypePath, Clone, Debug, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ScatterPresetAsset(pub ScatterPreset);

/// Asset loader for [`ScatterPresetAsset`] using RON files with `.scatter_preset` extension.
#[derive(TypePath)]
pub struct ScatterPresetAssetLoader;

impl AssetLoader for ScatterPresetAssetLoader {
    type Asset = ScatterPresetAsset;
    type Settings = ();
    type Error = anyhow::Error;

    fn extensions(&self) -> &[&str] {
        &["scatter_preset"]
    }

    fn load(
        &self,
        reader: &mut dyn Reader,
        _settings: &Self::Settings,
        _context: &mut LoadContext,
    ) -> impl ConditionalSendFuture<Output = Result<Self::Asset, Self::Error>> {
        Box::pin(async move {
            let mut bytes = Vec::new();
            reader.read_to_end(&mut bytes).await?;
            parse_preset(&bytes)
        })
    }
}

impl FromWorld for ScatterPresetAssetLoader {
    fn from_world(_: &mut World) -> Self {
        ScatterPresetAssetLoader
    }
}

fn parse_preset(bytes: &[u8]) -> anyhow::Result<ScatterPresetAsset> {
    ron::de::from_bytes(bytes).map_err(|e| anyhow::anyhow!(e))
}

/// The preset applied to the running session whenever it (re)loads.
#[derive(Resource, Clone, Debug)]
pub struct ActiveScatterPreset(pub Handle<ScatterPresetAsset>);

pub(crate) fn apply_loaded_presets(
    mut asset_events: MessageReader<AssetEvent<ScatterPresetAsset>>,
    active: Option<Res<ActiveScatterPreset>>,
    presets: Res<Assets<ScatterPresetAsset>>,
    mut session: ResMut<ScatterSession>,
    mut writer: MessageWriter<ScatterMessage>,
    filter: Res<ScatterEventFilter>,
) {
    let Some(active) = active else {
        asset_events.clear();
        return;
    };
    let target = active.0.id();
    let ready = asset_events
        .read()
        .filter(|event| match event {
            AssetEvent::Added { id }
            | AssetEvent::LoadedWithDependencies { id }
            | AssetEvent::Modified { id } => *id == target,
            _ => false,
        })
        .count();
    if ready == 0 {
        return;
    }
    let Some(preset) = presets.get(target) else {
        return;
    };

    let mut sink = MessageSink {
        writer: &mut writer,
        filter: &filter,
    };
    match session.tool.apply_preset(&preset.0, &mut sink) {
        Ok(()) => info!(
            "Applied scatter preset: radius {}, {} samples.",
            session.tool.params().disc_radius(),
            session.tool.params().sample_count()
        ),
        Err(err) => warn!("Scatter preset rejected: {}", err),
    }
}
