use std::time::{SystemTime, UNIX_EPOCH};

use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::SeedableRng;
use surface_scatter::prelude::{ScatterParameters, ScatterSettings, ScatterTool, Template};

/// Template made of Bevy mesh and material handles.
pub type ScatterTemplate = Template<Handle<Mesh>, Handle<StandardMaterial>>;

/// Parameters over Bevy mesh and material handles.
pub type ScatterParams = ScatterParameters<Handle<Mesh>, Handle<StandardMaterial>>;

/// The core tool as stored in the ECS.
pub type BevyScatterTool = ScatterTool<Handle<Mesh>, Handle<StandardMaterial>, StdRng>;

/// A running scatter tool.
///
/// Insert this resource to start the tool and remove it to stop; every plugin system
/// is gated on its existence.
#[derive(Resource)]
pub struct ScatterSession {
    pub tool: BevyScatterTool,
}

impl ScatterSession {
    /// Validates `settings` and starts a session seeded with `seed`, or from the
    /// wall clock when `None`.
    pub fn try_new(
        settings: ScatterSettings,
        params: ScatterParams,
        seed: Option<u64>,
    ) -> surface_scatter::error::Result<Self> {
        let seed = seed.unwrap_or_else(clock_seed);
        let tool = ScatterTool::try_new(settings, params, StdRng::seed_from_u64(seed))?;
        info!("Scatter session seeded with {}.", seed);
        Ok(Self { tool })
    }

    /// A session with default settings and the given disc.
    pub fn with_disc(radius: f32, count: i64, seed: Option<u64>) -> Self {
        let seed = seed.unwrap_or_else(clock_seed);
        Self {
            tool: ScatterTool::new(
                ScatterSettings::default(),
                ScatterParams::with_disc(radius, count),
                StdRng::seed_from_u64(seed),
            ),
        }
    }
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0x5CA7_7E12)
}

/// Marks the camera whose cursor ray drives the tool.
#[derive(Component, Default, Debug, Clone, Copy)]
pub struct ScatterCamera;

/// Named templates the user cycles through with Tab.
#[derive(Resource, Default)]
pub struct ScatterTemplateLibrary {
    templates: Vec<ScatterTemplate>,
    active: Option<usize>,
}

impl ScatterTemplateLibrary {
    /// Adds a template; the first one added becomes active.
    pub fn push(&mut self, template: ScatterTemplate) {
        self.templates.push(template);
        if self.active.is_none() {
            self.active = Some(0);
        }
    }

    pub fn with(mut self, template: ScatterTemplate) -> Self {
        self.push(template);
        self
    }

    pub fn active(&self) -> Option<&ScatterTemplate> {
        self.active.and_then(|i| self.templates.get(i))
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    /// Selects template `index`, or none when out of range.
    pub fn select(&mut self, index: Option<usize>) {
        self.active = index.filter(|i| *i < self.templates.len());
    }

    /// Advances to the next template, wrapping around.
    pub fn cycle(&mut self) {
        if self.templates.is_empty() {
            return;
        }
        self.active = Some(self.active.map_or(0, |i| (i + 1) % self.templates.len()));
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
