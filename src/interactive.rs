//! Spawn/decay animation for pointer-spawned meshes.
//!
//! Every spawned mesh runs its own state machine, advanced by the frame time
//! inside `render`:
//!
//! ```text
//! Growing --(grow elapsed)--> Shrinking --(shrink elapsed)--> Removed
//! ```
//!
//! A spawn's clock starts at the first update after it was created, so a spawn
//! made between frames begins growing on the next frame. Spawns never share
//! timers and a removed spawn never comes back.

use crate::{
    data_structures::scene_graph::{MeshId, Scene},
    easing::Easing,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Growing,
    Shrinking,
    Removed,
}

/// Durations and curves shared by every spawn of a field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpawnTiming {
    /// Seconds.
    pub grow: f32,
    /// Seconds.
    pub shrink: f32,
    pub grow_easing: Easing,
    pub shrink_easing: Easing,
    /// Scale at birth and death; a zero scale would collapse the normal matrix.
    pub rest_scale: f32,
}

impl Default for SpawnTiming {
    fn default() -> Self {
        Self {
            grow: 1.0,
            shrink: 1.0,
            grow_easing: Easing::ExpoOut,
            shrink_easing: Easing::ExpoIn,
            rest_scale: 0.0001,
        }
    }
}

impl SpawnTiming {
    pub fn lifetime(&self) -> f32 {
        self.grow + self.shrink
    }
}

/// One animated mesh.
#[derive(Clone, Debug, PartialEq)]
pub struct Spawn {
    pub mesh: MeshId,
    /// Height reached at the end of `Growing`.
    pub target: f32,
    phase: Phase,
    phase_start: Option<f32>,
}

impl Spawn {
    pub fn new(mesh: MeshId, target: f32) -> Self {
        Self {
            mesh,
            target,
            phase: Phase::Growing,
            phase_start: None,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Advance to `time` and return the current height scale.
    pub fn update(&mut self, time: f32, timing: &SpawnTiming) -> f32 {
        let rest = timing.rest_scale;
        let mut start = *self.phase_start.get_or_insert(time);
        loop {
            match self.phase {
                Phase::Growing => {
                    if time - start >= timing.grow {
                        start += timing.grow;
                        self.phase = Phase::Shrinking;
                        continue;
                    }
                    self.phase_start = Some(start);
                    let t = progress(time - start, timing.grow);
                    return rest + (self.target - rest) * timing.grow_easing.apply(t);
                }
                Phase::Shrinking => {
                    if time - start >= timing.shrink {
                        self.phase = Phase::Removed;
                        self.phase_start = Some(start + timing.shrink);
                        return rest;
                    }
                    self.phase_start = Some(start);
                    let t = progress(time - start, timing.shrink);
                    return self.target + (rest - self.target) * timing.shrink_easing.apply(t);
                }
                Phase::Removed => return rest,
            }
        }
    }

    pub fn cancel(&mut self) {
        self.phase = Phase::Removed;
    }
}

fn progress(elapsed: f32, duration: f32) -> f32 {
    if duration <= 0.0 {
        1.0
    } else {
        (elapsed / duration).clamp(0.0, 1.0)
    }
}

/// The live spawns of one scene.
#[derive(Clone, Debug, Default)]
pub struct SpawnField {
    pub timing: SpawnTiming,
    spawns: Vec<Spawn>,
}

impl SpawnField {
    pub fn new(timing: SpawnTiming) -> Self {
        Self {
            timing,
            spawns: Vec::new(),
        }
    }

    /// Track `mesh`, which starts growing on the next update.
    pub fn spawn(&mut self, scene: &mut Scene, mesh: MeshId, target: f32) {
        if let Some(node) = scene.mesh_mut(mesh) {
            node.local.scale.y = self.timing.rest_scale;
        }
        self.spawns.push(Spawn::new(mesh, target));
    }

    /// Apply every spawn's height at `time` and detach the finished ones.
    /// Returns how many meshes were removed.
    pub fn update(&mut self, scene: &mut Scene, time: f32) -> usize {
        let timing = self.timing;
        for spawn in self.spawns.iter_mut() {
            let height = spawn.update(time, &timing);
            if let Some(node) = scene.mesh_mut(spawn.mesh) {
                node.local.scale.y = height;
            }
        }
        self.sweep(scene)
    }

    /// Force every spawn to `Removed` and detach its mesh.
    pub fn cancel_all(&mut self, scene: &mut Scene) -> usize {
        self.spawns.iter_mut().for_each(Spawn::cancel);
        self.sweep(scene)
    }

    fn sweep(&mut self, scene: &mut Scene) -> usize {
        let before = self.spawns.len();
        self.spawns.retain(|spawn| {
            if spawn.phase == Phase::Removed {
                scene.remove_mesh(spawn.mesh);
                false
            } else {
                true
            }
        });
        let removed = before - self.spawns.len();
        if removed > 0 {
            log::trace!("removed {} spawns, {} live", removed, self.spawns.len());
        }
        removed
    }

    pub fn live(&self) -> usize {
        self.spawns.len()
    }

    pub fn spawns(&self) -> &[Spawn] {
        &self.spawns
    }
}
