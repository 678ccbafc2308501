//! Scene graph and hierarchical scene organization.
//!
//! A [`Scene`] owns shared geometry and material stores and a flat set of mesh
//! nodes beneath one root transform. Many meshes may reference the same
//! geometry or material; transforms are per mesh. The renderer consumes the
//! scene through [`Scene::batches`], which groups meshes that can be drawn in a
//! single instanced call.

use std::collections::BTreeMap;

use anyhow::{Context as _, ensure};

use crate::data_structures::{
    geometry::{Geometry, Group},
    instance::{Instance, InstanceRaw},
    material::Material,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeometryId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MeshId(u32);

/// The material(s) a mesh is drawn with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MaterialSlot {
    /// One material for the whole geometry.
    Single(MaterialId),
    /// One material per geometry group, indexed by the group's material index.
    PerGroup(Vec<MaterialId>),
}

impl MaterialSlot {
    pub fn ids(&self) -> Vec<MaterialId> {
        match self {
            MaterialSlot::Single(id) => vec![*id],
            MaterialSlot::PerGroup(ids) => ids.clone(),
        }
    }
}

impl From<MaterialId> for MaterialSlot {
    fn from(id: MaterialId) -> Self {
        MaterialSlot::Single(id)
    }
}

impl From<Vec<MaterialId>> for MaterialSlot {
    fn from(ids: Vec<MaterialId>) -> Self {
        MaterialSlot::PerGroup(ids)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct MeshNode {
    pub geometry: GeometryId,
    pub material: MaterialSlot,
    pub local: Instance,
    pub visible: bool,
}

#[derive(Clone, Debug)]
struct StoredGeometry {
    geometry: Geometry,
    version: u64,
}

/// Meshes sharing geometry, material and index range, ready for one draw call.
#[derive(Clone, Debug)]
pub struct Batch {
    pub geometry: GeometryId,
    pub material: MaterialId,
    /// Index range to draw, `None` for the whole geometry.
    pub group: Option<Group>,
    pub transparent: bool,
    pub instances: Vec<InstanceRaw>,
}

#[derive(Debug, Default)]
pub struct Scene {
    geometries: BTreeMap<GeometryId, StoredGeometry>,
    materials: BTreeMap<MaterialId, Material>,
    meshes: BTreeMap<MeshId, MeshNode>,
    /// Parent transform of every mesh, e.g. for spinning the whole scene.
    pub root: Instance,
    next_id: u32,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    pub fn add_geometry(&mut self, geometry: Geometry) -> GeometryId {
        let id = GeometryId(self.next());
        self.geometries.insert(
            id,
            StoredGeometry {
                geometry,
                version: 0,
            },
        );
        id
    }

    pub fn add_material(&mut self, material: Material) -> MaterialId {
        let id = MaterialId(self.next());
        self.materials.insert(id, material);
        id
    }

    /// Insert a mesh. Fails when an id is unknown or a per-group slot does not
    /// cover every group of the geometry.
    pub fn add_mesh(
        &mut self,
        geometry: GeometryId,
        material: impl Into<MaterialSlot>,
        local: Instance,
    ) -> anyhow::Result<MeshId> {
        let material = material.into();
        let stored = self
            .geometries
            .get(&geometry)
            .with_context(|| format!("unknown geometry {:?}", geometry))?;
        for id in material.ids() {
            ensure!(self.materials.contains_key(&id), "unknown material {:?}", id);
        }
        if let MaterialSlot::PerGroup(ids) = &material {
            let needed = stored
                .geometry
                .groups
                .iter()
                .map(|g| g.material_index + 1)
                .max()
                .unwrap_or(0);
            ensure!(
                ids.len() >= needed,
                "geometry {:?} has {} material groups but {} materials were given",
                geometry,
                needed,
                ids.len()
            );
        }
        let id = MeshId(self.next());
        self.meshes.insert(
            id,
            MeshNode {
                geometry,
                material,
                local,
                visible: true,
            },
        );
        Ok(id)
    }

    pub fn remove_mesh(&mut self, id: MeshId) -> Option<MeshNode> {
        self.meshes.remove(&id)
    }

    pub fn mesh(&self, id: MeshId) -> Option<&MeshNode> {
        self.meshes.get(&id)
    }

    pub fn mesh_mut(&mut self, id: MeshId) -> Option<&mut MeshNode> {
        self.meshes.get_mut(&id)
    }

    pub fn meshes(&self) -> impl Iterator<Item = (MeshId, &MeshNode)> {
        self.meshes.iter().map(|(id, node)| (*id, node))
    }

    pub fn mesh_ids(&self) -> Vec<MeshId> {
        self.meshes.keys().copied().collect()
    }

    pub fn mesh_count(&self) -> usize {
        self.meshes.len()
    }

    pub fn set_material(
        &mut self,
        id: MeshId,
        material: impl Into<MaterialSlot>,
    ) -> anyhow::Result<()> {
        let material = material.into();
        for m in material.ids() {
            ensure!(self.materials.contains_key(&m), "unknown material {:?}", m);
        }
        let node = self
            .meshes
            .get_mut(&id)
            .with_context(|| format!("unknown mesh {:?}", id))?;
        node.material = material;
        Ok(())
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&Geometry> {
        self.geometries.get(&id).map(|s| &s.geometry)
    }

    /// Mutable access bumps the geometry's version so GPU copies are refreshed.
    pub fn geometry_mut(&mut self, id: GeometryId) -> Option<&mut Geometry> {
        self.geometries.get_mut(&id).map(|s| {
            s.version += 1;
            &mut s.geometry
        })
    }

    pub fn geometry_version(&self, id: GeometryId) -> Option<u64> {
        self.geometries.get(&id).map(|s| s.version)
    }

    pub fn geometry_ids(&self) -> Vec<GeometryId> {
        self.geometries.keys().copied().collect()
    }

    pub fn material(&self, id: MaterialId) -> Option<&Material> {
        self.materials.get(&id)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut Material> {
        self.materials.get_mut(&id)
    }

    pub fn materials(&self) -> impl Iterator<Item = (MaterialId, &Material)> {
        self.materials.iter().map(|(id, m)| (*id, m))
    }

    pub fn materials_mut(&mut self) -> impl Iterator<Item = (MaterialId, &mut Material)> {
        self.materials.iter_mut().map(|(id, m)| (*id, m))
    }

    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Drop materials no mesh references, returning how many were removed.
    pub fn prune_materials(&mut self) -> usize {
        let used: std::collections::BTreeSet<MaterialId> = self
            .meshes
            .values()
            .flat_map(|node| node.material.ids())
            .collect();
        let before = self.materials.len();
        self.materials.retain(|id, _| used.contains(id));
        before - self.materials.len()
    }

    pub fn world_transform(&self, id: MeshId) -> Option<Instance> {
        self.meshes.get(&id).map(|node| &self.root * &node.local)
    }

    /// Visit every visible mesh with its world transform, in insertion order.
    pub fn traverse(&self, mut visit: impl FnMut(MeshId, &MeshNode, &Instance)) {
        for (id, node) in self.meshes.iter().filter(|(_, n)| n.visible) {
            let world = &self.root * &node.local;
            visit(*id, node, &world);
        }
    }

    /// Drop every mesh, material and geometry.
    pub fn clear(&mut self) {
        self.meshes.clear();
        self.materials.clear();
        self.geometries.clear();
    }

    /// Group visible meshes into instanced draws. Opaque batches come first,
    /// transparent ones after, each in a stable order.
    pub fn batches(&self) -> Vec<Batch> {
        type Key = (GeometryId, MaterialId, Option<(u32, u32)>);
        let mut grouped: BTreeMap<Key, Batch> = BTreeMap::new();
        self.traverse(|_, node, world| {
            let Some(stored) = self.geometries.get(&node.geometry) else {
                return;
            };
            let raw = world.to_raw();
            let mut push = |material: MaterialId, group: Option<Group>| {
                let transparent = self
                    .materials
                    .get(&material)
                    .map(|m| m.transparent)
                    .unwrap_or(false);
                grouped
                    .entry((node.geometry, material, group.map(|g| (g.start, g.count))))
                    .or_insert_with(|| Batch {
                        geometry: node.geometry,
                        material,
                        group,
                        transparent,
                        instances: Vec::new(),
                    })
                    .instances
                    .push(raw);
            };
            match &node.material {
                MaterialSlot::Single(material) => push(*material, None),
                MaterialSlot::PerGroup(ids) => {
                    for group in &stored.geometry.groups {
                        if let Some(material) = ids.get(group.material_index) {
                            push(*material, Some(*group));
                        }
                    }
                }
            }
        });
        let (mut opaque, transparent): (Vec<Batch>, Vec<Batch>) =
            grouped.into_values().partition(|b| !b.transparent);
        opaque.extend(transparent);
        opaque
    }
}
