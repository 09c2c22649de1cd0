//! Prototype meshes and their placements.
//!
//! Meshes live in an arena indexed by [`PrototypeHandle`]; the engine's
//! prototype ids map onto handles. Each prototype accumulates instance
//! transforms until they are taken for scene placement.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use procbridge_core::material::CpuMaterialInstance;
use procbridge_core::mesh::{CpuMesh, MeshDescription};
use procbridge_core::scene::InstanceTransform;

use crate::error::{EncoderError, EncoderResult};

/// Arena index of a registered prototype.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PrototypeHandle(usize);

impl PrototypeHandle {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Assembled geometry of one prototype.
#[derive(Debug, Clone)]
pub struct PrototypeMesh {
    pub name: String,
    pub prototype_id: i32,
    /// Polygonal source the renderable mesh was finalized from.
    pub description: MeshDescription,
    pub mesh: Arc<CpuMesh>,
    /// One material per face group, indexed by section material slot.
    pub materials: Vec<Arc<CpuMaterialInstance>>,
}

/// Placements of one prototype, in the order they were reported.
#[derive(Debug, Clone)]
pub struct InstanceBatch {
    pub handle: PrototypeHandle,
    pub prototype_id: i32,
    pub mesh: Arc<PrototypeMesh>,
    pub transforms: Vec<InstanceTransform>,
}

#[derive(Debug)]
struct Entry {
    mesh: Arc<PrototypeMesh>,
    instances: Vec<InstanceTransform>,
}

/// Registry of prototype meshes for one generation pass.
#[derive(Debug, Default)]
pub struct PrototypeRegistry {
    entries: Vec<Entry>,
    by_id: HashMap<i32, PrototypeHandle>,
}

impl PrototypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the mesh of a new prototype.
    ///
    /// Fails with [`EncoderError::DuplicatePrototype`] if the id is taken.
    pub fn register(&mut self, mesh: PrototypeMesh) -> EncoderResult<PrototypeHandle> {
        let id = mesh.prototype_id;
        if self.by_id.contains_key(&id) {
            return Err(EncoderError::DuplicatePrototype(id));
        }
        let handle = PrototypeHandle(self.entries.len());
        self.entries.push(Entry {
            mesh: Arc::new(mesh),
            instances: Vec::new(),
        });
        self.by_id.insert(id, handle);
        log::debug!("Registered prototype {id} as {handle:?}");
        Ok(handle)
    }

    /// Append a placement of a registered prototype.
    ///
    /// Fails with [`EncoderError::UnknownPrototype`] and records nothing if
    /// the id was never registered.
    pub fn add_instance(&mut self, prototype_id: i32, transform: InstanceTransform) -> EncoderResult<()> {
        let handle = self
            .handle(prototype_id)
            .ok_or(EncoderError::UnknownPrototype(prototype_id))?;
        self.entries[handle.0].instances.push(transform);
        Ok(())
    }

    pub fn contains(&self, prototype_id: i32) -> bool {
        self.by_id.contains_key(&prototype_id)
    }

    pub fn handle(&self, prototype_id: i32) -> Option<PrototypeHandle> {
        self.by_id.get(&prototype_id).copied()
    }

    pub fn get(&self, prototype_id: i32) -> Option<&Arc<PrototypeMesh>> {
        self.handle(prototype_id).map(|h| &self.entries[h.0].mesh)
    }

    pub fn mesh(&self, handle: PrototypeHandle) -> Option<&Arc<PrototypeMesh>> {
        self.entries.get(handle.0).map(|e| &e.mesh)
    }

    /// Placements recorded so far for a prototype.
    pub fn instances(&self, prototype_id: i32) -> &[InstanceTransform] {
        self.handle(prototype_id)
            .map(|h| self.entries[h.0].instances.as_slice())
            .unwrap_or(&[])
    }

    /// Total placements across all prototypes.
    pub fn instance_count(&self) -> usize {
        self.entries.iter().map(|e| e.instances.len()).sum()
    }

    /// Registered prototypes in registration order.
    pub fn meshes(&self) -> impl Iterator<Item = &Arc<PrototypeMesh>> {
        self.entries.iter().map(|e| &e.mesh)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Copy of every prototype's placements, in registration order.
    /// Prototypes without placements are left out.
    pub fn all_instances(&self) -> Vec<InstanceBatch> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.instances.is_empty())
            .map(|(i, e)| InstanceBatch {
                handle: PrototypeHandle(i),
                prototype_id: e.mesh.prototype_id,
                mesh: Arc::clone(&e.mesh),
                transforms: e.instances.clone(),
            })
            .collect()
    }

    /// Take every prototype's placements, leaving the lists empty.
    pub fn take_instances(&mut self) -> Vec<InstanceBatch> {
        self.entries
            .iter_mut()
            .enumerate()
            .filter(|(_, e)| !e.instances.is_empty())
            .map(|(i, e)| InstanceBatch {
                handle: PrototypeHandle(i),
                prototype_id: e.mesh.prototype_id,
                mesh: Arc::clone(&e.mesh),
                transforms: std::mem::take(&mut e.instances),
            })
            .collect()
    }
}

/// [`PrototypeRegistry`] behind a lock, for engines that evaluate shapes
/// in parallel.
///
/// Writers are serialized. When two threads register the same prototype,
/// the first one wins and the other receives
/// [`EncoderError::DuplicatePrototype`].
#[derive(Debug, Default)]
pub struct SharedPrototypeRegistry {
    inner: Mutex<PrototypeRegistry>,
}

impl SharedPrototypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, mesh: PrototypeMesh) -> EncoderResult<PrototypeHandle> {
        self.inner.lock().register(mesh)
    }

    pub fn add_instance(&self, prototype_id: i32, transform: InstanceTransform) -> EncoderResult<()> {
        self.inner.lock().add_instance(prototype_id, transform)
    }

    pub fn contains(&self, prototype_id: i32) -> bool {
        self.inner.lock().contains(prototype_id)
    }

    pub fn get(&self, prototype_id: i32) -> Option<Arc<PrototypeMesh>> {
        self.inner.lock().get(prototype_id).cloned()
    }

    pub fn len(&self) -> usize {
        self.inner.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.lock().is_empty()
    }

    pub fn take_instances(&self) -> Vec<InstanceBatch> {
        self.inner.lock().take_instances()
    }

    pub fn into_inner(self) -> PrototypeRegistry {
        self.inner.into_inner()
    }
}

impl From<PrototypeRegistry> for SharedPrototypeRegistry {
    fn from(registry: PrototypeRegistry) -> Self {
        Self {
            inner: Mutex::new(registry),
        }
    }
}
