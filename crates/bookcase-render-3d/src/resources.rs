//! Graphics resource bookkeeping.
//!
//! Every mesh shown by the host is backed by a resource acquired through a
//! [`ResourceBackend`]. Handles acquired for one build are collected in a
//! [`TeardownList`] and released exactly once when the next build replaces
//! them.

use std::collections::BTreeMap;

use bookcase_core::RenderError;
use tracing::trace;

use crate::geometry::Mesh;
use crate::material::Material;

/// Identifies one live resource in a backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceHandle(pub u64);

/// Creates and destroys the host-side resources backing each solid.
pub trait ResourceBackend {
    /// Upload `mesh` with `material` and return a handle to it.
    fn acquire(
        &mut self,
        name: &str,
        mesh: &Mesh,
        material: &Material,
    ) -> Result<ResourceHandle, RenderError>;

    /// Destroy the resource behind `handle`.
    fn release(&mut self, handle: ResourceHandle);
}

/// Record of one resource held by a [`MemoryBackend`].
#[derive(Debug, Clone, PartialEq)]
pub struct LiveResource {
    pub name: String,
    pub triangles: usize,
    pub translucent: bool,
}

/// Headless backend that only keeps accounts.
///
/// An optional capacity makes acquisition fail once that many resources are
/// live, which is how resource exhaustion is exercised without a GPU.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    live: BTreeMap<ResourceHandle, LiveResource>,
    next_id: u64,
    capacity: Option<usize>,
    acquired: u64,
    released: u64,
    stale_releases: u64,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend that refuses to hold more than `capacity` resources at once.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    pub fn set_capacity(&mut self, capacity: Option<usize>) {
        self.capacity = capacity;
    }

    /// Number of resources currently held.
    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains_key(&handle)
    }

    pub fn get(&self, handle: ResourceHandle) -> Option<&LiveResource> {
        self.live.get(&handle)
    }

    /// Total successful acquisitions.
    pub fn acquired(&self) -> u64 {
        self.acquired
    }

    /// Total releases of live handles.
    pub fn released(&self) -> u64 {
        self.released
    }

    /// Releases of handles that were not live. Always zero when every
    /// handle is released exactly once.
    pub fn stale_releases(&self) -> u64 {
        self.stale_releases
    }
}

impl ResourceBackend for MemoryBackend {
    fn acquire(
        &mut self,
        name: &str,
        mesh: &Mesh,
        material: &Material,
    ) -> Result<ResourceHandle, RenderError> {
        if let Some(capacity) = self.capacity {
            if self.live.len() >= capacity {
                return Err(RenderError::ResourceInit {
                    reason: format!("capacity of {capacity} resources exhausted at {name}"),
                });
            }
        }

        let handle = ResourceHandle(self.next_id);
        self.next_id += 1;
        self.acquired += 1;
        self.live.insert(
            handle,
            LiveResource {
                name: name.to_string(),
                triangles: mesh.triangle_count(),
                translucent: material.is_translucent(),
            },
        );
        Ok(handle)
    }

    fn release(&mut self, handle: ResourceHandle) {
        if self.live.remove(&handle).is_some() {
            self.released += 1;
        } else {
            self.stale_releases += 1;
        }
    }
}

/// Handles acquired by one successful build.
#[derive(Debug, Default)]
pub struct TeardownList {
    handles: Vec<ResourceHandle>,
}

impl TeardownList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn handles(&self) -> &[ResourceHandle] {
        &self.handles
    }

    /// Release every handle and leave the list empty.
    ///
    /// Returns the number of handles released. Calling it again releases
    /// nothing.
    pub fn release_all<B: ResourceBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let count = self.handles.len();
        for handle in self.handles.drain(..) {
            backend.release(handle);
        }
        if count > 0 {
            trace!(count, "released resources");
        }
        count
    }
}

/// Acquisitions in progress for a build that has not been committed.
///
/// Dropping the guard without calling [`commit`](Self::commit) releases
/// everything it acquired, so a failed build leaves the backend as it was.
pub struct PendingAcquisition<'a, B: ResourceBackend + ?Sized> {
    backend: &'a mut B,
    handles: Vec<ResourceHandle>,
}

impl<'a, B: ResourceBackend + ?Sized> PendingAcquisition<'a, B> {
    pub fn new(backend: &'a mut B) -> Self {
        Self {
            backend,
            handles: Vec::new(),
        }
    }

    pub fn acquire(
        &mut self,
        name: &str,
        mesh: &Mesh,
        material: &Material,
    ) -> Result<ResourceHandle, RenderError> {
        let handle = self.backend.acquire(name, mesh, material)?;
        self.handles.push(handle);
        Ok(handle)
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Keep everything acquired so far.
    pub fn commit(mut self) -> TeardownList {
        TeardownList {
            handles: std::mem::take(&mut self.handles),
        }
    }
}

impl<B: ResourceBackend + ?Sized> Drop for PendingAcquisition<'_, B> {
    fn drop(&mut self) {
        if !self.handles.is_empty() {
            trace!(count = self.handles.len(), "rolling back acquisitions");
        }
        for handle in self.handles.drain(..) {
            self.backend.release(handle);
        }
    }
}
