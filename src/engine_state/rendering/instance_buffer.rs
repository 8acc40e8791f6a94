//! Render-instance storage for one block type within one chunk.
//!
//! Instances are packed densely: slots `0..len()` are all active. Removing an
//! instance moves the last active instance into the freed slot, so the buffer never
//! has holes and the renderer can draw `len()` instances straight from
//! [`InstanceBuffer::transforms`]. Every slot keeps a back-reference to the voxel that
//! owns it so the moved voxel's recorded slot can be patched.

use cgmath::{EuclideanSpace, Matrix4, Point3};

/// Model matrix of one block instance, laid out for direct upload to a GPU buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct InstanceTransform {
    pub model: [[f32; 4]; 4],
}

impl InstanceTransform {
    /// A unit cube centred on `position`.
    pub fn from_position(position: Point3<f32>) -> Self {
        InstanceTransform {
            model: Matrix4::from_translation(position.to_vec()).into(),
        }
    }

    /// The translation part of the model matrix.
    pub fn position(&self) -> Point3<f32> {
        Point3::new(self.model[3][0], self.model[3][1], self.model[3][2])
    }
}

/// Densely packed instances plus the slot → voxel back-reference.
#[derive(Debug, Clone, Default)]
pub struct InstanceBuffer {
    transforms: Vec<InstanceTransform>,
    owners: Vec<Point3<i32>>,
}

impl InstanceBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an instance owned by the chunk-local voxel `owner`.
    ///
    /// # Returns
    /// The slot the instance was stored in.
    pub fn push(&mut self, owner: Point3<i32>, transform: InstanceTransform) -> u32 {
        let slot = self.transforms.len() as u32;
        self.transforms.push(transform);
        self.owners.push(owner);
        slot
    }

    /// Frees `slot` by moving the last active instance into it.
    ///
    /// # Returns
    /// The voxel whose instance now lives in `slot`, or `None` if the freed slot was the
    /// last one (or out of range) and nothing moved.
    pub fn swap_remove(&mut self, slot: u32) -> Option<Point3<i32>> {
        let slot = slot as usize;
        if slot >= self.transforms.len() {
            return None;
        }

        self.transforms.swap_remove(slot);
        self.owners.swap_remove(slot);
        self.owners.get(slot).copied()
    }

    /// The active instance transforms, indexed by slot.
    pub fn transforms(&self) -> &[InstanceTransform] {
        &self.transforms
    }

    /// The active transforms as raw bytes, ready for an instance buffer upload.
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.transforms)
    }

    /// The voxel that owns `slot`.
    pub fn owner(&self, slot: u32) -> Option<Point3<i32>> {
        self.owners.get(slot as usize).copied()
    }

    /// Number of active instances.
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    /// Releases every instance.
    pub fn clear(&mut self) {
        self.transforms.clear();
        self.owners.clear();
    }
}
