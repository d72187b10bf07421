//! # Solid Kernel
//!
//! The modeling operations the tools need from a geometry kernel. The
//! engines only call through [`SolidKernel`], so a different kernel (or a
//! recording test double) can be swapped in.

use glam::DVec3;
use resin_mesh::ops::{self, DissolveReport};
use resin_mesh::{Mesh, MeshResult};

/// Kind of a boolean step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BooleanOp {
    Union,
    Difference,
}

/// One operand of a [`SolidKernel::compose`] sequence.
#[derive(Debug, Clone, Copy)]
pub struct BooleanStep<'a> {
    pub operand: &'a Mesh,
    pub op: BooleanOp,
}

impl<'a> BooleanStep<'a> {
    pub fn union(operand: &'a Mesh) -> Self {
        Self {
            operand,
            op: BooleanOp::Union,
        }
    }

    pub fn difference(operand: &'a Mesh) -> Self {
        Self {
            operand,
            op: BooleanOp::Difference,
        }
    }
}

/// Solid-modeling kernel.
///
/// Booleans take and return meshes in one shared space; the caller is
/// responsible for bringing operands into it.
pub trait SolidKernel {
    /// Boolean union of two solids.
    fn union(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh>;

    /// Boolean subtraction: a minus b.
    fn difference(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh>;

    /// Merges near-coplanar faces across candidate edges and removes
    /// candidate vertices on straight edge runs.
    fn dissolve_limited(
        &self,
        mesh: &mut Mesh,
        angle_limit: f64,
        verts: &[u32],
        edges: &[[u32; 2]],
    ) -> MeshResult<DissolveReport>;

    /// Extrudes the face region spanned by `selection` and returns the
    /// vertices at the extruded position.
    fn extrude_region(&self, mesh: &mut Mesh, selection: &[u32], offset: DVec3)
        -> MeshResult<Vec<u32>>;

    /// Merges candidate vertices closer than `distance`; returns how many
    /// were removed.
    fn weld_by_distance(&self, mesh: &mut Mesh, candidates: &[u32], distance: f64)
        -> MeshResult<usize>;

    /// Applies `steps` to `base` in order.
    fn compose(&self, base: &Mesh, steps: &[BooleanStep<'_>]) -> MeshResult<Mesh> {
        let mut result = base.clone();
        for step in steps {
            result = match step.op {
                BooleanOp::Union => self.union(&result, step.operand)?,
                BooleanOp::Difference => self.difference(&result, step.operand)?,
            };
        }
        Ok(result)
    }
}

/// [`SolidKernel`] backed by the BSP booleans and topology operations of
/// `resin-mesh`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BspKernel;

impl SolidKernel for BspKernel {
    fn union(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
        ops::union(a, b)
    }

    fn difference(&self, a: &Mesh, b: &Mesh) -> MeshResult<Mesh> {
        ops::difference(a, b)
    }

    fn dissolve_limited(
        &self,
        mesh: &mut Mesh,
        angle_limit: f64,
        verts: &[u32],
        edges: &[[u32; 2]],
    ) -> MeshResult<DissolveReport> {
        ops::dissolve_limited(mesh, angle_limit, verts, edges)
    }

    fn extrude_region(
        &self,
        mesh: &mut Mesh,
        selection: &[u32],
        offset: DVec3,
    ) -> MeshResult<Vec<u32>> {
        ops::extrude_region(mesh, selection, offset)
    }

    fn weld_by_distance(
        &self,
        mesh: &mut Mesh,
        candidates: &[u32],
        distance: f64,
    ) -> MeshResult<usize> {
        ops::weld_by_distance(mesh, candidates, distance)
    }
}
