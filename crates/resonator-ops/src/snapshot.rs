use kernel_bridge::{Kernel, KernelSolidHandle};
use resonator_geometry::{AreaReport, Profile};
use resonator_types::{PartKind, ResonatorParams};
use uuid::Uuid;

use crate::types::Diagnostics;

/// Radii and areas derived from the parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub inner_radius: f64,
    pub outer_radius: f64,
    /// S1 = π·R1².
    pub inner_section_area: f64,
    /// S2 target = ratio · S1.
    pub target_insert_area: f64,
    pub cap_outer_radius: f64,
    pub cap_height: f64,
}

impl Dimensions {
    pub fn from_params(params: &ResonatorParams) -> Self {
        let outer_radius = params.tube.outer_radius();
        Self {
            inner_radius: params.tube.inner_radius(),
            outer_radius,
            inner_section_area: params.tube.inner_section_area(),
            target_insert_area: params.target_insert_area(),
            cap_outer_radius: outer_radius + params.cap.wall_thickness,
            cap_height: params.cap.total_height(),
        }
    }
}

/// Kernel handles of the five parts; `None` when a part was not built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PartHandles {
    pub resonator: Option<KernelSolidHandle>,
    pub inner_object: Option<KernelSolidHandle>,
    pub cap: Option<KernelSolidHandle>,
    pub cap_with_inner_object: Option<KernelSolidHandle>,
    pub equivalent_cylinder: Option<KernelSolidHandle>,
}

impl PartHandles {
    pub fn get(&self, kind: PartKind) -> Option<&KernelSolidHandle> {
        match kind {
            PartKind::Resonator => self.resonator.as_ref(),
            PartKind::Cap => self.cap.as_ref(),
            PartKind::InnerObject => self.inner_object.as_ref(),
            PartKind::CapWithInnerObject => self.cap_with_inner_object.as_ref(),
            PartKind::EquivalentCylinder => self.equivalent_cylinder.as_ref(),
        }
    }

    /// Present parts in export order.
    pub fn present(&self) -> impl Iterator<Item = (PartKind, &KernelSolidHandle)> {
        PartKind::ALL
            .into_iter()
            .filter_map(move |kind| self.get(kind).map(|h| (kind, h)))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// Everything one recompute produced.
///
/// Built fresh by [`crate::recompute`] and never mutated afterwards; the
/// viewer bridge and the export action both read from it.
#[derive(Debug, Clone)]
pub struct GeometrySnapshot {
    pub id: Uuid,
    pub params: ResonatorParams,
    pub dimensions: Dimensions,
    /// Inner-object profile; empty when the shape was degenerate.
    pub profile: Profile,
    pub areas: AreaReport,
    pub parts: PartHandles,
    pub diagnostics: Diagnostics,
}

impl GeometrySnapshot {
    pub fn part(&self, kind: PartKind) -> Option<&KernelSolidHandle> {
        self.parts.get(kind)
    }

    pub fn has_geometry(&self) -> bool {
        !self.parts.is_empty()
    }

    /// Hand the snapshot's solids back to the kernel.
    pub fn release(self, kernel: &mut dyn Kernel) {
        for (_, handle) in self.parts.present() {
            kernel.release(handle);
        }
    }
}
