//! Scene building for the 3D preview.
//!
//! Each part is placed for display, tessellated, and passed through a
//! temporary STL file that is read back as the mesh the viewer shows.

use std::f64::consts::PI;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use kernel_bridge::{Kernel, KernelSolidHandle, RenderMesh};
use mesh_export::{read_stl_file, write_stl, StlFormat};
use resonator_ops::GeometrySnapshot;
use resonator_types::PartKind;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::app::AppError;

/// Side-by-side spacing, as a multiple of the cap's outer radius.
pub const DISPLAY_SPACING_FACTOR: f64 = 2.5;

/// Chordal tolerance for preview meshes, in mm.
pub const PREVIEW_TOLERANCE: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DisplayStyle {
    /// CSS color name.
    pub color: &'static str,
    pub rgb: [f32; 3],
    pub opacity: f32,
    pub show_edges: bool,
}

impl DisplayStyle {
    pub fn for_part(kind: PartKind) -> Self {
        let (color, rgb, opacity) = match kind {
            PartKind::Resonator => ("lightgrey", [0.827, 0.827, 0.827], 0.3),
            PartKind::InnerObject => ("cornflowerblue", [0.392, 0.584, 0.929], 1.0),
            PartKind::CapWithInnerObject => ("goldenrod", [0.855, 0.647, 0.125], 1.0),
            PartKind::EquivalentCylinder => ("mediumseagreen", [0.235, 0.702, 0.443], 1.0),
            PartKind::Cap => ("tomato", [1.0, 0.388, 0.278], 1.0),
        };
        Self {
            color,
            rgb,
            opacity,
            show_edges: true,
        }
    }
}

/// Rigid placement applied to a part for display only.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Turn upside down (180° about +X through the origin) first.
    pub flip: bool,
    pub offset: [f64; 3],
}

impl Placement {
    /// Where `kind` goes, given the spacing `d` between exhibits.
    pub fn for_part(kind: PartKind, d: f64) -> Self {
        let (flip, x) = match kind {
            PartKind::Resonator | PartKind::InnerObject => (false, 0.0),
            PartKind::CapWithInnerObject => (false, -1.5 * d),
            PartKind::EquivalentCylinder => (false, d),
            PartKind::Cap => (true, 2.0 * d),
        };
        Self {
            flip,
            offset: [x, 0.0, 0.0],
        }
    }

    pub fn is_identity(&self) -> bool {
        !self.flip && self.offset == [0.0; 3]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    pub position: [f64; 3],
    pub focal_point: [f64; 3],
    pub view_up: [f64; 3],
}

impl Camera {
    /// Vertical view angle in degrees.
    pub const VIEW_ANGLE: f64 = 30.0;

    /// Isometric camera that frames `bounds`.
    pub fn fit(bounds: [f64; 6]) -> Self {
        let center = [
            (bounds[0] + bounds[3]) / 2.0,
            (bounds[1] + bounds[4]) / 2.0,
            (bounds[2] + bounds[5]) / 2.0,
        ];
        let half_diag = ((bounds[3] - bounds[0]).powi(2)
            + (bounds[4] - bounds[1]).powi(2)
            + (bounds[5] - bounds[2]).powi(2))
        .sqrt()
            / 2.0;
        let radius = if half_diag > 1e-9 { half_diag } else { 0.5 };
        let distance = radius / (Self::VIEW_ANGLE.to_radians() / 2.0).sin();
        let dir = 1.0 / 3f64.sqrt();
        Self {
            position: [
                center[0] + dir * distance,
                center[1] - dir * distance,
                center[2] + dir * distance,
            ],
            focal_point: center,
            view_up: [0.0, 0.0, 1.0],
        }
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::fit([-0.5, -0.5, -0.5, 0.5, 0.5, 0.5])
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneItem {
    pub part: PartKind,
    pub style: DisplayStyle,
    pub mesh: RenderMesh,
    pub bounds: [f64; 6],
}

/// Everything the viewer draws.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scene {
    pub items: Vec<SceneItem>,
    pub show_axes: bool,
    pub camera: Camera,
    /// Parts that could not be shown.
    pub warnings: Vec<String>,
}

impl Scene {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            show_axes: false,
            camera: Camera::default(),
            warnings: Vec::new(),
        }
    }

    pub fn item(&self, part: PartKind) -> Option<&SceneItem> {
        self.items.iter().find(|i| i.part == part)
    }

    /// Union of all item bounds.
    pub fn bounds(&self) -> Option<[f64; 6]> {
        self.items.iter().map(|i| i.bounds).reduce(|a, b| {
            [
                a[0].min(b[0]),
                a[1].min(b[1]),
                a[2].min(b[2]),
                a[3].max(b[3]),
                a[4].max(b[4]),
                a[5].max(b[5]),
            ]
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewerOptions {
    pub tolerance: f64,
    /// Where the temporary STL files go; the system default when `None`.
    pub temp_dir: Option<PathBuf>,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            tolerance: PREVIEW_TOLERANCE,
            temp_dir: None,
        }
    }
}

/// Display order; the assembly sits left of the tube.
const DISPLAY_ORDER: [PartKind; 5] = [
    PartKind::Resonator,
    PartKind::InnerObject,
    PartKind::CapWithInnerObject,
    PartKind::EquivalentCylinder,
    PartKind::Cap,
];

/// Build the preview scene for every part of `snapshot`.
///
/// A part that fails to load is left out and noted in
/// [`Scene::warnings`]; it never hides the others.
pub fn build_scene(
    snapshot: &GeometrySnapshot,
    kernel: &mut dyn Kernel,
    options: &ViewerOptions,
) -> Scene {
    let d = DISPLAY_SPACING_FACTOR * snapshot.dimensions.cap_outer_radius;
    let mut scene = Scene::empty();

    for kind in DISPLAY_ORDER {
        let Some(handle) = snapshot.part(kind) else {
            continue;
        };
        let placement = Placement::for_part(kind, d);
        match load_part(kernel, handle, placement, options) {
            Ok(mesh) => match mesh.bounds() {
                Some(bounds) => scene.items.push(SceneItem {
                    part: kind,
                    style: DisplayStyle::for_part(kind),
                    mesh,
                    bounds,
                }),
                None => scene.warnings.push(format!("{kind}: empty mesh")),
            },
            Err(e) => {
                warn!(part = %kind, "not shown: {e}");
                scene.warnings.push(format!("{kind}: {e}"));
            }
        }
    }

    scene.show_axes = true;
    if let Some(bounds) = scene.bounds() {
        scene.camera = Camera::fit(bounds);
    }
    debug!(items = scene.items.len(), "scene built");
    scene
}

fn load_part(
    kernel: &mut dyn Kernel,
    handle: &KernelSolidHandle,
    placement: Placement,
    options: &ViewerOptions,
) -> Result<RenderMesh, AppError> {
    if placement.is_identity() {
        let mesh = kernel.tessellate(handle, options.tolerance)?;
        return stl_round_trip(&mesh, options);
    }
    let placed = place(kernel, handle, placement)?;
    let mesh = kernel.tessellate(&placed, options.tolerance);
    kernel.release(&placed);
    stl_round_trip(&mesh?, options)
}

/// Display copy of `handle`; the caller releases it.
fn place(
    kernel: &mut dyn Kernel,
    handle: &KernelSolidHandle,
    placement: Placement,
) -> Result<KernelSolidHandle, AppError> {
    if !placement.flip {
        return Ok(kernel.translate(handle, placement.offset)?);
    }
    let flipped = kernel.rotate(handle, [0.0; 3], [1.0, 0.0, 0.0], PI)?;
    let moved = kernel.translate(&flipped, placement.offset);
    kernel.release(&flipped);
    Ok(moved?)
}

/// Write `mesh` to a temporary STL and read it back.
///
/// The temporary file is deleted when the guard drops, on every path.
fn stl_round_trip(mesh: &RenderMesh, options: &ViewerOptions) -> Result<RenderMesh, AppError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("resonator-preview-").suffix(".stl");
    let mut tmp = match &options.temp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        write_stl(&mut writer, mesh, StlFormat::Binary, "preview")?;
        writer.flush()?;
    }
    Ok(read_stl_file(tmp.path())?)
}
