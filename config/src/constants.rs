//! # Configuration Constants
//!
//! Centralized constants for the resin base tools. Every tolerance, skirt
//! dimension and auxiliary primitive size used by the geometry engines is
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Bottom**: Flattening and trimming tolerances
//! - **Skirt**: Bevel skirt dimensions
//! - **Channels**: Channel cutout tool dimensions
//! - **Export**: Output file conventions

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Epsilon for vertex deduplication after boolean operations.
///
/// Boolean results are rebuilt from loose polygons; positions closer than
/// this are treated as the same vertex.
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

/// Epsilon used by the BSP kernel to classify points against a plane.
pub const PLANE_EPSILON: f64 = 1e-5;

/// Distance within which a boolean-result vertex counts as lying on a face
/// edge. Such edges are split at the vertex, and faces thinner than this
/// are dropped, so the result has no T-junctions.
///
/// Points the BSP kernel classified as coplanar were never split, so their
/// faces can sit up to `PLANE_EPSILON` off a neighbour's edge.
///
/// # Example
///
/// ```rust
/// use config::constants::{TJUNCTION_EPSILON, VERTEX_MERGE_EPSILON};
///
/// assert!(VERTEX_MERGE_EPSILON < TJUNCTION_EPSILON);
/// ```
pub const TJUNCTION_EPSILON: f64 = PLANE_EPSILON;

// =============================================================================
// BOTTOM CONSTANTS
// =============================================================================

/// Vertices within this distance above the bottom plane are snapped onto it.
///
/// # Example
///
/// ```rust
/// use config::constants::BOTTOM_TOLERANCE;
///
/// let floor = 0.0;
/// let z = 0.03;
/// assert!(z < floor + BOTTOM_TOLERANCE);
/// ```
pub const BOTTOM_TOLERANCE: f64 = 0.05;

/// Weld distance for coincident bottom vertices after snapping.
pub const BOTTOM_MERGE_VERTS_DISTANCE: f64 = 0.01;

/// Angle limit (degrees) for the limited dissolve of the flattened bottom.
pub const DISSOLVE_ANGLE_LIMIT_DEGREES: f64 = 1.0;

/// Slab removed by the "Trim bottom (small)" action.
pub const BOTTOM_TRIM_VALUE_SHORT: f64 = 0.05;

/// Slab removed by the "Trim bottom (large)" action.
pub const BOTTOM_TRIM_VALUE_TALL: f64 = 0.1;

/// Edge length of the cuboids used as half-space cutters.
///
/// Large enough to be effectively infinite for miniature bases.
pub const CUTTER_CUBE_SIZE: f64 = 200.0;

// =============================================================================
// SKIRT CONSTANTS
// =============================================================================

/// Height of the bevel skirt extruded below the model.
///
/// # Example
///
/// ```rust
/// use config::constants::{BASE_BEVEL_DEPTH, SIMPLE_BEVEL_SHRINK_DISTANCE};
///
/// // A skirt is taller than it is tapered.
/// assert!(BASE_BEVEL_DEPTH > SIMPLE_BEVEL_SHRINK_DISTANCE);
/// ```
pub const BASE_BEVEL_DEPTH: f64 = 0.7;

/// Inward taper of the skirt's bottom ring, per side.
pub const SIMPLE_BEVEL_SHRINK_DISTANCE: f64 = 0.5;

/// Name suffix given to bevelled duplicates.
pub const BEVEL_NAME_SUFFIX: &str = "simple_base_bevel";

// =============================================================================
// CHANNEL CONSTANTS
// =============================================================================

/// Radius of the sphere forming the rounded channel hub.
pub const CHANNEL_SPHERE_RADIUS: f64 = 3.5;

/// Longitudinal segments of the channel hub sphere.
pub const CHANNEL_SPHERE_SEGMENTS: u32 = 50;

/// Latitudinal rings of the channel hub sphere.
pub const CHANNEL_SPHERE_RINGS: u32 = 25;

/// Distance the hub sphere center sits below the cursor.
pub const CHANNEL_SPHERE_DROP: f64 = 2.0;

/// Edge length of the cuboid each channel wedge starts from.
pub const CHANNEL_CUBE_SIZE: f64 = 2.2;

/// Height of the channel cuboid center above the cursor.
pub const CHANNEL_CUBE_LIFT: f64 = 0.5;

/// Non-uniform scale turning the channel cuboid into a long flat bar.
pub const CHANNEL_STRETCH: [f64; 3] = [1.0, 100.0, 0.8];

/// X scale applied to the bar's top face, producing a wedge profile.
pub const CHANNEL_TAPER: f64 = 0.04;

/// Vertical offset of the diagonal channels, keeping them off the
/// axis-aligned channels' faces.
pub const CHANNEL_DIAGONAL_LIFT: f64 = 0.01;

/// Gap left between the cap cutter and the top of the skirt.
pub const CHANNEL_CAP_EPSILON: f64 = 0.01;

/// Name prefix of auxiliary primitives living only inside one operation.
pub const TEMP_OBJECT_PREFIX: &str = "_basetemp_";

// =============================================================================
// EXPORT CONSTANTS
// =============================================================================

/// File extension written by the batch exporter.
pub const EXPORT_EXTENSION: &str = "stl";

/// Header written into binary STL files.
pub const STL_HEADER: &[u8] = b"Resin Base Tools STL Export";

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of triangles accepted when reading an STL file.
pub const MAX_TRIANGLES: usize = 10_000_000;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}

/// Checks if a f64 value is approximately zero within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_zero;
///
/// assert!(approx_zero(1e-11));
/// assert!(!approx_zero(0.1));
/// ```
#[inline]
pub fn approx_zero(value: f64) -> bool {
    value.abs() < EPSILON
}

/// Scale factor that shrinks a ring of the given width by
/// `SIMPLE_BEVEL_SHRINK_DISTANCE` on each side.
///
/// Returns `None` when the ring is too narrow to taper.
///
/// # Example
///
/// ```rust
/// use config::constants::skirt_scale_factor;
///
/// assert_eq!(skirt_scale_factor(10.0), Some(0.9));
/// assert_eq!(skirt_scale_factor(1.0), None);
/// ```
pub fn skirt_scale_factor(width: f64) -> Option<f64> {
    let target_width = width - SIMPLE_BEVEL_SHRINK_DISTANCE * 2.0;
    if !width.is_finite() || target_width <= 0.0 {
        return None;
    }
    Some(target_width / width)
}
