//! Face-mesh index constants
//!
//! Landmark indices into the 478-point refined mesh of MediaPipe Face Mesh,
//! the convention the external landmark service is expected to follow.
//! The six EAR points per eye are ordered
//! `[outer corner, top A, inner corner, bottom A, top B, bottom B]`; the
//! contour rings are used for overlay drawing only.

/// Number of landmarks in a full refined face mesh
pub const MESH_POINTS: usize = 478;

/// EAR points, left eye (from the subject's perspective)
pub const LEFT_EYE_EAR: [usize; 6] = [33, 159, 133, 145, 158, 153];

/// EAR points, right eye
pub const RIGHT_EYE_EAR: [usize; 6] = [362, 385, 263, 374, 386, 380];

/// Left eye contour ring
pub const LEFT_EYE_CONTOUR: [usize; 16] = [
    33, 7, 163, 144, 145, 153, 154, 155, 133, 173, 157, 158, 159, 160, 161, 246,
];

/// Right eye contour ring
pub const RIGHT_EYE_CONTOUR: [usize; 16] = [
    362, 382, 381, 380, 374, 373, 390, 249, 263, 466, 388, 387, 386, 385, 384, 398,
];
