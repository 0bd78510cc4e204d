//! Shapes module - polyomino definitions and the shape catalog
//!
//! Every shape is a fixed set of cell offsets relative to an anchor at
//! `(0, 0)`. The anchor is always one of the shape's cells but is not
//! necessarily the bottom-left one, so offsets may be negative.
//!
//! The catalog is an explicitly constructed immutable value
//! ([`ShapeLibrary::standard`]) that is passed into the engine at startup.
//! There is no process-wide static catalog; tests can build their own
//! reduced libraries.

use gridblocks_types::{CellOffset, ShapeId};

/// An immutable polyomino definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShapeDefinition {
    id: ShapeId,
    name: &'static str,
    offsets: Vec<CellOffset>,
}

impl ShapeDefinition {
    /// Build a shape definition, validating the offset set.
    ///
    /// Panics if the offsets are empty, missing the `(0, 0)` anchor, or
    /// contain duplicates. A malformed offset set is a programming error
    /// in the catalog, never a runtime condition.
    pub fn new(id: ShapeId, name: &'static str, offsets: &[CellOffset]) -> Self {
        assert!(!offsets.is_empty(), "shape {:?} has no offsets", id);
        assert!(
            offsets.contains(&(0, 0)),
            "shape {:?} is missing its (0,0) anchor",
            id
        );
        for (i, a) in offsets.iter().enumerate() {
            for b in &offsets[i + 1..] {
                assert!(a != b, "shape {:?} has duplicate offset {:?}", id, a);
            }
        }
        Self {
            id,
            name,
            offsets: offsets.to_vec(),
        }
    }

    pub fn id(&self) -> ShapeId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn offsets(&self) -> &[CellOffset] {
        &self.offsets
    }

    /// Number of cells the shape covers.
    pub fn cell_count(&self) -> usize {
        self.offsets.len()
    }

    /// Complexity metric: cell count plus the number of empty cells inside
    /// the bounding box. Lines and squares score low; corners, T/S/Z and
    /// plus shapes score higher. Drives the difficulty weighting.
    pub fn complexity(&self) -> u32 {
        let (min_dx, max_dx, min_dy, max_dy) = self.bounds();
        let area = (max_dx - min_dx + 1) as u32 * (max_dy - min_dy + 1) as u32;
        let cells = self.offsets.len() as u32;
        cells + (area - cells)
    }

    /// Bounding offsets `(min_dx, max_dx, min_dy, max_dy)`.
    pub fn bounds(&self) -> (i8, i8, i8, i8) {
        let mut min_dx = i8::MAX;
        let mut max_dx = i8::MIN;
        let mut min_dy = i8::MAX;
        let mut max_dy = i8::MIN;
        for &(dx, dy) in &self.offsets {
            min_dx = min_dx.min(dx);
            max_dx = max_dx.max(dx);
            min_dy = min_dy.min(dy);
            max_dy = max_dy.max(dy);
        }
        (min_dx, max_dx, min_dy, max_dy)
    }
}

/// Immutable catalog of shapes keyed by [`ShapeId`].
///
/// Read-only for the engine's lifetime. Lookup is a linear scan; the
/// catalog is small (21 shapes) and the scan beats hashing at this size.
#[derive(Debug, Clone)]
pub struct ShapeLibrary {
    shapes: Vec<ShapeDefinition>,
}

impl ShapeLibrary {
    /// Build a library from explicit definitions.
    ///
    /// Panics on duplicate ids or if the single-cell fallback shape is
    /// absent; the spawner's defensive repair depends on it.
    pub fn new(shapes: Vec<ShapeDefinition>) -> Self {
        for (i, a) in shapes.iter().enumerate() {
            for b in &shapes[i + 1..] {
                assert!(a.id() != b.id(), "duplicate shape id {:?}", a.id());
            }
        }
        let lib = Self { shapes };
        assert!(
            lib.get(ShapeId::SINGLE).is_some(),
            "library must contain the single-cell shape"
        );
        lib
    }

    /// The standard 21-shape catalog.
    pub fn standard() -> Self {
        let defs: &[(u16, &'static str, &[CellOffset])] = &[
            (1, "single", &[(0, 0)]),
            (2, "line2_h", &[(0, 0), (1, 0)]),
            (3, "line2_v", &[(0, 0), (0, 1)]),
            (4, "line3_h", &[(0, 0), (1, 0), (2, 0)]),
            (5, "line3_v", &[(0, 0), (0, 1), (0, 2)]),
            (6, "line4_h", &[(0, 0), (1, 0), (2, 0), (3, 0)]),
            (7, "line4_v", &[(0, 0), (0, 1), (0, 2), (0, 3)]),
            (8, "line5_h", &[(0, 0), (1, 0), (2, 0), (3, 0), (4, 0)]),
            (9, "line5_v", &[(0, 0), (0, 1), (0, 2), (0, 3), (0, 4)]),
            (10, "square2", &[(0, 0), (1, 0), (0, 1), (1, 1)]),
            (
                11,
                "square3",
                &[
                    (0, 0),
                    (1, 0),
                    (2, 0),
                    (0, 1),
                    (1, 1),
                    (2, 1),
                    (0, 2),
                    (1, 2),
                    (2, 2),
                ],
            ),
            (12, "corner_sw", &[(0, 0), (1, 0), (0, 1)]),
            (13, "corner_se", &[(0, 0), (1, 0), (1, 1)]),
            (14, "corner_nw", &[(0, 0), (0, 1), (1, 1)]),
            (15, "corner_ne", &[(0, 0), (-1, 1), (0, 1)]),
            (
                16,
                "corner3_sw",
                &[(0, 0), (1, 0), (2, 0), (0, 1), (0, 2)],
            ),
            (
                17,
                "corner3_ne",
                &[(0, 0), (0, 1), (-2, 2), (-1, 2), (0, 2)],
            ),
            (18, "tee", &[(0, 0), (1, 0), (2, 0), (1, 1)]),
            (19, "ess", &[(0, 0), (1, 0), (-1, 1), (0, 1)]),
            (20, "zed", &[(0, 0), (1, 0), (1, 1), (2, 1)]),
            (21, "plus", &[(0, 0), (-1, 1), (0, 1), (1, 1), (0, 2)]),
        ];

        Self::new(
            defs.iter()
                .map(|&(id, name, offsets)| ShapeDefinition::new(ShapeId(id), name, offsets))
                .collect(),
        )
    }

    /// Look up a shape by id.
    pub fn get(&self, id: ShapeId) -> Option<&ShapeDefinition> {
        self.shapes.iter().find(|s| s.id() == id)
    }

    /// Whether the catalog contains `id`.
    pub fn contains(&self, id: ShapeId) -> bool {
        self.get(id).is_some()
    }

    /// The single-cell fallback shape.
    pub fn single(&self) -> &ShapeDefinition {
        self.get(ShapeId::SINGLE)
            .expect("library invariant: single-cell shape present")
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ShapeDefinition> {
        self.shapes.iter()
    }

    /// All shape ids in catalog order.
    pub fn ids(&self) -> Vec<ShapeId> {
        self.shapes.iter().map(|s| s.id()).collect()
    }
}

impl Default for ShapeLibrary {
    fn default() -> Self {
        Self::standard()
    }
}
