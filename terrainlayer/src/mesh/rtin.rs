//! Right-triangulated irregular network (RTIN) mesh simplification.
//!
//! The grid is covered by two right triangles which are recursively split
//! along their hypotenuse. A triangle is split only while the height error at
//! its hypotenuse midpoint (accumulated over all descendants) exceeds the
//! requested tolerance, so neighbouring triangles always share vertices and
//! the mesh has no T-junctions.
//!
//! The triangle hierarchy depends only on the grid size, so it is computed
//! once in [`RtinMeshService::new`] and shared read-only between requests.

use tracing::trace;

use super::{MeshError, MeshService, SimplifiedMesh};
use crate::elevation::HeightGrid;

/// Grid-space corner of a triangle.
type Point = (usize, usize);

/// RTIN simplifier for grids of side `2^k + 1`.
#[derive(Debug, Clone)]
pub struct RtinMeshService {
    grid_size: usize,
    /// Hypotenuse endpoints `[ax, ay, bx, by]` of every triangle in the hierarchy.
    coords: Vec<[u16; 4]>,
    /// Triangles with index below this have children.
    num_parent_triangles: usize,
}

impl RtinMeshService {
    /// Builds the triangle hierarchy for grids with `grid_size` samples per side.
    ///
    /// # Errors
    ///
    /// Returns `MeshError::InvalidGridSize` unless `grid_size - 1` is a power of
    /// two of at least 2 and coordinates fit in `u16`.
    pub fn new(grid_size: usize) -> Result<Self, MeshError> {
        let tile_size = grid_size
            .checked_sub(1)
            .filter(|t| *t >= 2 && t.is_power_of_two() && *t <= u16::MAX as usize / 2)
            .ok_or(MeshError::InvalidGridSize(grid_size))?;

        let num_triangles = tile_size * tile_size * 2 - 2;
        let num_parent_triangles = num_triangles - tile_size * tile_size;

        let mut coords = Vec::with_capacity(num_triangles);
        for i in 0..num_triangles {
            let mut id = i + 2;
            let (mut ax, mut ay, mut bx, mut by, mut cx, mut cy) = (0, 0, 0, 0, 0, 0);
            if id & 1 == 1 {
                // bottom-left root
                bx = tile_size;
                by = tile_size;
                cx = tile_size;
            } else {
                // top-right root
                ax = tile_size;
                ay = tile_size;
                cy = tile_size;
            }
            loop {
                id >>= 1;
                if id <= 1 {
                    break;
                }
                let mx = (ax + bx) >> 1;
                let my = (ay + by) >> 1;
                if id & 1 == 1 {
                    // left half
                    bx = ax;
                    by = ay;
                    ax = cx;
                    ay = cy;
                } else {
                    // right half
                    ax = bx;
                    ay = by;
                    bx = cx;
                    by = cy;
                }
                cx = mx;
                cy = my;
            }
            coords.push([ax as u16, ay as u16, bx as u16, by as u16]);
        }

        Ok(Self {
            grid_size,
            coords,
            num_parent_triangles,
        })
    }

    /// Samples per side this service accepts.
    pub fn grid_size(&self) -> usize {
        self.grid_size
    }

    /// Per-sample approximation error, propagated from children to parents.
    fn compute_errors(&self, terrain: &[f32]) -> Vec<f32> {
        let size = self.grid_size;
        let mut errors = vec![0.0_f32; size * size];

        // Smallest triangles first so parents see their children's errors
        for (i, coord) in self.coords.iter().enumerate().rev() {
            let [ax, ay, bx, by] = coord.map(usize::from);
            let mx = (ax + bx) >> 1;
            let my = (ay + by) >> 1;
            let cx = mx + my - ay;
            let cy = my + ax - mx;

            let interpolated = (terrain[ay * size + ax] + terrain[by * size + bx]) / 2.0;
            let middle = my * size + mx;
            let middle_error = (interpolated - terrain[middle]).abs();
            errors[middle] = errors[middle].max(middle_error);

            if i < self.num_parent_triangles {
                let left = ((ay + cy) >> 1) * size + ((ax + cx) >> 1);
                let right = ((by + cy) >> 1) * size + ((bx + cx) >> 1);
                errors[middle] = errors[middle].max(errors[left]).max(errors[right]);
            }
        }

        errors
    }
}

impl MeshService for RtinMeshService {
    fn generate_mesh(
        &self,
        grid: &HeightGrid,
        max_error: f64,
    ) -> Result<SimplifiedMesh, MeshError> {
        if grid.side() != self.grid_size {
            return Err(MeshError::GridSizeMismatch {
                expected: self.grid_size,
                actual: grid.side(),
            });
        }

        let errors = self.compute_errors(grid.as_slice());
        let max = self.grid_size - 1;

        let mut builder = MeshBuilder {
            size: self.grid_size,
            errors: &errors,
            max_error,
            indices: vec![0; self.grid_size * self.grid_size],
            mesh: SimplifiedMesh::default(),
        };
        builder.process((0, 0), (max, max), (max, 0));
        builder.process((max, max), (0, 0), (0, max));

        trace!(
            max_error,
            vertices = builder.mesh.vertex_count(),
            triangles = builder.mesh.triangle_count(),
            "RTIN mesh extracted"
        );
        Ok(builder.mesh)
    }
}

/// Scratch state for one mesh extraction.
struct MeshBuilder<'a> {
    size: usize,
    errors: &'a [f32],
    max_error: f64,
    /// Vertex index + 1 per grid sample; 0 means not yet emitted.
    indices: Vec<u32>,
    mesh: SimplifiedMesh,
}

impl MeshBuilder<'_> {
    fn process(&mut self, a: Point, b: Point, c: Point) {
        let (mx, my) = ((a.0 + b.0) >> 1, (a.1 + b.1) >> 1);
        let splittable = a.0.abs_diff(c.0) + a.1.abs_diff(c.1) > 1;

        if splittable && f64::from(self.errors[my * self.size + mx]) > self.max_error {
            self.process(c, a, (mx, my));
            self.process(b, c, (mx, my));
        } else {
            let triangle = [self.vertex(a), self.vertex(b), self.vertex(c)];
            self.mesh.triangles.push(triangle);
        }
    }

    fn vertex(&mut self, (x, y): Point) -> u32 {
        let slot = &mut self.indices[y * self.size + x];
        if *slot == 0 {
            self.mesh.vertices.push([x as u16, y as u16]);
            *slot = self.mesh.vertices.len() as u32;
        }
        *slot - 1
    }
}
