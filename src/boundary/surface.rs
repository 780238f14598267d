//! Bounding-box surface enumeration.
//!
//! Splits the surface of a block into non-overlapping pieces: faces trimmed
//! of their rims, then edges trimmed of the corners, then the corners. The
//! boundary-condition instantiators intersect each piece with the user's
//! application domain and only dispatch non-empty intersections.

use crate::core::geometry::{Box2D, Box3D};

/// Surface pieces of a 2D block: four edges and four corners.
#[derive(Debug, Clone, Copy)]
pub struct BlockSurface2D {
    block: Box2D,
    width: i64,
}

impl BlockSurface2D {
    pub fn new(block: Box2D, width: i64) -> Self {
        assert!(width >= 1);
        BlockSurface2D { block, width }
    }

    pub fn edge0n(&self) -> Box2D {
        let b = self.block;
        Box2D::new(b.x0, b.x0 + self.width - 1, b.y0 + self.width, b.y1 - self.width)
    }

    pub fn edge0p(&self) -> Box2D {
        let b = self.block;
        Box2D::new(b.x1 - self.width + 1, b.x1, b.y0 + self.width, b.y1 - self.width)
    }

    pub fn edge1n(&self) -> Box2D {
        let b = self.block;
        Box2D::new(b.x0 + self.width, b.x1 - self.width, b.y0, b.y0 + self.width - 1)
    }

    pub fn edge1p(&self) -> Box2D {
        let b = self.block;
        Box2D::new(b.x0 + self.width, b.x1 - self.width, b.y1 - self.width + 1, b.y1)
    }

    pub fn corner_nn(&self) -> Box2D {
        let b = self.block;
        Box2D::new(b.x0, b.x0 + self.width - 1, b.y0, b.y0 + self.width - 1)
    }

    pub fn corner_np(&self) -> Box2D {
        let b = self.block;
        Box2D::new(b.x0, b.x0 + self.width - 1, b.y1 - self.width + 1, b.y1)
    }

    pub fn corner_pn(&self) -> Box2D {
        let b = self.block;
        Box2D::new(b.x1 - self.width + 1, b.x1, b.y0, b.y0 + self.width - 1)
    }

    pub fn corner_pp(&self) -> Box2D {
        let b = self.block;
        Box2D::new(b.x1 - self.width + 1, b.x1, b.y1 - self.width + 1, b.y1)
    }
}

/// Surface pieces of a 3D block: six faces, twelve edges, eight corners.
///
/// Edges are tagged by the axis they run along; the two letters order the
/// normals on the next two axes in cyclic order (edge along axis 1 has its
/// first normal on axis 2, its second on axis 0).
#[derive(Debug, Clone, Copy)]
pub struct BlockSurface3D {
    block: Box3D,
    width: i64,
}

impl BlockSurface3D {
    pub fn new(block: Box3D, width: i64) -> Self {
        assert!(width >= 1);
        BlockSurface3D { block, width }
    }

    fn w(&self) -> i64 {
        self.width
    }

    pub fn surface0n(&self) -> Box3D {
        let b = self.block;
        let w = self.w();
        Box3D::new(b.x0, b.x0 + w - 1, b.y0 + w, b.y1 - w, b.z0 + w, b.z1 - w)
    }

    pub fn surface0p(&self) -> Box3D {
        let b = self.block;
        let w = self.w();
        Box3D::new(b.x1 - w + 1, b.x1, b.y0 + w, b.y1 - w, b.z0 + w, b.z1 - w)
    }

    pub fn surface1n(&self) -> Box3D {
        let b = self.block;
        let w = self.w();
        Box3D::new(b.x0 + w, b.x1 - w, b.y0, b.y0 + w - 1, b.z0 + w, b.z1 - w)
    }

    pub fn surface1p(&self) -> Box3D {
        let b = self.block;
        let w = self.w();
        Box3D::new(b.x0 + w, b.x1 - w, b.y1 - w + 1, b.y1, b.z0 + w, b.z1 - w)
    }

    pub fn surface2n(&self) -> Box3D {
        let b = self.block;
        let w = self.w();
        Box3D::new(b.x0 + w, b.x1 - w, b.y0 + w, b.y1 - w, b.z0, b.z0 + w - 1)
    }

    pub fn surface2p(&self) -> Box3D {
        let b = self.block;
        let w = self.w();
        Box3D::new(b.x0 + w, b.x1 - w, b.y0 + w, b.y1 - w, b.z1 - w + 1, b.z1)
    }

    /// Edge along axis 0; normals on axes 1 and 2.
    pub fn edge0(&self, n1: i64, n2: i64) -> Box3D {
        let b = self.block;
        let w = self.w();
        let (y0, y1) = if n1 < 0 { (b.y0, b.y0 + w - 1) } else { (b.y1 - w + 1, b.y1) };
        let (z0, z1) = if n2 < 0 { (b.z0, b.z0 + w - 1) } else { (b.z1 - w + 1, b.z1) };
        Box3D::new(b.x0 + w, b.x1 - w, y0, y1, z0, z1)
    }

    /// Edge along axis 1; normals on axes 2 and 0.
    pub fn edge1(&self, n1: i64, n2: i64) -> Box3D {
        let b = self.block;
        let w = self.w();
        let (z0, z1) = if n1 < 0 { (b.z0, b.z0 + w - 1) } else { (b.z1 - w + 1, b.z1) };
        let (x0, x1) = if n2 < 0 { (b.x0, b.x0 + w - 1) } else { (b.x1 - w + 1, b.x1) };
        Box3D::new(x0, x1, b.y0 + w, b.y1 - w, z0, z1)
    }

    /// Edge along axis 2; normals on axes 0 and 1.
    pub fn edge2(&self, n1: i64, n2: i64) -> Box3D {
        let b = self.block;
        let w = self.w();
        let (x0, x1) = if n1 < 0 { (b.x0, b.x0 + w - 1) } else { (b.x1 - w + 1, b.x1) };
        let (y0, y1) = if n2 < 0 { (b.y0, b.y0 + w - 1) } else { (b.y1 - w + 1, b.y1) };
        Box3D::new(x0, x1, y0, y1, b.z0 + w, b.z1 - w)
    }

    pub fn corner(&self, xn: i64, yn: i64, zn: i64) -> Box3D {
        let b = self.block;
        let w = self.w();
        let (x0, x1) = if xn < 0 { (b.x0, b.x0 + w - 1) } else { (b.x1 - w + 1, b.x1) };
        let (y0, y1) = if yn < 0 { (b.y0, b.y0 + w - 1) } else { (b.y1 - w + 1, b.y1) };
        let (z0, z1) = if zn < 0 { (b.z0, b.z0 + w - 1) } else { (b.z1 - w + 1, b.z1) };
        Box3D::new(x0, x1, y0, y1, z0, z1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::geometry::intersect2d;

    #[test]
    fn surface2d_pieces_tile_the_border() {
        let block = Box2D::new(0, 9, 0, 7);
        let surf = BlockSurface2D::new(block, 1);
        let pieces = [
            surf.edge0n(),
            surf.edge0p(),
            surf.edge1n(),
            surf.edge1p(),
            surf.corner_nn(),
            surf.corner_np(),
            surf.corner_pn(),
            surf.corner_pp(),
        ];
        // Non-overlapping...
        for (a, pa) in pieces.iter().enumerate() {
            for (b, pb) in pieces.iter().enumerate() {
                if a != b {
                    assert!(intersect2d(*pa, *pb).is_none(), "pieces {a} and {b} overlap");
                }
            }
        }
        // ...and together they cover the one-cell border.
        let count: i64 = pieces.iter().map(|p| p.n_cells()).sum();
        assert_eq!(count, 2 * 10 + 2 * 8 - 4);
    }

    #[test]
    fn surface3d_covers_the_shell() {
        let block = Box3D::new(0, 5, 0, 6, 0, 7);
        let surf = BlockSurface3D::new(block, 1);
        let mut pieces = vec![
            surf.surface0n(),
            surf.surface0p(),
            surf.surface1n(),
            surf.surface1p(),
            surf.surface2n(),
            surf.surface2p(),
        ];
        for n1 in [-1, 1] {
            for n2 in [-1, 1] {
                pieces.push(surf.edge0(n1, n2));
                pieces.push(surf.edge1(n1, n2));
                pieces.push(surf.edge2(n1, n2));
            }
        }
        for xn in [-1, 1] {
            for yn in [-1, 1] {
                for zn in [-1, 1] {
                    pieces.push(surf.corner(xn, yn, zn));
                }
            }
        }
        assert_eq!(pieces.len(), 6 + 12 + 8);
        let shell: i64 = pieces.iter().map(|p| p.n_cells()).sum();
        let full = block.n_cells();
        let interior = (block.get_nx() - 2) * (block.get_ny() - 2) * (block.get_nz() - 2);
        assert_eq!(shell, full - interior);
    }
}
