//! Axis-aligned integer boxes and explicit point lists.
//!
//! All boxes are closed intervals: `x0..=x1` on every axis. The streaming
//! kernels, the envelope arithmetic and the surface enumerator all rely on
//! inclusive bounds; do not convert to half-open ranges.

/// A closed 2D interval `[x0, x1] x [y0, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Box2D {
    pub x0: i64,
    pub x1: i64,
    pub y0: i64,
    pub y1: i64,
}

impl Box2D {
    pub fn new(x0: i64, x1: i64, y0: i64, y1: i64) -> Self {
        Box2D { x0, x1, y0, y1 }
    }

    pub fn shift(&self, dx: i64, dy: i64) -> Box2D {
        Box2D::new(self.x0 + dx, self.x1 + dx, self.y0 + dy, self.y1 + dy)
    }

    /// Rescale by an integer factor, for multi-grid coordinate changes.
    pub fn multiply(&self, scale: i64) -> Box2D {
        Box2D::new(self.x0 * scale, self.x1 * scale, self.y0 * scale, self.y1 * scale)
    }

    pub fn divide(&self, scale: i64) -> Box2D {
        Box2D::new(
            self.x0.div_euclid(scale),
            self.x1.div_euclid(scale),
            self.y0.div_euclid(scale),
            self.y1.div_euclid(scale),
        )
    }

    pub fn get_nx(&self) -> i64 {
        self.x1 - self.x0 + 1
    }

    pub fn get_ny(&self) -> i64 {
        self.y1 - self.y0 + 1
    }

    pub fn n_cells(&self) -> i64 {
        self.get_nx() * self.get_ny()
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }
}

/// Is `inner` entirely inside `outer`?
pub fn contained2d(inner: Box2D, outer: Box2D) -> bool {
    inner.x0 >= outer.x0 && inner.x1 <= outer.x1 && inner.y0 >= outer.y0 && inner.y1 <= outer.y1
}

/// Intersection of two boxes; `None` when empty.
pub fn intersect2d(a: Box2D, b: Box2D) -> Option<Box2D> {
    let inter = Box2D::new(
        a.x0.max(b.x0),
        a.x1.min(b.x1),
        a.y0.max(b.y0),
        a.y1.min(b.y1),
    );
    if inter.x0 <= inter.x1 && inter.y0 <= inter.y1 {
        Some(inter)
    } else {
        None
    }
}

/// A closed 3D interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Box3D {
    pub x0: i64,
    pub x1: i64,
    pub y0: i64,
    pub y1: i64,
    pub z0: i64,
    pub z1: i64,
}

impl Box3D {
    pub fn new(x0: i64, x1: i64, y0: i64, y1: i64, z0: i64, z1: i64) -> Self {
        Box3D { x0, x1, y0, y1, z0, z1 }
    }

    pub fn shift(&self, dx: i64, dy: i64, dz: i64) -> Box3D {
        Box3D::new(
            self.x0 + dx,
            self.x1 + dx,
            self.y0 + dy,
            self.y1 + dy,
            self.z0 + dz,
            self.z1 + dz,
        )
    }

    pub fn multiply(&self, scale: i64) -> Box3D {
        Box3D::new(
            self.x0 * scale,
            self.x1 * scale,
            self.y0 * scale,
            self.y1 * scale,
            self.z0 * scale,
            self.z1 * scale,
        )
    }

    pub fn divide(&self, scale: i64) -> Box3D {
        Box3D::new(
            self.x0.div_euclid(scale),
            self.x1.div_euclid(scale),
            self.y0.div_euclid(scale),
            self.y1.div_euclid(scale),
            self.z0.div_euclid(scale),
            self.z1.div_euclid(scale),
        )
    }

    pub fn get_nx(&self) -> i64 {
        self.x1 - self.x0 + 1
    }

    pub fn get_ny(&self) -> i64 {
        self.y1 - self.y0 + 1
    }

    pub fn get_nz(&self) -> i64 {
        self.z1 - self.z0 + 1
    }

    pub fn n_cells(&self) -> i64 {
        self.get_nx() * self.get_ny() * self.get_nz()
    }

    pub fn contains(&self, x: i64, y: i64, z: i64) -> bool {
        x >= self.x0
            && x <= self.x1
            && y >= self.y0
            && y <= self.y1
            && z >= self.z0
            && z <= self.z1
    }
}

pub fn contained3d(inner: Box3D, outer: Box3D) -> bool {
    inner.x0 >= outer.x0
        && inner.x1 <= outer.x1
        && inner.y0 >= outer.y0
        && inner.y1 <= outer.y1
        && inner.z0 >= outer.z0
        && inner.z1 <= outer.z1
}

pub fn intersect3d(a: Box3D, b: Box3D) -> Option<Box3D> {
    let inter = Box3D::new(
        a.x0.max(b.x0),
        a.x1.min(b.x1),
        a.y0.max(b.y0),
        a.y1.min(b.y1),
        a.z0.max(b.z0),
        a.z1.min(b.z1),
    );
    if inter.x0 <= inter.x1 && inter.y0 <= inter.y1 && inter.z0 <= inter.z1 {
        Some(inter)
    } else {
        None
    }
}

/// A single 2D grid point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot2D {
    pub x: i64,
    pub y: i64,
}

impl Dot2D {
    pub fn new(x: i64, y: i64) -> Self {
        Dot2D { x, y }
    }
}

/// An explicit list of 2D grid points, the irregular counterpart of `Box2D`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotList2D {
    pub dots: Vec<Dot2D>,
}

impl DotList2D {
    pub fn new(dots: Vec<Dot2D>) -> Self {
        DotList2D { dots }
    }

    pub fn shift(&self, dx: i64, dy: i64) -> DotList2D {
        DotList2D::new(
            self.dots
                .iter()
                .map(|d| Dot2D::new(d.x + dx, d.y + dy))
                .collect(),
        )
    }

    pub fn multiply(&self, scale: i64) -> DotList2D {
        DotList2D::new(
            self.dots
                .iter()
                .map(|d| Dot2D::new(d.x * scale, d.y * scale))
                .collect(),
        )
    }

    pub fn divide(&self, scale: i64) -> DotList2D {
        DotList2D::new(
            self.dots
                .iter()
                .map(|d| Dot2D::new(d.x.div_euclid(scale), d.y.div_euclid(scale)))
                .collect(),
        )
    }

    /// Keep only the dots inside `domain`; `None` when nothing is left.
    pub fn intersect(&self, domain: Box2D) -> Option<DotList2D> {
        let kept: Vec<Dot2D> = self
            .dots
            .iter()
            .copied()
            .filter(|d| domain.contains(d.x, d.y))
            .collect();
        if kept.is_empty() {
            None
        } else {
            Some(DotList2D::new(kept))
        }
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dot3D {
    pub x: i64,
    pub y: i64,
    pub z: i64,
}

impl Dot3D {
    pub fn new(x: i64, y: i64, z: i64) -> Self {
        Dot3D { x, y, z }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DotList3D {
    pub dots: Vec<Dot3D>,
}

impl DotList3D {
    pub fn new(dots: Vec<Dot3D>) -> Self {
        DotList3D { dots }
    }

    pub fn shift(&self, dx: i64, dy: i64, dz: i64) -> DotList3D {
        DotList3D::new(
            self.dots
                .iter()
                .map(|d| Dot3D::new(d.x + dx, d.y + dy, d.z + dz))
                .collect(),
        )
    }

    pub fn multiply(&self, scale: i64) -> DotList3D {
        DotList3D::new(
            self.dots
                .iter()
                .map(|d| Dot3D::new(d.x * scale, d.y * scale, d.z * scale))
                .collect(),
        )
    }

    pub fn divide(&self, scale: i64) -> DotList3D {
        DotList3D::new(
            self.dots
                .iter()
                .map(|d| {
                    Dot3D::new(
                        d.x.div_euclid(scale),
                        d.y.div_euclid(scale),
                        d.z.div_euclid(scale),
                    )
                })
                .collect(),
        )
    }

    pub fn intersect(&self, domain: Box3D) -> Option<DotList3D> {
        let kept: Vec<Dot3D> = self
            .dots
            .iter()
            .copied()
            .filter(|d| domain.contains(d.x, d.y, d.z))
            .collect();
        if kept.is_empty() {
            None
        } else {
            Some(DotList3D::new(kept))
        }
    }

    pub fn len(&self) -> usize {
        self.dots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dots.is_empty()
    }
}
