//! Scalar and tensor data fields with their initializer helpers.
//!
//! Fields carry a location offset so that a sub-grid extracted from a larger
//! domain evaluates coordinate-dependent initializers in global coordinates.

use crate::core::geometry::{contained2d, contained3d, Box2D, Box3D, Dot2D, Dot3D};
use crate::Scalar;

#[derive(Debug, Clone)]
pub struct ScalarField2D {
    nx: i64,
    ny: i64,
    data: Vec<Scalar>,
    location: Dot2D,
}

impl ScalarField2D {
    pub fn new(nx: i64, ny: i64) -> Self {
        assert!(nx > 0 && ny > 0);
        ScalarField2D {
            nx,
            ny,
            data: vec![0.0; (nx * ny) as usize],
            location: Dot2D::new(0, 0),
        }
    }

    pub fn with_location(mut self, location: Dot2D) -> Self {
        self.location = location;
        self
    }

    pub fn bounding_box(&self) -> Box2D {
        Box2D::new(0, self.nx - 1, 0, self.ny - 1)
    }

    pub fn location(&self) -> Dot2D {
        self.location
    }

    #[inline]
    pub fn get(&self, x: i64, y: i64) -> Scalar {
        self.data[(x * self.ny + y) as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, x: i64, y: i64) -> &mut Scalar {
        &mut self.data[(x * self.ny + y) as usize]
    }
}

#[derive(Debug, Clone)]
pub struct TensorField2D<const N: usize> {
    nx: i64,
    ny: i64,
    data: Vec<[Scalar; N]>,
    location: Dot2D,
}

impl<const N: usize> TensorField2D<N> {
    pub fn new(nx: i64, ny: i64) -> Self {
        assert!(nx > 0 && ny > 0);
        TensorField2D {
            nx,
            ny,
            data: vec![[0.0; N]; (nx * ny) as usize],
            location: Dot2D::new(0, 0),
        }
    }

    pub fn with_location(mut self, location: Dot2D) -> Self {
        self.location = location;
        self
    }

    pub fn bounding_box(&self) -> Box2D {
        Box2D::new(0, self.nx - 1, 0, self.ny - 1)
    }

    pub fn location(&self) -> Dot2D {
        self.location
    }

    #[inline]
    pub fn get(&self, x: i64, y: i64) -> &[Scalar; N] {
        &self.data[(x * self.ny + y) as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, x: i64, y: i64) -> &mut [Scalar; N] {
        &mut self.data[(x * self.ny + y) as usize]
    }
}

#[derive(Debug, Clone)]
pub struct ScalarField3D {
    nx: i64,
    ny: i64,
    nz: i64,
    data: Vec<Scalar>,
    location: Dot3D,
}

impl ScalarField3D {
    pub fn new(nx: i64, ny: i64, nz: i64) -> Self {
        assert!(nx > 0 && ny > 0 && nz > 0);
        ScalarField3D {
            nx,
            ny,
            nz,
            data: vec![0.0; (nx * ny * nz) as usize],
            location: Dot3D::new(0, 0, 0),
        }
    }

    pub fn with_location(mut self, location: Dot3D) -> Self {
        self.location = location;
        self
    }

    pub fn bounding_box(&self) -> Box3D {
        Box3D::new(0, self.nx - 1, 0, self.ny - 1, 0, self.nz - 1)
    }

    pub fn location(&self) -> Dot3D {
        self.location
    }

    #[inline]
    pub fn get(&self, x: i64, y: i64, z: i64) -> Scalar {
        self.data[((x * self.ny + y) * self.nz + z) as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, x: i64, y: i64, z: i64) -> &mut Scalar {
        &mut self.data[((x * self.ny + y) * self.nz + z) as usize]
    }
}

#[derive(Debug, Clone)]
pub struct TensorField3D<const N: usize> {
    nx: i64,
    ny: i64,
    nz: i64,
    data: Vec<[Scalar; N]>,
    location: Dot3D,
}

impl<const N: usize> TensorField3D<N> {
    pub fn new(nx: i64, ny: i64, nz: i64) -> Self {
        assert!(nx > 0 && ny > 0 && nz > 0);
        TensorField3D {
            nx,
            ny,
            nz,
            data: vec![[0.0; N]; (nx * ny * nz) as usize],
            location: Dot3D::new(0, 0, 0),
        }
    }

    pub fn with_location(mut self, location: Dot3D) -> Self {
        self.location = location;
        self
    }

    pub fn bounding_box(&self) -> Box3D {
        Box3D::new(0, self.nx - 1, 0, self.ny - 1, 0, self.nz - 1)
    }

    pub fn location(&self) -> Dot3D {
        self.location
    }

    #[inline]
    pub fn get(&self, x: i64, y: i64, z: i64) -> &[Scalar; N] {
        &self.data[((x * self.ny + y) * self.nz + z) as usize]
    }

    #[inline]
    pub fn get_mut(&mut self, x: i64, y: i64, z: i64) -> &mut [Scalar; N] {
        &mut self.data[((x * self.ny + y) * self.nz + z) as usize]
    }
}

pub fn set_to_constant_2d(field: &mut ScalarField2D, domain: Box2D, value: Scalar) {
    assert!(contained2d(domain, field.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            *field.get_mut(x, y) = value;
        }
    }
}

pub fn set_tensor_to_constant_2d<const N: usize>(
    field: &mut TensorField2D<N>,
    domain: Box2D,
    value: [Scalar; N],
) {
    assert!(contained2d(domain, field.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            *field.get_mut(x, y) = value;
        }
    }
}

/// Write the global coordinate along `index` into the field.
pub fn set_to_coordinate_2d(field: &mut ScalarField2D, domain: Box2D, index: usize) {
    assert!(contained2d(domain, field.bounding_box()));
    assert!(index <= 1);
    let ofs = [field.location().x, field.location().y];
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            let pos = [x, y];
            *field.get_mut(x, y) = (pos[index] + ofs[index]) as Scalar;
        }
    }
}

/// Write both global coordinates into a rank-1 tensor field.
pub fn set_to_coordinates_2d(field: &mut TensorField2D<2>, domain: Box2D) {
    assert!(contained2d(domain, field.bounding_box()));
    let ofs = field.location();
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            *field.get_mut(x, y) = [(x + ofs.x) as Scalar, (y + ofs.y) as Scalar];
        }
    }
}

/// Evaluate `f` at global coordinates and store the result.
pub fn set_to_function_2d<F>(field: &mut ScalarField2D, domain: Box2D, f: F)
where
    F: Fn(i64, i64) -> Scalar,
{
    assert!(contained2d(domain, field.bounding_box()));
    let ofs = field.location();
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            *field.get_mut(x, y) = f(x + ofs.x, y + ofs.y);
        }
    }
}

pub fn set_to_constant_3d(field: &mut ScalarField3D, domain: Box3D, value: Scalar) {
    assert!(contained3d(domain, field.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                *field.get_mut(x, y, z) = value;
            }
        }
    }
}

pub fn set_to_coordinate_3d(field: &mut ScalarField3D, domain: Box3D, index: usize) {
    assert!(contained3d(domain, field.bounding_box()));
    assert!(index <= 2);
    let ofs = [field.location().x, field.location().y, field.location().z];
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                let pos = [x, y, z];
                *field.get_mut(x, y, z) = (pos[index] + ofs[index]) as Scalar;
            }
        }
    }
}

pub fn set_tensor_to_constant_3d<const N: usize>(
    field: &mut TensorField3D<N>,
    domain: Box3D,
    value: [Scalar; N],
) {
    assert!(contained3d(domain, field.bounding_box()));
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                *field.get_mut(x, y, z) = value;
            }
        }
    }
}

/// Write the three global coordinates into a rank-1 tensor field.
pub fn set_to_coordinates_3d(field: &mut TensorField3D<3>, domain: Box3D) {
    assert!(contained3d(domain, field.bounding_box()));
    let ofs = field.location();
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                *field.get_mut(x, y, z) =
                    [(x + ofs.x) as Scalar, (y + ofs.y) as Scalar, (z + ofs.z) as Scalar];
            }
        }
    }
}

pub fn set_to_function_3d<F>(field: &mut ScalarField3D, domain: Box3D, f: F)
where
    F: Fn(i64, i64, i64) -> Scalar,
{
    assert!(contained3d(domain, field.bounding_box()));
    let ofs = field.location();
    for x in domain.x0..=domain.x1 {
        for y in domain.y0..=domain.y1 {
            for z in domain.z0..=domain.z1 {
                *field.get_mut(x, y, z) = f(x + ofs.x, y + ofs.y, z + ofs.z);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn coordinate_initializer_respects_the_location_offset() {
        let mut field = ScalarField2D::new(4, 4).with_location(Dot2D::new(10, 20));
        set_to_coordinate_2d(&mut field, Box2D::new(0, 3, 0, 3), 0);
        assert_eq!(field.get(0, 0), 10.0);
        assert_eq!(field.get(3, 1), 13.0);
        set_to_coordinate_2d(&mut field, Box2D::new(0, 3, 0, 3), 1);
        assert_eq!(field.get(0, 2), 22.0);
    }

    #[test]
    fn function_initializer_covers_only_the_domain() {
        let mut field = ScalarField2D::new(5, 5);
        let bbox = field.bounding_box();
        set_to_constant_2d(&mut field, bbox, -1.0);
        set_to_function_2d(&mut field, Box2D::new(1, 3, 1, 3), |x, y| (x * y) as Scalar);
        assert_eq!(field.get(0, 0), -1.0);
        assert_eq!(field.get(2, 3), 6.0);
    }
}
