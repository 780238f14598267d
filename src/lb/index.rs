//! Direction-subset lookups for boundary closures.
//!
//! These are cold-path helpers (called when boundary cells are completed,
//! not in the bulk loop), so they return freshly allocated vectors instead
//! of memoised singletons.

use crate::descriptor::Descriptor;

/// Index of the lattice vector equal to `v`, or `Q` when absent.
pub fn find_velocity<Dsc, const D: usize, const Q: usize, const E: usize>(v: &[i64; D]) -> usize
where
    Dsc: Descriptor<D, Q, E>,
{
    'outer: for i in 0..Q {
        for k in 0..D {
            if Dsc::C[i][k] != v[k] {
                continue 'outer;
            }
        }
        return i;
    }
    Q
}

/// All directions whose component along `axis` equals `value`.
pub fn sub_index<Dsc, const D: usize, const Q: usize, const E: usize>(
    axis: usize,
    value: i64,
) -> Vec<usize>
where
    Dsc: Descriptor<D, Q, E>,
{
    (0..Q).filter(|&i| Dsc::C[i][axis] == value).collect()
}

/// Directions streaming out of a flat wall with outward normal
/// `orientation` along `axis` — the unknown populations of a boundary cell.
pub fn sub_index_outgoing<Dsc, const D: usize, const Q: usize, const E: usize>(
    axis: usize,
    orientation: i64,
) -> Vec<usize>
where
    Dsc: Descriptor<D, Q, E>,
{
    sub_index::<Dsc, D, Q, E>(axis, orientation)
        .into_iter()
        .map(Dsc::opposite)
        .collect()
}

/// Complement of `known` in `0..Q`.
pub fn remaining_indexes<Dsc, const D: usize, const Q: usize, const E: usize>(
    known: &[usize],
) -> Vec<usize>
where
    Dsc: Descriptor<D, Q, E>,
{
    (0..Q).filter(|i| !known.contains(i)).collect()
}

/// Directions streaming out of a 2D external corner with normals
/// `(x_normal, y_normal)`.
pub fn sub_index_outgoing_corner2d<Dsc, const Q: usize, const E: usize>(
    x_normal: i64,
    y_normal: i64,
) -> Vec<usize>
where
    Dsc: Descriptor<2, Q, E>,
{
    let known = [
        find_velocity::<Dsc, 2, Q, E>(&[x_normal, y_normal]),
        find_velocity::<Dsc, 2, Q, E>(&[x_normal, 0]),
        find_velocity::<Dsc, 2, Q, E>(&[0, y_normal]),
        find_velocity::<Dsc, 2, Q, E>(&[0, 0]),
    ];
    remaining_indexes::<Dsc, 2, Q, E>(&known)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{Descriptor, D2Q9, D3Q19};

    #[test]
    fn sub_index_splits_the_lattice() {
        let neg = sub_index::<D2Q9, 2, 9, 0>(0, -1);
        let nul = sub_index::<D2Q9, 2, 9, 0>(0, 0);
        let pos = sub_index::<D2Q9, 2, 9, 0>(0, 1);
        assert_eq!(neg.len(), 3);
        assert_eq!(nul.len(), 3);
        assert_eq!(pos.len(), 3);
        assert_eq!(neg.len() + nul.len() + pos.len(), 9);
    }

    #[test]
    fn outgoing_set_is_the_opposite_of_the_incoming_set() {
        let incoming = sub_index::<D3Q19, 3, 19, 0>(1, 1);
        let outgoing = sub_index_outgoing::<D3Q19, 3, 19, 0>(1, 1);
        assert_eq!(incoming.len(), outgoing.len());
        for (inc, out) in incoming.iter().zip(outgoing.iter()) {
            assert_eq!(D3Q19::opposite(*inc), *out);
        }
    }

    #[test]
    fn corner_unknowns_on_d2q9() {
        // Lower-left external corner (-1,-1): five populations are unknown.
        let unknown = sub_index_outgoing_corner2d::<D2Q9, 9, 0>(-1, -1);
        assert_eq!(unknown.len(), 5);
        for &i in &unknown {
            let c = D2Q9::C[i];
            assert!(c[0] > 0 || c[1] > 0);
        }
    }

    #[test]
    fn find_velocity_misses_return_q() {
        assert_eq!(find_velocity::<D2Q9, 2, 9, 0>(&[2, 0]), 9);
    }
}
