//! Side and edge connectivity tables
//!
//! Every table is written in the native node ordering. Side rows are ordered so that the
//! side's own node order is right-handed about the outward normal, with the one exception
//! of the pyramid base, which keeps its historical `[0, 1, 2, 3]` ordering.

use crate::cell::reference_cell::{self, vertex_count};
use crate::cell::shape;
use crate::traits::types::{CellType, IoPackage, ReferenceCell};
use crate::types::{Error, Result};

type Table = &'static [&'static [usize]];

const NO_ENTITIES: Table = &[];

const EDGE2_SIDES: Table = &[&[0], &[1]];
const EDGE2_EDGES: Table = &[&[0, 1]];
const EDGE3_EDGES: Table = &[&[0, 1, 2]];

const TRI3_SIDES: Table = &[&[0, 1], &[1, 2], &[2, 0]];
const TRI6_SIDES: Table = &[&[0, 1, 3], &[1, 2, 4], &[2, 0, 5]];

const QUAD4_SIDES: Table = &[&[0, 1], &[1, 2], &[2, 3], &[3, 0]];
const QUAD8_SIDES: Table = &[&[0, 1, 4], &[1, 2, 5], &[2, 3, 6], &[3, 0, 7]];

const TET4_SIDES: Table = &[&[0, 2, 1], &[0, 1, 3], &[1, 2, 3], &[2, 0, 3]];
const TET10_SIDES: Table = &[
    &[0, 2, 1, 6, 5, 4],
    &[0, 1, 3, 4, 8, 7],
    &[1, 2, 3, 5, 9, 8],
    &[2, 0, 3, 6, 7, 9],
];
const TET4_EDGES: Table = &[&[0, 1], &[1, 2], &[0, 2], &[0, 3], &[1, 3], &[2, 3]];
const TET10_EDGES: Table = &[
    &[0, 1, 4],
    &[1, 2, 5],
    &[0, 2, 6],
    &[0, 3, 7],
    &[1, 3, 8],
    &[2, 3, 9],
];

const HEX8_SIDES: Table = &[
    &[0, 3, 2, 1],
    &[0, 1, 5, 4],
    &[1, 2, 6, 5],
    &[2, 3, 7, 6],
    &[3, 0, 4, 7],
    &[4, 5, 6, 7],
];
const HEX20_SIDES: Table = &[
    &[0, 3, 2, 1, 11, 10, 9, 8],
    &[0, 1, 5, 4, 8, 13, 16, 12],
    &[1, 2, 6, 5, 9, 14, 17, 13],
    &[2, 3, 7, 6, 10, 15, 18, 14],
    &[3, 0, 4, 7, 11, 12, 19, 15],
    &[4, 5, 6, 7, 16, 17, 18, 19],
];
const HEX27_SIDES: Table = &[
    &[0, 3, 2, 1, 11, 10, 9, 8, 20],
    &[0, 1, 5, 4, 8, 13, 16, 12, 21],
    &[1, 2, 6, 5, 9, 14, 17, 13, 22],
    &[2, 3, 7, 6, 10, 15, 18, 14, 23],
    &[3, 0, 4, 7, 11, 12, 19, 15, 24],
    &[4, 5, 6, 7, 16, 17, 18, 19, 25],
];
const HEX8_EDGES: Table = &[
    &[0, 1],
    &[1, 2],
    &[2, 3],
    &[0, 3],
    &[0, 4],
    &[1, 5],
    &[2, 6],
    &[3, 7],
    &[4, 5],
    &[5, 6],
    &[6, 7],
    &[4, 7],
];
const HEX20_EDGES: Table = &[
    &[0, 1, 8],
    &[1, 2, 9],
    &[2, 3, 10],
    &[0, 3, 11],
    &[0, 4, 12],
    &[1, 5, 13],
    &[2, 6, 14],
    &[3, 7, 15],
    &[4, 5, 16],
    &[5, 6, 17],
    &[6, 7, 18],
    &[4, 7, 19],
];

const PRISM6_SIDES: Table = &[
    &[0, 2, 1],
    &[0, 1, 4, 3],
    &[1, 2, 5, 4],
    &[2, 0, 3, 5],
    &[3, 4, 5],
];
const PRISM15_SIDES: Table = &[
    &[0, 2, 1, 8, 7, 6],
    &[0, 1, 4, 3, 6, 10, 12, 9],
    &[1, 2, 5, 4, 7, 11, 13, 10],
    &[2, 0, 3, 5, 8, 9, 14, 11],
    &[3, 4, 5, 12, 13, 14],
];
const PRISM18_SIDES: Table = &[
    &[0, 2, 1, 8, 7, 6],
    &[0, 1, 4, 3, 6, 10, 12, 9, 15],
    &[1, 2, 5, 4, 7, 11, 13, 10, 16],
    &[2, 0, 3, 5, 8, 9, 14, 11, 17],
    &[3, 4, 5, 12, 13, 14],
];
const PRISM6_EDGES: Table = &[
    &[0, 1],
    &[1, 2],
    &[0, 2],
    &[0, 3],
    &[1, 4],
    &[2, 5],
    &[3, 4],
    &[4, 5],
    &[3, 5],
];
const PRISM15_EDGES: Table = &[
    &[0, 1, 6],
    &[1, 2, 7],
    &[0, 2, 8],
    &[0, 3, 9],
    &[1, 4, 10],
    &[2, 5, 11],
    &[3, 4, 12],
    &[4, 5, 13],
    &[3, 5, 14],
];

const PYRAMID5_SIDES: Table = &[&[0, 1, 2, 3], &[0, 1, 4], &[1, 2, 4], &[2, 3, 4], &[3, 0, 4]];
const PYRAMID5_EDGES: Table = &[
    &[0, 1],
    &[1, 2],
    &[2, 3],
    &[0, 3],
    &[0, 4],
    &[1, 4],
    &[2, 4],
    &[3, 4],
];

/// The local nodes of each side, in side order
pub fn side_nodes(cell_type: CellType) -> Table {
    match cell_type {
        CellType::NodeElem => NO_ENTITIES,
        CellType::Edge2 | CellType::Edge3 => EDGE2_SIDES,
        CellType::Tri3 => TRI3_SIDES,
        CellType::Tri6 => TRI6_SIDES,
        CellType::Quad4 => QUAD4_SIDES,
        CellType::Quad8 | CellType::Quad9 => QUAD8_SIDES,
        CellType::Tet4 => TET4_SIDES,
        CellType::Tet10 => TET10_SIDES,
        CellType::Hex8 => HEX8_SIDES,
        CellType::Hex20 => HEX20_SIDES,
        CellType::Hex27 => HEX27_SIDES,
        CellType::Prism6 => PRISM6_SIDES,
        CellType::Prism15 => PRISM15_SIDES,
        CellType::Prism18 => PRISM18_SIDES,
        CellType::Pyramid5 => PYRAMID5_SIDES,
    }
}

/// The local nodes of each edge
///
/// In two dimensions the edges are the sides.
pub fn edge_nodes(cell_type: CellType) -> Table {
    match cell_type {
        CellType::NodeElem => NO_ENTITIES,
        CellType::Edge2 => EDGE2_EDGES,
        CellType::Edge3 => EDGE3_EDGES,
        CellType::Tri3 => TRI3_SIDES,
        CellType::Tri6 => TRI6_SIDES,
        CellType::Quad4 => QUAD4_SIDES,
        CellType::Quad8 | CellType::Quad9 => QUAD8_SIDES,
        CellType::Tet4 => TET4_EDGES,
        CellType::Tet10 => TET10_EDGES,
        CellType::Hex8 => HEX8_EDGES,
        CellType::Hex20 | CellType::Hex27 => HEX20_EDGES,
        CellType::Prism6 => PRISM6_EDGES,
        CellType::Prism15 | CellType::Prism18 => PRISM15_EDGES,
        CellType::Pyramid5 => PYRAMID5_EDGES,
    }
}

/// The number of sides
pub fn side_count(cell_type: CellType) -> usize {
    side_nodes(cell_type).len()
}

/// The number of edges
pub fn edge_count(cell_type: CellType) -> usize {
    edge_nodes(cell_type).len()
}

/// The cell type of a side
pub fn side_type(cell_type: CellType, side: usize) -> Result<CellType> {
    check_side(cell_type, side)?;
    let triangle = match cell_type.reference_cell() {
        ReferenceCell::Prism => side == 0 || side == 4,
        ReferenceCell::Pyramid => side != 0,
        _ => false,
    };
    Ok(match cell_type {
        CellType::NodeElem => {
            return Err(Error::UnsupportedOperation {
                cell_type,
                operation: "sides",
            })
        }
        CellType::Edge2 | CellType::Edge3 => CellType::NodeElem,
        CellType::Tri3 | CellType::Quad4 => CellType::Edge2,
        CellType::Tri6 | CellType::Quad8 | CellType::Quad9 => CellType::Edge3,
        CellType::Tet4 => CellType::Tri3,
        CellType::Tet10 => CellType::Tri6,
        CellType::Hex8 => CellType::Quad4,
        CellType::Hex20 => CellType::Quad8,
        CellType::Hex27 => CellType::Quad9,
        CellType::Prism6 | CellType::Pyramid5 if triangle => CellType::Tri3,
        CellType::Prism6 | CellType::Pyramid5 => CellType::Quad4,
        CellType::Prism15 | CellType::Prism18 if triangle => CellType::Tri6,
        CellType::Prism15 => CellType::Quad8,
        CellType::Prism18 => CellType::Quad9,
    })
}

/// The cell type of the edges, if the cell has any
pub fn edge_type(cell_type: CellType) -> Option<CellType> {
    match cell_type {
        CellType::NodeElem => None,
        _ if cell_type.is_linear() => Some(CellType::Edge2),
        _ => Some(CellType::Edge3),
    }
}

/// Is the local node on the given side?
pub fn is_node_on_side(cell_type: CellType, node: usize, side: usize) -> Result<bool> {
    check_side(cell_type, side)?;
    Ok(side_nodes(cell_type)[side].contains(&node))
}

fn check_side(cell_type: CellType, side: usize) -> Result<()> {
    if side < side_count(cell_type) {
        Ok(())
    } else {
        Err(Error::IndexOutOfRange {
            what: "side",
            index: side,
            len: side_count(cell_type),
        })
    }
}

/// The native node stored at each position of a codec's node list
///
/// Returns `None` when the codec uses the native ordering.
pub fn node_permutation(cell_type: CellType, io: IoPackage) -> Option<&'static [usize]> {
    match io {
        IoPackage::Native | IoPackage::Tecplot => None,
        IoPackage::Vtk => match cell_type {
            CellType::Prism6 => Some(&[0, 2, 1, 3, 5, 4]),
            CellType::Prism15 => Some(&[0, 2, 1, 3, 5, 4, 8, 7, 6, 14, 13, 12, 9, 11, 10]),
            CellType::Prism18 => Some(&[
                0, 2, 1, 3, 5, 4, 8, 7, 6, 14, 13, 12, 9, 11, 10, 17, 16, 15,
            ]),
            CellType::Hex20 => Some(&[
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 16, 17, 18, 19, 12, 13, 14, 15,
            ]),
            CellType::Hex27 => Some(&[
                0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 16, 17, 18, 19, 12, 13, 14, 15, 24, 22,
                21, 23, 20, 25, 26,
            ]),
            _ => None,
        },
        IoPackage::Gmsh => match cell_type {
            CellType::Tet10 => Some(&[0, 1, 2, 3, 4, 5, 6, 7, 9, 8]),
            CellType::Hex20 => Some(&[
                0, 1, 2, 3, 4, 5, 6, 7, 8, 11, 12, 9, 13, 10, 14, 15, 16, 19, 17, 18,
            ]),
            CellType::Hex27 => Some(&[
                0, 1, 2, 3, 4, 5, 6, 7, 8, 11, 12, 9, 13, 10, 14, 15, 16, 19, 17, 18, 20, 21,
                24, 22, 23, 25, 26,
            ]),
            CellType::Prism15 => Some(&[0, 1, 2, 3, 4, 5, 6, 8, 9, 7, 10, 11, 12, 14, 13]),
            CellType::Prism18 => Some(&[
                0, 1, 2, 3, 4, 5, 6, 8, 9, 7, 10, 11, 12, 14, 13, 15, 17, 16,
            ]),
            _ => None,
        },
    }
}

/// The position in a codec's node list at which a native node is stored
pub fn codec_position(cell_type: CellType, io: IoPackage, native: usize) -> Result<usize> {
    if native >= cell_type.node_count() {
        return Err(Error::IndexOutOfRange {
            what: "cell node",
            index: native,
            len: cell_type.node_count(),
        });
    }
    match node_permutation(cell_type, io) {
        None => Ok(native),
        Some(perm) => perm.iter().position(|n| *n == native).ok_or_else(|| {
            Error::InvariantViolation(format!(
                "{cell_type:?} {io:?} permutation does not contain node {native}"
            ))
        }),
    }
}

/// The nodes of a side, as positions in a node list stored in the codec's ordering
pub fn side_row(cell_type: CellType, side: usize, io: IoPackage) -> Result<Vec<usize>> {
    check_side(cell_type, side)?;
    side_nodes(cell_type)[side]
        .iter()
        .map(|n| codec_position(cell_type, io, *n))
        .collect()
}

/// Does Tecplot output split this cell into its children?
fn tecplot_subdivides(cell_type: CellType) -> bool {
    matches!(
        cell_type,
        CellType::Edge3
            | CellType::Tri6
            | CellType::Quad9
            | CellType::Tet10
            | CellType::Hex27
            | CellType::Prism18
    )
}

/// Vertex pattern of a Tecplot zone cell (points, lines, quadrilaterals or bricks)
fn tecplot_pattern(cell: ReferenceCell) -> &'static [usize] {
    match cell {
        ReferenceCell::Point => &[0],
        ReferenceCell::Interval => &[0, 1],
        ReferenceCell::Triangle => &[0, 1, 2, 2],
        ReferenceCell::Quadrilateral => &[0, 1, 2, 3],
        ReferenceCell::Tetrahedron => &[0, 1, 2, 2, 3, 3, 3, 3],
        ReferenceCell::Hexahedron => &[0, 1, 2, 3, 4, 5, 6, 7],
        ReferenceCell::Prism => &[0, 1, 2, 2, 3, 4, 5, 5],
        ReferenceCell::Pyramid => &[0, 1, 2, 3, 4, 4, 4, 4],
    }
}

/// The number of sub-elements written for one cell
pub fn sub_element_count(cell_type: CellType, io: IoPackage) -> usize {
    if io == IoPackage::Tecplot && tecplot_subdivides(cell_type) {
        reference_cell::child_count(cell_type.reference_cell())
    } else {
        1
    }
}

/// The local nodes of a sub-element, in the order the codec writes them
pub fn sub_element_nodes(cell_type: CellType, sub: usize, io: IoPackage) -> Result<Vec<usize>> {
    let count = sub_element_count(cell_type, io);
    if sub >= count {
        return Err(Error::IndexOutOfRange {
            what: "sub-element",
            index: sub,
            len: count,
        });
    }
    match io {
        IoPackage::Tecplot => {
            let corners = if count == 1 {
                (0..vertex_count(cell_type)).collect()
            } else {
                child_vertex_nodes(cell_type, sub)?
            };
            Ok(tecplot_pattern(cell_type.reference_cell())
                .iter()
                .map(|v| corners[*v])
                .collect())
        }
        _ => Ok(match node_permutation(cell_type, io) {
            Some(perm) => perm.to_vec(),
            None => (0..cell_type.node_count()).collect(),
        }),
    }
}

/// The parent nodes coinciding with the vertices of a child
fn child_vertex_nodes(cell_type: CellType, child: usize) -> Result<Vec<usize>> {
    let vertices = reference_cell::vertices(cell_type.reference_cell());
    vertices
        .iter()
        .map(|v| {
            let x = shape::child_point(cell_type, child, v)?;
            (0..cell_type.node_count())
                .find(|n| {
                    reference_cell::reference_point(cell_type, *n)
                        .map(|p| p.iter().zip(&x).all(|(a, b)| (a - b).abs() < 1e-12))
                        .unwrap_or(false)
                })
                .ok_or_else(|| {
                    Error::InvariantViolation(format!(
                        "vertex of child {child} of {cell_type:?} is not a node"
                    ))
                })
        })
        .collect()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::traits::types::ALL_CELL_TYPES;
    use itertools::Itertools;

    #[test]
    fn test_side_counts() {
        for cell_type in ALL_CELL_TYPES {
            let counts = reference_cell::entity_counts(cell_type.reference_cell());
            let expected = match cell_type.dim() {
                0 => 0,
                1 => counts[0],
                2 => counts[1],
                _ => counts[2],
            };
            assert_eq!(side_count(cell_type), expected, "{cell_type:?}");
            if cell_type.dim() > 0 {
                assert_eq!(edge_count(cell_type), counts[1], "{cell_type:?}");
            }
        }
    }

    #[test]
    fn test_side_rows_use_second_order_nodes_consistently() {
        // The mid-node of each side edge must be the node of that cell edge
        for cell_type in [CellType::Tet10, CellType::Hex20, CellType::Prism15] {
            let edges = edge_nodes(cell_type);
            for row in side_nodes(cell_type) {
                let nv = if row.len() == 6 { 3 } else { 4 };
                for i in 0..nv {
                    let a = row[i];
                    let b = row[(i + 1) % nv];
                    let mid = row[nv + i];
                    let edge = edges
                        .iter()
                        .find(|e| (e[0] == a && e[1] == b) || (e[0] == b && e[1] == a))
                        .unwrap();
                    assert_eq!(edge[2], mid, "{cell_type:?} side {row:?}");
                }
            }
        }
    }

    #[test]
    fn test_permutations_are_bijections() {
        for cell_type in ALL_CELL_TYPES {
            for io in [IoPackage::Vtk, IoPackage::Gmsh] {
                if let Some(perm) = node_permutation(cell_type, io) {
                    assert_eq!(perm.len(), cell_type.node_count());
                    assert!(perm.iter().all_unique());
                    assert!(perm.iter().all(|n| *n < cell_type.node_count()));
                    for (position, native) in perm.iter().enumerate() {
                        assert_eq!(codec_position(cell_type, io, *native).unwrap(), position);
                    }
                }
            }
        }
    }

    #[test]
    fn test_pyramid_sides() {
        assert_eq!(side_type(CellType::Pyramid5, 0).unwrap(), CellType::Quad4);
        for side in 1..5 {
            assert_eq!(side_type(CellType::Pyramid5, side).unwrap(), CellType::Tri3);
        }
        assert!(side_type(CellType::Pyramid5, 5).is_err());
    }

    #[test]
    fn test_vtk_prism_side_row() {
        // Native side 0 is [0, 2, 1]; VTK stores native 2 at position 1
        assert_eq!(
            side_row(CellType::Prism6, 0, IoPackage::Vtk).unwrap(),
            vec![0, 1, 2]
        );
        assert_eq!(
            side_row(CellType::Prism6, 0, IoPackage::Native).unwrap(),
            vec![0, 2, 1]
        );
    }

    #[test]
    fn test_tecplot_connectivity() {
        assert_eq!(
            sub_element_nodes(CellType::Tet4, 0, IoPackage::Tecplot).unwrap(),
            vec![0, 1, 2, 2, 3, 3, 3, 3]
        );
        assert_eq!(
            sub_element_nodes(CellType::Pyramid5, 0, IoPackage::Tecplot).unwrap(),
            vec![0, 1, 2, 3, 4, 4, 4, 4]
        );
        assert_eq!(sub_element_count(CellType::Quad9, IoPackage::Tecplot), 4);
        assert_eq!(
            sub_element_nodes(CellType::Quad9, 0, IoPackage::Tecplot).unwrap(),
            vec![0, 4, 8, 7]
        );
        assert_eq!(
            sub_element_nodes(CellType::Quad9, 3, IoPackage::Tecplot).unwrap(),
            vec![8, 5, 2, 6]
        );
        assert_eq!(
            sub_element_nodes(CellType::Tri6, 3, IoPackage::Tecplot).unwrap(),
            vec![3, 4, 5, 5]
        );
        assert!(sub_element_nodes(CellType::Quad9, 4, IoPackage::Tecplot).is_err());
    }

    #[test]
    fn test_vtk_connectivity() {
        assert_eq!(sub_element_count(CellType::Hex27, IoPackage::Vtk), 1);
        let nodes = sub_element_nodes(CellType::Hex20, 0, IoPackage::Vtk).unwrap();
        assert_eq!(nodes[12], 16);
        assert_eq!(nodes[16], 12);
        assert_eq!(
            sub_element_nodes(CellType::Tri3, 0, IoPackage::Vtk).unwrap(),
            vec![0, 1, 2]
        );
    }
}
