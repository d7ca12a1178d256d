//! Cell types

use crate::traits::types::Order;

/// The type of a reference cell
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum ReferenceCell {
    /// A point
    Point = 0,
    /// A line interval
    Interval = 1,
    /// A triangle
    Triangle = 2,
    /// A quadrilateral
    Quadrilateral = 3,
    /// A tetrahedron (whose faces are all triangles)
    Tetrahedron = 4,
    /// A hexahedron (whose faces are all quadrilaterals)
    Hexahedron = 5,
    /// A triangular prism
    Prism = 6,
    /// A square-based pyramid
    Pyramid = 7,
}

impl ReferenceCell {
    /// Create a reference cell type from a u8
    pub fn from(i: u8) -> Option<ReferenceCell> {
        match i {
            0 => Some(ReferenceCell::Point),
            1 => Some(ReferenceCell::Interval),
            2 => Some(ReferenceCell::Triangle),
            3 => Some(ReferenceCell::Quadrilateral),
            4 => Some(ReferenceCell::Tetrahedron),
            5 => Some(ReferenceCell::Hexahedron),
            6 => Some(ReferenceCell::Prism),
            7 => Some(ReferenceCell::Pyramid),
            _ => None,
        }
    }
}

/// A concrete cell: a reference shape together with its node layout
///
/// The node ordering of each variant is fixed: vertices first, then one node per edge
/// (in edge order), then face centres and finally the interior node.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum CellType {
    /// A single node
    NodeElem = 0,
    /// A two-node interval
    Edge2 = 1,
    /// A three-node interval
    Edge3 = 2,
    /// A three-node triangle
    Tri3 = 3,
    /// A six-node triangle
    Tri6 = 4,
    /// A four-node quadrilateral
    Quad4 = 5,
    /// An eight-node (serendipity) quadrilateral
    Quad8 = 6,
    /// A nine-node quadrilateral
    Quad9 = 7,
    /// A four-node tetrahedron
    Tet4 = 8,
    /// A ten-node tetrahedron
    Tet10 = 9,
    /// An eight-node hexahedron
    Hex8 = 10,
    /// A twenty-node (serendipity) hexahedron
    Hex20 = 11,
    /// A twenty-seven-node hexahedron
    Hex27 = 12,
    /// A six-node prism
    Prism6 = 13,
    /// A fifteen-node prism
    Prism15 = 14,
    /// An eighteen-node prism
    Prism18 = 15,
    /// A five-node pyramid
    Pyramid5 = 16,
}

/// Every cell type, in discriminant order
pub const ALL_CELL_TYPES: [CellType; 17] = [
    CellType::NodeElem,
    CellType::Edge2,
    CellType::Edge3,
    CellType::Tri3,
    CellType::Tri6,
    CellType::Quad4,
    CellType::Quad8,
    CellType::Quad9,
    CellType::Tet4,
    CellType::Tet10,
    CellType::Hex8,
    CellType::Hex20,
    CellType::Hex27,
    CellType::Prism6,
    CellType::Prism15,
    CellType::Prism18,
    CellType::Pyramid5,
];

impl CellType {
    /// Create a cell type from a u8
    pub fn from(i: u8) -> Option<CellType> {
        ALL_CELL_TYPES.get(i as usize).copied()
    }

    /// The reference shape of this cell type
    pub fn reference_cell(&self) -> ReferenceCell {
        match self {
            CellType::NodeElem => ReferenceCell::Point,
            CellType::Edge2 | CellType::Edge3 => ReferenceCell::Interval,
            CellType::Tri3 | CellType::Tri6 => ReferenceCell::Triangle,
            CellType::Quad4 | CellType::Quad8 | CellType::Quad9 => ReferenceCell::Quadrilateral,
            CellType::Tet4 | CellType::Tet10 => ReferenceCell::Tetrahedron,
            CellType::Hex8 | CellType::Hex20 | CellType::Hex27 => ReferenceCell::Hexahedron,
            CellType::Prism6 | CellType::Prism15 | CellType::Prism18 => ReferenceCell::Prism,
            CellType::Pyramid5 => ReferenceCell::Pyramid,
        }
    }

    /// The number of nodes
    pub fn node_count(&self) -> usize {
        match self {
            CellType::NodeElem => 1,
            CellType::Edge2 => 2,
            CellType::Edge3 => 3,
            CellType::Tri3 => 3,
            CellType::Tri6 => 6,
            CellType::Quad4 => 4,
            CellType::Quad8 => 8,
            CellType::Quad9 => 9,
            CellType::Tet4 => 4,
            CellType::Tet10 => 10,
            CellType::Hex8 => 8,
            CellType::Hex20 => 20,
            CellType::Hex27 => 27,
            CellType::Prism6 => 6,
            CellType::Prism15 => 15,
            CellType::Prism18 => 18,
            CellType::Pyramid5 => 5,
        }
    }

    /// The topological dimension
    pub fn dim(&self) -> usize {
        match self.reference_cell() {
            ReferenceCell::Point => 0,
            ReferenceCell::Interval => 1,
            ReferenceCell::Triangle | ReferenceCell::Quadrilateral => 2,
            _ => 3,
        }
    }

    /// The default interpolation order
    pub fn default_order(&self) -> Order {
        if self.is_linear() {
            Order::First
        } else {
            Order::Second
        }
    }

    /// Is every node a vertex?
    pub fn is_linear(&self) -> bool {
        matches!(
            self,
            CellType::NodeElem
                | CellType::Edge2
                | CellType::Tri3
                | CellType::Quad4
                | CellType::Tet4
                | CellType::Hex8
                | CellType::Prism6
                | CellType::Pyramid5
        )
    }

    /// Can the cell be refined?
    ///
    /// A point has nothing to subdivide and the pyramid has no embedding.
    pub fn supports_refinement(&self) -> bool {
        !matches!(self, CellType::NodeElem | CellType::Pyramid5)
    }

    /// The lowercase label of the cell type
    pub fn label(&self) -> &'static str {
        match self {
            CellType::NodeElem => "nodeelem",
            CellType::Edge2 => "edge2",
            CellType::Edge3 => "edge3",
            CellType::Tri3 => "tri3",
            CellType::Tri6 => "tri6",
            CellType::Quad4 => "quad4",
            CellType::Quad8 => "quad8",
            CellType::Quad9 => "quad9",
            CellType::Tet4 => "tet4",
            CellType::Tet10 => "tet10",
            CellType::Hex8 => "hex8",
            CellType::Hex20 => "hex20",
            CellType::Hex27 => "hex27",
            CellType::Prism6 => "prism6",
            CellType::Prism15 => "prism15",
            CellType::Prism18 => "prism18",
            CellType::Pyramid5 => "pyramid5",
        }
    }

    /// The cell type with the same shape made of vertices only
    pub fn first_order_equivalent(&self) -> CellType {
        match self.reference_cell() {
            ReferenceCell::Point => CellType::NodeElem,
            ReferenceCell::Interval => CellType::Edge2,
            ReferenceCell::Triangle => CellType::Tri3,
            ReferenceCell::Quadrilateral => CellType::Quad4,
            ReferenceCell::Tetrahedron => CellType::Tet4,
            ReferenceCell::Hexahedron => CellType::Hex8,
            ReferenceCell::Prism => CellType::Prism6,
            ReferenceCell::Pyramid => CellType::Pyramid5,
        }
    }

    /// The second order cell type with the same shape
    ///
    /// If `full` is true, the cell type with face and interior nodes is returned; otherwise
    /// the serendipity variant. Returns `None` when the shape has no second order variant.
    pub fn second_order_equivalent(&self, full: bool) -> Option<CellType> {
        match self.reference_cell() {
            ReferenceCell::Point => None,
            ReferenceCell::Interval => Some(CellType::Edge3),
            ReferenceCell::Triangle => Some(CellType::Tri6),
            ReferenceCell::Quadrilateral => Some(if full {
                CellType::Quad9
            } else {
                CellType::Quad8
            }),
            ReferenceCell::Tetrahedron => Some(CellType::Tet10),
            ReferenceCell::Hexahedron => Some(if full {
                CellType::Hex27
            } else {
                CellType::Hex20
            }),
            ReferenceCell::Prism => Some(if full {
                CellType::Prism18
            } else {
                CellType::Prism15
            }),
            ReferenceCell::Pyramid => None,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use paste::paste;

    #[test]
    fn test_reference_cell_type() {
        for i in 0..8 {
            let cell = ReferenceCell::from(i).unwrap();
            assert_eq!(cell as u8, i);
        }
        assert!(ReferenceCell::from(8).is_none());
    }

    macro_rules! test_cell_type {

        ($($cell:ident),+) => {

        $(
            paste! {

                #[test]
                fn [<test_ $cell:lower _round_trip>]() {
                    let c = CellType::[<$cell>];
                    assert_eq!(CellType::from(c as u8), Some(c));
                    assert_eq!(c.label(), stringify!([<$cell:lower>]));
                    assert_eq!(c.first_order_equivalent().reference_cell(), c.reference_cell());
                    if let Some(c2) = c.second_order_equivalent(true) {
                        assert_eq!(c2.reference_cell(), c.reference_cell());
                        assert_eq!(c2.default_order(), Order::Second);
                    }
                }

            }
        )*
        };
    }

    test_cell_type!(
        NodeElem, Edge2, Edge3, Tri3, Tri6, Quad4, Quad8, Quad9, Tet4, Tet10, Hex8, Hex20, Hex27,
        Prism6, Prism15, Prism18, Pyramid5
    );

    #[test]
    fn test_from_out_of_range() {
        assert!(CellType::from(ALL_CELL_TYPES.len() as u8).is_none());
    }

    #[test]
    fn test_refinement_flags() {
        assert!(!CellType::Pyramid5.supports_refinement());
        assert!(!CellType::NodeElem.supports_refinement());
        assert!(CellType::Hex27.supports_refinement());
        assert!(CellType::Pyramid5.is_linear());
        assert!(!CellType::Quad8.is_linear());
    }
}
