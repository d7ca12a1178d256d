use approx::*;
use meshgeom::cell::{embedding_matrix, embedding_weight};
use meshgeom::mesh::Mesh;
use meshgeom::traits::types::{CellType, ALL_CELL_TYPES};
use meshgeom::Error;

#[test]
fn test_partition_of_unity() {
    for cell_type in ALL_CELL_TYPES {
        if !cell_type.supports_refinement() {
            continue;
        }
        let e = embedding_matrix(cell_type).unwrap();
        for child in 0..cell_type.child_count() {
            for child_node in 0..cell_type.node_count() {
                let sum = (0..cell_type.node_count())
                    .map(|p| embedding_weight(cell_type, child, child_node, p).unwrap())
                    .sum::<f64>();
                assert_abs_diff_eq!(sum, 1.0, epsilon = 1e-9);
                assert_eq!(e.row(child, child_node).unwrap().len(), cell_type.node_count());
            }
        }
    }
}

#[test]
fn test_first_order_weights_are_convex() {
    for cell_type in ALL_CELL_TYPES {
        if !cell_type.supports_refinement() || !cell_type.is_linear() {
            continue;
        }
        let e = embedding_matrix(cell_type).unwrap();
        for child in 0..e.child_count() {
            for child_node in 0..e.node_count() {
                for w in e.row(child, child_node).unwrap() {
                    assert!((0.0..=1.0).contains(w));
                }
            }
        }
    }
}

#[test]
fn test_child_vertices_on_parent_nodes() {
    //! Every vertex of a child of a complete second order cell is a parent node
    for cell_type in [
        CellType::Edge3,
        CellType::Tri6,
        CellType::Quad9,
        CellType::Tet10,
        CellType::Hex27,
        CellType::Prism18,
    ] {
        let e = embedding_matrix(cell_type).unwrap();
        for child in 0..e.child_count() {
            for vertex in 0..cell_type.vertex_count() {
                let row = e.row(child, vertex).unwrap();
                assert_eq!(row.iter().filter(|w| **w != 0.0).count(), 1);
                assert_eq!(row.iter().filter(|w| **w == 1.0).count(), 1);
            }
        }
    }
}

#[test]
fn test_pyramid_refusal() {
    assert_eq!(
        embedding_weight(CellType::Pyramid5, 0, 0, 0),
        Err(Error::UnsupportedOperation {
            cell_type: CellType::Pyramid5,
            operation: "refinement"
        })
    );

    let mut mesh = Mesh::<f64>::new();
    for p in [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [1.0, 1.0, 0.0],
        [0.0, 1.0, 0.0],
        [0.5, 0.5, 1.0],
    ] {
        mesh.add_node(p);
    }
    let cell = mesh.add_cell(CellType::Pyramid5, &[0, 1, 2, 3, 4]).unwrap();
    assert!(matches!(
        mesh.refine(cell),
        Err(Error::UnsupportedOperation { .. })
    ));
    assert_eq!(mesh.cell_count(), 1);
}

#[test]
fn test_refine_hex8() {
    let mut mesh = Mesh::<f64>::new();
    for z in [0.0, 2.0] {
        for (x, y) in [(0.0, 0.0), (2.0, 0.0), (2.0, 2.0), (0.0, 2.0)] {
            mesh.add_node([x, y, z]);
        }
    }
    let hex = mesh
        .add_cell(CellType::Hex8, &[0, 1, 2, 3, 4, 5, 6, 7])
        .unwrap();
    let children = mesh.refine(hex).unwrap();
    assert_eq!(children.len(), 8);
    assert_eq!(mesh.node_count(), 27);

    // Every node of the refined mesh lies on the lattice {0, 1, 2}^3
    for n in 0..mesh.node_count() {
        for x in mesh.node(n).unwrap().point() {
            assert_relative_eq!(*x, x.round());
        }
    }

    // The children meet in a single centre node
    let centre = mesh.cell(children[0]).unwrap().nodes()[6];
    for (child, vertex) in children.iter().zip([6, 7, 5, 4, 2, 3, 1, 0]) {
        assert_eq!(mesh.cell(*child).unwrap().nodes()[vertex], centre);
    }
}

#[test]
fn test_neighbouring_quads_share_edge_nodes() {
    let mut mesh = Mesh::<f64>::new();
    for p in [
        [0.0, 0.0, 0.0],
        [1.0, 0.0, 0.0],
        [2.0, 0.0, 0.0],
        [0.0, 1.0, 0.0],
        [1.0, 1.0, 0.0],
        [2.0, 1.0, 0.0],
    ] {
        mesh.add_node(p);
    }
    let left = mesh.add_cell(CellType::Quad4, &[0, 1, 4, 3]).unwrap();
    let right = mesh.add_cell(CellType::Quad4, &[1, 2, 5, 4]).unwrap();
    mesh.refine(left).unwrap();
    let before = mesh.node_count();
    mesh.refine(right).unwrap();

    // The right cell reuses the midpoint of the shared edge
    assert_eq!(before, 6 + 5);
    assert_eq!(mesh.node_count(), before + 4);
    assert_eq!(mesh.boundary_sides().unwrap().len(), 12);
}

#[test]
fn test_refine_all_levels() {
    let mut mesh = Mesh::<f64>::new();
    for p in [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]] {
        mesh.add_node(p);
    }
    mesh.add_cell(CellType::Tri3, &[0, 1, 2]).unwrap();
    mesh.refine_all().unwrap();
    mesh.refine_all().unwrap();
    assert_eq!(mesh.active_cells().len(), 16);
    assert_eq!(mesh.node_count(), 15);
    for c in mesh.active_cells() {
        assert_eq!(mesh.cell(c).unwrap().level(), 2);
    }
}
