use wf3d_core::loader::{stl, ObjLoader};
use wf3d_core::{LoadError, Mesh};

fn assert_index_parity(mesh: &Mesh) {
    assert_eq!(mesh.faces().len() % 3, 0);
    let vertex_count = mesh.vertices().len();
    assert!(mesh.faces().iter().all(|&i| (i as usize) < vertex_count));
}

#[test]
fn every_mesh_source_yields_whole_triangles() {
    assert_index_parity(&Mesh::cube());
    assert_index_parity(&Mesh::house());
    assert_index_parity(&Mesh::house_pixels());

    let obj = ObjLoader::parse("v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3\nf 1 3 4\n").unwrap();
    assert_index_parity(&obj);
    assert_eq!(obj.triangle_count(), 2);

    let ascii = "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid t\n";
    let stl = stl::parse_stl(ascii.as_bytes()).unwrap();
    assert_index_parity(&stl);
    assert_eq!(stl.triangle_count(), 1);
}

#[test]
fn obj_indices_past_the_vertex_list_are_rejected() {
    // tobj validates indices itself; either way the load must fail loudly
    let result = ObjLoader::parse("v 0 0 0\nv 1 0 0\nf 1 2 7\n");
    assert!(matches!(result, Err(LoadError::Obj(_)) | Err(LoadError::InvalidMesh(_))));
}

#[test]
fn bundled_model_loads_from_disk() {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../models/pyramid.obj");
    let mesh = wf3d_core::load_mesh(&path).unwrap();
    assert_eq!(mesh.vertices().len(), 5);
    assert_eq!(mesh.triangle_count(), 6);
    assert_index_parity(&mesh);
}
