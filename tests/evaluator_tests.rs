use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use approx::assert_relative_eq;
use geoflow::eval::{ComputeNode, EvalContext, OpRegistry, Producer};
use geoflow::{Document, Evaluator, GeoKind, GraphError, Value};

fn load(json: &str) -> Document {
    let _ = env_logger::builder().is_test(true).try_init();
    Document::load(json).expect("Failed to load document")
}

fn eval_node(document: &Document, name: &str) -> Value {
    let node = document.node_by_name(name).expect("Missing node");
    Evaluator::new()
        .evaluate_node(document, node)
        .expect("Evaluation failed")
}

fn assert_vec3_eq(actual: glam::Vec3, expected: [f32; 3]) {
    for (i, &e) in expected.iter().enumerate() {
        assert_relative_eq!(actual[i], e, epsilon = 1e-5);
    }
}

const CUBE_TWO: &str = r#"
    {
        "name": "Cube",
        "type": "MESH_PRIMITIVE_CUBE",
        "inputs": [
            {"identifier": "Size", "type": "VECTOR", "value": [2.0, 2.0, 2.0]},
            {"identifier": "Vertices X", "type": "INT", "value": 1},
            {"identifier": "Vertices Y", "type": "INT", "value": 1},
            {"identifier": "Vertices Z", "type": "INT", "value": 1}
        ],
        "outputs": [{"identifier": "Mesh", "type": "GEOMETRY"}]
    }
"#;

#[test]
fn test_absent_roots_yield_no_geometry() {
    let document = load(&format!("[{CUBE_TWO}]"));
    let output = Evaluator::new().evaluate(&document);
    assert!(matches!(output.geometry, Ok(None)));
    assert!(matches!(output.viewer, Ok(None)));
}

#[test]
fn test_unknown_operation_is_fatal() {
    let json = r#"[
        {
            "name": "Math",
            "type": "MATH",
            "operation": "WOMBLE",
            "inputs": [
                {"identifier": "Value", "type": "VALUE", "value": 1.0},
                {"identifier": "Value", "type": "VALUE", "value": 2.0}
            ],
            "outputs": [{"identifier": "Value", "type": "VALUE"}]
        },
        {
            "name": "Group Output",
            "type": "GROUP_OUTPUT",
            "inputs": [
                {"identifier": "Geometry", "type": "GEOMETRY",
                 "links": [{"node": "Math", "socket": "Value"}]}
            ]
        }
    ]"#;

    let output = Evaluator::new().evaluate(&load(json));
    match output.geometry {
        Err(GraphError::UnknownOperation { key, node }) => {
            assert_eq!(key, "MATH/WOMBLE");
            assert_eq!(node, "Math");
        }
        other => panic!("Expected UnknownOperation, got {other:?}"),
    }
}

#[test]
fn test_cube_through_group_output() {
    let json = format!(
        r#"[
        {CUBE_TWO},
        {{
            "name": "Group Output",
            "type": "GROUP_OUTPUT",
            "inputs": [
                {{"identifier": "Geometry", "type": "GEOMETRY",
                  "links": [{{"node": "Cube", "socket": "Mesh"}}]}}
            ]
        }}
    ]"#
    );
    let document = load(&json);
    let evaluator = Evaluator::new();

    let first = evaluator
        .evaluate(&document)
        .geometry
        .expect("Evaluation failed")
        .expect("Expected geometry");
    // Welded unit-subdivision cube: 8 corners.
    assert_eq!(first.positions.len(), 24);
    assert_eq!(first.vertex_count(), 8);
    // The output node guarantees a per-vertex scale attribute.
    assert_eq!(first.scale, Some(vec![1.0; 24]));

    let second = evaluator
        .evaluate(&document)
        .geometry
        .expect("Evaluation failed")
        .expect("Expected geometry");
    assert_eq!(first.positions, second.positions);
    assert_eq!(first.index, second.index);
}

#[test]
fn test_output_and_viewer_trees_are_independent() {
    let json = format!(
        r#"[
        {{
            "name": "Broken",
            "type": "MATH",
            "operation": "WOMBLE",
            "inputs": [],
            "outputs": [{{"identifier": "Value", "type": "VALUE"}}]
        }},
        {CUBE_TWO},
        {{
            "name": "Group Output",
            "type": "GROUP_OUTPUT",
            "inputs": [
                {{"identifier": "Geometry", "type": "GEOMETRY",
                  "links": [{{"node": "Broken", "socket": "Value"}}]}}
            ]
        }},
        {{
            "name": "Viewer",
            "type": "VIEWER",
            "inputs": [
                {{"identifier": "Geometry", "type": "GEOMETRY",
                  "links": [{{"node": "Cube", "socket": "Mesh"}}]}}
            ]
        }}
    ]"#
    );

    let output = Evaluator::new().evaluate(&load(&json));
    assert!(matches!(
        output.geometry,
        Err(GraphError::UnknownOperation { .. })
    ));
    let viewed = output
        .viewer
        .expect("Viewer evaluation failed")
        .expect("Expected viewer geometry");
    assert_eq!(viewed.positions.len(), 24);
}

#[test]
fn test_math_add_over_link_and_literal() {
    let json = r#"[
        {
            "name": "Value",
            "type": "VALUE",
            "outputs": [{"identifier": "Value", "type": "VALUE", "value": 4.0}]
        },
        {
            "name": "Add",
            "type": "MATH",
            "operation": "ADD",
            "inputs": [
                {"identifier": "Value", "type": "VALUE",
                 "links": [{"node": "Value", "socket": "Value"}]},
                {"identifier": "Value", "type": "VALUE", "value": 2.0}
            ],
            "outputs": [{"identifier": "Value", "type": "VALUE"}]
        }
    ]"#;

    match eval_node(&load(json), "Add") {
        Value::Scalar(v) => assert_eq!(v, 6.0),
        other => panic!("Expected scalar, got {other:?}"),
    }
}

#[test]
fn test_map_range_extrapolates() {
    fn map_range_doc(value: f32) -> String {
        format!(
            r#"[
            {{
                "name": "Map",
                "type": "MAP_RANGE",
                "inputs": [
                    {{"identifier": "Value", "type": "VALUE", "value": {value}}},
                    {{"identifier": "From Min", "type": "VALUE", "value": 0.0}},
                    {{"identifier": "From Max", "type": "VALUE", "value": 10.0}},
                    {{"identifier": "To Min", "type": "VALUE", "value": 0.0}},
                    {{"identifier": "To Max", "type": "VALUE", "value": 1.0}}
                ],
                "outputs": [{{"identifier": "Result", "type": "VALUE"}}]
            }}
        ]"#
        )
    }

    match eval_node(&load(&map_range_doc(5.0)), "Map") {
        Value::Scalar(v) => assert_relative_eq!(v, 0.5, epsilon = 1e-6),
        other => panic!("Expected scalar, got {other:?}"),
    }
    // No clamping above the source range.
    match eval_node(&load(&map_range_doc(15.0)), "Map") {
        Value::Scalar(v) => assert_relative_eq!(v, 1.5, epsilon = 1e-6),
        other => panic!("Expected scalar, got {other:?}"),
    }
}

#[test]
fn test_separate_xyz_selects_by_linked_output() {
    let json = r#"[
        {
            "name": "Vector",
            "type": "INPUT_VECTOR",
            "outputs": [{"identifier": "Vector", "type": "VECTOR", "value": [4.0, 5.0, 6.0]}]
        },
        {
            "name": "Separate",
            "type": "SEPXYZ",
            "inputs": [
                {"identifier": "Vector", "type": "VECTOR",
                 "links": [{"node": "Vector", "socket": "Vector"}]}
            ],
            "outputs": [
                {"identifier": "X", "type": "VALUE"},
                {"identifier": "Y", "type": "VALUE"},
                {"identifier": "Z", "type": "VALUE"}
            ]
        },
        {
            "name": "Probe Y",
            "type": "MATH",
            "operation": "ADD",
            "inputs": [
                {"identifier": "Value", "type": "VALUE",
                 "links": [{"node": "Separate", "socket": "Y"}]},
                {"identifier": "Value", "type": "VALUE", "value": 0.0}
            ],
            "outputs": [{"identifier": "Value", "type": "VALUE"}]
        },
        {
            "name": "Probe Z",
            "type": "MATH",
            "operation": "ADD",
            "inputs": [
                {"identifier": "Value", "type": "VALUE",
                 "links": [{"node": "Separate", "socket": "Z"}]},
                {"identifier": "Value", "type": "VALUE", "value": 0.0}
            ],
            "outputs": [{"identifier": "Value", "type": "VALUE"}]
        }
    ]"#;

    let document = load(json);
    match eval_node(&document, "Probe Y") {
        Value::Scalar(v) => assert_eq!(v, 5.0),
        other => panic!("Expected scalar, got {other:?}"),
    }
    match eval_node(&document, "Probe Z") {
        Value::Scalar(v) => assert_eq!(v, 6.0),
        other => panic!("Expected scalar, got {other:?}"),
    }
}

struct CountingSource(Arc<AtomicUsize>);

impl ComputeNode for CountingSource {
    fn eval(&self, _ctx: &mut EvalContext) -> Result<Value, GraphError> {
        self.0.fetch_add(1, Ordering::SeqCst);
        Ok(Value::Scalar(1.0))
    }
}

#[test]
fn test_diamond_reevaluates_shared_node() {
    let json = r#"[
        {
            "name": "Probe",
            "type": "SOURCE_PROBE",
            "outputs": [{"identifier": "Value", "type": "VALUE"}]
        },
        {
            "name": "Add",
            "type": "MATH",
            "operation": "ADD",
            "inputs": [
                {"identifier": "Value", "type": "VALUE",
                 "links": [{"node": "Probe", "socket": "Value"}]},
                {"identifier": "Value", "type": "VALUE",
                 "links": [{"node": "Probe", "socket": "Value"}]}
            ],
            "outputs": [{"identifier": "Value", "type": "VALUE"}]
        }
    ]"#;

    let counter = Arc::new(AtomicUsize::new(0));
    let hits = counter.clone();
    let mut registry = OpRegistry::with_builtin_ops();
    registry.register(
        "SOURCE_PROBE",
        Box::new(move |_builder, _node, _selector| {
            Ok(Box::new(CountingSource(hits.clone())) as Producer)
        }),
    );

    let document = load(json);
    let evaluator = Evaluator::with_registry(registry);
    let node = document.node_by_name("Add").expect("Missing node");
    let result = evaluator
        .evaluate_node(&document, node)
        .expect("Evaluation failed");

    match result {
        Value::Scalar(v) => assert_eq!(v, 2.0),
        other => panic!("Expected scalar, got {other:?}"),
    }
    // No memoization: a node feeding two consumers runs twice.
    assert_eq!(counter.load(Ordering::SeqCst), 2);
}

#[test]
fn test_points_sample_position_per_index() {
    let json = r#"[
        {
            "name": "Index",
            "type": "INDEX",
            "outputs": [{"identifier": "Index", "type": "INT"}]
        },
        {
            "name": "Combine",
            "type": "COMBXYZ",
            "inputs": [
                {"identifier": "X", "type": "VALUE",
                 "links": [{"node": "Index", "socket": "Index"}]},
                {"identifier": "Y", "type": "VALUE", "value": 0.0},
                {"identifier": "Z", "type": "VALUE", "value": 0.0}
            ],
            "outputs": [{"identifier": "Vector", "type": "VECTOR"}]
        },
        {
            "name": "Points",
            "type": "POINTS",
            "inputs": [
                {"identifier": "Count", "type": "INT", "value": 3},
                {"identifier": "Position", "type": "VECTOR",
                 "links": [{"node": "Combine", "socket": "Vector"}]}
            ],
            "outputs": [{"identifier": "Geometry", "type": "GEOMETRY"}]
        }
    ]"#;

    match eval_node(&load(json), "Points") {
        Value::Geometry(buffer) => {
            assert_eq!(
                buffer.positions,
                vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 2.0, 0.0, 0.0]
            );
            assert_eq!(buffer.index, None);
        }
        other => panic!("Expected geometry, got {other:?}"),
    }
}

#[test]
fn test_instance_on_points_attributes() {
    let json = format!(
        r#"[
        {{
            "name": "Points",
            "type": "POINTS",
            "inputs": [
                {{"identifier": "Count", "type": "INT", "value": 3}},
                {{"identifier": "Position", "type": "VECTOR", "value": [1.0, 2.0, 3.0]}}
            ],
            "outputs": [{{"identifier": "Geometry", "type": "GEOMETRY"}}]
        }},
        {CUBE_TWO},
        {{
            "name": "Instance",
            "type": "INSTANCE_ON_POINTS",
            "inputs": [
                {{"identifier": "Points", "type": "GEOMETRY",
                  "links": [{{"node": "Points", "socket": "Geometry"}}]}},
                {{"identifier": "Selection", "type": "BOOLEAN", "value": true}},
                {{"identifier": "Instance", "type": "GEOMETRY",
                  "links": [{{"node": "Cube", "socket": "Mesh"}}]}},
                {{"identifier": "Pick Instance", "type": "BOOLEAN"}},
                {{"identifier": "Instance Index", "type": "INT"}},
                {{"identifier": "Rotation", "type": "VECTOR", "value": [0.0, 0.0, 0.0]}},
                {{"identifier": "Scale", "type": "VECTOR", "value": [1.0, 1.0, 1.0]}}
            ],
            "outputs": [{{"identifier": "Instances", "type": "GEOMETRY"}}]
        }}
    ]"#
    );

    match eval_node(&load(&json), "Instance") {
        Value::Geometry(buffer) => {
            assert!(buffer.is_instanced());
            assert_eq!(buffer.instance_count(), 3);
            // Base geometry is shared; per-point attributes are parallel.
            assert_eq!(buffer.positions.len(), 24);
            assert_eq!(
                buffer.translation,
                Some(vec![1.0, 2.0, 3.0, 1.0, 2.0, 3.0, 1.0, 2.0, 3.0])
            );
            assert_eq!(
                buffer.rotation,
                Some(vec![
                    0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0
                ])
            );
            assert_eq!(buffer.scale, Some(vec![1.0; 9]));
        }
        other => panic!("Expected geometry, got {other:?}"),
    }
}

#[test]
fn test_join_geometry_concatenates() {
    let json = format!(
        r#"[
        {CUBE_TWO},
        {{
            "name": "Cube 2",
            "type": "MESH_PRIMITIVE_CUBE",
            "inputs": [
                {{"identifier": "Size", "type": "VECTOR", "value": [1.0, 1.0, 1.0]}},
                {{"identifier": "Vertices X", "type": "INT", "value": 1}},
                {{"identifier": "Vertices Y", "type": "INT", "value": 1}},
                {{"identifier": "Vertices Z", "type": "INT", "value": 1}}
            ],
            "outputs": [{{"identifier": "Mesh", "type": "GEOMETRY"}}]
        }},
        {{
            "name": "Join",
            "type": "JOIN_GEOMETRY",
            "inputs": [
                {{"identifier": "Geometry", "type": "GEOMETRY", "is_multi_input": true,
                  "links": [
                      {{"node": "Cube", "socket": "Mesh"}},
                      {{"node": "Cube 2", "socket": "Mesh"}}
                  ]}}
            ],
            "outputs": [{{"identifier": "Geometry", "type": "GEOMETRY"}}]
        }}
    ]"#
    );

    match eval_node(&load(&json), "Join") {
        Value::Geometry(buffer) => {
            assert_eq!(buffer.vertex_count(), 16);
            let index = buffer.index.expect("Expected an index");
            // Second cube's triangles reference offset vertices.
            assert!(index.iter().any(|&i| i >= 8));
        }
        other => panic!("Expected geometry, got {other:?}"),
    }
}

#[test]
fn test_join_geometry_with_no_inputs_is_nothing() {
    let json = r#"[
        {
            "name": "Join",
            "type": "JOIN_GEOMETRY",
            "inputs": [
                {"identifier": "Geometry", "type": "GEOMETRY", "is_multi_input": true}
            ],
            "outputs": [{"identifier": "Geometry", "type": "GEOMETRY"}]
        }
    ]"#;

    assert!(matches!(eval_node(&load(json), "Join"), Value::Nothing));
}

#[test]
fn test_bounding_box_corner_outputs() {
    let json = format!(
        r#"[
        {CUBE_TWO},
        {{
            "name": "BBox",
            "type": "BOUNDING_BOX",
            "inputs": [
                {{"identifier": "Geometry", "type": "GEOMETRY",
                  "links": [{{"node": "Cube", "socket": "Mesh"}}]}}
            ],
            "outputs": [
                {{"identifier": "Bounding Box", "type": "GEOMETRY"}},
                {{"identifier": "Min", "type": "VECTOR"}},
                {{"identifier": "Max", "type": "VECTOR"}}
            ]
        }},
        {{
            "name": "Min X",
            "type": "SEPXYZ",
            "inputs": [
                {{"identifier": "Vector", "type": "VECTOR",
                  "links": [{{"node": "BBox", "socket": "Min"}}]}}
            ],
            "outputs": [
                {{"identifier": "X", "type": "VALUE"}},
                {{"identifier": "Y", "type": "VALUE"}},
                {{"identifier": "Z", "type": "VALUE"}}
            ]
        }},
        {{
            "name": "Max X",
            "type": "SEPXYZ",
            "inputs": [
                {{"identifier": "Vector", "type": "VECTOR",
                  "links": [{{"node": "BBox", "socket": "Max"}}]}}
            ],
            "outputs": [
                {{"identifier": "X", "type": "VALUE"}},
                {{"identifier": "Y", "type": "VALUE"}},
                {{"identifier": "Z", "type": "VALUE"}}
            ]
        }}
    ]"#
    );

    let document = load(&json);
    match eval_node(&document, "Min X") {
        Value::Scalar(v) => assert_eq!(v, -1.0),
        other => panic!("Expected scalar, got {other:?}"),
    }
    match eval_node(&document, "Max X") {
        Value::Scalar(v) => assert_eq!(v, 1.0),
        other => panic!("Expected scalar, got {other:?}"),
    }
    // Selector 0 is the box mesh itself.
    match eval_node(&document, "BBox") {
        Value::Geometry(buffer) => assert_eq!(buffer.vertex_count(), 8),
        other => panic!("Expected geometry, got {other:?}"),
    }
}

#[test]
fn test_transform_geometry_translates_bounds() {
    let json = format!(
        r#"[
        {CUBE_TWO},
        {{
            "name": "Transform",
            "type": "TRANSFORM_GEOMETRY",
            "inputs": [
                {{"identifier": "Geometry", "type": "GEOMETRY",
                  "links": [{{"node": "Cube", "socket": "Mesh"}}]}},
                {{"identifier": "Translation", "type": "VECTOR", "value": [1.0, 0.0, 0.0]}},
                {{"identifier": "Rotation", "type": "VECTOR", "value": [0.0, 0.0, 0.0]}},
                {{"identifier": "Scale", "type": "VECTOR", "value": [1.0, 1.0, 1.0]}}
            ],
            "outputs": [{{"identifier": "Geometry", "type": "GEOMETRY"}}]
        }}
    ]"#
    );

    match eval_node(&load(&json), "Transform") {
        Value::Geometry(buffer) => {
            let (min, max) = buffer.bounds().expect("Expected bounds");
            assert_vec3_eq(min, [0.0, -1.0, -1.0]);
            assert_vec3_eq(max, [2.0, 1.0, 1.0]);
        }
        other => panic!("Expected geometry, got {other:?}"),
    }
}

#[test]
fn test_mesh_boolean_union_bounds() {
    let json = format!(
        r#"[
        {CUBE_TWO},
        {{
            "name": "Cube 2",
            "type": "MESH_PRIMITIVE_CUBE",
            "inputs": [
                {{"identifier": "Size", "type": "VECTOR", "value": [2.0, 2.0, 2.0]}},
                {{"identifier": "Vertices X", "type": "INT", "value": 1}},
                {{"identifier": "Vertices Y", "type": "INT", "value": 1}},
                {{"identifier": "Vertices Z", "type": "INT", "value": 1}}
            ],
            "outputs": [{{"identifier": "Mesh", "type": "GEOMETRY"}}]
        }},
        {{
            "name": "Shift",
            "type": "TRANSFORM_GEOMETRY",
            "inputs": [
                {{"identifier": "Geometry", "type": "GEOMETRY",
                  "links": [{{"node": "Cube 2", "socket": "Mesh"}}]}},
                {{"identifier": "Translation", "type": "VECTOR", "value": [1.0, 0.0, 0.0]}},
                {{"identifier": "Rotation", "type": "VECTOR", "value": [0.0, 0.0, 0.0]}},
                {{"identifier": "Scale", "type": "VECTOR", "value": [1.0, 1.0, 1.0]}}
            ],
            "outputs": [{{"identifier": "Geometry", "type": "GEOMETRY"}}]
        }},
        {{
            "name": "Union",
            "type": "MESH_BOOLEAN",
            "operation": "UNION",
            "inputs": [
                {{"identifier": "Mesh 1", "type": "GEOMETRY",
                  "links": [{{"node": "Cube", "socket": "Mesh"}}]}},
                {{"identifier": "Mesh 2", "type": "GEOMETRY", "is_multi_input": true,
                  "links": [{{"node": "Shift", "socket": "Geometry"}}]}}
            ],
            "outputs": [{{"identifier": "Mesh", "type": "GEOMETRY"}}]
        }}
    ]"#
    );

    match eval_node(&load(&json), "Union") {
        Value::Geometry(buffer) => {
            assert!(buffer.vertex_count() > 0);
            let (min, max) = buffer.bounds().expect("Expected bounds");
            assert_vec3_eq(min, [-1.0, -1.0, -1.0]);
            assert_vec3_eq(max, [2.0, 1.0, 1.0]);
        }
        other => panic!("Expected geometry, got {other:?}"),
    }
}

#[test]
fn test_curve_to_mesh_builds_tube() {
    let json = r#"[
        {
            "name": "Path",
            "type": "CURVE_PRIMITIVE_CIRCLE",
            "inputs": [
                {"identifier": "Resolution", "type": "INT", "value": 4},
                {"identifier": "Point 1", "type": "VECTOR"},
                {"identifier": "Point 2", "type": "VECTOR"},
                {"identifier": "Point 3", "type": "VECTOR"},
                {"identifier": "Radius", "type": "VALUE", "value": 1.0}
            ],
            "outputs": [{"identifier": "Curve", "type": "GEOMETRY"}]
        },
        {
            "name": "Profile",
            "type": "CURVE_PRIMITIVE_CIRCLE",
            "inputs": [
                {"identifier": "Resolution", "type": "INT", "value": 3},
                {"identifier": "Point 1", "type": "VECTOR"},
                {"identifier": "Point 2", "type": "VECTOR"},
                {"identifier": "Point 3", "type": "VECTOR"},
                {"identifier": "Radius", "type": "VALUE", "value": 0.2}
            ],
            "outputs": [{"identifier": "Curve", "type": "GEOMETRY"}]
        },
        {
            "name": "Sweep",
            "type": "CURVE_TO_MESH",
            "inputs": [
                {"identifier": "Curve", "type": "GEOMETRY",
                 "links": [{"node": "Path", "socket": "Curve"}]},
                {"identifier": "Profile Curve", "type": "GEOMETRY",
                 "links": [{"node": "Profile", "socket": "Curve"}]}
            ],
            "outputs": [{"identifier": "Mesh", "type": "GEOMETRY"}]
        }
    ]"#;

    match eval_node(&load(json), "Sweep") {
        Value::Geometry(buffer) => {
            assert_eq!(buffer.kind, GeoKind::Mesh);
            // One profile ring (3 points) per path point (4, closed).
            assert_eq!(buffer.vertex_count(), 12);
            assert!(buffer.index.is_some());
        }
        other => panic!("Expected geometry, got {other:?}"),
    }
}
