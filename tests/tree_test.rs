// Integration tests for the syntax-tree projection

use serde_json::json;

use epslab::model::SourceLocation;
use epslab::protocol::decode_root;
use epslab::ui::tree::{self, ExpandState, RowKind, TreeRow};

/// Compact one-line description of a row, for order/content assertions.
fn describe(row: &TreeRow) -> String {
    let body = match &row.kind {
        RowKind::Node {
            node,
            expandable,
            open,
            ..
        } => format!("node {} expandable={} open={}", node.kind, expandable, open),
        RowKind::Scalar { key, value } => {
            format!("scalar {}: {}", key, tree::scalar_literal(value))
        }
        RowKind::NodeKey { key } => format!("nodekey {}:", key),
        RowKind::SeqKey { key, empty } => format!("seqkey {}: empty={}", key, empty),
        RowKind::SeqScalar { value } => format!("seqscalar {}", tree::quoted_scalar(value)),
        RowKind::Malformed { key } => format!("malformed {:?}", key),
    };
    format!("{}|{}", row.indent, body)
}

fn rows_of(value: serde_json::Value, expand: &ExpandState) -> Vec<String> {
    let root = decode_root(&value).expect("decodable root");
    tree::flatten(&root, expand).iter().map(describe).collect()
}

#[test]
fn program_with_one_call_renders_expanded() {
    let rows = rows_of(
        json!({
            "tipo": "Programa",
            "cuerpo": [ { "tipo": "Llamada", "nombre": "mostrar" } ],
        }),
        &ExpandState::new(),
    );

    assert_eq!(
        rows,
        vec![
            "0|node Programa expandable=true open=true",
            "1|seqkey cuerpo: empty=false",
            "2|node Llamada expandable=true open=true",
            "3|scalar nombre: \"mostrar\"",
        ]
    );
}

#[test]
fn nodes_at_depth_two_default_collapsed() {
    let value = json!({
        "tipo": "A",
        "b": { "tipo": "B", "c": { "tipo": "C", "d": { "tipo": "D" } } },
    });
    let rows = rows_of(value, &ExpandState::new());

    assert_eq!(
        rows,
        vec![
            "0|node A expandable=true open=true",
            "1|nodekey b:",
            "2|node B expandable=true open=true",
            "3|nodekey c:",
            "4|node C expandable=true open=false",
        ]
    );
}

#[test]
fn toggling_reveals_and_hides_subtrees() {
    let value = json!({
        "tipo": "A",
        "b": { "tipo": "B", "c": { "tipo": "C", "d": { "tipo": "D" } } },
    });
    let root = decode_root(&value).expect("root");

    let mut expand = ExpandState::new();
    expand.toggle("/b/c", 2);
    let rows: Vec<String> = tree::flatten(&root, &expand).iter().map(describe).collect();
    assert!(rows.contains(&"4|node C expandable=true open=true".to_string()));
    assert!(rows.contains(&"5|nodekey d:".to_string()));
    assert!(rows.contains(&"6|node D expandable=false open=false".to_string()));

    // Collapsing the root hides everything below it
    expand.toggle("", 0);
    let rows: Vec<String> = tree::flatten(&root, &expand).iter().map(describe).collect();
    assert_eq!(rows, vec!["0|node A expandable=true open=false"]);
}

#[test]
fn leaf_nodes_get_no_affordance() {
    let rows = rows_of(
        json!({ "tipo": "Hoja", "linea": 1, "columna": 2 }),
        &ExpandState::new(),
    );
    // Location halves are not displayable properties
    assert_eq!(rows, vec!["0|node Hoja expandable=false open=false"]);
}

#[test]
fn kindless_objects_surface_as_markers() {
    let rows = rows_of(
        json!({
            "tipo": "X",
            "bad": { "foo": 1 },
            "items": [ { "bar": 2 }, [1, 2] ],
        }),
        &ExpandState::new(),
    );

    assert_eq!(
        rows,
        vec![
            "0|node X expandable=true open=true",
            "1|malformed Some(\"bad\")",
            "1|seqkey items: empty=false",
            "2|malformed None",
            "2|malformed None",
        ]
    );
    assert_eq!(tree::INVALID_NODE_MARKER, "Invalid ASTNode");
}

#[test]
fn sequences_render_scalars_quoted_and_empty_marker() {
    let rows = rows_of(
        json!({
            "tipo": "L",
            "items": [1, "dos", null],
            "vacia": [],
        }),
        &ExpandState::new(),
    );

    assert_eq!(
        rows,
        vec![
            "0|node L expandable=true open=true",
            "1|seqkey items: empty=false",
            "2|seqscalar \"1\"",
            "2|seqscalar \"dos\"",
            "2|seqscalar \"null\"",
            "1|seqkey vacia: empty=true",
        ]
    );
}

#[test]
fn scalar_properties_render_json_literals() {
    let rows = rows_of(
        json!({
            "tipo": "V",
            "nombre": "mensaje",
            "valor": null,
            "indice": 3,
            "mutable": true,
        }),
        &ExpandState::new(),
    );

    assert_eq!(
        rows,
        vec![
            "0|node V expandable=true open=true",
            "1|scalar nombre: \"mensaje\"",
            "1|scalar valor: null",
            "1|scalar indice: 3",
            "1|scalar mutable: true",
        ]
    );
}

#[test]
fn node_location_requires_both_halves() {
    let root = decode_root(&json!({ "tipo": "N", "linea": 7, "columna": 9 })).expect("root");
    assert_eq!(root.location, Some(SourceLocation { line: 7, column: 9 }));

    let root = decode_root(&json!({ "tipo": "N", "linea": 7 })).expect("root");
    assert_eq!(root.location, None);
}

#[test]
fn flatten_is_idempotent() {
    let value = json!({
        "tipo": "Programa",
        "cuerpo": [
            { "tipo": "Llamada", "nombre": "mostrar", "argumentos": ["hola", 1] },
            { "sin_tipo": true },
        ],
    });
    let root = decode_root(&value).expect("root");
    let expand = ExpandState::new();

    let first: Vec<String> = tree::flatten(&root, &expand).iter().map(describe).collect();
    let second: Vec<String> = tree::flatten(&root, &expand).iter().map(describe).collect();
    assert_eq!(first, second);
}

#[test]
fn arbitrary_shapes_never_panic() {
    // Everything the decoder accepts must flatten, whatever the expansion
    let value = json!({
        "tipo": "Raro",
        "a": [[[["deep"]]], { "tipo": "Ok" }, null],
        "b": { "tipo": "Anidado", "c": [{ "x": {} }] },
        "d": 1.5,
        "e": "",
    });
    let root = decode_root(&value).expect("root");

    let mut expand = ExpandState::new();
    let rows = tree::flatten(&root, &expand);
    assert!(!rows.is_empty());

    // Open every expandable row and flatten again
    let targets: Vec<(String, usize)> = rows
        .iter()
        .filter_map(|row| row.toggle_target())
        .map(|(path, depth)| (path.to_string(), depth))
        .collect();
    for (path, depth) in targets {
        expand.toggle(&path, depth);
    }
    let _ = tree::flatten(&root, &expand);
}
