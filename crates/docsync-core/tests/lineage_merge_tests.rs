use docsync_core::lineage::{merge, ForeignKey, LineageGraph, ModelDependencies, NodeStyle};
use proptest::prelude::*;

#[test]
fn test_physical_and_logical_lineage_unify() {
    let foreign_keys = vec![
        ForeignKey::new("orders", "customers"),
        ForeignKey::new("payments", "orders"),
    ];
    let models = vec![
        ModelDependencies::new("stg_customers", ["raw.customers"]),
        ModelDependencies::new("customers", ["stg_customers", "stg_orders"]),
    ];

    let graph = merge(&foreign_keys, &models);

    assert_eq!(graph.style_of("customers"), Some(NodeStyle::Model));
    assert_eq!(graph.style_of("payments"), Some(NodeStyle::Table));
    assert_eq!(graph.style_of("raw.customers"), Some(NodeStyle::Source));
    assert_eq!(graph.style_of("stg_orders"), Some(NodeStyle::Model));
    assert_eq!(graph.edge_count(), 5);

    let text = graph.to_diagram_text();
    assert!(text.contains(r#"    customers["customers"]"#));
    assert!(text.contains(r#"    payments -- "FK" --> orders"#));
    assert!(text.contains("    stg_customers --> customers"));
}

#[test]
fn test_diagram_and_object_agree() {
    let graph = merge(
        &[ForeignKey::new("a", "b"), ForeignKey::new("a", "b")],
        &[ModelDependencies::new("c", ["a", "src.a"])],
    );
    let object = graph.to_graph_object();

    assert_eq!(object.nodes.len(), graph.node_count());
    assert_eq!(object.edges.len(), graph.edge_count());
    for node in &object.nodes {
        assert!(graph.to_diagram_text().contains(&format!("    {}", node.id)));
    }
}

#[derive(Debug, Clone)]
enum Contribution {
    Fk(String, String),
    Model(String, Vec<String>),
}

fn name() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-d]".prop_map(|s| s),
        "[a-d]".prop_map(|s| format!("raw.{}", s)),
    ]
}

fn contribution() -> impl Strategy<Value = Contribution> {
    prop_oneof![
        (name(), name()).prop_map(|(a, b)| Contribution::Fk(a, b)),
        ("[a-d]", prop::collection::vec(name(), 0..3))
            .prop_map(|(m, deps)| Contribution::Model(m, deps)),
    ]
}

fn build(contributions: &[Contribution]) -> LineageGraph {
    let mut graph = LineageGraph::new();
    for c in contributions {
        match c {
            Contribution::Fk(a, b) => graph.add_foreign_keys(&[ForeignKey::new(a.as_str(), b.as_str())]),
            Contribution::Model(m, deps) => {
                graph.add_models(&[ModelDependencies::new(m.as_str(), deps.iter().cloned())])
            }
        }
    }
    graph
}

proptest! {
    #[test]
    fn prop_merge_is_order_independent(
        contributions in prop::collection::vec(contribution(), 0..12)
    ) {
        let forward = build(&contributions);
        let mut reversed_input = contributions.clone();
        reversed_input.reverse();
        let reversed = build(&reversed_input);

        prop_assert_eq!(forward.to_diagram_text(), reversed.to_diagram_text());
        prop_assert_eq!(forward, reversed);
    }

    #[test]
    fn prop_styles_never_decrease(
        contributions in prop::collection::vec(contribution(), 1..12)
    ) {
        let mut graph = LineageGraph::new();
        for (i, c) in contributions.iter().enumerate() {
            let before: Vec<(String, NodeStyle)> =
                graph.nodes().map(|(id, s)| (id.to_string(), s)).collect();
            graph = {
                let mut next = graph;
                match c {
                    Contribution::Fk(a, b) => next.add_foreign_keys(&[ForeignKey::new(a.as_str(), b.as_str())]),
                    Contribution::Model(m, deps) => {
                        next.add_models(&[ModelDependencies::new(m.as_str(), deps.iter().cloned())])
                    }
                }
                next
            };
            for (id, style) in before {
                let now = graph.style_of(&id);
                prop_assert!(now >= Some(style), "step {}: {} went from {:?} to {:?}", i, id, style, now);
            }
        }
    }
}
