use tokenmerge::model::builder::ProcessBuilder;
use tokenmerge::model::{FlowNodeKind, GatewayKind, ProcessDefinition, Token};
use tokenmerge::runtime::storage::{InMemoryTokenStore, TokenStore, fetch_token};
use tokenmerge::FlowMergeError;

#[test]
fn test_yaml_fixture_matches_builder() {
    let yaml_content = r#"
id: "review"
name: "Review"
flow_nodes:
  - id: 1
    name: "start"
    type: "Start"
    outgoing: [1]
  - id: 2
    name: "split"
    type: "Gateway"
    gateway: "Inclusive"
    incoming: [1]
    outgoing: [2, 3]
  - id: 3
    name: "legal"
    type: "Task"
    incoming: [2]
  - id: 4
    name: "finance"
    type: "Task"
    incoming: [3]
  - id: 5
    name: "reminder"
    type: "BoundaryEvent"
    interrupting: false
  - id: 6
    name: "escalation"
    type: "SubProcess"
    triggered_by_event: true
transitions:
  - id: 1
    source: 1
    target: 2
  - id: 2
    source: 2
    target: 3
    condition: "needs_legal"
  - id: 3
    source: 2
    target: 4
    default: true
"#;

    let loaded: ProcessDefinition = serde_yaml::from_str(yaml_content).expect("Failed to load process fixture");

    let expected = ProcessBuilder::new("review")
        .name("Review")
        .start("start")
        .gateway("split", GatewayKind::Inclusive)
        .task("legal")
        .task("finance")
        .boundary_event("reminder", false)
        .sub_process("escalation", true)
        .connect("start", "split")
        .connect_if("split", "legal", "needs_legal")
        .connect_default("split", "finance")
        .build();

    assert_eq!(loaded, expected);
    assert_eq!(loaded.outgoing_transitions(2).len(), 2);
    assert_eq!(loaded.incoming_transitions(3)[0].condition.as_deref(), Some("needs_legal"));
    assert!(loaded.transition(3).unwrap().default);
    assert_eq!(
        loaded.flow_node_by_name("reminder").unwrap().kind,
        FlowNodeKind::BoundaryEvent { interrupting: false }
    );
}

#[test]
fn test_builder_ignores_unknown_endpoints() {
    let process = ProcessBuilder::new("p").task("a").connect("a", "missing").build();
    assert!(process.transitions.is_empty());
    assert!(process.flow_nodes[0].outgoing.is_empty());
}

#[test]
fn test_store_tracks_token_tree() {
    let store = InMemoryTokenStore::new();
    store.init_instance(1, 1).unwrap();
    store.create_token(1, 2, Some(1)).unwrap();

    assert_eq!(store.get_token(1, 2).unwrap(), Some(Token::child(1, 2, 1)));
    assert!(store.get_token(1, 1).unwrap().unwrap().is_root());
    // Other instances are isolated
    assert_eq!(store.get_token(2, 2).unwrap(), None);

    assert!(store.init_instance(1, 5).is_err());
    assert!(store.create_token(1, 2, Some(1)).is_err());
}

#[test]
fn test_consumed_ref_ids_are_never_reused() {
    let store = InMemoryTokenStore::new();
    store.init_instance(1, 1).unwrap();
    store.create_token(1, 2, Some(1)).unwrap();
    store.consume_token(1, 2).unwrap();

    assert!(store.consume_token(1, 2).is_err());
    assert!(store.create_token(1, 2, Some(1)).is_err());
    assert!(store.consume_token(9, 1).is_err());
    assert_eq!(store.tokens(1).unwrap(), vec![Token::root(1, 1)]);
}

#[test]
fn test_fetch_token_maps_absence_to_token_not_found() {
    let store = InMemoryTokenStore::new();
    store.init_instance(3, 1).unwrap();

    assert_eq!(fetch_token(&store, 3, 1).unwrap(), Token::root(3, 1));
    assert!(matches!(
        fetch_token(&store, 3, 8),
        Err(FlowMergeError::TokenNotFound { process_instance_id: 3, ref_id: 8 })
    ));
}
