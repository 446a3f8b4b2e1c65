use tokenmerge::merge::FlowNodeClassifier;
use tokenmerge::model::{FlowNodeDefinition, FlowNodeInstance, FlowNodeKind, GatewayKind};

fn definition(kind: FlowNodeKind, incoming: Vec<i64>) -> FlowNodeDefinition {
    FlowNodeDefinition {
        id: 1,
        name: "node".to_string(),
        kind,
        incoming,
        outgoing: vec![],
    }
}

#[test]
fn test_null_classifier_answers_false_everywhere() {
    let c = FlowNodeClassifier::none();
    assert!(c.is_null());
    assert!(!c.is_boundary_event());
    assert!(!c.is_interrupting());
    assert!(!c.is_exclusive_gateway());
    assert!(!c.is_parallel_or_inclusive_gateway());
    assert!(!c.is_event_sub_process());
    assert!(!c.has_incoming_transitions());
    assert!(c.instance().is_none());
}

#[test]
fn test_gateway_kinds() {
    let exclusive = definition(FlowNodeKind::Gateway { gateway: GatewayKind::Exclusive }, vec![]);
    let parallel = definition(FlowNodeKind::Gateway { gateway: GatewayKind::Parallel }, vec![]);
    let inclusive = definition(FlowNodeKind::Gateway { gateway: GatewayKind::Inclusive }, vec![]);

    let c = FlowNodeClassifier::new(Some(&exclusive), None);
    assert!(c.is_exclusive_gateway());
    assert!(!c.is_parallel_or_inclusive_gateway());

    for def in [&parallel, &inclusive] {
        let c = FlowNodeClassifier::new(Some(def), None);
        assert!(!c.is_exclusive_gateway());
        assert!(c.is_parallel_or_inclusive_gateway());
    }
}

#[test]
fn test_interrupting_only_meaningful_for_catch_events() {
    let boundary = definition(FlowNodeKind::BoundaryEvent { interrupting: true }, vec![]);
    let c = FlowNodeClassifier::new(Some(&boundary), None);
    assert!(c.is_boundary_event());
    assert!(c.is_interrupting());

    let non_interrupting = definition(FlowNodeKind::BoundaryEvent { interrupting: false }, vec![]);
    assert!(!FlowNodeClassifier::new(Some(&non_interrupting), None).is_interrupting());

    let catch = definition(FlowNodeKind::IntermediateCatchEvent { interrupting: true }, vec![]);
    let c = FlowNodeClassifier::new(Some(&catch), None);
    assert!(c.is_interrupting());
    assert!(!c.is_boundary_event());

    let task = definition(FlowNodeKind::Task, vec![]);
    assert!(!FlowNodeClassifier::new(Some(&task), None).is_interrupting());
}

#[test]
fn test_event_sub_process() {
    let event_triggered = definition(FlowNodeKind::SubProcess { triggered_by_event: true }, vec![]);
    let plain = definition(FlowNodeKind::SubProcess { triggered_by_event: false }, vec![]);
    assert!(FlowNodeClassifier::new(Some(&event_triggered), None).is_event_sub_process());
    assert!(!FlowNodeClassifier::new(Some(&plain), None).is_event_sub_process());
}

#[test]
fn test_incoming_transitions_and_instance() {
    let task = definition(FlowNodeKind::Task, vec![3, 4]);
    let instance = FlowNodeInstance {
        id: 7,
        process_instance_id: 1,
        flow_node_definition_id: 1,
        token_ref_id: 6,
    };
    let c = FlowNodeClassifier::new(Some(&task), Some(&instance));
    assert!(c.has_incoming_transitions());
    assert_eq!(c.instance().map(|i| i.id), Some(7));

    let start = definition(FlowNodeKind::Start, vec![]);
    assert!(!FlowNodeClassifier::new(Some(&start), None).has_incoming_transitions());
}
