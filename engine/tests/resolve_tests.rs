use engine::model::{Connection, GraphSnapshot, Node, NodeKind};
use engine::resolve::{ResolvedValue, resolve};
use engine::session::Session;
use engine::store::{ImagePayload, SlotStore, slot_for};
use engine::AspectRatio;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn text_node(graph: &mut GraphSnapshot, value: &str) -> uuid::Uuid {
    graph.add_node(Node::new(NodeKind::Text, value))
}

fn texts(values: &[ResolvedValue]) -> Vec<&str> {
    values.iter().filter_map(|v| v.as_text()).collect()
}

#[test]
fn test_unconnected_input_resolves_empty() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    let slots = SlotStore::new();

    assert!(resolve(&graph, consumer, None, &slots).is_empty());
    assert!(resolve(&graph, consumer, Some("main"), &slots).is_empty());
}

#[test]
fn test_connection_order_is_resolution_order() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let a = text_node(&mut graph, "red");
    let b = text_node(&mut graph, "car");
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(a, consumer));
    graph.add_connection(Connection::new(b, consumer));
    let slots = SlotStore::new();

    let values = resolve(&graph, consumer, None, &slots);
    assert_eq!(texts(&values), vec!["red", "car"]);
}

#[test]
fn test_reroute_is_transparent() {
    init_logging();
    let slots = SlotStore::new();

    // Direct: A → C.
    let mut direct = GraphSnapshot::new();
    let a1 = text_node(&mut direct, "red");
    let c1 = direct.add_node(Node::new(NodeKind::Preview, ""));
    direct.add_connection(Connection::new(a1, c1));

    // Through a reroute: A → D → C.
    let mut rerouted = GraphSnapshot::new();
    let a2 = text_node(&mut rerouted, "red");
    let d = rerouted.add_node(Node::new(NodeKind::Reroute, ""));
    let c2 = rerouted.add_node(Node::new(NodeKind::Preview, ""));
    rerouted.add_connection(Connection::new(a2, d));
    rerouted.add_connection(Connection::new(d, c2));

    assert_eq!(
        resolve(&direct, c1, None, &slots),
        resolve(&rerouted, c2, None, &slots)
    );
}

#[test]
fn test_cyclic_reroute_chain_terminates() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let a = text_node(&mut graph, "red");
    let d1 = graph.add_node(Node::new(NodeKind::Reroute, ""));
    let d2 = graph.add_node(Node::new(NodeKind::Reroute, ""));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));

    // a → d1 → d2 → d1 (cycle), d2 → consumer.
    graph.add_connection(Connection::new(a, d1));
    graph.add_connection(Connection::new(d1, d2));
    graph.add_connection(Connection::new(d2, d1));
    graph.add_connection(Connection::new(d2, consumer));
    let slots = SlotStore::new();

    let values = resolve(&graph, consumer, None, &slots);
    // The one non-cyclic contributing edge is a → d1.
    assert_eq!(texts(&values), vec!["red"]);
}

#[test]
fn test_self_loop_contributes_nothing() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let d = graph.add_node(Node::new(NodeKind::Reroute, ""));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(d, d));
    graph.add_connection(Connection::new(d, consumer));
    let slots = SlotStore::new();

    assert!(resolve(&graph, consumer, None, &slots).is_empty());
}

#[test]
fn test_dangling_connection_skipped() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let a = text_node(&mut graph, "red");
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(a, consumer));
    // Remove the node but leave the connection stale.
    graph.nodes.retain(|n| n.id != a);
    let slots = SlotStore::new();

    assert!(resolve(&graph, consumer, None, &slots).is_empty());
}

#[test]
fn test_handle_filter_selects_connections() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let a = text_node(&mut graph, "red");
    let b = text_node(&mut graph, "car");
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::with_handles(a, None, consumer, Some("style")));
    graph.add_connection(Connection::with_handles(b, None, consumer, Some("subject")));
    let slots = SlotStore::new();

    let style = resolve(&graph, consumer, Some("style"), &slots);
    assert_eq!(texts(&style), vec!["red"]);
    let all = resolve(&graph, consumer, None, &slots);
    assert_eq!(all.len(), 2);
}

#[test]
fn test_primary_data_active_and_inactive() {
    init_logging();
    let active = r#"{"characters":[
        {"name":"Aya","prompt":"a pilot","is_primary":true},
        {"name":"Ren"}
    ]}"#;
    let inactive = r#"{"characters":[
        {"name":"Aya","prompt":"a pilot","is_primary":true,"is_active":false},
        {"name":"Ren"}
    ]}"#;
    let slots = SlotStore::new();

    for (value, expected) in [(active, 1usize), (inactive, 0usize)] {
        let mut graph = GraphSnapshot::new();
        let character = graph.add_node(Node::new(NodeKind::Character, value));
        let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
        graph.add_connection(Connection::with_handles(
            character,
            Some("primary_data"),
            consumer,
            None,
        ));

        let values = resolve(&graph, consumer, None, &slots);
        assert_eq!(values.len(), expected);
        if expected == 1 {
            assert_eq!(values[0].character_records()[0].name, "Aya");
        }
    }
}

#[test]
fn test_character_section_through_graph() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let character = graph.add_node(Node::new(
        NodeKind::Character,
        r#"{"characters":[{"name":"Aya","is_primary":true,
            "description":"Appearance:\nshort silver hair\nPersonality:\ncalm\nClothing:\nflight jacket"}]}"#,
    ));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::with_handles(
        character,
        Some("personality"),
        consumer,
        None,
    ));
    let slots = SlotStore::new();

    let values = resolve(&graph, consumer, None, &slots);
    assert_eq!(texts(&values), vec!["calm"]);
}

#[test]
fn test_type_mismatch_contributes_nothing() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    // A bogus handle on an image node classifies to nothing.
    let image = graph.add_node(Node::new(NodeKind::Image, r#"{"prompt":"a car"}"#));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::with_handles(image, Some("bogus"), consumer, None));
    let slots = SlotStore::new();

    assert!(resolve(&graph, consumer, None, &slots).is_empty());
}

#[test]
fn test_malformed_payload_never_fails() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let character = graph.add_node(Node::new(NodeKind::Character, "{broken json"));
    let analysis = graph.add_node(Node::new(NodeKind::Analysis, "also broken"));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(character, consumer));
    graph.add_connection(Connection::with_handles(analysis, Some("mood"), consumer, None));
    let slots = SlotStore::new();

    let values = resolve(&graph, consumer, None, &slots);
    // Broken roster contributes nothing; broken analysis falls back to
    // the empty-string field default.
    assert_eq!(texts(&values), vec![""]);
}

#[test]
fn test_image_from_slot_store() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let image = graph.add_node(Node::new(NodeKind::Image, r#"{"prompt":"a car"}"#));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(image, consumer));

    let mut slots = SlotStore::new();
    let payload = ImagePayload {
        bytes: vec![1, 2, 3],
        mime: "image/png".to_string(),
    };
    slots.set(image, 0, payload.clone());

    let values = resolve(&graph, consumer, None, &slots);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].as_image(), Some(&payload));
}

#[test]
fn test_image_thumbnail_fallback() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    // "abc" base64-encoded.
    let image = graph.add_node(Node::new(
        NodeKind::Image,
        r#"{"prompt":"a car","thumbnail":"data:image/jpeg;base64,YWJj"}"#,
    ));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(image, consumer));
    let slots = SlotStore::new();

    let values = resolve(&graph, consumer, None, &slots);
    assert_eq!(values.len(), 1);
    let payload = values[0].as_image().unwrap();
    assert_eq!(payload.bytes, b"abc");
    assert_eq!(payload.mime, "image/jpeg");
}

#[test]
fn test_character_image_uses_entity_slot() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    // Entity 0 inactive, entity 1 primary: slot band 1 is consulted.
    let character = graph.add_node(Node::new(
        NodeKind::Character,
        r#"{"characters":[
            {"name":"Ren","is_active":false},
            {"name":"Aya","is_primary":true,"thumbnails":{"16:9":"data:,x"}}
        ]}"#,
    ));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::with_handles(character, Some("image"), consumer, None));

    let mut slots = SlotStore::new();
    let full = ImagePayload {
        bytes: vec![9; 16],
        mime: "image/png".to_string(),
    };
    slots.set(character, slot_for(1, AspectRatio::Landscape), full.clone());

    let values = resolve(&graph, consumer, None, &slots);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].as_image(), Some(&full));
}

#[test]
fn test_character_image_found_without_matching_thumbnail() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    // The primary record has no thumbnail entries at all; the stored
    // full-resolution payload in its slot band must still be found.
    let character = graph.add_node(Node::new(
        NodeKind::Character,
        r#"{"characters":[{"name":"Aya","is_primary":true}]}"#,
    ));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::with_handles(character, Some("image"), consumer, None));

    let mut slots = SlotStore::new();
    let full = ImagePayload {
        bytes: vec![4; 8],
        mime: "image/png".to_string(),
    };
    slots.set(character, slot_for(0, AspectRatio::Landscape), full.clone());

    let values = resolve(&graph, consumer, None, &slots);
    assert_eq!(values.len(), 1);
    assert_eq!(values[0].as_image(), Some(&full));
}

#[test]
fn test_cache_hit_skips_resolver_until_value_changes() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let character = graph.add_node(Node::new(
        NodeKind::Character,
        r#"{"characters":[{"name":"Aya","is_primary":true}]}"#,
    ));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(character, consumer));

    let mut session = Session::new(graph);

    let first = session.character_data(consumer);
    assert_eq!(first.len(), 1);
    assert_eq!(session.cache_stats().character_misses, 1);

    // Unchanged graph: served from cache, resolver not invoked again.
    let second = session.character_data(consumer);
    assert_eq!(second, first);
    assert_eq!(session.cache_stats().character_misses, 1);
    assert_eq!(session.cache_stats().character_hits, 1);

    // Any change to a relevant source value invalidates.
    session.graph.node_mut(character).unwrap().value =
        r#"{"characters":[{"name":"Kei","is_primary":true}]}"#.to_string();
    let third = session.character_data(consumer);
    assert_eq!(third[0].name, "Kei");
    assert_eq!(session.cache_stats().character_misses, 2);
}

#[test]
fn test_cache_sees_edits_behind_reroute() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let character = graph.add_node(Node::new(
        NodeKind::Character,
        r#"{"characters":[{"name":"Aya"}]}"#,
    ));
    let reroute = graph.add_node(Node::new(NodeKind::Reroute, ""));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(character, reroute));
    graph.add_connection(Connection::new(reroute, consumer));

    let mut session = Session::new(graph);
    assert_eq!(session.character_data(consumer)[0].name, "Aya");

    session.graph.node_mut(character).unwrap().value =
        r#"{"characters":[{"name":"Ren"}]}"#.to_string();
    assert_eq!(session.character_data(consumer)[0].name, "Ren");
    assert_eq!(session.cache_stats().character_misses, 2);
}

#[test]
fn test_cache_image_aggregate() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let image = graph.add_node(Node::new(
        NodeKind::Image,
        r#"{"thumbnail":"data:image/png;base64,YWJj"}"#,
    ));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(image, consumer));

    let mut session = Session::new(graph);
    let first = session.image_sources(consumer);
    assert_eq!(first.len(), 1);
    let _ = session.image_sources(consumer);
    assert_eq!(session.cache_stats().image_misses, 1);
    assert_eq!(session.cache_stats().image_hits, 1);

    // New connection changes the signature.
    let extra = session.graph.add_node(Node::new(
        NodeKind::Image,
        r#"{"thumbnail":"data:image/png;base64,ZGVm"}"#,
    ));
    session.graph.add_connection(Connection::new(extra, consumer));
    let widened = session.image_sources(consumer);
    assert_eq!(widened.len(), 2);
    assert_eq!(session.cache_stats().image_misses, 2);
}

#[test]
fn test_session_prunes_stale_slots() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let image = graph.add_node(Node::new(NodeKind::Image, "{}"));
    let mut session = Session::new(graph);
    session.slots.set(
        image,
        0,
        ImagePayload {
            bytes: vec![0],
            mime: "image/png".to_string(),
        },
    );

    session.graph.remove_node(image);
    session.prune_slots();
    assert!(session.slots.is_empty());
}

#[test]
fn test_video_and_audio_relay_raw_values() {
    init_logging();
    let mut graph = GraphSnapshot::new();
    let video = graph.add_node(Node::new(NodeKind::Video, "clips/intro.mp4"));
    let audio = graph.add_node(Node::new(NodeKind::Audio, "bgm/theme.ogg"));
    let consumer = graph.add_node(Node::new(NodeKind::Preview, ""));
    graph.add_connection(Connection::new(video, consumer));
    graph.add_connection(Connection::new(audio, consumer));
    let slots = SlotStore::new();

    let values = resolve(&graph, consumer, None, &slots);
    assert_eq!(
        values,
        vec![
            ResolvedValue::Raw("clips/intro.mp4".to_string()),
            ResolvedValue::Raw("bgm/theme.ogg".to_string()),
        ]
    );
}
