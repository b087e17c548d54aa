//! Integration tests for single and batch annotation lookups

mod common;

use biothings_core::{BiothingsError, DataFrameMode, GetManyOptions, GetOptions, Method, RawOutput};
use common::{builder, gene_client, ids, MockTransport, BASE};
use serde_json::json;
use std::time::{Duration, Instant};

#[test]
fn test_get_annotation_found_and_missing() {
    let client = gene_client(MockTransport::new().not_found(&["0"]));

    let hit = client.get_annotation("1017", &GetOptions::default()).unwrap();
    assert_eq!(hit, Some(json!({"_id": "1017", "symbol": "SYM1017"})));

    let missing = client.get_annotation("0", &GetOptions::default()).unwrap();
    assert_eq!(missing, None);
}

#[test]
fn test_get_annotation_server_error_raises() {
    let client = gene_client(MockTransport::new().failing(&["bad"]));
    let err = client.get_annotation("bad", &GetOptions::default()).unwrap_err();
    assert_eq!(err.status(), Some(500));
}

#[test]
fn test_get_annotation_server_error_passthrough() {
    let client = builder("gene")
        .raise_for_status(false)
        .build_with(MockTransport::new().failing(&["bad"]))
        .unwrap();
    let body = client.get_annotation("bad", &GetOptions::default()).unwrap();
    assert_eq!(body, Some(json!({"success": false, "error": "internal"})));
}

#[test]
fn test_get_annotation_sends_fields() {
    let client = gene_client(MockTransport::new());
    let opts = GetOptions::default().fields(["symbol", "name"]);
    client.get_annotation("1017", &opts).unwrap();

    let requests = client.transport().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url, format!("{}/gene/1017", BASE));
    assert_eq!(requests[0].param("fields"), Some("symbol,name"));
}

#[test]
fn test_get_annotation_rewrites_curie() {
    let client = gene_client(MockTransport::new());
    client.get_annotation("NCBIGene:1017", &GetOptions::default()).unwrap();
    let requests = client.transport().requests();
    assert_eq!(requests[0].url, format!("{}/gene/entrezgene:1017", BASE));
}

#[test]
fn test_get_annotation_raw() {
    let client = gene_client(MockTransport::new());
    let body = client
        .get_annotation_raw("1017", &GetOptions::default())
        .unwrap()
        .unwrap();
    assert!(body.contains("SYM1017"));
}

#[test]
fn test_get_annotations_batches_in_order() {
    let client = builder("gene")
        .step(1000)
        .build_with(MockTransport::new())
        .unwrap();
    let input = ids(2500);

    let rows = client
        .get_annotations(&input, &GetManyOptions::default())
        .unwrap()
        .into_rows()
        .unwrap();

    assert_eq!(rows.len(), 2500);
    let queries: Vec<&str> = rows.iter().map(|r| r["query"].as_str().unwrap()).collect();
    let expected: Vec<&str> = input.iter().map(String::as_str).collect();
    assert_eq!(queries, expected);

    let posts = client.transport().requests();
    assert_eq!(posts.len(), 3);
    let sizes: Vec<usize> = posts
        .iter()
        .map(|r| r.param("ids").unwrap().split(',').count())
        .collect();
    assert_eq!(sizes, vec![1000, 1000, 500]);
}

#[test]
fn test_max_query_caps_batch_size() {
    let client = builder("gene")
        .step(1000)
        .max_query(10)
        .build_with(MockTransport::new())
        .unwrap();
    let input = ids(25);
    client
        .get_annotations(&input, &GetManyOptions::default().quiet())
        .unwrap();
    assert_eq!(client.transport().count(Method::Post), 3);
}

#[test]
fn test_ids_are_quoted() {
    let client = gene_client(MockTransport::new());
    client
        .get_annotations("1017,1018", &GetManyOptions::default())
        .unwrap();
    let requests = client.transport().requests();
    assert_eq!(requests[0].param("ids"), Some("\"1017\",\"1018\""));
}

#[test]
fn test_input_shapes_are_equivalent() {
    let opts = GetManyOptions::default().quiet();
    let from_str = gene_client(MockTransport::new());
    from_str.get_annotations("1017, 1018,", &opts).unwrap();

    let from_vec = gene_client(MockTransport::new());
    from_vec
        .get_annotations(vec!["1017", "1018"], &opts)
        .unwrap();

    let from_array = gene_client(MockTransport::new());
    from_array.get_annotations(["1017", "1018"], &opts).unwrap();

    let sent = |c: &biothings_core::BiothingClient<MockTransport>| {
        c.transport().requests()[0].param("ids").map(str::to_string)
    };
    assert_eq!(sent(&from_str), sent(&from_vec));
    assert_eq!(sent(&from_vec), sent(&from_array));
}

#[test]
fn test_empty_input_sends_nothing() {
    let client = gene_client(MockTransport::new());
    let rows = client
        .get_annotations("", &GetManyOptions::default())
        .unwrap()
        .into_rows()
        .unwrap();
    assert!(rows.is_empty());
    assert!(client.transport().requests().is_empty());
}

#[test]
fn test_lazy_annotations_defer_requests() {
    let client = builder("gene")
        .step(10)
        .build_with(MockTransport::new())
        .unwrap();
    let input = ids(25);

    let mut lazy = client
        .get_annotations(&input, &GetManyOptions::default().lazy())
        .unwrap()
        .into_lazy()
        .unwrap();
    assert!(client.transport().requests().is_empty());

    let first = lazy.next().unwrap().unwrap();
    assert_eq!(first["query"], json!("1000"));
    assert_eq!(client.transport().requests().len(), 1);

    let rest: Vec<_> = lazy.collect::<Result<_, _>>().unwrap();
    assert_eq!(rest.len(), 24);
    assert_eq!(client.transport().requests().len(), 3);
}

#[test]
fn test_lazy_failure_yields_error_then_ends() {
    let client = builder("gene")
        .step(2)
        .build_with(MockTransport::new().failing(&["c"]))
        .unwrap();
    let mut lazy = client
        .get_annotations(["a", "b", "c", "d", "e"], &GetManyOptions::default().lazy())
        .unwrap()
        .into_lazy()
        .unwrap();

    assert!(lazy.next().unwrap().is_ok());
    assert!(lazy.next().unwrap().is_ok());
    assert!(matches!(lazy.next(), Some(Err(BiothingsError::Status { status: 500, .. }))));
    assert!(lazy.next().is_none());
    assert_eq!(client.transport().requests().len(), 2);
}

#[test]
fn test_missing_ids_are_marked_notfound() {
    let client = gene_client(MockTransport::new().not_found(&["x"]));
    let rows = client
        .get_annotations(["1017", "x"], &GetManyOptions::default())
        .unwrap()
        .into_rows()
        .unwrap();
    assert_eq!(rows[1], json!({"query": "x", "notfound": true}));
}

#[test]
fn test_annotations_as_table() {
    let client = gene_client(MockTransport::new());
    let table = client
        .get_annotations(
            ["1017", "1018"],
            &GetManyOptions::default().table(DataFrameMode::Normalize),
        )
        .unwrap()
        .into_table()
        .unwrap();
    assert_eq!(table.len(), 2);
    assert!(table.column("symbol").is_some());
    let index = table.index.as_ref().unwrap();
    assert_eq!(index.values, vec![json!("1017"), json!("1018")]);
}

#[test]
fn test_raw_single_and_multi_batch() {
    let client = builder("gene").step(2).build_with(MockTransport::new()).unwrap();

    let one = client
        .get_annotations(["a", "b"], &GetManyOptions::default().raw())
        .unwrap()
        .into_raw()
        .unwrap();
    assert!(matches!(one, RawOutput::One(_)));

    let many = client
        .get_annotations(["a", "b", "c"], &GetManyOptions::default().raw())
        .unwrap()
        .into_raw()
        .unwrap();
    assert_eq!(many.bodies().len(), 2);
}

#[test]
fn test_pacing_between_live_batches() {
    let delay = Duration::from_millis(150);
    let client = builder("gene")
        .step(1)
        .delay(delay)
        .build_with(MockTransport::new())
        .unwrap();

    let start = Instant::now();
    client
        .get_annotations(["a", "b", "c"], &GetManyOptions::default().quiet())
        .unwrap();
    assert!(start.elapsed() >= delay * 2);
}

#[test]
fn test_no_trailing_pause() {
    let delay = Duration::from_millis(500);
    let client = builder("gene")
        .delay(delay)
        .build_with(MockTransport::new())
        .unwrap();

    let start = Instant::now();
    client
        .get_annotations(["a", "b"], &GetManyOptions::default().quiet())
        .unwrap();
    assert!(start.elapsed() < delay);
}

#[test]
fn test_cache_served_batches_are_not_paced() {
    let delay = Duration::from_millis(500);
    let mock = MockTransport::new();
    mock.set_serve_from_cache(true);
    let client = builder("gene").step(1).delay(delay).build_with(mock).unwrap();

    let start = Instant::now();
    client
        .get_annotations(["a", "b", "c"], &GetManyOptions::default().quiet())
        .unwrap();
    assert!(start.elapsed() < delay);
}
