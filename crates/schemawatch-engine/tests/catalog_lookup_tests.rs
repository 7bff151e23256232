#![allow(clippy::unwrap_used, clippy::expect_used)]

use schemawatch_core::errors::ExErrorKind;
use schemawatch_core::model::Node;
use schemawatch_engine::catalog::{context_keys_by_entity, EntityDocument, ALL_RESOURCES};
use schemawatch_engine::{DirEntitySource, EntitySource, InMemorySource};
use serde_json::json;
use std::fs;
use tempfile::TempDir;

fn s3() -> EntityDocument {
    EntityDocument::new(
        "s3",
        Node::from(json!({
            "Name": "s3",
            "Actions": [
                {
                    "Name": "GetObject",
                    "ActionConditionKeys": ["s3:ExistingObjectTag/<key>", "aws:SourceIp"],
                    "Resources": [{"Name": "object"}]
                },
                {"Name": "ListAllMyBuckets"}
            ],
            "Resources": [
                {
                    "Name": "object",
                    "ARNFormats": ["arn:${Partition}:s3:::${BucketName}/${ObjectName}"],
                    "ConditionKeys": ["aws:ResourceTag/${TagKey}"]
                },
                {"Name": "bucket", "ARNFormats": "arn:${Partition}:s3:::${BucketName}"},
                {"Name": "accesspoint"}
            ],
            "ConditionKeys": [
                {"Name": "s3:prefix", "Types": ["String"]},
                {"Name": "aws:SourceIp", "Types": ["IPAddress"]}
            ]
        })),
    )
}

#[test]
fn test_action_names() {
    assert_eq!(s3().action_names(), vec!["GetObject", "ListAllMyBuckets"]);
}

#[test]
fn test_resources_for_action() {
    let doc = s3();
    assert_eq!(doc.resources_for_action("GetObject").unwrap(), vec!["object"]);
    assert_eq!(
        doc.resources_for_action("ListAllMyBuckets").unwrap(),
        vec![ALL_RESOURCES]
    );
    let err = doc.resources_for_action("DeleteEverything").unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::InvalidInput);
    assert_eq!(err.entity(), Some("s3"));
}

#[test]
fn test_action_condition_keys() {
    assert_eq!(
        s3().action_condition_keys("GetObject").unwrap(),
        vec!["s3:ExistingObjectTag/<key>", "aws:SourceIp"]
    );
    assert!(s3()
        .action_condition_keys("ListAllMyBuckets")
        .unwrap()
        .is_empty());
}

#[test]
fn test_resource_details_normalize_arn_formats() {
    let doc = s3();
    let details = doc.resource_details();
    assert_eq!(details.len(), 3);

    let bucket = doc.resource_detail("bucket").unwrap();
    assert_eq!(bucket.arn_formats, vec!["arn:${Partition}:s3:::${BucketName}"]);

    let accesspoint = doc.resource_detail("accesspoint").unwrap();
    assert!(accesspoint.arn_formats.is_empty());
    assert!(accesspoint.condition_keys.is_empty());

    assert!(doc.resource_detail("missing").is_none());
}

#[test]
fn test_resources_as_mapping() {
    let doc = EntityDocument::new(
        "ec2",
        Node::from(json!({
            "Resources": {
                "instance": {"Name": "instance", "ConditionKeys": ["ec2:InstanceType"]}
            }
        })),
    );
    assert_eq!(doc.resource_details()[0].name, "instance");
    assert!(doc.all_context_keys().contains("ec2:InstanceType"));
}

#[test]
fn test_context_keys_split() {
    let doc = s3();
    let all: Vec<String> = doc.all_context_keys().into_iter().collect();
    assert_eq!(
        all,
        vec![
            "aws:ResourceTag/${TagKey}",
            "aws:SourceIp",
            "s3:ExistingObjectTag/<key>",
            "s3:prefix"
        ]
    );

    let split = doc.split_context_keys();
    assert_eq!(split.global_keys.len(), 2);
    assert!(split.global_keys.iter().all(|k| k.starts_with("aws:")));
    assert_eq!(split.service_keys.len(), 2);
}

#[test]
fn test_summary_counts() {
    let summary = s3().summary();
    assert_eq!(summary.name, "s3");
    assert_eq!(summary.actions, 2);
    assert_eq!(summary.resources, 3);
    assert_eq!(summary.condition_keys, 2);
    assert_eq!(summary.context_keys, 4);
    assert_eq!(summary.global_keys, 2);
    assert_eq!(summary.service_keys, 2);
}

#[test]
fn test_lookup_through_dir_source() {
    let dir = TempDir::new().unwrap();
    fs::write(
        dir.path().join("sqs.json"),
        br#"{"Name": "sqs", "Actions": [{"Name": "SendMessage"}]}"#,
    )
    .unwrap();
    let source = DirEntitySource::new(dir.path());

    let doc = EntityDocument::new("sqs", source.fetch_document("sqs").unwrap());
    assert_eq!(doc.action_names(), vec!["SendMessage"]);
}

#[test]
fn test_context_keys_by_entity_skips_broken_and_keyless() {
    let source = InMemorySource::new()
        .with_document(
            "s3",
            json!({"ConditionKeys": [{"Name": "s3:prefix"}, {"Name": "aws:SourceIp"}]}),
        )
        .with_document("sts", json!({"Name": "sts"}))
        .with_document("broken", json!("not a mapping"))
        .with_failure("flaky");
    let names = source.list_entities().unwrap();

    let by_entity = context_keys_by_entity(&source, &names).unwrap();

    assert_eq!(by_entity.len(), 1);
    assert_eq!(
        by_entity["s3"].iter().collect::<Vec<_>>(),
        vec!["aws:SourceIp", "s3:prefix"]
    );
}

#[test]
fn test_context_keys_by_entity_stops_on_source_outage() {
    let source = InMemorySource::new()
        .with_document("s3", json!({"ConditionKeys": [{"Name": "s3:prefix"}]}))
        .with_outage("sqs");
    let names = source.list_entities().unwrap();

    let err = context_keys_by_entity(&source, &names).unwrap_err();
    assert_eq!(err.kind(), ExErrorKind::ExternalService);
}
