use super::rally::{decode_stories, decode_user, QueryEnvelope, RallyProvider, UserEnvelope};
use super::{OwnerRole, Tracker, UserRef};
use crate::config::test_config;

fn user() -> UserRef {
    UserRef {
        object_id: "4242".into(),
        display_name: Some("Jane Doe".into()),
    }
}

fn stories(json: &str, pairing_field: &str) -> Vec<crate::model::work_item::WorkItem> {
    let envelope: QueryEnvelope = serde_json::from_str(json).unwrap();
    decode_stories(envelope, pairing_field)
}

#[test]
fn decodes_numeric_object_id() {
    let envelope: UserEnvelope =
        serde_json::from_str(r#"{"User": {"ObjectID": 4242, "DisplayName": "Jane Doe"}}"#)
            .unwrap();
    assert_eq!(decode_user(envelope).unwrap(), user());
}

#[test]
fn decodes_string_object_id() {
    let envelope: UserEnvelope =
        serde_json::from_str(r#"{"User": {"ObjectID": "4242"}}"#).unwrap();
    let decoded = decode_user(envelope).unwrap();
    assert_eq!(decoded.object_id, "4242");
    assert_eq!(decoded.display_name, None);
}

#[test]
fn missing_object_id_is_an_error() {
    let envelope: UserEnvelope =
        serde_json::from_str(r#"{"User": {"DisplayName": "Jane Doe"}}"#).unwrap();
    let err = decode_user(envelope).unwrap_err();
    assert!(err.to_string().contains("ObjectID"));
}

#[test]
fn missing_user_object_is_an_error() {
    let envelope: UserEnvelope =
        serde_json::from_str(r#"{"OperationResult": {"Errors": ["Not authorized"]}}"#).unwrap();
    assert!(decode_user(envelope).is_err());
}

#[test]
fn decodes_story_fields() {
    let items = stories(
        r#"{"QueryResult": {"TotalResultCount": 1, "Results": [{
            "FormattedID": "US101",
            "Name": "Checkout flow",
            "AcceptedDate": "2024-06-01T15:30:00.000Z",
            "PlanEstimate": 3.0,
            "ScheduleState": "Accepted",
            "Owner": {"_refObjectName": "Jane Doe"},
            "Project": {"_refObjectName": "Payments"},
            "c_PairingPartner": {"_refObjectName": "Bob Smith"}
        }]}}"#,
        "c_PairingPartner",
    );

    assert_eq!(items.len(), 1);
    let item = &items[0];
    assert_eq!(item.id, "US101");
    assert_eq!(item.title, "Checkout flow");
    assert_eq!(item.completed_at.as_deref(), Some("2024-06-01T15:30:00.000Z"));
    assert_eq!(item.effort, Some(3.0));
    assert_eq!(item.status.as_deref(), Some("Accepted"));
    assert_eq!(item.primary_owner.as_deref(), Some("Jane Doe"));
    assert_eq!(item.secondary_owner.as_deref(), Some("Bob Smith"));
    assert_eq!(item.project.as_deref(), Some("Payments"));
}

#[test]
fn nulls_and_absent_fields_become_none() {
    let items = stories(
        r#"{"QueryResult": {"Results": [{
            "FormattedID": "US7",
            "AcceptedDate": null,
            "PlanEstimate": null,
            "Owner": null,
            "c_PairingPartner": null
        }]}}"#,
        "c_PairingPartner",
    );

    let item = &items[0];
    assert_eq!(item.title, "");
    assert_eq!(item.completed_at, None);
    assert_eq!(item.effort, None);
    assert_eq!(item.primary_owner, None);
    assert_eq!(item.secondary_owner, None);
}

#[test]
fn pairing_field_name_is_configurable() {
    let json = r#"{"QueryResult": {"Results": [{
        "FormattedID": "US9",
        "c_Pair": {"_refObjectName": "Bob Smith"}
    }]}}"#;
    assert_eq!(
        stories(json, "c_Pair")[0].secondary_owner.as_deref(),
        Some("Bob Smith")
    );
    assert_eq!(stories(json, "c_PairingPartner")[0].secondary_owner, None);
}

#[test]
fn records_without_id_are_skipped() {
    let items = stories(
        r#"{"QueryResult": {"Results": [
            {"Name": "No id", "ScheduleState": "Accepted"},
            {"FormattedID": "", "Name": "Blank id"},
            {"FormattedID": "US2", "Name": "Kept"}
        ]}}"#,
        "c_PairingPartner",
    );
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, "US2");
    assert_eq!(items[0].title, "Kept");
}

#[test]
fn missing_query_result_is_empty() {
    assert!(stories(r#"{}"#, "c_PairingPartner").is_empty());
    assert!(stories(r#"{"QueryResult": {}}"#, "c_PairingPartner").is_empty());
}

#[test]
fn story_queries_filter_one_field_each() {
    let provider = RallyProvider::new(&test_config().rally);

    let owned = provider.story_query(&user(), OwnerRole::Primary);
    assert_eq!(owned[0], ("query", "(Owner.ObjectID = 4242)".to_string()));

    let paired = provider.story_query(&user(), OwnerRole::Pairing);
    assert_eq!(
        paired[0],
        ("query", "(c_PairingPartner.ObjectID = 4242)".to_string())
    );

    for params in [&owned, &paired] {
        assert!(params.contains(&(
            "fetch",
            "FormattedID,Name,AcceptedDate,PlanEstimate,Owner,Project,ScheduleState,c_PairingPartner"
                .to_string()
        )));
        assert!(params.contains(&("pagesize", "200".to_string())));
        assert!(params.contains(&("order", "AcceptedDate DESC".to_string())));
    }
}

#[test]
fn provider_name() {
    let provider = RallyProvider::new(&test_config().rally);
    assert_eq!(provider.name(), "Rally");
}
