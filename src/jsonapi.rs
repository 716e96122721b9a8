// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # JSON:API Envelope Model
//!
//! Wire shapes exchanged with PrimeTrust:
//!
//! ```text
//! { "data": { "type": "...", "id": "...", "attributes": {...},
//!             "links": {...}, "relationships": {...} } }
//! { "data": [ ... ], "links": {...}, "meta": { "page-count": 1, "resource-count": 1 } }
//! ```
//!
//! `attributes` is an open bag: unknown server-defined keys survive a decode
//! untouched. Typed domain resources enter and leave the bag through the
//! [`Resource`] trait, whose serde derives are the single field-name table
//! for both directions.

use std::collections::BTreeMap;

use serde::{de::DeserializeOwned, ser::Error as _, Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::PrimeTrustError;

/// Attribute bag of a resource object.
pub type Attributes = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Links {
    #[serde(rename = "self", default)]
    pub self_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub related: Option<String>,
}

impl Links {
    pub fn new(self_link: impl Into<String>) -> Self {
        Self {
            self_link: Some(self_link.into()),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.self_link.is_none() && self.first.is_none() && self.related.is_none()
    }
}

/// Named link from one resource to another.
///
/// Either side may be missing: compound documents often carry only the
/// resource linkage in `data`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Relationship {
    #[serde(default, skip_serializing_if = "Links::is_empty")]
    pub links: Links,
    /// Resource linkage: an identifier object, an array of them, or null.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

impl Relationship {
    /// `(type, id)` pairs named by the resource linkage.
    pub fn identifiers(&self) -> Vec<(&str, &str)> {
        match &self.data {
            Some(Value::Array(items)) => items.iter().filter_map(identifier).collect(),
            Some(value) => identifier(value).into_iter().collect(),
            None => Vec::new(),
        }
    }
}

fn identifier(value: &Value) -> Option<(&str, &str)> {
    Some((value.get("type")?.as_str()?, value.get("id")?.as_str()?))
}

/// A single JSON:API resource object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataNode {
    #[serde(rename = "type")]
    pub resource_type: String,
    /// Server-assigned; absent until the resource exists remotely.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub attributes: Attributes,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub relationships: BTreeMap<String, Relationship>,
}

impl DataNode {
    /// New, not yet persisted resource object.
    pub fn new(resource_type: impl Into<String>, attributes: Attributes) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: None,
            attributes,
            links: None,
            relationships: BTreeMap::new(),
        }
    }

    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    pub fn attribute_str(&self, key: &str) -> Option<&str> {
        self.attribute(key).and_then(Value::as_str)
    }

    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.get(name)
    }

    /// Rebuild a typed resource from this node's attribute bag.
    pub fn decode<R: Resource>(&self) -> Result<R, PrimeTrustError> {
        if self.resource_type != R::TYPE {
            return Err(PrimeTrustError::SchemaMismatch(format!(
                "expected `{}` resource, got `{}`",
                R::TYPE,
                self.resource_type
            )));
        }
        R::from_attributes(&self.attributes)
    }
}

/// Pagination metadata of a collection response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Meta {
    #[serde(default)]
    pub page_count: u64,
    #[serde(default)]
    pub resource_count: u64,
}

/// Single-resource envelope: `{"data": {...}, "included": [...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootDataNode {
    pub data: DataNode,
    /// Related resources requested with `include=`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<DataNode>,
}

impl RootDataNode {
    pub fn new(data: DataNode) -> Self {
        Self {
            data,
            included: Vec::new(),
        }
    }

    pub fn included_of<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a DataNode> {
        of_type(&self.included, resource_type)
    }

    /// Included resource behind a relationship of the primary resource.
    pub fn related(&self, relationship: &str) -> Option<&DataNode> {
        resolve(&self.included, self.data.relationship(relationship)?)
    }

    pub fn from_value(value: Value) -> Result<Self, PrimeTrustError> {
        require_data(&value)?;
        serde_json::from_value(value).map_err(schema_mismatch)
    }

    pub fn parse(body: &str) -> Result<Self, PrimeTrustError> {
        Self::from_value(parse_json(body)?)
    }
}

/// Collection envelope: `{"data": [...], "included": [...], "links": {...}, "meta": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RootListDataNode {
    pub data: Vec<DataNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub included: Vec<DataNode>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
}

impl RootListDataNode {
    pub fn from_value(value: Value) -> Result<Self, PrimeTrustError> {
        require_data(&value)?;
        serde_json::from_value(value).map_err(schema_mismatch)
    }

    pub fn parse(body: &str) -> Result<Self, PrimeTrustError> {
        Self::from_value(parse_json(body)?)
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn first(&self) -> Option<&DataNode> {
        self.data.first()
    }

    pub fn included_of<'a>(&'a self, resource_type: &'a str) -> impl Iterator<Item = &'a DataNode> {
        of_type(&self.included, resource_type)
    }
}

fn of_type<'a>(
    included: &'a [DataNode],
    resource_type: &'a str,
) -> impl Iterator<Item = &'a DataNode> {
    included
        .iter()
        .filter(move |node| node.resource_type == resource_type)
}

fn resolve<'a>(included: &'a [DataNode], relationship: &Relationship) -> Option<&'a DataNode> {
    let (resource_type, id) = relationship.identifiers().into_iter().next()?;
    included
        .iter()
        .find(|node| node.resource_type == resource_type && node.id.as_deref() == Some(id))
}

/// A typed domain resource that travels as a JSON:API attribute bag.
pub trait Resource: Serialize + DeserializeOwned {
    /// JSON:API `type` tag.
    const TYPE: &'static str;

    fn to_attributes(&self) -> Result<Attributes, PrimeTrustError> {
        to_attributes(self)
    }

    fn to_data_node(&self) -> Result<DataNode, PrimeTrustError> {
        Ok(DataNode::new(Self::TYPE, self.to_attributes()?))
    }

    fn to_envelope(&self) -> Result<RootDataNode, PrimeTrustError> {
        Ok(RootDataNode::new(self.to_data_node()?))
    }

    fn from_attributes(attributes: &Attributes) -> Result<Self, PrimeTrustError> {
        serde_json::from_value(Value::Object(attributes.clone())).map_err(schema_mismatch)
    }
}

/// Serialize any attribute struct into an attribute bag.
pub fn to_attributes(value: &impl Serialize) -> Result<Attributes, PrimeTrustError> {
    match serde_json::to_value(value)? {
        Value::Object(map) => Ok(map),
        other => Err(PrimeTrustError::Encode(serde_json::Error::custom(format!(
            "attributes serialized to a non-object: {other}"
        )))),
    }
}

/// Query-string builder for collection lookups.
///
/// Produces `filter[<field> <op>]=<value>` and `include=a,b` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListQuery {
    params: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, field: &str, op: &str, value: impl Into<String>) -> Self {
        self.params
            .push((format!("filter[{field} {op}]"), value.into()));
        self
    }

    pub fn include(mut self, resources: &[&str]) -> Self {
        if !resources.is_empty() {
            self.params
                .push(("include".to_string(), resources.join(",")));
        }
        self
    }

    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.params
    }
}

fn parse_json(body: &str) -> Result<Value, PrimeTrustError> {
    serde_json::from_str(body)
        .map_err(|e| PrimeTrustError::SchemaMismatch(format!("response is not JSON: {e}")))
}

fn require_data(value: &Value) -> Result<(), PrimeTrustError> {
    match value.get("data") {
        Some(Value::Null) | None => Err(PrimeTrustError::SchemaMismatch(
            "missing `data` in response".to_string(),
        )),
        Some(_) => Ok(()),
    }
}

fn schema_mismatch(err: serde_json::Error) -> PrimeTrustError {
    PrimeTrustError::SchemaMismatch(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn new_node_omits_id_links_and_relationships() {
        let node = DataNode::new("user", Map::new());
        let value = serde_json::to_value(RootDataNode::new(node)).unwrap();
        assert_eq!(value, json!({ "data": { "type": "user", "attributes": {} } }));
    }

    #[test]
    fn relationships_serialize_when_present() {
        let mut node = DataNode::new("accounts", Map::new());
        node.id = Some("A1".to_string());
        node.relationships.insert(
            "contacts".to_string(),
            Relationship {
                links: Links {
                    related: Some("/v2/contacts?account.id=A1".to_string()),
                    ..Links::default()
                },
                data: None,
            },
        );
        let value = serde_json::to_value(&node).unwrap();
        assert_eq!(value["id"], json!("A1"));
        assert_eq!(
            value["relationships"]["contacts"]["links"],
            json!({ "self": null, "related": "/v2/contacts?account.id=A1" })
        );
    }

    #[test]
    fn links_omit_absent_first_and_related() {
        let value = serde_json::to_value(Links::new("/v2/contacts/C1")).unwrap();
        assert_eq!(value, json!({ "self": "/v2/contacts/C1" }));
    }

    #[test]
    fn single_envelope_keeps_unknown_attributes() {
        let body = r#"{
            "data": {
                "type": "accounts",
                "id": "A1",
                "attributes": { "status": "pending", "offline-cold-storage": false },
                "links": { "self": "/v2/accounts/A1" },
                "relationships": {
                    "owners": { "links": { "related": "/v2/contacts?account.id=A1" } }
                }
            }
        }"#;
        let root = RootDataNode::parse(body).unwrap();
        assert_eq!(root.data.resource_type, "accounts");
        assert_eq!(root.data.id.as_deref(), Some("A1"));
        assert_eq!(root.data.attribute_str("status"), Some("pending"));
        assert_eq!(
            root.data.attribute("offline-cold-storage"),
            Some(&json!(false))
        );
        assert_eq!(
            root.data.links.as_ref().and_then(|l| l.self_link.as_deref()),
            Some("/v2/accounts/A1")
        );
        let owners = root.data.relationship("owners").unwrap();
        assert_eq!(
            owners.links.related.as_deref(),
            Some("/v2/contacts?account.id=A1")
        );
        assert_eq!(owners.links.self_link, None);
    }

    #[test]
    fn relationship_with_only_linkage_decodes() {
        let root = RootDataNode::from_value(json!({
            "data": {
                "type": "contributions",
                "id": "K1",
                "attributes": { "status": "pending" },
                "relationships": {
                    "funds-transfer": { "data": { "type": "funds-transfers", "id": "T1" } }
                }
            },
            "included": [
                { "type": "funds-transfers", "id": "T1", "attributes": { "status": "pending" } }
            ]
        }))
        .unwrap();

        let transfer = root.data.relationship("funds-transfer").unwrap();
        assert!(transfer.links.is_empty());
        assert_eq!(transfer.identifiers(), vec![("funds-transfers", "T1")]);
        assert_eq!(root.related("funds-transfer").and_then(|n| n.id.as_deref()), Some("T1"));

        let value = serde_json::to_value(&root).unwrap();
        assert_eq!(
            value["data"]["relationships"]["funds-transfer"],
            json!({ "data": { "type": "funds-transfers", "id": "T1" } })
        );
        assert_eq!(value["included"][0]["id"], json!("T1"));
    }

    #[test]
    fn list_envelope_keeps_included_checks() {
        let body = json!({
            "data": [{
                "type": "contacts",
                "id": "C1",
                "attributes": { "cip-cleared": false },
                "relationships": {
                    "cip-checks": { "data": [{ "type": "cip-checks", "id": "CIP1" }] },
                    "aml-checks": { "data": [] }
                }
            }],
            "included": [
                { "type": "cip-checks", "id": "CIP1", "attributes": { "status": "pending" } },
                { "type": "kyc-document-checks", "id": "DOC1", "attributes": { "status": "verified" } }
            ]
        });
        let list = RootListDataNode::from_value(body).unwrap();
        assert_eq!(list.included.len(), 2);

        let cip: Vec<_> = list.included_of("cip-checks").collect();
        assert_eq!(cip.len(), 1);
        assert_eq!(cip[0].attribute_str("status"), Some("pending"));
        assert_eq!(list.included_of("aml-checks").count(), 0);

        let contact = list.first().unwrap();
        assert_eq!(
            contact.relationship("cip-checks").unwrap().identifiers(),
            vec![("cip-checks", "CIP1")]
        );
        assert!(contact.relationship("aml-checks").unwrap().identifiers().is_empty());

        let reencoded = serde_json::to_value(&list).unwrap();
        assert_eq!(reencoded["included"][1]["type"], json!("kyc-document-checks"));
    }

    #[test]
    fn list_envelope_without_links() {
        let body = r#"{"data":[{"type":"contacts","id":"C1","attributes":{}}],"meta":{"page-count":1,"resource-count":1}}"#;
        let list = RootListDataNode::parse(body).unwrap();
        assert_eq!(list.len(), 1);
        let first = list.first().unwrap();
        assert_eq!(first.resource_type, "contacts");
        assert_eq!(first.id.as_deref(), Some("C1"));
        assert!(first.attributes.is_empty());
        assert_eq!(list.meta.unwrap().resource_count, 1);
        assert_eq!(list.meta.unwrap().page_count, 1);
        assert!(list.links.is_none());
    }

    #[test]
    fn list_envelope_with_links() {
        let value = json!({
            "data": [],
            "links": { "self": "/v2/contacts?page[number]=1", "first": "/v2/contacts?page[number]=1" },
            "meta": { "page-count": 0, "resource-count": 0 }
        });
        let list = RootListDataNode::from_value(value).unwrap();
        assert!(list.is_empty());
        assert_eq!(
            list.links.unwrap().first.as_deref(),
            Some("/v2/contacts?page[number]=1")
        );
    }

    #[test]
    fn missing_data_is_schema_mismatch() {
        let err = RootDataNode::from_value(json!({ "errors": [] })).unwrap_err();
        assert!(matches!(err, PrimeTrustError::SchemaMismatch(msg) if msg.contains("data")));

        let err = RootListDataNode::from_value(json!({ "data": null })).unwrap_err();
        assert!(matches!(err, PrimeTrustError::SchemaMismatch(_)));
    }

    #[test]
    fn missing_type_is_schema_mismatch() {
        let err = RootDataNode::from_value(json!({ "data": { "id": "X", "attributes": {} } }))
            .unwrap_err();
        assert!(matches!(err, PrimeTrustError::SchemaMismatch(msg) if msg.contains("type")));

        let err =
            RootListDataNode::from_value(json!({ "data": [{ "id": "X" }] })).unwrap_err();
        assert!(matches!(err, PrimeTrustError::SchemaMismatch(_)));
    }

    #[test]
    fn non_json_body_is_schema_mismatch() {
        let err = RootDataNode::parse("<html>502</html>").unwrap_err();
        assert!(matches!(err, PrimeTrustError::SchemaMismatch(_)));
    }

    #[test]
    fn scalar_attributes_are_rejected() {
        assert!(matches!(to_attributes(&42), Err(PrimeTrustError::Encode(_))));
    }

    #[test]
    fn list_query_builds_filters_and_includes() {
        let pairs = ListQuery::new()
            .filter("contact.id", "eq", "C1")
            .include(&["cip-checks", "aml-checks"])
            .into_pairs();
        assert_eq!(
            pairs,
            vec![
                ("filter[contact.id eq]".to_string(), "C1".to_string()),
                ("include".to_string(), "cip-checks,aml-checks".to_string()),
            ]
        );
        assert!(ListQuery::new().include(&[]).into_pairs().is_empty());
    }
}
