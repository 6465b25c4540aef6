//! Resource schemas and the resource-type catalog

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value as JsonValue};

use crate::error::ResourceError;
use crate::id::ObjectId;

/// A document schema that can be stored in a collection.
///
/// Decoding and encoding go through serde; a schema only has to expose its
/// identifier so handlers can assign and force it.
pub trait Resource: Serialize + DeserializeOwned + Clone + Send + Sync + 'static {
    fn id(&self) -> Option<&str>;

    fn set_id(&mut self, id: ObjectId);

    /// Decode a request body.
    fn decode(bytes: &[u8]) -> Result<Self, ResourceError> {
        serde_json::from_slice(bytes).map_err(|e| ResourceError::DecodeFailure(e.to_string()))
    }

    /// Decode a stored document.
    fn from_document(doc: JsonValue) -> Result<Self, ResourceError> {
        serde_json::from_value(doc).map_err(|e| ResourceError::StoreFailure(e.to_string()))
    }

    /// Encode for storage.
    fn to_document(&self) -> Result<JsonValue, ResourceError> {
        serde_json::to_value(self).map_err(|e| ResourceError::StoreFailure(e.to_string()))
    }
}

/// A resource whose fields are opaque to the server.
///
/// Any JSON object decodes; `id` is lifted out so it can be assigned, and
/// every other member is kept verbatim. An `id` that is not a string is
/// dropped, since handlers always overwrite it.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub id: Option<String>,

    #[serde(flatten)]
    pub fields: Map<String, JsonValue>,
}

fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<JsonValue>::deserialize(deserializer)? {
        Some(JsonValue::String(id)) => Ok(Some(id)),
        _ => Ok(None),
    }
}

impl Document {
    pub fn get(&self, key: &str) -> Option<&JsonValue> {
        self.fields.get(key)
    }
}

impl Resource for Document {
    fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    fn set_id(&mut self, id: ObjectId) {
        self.id = Some(id.to_hex());
    }
}

/// Descriptor tying a resource type name to its collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ResourceType {
    pub name: &'static str,
    pub collection: &'static str,
}

impl ResourceType {
    pub const fn new(name: &'static str, collection: &'static str) -> Self {
        Self { name, collection }
    }

    /// Canonical path of the type, e.g. `/Alert`.
    pub fn path(&self) -> String {
        format!("/{}", self.name)
    }

    /// Canonical path of one instance, e.g. `/Alert/{id}`.
    pub fn instance_path(&self, id: &str) -> String {
        format!("/{}/{}", self.name, id)
    }

    pub fn find(name: &str) -> Option<ResourceType> {
        CATALOG.iter().copied().find(|t| t.name == name)
    }
}

/// Every resource type the server exposes.
pub const CATALOG: &[ResourceType] = &[
    ResourceType::new("Alert", "alerts"),
    ResourceType::new("Appointment", "appointments"),
    ResourceType::new("Availability", "availabilitys"),
    ResourceType::new("Contraindication", "contraindications"),
    ResourceType::new("DeviceObservationReport", "deviceobservationreports"),
    ResourceType::new("DocumentManifest", "documentmanifests"),
    ResourceType::new("Encounter", "encounters"),
    ResourceType::new("FamilyHistory", "familyhistorys"),
    ResourceType::new("Location", "locations"),
    ResourceType::new("Namespace", "namespaces"),
    ResourceType::new("OperationDefinition", "operationdefinitions"),
    ResourceType::new("OperationOutcome", "operationoutcomes"),
    ResourceType::new("Order", "orders"),
    ResourceType::new("Other", "others"),
    ResourceType::new("Practitioner", "practitioners"),
    ResourceType::new("Provenance", "provenances"),
    ResourceType::new("RiskAssessment", "riskassessments"),
    ResourceType::new("Slot", "slots"),
    ResourceType::new("Subscription", "subscriptions"),
    ResourceType::new("Supply", "supplys"),
];

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn document_keeps_unknown_fields_and_lifts_id() {
        let doc = Document::decode(br#"{"note":"visit","id":"abc","status":{"code":1}}"#).unwrap();
        assert_eq!(doc.id(), Some("abc"));
        assert_eq!(doc.get("note"), Some(&json!("visit")));
        assert_eq!(doc.get("status"), Some(&json!({"code": 1})));
        assert!(doc.get("id").is_none());
    }

    #[test]
    fn document_rejects_non_objects() {
        let bodies: [&[u8]; 5] = [b"[1,2]", b"\"text\"", b"42", b"{not json", b""];
        for body in bodies {
            assert!(matches!(
                Document::decode(body),
                Err(ResourceError::DecodeFailure(_))
            ));
        }
    }

    #[test]
    fn non_string_ids_are_dropped() {
        let numeric = Document::decode(br#"{"id":42,"note":"x"}"#).unwrap();
        assert_eq!(numeric.id(), None);
        assert_eq!(numeric.get("note"), Some(&json!("x")));
        assert!(numeric.get("id").is_none());

        let object = Document::decode(br#"{"id":{"a":1},"note":"y"}"#).unwrap();
        assert_eq!(object.id(), None);

        let null = Document::decode(br#"{"id":null}"#).unwrap();
        assert_eq!(null.id(), None);
    }

    #[test]
    fn set_id_overwrites_existing_id() {
        let mut doc = Document::decode(br#"{"id":"from-body","note":"x"}"#).unwrap();
        let id = ObjectId::new();
        doc.set_id(id);
        assert_eq!(
            doc.to_document().unwrap(),
            json!({"id": id.to_hex(), "note": "x"})
        );
    }

    #[test]
    fn catalog_collections_follow_naming_rule() {
        for t in CATALOG {
            assert_eq!(t.collection, format!("{}s", t.name.to_lowercase()));
        }
        assert_eq!(ResourceType::find("Slot").unwrap().collection, "slots");
        assert!(ResourceType::find("Patient").is_none());
    }
}
