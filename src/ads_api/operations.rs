//! Resource operations sent to the mutate endpoint.
//!
//! Every write tool produces a list of [`MutateOperation`]s. Partial updates can only be built
//! through [`UpdateBuilder`], which records the payload field and its field-mask path in the same
//! call so that the two never drift apart.

use serde_json::{Map, Value, json};

/// Entity types the write tools touch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    CampaignBudget,
    Campaign,
    AdGroup,
    AdGroupAd,
    AdGroupCriterion,
    CampaignCriterion,
    ConversionAction,
}

impl ResourceKind {
    /// Collection segment used in resource names
    pub const fn collection(self) -> &'static str {
        match self {
            Self::CampaignBudget => "campaignBudgets",
            Self::Campaign => "campaigns",
            Self::AdGroup => "adGroups",
            Self::AdGroupAd => "adGroupAds",
            Self::AdGroupCriterion => "adGroupCriteria",
            Self::CampaignCriterion => "campaignCriteria",
            Self::ConversionAction => "conversionActions",
        }
    }

    /// Key wrapping this entity's operation inside a `MutateOperation`
    pub const fn operation_key(self) -> &'static str {
        match self {
            Self::CampaignBudget => "campaignBudgetOperation",
            Self::Campaign => "campaignOperation",
            Self::AdGroup => "adGroupOperation",
            Self::AdGroupAd => "adGroupAdOperation",
            Self::AdGroupCriterion => "adGroupCriterionOperation",
            Self::CampaignCriterion => "campaignCriterionOperation",
            Self::ConversionAction => "conversionActionOperation",
        }
    }

    /// Key wrapping this entity's result inside a `MutateOperationResponse`
    pub const fn result_key(self) -> &'static str {
        match self {
            Self::CampaignBudget => "campaignBudgetResult",
            Self::Campaign => "campaignResult",
            Self::AdGroup => "adGroupResult",
            Self::AdGroupAd => "adGroupAdResult",
            Self::AdGroupCriterion => "adGroupCriterionResult",
            Self::CampaignCriterion => "campaignCriterionResult",
            Self::ConversionAction => "conversionActionResult",
        }
    }

    /// Full resource name, e.g. `customers/1234567890/campaigns/42`
    pub fn resource_name(self, customer_id: &str, id: &str) -> String {
        format!("customers/{customer_id}/{}/{id}", self.collection())
    }

    /// Resource name for entities keyed by a parent id, e.g. `adGroupCriteria/7~99`
    pub fn composite_resource_name(self, customer_id: &str, parent_id: &str, id: &str) -> String {
        self.resource_name(customer_id, &format!("{parent_id}~{id}"))
    }
}

/// The action performed on a single entity
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    Create(Map<String, Value>),
    Update {
        resource:    Map<String, Value>,
        update_mask: Vec<String>,
    },
    Remove(String),
}

/// One entry of a mutate request
#[derive(Debug, Clone, PartialEq)]
pub struct MutateOperation {
    pub kind:      ResourceKind,
    pub operation: Operation,
}

impl MutateOperation {
    pub fn create(kind: ResourceKind, resource: Value) -> Self {
        let resource = match resource {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        Self {
            kind,
            operation: Operation::Create(resource),
        }
    }

    pub fn remove(kind: ResourceKind, resource_name: impl Into<String>) -> Self {
        Self {
            kind,
            operation: Operation::Remove(resource_name.into()),
        }
    }

    /// Field mask of an update, `None` for creates and removes
    pub fn update_mask(&self) -> Option<&[String]> {
        match &self.operation {
            Operation::Update { update_mask, .. } => Some(update_mask),
            Operation::Create(_) | Operation::Remove(_) => None,
        }
    }

    /// Entity body of a create or update
    pub fn payload(&self) -> Option<&Map<String, Value>> {
        match &self.operation {
            Operation::Create(resource) | Operation::Update { resource, .. } => Some(resource),
            Operation::Remove(_) => None,
        }
    }

    /// Wire representation inside `mutateOperations`
    pub fn to_json(&self) -> Value {
        let inner = match &self.operation {
            Operation::Create(resource) => json!({ "create": resource }),
            Operation::Update {
                resource,
                update_mask,
            } => json!({
                "update": resource,
                "updateMask": update_mask.join(","),
            }),
            Operation::Remove(resource_name) => json!({ "remove": resource_name }),
        };
        json!({ self.kind.operation_key(): inner })
    }
}

/// Builds a partial update whose field mask lists exactly the fields that were set
pub struct UpdateBuilder {
    kind:     ResourceKind,
    resource: Map<String, Value>,
    mask:     Vec<String>,
}

impl UpdateBuilder {
    pub fn new(kind: ResourceKind, resource_name: impl Into<String>) -> Self {
        let mut resource = Map::new();
        resource.insert("resourceName".to_string(), Value::String(resource_name.into()));
        Self {
            kind,
            resource,
            mask: Vec::new(),
        }
    }

    /// Set a field by its snake_case path (`target_cpa.target_cpa_micros`)
    pub fn set(mut self, path: &str, value: impl Into<Value>) -> Self {
        let segments: Vec<String> = path.split('.').map(snake_to_camel).collect();
        insert_nested(&mut self.resource, &segments, value.into());
        if !self.mask.iter().any(|existing| existing == path) {
            self.mask.push(path.to_string());
        }
        self
    }

    /// Set a field only when a value was supplied
    pub fn set_opt<T: Into<Value>>(self, path: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.set(path, value),
            None => self,
        }
    }

    /// The finished operation, or `None` when nothing was set
    pub fn build(self) -> Option<MutateOperation> {
        if self.mask.is_empty() {
            return None;
        }
        Some(MutateOperation {
            kind:      self.kind,
            operation: Operation::Update {
                resource:    self.resource,
                update_mask: self.mask,
            },
        })
    }
}

fn insert_nested(target: &mut Map<String, Value>, segments: &[String], value: Value) {
    match segments {
        [] => {}
        [last] => {
            target.insert(last.clone(), value);
        }
        [head, rest @ ..] => {
            let child = target
                .entry(head.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if !child.is_object() {
                *child = Value::Object(Map::new());
            }
            if let Value::Object(child) = child {
                insert_nested(child, rest, value);
            }
        }
    }
}

fn snake_to_camel(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    let mut upper_next = false;
    for c in segment.chars() {
        if c == '_' {
            upper_next = true;
        } else if upper_next {
            out.extend(c.to_uppercase());
            upper_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_builder_mask_matches_payload() {
        let op = UpdateBuilder::new(
            ResourceKind::AdGroupCriterion,
            "customers/1/adGroupCriteria/7~99",
        )
        .set("status", "PAUSED")
        .set_opt::<i64>("cpc_bid_micros", None)
        .build()
        .unwrap();

        assert_eq!(op.update_mask().unwrap(), ["status"]);
        let payload = op.payload().unwrap();
        assert_eq!(payload.get("status"), Some(&json!("PAUSED")));
        assert!(payload.get("cpcBidMicros").is_none());
    }

    #[test]
    fn test_nested_paths_become_camel_case_objects() {
        let op = UpdateBuilder::new(ResourceKind::Campaign, "customers/1/campaigns/2")
            .set("target_cpa.target_cpa_micros", 5_000_000_i64)
            .set("end_date", "2025-01-31")
            .build()
            .unwrap();

        assert_eq!(
            op.to_json(),
            json!({
                "campaignOperation": {
                    "update": {
                        "resourceName": "customers/1/campaigns/2",
                        "targetCpa": { "targetCpaMicros": 5_000_000 },
                        "endDate": "2025-01-31",
                    },
                    "updateMask": "target_cpa.target_cpa_micros,end_date",
                }
            })
        );
    }

    #[test]
    fn test_empty_update_builds_nothing() {
        assert!(
            UpdateBuilder::new(ResourceKind::AdGroup, "customers/1/adGroups/2")
                .set_opt::<String>("name", None)
                .build()
                .is_none()
        );
    }

    #[test]
    fn test_setting_same_path_twice_keeps_single_mask_entry() {
        let op = UpdateBuilder::new(ResourceKind::AdGroup, "customers/1/adGroups/2")
            .set("name", "a")
            .set("name", "b")
            .build()
            .unwrap();
        assert_eq!(op.update_mask().unwrap(), ["name"]);
        assert_eq!(op.payload().unwrap().get("name"), Some(&json!("b")));
    }

    #[test]
    fn test_remove_and_create_wire_shapes() {
        let remove = MutateOperation::remove(
            ResourceKind::AdGroupCriterion,
            "customers/1/adGroupCriteria/7~99",
        );
        assert_eq!(
            remove.to_json(),
            json!({ "adGroupCriterionOperation": { "remove": "customers/1/adGroupCriteria/7~99" } })
        );
        assert!(remove.update_mask().is_none());

        let create = MutateOperation::create(ResourceKind::AdGroup, json!({ "name": "x" }));
        assert_eq!(
            create.to_json(),
            json!({ "adGroupOperation": { "create": { "name": "x" } } })
        );
    }

    #[test]
    fn test_resource_names() {
        assert_eq!(
            ResourceKind::CampaignBudget.resource_name("123", "-1"),
            "customers/123/campaignBudgets/-1"
        );
        assert_eq!(
            ResourceKind::AdGroupAd.composite_resource_name("123", "7", "8"),
            "customers/123/adGroupAds/7~8"
        );
    }
}
