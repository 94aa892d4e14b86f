//! Planning of optional-field attachments for a listing.
//!
//! Every write to a job's through-rows is planned here first: all
//! descriptor lookups and value checks happen before anything touches the
//! database, and the resulting plan is applied by the repository in a
//! single transaction.

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use super::optional_field::OptionalField;
use crate::domain::errors::{DomainError, DomainResult};

/// One stored value of a dynamic field for a job
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalFieldThrough {
    pub id: Uuid,
    pub job_id: Uuid,
    pub optional_field_id: Uuid,
    pub value: Option<String>,
    pub image: Option<String>,
    pub file: Option<String>,
}

/// A caller's request to attach (or, with `id`, patch) one field value
#[derive(Debug, Clone, Default)]
pub struct AttachmentInput {
    /// Existing through-row to patch; `None` creates a new row
    pub id: Option<Uuid>,
    pub optional_field_id: Option<Uuid>,
    pub value: Option<String>,
    pub image: Option<String>,
    pub file: Option<String>,
}

/// Row-level changes that bring a job's attachments in line with a payload
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReconciliationPlan {
    pub create: Vec<OptionalFieldThrough>,
    pub update: Vec<OptionalFieldThrough>,
    pub delete: Vec<Uuid>,
    /// Rows the plan was computed against
    pub based_on: Vec<OptionalFieldThrough>,
}

impl ReconciliationPlan {
    /// Whether `current` is still the row set the plan was computed against
    ///
    /// Order is ignored; ids and contents must match.
    pub fn is_current(&self, current: &[OptionalFieldThrough]) -> bool {
        if self.based_on.len() != current.len() {
            return false;
        }
        let expected: HashMap<Uuid, &OptionalFieldThrough> =
            self.based_on.iter().map(|row| (row.id, row)).collect();
        current
            .iter()
            .all(|row| expected.get(&row.id).is_some_and(|seen| *seen == row))
    }
}

/// Through-row joined with its descriptor, for reading
#[derive(Debug, Clone)]
pub struct AttachmentView {
    pub through: OptionalFieldThrough,
    pub field: OptionalField,
}

/// Descriptor ids that must be loaded before planning
pub fn referenced_field_ids(inputs: &[AttachmentInput], existing: &[OptionalFieldThrough]) -> Vec<Uuid> {
    let mut ids: Vec<Uuid> = inputs
        .iter()
        .filter(|i| i.id.is_none())
        .filter_map(|i| i.optional_field_id)
        .chain(existing.iter().map(|e| e.optional_field_id))
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Materialises the attachments of a new job
///
/// Fails on the first item whose descriptor is unknown or inactive, or
/// whose content does not satisfy the descriptor. Nothing is returned
/// partially.
pub fn plan_create(
    job_id: Uuid,
    inputs: &[AttachmentInput],
    fields: &HashMap<Uuid, OptionalField>,
) -> DomainResult<Vec<OptionalFieldThrough>> {
    inputs
        .iter()
        .enumerate()
        .map(|(index, input)| new_attachment(job_id, index, input, fields))
        .collect()
}

/// Reconciles a job's existing through-rows with an update payload
///
/// Items with an `id` patch that row, items without one become new rows,
/// and every existing row not named by an item is deleted. An `id` that is
/// not one of this job's rows is rejected rather than treated as a new row.
pub fn plan_update(
    job_id: Uuid,
    existing: &[OptionalFieldThrough],
    inputs: &[AttachmentInput],
    fields: &HashMap<Uuid, OptionalField>,
) -> DomainResult<ReconciliationPlan> {
    let existing_by_id: HashMap<Uuid, &OptionalFieldThrough> =
        existing.iter().map(|row| (row.id, row)).collect();
    let mut kept = HashSet::new();
    let mut plan = ReconciliationPlan::default();

    for (index, input) in inputs.iter().enumerate() {
        let Some(id) = input.id else {
            plan.create.push(new_attachment(job_id, index, input, fields)?);
            continue;
        };

        if !kept.insert(id) {
            return Err(DomainError::validation(
                "id",
                format!("Duplicate attachment id: {}", id),
            ));
        }
        let current = existing_by_id.get(&id).ok_or_else(|| {
            DomainError::validation("id", format!("Unknown attachment id for this job: {}", id))
        })?;

        let patched = OptionalFieldThrough {
            id,
            job_id,
            optional_field_id: current.optional_field_id,
            value: input.value.clone().or_else(|| current.value.clone()),
            image: input.image.clone().or_else(|| current.image.clone()),
            file: input.file.clone().or_else(|| current.file.clone()),
        };
        let field = fields
            .get(&patched.optional_field_id)
            .ok_or_else(|| invalid_field_id(patched.optional_field_id))?;
        check_content(index, field, &patched)?;

        plan.update.push(patched);
    }

    plan.delete = existing
        .iter()
        .filter(|row| !kept.contains(&row.id))
        .map(|row| row.id)
        .collect();
    plan.based_on = existing.to_vec();

    Ok(plan)
}

fn new_attachment(
    job_id: Uuid,
    index: usize,
    input: &AttachmentInput,
    fields: &HashMap<Uuid, OptionalField>,
) -> DomainResult<OptionalFieldThrough> {
    let field_id = input
        .optional_field_id
        .ok_or_else(|| DomainError::validation("optionalFieldID", "This field is required."))?;
    let field = fields.get(&field_id).ok_or_else(|| invalid_field_id(field_id))?;
    if !field.is_active {
        return Err(DomainError::validation(
            "optionalFieldID",
            format!("OptionalField is not active: {}", field_id),
        ));
    }

    let row = OptionalFieldThrough {
        id: Uuid::new_v4(),
        job_id,
        optional_field_id: field_id,
        value: field.effective_value(input.value.as_deref()),
        image: input.image.clone(),
        file: input.file.clone(),
    };
    check_content(index, field, &row)?;
    Ok(row)
}

fn check_content(index: usize, field: &OptionalField, row: &OptionalFieldThrough) -> DomainResult<()> {
    field
        .check_value(row.value.as_deref(), row.image.as_deref(), row.file.as_deref())
        .map_err(|reason| {
            DomainError::validation(
                "additionally",
                format!("Item {} ({}): {}", index, field.key, reason),
            )
        })
}

fn invalid_field_id(id: Uuid) -> DomainError {
    DomainError::validation("optionalFieldID", format!("Invalid OptionalField ID: {}", id))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ads::optional_field::{FieldType, OptionalFieldDefinition};

    fn descriptor(key: &str, field_type: FieldType) -> OptionalField {
        OptionalField::new(OptionalFieldDefinition {
            name: key.to_string(),
            key: key.to_string(),
            field_type,
            is_active: true,
            ..Default::default()
        })
        .unwrap()
    }

    fn index(fields: &[&OptionalField]) -> HashMap<Uuid, OptionalField> {
        fields.iter().map(|f| (f.id, (*f).clone())).collect()
    }

    fn input(field: &OptionalField, value: &str) -> AttachmentInput {
        AttachmentInput {
            optional_field_id: Some(field.id),
            value: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn stored(job_id: Uuid, field: &OptionalField, value: &str) -> OptionalFieldThrough {
        OptionalFieldThrough {
            id: Uuid::new_v4(),
            job_id,
            optional_field_id: field.id,
            value: Some(value.to_string()),
            image: None,
            file: None,
        }
    }

    #[test]
    fn create_yields_one_row_per_item() {
        let salary = descriptor("salary", FieldType::Integer);
        let remote = descriptor("remote", FieldType::Boolean);
        let fields = index(&[&salary, &remote]);
        let job_id = Uuid::new_v4();

        let rows = plan_create(
            job_id,
            &[input(&salary, "1200"), input(&remote, "true"), input(&salary, "1300")],
            &fields,
        )
        .unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.job_id == job_id));
        assert_eq!(rows[1].optional_field_id, remote.id);
        assert_eq!(rows[2].value.as_deref(), Some("1300"));
    }

    #[test]
    fn create_with_unknown_field_fails() {
        let salary = descriptor("salary", FieldType::Integer);
        let fields = index(&[&salary]);
        let unknown = Uuid::new_v4();

        let err = plan_create(
            Uuid::new_v4(),
            &[
                input(&salary, "1200"),
                AttachmentInput {
                    optional_field_id: Some(unknown),
                    ..Default::default()
                },
            ],
            &fields,
        )
        .unwrap_err();

        match err {
            DomainError::Validation { field, message } => {
                assert_eq!(field, "optionalFieldID");
                assert_eq!(message, format!("Invalid OptionalField ID: {}", unknown));
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_without_field_id_fails() {
        let err = plan_create(Uuid::new_v4(), &[AttachmentInput::default()], &HashMap::new()).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "optionalFieldID"));
    }

    #[test]
    fn create_with_inactive_field_fails() {
        let mut legacy = descriptor("legacy", FieldType::String);
        legacy.is_active = false;
        let fields = index(&[&legacy]);

        let err = plan_create(Uuid::new_v4(), &[input(&legacy, "x")], &fields).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "optionalFieldID"));
    }

    #[test]
    fn create_with_bad_value_reports_item() {
        let salary = descriptor("salary", FieldType::Integer);
        let fields = index(&[&salary]);

        let err = plan_create(Uuid::new_v4(), &[input(&salary, "lots")], &fields).unwrap_err();
        match err {
            DomainError::Validation { field, message } => {
                assert_eq!(field, "additionally");
                assert!(message.starts_with("Item 0 (salary)"), "{}", message);
            }
            other => panic!("Expected validation error, got {:?}", other),
        }
    }

    #[test]
    fn create_fills_default_value() {
        let mut level = descriptor("level", FieldType::String);
        level.default_value = Some("junior".to_string());
        let fields = index(&[&level]);

        let rows = plan_create(
            Uuid::new_v4(),
            &[AttachmentInput {
                optional_field_id: Some(level.id),
                ..Default::default()
            }],
            &fields,
        )
        .unwrap();
        assert_eq!(rows[0].value.as_deref(), Some("junior"));
    }

    #[test]
    fn update_deletes_rows_not_in_payload() {
        let salary = descriptor("salary", FieldType::Integer);
        let fields = index(&[&salary]);
        let job_id = Uuid::new_v4();
        let keep = stored(job_id, &salary, "100");
        let drop = stored(job_id, &salary, "200");

        let plan = plan_update(
            job_id,
            &[keep.clone(), drop.clone()],
            &[AttachmentInput {
                id: Some(keep.id),
                ..Default::default()
            }],
            &fields,
        )
        .unwrap();

        assert_eq!(plan.delete, vec![drop.id]);
        assert_eq!(plan.update.len(), 1);
        assert_eq!(plan.update[0], keep);
        assert!(plan.create.is_empty());
    }

    #[test]
    fn update_creates_new_items_and_keeps_referenced_rows() {
        let salary = descriptor("salary", FieldType::Integer);
        let remote = descriptor("remote", FieldType::Boolean);
        let fields = index(&[&salary, &remote]);
        let job_id = Uuid::new_v4();
        let existing = stored(job_id, &salary, "100");

        let plan = plan_update(
            job_id,
            &[existing.clone()],
            &[
                AttachmentInput {
                    id: Some(existing.id),
                    value: Some("150".to_string()),
                    ..Default::default()
                },
                input(&remote, "false"),
            ],
            &fields,
        )
        .unwrap();

        assert!(plan.delete.is_empty());
        assert_eq!(plan.update.len(), 1);
        assert_eq!(plan.update[0].value.as_deref(), Some("150"));
        assert_eq!(plan.create.len(), 1);
        assert_eq!(plan.create[0].optional_field_id, remote.id);
    }

    #[test]
    fn update_with_empty_payload_deletes_everything() {
        let salary = descriptor("salary", FieldType::Integer);
        let fields = index(&[&salary]);
        let job_id = Uuid::new_v4();
        let a = stored(job_id, &salary, "1");
        let b = stored(job_id, &salary, "2");

        let plan = plan_update(job_id, &[a.clone(), b.clone()], &[], &fields).unwrap();
        assert_eq!(plan.delete, vec![a.id, b.id]);
    }

    #[test]
    fn update_rejects_foreign_row_id() {
        let salary = descriptor("salary", FieldType::Integer);
        let fields = index(&[&salary]);
        let job_id = Uuid::new_v4();

        let err = plan_update(
            job_id,
            &[stored(job_id, &salary, "1")],
            &[AttachmentInput {
                id: Some(Uuid::new_v4()),
                ..Default::default()
            }],
            &fields,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "id"));
    }

    #[test]
    fn update_rejects_duplicate_ids() {
        let salary = descriptor("salary", FieldType::Integer);
        let fields = index(&[&salary]);
        let job_id = Uuid::new_v4();
        let row = stored(job_id, &salary, "1");
        let patch = AttachmentInput {
            id: Some(row.id),
            ..Default::default()
        };

        let err = plan_update(job_id, &[row.clone()], &[patch.clone(), patch], &fields).unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "id"));
    }

    #[test]
    fn update_revalidates_patched_value() {
        let salary = descriptor("salary", FieldType::Integer);
        let fields = index(&[&salary]);
        let job_id = Uuid::new_v4();
        let row = stored(job_id, &salary, "1");

        let err = plan_update(
            job_id,
            &[row.clone()],
            &[AttachmentInput {
                id: Some(row.id),
                value: Some("one".to_string()),
                ..Default::default()
            }],
            &fields,
        )
        .unwrap_err();
        assert!(matches!(err, DomainError::Validation { ref field, .. } if field == "additionally"));
    }

    #[test]
    fn referenced_ids_cover_new_items_and_existing_rows() {
        let a = descriptor("a", FieldType::String);
        let b = descriptor("b", FieldType::String);
        let job_id = Uuid::new_v4();
        let existing = stored(job_id, &a, "x");

        let ids = referenced_field_ids(&[input(&b, "y"), input(&a, "z")], &[existing]);
        let mut expected = vec![a.id, b.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn plan_is_current_only_against_its_snapshot() {
        let salary = descriptor("salary", FieldType::Integer);
        let fields = index(&[&salary]);
        let job_id = Uuid::new_v4();
        let row = stored(job_id, &salary, "100");

        let plan = plan_update(
            job_id,
            &[row.clone()],
            &[AttachmentInput {
                id: Some(row.id),
                value: Some("200".to_string()),
                ..Default::default()
            }],
            &fields,
        )
        .unwrap();

        assert!(plan.is_current(&[row.clone()]));

        // Another writer replaced the row
        let replaced = stored(job_id, &salary, "300");
        assert!(!plan.is_current(&[replaced.clone()]));
        assert!(!plan.is_current(&[row.clone(), replaced]));
        assert!(!plan.is_current(&[]));

        // Same id, different contents
        let edited = OptionalFieldThrough {
            value: Some("150".to_string()),
            ..row
        };
        assert!(!plan.is_current(&[edited]));
    }
}
