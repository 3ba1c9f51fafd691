//! Shared entity models and form definitions for FormTree test surfaces.
//!
//! A project owns tasks (each with sub tasks), contributors and tag links,
//! and belongs to an owner. Every entity with a `name` requires it.

use formtree_core::{
    form::FormDefinition,
    model::{
        AssociationKind, AssociationModel, CompositeModel, EntityModel, FieldKind, FieldModel,
    },
    record::Record,
    validate::ValidationContext,
    value::{CompositeValue, Value},
};
use std::sync::{Arc, LazyLock};

///
/// COMPOSITES
///

fn money(parts: &[Value]) -> Result<Value, String> {
    match parts {
        [Value::Int(amount), Value::Text(currency)] if *amount >= 0 && currency.len() == 3 => {
            Ok(CompositeValue::new("Money", parts.to_vec()).into())
        }
        [Value::Int(_), Value::Text(_)] => {
            Err("amount must not be negative and currency must be 3 letters".to_string())
        }
        _ => Err("expected an amount and a currency".to_string()),
    }
}

pub static MONEY: CompositeModel = CompositeModel {
    name: "Money",
    construct: money,
};

///
/// VALIDATORS
///

fn name_present(record: &Record, ctx: &mut dyn ValidationContext) {
    if record.get("name").is_none_or(Value::is_blank) {
        ctx.issue_at("name", "can't be blank");
    }
}

///
/// ENTITIES
///

pub static PROJECT: EntityModel = EntityModel {
    path: "fixtures::Project",
    entity_name: "project",
    fields: &[
        FieldModel { name: "name", kind: FieldKind::Text },
        FieldModel { name: "description", kind: FieldKind::Text },
        FieldModel { name: "owner_id", kind: FieldKind::Key },
        FieldModel { name: "published_at", kind: FieldKind::Timestamp },
        FieldModel { name: "started_on", kind: FieldKind::Date },
        FieldModel { name: "standup_at", kind: FieldKind::Time },
        FieldModel { name: "budget", kind: FieldKind::Composite(&MONEY) },
    ],
    associations: &[
        AssociationModel {
            name: "tasks",
            kind: AssociationKind::HasMany,
            target: &TASK,
            foreign_key: "project_id",
        },
        AssociationModel {
            name: "contributors",
            kind: AssociationKind::HasMany,
            target: &PERSON,
            foreign_key: "project_id",
        },
        AssociationModel {
            name: "owner",
            kind: AssociationKind::BelongsTo,
            target: &PERSON,
            foreign_key: "owner_id",
        },
        AssociationModel {
            name: "project_tags",
            kind: AssociationKind::HasMany,
            target: &PROJECT_TAG,
            foreign_key: "project_id",
        },
    ],
    validators: &[name_present],
};

pub static TASK: EntityModel = EntityModel {
    path: "fixtures::Task",
    entity_name: "task",
    fields: &[
        FieldModel { name: "name", kind: FieldKind::Text },
        FieldModel { name: "description", kind: FieldKind::Text },
        FieldModel { name: "done", kind: FieldKind::Bool },
        FieldModel { name: "finished_at", kind: FieldKind::Timestamp },
        FieldModel { name: "project_id", kind: FieldKind::Key },
    ],
    associations: &[AssociationModel {
        name: "sub_tasks",
        kind: AssociationKind::HasMany,
        target: &SUB_TASK,
        foreign_key: "task_id",
    }],
    validators: &[name_present],
};

pub static SUB_TASK: EntityModel = EntityModel {
    path: "fixtures::SubTask",
    entity_name: "sub_task",
    fields: &[
        FieldModel { name: "name", kind: FieldKind::Text },
        FieldModel { name: "description", kind: FieldKind::Text },
        FieldModel { name: "task_id", kind: FieldKind::Key },
    ],
    associations: &[],
    validators: &[name_present],
};

pub static PERSON: EntityModel = EntityModel {
    path: "fixtures::Person",
    entity_name: "person",
    fields: &[
        FieldModel { name: "name", kind: FieldKind::Text },
        FieldModel { name: "description", kind: FieldKind::Text },
        FieldModel { name: "role", kind: FieldKind::Text },
        FieldModel { name: "project_id", kind: FieldKind::Key },
    ],
    associations: &[],
    validators: &[name_present],
};

pub static PROJECT_TAG: EntityModel = EntityModel {
    path: "fixtures::ProjectTag",
    entity_name: "project_tag",
    fields: &[
        FieldModel { name: "tag_id", kind: FieldKind::Key },
        FieldModel { name: "project_id", kind: FieldKind::Key },
    ],
    associations: &[AssociationModel {
        name: "tag",
        kind: AssociationKind::BelongsTo,
        target: &TAG,
        foreign_key: "tag_id",
    }],
    validators: &[],
};

pub static TAG: EntityModel = EntityModel {
    path: "fixtures::Tag",
    entity_name: "tag",
    fields: &[FieldModel { name: "name", kind: FieldKind::Text }],
    associations: &[],
    validators: &[name_present],
};

///
/// FORMS
///

static PROJECT_FORM: LazyLock<Arc<FormDefinition>> = LazyLock::new(|| {
    FormDefinition::builder(&PROJECT)
        .attributes([
            "name",
            "description",
            "published_at",
            "started_on",
            "standup_at",
            "budget",
        ])
        .association("tasks", |task| {
            task.attributes(["name", "description", "done", "finished_at"])
                .association("sub_tasks", |sub| sub.attributes(["name", "description"]))
        })
        .association_with_records("contributors", 2, |person| {
            person.attributes(["name", "description", "role"])
        })
        .association("owner", |person| person.attributes(["name", "role"]))
        .association("project_tags", |link| {
            link.association("tag", |tag| tag.attribute("name"))
        })
        .build()
        .expect("static project form")
});

/// The full project form: tasks with sub tasks, two contributor slots for a
/// new project, an owner, and tag links.
#[must_use]
pub fn project_form() -> Arc<FormDefinition> {
    Arc::clone(&PROJECT_FORM)
}
