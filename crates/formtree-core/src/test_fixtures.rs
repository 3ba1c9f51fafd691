//! Small entity set used by unit tests inside this crate.

use crate::{
    model::{
        AssociationKind, AssociationModel, CompositeModel, EntityModel, FieldKind, FieldModel,
    },
    record::Record,
    validate::ValidationContext,
    value::{CompositeValue, Value},
};

fn price(parts: &[Value]) -> Result<Value, String> {
    match parts {
        [Value::Int(_), Value::Text(_)] => Ok(CompositeValue::new("Price", parts.to_vec()).into()),
        _ => Err("expected an amount and a currency".to_string()),
    }
}

pub(crate) static PRICE: CompositeModel = CompositeModel {
    name: "Price",
    construct: price,
};

fn name_present(record: &Record, ctx: &mut dyn ValidationContext) {
    if record.get("name").is_none_or(Value::is_blank) {
        ctx.issue_at("name", "can't be blank");
    }
}

pub(crate) static AUTHOR: EntityModel = EntityModel {
    path: "test_fixtures::Author",
    entity_name: "author",
    fields: &[
        FieldModel { name: "name", kind: FieldKind::Text },
        FieldModel { name: "born_on", kind: FieldKind::Date },
        FieldModel { name: "woke_at", kind: FieldKind::Time },
        FieldModel { name: "signed_at", kind: FieldKind::Timestamp },
        FieldModel { name: "fee", kind: FieldKind::Composite(&PRICE) },
        FieldModel { name: "rank", kind: FieldKind::Int },
        FieldModel { name: "publisher_id", kind: FieldKind::Key },
    ],
    associations: &[
        AssociationModel {
            name: "books",
            kind: AssociationKind::HasMany,
            target: &BOOK,
            foreign_key: "author_id",
        },
        AssociationModel {
            name: "publisher",
            kind: AssociationKind::BelongsTo,
            target: &PUBLISHER,
            foreign_key: "publisher_id",
        },
        AssociationModel {
            name: "profile",
            kind: AssociationKind::HasOne,
            target: &PROFILE,
            foreign_key: "author_id",
        },
    ],
    validators: &[name_present],
};

pub(crate) static BOOK: EntityModel = EntityModel {
    path: "test_fixtures::Book",
    entity_name: "book",
    fields: &[
        FieldModel { name: "title", kind: FieldKind::Text },
        FieldModel { name: "author_id", kind: FieldKind::Key },
    ],
    associations: &[],
    validators: &[],
};

pub(crate) static PUBLISHER: EntityModel = EntityModel {
    path: "test_fixtures::Publisher",
    entity_name: "publisher",
    fields: &[FieldModel { name: "name", kind: FieldKind::Text }],
    associations: &[],
    validators: &[name_present],
};

pub(crate) static PROFILE: EntityModel = EntityModel {
    path: "test_fixtures::Profile",
    entity_name: "profile",
    fields: &[
        FieldModel { name: "bio", kind: FieldKind::Text },
        FieldModel { name: "author_id", kind: FieldKind::Key },
    ],
    associations: &[],
    validators: &[],
};
