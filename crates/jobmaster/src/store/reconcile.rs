use chrono::Utc;
use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait,
    IntoActiveModel, QueryFilter, Value,
};

use super::errors::{Result, StoreError};

/// A record fetched from an external API that maps onto one local table.
///
/// Implementations copy every mutable field in [`apply`](Self::apply). The
/// external key, local id, parent link and tracking timestamps are handled by
/// [`reconcile`] and must not be touched there.
pub trait RemoteRecord: Send + Sync {
    type Entity: EntityTrait;
    type ActiveModel: ActiveModelTrait<Entity = Self::Entity> + ActiveModelBehavior + Send + 'static;

    /// Short name used in logs and errors (`"workflow run"`).
    const KIND: &'static str;

    fn external_key(&self) -> Value;

    fn key_column() -> <Self::Entity as EntityTrait>::Column;

    /// Foreign key to the parent entity, for tables that have one.
    fn parent_column() -> Option<<Self::Entity as EntityTrait>::Column> {
        None
    }

    /// `(created_at, updated_at)` columns.
    fn timestamp_columns() -> (
        <Self::Entity as EntityTrait>::Column,
        <Self::Entity as EntityTrait>::Column,
    );

    fn apply(&self, model: &mut Self::ActiveModel);
}

/// Outcome of reconciling one remote record.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Reconciled<M> {
    pub model: M,
    /// `true` when a new row was inserted, `false` when an existing row was merged.
    pub created: bool,
}

/// Create-if-absent, merge-if-present.
///
/// Looks the record up by its external key on `conn` (a connection or an open
/// transaction). An existing row keeps its local id, external key and
/// `created_at`; every mutable field is overwritten, the parent link is
/// replaced when `parent` is given and `updated_at` is refreshed. A missing
/// row is inserted with `parent` as its foreign key and both timestamps set to
/// now. Rows are never deleted here.
///
/// Committing is left to the caller.
///
/// # Errors
/// Returns `StoreError::InvalidInput` for a blank external key and
/// `StoreError::Database` for any store failure (including a duplicate-key
/// race with a concurrent pipeline).
pub async fn reconcile<C, R>(
    conn: &C,
    record: &R,
    parent: Option<i32>,
) -> Result<Reconciled<<R::Entity as EntityTrait>::Model>>
where
    C: ConnectionTrait,
    R: RemoteRecord,
    <R::Entity as EntityTrait>::Model: IntoActiveModel<R::ActiveModel>,
{
    let key = record.external_key();
    if is_blank(&key) {
        return Err(StoreError::empty_key(R::KIND));
    }

    let existing = R::Entity::find()
        .filter(R::key_column().eq(key.clone()))
        .one(conn)
        .await?;

    let now = Value::from(Utc::now().fixed_offset());
    let (created_at, updated_at) = R::timestamp_columns();

    match existing {
        Some(model) => {
            let mut active: R::ActiveModel = model.into_active_model();
            record.apply(&mut active);
            set_parent::<R>(&mut active, parent);
            active.set(updated_at, now);

            let model = active.update(conn).await?;
            Ok(Reconciled {
                model,
                created: false,
            })
        }
        None => {
            let mut active = <R::ActiveModel as ActiveModelBehavior>::new();
            active.set(R::key_column(), key);
            record.apply(&mut active);
            set_parent::<R>(&mut active, parent);
            active.set(created_at, now.clone());
            active.set(updated_at, now);

            let model = active.insert(conn).await?;
            Ok(Reconciled {
                model,
                created: true,
            })
        }
    }
}

fn set_parent<R: RemoteRecord>(active: &mut R::ActiveModel, parent: Option<i32>) {
    if let Some(column) = R::parent_column()
        && let Some(id) = parent
    {
        active.set(column, Value::from(id));
    }
}

/// Null values and empty or whitespace-only strings cannot serve as keys.
fn is_blank(value: &Value) -> bool {
    match value {
        Value::String(Some(s)) => s.trim().is_empty(),
        Value::String(None) | Value::BigInt(None) | Value::Int(None) => true,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_detected() {
        assert!(is_blank(&Value::from("")));
        assert!(is_blank(&Value::from("   ")));
        assert!(is_blank(&Value::String(None)));
        assert!(is_blank(&Value::BigInt(None)));
    }

    #[test]
    fn real_keys_are_not_blank() {
        assert!(!is_blank(&Value::from("PROJ-1")));
        assert!(!is_blank(&Value::from(0i64)));
        assert!(!is_blank(&Value::from(42i64)));
    }

    #[test]
    fn empty_key_error_names_the_record_kind() {
        let err = StoreError::empty_key("issue");
        assert_eq!(
            err.to_string(),
            "Invalid input: issue record has an empty external key"
        );
    }
}
