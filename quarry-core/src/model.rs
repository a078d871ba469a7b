use crate::{
    AsValue, AttributeStore, Collection, Connection, DatabaseError, DatabaseManager, GuardPolicy,
    OrmBuilder, QueryBuilder, Record, Result, ToArray, Value, VisibilityPolicy, table_name_of,
};
use std::{any, sync::Arc};
use time::{OffsetDateTime, PrimitiveDateTime};

pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// Static description of a model: its table, key and the rules applied to its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelDefinition {
    pub table: String,
    /// `None` forbids deleting or updating single models.
    pub primary_key: Option<String>,
    pub incrementing: bool,
    /// Maintain `created_at` and `updated_at`.
    pub timestamps: bool,
    pub fillable: Vec<String>,
    pub guarded: bool,
    pub hidden: Vec<String>,
    pub visible: Vec<String>,
    /// Connection used by the model, the default one when `None`.
    pub connection: Option<String>,
}

impl ModelDefinition {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            primary_key: Some("id".into()),
            incrementing: true,
            timestamps: true,
            fillable: Vec::new(),
            guarded: true,
            hidden: Vec::new(),
            visible: Vec::new(),
            connection: None,
        }
    }

    /// Table named after the type, `BlogPost` uses `blog_posts`.
    pub fn of<T: ?Sized>() -> Self {
        Self::new(table_name_of(any::type_name::<T>()))
    }

    pub fn primary_key(mut self, key: Option<&str>) -> Self {
        self.primary_key = key.map(Into::into);
        self
    }

    pub fn incrementing(mut self, value: bool) -> Self {
        self.incrementing = value;
        self
    }

    pub fn timestamps(mut self, value: bool) -> Self {
        self.timestamps = value;
        self
    }

    pub fn fillable<K: Into<String>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.fillable = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn guarded(mut self, value: bool) -> Self {
        self.guarded = value;
        self
    }

    pub fn hidden<K: Into<String>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.hidden = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn visible<K: Into<String>>(mut self, keys: impl IntoIterator<Item = K>) -> Self {
        self.visible = keys.into_iter().map(Into::into).collect();
        self
    }

    pub fn connection(mut self, name: impl Into<String>) -> Self {
        self.connection = Some(name.into());
        self
    }
}

/// One row of a table as an active record.
///
/// A model is created empty (not existing yet) or hydrated from a row. It
/// remembers the attributes it was loaded with, [`Model::save`] only sends the
/// ones that changed since.
#[derive(Debug, Clone)]
pub struct Model {
    definition: Arc<ModelDefinition>,
    attributes: AttributeStore,
    guard: GuardPolicy,
    visibility: VisibilityPolicy,
    connection: Option<String>,
    exists: bool,
}

impl Model {
    pub fn new(definition: impl Into<Arc<ModelDefinition>>) -> Self {
        let definition: Arc<ModelDefinition> = definition.into();
        Self {
            guard: GuardPolicy::new(definition.fillable.clone(), definition.guarded),
            visibility: VisibilityPolicy::new(definition.hidden.clone(), definition.visible.clone()),
            connection: definition.connection.clone(),
            definition,
            attributes: AttributeStore::new(),
            exists: false,
        }
    }

    /// Existing model holding `attributes` as loaded, no mass assignment rule applies.
    pub fn hydrate(definition: impl Into<Arc<ModelDefinition>>, attributes: Record) -> Self {
        let mut model = Self::new(definition);
        model.attributes.set_raw(attributes, true);
        model.exists = true;
        model
    }

    pub fn definition(&self) -> &Arc<ModelDefinition> {
        &self.definition
    }

    pub fn table(&self) -> &str {
        &self.definition.table
    }

    pub fn key_name(&self) -> Option<&str> {
        self.definition.primary_key.as_deref()
    }

    pub fn connection_name(&self) -> Option<&str> {
        self.connection.as_deref()
    }

    pub fn set_connection_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.connection = Some(name.into());
        self
    }

    /// Stored in the database.
    pub fn exists(&self) -> bool {
        self.exists
    }

    /// Mass assignment, keys not fillable are dropped.
    pub fn fill(&mut self, attributes: Record) -> &mut Self {
        for (key, value) in self.guard.fillable_from(attributes) {
            self.attributes.set(key, value);
        }
        self
    }

    /// Assignment ignoring the fillable rules.
    pub fn force_fill(&mut self, attributes: Record) -> &mut Self {
        for (key, value) in attributes {
            self.attributes.set(key, value);
        }
        self
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.attributes.set(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }

    /// Attribute converted to `T`, a missing one converts from `NULL`.
    pub fn get_as<T: AsValue>(&self, key: &str) -> Result<T> {
        T::try_from_value(self.get(key).cloned().unwrap_or_default())
    }

    /// Value of the primary key.
    pub fn key(&self) -> Option<&Value> {
        self.key_name().and_then(|k| self.attributes.get(k))
    }

    pub fn attributes(&self) -> &Record {
        self.attributes.attributes()
    }

    pub fn original(&self) -> &Record {
        self.attributes.original()
    }

    pub fn is_dirty(&self) -> bool {
        self.attributes.is_dirty()
    }

    pub fn is_dirty_any<K: AsRef<str>>(&self, keys: impl IntoIterator<Item = K>) -> bool {
        self.attributes.is_dirty_any(keys)
    }

    pub fn dirty(&self) -> Record {
        self.attributes.dirty()
    }

    /// Attributes written by the last update.
    pub fn changes(&self) -> &Record {
        self.attributes.changes()
    }

    pub fn sync_original(&mut self) -> &mut Self {
        self.attributes.sync_original();
        self
    }

    pub fn fillable(&self) -> &[String] {
        self.guard.fillable()
    }

    pub fn is_fillable(&self, key: &str) -> bool {
        self.guard.is_fillable(key)
    }

    pub fn is_guarded(&self) -> bool {
        self.guard.is_guarded()
    }

    pub fn guard(&mut self) -> &mut Self {
        self.guard.guard();
        self
    }

    pub fn unguard(&mut self) -> &mut Self {
        self.guard.unguard();
        self
    }

    pub fn set_fillable<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.guard.set_fillable(keys);
        self
    }

    pub fn merge_fillable<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.guard.merge_fillable(keys);
        self
    }

    pub fn hidden(&self) -> &[String] {
        self.visibility.hidden()
    }

    pub fn visible(&self) -> &[String] {
        self.visibility.visible()
    }

    pub fn set_hidden<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.visibility.set_hidden(keys);
        self
    }

    pub fn set_visible<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.visibility.set_visible(keys);
        self
    }

    pub fn make_visible<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.visibility.make_visible(keys);
        self
    }

    pub fn make_hidden<K: Into<String>>(&mut self, keys: impl IntoIterator<Item = K>) -> &mut Self {
        self.visibility.make_hidden(keys);
        self
    }

    /// Visible attributes.
    pub fn to_map(&self) -> Record {
        self.visibility.filter(self.attributes())
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Object(
            self.to_map()
                .into_iter()
                .map(|(k, v)| (k, v.to_json()))
                .collect(),
        )
    }

    /// Builder over the model table.
    pub fn new_query(&self, connection: &Connection) -> OrmBuilder {
        OrmBuilder::new(connection.query(), self.definition.clone())
    }

    /// Connection the model belongs to, opened by `manager` when needed.
    pub fn resolve_connection<'a>(
        &self,
        manager: &'a mut DatabaseManager,
    ) -> Result<&'a mut Connection> {
        manager.connection_for(self.connection_name())
    }

    pub fn save_in(&mut self, manager: &mut DatabaseManager) -> Result<bool> {
        let connection = self.resolve_connection(manager)?;
        self.save(connection)
    }

    pub fn delete_in(&mut self, manager: &mut DatabaseManager) -> Result<bool> {
        let connection = self.resolve_connection(manager)?;
        self.delete(connection)
    }

    /// Inserts a new model or updates the dirty attributes of an existing one.
    pub fn save(&mut self, connection: &mut Connection) -> Result<bool> {
        let query = connection.table(self.table());
        let saved = if self.exists {
            if self.is_dirty() {
                self.perform_update(connection, query)?
            } else {
                true
            }
        } else {
            self.perform_insert(connection, query)?
        };
        if saved {
            self.sync_original();
        }
        Ok(saved)
    }

    /// Fills and saves an existing model, `false` when the model does not exist.
    pub fn update(&mut self, connection: &mut Connection, attributes: Record) -> Result<bool> {
        if !self.exists {
            return Ok(false);
        }
        self.fill(attributes);
        self.save(connection)
    }

    /// Deletes the row the model was loaded from, `false` when it does not exist.
    pub fn delete(&mut self, connection: &mut Connection) -> Result<bool> {
        let query = self.set_keys_for_save_query(connection.table(self.table()))?;
        if !self.exists {
            return Ok(false);
        }
        query.delete(connection)?;
        self.exists = false;
        Ok(true)
    }

    fn perform_update(&mut self, connection: &mut Connection, query: QueryBuilder) -> Result<bool> {
        if self.definition.timestamps {
            self.attributes.set(UPDATED_AT, fresh_timestamp());
        }
        let dirty = self.dirty();
        if !dirty.is_empty() {
            self.set_keys_for_save_query(query)?
                .update(connection, dirty)?;
            self.attributes.sync_changes();
        }
        Ok(true)
    }

    fn perform_insert(&mut self, connection: &mut Connection, query: QueryBuilder) -> Result<bool> {
        if self.definition.timestamps {
            let now = fresh_timestamp();
            self.attributes.set(CREATED_AT, now);
            self.attributes.set(UPDATED_AT, now);
        }
        let attributes = self.attributes().clone();
        if self.definition.incrementing {
            query.insert(connection, vec![attributes])?;
            if let (Some(key), Some(id)) = (self.key_name(), connection.last_insert_id()) {
                let key = key.to_string();
                self.attributes.set(key, id);
            }
        } else {
            if attributes.is_empty() {
                return Ok(true);
            }
            query.insert(connection, vec![attributes])?;
        }
        self.exists = true;
        Ok(true)
    }

    /// Constrains `query` on the primary key value the model was loaded with.
    fn set_keys_for_save_query(&self, query: QueryBuilder) -> Result<QueryBuilder> {
        let Some(key) = self.key_name() else {
            return Err(DatabaseError::MissingPrimaryKey(self.table().into()).into());
        };
        let value = self
            .original()
            .get(key)
            .or_else(|| self.attributes.get(key))
            .cloned()
            .unwrap_or_default();
        Ok(query.where_eq(key, value))
    }
}

/// Current UTC time, to the second.
fn fresh_timestamp() -> PrimitiveDateTime {
    let now = OffsetDateTime::now_utc();
    let time = now.time().replace_nanosecond(0).unwrap_or(now.time());
    PrimitiveDateTime::new(now.date(), time)
}

impl ToArray for Model {
    fn to_array(&self) -> Record {
        self.to_map()
    }
    fn column(&self, name: &str) -> Value {
        self.get(name).cloned().unwrap_or_default()
    }
}

impl Collection<Model> {
    pub fn set_visible<K: Into<String> + Clone>(&mut self, keys: &[K]) -> &mut Self {
        self.each(|v| {
            v.set_visible(keys.iter().cloned());
        })
    }

    pub fn set_hidden<K: Into<String> + Clone>(&mut self, keys: &[K]) -> &mut Self {
        self.each(|v| {
            v.set_hidden(keys.iter().cloned());
        })
    }
}
