use crate::{
    Collection, Connection, DatabaseManager, Model, ModelDefinition, OrmBuilder, Record, Result,
    Value,
};

/// Typed wrapper over a [`Model`].
///
/// ```ignore
/// struct User(Model);
///
/// impl Entity for User {
///     fn definition() -> ModelDefinition {
///         ModelDefinition::of::<User>().fillable(["name", "email"])
///     }
///     fn from_model(model: Model) -> Result<Self> {
///         Ok(User(model))
///     }
///     fn model(&self) -> &Model {
///         &self.0
///     }
///     fn model_mut(&mut self) -> &mut Model {
///         &mut self.0
///     }
/// }
///
/// let user = User::find(&mut connection, 1)?;
/// let user = User::find_in(&mut manager, 1)?;
/// ```
pub trait Entity: Sized {
    fn definition() -> ModelDefinition;

    fn from_model(model: Model) -> Result<Self>;

    fn model(&self) -> &Model;

    fn model_mut(&mut self) -> &mut Model;

    /// New unsaved entity.
    fn new_entity() -> Result<Self> {
        Self::from_model(Model::new(Self::definition()))
    }

    fn query(connection: &Connection) -> OrmBuilder {
        OrmBuilder::new(connection.query(), Self::definition())
    }

    fn from_models(models: Collection<Model>) -> Result<Collection<Self>> {
        models.into_iter().map(Self::from_model).collect()
    }

    fn all(connection: &mut Connection) -> Result<Collection<Self>> {
        Self::from_models(Self::query(connection).get(connection)?)
    }

    fn find(connection: &mut Connection, id: impl Into<Value>) -> Result<Option<Self>> {
        Self::query(connection)
            .find(connection, id)?
            .map(Self::from_model)
            .transpose()
    }

    fn first(connection: &mut Connection) -> Result<Option<Self>> {
        Self::query(connection)
            .first(connection)?
            .map(Self::from_model)
            .transpose()
    }

    fn create(connection: &mut Connection, attributes: Record) -> Result<Self> {
        Self::from_model(Self::query(connection).create(connection, attributes)?)
    }

    /// Connection named by the definition, the current one of `manager` otherwise.
    fn resolve_connection(manager: &mut DatabaseManager) -> Result<&mut Connection> {
        let definition = Self::definition();
        manager.connection_for(definition.connection.as_deref())
    }

    fn find_in(manager: &mut DatabaseManager, id: impl Into<Value>) -> Result<Option<Self>> {
        Self::find(Self::resolve_connection(manager)?, id)
    }

    fn create_in(manager: &mut DatabaseManager, attributes: Record) -> Result<Self> {
        Self::create(Self::resolve_connection(manager)?, attributes)
    }

    fn save_in(&mut self, manager: &mut DatabaseManager) -> Result<bool> {
        self.model_mut().save_in(manager)
    }

    fn save(&mut self, connection: &mut Connection) -> Result<bool> {
        self.model_mut().save(connection)
    }

    fn delete(&mut self, connection: &mut Connection) -> Result<bool> {
        self.model_mut().delete(connection)
    }
}
