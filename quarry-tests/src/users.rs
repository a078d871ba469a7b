use quarry_core::{
    Connection, Entity, Model, ModelDefinition, Record, Result, Value,
};
use std::collections::BTreeMap;

struct QuarryUser(Model);

impl Entity for QuarryUser {
    fn definition() -> ModelDefinition {
        ModelDefinition::of::<QuarryUser>()
            .fillable(["name", "email"])
            .hidden(["password"])
    }
    fn from_model(model: Model) -> Result<Self> {
        Ok(QuarryUser(model))
    }
    fn model(&self) -> &Model {
        &self.0
    }
    fn model_mut(&mut self) -> &mut Model {
        &mut self.0
    }
}

fn attributes(values: &[(&str, Value)]) -> Record {
    values
        .iter()
        .map(|(k, v)| (k.to_string(), v.clone()))
        .collect::<BTreeMap<_, _>>()
}

pub fn users(connection: &mut Connection) {
    // Setup
    connection
        .statement("DROP TABLE IF EXISTS quarry_users", &[])
        .expect("Failed to drop the quarry_users table");
    connection
        .statement(
            "CREATE TABLE quarry_users (id INT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(64) NOT NULL, email VARCHAR(128) NULL, password VARCHAR(64) NULL, created_at DATETIME NULL, updated_at DATETIME NULL)",
            &[],
        )
        .expect("Failed to create the quarry_users table");

    // Create, password is not fillable
    let user = QuarryUser::create(
        connection,
        attributes(&[
            ("name", "Ann".into()),
            ("email", "ann@example.com".into()),
            ("password", "secret".into()),
        ]),
    )
    .expect("Failed to create the user");
    let id = user.model().key().cloned().expect("The id was assigned");
    assert!(user.model().exists());
    assert!(user.model().get("password").is_none());
    assert!(user.model().get("created_at").is_some());

    // Find and update
    let mut found = QuarryUser::find(connection, id.clone())
        .expect("Failed to find the user")
        .expect("The user exists");
    assert!(!found.model().is_dirty());
    found.model_mut().set("name", "Bob");
    assert!(found.model().is_dirty_any(["name"]));
    assert!(found.save(connection).expect("Failed to save the user"));
    assert!(!found.model().is_dirty());
    let name: String = QuarryUser::find(connection, id.clone())
        .expect("Failed to find the user")
        .expect("The user exists")
        .model()
        .get_as("name")
        .expect("The name is a string");
    assert_eq!(name, "Bob");

    // Serialisation hides the password
    found.model_mut().force_fill(attributes(&[("password", "hash".into())]));
    assert!(!found.model().to_map().contains_key("password"));

    // Delete
    assert!(found.delete(connection).expect("Failed to delete the user"));
    assert!(!found.model().exists());
    assert!(
        QuarryUser::find(connection, id)
            .expect("Failed to query the user")
            .is_none()
    );
    let all = QuarryUser::all(connection).expect("Failed to load the users");
    assert!(all.is_empty());
}
