use quarry_core::{Connection, Record, Value};
use std::collections::BTreeMap;

pub fn simple(connection: &mut Connection) {
    // Setup
    connection
        .statement("DROP TABLE IF EXISTS quarry_simple", &[])
        .expect("Failed to drop the quarry_simple table");
    connection
        .statement(
            "CREATE TABLE quarry_simple (id INT AUTO_INCREMENT PRIMARY KEY, name VARCHAR(64) NOT NULL, votes INT NULL, note VARCHAR(255) NULL)",
            &[],
        )
        .expect("Failed to create the quarry_simple table");

    // Insert
    let rows: Vec<Record> = [("Ann", 10), ("Bob", 20), ("Cid", 30), ("Dee", 40)]
        .into_iter()
        .map(|(name, votes)| {
            BTreeMap::from([
                ("name".to_string(), Value::from(name)),
                ("votes".to_string(), Value::from(votes)),
            ])
        })
        .collect();
    let inserted = connection
        .table("quarry_simple")
        .insert(connection, rows)
        .expect("Failed to insert the rows");
    assert!(inserted);
    assert!(connection.records_modified());

    // Select
    let names = connection
        .table("quarry_simple")
        .where_("votes", ">", 15)
        .expect("Valid operator")
        .order_by("votes", "desc")
        .expect("Valid direction")
        .get(connection)
        .expect("Failed to select")
        .pluck("name");
    assert_eq!(
        names,
        vec![Value::from("Dee"), Value::from("Cid"), Value::from("Bob")]
    );

    let count = connection
        .table("quarry_simple")
        .where_in("name", ["Ann", "Bob"])
        .count(connection)
        .expect("Failed to count");
    assert_eq!(count, 2);

    let nothing = connection
        .table("quarry_simple")
        .where_in("id", Vec::<i64>::new())
        .get(connection)
        .expect("Failed to select with an empty in list");
    assert!(nothing.is_empty());

    let value = connection
        .table("quarry_simple")
        .where_eq("name", "Cid")
        .value(connection, "votes")
        .expect("Failed to read a value")
        .expect("Cid exists");
    assert_eq!(value, Value::from(30));

    assert!(
        connection
            .table("quarry_simple")
            .where_null("note")
            .exists(connection)
            .expect("Failed to query exists")
    );

    // Update
    let updated = connection
        .table("quarry_simple")
        .where_("votes", "<", 25)
        .expect("Valid operator")
        .update(
            connection,
            BTreeMap::from([("note".to_string(), Value::from("low"))]),
        )
        .expect("Failed to update");
    assert_eq!(updated, 2);
    let low = connection
        .table("quarry_simple")
        .where_not_null("note")
        .count(connection)
        .expect("Failed to count");
    assert_eq!(low, 2);

    // Delete
    let deleted = connection
        .table("quarry_simple")
        .where_eq("note", "low")
        .delete(connection)
        .expect("Failed to delete");
    assert_eq!(deleted, 2);
    let left = connection
        .table("quarry_simple")
        .count(connection)
        .expect("Failed to count");
    assert_eq!(left, 2);
}
