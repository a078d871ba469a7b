#[cfg(test)]
mod tests {
    use quarry_core::{Connection, DatabaseError, ErrorKind, GenericGrammar, Value};
    use quarry_tests::{Executed, Script, init_logs, silent_logs};
    use std::sync::Arc;

    fn connection() -> (Script, Connection) {
        init_logs();
        let script = Script::new();
        let connection = script.connection(Arc::new(GenericGrammar::new()));
        (script, connection)
    }

    #[test]
    fn select_through_the_driver() {
        let (script, mut connection) = connection();
        script.push_rows(
            &["id", "name"],
            vec![
                vec![Value::from(1), Value::from("Ann")],
                vec![Value::from(2), Value::from("Bob")],
            ],
        );
        let rows = connection
            .table("users")
            .where_eq("active", true)
            .get(&mut connection)
            .expect("Failed to select");
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.keys(), vec!["id".to_string(), "name".to_string()]);
        assert_eq!(rows[1].get_column("name"), Some(&Value::from("Bob")));
        assert_eq!(
            script.last(),
            Some(Executed {
                sql: r#"SELECT * FROM "users" WHERE "active" = ?"#.into(),
                // Booleans travel as integers
                bindings: vec![Value::Int32(Some(1))],
            })
        );
    }

    #[test]
    fn insert_tracks_the_generated_id() {
        let (script, mut connection) = connection();
        assert_eq!(connection.last_insert_id(), None);
        assert!(!connection.records_modified());
        script.push_affected(1, Some(42));
        assert!(
            connection
                .insert(r#"INSERT INTO "users" ("name") VALUES (?)"#, &[Value::from("Ann")])
                .unwrap()
        );
        assert_eq!(connection.last_insert_id(), Some(42));
        assert!(connection.records_modified());

        connection.forget_records_modified();
        script.push_affected(0, Some(0));
        connection
            .insert(r#"INSERT INTO "users" DEFAULT VALUES"#, &[])
            .unwrap();
        assert_eq!(connection.last_insert_id(), None);
        assert!(!connection.records_modified());
    }

    #[test]
    fn affected_rows() {
        let (script, mut connection) = connection();
        script.push_affected(3, None).push_affected(0, None);
        assert_eq!(
            connection
                .update(r#"UPDATE "users" SET "a" = ?"#, &[Value::from(1)])
                .unwrap(),
            3
        );
        assert!(connection.records_modified());
        assert_eq!(connection.delete(r#"DELETE FROM "users""#, &[]).unwrap(), 0);
        assert!(connection.statement("set names 'utf8mb4'", &[]).unwrap());
        assert_eq!(script.statements().len(), 3);
    }

    #[test]
    fn failures_carry_the_statement() {
        let (script, mut connection) = connection();
        script.fail_next("Table 'shop.t' doesn't exist");
        let error = silent_logs! {
            connection
                .select("SELECT * FROM t WHERE id = ?", &[Value::from(5)])
                .unwrap_err()
        };
        assert!(error.is_execution_error());
        let Some(DatabaseError::QueryExecution(e)) = error.downcast_ref::<DatabaseError>() else {
            panic!("Expected a query execution error, found {error:#}");
        };
        assert_eq!(e.statement, "SELECT * FROM t WHERE id = ?");
        assert_eq!(e.bindings, "5");
        assert_eq!(
            error.to_string(),
            "Table 'shop.t' doesn't exist (SQL: SELECT * FROM t WHERE id = ?) (Bindings: 5)"
        );
        // The script is consumed, the next statement succeeds
        assert!(connection.select("SELECT 1", &[]).is_ok());
    }

    #[test]
    fn placeholder_count_mismatch() {
        let (script, mut connection) = connection();
        let error = silent_logs! {
            connection.select("SELECT ? + ?", &[Value::from(1)]).unwrap_err()
        };
        assert!(error.is_execution_error());
        assert!(format!("{error:#}").contains("expects 2 parameters but 1 were bound"));
        assert!(script.executed().is_empty());
    }

    #[test]
    fn disconnect() {
        let (script, mut connection) = connection();
        assert!(connection.is_connected());
        assert_eq!(connection.driver_name(), Some("scripted"));
        assert_eq!(connection.server_version().unwrap(), "8.0.36");
        connection.disconnect().unwrap();
        assert!(script.is_closed());
        assert!(!connection.is_connected());
        assert_eq!(connection.driver_name(), None);
        let error = connection.select("SELECT 1", &[]).unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DatabaseError>(),
            Some(DatabaseError::Disconnected(name)) if name == "scripted"
        ));
        // Disconnecting twice is fine
        connection.disconnect().unwrap();
    }

    #[test]
    fn drop_closes_the_driver() {
        let (script, connection) = connection();
        assert!(!script.is_closed());
        drop(connection);
        assert!(script.is_closed());
    }

    #[test]
    fn builders_share_the_grammar() {
        let (_script, connection) = connection();
        let query = connection.table_as("users", "u").select(["u.id"]);
        assert_eq!(query.to_sql(), r#"SELECT "u"."id" FROM "users" AS "u""#);
        assert_eq!(query.grammar().name(), connection.grammar().name());
        assert_eq!(connection.raw("NOW()").as_str(), "NOW()");
        assert_eq!(connection.query().to_sql(), "SELECT *");
    }
}
