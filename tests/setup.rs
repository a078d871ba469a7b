#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry::{
        DatabaseConfig, DatabaseError, DatabaseManager, ErrorKind,
        mysql::{MySqlConnector, session_statements},
    };
    use quarry_tests::{Script, ScriptedConnector, init_logs};

    const CONFIG: &str = indoc! {r#"
        default = "app"

        [connections.app]
        driver = "scripted"
        database = "shop"
        prefix = "shop_"
        charset = "utf8mb4"
        collation = "utf8mb4_unicode_ci"
        timezone = "+00:00"
        version = "5.7.44"

        [connections.warehouse]
        driver = "sqlite"
    "#};

    #[test]
    fn manager_from_toml() {
        init_logs();
        let script = Script::new();
        let mut manager = DatabaseManager::new(DatabaseConfig::from_toml(CONFIG).unwrap())
            .with_connector(MySqlConnector::new())
            .with_connector(ScriptedConnector::new(script.clone()));

        let connection = manager.connection().unwrap();
        assert_eq!(connection.database(), "shop");
        assert_eq!(
            connection.table("orders").select(["orders.id"]).to_sql(),
            r#"SELECT "shop_orders"."id" FROM "shop_orders""#
        );

        let error = manager.connection_named("warehouse").unwrap_err();
        assert!(error.is_configuration_error());
        assert!(matches!(
            error.downcast_ref::<DatabaseError>(),
            Some(DatabaseError::UnsupportedDriver(driver)) if driver == "sqlite"
        ));
    }

    #[test]
    fn session_for_configured_version() {
        let config = DatabaseConfig::from_toml(CONFIG).unwrap();
        let app = config.connection("app").unwrap();
        assert_eq!(
            session_statements(app, None),
            vec![
                "set names 'utf8mb4' collate 'utf8mb4_unicode_ci'".to_string(),
                r#"set time_zone="+00:00""#.to_string(),
                "set session sql_mode='ONLY_FULL_GROUP_BY,STRICT_TRANS_TABLES,NO_ZERO_IN_DATE,NO_ZERO_DATE,ERROR_FOR_DIVISION_BY_ZERO,NO_AUTO_CREATE_USER,NO_ENGINE_SUBSTITUTION'".to_string(),
            ]
        );
    }
}
