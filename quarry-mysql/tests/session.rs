#[cfg(test)]
mod tests {
    use quarry_core::{ConnectionConfig, Connector, DatabaseError};
    use quarry_mysql::{MySqlConnector, parse_version, session_statements};
    use quarry_tests::{init_logs, silent_logs};

    const STRICT: &str = "set session sql_mode='ONLY_FULL_GROUP_BY,STRICT_TRANS_TABLES,NO_ZERO_IN_DATE,NO_ZERO_DATE,ERROR_FOR_DIVISION_BY_ZERO,NO_ENGINE_SUBSTITUTION'";
    const STRICT_LEGACY: &str = "set session sql_mode='ONLY_FULL_GROUP_BY,STRICT_TRANS_TABLES,NO_ZERO_IN_DATE,NO_ZERO_DATE,ERROR_FOR_DIVISION_BY_ZERO,NO_AUTO_CREATE_USER,NO_ENGINE_SUBSTITUTION'";

    #[test]
    fn default_session() {
        let config = ConnectionConfig::default();
        assert_eq!(
            session_statements(&config, Some("8.0.36")),
            vec!["set names 'utf8mb4'".to_string(), STRICT.to_string()]
        );
    }

    #[test]
    fn strict_mode_depends_on_version() {
        let config = ConnectionConfig::default();
        assert_eq!(session_statements(&config, Some("5.7.44-log"))[1], STRICT_LEGACY);
        assert_eq!(session_statements(&config, Some("8.0.10"))[1], STRICT_LEGACY);
        assert_eq!(session_statements(&config, Some("8.0.11"))[1], STRICT);
        assert_eq!(session_statements(&config, Some("10.11.2-MariaDB"))[1], STRICT);
        assert_eq!(session_statements(&config, None)[1], STRICT);
        assert_eq!(session_statements(&config, Some("unknown"))[1], STRICT_LEGACY);

        let pinned = ConnectionConfig {
            version: Some("5.6.51".into()),
            ..Default::default()
        };
        assert_eq!(session_statements(&pinned, Some("8.0.36"))[1], STRICT_LEGACY);
        let garbled = ConnectionConfig {
            version: Some("latest".into()),
            ..Default::default()
        };
        assert_eq!(session_statements(&garbled, Some("8.0.36"))[1], STRICT_LEGACY);
    }

    #[test]
    fn full_session() {
        let config = ConnectionConfig {
            charset: Some("utf8mb4".into()),
            collation: Some("utf8mb4_unicode_ci".into()),
            timezone: Some("+00:00".into()),
            strict: Some(false),
            ..Default::default()
        };
        assert_eq!(
            session_statements(&config, None),
            vec![
                "set names 'utf8mb4' collate 'utf8mb4_unicode_ci'".to_string(),
                "set time_zone=\"+00:00\"".to_string(),
                "set session sql_mode='NO_ENGINE_SUBSTITUTION'".to_string(),
            ]
        );
    }

    #[test]
    fn custom_modes_win() {
        let config = ConnectionConfig {
            charset: None,
            strict: Some(true),
            modes: Some(vec!["STRICT_TRANS_TABLES".into(), "NO_ZERO_DATE".into()]),
            ..Default::default()
        };
        assert_eq!(
            session_statements(&config, Some("5.7.0")),
            vec!["set session sql_mode='STRICT_TRANS_TABLES,NO_ZERO_DATE'".to_string()]
        );
    }

    #[test]
    fn untouched_session() {
        let config = ConnectionConfig {
            charset: None,
            strict: None,
            ..Default::default()
        };
        assert!(session_statements(&config, Some("8.0.36")).is_empty());
    }

    #[test]
    fn versions() {
        assert_eq!(parse_version("8.0.36"), Some((8, 0, 36)));
        assert_eq!(parse_version("5.7.44-log"), Some((5, 7, 44)));
        assert_eq!(parse_version("10.11.2-MariaDB-1:10.11.2+maria"), Some((10, 11, 2)));
        assert_eq!(parse_version("8.1"), Some((8, 1, 0)));
        assert_eq!(parse_version("unknown"), None);
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn wrong_driver() {
        init_logs();
        let connector = MySqlConnector::new();
        assert_eq!(connector.driver_name(), "mysql");
        let config = ConnectionConfig {
            driver: "postgres".into(),
            ..Default::default()
        };
        silent_logs! {
            let error = connector.connect("pg", &config).unwrap_err();
            assert!(error.downcast_ref::<DatabaseError>().is_none());
            assert!(format!("{:#}", error).contains("must start with `mysql://`"));
        }
    }
}
