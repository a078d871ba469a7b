#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry_core::{
        Clauses, FullTextMode, FullTextOptions, Grammar, QueryBuilder, Record, Value,
    };
    use quarry_mysql::MySqlGrammar;
    use std::sync::Arc;

    fn query(table: &str) -> QueryBuilder {
        QueryBuilder::new(Arc::new(MySqlGrammar::new())).from(table)
    }

    fn record(values: &[(&str, Value)]) -> Record {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn select_with_backticks() {
        let query = query("users")
            .select(["id", "name"])
            .where_("votes", ">", 100)
            .unwrap()
            .order_by("name", "asc")
            .unwrap()
            .limit(10)
            .offset(5);
        assert_eq!(
            query.to_sql(),
            "SELECT `id`, `name` FROM `users` WHERE `votes` > ? ORDER BY `name` ASC LIMIT 10 OFFSET 5"
        );
        assert_eq!(query.bindings(), vec![Value::from(100)]);
    }

    #[test]
    fn identifiers_are_escaped() {
        assert_eq!(query("weird`name").to_sql(), "SELECT * FROM `weird``name`");
        let grammar = MySqlGrammar::new();
        assert_eq!(grammar.wrap("posts.*"), "`posts`.*");
        assert_eq!(grammar.wrap("u.id as uid"), "`u`.`id` AS `uid`");
    }

    #[test]
    fn aliases_and_prefix() {
        assert_eq!(
            query("users as u").select(["u.id as uid"]).to_sql(),
            "SELECT `u`.`id` AS `uid` FROM `users` AS `u`"
        );
        let prefixed = QueryBuilder::new(Arc::new(MySqlGrammar::with_table_prefix("app_")))
            .from("users as u")
            .select(["u.name"]);
        assert_eq!(
            prefixed.to_sql(),
            "SELECT `app_u`.`name` FROM `app_users` AS `app_u`"
        );
    }

    #[test]
    fn sounds_like_is_an_operator() {
        let query = query("users").where_("name", "sounds like", "Jon").unwrap();
        assert_eq!(query.to_sql(), "SELECT * FROM `users` WHERE `name` sounds like ?");
        assert_eq!(query.bindings(), vec![Value::from("Jon")]);
    }

    #[test]
    fn full_text() {
        let natural = query("posts")
            .where_full_text(["title", "body"], "rust", FullTextOptions::default())
            .unwrap();
        assert_eq!(
            natural.to_sql(),
            "SELECT * FROM `posts` WHERE match (`title`, `body`) against (? in natural language mode)"
        );
        assert_eq!(natural.bindings(), vec![Value::from("rust")]);

        let expanded = query("posts")
            .where_full_text(
                "title",
                "rust",
                FullTextOptions {
                    mode: FullTextMode::NaturalLanguage,
                    expanded: true,
                },
            )
            .unwrap();
        assert_eq!(
            expanded.to_sql(),
            "SELECT * FROM `posts` WHERE match (`title`) against (? in natural language mode with query expansion)"
        );

        let boolean = query("posts")
            .where_eq("published", true)
            .where_full_text(
                ["title"],
                "+rust -java",
                FullTextOptions {
                    mode: FullTextMode::Boolean,
                    expanded: true,
                },
            )
            .unwrap();
        assert_eq!(
            boolean.to_sql(),
            indoc! {"
                SELECT * FROM `posts` WHERE `published` = ? \
                and match (`title`) against (? in boolean mode)
            "}
            .trim()
        );
    }

    #[test]
    fn random_order() {
        assert_eq!(
            query("users").in_random_order("").to_sql(),
            "SELECT * FROM `users` ORDER BY RAND()"
        );
        assert_eq!(
            query("users").in_random_order("42").to_sql(),
            "SELECT * FROM `users` ORDER BY RAND(42)"
        );
    }

    #[test]
    fn insert_defaults() {
        let grammar = MySqlGrammar::new();
        assert_eq!(
            grammar.compile_insert(&Clauses::new("users"), &[]),
            "INSERT INTO `users` () VALUES ()"
        );
        let rows = [
            record(&[("email", "a@b.c".into()), ("name", "Ann".into())]),
            record(&[("email", "d@e.f".into()), ("name", "Bob".into())]),
        ];
        assert_eq!(
            grammar.compile_insert(&Clauses::new("users"), &rows),
            "INSERT INTO `users` (`email`, `name`) VALUES (?, ?), (?, ?)"
        );
    }

    #[test]
    fn update_with_order_and_limit() {
        let grammar = MySqlGrammar::new();
        let query = query("users")
            .where_eq("active", 0)
            .order_by("id", "asc")
            .unwrap()
            .limit(5);
        let values = record(&[("name", "Ann".into())]);
        assert_eq!(
            grammar.compile_update(query.clauses(), &values),
            "UPDATE `users` SET `name` = ? WHERE `active` = ? ORDER BY `id` ASC LIMIT 5"
        );
        assert_eq!(
            grammar.prepare_bindings_for_update(query.clauses(), &values),
            vec![Value::from("Ann"), Value::from(0)]
        );
    }

    #[test]
    fn update_with_join_skips_order_and_limit() {
        let grammar = MySqlGrammar::new();
        let query = query("users")
            .join("posts", "users.id", "=", "posts.user_id")
            .where_eq("posts.draft", 1)
            .order_by_desc("users.id")
            .limit(3);
        let values = record(&[("users.active", 0.into())]);
        assert_eq!(
            grammar.compile_update(query.clauses(), &values),
            indoc! {"
                UPDATE `users` INNER JOIN `posts` ON `users`.`id` = `posts`.`user_id` \
                SET `users`.`active` = ? WHERE `posts`.`draft` = ?
            "}
            .trim()
        );
    }

    #[test]
    fn update_lists_become_json() {
        let grammar = MySqlGrammar::new();
        let values = record(&[(
            "tags",
            Value::from(vec!["a".to_string(), "b".to_string()]),
        )]);
        let bindings =
            grammar.prepare_bindings_for_update(&Clauses::new("posts"), &values);
        assert_eq!(bindings, vec![Value::from(r#"["a","b"]"#)]);
    }

    #[test]
    fn delete_with_order_and_limit() {
        let grammar = MySqlGrammar::new();
        let query = query("logs")
            .where_("id", ">", 10)
            .unwrap()
            .order_by_desc("id")
            .limit(1);
        assert_eq!(
            grammar.compile_delete(query.clauses()),
            "DELETE FROM `logs` WHERE `id` > ? ORDER BY `id` DESC LIMIT 1"
        );
    }

    #[test]
    fn ordered_mutations_bind_orders_last() {
        let grammar = MySqlGrammar::new();
        let query = query("items")
            .where_eq("kind", 5)
            .order_by_raw("FIELD(id, ?)", &[Value::from(9)])
            .limit(2);
        let values = record(&[("name", "x".into())]);
        assert_eq!(
            grammar.compile_update(query.clauses(), &values),
            "UPDATE `items` SET `name` = ? WHERE `kind` = ? ORDER BY FIELD(id, ?) LIMIT 2"
        );
        assert_eq!(
            grammar.prepare_bindings_for_update(query.clauses(), &values),
            vec![Value::from("x"), Value::from(5), Value::from(9)]
        );
        assert_eq!(
            grammar.prepare_bindings_for_delete(query.clauses()),
            vec![Value::from(5), Value::from(9)]
        );

        let joined = query
            .join_where("tags", "tags.name", "=", "rust")
            .order_by_raw("FIELD(tags.id, ?)", &[Value::from(3)]);
        assert_eq!(
            grammar.compile_delete(joined.clauses()),
            indoc! {"
                DELETE `items` FROM `items` INNER JOIN `tags` ON `tags`.`name` = ? \
                WHERE `kind` = ?
            "}
            .trim()
        );
        assert_eq!(
            grammar.prepare_bindings_for_delete(joined.clauses()),
            vec![Value::from("rust"), Value::from(5)]
        );
        assert_eq!(
            grammar.prepare_bindings_for_update(joined.clauses(), &values),
            vec![Value::from("rust"), Value::from("x"), Value::from(5)]
        );
    }

    #[test]
    fn exists() {
        let grammar = MySqlGrammar::new();
        let query = query("users").where_eq("id", 1);
        assert_eq!(
            grammar.compile_exists(query.clauses()),
            "SELECT EXISTS(SELECT * FROM `users` WHERE `id` = ?) AS `exists`"
        );
    }
}
