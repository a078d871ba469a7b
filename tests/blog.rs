#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry::{
        Connection, Entity, FullTextMode, FullTextOptions, Model, ModelDefinition, Record,
        Result, Value, mysql::MySqlGrammar,
    };
    use quarry_tests::{Script, init_logs};
    use std::sync::Arc;
    use time::{PrimitiveDateTime, macros::datetime};

    struct Post(Model);

    impl Entity for Post {
        fn definition() -> ModelDefinition {
            ModelDefinition::of::<Post>()
                .fillable(["title", "body", "tags"])
                .hidden(["body"])
        }
        fn from_model(model: Model) -> Result<Self> {
            Ok(Post(model))
        }
        fn model(&self) -> &Model {
            &self.0
        }
        fn model_mut(&mut self) -> &mut Model {
            &mut self.0
        }
    }

    fn blog() -> (Script, Connection) {
        init_logs();
        let script = Script::new();
        let connection = script.connection(Arc::new(MySqlGrammar::with_table_prefix("blog_")));
        (script, connection)
    }

    fn record(values: &[(&str, Value)]) -> Record {
        values
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn publish_and_edit() {
        let (script, mut connection) = blog();
        script.push_affected(1, Some(11));
        let mut post = Post::create(
            &mut connection,
            record(&[
                ("title", "Hello".into()),
                ("body", "First post".into()),
                ("author_id", 99.into()),
            ]),
        )
        .unwrap();
        assert_eq!(
            script.last().unwrap().sql,
            "INSERT INTO `blog_posts` (`body`, `created_at`, `title`, `updated_at`) VALUES (?, ?, ?, ?)"
        );
        assert_eq!(post.model().key(), Some(&Value::from(11)));
        assert!(post.model().get("author_id").is_none());
        assert_eq!(
            post.model().to_map().keys().collect::<Vec<_>>(),
            vec!["created_at", "id", "title", "updated_at"]
        );

        script.push_affected(1, None);
        let tags = vec!["rust".to_string(), "sql".to_string()];
        post.model_mut().fill(record(&[("tags", tags.into())]));
        assert!(post.save(&mut connection).unwrap());
        let executed = script.last().unwrap();
        assert_eq!(
            executed.sql,
            "UPDATE `blog_posts` SET `tags` = ?, `updated_at` = ? WHERE `id` = ?"
        );
        assert_eq!(executed.bindings[0], Value::from(r#"["rust","sql"]"#));
        assert_eq!(executed.bindings[2], Value::from(11));
    }

    #[test]
    fn search() {
        let (script, mut connection) = blog();
        script.push_rows(
            &["id", "title", "created_at"],
            vec![vec![
                3.into(),
                "Query builders".into(),
                datetime!(2024-03-01 08:30).into(),
            ]],
        );
        let posts = Post::query(&connection)
            .try_map_query(|q| {
                q.where_full_text(
                    ["title", "body"],
                    "builder",
                    FullTextOptions {
                        mode: FullTextMode::Boolean,
                        expanded: false,
                    },
                )
            })
            .unwrap()
            .where_("title", "sounds like", "query")
            .unwrap()
            .latest()
            .limit(5)
            .get(&mut connection)
            .unwrap();
        assert_eq!(
            script.last().unwrap().sql,
            indoc! {"
                SELECT * FROM `blog_posts` WHERE match (`title`, `body`) against (? in boolean mode) \
                and `title` sounds like ? ORDER BY `created_at` DESC LIMIT 5
            "}
            .trim()
        );
        assert_eq!(posts.len(), 1);
        let created: PrimitiveDateTime = posts[0].get_as("created_at").unwrap();
        assert_eq!(created, datetime!(2024-03-01 08:30));
        assert_eq!(posts.implode("title", ""), "Query builders");
    }

    #[test]
    fn housekeeping() {
        let (script, mut connection) = blog();
        script.push_affected(2, None);
        let deleted = connection
            .table("posts")
            .where_("created_at", "<", datetime!(2020-01-01 0:00))
            .unwrap()
            .order_by("id", "asc")
            .unwrap()
            .limit(2)
            .delete(&mut connection)
            .unwrap();
        assert_eq!(deleted, 2);
        assert_eq!(
            script.last().unwrap().sql,
            "DELETE FROM `blog_posts` WHERE `created_at` < ? ORDER BY `id` ASC LIMIT 2"
        );

        let preview = connection
            .table("posts")
            .where_eq("author_id", 7)
            .where_in("status", ["draft", "hidden"])
            .to_raw_sql();
        assert_eq!(
            preview,
            "SELECT * FROM `blog_posts` WHERE `author_id` = 7 and `status` in ('draft', 'hidden')"
        );
    }
}
