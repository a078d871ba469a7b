#[cfg(test)]
mod tests {
    use indoc::indoc;
    use quarry_core::{
        DatabaseError, ErrorKind, FullTextOptions, GenericGrammar, QueryBuilder, Value,
    };
    use std::sync::Arc;

    fn query(table: &str) -> QueryBuilder {
        QueryBuilder::new(Arc::new(GenericGrammar::new())).from(table)
    }

    #[test]
    fn basic_where() {
        let query = query("users")
            .where_("votes", ">", 100)
            .unwrap()
            .or_where("name", "=", "John")
            .unwrap();
        assert_eq!(
            query.to_sql(),
            r#"SELECT * FROM "users" WHERE "votes" > ? or "name" = ?"#
        );
        assert_eq!(query.bindings(), vec![Value::from(100), Value::from("John")]);
    }

    #[test]
    fn unknown_operator_is_the_value() {
        let query = query("users").where_("name", "John", Value::Null).unwrap();
        assert_eq!(query.to_sql(), r#"SELECT * FROM "users" WHERE "name" = ?"#);
        assert_eq!(query.bindings(), vec![Value::from("John")]);
    }

    #[test]
    fn null_values() {
        let query = query("users")
            .where_("deleted_at", "=", Value::Null)
            .unwrap()
            .or_where("banned_at", "<>", Value::Varchar(None))
            .unwrap()
            .where_eq("parent_id", Option::<i64>::None);
        assert_eq!(
            query.to_sql(),
            indoc! {r#"
                SELECT * FROM "users" WHERE "deleted_at" is null \
                or "banned_at" is not null and "parent_id" is null
            "#}
            .trim()
        );
        assert!(query.bindings().is_empty());

        let error = self::query("users")
            .where_("deleted_at", ">", Value::Null)
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DatabaseError>(),
            Some(DatabaseError::IllegalOperatorAndValue { operator }) if operator == ">"
        ));
        assert!(error.is_build_error());
    }

    #[test]
    fn negated_wheres() {
        let query = query("users")
            .where_not("a", "=", 1)
            .unwrap()
            .where_not("b", "=", 2)
            .unwrap()
            .or_where_not("c", "like", "x%")
            .unwrap();
        assert_eq!(
            query.to_sql(),
            r#"SELECT * FROM "users" WHERE not "a" = ? and not "b" = ? or not "c" like ?"#
        );
    }

    #[test]
    fn list_values_bind_their_first_scalar() {
        let query = query("users").where_("id", "=", vec![7, 8]).unwrap();
        assert_eq!(query.to_sql(), r#"SELECT * FROM "users" WHERE "id" = ?"#);
        assert_eq!(query.bindings(), vec![Value::from(7)]);

        let empty = self::query("users")
            .where_("id", "=", Vec::<i64>::new())
            .unwrap()
            .or_where_eq("parent_id", Vec::<i64>::new());
        assert_eq!(
            empty.to_sql(),
            r#"SELECT * FROM "users" WHERE "id" is null or "parent_id" is null"#
        );
        assert!(empty.bindings().is_empty());
        assert!(
            self::query("users")
                .where_("id", ">", Vec::<i64>::new())
                .unwrap_err()
                .is_build_error()
        );
    }

    #[test]
    fn where_in() {
        let query = query("users")
            .where_in("id", [1, 2, 3])
            .or_where_not_in("role", ["admin", "root"]);
        assert_eq!(
            query.to_sql(),
            r#"SELECT * FROM "users" WHERE "id" in (?, ?, ?) or "role" not in (?, ?)"#
        );
        assert_eq!(query.bindings().len(), 5);

        let nested = self::query("users").where_in("id", [vec![1, 2], vec![3]]);
        assert_eq!(
            nested.to_sql(),
            r#"SELECT * FROM "users" WHERE "id" in (?, ?, ?)"#
        );
        assert_eq!(nested.bindings(), [1, 2, 3].map(Value::from).to_vec());
    }

    #[test]
    fn where_in_empty() {
        let query = query("users")
            .where_in("id", Vec::<i64>::new())
            .where_not_in("id", Vec::<i64>::new());
        assert_eq!(
            query.to_sql(),
            r#"SELECT * FROM "users" WHERE 0 = 1 and 1 = 1"#
        );
        assert!(query.bindings().is_empty());
    }

    #[test]
    fn where_null_and_columns() {
        let query = query("users")
            .where_null(["a", "b"])
            .or_where_not_null("c")
            .where_column("first_name", "=", "last_name")
            .or_where_column("updated_at", ">", "created_at");
        assert_eq!(
            query.to_sql(),
            indoc! {r#"
                SELECT * FROM "users" WHERE "a" is null and "b" is null or "c" is not null \
                and "first_name" = "last_name" or "updated_at" > "created_at"
            "#}
            .trim()
        );
        assert!(query.bindings().is_empty());

        let invalid = self::query("users").where_column("a", "b", "c");
        assert_eq!(invalid.to_sql(), r#"SELECT * FROM "users" WHERE "a" = "b""#);
    }

    #[test]
    fn raw_fragments() {
        let query = query("orders")
            .select_raw("price * ? as price_with_tax", &[Value::from(1.0825)])
            .where_raw("price > IF(state = 'TX', ?, 100)", &[Value::from(200)])
            .or_where_raw("id = ?", &[Value::from(1)]);
        assert_eq!(
            query.to_sql(),
            indoc! {r#"
                SELECT price * ? as price_with_tax FROM "orders" \
                WHERE price > IF(state = 'TX', ?, 100) or id = ?
            "#}
            .trim()
        );
        assert_eq!(
            query.bindings(),
            vec![Value::from(1.0825), Value::from(200), Value::from(1)]
        );

        let reselected = query.select(["id"]);
        assert_eq!(reselected.bindings(), vec![Value::from(200), Value::from(1)]);
    }

    #[test]
    fn from_raw_and_distinct() {
        let query = QueryBuilder::new(Arc::new(GenericGrammar::new()))
            .from_raw("(select * from logs where level = ?) as l", &[Value::from("error")])
            .select(["l.message"])
            .distinct()
            .where_eq("l.id", 3);
        assert_eq!(
            query.to_sql(),
            r#"SELECT DISTINCT "l"."message" FROM (select * from logs where level = ?) as l WHERE "l"."id" = ?"#
        );
        assert_eq!(query.bindings(), vec![Value::from("error"), Value::from(3)]);
    }

    #[test]
    fn joins() {
        let query = query("users")
            .join("contacts", "users.id", "=", "contacts.user_id")
            .left_join("orders", "users.id", "=", "orders.user_id")
            .right_join("teams as t", "users.team_id", "=", "t.id")
            .select(["users.*", "contacts.phone", "orders.price"]);
        assert_eq!(
            query.to_sql(),
            indoc! {r#"
                SELECT "users".*, "contacts"."phone", "orders"."price" FROM "users" \
                INNER JOIN "contacts" ON "users"."id" = "contacts"."user_id" \
                LEFT JOIN "orders" ON "users"."id" = "orders"."user_id" \
                RIGHT JOIN "teams" AS "t" ON "users"."team_id" = "t"."id"
            "#}
            .trim()
        );
    }

    #[test]
    fn join_where_binds_before_where() {
        let query = query("users")
            .where_eq("active", 1)
            .join_where("contacts", "contacts.type", "=", "primary");
        assert_eq!(
            query.to_sql(),
            r#"SELECT * FROM "users" INNER JOIN "contacts" ON "contacts"."type" = ? WHERE "active" = ?"#
        );
        assert_eq!(query.bindings(), vec![Value::from("primary"), Value::from(1)]);
    }

    #[test]
    fn group_and_having() {
        let query = query("orders")
            .select(["account_id"])
            .group_by("account_id")
            .group_by_raw("YEAR(created_at)", &[])
            .having("account_id", ">", 100)
            .unwrap()
            .or_having_raw("SUM(price) > ?", &[Value::from(2500)])
            .having_not_null("account_id");
        assert_eq!(
            query.to_sql(),
            indoc! {r#"
                SELECT "account_id" FROM "orders" GROUP BY "account_id", YEAR(created_at) \
                HAVING "account_id" > ? or SUM(price) > ? and "account_id" IS NOT NULL
            "#}
            .trim()
        );
        assert_eq!(query.bindings(), vec![Value::from(100), Value::from(2500)]);

        assert!(
            self::query("orders")
                .having("total", "<", Value::Null)
                .unwrap_err()
                .is_build_error()
        );
    }

    #[test]
    fn order_limit_offset() {
        let query = query("users")
            .order_by("name", "desc")
            .unwrap()
            .order_by("email", "ASC")
            .unwrap()
            .for_page(3, 15);
        assert_eq!(
            query.to_sql(),
            r#"SELECT * FROM "users" ORDER BY "name" DESC, "email" ASC LIMIT 15 OFFSET 30"#
        );

        let last = self::query("users").for_page(i64::MAX, 2);
        assert_eq!(
            last.to_sql(),
            r#"SELECT * FROM "users" LIMIT 2 OFFSET 9223372036854775807"#
        );
        let first = self::query("users").for_page(i64::MIN, 10);
        assert_eq!(first.to_sql(), r#"SELECT * FROM "users" LIMIT 10 OFFSET 0"#);

        let ignored = self::query("users").limit(-1).offset(-5);
        assert_eq!(ignored.to_sql(), r#"SELECT * FROM "users" OFFSET 0"#);

        let error = self::query("users").order_by("name", "up").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DatabaseError>(),
            Some(DatabaseError::InvalidOrderDirection(v)) if v == "up"
        ));
    }

    #[test]
    fn latest_and_oldest() {
        assert_eq!(
            query("posts").latest().to_sql(),
            r#"SELECT * FROM "posts" ORDER BY "created_at" DESC"#
        );
        assert_eq!(
            query("posts").oldest_by("published_at").to_sql(),
            r#"SELECT * FROM "posts" ORDER BY "published_at" ASC"#
        );
        assert_eq!(
            query("posts").in_random_order("").to_sql(),
            r#"SELECT * FROM "posts" ORDER BY RANDOM()"#
        );
    }

    #[test]
    fn unions() {
        let admins = query("admins").where_eq("b", 2);
        let query = query("users")
            .where_eq("a", 1)
            .union(admins.clone())
            .union_all(admins)
            .order_by("name", "asc")
            .unwrap()
            .order_by_raw("FIELD(id, ?)", &[Value::from(9)])
            .limit(10)
            .offset(20);
        assert_eq!(
            query.to_sql(),
            indoc! {r#"
                (SELECT * FROM "users" WHERE "a" = ?) \
                UNION (SELECT * FROM "admins" WHERE "b" = ?) \
                UNION ALL (SELECT * FROM "admins" WHERE "b" = ?) \
                ORDER BY "name" ASC, FIELD(id, ?) LIMIT 10 OFFSET 20
            "#}
            .trim()
        );
        assert_eq!(query.bindings(), [1, 2, 2, 9].map(Value::from).to_vec());
        assert!(query.clauses().orders.is_empty());
        assert_eq!(query.clauses().limit, None);
    }

    #[test]
    fn aggregates() {
        let query = query("users")
            .where_eq("a", 1)
            .order_by_raw("FIELD(id, ?)", &[Value::from(5)])
            .set_aggregate("COUNT", "*");
        assert_eq!(
            query.to_sql(),
            r#"SELECT COUNT(*) AS aggregate FROM "users" WHERE "a" = ?"#
        );
        assert_eq!(query.bindings(), vec![Value::from(1)]);

        let distinct = self::query("users").distinct().set_aggregate("COUNT", ["name"]);
        assert_eq!(
            distinct.to_sql(),
            r#"SELECT COUNT(DISTINCT "name") AS aggregate FROM "users""#
        );

        let grouped = self::query("users")
            .group_by("team_id")
            .order_by_desc("team_id")
            .set_aggregate("MAX", ["age"]);
        assert_eq!(
            grouped.to_sql(),
            r#"SELECT MAX("age") AS aggregate FROM "users" GROUP BY "team_id" ORDER BY "team_id" DESC"#
        );
    }

    #[test]
    fn aggregate_over_union() {
        let query = query("users")
            .where_eq("a", 1)
            .union(self::query("admins").where_eq("b", 2))
            .set_aggregate("COUNT", "*");
        assert_eq!(
            query.to_sql(),
            indoc! {r#"
                SELECT COUNT(*) AS aggregate FROM ((SELECT * FROM "users" WHERE "a" = ?) \
                UNION (SELECT * FROM "admins" WHERE "b" = ?)) AS "temp_table"
            "#}
            .trim()
        );
    }

    #[test]
    fn raw_sql_for_logs() {
        let query = query("users")
            .where_("id", "=", 5)
            .unwrap()
            .where_("name", "=", "O'Neil")
            .unwrap()
            .where_raw("tags ?? ?", &[Value::from("admin")]);
        assert_eq!(
            query.to_raw_sql(),
            r#"SELECT * FROM "users" WHERE "id" = 5 and "name" = 'O'Neil' and tags ?? 'admin'"#
        );
    }

    #[test]
    fn add_binding() {
        let query = query("users")
            .where_raw("a = ?", &[])
            .add_binding(3, "where")
            .unwrap()
            .select_raw("?", &[])
            .add_binding("first", "select")
            .unwrap();
        assert_eq!(query.bindings(), vec![Value::from("first"), Value::from(3)]);

        let error = self::query("users").add_binding(1, "nowhere").unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DatabaseError>(),
            Some(DatabaseError::InvalidBindingType(v)) if v == "nowhere"
        ));
    }

    #[test]
    fn full_text_needs_support() {
        let error = query("posts")
            .where_full_text(["title"], "rust", FullTextOptions::default())
            .unwrap_err();
        assert!(matches!(
            error.downcast_ref::<DatabaseError>(),
            Some(DatabaseError::Unsupported { grammar: "generic", .. })
        ));
    }
}
