#[cfg(test)]
mod tests {
    use quarry_core::{BindingGroup, Bindings, Boolean, Direction, Value};

    #[test]
    fn binding_groups_flatten_in_declaration_order() {
        let mut bindings = Bindings::default();
        bindings.push(BindingGroup::UnionOrder, Value::from(9));
        bindings.push(BindingGroup::Having, Value::from(6));
        bindings.push(BindingGroup::Join, Value::from(3));
        bindings.push(BindingGroup::Where, Value::from(4));
        bindings.push(BindingGroup::Select, Value::from(1));
        assert_eq!(
            bindings.flatten(),
            [1, 3, 4, 6, 9].map(Value::from).to_vec()
        );
        assert_eq!(
            bindings.flatten_except(&[BindingGroup::Select, BindingGroup::Join]),
            [4, 6, 9].map(Value::from).to_vec()
        );
    }

    #[test]
    fn binding_group_names() {
        assert_eq!(
            "groupBy".parse::<BindingGroup>().unwrap(),
            BindingGroup::GroupBy
        );
        let error = "nope".parse::<BindingGroup>().unwrap_err();
        assert_eq!(error.to_string(), "Invalid binding type: nope");
    }

    #[test]
    fn boolean_connector_normalization() {
        assert_eq!(Boolean::parse("OR"), Boolean::Or);
        assert_eq!(Boolean::parse("and Not"), Boolean::AndNot);
        assert_eq!(Boolean::parse("xor"), Boolean::And);
        assert_eq!(Boolean::Or.negate(), Boolean::OrNot);
    }

    #[test]
    fn order_direction() {
        assert_eq!("DeSc".parse::<Direction>().unwrap(), Direction::Desc);
        assert!("sideways".parse::<Direction>().is_err());
    }
}
