//! End-to-end tests for contract registration and checking

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::value::{list_of, tuple_of};
    use crate::{
        can_be_used_as_a_type, check, new_contract, parse, register_predicate, ContractError,
        Predicate, TypeTag, Value, ValueKind,
    };

    static COUNTER: AtomicUsize = AtomicUsize::new(0);

    /// Generate a fresh name; the global registry never forgets an entry
    fn cname() -> String {
        format!("GeneratedContract{}", COUNTER.fetch_add(1, Ordering::SeqCst))
    }

    fn assert_fails(expression: &str, value: &Value) {
        match check(expression, value) {
            Err(err) if err.is_violation() => {}
            Err(err) => panic!("expected a violation for '{}', got {:?}", expression, err),
            Ok(()) => panic!("expected '{}' to reject {}", expression, value),
        }
    }

    #[derive(Debug, thiserror::Error)]
    #[error("intentional predicate failure")]
    struct Ex1;

    #[test]
    fn test_registered_name_in_composite_expression() {
        new_contract("my_list", "list[2]").unwrap();
        check(
            "tuple(my_list, my_list)",
            &tuple_of(vec![list_of(&[1, 2]), list_of(&[1, 2])]),
        )
        .unwrap();
        assert_fails(
            "tuple(my_list, my_list)",
            &tuple_of(vec![list_of(&[1, 2]), list_of(&[1, 2, 3])]),
        );
    }

    #[test]
    fn test_size_variables_are_separate_per_expansion() {
        new_contract("my_list2", "list[N]").unwrap();
        check(
            "tuple(my_list2, my_list2)",
            &tuple_of(vec![list_of(&[1, 2]), list_of(&[1, 2])]),
        )
        .unwrap();
        // Each expansion binds its own N
        check(
            "tuple(my_list2, my_list2)",
            &tuple_of(vec![list_of(&[1, 2]), list_of(&[1, 2, 3])]),
        )
        .unwrap();
    }

    #[test]
    fn test_size_variables_are_shared_within_one_expression() {
        check(
            "tuple(list[N], list[N])",
            &tuple_of(vec![list_of(&[1, 2]), list_of(&[1, 2])]),
        )
        .unwrap();
        assert_fails(
            "tuple(list[N], list[N])",
            &tuple_of(vec![list_of(&[1, 2]), list_of(&[1, 2, 3])]),
        );
    }

    #[test]
    fn test_color_idiom() {
        let color = new_contract("color", "list[3](number,>=0,<=1)").unwrap();
        color.check(&list_of(&[0, 0, 0])).unwrap();
        color.check(&list_of(&[0, 0, 1])).unwrap();
        color.fail(&list_of(&[0, 0])).unwrap();
        color.fail(&list_of(&[0, 0, 2])).unwrap();

        let err = color.fail(&list_of(&[0, 0, 1])).unwrap_err();
        assert!(matches!(err, ContractError::UnexpectedPass { .. }));

        // Registered contracts nest inside further expressions
        check("list(color)", &Value::List(vec![list_of(&[0, 0, 0])])).unwrap();
    }

    #[test]
    fn test_predicate_registered_by_its_own_name() {
        let even = Predicate::unary("even", |v| {
            v.as_f64().map(|f| f % 2.0 == 0.0).unwrap_or(false)
        });
        let returned = register_predicate(even.clone()).unwrap();
        assert_eq!(even, returned);

        let p = parse("even").unwrap();
        p.check(&Value::Integer(2)).unwrap();
        p.check(&Value::Integer(4)).unwrap();
        p.fail(&Value::Integer(3)).unwrap();
        p.check(&Value::Float(2.0)).unwrap();
    }

    #[test]
    fn test_predicate_returning_nil_passes() {
        let c = cname();
        new_contract(&c, Predicate::try_unary("ok_silent", |_| Ok(Value::Nil))).unwrap();
        check(&format!("list({})", c), &list_of(&[0])).unwrap();
    }

    #[test]
    fn test_predicate_returning_false_is_a_violation() {
        let c = cname();
        new_contract(&c, Predicate::unary("always_no", |_| false)).unwrap();
        assert_fails(&format!("list({})", c), &list_of(&[0]));
    }

    #[test]
    fn test_predicate_error_propagates_unmodified() {
        let c = cname();
        new_contract(
            &c,
            Predicate::try_unary("raises", |_| Err(anyhow::Error::new(Ex1))),
        )
        .unwrap();
        let err = check(&format!("list({})", c), &list_of(&[0])).unwrap_err();
        match err {
            ContractError::Predicate { source, .. } => {
                assert!(source.downcast_ref::<Ex1>().is_some());
            }
            other => panic!("expected a predicate error, got {:?}", other),
        }
    }

    #[test]
    fn test_predicate_returning_other_values_passes() {
        let c = cname();
        new_contract(
            &c,
            Predicate::try_unary("chatty", |_| Ok(Value::String("ciao".to_string()))),
        )
        .unwrap();
        check(&format!("list({})", c), &list_of(&[0])).unwrap();
    }

    #[test]
    fn test_wrong_arity_is_rejected_at_registration() {
        let err = new_contract(&cname(), Predicate::new("nullary", 0, |_| Ok(Value::Nil)))
            .unwrap_err();
        assert!(matches!(err, ContractError::InvalidSource(_)));

        let err = new_contract(
            &cname(),
            Predicate::new("binary", 2, |_| Ok(Value::Boolean(true))),
        )
        .unwrap_err();
        assert!(matches!(err, ContractError::InvalidSource(_)));
    }

    #[test]
    fn test_builtin_types_as_contracts() {
        let strings = cname();
        new_contract(&strings, ValueKind::String).unwrap();
        check(&strings, &Value::String(String::new())).unwrap();
        assert_fails(&strings, &Value::Integer(1));

        let ints = cname();
        new_contract(&ints, ValueKind::Integer).unwrap();
        check(&ints, &Value::Integer(1)).unwrap();
        assert_fails(&ints, &Value::String(String::new()));
    }

    #[test]
    fn test_tagged_types_as_contracts() {
        let c = cname();
        new_contract(&c, TypeTag::Tagged("Point".to_string())).unwrap();
        let point = Value::Tagged {
            tag: "Point".to_string(),
            values: vec![Value::Integer(0), Value::Integer(1)],
        };
        check(&c, &point).unwrap();
        assert_fails(&c, &Value::Integer(0));
        assert_fails(
            &c,
            &Value::Tagged {
                tag: "Circle".to_string(),
                values: vec![],
            },
        );
    }

    #[test]
    fn test_type_classification_is_recognized() {
        assert!(can_be_used_as_a_type(
            &TypeTag::Tagged("OldStyleClass".to_string()).into()
        ));
        assert!(can_be_used_as_a_type(&ValueKind::Map.into()));
        assert!(!can_be_used_as_a_type(&"list[2]".into()));
        assert!(!can_be_used_as_a_type(
            &Predicate::unary("p", |_| true).into()
        ));
    }

    #[test]
    fn test_parse_error_surfaces_from_registration() {
        let err = new_contract(&cname(), ">>").unwrap_err();
        assert!(matches!(err, ContractError::Parse(_)));
        let err = new_contract(&cname(), "no_such_contract_here").unwrap_err();
        assert!(matches!(err, ContractError::Parse(_)));
    }

    #[test]
    fn test_check_by_expression_without_registration() {
        check("list[2](number)", &list_of(&[1, 2])).unwrap();
        assert_fails("list[2](number)", &list_of(&[1, 2, 3]));
        assert_fails("int", &Value::Float(1.5));
        check("number", &Value::Float(1.5)).unwrap();
        check("*", &Value::Nil).unwrap();
    }

    #[test]
    fn test_docstring_types_feed_check() {
        let doc = ":type inside: list[3](number,>=0,<=1)\n:type n: int";
        let types = crate::parse_docstring_types(doc);
        check(&types["inside"], &list_of(&[0, 1, 0])).unwrap();
        check(&types["n"], &Value::Integer(3)).unwrap();
        assert_fails(&types["n"], &Value::String("3".into()));
    }
}
