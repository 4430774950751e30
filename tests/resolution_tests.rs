use serde_json::json;
use stand_in::{
    _0, _1, _2, _3, EvalError, Expr, Func, IT, NO_ARGS, Named, PlaceholderError, Resolved, Step,
    Value, arg, introspect::describe, named, pipe, var,
};

fn ints(xs: &[i64]) -> Vec<Value> {
    xs.iter().map(|x| Value::Integer(*x)).collect()
}

fn named_args(pairs: Vec<(&str, Value)>) -> Named {
    pairs
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
}

fn eval(expr: &Expr, args: Vec<Value>) -> Result<Value, EvalError> {
    expr.value(&args)
}

// ============================================================================
// Placeholders
// ============================================================================

#[test]
fn test_add_one() {
    assert_eq!(eval(&(IT + 1), ints(&[41])).unwrap(), Value::Integer(42));
}

#[test]
fn test_anonymous_placeholders_consume_in_order() {
    assert_eq!(eval(&(IT - IT), ints(&[10, 3])).unwrap(), Value::Integer(7));
}

#[test]
fn test_indexed_placeholder_reuses_slot() {
    assert_eq!(eval(&(_0 * _0), ints(&[7])).unwrap(), Value::Integer(49));
}

#[test]
fn test_indexed_placeholders_mix() {
    let expr = _0 + _1 * _0;
    assert_eq!(eval(&expr, ints(&[2, 3])).unwrap(), Value::Integer(8));
}

#[test]
fn test_anonymous_and_indexed_do_not_shift_each_other() {
    // IT takes slot 0, _1 takes slot 1
    let expr = IT - _1;
    assert_eq!(eval(&expr, ints(&[10, 4])).unwrap(), Value::Integer(6));
}

#[test]
fn test_named_placeholders() {
    let expr = named("first").unwrap() + " " + named("last").unwrap();
    let result = expr
        .resolve_with(
            &[],
            named_args(vec![("first", "John".into()), ("last", "Doe".into())]),
        )
        .unwrap();
    assert_eq!(result.as_value(), Some(&Value::String("John Doe".into())));
}

#[test]
fn test_var_shorthand_matches_bracket_form() {
    let short = var!(text).unwrap();
    let long = named("text").unwrap();
    assert_eq!(short.to_string(), long.to_string());
    assert_eq!(describe(&short), describe(&long));
}

#[test]
fn test_arg_matches_prebuilt_placeholder() {
    assert_eq!(arg(2).unwrap().to_string(), _2.to_string());
    assert_eq!(eval(&arg(1).unwrap(), ints(&[5, 6])).unwrap(), Value::Integer(6));
}

#[test]
fn test_negative_index_is_rejected() {
    assert_eq!(arg(-1).unwrap_err(), PlaceholderError::NegativeIndex(-1));
}

#[test]
fn test_reserved_and_empty_names_are_rejected() {
    assert_eq!(
        named("__internal").unwrap_err(),
        PlaceholderError::ReservedName("__internal".into())
    );
    assert_eq!(named("").unwrap_err(), PlaceholderError::EmptyName);
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn test_reflected_operators() {
    assert_eq!(eval(&(1 + IT), ints(&[41])).unwrap(), Value::Integer(42));
    assert_eq!(eval(&(10 - IT), ints(&[3])).unwrap(), Value::Integer(7));
    assert_eq!(eval(&(2.5 * IT), ints(&[2])).unwrap(), Value::Integer(5));
    assert_eq!(
        eval(&("a" + IT), vec!["b".into()]).unwrap(),
        Value::String("ab".into())
    );
}

#[test]
fn test_mixed_arithmetic_preserves_integers() {
    let result = eval(&(IT * 1.1), ints(&[100])).unwrap();
    assert!(matches!(result, Value::Integer(110)));
}

#[test]
fn test_integer_division() {
    assert!(matches!(eval(&(IT / 2), ints(&[10])).unwrap(), Value::Integer(5)));
    assert_eq!(eval(&(IT / 2), ints(&[7])).unwrap(), Value::Float(3.5));
}

#[test]
fn test_floor_division_and_modulo_follow_divisor_sign() {
    assert_eq!(eval(&IT.floor_div(2), ints(&[-7])).unwrap(), Value::Integer(-4));
    assert_eq!(eval(&(IT % 3), ints(&[-7])).unwrap(), Value::Integer(2));
    assert_eq!(eval(&(IT % -3), ints(&[7])).unwrap(), Value::Integer(-2));
}

#[test]
fn test_power() {
    assert_eq!(eval(&IT.pow(3), ints(&[2])).unwrap(), Value::Integer(8));
    assert_eq!(eval(&IT.pow(-1), ints(&[2])).unwrap(), Value::Float(0.5));
}

#[test]
fn test_string_and_array_operators() {
    assert_eq!(
        eval(&(IT * 3), vec!["ab".into()]).unwrap(),
        Value::String("ababab".into())
    );
    let joined = eval(&(IT + _1), vec![vec![1].into(), vec![2].into()]).unwrap();
    assert_eq!(joined, Value::Array(ints(&[1, 2])));
}

#[test]
fn test_comparisons() {
    assert_eq!(eval(&IT.gt(18), ints(&[25])).unwrap(), Value::Boolean(true));
    assert_eq!(eval(&IT.le(18), ints(&[18])).unwrap(), Value::Boolean(true));
    assert_eq!(eval(&IT.lt("b"), vec!["a".into()]).unwrap(), Value::Boolean(true));
    assert_eq!(eval(&IT.eq(1), vec![Value::Float(1.0)]).unwrap(), Value::Boolean(true));
    assert_eq!(eval(&IT.ne(1), ints(&[1])).unwrap(), Value::Boolean(false));
}

#[test]
fn test_bitwise_and_unary_operators() {
    assert_eq!(eval(&(IT & 6), ints(&[3])).unwrap(), Value::Integer(2));
    assert_eq!(eval(&(IT | true), vec![false.into()]).unwrap(), Value::Boolean(true));
    assert_eq!(eval(&(IT ^ 1), ints(&[3])).unwrap(), Value::Integer(2));
    assert_eq!(eval(&(IT << 2), ints(&[1])).unwrap(), Value::Integer(4));
    assert_eq!(eval(&(IT >> 1), ints(&[8])).unwrap(), Value::Integer(4));
    assert_eq!(eval(&(-IT), ints(&[5])).unwrap(), Value::Integer(-5));
    assert_eq!(eval(&IT.pos(), ints(&[5])).unwrap(), Value::Integer(5));
    assert_eq!(eval(&(!IT), vec![true.into()]).unwrap(), Value::Boolean(false));
    assert_eq!(eval(&IT.invert(), ints(&[0])).unwrap(), Value::Integer(-1));
}

// ============================================================================
// Evaluation errors propagate
// ============================================================================

#[test]
fn test_division_by_zero_propagates() {
    assert_eq!(eval(&(IT / 0), ints(&[1])).unwrap_err(), EvalError::DivisionByZero);
    assert_eq!(eval(&(IT % 0.0), ints(&[1])).unwrap_err(), EvalError::DivisionByZero);
}

#[test]
fn test_string_repetition_overflow() {
    let err = eval(&(IT * "ab"), ints(&[i64::MAX])).unwrap_err();
    assert!(matches!(err, EvalError::Overflow(_)));
    assert_eq!(eval(&(IT * "ab"), ints(&[-2])).unwrap(), Value::from(""));
}

#[test]
fn test_shift_overflow() {
    assert!(matches!(eval(&(IT << 63), ints(&[3])).unwrap_err(), EvalError::Overflow(_)));
    assert!(matches!(eval(&(IT << 64), ints(&[1])).unwrap_err(), EvalError::Overflow(_)));
    assert_eq!(eval(&(IT << 63), ints(&[-1])).unwrap(), Value::Integer(i64::MIN));
    assert_eq!(eval(&(IT << 100), ints(&[0])).unwrap(), Value::Integer(0));
    assert_eq!(eval(&(IT >> 100), ints(&[5])).unwrap(), Value::Integer(0));
    assert_eq!(eval(&(IT >> 100), ints(&[-5])).unwrap(), Value::Integer(-1));
    assert!(matches!(eval(&(IT >> -1), ints(&[5])).unwrap_err(), EvalError::TypeError(_)));
}

#[test]
fn test_power_edge_cases() {
    assert_eq!(eval(&IT.pow(-1), ints(&[0])).unwrap_err(), EvalError::DivisionByZero);
    assert_eq!(
        eval(&IT.pow(-1.0), vec![Value::Float(0.0)]).unwrap_err(),
        EvalError::DivisionByZero
    );
    assert!(matches!(eval(&IT.pow(64), ints(&[2])).unwrap_err(), EvalError::Overflow(_)));
    assert!(matches!(
        eval(&IT.pow(1000.0), vec![Value::Float(10.0)]).unwrap_err(),
        EvalError::Overflow(_)
    ));

    let huge = i64::from(u32::MAX) + 1;
    assert_eq!(eval(&IT.pow(huge), ints(&[1])).unwrap(), Value::Integer(1));
    assert_eq!(eval(&IT.pow(huge), ints(&[0])).unwrap(), Value::Integer(0));
    assert_eq!(eval(&IT.pow(huge + 1), ints(&[-1])).unwrap(), Value::Integer(-1));
    assert!(matches!(eval(&IT.pow(huge), ints(&[2])).unwrap_err(), EvalError::Overflow(_)));
}

#[test]
fn test_placeholder_errors_display() {
    assert_eq!(
        arg(-1).unwrap_err().to_string(),
        "placeholder index must be non-negative, got -1"
    );
    assert_eq!(
        named("__x").unwrap_err().to_string(),
        "placeholder name `__x` uses the reserved `__` prefix"
    );
}

#[test]
fn test_type_error_propagates() {
    let err = eval(&(IT + 1), vec!["a".into()]).unwrap_err();
    assert!(matches!(err, EvalError::TypeError(_)));
}

#[test]
fn test_host_function_error_propagates() {
    let boom = Func::new("boom", |_, _| Err(EvalError::Failed("boom".into())));
    let expr = named("f").unwrap().call(NO_ARGS);
    let err = expr
        .resolve_with(&[], named_args(vec![("f", boom.into())]))
        .unwrap_err();
    assert_eq!(err, EvalError::Failed("boom".into()));
}

#[test]
fn test_calling_a_non_function_fails() {
    let err = eval(&IT.call(NO_ARGS), ints(&[1])).unwrap_err();
    assert_eq!(err, EvalError::NotCallable("integer"));
}

// ============================================================================
// Access, calls and methods
// ============================================================================

#[test]
fn test_attribute_and_item_access() {
    let record: Value = json!({"text": "hi", "items": [1, 2, 3]}).into();
    assert_eq!(eval(&IT.attr("text"), vec![record.clone()]).unwrap(), "hi".into());
    assert_eq!(
        eval(&IT.item("items").item(-1), vec![record.clone()]).unwrap(),
        Value::Integer(3)
    );
    assert_eq!(
        eval(&IT.attr("items").method("len", NO_ARGS), vec![record]).unwrap(),
        Value::Integer(3)
    );
}

#[test]
fn test_item_key_can_be_an_expression() {
    let record: Value = json!({"a": 1, "b": 2}).into();
    let expr = _0.item(_1);
    assert_eq!(eval(&expr, vec![record, "b".into()]).unwrap(), Value::Integer(2));
}

#[test]
fn test_strict_missing_attribute_is_access_error() {
    let record: Value = json!({"a": 1}).into();
    let err = eval(&IT.attr("nope"), vec![record.clone()]).unwrap_err();
    assert!(matches!(err, EvalError::AccessError(_)));
    let err = eval(&IT.item(5), vec![Value::Array(vec![])]).unwrap_err();
    assert!(matches!(err, EvalError::AccessError(_)));
}

#[test]
fn test_string_methods() {
    let hello = vec![Value::from("hello")];
    assert_eq!(eval(&IT.method("upper", NO_ARGS), hello.clone()).unwrap(), "HELLO".into());
    assert_eq!(eval(&IT.method("contains", ["ell"]), hello.clone()).unwrap(), true.into());
    assert_eq!(eval(&IT.method("startswith", ["he"]), hello.clone()).unwrap(), true.into());
    assert_eq!(eval(&IT.method("endswith", ["x"]), hello).unwrap(), false.into());
    assert_eq!(
        eval(&IT.method("matches", [r"^\d+$"]), vec!["123".into()]).unwrap(),
        true.into()
    );
    assert_eq!(
        eval(&IT.method("split", [","]), vec!["a,b".into()]).unwrap(),
        Value::from(vec!["a", "b"])
    );
}

#[test]
fn test_object_methods() {
    let record: Value = json!({"b": 2, "a": 1}).into();
    assert_eq!(
        eval(&IT.method("keys", NO_ARGS), vec![record.clone()]).unwrap(),
        Value::from(vec!["a", "b"])
    );
    let get = IT.method_with("get", ["zzz"], [("default", 0)]);
    assert_eq!(eval(&get, vec![record]).unwrap(), Value::Integer(0));
}

#[test]
fn test_object_attributes_are_fields_only() {
    let record: Value = json!({"type": "typing", "values": [1, 2]}).into();
    assert_eq!(
        eval(&IT.attr("values"), vec![record.clone()]).unwrap(),
        Value::from(vec![1, 2])
    );
    assert!(matches!(
        eval(&IT.attr("keys"), vec![record.clone()]).unwrap_err(),
        EvalError::AccessError(_)
    ));
    // The built-in stays reachable as a method even when a field shadows it
    assert_eq!(
        eval(&IT.method("values", NO_ARGS), vec![record]).unwrap(),
        Value::from(vec![Value::from("typing"), Value::from(vec![1, 2])])
    );
}

#[test]
fn test_method_calls_a_function_field() {
    let double = Func::unary("double", |v| {
        v.as_int()
            .map(|n| Value::Integer(n * 2))
            .ok_or_else(|| EvalError::TypeError("double() needs a number".into()))
    });
    let record = Value::object([("double", double)]);
    assert_eq!(eval(&IT.method("double", [21]), vec![record.clone()]).unwrap(), Value::Integer(42));
    assert!(matches!(
        eval(&IT.method("triple", [1]), vec![record]).unwrap_err(),
        EvalError::AccessError(_)
    ));
}

#[test]
fn test_calling_a_function_argument() {
    let double = Func::unary("double", |v| {
        v.as_int()
            .map(|n| Value::Integer(n * 2))
            .ok_or_else(|| EvalError::TypeError("double() needs a number".into()))
    });
    let expr = named("f").unwrap().call([IT]);
    let result = expr
        .resolve_with(&ints(&[5]), named_args(vec![("f", double.into())]))
        .unwrap();
    assert_eq!(result.as_value(), Some(&Value::Integer(10)));
}

#[test]
fn test_call_with_keyword_arguments() {
    let scale = Func::new("scale", |args, kwargs| {
        let n = args.first().and_then(Value::as_int).unwrap_or(0);
        let by = kwargs.get("by").and_then(Value::as_int).unwrap_or(1);
        Ok(Value::Integer(n * by))
    });
    let expr = IT.call_with([2], [("by", _1)]);
    assert_eq!(eval(&expr, vec![scale.into(), 21.into()]).unwrap(), Value::Integer(42));
}

#[test]
fn test_apply_custom_function() {
    let expr = IT.apply_fn("len", |v| Ok(Value::Integer(v.as_string().len() as i64)));
    assert_eq!(eval(&expr, vec!["abcd".into()]).unwrap(), Value::Integer(4));
}

#[test]
fn test_expressions_are_reusable_values() {
    let base = IT + 1;
    let doubled = base.clone() * 2;
    assert_eq!(eval(&base, ints(&[1])).unwrap(), Value::Integer(2));
    assert_eq!(eval(&doubled, ints(&[1])).unwrap(), Value::Integer(4));
    assert_eq!(eval(&base, ints(&[10])).unwrap(), Value::Integer(11));
}

#[test]
fn test_bound_expression_needs_no_arguments() {
    let expr = Expr::bound(5) + 1;
    assert_eq!(eval(&expr, vec![]).unwrap(), Value::Integer(6));
}

// ============================================================================
// Partial application
// ============================================================================

#[test]
fn test_partial_binds_leading_arguments() {
    let sum3 = IT + IT + IT;
    let rest = sum3.resolve(&ints(&[1])).unwrap().into_partial().unwrap();
    assert_eq!(describe(&rest).total_positional_required, 2);
    assert_eq!(eval(&rest, ints(&[2, 3])).unwrap(), Value::Integer(6));
}

#[test]
fn test_partial_renumbers_indexed_slots() {
    let expr = _0 - _2;
    let rest = expr.resolve(&ints(&[10])).unwrap().into_partial().unwrap();
    let req = describe(&rest);
    assert_eq!(req.total_positional_required, 2);
    assert_eq!(req.indexed_positions.into_iter().collect::<Vec<_>>(), vec![1]);
    assert_eq!(eval(&rest, ints(&[99, 4])).unwrap(), Value::Integer(6));
    assert_eq!(eval(&expr, ints(&[10, 99, 4])).unwrap(), Value::Integer(6));
}

#[test]
fn test_partial_of_partial() {
    let expr = _0 * 100 + _1 * 10 + _2;
    let once = expr.resolve(&ints(&[1])).unwrap().into_partial().unwrap();
    let twice = once.resolve(&ints(&[2])).unwrap().into_partial().unwrap();
    assert_eq!(eval(&twice, ints(&[3])).unwrap(), Value::Integer(123));
    // Each partial stays independently reusable
    assert_eq!(eval(&once, ints(&[5, 6])).unwrap(), Value::Integer(156));
}

#[test]
fn test_partial_with_anonymous_and_indexed_mixed() {
    // Anonymous slots 0 and 1, indexed slots 3 and 1
    let expr = IT * 1000 + _3 * 100 + IT * 10 + _1;
    let args = ints(&[1, 2, 3, 4]);
    assert_eq!(eval(&expr, args.clone()).unwrap(), Value::Integer(1422));
    for k in 0..=args.len() {
        let result = match expr.resolve(&args[..k]).unwrap() {
            Resolved::Partial(rest) => {
                assert_eq!(describe(&rest).total_positional_required, 4 - k);
                eval(&rest, args[k..].to_vec()).unwrap()
            }
            Resolved::Value(value) => value,
        };
        assert_eq!(result, Value::Integer(1422), "binding {} leading arguments", k);
    }
}

#[test]
fn test_missing_named_argument_yields_partial() {
    let expr = IT * named("scale").unwrap();
    let rest = expr.resolve(&ints(&[4])).unwrap().into_partial().unwrap();
    let req = describe(&rest);
    assert_eq!(req.total_positional_required, 0);
    assert!(req.named_keys.contains("scale"));

    let result = rest
        .resolve_with(&[], named_args(vec![("scale", 3.into())]))
        .unwrap();
    assert_eq!(result.as_value(), Some(&Value::Integer(12)));
}

#[test]
fn test_partial_rendering() {
    let rest = (IT + IT).resolve(&ints(&[1])).unwrap();
    assert!(rest.is_partial());
    assert_eq!(rest.into_partial().unwrap().to_string(), "(1 + _)");
}

#[test]
fn test_value_on_partial_is_unresolved_error() {
    let err = eval(&(IT + IT), ints(&[1])).unwrap_err();
    assert!(matches!(err, EvalError::Unresolved(_)));
}

#[test]
fn test_extra_arguments_are_ignored() {
    assert_eq!(eval(&(IT + 1), ints(&[1, 100])).unwrap(), Value::Integer(2));
}

#[test]
fn test_zero_arguments_on_unary_expression_is_partial() {
    let resolved = (IT + 1).resolve(&[]).unwrap();
    assert!(matches!(resolved, Resolved::Partial(_)));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_display() {
    assert_eq!(
        IT.attr("text").method("startswith", ["He"]).to_string(),
        r#"_.text.startswith("He")"#
    );
    assert_eq!((-_0).to_string(), "(-_0)");
    assert_eq!((1 + IT).to_string(), "(1 + _)");
    assert_eq!(IT.item("k").to_string(), r#"_["k"]"#);
    assert_eq!(IT.floor_div(2).to_string(), "(_ // 2)");
    assert_eq!(named("n").unwrap().pow(2.0).to_string(), "(@n ** 2.0)");
}

// ============================================================================
// Composition
// ============================================================================

#[test]
fn test_pipe_threads_left_to_right() {
    assert_eq!(pipe([IT + 1, IT * 10]).run(1).unwrap(), Value::Integer(20));

    let negate = Func::unary("negate", |v| Ok(Value::Integer(-v.as_int().unwrap_or(0))));
    let steps = pipe([Step::from(IT + 1), Step::from(negate)]);
    assert_eq!(steps.run(4).unwrap(), Value::Integer(-5));
}

#[test]
fn test_pipe_into_expr_composes() {
    let expr = pipe([IT + 1]).into_expr() * 2;
    assert_eq!(eval(&expr, ints(&[4])).unwrap(), Value::Integer(10));
}

#[test]
fn test_empty_pipe_returns_input() {
    assert_eq!(pipe(Vec::<Expr>::new()).run("x").unwrap(), Value::from("x"));
}

#[test]
fn test_pipe_step_needing_two_arguments_fails() {
    let err = pipe([IT + IT]).run(1).unwrap_err();
    assert!(matches!(err, EvalError::Unresolved(_)));
}
