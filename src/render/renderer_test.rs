#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::value::ResultValue;

    fn s(text: &str) -> ResultValue {
        ResultValue::scalar(text)
    }

    fn seq<const N: usize>(items: [ResultValue; N]) -> ResultValue {
        ResultValue::sequence(items)
    }

    #[test]
    fn test_nil() {
        assert_eq!(render_lines(&ResultValue::Nil, "", true), vec!["(nil)"]);
    }

    #[test]
    fn test_scalar_is_quoted() {
        assert_eq!(render_lines(&s("abc"), "", true), vec![r#""abc""#]);
    }

    #[test]
    fn test_scalar_unquoted_when_requested() {
        assert_eq!(render_lines(&s("OK"), "", false), vec!["OK"]);
    }

    #[test]
    fn test_empty_sequence_marker() {
        assert_eq!(
            render_lines(&ResultValue::Sequence(vec![]), "", true),
            vec!["(empty array)"]
        );
    }

    #[test]
    fn test_flat_sequence() {
        assert_eq!(
            render_lines(&seq([s("a"), s("b")]), "", true),
            vec![r#"1) "a""#, r#"2) "b""#]
        );
    }

    #[test]
    fn test_nested_marker_concatenates_prefixes() {
        assert_eq!(
            render_lines(&seq([seq([s("x")])]), "", true),
            vec![r#"1) 1) "x""#]
        );
    }

    #[test]
    fn test_empty_sequence_inside_sequence() {
        assert_eq!(
            render_lines(&seq([s("a"), ResultValue::Sequence(vec![])]), "", true),
            vec![r#"1) "a""#, "2) (empty array)"]
        );
    }

    #[test]
    fn test_later_children_align_under_parent_marker() {
        let value = seq([s("a"), seq([s("x"), ResultValue::Nil, ResultValue::Integer(7)])]);

        assert_eq!(
            render_lines(&value, "", true),
            vec![
                r#"1) "a""#,
                r#"2) 1) "x""#,
                "   2) (nil)",
                "   3) 7",
            ]
        );
    }

    #[test]
    fn test_children_quote_even_when_top_level_does_not() {
        assert_eq!(
            render_lines(&seq([s("a")]), "", false),
            vec![r#"1) "a""#]
        );
    }

    #[test]
    fn test_caller_prefix_is_kept_on_first_line_only() {
        assert_eq!(
            render_lines(&seq([s("a"), s("b")]), "> ", true),
            vec![r#"> 1) "a""#, r#"  2) "b""#]
        );
    }

    #[test]
    fn test_integers_are_never_quoted() {
        assert_eq!(
            render_lines(&ResultValue::Integer(-3), "", true),
            vec!["-3"]
        );
    }

    #[test]
    fn test_render_is_lazy() {
        let items: Vec<ResultValue> = (0..10_000).map(|i| s(&i.to_string())).collect();
        let value = ResultValue::Sequence(items);

        let first: Vec<String> = render(&value, "", true).take(2).collect();
        assert_eq!(first, vec![r#"1) "0""#, r#"2) "1""#]);
    }

    #[test]
    fn test_deep_nesting_does_not_overflow() {
        let mut value = s("leaf");
        for _ in 0..1_000 {
            value = ResultValue::Sequence(vec![value]);
        }

        let lines = render_lines(&value, "", true);
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("1) 1) "));
        assert!(lines[0].ends_with(r#""leaf""#));
        assert_eq!(lines[0].len(), 1_000 * 3 + r#""leaf""#.len());
    }

    #[test]
    fn test_write_lines_to_sink() {
        let mut sink = Vec::new();
        write_lines(&seq([s("a"), ResultValue::Nil]), &mut sink).unwrap();

        assert_eq!(String::from_utf8(sink).unwrap(), "1) \"a\"\n2) (nil)\n");
    }
}
