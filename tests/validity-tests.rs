use lazy_static::lazy_static;
use sqljson_path::{errors::JSONPathError, Parser};

lazy_static! {
    static ref PARSER: Parser = Parser::new().verbose(true);
}

macro_rules! assert_valid {
    ($($name:ident: $value:expr,)*) => {
    $(
        #[allow(non_snake_case)]
        #[test]
        fn $name() -> Result<(), JSONPathError> {
            let input = $value;
            PARSER.parse(input)?;
            Ok(())
        }
    )*
    }
}

macro_rules! assert_invalid {
    ($($name:ident: $value:expr,)*) => {
    $(
        #[allow(non_snake_case)]
        #[test]
        #[should_panic]
        fn $name() {
            let input = $value;
            PARSER.parse(input).unwrap();
        }
    )*
    }
}

mod scoping {
    use super::*;

    assert_valid! {
        current_in_filter: "$ ? (@ == 1)",
        current_in_exists: "exists (@.a)",
        current_in_nested_filter: "$ ? (@.a ? (@ > 1) == 2)",
        current_in_exists_in_filter: "$ ? (exists (@.a ? (@ > 1)))",
        last_in_subscript: "$[last]",
        last_in_range: "$[0 to last - 1]",
        last_in_filter_in_subscript: "$[$.a ? (@ == last)]",
        last_in_nested_subscript: "$[$.a[last]]",
        current_in_subscript_in_filter: "$ ? (@[@.i] > 0)",
    }

    assert_invalid! {
        current_at_root: "@",
        current_in_root_arithmetic: "@ + 1",
        current_after_filter: "$.a ? (@ == 1) + @",
        current_in_root_subscript: "$[@]",
        current_in_root_not: "!(@ == 1)",
        last_at_root: "last",
        last_in_arithmetic: "$[1].a + last",
        last_in_filter: "$ ? (@ == last)",
        last_as_method_argument: "$.decimal(last)",
    }
}

mod grammar {
    use super::*;

    assert_valid! {
        mode_then_expression: "lax $.a",
        mode_then_predicate: "strict $.a == 1",
        variable_primary: "$x.a",
        string_primary: "\"abc\".type()",
        literal_predicate_operands: "$ ? (true == false)",
        keyword_keys: "$.is.to.with.flag.unknown",
        uppercase_keywords: "$ ? (@ STARTS WITH \"a\" && @ LIKE_REGEX \"b\" FLAG \"i\")",
        exists_in_arithmetic: "(exists ($.a)).size() + 1",
        nested_groups: "((($)))",
        whitespace_everywhere: " $ . a [ 1 , 2 ] ? ( @ > 1 ) ",
        decimal_without_arguments: "$.decimal()",
        datetime_without_template: "$.datetime()",
        hex_digits_after_dot: "0x1.abs()",
    }

    assert_invalid! {
        empty: "",
        only_whitespace: "  ",
        only_mode: "strict",
        two_modes: "strict lax $",
        dangling_dot: "$.a.",
        empty_subscript: "$[]",
        unclosed_subscript: "$[1",
        empty_filter: "$ ? ()",
        filter_without_parens: "$ ? @ > 1",
        filter_on_value: "$ ? (@.a)",
        logical_on_values: "$ ? (@.a && @.b)",
        not_without_parens: "$ ? (!@.a)",
        not_on_value: "$ ? (!(@.a))",
        chained_comparison: "1 == 1 == 1",
        arithmetic_on_predicate: "($.a == 1) + 1",
        is_unknown_on_value: "$ ? ((@) is unknown)",
        is_unknown_unparenthesized: "$ ? (@ == 1 is unknown)",
        is_without_unknown: "$ ? ((@ == 1) is)",
        exists_of_predicate: "exists ($.a == 1)",
        starts_without_with: "$ ? (@ starts \"a\")",
        starts_with_number: "$ ? (@ starts with 1)",
        like_regex_without_pattern: "$ ? (@ like_regex)",
        like_regex_bad_pattern: "$ ? (@ like_regex \"(\")",
        like_regex_expanded: "$ ? (@ like_regex \"a\" flag \"x\")",
        like_regex_unknown_flag: "$ ? (@ like_regex \"a\" flag \"g\")",
        like_regex_flag_without_string: "$ ? (@ like_regex \"a\" flag)",
        method_with_argument: "$.abs(1)",
        unknown_method: "$.foo()",
        decimal_three_arguments: "$.decimal(1, 2, 3)",
        decimal_float_argument: "$.decimal(1.5)",
        datetime_number_argument: "$.datetime(1)",
        time_string_argument: "$.time(\"x\")",
        negative_any_level: "$.**{-1}",
        any_level_out_of_range: "$.**{4294967295}",
        unclosed_any_levels: "$.**{1",
        trailing_token: "$ $",
        trailing_paren: "$)",
        unbalanced_paren: "($",
        single_equals: "$ = 1",
        single_ampersand: "$ & 1",
        single_pipe: "$ | 1",
        single_quotes: "$.'a'",
        double_wild_without_dot: "$**",
    }
}

mod lexical {
    use super::*;

    assert_valid! {
        radix_integers: "$[0b1, 0o7, 0xF, 0B1, 0O7, 0XF]",
        separators: "1_000 + 0xff_ff.abs()",
        leading_dot_float: ".5 + 1.5",
        exponent: "1e3 + 1.5E-3 + 2e+2",
        comment: "/* leading */ $ /* trailing */",
        unicode_key: "$.été",
        escaped_key: "$.\\u0061",
        surrogate_pair: "\"\\uD83D\\uDE00\"",
    }

    assert_invalid! {
        leading_zero: "01",
        trailing_junk: "1a",
        trailing_underscore: "1_",
        double_underscore: "1__0",
        separator_after_prefix: "0x_1",
        bad_binary_digit: "0b2",
        empty_hex: "0x",
        hex_float: "0x1p3",
        hex_fraction_float: "0x1.8p1",
        float_overflow: "1e400",
        float_underflow: "1e-400",
        huge_decimal_integer: &format!("1{}", "0".repeat(400)),
        radix_overflow: "0x8000000000000000",
        unterminated_string: "\"abc",
        unterminated_comment: "$ /* oops",
        control_in_string: "\"a\u{1}\"",
        bad_escape: "\"\\q\"",
        nul_escape: "\"\\u0000\"",
        unpaired_high_surrogate: "\"\\uD83D\"",
        lone_low_surrogate: "\"\\uDE00\"",
        short_unicode_escape: "\"\\u12\"",
        bad_hex_escape: "\"\\xZZ\"",
        unexpected_character: "$ # 1",
    }
}
