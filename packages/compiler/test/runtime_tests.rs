//! Runtime Tests
//!
//! Branch resolution, tag rendering, fragment reduction and the error
//! surface of the evaluator.

use icu_compiler::{
    compile_to_json, evaluate_ast, run, Argument, Arguments, CompileOptions, CompiledMessage,
    Formatters, Fragment, PluralResolver, PluralRuleKind, RuntimeError,
};

fn compiled(source: &str) -> CompiledMessage {
    compile_to_json(source, CompileOptions::default()).unwrap()
}

fn render(source: &str, locale: &str, args: Arguments<String>) -> String {
    run(&compiled(source), locale, &args, &Formatters::new()).unwrap()
}

mod plurals {
    use super::*;

    #[test]
    fn german_cardinals_use_real_rules() {
        let message = "{count, plural, one {# Bild} other {# Bilder}}";
        assert_eq!(render(message, "de-DE", Arguments::new().set("count", 0)), "0 Bilder");
        assert_eq!(render(message, "de-DE", Arguments::new().set("count", 1)), "1 Bild");
        assert_eq!(render(message, "de-DE", Arguments::new().set("count", 2)), "2 Bilder");
    }

    #[test]
    fn exact_matches_beat_categories() {
        let message = "{count, plural, =0 {none} one {one} other {#}}";
        // 0 is category "other" in English, the =0 case still wins
        assert_eq!(render(message, "en", Arguments::new().set("count", 0)), "none");
        assert_eq!(render(message, "en", Arguments::new().set("count", 1)), "one");
        assert_eq!(render(message, "en", Arguments::new().set("count", 5)), "5");
    }

    #[test]
    fn exact_matches_accept_large_overrides() {
        let message = "{count, plural, one {1 image} =99 {Many Many} other {# images}}";
        assert_eq!(
            render(message, "en", Arguments::new().set("count", 99)),
            "Many Many"
        );
        assert_eq!(
            render(message, "en", Arguments::new().set("count", 3)),
            "3 images"
        );
    }

    #[test]
    fn english_ordinals() {
        let message = "You finished {place, selectordinal, one {#st} two {#nd} few {#rd} other {#th}}!";
        let cases = vec![(1, "You finished 1st!"), (2, "You finished 2nd!"), (3, "You finished 3rd!"), (4, "You finished 4th!")];
        for (place, expected) in cases {
            assert_eq!(
                render(message, "en-US", Arguments::new().set("place", place)),
                expected
            );
        }
    }

    #[test]
    fn missing_category_falls_back_to_other() {
        let message = "{n, plural, one {one} other {other}}";
        assert_eq!(render(message, "ru", Arguments::new().set("n", 5)), "other");
    }

    #[test]
    fn the_resolver_is_substitutable() {
        struct AlwaysOther;
        impl PluralResolver for AlwaysOther {
            fn resolve_category(&self, _: f64, _: &str, _: PluralRuleKind) -> &'static str {
                "other"
            }
        }
        let formatters = Formatters::<String>::new().with_plural_resolver(AlwaysOther);
        let message = compiled("{n, plural, one {one} other {other}}");
        let result = run(&message, "en", &Arguments::new().set("n", 1), &formatters).unwrap();
        assert_eq!(result, "other");
    }
}

mod selects {
    use super::*;

    #[test]
    fn unknown_values_fall_back_to_other() {
        let message = "{gender, select, female {She} male {He} other {They}}";
        assert_eq!(
            render(message, "en", Arguments::new().set("gender", "female")),
            "She"
        );
        assert_eq!(
            render(message, "en", Arguments::new().set("gender", "diverse")),
            "They"
        );
    }

    #[test]
    fn pound_in_a_nested_select_refers_to_the_outer_plural() {
        let message = "{n, plural, other {{g, select, other {#}}}}";
        assert_eq!(
            render(message, "en", Arguments::new().set("n", 5).set("g", "any")),
            "5"
        );
    }
}

mod tags {
    use super::*;

    #[test]
    fn default_rendering_wraps_children() {
        assert_eq!(
            render("<b>{x}</b>", "en", Arguments::new().set("x", "hi")),
            "<b>hi</b>"
        );
    }

    #[test]
    fn supplied_renderers_take_over() {
        let args = Arguments::<String>::new().set("x", "hi").tag("b", |children| {
            let mut wrapped = vec![Fragment::Text("**".to_string())];
            wrapped.extend(children);
            wrapped.push(Fragment::Text("**".to_string()));
            wrapped
        });
        assert_eq!(render("<b>{x}</b>", "en", args), "**hi**");
    }

    #[test]
    fn children_resolve_before_the_renderer_runs() {
        let args = Arguments::<String>::new()
            .set("dynamic", "flexible")
            .tag("b", |children| {
                assert_eq!(children, vec![Fragment::Text("flexible tags".to_string())]);
                children
            });
        assert_eq!(
            render("Wow this allows <b>{dynamic} tags</b>!", "en", args),
            "Wow this allows flexible tags!"
        );
    }

    #[test]
    fn the_children_hook_preprocesses() {
        let formatters = Formatters::<String>::new().with_tag_hook(|children, _locale| {
            vec![Fragment::Text(format!(
                "[{}]",
                children
                    .iter()
                    .map(|fragment| fragment.to_string())
                    .collect::<String>()
            ))]
        });
        let message = compiled("<b>hi</b>");
        let result = run(&message, "en", &Arguments::new(), &formatters).unwrap();
        assert_eq!(result, "<b>[hi]</b>");
    }

    #[test]
    fn non_renderer_tag_values_are_an_error() {
        let message = compiled("<b>hi</b>");
        let result = run(
            &message,
            "en",
            &Arguments::<String>::new().set("b", "oops"),
            &Formatters::new(),
        );
        assert!(matches!(
            result,
            Err(RuntimeError::TagNotRenderable { name }) if name == "b"
        ));
    }
}

mod fragments {
    use super::*;

    #[test]
    fn textual_output_reduces_to_one_fragment() {
        let message = compiled("Hello {name}!");
        let fragments = evaluate_ast(
            &message,
            "en",
            &Arguments::<String>::new().set("name", "World"),
            &Formatters::new(),
        )
        .unwrap();
        assert_eq!(fragments, vec![Fragment::Text("Hello World!".to_string())]);
    }

    #[test]
    fn rich_values_break_the_merge() {
        let message = compiled("Hello {name}!");
        let fragments = evaluate_ast(
            &message,
            "en",
            &Arguments::new().value("name", vec!["World".to_string()]),
            &Formatters::new(),
        )
        .unwrap();
        assert_eq!(
            fragments,
            vec![
                Fragment::Text("Hello ".to_string()),
                Fragment::Value(vec!["World".to_string()]),
                Fragment::Text("!".to_string()),
            ]
        );
    }

    #[test]
    fn numbers_merge_with_text() {
        let message = compiled("You are visitor {n}!");
        let fragments = evaluate_ast(
            &message,
            "en",
            &Arguments::<String>::new().set("n", 42),
            &Formatters::new(),
        )
        .unwrap();
        assert_eq!(
            fragments,
            vec![Fragment::Text("You are visitor 42!".to_string())]
        );
    }

    #[test]
    fn bare_strings_evaluate_without_arguments() {
        let message = CompiledMessage::Text("Hello world".to_string());
        let fragments = evaluate_ast(
            &message,
            "en",
            &Arguments::<String>::new(),
            &Formatters::new(),
        )
        .unwrap();
        assert_eq!(fragments, vec![Fragment::Text("Hello world".to_string())]);
    }
}

mod formatters {
    use super::*;

    #[test]
    fn the_default_number_formatter_is_plain() {
        assert_eq!(
            render("I have {numCats, number} cats.", "en", Arguments::new().set("numCats", 4)),
            "I have 4 cats."
        );
    }

    #[test]
    fn custom_formatters_receive_value_locale_and_style() {
        let formatters = Formatters::<String>::new().with_formatter(
            "date",
            |value, locale, style| {
                let value = match value {
                    Argument::Str(value) => value.clone(),
                    other => panic!("unexpected value {:?}", other),
                };
                Fragment::Text(format!("date({}, {}, {})", value, locale, style.unwrap_or("-")))
            },
        );
        let message = compiled("{d, date, full}");
        let result = run(
            &message,
            "en-GB",
            &Arguments::new().set("d", "2024-01-01"),
            &formatters,
        )
        .unwrap();
        assert_eq!(result, "date(2024-01-01, en-GB, full)");
    }

    #[test]
    fn formatter_results_merge_into_the_output() {
        let formatters =
            Formatters::<String>::new().with_formatter("time", |_, _, _| {
                Fragment::Text("12:23:34 PM".to_string())
            });
        let message = compiled("It is now {T, time}!");
        let result = run(
            &message,
            "en",
            &Arguments::new().set("T", "ignored"),
            &formatters,
        )
        .unwrap();
        assert_eq!(result, "It is now 12:23:34 PM!");
    }
}

mod interpolated {
    use super::*;

    #[test]
    fn bracket_payloads_run_through_the_same_runtime() {
        let message = compile_to_json(
            "Hello [0] and [1]",
            CompileOptions {
                allow_string_interpolation: true,
            },
        )
        .unwrap();
        let result = run(
            &message,
            "en",
            &Arguments::<String>::new().set("0", "Ada").set("1", "Grace"),
            &Formatters::new(),
        )
        .unwrap();
        assert_eq!(result, "Hello Ada and Grace");
    }
}

mod errors {
    use super::*;

    #[test]
    fn missing_arguments_are_reported() {
        let message = compiled("Hello {name}!");
        let result = run(
            &message,
            "en",
            &Arguments::<String>::new(),
            &Formatters::new(),
        );
        assert!(matches!(
            result,
            Err(RuntimeError::MissingArgument { name }) if name == "name"
        ));
    }

    #[test]
    fn a_branch_without_other_is_a_hard_error() {
        let message = compiled("{gender, select, female {She}}");
        let result = run(
            &message,
            "en",
            &Arguments::<String>::new().set("gender", "unknown"),
            &Formatters::new(),
        );
        assert!(matches!(result, Err(RuntimeError::MissingBranch { .. })));
    }

    #[test]
    fn plural_values_must_be_numeric() {
        let message = compiled("{n, plural, one {one} other {other}}");
        let result = run(
            &message,
            "en",
            &Arguments::<String>::new().set("n", "three"),
            &Formatters::new(),
        );
        assert!(matches!(result, Err(RuntimeError::ExpectedNumber { .. })));
    }

    #[test]
    fn unregistered_formatters_are_reported() {
        let message = compiled("{T, time}");
        let result = run(
            &message,
            "en",
            &Arguments::<String>::new().set("T", "now"),
            &Formatters::new(),
        );
        assert!(matches!(
            result,
            Err(RuntimeError::MissingFormatter { name }) if name == "time"
        ));
    }
}
