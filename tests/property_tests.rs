//! Property-based tests for path templates and route resolution.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated templates, paths and route tables.

use chrono::Utc;
use mindset_router::navigation::Location;
use mindset_router::pattern::{build_uri, match_uri, Params, PathPattern};
use mindset_router::routes::{resolve, Route, RouteTable};
use mindset_router::statechart::{StateAddress, TransitionLog, TransitionRecord};
use mindset_router::RouterOptions;
use proptest::prelude::*;

prop_compose! {
    fn literal_template()(segments in prop::collection::vec("[a-z][a-z0-9-]{0,7}", 1..5)) -> String {
        format!("/{}", segments.join("/"))
    }
}

prop_compose! {
    /// A template with `n` placeholders `:k0`..`:kn`, each behind a literal segment.
    fn placeholder_template()(n in 1..5usize) -> (String, Vec<String>) {
        let keys: Vec<String> = (0..n).map(|i| format!("k{i}")).collect();
        let template = keys.iter().enumerate().map(|(i, key)| format!("/s{i}/:{key}")).collect::<String>();
        (template, keys)
    }
}

prop_compose! {
    fn filled_template()((template, keys) in placeholder_template())(
        values in prop::collection::vec(".{1,8}", keys.len()),
        extra in prop::collection::btree_map("x[a-z]{1,4}", "[a-z0-9]{1,8}", 0..3),
        template in Just(template),
        keys in Just(keys),
    ) -> (String, Params, Params) {
        let expected: Params = keys
            .into_iter()
            .zip(values)
            .map(|(key, value)| (key, Some(value)))
            .collect();
        let mut supplied = expected.clone();
        supplied.extend(extra.into_iter().map(|(key, value)| (key, Some(value))));
        (template, supplied, expected)
    }
}

fn arbitrary_template() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "/",
        "/about",
        "/users/me",
        "/users/:id",
        "/users/:name",
        "/users/:id/posts",
        "/files/(.*)",
        "(.*)",
    ])
}

fn arbitrary_path() -> impl Strategy<Value = &'static str> {
    prop::sample::select(vec![
        "/",
        "/about",
        "/users/me",
        "/users/42",
        "/users/42/posts",
        "/files/a/b.txt",
        "/nowhere",
    ])
}

proptest! {
    #[test]
    fn literal_template_matches_only_itself(template in literal_template()) {
        prop_assert_eq!(match_uri(Some(template.as_str()), &template).unwrap(), Some(Params::new()));

        let other = format!("{template}x");
        prop_assert_eq!(match_uri(Some(template.as_str()), &other).unwrap(), None);
    }

    #[test]
    fn placeholder_match_has_one_entry_per_placeholder((template, supplied, _expected) in filled_template()) {
        let pattern = PathPattern::compile(&template, &RouterOptions::default()).unwrap();
        let path = pattern.build(&supplied);

        let matched = pattern.matches(&path).unwrap();
        prop_assert_eq!(matched.len(), pattern.keys().count());
    }

    #[test]
    fn build_then_match_roundtrips((template, supplied, expected) in filled_template()) {
        let path = build_uri(&template, &supplied).unwrap();
        let matched = match_uri(Some(template.as_str()), &path).unwrap();

        prop_assert_eq!(matched, Some(expected));
    }

    #[test]
    fn resolver_returns_first_declared_match(
        templates in prop::collection::vec(arbitrary_template(), 1..6),
        path in arbitrary_path(),
    ) {
        let options = RouterOptions::default();
        let routes: Vec<Route> = templates
            .iter()
            .enumerate()
            .map(|(i, template)| Route::new(format!("r{i}").as_str(), *template))
            .collect();
        let table = RouteTable::compile(routes, &options).unwrap();
        let location = Location::parse(path);

        let expected = templates.iter().find_map(|template| {
            PathPattern::compile(template, &options).unwrap().matches(path)
        });
        prop_assert_eq!(resolve(&table, &location, false), expected.clone());

        if let Some((route, params)) = table.resolve_route(&location) {
            let first = templates
                .iter()
                .position(|template| *template == route.path)
                .unwrap();
            prop_assert!(templates[..first]
                .iter()
                .all(|t| PathPattern::compile(t, &options).unwrap().matches(path).is_none()));
            prop_assert_eq!(Some(params), expected);
        }
    }

    #[test]
    fn tolerant_pass_ignores_duplicate_slashes(template in literal_template()) {
        let table = RouteTable::compile(vec![Route::new("target", template.as_str())], &RouterOptions::default()).unwrap();
        let sloppy = format!("/{}//", template.replace('/', "//"));

        prop_assert_eq!(resolve(&table, &Location::parse(&sloppy), false), Some(Params::new()));
    }

    #[test]
    fn transition_log_preserves_order(
        names in prop::collection::vec("[a-z]{1,6}", 1..8)
    ) {
        let mut log = TransitionLog::new();
        let mut from = StateAddress::parse("start");
        for name in &names {
            let to = StateAddress::parse(name);
            log = log.record(TransitionRecord {
                from: from.clone(),
                to: to.clone(),
                event: "Go".to_string(),
                timestamp: Utc::now(),
            });
            from = to;
        }

        let path = log.path();
        prop_assert_eq!(path.len(), names.len() + 1);
        prop_assert_eq!(path[0], &StateAddress::parse("start"));
        for (i, name) in names.iter().enumerate() {
            prop_assert_eq!(path[i + 1], &StateAddress::parse(name));
        }
    }

    #[test]
    fn transition_log_record_is_pure(name in "[a-z]{1,6}") {
        let log = TransitionLog::new();
        let next = log.record(TransitionRecord {
            from: StateAddress::parse("start"),
            to: StateAddress::parse(&name),
            event: "Go".to_string(),
            timestamp: Utc::now(),
        });

        prop_assert!(log.is_empty());
        prop_assert_eq!(next.len(), 1);
    }
}
