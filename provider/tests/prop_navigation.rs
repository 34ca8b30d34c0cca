use demo_schema::DemoScreen;
use proptest::prelude::*;
use provider::{MemoryLocation, SearchParamsProvider};
use query::UrlParams;

fn query_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(
        (
            prop_oneof![
                Just("query"),
                Just("offset"),
                Just("rows"),
                Just("sort"),
                Just("tc"),
                Just("filters"),
                Just("refresh"),
                Just("colour"),
            ],
            "[a-z0-9~:-]{0,6}",
        ),
        0..8,
    )
    .prop_map(|pairs| {
        pairs
            .into_iter()
            .collect::<UrlParams>()
            .to_string()
    })
}

proptest! {
    #[test]
    fn prop_repeated_update_is_idempotent(start in query_strategy(), next in query_strategy()) {
        let mut provider = SearchParamsProvider::new(
            DemoScreen::Alerts.parser(),
            MemoryLocation::new(&format!("/alerts?{start}")),
        );
        provider.mount();

        let params = UrlParams::parse(&next);
        provider.set_search_params(&params);
        let navigations = provider.port().navigations();
        prop_assert!(navigations <= 1);

        let again = provider.set_search_params(&params);
        prop_assert!(again.is_noop());
        prop_assert_eq!(provider.port().navigations(), navigations);
    }

    #[test]
    fn prop_location_never_carries_hidden_or_ignored(next in query_strategy()) {
        let mut provider = SearchParamsProvider::new(
            DemoScreen::Alerts.parser(),
            MemoryLocation::new("/alerts"),
        );
        provider.mount();
        provider.set_search_params(&UrlParams::parse(&next));

        let visible = UrlParams::parse(provider.location().query());
        for key in ["rows", "sort", "refresh", "track_total_hits", "colour"] {
            prop_assert!(!visible.has(key));
        }
    }

    #[test]
    fn prop_echo_keeps_state(next in query_strategy()) {
        let mut provider = SearchParamsProvider::new(
            DemoScreen::Alerts.parser(),
            MemoryLocation::new("/alerts"),
        );
        provider.mount();
        provider.set_search_params(&UrlParams::parse(&next));
        let before = provider.search().cloned();

        provider.handle_location_change();
        prop_assert_eq!(provider.search().cloned(), before);
    }
}
