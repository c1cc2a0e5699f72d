use chrono::{Days, NaiveDate};
use desk_filter::{
    matches_date_range, matches_search, matches_status, matches_tags, FilterCriteria, FilterEngine,
};
use desk_model::{Article, ArticleStatus, Tag, TagId};
use desk_test_utils::{acme_articles, login_scenario, ACME};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use std::collections::BTreeSet;

fn status_strategy() -> impl Strategy<Value = Option<ArticleStatus>> {
    prop_oneof![
        Just(None),
        Just(Some(ArticleStatus::Draft)),
        Just(Some(ArticleStatus::Production)),
        Just(Some(ArticleStatus::Closed)),
    ]
}

fn day_strategy() -> impl Strategy<Value = NaiveDate> {
    (0u64..60).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1)
            .and_then(|d| d.checked_add_days(Days::new(offset)))
            .unwrap()
    })
}

fn article_strategy() -> impl Strategy<Value = Article> {
    (
        "[a-z]{1,6}",
        proptest::option::of("[a-z ]{0,12}"),
        status_strategy(),
        proptest::option::of(day_strategy()),
        proptest::collection::btree_set(0usize..4, 0..4),
    )
        .prop_map(|(id, title, status, day, tags)| {
            let mut article = Article::new(id, ACME, "");
            article.title = title;
            article.status = status;
            article.created_at = day.map(|d| format!("{d}T12:00:00Z"));
            for t in tags {
                article = article.with_tag(&Tag::new(format!("t{t}"), format!("tag{t}"), ACME));
            }
            article
        })
}

fn criteria_strategy() -> impl Strategy<Value = FilterCriteria> {
    (
        "[a-z]{0,3}",
        status_strategy(),
        proptest::option::of(day_strategy()),
        proptest::option::of(day_strategy()),
        proptest::collection::btree_set(0usize..4, 0..3),
    )
        .prop_map(|(query, status, start, end, tags)| FilterCriteria {
            search_query: query,
            status_filter: status,
            date_range_start: start,
            date_range_end: end,
            selected_tag_ids: tags.into_iter().map(|t| TagId::from(format!("t{t}"))).collect(),
        })
}

proptest! {
    #[test]
    fn prop_unconstrained_filter_is_identity(
        articles in proptest::collection::vec(article_strategy(), 0..12)
    ) {
        let result = FilterEngine::new().filter(&articles, &FilterCriteria::default());
        prop_assert_eq!(result, articles);
    }

    #[test]
    fn prop_single_article_kept_iff_all_predicates_hold(
        article in article_strategy(),
        criteria in criteria_strategy(),
    ) {
        let expected = matches_search(&article, &criteria.search_query)
            && matches_status(&article, criteria.status_filter)
            && matches_date_range(&article, criteria.date_range_start, criteria.date_range_end)
            && matches_tags(&article, &criteria.selected_tag_ids);

        let result = FilterEngine::new().filter(std::slice::from_ref(&article), &criteria);
        prop_assert_eq!(result.contains(&article), expected);
    }

    #[test]
    fn prop_tag_filter_is_subset_test(
        article in article_strategy(),
        wanted in proptest::collection::btree_set(0usize..4, 0..4),
    ) {
        let ids: BTreeSet<TagId> = wanted.into_iter().map(|t| TagId::from(format!("t{t}"))).collect();
        let carried: BTreeSet<TagId> = article.tag_ids().cloned().collect();
        prop_assert_eq!(matches_tags(&article, &ids), ids.is_subset(&carried));
    }

    #[test]
    fn prop_filter_keeps_relative_order(
        articles in proptest::collection::vec(article_strategy(), 0..12),
        criteria in criteria_strategy(),
    ) {
        let result = FilterEngine::new().filter_refs(&articles, &criteria);
        let positions: Vec<usize> = result
            .iter()
            .filter_map(|kept| articles.iter().position(|a| std::ptr::eq(a, *kept)))
            .collect();
        prop_assert_eq!(positions.len(), result.len());
        prop_assert!(positions.windows(2).all(|w| w[0] < w[1]));
    }
}

#[test]
fn login_scenario_keeps_only_production_match() {
    let criteria = FilterCriteria::new()
        .with_search("login")
        .with_status(ArticleStatus::Production);
    let result = FilterEngine::new().filter(&login_scenario(), &criteria);
    let ids: Vec<&str> = result.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a1"]);
}

#[test]
fn date_range_boundaries_on_creation_day() {
    let articles = login_scenario();
    let a1 = &articles[0];
    let created = a1.created_day().unwrap();

    assert!(matches_date_range(a1, Some(created), Some(created)));
    let next_day = created.checked_add_days(Days::new(1));
    assert!(!matches_date_range(a1, next_day, None));
}

#[test]
fn combined_predicates_across_wider_set() {
    let criteria = FilterCriteria::new()
        .with_tag("t3")
        .with_date_range(NaiveDate::from_ymd_opt(2024, 4, 1), NaiveDate::from_ymd_opt(2024, 4, 30));
    let result = FilterEngine::new().filter(&acme_articles(), &criteria);
    let ids: Vec<&str> = result.iter().map(|a| a.id.as_str()).collect();
    assert_eq!(ids, vec!["a3", "a4"]);

    let escalated = FilterEngine::new().filter(&acme_articles(), &criteria.with_search("ESCALATED"));
    assert_eq!(escalated.len(), 1);
    assert_eq!(escalated[0].id.as_str(), "a3");
}
