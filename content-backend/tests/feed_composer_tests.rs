// tests/feed_composer_tests.rs

mod common;

use common::content_item;
use content_backend::domain::feed_item::FeedItem;
use content_backend::domain::tier::Tier;
use content_backend::service::entitlement_service::EntitlementResolver;
use content_backend::service::feed_service::FeedComposer;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use uuid::Uuid;

fn content_ids(feed: &[FeedItem]) -> Vec<Uuid> {
    feed.iter()
        .filter_map(|item| match item {
            FeedItem::Content(content) => Some(content.id),
            FeedItem::UpgradePrompt { .. } => None,
        })
        .collect()
}

#[test]
fn test_feed_length_is_always_n_plus_u() {
    for (n, current) in [(0, Tier::Free), (1, Tier::Silver), (7, Tier::Gold), (12, Tier::Platinum)] {
        let items: Vec<_> = (0..n).map(|i| content_item(Tier::Free, i as i64)).collect();
        let upgradable = EntitlementResolver::upgradable_tiers(current);
        let mut rng = StdRng::seed_from_u64(42);

        let feed = FeedComposer::compose(items, &upgradable, &mut rng);
        assert_eq!(feed.len(), n + upgradable.len());
    }
}

#[test]
fn test_every_input_item_appears_exactly_once() {
    let items: Vec<_> = (0..9).map(|i| content_item(Tier::Silver, i)).collect();
    let expected: HashSet<Uuid> = items.iter().map(|i| i.id).collect();
    let mut rng = StdRng::seed_from_u64(3);

    let feed = FeedComposer::compose(items, &[Tier::Gold, Tier::Platinum], &mut rng);
    let ids = content_ids(&feed);

    assert_eq!(ids.len(), 9);
    assert_eq!(ids.into_iter().collect::<HashSet<_>>(), expected);
}

#[test]
fn test_exactly_one_prompt_per_upgradable_tier() {
    let items: Vec<_> = (0..5).map(|i| content_item(Tier::Free, i)).collect();
    let upgradable = EntitlementResolver::upgradable_tiers(Tier::Free);
    let mut rng = StdRng::seed_from_u64(11);

    let feed = FeedComposer::compose(items, &upgradable, &mut rng);
    let prompt_tiers: Vec<Tier> = feed
        .iter()
        .filter_map(|item| match item {
            FeedItem::UpgradePrompt { tier, .. } => Some(*tier),
            FeedItem::Content(_) => None,
        })
        .collect();

    assert_eq!(prompt_tiers, vec![Tier::Silver, Tier::Gold, Tier::Platinum]);
}

#[test]
fn test_prompts_are_spread_by_the_insertion_formula() {
    // N=6, U=2: k=0 → floor(6/2*1)+0 = 3, k=1 → floor(6/2*2)+1 = 7
    let items: Vec<_> = (0..6).map(|i| content_item(Tier::Free, i)).collect();
    let mut rng = StdRng::seed_from_u64(99);

    let feed = FeedComposer::compose(items, &[Tier::Gold, Tier::Platinum], &mut rng);

    assert_eq!(feed.len(), 8);
    assert!(matches!(
        &feed[3],
        FeedItem::UpgradePrompt { tier: Tier::Gold, .. }
    ));
    assert!(matches!(
        &feed[7],
        FeedItem::UpgradePrompt { tier: Tier::Platinum, .. }
    ));
}

#[test]
fn test_max_tier_gets_a_plain_permutation() {
    let items: Vec<_> = (0..4).map(|i| content_item(Tier::Platinum, i)).collect();
    let expected: HashSet<Uuid> = items.iter().map(|i| i.id).collect();
    let mut rng = StdRng::seed_from_u64(5);

    let feed = FeedComposer::compose(
        items,
        &EntitlementResolver::upgradable_tiers(Tier::Platinum),
        &mut rng,
    );

    assert_eq!(feed.len(), 4);
    assert!(feed.iter().all(|item| !item.is_upgrade_prompt()));
    assert_eq!(
        content_ids(&feed).into_iter().collect::<HashSet<_>>(),
        expected
    );
}

#[test]
fn test_shuffle_is_not_deterministic_across_calls() {
    // 確率的な検証: 多数回の試行で並び順が一度も変わらない確率は無視できる
    let items: Vec<_> = (0..8).map(|i| content_item(Tier::Free, i)).collect();
    let mut orderings = HashSet::new();

    for _ in 0..20 {
        let feed = FeedComposer::compose(items.clone(), &[], &mut rand::thread_rng());
        orderings.insert(content_ids(&feed));
    }

    assert!(orderings.len() > 1, "expected at least two distinct orderings");
}

#[test]
fn test_seeded_rng_makes_composition_reproducible() {
    let items: Vec<_> = (0..10).map(|i| content_item(Tier::Free, i)).collect();

    let feed_a = FeedComposer::compose(
        items.clone(),
        &[Tier::Silver, Tier::Gold],
        &mut StdRng::seed_from_u64(1234),
    );
    let feed_b = FeedComposer::compose(
        items,
        &[Tier::Silver, Tier::Gold],
        &mut StdRng::seed_from_u64(1234),
    );

    assert_eq!(feed_a, feed_b);
}
