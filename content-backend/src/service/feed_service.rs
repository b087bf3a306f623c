// content-backend/src/service/feed_service.rs

use crate::domain::content_model::ContentItem;
use crate::domain::feed_item::FeedItem;
use crate::domain::tier::Tier;
use rand::seq::SliceRandom;
use rand::Rng;

/// コンテンツとアップグレード促進カードを表示順に並べる
///
/// 毎リクエスト再計算する純粋変換。キャッシュしないため呼び出しごとに
/// 並び順は変わり得る。乱数源は呼び出し側が注入する。
pub struct FeedComposer;

impl FeedComposer {
    /// N個のコンテンツとU個のアップグレード可能階層からN+U個のフィードを作る
    ///
    /// コンテンツは一様シャッフルし、各階層kのカードを
    /// floor((N / U) * (k + 1)) + k の位置へ挿入して全体に分散させる。
    pub fn compose<R: Rng + ?Sized>(
        items: Vec<ContentItem>,
        upgradable_tiers: &[Tier],
        rng: &mut R,
    ) -> Vec<FeedItem> {
        let mut feed: Vec<FeedItem> = items.into_iter().map(FeedItem::Content).collect();
        feed.shuffle(rng);

        let item_count = feed.len();
        let tier_count = upgradable_tiers.len();
        if tier_count == 0 {
            return feed;
        }

        for (k, tier) in upgradable_tiers.iter().enumerate() {
            let position =
                ((item_count as f64 / tier_count as f64) * (k + 1) as f64).floor() as usize + k;
            feed.insert(position.min(feed.len()), FeedItem::upgrade_prompt(*tier));
        }

        feed
    }
}
