// ============================================
// Ad Insertion Stage (广告插入)
// ============================================
//
// After every `ad_frequency`-th organic post the next unused ad is spliced
// in. Leftover ads are appended once organic posts run out, and the whole
// feed is truncated to `max_posts_per_feed`.

use crate::models::Post;
use tracing::debug;

pub struct AdInsertionLayer {
    ad_frequency: usize,
    max_posts_per_feed: usize,
}

impl AdInsertionLayer {
    pub fn new(ad_frequency: usize, max_posts_per_feed: usize) -> Self {
        Self {
            ad_frequency,
            max_posts_per_feed,
        }
    }

    /// Interleave `ads` into `organic`. Without ads, or with a zero
    /// frequency, the organic list passes through unchanged.
    pub fn insert_ads(&self, organic: Vec<Post>, ads: Option<&[Post]>) -> Vec<Post> {
        let ads = match ads {
            Some(ads) if !ads.is_empty() && self.ad_frequency > 0 => ads,
            _ => return organic,
        };

        let mut feed = Vec::with_capacity(organic.len() + ads.len());
        let mut pending = ads.iter();
        let mut inserted = 0;

        for (position, post) in organic.into_iter().enumerate() {
            feed.push(post);
            if (position + 1) % self.ad_frequency == 0 {
                if let Some(ad) = pending.next() {
                    feed.push(ad.clone());
                    inserted += 1;
                }
            }
        }

        for ad in pending {
            if feed.len() >= self.max_posts_per_feed {
                break;
            }
            feed.push(ad.clone());
            inserted += 1;
        }

        feed.truncate(self.max_posts_per_feed);

        debug!(
            ads_inserted = inserted,
            feed_len = feed.len(),
            "Ad insertion completed"
        );

        feed
    }
}
