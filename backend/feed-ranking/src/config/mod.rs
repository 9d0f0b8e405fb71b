use crate::models::Post;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Ranking configuration. Every field has a default, so partial overrides
/// deserialize onto the defaults field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RankingConfig {
    pub weights: RankingWeights,
    pub limits: FeedLimits,
    pub time_decay: TimeDecay,
    /// `None` disables the trending boost in recency scoring.
    pub trending_threshold: Option<TrendingThreshold>,
    pub filter: FilterConfig,
    /// Ads spliced into the organic feed, in insertion order.
    pub ad_pool: Option<Vec<Post>>,
}

impl Default for RankingConfig {
    fn default() -> Self {
        Self {
            weights: RankingWeights::default(),
            limits: FeedLimits::default(),
            time_decay: TimeDecay::default(),
            trending_threshold: Some(TrendingThreshold::default()),
            filter: FilterConfig::default(),
            ad_pool: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    pub engagement: f32,
    pub recency: f32,
    pub connection: f32,
    pub diversity: f32,
    pub quality: f32,
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            engagement: 0.4,
            recency: 0.3,
            connection: 0.15,
            diversity: 0.1,
            quality: 0.05,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FeedLimits {
    pub max_posts_per_account: usize,
    pub max_posts_per_feed: usize,
    /// Organic posts between two ads. Zero disables ad insertion.
    pub ad_frequency: usize,
}

impl Default for FeedLimits {
    fn default() -> Self {
        Self {
            max_posts_per_account: 2,
            max_posts_per_feed: 20,
            ad_frequency: 5,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TimeDecay {
    pub half_life_hours: f64,
    pub max_age_hours: f64,
}

impl Default for TimeDecay {
    fn default() -> Self {
        Self {
            half_life_hours: 12.0,
            max_age_hours: 48.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TrendingThreshold {
    pub min_engagement: usize,
    pub max_age_hours: f64,
}

impl Default for TrendingThreshold {
    fn default() -> Self {
        Self {
            min_engagement: 10,
            max_age_hours: 1.0,
        }
    }
}

/// Filter-stage settings, configured apart from recency decay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FilterConfig {
    /// Age cutoff for the filter stage. Falls back to `time_decay.max_age_hours`.
    pub max_age_hours: Option<f64>,
}

impl RankingConfig {
    /// Age cutoff applied by the filter stage.
    pub fn filter_max_age_hours(&self) -> f64 {
        self.filter
            .max_age_hours
            .unwrap_or(self.time_decay.max_age_hours)
    }

    /// Replace malformed fields with their defaults, one field at a time.
    pub fn sanitized(mut self) -> Self {
        let weights = RankingWeights::default();
        sanitize_weight(&mut self.weights.engagement, weights.engagement, "engagement");
        sanitize_weight(&mut self.weights.recency, weights.recency, "recency");
        sanitize_weight(&mut self.weights.connection, weights.connection, "connection");
        sanitize_weight(&mut self.weights.diversity, weights.diversity, "diversity");
        sanitize_weight(&mut self.weights.quality, weights.quality, "quality");

        let limits = FeedLimits::default();
        if self.limits.max_posts_per_account == 0 {
            warn!(default = limits.max_posts_per_account, "max_posts_per_account is zero, using default");
            self.limits.max_posts_per_account = limits.max_posts_per_account;
        }
        if self.limits.max_posts_per_feed == 0 {
            warn!(default = limits.max_posts_per_feed, "max_posts_per_feed is zero, using default");
            self.limits.max_posts_per_feed = limits.max_posts_per_feed;
        }

        let decay = TimeDecay::default();
        sanitize_hours(&mut self.time_decay.half_life_hours, decay.half_life_hours, "half_life_hours");
        sanitize_hours(&mut self.time_decay.max_age_hours, decay.max_age_hours, "max_age_hours");

        if let Some(trending) = self.trending_threshold.as_mut() {
            sanitize_hours(
                &mut trending.max_age_hours,
                TrendingThreshold::default().max_age_hours,
                "trending_max_age_hours",
            );
        }

        if let Some(hours) = self.filter.max_age_hours {
            if !is_positive_hours(hours) {
                warn!(value = hours, "filter max_age_hours is invalid, using time decay cutoff");
                self.filter.max_age_hours = None;
            }
        }

        self
    }

    /// Load overrides from `RANKING_*` environment variables.
    ///
    /// Missing or unparsable variables keep that field's default.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        let env: EnvOverrides = envy::prefixed("RANKING_").from_env()?;
        let defaults = RankingConfig::default();
        let trending = TrendingThreshold::default();

        let config = RankingConfig {
            weights: RankingWeights {
                engagement: parse_or(env.weight_engagement, defaults.weights.engagement),
                recency: parse_or(env.weight_recency, defaults.weights.recency),
                connection: parse_or(env.weight_connection, defaults.weights.connection),
                diversity: parse_or(env.weight_diversity, defaults.weights.diversity),
                quality: parse_or(env.weight_quality, defaults.weights.quality),
            },
            limits: FeedLimits {
                max_posts_per_account: parse_or(
                    env.max_posts_per_account,
                    defaults.limits.max_posts_per_account,
                ),
                max_posts_per_feed: parse_or(env.max_posts_per_feed, defaults.limits.max_posts_per_feed),
                ad_frequency: parse_or(env.ad_frequency, defaults.limits.ad_frequency),
            },
            time_decay: TimeDecay {
                half_life_hours: parse_or(env.half_life_hours, defaults.time_decay.half_life_hours),
                max_age_hours: parse_or(env.max_age_hours, defaults.time_decay.max_age_hours),
            },
            trending_threshold: Some(TrendingThreshold {
                min_engagement: parse_or(env.trending_min_engagement, trending.min_engagement),
                max_age_hours: parse_or(env.trending_max_age_hours, trending.max_age_hours),
            }),
            filter: FilterConfig {
                max_age_hours: env.filter_max_age_hours.and_then(|v| v.parse().ok()),
            },
            ad_pool: None,
        };

        Ok(config.sanitized())
    }
}

#[derive(Debug, Default, Deserialize)]
struct EnvOverrides {
    weight_engagement: Option<String>,
    weight_recency: Option<String>,
    weight_connection: Option<String>,
    weight_diversity: Option<String>,
    weight_quality: Option<String>,
    max_posts_per_account: Option<String>,
    max_posts_per_feed: Option<String>,
    ad_frequency: Option<String>,
    half_life_hours: Option<String>,
    max_age_hours: Option<String>,
    trending_min_engagement: Option<String>,
    trending_max_age_hours: Option<String>,
    filter_max_age_hours: Option<String>,
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, default: T) -> T {
    value.and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn is_positive_hours(hours: f64) -> bool {
    hours.is_finite() && hours > 0.0
}

fn sanitize_weight(value: &mut f32, default: f32, name: &str) {
    if !value.is_finite() || *value < 0.0 {
        warn!(weight = name, value = *value, default, "invalid ranking weight, using default");
        *value = default;
    }
}

fn sanitize_hours(value: &mut f64, default: f64, name: &str) {
    if !is_positive_hours(*value) {
        warn!(field = name, value = *value, default, "invalid time window, using default");
        *value = default;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    #[test]
    fn test_partial_override_merges_onto_defaults() {
        let json = r#"{"weights":{"engagement":0.7},"limits":{"maxPostsPerFeed":5}}"#;
        let config: RankingConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.weights.engagement, 0.7);
        assert_eq!(config.weights.recency, 0.3);
        assert_eq!(config.limits.max_posts_per_feed, 5);
        assert_eq!(config.limits.max_posts_per_account, 2);
        assert_eq!(config.time_decay.half_life_hours, 12.0);
        assert_eq!(config.trending_threshold, Some(TrendingThreshold::default()));
    }

    #[test]
    fn test_sanitized_replaces_only_bad_fields() {
        let mut config = RankingConfig::default();
        config.weights.recency = f32::NAN;
        config.weights.quality = -1.0;
        config.weights.engagement = 0.9;
        config.limits.max_posts_per_feed = 0;
        config.limits.ad_frequency = 0;
        config.time_decay.half_life_hours = 0.0;
        config.filter.max_age_hours = Some(-3.0);

        let config = config.sanitized();

        assert_eq!(config.weights.recency, 0.3);
        assert_eq!(config.weights.quality, 0.05);
        assert_eq!(config.weights.engagement, 0.9);
        assert_eq!(config.limits.max_posts_per_feed, 20);
        assert_eq!(config.limits.ad_frequency, 0);
        assert_eq!(config.time_decay.half_life_hours, 12.0);
        assert_eq!(config.filter.max_age_hours, None);
    }

    #[test]
    fn test_filter_cutoff_is_independent_of_decay() {
        let mut config = RankingConfig::default();
        assert_eq!(config.filter_max_age_hours(), 48.0);

        config.filter.max_age_hours = Some(72.0);
        assert_eq!(config.filter_max_age_hours(), 72.0);
        assert_eq!(config.time_decay.max_age_hours, 48.0);
    }

    #[test]
    #[serial]
    fn test_from_env_falls_back_per_field() {
        env::set_var("RANKING_WEIGHT_ENGAGEMENT", "0.55");
        env::set_var("RANKING_MAX_POSTS_PER_FEED", "not-a-number");
        env::set_var("RANKING_AD_FREQUENCY", "3");

        let config = RankingConfig::from_env().unwrap();

        assert_eq!(config.weights.engagement, 0.55);
        assert_eq!(config.limits.max_posts_per_feed, 20);
        assert_eq!(config.limits.ad_frequency, 3);
        assert_eq!(config.time_decay.max_age_hours, 48.0);

        env::remove_var("RANKING_WEIGHT_ENGAGEMENT");
        env::remove_var("RANKING_MAX_POSTS_PER_FEED");
        env::remove_var("RANKING_AD_FREQUENCY");
    }

    #[test]
    #[serial]
    fn test_from_env_defaults_without_variables() {
        let config = RankingConfig::from_env().unwrap();
        assert_eq!(config.limits, FeedLimits::default());
        assert_eq!(config.weights, RankingWeights::default());
    }
}
