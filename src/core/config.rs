/// Substring-match bonuses added to a result's relevance score.
///
/// The defaults are the hand-tuned production values; no derivation for
/// them exists, so they are kept overridable rather than folded into the
/// search code.
#[derive(Debug, Clone)]
pub struct RelevanceWeights {
    pub title: f64,
    pub description: f64,
    pub category: f64,
    pub tag: f64,
}

impl Default for RelevanceWeights {
    fn default() -> Self {
        RelevanceWeights {
            title: 10.0,
            description: 5.0,
            category: 3.0,
            tag: 2.0,
        }
    }
}

/// Per-counter weights for the engagement score, normalized by `scale`.
#[derive(Debug, Clone)]
pub struct EngagementWeights {
    pub view: f64,
    pub save: f64,
    pub share: f64,
    pub implement: f64,
    pub scale: f64,
}

impl Default for EngagementWeights {
    fn default() -> Self {
        EngagementWeights {
            view: 1.0,
            save: 3.0,
            share: 5.0,
            implement: 10.0,
            scale: 100.0,
        }
    }
}

/// Components of the personalization score.
#[derive(Debug, Clone)]
pub struct PersonalizationWeights {
    pub base: f64,
    pub category_factor: f64,
    pub audience_factor: f64,
}

impl Default for PersonalizationWeights {
    fn default() -> Self {
        PersonalizationWeights {
            base: 0.5,
            category_factor: 0.3,
            audience_factor: 0.2,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    /// Tokens of this length or shorter are dropped during indexing and
    /// query parsing.
    pub min_token_len: usize,
    pub relevance: RelevanceWeights,
    pub engagement: EngagementWeights,
    pub personalization: PersonalizationWeights,
    /// Viral score above this counts as trending.
    pub trending_threshold: f64,
    pub trending_limit: usize,
    /// Max distinct category suggestions returned with search results.
    pub suggestion_limit: usize,
    pub cache_ttl_secs: u64,
    /// Entry cap for the point-lookup cache. The source cache grew
    /// without bound; capping it is a deliberate deviation.
    pub cache_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            min_token_len: 2,
            relevance: RelevanceWeights::default(),
            engagement: EngagementWeights::default(),
            personalization: PersonalizationWeights::default(),
            trending_threshold: 0.7,
            trending_limit: 20,
            suggestion_limit: 3,
            cache_ttl_secs: 300, // 5 minutes
            cache_capacity: 4096,
        }
    }
}
