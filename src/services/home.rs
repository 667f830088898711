use serde::Serialize;

use crate::{
    error::AppResult,
    models::{Movie, RankedEntry},
    services::{
        aggregator::AggregateOptions,
        catalog::{rank_by_vote_count, CatalogProvider},
        community::CommunityService,
    },
};

/// Popular movies shown at the top of the home page
pub const HOME_POPULAR_LIMIT: usize = 8;
/// Length of the home page's most-voted strip
pub const HOME_MOST_VOTED_LIMIT: usize = 10;

/// Everything the home page shows in one payload
#[derive(Debug, Clone, Serialize)]
pub struct HomeFeed {
    pub popular: Vec<Movie>,
    pub most_voted: Vec<Movie>,
    pub community_top: Vec<RankedEntry>,
}

/// Builds the home feed from the first catalog page and the community top 5
pub async fn build_home_feed(
    catalog: &dyn CatalogProvider,
    community: &CommunityService,
) -> AppResult<HomeFeed> {
    let (popular_page, community_top) = tokio::try_join!(
        catalog.popular_movies(1),
        community.top_rated(AggregateOptions::home())
    )?;

    let most_voted = rank_by_vote_count(popular_page.results.clone(), HOME_MOST_VOTED_LIMIT);
    let popular: Vec<Movie> = popular_page
        .results
        .into_iter()
        .take(HOME_POPULAR_LIMIT)
        .collect();

    tracing::debug!(
        provider = catalog.name(),
        popular = popular.len(),
        most_voted = most_voted.len(),
        community_top = community_top.len(),
        "Home feed built"
    );

    Ok(HomeFeed {
        popular,
        most_voted,
        community_top: RankedEntry::rank_all(community_top),
    })
}
