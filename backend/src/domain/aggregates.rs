//! Derived average maintenance for restaurants.
//!
//! Recomputation runs synchronously after every review mutation: one read of
//! the restaurant's review set, one write of the restaurant. Work for a
//! given restaurant is serialized through a keyed lock so two concurrent
//! review writes cannot interleave their read-compute-write sequences;
//! different restaurants proceed independently.

use std::collections::HashMap;
use std::sync::{Mutex as StdMutex, PoisonError};
use std::sync::Arc;

use chrono::Utc;
use tokio::sync::Mutex;
use tracing::debug;

use super::error::Error;
use super::ports::{RestaurantRepository, ReviewRepository};
use super::restaurant::RestaurantId;
use super::review::Review;

/// Mean score and mean present price over a review set.
///
/// Empty sets produce 0, never NaN: a restaurant without reviews (or
/// without priced reviews) reads as zero on both aggregates.
fn averages(reviews: &[Review]) -> (f64, f64) {
    if reviews.is_empty() {
        return (0.0, 0.0);
    }
    let score_total: f64 = reviews.iter().map(|review| review.score.value()).sum();
    let average_score = score_total / reviews.len() as f64;

    let prices: Vec<f64> = reviews
        .iter()
        .filter_map(|review| review.price.map(|price| price.value()))
        .collect();
    let average_price = if prices.is_empty() {
        0.0
    } else {
        prices.iter().sum::<f64>() / prices.len() as f64
    };

    (average_score, average_price)
}

/// Recomputes and persists a restaurant's derived averages.
pub struct Aggregates<R, V> {
    restaurants: Arc<R>,
    reviews: Arc<V>,
    locks: StdMutex<HashMap<RestaurantId, Arc<Mutex<()>>>>,
}

impl<R, V> Aggregates<R, V> {
    /// Create the service over the given repositories.
    pub fn new(restaurants: Arc<R>, reviews: Arc<V>) -> Self {
        Self {
            restaurants,
            reviews,
            locks: StdMutex::new(HashMap::new()),
        }
    }

    fn lock_for(&self, id: RestaurantId) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.entry(id).or_default().clone()
    }
}

impl<R, V> Aggregates<R, V>
where
    R: RestaurantRepository,
    V: ReviewRepository,
{
    /// Recompute `average_score` and `average_price` from the restaurant's
    /// current review set and persist both.
    ///
    /// A restaurant that disappeared mid-cascade is a no-op: the caller
    /// deleting it has no aggregate left to maintain.
    pub async fn recompute(&self, id: &RestaurantId) -> Result<(), Error> {
        let keyed = self.lock_for(*id);
        let _serialized = keyed.lock().await;

        let reviews = self.reviews.find_by_restaurant(id).await?;
        let (average_score, average_price) = averages(&reviews);

        let Some(mut restaurant) = self.restaurants.find_by_id(id).await? else {
            debug!(restaurant_id = %id, "skipping aggregate recompute for missing restaurant");
            return Ok(());
        };
        restaurant.average_score = average_score;
        restaurant.average_price = average_price;
        restaurant.updated_at = Utc::now();
        self.restaurants.update(&restaurant).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ports::{MockRestaurantRepository, MockReviewRepository};
    use crate::domain::restaurant::{PaymentType, Restaurant};
    use crate::domain::review::{Price, ReviewContent, Score};
    use crate::domain::user::UserId;
    use rstest::rstest;
    use std::collections::BTreeSet;

    fn review(restaurant: RestaurantId, score: f64, price: Option<f64>) -> Review {
        Review::new(
            UserId::random(),
            restaurant,
            ReviewContent::new("fine").expect("content"),
            Score::new(score).expect("score"),
            price.map(|value| Price::new(value).expect("price")),
        )
    }

    fn restaurant() -> Restaurant {
        Restaurant::new(
            "Chez Test",
            BTreeSet::from([PaymentType::Card]),
            BTreeSet::from(["bistro".to_owned()]),
            Vec::new(),
            Vec::new(),
        )
        .expect("valid restaurant")
    }

    #[rstest]
    #[case::empty(&[], 0.0, 0.0)]
    #[case::scores_only(&[(8.0, None), (6.0, None), (10.0, None)], 8.0, 0.0)]
    #[case::partial_prices(&[(8.0, Some(10.0)), (6.0, None), (10.0, Some(20.0))], 8.0, 15.0)]
    fn averages_follow_the_review_set(
        #[case] entries: &[(f64, Option<f64>)],
        #[case] expected_score: f64,
        #[case] expected_price: f64,
    ) {
        let id = RestaurantId::random();
        let reviews: Vec<Review> = entries
            .iter()
            .map(|(score, price)| review(id, *score, *price))
            .collect();
        let (score, price) = averages(&reviews);
        assert!((score - expected_score).abs() < f64::EPSILON);
        assert!((price - expected_price).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn recompute_persists_fresh_averages() {
        let stored = restaurant();
        let id = stored.id;
        let mut restaurants = MockRestaurantRepository::new();
        let mut reviews = MockReviewRepository::new();

        reviews
            .expect_find_by_restaurant()
            .times(1)
            .returning(move |restaurant_id| {
                Ok(vec![
                    review(*restaurant_id, 8.0, Some(10.0)),
                    review(*restaurant_id, 6.0, None),
                    review(*restaurant_id, 10.0, Some(20.0)),
                ])
            });
        restaurants
            .expect_find_by_id()
            .times(1)
            .returning(move |_| Ok(Some(stored.clone())));
        restaurants
            .expect_update()
            .times(1)
            .withf(|updated| {
                (updated.average_score - 8.0).abs() < f64::EPSILON
                    && (updated.average_price - 15.0).abs() < f64::EPSILON
            })
            .returning(|_| Ok(()));

        let aggregates = Aggregates::new(Arc::new(restaurants), Arc::new(reviews));
        aggregates.recompute(&id).await.expect("recompute succeeds");
    }

    #[tokio::test]
    async fn recompute_tolerates_missing_restaurants() {
        let mut restaurants = MockRestaurantRepository::new();
        let mut reviews = MockReviewRepository::new();

        reviews
            .expect_find_by_restaurant()
            .times(1)
            .returning(|_| Ok(Vec::new()));
        restaurants.expect_find_by_id().times(1).returning(|_| Ok(None));
        restaurants.expect_update().times(0);

        let aggregates = Aggregates::new(Arc::new(restaurants), Arc::new(reviews));
        aggregates
            .recompute(&RestaurantId::random())
            .await
            .expect("missing restaurant is a no-op");
    }
}
