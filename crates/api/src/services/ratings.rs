//! Rating aggregation for dishes and restaurants.
//!
//! Each menu item keeps an incremental `(average_rating, num_ratings)` pair.
//! The restaurant-level average is not incremental: it is the count-weighted
//! mean over every dish and is recomputed in full after any dish changes, so
//! it can never drift from the per-dish aggregates it summarizes.

use crate::models::MenuItem;

/// Fold one new rating into an incremental average.
#[must_use]
#[allow(clippy::cast_precision_loss)] // rating counts stay far below 2^52
pub fn add_rating(average: f64, count: i64, new_rating: f64) -> (f64, i64) {
    let count = count.max(0);
    let updated = (average * count as f64 + new_rating) / (count + 1) as f64;
    (updated, count + 1)
}

/// Count-weighted mean rating across a menu.
///
/// Dishes with no ratings contribute nothing; an unrated menu scores `0.0`.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn restaurant_average(menu: &[MenuItem]) -> f64 {
    let total_ratings: i64 = menu.iter().map(|item| item.num_ratings).sum();
    if total_ratings == 0 {
        return 0.0;
    }
    let weighted_sum: f64 = menu
        .iter()
        .map(|item| item.average_rating * item.num_ratings as f64)
        .sum();
    weighted_sum / total_ratings as f64
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use foodie_eats_core::DishId;
    use rust_decimal::Decimal;

    const TOLERANCE: f64 = 1e-9;

    fn dish(average_rating: f64, num_ratings: i64) -> MenuItem {
        MenuItem {
            id: DishId::generate(),
            name: "dish".to_string(),
            description: String::new(),
            price: Decimal::new(1250, 2),
            average_rating,
            num_ratings,
        }
    }

    #[test]
    fn first_rating_becomes_the_average() {
        let (avg, count) = add_rating(0.0, 0, 4.0);
        assert!((avg - 4.0).abs() < TOLERANCE);
        assert_eq!(count, 1);
    }

    #[test]
    fn incremental_average_matches_full_recompute() {
        let ratings = [5.0, 3.0, 4.0, 4.0, 2.0];
        let (avg, count) = ratings
            .iter()
            .fold((0.0, 0), |(avg, n), &r| add_rating(avg, n, r));
        let expected: f64 = ratings.iter().sum::<f64>() / ratings.len() as f64;
        assert!((avg - expected).abs() < TOLERANCE);
        assert_eq!(count, i64::try_from(ratings.len()).unwrap());
    }

    #[test]
    fn weighted_mean_over_menu() {
        // (4.0 avg over 2) and (5.0 avg over 1) -> 13/3
        let menu = vec![dish(4.0, 2), dish(5.0, 1)];
        let avg = restaurant_average(&menu);
        assert!((avg - 13.0 / 3.0).abs() < TOLERANCE);
    }

    #[test]
    fn folding_into_an_existing_dish_aggregate() {
        // Dish at (4.0 avg, 2 ratings) takes a 3 -> 11/3 ~= 3.667
        let (avg, count) = add_rating(4.0, 2, 3.0);
        assert!((avg - 11.0 / 3.0).abs() < TOLERANCE);
        assert_eq!(count, 3);

        // Alongside a (5.0, 1) dish the restaurant lands at (11 + 5) / 4 = 4.0
        let menu = vec![dish(avg, count), dish(5.0, 1)];
        assert!((restaurant_average(&menu) - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn new_dish_rating_shifts_the_weighted_mean() {
        let mut menu = vec![dish(4.0, 2), dish(5.0, 1)];

        // Third dish gets its first rating of 3
        let (avg, count) = add_rating(0.0, 0, 3.0);
        menu.push(dish(avg, count));
        assert!((menu[2].average_rating - 3.0).abs() < TOLERANCE);

        // (4*2 + 5*1 + 3*1) / 4 = 4.0
        let overall = restaurant_average(&menu);
        assert!((overall - 4.0).abs() < TOLERANCE);
    }

    #[test]
    fn unrated_menu_scores_zero() {
        assert!(restaurant_average(&[]).abs() < TOLERANCE);
        assert!(restaurant_average(&[dish(0.0, 0), dish(0.0, 0)]).abs() < TOLERANCE);
    }

    #[test]
    fn unrated_dishes_do_not_drag_the_average_down() {
        let menu = vec![dish(4.5, 10), dish(0.0, 0)];
        assert!((restaurant_average(&menu) - 4.5).abs() < TOLERANCE);
    }
}
