//! Recommendations use case (MODULE K supplement, SPEC §4.11b), grounded on
//! `original_source/.../application/use_cases/get_recommendations.py`. Pure
//! function over an in-memory flight list; not wired as an additional MCP
//! tool (see DESIGN.md).

use crate::domain::Flight;

#[derive(Debug, Clone, Default)]
pub struct Recommendations {
    pub cheapest: Option<Flight>,
    pub fastest: Option<Flight>,
    pub best_value: Option<Flight>,
}

/// `best_value` scores each flight by a weighted combination of price and
/// duration (lower is better), each divided by the list's own maximum so
/// neither unit dominates, then combined `0.6 * price_score + 0.4 *
/// duration_score`, matching `_calculate_best_value`'s divide-by-max
/// formula rather than a min-max normalization. Ties are broken by list
/// order (first-seen wins).
pub fn recommend(flights: &[Flight]) -> Recommendations {
    if flights.is_empty() {
        return Recommendations::default();
    }

    let cheapest = flights
        .iter()
        .min_by(|a, b| a.price().partial_cmp(&b.price()).unwrap_or(std::cmp::Ordering::Equal))
        .cloned();

    let fastest = flights
        .iter()
        .min_by_key(|f| f.duration_minutes())
        .cloned();

    let best_value = best_value_pick(flights);

    Recommendations {
        cheapest,
        fastest,
        best_value,
    }
}

fn best_value_pick(flights: &[Flight]) -> Option<Flight> {
    let price_max = flights
        .iter()
        .map(|f| f.price().amount())
        .fold(0.0, f64::max)
        .max(1.0);
    let duration_max = flights
        .iter()
        .map(|f| f.duration_minutes() as f64)
        .fold(0.0, f64::max)
        .max(1.0);

    let mut best_index = 0;
    let mut best_score = f64::MAX;

    for (i, flight) in flights.iter().enumerate() {
        let price_score = flight.price().amount() / price_max;
        let duration_score = flight.duration_minutes() as f64 / duration_max;
        let score = 0.6 * price_score + 0.4 * duration_score;
        if score < best_score {
            best_score = score;
            best_index = i;
        }
    }

    flights.get(best_index).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Airport, CabinClass, CabinClassType, Price};
    use chrono::{Duration, TimeZone, Utc};

    fn flight(id: &str, price: f64, duration_hours: i64) -> Flight {
        let dep = Utc.with_ymd_and_hms(2026, 6, 1, 6, 0, 0).unwrap();
        Flight::new(
            "kiwi",
            id,
            Airport::new("JFK").unwrap(),
            Airport::new("LAX").unwrap(),
            dep,
            dep + Duration::hours(duration_hours),
            Price::new(price, "USD").unwrap(),
            CabinClass::new(CabinClassType::Economy),
            0,
            "DL".into(),
            None,
            None,
            None,
            None,
        )
        .unwrap()
    }

    #[test]
    fn empty_list_yields_no_recommendations() {
        let recs = recommend(&[]);
        assert!(recs.cheapest.is_none());
        assert!(recs.fastest.is_none());
        assert!(recs.best_value.is_none());
    }

    #[test]
    fn picks_cheapest_and_fastest_independently() {
        let flights = vec![flight("1", 500.0, 3), flight("2", 100.0, 8)];
        let recs = recommend(&flights);
        assert_eq!(recs.cheapest.unwrap().id(), "kiwi_2");
        assert_eq!(recs.fastest.unwrap().id(), "kiwi_1");
    }

    #[test]
    fn single_flight_is_every_recommendation() {
        let flights = vec![flight("1", 200.0, 5)];
        let recs = recommend(&flights);
        assert_eq!(recs.cheapest.unwrap().id(), "kiwi_1");
        assert_eq!(recs.fastest.unwrap().id(), "kiwi_1");
        assert_eq!(recs.best_value.unwrap().id(), "kiwi_1");
    }

    #[test]
    fn best_value_balances_price_and_duration() {
        // "2" is cheapest overall and reasonably fast; "1" is expensive but
        // fastest; "3" is slow and mid-priced. Weighted 60/40 toward price,
        // "2" should win: price/duration scores (900/900,120/720)=(1.0,.167),
        // (150/900,360/720)=(.167,.5), (400/900,720/720)=(.444,1.0) give
        // combined scores .667, .3, .667.
        let flights = vec![flight("1", 900.0, 2), flight("2", 150.0, 6), flight("3", 400.0, 12)];
        let recs = recommend(&flights);
        assert_eq!(recs.best_value.unwrap().id(), "kiwi_2");
    }
}
