use serde_json::json;
use tirtha_estimator::{
    core::{category_bounds, deterministic_estimate},
    BudgetLevel, CostCategory, Estimator, EstimatorConfig, TravelMode, TripRequest,
};

fn sample_requests() -> Vec<TripRequest> {
    let mut requests = Vec::new();
    for mode in ["flight", "train", "car", "bus"] {
        for budget in ["budget", "medium", "luxury", "premium"] {
            for (days, travelers) in [(1, 1), (3, 2), (7, 5), (15, 12)] {
                requests.push(
                    TripRequest::new("Varanasi", "Kashi Vishwanath")
                        .with_travel_mode(mode)
                        .with_budget_level(budget)
                        .with_duration_days(days)
                        .with_traveler_count(travelers),
                );
            }
        }
    }
    requests
}

#[tokio::test]
async fn test_train_medium_example_end_to_end() {
    let request = TripRequest::new("Chennai", "Tirupati Balaji")
        .with_travel_mode(TravelMode::Train)
        .with_duration_days(3)
        .with_traveler_count(2)
        .with_budget_level(BudgetLevel::Medium);

    let result = Estimator::deterministic().estimate(&request).await;
    let b = result.breakdown();

    assert_eq!(b.transportation, 6000.0);
    assert_eq!(b.accommodation, 8400.0);
    assert_eq!(b.food, 4200.0);
    // 200 sits below the 50 x 2 travelers x 3 days floor
    assert_eq!(b.temple_entry, 300.0);
    assert_eq!(b.local_transport, 2400.0);
    assert_eq!(b.miscellaneous, 1860.0);
    assert_eq!(result.total(), 23160.0);
}

#[tokio::test]
async fn test_total_matches_breakdown_and_bounds_hold() {
    let estimator = Estimator::deterministic();

    for request in sample_requests() {
        let result = estimator.estimate(&request).await;
        assert_eq!(result.total(), result.breakdown().sum());
        assert!(!result.tips().is_empty());

        for (category, amount) in result.breakdown().iter() {
            let bounds = category_bounds(category, &request);
            assert!(
                amount >= bounds.min && amount <= bounds.max,
                "{category} = {amount} outside [{}, {}] for {request:?}",
                bounds.min,
                bounds.max
            );
        }
    }
}

#[test]
fn test_deterministic_path_is_repeatable() {
    for request in sample_requests() {
        assert_eq!(deterministic_estimate(&request), deterministic_estimate(&request));
    }
}

#[test]
fn test_missing_counts_are_treated_as_one() {
    let request: TripRequest = serde_json::from_value(json!({
        "from": "Madurai",
        "toTemple": "Meenakshi Amman",
        "travelMode": "car",
        "duration": "",
        "travelers": "lots",
        "budgetLevel": "budget"
    }))
    .unwrap();

    assert_eq!(request.days(), 1);
    assert_eq!(request.travelers(), 1);

    let result = tokio_test::block_on(Estimator::deterministic().estimate(&request));
    assert_eq!(
        result.breakdown().get(CostCategory::Transportation),
        4000.0
    );
    assert_eq!(result.breakdown().get(CostCategory::Accommodation), 800.0);
}

#[test]
fn test_unconfigured_estimator_matches_deterministic() {
    let request = TripRequest::new("Amritsar", "Golden Temple")
        .with_duration_days(2)
        .with_traveler_count(3);

    let from_config = Estimator::new(EstimatorConfig::default()).unwrap();
    assert!(!from_config.is_remote_enabled());

    let a = tokio_test::block_on(from_config.estimate(&request));
    let b = tokio_test::block_on(Estimator::deterministic().estimate(&request));
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_concurrent_estimates_are_independent() {
    let estimator = std::sync::Arc::new(Estimator::deterministic());
    let mut handles = Vec::new();

    for travelers in 1..=8u32 {
        let estimator = estimator.clone();
        handles.push(tokio::spawn(async move {
            let request = TripRequest::new("Hyderabad", "Srisailam").with_traveler_count(travelers);
            let result = estimator.estimate(&request).await;
            (travelers, result.breakdown().temple_entry)
        }));
    }

    for handle in handles {
        let (travelers, temple_entry) = handle.await.unwrap();
        assert_eq!(temple_entry, 100.0 * f64::from(travelers));
    }
}

#[test]
fn test_result_serializes_for_clients() {
    let request = TripRequest::new("Delhi", "Vrindavan");
    let result = tokio_test::block_on(Estimator::deterministic().estimate(&request));
    let value = serde_json::to_value(&result).unwrap();

    let keys: Vec<&str> = value["breakdown"]
        .as_object()
        .unwrap()
        .keys()
        .map(String::as_str)
        .collect();
    for category in CostCategory::ALL {
        assert!(keys.contains(&category.key()));
    }
    assert_eq!(keys.len(), 6);
    assert!(value["tips"].as_array().is_some_and(|tips| !tips.is_empty()));
}
