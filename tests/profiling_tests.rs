//! Profiling scenarios and invariants

use data_profiling_sdk::ingest::Ingestor;
use data_profiling_sdk::models::{Column, ColumnType, Dataset, Row, Schema, Value};
use data_profiling_sdk::profiling::{
    AnalysisConfig, Direction, Impact, InsightType, OutlierFences, ProfilingEngine,
    QualityStatus, Strength, assess, correlate, correlation_between, summarize,
};
use proptest::prelude::*;

fn number_column(name: &str, values: &[Option<f64>]) -> Dataset {
    let schema = Schema::new(vec![Column::new(name, ColumnType::Number)], 0);
    let rows = values
        .iter()
        .map(|v| Row::new(vec![v.map(Value::Number).unwrap_or(Value::Null)]))
        .collect();
    Dataset::new(schema, rows)
}

fn xy(xs: &[f64], ys: &[f64]) -> Dataset {
    let schema = Schema::new(
        vec![
            Column::new("x", ColumnType::Number),
            Column::new("y", ColumnType::Number),
        ],
        0,
    );
    let rows = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| Row::new(vec![Value::Number(*x), Value::Number(*y)]))
        .collect();
    Dataset::new(schema, rows)
}

mod scenario_tests {
    use super::*;

    #[test]
    fn test_scenario_b_outlier() {
        let values: Vec<Option<f64>> = [20.0, 21.0, 22.0, 23.0, 24.0, 25.0, 26.0, 27.0, 28.0, 1000.0]
            .into_iter()
            .map(Some)
            .collect();
        let ds = number_column("age", &values);
        let report = ProfilingEngine::new().analyze(&ds);

        let summary = report.summary("age").unwrap();
        let q1 = summary.q1.unwrap();
        let q3 = summary.q3.unwrap();
        assert!((q1 - 21.0).abs() <= 1.0);
        assert!((q3 - 27.0).abs() <= 1.0);

        let fences = OutlierFences::from_summary(summary).unwrap();
        assert!((fences.upper - 36.0).abs() <= 2.0);

        let outliers = report.insights_of(InsightType::Outlier);
        assert_eq!(outliers.len(), 1);
        assert_eq!(outliers[0].impact, Impact::Medium);
        assert_eq!(outliers[0].confidence, 0.7);
        let data = outliers[0].data.as_ref().unwrap();
        assert_eq!(data["rows"].as_array().unwrap().len(), 1);
        assert_eq!(data["rows"][0]["age"], 1000.0);
    }

    #[test]
    fn test_scenario_c_missing_data() {
        let mut values: Vec<Option<f64>> = (1..=8).map(|v| Some(v as f64)).collect();
        values.insert(3, None);
        values.push(None);
        let ds = number_column("amount", &values);
        let report = ProfilingEngine::new().analyze(&ds);

        let missing: Vec<_> = report
            .insights_of(InsightType::Quality)
            .into_iter()
            .filter(|i| i.title.contains("amount"))
            .collect();
        assert_eq!(missing.len(), 1);
        assert_eq!(missing[0].impact, Impact::High);
        assert_eq!(missing[0].confidence, 1.0);

        let completeness = report.metric("Completeness").unwrap();
        assert_eq!(completeness.value, 80.0);
        assert_eq!(completeness.status, QualityStatus::Warning);
    }

    #[test]
    fn test_scenario_d_correlation() {
        let ds = xy(&[1.0, 2.0, 3.0, 4.0, 5.0], &[2.0, 4.0, 6.0, 8.0, 10.0]);
        let report = ProfilingEngine::new().analyze(&ds);

        assert_eq!(report.correlations.len(), 1);
        let c = &report.correlations[0];
        assert!((c.coefficient - 1.0).abs() < 1e-9);
        assert_eq!(c.strength, Strength::Strong);
        assert_eq!(c.direction, Direction::Positive);

        let insights = report.insights_of(InsightType::Correlation);
        assert_eq!(insights.len(), 1);
        assert_eq!(insights[0].impact, Impact::High);
        assert_eq!(insights[0].confidence, 0.9);
    }

    #[test]
    fn test_end_to_end_from_csv() {
        let csv = "region,units,revenue\n\
                   north,10,100\n\
                   south,20,210\n\
                   north,30,290\n\
                   east,,\n\
                   west,50,480\n";
        let file = Ingestor::new().ingest_bytes("sales.csv", csv.as_bytes(), None).unwrap();
        let report = ProfilingEngine::new().analyze(&file.dataset);

        let region = report.summary("region").unwrap();
        assert_eq!(region.mode, Some(Value::Text("north".to_string())));
        assert!(region.mean.is_none());
        let distribution = region.distribution.as_ref().unwrap();
        assert_eq!(distribution[0].count, 2);
        assert_eq!(distribution[0].percentage, 40.0);

        let units = report.summary("units").unwrap();
        assert_eq!(units.null_count, 1);
        assert_eq!(units.mean, Some(27.5));

        assert!(report.correlations.iter().any(|c| c.column1 == "units" && c.column2 == "revenue"));
    }

    #[test]
    fn test_constant_columns_produce_no_correlation_insight() {
        let mut csv = String::from("price,tax\n");
        for _ in 0..7 {
            csv.push_str("1.1,3.3000000000000003\n");
        }
        let file = Ingestor::new().ingest_bytes("flat.csv", csv.as_bytes(), None).unwrap();
        let report = ProfilingEngine::new().analyze(&file.dataset);

        assert_eq!(report.summary("price").unwrap().std_dev, Some(0.0));
        assert!(report.correlations.is_empty());
        assert!(report.insights_of(InsightType::Correlation).is_empty());
    }
}

mod quality_tests {
    use super::*;

    #[test]
    fn test_consistency_reports_non_numeric_cells() {
        // Inference only looks at the first sample_size rows
        let mut csv = String::from("v\n");
        for i in 0..100 {
            csv.push_str(&format!("{}\n", i));
        }
        for _ in 0..100 {
            csv.push_str("unknown\n");
        }
        let file = Ingestor::new().ingest_bytes("v.csv", csv.as_bytes(), None).unwrap();
        assert_eq!(file.schema().columns[0].column_type, ColumnType::Number);

        let metrics = assess(&file.dataset, &AnalysisConfig::default().quality);
        let consistency = metrics.iter().find(|m| m.metric == "Consistency").unwrap();
        assert_eq!(consistency.value, 50.0);
        assert_eq!(consistency.status, QualityStatus::Error);
        assert!(consistency.recommendation.is_some());

        let report = ProfilingEngine::new().analyze(&file.dataset);
        assert!(
            report
                .insights_of(InsightType::Quality)
                .iter()
                .any(|i| i.title.starts_with("Consistency"))
        );
    }

    #[test]
    fn test_completeness_is_100_without_nulls() {
        let ds = xy(&[1.0, 2.0], &[3.0, 4.0]);
        let metrics = assess(&ds, &AnalysisConfig::default().quality);
        assert_eq!(metrics[0].value, 100.0);
        assert_eq!(metrics[0].status, QualityStatus::Good);
    }
}

mod ranking_tests {
    use super::*;

    #[test]
    fn test_insights_ranked_by_impact_then_confidence() {
        // Strong correlation (high, 0.9), outlier in y (medium, 0.7), missing z (high, 1.0)
        let schema = Schema::new(
            vec![
                Column::new("x", ColumnType::Number),
                Column::new("y", ColumnType::Number),
                Column::new("z", ColumnType::Number),
            ],
            0,
        );
        let rows = (0..20)
            .map(|i| {
                let x = i as f64;
                let y = if i == 19 { 500.0 } else { 2.0 * x };
                let z = if i % 2 == 0 { Value::Null } else { Value::Number(1.0) };
                Row::new(vec![Value::Number(x), Value::Number(y), z])
            })
            .collect();
        let ds = Dataset::new(schema, rows);
        let report = ProfilingEngine::new().analyze(&ds);

        for pair in report.insights.windows(2) {
            assert!(
                pair[0].impact > pair[1].impact
                    || (pair[0].impact == pair[1].impact
                        && pair[0].confidence >= pair[1].confidence)
            );
        }
        assert_eq!(report.insights[0].impact, Impact::High);
    }
}

proptest! {
    #[test]
    fn prop_counts_and_ordering(values in prop::collection::vec(prop::option::of(-1e6f64..1e6), 0..60)) {
        let ds = number_column("v", &values);
        let summaries = summarize(&ds, &AnalysisConfig::default());
        let s = &summaries[0];

        prop_assert_eq!(s.null_count + s.non_null_count(), ds.row_count());

        if let (Some(min), Some(max)) = (s.min, s.max) {
            let mean = s.mean.unwrap();
            let median = s.median.unwrap();
            prop_assert!(min <= mean && mean <= max);
            prop_assert!(min <= median && median <= max);

            let (q1, q3) = (s.q1.unwrap(), s.q3.unwrap());
            prop_assert!(q1 <= q3);
            let fences = OutlierFences::from_quartiles(q1, q3);
            prop_assert!(fences.lower <= q1 && q3 <= fences.upper);
        }
    }

    #[test]
    fn prop_correlation_symmetric_and_bounded(
        pairs in prop::collection::vec((-1e3f64..1e3, -1e3f64..1e3), 2..40)
    ) {
        let (xs, ys): (Vec<f64>, Vec<f64>) = pairs.into_iter().unzip();
        let ds = xy(&xs, &ys);

        let ab = correlation_between(&ds, "x", "y").unwrap();
        let ba = correlation_between(&ds, "y", "x").unwrap();
        prop_assert_eq!(ab.coefficient, ba.coefficient);
        prop_assert!((-1.0..=1.0).contains(&ab.coefficient));

        for c in correlate(&ds) {
            prop_assert!(c.coefficient.abs() >= 0.3);
        }
    }

    #[test]
    fn prop_completeness_100_iff_no_nulls(values in prop::collection::vec(prop::option::of(0f64..10.0), 1..40)) {
        let ds = number_column("v", &values);
        let metrics = assess(&ds, &AnalysisConfig::default().quality);
        let has_nulls = values.iter().any(|v| v.is_none());
        prop_assert_eq!(metrics[0].value == 100.0, !has_nulls);
    }
}
