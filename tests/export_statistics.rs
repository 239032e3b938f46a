//! Export recurrence statistics to JSON for external plotting.
//!
//! Run with: cargo test --test export_statistics -- --ignored --nocapture

#[cfg(feature = "serde")]
use approx::assert_relative_eq;
use recurrence_network::{analyze, Metric, RecurrenceConfig, TimeSeries};
use serde::Serialize;
use std::fs::File;
use std::io::Write;

#[derive(Serialize)]
struct StatisticsExport {
    r: f64,
    threshold: Option<f64>,
    recurrence_rate: f64,
    determinism: f64,
    laminarity: f64,
    average_path_length: f64,
    transitivity: f64,
    global_clustering: f64,
    assortativity: Option<f64>,
    components: usize,
}

#[derive(Serialize)]
struct ExportData {
    sweep: Vec<StatisticsExport>,
    config: ConfigExport,
}

#[derive(Serialize)]
struct ConfigExport {
    len: usize,
    x0: f64,
    recurrence_rate: f64,
    metric: String,
}

fn logistic_map(x0: f64, r: f64, len: usize) -> Vec<f64> {
    let mut series = Vec::with_capacity(len);
    let mut x = x0;
    for _ in 0..len {
        series.push(x);
        x = r * x * (1.0 - x);
    }
    series
}

fn sweep_point(r: f64, len: usize, x0: f64, config: &RecurrenceConfig) -> Option<StatisticsExport> {
    let series = TimeSeries::new(logistic_map(x0, r, len)).ok()?;
    let analysis = analyze(&series, config).ok()?;
    let stats = analysis.statistics().ok()?;
    let assortativity = stats.assortativity();

    Some(StatisticsExport {
        r,
        threshold: stats.threshold,
        recurrence_rate: stats.recurrence_rate(),
        determinism: stats.rqa.determinism,
        laminarity: stats.rqa.laminarity,
        average_path_length: stats.average_path_length(),
        transitivity: stats.transitivity(),
        global_clustering: stats.global_clustering(),
        // JSON has no NaN
        assortativity: assortativity.is_finite().then_some(assortativity),
        components: stats.network.component_count,
    })
}

#[test]
fn test_sweep_point_is_serializable() {
    let config = RecurrenceConfig::fixed_recurrence_rate(0.05);
    let point = sweep_point(3.679, 150, 0.7, &config).unwrap();
    let json = serde_json::to_value(&point).unwrap();

    assert!(json["recurrence_rate"].as_f64().unwrap() >= 0.05);
    assert_eq!(json["r"].as_f64().unwrap(), 3.679);
}

#[test]
#[ignore] // Run manually with: cargo test --test export_statistics -- --ignored --nocapture
fn export_logistic_sweep_to_json() {
    let len = 1000;
    let x0 = 0.7;
    let config = RecurrenceConfig::fixed_recurrence_rate(0.05).with_metric(Metric::Supremum);

    let sweep: Vec<StatisticsExport> = (0..=120)
        .filter_map(|step| {
            let r = 3.5 + f64::from(step) * 0.004;
            sweep_point(r, len, x0, &config)
        })
        .collect();

    let export_data = ExportData {
        sweep,
        config: ConfigExport {
            len,
            x0,
            recurrence_rate: 0.05,
            metric: config.metric.to_string(),
        },
    };

    let json = serde_json::to_string_pretty(&export_data).expect("Failed to serialize");

    let output_path = std::env::temp_dir().join("logistic_sweep.json");
    let mut file = File::create(&output_path).expect("Failed to create file");
    file.write_all(json.as_bytes()).expect("Failed to write file");

    println!("Exported {} sweep points to {}", export_data.sweep.len(), output_path.display());
    for point in export_data.sweep.iter().step_by(20) {
        println!(
            "r = {:.3}  DET = {:.3}  LAM = {:.3}  L = {:.3}  T = {:.3}",
            point.r, point.determinism, point.laminarity, point.average_path_length, point.transitivity
        );
    }
}

#[cfg(feature = "serde")]
#[test]
fn test_statistics_serde_round_trip() {
    let config = RecurrenceConfig::fixed_threshold(0.1).with_embedding(2, 1);
    let series = TimeSeries::new(logistic_map(0.7, 3.679, 120)).unwrap();
    let stats = analyze(&series, &config).unwrap().statistics().unwrap();

    let config_json = serde_json::to_string(&config).unwrap();
    let parsed: RecurrenceConfig = serde_json::from_str(&config_json).unwrap();
    assert_eq!(parsed, config);
    assert!(config_json.contains("\"supremum\""));

    let stats_json = serde_json::to_value(&stats).unwrap();
    assert_eq!(
        stats_json["rqa"]["determinism"].as_f64().unwrap(),
        stats.rqa.determinism
    );
    assert_eq!(
        stats_json["network"]["node_count"].as_u64().unwrap(),
        stats.network.node_count as u64
    );

    let back: recurrence_network::RecurrenceStatistics = serde_json::from_value(stats_json).unwrap();
    assert_eq!(back.threshold, stats.threshold);
    assert_relative_eq!(back.rqa.determinism, stats.rqa.determinism, epsilon = 1e-12);
    assert_relative_eq!(back.rqa.diagonal_entropy, stats.rqa.diagonal_entropy, epsilon = 1e-12);
    assert_relative_eq!(back.global_clustering(), stats.global_clustering(), epsilon = 1e-12);
}

#[cfg(feature = "serde")]
#[test]
fn test_complete_graph_statistics_read_back() {
    // Every pair within the threshold: assortativity is undefined
    let series = TimeSeries::new((0..8).map(f64::from).collect()).unwrap();
    let stats = analyze(&series, &RecurrenceConfig::fixed_threshold(100.0))
        .unwrap()
        .statistics()
        .unwrap();
    assert!(stats.assortativity().is_nan());

    let json = serde_json::to_string(&stats).unwrap();
    assert!(json.contains("\"assortativity\":null"));

    let back: recurrence_network::RecurrenceStatistics = serde_json::from_str(&json).unwrap();
    assert!(back.assortativity().is_nan());
    assert_eq!(back.threshold, Some(100.0));
    assert_eq!(back.rqa.max_diagonal_line_length, stats.rqa.max_diagonal_line_length);
    assert_eq!(back.network.edge_count, 28);
    assert_eq!(back.average_path_length(), 1.0);
    assert_eq!(back.transitivity(), 1.0);
}
