use channel_forecast::models::ForecastModel;
use channel_forecast::{
    BoostedTreeModel, DailyMetrics, DailyRecord, ForecastAssembler, ForecastConfig, Method,
    Metric, MovingAverageModel, WeightedTrendModel,
};
use chrono::{Days, NaiveDate};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("Channel Forecast: Basic Forecasting Example");
    println!("===========================================\n");

    // Create sample data
    let data = create_sample_daily_data(60);
    println!(
        "Sample data created: {} days ending {}\n",
        data.len(),
        data.last_date().map(|d| d.to_string()).unwrap_or_default()
    );

    // Run each model on the view counts directly
    let views = data.values(Metric::ViewCount);
    let models: Vec<Box<dyn ForecastModel>> = vec![
        Box::new(MovingAverageModel::default()),
        Box::new(WeightedTrendModel::default()),
        Box::new(BoostedTreeModel::default()),
    ];

    println!("Raw 7-day view forecasts:");
    for model in &models {
        let result = model.forecast(views, 7)?;
        let rounded: Vec<String> = result.values().iter().map(|v| format!("{:.1}", v)).collect();
        println!("  {:<45} [{}]", model.name(), rounded.join(", "));
    }

    // Full assembly, post-processed like the dashboard snapshot
    let config = ForecastConfig {
        horizon: 7,
        ..ForecastConfig::default()
    };
    let assembler = ForecastAssembler::new(&config)?;
    let Some(bundle) = assembler.assemble(&data) else {
        println!("No data to forecast");
        return Ok(());
    };

    println!("\nForecast dates: {:?}", bundle.dates);
    for method in Method::ALL {
        if let Some(revenue) = bundle.get(method, Metric::Revenue) {
            println!("  {} revenue: {:?}", method, revenue.to_f64());
        }
    }

    println!("\nSnapshot:\n{}", bundle.to_json_string()?);
    Ok(())
}

/// Views with weekly seasonality and growth, steady subscriber gain and
/// revenue proportional to views
fn create_sample_daily_data(days: u64) -> DailyMetrics {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap_or_default();

    DailyMetrics::from_records((0..days).map(|i| {
        let weekday_boost = if i % 7 >= 5 { 1.3 } else { 1.0 };
        let views = (1200.0 + 15.0 * i as f64) * weekday_boost;
        let subscribers = 20.0 + (i % 5) as f64;
        let revenue = views * 0.0042;

        DailyRecord::new(start + Days::new(i), views, subscribers, revenue)
    }))
}
